pub mod announcements;
pub mod data_files;
pub mod files;
pub mod logging;
pub mod notifications;
