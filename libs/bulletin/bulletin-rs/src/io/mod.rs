//! Members of this module are concerned with where files live: the website's GitHub repository
//! or, for tests and offline use, memory.

pub mod mem;
pub mod network;
pub mod store;
