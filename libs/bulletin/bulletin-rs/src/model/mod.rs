pub mod api;
pub mod asset;
pub mod clock;
pub mod core_config;
pub mod data_file;
pub mod errors;
pub mod record;
pub mod remote_file;
pub mod validate;

/// Local form problems, caught before anything is sent to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationFailure {
    MissingTitleEn,
    MissingDate,
    MissingSubtitleEn,
    NoImagesSelected,
    EmptyAsset(String),
}
