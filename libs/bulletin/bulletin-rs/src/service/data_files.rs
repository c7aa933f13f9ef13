//! The read-modify-write cycle every data file edit goes through.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::data_file;
use crate::model::errors::BulletinResult;
use crate::model::remote_file::{CommitRequest, Payload, VersionToken};
use crate::Bulletin;

/// A decoded data file and the version it was decoded from.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFile<T> {
    pub value: T,
    pub version: VersionToken,
    /// The name the file currently declares, if it declares one.
    pub identifier: Option<String>,
}

/// What a successful [Bulletin::update_data_file] wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFileUpdate<T, R> {
    /// The complete new content, as committed.
    pub value: T,
    /// Whatever the mutation reported about its change.
    pub changed: R,
    pub version: VersionToken,
}

impl Bulletin {
    pub async fn read_data_file<T: DeserializeOwned>(
        &self, path: &str,
    ) -> BulletinResult<Option<DataFile<T>>> {
        let Some(file) = self.maybe_fetch(path).await? else {
            return Ok(None);
        };
        let text = file.text()?;
        let value = data_file::decode(path, text)?;
        let identifier = data_file::identifier(text).map(String::from);

        Ok(Some(DataFile { value, version: file.version, identifier }))
    }

    /// Fetches the file at `path`, hands its decoded content to `mutate` (`None` if the file does
    /// not exist yet), and commits the result against the version that was fetched. A concurrent
    /// edit surfaces as [crate::BulletinErrKind::VersionConflict] and nothing is written. If
    /// `mutate` fails nothing is written either.
    ///
    /// An existing file keeps the name it declares; `name` is used when creating one.
    #[instrument(level = "debug", skip(self, mutate), err(Debug))]
    pub async fn update_data_file<T, R, F>(
        &self, path: &str, name: &str, message: &str, mutate: F,
    ) -> BulletinResult<DataFileUpdate<T, R>>
    where
        T: Serialize + DeserializeOwned + Send,
        R: Send,
        F: FnOnce(Option<T>) -> BulletinResult<(T, R)> + Send,
    {
        let (current, expected, identifier) = match self.read_data_file::<T>(path).await? {
            Some(file) => (Some(file.value), Some(file.version), file.identifier),
            None => (None, None, None),
        };

        let (value, changed) = mutate(current)?;
        let text = data_file::encode(identifier.as_deref().unwrap_or(name), &value)?;

        let version = self
            .store
            .commit(CommitRequest {
                path: path.to_string(),
                payload: Payload::Text(text),
                expected,
                message: message.to_string(),
            })
            .await?;
        info!(path, %version, message, "data file updated");

        Ok(DataFileUpdate { value, changed, version })
    }
}
