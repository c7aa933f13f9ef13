use async_trait::async_trait;

use crate::model::errors::BulletinResult;
use crate::model::remote_file::{CommitRequest, RemoteFile, VersionToken};

/// A repository of whole files, each carrying a version token that changes on every write.
///
/// `commit` is a compare-and-swap: it succeeds only when `expected` is the file's current token
/// (or is `None` and the file does not exist yet), and fails with
/// [crate::BulletinErrKind::VersionConflict] otherwise. Implementations never retry on their own.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Fails with [crate::BulletinErrKind::RemoteFileNotFound] when nothing is at `path`.
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile>;

    /// Returns the token of the version just written.
    async fn commit(&self, request: CommitRequest) -> BulletinResult<VersionToken>;
}
