use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::io::store::FileStore;
use crate::model::errors::{BulletinErrKind, BulletinResult};
use crate::model::remote_file::{CommitRequest, RemoteFile, VersionToken};

/// A [FileStore] held in memory with the same compare-and-swap rules as GitHub. Clones share
/// state, so a test can keep one handle to inspect what the code under test committed.
#[derive(Clone, Default)]
pub struct InMemStore {
    state: Arc<Mutex<InMemState>>,
}

#[derive(Default)]
struct InMemState {
    files: HashMap<String, StoredFile>,
    commits: Vec<CommitRecord>,
    fetches: usize,
}

struct StoredFile {
    content: Vec<u8>,
    revision: u64,
}

impl StoredFile {
    fn version(&self) -> VersionToken {
        VersionToken(format!("v{}", self.revision))
    }
}

/// One successful commit, in the order they happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub path: String,
    pub message: String,
    pub version: VersionToken,
    pub binary: bool,
}

impl InMemStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, InMemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes `content` without a version check or a commit record, as if someone edited the
    /// repository by hand.
    pub fn insert(&self, path: &str, content: impl Into<Vec<u8>>) -> VersionToken {
        let mut state = self.state();
        let revision = state.files.get(path).map(|file| file.revision + 1).unwrap_or(1);
        let file = StoredFile { content: content.into(), revision };
        let version = file.version();
        state.files.insert(path.to_string(), file);
        version
    }

    pub fn peek(&self, path: &str) -> Option<RemoteFile> {
        self.state().files.get(path).map(|file| RemoteFile {
            path: path.to_string(),
            content: file.content.clone(),
            version: file.version(),
        })
    }

    pub fn peek_text(&self, path: &str) -> Option<String> {
        self.peek(path).map(|file| String::from_utf8_lossy(&file.content).to_string())
    }

    pub fn commits(&self) -> Vec<CommitRecord> {
        self.state().commits.clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.state().fetches
    }
}

#[async_trait]
impl FileStore for InMemStore {
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile> {
        let mut state = self.state.lock()?;
        state.fetches += 1;
        let file = state
            .files
            .get(path)
            .ok_or_else(|| BulletinErrKind::RemoteFileNotFound(path.to_string()))?;

        Ok(RemoteFile { path: path.to_string(), content: file.content.clone(), version: file.version() })
    }

    async fn commit(&self, request: CommitRequest) -> BulletinResult<VersionToken> {
        let mut state = self.state.lock()?;
        let current = state.files.get(&request.path).map(StoredFile::version);

        if current != request.expected {
            debug!(path = %request.path, ?current, expected = ?request.expected, "rejecting stale commit");
            return Err(BulletinErrKind::VersionConflict(request.path).into());
        }

        let revision = state.files.get(&request.path).map(|file| file.revision + 1).unwrap_or(1);
        let binary = request.payload.is_binary();
        let file = StoredFile { content: request.payload.bytes().to_vec(), revision };
        let version = file.version();

        state.files.insert(request.path.clone(), file);
        state.commits.push(CommitRecord {
            path: request.path,
            message: request.message,
            version: version.clone(),
            binary,
        });

        Ok(version)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::model::remote_file::Payload;

    fn commit(path: &str, text: &str, expected: Option<&VersionToken>) -> CommitRequest {
        CommitRequest {
            path: path.to_string(),
            payload: Payload::Text(text.to_string()),
            expected: expected.cloned(),
            message: "edit".to_string(),
        }
    }

    #[tokio::test]
    async fn fetch_missing_is_not_found() {
        let store = InMemStore::new();
        let err = store.fetch("src/data/x.js").await.unwrap_err();
        assert_eq!(err.kind, BulletinErrKind::RemoteFileNotFound("src/data/x.js".to_string()));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn tokens_advance_per_write() {
        let store = InMemStore::new();
        let v1 = store.commit(commit("a.js", "1", None)).await.unwrap();
        let v2 = store.commit(commit("a.js", "2", Some(&v1))).await.unwrap();
        assert_ne!(v1, v2);

        let file = store.fetch("a.js").await.unwrap();
        assert_eq!(file.version, v2);
        assert_eq!(file.text().unwrap(), "2");
    }

    #[tokio::test]
    async fn stale_or_missing_tokens_conflict() {
        let store = InMemStore::new();
        let v1 = store.insert("a.js", "1");

        // creating over an existing file
        let err = store.commit(commit("a.js", "x", None)).await.unwrap_err();
        assert_eq!(err.kind, BulletinErrKind::VersionConflict("a.js".to_string()));

        // replacing a file that does not exist
        let err = store.commit(commit("b.js", "x", Some(&v1))).await.unwrap_err();
        assert_eq!(err.kind, BulletinErrKind::VersionConflict("b.js".to_string()));

        let v2 = store.insert("a.js", "2");
        let err = store.commit(commit("a.js", "x", Some(&v1))).await.unwrap_err();
        assert_eq!(err.kind, BulletinErrKind::VersionConflict("a.js".to_string()));

        assert_eq!(store.peek_text("a.js").unwrap(), "2");
        assert_eq!(store.peek("a.js").unwrap().version, v2);
        assert!(store.commits().is_empty());
    }

    #[tokio::test]
    async fn commits_are_recorded_in_order() {
        let store = InMemStore::new();
        store.commit(commit("a.js", "1", None)).await.unwrap();
        store
            .commit(CommitRequest {
                path: "public/assets/p.png".to_string(),
                payload: Payload::Binary(vec![1, 2]),
                expected: None,
                message: "Update announcement image".to_string(),
            })
            .await
            .unwrap();

        let commits = store.commits();
        assert_eq!(commits.len(), 2);
        assert_eq!(commits[0].path, "a.js");
        assert!(!commits[0].binary);
        assert_eq!(commits[1].message, "Update announcement image");
        assert!(commits[1].binary);
    }
}
