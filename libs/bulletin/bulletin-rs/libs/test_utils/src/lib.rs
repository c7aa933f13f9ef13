pub mod assert;

use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bulletin_rs::io::mem::InMemStore;
use bulletin_rs::model::asset::UploadedAsset;
use bulletin_rs::model::clock::Timestamp;
use bulletin_rs::model::core_config::{SiteLayout, StoreConfig};
use bulletin_rs::model::record::{AnnouncementDraft, Localized, NotificationDraft};
use bulletin_rs::model::remote_file::{CommitRequest, RemoteFile, VersionToken};
use bulletin_rs::{Bulletin, BulletinErrKind, BulletinResult, Config, FileStore};

/// Every test bulletin reads the clock as this instant.
pub const TEST_TIME: i64 = 1_700_000_000_000;

pub fn test_time() -> Timestamp {
    Timestamp(TEST_TIME)
}

pub fn test_config() -> Config {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_nanos()).unwrap_or(0);
    Config {
        writeable_path: env::temp_dir()
            .join(format!("bulletin-{nanos}"))
            .to_string_lossy()
            .to_string(),
        logs: false,
        stdout_logs: false,
        colored_logs: false,
        store: StoreConfig { token: Some("test-token".to_string()), ..Default::default() },
        site: SiteLayout::default(),
    }
}

/// A bulletin over an empty in-memory repository, and a handle on that repository.
pub fn test_bulletin() -> (Bulletin, InMemStore) {
    let store = InMemStore::new();
    (test_bulletin_with(Arc::new(store.clone())), store)
}

pub fn test_bulletin_with(store: Arc<dyn FileStore>) -> Bulletin {
    let mut bulletin = Bulletin::with_store(test_config(), store);
    bulletin.get_time = test_time;
    bulletin
}

pub fn image(name: &str) -> UploadedAsset {
    UploadedAsset::new(name, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a])
}

pub fn document(name: &str) -> UploadedAsset {
    UploadedAsset::new(name, b"%PDF-1.4\n%%EOF\n".to_vec())
}

pub fn notification_draft(title: &str) -> NotificationDraft {
    NotificationDraft {
        title_en: title.to_string(),
        title_ka: String::new(),
        date: "2024-03-01".to_string(),
    }
}

pub fn announcement_draft(subtitle: &str) -> AnnouncementDraft {
    AnnouncementDraft {
        subtitle: Localized::new(subtitle, ""),
        ..Default::default()
    }
}

/// Fails every commit under `prefix` as if GitHub could not be reached; everything else goes to
/// `inner`.
#[derive(Clone)]
pub struct FailingStore {
    pub inner: InMemStore,
    pub prefix: String,
}

#[async_trait]
impl FileStore for FailingStore {
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile> {
        self.inner.fetch(path).await
    }

    async fn commit(&self, request: CommitRequest) -> BulletinResult<VersionToken> {
        if request.path.starts_with(&self.prefix) {
            return Err(BulletinErrKind::ServerUnreachable.into());
        }
        self.inner.commit(request).await
    }
}

/// Lets someone else write `foreign` to `path` right after the first time it is fetched, so the
/// commit that follows is working from a stale version.
pub struct RacingStore {
    pub inner: InMemStore,
    pub path: String,
    pub foreign: String,
    raced: AtomicBool,
}

impl RacingStore {
    pub fn new(inner: InMemStore, path: &str, foreign: &str) -> Self {
        Self {
            inner,
            path: path.to_string(),
            foreign: foreign.to_string(),
            raced: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl FileStore for RacingStore {
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile> {
        let file = self.inner.fetch(path).await;
        if path == self.path && !self.raced.swap(true, Ordering::SeqCst) {
            self.inner.insert(path, self.foreign.clone());
        }
        file
    }

    async fn commit(&self, request: CommitRequest) -> BulletinResult<VersionToken> {
        self.inner.commit(request).await
    }
}

/// Reads go to `inner`; commits never complete, like a request stuck on a dead connection.
#[derive(Clone)]
pub struct StalledStore {
    pub inner: InMemStore,
}

#[async_trait]
impl FileStore for StalledStore {
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile> {
        self.inner.fetch(path).await
    }

    async fn commit(&self, _request: CommitRequest) -> BulletinResult<VersionToken> {
        std::future::pending().await
    }
}
