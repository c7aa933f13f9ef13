//! The library behind the `bulletin` admin tools.
//!
//! A small institutional website keeps its announcement popup and its notification list as
//! generated data files (`export const name = <json>;`) inside its own GitHub repository.
//! This library edits those files the only safe way the contents API allows: read the file and
//! its version token, compute the new content, and commit it back with that token so a
//! concurrent edit is detected rather than overwritten.
//!
//! - Most integrators will be interested in the functions attached to the [Bulletin] struct.
//!   See the [service] module for evolving this functionality.
//! - The [model] module contains records, the data file format and the error taxonomy.
//! - The [io] module contains the versioned file stores (GitHub and in-memory).
//! - The [screen] module holds the state of the two admin screens and their update loop.

#[macro_use]
extern crate tracing;

pub mod io;
pub mod model;
pub mod screen;
pub mod service;

#[derive(Clone)]
pub struct Bulletin {
    pub config: Config,
    pub store: Arc<dyn FileStore>,
    pub busy: Arc<AtomicBool>,
    pub get_time: fn() -> Timestamp,
}

impl Bulletin {
    /// Initializes logging and connects to the repository described by `config.store`.
    #[instrument(level = "info", skip_all, err(Debug))]
    pub async fn init(config: Config) -> BulletinResult<Self> {
        logging::init(&config)?;

        let store = Network::new(&config.store)?;
        info!(repository = %config.store.repository, branch = %config.store.branch, "connected");

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn FileStore>) -> Self {
        Self { config, store, busy: Arc::default(), get_time }
    }

    /// Whether a store-mutating operation is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claims the busy flag for a store-mutating operation. The flag is released when the
    /// returned guard is dropped, including when the operation's future is.
    pub(crate) fn begin_change(&self) -> BulletinResult<ChangeGuard> {
        let old = self.busy.swap(true, Ordering::SeqCst);
        if old {
            return Err(BulletinErrKind::AlreadyBusy.into());
        }
        Ok(ChangeGuard { busy: self.busy.clone() })
    }
}

#[must_use]
pub(crate) struct ChangeGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for ChangeGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

pub fn get_code_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub static DEFAULT_API_LOCATION: &str = "https://api.github.com";

use crate::service::logging;
use io::network::Network;
pub use io::store::FileStore;
use model::clock::{get_time, Timestamp};
pub use model::core_config::Config;
pub use model::errors::{BulletinErr, BulletinErrKind, BulletinResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
