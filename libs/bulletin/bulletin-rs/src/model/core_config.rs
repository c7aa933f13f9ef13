use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::asset::AssetKind;
use crate::model::errors::{BulletinErrKind, BulletinResult};
use crate::DEFAULT_API_LOCATION;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Where should bulletin store data, including logs?
    pub writeable_path: String,

    /// Should we log at all?
    pub logs: bool,
    /// Should logs be printed to stdout?
    pub stdout_logs: bool,
    /// Should logs be colored?
    pub colored_logs: bool,

    /// Which repository holds the website, and how to reach it.
    pub store: StoreConfig,
    /// Where inside that repository the website keeps its data files and assets.
    pub site: SiteLayout,
}

impl Config {
    /// Configures bulletin for CLI use with no stdout logs. `writeable_path_subfolder` is generally
    /// a hardcoded client name like `"cli"`.
    pub fn cli_config(writeable_path_subfolder: &str) -> Config {
        Config {
            writeable_path: Self::writeable_path(writeable_path_subfolder),
            logs: true,
            stdout_logs: false,
            colored_logs: true,
            store: StoreConfig::from_env(),
            site: SiteLayout::from_env(),
        }
    }

    /// Produces a full writable path for bulletin to use based on environment variables and
    /// platform. Useful for initializing the Config struct.
    pub fn writeable_path(writeable_path_subfolder: &str) -> String {
        let specified_path = env::var("BULLETIN_PATH");

        let default_path =
            env::var("HOME") // unix
                .or(env::var("HOMEPATH")) // windows
                .map(|home| format!("{home}/.bulletin/{writeable_path_subfolder}"));

        let Ok(writeable_path) = specified_path.or(default_path) else {
            panic!("no location for bulletin to initialize");
        };

        writeable_path
    }

    /// The absolute URL under which a committed repository path is served raw.
    pub fn raw_url(&self, path: &str) -> String {
        format!(
            "{}/{}/{}/{}",
            self.store.raw_content_url.trim_end_matches('/'),
            self.store.repository,
            self.store.branch,
            path.trim_start_matches('/')
        )
    }
}

#[derive(Serialize, Deserialize, Clone)]
pub struct StoreConfig {
    pub api_url: String,
    pub raw_content_url: String,
    /// `owner/name`
    pub repository: String,
    pub branch: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

impl StoreConfig {
    pub fn from_env() -> StoreConfig {
        let defaults = StoreConfig::default();
        StoreConfig {
            api_url: env::var("BULLETIN_API_URL").unwrap_or(defaults.api_url),
            raw_content_url: env::var("BULLETIN_RAW_URL").unwrap_or(defaults.raw_content_url),
            repository: env::var("BULLETIN_REPO").unwrap_or(defaults.repository),
            branch: env::var("BULLETIN_BRANCH").unwrap_or(defaults.branch),
            token: env::var("BULLETIN_GITHUB_TOKEN")
                .or(env::var("GITHUB_TOKEN"))
                .ok()
                .filter(|token| !token.trim().is_empty()),
            timeout_secs: env::var("BULLETIN_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }

    pub fn owner_and_name(&self) -> BulletinResult<(&str, &str)> {
        match self.repository.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok((owner, name))
            }
            _ => Err(BulletinErrKind::RepositoryInvalid(self.repository.clone()).into()),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            api_url: DEFAULT_API_LOCATION.to_string(),
            raw_content_url: "https://raw.githubusercontent.com".to_string(),
            repository: "elva-tech/RBKVMUL-website".to_string(),
            branch: "main".to_string(),
            token: None,
            timeout_secs: 30,
        }
    }
}

// the token must never reach a log file
impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("api_url", &self.api_url)
            .field("raw_content_url", &self.raw_content_url)
            .field("repository", &self.repository)
            .field("branch", &self.branch)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SiteLayout {
    pub announcement_path: String,
    /// The identifier in `export const <name> = ...;`
    pub announcement_name: String,
    pub notifications_path: String,
    pub notifications_name: String,
    /// Repository directory images are committed to.
    pub image_dir: String,
    /// How the deployed site refers to `image_dir`.
    pub image_public_prefix: String,
    /// Repository directory notification attachments are committed to.
    pub document_dir: String,
    /// The deployed website, used to preview site-relative image paths.
    pub site_url: String,
}

impl SiteLayout {
    pub fn from_env() -> SiteLayout {
        let defaults = SiteLayout::default();
        SiteLayout { site_url: env::var("BULLETIN_SITE_URL").unwrap_or(defaults.site_url), ..defaults }
    }

    pub fn image_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.image_dir.trim_end_matches('/'))
    }

    pub fn image_reference(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.image_public_prefix.trim_end_matches('/'))
    }

    pub fn document_path(&self, file_name: &str) -> String {
        format!("{}/{file_name}", self.document_dir.trim_end_matches('/'))
    }

    pub fn asset_path(&self, kind: AssetKind, file_name: &str) -> String {
        match kind {
            AssetKind::Image => self.image_path(file_name),
            AssetKind::Document => self.document_path(file_name),
        }
    }
}

impl Default for SiteLayout {
    fn default() -> Self {
        SiteLayout {
            announcement_path: "src/data/popupData.js".to_string(),
            announcement_name: "popupData".to_string(),
            // the site imports this misspelled module, keep it
            notifications_path: "src/data/notofications.js".to_string(),
            notifications_name: "notifications".to_string(),
            image_dir: "public/assets".to_string(),
            image_public_prefix: "/assets".to_string(),
            document_dir: "public/pdfs".to_string(),
            site_url: "https://rbkvmul-website.vercel.app".to_string(),
        }
    }
}
