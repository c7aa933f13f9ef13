//! The slice of the GitHub REST API bulletin talks to: the repository contents endpoint and, for
//! files too large to be inlined there, the git blobs endpoint.

use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

pub const API_VERSION: &str = "2022-11-28";
pub const ACCEPT: &str = "application/vnd.github+json";

pub trait Request: Serialize + 'static {
    type Response: Debug + DeserializeOwned + Clone;
    type Error: Debug + Clone;
    const METHOD: Method;

    /// Path segments below `/repos/{owner}/{name}`.
    fn route(&self) -> Vec<String>;

    /// Claims the statuses that mean something specific for this route.
    fn endpoint_error(&self, status: StatusCode, message: &str) -> Option<Self::Error>;
}

/// The body GitHub sends along with every non-2xx status.
#[derive(Deserialize, Debug, Clone)]
pub struct GithubError {
    pub message: String,
    #[serde(default)]
    pub documentation_url: Option<String>,
}

fn path_segments(path: &str) -> impl Iterator<Item = String> + '_ {
    path.split('/').filter(|segment| !segment.is_empty()).map(String::from)
}

#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct GetContentRequest {
    #[serde(skip)]
    pub path: String,
    #[serde(rename = "ref")]
    pub reference: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentFile {
    #[serde(rename = "type")]
    pub kind: String,
    pub path: String,
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    /// base64 with embedded line breaks, or empty when the file is too large to inline
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub encoding: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GetContentError {
    NotFound(String),
}

impl Request for GetContentRequest {
    type Response = ContentFile;
    type Error = GetContentError;
    const METHOD: Method = Method::GET;

    fn route(&self) -> Vec<String> {
        let mut route = vec!["contents".to_string()];
        route.extend(path_segments(&self.path));
        route
    }

    fn endpoint_error(&self, status: StatusCode, _message: &str) -> Option<Self::Error> {
        match status {
            StatusCode::NOT_FOUND => Some(GetContentError::NotFound(self.path.clone())),
            _ => None,
        }
    }
}

#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct GetBlobRequest {
    #[serde(skip)]
    pub sha: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub sha: String,
    #[serde(default)]
    pub size: u64,
    pub content: String,
    pub encoding: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum GetBlobError {
    NotFound,
}

impl Request for GetBlobRequest {
    type Response = Blob;
    type Error = GetBlobError;
    const METHOD: Method = Method::GET;

    fn route(&self) -> Vec<String> {
        vec!["git".to_string(), "blobs".to_string(), self.sha.clone()]
    }

    fn endpoint_error(&self, status: StatusCode, _message: &str) -> Option<Self::Error> {
        match status {
            StatusCode::NOT_FOUND => Some(GetBlobError::NotFound),
            _ => None,
        }
    }
}

/// Creates or replaces a whole file in a single commit.
#[derive(Serialize, Debug, PartialEq, Eq, Clone)]
pub struct PutContentRequest {
    #[serde(skip)]
    pub path: String,
    pub message: String,
    /// base64 of the complete new content
    pub content: String,
    /// Blob sha of the version being replaced; absent when creating the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    pub branch: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PutContentResponse {
    pub content: CommittedContent,
    pub commit: CommitSummary,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommittedContent {
    pub path: String,
    pub sha: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub sha: String,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PutContentError {
    /// Arises when the presented sha is not the file's current blob sha, or when no sha was
    /// presented for a file that already exists
    Conflict(String),

    /// Arises when the repository or branch does not exist or is hidden from the token
    NotFound,

    /// Other validation failures reported by GitHub
    Rejected(String),
}

impl Request for PutContentRequest {
    type Response = PutContentResponse;
    type Error = PutContentError;
    const METHOD: Method = Method::PUT;

    fn route(&self) -> Vec<String> {
        let mut route = vec!["contents".to_string()];
        route.extend(path_segments(&self.path));
        route
    }

    fn endpoint_error(&self, status: StatusCode, message: &str) -> Option<Self::Error> {
        match status {
            StatusCode::CONFLICT => Some(PutContentError::Conflict(self.path.clone())),
            // "sha" wasn't supplied / does not match
            StatusCode::UNPROCESSABLE_ENTITY if message.contains("sha") => {
                Some(PutContentError::Conflict(self.path.clone()))
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                Some(PutContentError::Rejected(message.to_string()))
            }
            StatusCode::NOT_FOUND => Some(PutContentError::NotFound),
            _ => None,
        }
    }
}
