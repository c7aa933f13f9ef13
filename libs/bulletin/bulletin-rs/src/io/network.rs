use std::time::{Duration, Instant};

use async_trait::async_trait;
use http::{header, Method, StatusCode};
use reqwest::{Client, Url};

use crate::get_code_version;
use crate::io::store::FileStore;
use crate::model::api::*;
use crate::model::core_config::StoreConfig;
use crate::model::errors::{core_err_unexpected, BulletinErrKind, BulletinResult, Unexpected};
use crate::model::remote_file::{decode_transport, CommitRequest, RemoteFile, VersionToken};

#[derive(Debug)]
pub enum ApiError<E> {
    Endpoint(E),
    InvalidAuth,
    Forbidden,
    RateLimited,
    InternalError(String),
    BadRequest(String),
    Serialize(String),
    SendFailed(String),
    ReceiveFailed(String),
    Deserialize(String),
}

/// The GitHub contents API as a [FileStore]. Blob shas are the version tokens.
#[derive(Clone)]
pub struct Network {
    pub client: Client,
    /// `{api_url}/repos/{owner}/{name}`
    pub repository_url: Url,
    pub branch: String,
    pub get_code_version: fn() -> &'static str,
    token: String,
}

impl Network {
    pub fn new(config: &StoreConfig) -> BulletinResult<Self> {
        let token = config.token.clone().ok_or(BulletinErrKind::CredentialsMissing)?;
        let (owner, name) = config.owner_and_name()?;

        let mut repository_url = Url::parse(&config.api_url).map_err(core_err_unexpected)?;
        repository_url
            .path_segments_mut()
            .map_err(|_| core_err_unexpected(format!("{} cannot be a base", config.api_url)))?
            .pop_if_empty()
            .extend(["repos", owner, name]);

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_unexpected()?;

        Ok(Self {
            client,
            repository_url,
            branch: config.branch.clone(),
            get_code_version,
            token,
        })
    }

    fn url(&self, route: &[String]) -> Url {
        let mut url = self.repository_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(route);
        }
        url
    }

    #[instrument(level = "debug", skip(self, request), fields(route = ?request.route()), err(Debug))]
    pub async fn request<T: Request>(&self, request: T) -> Result<T::Response, ApiError<T::Error>> {
        let builder = self
            .client
            .request(T::METHOD, self.url(&request.route()))
            .bearer_auth(&self.token)
            .header(header::ACCEPT, ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header(header::USER_AGENT, format!("bulletin/{}", (self.get_code_version)()));

        let builder = if T::METHOD == Method::GET {
            builder.query(&request)
        } else {
            let body = serde_json::to_vec(&request)
                .map_err(|err| ApiError::Serialize(err.to_string()))?;
            if body.len() > 10 * 1024 * 1024 {
                warn!("making network request with {} bytes", body.len());
            }
            builder.header(header::CONTENT_TYPE, "application/json").body(body)
        };

        let start = Instant::now();
        let sent = builder.send().await.map_err(|err| ApiError::SendFailed(err.to_string()))?;
        if start.elapsed() > Duration::from_millis(1000) {
            warn!("network request took {:?}", start.elapsed());
        }

        let status = sent.status();
        let body = sent.bytes().await.map_err(|err| ApiError::ReceiveFailed(err.to_string()))?;

        if status.is_success() {
            return serde_json::from_slice(&body).map_err(|err| ApiError::Deserialize(err.to_string()));
        }

        let message = serde_json::from_slice::<GithubError>(&body)
            .map(|err| err.message)
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).to_string());
        Err(status_error(&request, status, message))
    }
}

/// Route-specific meanings win; everything else is classified the same way for every route.
pub fn status_error<T: Request>(request: &T, status: StatusCode, message: String) -> ApiError<T::Error> {
    if let Some(err) = request.endpoint_error(status, &message) {
        return ApiError::Endpoint(err);
    }

    match status {
        StatusCode::UNAUTHORIZED => ApiError::InvalidAuth,
        StatusCode::FORBIDDEN if message.to_lowercase().contains("rate limit") => {
            ApiError::RateLimited
        }
        StatusCode::FORBIDDEN => ApiError::Forbidden,
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        status if status.is_server_error() => ApiError::InternalError(format!("{status}: {message}")),
        status => ApiError::BadRequest(format!("{status}: {message}")),
    }
}

#[async_trait]
impl FileStore for Network {
    #[instrument(level = "debug", skip(self), err(Debug))]
    async fn fetch(&self, path: &str) -> BulletinResult<RemoteFile> {
        let file = self
            .request(GetContentRequest { path: path.to_string(), reference: self.branch.clone() })
            .await?;

        // files over 1MB come back without their content inlined
        let content = if file.encoding == "none" || (file.content.is_empty() && file.size > 0) {
            let blob = self.request(GetBlobRequest { sha: file.sha.clone() }).await?;
            match blob.encoding.as_str() {
                "utf-8" => blob.content.into_bytes(),
                _ => decode_transport(path, &blob.content)?,
            }
        } else {
            decode_transport(path, &file.content)?
        };

        Ok(RemoteFile { path: file.path, content, version: VersionToken(file.sha) })
    }

    #[instrument(level = "debug", skip(self, request), fields(path = %request.path, message = %request.message), err(Debug))]
    async fn commit(&self, request: CommitRequest) -> BulletinResult<VersionToken> {
        let response = self
            .request(PutContentRequest {
                content: request.payload.transport_encoded(),
                path: request.path,
                message: request.message,
                sha: request.expected.map(|version| version.0),
                branch: self.branch.clone(),
            })
            .await?;

        debug!(commit = %response.commit.sha, "committed");
        Ok(VersionToken(response.content.sha))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::BulletinErr;

    fn config() -> StoreConfig {
        StoreConfig { token: Some("token".to_string()), ..Default::default() }
    }

    fn get() -> GetContentRequest {
        GetContentRequest { path: "src/data/popupData.js".to_string(), reference: "main".to_string() }
    }

    #[test]
    fn urls_are_rooted_at_the_repository() {
        let network = Network::new(&config()).unwrap();
        assert_eq!(
            network.url(&get().route()).as_str(),
            "https://api.github.com/repos/elva-tech/RBKVMUL-website/contents/src/data/popupData.js"
        );

        let file_name = "popup-1-a b.png".to_string();
        let url = network.url(&["contents".to_string(), file_name]);
        assert!(url.as_str().ends_with("/contents/popup-1-a%20b.png"));
    }

    #[test]
    fn api_url_with_path_prefix() {
        let network = Network::new(&StoreConfig {
            api_url: "https://ghe.example.com/api/v3/".to_string(),
            ..config()
        })
        .unwrap();
        assert_eq!(
            network.repository_url.as_str(),
            "https://ghe.example.com/api/v3/repos/elva-tech/RBKVMUL-website"
        );
    }

    #[test]
    fn token_is_required() {
        let err = Network::new(&StoreConfig::default()).err().unwrap();
        assert_eq!(err.kind, BulletinErrKind::CredentialsMissing);
    }

    #[test]
    fn shared_statuses() {
        let kind = |status, message: &str| {
            BulletinErr::from(status_error(&get(), status, message.to_string())).kind
        };

        assert_eq!(
            kind(StatusCode::NOT_FOUND, "Not Found"),
            BulletinErrKind::RemoteFileNotFound("src/data/popupData.js".to_string())
        );
        assert_eq!(kind(StatusCode::UNAUTHORIZED, "Bad credentials"), BulletinErrKind::InvalidAuthDetails);
        assert_eq!(
            kind(StatusCode::FORBIDDEN, "API rate limit exceeded for user"),
            BulletinErrKind::RateLimited
        );
        assert_eq!(
            kind(StatusCode::FORBIDDEN, "Resource not accessible by personal access token"),
            BulletinErrKind::InsufficientPermission
        );
        assert_eq!(kind(StatusCode::TOO_MANY_REQUESTS, ""), BulletinErrKind::RateLimited);
        assert!(matches!(kind(StatusCode::BAD_GATEWAY, "oops"), BulletinErrKind::ServerError(_)));
    }

    #[test]
    fn put_conflicts_become_version_conflicts() {
        let put = PutContentRequest {
            path: "src/data/notofications.js".to_string(),
            message: "Add notification".to_string(),
            content: String::new(),
            sha: Some("stale".to_string()),
            branch: "main".to_string(),
        };
        let err = BulletinErr::from(status_error(&put, StatusCode::CONFLICT, "does not match".to_string()));
        assert_eq!(err.kind, BulletinErrKind::VersionConflict("src/data/notofications.js".to_string()));
        assert!(!err.is_transport());
    }
}
