use std::backtrace::Backtrace;
use std::fmt::{self, Display, Formatter};
use std::io;
use std::panic::Location;
use std::sync::PoisonError;

use crate::io::network::ApiError;
use crate::model::api;
use crate::model::ValidationFailure;

pub type BulletinResult<T> = Result<T, BulletinErr>;

#[derive(Debug)]
pub struct BulletinErr {
    pub kind: BulletinErrKind,
    pub backtrace: Option<Backtrace>,
}

impl Display for BulletinErr {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for BulletinErr {}

/// Every message here may end up in front of the person running the admin tools, so they are
/// phrased for them. Kinds nobody expects to surface keep an uglier debug rendering.
impl Display for BulletinErrKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            BulletinErrKind::RemoteFileNotFound(path) => {
                write!(f, "'{path}' does not exist in the repository")
            }
            BulletinErrKind::VersionConflict(path) => write!(
                f,
                "'{path}' changed since it was last read, reload and try again"
            ),
            BulletinErrKind::CorruptRemoteState(path) => {
                write!(f, "'{path}' could not be understood, it was left untouched")
            }
            BulletinErrKind::RecordNotFound(id) => write!(f, "There is no entry with id {id}"),
            BulletinErrKind::AlreadyBusy => {
                write!(f, "Another change is still being saved, please wait for it to finish")
            }
            BulletinErrKind::CredentialsMissing => {
                write!(f, "No GitHub token configured, set BULLETIN_GITHUB_TOKEN")
            }
            BulletinErrKind::RepositoryInvalid(repository) => {
                write!(f, "'{repository}' is not a repository, expected owner/name")
            }
            BulletinErrKind::RepositoryNotFound => {
                write!(f, "The repository or branch could not be found")
            }
            BulletinErrKind::ServerUnreachable => write!(f, "Could not reach GitHub"),
            BulletinErrKind::InvalidAuthDetails => {
                write!(f, "GitHub rejected the token, it may be expired or revoked")
            }
            BulletinErrKind::InsufficientPermission => {
                write!(f, "The token does not have permission to do that")
            }
            BulletinErrKind::RateLimited => {
                write!(f, "GitHub is rate limiting requests, please try again later")
            }
            BulletinErrKind::ServerError(msg) => write!(f, "GitHub returned an error: {msg}"),
            BulletinErrKind::DiskPathInvalid => write!(f, "That disk path is invalid"),
            BulletinErrKind::Validation(failure) => match failure {
                ValidationFailure::MissingTitleEn => write!(f, "The English title is required"),
                ValidationFailure::MissingDate => write!(f, "The date is required"),
                ValidationFailure::MissingSubtitleEn => {
                    write!(f, "The English subtitle is required")
                }
                ValidationFailure::NoImagesSelected => {
                    write!(f, "Select at least one image")
                }
                ValidationFailure::EmptyAsset(name) => write!(f, "'{name}' is empty"),
            },
            BulletinErrKind::Unexpected(msg) => write!(f, "Unexpected error: {msg}"),
        }
    }
}

impl From<BulletinErrKind> for BulletinErr {
    fn from(kind: BulletinErrKind) -> Self {
        Self { kind, backtrace: Some(Backtrace::force_capture()) }
    }
}

impl From<ValidationFailure> for BulletinErr {
    fn from(failure: ValidationFailure) -> Self {
        BulletinErrKind::Validation(failure).into()
    }
}

impl BulletinErr {
    /// Network and authorization failures; the operation was aborted and nothing was written.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            BulletinErrKind::ServerUnreachable
                | BulletinErrKind::InvalidAuthDetails
                | BulletinErrKind::InsufficientPermission
                | BulletinErrKind::RateLimited
                | BulletinErrKind::RepositoryNotFound
                | BulletinErrKind::ServerError(_)
        )
    }
}

pub trait Unexpected<T> {
    fn map_unexpected(self) -> BulletinResult<T>;
}

impl<T, E: fmt::Debug> Unexpected<T> for Result<T, E> {
    #[track_caller]
    fn map_unexpected(self) -> BulletinResult<T> {
        let location = Location::caller();
        self.map_err(|err| {
            BulletinErrKind::Unexpected(format!(
                "unexpected error at {}:{} {err:?}",
                location.file(),
                location.line(),
            ))
            .into()
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BulletinErrKind {
    /// The store has no file at this path.
    RemoteFileNotFound(String),
    /// The version token presented with a commit is not the file's current one.
    VersionConflict(String),
    /// A data file whose collection could not be located or parsed.
    CorruptRemoteState(String),
    RecordNotFound(i64),
    AlreadyBusy,
    CredentialsMissing,
    RepositoryInvalid(String),
    RepositoryNotFound,
    ServerUnreachable,
    InvalidAuthDetails,
    InsufficientPermission,
    RateLimited,
    ServerError(String),
    DiskPathInvalid,

    Validation(ValidationFailure),

    /// If no programmer in any part of the stack (including tests) expects
    /// to see a particular error, we debug format the underlying error to
    /// keep the number of error types in check. Commonly used for errors
    /// originating in other crates.
    Unexpected(String),
}

pub fn core_err_unexpected<T: fmt::Debug>(err: T) -> BulletinErrKind {
    BulletinErrKind::Unexpected(format!("{:?}", err))
}

impl<G> From<PoisonError<G>> for BulletinErr {
    fn from(err: PoisonError<G>) -> Self {
        core_err_unexpected(err).into()
    }
}

impl From<io::Error> for BulletinErr {
    fn from(e: io::Error) -> Self {
        match e.kind() {
            io::ErrorKind::NotFound
            | io::ErrorKind::PermissionDenied
            | io::ErrorKind::InvalidInput => BulletinErrKind::DiskPathInvalid,
            _ => core_err_unexpected(e),
        }
        .into()
    }
}

impl From<serde_json::Error> for BulletinErr {
    fn from(err: serde_json::Error) -> Self {
        BulletinErrKind::Unexpected(format!("{err}")).into()
    }
}

/// Failures every GitHub route shares.
fn transport_kind<E: fmt::Debug>(err: ApiError<E>) -> BulletinErrKind {
    match err {
        ApiError::SendFailed(_) | ApiError::ReceiveFailed(_) => BulletinErrKind::ServerUnreachable,
        ApiError::InvalidAuth => BulletinErrKind::InvalidAuthDetails,
        ApiError::Forbidden => BulletinErrKind::InsufficientPermission,
        ApiError::RateLimited => BulletinErrKind::RateLimited,
        ApiError::InternalError(msg) | ApiError::BadRequest(msg) => {
            BulletinErrKind::ServerError(msg)
        }
        e => core_err_unexpected(e),
    }
}

impl From<ApiError<api::GetContentError>> for BulletinErr {
    fn from(err: ApiError<api::GetContentError>) -> Self {
        match err {
            ApiError::Endpoint(api::GetContentError::NotFound(path)) => {
                BulletinErrKind::RemoteFileNotFound(path)
            }
            e => transport_kind(e),
        }
        .into()
    }
}

impl From<ApiError<api::GetBlobError>> for BulletinErr {
    fn from(err: ApiError<api::GetBlobError>) -> Self {
        transport_kind(err).into()
    }
}

impl From<ApiError<api::PutContentError>> for BulletinErr {
    fn from(err: ApiError<api::PutContentError>) -> Self {
        match err {
            ApiError::Endpoint(api::PutContentError::Conflict(path)) => {
                BulletinErrKind::VersionConflict(path)
            }
            ApiError::Endpoint(api::PutContentError::NotFound) => {
                BulletinErrKind::RepositoryNotFound
            }
            ApiError::Endpoint(api::PutContentError::Rejected(msg)) => {
                BulletinErrKind::ServerError(msg)
            }
            e => transport_kind(e),
        }
        .into()
    }
}
