use std::fmt;
use std::io;

use bulletin_rs::{BulletinErr, BulletinErrKind};

pub type CliResult<T> = Result<T, CliError>;

pub struct CliError(pub String);

impl CliError {
    pub fn new(msg: impl ToString) -> Self {
        Self(msg.to_string())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error: {}", self.0)
    }
}

impl From<BulletinErr> for CliError {
    fn from(err: BulletinErr) -> Self {
        Self(err.kind.to_string())
    }
}

impl From<BulletinErrKind> for CliError {
    fn from(kind: BulletinErrKind) -> Self {
        Self(kind.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        Self(format!("io: {err}"))
    }
}
