use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::errors::{BulletinErrKind, BulletinResult};

/// Opaque revision marker assigned by the store; it changes on every successful write.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(pub String);

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub path: String,
    /// already decoded from the store's transport encoding
    pub content: Vec<u8>,
    pub version: VersionToken,
}

impl RemoteFile {
    pub fn text(&self) -> BulletinResult<&str> {
        std::str::from_utf8(&self.content)
            .map_err(|_| BulletinErrKind::CorruptRemoteState(self.path.clone()).into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    pub fn is_binary(&self) -> bool {
        matches!(self, Payload::Binary(_))
    }

    pub fn bytes(&self) -> &[u8] {
        match self {
            Payload::Text(text) => text.as_bytes(),
            Payload::Binary(bytes) => bytes,
        }
    }

    /// Both kinds travel as base64; text is encoded from its UTF-8 bytes.
    pub fn transport_encoded(&self) -> String {
        base64::encode(self.bytes())
    }
}

/// A compare-and-swap write of a whole file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRequest {
    pub path: String,
    pub payload: Payload,
    /// `None` only when the file is known not to exist yet.
    pub expected: Option<VersionToken>,
    pub message: String,
}

/// Undoes the store's base64 transport encoding, which may wrap lines.
pub fn decode_transport(path: &str, encoded: &str) -> BulletinResult<Vec<u8>> {
    let compact: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    base64::decode(compact).map_err(|err| {
        warn!(path, ?err, "content is not valid base64");
        BulletinErrKind::CorruptRemoteState(path.to_string()).into()
    })
}
