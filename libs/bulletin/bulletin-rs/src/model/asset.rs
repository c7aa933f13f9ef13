use std::fs;
use std::path::Path;

use crate::model::errors::{BulletinErrKind, BulletinResult};

/// A file picked on the admin's machine, held in memory until it is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime: String,
}

impl UploadedAsset {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let mime = guess_mime(&name).to_string();
        Self { name, bytes, mime }
    }

    pub fn from_disk(path: &Path) -> BulletinResult<Self> {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .ok_or(BulletinErrKind::DiskPathInvalid)?;
        let bytes = fs::read(path)?;
        Ok(Self::new(name, bytes))
    }
}

/// What an upload is for, which decides its file name prefix and directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Document,
}

impl AssetKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            AssetKind::Image => "popup",
            AssetKind::Document => "notif",
        }
    }
}

// todo: be more exhaustive
pub fn guess_mime(name: &str) -> &'static str {
    let extension = name.rsplit_once('.').map(|(_, ext)| ext.to_lowercase()).unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

/// Collapses every run of whitespace into a single `-`.
pub fn sanitize(name: &str) -> String {
    let mut sanitized = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                sanitized.push('-');
            }
            in_whitespace = true;
        } else {
            sanitized.push(c);
            in_whitespace = false;
        }
    }
    sanitized
}

pub fn asset_file_name(prefix: &str, timestamp: i64, original: &str) -> String {
    format!("{prefix}-{timestamp}-{}", sanitize(original))
}

/// The first name at or after `timestamp` that is not already in `taken`, with the timestamp it
/// ended up using.
pub fn free_file_name(
    kind: AssetKind, timestamp: i64, original: &str, taken: &[String],
) -> (i64, String) {
    let mut stamp = timestamp;
    let mut name = asset_file_name(kind.prefix(), stamp, original);
    while taken.contains(&name) {
        stamp += 1;
        name = asset_file_name(kind.prefix(), stamp, original);
    }
    (stamp, name)
}
