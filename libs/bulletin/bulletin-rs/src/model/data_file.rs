//! The website reads its data as JavaScript modules holding one declaration,
//! `export const <name> = <json>;`. This is the only place that knows that format.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::errors::{BulletinErrKind, BulletinResult};

pub fn encode<T: Serialize + ?Sized>(name: &str, value: &T) -> BulletinResult<String> {
    let json = serde_json::to_string_pretty(value)?;
    Ok(format!("export const {name} = {json};"))
}

pub fn decode<T: DeserializeOwned>(path: &str, text: &str) -> BulletinResult<T> {
    let Some(span) = bracket_span(text) else {
        warn!(path, "no collection found in data file");
        return Err(BulletinErrKind::CorruptRemoteState(path.to_string()).into());
    };

    serde_json::from_str(span).map_err(|err| {
        warn!(path, %err, "data file collection is not valid");
        BulletinErrKind::CorruptRemoteState(path.to_string()).into()
    })
}

/// From the first `[` or `{` to the last closing bracket of the same kind.
pub fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find(['[', '{'])?;
    let close = if text[start..].starts_with('[') { ']' } else { '}' };
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// The `<name>` of an existing `export const <name> = ...` declaration.
pub fn identifier(text: &str) -> Option<&str> {
    let rest = text.trim_start().strip_prefix("export const ")?;
    let name = rest[..rest.find('=')?].trim();
    let valid = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$');
    valid.then_some(name)
}
