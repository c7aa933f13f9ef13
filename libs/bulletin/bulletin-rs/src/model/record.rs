use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// English and Kannada renditions of one piece of text.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Localized {
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub ka: String,
}

impl Localized {
    pub fn new(en: impl Into<String>, ka: impl Into<String>) -> Self {
        Self { en: en.into(), ka: ka.into() }
    }
}

/// An entry embedded in a data file's collection, identified by its creation timestamp.
pub trait Record {
    fn id(&self) -> i64;
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    pub title: Localized,
    #[serde(default)]
    pub date: String,
    /// Absolute URL of the attached document, empty when there is none.
    #[serde(default)]
    pub file_url: String,

    /// Fields written by other tools, carried through rewrites untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Notification {
    pub fn has_attachment(&self) -> bool {
        !self.file_url.is_empty()
    }
}

impl Record for Notification {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Announcement {
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub title: Localized,
    #[serde(default)]
    pub subtitle: Localized,
    #[serde(default)]
    pub description: Localized,
    /// Site-relative paths such as `/assets/popup-1700000000000-banner.png`.
    #[serde(default)]
    pub images: Vec<String>,
    /// Publication timestamp; files written before ids existed read as 0.
    #[serde(default)]
    pub id: i64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NotificationDraft {
    pub title_en: String,
    pub title_ka: String,
    pub date: String,
}

impl NotificationDraft {
    pub fn into_notification(self, id: i64, file_url: String) -> Notification {
        let title_en = self.title_en.trim().to_string();
        let title_ka = match self.title_ka.trim() {
            "" => title_en.clone(),
            ka => ka.to_string(),
        };
        Notification {
            id,
            title: Localized::new(title_en, title_ka),
            date: self.date.trim().to_string(),
            file_url,
            extra: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncementDraft {
    pub active: bool,
    pub title: Localized,
    pub subtitle: Localized,
    pub description: Localized,
}

impl Default for AnnouncementDraft {
    fn default() -> Self {
        Self {
            active: true,
            title: Localized::new("Announcement", "ಪ್ರಕಟಣೆ"),
            subtitle: Localized::default(),
            description: Localized::default(),
        }
    }
}

impl AnnouncementDraft {
    pub fn into_announcement(self, id: i64, images: Vec<String>) -> Announcement {
        Announcement {
            active: self.active,
            title: self.title,
            subtitle: self.subtitle,
            description: self.description,
            images,
            id,
            extra: Map::new(),
        }
    }
}

/// Notifications are shown newest first.
pub fn insert_newest_first<R: Record>(records: &mut Vec<R>, record: R) {
    records.insert(0, record);
}

pub fn remove_by_id<R: Record>(records: &mut Vec<R>, id: i64) -> Option<R> {
    let position = records.iter().position(|record| record.id() == id)?;
    Some(records.remove(position))
}

/// `candidate` unless a record already uses it, in which case the next free id after it.
pub fn unique_id<R: Record>(records: &[R], candidate: i64) -> i64 {
    let mut id = candidate;
    while records.iter().any(|record| record.id() == id) {
        id += 1;
    }
    id
}
