//! State for the two admin screens. Each screen owns what the person is looking at and editing,
//! and changes it only in response to an event; anything that touches the repository goes through
//! [crate::Bulletin], so a failed commit leaves the screen exactly as it was.

pub mod announcement;
pub mod notifications;

use crate::model::errors::BulletinErrKind;
use crate::model::record::{Announcement, Notification};

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A form field or a staged file changed.
    Edited,
    Refreshed,
    /// The refresh failed; what was shown before is still shown.
    RefreshFailed(BulletinErrKind),
    /// A delete that was not confirmed.
    Cancelled,
    Added(Notification),
    Deleted(Notification),
    Published(Announcement),
    Toggled(Announcement),
}
