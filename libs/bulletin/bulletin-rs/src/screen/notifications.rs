use crate::model::asset::UploadedAsset;
use crate::model::errors::BulletinResult;
use crate::model::record::{Notification, NotificationDraft};
use crate::screen::Outcome;
use crate::Bulletin;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationsScreen {
    /// As of the last successful refresh or commit, newest first.
    pub notifications: Vec<Notification>,
    pub form: NotificationDraft,
    pub attachment: Option<UploadedAsset>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotificationsEvent {
    Refresh,
    SetTitleEn(String),
    SetTitleKa(String),
    SetDate(String),
    Attach(UploadedAsset),
    Detach,
    Add,
    /// `confirmed` is the answer to "are you sure?"; nothing happens without it.
    Delete { id: i64, confirmed: bool },
}

impl NotificationsScreen {
    #[instrument(level = "debug", skip_all, err(Debug))]
    pub async fn update(
        &mut self, bulletin: &Bulletin, event: NotificationsEvent,
    ) -> BulletinResult<Outcome> {
        let outcome = match event {
            NotificationsEvent::Refresh => match bulletin.notifications().await {
                Ok(notifications) => {
                    self.notifications = notifications;
                    Outcome::Refreshed
                }
                Err(err) => {
                    warn!(?err, "could not refresh notifications");
                    Outcome::RefreshFailed(err.kind)
                }
            },
            NotificationsEvent::SetTitleEn(title) => {
                self.form.title_en = title;
                Outcome::Edited
            }
            NotificationsEvent::SetTitleKa(title) => {
                self.form.title_ka = title;
                Outcome::Edited
            }
            NotificationsEvent::SetDate(date) => {
                self.form.date = date;
                Outcome::Edited
            }
            NotificationsEvent::Attach(asset) => {
                self.attachment = Some(asset);
                Outcome::Edited
            }
            NotificationsEvent::Detach => {
                self.attachment = None;
                Outcome::Edited
            }
            NotificationsEvent::Add => {
                let update = bulletin
                    .add_notification(self.form.clone(), self.attachment.clone())
                    .await?;
                self.notifications = update.value;
                self.form = NotificationDraft::default();
                self.attachment = None;
                Outcome::Added(update.changed)
            }
            NotificationsEvent::Delete { confirmed: false, .. } => Outcome::Cancelled,
            NotificationsEvent::Delete { id, confirmed: true } => {
                let update = bulletin.delete_notification(id).await?;
                self.notifications = update.value;
                Outcome::Deleted(update.changed)
            }
        };

        Ok(outcome)
    }
}
