use std::slice;

use crate::model::asset::{AssetKind, UploadedAsset};
use crate::model::errors::{BulletinErrKind, BulletinResult};
use crate::model::record::{
    insert_newest_first, remove_by_id, unique_id, Notification, NotificationDraft,
};
use crate::model::validate;
use crate::service::data_files::DataFileUpdate;
use crate::Bulletin;

/// The full list as committed, plus the notification that was added or removed.
pub type NotificationsUpdate = DataFileUpdate<Vec<Notification>, Notification>;

impl Bulletin {
    /// Newest first. An absent file reads as an empty list.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn notifications(&self) -> BulletinResult<Vec<Notification>> {
        let notifications = self
            .read_data_file(&self.config.site.notifications_path)
            .await?
            .map(|file| file.value)
            .unwrap_or_default();
        Ok(notifications)
    }

    /// Uploads `attachment`, if any, then prepends the new notification. Nothing is sent unless
    /// the draft and attachment are valid.
    #[instrument(level = "debug", skip(self, attachment), fields(attachment = ?attachment.as_ref().map(|a| &a.name)), err(Debug))]
    pub async fn add_notification(
        &self, draft: NotificationDraft, attachment: Option<UploadedAsset>,
    ) -> BulletinResult<NotificationsUpdate> {
        validate::notification_draft(&draft)?;
        if let Some(asset) = &attachment {
            validate::asset(asset)?;
        }

        let _busy = self.begin_change()?;
        let file_url = match &attachment {
            Some(asset) => {
                let names = self
                    .upload_assets(AssetKind::Document, slice::from_ref(asset), |name| {
                        format!("Upload file: {name}")
                    })
                    .await?;
                names
                    .first()
                    .map(|name| self.config.raw_url(&self.config.site.document_path(name)))
                    .unwrap_or_default()
            }
            None => String::new(),
        };

        let now = (self.get_time)().0;
        let site = &self.config.site;
        self.update_data_file(
            &site.notifications_path,
            &site.notifications_name,
            "Add notification",
            move |current: Option<Vec<Notification>>| {
                let mut notifications = current.unwrap_or_default();
                let notification = draft.into_notification(unique_id(&notifications, now), file_url);
                insert_newest_first(&mut notifications, notification.clone());
                Ok((notifications, notification))
            },
        )
        .await
    }

    /// Removes the notification with `id` from the list as it is right now in the repository.
    /// Its attachment, if any, is left in place.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn delete_notification(&self, id: i64) -> BulletinResult<NotificationsUpdate> {
        let _busy = self.begin_change()?;
        let site = &self.config.site;
        self.update_data_file(
            &site.notifications_path,
            &site.notifications_name,
            "Delete notification",
            |current: Option<Vec<Notification>>| {
                let mut notifications = current.unwrap_or_default();
                let removed =
                    remove_by_id(&mut notifications, id).ok_or(BulletinErrKind::RecordNotFound(id))?;
                Ok((notifications, removed))
            },
        )
        .await
    }
}
