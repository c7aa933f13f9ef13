use crate::model::asset::{AssetKind, UploadedAsset};
use crate::model::errors::{BulletinErrKind, BulletinResult};
use crate::model::record::{Announcement, AnnouncementDraft};
use crate::model::validate;
use crate::Bulletin;

impl Bulletin {
    /// The popup currently stored for the website, if one was ever published.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn announcement(&self) -> BulletinResult<Option<Announcement>> {
        let announcement = self
            .read_data_file(&self.config.site.announcement_path)
            .await?
            .map(|file| file.value);
        Ok(announcement)
    }

    /// Uploads `images` and replaces the stored announcement with one built from `draft` that
    /// shows exactly those images.
    #[instrument(level = "debug", skip(self, images), fields(images = images.len()), err(Debug))]
    pub async fn publish_announcement(
        &self, draft: AnnouncementDraft, images: Vec<UploadedAsset>,
    ) -> BulletinResult<Announcement> {
        validate::announcement_draft(&draft, &images)?;

        let _busy = self.begin_change()?;
        let names = self
            .upload_assets(AssetKind::Image, &images, |_| "Update announcement image".to_string())
            .await?;

        let site = &self.config.site;
        let references: Vec<String> = names.iter().map(|name| site.image_reference(name)).collect();
        let id = (self.get_time)().0;

        let update = self
            .update_data_file(
                &site.announcement_path,
                &site.announcement_name,
                "Update announcement content",
                move |current: Option<Announcement>| {
                    let mut announcement = draft.into_announcement(id, references);
                    if let Some(current) = current {
                        announcement.extra = current.extra;
                    }
                    Ok((announcement, ()))
                },
            )
            .await?;
        Ok(update.value)
    }

    /// Shows or hides the stored announcement without touching its content. Does not write when
    /// it is already in the requested state.
    #[instrument(level = "debug", skip(self), err(Debug))]
    pub async fn set_announcement_active(&self, active: bool) -> BulletinResult<Announcement> {
        let _busy = self.begin_change()?;
        let site = &self.config.site;
        let current = self
            .announcement()
            .await?
            .ok_or_else(|| BulletinErrKind::RemoteFileNotFound(site.announcement_path.clone()))?;
        if current.active == active {
            return Ok(current);
        }

        let message = if active { "Activate announcement" } else { "Deactivate announcement" };
        let update = self
            .update_data_file(
                &site.announcement_path,
                &site.announcement_name,
                message,
                |current: Option<Announcement>| {
                    let mut announcement = current.ok_or_else(|| {
                        BulletinErrKind::RemoteFileNotFound(site.announcement_path.clone())
                    })?;
                    announcement.active = active;
                    Ok((announcement, ()))
                },
            )
            .await?;
        Ok(update.value)
    }

    /// Where an image reference from the data file can be viewed. Site-relative references are
    /// resolved against the deployed website.
    pub fn image_preview_url(&self, reference: &str) -> String {
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return reference.to_string();
        }
        format!(
            "{}/{}",
            self.config.site.site_url.trim_end_matches('/'),
            reference.trim_start_matches('/')
        )
    }
}
