use crate::model::asset::UploadedAsset;
use crate::model::errors::BulletinResult;
use crate::model::record::{Announcement, AnnouncementDraft};
use crate::screen::Outcome;
use crate::Bulletin;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnouncementScreen {
    /// What the website is showing, as of the last successful refresh or commit.
    pub live: Option<Announcement>,
    pub draft: AnnouncementDraft,
    /// Staged for the next publish, in the order they were added.
    pub images: Vec<UploadedAsset>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnnouncementEvent {
    Refresh,
    SetSubtitleEn(String),
    SetSubtitleKa(String),
    SetDescriptionEn(String),
    SetDescriptionKa(String),
    /// Whether the next publish is shown on the website.
    SetActive(bool),
    AddImage(UploadedAsset),
    ClearImages,
    Publish,
    /// Shows or hides the live announcement without publishing the draft.
    SetLiveActive(bool),
}

impl AnnouncementScreen {
    #[instrument(level = "debug", skip_all, err(Debug))]
    pub async fn update(
        &mut self, bulletin: &Bulletin, event: AnnouncementEvent,
    ) -> BulletinResult<Outcome> {
        let outcome = match event {
            AnnouncementEvent::Refresh => match bulletin.announcement().await {
                Ok(live) => {
                    self.live = live;
                    Outcome::Refreshed
                }
                Err(err) => {
                    warn!(?err, "could not refresh the announcement");
                    Outcome::RefreshFailed(err.kind)
                }
            },
            AnnouncementEvent::SetSubtitleEn(text) => {
                self.draft.subtitle.en = text;
                Outcome::Edited
            }
            AnnouncementEvent::SetSubtitleKa(text) => {
                self.draft.subtitle.ka = text;
                Outcome::Edited
            }
            AnnouncementEvent::SetDescriptionEn(text) => {
                self.draft.description.en = text;
                Outcome::Edited
            }
            AnnouncementEvent::SetDescriptionKa(text) => {
                self.draft.description.ka = text;
                Outcome::Edited
            }
            AnnouncementEvent::SetActive(active) => {
                self.draft.active = active;
                Outcome::Edited
            }
            AnnouncementEvent::AddImage(image) => {
                self.images.push(image);
                Outcome::Edited
            }
            AnnouncementEvent::ClearImages => {
                self.images.clear();
                Outcome::Edited
            }
            AnnouncementEvent::Publish => {
                let published = bulletin
                    .publish_announcement(self.draft.clone(), self.images.clone())
                    .await?;
                self.live = Some(published.clone());
                self.draft = AnnouncementDraft::default();
                self.images.clear();
                Outcome::Published(published)
            }
            AnnouncementEvent::SetLiveActive(active) => {
                let toggled = bulletin.set_announcement_active(active).await?;
                self.live = Some(toggled.clone());
                Outcome::Toggled(toggled)
            }
        };

        Ok(outcome)
    }
}
