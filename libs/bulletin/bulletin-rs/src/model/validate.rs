use crate::model::asset::UploadedAsset;
use crate::model::errors::BulletinResult;
use crate::model::record::{AnnouncementDraft, NotificationDraft};
use crate::model::ValidationFailure;

pub fn notification_draft(draft: &NotificationDraft) -> BulletinResult<()> {
    if draft.title_en.trim().is_empty() {
        Err(ValidationFailure::MissingTitleEn)?;
    }
    if draft.date.trim().is_empty() {
        Err(ValidationFailure::MissingDate)?;
    }
    Ok(())
}

pub fn announcement_draft(draft: &AnnouncementDraft, images: &[UploadedAsset]) -> BulletinResult<()> {
    if draft.subtitle.en.trim().is_empty() {
        Err(ValidationFailure::MissingSubtitleEn)?;
    }
    if images.is_empty() {
        Err(ValidationFailure::NoImagesSelected)?;
    }
    images.iter().try_for_each(asset)
}

pub fn asset(asset: &UploadedAsset) -> BulletinResult<()> {
    if asset.bytes.is_empty() {
        Err(ValidationFailure::EmptyAsset(asset.name.clone()))?;
    }
    Ok(())
}

#[cfg(test)]
mod unit_tests {
    use super::*;
    use crate::model::record::Localized;
    use crate::BulletinErrKind;

    fn kind(result: BulletinResult<()>) -> Option<BulletinErrKind> {
        result.err().map(|err| err.kind)
    }

    #[test]
    fn notification_requires_title_and_date() {
        let mut draft = NotificationDraft::default();
        assert_eq!(
            kind(notification_draft(&draft)),
            Some(BulletinErrKind::Validation(ValidationFailure::MissingTitleEn))
        );

        draft.title_en = "Tender".to_string();
        draft.date = "   ".to_string();
        assert_eq!(
            kind(notification_draft(&draft)),
            Some(BulletinErrKind::Validation(ValidationFailure::MissingDate))
        );

        draft.date = "2024-01-01".to_string();
        assert_eq!(kind(notification_draft(&draft)), None);
    }

    #[test]
    fn announcement_requires_subtitle_and_images() {
        let mut draft = AnnouncementDraft::default();
        let images = vec![UploadedAsset::new("a.png", vec![1])];
        assert_eq!(
            kind(announcement_draft(&draft, &images)),
            Some(BulletinErrKind::Validation(ValidationFailure::MissingSubtitleEn))
        );

        draft.subtitle = Localized::new("Milk day", "");
        assert_eq!(
            kind(announcement_draft(&draft, &[])),
            Some(BulletinErrKind::Validation(ValidationFailure::NoImagesSelected))
        );
        assert_eq!(
            kind(announcement_draft(&draft, &[UploadedAsset::new("empty.png", vec![])])),
            Some(BulletinErrKind::Validation(ValidationFailure::EmptyAsset(
                "empty.png".to_string()
            )))
        );
        assert_eq!(kind(announcement_draft(&draft, &images)), None);
    }
}
