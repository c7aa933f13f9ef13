use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use bulletin_rs::io::mem::InMemStore;
use bulletin_rs::model::asset::UploadedAsset;
use bulletin_rs::model::data_file;
use bulletin_rs::model::record::{Localized, Notification};
use bulletin_rs::model::ValidationFailure;
use bulletin_rs::BulletinErrKind;
use test_utils::*;

const PATH: &str = "src/data/notofications.js";

fn seed(store: &InMemStore, notifications: &[Notification]) -> String {
    let text = data_file::encode("notifications", &notifications).unwrap();
    store.insert(PATH, text.clone());
    text
}

fn existing() -> Vec<Notification> {
    vec![
        notification_draft("second").into_notification(2, String::new()),
        notification_draft("first").into_notification(1, String::new()),
    ]
}

#[tokio::test]
async fn first_notification_creates_the_file() {
    let (bulletin, store) = test_bulletin();
    assert!(bulletin.notifications().await.unwrap().is_empty());

    let update = bulletin.add_notification(notification_draft("Tender"), None).await.unwrap();

    assert_eq!(update.changed.id, TEST_TIME);
    assert_eq!(update.changed.title, Localized::new("Tender", "Tender"));
    assert!(!update.changed.has_attachment());
    assert_eq!(update.value, vec![update.changed.clone()]);
    assert_eq!(update.version.0, "v1");

    let commits = store.commits();
    assert_eq!(commits.len(), 1);
    assert_eq!(commits[0].path, PATH);
    assert_eq!(commits[0].message, "Add notification");
    assert_eq!(bulletin.notifications().await.unwrap(), update.value);
}

#[tokio::test]
async fn new_notifications_go_first() {
    let (bulletin, store) = test_bulletin();
    seed(&store, &existing());

    let update = bulletin.add_notification(notification_draft("third"), None).await.unwrap();

    let ids: Vec<i64> = update.value.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![TEST_TIME, 2, 1]);
    assert_eq!(bulletin.notifications().await.unwrap(), update.value);
}

#[tokio::test]
async fn ids_stay_unique_within_a_millisecond() {
    let (bulletin, _store) = test_bulletin();

    let a = bulletin.add_notification(notification_draft("a"), None).await.unwrap();
    let b = bulletin.add_notification(notification_draft("b"), None).await.unwrap();

    assert_eq!(a.changed.id, TEST_TIME);
    assert_eq!(b.changed.id, TEST_TIME + 1);
}

#[tokio::test]
async fn delete_undoes_add() {
    let (bulletin, store) = test_bulletin();
    let before = seed(&store, &existing());

    let added = bulletin.add_notification(notification_draft("temporary"), None).await.unwrap();
    let deleted = bulletin.delete_notification(added.changed.id).await.unwrap();

    assert_eq!(deleted.changed, added.changed);
    assert_eq!(deleted.value, existing());
    assert_eq!(store.peek_text(PATH).unwrap(), before);

    let messages: Vec<String> = store.commits().into_iter().map(|c| c.message).collect();
    assert_eq!(messages, vec!["Add notification", "Delete notification"]);
}

#[tokio::test]
async fn attachment_is_committed_before_the_record() {
    let (bulletin, store) = test_bulletin();

    let update = bulletin
        .add_notification(notification_draft("Tender"), Some(document("Tender Notice.pdf")))
        .await
        .unwrap();

    let asset_path = "public/pdfs/notif-1700000000000-Tender-Notice.pdf";
    let commits = store.commits();
    assert_eq!(commits.len(), 2);
    assert_eq!(commits[0].path, asset_path);
    assert_eq!(commits[0].message, "Upload file: notif-1700000000000-Tender-Notice.pdf");
    assert!(commits[0].binary);
    assert_eq!(commits[1].path, PATH);

    let stored = bulletin.notifications().await.unwrap();
    assert_eq!(
        stored[0].file_url,
        format!("https://raw.githubusercontent.com/elva-tech/RBKVMUL-website/main/{asset_path}")
    );
    assert_eq!(stored[0], update.changed);
    assert_eq!(store.peek(asset_path).unwrap().content, document("x.pdf").bytes);
}

#[tokio::test]
async fn same_file_in_the_same_millisecond_gets_a_later_name() {
    let (bulletin, store) = test_bulletin();

    let first = bulletin
        .add_notification(notification_draft("one"), Some(document("n.pdf")))
        .await
        .unwrap();
    let second = bulletin
        .add_notification(notification_draft("two"), Some(document("n.pdf")))
        .await
        .unwrap();

    assert!(first.changed.file_url.ends_with("/public/pdfs/notif-1700000000000-n.pdf"));
    assert!(second.changed.file_url.ends_with("/public/pdfs/notif-1700000000001-n.pdf"));
    assert!(store.peek("public/pdfs/notif-1700000000001-n.pdf").is_some());
    assert_eq!(second.value.len(), 2);
}

#[tokio::test]
async fn failed_attachment_leaves_the_list_alone() {
    let inner = InMemStore::new();
    let before = seed(&inner, &existing());
    let bulletin = test_bulletin_with(Arc::new(FailingStore {
        inner: inner.clone(),
        prefix: "public/pdfs/".to_string(),
    }));

    let err = bulletin
        .add_notification(notification_draft("Tender"), Some(document("notice.pdf")))
        .await
        .unwrap_err();

    assert_eq!(err.kind, BulletinErrKind::ServerUnreachable);
    assert!(err.is_transport());
    assert_eq!(inner.peek_text(PATH).unwrap(), before);
    assert!(inner.commits().is_empty());
    assert!(!bulletin.is_busy());
}

#[tokio::test]
async fn invalid_drafts_never_reach_the_store() {
    let (bulletin, store) = test_bulletin();
    let before = seed(&store, &existing());

    let mut draft = notification_draft("");
    let err = bulletin.add_notification(draft.clone(), None).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::Validation(ValidationFailure::MissingTitleEn));

    draft.title_en = "Tender".to_string();
    draft.date = " ".to_string();
    let err = bulletin.add_notification(draft.clone(), None).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::Validation(ValidationFailure::MissingDate));

    draft.date = "2024-03-01".to_string();
    let err = bulletin
        .add_notification(draft, Some(UploadedAsset::new("empty.pdf", vec![])))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        BulletinErrKind::Validation(ValidationFailure::EmptyAsset("empty.pdf".to_string()))
    );

    assert_eq!(store.fetch_count(), 0);
    assert!(store.commits().is_empty());
    assert_eq!(store.peek_text(PATH).unwrap(), before);
}

#[tokio::test]
async fn unknown_id_is_not_found() {
    let (bulletin, store) = test_bulletin();
    seed(&store, &existing());

    let err = bulletin.delete_notification(42).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::RecordNotFound(42));
    assert!(store.commits().is_empty());

    let (bulletin, store) = test_bulletin();
    let err = bulletin.delete_notification(42).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::RecordNotFound(42));
    assert!(store.peek(PATH).is_none());
}

#[tokio::test]
async fn delete_against_a_concurrent_edit_conflicts() {
    let inner = InMemStore::new();
    seed(&inner, &existing());
    let foreign = data_file::encode("notifications", &existing()[..1]).unwrap();
    let bulletin = test_bulletin_with(Arc::new(RacingStore::new(inner.clone(), PATH, &foreign)));

    let err = bulletin.delete_notification(1).await.unwrap_err();

    assert_eq!(err.kind, BulletinErrKind::VersionConflict(PATH.to_string()));
    assert_eq!(inner.peek_text(PATH).unwrap(), foreign);
    assert!(inner.commits().is_empty());
}

#[tokio::test]
async fn delete_sees_edits_made_elsewhere() {
    let (bulletin, store) = test_bulletin();
    seed(&store, &existing());
    let shown = bulletin.notifications().await.unwrap();

    // someone else adds one after the list was shown
    let mut elsewhere = existing();
    elsewhere.insert(0, notification_draft("elsewhere").into_notification(3, String::new()));
    seed(&store, &elsewhere);

    let update = bulletin.delete_notification(shown[0].id).await.unwrap();
    let ids: Vec<i64> = update.value.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![3, 1]);
}

#[tokio::test]
async fn changes_are_rejected_while_busy() {
    let (bulletin, store) = test_bulletin();
    let other_handle = bulletin.clone();
    bulletin.busy.store(true, Ordering::SeqCst);

    let err = other_handle.add_notification(notification_draft("a"), None).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::AlreadyBusy);
    let err = other_handle.delete_notification(1).await.unwrap_err();
    assert_eq!(err.kind, BulletinErrKind::AlreadyBusy);
    assert_eq!(store.fetch_count(), 0);

    bulletin.busy.store(false, Ordering::SeqCst);
    other_handle.add_notification(notification_draft("a"), None).await.unwrap();
    assert!(!bulletin.is_busy());
}

#[tokio::test]
async fn cancelled_change_releases_busy() {
    let inner = InMemStore::new();
    seed(&inner, &existing());
    let stalled = test_bulletin_with(Arc::new(StalledStore { inner: inner.clone() }));

    let add = stalled.add_notification(notification_draft("never lands"), None);
    assert!(tokio::time::timeout(Duration::from_millis(50), add).await.is_err());
    assert!(!stalled.is_busy());

    // same flag, working store
    let mut bulletin = test_bulletin_with(Arc::new(inner.clone()));
    bulletin.busy = stalled.busy.clone();
    let update = bulletin.delete_notification(1).await.unwrap();
    assert_eq!(update.changed.id, 1);
    assert_eq!(inner.commits().len(), 1);
}

#[tokio::test]
async fn unknown_fields_survive_a_rewrite() {
    let (bulletin, store) = test_bulletin();
    store.insert(
        PATH,
        r#"export const notifications = [
  {
    "id": 1,
    "title": { "en": "first", "ka": "ಮೊದಲು" },
    "date": "2024-01-01",
    "fileUrl": "",
    "pinned": true
  }
];"#,
    );

    bulletin.add_notification(notification_draft("second"), None).await.unwrap();

    let text = store.peek_text(PATH).unwrap();
    assert!(text.contains("\"pinned\": true"));
    assert!(text.contains("ಮೊದಲು"));
}
