use chrono::{Duration, Utc};
use fiszki_core::{CoreError, Repository};
use fiszki_json::JsonStore;

async fn open(dir: &std::path::Path) -> JsonStore {
    JsonStore::open_with(dir.join("fiszki.json"), dir.join("backups"), 3)
        .await
        .unwrap()
}

#[tokio::test]
async fn schedule_survives_a_reopen() {
    let dir = tempfile::tempdir().unwrap();

    let (card_id, due, seen) = {
        let store = open(dir.path()).await;
        let folder = store.create_folder("animals").await.unwrap();
        let card = store.add_card(folder.id, "pies", "dog", &[]).await.unwrap();

        let now = Utc::now();
        let due = now.date_naive() + Duration::days(3);
        store
            .update_schedule(card.id, 1, due, Some(now))
            .await
            .unwrap();
        (card.id, due, now)
    };

    let store = open(dir.path()).await;
    let card = store.get_card(card_id).await.unwrap();
    assert_eq!(card.streak, 1);
    assert_eq!(card.next_study, due);
    assert_eq!(card.last_seen, Some(seen));
}

#[tokio::test]
async fn batch_reschedule_persists() {
    let dir = tempfile::tempdir().unwrap();
    let start = Utc::now().date_naive();

    let ids = {
        let store = open(dir.path()).await;
        let folder = store.create_folder("animals").await.unwrap();
        let a = store.add_card(folder.id, "a", "1", &[]).await.unwrap();
        let b = store.add_card(folder.id, "b", "2", &[]).await.unwrap();
        store
            .reschedule_batch(&[(a.id, start + Duration::days(1)), (b.id, start + Duration::days(2))])
            .await
            .unwrap();
        (a.id, b.id)
    };

    let store = open(dir.path()).await;
    assert_eq!(store.get_card(ids.0).await.unwrap().next_study, start + Duration::days(1));
    assert_eq!(store.get_card(ids.1).await.unwrap().next_study, start + Duration::days(2));
}

#[tokio::test]
async fn first_open_backs_up_into_the_configured_dir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let backups = dir.path().join("snapshots");

    let _store = JsonStore::open_with(path.clone(), backups.clone(), 3).await.unwrap();

    assert!(path.exists());
    assert!(std::fs::read_dir(&backups).unwrap().next().is_some());
    assert!(!dir.path().join("store.backups").exists());
}

#[tokio::test]
async fn corrupt_store_file_reports_the_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fiszki.json");
    std::fs::write(&path, "{\"version\":").unwrap();

    let err = JsonStore::open_with(path, dir.path().join("backups"), 3)
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Corrupt(_)));
    assert!(err.to_string().starts_with("store file is corrupt"));
}

#[tokio::test]
async fn backups_are_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let store = open(dir.path()).await;
    let folder = store.create_folder("animals").await.unwrap();
    for i in 0..6 {
        store
            .add_card(folder.id, &format!("f{i}"), &format!("b{i}"), &[])
            .await
            .unwrap();
    }

    let backups = std::fs::read_dir(dir.path().join("backups"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("json"))
        .count();
    assert!(backups <= 3);
}
