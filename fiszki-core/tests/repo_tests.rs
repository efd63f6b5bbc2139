use chrono::{Duration, Utc};
use fiszki_core::{CoreError, MemoryRepo, Outcome, Repository, Review};

#[tokio::test]
async fn folder_and_card_crud() {
    let repo = MemoryRepo::new();
    let folder = repo.create_folder("animals").await.unwrap();
    assert!(matches!(
        repo.create_folder("ANIMALS").await,
        Err(CoreError::Conflict(_))
    ));

    let card = repo
        .add_card(folder.id, "pies", "dog", &["basic".into()])
        .await
        .unwrap();
    assert_eq!(repo.list_cards(Some(folder.id)).await.unwrap().len(), 1);

    repo.delete_folder(folder.id).await.unwrap();
    assert!(matches!(
        repo.get_card(card.id).await,
        Err(CoreError::NotFound(_))
    ));
}

#[tokio::test]
async fn schedule_updates_are_per_card() {
    let repo = MemoryRepo::new();
    let folder = repo.create_folder("animals").await.unwrap();
    let card = repo.add_card(folder.id, "kot", "cat", &[]).await.unwrap();

    let now = Utc::now();
    let due = now.date_naive() + Duration::days(7);
    let updated = repo
        .update_schedule(card.id, 2, due, Some(now))
        .await
        .unwrap();
    assert_eq!(updated.streak, 2);
    assert_eq!(updated.next_study, due);
    assert_eq!(repo.get_card(card.id).await.unwrap().last_seen, Some(now));

    let review = Review::new(card.id, Outcome::Success, now, 2, Some(7));
    repo.insert_review(&review).await.unwrap();
    assert_eq!(repo.list_reviews_for_card(card.id).await.unwrap().len(), 1);
    assert_eq!(repo.list_reviews().await.unwrap().len(), 1);
}

#[tokio::test]
async fn batch_reschedule_moves_due_dates() {
    let repo = MemoryRepo::new();
    let folder = repo.create_folder("animals").await.unwrap();
    let a = repo.add_card(folder.id, "a", "1", &[]).await.unwrap();
    let b = repo.add_card(folder.id, "b", "2", &[]).await.unwrap();

    let start = Utc::now().date_naive();
    let updates = vec![
        (a.id, start + Duration::days(1)),
        (b.id, start + Duration::days(2)),
    ];
    repo.reschedule_batch(&updates).await.unwrap();

    assert_eq!(repo.get_card(a.id).await.unwrap().next_study, start + Duration::days(1));
    assert_eq!(repo.get_card(b.id).await.unwrap().next_study, start + Duration::days(2));

    let missing = vec![(uuid::Uuid::new_v4(), start)];
    assert!(matches!(
        repo.reschedule_batch(&missing).await,
        Err(CoreError::NotFound(_))
    ));
}
