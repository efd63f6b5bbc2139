use chrono::{Duration, Utc};
use fiszki_core::{daily_streak, summarize, Card, Folder, Outcome, Review};

#[test]
fn summary_counts_outcomes_and_days() {
    let folder = Folder::new("Test");
    let card = Card::new(folder.id, "pies", "dog");
    let now = Utc::now();

    let r0 = Review::new(card.id, Outcome::Success, now - Duration::days(2), 1, Some(3));
    let r1 = Review::new(card.id, Outcome::Success, now - Duration::days(1), 2, Some(7));
    let r2 = Review::new(card.id, Outcome::Failure, now, 0, None);

    let s = summarize(&[r0.clone(), r1.clone(), r2.clone()]);
    assert_eq!(s.totals.total, 3);
    assert_eq!(s.totals.correct, 2);
    assert_eq!(s.totals.wrong, 1);
    assert!(s.totals.accuracy() > 0.6 && s.totals.accuracy() < 0.7);
    assert_eq!(s.per_day.len(), 3);

    let streak = daily_streak(&[r0, r1, r2], now.date_naive());
    assert_eq!(streak, 3);
}

#[test]
fn streak_breaks_on_a_missed_day() {
    let folder = Folder::new("Test");
    let card = Card::new(folder.id, "pies", "dog");
    let now = Utc::now();

    let r0 = Review::new(card.id, Outcome::Success, now - Duration::days(3), 1, Some(3));
    let r1 = Review::new(card.id, Outcome::Success, now, 2, Some(7));

    assert_eq!(daily_streak(&[r0, r1], now.date_naive()), 1);
    assert_eq!(daily_streak(&[], now.date_naive()), 0);
}
