use chrono::{NaiveDate, TimeZone, Utc};
use fiszki_core::{apply_outcome, next_interval, BandTable, Card, Folder, Outcome, SeededRng, RETIRE_DAYS};

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn card() -> Card {
    let folder = Folder::new("Test");
    Card::new(folder.id, "pies", "dog")
}

#[test]
fn new_card_is_immediately_due() {
    let c = card();
    assert_eq!(c.streak, 0);
    assert!(c.is_due(Utc::now().date_naive()));
    assert!(c.last_seen.is_none());
}

#[test]
fn failure_collapses_streak_and_keeps_due_date() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let bands = BandTable::default();
    let mut rng = SeededRng::new(11);

    for streak in [0u32, 1, 3, 7, 250] {
        let mut c = card();
        c.streak = streak;
        c.next_study = day(2024, 1, 1);

        let out = apply_outcome(c, Outcome::Failure, now, &bands, &mut rng);
        let c = out.updated_card;
        assert_eq!(c.streak, 0);
        assert_eq!(c.next_study, day(2024, 1, 1), "failure must not reschedule");
        assert_eq!(c.last_seen, Some(now));
        assert_eq!(out.review.interval_applied, None);
        assert_eq!(out.review.streak_after, 0);
    }
}

#[test]
fn success_increments_streak_and_schedules_within_band() {
    // Streak 2 reviewed on 2024-01-01 lands in the 18-22 day band.
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let bands = BandTable::default();
    let mut rng = SeededRng::new(11);

    let mut c = card();
    c.streak = 2;

    let out = apply_outcome(c, Outcome::Success, now, &bands, &mut rng);
    let c = out.updated_card;
    assert_eq!(c.streak, 3);
    assert!(c.next_study >= day(2024, 1, 19) && c.next_study <= day(2024, 1, 23));
    assert_eq!(c.last_seen, Some(now));
    let applied = out.review.interval_applied.unwrap();
    assert!((18..=22).contains(&applied));
}

#[test]
fn fresh_card_gets_the_fixed_three_day_interval() {
    let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let out = apply_outcome(card(), Outcome::Success, now, &BandTable::default(), &mut SeededRng::new(5));
    assert_eq!(out.updated_card.streak, 1);
    assert_eq!(out.updated_card.next_study, day(2024, 1, 4));
}

#[test]
fn bands_grow_monotonically_and_then_retire() {
    let bands = BandTable::default();
    for w in bands.bands.windows(2) {
        let (_, prev_max) = w[0];
        let (next_min, _) = w[1];
        assert!(prev_max < next_min, "bands must not overlap");
    }

    let mut rng = SeededRng::new(99);
    let mut last = 0;
    for streak in 0..4 {
        let d = bands.days_for_streak(streak, &mut rng);
        assert!(d > last);
        last = d;
    }
    for streak in [4u32, 5, 100, u32::MAX] {
        assert_eq!(bands.days_for_streak(streak, &mut rng), RETIRE_DAYS);
    }
}

#[test]
fn jittered_draws_stay_inside_their_band() {
    let mut rng = SeededRng::new(2024);
    for _ in 0..500 {
        assert!((6..=8).contains(&next_interval(1, &mut rng)));
        assert!((18..=22).contains(&next_interval(2, &mut rng)));
        assert!((40..=60).contains(&next_interval(3, &mut rng)));
    }
}
