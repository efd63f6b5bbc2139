use crate::{Card, Outcome, Review, SeededRng};
use chrono::{DateTime, Duration, Utc};

/// Interval applied once a card leaves the banded range; effectively
/// retires the card.
pub const RETIRE_DAYS: u32 = 99_999;

/// Streak-indexed day ranges used for jittered scheduling.
///
/// The jitter spreads cards learned together across neighbouring days
/// instead of re-scheduling the whole cohort onto one date. Bands are
/// indexed by the streak at review time; a streak at or past the table
/// length retires the card.
#[derive(Debug, Clone)]
pub struct BandTable {
    pub bands: [(u32, u32); 4],
    pub retire_days: u32,
}

impl Default for BandTable {
    fn default() -> Self {
        Self {
            bands: [(3, 3), (6, 8), (18, 22), (40, 60)],
            retire_days: RETIRE_DAYS,
        }
    }
}

impl BandTable {
    /// Days until the next study for a card at `streak`. Total over all
    /// non-negative streaks: anything past the last band retires.
    pub fn days_for_streak(&self, streak: u32, rng: &mut SeededRng) -> u32 {
        match self.bands.get(streak as usize) {
            Some(&(min, max)) if min == max => min,
            Some(&(min, max)) => rng.pick(min, max),
            None => self.retire_days,
        }
    }
}

/// Interval for `streak` under the default calibration. `streak` is the
/// card's counter at review time, before the success increment.
pub fn next_interval(streak: u32, rng: &mut SeededRng) -> u32 {
    BandTable::default().days_for_streak(streak, rng)
}

pub struct ScheduleOutcome {
    pub updated_card: Card,
    pub review: Review,
}

/// Applies a review outcome to a card's scheduling fields.
///
/// Failure resets the streak and marks the card seen but leaves
/// `next_study` untouched, so the card stays due for the current cycle.
/// Success increments the streak and pushes `next_study` out by a draw
/// from the pre-increment streak's band.
///
/// Pure: the clock and RNG come in as parameters, and nothing here
/// performs I/O. Persisting `updated_card` and `review` is the caller's
/// job; the update only counts once that write succeeds.
pub fn apply_outcome(
    mut card: Card,
    outcome: Outcome,
    now: DateTime<Utc>,
    bands: &BandTable,
    rng: &mut SeededRng,
) -> ScheduleOutcome {
    let interval_applied = match outcome {
        Outcome::Failure => {
            card.streak = 0;
            None
        }
        Outcome::Success => {
            let days = bands.days_for_streak(card.streak, rng);
            card.streak += 1;
            card.next_study = now.date_naive() + Duration::days(days as i64);
            Some(days)
        }
    };
    card.last_seen = Some(now);

    let review = Review::new(card.id, outcome, now, card.streak, interval_applied);

    ScheduleOutcome {
        updated_card: card,
        review,
    }
}
