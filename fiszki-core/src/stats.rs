use crate::{Outcome, Review};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default)]
pub struct Totals {
    pub total: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl Totals {
    pub fn record(&mut self, o: &Outcome) {
        self.total += 1;
        match o {
            Outcome::Success => self.correct += 1,
            Outcome::Failure => self.wrong += 1,
        }
    }
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.correct as f32 / self.total as f32
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatsSummary {
    pub totals: Totals,
    pub per_day: BTreeMap<NaiveDate, Totals>,
}

pub fn summarize(reviews: &[Review]) -> StatsSummary {
    let mut summary = StatsSummary::default();
    for r in reviews {
        summary.totals.record(&r.outcome);
        let d = r.reviewed_at.date_naive();
        summary.per_day.entry(d).or_default().record(&r.outcome);
    }
    summary
}

/// Consecutive days ending at `today` with at least one review.
pub fn daily_streak(reviews: &[Review], today: NaiveDate) -> u32 {
    let per_day = summarize(reviews).per_day;
    let mut streak = 0u32;
    let mut day = today;
    loop {
        if per_day.get(&day).map(|t| t.total > 0).unwrap_or(false) {
            streak += 1;
            day -= Duration::days(1);
        } else {
            break;
        }
    }
    streak
}
