use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::CoreError;

pub type FolderId = Uuid;
pub type CardId = Uuid;
pub type ReviewId = Uuid;

/// Result of one review attempt, consumed exactly once by the scheduler.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Success,
    Failure,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success)
    }
}

impl FromStr for Outcome {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "success" | "good" | "correct" => Ok(Outcome::Success),
            "failure" | "wrong" | "incorrect" => Ok(Outcome::Failure),
            _ => Err(CoreError::Invalid("outcome must be success or failure")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Folder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub folder_id: FolderId,
    pub front: String,
    pub back: String,
    pub tags: Vec<String>,

    /// Consecutive correct reviews since the last reset.
    pub streak: u32,
    /// Day the card becomes due again (ISO calendar day).
    pub next_study: NaiveDate,
    /// `None` means the card has never been seen.
    pub last_seen: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

impl Card {
    /// New cards are backdated by one day so they are immediately due.
    pub fn new(folder_id: FolderId, front: impl Into<String>, back: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            folder_id,
            front: front.into(),
            back: back.into(),
            tags: Vec::new(),
            streak: 0,
            next_study: now.date_naive() - Duration::days(1),
            last_seen: None,
            created_at: now,
        }
    }

    pub fn is_due(&self, on: NaiveDate) -> bool {
        self.next_study <= on
    }

    pub fn is_seen(&self) -> bool {
        self.last_seen.is_some()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub card_id: CardId,
    pub outcome: Outcome,
    pub reviewed_at: DateTime<Utc>,
    pub streak_after: u32,
    /// Days until the next study, `None` when the outcome was a failure.
    pub interval_applied: Option<u32>,
}

impl Review {
    pub fn new(
        card_id: CardId,
        outcome: Outcome,
        reviewed_at: DateTime<Utc>,
        streak_after: u32,
        interval_applied: Option<u32>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            outcome,
            reviewed_at,
            streak_after,
            interval_applied,
        }
    }
}
