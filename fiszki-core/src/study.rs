//! Per-pass study loop, modelled as an explicit state machine over a
//! selected queue of due cards.
//!
//! One pass walks the queue card by card: `Presenting` shows the prompt
//! side, `Answering` collects a typed guess, `check` compares it to the
//! expected side and moves to `Checked`, `confirm` records the outcome
//! through the interval scheduler and parks the machine in `Advancing`
//! until the caller has persisted the update, then `advance` moves on.
//! A confirmed failure re-enqueues the card at the back of the queue, so
//! reaching `Completed` means every non-skipped card was eventually
//! answered correctly.

use chrono::{DateTime, Utc};

use crate::{apply_outcome, BandTable, Card, CoreError, Outcome, ScheduleOutcome, SeededRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyMode {
    FrontToBack,
    BackToFront,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StudyPhase {
    Presenting,
    Answering,
    Checked,
    Advancing,
    Completed,
}

/// Running totals for one pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub correct: u32,
    pub wrong: u32,
    pub skipped: u32,
}

impl Progress {
    pub fn total(&self) -> u32 {
        self.correct + self.wrong + self.skipped
    }
}

pub struct StudySession {
    queue: Vec<Card>,
    cursor: usize,
    mode: StudyMode,
    phase: StudyPhase,
    guess: String,
    verdict: Option<Outcome>,
    pending: Option<Outcome>,
    progress: Progress,
}

impl StudySession {
    /// An empty queue is a valid session that starts out `Completed`
    /// ("no cards due today"), not an error.
    pub fn new(queue: Vec<Card>, mode: StudyMode) -> Self {
        let phase = if queue.is_empty() {
            StudyPhase::Completed
        } else {
            StudyPhase::Presenting
        };
        Self {
            queue,
            cursor: 0,
            mode,
            phase,
            guess: String::new(),
            verdict: None,
            pending: None,
            progress: Progress::default(),
        }
    }

    pub fn phase(&self) -> StudyPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == StudyPhase::Completed
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    /// Cards left in the queue, the current one included.
    pub fn remaining(&self) -> usize {
        self.queue.len() - self.cursor.min(self.queue.len())
    }

    pub fn current(&self) -> Option<&Card> {
        if self.phase == StudyPhase::Completed {
            return None;
        }
        self.queue.get(self.cursor)
    }

    /// The side shown to the user.
    pub fn prompt(&self) -> Option<&str> {
        self.current().map(|c| match self.mode {
            StudyMode::FrontToBack => c.front.as_str(),
            StudyMode::BackToFront => c.back.as_str(),
        })
    }

    /// The side the guess is compared against; hidden until `Checked`.
    pub fn expected(&self) -> Option<&str> {
        self.current().map(|c| match self.mode {
            StudyMode::FrontToBack => c.back.as_str(),
            StudyMode::BackToFront => c.front.as_str(),
        })
    }

    pub fn guess(&self) -> &str {
        &self.guess
    }

    /// Verdict of the last check, available in `Checked` and `Advancing`.
    pub fn verdict(&self) -> Option<Outcome> {
        self.verdict
    }

    /// `Presenting -> Answering`: the user starts typing.
    pub fn begin(&mut self) -> Result<(), CoreError> {
        if self.phase != StudyPhase::Presenting {
            return Err(CoreError::Invalid("can only begin answering while presenting"));
        }
        self.phase = StudyPhase::Answering;
        Ok(())
    }

    /// `Answering -> Checked`: compare the normalized guess against the
    /// expected side and reveal it. Returns the verdict; the caller may
    /// still override it at `confirm`.
    pub fn check(&mut self, guess: &str) -> Result<Outcome, CoreError> {
        if self.phase != StudyPhase::Answering {
            return Err(CoreError::Invalid("no answer is being typed"));
        }
        let expected = self.expected().unwrap_or_default();
        let verdict = if answers_match(guess, expected) {
            Outcome::Success
        } else {
            Outcome::Failure
        };
        self.guess = guess.to_string();
        self.verdict = Some(verdict);
        self.phase = StudyPhase::Checked;
        Ok(verdict)
    }

    /// `Checked -> Advancing`: record `outcome` (the checked verdict, or
    /// the user's explicit good/wrong override) through the interval
    /// scheduler. The returned card and review are the caller's to
    /// persist; call [`advance`](Self::advance) only once that write
    /// succeeds.
    pub fn confirm(
        &mut self,
        outcome: Outcome,
        now: DateTime<Utc>,
        bands: &BandTable,
        rng: &mut SeededRng,
    ) -> Result<ScheduleOutcome, CoreError> {
        if self.phase != StudyPhase::Checked {
            return Err(CoreError::Invalid("nothing to confirm"));
        }
        let card = self
            .queue
            .get(self.cursor)
            .cloned()
            .ok_or(CoreError::Invalid("no current card"))?;

        let out = apply_outcome(card, outcome, now, bands, rng);
        self.queue[self.cursor] = out.updated_card.clone();

        match outcome {
            Outcome::Success => self.progress.correct += 1,
            Outcome::Failure => self.progress.wrong += 1,
        }
        self.pending = Some(outcome);
        self.phase = StudyPhase::Advancing;
        Ok(out)
    }

    /// `Answering -> Advancing` without recording anything; the card's
    /// schedule is left untouched.
    pub fn skip(&mut self) -> Result<(), CoreError> {
        if self.phase != StudyPhase::Answering {
            return Err(CoreError::Invalid("can only skip while answering"));
        }
        self.progress.skipped += 1;
        self.pending = None;
        self.phase = StudyPhase::Advancing;
        Ok(())
    }

    /// `Advancing -> Presenting | Completed`. A confirmed failure puts
    /// the (streak-reset, still due) card back at the end of the queue.
    pub fn advance(&mut self) -> Result<StudyPhase, CoreError> {
        if self.phase != StudyPhase::Advancing {
            return Err(CoreError::Invalid("not advancing"));
        }
        if self.pending == Some(Outcome::Failure) {
            let again = self.queue[self.cursor].clone();
            self.queue.push(again);
        }
        self.cursor += 1;
        self.guess.clear();
        self.verdict = None;
        self.pending = None;
        self.phase = if self.cursor >= self.queue.len() {
            StudyPhase::Completed
        } else {
            StudyPhase::Presenting
        };
        Ok(self.phase)
    }
}

/// Guesses are compared lowercased and whitespace-trimmed.
pub fn normalize_answer(s: &str) -> String {
    s.trim().to_lowercase()
}

pub fn answers_match(guess: &str, expected: &str) -> bool {
    normalize_answer(guess) == normalize_answer(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_ignores_case_and_edges() {
        assert!(answers_match("  Der Hund ", "der hund"));
        assert!(!answers_match("die Katze", "der Hund"));
        assert_eq!(normalize_answer("  Aa  "), "aa");
    }
}
