use crate::{seeded_shuffle, Card, CardId};
use chrono::{Duration, NaiveDate};

/// Page size used when breaking a large due-list into study sets.
pub const SET_SIZE: usize = 10;

/// Cards due on or before `on`.
pub fn select_due(cards: &[Card], on: NaiveDate) -> Vec<Card> {
    cards.iter().filter(|c| c.is_due(on)).cloned().collect()
}

/// Cards whose due date is exactly `date` (past/future calendar bucket).
pub fn select_on(cards: &[Card], date: NaiveDate) -> Vec<Card> {
    cards
        .iter()
        .filter(|c| c.next_study == date)
        .cloned()
        .collect()
}

/// Shuffle by `seed`, then stable-sort by `last_seen` ascending.
/// Never-seen cards sort first and ties keep the shuffle order.
pub fn order_queue(cards: &[Card], seed: i64) -> Vec<Card> {
    let mut queue = seeded_shuffle(cards, seed);
    queue.sort_by_key(|c| c.last_seen);
    queue
}

/// The ordered queue for one study pass over the cards due on `on`.
pub fn study_queue(cards: &[Card], on: NaiveDate, seed: i64) -> Vec<Card> {
    order_queue(&select_due(cards, on), seed)
}

/// Splits `cards` into seen / not-yet-seen partitions, preserving order.
pub fn partition_seen(cards: &[Card]) -> (Vec<Card>, Vec<Card>) {
    cards.iter().cloned().partition(|c| c.is_seen())
}

/// The pool the next set is sliced from: not-yet-seen cards while any
/// remain, otherwise the already-seen ones.
pub fn set_pool(cards: &[Card]) -> Vec<Card> {
    let (seen, not_seen) = partition_seen(cards);
    if not_seen.is_empty() {
        seen
    } else {
        not_seen
    }
}

/// Fixed-size pages of a queue; the last set may be short.
pub fn split_sets(cards: &[Card], size: usize) -> Vec<Vec<Card>> {
    if size == 0 {
        return Vec::new();
    }
    cards.chunks(size).map(|c| c.to_vec()).collect()
}

/// Spreads a cohort of cards evenly across the `days` calendar days
/// after `start`, as a batch of independent per-card updates. When the
/// split is uneven the earlier days take one extra card. The caller
/// persists them one by one and retries the whole batch on partial
/// failure.
pub fn spread_over_days(cards: &[Card], start: NaiveDate, days: u32) -> Vec<(CardId, NaiveDate)> {
    if days == 0 || cards.is_empty() {
        return Vec::new();
    }
    let days = days as usize;
    let base = cards.len() / days;
    let extra = cards.len() % days;

    let mut updates = Vec::with_capacity(cards.len());
    let mut rest = cards;
    for day in 0..days {
        let take = (base + usize::from(day < extra)).min(rest.len());
        let (chunk, tail) = rest.split_at(take);
        rest = tail;
        let due = start + Duration::days(day as i64 + 1);
        updates.extend(chunk.iter().map(|c| (c.id, due)));
    }
    updates
}
