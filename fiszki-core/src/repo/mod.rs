use crate::{Card, CardId, CoreError, Folder, FolderId, Review};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

pub mod memory;

pub use memory::MemoryRepo;

/// The flashcard store the scheduling core delegates persistence to.
/// Schedule updates are single atomic per-card writes; last writer wins.
#[async_trait]
pub trait Repository: Send + Sync {
    // Folders
    async fn create_folder(&self, name: &str) -> Result<Folder, CoreError>;
    async fn get_folder(&self, id: FolderId) -> Result<Folder, CoreError>;
    async fn list_folders(&self) -> Result<Vec<Folder>, CoreError>;
    async fn delete_folder(&self, id: FolderId) -> Result<(), CoreError>;

    // Cards
    async fn add_card(
        &self,
        folder_id: FolderId,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Card, CoreError>;

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError>;
    async fn list_cards(&self, folder_id: Option<FolderId>) -> Result<Vec<Card>, CoreError>;
    async fn update_card(&self, card: &Card) -> Result<Card, CoreError>;
    async fn delete_card(&self, id: CardId) -> Result<(), CoreError>;

    // Scheduling fields
    async fn update_schedule(
        &self,
        id: CardId,
        streak: u32,
        next_study: NaiveDate,
        last_seen: Option<DateTime<Utc>>,
    ) -> Result<Card, CoreError>;

    /// Independent per-card due-date updates; no multi-card transaction.
    /// On partial failure the caller retries the whole batch.
    async fn reschedule_batch(&self, updates: &[(CardId, NaiveDate)]) -> Result<(), CoreError>;

    // Reviews
    async fn insert_review(&self, review: &Review) -> Result<(), CoreError>;
    async fn list_reviews_for_card(&self, card_id: CardId) -> Result<Vec<Review>, CoreError>;
    async fn list_reviews(&self) -> Result<Vec<Review>, CoreError>;
}
