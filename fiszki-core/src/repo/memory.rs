use crate::{Card, CardId, CoreError, Folder, FolderId, Review};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use std::collections::HashMap;

#[derive(Default)]
pub struct MemoryRepo {
    folders: RwLock<HashMap<FolderId, Folder>>,
    cards: RwLock<HashMap<CardId, Card>>,
    reviews: RwLock<HashMap<CardId, Vec<Review>>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl crate::repo::Repository for MemoryRepo {
    async fn create_folder(&self, name: &str) -> Result<Folder, CoreError> {
        let folder = Folder::new(name);
        let mut m = self.folders.write();
        if m.values().any(|f| f.name.eq_ignore_ascii_case(name)) {
            return Err(CoreError::Conflict("folder name already exists"));
        }
        m.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn get_folder(&self, id: FolderId) -> Result<Folder, CoreError> {
        self.folders
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("folder"))
    }

    async fn list_folders(&self) -> Result<Vec<Folder>, CoreError> {
        Ok(self.folders.read().values().cloned().collect())
    }

    async fn delete_folder(&self, id: FolderId) -> Result<(), CoreError> {
        self.folders
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("folder"))?;
        let mut cards = self.cards.write();
        let ids: Vec<CardId> = cards
            .values()
            .filter(|c| c.folder_id == id)
            .map(|c| c.id)
            .collect();
        for cid in ids {
            cards.remove(&cid);
            self.reviews.write().remove(&cid);
        }
        Ok(())
    }

    async fn add_card(
        &self,
        folder_id: FolderId,
        front: &str,
        back: &str,
        tags: &[String],
    ) -> Result<Card, CoreError> {
        if !self.folders.read().contains_key(&folder_id) {
            return Err(CoreError::NotFound("folder"));
        }
        let mut card = Card::new(folder_id, front, back);
        card.tags = tags.to_vec();
        self.cards.write().insert(card.id, card.clone());
        Ok(card)
    }

    async fn get_card(&self, id: CardId) -> Result<Card, CoreError> {
        self.cards
            .read()
            .get(&id)
            .cloned()
            .ok_or(CoreError::NotFound("card"))
    }

    async fn list_cards(&self, folder_id: Option<FolderId>) -> Result<Vec<Card>, CoreError> {
        let cards = self.cards.read();
        let mut v: Vec<Card> = cards.values().cloned().collect();
        if let Some(fid) = folder_id {
            v.retain(|c| c.folder_id == fid);
        }
        Ok(v)
    }

    async fn update_card(&self, card: &Card) -> Result<Card, CoreError> {
        let mut m = self.cards.write();
        if !m.contains_key(&card.id) {
            return Err(CoreError::NotFound("card"));
        }
        m.insert(card.id, card.clone());
        Ok(card.clone())
    }

    async fn delete_card(&self, id: CardId) -> Result<(), CoreError> {
        self.cards
            .write()
            .remove(&id)
            .ok_or(CoreError::NotFound("card"))?;
        self.reviews.write().remove(&id);
        Ok(())
    }

    async fn update_schedule(
        &self,
        id: CardId,
        streak: u32,
        next_study: NaiveDate,
        last_seen: Option<DateTime<Utc>>,
    ) -> Result<Card, CoreError> {
        let mut m = self.cards.write();
        let Some(card) = m.get_mut(&id) else {
            return Err(CoreError::NotFound("card"));
        };
        card.streak = streak;
        card.next_study = next_study;
        card.last_seen = last_seen;
        Ok(card.clone())
    }

    async fn reschedule_batch(&self, updates: &[(CardId, NaiveDate)]) -> Result<(), CoreError> {
        let mut m = self.cards.write();
        for (id, due) in updates {
            let Some(card) = m.get_mut(id) else {
                return Err(CoreError::NotFound("card"));
            };
            card.next_study = *due;
        }
        Ok(())
    }

    async fn insert_review(&self, review: &Review) -> Result<(), CoreError> {
        let mut m = self.reviews.write();
        m.entry(review.card_id).or_default().push(review.clone());
        Ok(())
    }

    async fn list_reviews_for_card(&self, card_id: CardId) -> Result<Vec<Review>, CoreError> {
        Ok(self
            .reviews
            .read()
            .get(&card_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_reviews(&self) -> Result<Vec<Review>, CoreError> {
        Ok(self
            .reviews
            .read()
            .values()
            .flat_map(|v| v.iter().cloned())
            .collect())
    }
}
