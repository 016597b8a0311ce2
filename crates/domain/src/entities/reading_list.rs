use crate::associations::BookIdSet;
use crate::errors::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadingList {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub is_public: bool,
    pub book_ids: BookIdSet,
}

impl ReadingList {
    /// Name and description are only trimmed here; a blank name is rejected
    /// when a list is renamed through the service.
    pub fn new(user_id: Uuid, name: &str, description: &str, is_public: bool) -> Self {
        Self::restore(
            Uuid::new_v4(),
            user_id,
            name.trim().to_string(),
            description.trim().to_string(),
            is_public,
            Vec::new(),
        )
    }

    /// Rebuilds a persisted list together with its membership, in stored order.
    pub fn restore(
        id: Uuid,
        user_id: Uuid,
        name: String,
        description: String,
        is_public: bool,
        book_ids: Vec<Uuid>,
    ) -> Self {
        Self {
            id,
            user_id,
            name,
            description,
            is_public,
            book_ids: book_ids.into(),
        }
    }

    pub fn with_books<I: IntoIterator<Item = Uuid>>(mut self, book_ids: I) -> Self {
        self.add_books(book_ids);
        self
    }

    /// Idempotent: returns `false` when the book was already listed.
    pub fn add_book(&mut self, book_id: Uuid) -> bool {
        self.book_ids.insert(book_id)
    }

    /// Adds each id, silently skipping ones already listed.
    pub fn add_books<I: IntoIterator<Item = Uuid>>(&mut self, book_ids: I) -> usize {
        self.book_ids.insert_all(book_ids)
    }

    pub fn remove_book(&mut self, book_id: Uuid) -> Result<(), DomainError> {
        self.book_ids
            .remove(book_id)
            .map(|_| ())
            .ok_or(DomainError::not_found("Book in reading list", book_id))
    }

    pub fn contains_book(&self, book_id: Uuid) -> bool {
        self.book_ids.contains(book_id)
    }

    pub fn book_count(&self) -> usize {
        self.book_ids.len()
    }

    pub fn rename(&mut self, name: &str, description: &str, is_public: bool) {
        self.name = name.trim().to_string();
        self.description = description.trim().to_string();
        self.is_public = is_public;
    }
}
