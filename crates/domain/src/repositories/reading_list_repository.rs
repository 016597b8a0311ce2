use crate::entities::ReadingList;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait ReadingListRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<ReadingList>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReadingList>, DomainError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ReadingList>, DomainError>;
    /// Stores the list and its seeded membership atomically.
    async fn save(&self, list: &ReadingList) -> Result<ReadingList, DomainError>;
    /// Updates name, description and visibility. Membership is untouched.
    async fn update(&self, list: &ReadingList) -> Result<ReadingList, DomainError>;
    /// Removes the list; membership rows cascade.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
    /// Appends a membership row. Fails with `Conflict` if already present.
    async fn add_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError>;
    /// Appends every book not already a member, in order, as one atomic
    /// write. A missing list or book leaves the membership unchanged.
    /// Returns how many rows were added.
    async fn add_books(&self, list_id: Uuid, book_ids: &[Uuid]) -> Result<usize, DomainError>;
    async fn remove_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError>;
    async fn contains_book(&self, list_id: Uuid, book_id: Uuid) -> Result<bool, DomainError>;
}
