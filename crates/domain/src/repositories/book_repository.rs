use crate::entities::Book;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Books come back with their authors resolved, in link order.
    async fn find_all(&self) -> Result<Vec<Book>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, DomainError>;
    /// Persists the book, any authors not stored yet and the join rows in
    /// one transaction. An author whose name already exists is linked to the
    /// stored record instead, so the returned book may carry different
    /// author ids than the input.
    async fn save(&self, book: &Book) -> Result<Book, DomainError>;
    /// Replaces every field and the whole author set in one transaction.
    async fn update(&self, book: &Book) -> Result<Book, DomainError>;
    /// Removes the book; join rows, list memberships and reviews cascade.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
