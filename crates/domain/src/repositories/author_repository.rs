use crate::entities::Author;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

/// Authors are written through [`crate::BookRepository`] together with the
/// book that references them; this port only reads and garbage-collects.
#[async_trait]
pub trait AuthorRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError>;
    /// Exact match on [`Author::name_key`], so case folding is Unicode-aware.
    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, DomainError>;
    /// Deletes the author only if no book links to it, checked and applied as
    /// one storage operation. Returns whether a row was removed.
    async fn delete_if_orphaned(&self, id: Uuid) -> Result<bool, DomainError>;
}
