use crate::entities::BookReview;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait BookReviewRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<BookReview>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookReview>, DomainError>;
    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<BookReview>, DomainError>;
    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<BookReview>, DomainError>;
    /// Fails with `Conflict` when the user already reviewed the book.
    async fn save(&self, review: &BookReview) -> Result<BookReview, DomainError>;
    async fn update(&self, review: &BookReview) -> Result<BookReview, DomainError>;
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
