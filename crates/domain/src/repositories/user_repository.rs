use crate::entities::User;
use crate::errors::DomainError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait - defines what we need from persistence layer
/// This is a PORT in hexagonal architecture
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<User>, DomainError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError>;
    /// Case-insensitive; the argument is trimmed first.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    /// Email and username are unique; a duplicate yields `Conflict`.
    async fn save(&self, user: &User) -> Result<User, DomainError>;
    async fn update(&self, user: &User) -> Result<User, DomainError>;
    /// Removes the user; their reading lists and reviews cascade.
    async fn delete(&self, id: Uuid) -> Result<(), DomainError>;
}
