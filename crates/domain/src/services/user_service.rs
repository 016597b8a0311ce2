use crate::credentials::PasswordHash;
use crate::entities::{User, UserRole};
use crate::errors::DomainError;
use crate::repositories::UserRepository;
use crate::validation::is_blank;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// User Service - Contains business logic
/// This is the APPLICATION LAYER in clean architecture
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    /// Get all users
    pub async fn get_all_users(&self) -> Result<Vec<User>, DomainError> {
        self.user_repository.find_all().await
    }

    /// Get user by ID
    pub async fn get_user(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.user_repository.find_by_id(id).await
    }

    /// Case-insensitive lookup; surrounding whitespace is ignored.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        if is_blank(email) {
            return Err(DomainError::InvalidArgument(
                "Email cannot be empty".to_string(),
            ));
        }
        self.user_repository
            .find_by_email(&User::normalize_email(email))
            .await
    }

    /// Create a new user with business validation
    pub async fn create_user(&self, user: User) -> Result<Uuid, DomainError> {
        user.validate()?;

        // Check if email already exists
        if self.get_user_by_email(&user.email).await?.is_some() {
            warn!(email = %user.email, "registration with taken email rejected");
            return Err(DomainError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }

        let saved = self.user_repository.save(&user).await?;
        info!(user_id = %saved.id, role = %saved.role, "user created");
        Ok(saved.id)
    }

    /// Update user with business validation
    pub async fn update_user(
        &self,
        id: Uuid,
        username: &str,
        email: &str,
        role: UserRole,
    ) -> Result<Uuid, DomainError> {
        let mut user = self
            .user_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("User", id))?;

        User::validate_profile(username, email)?;

        // Check if new email conflicts with another user
        if let Some(existing_user) = self.get_user_by_email(email).await? {
            if existing_user.id != id {
                return Err(DomainError::Conflict(
                    "Email is already taken by another user".to_string(),
                ));
            }
        }

        user.username = username.trim().to_string();
        user.email = User::normalize_email(email);
        user.role = role;
        self.user_repository.update(&user).await?;
        info!(user_id = %id, role = %role, "user updated");
        Ok(id)
    }

    /// Delete user
    pub async fn delete_user(&self, id: Uuid) -> Result<Uuid, DomainError> {
        if self.user_repository.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("User", id));
        }
        self.user_repository.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(id)
    }

    /// `false` both for an unknown email and for a wrong password; both
    /// paths run one hash derivation.
    pub async fn validate_credentials(&self, email: &str, password: &str) -> Result<bool, DomainError> {
        let user = if is_blank(email) {
            None
        } else {
            self.user_repository
                .find_by_email(&User::normalize_email(email))
                .await?
        };

        let valid = match user {
            Some(user) => user.verify_password(password),
            None => PasswordHash::verify_dummy(password),
        };
        debug!(valid, "credential check");
        Ok(valid)
    }

    /// `false` for an unknown user.
    pub async fn is_admin(&self, id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .user_repository
            .find_by_id(id)
            .await?
            .map(|user| user.is_admin())
            .unwrap_or(false))
    }
}
