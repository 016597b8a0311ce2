use crate::auth::{AuthToken, Claims, TokenIssuer};
use crate::entities::{User, UserRole};
use crate::errors::DomainError;
use crate::services::UserService;
use std::sync::Arc;
use tracing::{info, warn};

/// Login, self-registration and token checks on top of [`UserService`].
pub struct AuthService {
    user_service: Arc<UserService>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl AuthService {
    pub fn new(user_service: Arc<UserService>, token_issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            user_service,
            token_issuer,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken, DomainError> {
        let rejected = || DomainError::Unauthorized("Invalid email or password".to_string());

        if !self.user_service.validate_credentials(email, password).await? {
            warn!("login rejected");
            return Err(rejected());
        }
        let user = self
            .user_service
            .get_user_by_email(email)
            .await?
            .ok_or_else(rejected)?;

        let token = self.token_issuer.issue(&user)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    /// Self-registration always yields a regular user.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, DomainError> {
        let user = User::new(username, email, password, UserRole::User)?;
        self.user_service.create_user(user.clone()).await?;
        self.token_issuer.issue(&user)
    }

    pub fn authenticate(&self, token: &str) -> Result<Claims, DomainError> {
        self.token_issuer.verify(token)
    }
}
