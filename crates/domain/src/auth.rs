use crate::entities::{User, UserRole};
use crate::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity and role carried by an issued token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn require_admin(&self) -> Result<(), DomainError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden("Admin role required".to_string()))
        }
    }

    pub fn require_self_or_admin(&self, user_id: Uuid) -> Result<(), DomainError> {
        if self.sub == user_id || self.is_admin() {
            Ok(())
        } else {
            Err(DomainError::Forbidden(
                "Only the owner or an admin may do this".to_string(),
            ))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthToken {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub expires_at: DateTime<Utc>,
}

/// Issues and checks signed credentials. Verification must not need storage.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user: &User) -> Result<AuthToken, DomainError>;
    fn verify(&self, token: &str) -> Result<Claims, DomainError>;
}
