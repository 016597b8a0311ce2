use crate::credentials::PasswordHash;
use crate::errors::DomainError;
use crate::validation::{char_len, is_blank, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "User",
            UserRole::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "User" => Ok(UserRole::User),
            "Admin" => Ok(UserRole::Admin),
            other => Err(DomainError::InvalidArgument(format!("Unknown role: {}", other))),
        }
    }
}

/// Core User entity. The password is kept only as a salted digest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: PasswordHash,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub const MAX_USERNAME_LENGTH: usize = 20;
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    pub fn new(
        username: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<Self, DomainError> {
        let mut violations = Self::profile_violations(username, email);
        violations.check(
            char_len(password) < Self::MIN_PASSWORD_LENGTH,
            format!(
                "Password must be at least {} characters",
                Self::MIN_PASSWORD_LENGTH
            ),
        );
        violations.into_result()?;

        Ok(Self {
            id: Uuid::new_v4(),
            username: username.trim().to_string(),
            email: Self::normalize_email(email),
            password_hash: PasswordHash::generate(password),
            role,
            created_at: Utc::now(),
        })
    }

    pub fn restore(
        id: Uuid,
        username: String,
        email: String,
        password_hash: PasswordHash,
        role: UserRole,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            role,
            created_at,
        }
    }

    /// Username and email rules shared by creation and profile updates.
    pub fn validate_profile(username: &str, email: &str) -> Result<(), DomainError> {
        Self::profile_violations(username, email).into_result()
    }

    fn profile_violations(username: &str, email: &str) -> Violations {
        let mut violations = Violations::new();
        violations
            .check(is_blank(username), "Username is required")
            .check(
                char_len(username.trim()) > Self::MAX_USERNAME_LENGTH,
                format!(
                    "Username must be at most {} characters",
                    Self::MAX_USERNAME_LENGTH
                ),
            )
            .check(
                is_blank(email) || !email.contains('@'),
                "Valid email is required",
            );
        violations
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_profile(&self.username, &self.email)
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash.verify(password)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
