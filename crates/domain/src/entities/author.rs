use crate::errors::DomainError;
use crate::validation::{char_len, is_blank, Violations};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Authors are shared between books and live independently of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
}

impl Author {
    pub const MAX_NAME_LENGTH: usize = 50;

    pub fn new(name: &str) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), name)
    }

    pub fn with_id(id: Uuid, name: &str) -> Result<Self, DomainError> {
        let author = Self {
            id,
            name: name.trim().to_string(),
        };
        author.validate()?;
        Ok(author)
    }

    /// Rebuilds a persisted author without re-running validation.
    pub fn restore(id: Uuid, name: String) -> Self {
        Self { id, name }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut violations = Violations::new();
        violations
            .check(is_blank(&self.name), "Author name is required")
            .check(
                char_len(&self.name) > Self::MAX_NAME_LENGTH,
                format!("Author name must be at most {} characters", Self::MAX_NAME_LENGTH),
            );
        violations.into_result()
    }

    /// Key used to match author names regardless of case.
    pub fn name_key(name: &str) -> String {
        name.trim().to_lowercase()
    }
}
