use crate::associations::AuthorSet;
use crate::entities::Author;
use crate::errors::DomainError;
use crate::validation::{char_len, is_blank, Violations};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub authors: AuthorSet,
}

impl Book {
    pub const MAX_TITLE_LENGTH: usize = 200;
    pub const MAX_DESCRIPTION_LENGTH: usize = 1000;

    pub fn new(
        title: &str,
        description: &str,
        price: Decimal,
        authors: Vec<Author>,
    ) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), title, description, price, authors)
    }

    pub fn with_id(
        id: Uuid,
        title: &str,
        description: &str,
        price: Decimal,
        authors: Vec<Author>,
    ) -> Result<Self, DomainError> {
        Self::validate_fields(title, description, price)?;
        Ok(Self::restore(
            id,
            title.to_string(),
            description.to_string(),
            price,
            authors,
        ))
    }

    /// Rebuilds a persisted book. Duplicate authors collapse into one entry.
    pub fn restore(
        id: Uuid,
        title: String,
        description: String,
        price: Decimal,
        authors: Vec<Author>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            price,
            authors: authors.into(),
        }
    }

    /// Every failing rule is reported, not just the first one.
    pub fn validate_fields(title: &str, description: &str, price: Decimal) -> Result<(), DomainError> {
        let mut violations = Violations::new();
        violations
            .check(is_blank(title), "Title is required")
            .check(
                char_len(title) > Self::MAX_TITLE_LENGTH,
                format!("Title must be at most {} characters", Self::MAX_TITLE_LENGTH),
            )
            .check(is_blank(description), "Description is required")
            .check(
                char_len(description) > Self::MAX_DESCRIPTION_LENGTH,
                format!(
                    "Description must be at most {} characters",
                    Self::MAX_DESCRIPTION_LENGTH
                ),
            )
            .check(price < Decimal::ZERO, "Price cannot be negative");
        violations.into_result()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        Self::validate_fields(&self.title, &self.description, self.price)
    }

    /// Attaches an author. Adding the same author again changes nothing.
    pub fn add_author(&mut self, author: Author) -> bool {
        self.authors.insert(author)
    }

    pub fn has_author(&self, author_id: Uuid) -> bool {
        self.authors.contains(author_id)
    }

    /// Sort key for author-name listings; books without authors sort first.
    pub fn first_author_name(&self) -> &str {
        self.authors
            .first()
            .map(|author| author.name.as_str())
            .unwrap_or("")
    }
}
