use crate::errors::DomainError;
use crate::validation::{char_len, is_blank, Violations};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookReview {
    pub id: Uuid,
    pub book_id: Uuid,
    pub user_id: Uuid,
    pub review_text: String,
    pub rating: i32,
    pub created: DateTime<Utc>,
    pub updated: Option<DateTime<Utc>>,
    pub is_verified: bool,
}

impl BookReview {
    pub const MAX_REVIEW_LENGTH: usize = 1000;
    pub const MIN_RATING: i32 = 1;
    pub const MAX_RATING: i32 = 5;

    pub fn new(
        book_id: Uuid,
        user_id: Uuid,
        review_text: &str,
        rating: i32,
        is_verified: bool,
    ) -> Result<Self, DomainError> {
        Self::validate_fields(review_text, rating)?;
        Ok(Self {
            id: Uuid::new_v4(),
            book_id,
            user_id,
            review_text: review_text.trim().to_string(),
            rating,
            created: Utc::now(),
            updated: None,
            is_verified,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: Uuid,
        book_id: Uuid,
        user_id: Uuid,
        review_text: String,
        rating: i32,
        created: DateTime<Utc>,
        updated: Option<DateTime<Utc>>,
        is_verified: bool,
    ) -> Self {
        Self {
            id,
            book_id,
            user_id,
            review_text,
            rating,
            created,
            updated,
            is_verified,
        }
    }

    pub fn validate_fields(review_text: &str, rating: i32) -> Result<(), DomainError> {
        let mut violations = Violations::new();
        violations
            .check(
                !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating),
                "Rating must be between 1 and 5 stars",
            )
            .check(is_blank(review_text), "Review text is required")
            .check(
                char_len(review_text.trim()) > Self::MAX_REVIEW_LENGTH,
                format!(
                    "Review text must be at most {} characters",
                    Self::MAX_REVIEW_LENGTH
                ),
            );
        violations.into_result()
    }

    /// Replaces text and rating, stamping `updated`. The review is left
    /// untouched when validation fails.
    pub fn revise(&mut self, review_text: &str, rating: i32) -> Result<(), DomainError> {
        Self::validate_fields(review_text, rating)?;
        self.review_text = review_text.trim().to_string();
        self.rating = rating;
        self.updated = Some(Utc::now());
        Ok(())
    }
}
