use crate::entities::BookReview;
use crate::errors::DomainError;
use crate::repositories::{BookRepository, BookReviewRepository, UserRepository};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct BookReviewService {
    review_repository: Arc<dyn BookReviewRepository>,
    book_repository: Arc<dyn BookRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl BookReviewService {
    pub fn new(
        review_repository: Arc<dyn BookReviewRepository>,
        book_repository: Arc<dyn BookRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            review_repository,
            book_repository,
            user_repository,
        }
    }

    pub async fn get_all_reviews(&self) -> Result<Vec<BookReview>, DomainError> {
        self.review_repository.find_all().await
    }

    pub async fn get_review(&self, id: Uuid) -> Result<Option<BookReview>, DomainError> {
        self.review_repository.find_by_id(id).await
    }

    pub async fn get_reviews_for_book(&self, book_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        self.review_repository.find_by_book(book_id).await
    }

    pub async fn get_reviews_by_user(&self, user_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        self.review_repository.find_by_user(user_id).await
    }

    /// Book and user must exist before the one-review-per-user check runs,
    /// so a missing reference always wins over a duplicate.
    pub async fn create_review(&self, review: BookReview) -> Result<Uuid, DomainError> {
        if self.book_repository.find_by_id(review.book_id).await?.is_none() {
            return Err(DomainError::not_found("Book", review.book_id));
        }
        if self.user_repository.find_by_id(review.user_id).await?.is_none() {
            return Err(DomainError::not_found("User", review.user_id));
        }
        if self.has_user_reviewed(review.user_id, review.book_id).await? {
            warn!(user_id = %review.user_id, book_id = %review.book_id, "duplicate review rejected");
            return Err(DomainError::Conflict(
                "User has already reviewed this book".to_string(),
            ));
        }

        let saved = self.review_repository.save(&review).await?;
        info!(review_id = %saved.id, book_id = %saved.book_id, rating = saved.rating, "review created");
        Ok(saved.id)
    }

    pub async fn update_review(
        &self,
        id: Uuid,
        review_text: &str,
        rating: i32,
    ) -> Result<BookReview, DomainError> {
        let mut review = self
            .review_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Review", id))?;

        review.revise(review_text, rating)?;
        let saved = self.review_repository.update(&review).await?;
        info!(review_id = %id, rating, "review updated");
        Ok(saved)
    }

    pub async fn delete_review(&self, id: Uuid) -> Result<(), DomainError> {
        if self.review_repository.find_by_id(id).await?.is_none() {
            return Err(DomainError::not_found("Review", id));
        }
        self.review_repository.delete(id).await?;
        info!(review_id = %id, "review deleted");
        Ok(())
    }

    /// Mean rating, or exactly `0.0` when the book has no reviews.
    pub async fn get_average_rating(&self, book_id: Uuid) -> Result<f64, DomainError> {
        let reviews = self.review_repository.find_by_book(book_id).await?;
        Ok(average_rating(&reviews))
    }

    pub async fn get_review_count(&self, book_id: Uuid) -> Result<usize, DomainError> {
        Ok(self.review_repository.find_by_book(book_id).await?.len())
    }

    pub async fn has_user_reviewed(&self, user_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        Ok(self
            .review_repository
            .find_by_user(user_id)
            .await?
            .iter()
            .any(|review| review.book_id == book_id))
    }
}

pub(crate) fn average_rating(reviews: &[BookReview]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let total: i64 = reviews.iter().map(|review| i64::from(review.rating)).sum();
    total as f64 / reviews.len() as f64
}
