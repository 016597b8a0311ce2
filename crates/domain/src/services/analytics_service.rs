use crate::errors::DomainError;
use crate::repositories::{BookRepository, BookReviewRepository, ReadingListRepository, UserRepository};
use crate::services::book_review_service::average_rating;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

const UNKNOWN_OWNER: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListContainingBook {
    pub reading_list_id: Uuid,
    pub reading_list_name: String,
    pub owner: String,
    pub owner_email: String,
    pub is_public: bool,
    pub total_books_in_list: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPlacement {
    pub book_id: Uuid,
    pub title: String,
    pub found_in_lists: Vec<ListContainingBook>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserBookCount {
    pub user_id: Uuid,
    pub username: String,
    pub total_books: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookRating {
    pub book_id: Uuid,
    pub title: String,
    pub average_rating: f64,
    pub review_count: usize,
}

/// Read-only reports across books, users, lists and reviews.
pub struct AnalyticsService {
    book_repository: Arc<dyn BookRepository>,
    user_repository: Arc<dyn UserRepository>,
    reading_list_repository: Arc<dyn ReadingListRepository>,
    review_repository: Arc<dyn BookReviewRepository>,
}

impl AnalyticsService {
    pub fn new(
        book_repository: Arc<dyn BookRepository>,
        user_repository: Arc<dyn UserRepository>,
        reading_list_repository: Arc<dyn ReadingListRepository>,
        review_repository: Arc<dyn BookReviewRepository>,
    ) -> Self {
        Self {
            book_repository,
            user_repository,
            reading_list_repository,
            review_repository,
        }
    }

    /// Every list that holds the book, biggest lists first.
    pub async fn lists_containing_book(&self, book_id: Uuid) -> Result<BookPlacement, DomainError> {
        let book = self
            .book_repository
            .find_by_id(book_id)
            .await?
            .ok_or(DomainError::not_found("Book", book_id))?;
        let users: HashMap<Uuid, _> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        let mut found_in_lists: Vec<ListContainingBook> = self
            .reading_list_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|list| list.contains_book(book_id))
            .map(|list| {
                let owner = users.get(&list.user_id);
                ListContainingBook {
                    reading_list_id: list.id,
                    total_books_in_list: list.book_count(),
                    owner: owner.map_or(UNKNOWN_OWNER.to_string(), |u| u.username.clone()),
                    owner_email: owner.map_or(UNKNOWN_OWNER.to_string(), |u| u.email.clone()),
                    is_public: list.is_public,
                    reading_list_name: list.name,
                }
            })
            .collect();
        found_in_lists.sort_by(|a, b| b.total_books_in_list.cmp(&a.total_books_in_list));

        Ok(BookPlacement {
            book_id: book.id,
            title: book.title,
            found_in_lists,
        })
    }

    /// Books summed over each user's lists, highest first.
    pub async fn user_book_counts(&self) -> Result<Vec<UserBookCount>, DomainError> {
        let mut per_user: HashMap<Uuid, usize> = HashMap::new();
        for list in self.reading_list_repository.find_all().await? {
            *per_user.entry(list.user_id).or_default() += list.book_count();
        }

        let mut counts: Vec<UserBookCount> = self
            .user_repository
            .find_all()
            .await?
            .into_iter()
            .map(|user| UserBookCount {
                total_books: per_user.get(&user.id).copied().unwrap_or(0),
                user_id: user.id,
                username: user.username,
            })
            .collect();
        counts.sort_by(|a, b| b.total_books.cmp(&a.total_books));
        Ok(counts)
    }

    /// Highest average rating first, ties broken by review count.
    pub async fn top_rated_books(&self, limit: usize) -> Result<Vec<BookRating>, DomainError> {
        let mut by_book: HashMap<Uuid, Vec<_>> = HashMap::new();
        for review in self.review_repository.find_all().await? {
            by_book.entry(review.book_id).or_default().push(review);
        }

        let mut ratings: Vec<BookRating> = self
            .book_repository
            .find_all()
            .await?
            .into_iter()
            .map(|book| {
                let reviews = by_book.remove(&book.id).unwrap_or_default();
                BookRating {
                    book_id: book.id,
                    title: book.title,
                    average_rating: average_rating(&reviews),
                    review_count: reviews.len(),
                }
            })
            .collect();
        ratings.sort_by(|a, b| {
            b.average_rating
                .total_cmp(&a.average_rating)
                .then_with(|| b.review_count.cmp(&a.review_count))
        });
        ratings.truncate(limit);
        Ok(ratings)
    }
}
