use crate::entities::{Book, ReadingList};
use crate::errors::DomainError;
use crate::repositories::{BookRepository, ReadingListRepository, UserRepository};
use crate::validation::is_blank;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

pub struct ReadingListService {
    reading_list_repository: Arc<dyn ReadingListRepository>,
    book_repository: Arc<dyn BookRepository>,
    user_repository: Arc<dyn UserRepository>,
}

impl ReadingListService {
    pub fn new(
        reading_list_repository: Arc<dyn ReadingListRepository>,
        book_repository: Arc<dyn BookRepository>,
        user_repository: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            reading_list_repository,
            book_repository,
            user_repository,
        }
    }

    pub async fn get_all_reading_lists(&self) -> Result<Vec<ReadingList>, DomainError> {
        self.reading_list_repository.find_all().await
    }

    pub async fn get_reading_list(&self, id: Uuid) -> Result<Option<ReadingList>, DomainError> {
        self.reading_list_repository.find_by_id(id).await
    }

    pub async fn get_reading_lists_by_user(&self, user_id: Uuid) -> Result<Vec<ReadingList>, DomainError> {
        self.reading_list_repository.find_by_user(user_id).await
    }

    /// The owner must exist, as must every book the list is seeded with.
    pub async fn create_reading_list(&self, list: ReadingList) -> Result<Uuid, DomainError> {
        if self.user_repository.find_by_id(list.user_id).await?.is_none() {
            return Err(DomainError::not_found("User", list.user_id));
        }
        for book_id in list.book_ids.keys() {
            self.require_book(book_id).await?;
        }

        let saved = self.reading_list_repository.save(&list).await?;
        info!(list_id = %saved.id, user_id = %saved.user_id, books = saved.book_count(), "reading list created");
        Ok(saved.id)
    }

    pub async fn update_reading_list(
        &self,
        id: Uuid,
        name: &str,
        description: &str,
        is_public: bool,
    ) -> Result<Uuid, DomainError> {
        let mut list = self.require_list(id).await?;
        if is_blank(name) {
            return Err(DomainError::ValidationError(
                "Reading list name is required".to_string(),
            ));
        }

        list.rename(name, description, is_public);
        self.reading_list_repository.update(&list).await?;
        info!(list_id = %id, "reading list updated");
        Ok(id)
    }

    pub async fn delete_reading_list(&self, id: Uuid) -> Result<(), DomainError> {
        self.require_list(id).await?;
        self.reading_list_repository.delete(id).await?;
        info!(list_id = %id, "reading list deleted");
        Ok(())
    }

    /// Adds one book. Unlike the bulk variant, a book already on the list is
    /// reported as `Conflict`.
    pub async fn add_book_to_reading_list(
        &self,
        list_id: Uuid,
        book_id: Uuid,
    ) -> Result<ReadingList, DomainError> {
        self.require_list(list_id).await?;
        self.require_book(book_id).await?;

        if self
            .reading_list_repository
            .contains_book(list_id, book_id)
            .await?
        {
            warn!(list_id = %list_id, book_id = %book_id, "book already in reading list");
            return Err(DomainError::Conflict(
                "Book is already in the reading list".to_string(),
            ));
        }

        self.reading_list_repository.add_book(list_id, book_id).await?;
        info!(list_id = %list_id, book_id = %book_id, "book added to reading list");
        self.require_list(list_id).await
    }

    /// Adds every book not yet on the list; ones already present are skipped.
    pub async fn add_books_to_reading_list(
        &self,
        list_id: Uuid,
        book_ids: &[Uuid],
    ) -> Result<ReadingList, DomainError> {
        self.require_list(list_id).await?;
        for book_id in book_ids {
            self.require_book(*book_id).await?;
        }

        let added = self
            .reading_list_repository
            .add_books(list_id, book_ids)
            .await?;
        info!(list_id = %list_id, added, "books added to reading list");
        self.require_list(list_id).await
    }

    pub async fn remove_book_from_reading_list(
        &self,
        list_id: Uuid,
        book_id: Uuid,
    ) -> Result<ReadingList, DomainError> {
        self.require_list(list_id).await?;

        if !self
            .reading_list_repository
            .contains_book(list_id, book_id)
            .await?
        {
            return Err(DomainError::InvalidState(
                "Book is not in the reading list".to_string(),
            ));
        }

        self.reading_list_repository
            .remove_book(list_id, book_id)
            .await?;
        info!(list_id = %list_id, book_id = %book_id, "book removed from reading list");
        self.require_list(list_id).await
    }

    /// Books on the list, in the order they were added.
    pub async fn get_books_in_reading_list(&self, list_id: Uuid) -> Result<Vec<Book>, DomainError> {
        let list = self.require_list(list_id).await?;
        let mut books: HashMap<Uuid, Book> = self
            .book_repository
            .find_all()
            .await?
            .into_iter()
            .map(|book| (book.id, book))
            .collect();

        Ok(list
            .book_ids
            .keys()
            .filter_map(|book_id| books.remove(&book_id))
            .collect())
    }

    pub async fn is_book_in_reading_list(&self, list_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        self.reading_list_repository
            .contains_book(list_id, book_id)
            .await
    }

    /// Zero for a list that does not exist.
    pub async fn get_reading_list_book_count(&self, list_id: Uuid) -> Result<usize, DomainError> {
        Ok(self
            .reading_list_repository
            .find_by_id(list_id)
            .await?
            .map(|list| list.book_count())
            .unwrap_or(0))
    }

    async fn require_list(&self, id: Uuid) -> Result<ReadingList, DomainError> {
        self.reading_list_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Reading list", id))
    }

    async fn require_book(&self, id: Uuid) -> Result<(), DomainError> {
        match self.book_repository.find_by_id(id).await? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("Book", id)),
        }
    }
}
