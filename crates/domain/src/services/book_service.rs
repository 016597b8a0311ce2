use crate::associations::{AuthorDiff, AuthorLinker};
use crate::entities::{Author, Book};
use crate::errors::DomainError;
use crate::repositories::{AuthorRepository, BookRepository};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Catalog operations for books and the authors linked to them.
pub struct BookService {
    book_repository: Arc<dyn BookRepository>,
    author_repository: Arc<dyn AuthorRepository>,
    author_linker: AuthorLinker,
}

impl BookService {
    pub fn new(
        book_repository: Arc<dyn BookRepository>,
        author_repository: Arc<dyn AuthorRepository>,
    ) -> Self {
        Self {
            book_repository,
            author_linker: AuthorLinker::new(author_repository.clone()),
            author_repository,
        }
    }

    pub async fn get_all_books(&self) -> Result<Vec<Book>, DomainError> {
        self.book_repository.find_all().await
    }

    pub async fn get_book(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        self.book_repository.find_by_id(id).await
    }

    pub async fn get_all_authors(&self) -> Result<Vec<Author>, DomainError> {
        self.author_repository.find_all().await
    }

    /// Books with at least one author whose name contains `fragment`,
    /// ignoring case, ordered by the name of each book's first author.
    /// The fragment is matched as given, whitespace included.
    pub async fn find_books_by_author(&self, fragment: &str) -> Result<Vec<Book>, DomainError> {
        let needle = fragment.to_lowercase();
        let mut books: Vec<Book> = self
            .book_repository
            .find_all()
            .await?
            .into_iter()
            .filter(|book| {
                book.authors
                    .iter()
                    .any(|author| author.name.to_lowercase().contains(&needle))
            })
            .collect();
        books.sort_by(|a, b| a.first_author_name().cmp(b.first_author_name()));
        debug!(fragment, matches = books.len(), "author search");
        Ok(books)
    }

    /// Creates a book, linking authors by name. Existing authors are reused.
    pub async fn create_book(
        &self,
        title: &str,
        description: &str,
        price: Decimal,
        author_names: &[String],
    ) -> Result<Uuid, DomainError> {
        Book::validate_fields(title, description, price)?;
        let authors = self.author_linker.resolve(author_names).await?;
        let book = Book::new(title, description, price, authors)?;

        let saved = self.book_repository.save(&book).await?;
        info!(book_id = %saved.id, title = %saved.title, authors = saved.authors.len(), "book created");
        Ok(saved.id)
    }

    /// Replaces every field and the author set. Authors left without any
    /// book afterwards are deleted.
    pub async fn update_book(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
        author_names: &[String],
        price: Decimal,
    ) -> Result<Uuid, DomainError> {
        let existing = self
            .book_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Book", id))?;

        Book::validate_fields(title, description, price)?;
        let authors = self.author_linker.resolve(author_names).await?;
        let book = Book::with_id(id, title, description, price, authors)?;

        let saved = self.book_repository.update(&book).await?;
        let diff = AuthorDiff::between(&existing.authors, &saved.authors);
        self.author_linker.sweep_orphans(diff.removed).await?;

        info!(book_id = %id, added = diff.added.len(), "book updated");
        Ok(id)
    }

    /// Deletes a book. Reading-list memberships and reviews go with it;
    /// authors that only belonged to this book are removed too.
    pub async fn delete_book(&self, id: Uuid) -> Result<Uuid, DomainError> {
        let existing = self
            .book_repository
            .find_by_id(id)
            .await?
            .ok_or(DomainError::not_found("Book", id))?;

        self.book_repository.delete(id).await?;
        self.author_linker
            .sweep_orphans(existing.authors.keys().collect::<Vec<_>>())
            .await?;

        info!(book_id = %id, "book deleted");
        Ok(id)
    }
}
