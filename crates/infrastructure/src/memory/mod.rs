use async_trait::async_trait;
use domain::{
    Author, AuthorRepository, Book, BookRepository, BookReview, BookReviewRepository, DomainError,
    ReadingList, ReadingListRepository, User, UserRepository,
};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    authors: Vec<Author>,
    books: Vec<Book>,
    reviews: Vec<BookReview>,
    reading_lists: Vec<ReadingList>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<Uuid>) -> bool {
        let email = User::normalize_email(email);
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.email == email)
    }

    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users
            .iter()
            .any(|u| Some(u.id) != except && u.username == username)
    }

    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn book_exists(&self, id: Uuid) -> bool {
        self.books.iter().any(|b| b.id == id)
    }

    /// Swaps each author for the stored one with the same name, storing new ones.
    fn link_authors(&mut self, book: &Book) -> Book {
        let mut linked = Vec::with_capacity(book.authors.len());
        for author in book.authors.iter() {
            let key = Author::name_key(&author.name);
            let stored = match self
                .authors
                .iter()
                .find(|a| Author::name_key(&a.name) == key)
            {
                Some(existing) => existing.clone(),
                None => {
                    self.authors.push(author.clone());
                    author.clone()
                }
            };
            linked.push(stored);
        }

        Book::restore(
            book.id,
            book.title.clone(),
            book.description.clone(),
            book.price,
            linked,
        )
    }
}

/// Process-local storage implementing every repository port behind one lock.
///
/// Mirrors the relational store: uniqueness rules raise `Conflict` and
/// deleting a user or book cascades to the rows that reference it.
#[derive(Default)]
pub struct InMemoryStorage {
    tables: RwLock<Tables>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let tables = self.tables.read().await;
        let mut users = tables.users.clone();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = User::normalize_email(email);
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.user_exists(user.id) {
            return Err(DomainError::Conflict(format!("User {} already exists", user.id)));
        }
        if tables.email_taken(&user.email, None) {
            return Err(DomainError::Conflict("User with this email already exists".to_string()));
        }
        if tables.username_taken(&user.username, None) {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }

        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&user.email, Some(user.id)) {
            return Err(DomainError::Conflict("Email is already taken by another user".to_string()));
        }
        if tables.username_taken(&user.username, Some(user.id)) {
            return Err(DomainError::Conflict("Username is already taken".to_string()));
        }

        let stored = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(DomainError::not_found("User", user.id))?;
        stored.username = user.username.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.role = user.role;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.users.retain(|u| u.id != id);
        tables.reviews.retain(|r| r.user_id != id);
        tables.reading_lists.retain(|l| l.user_id != id);
        Ok(())
    }
}

#[async_trait]
impl AuthorRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let tables = self.tables.read().await;
        let mut authors = tables.authors.clone();
        authors.sort_by_key(|a| Author::name_key(&a.name));
        Ok(authors)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.authors.iter().find(|a| a.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, DomainError> {
        let key = Author::name_key(name);
        let tables = self.tables.read().await;
        Ok(tables
            .authors
            .iter()
            .find(|a| Author::name_key(&a.name) == key)
            .cloned())
    }

    async fn delete_if_orphaned(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.books.iter().any(|b| b.has_author(id)) {
            return Ok(false);
        }
        let before = tables.authors.len();
        tables.authors.retain(|a| a.id != id);
        Ok(tables.authors.len() < before)
    }
}

#[async_trait]
impl BookRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let tables = self.tables.read().await;
        let mut books = tables.books.clone();
        books.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(books)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.books.iter().find(|b| b.id == id).cloned())
    }

    async fn save(&self, book: &Book) -> Result<Book, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.book_exists(book.id) {
            return Err(DomainError::Conflict(format!("Book {} already exists", book.id)));
        }

        let stored = tables.link_authors(book);
        tables.books.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, book: &Book) -> Result<Book, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.book_exists(book.id) {
            return Err(DomainError::not_found("Book", book.id));
        }

        let stored = tables.link_authors(book);
        if let Some(slot) = tables.books.iter_mut().find(|b| b.id == book.id) {
            *slot = stored.clone();
        }
        Ok(stored)
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.books.retain(|b| b.id != id);
        tables.reviews.retain(|r| r.book_id != id);
        for list in tables.reading_lists.iter_mut() {
            list.book_ids.remove(id);
        }
        Ok(())
    }
}

#[async_trait]
impl BookReviewRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<BookReview>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookReview>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.reviews.iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| r.book_id == book_id)
            .cloned()
            .collect())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reviews
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn save(&self, review: &BookReview) -> Result<BookReview, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.book_exists(review.book_id) {
            return Err(DomainError::not_found("Book", review.book_id));
        }
        if !tables.user_exists(review.user_id) {
            return Err(DomainError::not_found("User", review.user_id));
        }
        if tables
            .reviews
            .iter()
            .any(|r| r.id == review.id || (r.user_id == review.user_id && r.book_id == review.book_id))
        {
            return Err(DomainError::Conflict("User has already reviewed this book".to_string()));
        }

        tables.reviews.push(review.clone());
        Ok(review.clone())
    }

    async fn update(&self, review: &BookReview) -> Result<BookReview, DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == review.id)
            .ok_or(DomainError::not_found("Review", review.id))?;
        stored.review_text = review.review_text.clone();
        stored.rating = review.rating;
        stored.updated = review.updated;
        stored.is_verified = review.is_verified;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.reviews.retain(|r| r.id != id);
        Ok(())
    }
}

#[async_trait]
impl ReadingListRepository for InMemoryStorage {
    async fn find_all(&self) -> Result<Vec<ReadingList>, DomainError> {
        let tables = self.tables.read().await;
        let mut lists = tables.reading_lists.clone();
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReadingList>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.reading_lists.iter().find(|l| l.id == id).cloned())
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ReadingList>, DomainError> {
        let tables = self.tables.read().await;
        let mut lists: Vec<ReadingList> = tables
            .reading_lists
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        lists.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(lists)
    }

    async fn save(&self, list: &ReadingList) -> Result<ReadingList, DomainError> {
        let mut tables = self.tables.write().await;
        if tables.reading_lists.iter().any(|l| l.id == list.id) {
            return Err(DomainError::Conflict(format!("Reading list {} already exists", list.id)));
        }
        if !tables.user_exists(list.user_id) {
            return Err(DomainError::not_found("User", list.user_id));
        }
        if let Some(missing) = list.book_ids.iter().find(|id| !tables.book_exists(**id)) {
            return Err(DomainError::not_found("Book", *missing));
        }

        tables.reading_lists.push(list.clone());
        Ok(list.clone())
    }

    async fn update(&self, list: &ReadingList) -> Result<ReadingList, DomainError> {
        let mut tables = self.tables.write().await;
        let stored = tables
            .reading_lists
            .iter_mut()
            .find(|l| l.id == list.id)
            .ok_or(DomainError::not_found("Reading list", list.id))?;
        stored.name = list.name.clone();
        stored.description = list.description.clone();
        stored.is_public = list.is_public;
        Ok(stored.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        tables.reading_lists.retain(|l| l.id != id);
        Ok(())
    }

    async fn add_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.book_exists(book_id) {
            return Err(DomainError::not_found("Book", book_id));
        }
        let list = tables
            .reading_lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or(DomainError::not_found("Reading list", list_id))?;
        if !list.add_book(book_id) {
            return Err(DomainError::Conflict("Book is already in the reading list".to_string()));
        }
        Ok(())
    }

    async fn add_books(&self, list_id: Uuid, book_ids: &[Uuid]) -> Result<usize, DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.reading_lists.iter().any(|l| l.id == list_id) {
            return Err(DomainError::not_found("Reading list", list_id));
        }
        if let Some(missing) = book_ids.iter().find(|id| !tables.book_exists(**id)) {
            return Err(DomainError::not_found("Book", *missing));
        }

        let list = tables
            .reading_lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or(DomainError::not_found("Reading list", list_id))?;
        Ok(list.add_books(book_ids.iter().copied()))
    }

    async fn remove_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let list = tables
            .reading_lists
            .iter_mut()
            .find(|l| l.id == list_id)
            .ok_or(DomainError::not_found("Reading list", list_id))?;
        list.remove_book(book_id)
    }

    async fn contains_book(&self, list_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .reading_lists
            .iter()
            .any(|l| l.id == list_id && l.contains_book(book_id)))
    }
}
