use config::{Config, StorageBackend};
use domain::*;
use infrastructure::*;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub books: usize,
    pub authors: usize,
    pub users: usize,
    pub reading_lists: usize,
    pub reviews: usize,
}

/// Bookstore Application - wires storage and token issuance into the domain services
pub struct BookstoreApp {
    pub book_service: BookService,
    pub review_service: BookReviewService,
    pub reading_list_service: ReadingListService,
    pub user_service: Arc<UserService>,
    pub analytics_service: AnalyticsService,
    pub auth_service: AuthService,
    database: Option<Database>,
}

/// One handle per repository port, all backed by the same store.
struct Repositories {
    authors: Arc<dyn AuthorRepository>,
    books: Arc<dyn BookRepository>,
    reviews: Arc<dyn BookReviewRepository>,
    reading_lists: Arc<dyn ReadingListRepository>,
    users: Arc<dyn UserRepository>,
}

impl Repositories {
    fn sqlite(pool: &SqlitePool) -> Self {
        Self {
            authors: Arc::new(SqliteAuthorRepository::new(pool.clone())),
            books: Arc::new(SqliteBookRepository::new(pool.clone())),
            reviews: Arc::new(SqliteBookReviewRepository::new(pool.clone())),
            reading_lists: Arc::new(SqliteReadingListRepository::new(pool.clone())),
            users: Arc::new(SqliteUserRepository::new(pool.clone())),
        }
    }

    fn memory(storage: Arc<InMemoryStorage>) -> Self {
        Self {
            authors: storage.clone(),
            books: storage.clone(),
            reviews: storage.clone(),
            reading_lists: storage.clone(),
            users: storage,
        }
    }
}

impl BookstoreApp {
    /// Builds the application for the configured storage backend.
    pub fn from_config(config: &Config) -> Result<Self, DomainError> {
        let token_issuer: Arc<dyn TokenIssuer> = Arc::new(HmacTokenIssuer::new(
            config.token_secret.as_bytes(),
            &config.token_issuer,
            &config.token_audience,
            config.token_expiry_minutes,
        )?);

        match config.storage {
            StorageBackend::Sqlite => {
                let database = Database::new(&config.database_path, config.database_pool_size)?;
                info!(path = %config.database_path, "using sqlite storage");
                Ok(Self::sqlite(database, token_issuer))
            }
            StorageBackend::Memory => {
                info!("using in-memory storage");
                Ok(Self::in_memory(token_issuer))
            }
        }
    }

    pub fn sqlite(database: Database, token_issuer: Arc<dyn TokenIssuer>) -> Self {
        let repositories = Repositories::sqlite(database.get_pool());
        Self::wire(repositories, token_issuer, Some(database))
    }

    pub fn in_memory(token_issuer: Arc<dyn TokenIssuer>) -> Self {
        let repositories = Repositories::memory(Arc::new(InMemoryStorage::new()));
        Self::wire(repositories, token_issuer, None)
    }

    fn wire(
        repositories: Repositories,
        token_issuer: Arc<dyn TokenIssuer>,
        database: Option<Database>,
    ) -> Self {
        let Repositories {
            authors,
            books,
            reviews,
            reading_lists,
            users,
        } = repositories;

        // Domain services
        let book_service = BookService::new(books.clone(), authors);
        let review_service = BookReviewService::new(reviews.clone(), books.clone(), users.clone());
        let reading_list_service =
            ReadingListService::new(reading_lists.clone(), books.clone(), users.clone());
        let user_service = Arc::new(UserService::new(users.clone()));
        let analytics_service = AnalyticsService::new(books, users, reading_lists, reviews);
        let auth_service = AuthService::new(user_service.clone(), token_issuer);

        Self {
            book_service,
            review_service,
            reading_list_service,
            user_service,
            analytics_service,
            auth_service,
            database,
        }
    }

    /// Creates missing tables. A no-op for the in-memory store.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        match &self.database {
            Some(database) => database.ensure_schema().await,
            None => Ok(()),
        }
    }

    /// Registers an admin unless the email is already taken.
    /// Returns the id of the account it created.
    pub async fn ensure_admin(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<Uuid>, DomainError> {
        if self.user_service.get_user_by_email(email).await?.is_some() {
            info!(email = %email, "admin account already present");
            return Ok(None);
        }

        let admin = User::new(username, email, password, UserRole::Admin)?;
        let id = self.user_service.create_user(admin).await?;
        info!(user_id = %id, "admin account created");
        Ok(Some(id))
    }

    pub async fn catalog_stats(&self) -> Result<CatalogStats, DomainError> {
        Ok(CatalogStats {
            books: self.book_service.get_all_books().await?.len(),
            authors: self.book_service.get_all_authors().await?.len(),
            users: self.user_service.get_all_users().await?.len(),
            reading_lists: self.reading_list_service.get_all_reading_lists().await?.len(),
            reviews: self.review_service.get_all_reviews().await?.len(),
        })
    }
}
