use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager, CustomizeConnection};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use domain::DomainError;
use tracing::info;
use uuid::Uuid;

pub mod schema;
pub use schema::*;

pub type SqlitePool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id            TEXT PRIMARY KEY NOT NULL,
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL COLLATE NOCASE UNIQUE,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL DEFAULT 'User',
    created_at    TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS authors (
    id       TEXT PRIMARY KEY NOT NULL,
    name     TEXT NOT NULL,
    name_key TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS books (
    id          TEXT PRIMARY KEY NOT NULL,
    title       TEXT NOT NULL,
    description TEXT NOT NULL,
    price       TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS book_authors (
    book_id   TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    author_id TEXT NOT NULL REFERENCES authors(id) ON DELETE CASCADE,
    position  INTEGER NOT NULL,
    PRIMARY KEY (book_id, author_id)
);

CREATE TABLE IF NOT EXISTS reviews (
    id          TEXT PRIMARY KEY NOT NULL,
    book_id     TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    review_text TEXT NOT NULL,
    rating      INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
    created     TIMESTAMP NOT NULL,
    updated     TIMESTAMP,
    is_verified BOOLEAN NOT NULL DEFAULT 0,
    UNIQUE (user_id, book_id)
);

CREATE TABLE IF NOT EXISTS reading_lists (
    id          TEXT PRIMARY KEY NOT NULL,
    user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    name        TEXT NOT NULL,
    description TEXT NOT NULL,
    is_public   BOOLEAN NOT NULL DEFAULT 1
);

CREATE INDEX IF NOT EXISTS idx_reading_lists_user_id ON reading_lists(user_id);
CREATE INDEX IF NOT EXISTS idx_reading_lists_is_public ON reading_lists(is_public);

CREATE TABLE IF NOT EXISTS reading_list_books (
    reading_list_id TEXT NOT NULL REFERENCES reading_lists(id) ON DELETE CASCADE,
    book_id         TEXT NOT NULL REFERENCES books(id) ON DELETE CASCADE,
    position        INTEGER NOT NULL,
    PRIMARY KEY (reading_list_id, book_id)
);
"#;

/// Enables per-connection settings SQLite does not persist in the file.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(r2d2::Error::QueryError)
    }
}

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(database_path: &str, pool_size: u32) -> Result<Self, DomainError> {
        let manager = ConnectionManager::<SqliteConnection>::new(database_path);
        let pool = r2d2::Pool::builder()
            .max_size(pool_size.max(1))
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)
            .map_err(|e| {
                DomainError::RepositoryError(format!("Failed to create SQLite connection pool: {}", e))
            })?;
        Ok(Database { pool })
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Creates any missing tables and indexes.
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        run_blocking(&self.pool, |conn| conn.batch_execute(SCHEMA_SQL)).await?;
        info!("database schema ready");
        Ok(())
    }
}

/// Runs diesel work on the blocking pool with a pooled connection.
pub(crate) async fn run_blocking<T, F>(pool: &SqlitePool, work: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce(&mut SqliteConnection) -> QueryResult<T> + Send + 'static,
{
    let mut conn = pool
        .get()
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?;

    tokio::task::spawn_blocking(move || work(&mut *conn))
        .await
        .map_err(|e| DomainError::RepositoryError(e.to_string()))?
        .map_err(map_diesel_error)
}

pub(crate) fn map_diesel_error(error: DieselError) -> DomainError {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DomainError::Conflict(info.message().to_string())
        }
        other => DomainError::RepositoryError(other.to_string()),
    }
}

pub(crate) fn parse_id(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value)
        .map_err(|e| DomainError::RepositoryError(format!("Invalid stored id '{}': {}", value, e)))
}
