#![allow(dead_code)]

use application::BookstoreApp;
use domain::{ReadingList, TokenIssuer, User, UserRole};
use infrastructure::{Database, HmacTokenIssuer};
use rust_decimal::Decimal;
use std::sync::Arc;
use tempfile::TempDir;
use uuid::Uuid;

pub const SECRET: &[u8] = b"integration-test-secret-0123456789";

pub fn token_issuer() -> Arc<dyn TokenIssuer> {
    Arc::new(HmacTokenIssuer::new(SECRET, "bookstore-api", "bookstore-users", 60).unwrap())
}

pub fn memory_app() -> BookstoreApp {
    BookstoreApp::in_memory(token_issuer())
}

/// The directory must outlive the app, so it is handed back to the caller.
pub async fn sqlite_app() -> (TempDir, BookstoreApp) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookstore.db");
    let database = Database::new(path.to_str().unwrap(), 4).unwrap();
    let app = BookstoreApp::sqlite(database, token_issuer());
    app.ensure_schema().await.unwrap();
    (dir, app)
}

/// Runs an async scenario once per storage backend.
macro_rules! on_both_backends {
    ($scenario:ident) => {
        mod $scenario {
            #[tokio::test]
            async fn in_memory() {
                let app = crate::common::memory_app();
                super::$scenario(&app).await;
            }

            #[tokio::test]
            async fn sqlite() {
                let (_dir, app) = crate::common::sqlite_app().await;
                super::$scenario(&app).await;
            }
        }
    };
}

pub fn names(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

pub fn price(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

pub async fn add_user(app: &BookstoreApp, username: &str, email: &str) -> Uuid {
    let user = User::new(username, email, "password123", UserRole::User).unwrap();
    app.user_service.create_user(user).await.unwrap()
}

pub async fn add_book(app: &BookstoreApp, title: &str, authors: &[&str]) -> Uuid {
    app.book_service
        .create_book(title, "A book worth reading", price(999), &names(authors))
        .await
        .unwrap()
}

pub async fn add_list(app: &BookstoreApp, owner: Uuid, name: &str, books: &[Uuid]) -> Uuid {
    let list = ReadingList::new(owner, name, "", true).with_books(books.iter().copied());
    app.reading_list_service.create_reading_list(list).await.unwrap()
}
