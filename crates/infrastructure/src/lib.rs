pub mod database;
pub mod memory;
pub mod repositories;
pub mod token;

pub use database::{Database, SqlitePool};
pub use memory::InMemoryStorage;
pub use repositories::*;
pub use token::HmacTokenIssuer;
