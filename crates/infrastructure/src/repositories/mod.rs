pub mod sqlite_author_repository;
pub mod sqlite_book_repository;
pub mod sqlite_book_review_repository;
pub mod sqlite_reading_list_repository;
pub mod sqlite_user_repository;

pub use sqlite_author_repository::SqliteAuthorRepository;
pub use sqlite_book_repository::SqliteBookRepository;
pub use sqlite_book_review_repository::SqliteBookReviewRepository;
pub use sqlite_reading_list_repository::SqliteReadingListRepository;
pub use sqlite_user_repository::SqliteUserRepository;
