pub mod author_repository;
pub mod book_repository;
pub mod book_review_repository;
pub mod reading_list_repository;
pub mod user_repository;

pub use author_repository::AuthorRepository;
pub use book_repository::BookRepository;
pub use book_review_repository::BookReviewRepository;
pub use reading_list_repository::ReadingListRepository;
pub use user_repository::UserRepository;
