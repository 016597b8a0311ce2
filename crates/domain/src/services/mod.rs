pub mod analytics_service;
pub mod auth_service;
pub mod book_review_service;
pub mod book_service;
pub mod reading_list_service;
pub mod user_service;

pub use analytics_service::{
    AnalyticsService, BookPlacement, BookRating, ListContainingBook, UserBookCount,
};
pub use auth_service::AuthService;
pub use book_review_service::BookReviewService;
pub use book_service::BookService;
pub use reading_list_service::ReadingListService;
pub use user_service::UserService;
