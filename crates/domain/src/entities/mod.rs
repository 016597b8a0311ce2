pub mod author;
pub mod book;
pub mod book_review;
pub mod reading_list;
pub mod user;

pub use author::*;
pub use book::*;
pub use book_review::*;
pub use reading_list::*;
pub use user::*;
