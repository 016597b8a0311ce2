//! Set semantics for the book/author and reading-list/book associations.

pub mod author_links;
pub mod ordered_set;

pub use author_links::{AuthorDiff, AuthorLinker};
pub use ordered_set::{AuthorSet, BookIdSet, Keyed, OrderedIdSet};
