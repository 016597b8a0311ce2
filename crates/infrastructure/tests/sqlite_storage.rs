use domain::{
    Author, AuthorRepository, Book, BookRepository, BookReview, BookReviewRepository, DomainError,
    ReadingList, ReadingListRepository, User, UserRepository, UserRole,
};
use infrastructure::{
    Database, SqliteAuthorRepository, SqliteBookRepository, SqliteBookReviewRepository,
    SqliteReadingListRepository, SqliteUserRepository,
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tempfile::TempDir;

struct Store {
    _dir: TempDir,
    authors: SqliteAuthorRepository,
    books: SqliteBookRepository,
    reviews: SqliteBookReviewRepository,
    lists: SqliteReadingListRepository,
    users: SqliteUserRepository,
}

async fn store() -> Store {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.db");
    let database = Database::new(path.to_str().unwrap(), 2).unwrap();
    database.ensure_schema().await.unwrap();
    // Running it twice must be harmless.
    database.ensure_schema().await.unwrap();

    let pool = database.get_pool().clone();
    Store {
        _dir: dir,
        authors: SqliteAuthorRepository::new(pool.clone()),
        books: SqliteBookRepository::new(pool.clone()),
        reviews: SqliteBookReviewRepository::new(pool.clone()),
        lists: SqliteReadingListRepository::new(pool.clone()),
        users: SqliteUserRepository::new(pool),
    }
}

fn book(title: &str, authors: &[&str]) -> Book {
    let authors = authors.iter().map(|n| Author::new(n).unwrap()).collect();
    Book::new(title, "Stored description", Decimal::from_str("12.34").unwrap(), authors).unwrap()
}

async fn user(store: &Store, name: &str) -> User {
    let user = User::new(name, &format!("{}@example.com", name), "password123", UserRole::User).unwrap();
    store.users.save(&user).await.unwrap()
}

#[tokio::test]
async fn book_round_trips_with_ordered_authors_and_exact_price() {
    let store = store().await;
    let saved = store
        .books
        .save(&book("Good Omens", &["Terry Pratchett", "Neil Gaiman"]))
        .await
        .unwrap();

    let loaded = store.books.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(loaded.price, Decimal::from_str("12.34").unwrap());
    let names: Vec<&str> = loaded.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Terry Pratchett", "Neil Gaiman"]);
}

#[tokio::test]
async fn authors_are_shared_by_name_regardless_of_case() {
    let store = store().await;
    let first = store.books.save(&book("Dune", &["Frank Herbert"])).await.unwrap();
    let second = store
        .books
        .save(&book("Dune Messiah", &["FRANK HERBERT"]))
        .await
        .unwrap();

    let author_id = first.authors.as_slice()[0].id;
    assert_eq!(second.authors.as_slice()[0].id, author_id);
    assert_eq!(store.authors.find_all().await.unwrap().len(), 1);

    let by_name = store.authors.find_by_name(" frank herbert").await.unwrap().unwrap();
    assert_eq!(by_name.id, author_id);
}

#[tokio::test]
async fn author_names_fold_case_beyond_ascii() {
    let store = store().await;
    let first = store.books.save(&book("Война и мир", &["Лев Толстой"])).await.unwrap();
    let second = store
        .books
        .save(&book("Анна Каренина", &["ЛЕВ ТОЛСТОЙ"]))
        .await
        .unwrap();

    assert_eq!(second.authors.as_slice()[0].id, first.authors.as_slice()[0].id);
    let names: Vec<String> = store
        .authors
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(names, vec!["Лев Толстой"]);
    assert!(store.authors.find_by_name("лев толстой").await.unwrap().is_some());
}

#[tokio::test]
async fn orphan_delete_spares_linked_authors() {
    let store = store().await;
    let saved = store.books.save(&book("Dune", &["Frank Herbert"])).await.unwrap();
    let author_id = saved.authors.as_slice()[0].id;

    assert!(!store.authors.delete_if_orphaned(author_id).await.unwrap());
    let loaded = store.books.find_by_id(saved.id).await.unwrap().unwrap();
    assert!(loaded.has_author(author_id));
}

#[tokio::test]
async fn author_swept_between_resolve_and_save_is_recreated() {
    let store = store().await;
    let draft = store.books.save(&book("Draft", &["Shared Author"])).await.unwrap();
    let shared = store.authors.find_by_name("Shared Author").await.unwrap().unwrap();

    // Another writer drops the last link and sweeps before this save lands.
    store.books.delete(draft.id).await.unwrap();
    assert!(store.authors.delete_if_orphaned(shared.id).await.unwrap());

    let late = Book::new("Late", "Stored description", Decimal::ONE, vec![shared.clone()]).unwrap();
    let saved = store.books.save(&late).await.unwrap();
    assert!(saved.has_author(shared.id));
    assert!(store.authors.find_by_id(shared.id).await.unwrap().is_some());
}

#[tokio::test]
async fn update_replaces_the_author_links() {
    let store = store().await;
    let saved = store.books.save(&book("Draft", &["Old Author"])).await.unwrap();
    let old_author = saved.authors.as_slice()[0].id;

    let revised = Book::with_id(
        saved.id,
        "Final",
        "Rewritten",
        Decimal::ZERO,
        vec![Author::new("New Author").unwrap()],
    )
    .unwrap();
    let updated = store.books.update(&revised).await.unwrap();

    assert_eq!(updated.title, "Final");
    assert_eq!(updated.first_author_name(), "New Author");
    assert!(store.authors.delete_if_orphaned(old_author).await.unwrap());

    let ghost = book("Ghost", &["Nobody"]);
    assert_eq!(
        store.books.update(&ghost).await.unwrap_err(),
        DomainError::not_found("Book", ghost.id)
    );
}

#[tokio::test]
async fn deleting_a_book_cascades_to_joins_reviews_and_lists() {
    let store = store().await;
    let reader = user(&store, "reader").await;
    let saved = store.books.save(&book("Short Lived", &["Brief Author"])).await.unwrap();
    let list = ReadingList::new(reader.id, "Shelf", "", true).with_books([saved.id]);
    store.lists.save(&list).await.unwrap();
    let review = BookReview::new(saved.id, reader.id, "Fine", 3, false).unwrap();
    store.reviews.save(&review).await.unwrap();

    store.books.delete(saved.id).await.unwrap();

    let author_id = saved.authors.as_slice()[0].id;
    assert!(store.authors.delete_if_orphaned(author_id).await.unwrap());
    assert!(store.authors.find_by_id(author_id).await.unwrap().is_none());
    assert!(store.reviews.find_by_book(saved.id).await.unwrap().is_empty());
    let list = store.lists.find_by_id(list.id).await.unwrap().unwrap();
    assert_eq!(list.book_count(), 0);
}

#[tokio::test]
async fn deleting_a_user_cascades_to_reviews_and_lists() {
    let store = store().await;
    let leaving = user(&store, "leaving").await;
    let saved = store.books.save(&book("Remains", &["Some Author"])).await.unwrap();
    store
        .lists
        .save(&ReadingList::new(leaving.id, "Mine", "", false))
        .await
        .unwrap();
    let review = BookReview::new(saved.id, leaving.id, "Bye", 2, false).unwrap();
    store.reviews.save(&review).await.unwrap();

    store.users.delete(leaving.id).await.unwrap();

    assert!(store.lists.find_by_user(leaving.id).await.unwrap().is_empty());
    assert!(store.reviews.find_all().await.unwrap().is_empty());
    assert!(store.books.find_by_id(saved.id).await.unwrap().is_some());
}

#[tokio::test]
async fn unique_constraints_surface_as_conflicts() {
    let store = store().await;
    let reader = user(&store, "unique").await;

    let same_email = User::new("other", "UNIQUE@example.com", "password123", UserRole::User).unwrap();
    assert!(matches!(
        store.users.save(&same_email).await,
        Err(DomainError::Conflict(_))
    ));
    let same_name = User::new("unique", "else@example.com", "password123", UserRole::User).unwrap();
    assert!(matches!(
        store.users.save(&same_name).await,
        Err(DomainError::Conflict(_))
    ));

    let saved = store.books.save(&book("Once", &["Some Author"])).await.unwrap();
    let first = BookReview::new(saved.id, reader.id, "First", 4, false).unwrap();
    store.reviews.save(&first).await.unwrap();
    let second = BookReview::new(saved.id, reader.id, "Second", 5, false).unwrap();
    assert_eq!(
        store.reviews.save(&second).await.unwrap_err(),
        DomainError::Conflict("User has already reviewed this book".to_string())
    );
}

#[tokio::test]
async fn list_membership_keeps_insertion_order() {
    let store = store().await;
    let owner = user(&store, "owner").await;
    let a = store.books.save(&book("Zeta", &["Some Author"])).await.unwrap();
    let b = store.books.save(&book("Alpha", &["Some Author"])).await.unwrap();
    let c = store.books.save(&book("Mu", &["Some Author"])).await.unwrap();

    let list = ReadingList::new(owner.id, "Ordered", "", true).with_books([a.id, b.id]);
    store.lists.save(&list).await.unwrap();
    store.lists.add_book(list.id, c.id).await.unwrap();
    assert!(matches!(
        store.lists.add_book(list.id, a.id).await,
        Err(DomainError::Conflict(_))
    ));

    let loaded = store.lists.find_by_id(list.id).await.unwrap().unwrap();
    assert_eq!(loaded.book_ids.keys().collect::<Vec<_>>(), vec![a.id, b.id, c.id]);

    store.lists.remove_book(list.id, b.id).await.unwrap();
    assert!(!store.lists.contains_book(list.id, b.id).await.unwrap());
    assert!(store.lists.contains_book(list.id, c.id).await.unwrap());
    assert!(store.lists.remove_book(list.id, b.id).await.is_err());
}

#[tokio::test]
async fn bulk_membership_add_is_all_or_nothing() {
    let store = store().await;
    let owner = user(&store, "bulk").await;
    let a = store.books.save(&book("Zeta", &["Some Author"])).await.unwrap();
    let b = store.books.save(&book("Alpha", &["Some Author"])).await.unwrap();
    let list = ReadingList::new(owner.id, "Bulk", "", true).with_books([a.id]);
    store.lists.save(&list).await.unwrap();

    let missing = uuid::Uuid::new_v4();
    assert_eq!(
        store.lists.add_books(list.id, &[b.id, missing]).await.unwrap_err(),
        DomainError::not_found("Book", missing)
    );
    assert!(!store.lists.contains_book(list.id, b.id).await.unwrap());

    let added = store.lists.add_books(list.id, &[a.id, b.id, b.id]).await.unwrap();
    assert_eq!(added, 1);
    let loaded = store.lists.find_by_id(list.id).await.unwrap().unwrap();
    assert_eq!(loaded.book_ids.keys().collect::<Vec<_>>(), vec![a.id, b.id]);

    let ghost = uuid::Uuid::new_v4();
    assert_eq!(
        store.lists.add_books(ghost, &[a.id]).await.unwrap_err(),
        DomainError::not_found("Reading list", ghost)
    );
}

#[tokio::test]
async fn stored_user_keeps_a_verifiable_password_hash() {
    let store = store().await;
    let saved = user(&store, "hashed").await;

    let loaded = store
        .users
        .find_by_email("HASHED@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded.id, saved.id);
    assert_eq!(loaded.role, UserRole::User);
    assert!(loaded.verify_password("password123"));
    assert!(!loaded.verify_password("password124"));
}
