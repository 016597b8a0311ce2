#[macro_use]
mod common;

use application::BookstoreApp;
use common::{add_book, add_list, add_user, names, price};
use domain::{BookReview, DomainError};
use uuid::Uuid;

async fn books_with_the_same_author_share_one_record(app: &BookstoreApp) {
    let dune = app
        .book_service
        .create_book("Dune", "Desert planet", price(999), &names(&["Frank Herbert"]))
        .await
        .unwrap();
    let messiah = app
        .book_service
        .create_book("Dune Messiah", "Sequel", price(1099), &names(&[" frank herbert "]))
        .await
        .unwrap();

    let authors = app.book_service.get_all_authors().await.unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0].name, "Frank Herbert");

    let dune = app.book_service.get_book(dune).await.unwrap().unwrap();
    let messiah = app.book_service.get_book(messiah).await.unwrap().unwrap();
    assert!(dune.has_author(authors[0].id));
    assert!(messiah.has_author(authors[0].id));
}
on_both_backends!(books_with_the_same_author_share_one_record);

async fn author_sharing_folds_cyrillic_case(app: &BookstoreApp) {
    add_book(app, "Война и мир", &["Лев Толстой"]).await;
    add_book(app, "Анна Каренина", &["ЛЕВ ТОЛСТОЙ"]).await;

    let authors: Vec<String> = app
        .book_service
        .get_all_authors()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(authors, vec!["Лев Толстой"]);

    let found = app.book_service.find_books_by_author("толстой").await.unwrap();
    assert_eq!(found.len(), 2);
}
on_both_backends!(author_sharing_folds_cyrillic_case);

async fn invalid_book_reports_every_violation(app: &BookstoreApp) {
    let err = app
        .book_service
        .create_book("", " ", price(-100), &names(&["Someone"]))
        .await
        .unwrap_err();

    match err {
        DomainError::ValidationError(message) => {
            assert!(message.contains("Title is required"));
            assert!(message.contains("Description is required"));
            assert!(message.contains("Price cannot be negative"));
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert!(app.book_service.get_all_books().await.unwrap().is_empty());
    assert!(app.book_service.get_all_authors().await.unwrap().is_empty());
}
on_both_backends!(invalid_book_reports_every_violation);

async fn free_book_with_many_authors_is_valid(app: &BookstoreApp) {
    let id = app
        .book_service
        .create_book(
            "Good Omens",
            "Apocalypse, politely",
            price(0),
            &names(&["Terry Pratchett", "Neil Gaiman", "Terry Pratchett"]),
        )
        .await
        .unwrap();

    let book = app.book_service.get_book(id).await.unwrap().unwrap();
    assert_eq!(book.authors.len(), 2);
    assert_eq!(book.first_author_name(), "Terry Pratchett");
}
on_both_backends!(free_book_with_many_authors_is_valid);

async fn blank_author_name_is_rejected(app: &BookstoreApp) {
    let err = app
        .book_service
        .create_book("Anonymous", "Nobody wrote this", price(100), &names(&["  "]))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::ValidationError(_)));
}
on_both_backends!(blank_author_name_is_rejected);

async fn update_replaces_authors_and_drops_orphans(app: &BookstoreApp) {
    let id = add_book(app, "Draft", &["Alice Writer", "Bob Editor"]).await;

    app.book_service
        .update_book(
            id,
            "Final",
            "Now with a proper description",
            &names(&["Bob Editor", "Carol Critic"]),
            price(2500),
        )
        .await
        .unwrap();

    let book = app.book_service.get_book(id).await.unwrap().unwrap();
    assert_eq!(book.title, "Final");
    assert_eq!(book.price, price(2500));
    let book_authors: Vec<&str> = book.authors.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(book_authors, vec!["Bob Editor", "Carol Critic"]);

    let mut stored: Vec<String> = app
        .book_service
        .get_all_authors()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    stored.sort();
    assert_eq!(stored, vec!["Bob Editor", "Carol Critic"]);
}
on_both_backends!(update_replaces_authors_and_drops_orphans);

async fn updating_a_missing_book_is_not_found(app: &BookstoreApp) {
    let missing = Uuid::new_v4();
    let err = app
        .book_service
        .update_book(missing, "Title", "Description", &names(&["Someone"]), price(100))
        .await
        .unwrap_err();

    assert_eq!(err, DomainError::not_found("Book", missing));
}
on_both_backends!(updating_a_missing_book_is_not_found);

async fn deleting_a_book_cascades(app: &BookstoreApp) {
    let reader = add_user(app, "reader", "reader@example.com").await;
    let doomed = add_book(app, "Doomed", &["Solo Author"]).await;
    let kept = add_book(app, "Kept", &["Shared Author"]).await;
    let also_shared = add_book(app, "Also Kept", &["Shared Author"]).await;
    let list = add_list(app, reader, "Favourites", &[doomed, kept]).await;
    let review = BookReview::new(doomed, reader, "Gone too soon", 4, false).unwrap();
    app.review_service.create_review(review).await.unwrap();

    app.book_service.delete_book(doomed).await.unwrap();

    assert!(app.book_service.get_book(doomed).await.unwrap().is_none());
    assert_eq!(
        app.reading_list_service.get_reading_list_book_count(list).await.unwrap(),
        1
    );
    assert!(app.review_service.get_reviews_for_book(doomed).await.unwrap().is_empty());

    let authors: Vec<String> = app
        .book_service
        .get_all_authors()
        .await
        .unwrap()
        .into_iter()
        .map(|a| a.name)
        .collect();
    assert_eq!(authors, vec!["Shared Author"]);

    app.book_service.delete_book(kept).await.unwrap();
    assert_eq!(app.book_service.get_all_authors().await.unwrap().len(), 1);
    app.book_service.delete_book(also_shared).await.unwrap();
    assert!(app.book_service.get_all_authors().await.unwrap().is_empty());
}
on_both_backends!(deleting_a_book_cascades);

async fn deleting_a_missing_book_is_not_found(app: &BookstoreApp) {
    let err = app.book_service.delete_book(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound { entity: "Book", .. }));
}
on_both_backends!(deleting_a_missing_book_is_not_found);

async fn author_search_ignores_case_and_sorts_by_first_author(app: &BookstoreApp) {
    add_book(app, "Emma", &["Jane Austen"]).await;
    add_book(app, "The Meeting Point", &["Austin Clarke"]).await;
    add_book(app, "Persuasion", &["Jane Austen"]).await;
    add_book(app, "Ulysses", &["James Joyce"]).await;

    let found = app.book_service.find_books_by_author("AUST").await.unwrap();
    let firsts: Vec<&str> = found.iter().map(|b| b.first_author_name()).collect();
    assert_eq!(firsts, vec!["Austin Clarke", "Jane Austen", "Jane Austen"]);

    assert!(app.book_service.find_books_by_author("tolkien").await.unwrap().is_empty());
}
on_both_backends!(author_search_ignores_case_and_sorts_by_first_author);

async fn author_search_keeps_surrounding_spaces(app: &BookstoreApp) {
    add_book(app, "Emma", &["Jane Austen"]).await;
    add_book(app, "The Meeting Point", &["Austin Clarke"]).await;

    let found = app.book_service.find_books_by_author(" austen").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].title, "Emma");

    assert!(app.book_service.find_books_by_author("austen ").await.unwrap().is_empty());
}
on_both_backends!(author_search_keeps_surrounding_spaces);
