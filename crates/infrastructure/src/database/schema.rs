// Database schema for the bookstore catalog. Ids are UUID text.
diesel::table! {
    users (id) {
        id -> Text,
        username -> Text,
        email -> Text,             // stored lowercased, compared NOCASE
        password_hash -> Text,     // pbkdf2-sha256$<iterations>$<salt>$<digest>
        role -> Text,              // User, Admin
        created_at -> Timestamp,
    }
}

diesel::table! {
    authors (id) {
        id -> Text,
        name -> Text,
        name_key -> Text,          // trimmed and lowercased in Rust, unique
    }
}

diesel::table! {
    books (id) {
        id -> Text,
        title -> Text,
        description -> Text,
        price -> Text,             // decimal kept as text to avoid float rounding
    }
}

diesel::table! {
    book_authors (book_id, author_id) {
        book_id -> Text,
        author_id -> Text,
        position -> Integer,       // order authors were given in
    }
}

diesel::table! {
    reviews (id) {
        id -> Text,
        book_id -> Text,
        user_id -> Text,
        review_text -> Text,
        rating -> Integer,
        created -> Timestamp,
        updated -> Nullable<Timestamp>,
        is_verified -> Bool,
    }
}

diesel::table! {
    reading_lists (id) {
        id -> Text,
        user_id -> Text,
        name -> Text,
        description -> Text,
        is_public -> Bool,
    }
}

diesel::table! {
    reading_list_books (reading_list_id, book_id) {
        reading_list_id -> Text,
        book_id -> Text,
        position -> Integer,       // insertion order within the list
    }
}

diesel::joinable!(book_authors -> books (book_id));
diesel::joinable!(book_authors -> authors (author_id));
diesel::joinable!(reviews -> books (book_id));
diesel::joinable!(reviews -> users (user_id));
diesel::joinable!(reading_lists -> users (user_id));
diesel::joinable!(reading_list_books -> reading_lists (reading_list_id));
diesel::joinable!(reading_list_books -> books (book_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    authors,
    books,
    book_authors,
    reviews,
    reading_lists,
    reading_list_books,
);
