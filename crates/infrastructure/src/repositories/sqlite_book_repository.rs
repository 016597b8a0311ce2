use crate::database::{authors, book_authors, books, parse_id, run_blocking, SqlitePool};
use crate::repositories::sqlite_author_repository::AuthorModel;
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use domain::{Author, Book, BookRepository, DomainError};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = books)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct BookModel {
    id: String,
    title: String,
    description: String,
    price: String,
}

impl From<&Book> for BookModel {
    fn from(book: &Book) -> Self {
        BookModel {
            id: book.id.to_string(),
            title: book.title.clone(),
            description: book.description.clone(),
            price: book.price.to_string(),
        }
    }
}

fn into_book(model: BookModel, linked: Vec<AuthorModel>) -> Result<Book, DomainError> {
    let price = Decimal::from_str(&model.price).map_err(|e| {
        DomainError::RepositoryError(format!("Invalid stored price '{}': {}", model.price, e))
    })?;
    let authors = linked
        .into_iter()
        .map(Author::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Book::restore(
        parse_id(&model.id)?,
        model.title,
        model.description,
        price,
        authors,
    ))
}

/// Loads books (all, or the one with `id`) together with their authors in link order.
fn load_books(
    conn: &mut SqliteConnection,
    id: Option<String>,
) -> QueryResult<Vec<(BookModel, Vec<AuthorModel>)>> {
    let mut query = books::table
        .order(books::title.asc())
        .select(BookModel::as_select())
        .into_boxed();
    if let Some(id) = id {
        query = query.filter(books::id.eq(id));
    }
    let models = query.load::<BookModel>(conn)?;

    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let links: Vec<(String, AuthorModel)> = book_authors::table
        .inner_join(authors::table)
        .filter(book_authors::book_id.eq_any(ids))
        .order((book_authors::book_id.asc(), book_authors::position.asc()))
        .select((book_authors::book_id, AuthorModel::as_select()))
        .load(conn)?;

    let mut by_book: HashMap<String, Vec<AuthorModel>> = HashMap::new();
    for (book_id, author) in links {
        by_book.entry(book_id).or_default().push(author);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let linked = by_book.remove(&model.id).unwrap_or_default();
            (model, linked)
        })
        .collect())
}

/// Links authors to a book, reusing any stored author with the same name key.
fn link_authors(
    conn: &mut SqliteConnection,
    book_id: &str,
    linked: &[AuthorModel],
) -> QueryResult<()> {
    for (position, author) in linked.iter().enumerate() {
        diesel::insert_or_ignore_into(authors::table)
            .values(author)
            .execute(conn)?;
        let author_id: String = authors::table
            .filter(authors::name_key.eq(&author.name_key))
            .select(authors::id)
            .first(conn)?;

        diesel::insert_or_ignore_into(book_authors::table)
            .values((
                book_authors::book_id.eq(book_id),
                book_authors::author_id.eq(&author_id),
                book_authors::position.eq(position as i32),
            ))
            .execute(conn)?;
    }
    Ok(())
}

pub struct SqliteBookRepository {
    pool: SqlitePool,
}

impl SqliteBookRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        let key = id.to_string();
        let mut rows = run_blocking(&self.pool, move |conn| load_books(conn, Some(key))).await?;

        match rows.pop() {
            Some((model, linked)) => into_book(model, linked).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl BookRepository for SqliteBookRepository {
    async fn find_all(&self) -> Result<Vec<Book>, DomainError> {
        let rows = run_blocking(&self.pool, |conn| load_books(conn, None)).await?;

        rows.into_iter()
            .map(|(model, linked)| into_book(model, linked))
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Book>, DomainError> {
        self.load(id).await
    }

    async fn save(&self, book: &Book) -> Result<Book, DomainError> {
        let model = BookModel::from(book);
        let linked: Vec<AuthorModel> = book.authors.iter().map(AuthorModel::from).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(books::table)
                    .values(&model)
                    .execute(conn)?;
                link_authors(conn, &model.id, &linked)
            })
        })
        .await?;

        self.load(book.id)
            .await?
            .ok_or_else(|| DomainError::RepositoryError(format!("Book {} vanished after insert", book.id)))
    }

    async fn update(&self, book: &Book) -> Result<Book, DomainError> {
        let model = BookModel::from(book);
        let linked: Vec<AuthorModel> = book.authors.iter().map(AuthorModel::from).collect();

        let updated = run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                let rows = diesel::update(books::table.filter(books::id.eq(&model.id)))
                    .set((
                        books::title.eq(&model.title),
                        books::description.eq(&model.description),
                        books::price.eq(&model.price),
                    ))
                    .execute(conn)?;
                if rows == 0 {
                    return Ok(false);
                }

                diesel::delete(book_authors::table.filter(book_authors::book_id.eq(&model.id)))
                    .execute(conn)?;
                link_authors(conn, &model.id, &linked)?;
                Ok(true)
            })
        })
        .await?;

        if !updated {
            return Err(DomainError::not_found("Book", book.id));
        }
        self.load(book.id)
            .await?
            .ok_or(DomainError::not_found("Book", book.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let id = id.to_string();
        run_blocking(&self.pool, move |conn| {
            diesel::delete(books::table.filter(books::id.eq(id))).execute(conn)
        })
        .await?;

        Ok(())
    }
}
