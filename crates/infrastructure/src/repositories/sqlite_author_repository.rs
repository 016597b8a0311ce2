use crate::database::{authors, book_authors, parse_id, run_blocking, SqlitePool};
use async_trait::async_trait;
use diesel::dsl::{exists, not};
use diesel::prelude::*;
use domain::{Author, AuthorRepository, DomainError};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = authors)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub(crate) struct AuthorModel {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) name_key: String,
}

impl TryFrom<AuthorModel> for Author {
    type Error = DomainError;

    fn try_from(model: AuthorModel) -> Result<Self, Self::Error> {
        Ok(Author::restore(parse_id(&model.id)?, model.name))
    }
}

impl From<&Author> for AuthorModel {
    fn from(author: &Author) -> Self {
        AuthorModel {
            id: author.id.to_string(),
            name: author.name.clone(),
            name_key: Author::name_key(&author.name),
        }
    }
}

pub struct SqliteAuthorRepository {
    pool: SqlitePool,
}

impl SqliteAuthorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuthorRepository for SqliteAuthorRepository {
    async fn find_all(&self) -> Result<Vec<Author>, DomainError> {
        let result = run_blocking(&self.pool, |conn| {
            authors::table
                .order(authors::name_key.asc())
                .select(AuthorModel::as_select())
                .load::<AuthorModel>(conn)
        })
        .await?;

        result.into_iter().map(Author::try_from).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Author>, DomainError> {
        let id = id.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            authors::table
                .filter(authors::id.eq(id))
                .select(AuthorModel::as_select())
                .first::<AuthorModel>(conn)
                .optional()
        })
        .await?;

        result.map(Author::try_from).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Author>, DomainError> {
        let key = Author::name_key(name);
        let result = run_blocking(&self.pool, move |conn| {
            authors::table
                .filter(authors::name_key.eq(key))
                .select(AuthorModel::as_select())
                .first::<AuthorModel>(conn)
                .optional()
        })
        .await?;

        result.map(Author::try_from).transpose()
    }

    async fn delete_if_orphaned(&self, id: Uuid) -> Result<bool, DomainError> {
        let id = id.to_string();
        let deleted = run_blocking(&self.pool, move |conn| {
            let linked = book_authors::table.filter(book_authors::author_id.eq(id.clone()));
            diesel::delete(
                authors::table
                    .filter(authors::id.eq(id))
                    .filter(not(exists(linked))),
            )
            .execute(conn)
        })
        .await?;

        Ok(deleted > 0)
    }
}
