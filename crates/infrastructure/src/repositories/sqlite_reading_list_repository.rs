use crate::database::{books, parse_id, reading_list_books, reading_lists, run_blocking, SqlitePool};
use async_trait::async_trait;
use diesel::dsl::{exists, max};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use domain::{DomainError, ReadingList, ReadingListRepository};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = reading_lists)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ReadingListModel {
    id: String,
    user_id: String,
    name: String,
    description: String,
    is_public: bool,
}

impl From<&ReadingList> for ReadingListModel {
    fn from(list: &ReadingList) -> Self {
        ReadingListModel {
            id: list.id.to_string(),
            user_id: list.user_id.to_string(),
            name: list.name.clone(),
            description: list.description.clone(),
            is_public: list.is_public,
        }
    }
}

fn into_reading_list(model: ReadingListModel, book_ids: Vec<String>) -> Result<ReadingList, DomainError> {
    let book_ids = book_ids
        .iter()
        .map(|id| parse_id(id))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ReadingList::restore(
        parse_id(&model.id)?,
        parse_id(&model.user_id)?,
        model.name,
        model.description,
        model.is_public,
        book_ids,
    ))
}

/// Attaches membership, in insertion order, to each loaded list.
fn with_membership(
    conn: &mut SqliteConnection,
    models: Vec<ReadingListModel>,
) -> QueryResult<Vec<(ReadingListModel, Vec<String>)>> {
    let ids: Vec<String> = models.iter().map(|m| m.id.clone()).collect();
    let rows: Vec<(String, String)> = reading_list_books::table
        .filter(reading_list_books::reading_list_id.eq_any(ids))
        .order((
            reading_list_books::reading_list_id.asc(),
            reading_list_books::position.asc(),
        ))
        .select((reading_list_books::reading_list_id, reading_list_books::book_id))
        .load(conn)?;

    let mut by_list: HashMap<String, Vec<String>> = HashMap::new();
    for (list_id, book_id) in rows {
        by_list.entry(list_id).or_default().push(book_id);
    }

    Ok(models
        .into_iter()
        .map(|model| {
            let book_ids = by_list.remove(&model.id).unwrap_or_default();
            (model, book_ids)
        })
        .collect())
}

fn into_reading_lists(rows: Vec<(ReadingListModel, Vec<String>)>) -> Result<Vec<ReadingList>, DomainError> {
    rows.into_iter()
        .map(|(model, book_ids)| into_reading_list(model, book_ids))
        .collect()
}

pub struct SqliteReadingListRepository {
    pool: SqlitePool,
}

impl SqliteReadingListRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: Uuid) -> Result<Option<ReadingList>, DomainError> {
        let key = id.to_string();
        let mut rows = run_blocking(&self.pool, move |conn| {
            let models = reading_lists::table
                .filter(reading_lists::id.eq(key))
                .select(ReadingListModel::as_select())
                .load::<ReadingListModel>(conn)?;
            with_membership(conn, models)
        })
        .await?;

        match rows.pop() {
            Some((model, book_ids)) => into_reading_list(model, book_ids).map(Some),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ReadingListRepository for SqliteReadingListRepository {
    async fn find_all(&self) -> Result<Vec<ReadingList>, DomainError> {
        let rows = run_blocking(&self.pool, |conn| {
            let models = reading_lists::table
                .order(reading_lists::name.asc())
                .select(ReadingListModel::as_select())
                .load::<ReadingListModel>(conn)?;
            with_membership(conn, models)
        })
        .await?;

        into_reading_lists(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ReadingList>, DomainError> {
        self.load(id).await
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<ReadingList>, DomainError> {
        let user_id = user_id.to_string();
        let rows = run_blocking(&self.pool, move |conn| {
            let models = reading_lists::table
                .filter(reading_lists::user_id.eq(user_id))
                .order(reading_lists::name.asc())
                .select(ReadingListModel::as_select())
                .load::<ReadingListModel>(conn)?;
            with_membership(conn, models)
        })
        .await?;

        into_reading_lists(rows)
    }

    async fn save(&self, list: &ReadingList) -> Result<ReadingList, DomainError> {
        let model = ReadingListModel::from(list);
        let book_ids: Vec<String> = list.book_ids.iter().map(|id| id.to_string()).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                diesel::insert_into(reading_lists::table)
                    .values(&model)
                    .execute(conn)?;
                for (position, book_id) in book_ids.iter().enumerate() {
                    diesel::insert_into(reading_list_books::table)
                        .values((
                            reading_list_books::reading_list_id.eq(&model.id),
                            reading_list_books::book_id.eq(book_id),
                            reading_list_books::position.eq(position as i32),
                        ))
                        .execute(conn)?;
                }
                Ok(())
            })
        })
        .await?;

        self.load(list.id)
            .await?
            .ok_or_else(|| DomainError::RepositoryError(format!("Reading list {} vanished after insert", list.id)))
    }

    async fn update(&self, list: &ReadingList) -> Result<ReadingList, DomainError> {
        let model = ReadingListModel::from(list);

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(reading_lists::table.filter(reading_lists::id.eq(&model.id)))
                .set((
                    reading_lists::name.eq(&model.name),
                    reading_lists::description.eq(&model.description),
                    reading_lists::is_public.eq(model.is_public),
                ))
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(DomainError::not_found("Reading list", list.id));
        }
        self.load(list.id)
            .await?
            .ok_or(DomainError::not_found("Reading list", list.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let id = id.to_string();
        run_blocking(&self.pool, move |conn| {
            diesel::delete(reading_lists::table.filter(reading_lists::id.eq(id))).execute(conn)
        })
        .await?;

        Ok(())
    }

    async fn add_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError> {
        let list_key = list_id.to_string();
        let book_key = book_id.to_string();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                let last: Option<i32> = reading_list_books::table
                    .filter(reading_list_books::reading_list_id.eq(&list_key))
                    .select(max(reading_list_books::position))
                    .first(conn)?;

                diesel::insert_into(reading_list_books::table)
                    .values((
                        reading_list_books::reading_list_id.eq(&list_key),
                        reading_list_books::book_id.eq(&book_key),
                        reading_list_books::position.eq(last.map_or(0, |p| p + 1)),
                    ))
                    .execute(conn)
            })
        })
        .await
        .map_err(|e| match e {
            DomainError::Conflict(_) => {
                DomainError::Conflict("Book is already in the reading list".to_string())
            }
            other => other,
        })?;

        Ok(())
    }

    async fn add_books(&self, list_id: Uuid, book_ids: &[Uuid]) -> Result<usize, DomainError> {
        let list_key = list_id.to_string();
        let wanted: Vec<(Uuid, String)> = book_ids.iter().map(|id| (*id, id.to_string())).collect();

        run_blocking(&self.pool, move |conn| {
            conn.transaction::<_, DieselError, _>(|conn| {
                let list_found: bool = diesel::select(exists(
                    reading_lists::table.filter(reading_lists::id.eq(&list_key)),
                ))
                .get_result(conn)?;
                if !list_found {
                    return Ok(Err(DomainError::not_found("Reading list", list_id)));
                }
                for (book_id, key) in &wanted {
                    let book_found: bool =
                        diesel::select(exists(books::table.filter(books::id.eq(key))))
                            .get_result(conn)?;
                    if !book_found {
                        return Ok(Err(DomainError::not_found("Book", *book_id)));
                    }
                }

                let last: Option<i32> = reading_list_books::table
                    .filter(reading_list_books::reading_list_id.eq(&list_key))
                    .select(max(reading_list_books::position))
                    .first(conn)?;
                let mut next = last.map_or(0, |p| p + 1);
                let mut added = 0;
                for (_, key) in &wanted {
                    let inserted = diesel::insert_or_ignore_into(reading_list_books::table)
                        .values((
                            reading_list_books::reading_list_id.eq(&list_key),
                            reading_list_books::book_id.eq(key),
                            reading_list_books::position.eq(next),
                        ))
                        .execute(conn)?;
                    if inserted > 0 {
                        next += 1;
                        added += 1;
                    }
                }
                Ok(Ok(added))
            })
        })
        .await?
    }

    async fn remove_book(&self, list_id: Uuid, book_id: Uuid) -> Result<(), DomainError> {
        let list_key = list_id.to_string();
        let book_key = book_id.to_string();

        let removed = run_blocking(&self.pool, move |conn| {
            diesel::delete(
                reading_list_books::table
                    .filter(reading_list_books::reading_list_id.eq(list_key))
                    .filter(reading_list_books::book_id.eq(book_key)),
            )
            .execute(conn)
        })
        .await?;

        if removed == 0 {
            return Err(DomainError::not_found("Book in reading list", book_id));
        }
        Ok(())
    }

    async fn contains_book(&self, list_id: Uuid, book_id: Uuid) -> Result<bool, DomainError> {
        let list_key = list_id.to_string();
        let book_key = book_id.to_string();

        run_blocking(&self.pool, move |conn| {
            diesel::select(exists(
                reading_list_books::table
                    .filter(reading_list_books::reading_list_id.eq(list_key))
                    .filter(reading_list_books::book_id.eq(book_key)),
            ))
            .get_result::<bool>(conn)
        })
        .await
    }
}
