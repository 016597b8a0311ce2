use crate::database::{parse_id, reviews, run_blocking, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{BookReview, BookReviewRepository, DomainError};
use uuid::Uuid;

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct ReviewModel {
    id: String,
    book_id: String,
    user_id: String,
    review_text: String,
    rating: i32,
    created: NaiveDateTime,
    updated: Option<NaiveDateTime>,
    is_verified: bool,
}

impl TryFrom<ReviewModel> for BookReview {
    type Error = DomainError;

    fn try_from(model: ReviewModel) -> Result<Self, Self::Error> {
        Ok(BookReview::restore(
            parse_id(&model.id)?,
            parse_id(&model.book_id)?,
            parse_id(&model.user_id)?,
            model.review_text,
            model.rating,
            model.created.and_utc(),
            model.updated.map(|at| at.and_utc()),
            model.is_verified,
        ))
    }
}

impl From<&BookReview> for ReviewModel {
    fn from(review: &BookReview) -> Self {
        ReviewModel {
            id: review.id.to_string(),
            book_id: review.book_id.to_string(),
            user_id: review.user_id.to_string(),
            review_text: review.review_text.clone(),
            rating: review.rating,
            created: review.created.naive_utc(),
            updated: review.updated.map(|at| at.naive_utc()),
            is_verified: review.is_verified,
        }
    }
}

fn into_reviews(models: Vec<ReviewModel>) -> Result<Vec<BookReview>, DomainError> {
    models.into_iter().map(BookReview::try_from).collect()
}

pub struct SqliteBookReviewRepository {
    pool: SqlitePool,
}

impl SqliteBookReviewRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookReviewRepository for SqliteBookReviewRepository {
    async fn find_all(&self) -> Result<Vec<BookReview>, DomainError> {
        let result = run_blocking(&self.pool, |conn| {
            reviews::table
                .order(reviews::created.asc())
                .select(ReviewModel::as_select())
                .load::<ReviewModel>(conn)
        })
        .await?;

        into_reviews(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookReview>, DomainError> {
        let id = id.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            reviews::table
                .filter(reviews::id.eq(id))
                .select(ReviewModel::as_select())
                .first::<ReviewModel>(conn)
                .optional()
        })
        .await?;

        result.map(BookReview::try_from).transpose()
    }

    async fn find_by_book(&self, book_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        let book_id = book_id.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            reviews::table
                .filter(reviews::book_id.eq(book_id))
                .order(reviews::created.asc())
                .select(ReviewModel::as_select())
                .load::<ReviewModel>(conn)
        })
        .await?;

        into_reviews(result)
    }

    async fn find_by_user(&self, user_id: Uuid) -> Result<Vec<BookReview>, DomainError> {
        let user_id = user_id.to_string();
        let result = run_blocking(&self.pool, move |conn| {
            reviews::table
                .filter(reviews::user_id.eq(user_id))
                .order(reviews::created.asc())
                .select(ReviewModel::as_select())
                .load::<ReviewModel>(conn)
        })
        .await?;

        into_reviews(result)
    }

    async fn save(&self, review: &BookReview) -> Result<BookReview, DomainError> {
        let model = ReviewModel::from(review);

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(reviews::table)
                .values(&model)
                .execute(conn)
        })
        .await
        .map_err(|e| match e {
            DomainError::Conflict(_) => {
                DomainError::Conflict("User has already reviewed this book".to_string())
            }
            other => other,
        })?;

        Ok(review.clone())
    }

    async fn update(&self, review: &BookReview) -> Result<BookReview, DomainError> {
        let model = ReviewModel::from(review);

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(reviews::table.filter(reviews::id.eq(&model.id)))
                .set((
                    reviews::review_text.eq(&model.review_text),
                    reviews::rating.eq(model.rating),
                    reviews::updated.eq(model.updated),
                    reviews::is_verified.eq(model.is_verified),
                ))
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(DomainError::not_found("Review", review.id));
        }
        Ok(review.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let id = id.to_string();
        run_blocking(&self.pool, move |conn| {
            diesel::delete(reviews::table.filter(reviews::id.eq(id))).execute(conn)
        })
        .await?;

        Ok(())
    }
}
