use crate::database::{parse_id, run_blocking, users, SqlitePool};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use domain::{DomainError, PasswordHash, User, UserRepository};
use uuid::Uuid;

// Database model - separate from domain entity
#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
struct UserModel {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: NaiveDateTime,
}

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User::restore(
            parse_id(&model.id)?,
            model.username,
            model.email,
            PasswordHash::parse(&model.password_hash)?,
            model.role.parse()?,
            model.created_at.and_utc(),
        ))
    }
}

impl From<&User> for UserModel {
    fn from(user: &User) -> Self {
        UserModel {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.encode(),
            role: user.role.to_string(),
            created_at: user.created_at.naive_utc(),
        }
    }
}

fn into_users(models: Vec<UserModel>) -> Result<Vec<User>, DomainError> {
    models.into_iter().map(User::try_from).collect()
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load(&self, id: String) -> Result<Option<User>, DomainError> {
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::id.eq(id))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await?;

        result.map(User::try_from).transpose()
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let result = run_blocking(&self.pool, |conn| {
            users::table
                .order(users::created_at.asc())
                .select(UserModel::as_select())
                .load::<UserModel>(conn)
        })
        .await?;

        into_users(result)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, DomainError> {
        self.load(id.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = User::normalize_email(email);
        let result = run_blocking(&self.pool, move |conn| {
            users::table
                .filter(users::email.eq(email))
                .select(UserModel::as_select())
                .first::<UserModel>(conn)
                .optional()
        })
        .await?;

        result.map(User::try_from).transpose()
    }

    async fn save(&self, user: &User) -> Result<User, DomainError> {
        let new_user = UserModel::from(user);
        let id = new_user.id.clone();

        run_blocking(&self.pool, move |conn| {
            diesel::insert_into(users::table)
                .values(&new_user)
                .execute(conn)
        })
        .await?;

        self.load(id.clone())
            .await?
            .ok_or_else(|| DomainError::RepositoryError(format!("User {} vanished after insert", id)))
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let model = UserModel::from(user);
        let id = model.id.clone();

        let updated = run_blocking(&self.pool, move |conn| {
            diesel::update(users::table.filter(users::id.eq(&model.id)))
                .set((
                    users::username.eq(&model.username),
                    users::email.eq(&model.email),
                    users::password_hash.eq(&model.password_hash),
                    users::role.eq(&model.role),
                ))
                .execute(conn)
        })
        .await?;

        if updated == 0 {
            return Err(DomainError::not_found("User", user.id));
        }
        self.load(id)
            .await?
            .ok_or(DomainError::not_found("User", user.id))
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let id = id.to_string();
        run_blocking(&self.pool, move |conn| {
            diesel::delete(users::table.filter(users::id.eq(id))).execute(conn)
        })
        .await?;

        Ok(())
    }
}
