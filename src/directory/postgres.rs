use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use uuid::Uuid;

use super::{NewUser, UserDirectory};
use crate::error::AppError;
use crate::models::{Role, User};

/// Production directory backed by the `users` table.
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Private row shape: the key stays a UUID in the database and is exposed
// outward only in string form.
#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    role: String,
}

impl UserRow {
    fn into_user(self) -> Result<User, AppError> {
        let role = Role::from_str(&self.role).map_err(AppError::Unexpected)?;
        Ok(User {
            id: self.id.to_string(),
            username: self.username,
            password_hash: self.password_hash,
            role,
        })
    }
}

fn parse_key(id: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id).map_err(|_| AppError::InvalidIdentifier)
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO users (id, username, password_hash, role)
             VALUES ($1, $2, $3, $4)
             RETURNING id, username, password_hash, role",
        )
        .bind(Uuid::new_v4())
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.role.as_str())
        .fetch_one(&self.pool)
        .await?;

        row.into_user()
    }

    async fn get_by_username(&self, username: &str) -> Result<User, AppError> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?
        .into_user()
    }

    async fn get_by_id(&self, id: &str) -> Result<User, AppError> {
        let key = parse_key(id)?;

        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE id = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?
        .into_user()
    }

    async fn update_role_to_admin(&self, id: &str) -> Result<(), AppError> {
        let key = parse_key(id)?;

        let result = sqlx::query("UPDATE users SET role = $1 WHERE id = $2")
            .bind(Role::Admin.as_str())
            .bind(key)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    async fn count(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn username_exists(&self, username: &str) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE username = $1)")
                .bind(username)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }
}
