/*
 * Responsibility
 * - users テーブル向け操作 (UserRepo trait + Postgres 実装)
 * - email は一意。重複は RepoError::Conflict として返す
 * - passwordHash は repo の外 (DTO) には出さない
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::repos::error::{RepoError, RepoResult};

#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    #[sqlx(rename = "userId")]
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub firstname: String,
    #[sqlx(rename = "passwordHash")]
    pub password_hash: String,
    #[sqlx(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub username: String,
    pub firstname: String,
    pub password_hash: String,
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create(&self, user: &NewUser) -> RepoResult<UserRow>;

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>>;
}

#[derive(Debug, Clone)]
pub struct PgUserRepo {
    pool: PgPool,
}

impl PgUserRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepo for PgUserRepo {
    async fn create(&self, user: &NewUser) -> RepoResult<UserRow> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (email, username, firstname, "passwordHash")
            VALUES ($1, $2, $3, $4)
            RETURNING "userId", email, username, firstname, "passwordHash", "createdAt"
            "#,
        )
        .bind(&user.email)
        .bind(&user.username)
        .bind(&user.firstname)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(RepoError::from_sqlx)?;

        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT "userId", email, username, firstname, "passwordHash", "createdAt"
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
