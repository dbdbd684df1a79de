/*
 * Responsibility
 * - Users の request/response DTO
 * - password は request のみ。response には出さない
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::UserRow;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub username: String,
    pub firstname: String,
    pub password: String,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("email is required");
        }
        if let Some((local, domain)) = email.split_once('@') {
            if local.is_empty() || domain.is_empty() || email.contains(char::is_whitespace) {
                return Err("email is invalid");
            }
        } else {
            return Err("email is invalid");
        }
        if self.username.trim().is_empty() {
            return Err("username is required");
        }
        if self.firstname.trim().is_empty() {
            return Err("firstname is required");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err("password must be at least 8 characters");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub firstname: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            username: row.username,
            firstname: row.firstname,
            created_at: row.created_at,
        }
    }
}
