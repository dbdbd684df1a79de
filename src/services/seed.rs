//! Start-up seeding of the administrator account.

use crate::repos::error::RepoError;
use crate::repos::user_repo::{NewUser, UserRepo};
use crate::services::auth::password::{PasswordError, PasswordHasher};

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Create the admin user unless one with the same email already exists.
///
/// Returns `true` when a user was inserted.
pub async fn ensure_admin(
    users: &dyn UserRepo,
    passwords: &PasswordHasher,
    admin_identifier: &str,
    password: &str,
) -> Result<bool, SeedError> {
    if users.find_by_email(admin_identifier).await?.is_some() {
        return Ok(false);
    }

    let admin = NewUser {
        email: admin_identifier.to_string(),
        username: "admin".to_string(),
        firstname: "admin".to_string(),
        password_hash: passwords.hash(password)?,
    };

    match users.create(&admin).await {
        Ok(_) => Ok(true),
        // another instance won the race
        Err(RepoError::Conflict) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
