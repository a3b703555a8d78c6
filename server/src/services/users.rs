//! User accounts: creation, lookup, login and password changes.

use sqlx::SqlitePool;
use uuid::Uuid;

use super::password::{self, PasswordError, PasswordPolicy};
use super::unix_now;

/// Row of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password_hash: String,
    pub email_verified: bool,
    pub last_login_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user already exists")]
    Exists,
    #[error("user not found")]
    NotFound,
    #[error("incorrect password")]
    IncorrectPassword,
    #[error("can't reuse current password")]
    ReusingPassword,
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Fields accepted at signup.
pub struct NewUser<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

const USER_COLUMNS: &str =
    "id, email, first_name, last_name, password_hash, email_verified, last_login_at, created_at, updated_at";

/// Emails are compared case-insensitively by storing them lower-cased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Vet the password, hash it and insert the user.
pub async fn create_user(pool: &SqlitePool, policy: &PasswordPolicy, new: NewUser<'_>) -> Result<User, UserError> {
    policy.vet(new.password).await?;
    let password_hash = password::hash_password(new.password).await?;

    let id = Uuid::new_v4().to_string();
    let email = normalize_email(new.email);
    let now = unix_now();

    let query = format!(
        "INSERT INTO users (id, email, first_name, last_name, password_hash, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)
         RETURNING {USER_COLUMNS}"
    );
    let result = sqlx::query_as::<_, User>(&query)
        .bind(&id)
        .bind(&email)
        .bind(non_empty(new.first_name))
        .bind(non_empty(new.last_name))
        .bind(&password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await;

    match result {
        Ok(user) => Ok(user),
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            tracing::info!(email = %email, "user already exists");
            Err(UserError::Exists)
        }
        Err(e) => Err(UserError::Db(e)),
    }
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ? LIMIT 1");
    sqlx::query_as::<_, User>(&query)
        .bind(normalize_email(email))
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
    let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ? LIMIT 1");
    sqlx::query_as::<_, User>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Check an email/password pair. Verification status is the caller's concern.
pub async fn authenticate(pool: &SqlitePool, email: &str, password: &str) -> Result<User, UserError> {
    let user = find_by_email(pool, email).await?.ok_or(UserError::NotFound)?;
    if !password::verify_password(password, &user.password_hash).await? {
        return Err(UserError::IncorrectPassword);
    }
    Ok(user)
}

pub async fn record_login(pool: &SqlitePool, user_id: &str, at: i64) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login_at = ?, updated_at = ? WHERE id = ?")
        .bind(at)
        .bind(at)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace a user's password. Rejects weak, breached and unchanged passwords.
pub async fn change_password(
    pool: &SqlitePool,
    policy: &PasswordPolicy,
    user: &User,
    new_password: &str,
) -> Result<(), UserError> {
    if password::verify_password(new_password, &user.password_hash).await? {
        return Err(UserError::ReusingPassword);
    }
    policy.vet(new_password).await?;
    let password_hash = password::hash_password(new_password).await?;

    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(unix_now())
        .bind(&user.id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
