//! Password reset tokens.
//!
//! The raw token only ever exists in the email. The table stores its SHA-256
//! so a database leak cannot be replayed into a reset.

use sha2::{Digest, Sha256};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::mailer::{Email, MailError, Mailer};
use super::password::{self, PasswordPolicy};
use super::session::{self, bytes_to_hex};
use super::users::{self, User, UserError};
use super::unix_now;

/// Reset tokens expire after one hour.
pub const RESET_TTL_SECS: i64 = 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum ResetError {
    #[error("user not found")]
    UserNotFound,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error(transparent)]
    User(#[from] UserError),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Mail(#[from] MailError),
}

#[must_use]
pub fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.trim().as_bytes()))
}

/// Issue a reset token for the account and mail it. Any earlier token is
/// replaced. Returns the expiry in unix seconds.
pub async fn start_reset(pool: &SqlitePool, mailer: &dyn Mailer, email: &str) -> Result<i64, ResetError> {
    let user = users::find_by_email(pool, email).await?.ok_or(ResetError::UserNotFound)?;

    let token = session::generate_token();
    let now = unix_now();
    let expires_at = now + RESET_TTL_SECS;

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r"INSERT INTO password_reset_tokens (id, user_id, token_hash, expires_at, created_at)
          VALUES (?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(&user.id)
    .bind(hash_token(&token))
    .bind(expires_at)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(email = %user.email, "password reset started");
    mailer.send(Email::password_reset_token(&user.email, &token)).await?;
    Ok(expires_at)
}

/// Consume a token and set the new password. Every session of the user is
/// revoked. The token is deleted in the same transaction that writes the
/// password, so concurrent requests with one token succeed at most once.
pub async fn finish_reset(
    pool: &SqlitePool,
    policy: &PasswordPolicy,
    mailer: &dyn Mailer,
    token: &str,
    new_password: &str,
) -> Result<User, ResetError> {
    let token_hash = hash_token(token);
    let user_id = sqlx::query_scalar::<_, String>(
        "SELECT user_id FROM password_reset_tokens WHERE token_hash = ? AND expires_at > ?",
    )
    .bind(&token_hash)
    .bind(unix_now())
    .fetch_optional(pool)
    .await?
    .ok_or(ResetError::InvalidToken)?;

    let user = users::find_by_id(pool, &user_id).await?.ok_or(ResetError::InvalidToken)?;
    if password::verify_password(new_password, &user.password_hash).await.map_err(UserError::from)? {
        return Err(UserError::ReusingPassword.into());
    }
    policy.vet(new_password).await.map_err(UserError::from)?;
    let password_hash = password::hash_password(new_password).await.map_err(UserError::from)?;

    let mut tx = pool.begin().await?;
    let consumed = sqlx::query_scalar::<_, String>(
        "DELETE FROM password_reset_tokens WHERE token_hash = ? AND expires_at > ? RETURNING user_id",
    )
    .bind(&token_hash)
    .bind(unix_now())
    .fetch_optional(&mut *tx)
    .await?;
    if consumed.as_deref() != Some(user.id.as_str()) {
        return Err(ResetError::InvalidToken);
    }
    sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(unix_now())
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM password_reset_tokens WHERE user_id = ?")
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    let revoked = session::delete_user_sessions(pool, &user.id).await?;
    tracing::info!(email = %user.email, revoked, "password reset");

    if let Err(e) = mailer.send(Email::password_reset_notice(&user.email)).await {
        tracing::warn!(error = %e, email = %user.email, "password reset notice failed");
    }
    Ok(user)
}

#[cfg(test)]
#[path = "password_reset_test.rs"]
mod tests;
