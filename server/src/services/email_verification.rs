//! Email verification codes.
//!
//! Signup and unverified logins mail a short-lived eight-character code. A
//! user has at most one pending code; issuing a new one discards the rest.

use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::mailer::{Email, Mailer, MailError};
use super::unix_now;
use super::users::User;

pub const CODE_LEN: usize = 8;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Codes expire after 15 minutes.
pub const CODE_TTL_SECS: i64 = 15 * 60;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("code is invalid")]
    InvalidCode,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Mail(#[from] MailError),
}

#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[idx] as char
        })
        .collect()
}

/// Upper-case a submitted code. `None` when it cannot be a code we issued.
#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN || !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(normalized)
}

/// Replace any pending code for the user with a fresh one and mail it.
pub async fn start_verification(
    pool: &SqlitePool,
    mailer: &dyn Mailer,
    user_id: &str,
    email: &str,
) -> Result<(), VerificationError> {
    let code = generate_code();
    let now = unix_now();

    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM email_verifications WHERE user_id = ? AND verified_at IS NULL")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        r"INSERT INTO email_verifications (id, user_id, email, code, expires_at, created_at)
          VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(user_id)
    .bind(email)
    .bind(&code)
    .bind(now + CODE_TTL_SECS)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!(email, "created email verification");
    mailer.send(Email::verification_code(email, &code)).await?;
    Ok(())
}

/// Whether the user has completed a verification for this email.
pub async fn has_completed(pool: &SqlitePool, user_id: &str, email: &str) -> Result<bool, sqlx::Error> {
    let found = sqlx::query_scalar::<_, i64>(
        r"SELECT 1 FROM email_verifications
          WHERE user_id = ? AND email = ? AND verified_at IS NOT NULL
          LIMIT 1",
    )
    .bind(user_id)
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(found.is_some())
}

/// Consume a matching, unexpired code and mark the user verified.
pub async fn complete_verification(
    pool: &SqlitePool,
    mailer: &dyn Mailer,
    user: &User,
    code: &str,
) -> Result<(), VerificationError> {
    let code = normalize_code(code).ok_or(VerificationError::InvalidCode)?;
    let now = unix_now();

    let mut tx = pool.begin().await?;
    let consumed = sqlx::query_scalar::<_, String>(
        r"UPDATE email_verifications
          SET verified_at = ?
          WHERE user_id = ? AND email = ? AND code = ?
            AND verified_at IS NULL AND expires_at > ?
          RETURNING id",
    )
    .bind(now)
    .bind(&user.id)
    .bind(&user.email)
    .bind(&code)
    .bind(now)
    .fetch_optional(&mut *tx)
    .await?;

    if consumed.is_none() {
        return Err(VerificationError::InvalidCode);
    }

    sqlx::query("UPDATE users SET email_verified = 1, updated_at = ? WHERE id = ?")
        .bind(now)
        .bind(&user.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(email = %user.email, "email verified");
    if let Err(e) = mailer.send(Email::verification_complete(&user.email)).await {
        tracing::warn!(error = %e, email = %user.email, "verification confirmation email failed");
    }
    Ok(())
}

#[cfg(test)]
#[path = "email_verification_test.rs"]
mod tests;
