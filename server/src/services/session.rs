//! Session token management.
//!
//! ARCHITECTURE
//! ============
//! Login issues an opaque random token stored server-side. It travels as the
//! `access_token` cookie or as a bearer token. Keeping sessions in the
//! database means logout and password reset can revoke them.

use std::fmt::Write;

use rand::Rng;
use sqlx::SqlitePool;

use super::unix_now;
use super::users::User;

/// Session lifetime: 24 hours.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &SqlitePool, user_id: &str) -> Result<String, sqlx::Error> {
    let token = generate_token();
    let now = unix_now();
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at, created_at) VALUES (?, ?, ?, ?)")
        .bind(&token)
        .bind(user_id)
        .bind(now + SESSION_TTL_SECS)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
pub async fn validate_session(pool: &SqlitePool, token: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        r"SELECT u.id, u.email, u.first_name, u.last_name, u.password_hash,
                 u.email_verified, u.last_login_at, u.created_at, u.updated_at
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          WHERE s.token = ? AND s.expires_at > ?",
    )
    .bind(token)
    .bind(unix_now())
    .fetch_optional(pool)
    .await
}

/// Delete a session by token.
pub async fn delete_session(pool: &SqlitePool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// Revoke every session of a user. Returns the number removed.
pub async fn delete_user_sessions(pool: &SqlitePool, user_id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
