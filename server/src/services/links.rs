//! Short links owned by users.

use rand::Rng;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::unix_now;

pub const SHORT_ID_LEN: usize = 7;
const SHORT_ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
const MAX_SHORT_ID_ATTEMPTS: usize = 5;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Link {
    pub id: String,
    pub user_id: String,
    pub original_url: String,
    pub short_id: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("invalid url")]
    InvalidUrl,
    #[error("could not allocate a unique short id")]
    ShortIdExhausted,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn generate_short_id() -> String {
    let mut rng = rand::rng();
    (0..SHORT_ID_LEN)
        .map(|_| SHORT_ID_ALPHABET[rng.random_range(0..SHORT_ID_ALPHABET.len())] as char)
        .collect()
}

#[must_use]
pub fn is_short_id(value: &str) -> bool {
    value.len() == SHORT_ID_LEN && value.bytes().all(|b| b.is_ascii_alphanumeric())
}

/// Parse an absolute http(s) URL with a host and return its serialized form.
pub fn normalize_url(raw: &str) -> Result<String, LinkError> {
    let parsed = url::Url::parse(raw.trim()).map_err(|_| LinkError::InvalidUrl)?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none_or(str::is_empty) {
        return Err(LinkError::InvalidUrl);
    }
    Ok(parsed.to_string())
}

/// Store a link under a fresh short id, retrying on collision.
pub async fn create_link(pool: &SqlitePool, user_id: &str, original_url: &str) -> Result<Link, LinkError> {
    let original_url = normalize_url(original_url)?;
    let now = unix_now();

    for attempt in 1..=MAX_SHORT_ID_ATTEMPTS {
        let result = sqlx::query_as::<_, Link>(
            r"INSERT INTO links (id, user_id, original_url, short_id, created_at, updated_at)
              VALUES (?, ?, ?, ?, ?, ?)
              RETURNING id, user_id, original_url, short_id, created_at, updated_at",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(user_id)
        .bind(&original_url)
        .bind(generate_short_id())
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await;

        match result {
            Ok(link) => {
                tracing::info!(user_id, short_id = %link.short_id, "link created");
                return Ok(link);
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                tracing::warn!(attempt, "short id collision");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Err(LinkError::ShortIdExhausted)
}

/// Links of a user, newest first.
pub async fn list_links(pool: &SqlitePool, user_id: &str) -> Result<Vec<Link>, sqlx::Error> {
    sqlx::query_as::<_, Link>(
        r"SELECT id, user_id, original_url, short_id, created_at, updated_at
          FROM links
          WHERE user_id = ?
          ORDER BY created_at DESC, rowid DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Target URL for a short id.
pub async fn resolve(pool: &SqlitePool, short_id: &str) -> Result<Option<String>, sqlx::Error> {
    if !is_short_id(short_id) {
        return Ok(None);
    }
    sqlx::query_scalar::<_, String>("SELECT original_url FROM links WHERE short_id = ?")
        .bind(short_id)
        .fetch_optional(pool)
        .await
}

#[cfg(test)]
#[path = "links_test.rs"]
mod tests;
