use super::*;
use crate::services::users::{self, NewUser};
use crate::state::test_helpers::{STRONG_PASSWORD, test_pool, test_policy};

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// persistence
// =============================================================================

async fn seed_user(pool: &SqlitePool) -> User {
    users::create_user(
        pool,
        &test_policy(),
        NewUser { email: "sess@example.com", password: STRONG_PASSWORD, first_name: "", last_name: "" },
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn create_then_validate_returns_user() {
    let pool = test_pool().await;
    let user = seed_user(&pool).await;

    let token = create_session(&pool, &user.id).await.unwrap();
    let found = validate_session(&pool, &token).await.unwrap().unwrap();
    assert_eq!(found.id, user.id);
    assert_eq!(found.email, "sess@example.com");
}

#[tokio::test]
async fn validate_unknown_token_is_none() {
    let pool = test_pool().await;
    assert!(validate_session(&pool, "nope").await.unwrap().is_none());
}

#[tokio::test]
async fn expired_session_is_rejected() {
    let pool = test_pool().await;
    let user = seed_user(&pool).await;
    let token = create_session(&pool, &user.id).await.unwrap();

    sqlx::query("UPDATE sessions SET expires_at = ? WHERE token = ?")
        .bind(unix_now() - 1)
        .bind(&token)
        .execute(&pool)
        .await
        .unwrap();

    assert!(validate_session(&pool, &token).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_session_revokes_token() {
    let pool = test_pool().await;
    let user = seed_user(&pool).await;
    let token = create_session(&pool, &user.id).await.unwrap();

    delete_session(&pool, &token).await.unwrap();
    assert!(validate_session(&pool, &token).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_user_sessions_revokes_all() {
    let pool = test_pool().await;
    let user = seed_user(&pool).await;
    let a = create_session(&pool, &user.id).await.unwrap();
    let b = create_session(&pool, &user.id).await.unwrap();

    assert_eq!(delete_user_sessions(&pool, &user.id).await.unwrap(), 2);
    assert!(validate_session(&pool, &a).await.unwrap().is_none());
    assert!(validate_session(&pool, &b).await.unwrap().is_none());
}
