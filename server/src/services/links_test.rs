use super::*;
use crate::services::users::{self, NewUser};
use crate::state::test_helpers::{STRONG_PASSWORD, test_policy, test_pool};

#[test]
fn generate_short_id_shape() {
    let id = generate_short_id();
    assert_eq!(id.len(), SHORT_ID_LEN);
    assert!(is_short_id(&id));
}

#[test]
fn is_short_id_rejects_other_shapes() {
    assert!(!is_short_id("abc"));
    assert!(!is_short_id("abcdefgh"));
    assert!(!is_short_id("abc-efg"));
}

#[test]
fn normalize_url_accepts_http_and_https() {
    assert_eq!(normalize_url("https://example.com").unwrap(), "https://example.com/");
    assert_eq!(normalize_url(" http://example.com/a?b=1 ").unwrap(), "http://example.com/a?b=1");
}

#[test]
fn normalize_url_rejects_other_inputs() {
    for raw in ["", "example.com", "ftp://example.com", "mailto:a@example.com", "javascript:alert(1)"] {
        assert!(matches!(normalize_url(raw), Err(LinkError::InvalidUrl)), "{raw}");
    }
}

async fn seed_user(pool: &SqlitePool, email: &str) -> String {
    users::create_user(
        pool,
        &test_policy(),
        NewUser { email, password: STRONG_PASSWORD, first_name: "Ada", last_name: "Lovelace" },
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn create_and_resolve() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "links@example.com").await;

    let link = create_link(&pool, &user_id, "https://example.com/page").await.unwrap();
    assert!(is_short_id(&link.short_id));
    assert_eq!(link.original_url, "https://example.com/page");
    assert_eq!(resolve(&pool, &link.short_id).await.unwrap().as_deref(), Some("https://example.com/page"));
}

#[tokio::test]
async fn resolve_unknown_is_none() {
    let pool = test_pool().await;
    assert!(resolve(&pool, "zzzzzzz").await.unwrap().is_none());
    assert!(resolve(&pool, "bad id").await.unwrap().is_none());
}

#[tokio::test]
async fn list_is_scoped_and_newest_first() {
    let pool = test_pool().await;
    let alice = seed_user(&pool, "alice@example.com").await;
    let bob = seed_user(&pool, "bob@example.com").await;

    let first = create_link(&pool, &alice, "https://one.example.com").await.unwrap();
    let second = create_link(&pool, &alice, "https://two.example.com").await.unwrap();
    create_link(&pool, &bob, "https://bob.example.com").await.unwrap();

    let links = list_links(&pool, &alice).await.unwrap();
    let ids: Vec<_> = links.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);
}

#[tokio::test]
async fn create_rejects_invalid_url() {
    let pool = test_pool().await;
    let user_id = seed_user(&pool, "bad@example.com").await;
    assert!(matches!(create_link(&pool, &user_id, "not a url").await, Err(LinkError::InvalidUrl)));
}
