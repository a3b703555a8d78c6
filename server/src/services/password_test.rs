use super::*;

const STRONG: &str = "Vq7#mZp2!LxR9w";

// =============================================================================
// hashing
// =============================================================================

#[tokio::test]
async fn hash_is_argon2id_phc_string() {
    let hash = hash_password(STRONG).await.unwrap();
    assert!(hash.starts_with("$argon2id$v=19$m=20480,t=2,p=1$"));
}

#[tokio::test]
async fn hash_uses_fresh_salt() {
    assert_ne!(hash_password(STRONG).await.unwrap(), hash_password(STRONG).await.unwrap());
}

#[tokio::test]
async fn verify_accepts_matching_password() {
    let hash = hash_password(STRONG).await.unwrap();
    assert!(verify_password(STRONG, &hash).await.unwrap());
}

#[tokio::test]
async fn verify_rejects_other_password() {
    let hash = hash_password(STRONG).await.unwrap();
    assert!(!verify_password("Vq7#mZp2!LxR9x", &hash).await.unwrap());
}

#[tokio::test]
async fn verify_errors_on_malformed_hash() {
    assert!(matches!(verify_password(STRONG, "not-a-hash").await, Err(PasswordError::Hash(_))));
}

// =============================================================================
// strength
// =============================================================================

#[test]
fn common_passwords_are_weak() {
    assert!(!is_strong("password"));
    assert!(!is_strong("12345678"));
    assert!(!is_strong(""));
}

#[test]
fn random_mixed_password_is_strong() {
    assert!(is_strong(STRONG));
}

#[tokio::test]
async fn vet_rejects_weak_password() {
    let policy = PasswordPolicy::new(false).unwrap();
    assert!(matches!(policy.vet("password").await, Err(PasswordError::Weak)));
}

#[tokio::test]
async fn vet_accepts_strong_password_without_breach_check() {
    PasswordPolicy::new(false).unwrap().vet(STRONG).await.unwrap();
}

// =============================================================================
// breach range parsing
// =============================================================================

#[test]
fn sha1_prefix_suffix_splits_upper_hex() {
    let (prefix, suffix) = sha1_prefix_suffix("password");
    assert_eq!(prefix, "5BAA6");
    assert_eq!(suffix, "1E4C9B93F3F0682250B6CF8331B7EE68FD8");
}

#[test]
fn range_contains_matches_suffix_with_count() {
    let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n1E4C9B93F3F0682250B6CF8331B7EE68FD8:9545824\r\n";
    assert!(range_contains(body, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
}

#[test]
fn range_contains_ignores_padding_rows() {
    let body = "1E4C9B93F3F0682250B6CF8331B7EE68FD8:0\r\n";
    assert!(!range_contains(body, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
}

#[test]
fn range_contains_misses_absent_suffix() {
    let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n";
    assert!(!range_contains(body, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
    assert!(!range_contains("", "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
}

#[test]
fn breach_check_policy_builds_bounded_client() {
    let policy = PasswordPolicy::new(true).unwrap();
    assert!(policy.breach_check.is_some());
    assert!(PasswordPolicy::new(false).unwrap().breach_check.is_none());
}
