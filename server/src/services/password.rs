//! Password hashing and strength policy.
//!
//! Hashes are argon2id PHC strings. New passwords must reach a zxcvbn score
//! of 3 and, when enabled, must not appear in the Have I Been Pwned corpus.
//! The breach lookup uses the k-anonymity range API so only a five-character
//! SHA-1 prefix leaves the process.

use std::time::Duration;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, SaltString};
use argon2::{Algorithm, Argon2, Params, PasswordHasher, PasswordVerifier, Version};
use sha1::{Digest, Sha1};

const MEMORY_KIB: u32 = 20 * 1024;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;
const KEY_LEN: usize = 32;
const MIN_SCORE: u8 = 3;
const PWNED_RANGE_URL: &str = "https://api.pwnedpasswords.com/range";
const BREACH_TIMEOUT_SECS: u64 = 5;
const BREACH_CONNECT_TIMEOUT_SECS: u64 = 3;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password is too weak")]
    Weak,
    #[error("password exposed in data breach")]
    Compromised,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("breach check failed: {0}")]
    BreachCheck(String),
    #[error("failed to build http client: {0}")]
    HttpClientBuild(String),
}

fn hasher() -> Result<Argon2<'static>, PasswordError> {
    let params = Params::new(MEMORY_KIB, ITERATIONS, PARALLELISM, Some(KEY_LEN))
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

fn hash_blocking(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?;
    Ok(hash.to_string())
}

fn verify_blocking(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(encoded).map_err(|e| PasswordError::Hash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Hash(e.to_string())),
    }
}

/// Run CPU-heavy password work off the async worker threads.
async fn blocking<T, F>(work: F) -> Result<T, PasswordError>
where
    F: FnOnce() -> Result<T, PasswordError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| PasswordError::Hash(e.to_string()))?
}

/// Hash a password into an argon2id PHC string with a random 16-byte salt.
pub async fn hash_password(password: &str) -> Result<String, PasswordError> {
    let password = password.to_owned();
    blocking(move || hash_blocking(&password)).await
}

/// Check a password against a stored PHC string. Parameters come from the
/// string itself.
pub async fn verify_password(password: &str, encoded: &str) -> Result<bool, PasswordError> {
    let (password, encoded) = (password.to_owned(), encoded.to_owned());
    blocking(move || verify_blocking(&password, &encoded)).await
}

#[must_use]
pub fn is_strong(password: &str) -> bool {
    u8::from(zxcvbn::zxcvbn(password, &[]).score()) >= MIN_SCORE
}

/// Upper-case hex SHA-1, split into the 5-char range prefix and the suffix.
#[must_use]
pub fn sha1_prefix_suffix(password: &str) -> (String, String) {
    let digest = Sha1::digest(password.as_bytes());
    let hex = super::session::bytes_to_hex(&digest).to_ascii_uppercase();
    let (prefix, suffix) = hex.split_at(5);
    (prefix.to_owned(), suffix.to_owned())
}

/// Whether a range response lists the suffix with a non-zero count. Padding
/// rows carry a count of zero.
#[must_use]
pub fn range_contains(body: &str, suffix: &str) -> bool {
    body.lines().any(|line| {
        let Some((candidate, count)) = line.trim().split_once(':') else {
            return false;
        };
        candidate.eq_ignore_ascii_case(suffix) && count.trim().parse::<u64>().is_ok_and(|n| n > 0)
    })
}

/// Strength and breach policy applied to every new password.
#[derive(Clone)]
pub struct PasswordPolicy {
    breach_check: Option<reqwest::Client>,
}

impl PasswordPolicy {
    /// Build the policy. The breach lookup client is bounded by request and
    /// connect timeouts.
    pub fn new(breach_check: bool) -> Result<Self, PasswordError> {
        if !breach_check {
            return Ok(Self { breach_check: None });
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(BREACH_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(BREACH_CONNECT_TIMEOUT_SECS))
            .build()
            .map_err(|e| PasswordError::HttpClientBuild(e.to_string()))?;
        Ok(Self { breach_check: Some(client) })
    }

    /// Reject weak or breached passwords.
    pub async fn vet(&self, password: &str) -> Result<(), PasswordError> {
        let candidate = password.to_owned();
        if !blocking(move || Ok(is_strong(&candidate))).await? {
            return Err(PasswordError::Weak);
        }
        if let Some(client) = &self.breach_check
            && is_breached(client, password).await?
        {
            return Err(PasswordError::Compromised);
        }
        Ok(())
    }
}

async fn is_breached(client: &reqwest::Client, password: &str) -> Result<bool, PasswordError> {
    let (prefix, suffix) = sha1_prefix_suffix(password);
    let body = client
        .get(format!("{PWNED_RANGE_URL}/{prefix}"))
        .header("Add-Padding", "true")
        .send()
        .await
        .and_then(reqwest::Response::error_for_status)
        .map_err(|e| PasswordError::BreachCheck(e.to_string()))?
        .text()
        .await
        .map_err(|e| PasswordError::BreachCheck(e.to_string()))?;
    Ok(range_contains(&body, &suffix))
}

#[cfg(test)]
#[path = "password_test.rs"]
mod tests;
