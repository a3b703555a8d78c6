//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the outbound mailer and the password policy.
//! Clone is required by Axum; every field is cheap to clone.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::services::mailer::Mailer;
use crate::services::password::PasswordPolicy;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub mailer: Arc<dyn Mailer>,
    pub passwords: PasswordPolicy,
    /// Set the `Secure` attribute on the session cookie.
    pub cookie_secure: bool,
}

impl AppState {
    #[must_use]
    pub fn new(pool: SqlitePool, mailer: Arc<dyn Mailer>, passwords: PasswordPolicy, cookie_secure: bool) -> Self {
        Self { pool, mailer, passwords, cookie_secure }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
