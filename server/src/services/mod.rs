//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own business logic and persistence concerns so route
//! handlers can stay focused on request decoding, status mapping and cookies.
//! Timestamps are stored as unix seconds.

pub mod email_verification;
pub mod links;
pub mod mailer;
pub mod password;
pub mod password_reset;
pub mod session;
pub mod users;
pub mod validation;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Current time in unix seconds.
#[must_use]
pub fn unix_now() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Format unix seconds as RFC 3339 (`1985-04-12T23:20:50Z`). Out-of-range
/// values format as an empty string.
#[must_use]
pub fn format_unix(ts: i64) -> String {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_default()
}
