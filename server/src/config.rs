//! Server configuration parsed from environment variables.
//!
//! `main` loads an optional `.env` file first; everything else is plain
//! process environment. Parsing goes through a lookup closure so tests can
//! feed values without touching the shared process environment.

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://urlsh.db?mode=rwc";
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_EMAIL_FROM: &str = "URL.sh <no-reply@url.sh>";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
    #[error("{0} is required unless DEBUG is set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Debug mode: log mailer, human-readable logs, breach check off by default.
    pub debug: bool,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    /// Resend API key. Required unless `debug`.
    pub resend_api_key: Option<String>,
    pub email_from: String,
    pub cookie_secure: bool,
    pub password_breach_check: bool,
}

impl Config {
    /// Build config from the process environment.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unparsable values or a missing
    /// `RESEND_API_KEY` outside debug mode.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let debug = parse_bool_var(&lookup, "DEBUG")?.unwrap_or(false);

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            None => DEFAULT_PORT,
        };

        let db_max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::Invalid { key: "DB_MAX_CONNECTIONS", value: raw }),
            },
            None => DEFAULT_DB_MAX_CONNECTIONS,
        };

        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());

        let resend_api_key = lookup("RESEND_API_KEY").filter(|v| !v.trim().is_empty());
        if !debug && resend_api_key.is_none() {
            return Err(ConfigError::Missing("RESEND_API_KEY"));
        }

        let email_from = lookup("EMAIL_FROM")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_EMAIL_FROM.to_owned());

        let cookie_secure = parse_bool_var(&lookup, "COOKIE_SECURE")?.unwrap_or(!debug);
        let password_breach_check = parse_bool_var(&lookup, "PASSWORD_BREACH_CHECK")?.unwrap_or(!debug);

        Ok(Self {
            debug,
            port,
            database_url,
            db_max_connections,
            resend_api_key,
            email_from,
            cookie_secure,
            password_breach_check,
        })
    }

    /// Listen address on all interfaces.
    #[must_use]
    pub fn address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Parse a boolean flag: `1/true/yes/on` or `0/false/no/off`, any case.
#[must_use]
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_bool_var<F>(lookup: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => parse_bool(&raw)
            .map(Some)
            .ok_or(ConfigError::Invalid { key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
