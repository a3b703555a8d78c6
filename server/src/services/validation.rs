//! Request field validation.
//!
//! Rules chain per field and stop at the first failure, so each field reports
//! at most one message:
//!
//! ```ignore
//! let mut v = Validator::default();
//! v.field("email", &body.email).required().email();
//! v.field("password", &body.password).required().min_len(8).max_len(50).password();
//! v.finish()?;
//! ```

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn field<'v, 's>(&'v mut self, name: &'static str, value: &'s str) -> FieldCheck<'v, 's> {
        FieldCheck { validator: self, name, value, failed: false }
    }

    pub fn finish(self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() { Ok(()) } else { Err(self.errors) }
    }
}

pub struct FieldCheck<'v, 's> {
    validator: &'v mut Validator,
    name: &'static str,
    value: &'s str,
    failed: bool,
}

#[allow(clippy::return_self_not_must_use)]
impl FieldCheck<'_, '_> {
    fn check(mut self, ok: impl FnOnce(&str) -> bool, message: impl FnOnce(&str) -> String) -> Self {
        if !self.failed && !ok(self.value) {
            self.failed = true;
            self.validator.errors.push(FieldError { field: self.name, message: message(self.name) });
        }
        self
    }

    pub fn required(self) -> Self {
        self.check(|v| !v.trim().is_empty(), |n| format!("{n} is required"))
    }

    pub fn email(self) -> Self {
        self.check(is_email, |n| format!("{n} must be a valid email address"))
    }

    pub fn min_len(self, min: usize) -> Self {
        self.check(|v| v.chars().count() >= min, |n| format!("{n} must be at least {min} characters long"))
    }

    pub fn max_len(self, max: usize) -> Self {
        self.check(|v| v.chars().count() <= max, |n| format!("{n} must be at most {max} characters long"))
    }

    pub fn exact_len(self, len: usize) -> Self {
        self.check(|v| v.chars().count() == len, |n| format!("{n} must be {len} characters long"))
    }

    pub fn alphanumeric(self) -> Self {
        self.check(
            |v| v.chars().all(|c| c.is_ascii_alphanumeric()),
            |n| format!("{n} must be alphanumeric characters only"),
        )
    }

    pub fn password(self) -> Self {
        self.check(is_complex, |_| {
            "password should contain at least 1 uppercase, 1 lowercase, 1 number and 1 punctuation/symbol".to_owned()
        })
    }

    pub fn http_url(self) -> Self {
        self.check(|v| super::links::normalize_url(v).is_ok(), |n| format!("{n} must be a valid http(s) URL"))
    }
}

/// One `@`, a non-empty local part and a dotted domain, no whitespace.
#[must_use]
pub fn is_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..")
}

fn is_complex(value: &str) -> bool {
    let upper = value.chars().any(char::is_uppercase);
    let lower = value.chars().any(char::is_lowercase);
    let digit = value.chars().any(|c| c.is_ascii_digit());
    let symbol = value.chars().any(|c| !c.is_alphanumeric() && !c.is_whitespace());
    upper && lower && digit && symbol
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod tests;
