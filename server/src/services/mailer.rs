//! Outbound email.
//!
//! Routes and services depend on the [`Mailer`] trait. Production uses
//! [`ResendMailer`]; debug runs log messages instead of sending them.

use async_trait::async_trait;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;

const EMAIL_TEMPLATE: &str = include_str!("../../templates/email.html");

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("email delivery failed: {0}")]
    Delivery(String),
}

/// A plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Email {
    #[must_use]
    pub fn verification_code(to: &str, code: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Verify your Account".to_owned(),
            body: format!("Your verification code is: {code}"),
        }
    }

    #[must_use]
    pub fn verification_complete(to: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Email verification successful".to_owned(),
            body: "Your email has been successfully verified".to_owned(),
        }
    }

    #[must_use]
    pub fn password_reset_token(to: &str, token: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Reset your password".to_owned(),
            body: format!("Your reset token is {token}"),
        }
    }

    #[must_use]
    pub fn password_reset_notice(to: &str) -> Self {
        Self {
            to: to.to_owned(),
            subject: "Password reset".to_owned(),
            body: "Your password has been reset. Contact support if it wasn't you.".to_owned(),
        }
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Sends through the Resend API.
pub struct ResendMailer {
    client: Resend,
    from: String,
}

impl ResendMailer {
    #[must_use]
    pub fn new(api_key: &str, from: &str) -> Self {
        Self { client: Resend::new(api_key), from: from.to_owned() }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let html = render_template(&email);
        let options = CreateEmailBaseOptions::new(&self.from, [email.to.as_str()], &email.subject).with_html(&html);
        self.client
            .emails
            .send(options)
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;
        tracing::debug!(to = %email.to, subject = %email.subject, "email sent");
        Ok(())
    }
}

/// Writes messages to the log. Used in debug mode.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, body = %email.body, "email (not sent)");
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[must_use]
pub fn render_template(email: &Email) -> String {
    EMAIL_TEMPLATE
        .replace("{{SUBJECT}}", &escape_html(&email.subject))
        .replace("{{BODY}}", &escape_html(&email.body))
}

#[cfg(test)]
#[path = "mailer_test.rs"]
mod tests;
