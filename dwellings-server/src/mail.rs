//! Outbound e-mail
//!
//! [`ResendMailer`] posts to the Resend API; [`LogMailer`] only logs, for
//! development setups without an API key.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("mail provider rejected the message ({status}): {body}")]
    Rejected {
        status: u16,
        body: serde_json::Value,
    },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Writes e-mails to the log instead of sending them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            bytes = email.html.len(),
            "E-mail not sent (no mail provider configured)"
        );
        Ok(())
    }
}

/// Resend API client
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        let body: serde_json::Value = response.json().await.unwrap_or(serde_json::Value::Null);
        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        tracing::info!(to = %email.to, response = %body, "E-mail sent");
        Ok(())
    }
}

/// Escape text for inclusion in an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"Tom\" & Jerry's</b>"), "&lt;b&gt;&quot;Tom&quot; &amp; Jerry&#39;s&lt;/b&gt;");
    }

    #[test]
    fn test_email_wire_shape() {
        let email = Email {
            from: "a@x".into(),
            to: "b@x".into(),
            reply_to: None,
            subject: "Hi".into(),
            html: "<p>Hi</p>".into(),
        };
        let value = serde_json::to_value(&email).unwrap();
        assert!(value.get("reply_to").is_none());
        assert_eq!(value["subject"], "Hi");
    }

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let email = Email {
            from: "a@x".into(),
            to: "b@x".into(),
            reply_to: Some("c@x".into()),
            subject: "Hi".into(),
            html: String::new(),
        };
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
