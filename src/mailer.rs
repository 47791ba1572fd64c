//! Outgoing email through an HTTP mail relay.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected the message with status {0}")]
    Rejected(u16),
}

/// A single message handed to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError>;
}

/// Posts messages as JSON to the configured relay endpoint.
pub struct HttpMailer {
    http: reqwest::Client,
    relay_url: String,
    api_key: String,
}

impl HttpMailer {
    pub fn new(config: &MailConfig) -> Result<Self, MailerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            http,
            relay_url: config.relay_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
        let response = self
            .http
            .post(&self.relay_url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(MailerError::Rejected(status.as_u16()));
        }
        log::info!("Email \"{}\" sent to {}", email.subject, email.to);
        Ok(())
    }
}

/// Mailer keeping every message in memory, optionally refusing them all.
#[cfg(test)]
pub mod test {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::{Mailer, MailerError, OutgoingEmail};

    #[derive(Default)]
    pub struct RecordingMailer {
        pub sent: Mutex<Vec<OutgoingEmail>>,
        pub failing: bool,
    }

    impl RecordingMailer {
        pub fn failing() -> Self {
            Self {
                failing: true,
                ..Default::default()
            }
        }

        pub fn sent(&self) -> Vec<OutgoingEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), MailerError> {
            if self.failing {
                return Err(MailerError::Rejected(503));
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_headers_are_omitted() {
        let email = OutgoingEmail {
            from: "noreply@example.com".into(),
            to: "admin@example.com".into(),
            reply_to: None,
            subject: "Email Verification OTP".into(),
            text: "123456".into(),
            html: None,
        };

        let json = serde_json::to_value(&email).unwrap();

        assert!(json.get("reply_to").is_none());
        assert!(json.get("html").is_none());
        assert_eq!(json["subject"], "Email Verification OTP");
    }
}
