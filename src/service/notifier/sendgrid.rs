//! SendGrid v3 e-mail notifier

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::service::notifier::email;
use crate::service::notifier::{EmergencyNotification, EmergencyNotifier, NotifierError};

/// Everything the SendGrid notifier needs, resolved once at startup
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    pub api_key: Option<String>,
    /// Verified sender address
    pub from_email: Option<String>,
    pub base_url: String,
}

#[derive(Serialize)]
struct MailRequest<'a> {
    personalizations: Vec<Personalization<'a>>,
    from: Address<'a>,
    subject: String,
    content: Vec<Content>,
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: Vec<Address<'a>>,
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: &'static str,
    value: String,
}

/// Notifier sending an emergency e-mail through SendGrid
pub struct SendGridNotifier {
    client: Client,
    config: SendGridConfig,
}

impl SendGridNotifier {
    pub fn new(config: SendGridConfig) -> Self {
        if config.api_key.is_none() {
            tracing::warn!("SendGrid API key not configured; emergency e-mails will not be sent");
        }
        if config.from_email.is_none() {
            tracing::warn!("SendGrid sender not configured; emergency e-mails will not be sent");
        }

        Self {
            client: Client::new(),
            config,
        }
    }

    fn build_request<'a>(
        from: &'a str,
        notification: &EmergencyNotification<'a>,
    ) -> MailRequest<'a> {
        MailRequest {
            personalizations: vec![Personalization {
                to: vec![Address {
                    email: notification.to,
                }],
            }],
            from: Address { email: from },
            subject: email::subject(notification.user_name),
            content: vec![
                Content {
                    content_type: "text/plain",
                    value: email::text_body(notification),
                },
                Content {
                    content_type: "text/html",
                    value: email::html_body(notification),
                },
            ],
        }
    }
}

#[async_trait]
impl EmergencyNotifier for SendGridNotifier {
    async fn notify(
        &self,
        notification: &EmergencyNotification<'_>,
    ) -> Result<bool, NotifierError> {
        let (api_key, from) = match (&self.config.api_key, &self.config.from_email) {
            (Some(api_key), Some(from)) => (api_key, from),
            _ => {
                tracing::error!("SendGrid is not configured; cannot send emergency e-mail");
                return Ok(false);
            }
        };

        let url = format!("{}/mail/send", self.config.base_url.trim_end_matches('/'));
        let request = Self::build_request(from, notification);

        tracing::debug!(url = %url, "Sending emergency e-mail");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                body = %body,
                "SendGrid rejected the emergency e-mail"
            );
            return Ok(false);
        }

        tracing::info!(status = response.status().as_u16(), "Emergency e-mail accepted by SendGrid");
        Ok(true)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some() && self.config.from_email.is_some()
    }
}
