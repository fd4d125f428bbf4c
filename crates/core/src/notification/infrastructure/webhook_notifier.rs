use serde::Serialize;
use thiserror::Error;

use crate::notification::domain::notification_sink::NotificationSink;

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("webhook url must not be empty")]
    MissingUrl,
    #[error("webhook post to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("webhook at {url} returned status {status}")]
    Status { url: String, status: u16 },
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    text: &'a str,
}

/// Posts `{"text": message}` to an incoming-webhook URL.
pub struct WebhookNotifier {
    client: reqwest::blocking::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>) -> Result<Self, NotifyError> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(NotifyError::MissingUrl);
        }
        Ok(Self {
            client: reqwest::blocking::Client::new(),
            url,
        })
    }

    fn send(&self, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.url)
            .json(&WebhookPayload { text: message })
            .send()
            .map_err(|e| NotifyError::Request {
                url: self.url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NotifyError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

impl NotificationSink for WebhookNotifier {
    fn post(&self, message: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        Ok(self.send(message)?)
    }
}
