//! Push notifications.
//!
//! The pipeline reports every event through a [`Notifier`]. Delivery failures
//! are logged and swallowed: a lost push must never stop the pipeline.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{error, info};

use crate::config::PushoverCredentials;
use crate::error::NotifierError;

/// Pushover message endpoint.
pub const PUSHOVER_API_URL: &str = "https://api.pushover.net/1/messages.json";

/// Maximum message length accepted by Pushover, in characters.
pub const PUSHOVER_MAX_MESSAGE_LENGTH: usize = 1024;

/// Sends a one-line alert to the operator.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Provider name for logs (e.g. "pushover").
    fn name(&self) -> &str;

    /// Deliver `text`, returning the provider's response summary.
    async fn send(&self, text: &str) -> Result<String, NotifierError>;

    /// Deliver `text`, logging the outcome instead of returning it.
    async fn notify(&self, text: &str) {
        info!(notifier = self.name(), "Sending notification");
        match self.send(text).await {
            Ok(response) => info!(notifier = self.name(), "Notification sent. Response: {response}"),
            Err(e) => error!(notifier = self.name(), "Notification failed: {e}"),
        }
    }
}

/// Pushover's reply to a message post.
#[derive(Debug, Deserialize)]
struct PushoverResponse {
    status: i64,
    #[serde(default)]
    request: String,
    #[serde(default)]
    errors: Vec<String>,
}

/// Pushover notifier, authenticated with an application token and user key.
pub struct PushoverNotifier {
    credentials: PushoverCredentials,
    endpoint: String,
    client: reqwest::Client,
}

impl PushoverNotifier {
    pub fn new(credentials: PushoverCredentials) -> Self {
        Self {
            credentials,
            endpoint: PUSHOVER_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Post to a different endpoint (a local stand-in, for instance).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Use a preconfigured client.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    fn request_failed(&self, reason: impl ToString) -> NotifierError {
        NotifierError::RequestFailed {
            provider: self.name().to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    fn name(&self) -> &str {
        "pushover"
    }

    async fn send(&self, text: &str) -> Result<String, NotifierError> {
        let message = truncate_chars(text, PUSHOVER_MAX_MESSAGE_LENGTH);
        let form = [
            ("token", self.credentials.token.expose_secret()),
            ("user", self.credentials.user.expose_secret()),
            ("message", message),
        ];

        let resp = self
            .client
            .post(&self.endpoint)
            .form(&form)
            .send()
            .await
            .map_err(|e| self.request_failed(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.request_failed(e))?;

        let parsed: Option<PushoverResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(reply) if status.is_success() && reply.status == 1 => {
                Ok(format!("status={} request={}", reply.status, reply.request))
            }
            Some(reply) => Err(NotifierError::Rejected {
                provider: self.name().to_string(),
                status: status.as_u16(),
                reason: if reply.errors.is_empty() {
                    body
                } else {
                    reply.errors.join("; ")
                },
            }),
            None => Err(NotifierError::Rejected {
                provider: self.name().to_string(),
                status: status.as_u16(),
                reason: format!("unexpected response body: {body}"),
            }),
        }
    }
}

/// Longest prefix of `text` holding at most `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_text_untouched() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn truncate_on_char_boundary() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        let long = "ü".repeat(PUSHOVER_MAX_MESSAGE_LENGTH + 10);
        assert_eq!(
            truncate_chars(&long, PUSHOVER_MAX_MESSAGE_LENGTH).chars().count(),
            PUSHOVER_MAX_MESSAGE_LENGTH
        );
    }

    #[test]
    fn response_decodes_without_optional_fields() {
        let reply: PushoverResponse = serde_json::from_str(r#"{"status":1}"#).unwrap();
        assert_eq!(reply.status, 1);
        assert!(reply.request.is_empty());
        assert!(reply.errors.is_empty());
    }

    #[test]
    fn pushover_defaults_to_public_endpoint() {
        let notifier = PushoverNotifier::new(PushoverCredentials::new("t", "u"));
        assert_eq!(notifier.endpoint, PUSHOVER_API_URL);
        assert_eq!(notifier.name(), "pushover");
        let notifier = notifier.with_endpoint("http://127.0.0.1:9/1/messages.json");
        assert_eq!(notifier.endpoint, "http://127.0.0.1:9/1/messages.json");
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_a_request_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let notifier = PushoverNotifier::new(PushoverCredentials::new("t", "u"))
            .with_client(client)
            .with_endpoint(format!("http://127.0.0.1:{port}/1/messages.json"));
        let err = notifier.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifierError::RequestFailed { .. }));

        // notify() swallows the failure.
        notifier.notify("hello").await;
    }
}
