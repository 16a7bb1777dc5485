//! Page fetcher — a plain GET is what accepts the invitation.

use async_trait::async_trait;
use tracing::debug;

use crate::error::AcceptError;

/// Fetches a page body.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET `url`, following redirects, and return the body text.
    ///
    /// The status code is not checked: the provider answers 200 both for a
    /// fresh acceptance and for an already-accepted invitation.
    async fn fetch(&self, url: &str) -> Result<String, AcceptError>;
}

/// `reqwest`-backed fetcher. No timeout and no retry.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured client (custom resolver, proxy, ...).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, AcceptError> {
        let resp = self.client.get(url).send().await?;
        debug!(status = %resp.status(), final_url = %resp.url(), "Fetched confirmation page");
        Ok(resp.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher() -> HttpFetcher {
        HttpFetcher::with_client(reqwest::Client::builder().no_proxy().build().unwrap())
    }

    #[tokio::test]
    async fn transport_failure_is_a_fetch_error() {
        // Bind then drop to get a port nobody listens on.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let err = fetcher()
            .fetch(&format!("http://127.0.0.1:{port}/accept"))
            .await
            .unwrap_err();
        assert!(matches!(err, AcceptError::Fetch(_)));
        assert!(!err.to_string().is_empty());
    }

    #[tokio::test]
    async fn invalid_url_is_a_fetch_error() {
        let err = fetcher().fetch("not a url").await.unwrap_err();
        assert!(matches!(err, AcceptError::Fetch(_)));
    }
}
