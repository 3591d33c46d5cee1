// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::error::Error as StdError;
use tracing::{debug, warn};

use crate::error::{GatewayError, Result};

/// Single-attempt JSON GET. Adapters only ever talk to upstream through this.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    async fn fetch_json(&self, url: &Url) -> Result<Value>;
}

/// [`JsonFetcher`] backed by `reqwest`. No timeout is configured, so a
/// stalled upstream is bounded only by the transport.
#[derive(Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl JsonFetcher for HttpFetcher {
    async fn fetch_json(&self, url: &Url) -> Result<Value> {
        let host = url.host_str().unwrap_or_default().to_string();
        debug!(%host, "Sending upstream request");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(network_error)?;

        let status = response.status();
        if !status.is_success() {
            // Body is still relayed as long as it is JSON
            warn!(%host, %status, "Upstream returned a non-success status");
        }

        let body = response.bytes().await.map_err(network_error)?;

        serde_json::from_slice(&body).map_err(|e| {
            warn!(%host, error = %e, "Upstream body is not valid JSON");
            GatewayError::Parse(e.to_string())
        })
    }
}

/// Flatten a transport error into its cause chain, without the request URL
/// (it carries the API key).
fn network_error(err: reqwest::Error) -> GatewayError {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    warn!(error = %message, "Upstream request failed");
    GatewayError::Network(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_json_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/quote")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"c":261.74,"h":263.31,"l":260.68}"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/quote", server.url())).unwrap();
        let value = HttpFetcher::new().fetch_json(&url).await.unwrap();

        assert_eq!(value, json!({"c": 261.74, "h": 263.31, "l": 260.68}));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_json_relays_error_status_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .with_status(401)
            .with_body(r#"{"error":"Invalid API key."}"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/quote", server.url())).unwrap();
        let value = HttpFetcher::new().fetch_json(&url).await.unwrap();

        assert_eq!(value, json!({"error": "Invalid API key."}));
    }

    #[tokio::test]
    async fn test_fetch_json_parse_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/quote")
            .with_status(200)
            .with_body("<html>Too Many Requests</html>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/quote", server.url())).unwrap();
        let err = HttpFetcher::new().fetch_json(&url).await.unwrap_err();

        assert!(matches!(err, GatewayError::Parse(_)));
        assert!(err.to_string().starts_with("JSONパースエラー: "));
    }

    #[tokio::test]
    async fn test_fetch_json_network_error() {
        // Nothing listens on port 1
        let url = Url::parse("http://127.0.0.1:1/quote?token=secret").unwrap();
        let err = HttpFetcher::new().fetch_json(&url).await.unwrap_err();

        assert!(matches!(err, GatewayError::Network(_)));
        let message = err.to_string();
        assert!(message.starts_with("ネットワークエラー: "));
        assert!(!message.contains("secret"));
    }
}
