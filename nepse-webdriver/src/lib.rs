//! NEPSE WebDriver Client
//!
//! A small async client for the W3C WebDriver protocol, enough to drive a
//! headless browser through a JavaScript-rendered page and read back the
//! resulting markup. It talks to any WebDriver endpoint and can supervise a
//! local geckodriver process.
//!
//! # Example
//!
//! ```no_run
//! use nepse_webdriver::{Capabilities, WebDriverClient};
//!
//! # async fn example() -> nepse_webdriver::Result<()> {
//! let client = WebDriverClient::new("http://localhost:4444");
//! let session = client.new_session(Capabilities::firefox_headless()).await?;
//!
//! session.goto("https://example.com").await?;
//! let heading = session.find_xpath("//h1").await?;
//! println!("{:?}", session.property(&heading, "innerHTML").await?);
//!
//! session.quit().await?;
//! # Ok(())
//! # }
//! ```

mod capabilities;
mod driver;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod session;

// Re-export commonly used types
pub use capabilities::Capabilities;
pub use driver::{GeckoDriver, free_local_port};
pub use error::{Result, WebDriverError};
pub use session::{Element, Session};

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Special keys, as code points from the WebDriver key table
pub mod keys {
    pub const ENTER: &str = "\u{E007}";
}

/// HTTP client for a WebDriver endpoint
#[derive(Debug, Clone)]
pub struct WebDriverClient {
    /// Base URL of the driver (e.g., "http://localhost:4444")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl WebDriverClient {
    /// Create a new client for the driver at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new client with a custom HTTP client
    ///
    /// Use this to configure request timeouts, proxies and the like.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the driver
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether the driver accepts new sessions
    pub async fn status(&self) -> Result<bool> {
        let value: Value = self.send(Method::GET, "/status", None).await?;
        Ok(value.get("ready").and_then(Value::as_bool).unwrap_or(false))
    }

    /// Open a new browser session
    pub async fn new_session(&self, capabilities: Capabilities) -> Result<Session> {
        let value: Value = self
            .send(Method::POST, "/session", Some(capabilities.to_request()))
            .await?;

        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::MalformedResponse("missing sessionId".to_string()))?;

        tracing::debug!("Opened WebDriver session {}", session_id);

        Ok(Session::new(self.clone(), session_id.to_string()))
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Send a command and return the `value` member of the response
    ///
    /// Commands without a body still send `{}` for POST, which drivers
    /// require.
    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.request(method.clone(), &url);
        if method == Method::POST {
            request = request.json(&body.unwrap_or_else(|| Value::Object(Default::default())));
        }

        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Unwrap a W3C response envelope
    ///
    /// Failed commands carry `{"value": {"error", "message"}}`, which is
    /// turned into [`WebDriverError::Protocol`].
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let (error, message) = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| {
                    let value = body.get("value")?;
                    Some((
                        value.get("error")?.as_str()?.to_string(),
                        value
                            .get("message")
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    ))
                })
                .unwrap_or_else(|| ("unknown error".to_string(), text.clone()));
            return Err(WebDriverError::protocol(status.as_u16(), error, message));
        }

        let mut envelope: Value = serde_json::from_str(&text)
            .map_err(|e| WebDriverError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        let value = envelope
            .get_mut("value")
            .map(Value::take)
            .ok_or_else(|| WebDriverError::MalformedResponse("missing value".to_string()))?;

        serde_json::from_value(value)
            .map_err(|e| WebDriverError::MalformedResponse(format!("unexpected value: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = WebDriverClient::new("http://localhost:4444");
        assert_eq!(client.base_url(), "http://localhost:4444");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = WebDriverClient::new("http://localhost:4444/");
        assert_eq!(client.base_url(), "http://localhost:4444");
    }

    #[tokio::test]
    async fn test_status_reports_ready() {
        let server = mock::MockDriver::start().await;
        let client = WebDriverClient::new(server.url());

        assert!(client.status().await.unwrap());
    }

    #[tokio::test]
    async fn test_new_session_sends_capabilities() {
        let server = mock::MockDriver::start().await;
        let client = WebDriverClient::new(server.url());

        let session = client
            .new_session(Capabilities::firefox_headless())
            .await
            .unwrap();

        assert_eq!(session.id(), mock::SESSION_ID);
        let body = server.last_session_request().unwrap();
        assert_eq!(body["capabilities"]["alwaysMatch"]["browserName"], "firefox");
    }

    #[tokio::test]
    async fn test_unreachable_driver_is_request_error() {
        let port = free_local_port().unwrap();
        let client = WebDriverClient::new(format!("http://127.0.0.1:{}", port));

        let err = client.status().await.unwrap_err();
        assert!(matches!(err, WebDriverError::Request(_)));
    }
}
