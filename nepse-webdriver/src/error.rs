//! Error types for the WebDriver client

use std::time::Duration;

use thiserror::Error;

/// Result type alias for WebDriver operations
pub type Result<T> = std::result::Result<T, WebDriverError>;

/// Errors that can occur while driving a browser
#[derive(Debug, Error)]
pub enum WebDriverError {
    /// HTTP request to the driver failed
    #[error("WebDriver request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The driver answered with a W3C error object
    #[error("WebDriver error (status {status}) {error}: {message}")]
    Protocol {
        /// HTTP status code
        status: u16,
        /// W3C error code, e.g. "no such element"
        error: String,
        /// Human readable message from the driver
        message: String,
    },

    /// The driver answered with a body we could not interpret
    #[error("Malformed WebDriver response: {0}")]
    MalformedResponse(String),

    /// The driver process could not be started or supervised
    #[error("Failed to run driver process: {0}")]
    Spawn(#[from] std::io::Error),

    /// The driver did not report ready in time
    #[error("Driver not ready after {0:?}")]
    NotReady(Duration),
}

impl WebDriverError {
    pub fn protocol(status: u16, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Protocol {
            status,
            error: error.into(),
            message: message.into(),
        }
    }

    /// Check if the driver could not locate an element
    pub fn is_no_such_element(&self) -> bool {
        matches!(self, Self::Protocol { error, .. } if error == "no such element")
    }
}
