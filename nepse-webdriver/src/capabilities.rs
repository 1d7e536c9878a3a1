//! Session capabilities

use serde::Serialize;
use serde_json::{Value, json};

/// Capabilities requested when opening a session
///
/// Serialized as the W3C `alwaysMatch` object.
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities(serde_json::Map<String, Value>);

impl Capabilities {
    pub fn new() -> Self {
        Self(serde_json::Map::new())
    }

    /// Firefox without a display
    pub fn firefox_headless() -> Self {
        Self::new()
            .with("browserName", json!("firefox"))
            .with("moz:firefoxOptions", json!({ "args": ["-headless"] }))
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Body of a `POST /session` request
    pub(crate) fn to_request(&self) -> Value {
        json!({ "capabilities": { "alwaysMatch": self.0 } })
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_firefox_headless_request() {
        let body = Capabilities::firefox_headless().to_request();
        let always = &body["capabilities"]["alwaysMatch"];

        assert_eq!(always["browserName"], "firefox");
        assert_eq!(always["moz:firefoxOptions"]["args"][0], "-headless");
    }
}
