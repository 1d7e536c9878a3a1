//! Browser session commands

use reqwest::Method;
use serde_json::{Value, json};

use crate::WebDriverClient;
use crate::error::{Result, WebDriverError};

/// Key under which W3C drivers return element references
pub const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// Reference to an element inside a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: String,
}

impl Element {
    pub fn id(&self) -> &str {
        &self.id
    }

    fn from_value(value: Value) -> Result<Self> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| Element { id: id.to_string() })
            .ok_or_else(|| WebDriverError::MalformedResponse("missing element reference".to_string()))
    }
}

/// An open browser session
///
/// Sessions hold a browser process on the driver side. Call [`Session::quit`]
/// when done, on every path.
#[derive(Debug)]
pub struct Session {
    client: WebDriverClient,
    id: String,
}

impl Session {
    pub(crate) fn new(client: WebDriverClient, id: String) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Navigate the current window to `url`
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.command(Method::POST, "/url", Some(json!({ "url": url })))
            .await
    }

    /// Find the first element matching an XPath expression
    pub async fn find_xpath(&self, xpath: &str) -> Result<Element> {
        let value: Value = self
            .client
            .send(
                Method::POST,
                &self.path("/element"),
                Some(locator(xpath)),
            )
            .await?;
        Element::from_value(value)
    }

    /// Find the first element under `parent` matching an XPath expression
    pub async fn find_child_xpath(&self, parent: &Element, xpath: &str) -> Result<Element> {
        let value: Value = self
            .client
            .send(
                Method::POST,
                &self.element_path(parent, "/element"),
                Some(locator(xpath)),
            )
            .await?;
        Element::from_value(value)
    }

    pub async fn clear(&self, element: &Element) -> Result<()> {
        self.element_command(element, "/clear", None).await
    }

    pub async fn click(&self, element: &Element) -> Result<()> {
        self.element_command(element, "/click", None).await
    }

    /// Type `text` into an element. Special keys come from [`crate::keys`].
    pub async fn send_keys(&self, element: &Element, text: &str) -> Result<()> {
        self.element_command(element, "/value", Some(json!({ "text": text })))
            .await
    }

    /// Read a DOM property such as `innerHTML`
    pub async fn property(&self, element: &Element, name: &str) -> Result<Option<String>> {
        let value: Value = self
            .client
            .send(
                Method::GET,
                &self.element_path(element, &format!("/property/{}", name)),
                None,
            )
            .await?;

        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    /// Pick the `<option>` of a `<select>` whose visible text equals `text`
    pub async fn select_by_visible_text(&self, select: &Element, text: &str) -> Result<()> {
        let xpath = format!(".//option[normalize-space(.) = {}]", xpath_literal(text));
        let option = self.find_child_xpath(select, &xpath).await?;
        self.click(&option).await
    }

    /// Close the session and its browser
    pub async fn quit(self) -> Result<()> {
        let _: Value = self
            .client
            .send(Method::DELETE, &format!("/session/{}", self.id), None)
            .await?;
        tracing::debug!("Closed WebDriver session {}", self.id);
        Ok(())
    }

    // =============================================================================
    // Helpers
    // =============================================================================

    fn path(&self, suffix: &str) -> String {
        format!("/session/{}{}", self.id, suffix)
    }

    fn element_path(&self, element: &Element, suffix: &str) -> String {
        self.path(&format!("/element/{}{}", element.id, suffix))
    }

    async fn command(&self, method: Method, suffix: &str, body: Option<Value>) -> Result<()> {
        let _: Value = self.client.send(method, &self.path(suffix), body).await?;
        Ok(())
    }

    async fn element_command(&self, element: &Element, suffix: &str, body: Option<Value>) -> Result<()> {
        let _: Value = self
            .client
            .send(Method::POST, &self.element_path(element, suffix), body)
            .await?;
        Ok(())
    }
}

fn locator(xpath: &str) -> Value {
    json!({ "using": "xpath", "value": xpath })
}

/// Quote a string for use inside an XPath expression
fn xpath_literal(text: &str) -> String {
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    let parts: Vec<String> = text.split('"').map(|p| format!("\"{}\"", p)).collect();
    format!("concat({})", parts.join(", '\"', "))
}
