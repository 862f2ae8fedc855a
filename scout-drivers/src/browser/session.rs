use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Script returning the live DOM's `<body>` markup.
pub const BODY_HTML_SCRIPT: &str = "return document.body.outerHTML;";

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("failed to start {browser} session at {endpoint}: {message}")]
    Connect {
        browser: String,
        endpoint: String,
        message: String,
    },

    #[error("webdriver command failed: {0}")]
    Command(String),

    #[error("timed out after {}s waiting for `{selector}`", timeout.as_secs())]
    Timeout { selector: String, timeout: Duration },

    #[error("browser session already closed")]
    Closed,

    #[error("unexpected script result: {0}")]
    ScriptResult(String),
}

/// One running browser instance, owned by a single fetch.
///
/// Every method after [`BrowserSession::close`] must fail with
/// [`DriverError::Closed`].
#[async_trait]
pub trait BrowserSession: Send {
    /// Navigate the current tab to `url`.
    async fn goto(&mut self, url: &str) -> Result<(), DriverError>;

    /// Block until an element matching `css` exists, or fail after `timeout`.
    async fn wait_for_element(&mut self, css: &str, timeout: Duration)
        -> Result<(), DriverError>;

    /// Run `script` in the page and return its JSON result.
    async fn execute(&mut self, script: &str) -> Result<Value, DriverError>;

    /// Full serialized source of the current page.
    async fn page_source(&mut self) -> Result<String, DriverError>;

    /// End the WebDriver session and release the browser process.
    async fn close(&mut self) -> Result<(), DriverError>;

    fn is_closed(&self) -> bool;

    /// `document.body.outerHTML` of the live DOM.
    async fn body_html(&mut self) -> Result<String, DriverError> {
        match self.execute(BODY_HTML_SCRIPT).await? {
            Value::String(html) => Ok(html),
            other => Err(DriverError::ScriptResult(format!(
                "expected body markup, got {other}"
            ))),
        }
    }
}

/// Opens fresh sessions; one call per fetch.
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError>;
}
