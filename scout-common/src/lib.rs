//! Common types and utilities shared across Scout crates.
//!
//! This crate is deliberately small so every other crate can depend on it
//! without pulling in the browser or HTTP stacks.
//!
//! # Overview
//!
//! - [`BrowserKind`]: which WebDriver-backed browser a fetch runs in
//! - [`DEFAULT_USER_AGENT`]: the fixed user-agent presented by every session
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`ScoutError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use scout_common::BrowserKind;
//!
//! let kind: BrowserKind = "firefox".parse().unwrap();
//! assert_eq!(kind, BrowserKind::Firefox);
//! assert!("netscape".parse::<BrowserKind>().is_err());
//! ```
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod observability;

/// User agent sent by every automated browser session unless configured otherwise.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_4) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/83.0.4103.97 Safari/537.36";

/// Browser variant driven through WebDriver.
///
/// Configuration accepts the same names as [`FromStr`], so `chromium` maps to
/// [`BrowserKind::Chrome`] and unknown names fail the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BrowserKind {
    /// Chrome or Chromium through chromedriver.
    #[default]
    Chrome,
    /// Firefox through geckodriver.
    Firefox,
    /// Safari through safaridriver (macOS only).
    Safari,
}

impl BrowserKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Safari => "safari",
        }
    }

    /// Where the matching driver binary listens when started with its defaults.
    pub fn default_webdriver_url(&self) -> &'static str {
        match self {
            Self::Chrome => "http://localhost:9515",
            Self::Firefox => "http://localhost:4444",
            Self::Safari => "http://localhost:4445",
        }
    }
}

impl fmt::Display for BrowserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BrowserKind {
    type Err = ScoutError;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "chrome" | "chromium" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "safari" => Ok(Self::Safari),
            other => Err(ScoutError::Config(format!(
                "unsupported browser `{other}`; expected chrome, firefox, or safari"
            ))),
        }
    }
}

impl TryFrom<String> for BrowserKind {
    type Error = ScoutError;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

impl From<BrowserKind> for String {
    fn from(kind: BrowserKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Error types used across the Scout system.
#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`ScoutError`].
pub type Result<T> = std::result::Result<T, ScoutError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browser_names_case_insensitively() {
        assert_eq!("Chrome".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!("chromium".parse::<BrowserKind>().unwrap(), BrowserKind::Chrome);
        assert_eq!(" SAFARI ".parse::<BrowserKind>().unwrap(), BrowserKind::Safari);
    }

    #[test]
    fn unknown_browser_is_a_config_error() {
        let err = "opera".parse::<BrowserKind>().unwrap_err();
        assert!(matches!(err, ScoutError::Config(ref msg) if msg.contains("opera")));
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&BrowserKind::Firefox).unwrap();
        assert_eq!(json, "\"firefox\"");
        let back: BrowserKind = serde_json::from_str("\"Chromium\"").unwrap();
        assert_eq!(back, BrowserKind::Chrome);
        assert!(serde_json::from_str::<BrowserKind>("\"opera\"").is_err());
    }
}
