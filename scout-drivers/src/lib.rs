//! Driver layer for browser automation.
//!
//! This crate owns everything that talks WebDriver so the fetcher above it
//! only sees a small session trait.
//!
//! - [`browser::session::BrowserSession`] / [`browser::session::BrowserLauncher`]:
//!   the seam the page fetcher is written against
//! - [`browser::driver::WebDriverLauncher`]: `fantoccini`-backed implementation
//! - [`browser::options`]: per-browser capability building (headless, user
//!   agent, sandbox flags)
pub mod browser;

pub use browser::driver::{WebDriverLauncher, WebDriverSession};
pub use browser::session::{BrowserLauncher, BrowserSession, DriverError};
