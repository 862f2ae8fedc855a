use crate::browser::{
    options::build_capabilities,
    session::{BrowserLauncher, BrowserSession, DriverError},
};
use async_trait::async_trait;
use fantoccini::{error::CmdError, Client, ClientBuilder, Locator};
use scout_common::BrowserKind;
use scout_config::BrowserConfig;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Launches `fantoccini` sessions against the configured WebDriver endpoint.
///
/// Expects the matching driver binary (chromedriver, geckodriver,
/// safaridriver) to already be listening.
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    config: BrowserConfig,
}

impl WebDriverLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for WebDriverLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError> {
        let endpoint = self.config.webdriver_url().to_string();
        let caps = build_capabilities(&self.config, cfg!(target_os = "linux"));

        debug!(
            target: "browser.driver",
            browser = %self.config.kind,
            %endpoint,
            headless = self.config.headless,
            "driver.session.start"
        );

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&endpoint)
            .await
            .map_err(|e| DriverError::Connect {
                browser: self.config.kind.to_string(),
                endpoint: endpoint.clone(),
                message: e.to_string(),
            })?;

        Ok(Box::new(WebDriverSession::new(client, self.config.kind)))
    }
}

/// Thin wrapper around a `fantoccini` client that remembers whether it has
/// been closed.
pub struct WebDriverSession {
    client: Option<Client>,
    kind: BrowserKind,
}

impl WebDriverSession {
    pub fn new(client: Client, kind: BrowserKind) -> Self {
        Self {
            client: Some(client),
            kind,
        }
    }

    fn client(&self) -> Result<&Client, DriverError> {
        self.client.as_ref().ok_or(DriverError::Closed)
    }
}

fn command(err: CmdError) -> DriverError {
    DriverError::Command(err.to_string())
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn goto(&mut self, url: &str) -> Result<(), DriverError> {
        self.client()?.goto(url).await.map_err(command)
    }

    async fn wait_for_element(
        &mut self,
        css: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        match self
            .client()?
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(css))
            .await
        {
            Ok(_) => Ok(()),
            Err(CmdError::WaitTimeout) => Err(DriverError::Timeout {
                selector: css.to_string(),
                timeout,
            }),
            Err(e) => Err(command(e)),
        }
    }

    async fn execute(&mut self, script: &str) -> Result<Value, DriverError> {
        self.client()?
            .execute(script, vec![])
            .await
            .map_err(command)
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        self.client()?.source().await.map_err(command)
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        let client = self.client.take().ok_or(DriverError::Closed)?;
        debug!(target: "browser.driver", browser = %self.kind, "driver.session.close");
        client.close().await.map_err(command)
    }

    fn is_closed(&self) -> bool {
        self.client.is_none()
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        if self.client.is_some() {
            warn!(
                target: "browser.driver",
                browser = %self.kind,
                "driver.session.dropped_without_close"
            );
        }
    }
}
