#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use scout_common::observability::{LogConfig, LogFormat};
use scout_drivers::browser::session::BODY_HTML_SCRIPT;
use scout_drivers::{BrowserLauncher, BrowserSession, DriverError};
use scout_web::arxiv::PaperRetriever;
use scout_web::pdf::PdfLoader;
use scout_web::Summarizer;
use serde_json::Value;

static INIT_PATH: OnceLock<std::path::PathBuf> = OnceLock::new();

pub fn init_test_tracing() {
    let _ = INIT_PATH.get_or_init(|| {
        let config = LogConfig {
            app_name: "scout-tests",
            log_dir: Some(std::env::temp_dir().join("scout-tests")),
            emit_stderr: true,
            format: if std::env::var("SCOUT_LOG_FORMAT")
                .map(|raw| raw.trim().eq_ignore_ascii_case("json"))
                .unwrap_or(false)
            {
                LogFormat::Json
            } else {
                LogFormat::Text
            },
            default_filter: "debug",
        };

        scout_common::observability::init_logging(config).unwrap_or_default()
    });
}

/// What one fake browser saw. Shared between the session and the test.
#[derive(Debug, Default)]
pub struct SessionState {
    pub visited: Vec<String>,
    pub scripts: Vec<String>,
    pub closed: bool,
}

pub struct FakeSession {
    state: Arc<Mutex<SessionState>>,
    body_html: String,
    page_source: String,
    stall: bool,
    open: Arc<AtomicUsize>,
}

impl FakeSession {
    /// A second handle onto an existing session's state.
    pub fn attach(state: Arc<Mutex<SessionState>>) -> Self {
        Self {
            state,
            body_html: String::new(),
            page_source: String::new(),
            stall: false,
            open: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn ensure_open(&self) -> Result<(), DriverError> {
        if self.state.lock().unwrap().closed {
            Err(DriverError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.state.lock().unwrap().visited.push(url.to_string());
        Ok(())
    }

    async fn wait_for_element(&mut self, css: &str, timeout: Duration) -> Result<(), DriverError> {
        self.ensure_open()?;
        if self.stall {
            return Err(DriverError::Timeout {
                selector: css.to_string(),
                timeout,
            });
        }
        Ok(())
    }

    async fn execute(&mut self, script: &str) -> Result<Value, DriverError> {
        self.ensure_open()?;
        self.state.lock().unwrap().scripts.push(script.to_string());
        if script == BODY_HTML_SCRIPT {
            Ok(Value::String(self.body_html.clone()))
        } else {
            Ok(Value::Null)
        }
    }

    async fn page_source(&mut self) -> Result<String, DriverError> {
        self.ensure_open()?;
        Ok(self.page_source.clone())
    }

    async fn close(&mut self) -> Result<(), DriverError> {
        self.ensure_open()?;
        self.state.lock().unwrap().closed = true;
        self.open.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

/// Hands out [`FakeSession`]s serving fixed markup.
#[derive(Default)]
pub struct FakeLauncher {
    pub body_html: String,
    pub page_source: String,
    pub stall: bool,
    pub refuse: bool,
    pub launches: AtomicUsize,
    pub open: Arc<AtomicUsize>,
    pub sessions: Mutex<Vec<Arc<Mutex<SessionState>>>>,
}

impl FakeLauncher {
    pub fn serving(body_html: &str, page_source: &str) -> Self {
        Self {
            body_html: body_html.to_string(),
            page_source: page_source.to_string(),
            ..Self::default()
        }
    }

    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn session(&self, idx: usize) -> Arc<Mutex<SessionState>> {
        self.sessions.lock().unwrap()[idx].clone()
    }

    pub fn all_closed(&self) -> bool {
        self.sessions
            .lock()
            .unwrap()
            .iter()
            .all(|s| s.lock().unwrap().closed)
    }
}

#[async_trait]
impl BrowserLauncher for FakeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, DriverError> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.refuse {
            return Err(DriverError::Connect {
                browser: "chrome".into(),
                endpoint: "http://localhost:9515".into(),
                message: "connection refused".into(),
            });
        }
        let state = Arc::new(Mutex::new(SessionState::default()));
        self.sessions.lock().unwrap().push(state.clone());
        self.open.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeSession {
            state,
            body_html: self.body_html.clone(),
            page_source: self.page_source.clone(),
            stall: self.stall,
            open: self.open.clone(),
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCall {
    pub url: String,
    pub text: String,
    pub question: String,
    pub session_open: bool,
}

/// Echoes a fixed summary and records what it was asked.
#[derive(Default)]
pub struct FakeSummarizer {
    pub reply: String,
    pub fail: bool,
    pub panic_with: Option<&'static str>,
    pub delay: Option<Duration>,
    pub calls: Mutex<Vec<SummaryCall>>,
    pub running: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeSummarizer {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<SummaryCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Summarizer for FakeSummarizer {
    async fn summarize(
        &self,
        url: &str,
        text: &str,
        question: &str,
        session: &mut dyn BrowserSession,
    ) -> anyhow::Result<String> {
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(SummaryCall {
            url: url.to_string(),
            text: text.to_string(),
            question: question.to_string(),
            session_open: !session.is_closed(),
        });
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(msg) = self.panic_with {
            self.running.fetch_sub(1, Ordering::SeqCst);
            panic!("{msg}");
        }
        self.running.fetch_sub(1, Ordering::SeqCst);
        if self.fail {
            anyhow::bail!("model unavailable");
        }
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
pub struct FakePdf {
    pub urls: Mutex<Vec<String>>,
}

#[async_trait]
impl PdfLoader for FakePdf {
    async fn load_text(&self, url: &str) -> anyhow::Result<String> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok("  pdf page one  \n\n pdf page two ".to_string())
    }
}

#[derive(Default)]
pub struct FakePapers {
    pub ids: Mutex<Vec<String>>,
}

#[async_trait]
impl PaperRetriever for FakePapers {
    async fn fetch_text(&self, id: &str) -> anyhow::Result<String> {
        self.ids.lock().unwrap().push(id.to_string());
        Ok(format!("paper {id} abstract"))
    }
}
