//! Page Fetcher: open a browser, read one URL, summarize it against a
//! question, close the browser.
//!
//! Every entry point returns a string-shaped result. Failures after the URL
//! check are logged and folded into `"Error processing the url {url}: {e}"`,
//! and any session that was opened is closed before returning.

use crate::arxiv::{ArxivRetriever, PaperRetriever};
use crate::content::ContentKind;
use crate::extract::{
    extract_hyperlinks, format_hyperlinks, html_to_text, normalize_whitespace, Hyperlink,
};
use crate::pdf::{HttpPdfLoader, PdfLoader};
use crate::pool::{PoolError, WorkerPool};
use crate::progress::{ProgressMessage, ProgressSink};
use async_trait::async_trait;
use futures::FutureExt;
use scout_config::{BrowserConfig, FetcherConfig};
use scout_drivers::{BrowserLauncher, BrowserSession, DriverError, WebDriverLauncher};
use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Injected into the page after extraction to mark agent activity.
pub const OVERLAY_SCRIPT: &str = include_str!("../assets/overlay.js");

pub const EMPTY_URL_MESSAGE: &str =
    "Website browsing request was cancelled because no URL was specified.";

/// Condenses extracted page text into an answer for `question`.
///
/// The live session is handed over in case the implementation wants to
/// interact with the page further; it must not close it.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        url: &str,
        text: &str,
        question: &str,
        session: &mut dyn BrowserSession,
    ) -> anyhow::Result<String>;
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Driver(#[from] DriverError),

    #[error("failed to extract {kind} content: {source:#}")]
    Extract {
        kind: &'static str,
        source: anyhow::Error,
    },

    #[error("summarization failed: {0:#}")]
    Summarize(anyhow::Error),

    #[error(transparent)]
    Pool(#[from] PoolError),

    #[error("failed to build http client: {0}")]
    Http(#[from] scout_http::HttpError),

    #[error("{stage} panicked: {message}")]
    Panicked {
        stage: &'static str,
        message: String,
    },

    #[error("failed to start runtime: {0}")]
    Runtime(String),
}

/// Result of the inline entry points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseOutcome {
    pub answer: String,
    pub links: Vec<Hyperlink>,
}

struct Collaborators {
    launcher: Arc<dyn BrowserLauncher>,
    summarizer: Arc<dyn Summarizer>,
    pdf: Arc<dyn PdfLoader>,
    papers: Arc<dyn PaperRetriever>,
    wait_timeout: Duration,
    max_links: usize,
}

#[derive(Clone)]
pub struct PageFetcher {
    inner: Arc<Collaborators>,
    pool: WorkerPool,
}

impl PageFetcher {
    /// WebDriver sessions, HTTP PDF download and arXiv retrieval wired from
    /// configuration.
    pub fn new(
        browser: &BrowserConfig,
        fetcher: &FetcherConfig,
        summarizer: Arc<dyn Summarizer>,
    ) -> Result<Self, FetchError> {
        let pdf = HttpPdfLoader::new(fetcher.http_timeout())?;
        let papers = ArxivRetriever::new(
            &fetcher.arxiv_base_url,
            fetcher.http_timeout(),
            fetcher.arxiv_max_chars,
        )?;
        Ok(Self::with_collaborators(
            Arc::new(WebDriverLauncher::new(browser.clone())),
            summarizer,
            Arc::new(pdf),
            Arc::new(papers),
            fetcher,
        ))
    }

    pub fn with_collaborators(
        launcher: Arc<dyn BrowserLauncher>,
        summarizer: Arc<dyn Summarizer>,
        pdf: Arc<dyn PdfLoader>,
        papers: Arc<dyn PaperRetriever>,
        fetcher: &FetcherConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Collaborators {
                launcher,
                summarizer,
                pdf,
                papers,
                wait_timeout: fetcher.wait_timeout(),
                max_links: fetcher.max_links,
            }),
            pool: WorkerPool::new(fetcher.workers),
        }
    }

    /// Share an existing pool instead of the one sized from configuration.
    pub fn with_pool(mut self, pool: WorkerPool) -> Self {
        self.pool = pool;
        self
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    /// Fetch, summarize and collect up to `max_links` outbound links, all on
    /// the caller's task.
    pub async fn browse(&self, url: &str, question: &str) -> BrowseOutcome {
        if url.is_empty() {
            return BrowseOutcome {
                answer: EMPTY_URL_MESSAGE.to_string(),
                links: Vec::new(),
            };
        }
        info!(target: "web.browse", %url, %question, "browse.start");

        let result = match self.inner.launcher.launch().await {
            Ok(mut session) => {
                let steps = self.inner.browse_in(session.as_mut(), url, question);
                let result = guarded("browse", steps).await.and_then(|r| r);
                release(session.as_mut(), url).await;
                result
            }
            Err(e) => Err(e.into()),
        };

        match result {
            Ok((summary, links)) => {
                info!(target: "web.browse", %url, links = links.len(), "browse.done");
                BrowseOutcome {
                    answer: format!("Answer gathered from website {url}: {summary}"),
                    links,
                }
            }
            Err(e) => BrowseOutcome {
                answer: failure(url, &e),
                links: Vec::new(),
            },
        }
    }

    /// [`PageFetcher::browse`] for synchronous callers.
    ///
    /// Drives a private current-thread runtime. Called from inside a Tokio
    /// runtime it returns an error answer without opening a session.
    pub fn browse_blocking(&self, url: &str, question: &str) -> BrowseOutcome {
        if tokio::runtime::Handle::try_current().is_ok() {
            return BrowseOutcome {
                answer: failure(
                    url,
                    &FetchError::Runtime(
                        "browse_blocking called from inside a Tokio runtime; use browse".into(),
                    ),
                ),
                links: Vec::new(),
            };
        }
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.browse(url, question)),
            Err(e) => BrowseOutcome {
                answer: failure(url, &FetchError::Runtime(e.to_string())),
                links: Vec::new(),
            },
        }
    }

    /// Fetch and summarize on the shared worker pool, reporting progress
    /// before and after.
    ///
    /// Navigation with extraction, the overlay and summarization are three
    /// pool submissions awaited in order.
    pub async fn browse_offloaded(
        &self,
        url: &str,
        question: &str,
        progress: &dyn ProgressSink,
    ) -> String {
        if url.is_empty() {
            return EMPTY_URL_MESSAGE.to_string();
        }
        info!(target: "web.browse", %url, %question, "browse.offloaded.start");
        notify(
            progress,
            format!("🔎 Browsing the {url} for relevant about: {question}..."),
        )
        .await;

        match self.offload(url, question).await {
            Ok(summary) => {
                notify(
                    progress,
                    format!("📝 Information gathered from url {url}: {summary}"),
                )
                .await;
                format!("Information gathered from url {url}: {summary}")
            }
            Err(e) => failure(url, &e),
        }
    }

    async fn offload(&self, url: &str, question: &str) -> Result<String, FetchError> {
        let inner = self.inner.clone();
        let target = url.to_string();
        let (mut session, text) = self
            .pool
            .run(async move {
                let mut session = match inner.launcher.launch().await {
                    Ok(session) => session,
                    Err(e) => return Err(FetchError::from(e)),
                };
                let extracted =
                    guarded("extract", inner.navigate_and_extract(session.as_mut(), &target))
                        .await
                        .and_then(|r| r);
                match extracted {
                    Ok(text) => Ok((session, text)),
                    Err(e) => {
                        release(session.as_mut(), &target).await;
                        Err(e)
                    }
                }
            })
            .await??;

        let (mut session, overlay) = self
            .pool
            .run(async move {
                let result = guarded("overlay", inject_overlay(session.as_mut()))
                    .await
                    .and_then(|r| r.map_err(FetchError::from));
                (session, result)
            })
            .await?;
        if let Err(e) = overlay {
            release(session.as_mut(), url).await;
            return Err(e);
        }

        let inner = self.inner.clone();
        let (target, question) = (url.to_string(), question.to_string());
        let (mut session, summary) = self
            .pool
            .run(async move {
                let summarize = inner
                    .summarizer
                    .summarize(&target, &text, &question, session.as_mut());
                let result = guarded("summarize", summarize)
                    .await
                    .and_then(|r| r.map_err(FetchError::Summarize));
                (session, result)
            })
            .await?;
        release(session.as_mut(), url).await;
        summary
    }
}

impl Collaborators {
    async fn browse_in(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
        question: &str,
    ) -> Result<(String, Vec<Hyperlink>), FetchError> {
        let text = self.navigate_and_extract(session, url).await?;
        inject_overlay(session).await?;
        let summary = self
            .summarizer
            .summarize(url, &text, question, session)
            .await
            .map_err(FetchError::Summarize)?;
        let links = self.scrape_links(session, url).await?;
        Ok((summary, links))
    }

    async fn navigate_and_extract(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<String, FetchError> {
        session.goto(url).await?;
        session.wait_for_element("body", self.wait_timeout).await?;

        let kind = ContentKind::classify(url);
        debug!(target: "web.browse", %url, kind = kind.as_str(), "browse.content.classified");
        let raw = match kind {
            ContentKind::Pdf => self
                .pdf
                .load_text(url)
                .await
                .map_err(|source| FetchError::Extract { kind: "pdf", source })?,
            ContentKind::Arxiv { id } => self
                .papers
                .fetch_text(&id)
                .await
                .map_err(|source| FetchError::Extract {
                    kind: "arxiv",
                    source,
                })?,
            ContentKind::Html => html_to_text(&session.body_html().await?),
        };

        let text = normalize_whitespace(&raw);
        debug!(target: "web.browse", %url, chars = text.len(), "browse.content.extracted");
        Ok(text)
    }

    async fn scrape_links(
        &self,
        session: &mut dyn BrowserSession,
        url: &str,
    ) -> Result<Vec<Hyperlink>, FetchError> {
        let source = session.page_source().await?;
        let mut links = format_hyperlinks(extract_hyperlinks(&source, url));
        links.truncate(self.max_links);
        Ok(links)
    }
}

/// Run one in-session step, turning a panic into [`FetchError::Panicked`] so
/// the caller still holds the session and can close it.
async fn guarded<F, T>(stage: &'static str, step: F) -> Result<T, FetchError>
where
    F: Future<Output = T>,
{
    AssertUnwindSafe(step)
        .catch_unwind()
        .await
        .map_err(|payload| FetchError::Panicked {
            stage,
            message: panic_message(payload.as_ref()),
        })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

async fn inject_overlay(session: &mut dyn BrowserSession) -> Result<(), DriverError> {
    session.execute(OVERLAY_SCRIPT).await.map(|_| ())
}

async fn release(session: &mut dyn BrowserSession, url: &str) {
    if session.is_closed() {
        return;
    }
    if let Err(e) = session.close().await {
        warn!(target: "web.browse", %url, error = %e, "browse.session.close_failed");
    }
}

async fn notify(progress: &dyn ProgressSink, output: String) {
    if let Err(e) = progress.send(ProgressMessage::logs(output)).await {
        warn!(target: "web.browse", error = %e, "browse.progress.send_failed");
    }
}

fn failure(url: &str, err: &FetchError) -> String {
    error!(target: "web.browse", %url, error = %err, "browse.failed");
    format!("Error processing the url {url}: {err}")
}
