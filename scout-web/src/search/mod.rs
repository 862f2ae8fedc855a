//! Search Client: one configured provider, one request per call, results
//! normalized to `{title, href, body}`.
//!
//! ```no_run
//! # async fn demo() -> Result<(), scout_web::search::SearchError> {
//! use scout_config::SearchConfig;
//! use scout_web::search::{WebSearch, DEFAULT_NUM_RESULTS};
//!
//! let search = WebSearch::from_config(&SearchConfig::default())?;
//! let json = search.search("rust async runtimes", DEFAULT_NUM_RESULTS).await;
//! println!("{json}");
//! # Ok(()) }
//! ```

pub mod duckduckgo;
pub mod google;
pub mod searx;
pub mod serper;
pub mod tavily;

use scout_config::SearchConfig;
use scout_http::HttpError;
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;

pub use duckduckgo::DuckDuckGoClient;
pub use google::GoogleCseClient;
pub use searx::SearxClient;
pub use serper::SerperClient;
pub use tavily::TavilyClient;

pub const DEFAULT_NUM_RESULTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub href: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{provider} search failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: HttpError,
    },

    #[error("failed to encode results: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SearchError {
    pub(crate) fn http(provider: &'static str) -> impl FnOnce(HttpError) -> Self {
        move |source| SearchError::Http { provider, source }
    }
}

/// The provider selected at configuration time.
pub enum SearchBackend {
    Tavily(TavilyClient),
    Serper(SerperClient),
    GoogleCse(GoogleCseClient),
    Searx(SearxClient),
    DuckDuckGo(DuckDuckGoClient),
}

impl SearchBackend {
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(match config {
            SearchConfig::Tavily { api_key, endpoint } => {
                SearchBackend::Tavily(TavilyClient::new(endpoint, api_key.clone())?)
            }
            SearchConfig::Serper { api_key, endpoint } => {
                SearchBackend::Serper(SerperClient::new(endpoint, api_key.clone())?)
            }
            SearchConfig::GoogleCse {
                api_key,
                cx,
                endpoint,
            } => SearchBackend::GoogleCse(GoogleCseClient::new(
                endpoint,
                api_key.clone(),
                cx.clone(),
            )?),
            SearchConfig::Searx { host } => SearchBackend::Searx(SearxClient::new(host)?),
            SearchConfig::DuckDuckGo { endpoint } => {
                SearchBackend::DuckDuckGo(DuckDuckGoClient::new(endpoint)?)
            }
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchBackend::Tavily(_) => tavily::PROVIDER,
            SearchBackend::Serper(_) => serper::PROVIDER,
            SearchBackend::GoogleCse(_) => google::PROVIDER,
            SearchBackend::Searx(_) => searx::PROVIDER,
            SearchBackend::DuckDuckGo(_) => duckduckgo::PROVIDER,
        }
    }

    async fn fetch(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            SearchBackend::Tavily(c) => c.search(query).await,
            SearchBackend::Serper(c) => c.search(query, num_results).await,
            SearchBackend::GoogleCse(c) => c.search(query).await,
            SearchBackend::Searx(c) => c.search(query, num_results).await,
            SearchBackend::DuckDuckGo(c) => c.search(query).await,
        }
    }
}

pub struct WebSearch {
    backend: SearchBackend,
}

impl WebSearch {
    pub fn new(backend: SearchBackend) -> Self {
        Self { backend }
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        Ok(Self::new(SearchBackend::from_config(config)?))
    }

    pub fn provider(&self) -> &'static str {
        self.backend.name()
    }

    /// Normalized results, at most `num_results`, in provider order.
    ///
    /// An empty query returns no results without touching the network.
    pub async fn try_search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        tracing::info!(
            target: "web.search",
            provider = self.provider(),
            %query,
            num_results,
            "search.start"
        );
        let mut results = self.backend.fetch(query, num_results).await?;
        results.retain(|r| !r.href.is_empty());
        results.truncate(num_results);
        tracing::debug!(
            target: "web.search",
            provider = self.provider(),
            returned = results.len(),
            "search.done"
        );
        Ok(results)
    }

    /// JSON array text of [`WebSearch::try_search`]. Any failure is logged
    /// and yields `[]`.
    pub async fn search(&self, query: &str, num_results: usize) -> String {
        let encoded = match self.try_search(query, num_results).await {
            Ok(results) => to_json(&results),
            Err(e) => Err(e),
        };
        encoded.unwrap_or_else(|e| {
            tracing::warn!(
                target: "web.search",
                provider = self.provider(),
                error = %e,
                "search.provider.error"
            );
            "[]".to_string()
        })
    }
}

/// Pretty-printed with a four-space indent; non-ASCII is written as-is.
pub fn to_json(results: &[SearchResult]) -> Result<String, SearchError> {
    let mut out = Vec::new();
    let mut ser =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    results.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

pub(crate) fn is_youtube(href: &str) -> bool {
    href.contains("youtube.com")
}
