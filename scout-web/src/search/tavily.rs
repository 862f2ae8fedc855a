use super::{SearchError, SearchResult};
use scout_http::{Auth, HttpClient, RequestOpts};
use serde::Deserialize;
use serde_json::json;

pub const PROVIDER: &str = "tavily";

#[derive(Debug, Deserialize)]
struct TavilyResponse {
    #[serde(default)]
    results: Vec<TavilyHit>,
}

#[derive(Debug, Deserialize)]
struct TavilyHit {
    url: String,
    content: String,
}

/// Tavily search API, basic depth.
#[derive(Clone)]
pub struct TavilyClient {
    http: HttpClient,
    api_key: String,
}

impl TavilyClient {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self, SearchError> {
        let http = HttpClient::new(endpoint).map_err(SearchError::http(PROVIDER))?;
        Ok(Self { http, api_key })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let body = json!({ "query": query, "search_depth": "basic" });
        let resp: TavilyResponse = self
            .http
            .post_json(
                "search",
                &body,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    ..Default::default()
                },
            )
            .await
            .map_err(SearchError::http(PROVIDER))?;

        Ok(resp
            .results
            .into_iter()
            .map(|hit| SearchResult {
                title: None,
                href: hit.url,
                body: hit.content,
            })
            .collect())
    }
}
