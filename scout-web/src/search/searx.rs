use super::{SearchError, SearchResult};
use scout_http::{HttpClient, RequestOpts};
use serde::Deserialize;
use std::borrow::Cow;

pub const PROVIDER: &str = "searx";

#[derive(Debug, Deserialize)]
struct SearxResponse {
    #[serde(default)]
    results: Vec<SearxHit>,
}

#[derive(Debug, Deserialize)]
struct SearxHit {
    url: String,
    #[serde(default)]
    content: String,
}

/// A self-hosted SearxNG instance queried through its JSON output format.
#[derive(Clone)]
pub struct SearxClient {
    http: HttpClient,
}

impl SearxClient {
    pub fn new(host: &str) -> Result<Self, SearchError> {
        let http = HttpClient::new(host).map_err(SearchError::http(PROVIDER))?;
        Ok(Self { http })
    }

    /// The JSON API has no result-count parameter, so the first page is
    /// fetched and cut to `num_results` here.
    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let resp: SearxResponse = self
            .http
            .get_json(
                "search",
                RequestOpts {
                    query: Some(vec![
                        ("q", Cow::Borrowed(query)),
                        ("format", Cow::Borrowed("json")),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .map_err(SearchError::http(PROVIDER))?;

        Ok(resp
            .results
            .into_iter()
            .take(num_results)
            .map(|hit| SearchResult {
                title: None,
                href: hit.url,
                body: hit.content,
            })
            .collect())
    }
}
