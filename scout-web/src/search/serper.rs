use super::{is_youtube, SearchError, SearchResult};
use reqwest::header::{HeaderName, HeaderValue};
use scout_http::{Auth, HttpClient, HttpError, RequestOpts};
use serde::Deserialize;
use serde_json::json;

pub const PROVIDER: &str = "googleSerp";

#[derive(Debug, Deserialize)]
struct SerperResponse {
    organic: Vec<OrganicHit>,
}

#[derive(Debug, Deserialize)]
struct OrganicHit {
    title: String,
    link: String,
    snippet: String,
}

/// Serper's Google SERP endpoint. YouTube results are skipped.
#[derive(Clone)]
pub struct SerperClient {
    http: HttpClient,
    api_key: HeaderValue,
}

impl SerperClient {
    pub fn new(endpoint: &str, api_key: String) -> Result<Self, SearchError> {
        let http = HttpClient::new(endpoint).map_err(SearchError::http(PROVIDER))?;
        let api_key = HeaderValue::from_str(api_key.trim())
            .map_err(|e| HttpError::Build(format!("invalid X-API-KEY header: {e}")))
            .map_err(SearchError::http(PROVIDER))?;
        Ok(Self { http, api_key })
    }

    pub async fn search(
        &self,
        query: &str,
        num_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let body = json!({ "q": query, "num": num_results });
        let resp: SerperResponse = self
            .http
            .post_json(
                "search",
                &body,
                RequestOpts {
                    auth: Some(Auth::Header {
                        name: HeaderName::from_static("x-api-key"),
                        value: self.api_key.clone(),
                    }),
                    ..Default::default()
                },
            )
            .await
            .map_err(SearchError::http(PROVIDER))?;

        Ok(resp
            .organic
            .into_iter()
            .filter(|hit| !is_youtube(&hit.link))
            .map(|hit| SearchResult {
                title: Some(hit.title),
                href: hit.link,
                body: hit.snippet,
            })
            .collect())
    }
}
