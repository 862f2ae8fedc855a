use super::{is_youtube, SearchError, SearchResult};
use scout_http::{Auth, HttpClient, RequestOpts};
use serde::Deserialize;
use std::borrow::Cow;

pub const PROVIDER: &str = "googleAPI";

#[derive(Debug, Deserialize)]
struct CseResponse {
    #[serde(default)]
    items: Vec<CseItem>,
}

#[derive(Debug, Deserialize)]
struct CseItem {
    title: String,
    link: String,
    snippet: String,
}

/// Google Programmable Search (Custom Search JSON API). YouTube results are
/// skipped.
#[derive(Clone)]
pub struct GoogleCseClient {
    http: HttpClient,
    api_key: String,
    cx: String,
}

impl GoogleCseClient {
    pub fn new(endpoint: &str, api_key: String, cx: String) -> Result<Self, SearchError> {
        let http = HttpClient::new(endpoint).map_err(SearchError::http(PROVIDER))?;
        Ok(Self { http, api_key, cx })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let resp: CseResponse = self
            .http
            .get_json(
                "customsearch/v1",
                RequestOpts {
                    auth: Some(Auth::Query {
                        name: "key",
                        value: Cow::Borrowed(self.api_key.as_str()),
                    }),
                    query: Some(vec![
                        ("cx", Cow::Borrowed(self.cx.as_str())),
                        ("q", Cow::Borrowed(query)),
                        ("start", Cow::Borrowed("1")),
                    ]),
                    ..Default::default()
                },
            )
            .await
            .map_err(SearchError::http(PROVIDER))?;

        Ok(resp
            .items
            .into_iter()
            .filter(|item| !is_youtube(&item.link))
            .map(|item| SearchResult {
                title: Some(item.title),
                href: item.link,
                body: item.snippet,
            })
            .collect())
    }
}
