use super::{SearchError, SearchResult};
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use scout_common::DEFAULT_USER_AGENT;
use scout_http::{HttpClient, RequestOpts};
use scraper::{Html, Selector};
use std::borrow::Cow;
use url::Url;

pub const PROVIDER: &str = "duckduckgo";

/// DuckDuckGo's HTML endpoint; needs no key.
#[derive(Clone)]
pub struct DuckDuckGoClient {
    http: HttpClient,
}

impl DuckDuckGoClient {
    pub fn new(endpoint: &str) -> Result<Self, SearchError> {
        let http = HttpClient::new(endpoint).map_err(SearchError::http(PROVIDER))?;
        Ok(Self { http })
    }

    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
        let page = self
            .http
            .get_text(
                "html/",
                RequestOpts {
                    headers: Some(headers),
                    query: Some(vec![("q", Cow::Borrowed(query))]),
                    ..Default::default()
                },
            )
            .await
            .map_err(SearchError::http(PROVIDER))?;
        Ok(parse_results(&page))
    }
}

/// Pull `{title, href, body}` out of each `.result` block.
pub fn parse_results(page: &str) -> Vec<SearchResult> {
    let (Ok(result_sel), Ok(link_sel), Ok(snippet_sel)) = (
        Selector::parse(".result"),
        Selector::parse("a.result__a"),
        Selector::parse(".result__snippet"),
    ) else {
        return Vec::new();
    };
    let doc = Html::parse_document(page);

    doc.select(&result_sel)
        .filter_map(|result| {
            let link = result.select(&link_sel).next()?;
            let href = unwrap_redirect(link.value().attr("href").unwrap_or_default());
            let title = link.text().collect::<String>().trim().to_string();
            let body = result
                .select(&snippet_sel)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
                .unwrap_or_default();
            Some(SearchResult {
                title: Some(title),
                href,
                body,
            })
        })
        .collect()
}

/// Result links point at `//duckduckgo.com/l/?uddg=<target>`; return the
/// target when present.
fn unwrap_redirect(href: &str) -> String {
    let target = Url::parse("https://duckduckgo.com")
        .and_then(|base| base.join(href))
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(k, _)| k == "uddg")
                .map(|(_, v)| v.into_owned())
        });
    target.unwrap_or_else(|| href.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirect_target_is_decoded() {
        assert_eq!(
            unwrap_redirect("//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&rut=abc"),
            "https://www.rust-lang.org/"
        );
        assert_eq!(
            unwrap_redirect("https://example.com/direct"),
            "https://example.com/direct"
        );
    }

    #[test]
    fn parses_result_blocks() {
        let page = r#"
            <div class="result">
              <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Ftokio.rs%2F">Tokio</a></h2>
              <a class="result__snippet">An asynchronous runtime</a>
            </div>
            <div class="result"><span>no link here</span></div>"#;
        assert_eq!(
            parse_results(page),
            vec![SearchResult {
                title: Some("Tokio".into()),
                href: "https://tokio.rs/".into(),
                body: "An asynchronous runtime".into(),
            }]
        );
    }
}
