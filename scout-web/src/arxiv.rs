use crate::pdf::extract_pdf_text;
use anyhow::Context;
use async_trait::async_trait;
use scout_http::{HttpClient, RequestOpts};
use std::time::Duration;

/// Resolves an arXiv identifier to the paper's text.
#[async_trait]
pub trait PaperRetriever: Send + Sync {
    async fn fetch_text(&self, id: &str) -> anyhow::Result<String>;
}

/// Fetches `{base}/pdf/{id}` and extracts it, optionally capped to
/// `max_chars` characters.
#[derive(Clone)]
pub struct ArxivRetriever {
    http: HttpClient,
    max_chars: Option<usize>,
}

impl ArxivRetriever {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        max_chars: Option<usize>,
    ) -> Result<Self, scout_http::HttpError> {
        Ok(Self {
            http: HttpClient::new(base_url)?.with_timeout(timeout),
            max_chars,
        })
    }
}

#[async_trait]
impl PaperRetriever for ArxivRetriever {
    async fn fetch_text(&self, id: &str) -> anyhow::Result<String> {
        if id.is_empty() {
            anyhow::bail!("empty arxiv identifier");
        }
        let bytes = self
            .http
            .get_bytes(&format!("pdf/{id}"), RequestOpts::default())
            .await
            .with_context(|| format!("failed to fetch arxiv paper {id}"))?;
        let text = extract_pdf_text(&bytes)?;
        Ok(match self.max_chars {
            Some(max) => truncate_chars(text, max),
            None => text,
        })
    }
}

fn truncate_chars(mut text: String, max: usize) -> String {
    if let Some((idx, _)) = text.char_indices().nth(max) {
        text.truncate(idx);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate_chars("héllo".into(), 2), "hé");
        assert_eq!(truncate_chars("abc".into(), 10), "abc");
    }

    #[tokio::test]
    async fn empty_identifier_fails_without_a_request() {
        let retriever = ArxivRetriever::new("http://127.0.0.1:9", Duration::from_secs(1), None)
            .unwrap();
        let err = retriever.fetch_text("").await.unwrap_err();
        assert!(err.to_string().contains("empty arxiv identifier"));
    }
}
