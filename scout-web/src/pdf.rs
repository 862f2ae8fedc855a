use anyhow::Context;
use async_trait::async_trait;
use scout_http::{HttpClient, RequestOpts};
use std::time::Duration;

/// Turns a PDF URL into plain text.
#[async_trait]
pub trait PdfLoader: Send + Sync {
    async fn load_text(&self, url: &str) -> anyhow::Result<String>;
}

/// Downloads the document with [`HttpClient`] and extracts it with `lopdf`.
#[derive(Clone)]
pub struct HttpPdfLoader {
    http: HttpClient,
}

impl HttpPdfLoader {
    pub fn new(timeout: Duration) -> Result<Self, scout_http::HttpError> {
        Ok(Self {
            http: HttpClient::detached()?.with_timeout(timeout),
        })
    }
}

#[async_trait]
impl PdfLoader for HttpPdfLoader {
    async fn load_text(&self, url: &str) -> anyhow::Result<String> {
        let bytes = self
            .http
            .get_bytes(url, RequestOpts::default())
            .await
            .with_context(|| format!("failed to download pdf from {url}"))?;
        extract_pdf_text(&bytes)
    }
}

/// Text of every page, in page order. Pages that fail to decode are logged
/// and skipped.
pub fn extract_pdf_text(bytes: &[u8]) -> anyhow::Result<String> {
    let doc = lopdf::Document::load_mem(bytes).context("failed to parse pdf")?;

    let mut text = String::new();
    for page in doc.get_pages().into_keys() {
        match doc.extract_text(&[page]) {
            Ok(page_text) => text.push_str(&page_text),
            Err(e) => {
                tracing::warn!(target: "web.pdf", page, error = %e, "pdf.page.extract_failed")
            }
        }
    }
    Ok(text)
}
