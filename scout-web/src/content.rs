/// Which extraction branch a URL takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentKind {
    /// Ends with `.pdf`; text comes from the PDF loader.
    Pdf,
    /// Mentions `arxiv`; the last path segment is the paper identifier.
    Arxiv { id: String },
    /// Anything else is read from the live DOM.
    Html,
}

impl ContentKind {
    pub fn classify(url: &str) -> Self {
        if url.ends_with(".pdf") {
            ContentKind::Pdf
        } else if url.contains("arxiv") {
            let id = url.rsplit('/').next().unwrap_or_default().to_string();
            ContentKind::Arxiv { id }
        } else {
            ContentKind::Html
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Pdf => "pdf",
            ContentKind::Arxiv { .. } => "arxiv",
            ContentKind::Html => "html",
        }
    }
}
