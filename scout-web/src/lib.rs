//! Web acquisition for research agents.
//!
//! - Page Fetcher (`browse`): drive a browser to a URL, read its text (HTML,
//!   PDF or arXiv), summarize against a question, collect outbound links
//! - Search Client (`search`): one configured provider normalized to
//!   `{title, href, body}` JSON
//! - Supporting pieces: `extract` (HTML to text, links), `pdf`/`arxiv`
//!   loaders, the bounded `pool` and the `progress` channel

pub mod arxiv;
pub mod browse;
pub mod content;
pub mod extract;
pub mod pdf;
pub mod pool;
pub mod progress;
pub mod search;

pub use browse::{BrowseOutcome, FetchError, PageFetcher, Summarizer};
pub use extract::Hyperlink;
pub use progress::{ProgressMessage, ProgressSink};
pub use search::{SearchResult, WebSearch};
