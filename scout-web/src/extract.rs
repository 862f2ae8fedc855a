//! HTML to text and hyperlink extraction over `scraper`.
//!
//! `scraper::Html` is `!Send`; every function here parses and drops the
//! document synchronously so callers can hold the results across `.await`.

use scraper::{ElementRef, Html, Node, Selector};
use std::fmt;
use url::Url;

const TEXT_BLOCKS: &str = "h1, h2, h3, h4, h5, p";
const SKIPPED_TAGS: &[&str] = &["script", "style"];

/// One outbound link as shown to the summarizer's caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hyperlink {
    pub text: String,
    pub href: String,
}

impl fmt::Display for Hyperlink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.href)
    }
}

/// Concatenate the text of every `h1`..`h5` and `p` element in document
/// order, each followed by a blank line. Script and style text is ignored.
pub fn html_to_text(html: &str) -> String {
    let Ok(blocks) = Selector::parse(TEXT_BLOCKS) else {
        return String::new();
    };
    let doc = Html::parse_document(html);

    let mut out = String::new();
    for element in doc.select(&blocks) {
        collect_text(&element, &mut out);
        out.push_str("\n\n");
    }
    out
}

fn collect_text(element: &ElementRef<'_>, buf: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => buf.push_str(text),
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text(&child_ref, buf);
                }
            }
            _ => {}
        }
    }
}

/// Trim every line, split on double-space runs, drop empty fragments and
/// rejoin with single newlines.
///
/// Lines end at any Unicode line boundary, not only `\n`.
pub fn normalize_whitespace(text: &str) -> String {
    text.split(is_line_break)
        .flat_map(|line| line.trim().split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c'..='\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Every `a[href]` in `html` as `(raw text, absolute href)`.
///
/// Relative hrefs are joined onto `base_url`; when either side cannot be
/// parsed the href is kept as written.
pub fn extract_hyperlinks(html: &str, base_url: &str) -> Vec<(String, String)> {
    let Ok(anchors) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let base = Url::parse(base_url).ok();
    let doc = Html::parse_document(html);

    doc.select(&anchors)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let mut text = String::new();
            collect_text(&a, &mut text);
            let resolved = base
                .as_ref()
                .and_then(|b| b.join(href).ok())
                .map(String::from)
                .unwrap_or_else(|| href.to_string());
            Some((text, resolved))
        })
        .collect()
}

pub fn format_hyperlinks(links: Vec<(String, String)>) -> Vec<Hyperlink> {
    links
        .into_iter()
        .map(|(text, href)| Hyperlink {
            text: text.trim().to_string(),
            href,
        })
        .collect()
}
