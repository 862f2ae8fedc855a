//! Minimal HTTP client with safe logging and flexible auth.
//!
//! - Request options: headers, `Auth`, query params, timeout
//! - JSON, text and raw-bytes helpers over one request path
//! - Redacts sensitive headers and query params; never logs secret values
//! - Optional *raw* request/response logging via `SCOUT_HTTP_RAW=1`
//! - Single attempt per call: failures surface immediately as [`HttpError`]
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), scout_http::HttpError> {
//! let client = scout_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", scout_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "SCOUT_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

const SECRET_HEADERS: &[&str] = &["authorization", "x-api-key", "x-subscription-token"];
const SECRET_PARAMS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

fn is_secret_header(name: &str) -> bool {
    SECRET_HEADERS.iter().any(|h| name.eq_ignore_ascii_case(h))
}

fn is_secret_param(name: &str) -> bool {
    SECRET_PARAMS.contains(&name.to_ascii_lowercase().as_str())
}

/// Render a best-effort curl command for repro/debug, with secrets redacted.
fn make_curl(method: &Method, url: &Url, headers: &HeaderMap, body: Option<&[u8]>) -> String {
    let mut parts = vec!["curl".to_string(), format!("-X{}", method)];
    for (name, value) in redact_headers(headers) {
        parts.push(format!("-H '{}: {}'", name, value.replace('\'', r"'\''")));
    }
    if let Some(bytes) = body {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                let mut s = s.to_string();
                if s.len() > RAW_MAX_BODY {
                    truncate_on_char_boundary(&mut s, RAW_MAX_BODY);
                    s.push('…');
                }
                parts.push(format!("-d '{}'", s.replace('\'', r"'\''")));
            }
            Err(_) => parts.push(format!("--data-binary @- # ({} bytes)", bytes.len())),
        }
    }
    parts.push(format!("'{}'", redacted_url(url)));
    parts.join(" ")
}

fn redact_headers(h: &HeaderMap) -> Vec<(String, String)> {
    h.iter()
        .map(|(k, v)| {
            let key = k.as_str().to_string();
            let val = if is_secret_header(&key) {
                "<redacted>".to_string()
            } else {
                v.to_str().unwrap_or("").to_string()
            };
            (key, val)
        })
        .collect()
}

fn redacted_url(url: &Url) -> String {
    let mut clone = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if is_secret_param(&k) {
                "<redacted>".to_string()
            } else {
                v.into_owned()
            };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return clone.to_string();
    }
    clone.query_pairs_mut().clear().extend_pairs(pairs);
    clone.to_string()
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}, request_id={request_id}")]
    Api {
        status: StatusCode,
        message: String,
        request_id: String,
    },
}

// ==============================
// Auth & Request Options
// ==============================

/// Authentication strategies supported by the HTTP client helpers.
///
/// ```
/// use scout_http::Auth;
///
/// let bearer = Auth::Bearer("token");
/// match bearer {
///     Auth::Bearer(value) => assert_eq!(value, "token"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Clone, Debug)]
pub enum Auth<'a> {
    /// Authorization: Bearer <token>
    Bearer(&'a str),
    /// Custom header (e.g., Serper: X-API-KEY)
    Header {
        name: HeaderName,
        value: HeaderValue,
    },
    /// Auth via query param (e.g., Google Custom Search: key=...)
    Query {
        name: &'a str,
        value: Cow<'a, str>,
    },
    None,
}

impl Auth<'_> {
    fn kind(&self) -> &'static str {
        match self {
            Auth::Bearer(_) => "bearer",
            Auth::Header { .. } => "header",
            Auth::Query { .. } => "query",
            Auth::None => "none",
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use scout_http::{Auth, RequestOpts};
/// use std::borrow::Cow;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(30)),
///     auth: Some(Auth::Query {
///         name: "key",
///         value: Cow::Borrowed("demo"),
///     }),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 30);
/// assert!(!opts.allow_absolute);
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub headers: Option<HeaderMap>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
    /// If true and `path` is an absolute URL, use it as-is (ignore base).
    pub allow_absolute: bool,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Option<Url>,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL. Relative paths are joined
    /// onto it, keeping any path prefix the base carries.
    ///
    /// ```no_run
    /// use scout_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let mut base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            base: Some(base),
            ..Self::detached()?
        })
    }

    /// Construct a client with no base; every request path must be absolute.
    pub fn detached() -> Result<Self, HttpError> {
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base: None,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET and decode a JSON body.
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let (bytes, req_id) = self.execute(Method::GET, path, None, opts).await?;
        decode_json(&bytes, &req_id)
    }

    /// POST a JSON body and decode a JSON response.
    pub async fn post_json<B, T>(
        &self,
        path: &str,
        body: &B,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| HttpError::Build(e.to_string()))?;
        let (bytes, req_id) = self
            .execute(Method::POST, path, Some(payload), opts)
            .await?;
        decode_json(&bytes, &req_id)
    }

    /// GET a body as (lossy) UTF-8 text, e.g. an HTML page.
    pub async fn get_text(&self, path: &str, opts: RequestOpts<'_>) -> Result<String, HttpError> {
        let (bytes, _) = self.execute(Method::GET, path, None, opts).await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// GET a body as raw bytes, e.g. a PDF.
    pub async fn get_bytes(&self, path: &str, opts: RequestOpts<'_>) -> Result<Vec<u8>, HttpError> {
        let (bytes, _) = self.execute(Method::GET, path, None, opts).await?;
        Ok(bytes)
    }

    fn resolve(&self, path: &str, allow_absolute: bool) -> Result<Url, HttpError> {
        match &self.base {
            None => Url::parse(path).map_err(|e| HttpError::Url(e.to_string())),
            Some(base) => {
                if allow_absolute {
                    if let Ok(abs) = Url::parse(path) {
                        return Ok(abs);
                    }
                }
                base.join(path.trim_start_matches('/'))
                    .map_err(|e| HttpError::Url(e.to_string()))
            }
        }
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        opts: RequestOpts<'_>,
    ) -> Result<(Vec<u8>, String), HttpError> {
        let url = self.resolve(path, opts.allow_absolute)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        let mut query: Vec<(&str, Cow<'_, str>)> = opts.query.clone().unwrap_or_default();
        let mut headers = opts.headers.clone().unwrap_or_default();
        if body.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        match &opts.auth {
            Some(Auth::Bearer(tok)) => {
                let tok = sanitize_api_key(tok)?;
                let value = HeaderValue::from_str(&format!("Bearer {tok}"))
                    .map_err(|e| HttpError::Build(format!("invalid Authorization header: {e}")))?;
                headers.insert(reqwest::header::AUTHORIZATION, value);
            }
            Some(Auth::Header { name, value }) => {
                headers.insert(name.clone(), value.clone());
            }
            Some(Auth::Query { name, value }) => query.push((*name, value.clone())),
            Some(Auth::None) | None => {}
        }

        let mut rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout)
            .headers(headers.clone());
        if !query.is_empty() {
            let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_ref())).collect();
            rb = rb.query(&pairs);
        }
        if let Some(bytes) = &body {
            rb = rb.body(bytes.clone());
        }

        let req_id = format!("r{}", uuid::Uuid::new_v4().simple());
        let redacted_q: Vec<(String, String)> = query
            .iter()
            .map(|(k, v)| {
                let v = if is_secret_param(k) {
                    "<redacted>".to_string()
                } else {
                    v.to_string()
                };
                ((*k).to_string(), v)
            })
            .collect();

        tracing::debug!(
            target: "http",
            req_id = %req_id,
            method = %method,
            host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query = ?redacted_q,
            timeout_ms = timeout.as_millis() as u64,
            auth_kind = opts.auth.as_ref().map(Auth::kind).unwrap_or("none"),
            has_body = body.is_some(),
            "http.request.start"
        );
        if raw_enabled() {
            let curl = make_curl(&method, &url, &headers, body.as_deref());
            tracing::debug!(target: "http.raw", %req_id, %curl, "request");
        }

        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|err| {
            tracing::warn!(target: "http", req_id = %req_id, message = %err, "http.network_error.send");
            HttpError::Network(err.to_string())
        })?;
        let status = resp.status();
        let resp_headers = resp.headers().clone();
        let bytes = resp.bytes().await.map_err(|err| {
            tracing::warn!(target: "http", req_id = %req_id, message = %err, "http.network_error.body");
            HttpError::Network(err.to_string())
        })?;
        let bytes = bytes.to_vec();

        let x_request_id = resp_headers
            .get("x-request-id")
            .or_else(|| resp_headers.get("x-correlation-id"))
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        tracing::debug!(
            target: "http",
            req_id = %req_id,
            %status,
            duration_ms = t0.elapsed().as_millis() as u64,
            body_len = bytes.len(),
            x_request_id = %x_request_id,
            "http.response.headers"
        );
        if raw_enabled() {
            let mut shown = bytes.clone();
            let truncated = shown.len() > RAW_MAX_BODY;
            shown.truncate(RAW_MAX_BODY);
            tracing::debug!(
                target: "http.raw",
                %req_id,
                %status,
                headers = ?redact_headers(&resp_headers),
                body = %String::from_utf8_lossy(&shown),
                truncated,
                "response"
            );
        }

        if status.is_success() {
            return Ok((bytes, req_id));
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(
            target: "http",
            req_id = %req_id,
            %status,
            message = %message,
            x_request_id = %x_request_id,
            "http.error"
        );
        Err(HttpError::Api {
            status,
            message,
            request_id: x_request_id,
        })
    }
}

// ==============================
// Helpers
// ==============================

fn decode_json<T: DeserializeOwned>(bytes: &[u8], req_id: &str) -> Result<T, HttpError> {
    serde_json::from_slice::<T>(bytes).map_err(|e| {
        let snippet = snip_body(bytes);
        tracing::warn!(
            target: "http",
            req_id = %req_id,
            serde_line = e.line(),
            serde_col = e.column(),
            serde_err = %e,
            body_snippet = %snippet,
            "http.response.decode_error"
        );
        HttpError::Decode(e.to_string(), snippet)
    })
}

fn extract_error_message(body: &[u8]) -> String {
    // {"error":{"message":"..."}} (Google, OpenAI style)
    #[derive(Deserialize)]
    struct Nested {
        error: NestedDetail,
    }
    #[derive(Deserialize)]
    struct NestedDetail {
        message: String,
    }

    // {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Flat {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Nested>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Flat>(body) {
        for candidate in [m.message, m.detail, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        truncate_on_char_boundary(&mut snip, SNIPPET_MAX);
        snip.push_str("...");
    }
    snip
}

fn truncate_on_char_boundary(s: &mut String, max: usize) {
    let mut end = max.min(s.len());
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    s.truncate(end);
}

fn sanitize_api_key(raw: &str) -> Result<String, HttpError> {
    let mut s = raw
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_string();
    s.retain(|ch| !ch.is_ascii_whitespace());

    if !s.is_ascii() {
        return Err(HttpError::Build("API key contains non-ASCII bytes".into()));
    }
    if s.bytes().any(|b| b < 0x20 || b == 0x7F) {
        return Err(HttpError::Build(
            "API key contains control characters".into(),
        ));
    }
    Ok(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_headers_are_redacted() {
        let mut h = HeaderMap::new();
        h.insert("x-api-key", HeaderValue::from_static("s3cret"));
        h.insert("accept", HeaderValue::from_static("text/html"));
        let redacted = redact_headers(&h);
        assert!(redacted.contains(&("x-api-key".into(), "<redacted>".into())));
        assert!(redacted.contains(&("accept".into(), "text/html".into())));
    }

    #[test]
    fn curl_line_hides_query_secrets() {
        let url = Url::parse("https://www.googleapis.com/customsearch/v1?key=abc&q=rust").unwrap();
        let curl = make_curl(&Method::GET, &url, &HeaderMap::new(), None);
        assert!(!curl.contains("abc"));
        assert!(curl.contains("q=rust"));
    }

    #[test]
    fn sanitize_strips_quotes_and_whitespace() {
        assert_eq!(sanitize_api_key(" 'tvly-abc \n' ").unwrap(), "tvly-abc");
        assert!(sanitize_api_key("clé").is_err());
    }

    #[test]
    fn error_message_prefers_structured_fields() {
        assert_eq!(
            extract_error_message(br#"{"error":{"message":"quota exceeded"}}"#),
            "quota exceeded"
        );
        assert_eq!(extract_error_message(br#"{"detail":"bad key"}"#), "bad key");
        assert_eq!(extract_error_message(b"plain failure"), "plain failure");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = HttpClient::new("http://localhost:8888/searx").unwrap();
        let url = client.resolve("search", false).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8888/searx/search");
    }

    #[test]
    fn detached_client_requires_absolute_urls() {
        let client = HttpClient::detached().unwrap();
        assert!(client.resolve("relative/path", false).is_err());
        assert!(client.resolve("https://example.com/a.pdf", false).is_ok());
    }
}
