//! Loader for Scout configuration with YAML + environment overlays.
//!
//! Sources are merged by the `config` crate: files and inline YAML first, then
//! `SCOUT__`-prefixed environment variables (`SCOUT__SEARCH__PROVIDER=searx`).
//! After merging, every string value has `${VAR}` placeholders expanded so API
//! keys can stay out of the file. The result is read once at startup and
//! handed to each component explicitly.
use config::{Config, ConfigError, Environment, File};
use scout_common::{BrowserKind, DEFAULT_USER_AGENT};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub version: Option<String>,
    pub browser: BrowserConfig,
    pub fetcher: FetcherConfig,
    pub search: SearchConfig,
}

/// How the page fetcher launches its WebDriver session.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BrowserConfig {
    pub kind: BrowserKind,
    pub user_agent: String,
    /// Overrides the per-browser default driver endpoint.
    pub webdriver_url: Option<String>,
    pub headless: bool,
    /// Chrome only, and only applied on Linux.
    pub remote_debugging_port: u16,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            kind: BrowserKind::Chrome,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            webdriver_url: None,
            headless: true,
            remote_debugging_port: 9222,
        }
    }
}

impl BrowserConfig {
    /// The WebDriver endpoint to connect to.
    ///
    /// ```
    /// use scout_common::BrowserKind;
    /// use scout_config::BrowserConfig;
    ///
    /// let mut cfg = BrowserConfig::default();
    /// assert_eq!(cfg.webdriver_url(), "http://localhost:9515");
    /// cfg.kind = BrowserKind::Firefox;
    /// assert_eq!(cfg.webdriver_url(), "http://localhost:4444");
    /// cfg.webdriver_url = Some("http://grid:4444".into());
    /// assert_eq!(cfg.webdriver_url(), "http://grid:4444");
    /// ```
    pub fn webdriver_url(&self) -> &str {
        self.webdriver_url
            .as_deref()
            .unwrap_or_else(|| self.kind.default_webdriver_url())
    }
}

/// Tuning knobs for the page fetcher.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetcherConfig {
    /// Size of the shared worker pool used by offloaded fetches.
    pub workers: usize,
    /// How long to wait for `<body>` after navigation.
    pub wait_timeout_secs: u64,
    /// Upper bound on links returned by a browse.
    pub max_links: usize,
    /// Cap on characters kept from an arXiv paper; `None` keeps everything.
    pub arxiv_max_chars: Option<usize>,
    pub arxiv_base_url: String,
    /// Timeout for PDF and arXiv downloads.
    pub http_timeout_secs: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            workers: 8,
            wait_timeout_secs: 10,
            max_links: 5,
            arxiv_max_chars: None,
            arxiv_base_url: default_arxiv_base_url(),
            http_timeout_secs: 60,
        }
    }
}

impl FetcherConfig {
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

/// Which search vendor answers queries. The tag is `provider`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "provider")]
pub enum SearchConfig {
    #[serde(rename = "tavily")]
    Tavily {
        api_key: String,
        #[serde(default = "default_tavily_endpoint")]
        endpoint: String,
    },
    #[serde(rename = "googleSerp", alias = "serper")]
    Serper {
        api_key: String,
        #[serde(default = "default_serper_endpoint")]
        endpoint: String,
    },
    #[serde(rename = "googleAPI", alias = "google")]
    GoogleCse {
        api_key: String,
        cx: String,
        #[serde(default = "default_google_endpoint")]
        endpoint: String,
    },
    #[serde(rename = "searx")]
    Searx { host: String },
    #[serde(rename = "duckduckgo")]
    DuckDuckGo {
        #[serde(default = "default_duckduckgo_endpoint")]
        endpoint: String,
    },
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::DuckDuckGo {
            endpoint: default_duckduckgo_endpoint(),
        }
    }
}

impl SearchConfig {
    /// Configuration-file name of the selected provider.
    pub fn provider_name(&self) -> &'static str {
        match self {
            Self::Tavily { .. } => "tavily",
            Self::Serper { .. } => "googleSerp",
            Self::GoogleCse { .. } => "googleAPI",
            Self::Searx { .. } => "searx",
            Self::DuckDuckGo { .. } => "duckduckgo",
        }
    }

    fn validate(&self) -> Result<(), String> {
        let required: Vec<(&str, &str)> = match self {
            Self::Tavily { api_key, .. } | Self::Serper { api_key, .. } => {
                vec![("api_key", api_key)]
            }
            Self::GoogleCse { api_key, cx, .. } => vec![("api_key", api_key), ("cx", cx)],
            Self::Searx { host } => vec![("host", host)],
            Self::DuckDuckGo { .. } => vec![],
        };
        for (name, value) in required {
            let value = value.trim();
            if value.is_empty() || value.contains("${") {
                return Err(format!(
                    "search.{name} is required for provider `{}`",
                    self.provider_name()
                ));
            }
        }
        Ok(())
    }
}

fn default_arxiv_base_url() -> String {
    "https://arxiv.org".into()
}
fn default_tavily_endpoint() -> String {
    "https://api.tavily.com".into()
}
fn default_serper_endpoint() -> String {
    "https://google.serper.dev".into()
}
fn default_google_endpoint() -> String {
    "https://www.googleapis.com".into()
}
fn default_duckduckgo_endpoint() -> String {
    "https://html.duckduckgo.com".into()
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring (YAML + env overrides).
pub struct ScoutConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for ScoutConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoutConfigLoader {
    /// Start with `SCOUT__` env overrides only; every section has defaults.
    ///
    /// ```
    /// use scout_config::{ScoutConfigLoader, SearchConfig};
    ///
    /// let config = ScoutConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.fetcher.workers, 8);
    /// assert!(matches!(config.search, SearchConfig::DuckDuckGo { .. }));
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder().add_source(
            Environment::with_prefix("SCOUT")
                .separator("__")
                .try_parsing(true),
        );
        Self { builder }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments driven purely by env.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use scout_config::{ScoutConfigLoader, SearchConfig};
    ///
    /// let cfg = ScoutConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// search:
    ///   provider: googleSerp
    ///   api_key: "example"
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert!(matches!(cfg.search, SearchConfig::Serper { ref api_key, .. } if api_key == "example"));
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into typed config.
    ///
    /// Unknown providers or browsers, and providers missing their credentials,
    /// are rejected here rather than at the first search.
    ///
    /// ```
    /// use scout_config::ScoutConfigLoader;
    ///
    /// let err = ScoutConfigLoader::new()
    ///     .with_yaml_str("search:\n  provider: altavista\n")
    ///     .load()
    ///     .unwrap_err();
    /// assert!(err.to_string().contains("altavista"));
    /// ```
    pub fn load(self) -> Result<ScoutConfig, ConfigError> {
        let cfg = self.builder.build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        let typed: ScoutConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;
        typed.search.validate().map_err(ConfigError::Message)?;

        Ok(typed)
    }
}
