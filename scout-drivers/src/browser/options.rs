use scout_common::BrowserKind;
use scout_config::BrowserConfig;
use serde_json::json;
use webdriver::capabilities::Capabilities;

/// Chrome's `download_restrictions` value that blocks every download.
const BLOCK_ALL_DOWNLOADS: u8 = 3;

/// Construct Chrome command-line arguments for a session.
///
/// `linux` adds the shared-memory and remote-debugging flags needed inside
/// containers; `--no-sandbox` is always present.
pub fn build_chrome_arguments(config: &BrowserConfig, linux: bool) -> Vec<String> {
    let mut args = vec![format!("user-agent={}", config.user_agent)];
    if config.headless {
        args.push("--headless".to_string());
    }
    args.push("--enable-javascript".to_string());
    if linux {
        args.push("--disable-dev-shm-usage".to_string());
        args.push(format!(
            "--remote-debugging-port={}",
            config.remote_debugging_port
        ));
    }
    args.push("--no-sandbox".to_string());
    args
}

/// WebDriver capabilities for the configured browser variant.
pub fn build_capabilities(config: &BrowserConfig, linux: bool) -> Capabilities {
    let mut caps = Capabilities::new();
    caps.insert("browserName".to_string(), json!(config.kind.as_str()));

    match config.kind {
        BrowserKind::Chrome => {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({
                    "args": build_chrome_arguments(config, linux),
                    "prefs": { "download_restrictions": BLOCK_ALL_DOWNLOADS },
                }),
            );
        }
        BrowserKind::Firefox => {
            let args: Vec<&str> = if config.headless {
                vec!["-headless"]
            } else {
                vec![]
            };
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({
                    "args": args,
                    "prefs": {
                        "general.useragent.override": config.user_agent,
                        "javascript.enabled": true,
                    },
                }),
            );
        }
        // safaridriver rejects unknown options and has no headless mode
        BrowserKind::Safari => {}
    }
    caps
}
