//! Suite configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional; defaults target the public demo site.
//! - `AE_BASE_URL` - Site under test (default: <https://www.automationexercise.com/>)
//! - `AE_API_BASE_URL` - JSON API root (default: <https://automationexercise.com/api/>)
//! - `AE_EXPECT_TIMEOUT_MS` - Assertion timeout (default: 10000)
//! - `AE_ACTION_TIMEOUT_MS` - Time an action waits for its element (default: 30000)
//! - `AE_POLL_INTERVAL_MS` - Interval between assertion retries (default: 100)
//! - `AE_TEST_ID_ATTRIBUTE` - Attribute behind `get_by_test_id` (default: data-qa)
//! - `AE_HEADLESS` - Run the browser without a window (default: true)
//! - `AE_ARTIFACT_DIR` - Downloads and upload staging (default: test-results)
//! - `CHROME_PATH` - Browser executable (default: auto-detected)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.automationexercise.com/";
const DEFAULT_API_BASE_URL: &str = "https://automationexercise.com/api/";
const DEFAULT_EXPECT_TIMEOUT_MS: u64 = 10_000;
const DEFAULT_ACTION_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Browser window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// Everything a test context needs, passed explicitly rather than read from
/// process-wide state.
#[derive(Debug, Clone)]
pub struct SuiteConfig {
    /// Root of the site under test; page paths are joined onto it
    pub base_url: Url,
    /// Root of the JSON API
    pub api_base_url: Url,
    /// How long an assertion keeps retrying
    pub expect_timeout: Duration,
    /// How long an action waits for exactly one matching element
    pub action_timeout: Duration,
    /// Delay between retries
    pub poll_interval: Duration,
    /// Attribute used by `get_by_test_id`
    pub test_id_attribute: String,
    /// Run without a visible window
    pub headless: bool,
    /// Window size
    pub viewport: Viewport,
    /// Directory for downloads and staged uploads
    pub artifact_dir: PathBuf,
    /// Browser executable override
    pub chrome_executable: Option<PathBuf>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            base_url: parse_default_url(DEFAULT_BASE_URL),
            api_base_url: parse_default_url(DEFAULT_API_BASE_URL),
            expect_timeout: Duration::from_millis(DEFAULT_EXPECT_TIMEOUT_MS),
            action_timeout: Duration::from_millis(DEFAULT_ACTION_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            test_id_attribute: "data-qa".to_string(),
            headless: true,
            viewport: Viewport {
                width: 1440,
                height: 900,
            },
            artifact_dir: PathBuf::from("test-results"),
            chrome_executable: None,
        }
    }
}

impl SuiteConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Ok(Self {
            base_url: parse_or(
                get("AE_BASE_URL"),
                "AE_BASE_URL",
                defaults.base_url,
                parse_root_url,
            )?,
            api_base_url: parse_or(
                get("AE_API_BASE_URL"),
                "AE_API_BASE_URL",
                defaults.api_base_url,
                parse_root_url,
            )?,
            expect_timeout: parse_or(
                get("AE_EXPECT_TIMEOUT_MS"),
                "AE_EXPECT_TIMEOUT_MS",
                defaults.expect_timeout,
                parse_millis,
            )?,
            action_timeout: parse_or(
                get("AE_ACTION_TIMEOUT_MS"),
                "AE_ACTION_TIMEOUT_MS",
                defaults.action_timeout,
                parse_millis,
            )?,
            poll_interval: parse_or(
                get("AE_POLL_INTERVAL_MS"),
                "AE_POLL_INTERVAL_MS",
                defaults.poll_interval,
                parse_millis,
            )?,
            test_id_attribute: get("AE_TEST_ID_ATTRIBUTE").unwrap_or(defaults.test_id_attribute),
            headless: parse_or(get("AE_HEADLESS"), "AE_HEADLESS", defaults.headless, parse_bool)?,
            viewport: defaults.viewport,
            artifact_dir: get("AE_ARTIFACT_DIR").map_or(defaults.artifact_dir, PathBuf::from),
            chrome_executable: get("CHROME_PATH").map(PathBuf::from),
        })
    }

    /// Resolve a site path (`"/"`, `"/view_cart"`) against [`Self::base_url`].
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the path cannot be joined.
    pub fn page_url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path.trim_start_matches('/'))
    }

    /// Resolve an endpoint name (`"productsList"`) against [`Self::api_base_url`].
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the endpoint cannot be joined.
    pub fn api_url(&self, endpoint: &str) -> Result<Url, url::ParseError> {
        self.api_base_url.join(endpoint.trim_start_matches('/'))
    }
}

fn parse_or<T>(
    raw: Option<String>,
    key: &str,
    default: T,
    parse: impl Fn(&str) -> Result<T, String>,
) -> Result<T, ConfigError> {
    raw.map_or(Ok(default), |value| {
        parse(value.trim()).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e))
    })
}

/// Parse a URL and make sure it ends in `/` so relative joins stay below it.
fn parse_root_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw).map_err(|e| e.to_string())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_default_url(raw: &str) -> Url {
    // The defaults are literal, well-formed URLs.
    parse_root_url(raw).unwrap_or_else(|e| unreachable!("default URL {raw}: {e}"))
}

fn parse_millis(raw: &str) -> Result<Duration, String> {
    raw.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|e| e.to_string())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got {other:?}")),
    }
}
