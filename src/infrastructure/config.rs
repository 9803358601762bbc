//! Configuration infrastructure
//!
//! All tunables of a search session live in [`SearchConfig`]; nothing reads ambient
//! module-level state. Configuration is layered:
//! 1. Built-in defaults (see [`defaults`])
//! 2. Optional config file (TOML/JSON/YAML, chosen by extension)
//! 3. `GUIDECOM_*` environment variables (`__` separates nested keys,
//!    e.g. `GUIDECOM_LOGGING__LEVEL=debug`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::parsing::ParsingConfig;
use crate::domain::parsing_error::ParsingError;
use crate::domain::CurationPlan;

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GUIDECOM";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {message}")]
    Validation { message: String },

    #[error("Invalid selector configuration: {0}")]
    Selector(#[from] ParsingError),
}

impl ConfigError {
    fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}

/// Complete search session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Catalog origin, e.g. `https://www.guidecom.co.kr`
    pub base_url: String,

    /// Path of the search endpoint under `base_url`
    pub search_path: String,

    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Mandatory pause between two page fetches of one search
    pub page_delay_ms: u64,

    /// Minimum gap between any two requests leaving the HTTP client
    pub min_request_gap_ms: u64,

    /// Raw records fetched per requested result, absorbing dedup/invalid loss
    pub over_fetch_multiple: usize,

    /// Hard ceiling on pages fetched by one search
    pub max_pages: u32,

    /// Consecutive empty pages that mark the end of the result set
    pub empty_page_limit: u32,

    /// Attempts per request in the HTTP client (first try included)
    pub retry_attempts: u32,

    /// Jittered backoff window before a retry
    pub retry_backoff_min_ms: u64,
    pub retry_backoff_max_ms: u64,

    /// Bodies shorter than this are treated as failed responses
    pub min_response_bytes: usize,

    /// User agent pool; one is picked per client and kept for its lifetime
    pub user_agents: Vec<String>,

    /// `Accept-Language` header sent with every request
    pub accept_language: String,

    /// Sort-bucket mix for curated searches
    pub curation: CurationPlan,

    /// Markup selectors
    pub parsing: ParsingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable daily-rolling file output
    pub file_output: bool,

    /// Directory for log files; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// File name prefix for rolled log files
    pub file_prefix: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: guidecom::BASE_URL.to_string(),
            search_path: guidecom::SEARCH_PATH.to_string(),
            request_timeout_secs: defaults::REQUEST_TIMEOUT_SECONDS,
            page_delay_ms: defaults::PAGE_DELAY_MS,
            min_request_gap_ms: defaults::MIN_REQUEST_GAP_MS,
            over_fetch_multiple: defaults::OVER_FETCH_MULTIPLE,
            max_pages: defaults::MAX_PAGES,
            empty_page_limit: defaults::EMPTY_PAGE_LIMIT,
            retry_attempts: defaults::RETRY_ATTEMPTS,
            retry_backoff_min_ms: defaults::RETRY_BACKOFF_MIN_MS,
            retry_backoff_max_ms: defaults::RETRY_BACKOFF_MAX_MS,
            min_response_bytes: defaults::MIN_RESPONSE_BYTES,
            user_agents: defaults::USER_AGENTS.iter().map(|ua| (*ua).to_string()).collect(),
            accept_language: defaults::ACCEPT_LANGUAGE.to_string(),
            curation: CurationPlan::default(),
            parsing: ParsingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: None,
            file_prefix: "guidecom-search.log".to_string(),
        }
    }
}

impl SearchConfig {
    /// Load defaults, then the optional file, then `GUIDECOM_*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, None)
    }

    /// Same layering; `env` replaces the process environment when given
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder().add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(env),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make a search loop unbounded or meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::validation("base_url must not be empty"));
        }
        if self.over_fetch_multiple == 0 {
            return Err(ConfigError::validation("over_fetch_multiple must be greater than 0"));
        }
        if self.max_pages == 0 {
            return Err(ConfigError::validation("max_pages must be greater than 0"));
        }
        if self.empty_page_limit == 0 {
            return Err(ConfigError::validation("empty_page_limit must be greater than 0"));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::validation("request_timeout_secs must be greater than 0"));
        }
        if self.retry_attempts == 0 {
            return Err(ConfigError::validation("retry_attempts must be at least 1"));
        }
        if self.retry_backoff_min_ms > self.retry_backoff_max_ms {
            return Err(ConfigError::validation(
                "retry_backoff_min_ms cannot be greater than retry_backoff_max_ms",
            ));
        }
        if self.user_agents.iter().all(|ua| ua.trim().is_empty()) {
            return Err(ConfigError::validation("user_agents must contain at least one entry"));
        }
        Ok(())
    }

    pub const fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub const fn min_request_gap(&self) -> Duration {
        Duration::from_millis(self.min_request_gap_ms)
    }
}

/// Guidecom site constants
pub mod guidecom {
    /// Site origin
    pub const BASE_URL: &str = "https://www.guidecom.co.kr";

    /// Search result page (GET)
    pub const SEARCH_PATH: &str = "/search/index.html";

    pub mod params {
        pub const KEYWORD: &str = "keyword";
        pub const ORDER: &str = "order";
        pub const MAKER: &str = "maker";
        pub const PAGE: &str = "page";

        /// Multi-value separator for `maker`
        pub const MAKER_SEPARATOR: &str = ",";
    }
}

/// Default values
pub mod defaults {
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 20;
    pub const PAGE_DELAY_MS: u64 = 350;
    pub const MIN_REQUEST_GAP_MS: u64 = 250;
    pub const OVER_FETCH_MULTIPLE: usize = 3;
    pub const MAX_PAGES: u32 = 10;
    pub const EMPTY_PAGE_LIMIT: u32 = 2;
    pub const RETRY_ATTEMPTS: u32 = 3;
    pub const RETRY_BACKOFF_MIN_MS: u64 = 1200;
    pub const RETRY_BACKOFF_MAX_MS: u64 = 2200;
    pub const MIN_RESPONSE_BYTES: usize = 300;
    pub const ACCEPT_LANGUAGE: &str = "ko-KR,ko;q=0.9,en-US;q=0.8,en;q=0.7";

    pub const USER_AGENTS: [&str; 3] = [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_6_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.3 Safari/605.1.15",
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_delay(), Duration::from_millis(350));
        assert_eq!(config.over_fetch_multiple, 3);
        assert_eq!(config.max_pages, 10);
    }

    #[test]
    fn test_validation_rejects_zero_ceiling() {
        let config = SearchConfig {
            max_pages: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        let config = SearchConfig {
            user_agents: vec!["  ".to_string()],
            ..SearchConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "page_delay_ms = 10\nmax_pages = 4\n\n[logging]\nlevel = \"debug\""
        )
        .unwrap();

        let config = SearchConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.page_delay_ms, 10);
        assert_eq!(config.max_pages, 4);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.curation, CurationPlan::default());
        assert_eq!(config.over_fetch_multiple, defaults::OVER_FETCH_MULTIPLE);
    }

    #[test]
    fn test_environment_overrides_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "page_delay_ms = 10\n\n[logging]\nlevel = \"debug\"").unwrap();

        let env = config::Map::from([
            ("GUIDECOM_PAGE_DELAY_MS".to_string(), "777".to_string()),
            ("GUIDECOM_LOGGING__LEVEL".to_string(), "warn".to_string()),
            ("GUIDECOM_LOGGING__JSON_FORMAT".to_string(), "true".to_string()),
            ("OTHERAPP_MAX_PAGES".to_string(), "1".to_string()),
        ]);

        let config = SearchConfig::load_with_env(Some(file.path()), Some(env)).unwrap();
        assert_eq!(config.page_delay_ms, 777);
        assert_eq!(config.logging.level, "warn");
        assert!(config.logging.json_format);
        assert_eq!(config.max_pages, defaults::MAX_PAGES);
    }

    #[test]
    fn test_environment_values_are_validated() {
        let env = config::Map::from([("GUIDECOM_MAX_PAGES".to_string(), "0".to_string())]);

        assert!(matches!(
            SearchConfig::load_with_env(None, Some(env)),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_load_rejects_invalid_file_values() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "over_fetch_multiple = 0").unwrap();

        assert!(matches!(
            SearchConfig::load(Some(file.path())),
            Err(ConfigError::Validation { .. })
        ));
    }
}
