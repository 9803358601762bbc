//! Logging system configuration and initialization
//!
//! - Console output (plain or JSON)
//! - Optional daily-rolling file output
//! - KST (Korea Standard Time) timestamps, matching the catalog's locale
//! - `RUST_LOG` overrides the configured level; `GUIDECOM_DEBUG=1` forces debug

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use chrono::{FixedOffset, Utc};
use once_cell::sync::Lazy;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    EnvFilter, Layer, Registry,
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

// Re-export LoggingConfig from config module
pub use crate::infrastructure::config::LoggingConfig;

/// Environment switch that forces debug output
pub const DEBUG_ENV: &str = "GUIDECOM_DEBUG";

const KST_OFFSET_SECONDS: i32 = 9 * 3600;

// Keeps file writers alive for the lifetime of the process
static LOG_GUARDS: Lazy<Mutex<Vec<WorkerGuard>>> = Lazy::new(|| Mutex::new(Vec::new()));

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Custom time formatter for KST (UTC+9)
struct KstTimeFormatter;

impl FormatTime for KstTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let kst_offset = FixedOffset::east_opt(KST_OFFSET_SECONDS).ok_or(std::fmt::Error)?;
        let kst_time = Utc::now().with_timezone(&kst_offset);
        write!(w, "{}", kst_time.format("%Y-%m-%d %H:%M:%S%.3f %:z"))
    }
}

/// Get the log directory relative to the executable location
pub fn get_log_directory() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(std::path::Path::to_path_buf))
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default())
        .join("logs")
}

/// Whether `GUIDECOM_DEBUG` asks for debug output
pub fn debug_requested() -> bool {
    std::env::var(DEBUG_ENV).is_ok_and(|value| is_truthy(&value))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

/// Level actually used, after the debug switch
pub fn effective_level(config: &LoggingConfig, debug_switch: bool) -> String {
    if debug_switch && !config.level.eq_ignore_ascii_case("trace") {
        "debug".to_string()
    } else {
        config.level.clone()
    }
}

/// Filter directives: our crate at `level`, HTTP internals quieted unless tracing
pub fn filter_directives(level: &str) -> String {
    if level.to_lowercase().contains("trace") {
        level.to_string()
    } else {
        format!("{level},reqwest=info,hyper=warn,hyper_util=warn,h2=warn,html5ever=warn,selectors=warn")
    }
}

/// Initialize logging with custom configuration
pub fn init_logging_with_config(config: &LoggingConfig) -> Result<()> {
    let level = effective_level(config, debug_requested());
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directives(&level)))
        .map_err(|e| anyhow!("Invalid log level '{}': {}", level, e))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();

    if config.console_output {
        let console_layer = if config.json_format {
            fmt::layer().json().with_timer(KstTimeFormatter).boxed()
        } else {
            fmt::layer().with_timer(KstTimeFormatter).with_target(false).boxed()
        };
        layers.push(console_layer);
    }

    if config.file_output {
        let log_dir = config.log_dir.clone().unwrap_or_else(get_log_directory);
        std::fs::create_dir_all(&log_dir)
            .map_err(|e| anyhow!("Failed to create log directory {:?}: {}", log_dir, e))?;

        let (file_writer, file_guard) = non_blocking(rolling::daily(&log_dir, &config.file_prefix));
        if let Ok(mut guards) = LOG_GUARDS.lock() {
            guards.push(file_guard);
        }

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_timer(KstTimeFormatter)
                .with_ansi(false)
                .boxed()
        } else {
            fmt::layer()
                .with_writer(file_writer)
                .with_timer(KstTimeFormatter)
                .with_target(true)
                .with_ansi(false)
                .boxed()
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    tracing::info!("Logging initialized at level '{}'", level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_switch_values() {
        assert!(is_truthy("1"));
        assert!(is_truthy(" TRUE "));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("0"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_effective_level() {
        let config = LoggingConfig::default();
        assert_eq!(effective_level(&config, false), "info");
        assert_eq!(effective_level(&config, true), "debug");

        let config = LoggingConfig {
            level: "trace".to_string(),
            ..LoggingConfig::default()
        };
        assert_eq!(effective_level(&config, true), "trace");
    }

    #[test]
    fn test_filter_directives_parse() {
        for level in ["info", "debug", "warn", "trace"] {
            assert!(EnvFilter::try_new(filter_directives(level)).is_ok(), "{level}");
        }
        assert!(filter_directives("debug").contains("hyper=warn"));
        assert_eq!(filter_directives("trace"), "trace");
    }
}
