//! Command line arguments
//!
//! Every setting is optional here so that values from the configuration file
//! can fill the gaps; [`Args::overlay`] merges the two with the command line
//! taking precedence.

use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use super::config::ConfigError;
use crate::backend::{DEFAULT_BACKEND_URL, DEFAULT_REQUEST_TIMEOUT};
use crate::core::logging::LogFormat;
use crate::notifications::api::ExpiryPolicy;
use crate::session::SessionConfig;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "nexcart")]
#[command(about = "Smart-cart kiosk controller for a vision scanning backend")]
#[command(version = crate::core::version::LONG_VERSION)]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Base URL of the vision backend [default: http://127.0.0.1:5000]
    #[arg(long = "backend-url", value_name = "URL")]
    pub backend_url: Option<String>,

    /// How often to poll for a scanned product while scanning [default: 3000]
    #[arg(long = "poll-interval-ms", value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Ignore repeat scans of the same product for this long [default: 10000]
    #[arg(long = "cooldown-ms", value_name = "MS")]
    pub cooldown_ms: Option<u64>,

    /// How long a notification stays on screen [default: 3000]
    #[arg(long = "notification-ttl-ms", value_name = "MS")]
    pub notification_ttl_ms: Option<u64>,

    /// Whether an older notification timer may clear a newer message
    #[arg(long = "notification-expiry", value_name = "POLICY", value_parser = ["independent", "latest"])]
    pub notification_expiry: Option<String>,

    /// TOML file replacing the built-in recommendation table
    #[arg(long = "recommendations-file", value_name = "FILE")]
    pub recommendations_file: Option<PathBuf>,

    /// Directory the checkout bill is written to [default: .]
    #[arg(long = "bill-dir", value_name = "DIR")]
    pub bill_dir: Option<PathBuf>,

    /// Timeout for backend calls other than start [default: 10000]
    #[arg(long = "request-timeout-ms", value_name = "MS")]
    pub request_timeout_ms: Option<u64>,

    /// Color output (--color, --color=false); unspecified = auto/TTY
    #[arg(short = 'g', long = "color", num_args = 0..=1, default_missing_value = "true", value_name = "BOOL")]
    pub color: Option<bool>,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `self` (command line) over `base` (configuration file)
    pub fn overlay(self, base: Args) -> Args {
        Args {
            config_file: self.config_file.or(base.config_file),
            backend_url: self.backend_url.or(base.backend_url),
            poll_interval_ms: self.poll_interval_ms.or(base.poll_interval_ms),
            cooldown_ms: self.cooldown_ms.or(base.cooldown_ms),
            notification_ttl_ms: self.notification_ttl_ms.or(base.notification_ttl_ms),
            notification_expiry: self.notification_expiry.or(base.notification_expiry),
            recommendations_file: self.recommendations_file.or(base.recommendations_file),
            bill_dir: self.bill_dir.or(base.bill_dir),
            request_timeout_ms: self.request_timeout_ms.or(base.request_timeout_ms),
            color: self.color.or(base.color),
            log_level: self.log_level.or(base.log_level),
            log_file: self.log_file.or(base.log_file),
            log_format: self.log_format.or(base.log_format),
        }
    }

    pub fn backend_url(&self) -> &str {
        self.backend_url.as_deref().unwrap_or(DEFAULT_BACKEND_URL)
    }

    pub fn request_timeout(&self) -> Result<Duration, ConfigError> {
        positive_millis("request-timeout-ms", self.request_timeout_ms)
            .map(|timeout| timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT))
    }

    pub fn use_color(&self) -> bool {
        self.color
            .unwrap_or_else(|| std::io::stdout().is_terminal())
    }

    pub fn log_format(&self) -> Result<LogFormat, ConfigError> {
        match self.log_format.as_deref() {
            None => Ok(LogFormat::default()),
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                key: "log-format".to_string(),
                message: format!("log-format must be one of text, ext, json (got '{}')", value),
            }),
        }
    }

    /// File logging target; "none" and "-" disable it
    pub fn log_file(&self) -> Option<&std::path::Path> {
        self.log_file
            .as_deref()
            .filter(|path| !(path.as_os_str().eq_ignore_ascii_case("none") || path.as_os_str() == "-"))
    }

    /// Validated session tunables, defaults filled in
    pub fn session_config(&self) -> Result<SessionConfig, ConfigError> {
        let defaults = SessionConfig::default();

        let expiry_policy = match self.notification_expiry.as_deref() {
            None => defaults.expiry_policy,
            Some(value) => value
                .parse::<ExpiryPolicy>()
                .map_err(|_| ConfigError::InvalidValue {
                    key: "notification-expiry".to_string(),
                    message: format!(
                        "notification-expiry must be 'independent' or 'latest' (got '{}')",
                        value
                    ),
                })?,
        };

        Ok(SessionConfig {
            cooldown: positive_millis("cooldown-ms", self.cooldown_ms)?
                .unwrap_or(defaults.cooldown),
            notification_ttl: positive_millis("notification-ttl-ms", self.notification_ttl_ms)?
                .unwrap_or(defaults.notification_ttl),
            expiry_policy,
            poll_interval: positive_millis("poll-interval-ms", self.poll_interval_ms)?
                .unwrap_or(defaults.poll_interval),
            bill_dir: self.bill_dir.clone().unwrap_or(defaults.bill_dir),
        })
    }
}

fn positive_millis(key: &str, value: Option<u64>) -> Result<Option<Duration>, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} must be a positive number of milliseconds", key),
        }),
        other => Ok(other.map(Duration::from_millis)),
    }
}
