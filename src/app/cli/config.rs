//! TOML configuration file loading
//!
//! Keys mirror the long command line flags (`backend-url`, `cooldown-ms`,
//! ...). Values are applied to an [`Args`] that the command line is then
//! overlaid on.

use std::path::{Path, PathBuf};

use super::args::Args;

pub const CONFIG_DIR_NAME: &str = "NexCart";
pub const CONFIG_FILE_NAME: &str = "nexcart.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    #[error("{message}")]
    FileNotFound { path: PathBuf, message: String },

    #[error("Error reading configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

impl crate::core::error_handling::ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        !matches!(self, ConfigError::Io { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { message, .. } => Some(message),
            ConfigError::FileNotFound { message, .. } => Some(message),
            ConfigError::Parse { message, .. } => Some(message),
            ConfigError::Io { .. } => None,
        }
    }
}

/// `<config_dir>/NexCart/nexcart.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

const KNOWN_KEYS: &[&str] = &[
    "backend-url",
    "poll-interval-ms",
    "cooldown-ms",
    "notification-ttl-ms",
    "notification-expiry",
    "recommendations-file",
    "bill-dir",
    "request-timeout-ms",
    "color",
    "no-color",
    "log-level",
    "log-file",
    "log-format",
];

impl Args {
    /// Load settings from `config_file`, or from the default location if
    /// that exists. An explicitly named file must exist.
    pub async fn from_config_file(config_file: Option<&Path>) -> Result<Args, ConfigError> {
        let path = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::FileNotFound {
                        path: path.to_path_buf(),
                        message: format!(
                            "The specified configuration file does not exist: {}",
                            path.display()
                        ),
                    });
                }
                path.to_path_buf()
            }
            None => match default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Args::default()),
            },
        };

        log::debug!("Loading configuration from {}", path.display());
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.clone(),
                source,
            })?;
        let config = contents
            .parse::<toml::Table>()
            .map_err(|e| ConfigError::Parse {
                path: path.clone(),
                message: format!("{}: {}", path.display(), e.message()),
            })?;

        let mut args = Args::default();
        Self::apply_toml_values(&mut args, &config)?;
        Ok(args)
    }

    /// Apply TOML configuration values to Args
    pub fn apply_toml_values(args: &mut Self, config: &toml::Table) -> Result<(), ConfigError> {
        for key in config.keys() {
            if !KNOWN_KEYS.contains(&key.as_str()) {
                log::warn!("Ignoring unknown configuration key '{}'", key);
            }
        }

        if let Some(url) = string_value(config, "backend-url")? {
            args.backend_url = Some(url);
        }
        if let Some(ms) = millis_value(config, "poll-interval-ms")? {
            args.poll_interval_ms = Some(ms);
        }
        if let Some(ms) = millis_value(config, "cooldown-ms")? {
            args.cooldown_ms = Some(ms);
        }
        if let Some(ms) = millis_value(config, "notification-ttl-ms")? {
            args.notification_ttl_ms = Some(ms);
        }
        if let Some(ms) = millis_value(config, "request-timeout-ms")? {
            args.request_timeout_ms = Some(ms);
        }
        if let Some(policy) = string_value(config, "notification-expiry")? {
            if !matches!(policy.as_str(), "independent" | "latest") {
                return Err(ConfigError::InvalidValue {
                    key: "notification-expiry".to_string(),
                    message: format!(
                        "notification-expiry must be 'independent' or 'latest' (got '{}')",
                        policy
                    ),
                });
            }
            args.notification_expiry = Some(policy);
        }
        if let Some(file) = string_value(config, "recommendations-file")? {
            args.recommendations_file = Some(PathBuf::from(file));
        }
        if let Some(dir) = string_value(config, "bill-dir")? {
            args.bill_dir = Some(PathBuf::from(dir));
        }
        if let Some(color) = bool_value(config, "color")? {
            args.color = Some(color);
        }
        if let Some(no_color) = bool_value(config, "no-color")? {
            args.color = Some(!no_color);
        }
        if let Some(level) = string_value(config, "log-level")? {
            args.log_level = Some(level);
        }
        if let Some(log_file) = string_value(config, "log-file")? {
            args.log_file = Some(PathBuf::from(log_file));
        }
        if let Some(format) = string_value(config, "log-format")? {
            args.log_format = Some(format);
        }

        Ok(())
    }
}

fn wrong_type(key: &str, expected: &str, value: &toml::Value) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("{} must be {} (got {})", key, expected, value.type_str()),
    }
}

fn string_value(config: &toml::Table, key: &str) -> Result<Option<String>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(key, "a string", other)),
    }
}

fn bool_value(config: &toml::Table, key: &str) -> Result<Option<bool>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(key, "true or false", other)),
    }
}

fn millis_value(config: &toml::Table, key: &str) -> Result<Option<u64>, ConfigError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(ms)) if *ms > 0 => Ok(Some(*ms as u64)),
        Some(toml::Value::Integer(_)) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("{} must be a positive number of milliseconds", key),
        }),
        Some(other) => Err(wrong_type(key, "an integer", other)),
    }
}
