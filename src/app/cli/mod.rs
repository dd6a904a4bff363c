//! Command line arguments, configuration file and terminal display

pub mod args;
pub mod config;
pub mod display;

pub use args::Args;
pub use config::{default_config_path, ConfigError};
