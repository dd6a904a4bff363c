//! Configuration file tests

use clap::Parser;
use nexcart::app::cli::args::Args;
use nexcart::app::cli::config::ConfigError;
use nexcart::cart::{RecommendationTable, TableError};
use nexcart::notifications::api::ExpiryPolicy;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_file_values_apply() {
    let file = config_file(
        r#"
        backend-url = "http://192.168.1.20:5000"
        poll-interval-ms = 1000
        notification-expiry = "latest"
        log-format = "json"
        "#,
    );

    let args = Args::from_config_file(Some(file.path())).await.unwrap();
    let config = args.session_config().unwrap();

    assert_eq!(args.backend_url(), "http://192.168.1.20:5000");
    assert_eq!(config.poll_interval, Duration::from_millis(1000));
    assert_eq!(config.expiry_policy, ExpiryPolicy::Latest);
    assert_eq!(args.log_format.as_deref(), Some("json"));
}

#[tokio::test]
async fn test_command_line_overrides_file() {
    let file = config_file(
        r#"
        cooldown-ms = 5000
        notification-ttl-ms = 1500
        "#,
    );

    let file_args = Args::from_config_file(Some(file.path())).await.unwrap();
    let cli = Args::try_parse_from(["nexcart", "--cooldown-ms", "12000"]).unwrap();
    let config = cli.overlay(file_args).session_config().unwrap();

    assert_eq!(config.cooldown, Duration::from_millis(12_000));
    assert_eq!(config.notification_ttl, Duration::from_millis(1500));
}

#[tokio::test]
async fn test_invalid_values_are_rejected() {
    let file = config_file("cooldown-ms = 0\n");
    assert!(matches!(
        Args::from_config_file(Some(file.path())).await,
        Err(ConfigError::InvalidValue { .. })
    ));

    let file = config_file("bill-dir = 42\n");
    assert!(matches!(
        Args::from_config_file(Some(file.path())).await,
        Err(ConfigError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn test_malformed_file_is_a_parse_error() {
    let file = config_file("backend-url = \n");
    assert!(matches!(
        Args::from_config_file(Some(file.path())).await,
        Err(ConfigError::Parse { .. })
    ));
}

#[tokio::test]
async fn test_recommendation_table_file() {
    let file = config_file(
        r#"
        [["Green Tea"]]
        name = "Honey"
        floor = 2
        row = 7
        brands = ["Brand H"]

        [["Green Tea"]]
        name = "Lemon"
        floor = 1
        row = 1
        brands = []
        "#,
    );

    let table = RecommendationTable::load(file.path()).await.unwrap();
    let set = table.lookup("Green Tea").unwrap();

    assert_eq!(table.len(), 1);
    assert_eq!(set.len(), 2);
    assert_eq!(set[0].name, "Honey");
    assert_eq!(set[0].row, 7);
    assert!(table.lookup("Bread").is_none());
}

#[tokio::test]
async fn test_recommendation_table_errors() {
    let file = config_file("[[\"Bread\"]]\nname = \"Jam\"\n");
    assert!(matches!(
        RecommendationTable::load(file.path()).await,
        Err(TableError::Parse { .. })
    ));

    let missing = std::path::Path::new("/nonexistent/recommendations.toml");
    assert!(matches!(
        RecommendationTable::load(missing).await,
        Err(TableError::Io { .. })
    ));
}
