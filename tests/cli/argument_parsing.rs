//! Argument parsing tests

use clap::Parser;
use nexcart::app::cli::args::Args;
use nexcart::app::cli::config::ConfigError;
use nexcart::notifications::api::ExpiryPolicy;
use std::time::Duration;

#[test]
fn test_every_tunable_flag() {
    let args = Args::try_parse_from([
        "nexcart",
        "--backend-url",
        "https://vision.local",
        "--poll-interval-ms",
        "1500",
        "--cooldown-ms",
        "8000",
        "--notification-ttl-ms",
        "2000",
        "--notification-expiry",
        "latest",
        "--request-timeout-ms",
        "4000",
        "--bill-dir",
        "bills",
    ])
    .unwrap();

    let config = args.session_config().unwrap();
    assert_eq!(args.backend_url(), "https://vision.local");
    assert_eq!(config.poll_interval, Duration::from_millis(1500));
    assert_eq!(config.cooldown, Duration::from_millis(8000));
    assert_eq!(config.notification_ttl, Duration::from_millis(2000));
    assert_eq!(config.expiry_policy, ExpiryPolicy::Latest);
    assert_eq!(args.request_timeout().unwrap(), Duration::from_millis(4000));
    assert!(config.bill_path().ends_with("bills/NexCart_Bill.txt"));
}

#[test]
fn test_short_logging_flags() {
    let args = Args::try_parse_from(["nexcart", "-l", "debug", "-o", "ext", "-f", "kiosk.log", "-g"])
        .unwrap();

    assert_eq!(args.log_level.as_deref(), Some("debug"));
    assert_eq!(args.log_format.as_deref(), Some("ext"));
    assert!(args.log_file().is_some());
    assert_eq!(args.color, Some(true));
}

#[test]
fn test_rejected_values() {
    assert!(Args::try_parse_from(["nexcart", "--cooldown-ms", "soon"]).is_err());
    assert!(Args::try_parse_from(["nexcart", "--cooldown-ms", "-1"]).is_err());
    assert!(Args::try_parse_from(["nexcart", "--log-level", "loud"]).is_err());
    assert!(Args::try_parse_from(["nexcart", "--log-format", "xml"]).is_err());
}

#[test]
fn test_zero_timeout_is_invalid() {
    let args = Args::try_parse_from(["nexcart", "--request-timeout-ms", "0"]).unwrap();
    assert!(matches!(
        args.request_timeout(),
        Err(ConfigError::InvalidValue { .. })
    ));
}
