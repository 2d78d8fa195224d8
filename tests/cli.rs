// tests/cli.rs

use std::time::Duration;

use clap::Parser;

use sniffer::cli::{CliArgs, LogLevel};
use sniffer::logging::{level_from_log_level, parse_level_str};

#[test]
fn defaults() {
    let args = CliArgs::try_parse_from(["sniffer"]).expect("parse");
    assert_eq!(args.wait_duration(), Duration::from_millis(500));
    assert!(!args.no_clear);
    assert!(!args.debug);
    assert!(!args.poll);
    assert!(args.test_args.is_empty());
    assert_eq!(args.scent, "scent.toml");
    assert_eq!(args.effective_log_level(), None);
}

#[test]
fn wait_must_be_a_positive_number() {
    let args = CliArgs::try_parse_from(["sniffer", "-w", "2"]).expect("parse");
    assert_eq!(args.wait_duration(), Duration::from_secs(2));

    let args = CliArgs::try_parse_from(["sniffer", "-w", "86400"]).expect("parse");
    assert_eq!(args.wait_duration(), Duration::from_secs(86_400));

    for bad in ["0", "-1", "soon", "inf", "NaN", "1e-300", "86401", "1e19", "1e20"] {
        assert!(
            CliArgs::try_parse_from(["sniffer", "--wait", bad]).is_err(),
            "accepted --wait {bad}"
        );
    }
}

#[test]
fn test_args_repeat_and_allow_leading_hyphens() {
    let args = CliArgs::try_parse_from([
        "sniffer",
        "-x",
        "--nocapture",
        "--test-arg",
        "-q",
        "-x",
        "filter",
    ])
    .expect("parse");
    assert_eq!(args.test_args, vec!["--nocapture", "-q", "filter"]);
}

#[test]
fn switches_and_scent_path() {
    let args = CliArgs::try_parse_from([
        "sniffer",
        "--no-clear",
        "--poll",
        "--scent",
        "ci/scent.toml",
    ])
    .expect("parse");
    assert!(args.no_clear);
    assert!(args.poll);
    assert_eq!(args.scent, "ci/scent.toml");
}

#[test]
fn debug_implies_debug_logging_unless_a_level_is_given() {
    let args = CliArgs::try_parse_from(["sniffer", "--debug"]).expect("parse");
    assert_eq!(args.effective_log_level(), Some(LogLevel::Debug));

    let args =
        CliArgs::try_parse_from(["sniffer", "--debug", "--log-level", "warn"]).expect("parse");
    assert_eq!(args.effective_log_level(), Some(LogLevel::Warn));
}

#[test]
fn log_level_strings() {
    assert_eq!(parse_level_str(" Warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("TRACE"), Some(tracing::Level::TRACE));
    assert_eq!(parse_level_str("loud"), None);
    assert_eq!(level_from_log_level(LogLevel::Error), tracing::Level::ERROR);
}
