// tests/exit_status.rs

mod common;
use crate::common::{mock_project, mock_session};

use std::time::Duration;

use anyhow::{anyhow, Context};

use sniffer::errors::{is_interrupt, Outcome, SnifferError};
use sniffer::scan::{PollingScanner, Scanner};

#[test]
fn clean_finish_exits_zero_silently() {
    let outcome = Outcome::of(&Ok(()));
    assert_eq!(outcome, Outcome::Finished);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.message(), None);
}

#[test]
fn interrupted_loop_says_good_bye_and_exits_zero() {
    let fs = mock_project(&["src/lib.rs"]);
    let mut scanner = PollingScanner::new(mock_session(&fs));
    scanner.stop_handle().interrupt();

    let result = scanner
        .run_loop(Duration::from_millis(10))
        .context("watch loop ended");
    let outcome = Outcome::of(&result);

    assert_eq!(outcome, Outcome::Interrupted);
    assert_eq!(outcome.exit_code(), 0);
    assert_eq!(outcome.message(), Some("Good bye."));
}

#[test]
fn fatal_errors_print_a_diagnostic_and_exit_one() {
    let result: anyhow::Result<()> = Err(anyhow::Error::from(SnifferError::ConfigError(
        "duplicate runner name 'unit'".into(),
    )))
    .context("loading scent.toml");
    let outcome = Outcome::of(&result);

    assert_eq!(outcome.exit_code(), 1);
    let message = outcome.message().unwrap_or_default();
    assert!(message.starts_with("sniffer error: loading scent.toml"), "{message}");
    assert!(message.contains("duplicate runner name 'unit'"), "{message}");
}

#[test]
fn only_interrupts_count_as_interrupts() {
    assert!(is_interrupt(&anyhow::Error::from(SnifferError::Interrupted)));
    assert!(is_interrupt(
        &anyhow::Error::from(SnifferError::Interrupted).context("outer")
    ));
    assert!(!is_interrupt(&anyhow!("interrupted")));
    assert!(!is_interrupt(&anyhow::Error::from(SnifferError::BackendUnavailable(
        "inotify".into()
    ))));
}
