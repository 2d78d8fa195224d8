// tests/backend_selection.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;

use tempfile::TempDir;

use sniffer::scan::{native_preference_order, select_from, select_scanner, PathSet, ScanSession};
use sniffer::types::{BackendKind, BackendPreference};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn empty_preference_order_falls_back_to_polling() -> TestResult {
    init_tracing();
    let dir = TempDir::new()?;
    let session = ScanSession::new(PathSet::new([dir.path()])?);

    let scanner = select_from(session, &[]);
    assert_eq!(scanner.kind(), BackendKind::Polling);
    Ok(())
}

#[test]
fn forced_polling_skips_native_backends() -> TestResult {
    let dir = TempDir::new()?;
    let session = ScanSession::new(PathSet::new([dir.path()])?);

    let scanner = select_scanner(session, BackendPreference::Polling);
    assert_eq!(scanner.kind(), BackendKind::Polling);
    Ok(())
}

#[test]
fn unopenable_roots_fall_back_to_polling() -> TestResult {
    let dir = TempDir::new()?;
    let missing = dir.path().join("does/not/exist");
    let session = ScanSession::new(PathSet::new([&missing])?);

    let scanner = select_scanner(session, BackendPreference::Auto);
    assert_eq!(scanner.kind(), BackendKind::Polling);
    assert_eq!(scanner.session().paths().roots(), &[missing]);
    Ok(())
}

#[test]
fn polling_in_the_order_is_not_treated_as_native() -> TestResult {
    let dir = TempDir::new()?;
    let session = ScanSession::new(PathSet::new([dir.path()])?);

    let scanner = select_from(session, &[BackendKind::Polling]);
    assert_eq!(scanner.kind(), BackendKind::Polling);
    Ok(())
}

#[test]
fn auto_selection_never_fails() -> TestResult {
    let dir = TempDir::new()?;
    let session = ScanSession::new(PathSet::new([dir.path()])?);

    let scanner = select_scanner(session, BackendPreference::Auto);
    let kind = scanner.kind();
    assert!(kind == BackendKind::Polling || native_preference_order().contains(&kind));
    Ok(())
}

#[cfg(target_os = "linux")]
#[test]
fn linux_prefers_inotify_and_rejects_foreign_backends() -> TestResult {
    assert_eq!(native_preference_order(), &[BackendKind::Inotify]);

    let dir = TempDir::new()?;
    let session = ScanSession::new(PathSet::new([dir.path()])?);
    let scanner = select_from(
        session,
        &[BackendKind::FsEvents, BackendKind::ReadDirectoryChanges],
    );
    assert_eq!(scanner.kind(), BackendKind::Polling);
    Ok(())
}

#[test]
fn preference_order_lists_only_native_backends() {
    assert!(native_preference_order().iter().all(|k| k.is_native()));
    assert!(!BackendKind::Polling.is_native());
}
