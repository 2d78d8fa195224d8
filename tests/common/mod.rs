#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use sniffer::fs::mock::MockFileSystem;
use sniffer::scan::{PathSet, PollingScanner, ScanSession, Scanner};

pub use sniffer_test_utils::init_tracing;
pub use sniffer_test_utils::recorder::EventLog;

/// Root of every mock project.
pub const ROOT: &str = "/proj";

pub fn root_path(rel: &str) -> PathBuf {
    PathBuf::from(ROOT).join(rel)
}

/// Mock filesystem with the given files under [`ROOT`].
pub fn mock_project(files: &[&str]) -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_dir(ROOT);
    for rel in files {
        fs.add_file(root_path(rel));
    }
    fs
}

/// Session watching [`ROOT`] on `fs`, with the default validator.
pub fn mock_session(fs: &MockFileSystem) -> ScanSession {
    let roots = PathSet::new([ROOT]).expect("absolute root");
    ScanSession::with_fs(roots, Arc::new(fs.clone()))
}

/// Polling scanner over `fs` with `log` observing every event kind, after a
/// silent baseline pass.
pub fn baselined_scanner(fs: &MockFileSystem, log: &EventLog) -> PollingScanner {
    let mut scanner = PollingScanner::new(mock_session(fs));
    scanner
        .session_mut()
        .bus_mut()
        .observe(sniffer::events::EventKind::ALL, log.observer())
        .expect("observe");
    scanner.scan(false).expect("baseline");
    scanner
}
