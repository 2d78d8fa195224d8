// src/scan/select.rs

use tracing::{debug, info};

use crate::scan::native::{NativeWatch, NotifyScanner};
use crate::scan::polling::PollingScanner;
use crate::scan::session::ScanSession;
use crate::scan::Scanner;
use crate::types::{BackendKind, BackendPreference};

/// Native backends worth trying on this platform, best first.
pub fn native_preference_order() -> &'static [BackendKind] {
    #[cfg(any(target_os = "linux", target_os = "android"))]
    {
        &[BackendKind::Inotify]
    }
    #[cfg(target_os = "macos")]
    {
        &[BackendKind::FsEvents]
    }
    #[cfg(target_os = "windows")]
    {
        &[BackendKind::ReadDirectoryChanges]
    }
    #[cfg(any(
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    ))]
    {
        &[BackendKind::Kqueue]
    }
    #[cfg(not(any(
        target_os = "linux",
        target_os = "android",
        target_os = "macos",
        target_os = "windows",
        target_os = "freebsd",
        target_os = "openbsd",
        target_os = "netbsd",
        target_os = "dragonfly"
    )))]
    {
        &[]
    }
}

/// Pick a scanner for `session`.
///
/// Never fails: if no native backend can be opened the portable
/// [`PollingScanner`] is used.
pub fn select_scanner(session: ScanSession, preference: BackendPreference) -> Box<dyn Scanner> {
    match preference {
        BackendPreference::Polling => {
            info!(backend = %BackendKind::Polling, "native backends disabled");
            Box::new(PollingScanner::new(session))
        }
        BackendPreference::Auto => select_from(session, native_preference_order()),
    }
}

/// Probe `order` and return the first backend that opens over the
/// session's roots, or a polling scanner.
pub fn select_from(session: ScanSession, order: &[BackendKind]) -> Box<dyn Scanner> {
    for &kind in order {
        if !kind.is_native() {
            continue;
        }
        match NativeWatch::open(kind, session.paths().roots()) {
            Ok(native) => {
                info!(backend = %kind, "using native file watch backend");
                return Box::new(NotifyScanner::new(session, native));
            }
            Err(err) => debug!(backend = %kind, error = %err, "backend unavailable"),
        }
    }

    info!(backend = %BackendKind::Polling, "falling back to polling");
    Box::new(PollingScanner::new(session))
}
