// src/scan/stop.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

#[derive(Debug, Default)]
struct StopState {
    stopped: AtomicBool,
    interrupted: AtomicBool,
    lock: Mutex<()>,
    wake: Condvar,
}

/// Cloneable signal used to end a scanner's loop.
///
/// Stopping is final for the session and idempotent. `stop()` only flips a
/// flag and wakes any sleeper, so it is safe to call from an observer while
/// the scanner is dispatching.
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    inner: Arc<StopState>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        if !self.inner.stopped.swap(true, Ordering::SeqCst) {
            debug!("scanner stop requested");
        }
        let _guard = self.lock();
        self.inner.wake.notify_all();
    }

    /// Stop because of a keyboard interrupt; the loop reports
    /// [`SnifferError::Interrupted`](crate::errors::SnifferError::Interrupted)
    /// once it has unwound.
    pub fn interrupt(&self) {
        self.inner.interrupted.store(true, Ordering::SeqCst);
        self.stop();
    }

    pub fn is_stopped(&self) -> bool {
        self.inner.stopped.load(Ordering::SeqCst)
    }

    pub fn was_interrupted(&self) -> bool {
        self.inner.interrupted.load(Ordering::SeqCst)
    }

    /// Sleep up to `timeout`, returning early once stopped.
    ///
    /// Returns whether the handle is stopped. A timeout too large to put a
    /// deadline on waits until stopped.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut guard = self.lock();
        while !self.is_stopped() {
            guard = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    match self.inner.wake.wait_timeout(guard, deadline - now) {
                        Ok((guard, _)) => guard,
                        Err(poisoned) => poisoned.into_inner().0,
                    }
                }
                None => match self.inner.wake.wait(guard) {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                },
            };
        }
        self.is_stopped()
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        match self.inner.lock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
