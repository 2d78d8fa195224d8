// src/engine/mod.rs

//! Orchestration: hooking scanners up to the scent and the test runners.
//!
//! [`Sniffer`] registers its observers on each scanner's event bus and owns
//! the fatal-error policy: a runner error stops every attached scanner.

pub mod sniffer;

pub use sniffer::{Sniffer, SnifferOptions};
