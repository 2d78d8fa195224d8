// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`runner`] defines the [`Runner`] trait the orchestrator calls after
//!   each event, and [`CommandRunner`], which runs a shell command through
//!   `tokio::process::Command`.

pub mod runner;

pub use runner::{default_test_runner, CommandRunner, Runner, DEFAULT_TEST_COMMAND};
