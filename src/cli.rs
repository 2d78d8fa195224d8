// src/cli.rs

//! CLI argument parsing using `clap`.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::DEFAULT_SCENT_FILE;

/// Command-line arguments for `sniffer`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "sniffer",
    version,
    about = "Watch a directory tree and re-run tests whenever relevant files change.",
    long_about = None
)]
pub struct CliArgs {
    /// Seconds to wait between polling passes.
    #[arg(short = 'w', long = "wait", value_name = "SECONDS", default_value_t = 0.5, value_parser = parse_wait)]
    pub wait: f64,

    /// Do not clear the console before each run.
    #[arg(long)]
    pub no_clear: bool,

    /// Echo every detected change.
    #[arg(long)]
    pub debug: bool,

    /// Argument passed through to the test runner. Repeatable.
    #[arg(
        short = 'x',
        long = "test-arg",
        value_name = "ARG",
        allow_hyphen_values = true
    )]
    pub test_args: Vec<String>,

    /// Path to the scent file (TOML).
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SCENT_FILE)]
    pub scent: String,

    /// Always use the polling backend, even where a native one exists.
    #[arg(long)]
    pub poll: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `--debug` implies `debug`; otherwise `SNIFFER_LOG` or
    /// `info` is used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

impl CliArgs {
    pub fn wait_duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.wait).unwrap_or(Duration::from_secs_f64(MAX_WAIT_SECS))
    }

    pub fn effective_log_level(&self) -> Option<LogLevel> {
        match (self.log_level, self.debug) {
            (Some(level), _) => Some(level),
            (None, true) => Some(LogLevel::Debug),
            (None, false) => None,
        }
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Longest accepted pause between polling passes: one day.
pub const MAX_WAIT_SECS: f64 = 86_400.0;

fn parse_wait(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a number of seconds"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("wait must be a positive number of seconds (got {s})"));
    }
    if secs > MAX_WAIT_SECS {
        return Err(format!("wait must be at most {MAX_WAIT_SECS} seconds (got {s})"));
    }
    match Duration::try_from_secs_f64(secs) {
        Ok(d) if !d.is_zero() => Ok(secs),
        _ => Err(format!("wait is too short to sleep on (got {s})")),
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
