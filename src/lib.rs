// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod scan;
pub mod types;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::Scent;
use crate::engine::{Sniffer, SnifferOptions};
use crate::scan::{select_scanner, PathSet, ScanSession};
use crate::types::BackendPreference;
use crate::validate::{DefaultValidator, DEFAULT_EXTENSIONS};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - scent loading
/// - scanner session and backend selection
/// - the sniffer's observers
/// - Ctrl-C handling
///
/// The watch loop runs on a blocking thread until it is stopped. A Ctrl-C
/// surfaces as [`SnifferError::Interrupted`](crate::errors::SnifferError::Interrupted).
pub async fn run(args: CliArgs) -> Result<()> {
    if args.debug {
        println!("Options: {args:?}");
        println!("Test Args: {:?}", args.test_args);
    }

    let scent = load_scent(Path::new(&args.scent))?;

    let (paths, default_validator) = match &scent {
        Some(scent) => (
            PathSet::new(scent.watch_paths())?,
            DefaultValidator::new(scent.extensions()),
        ),
        None => (PathSet::new(["."])?, DefaultValidator::new(&DEFAULT_EXTENSIONS)),
    };
    debug!(roots = ?paths.roots(), "watch roots resolved");

    let session = ScanSession::new(paths).with_default_validator(default_validator);
    let preference = if args.poll {
        BackendPreference::Polling
    } else {
        BackendPreference::Auto
    };
    let mut scanner = select_scanner(session, preference);

    let options = SnifferOptions {
        clear: !args.no_clear,
        debug: args.debug,
        test_args: args.test_args.clone(),
    };
    let sniffer = Sniffer::new(options, scent);
    sniffer.observe_scanner(scanner.as_mut())?;

    // Ctrl-C → stop the loop and report the interrupt.
    {
        let stop = scanner.stop_handle();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            stop.interrupt();
        });
    }

    println!("Starting watch...");
    let interval = args.wait_duration();
    tokio::task::spawn_blocking(move || scanner.run_loop(interval))
        .await
        .context("watch loop thread panicked")??;

    Ok(())
}

/// Load the scent file if it exists. A missing file is not an error.
fn load_scent(path: &Path) -> Result<Option<Scent>> {
    if !path.exists() {
        info!(path = ?path, "no scent file; using defaults");
        return Ok(None);
    }
    let scent = Scent::load(path).with_context(|| format!("loading scent file {:?}", path))?;
    info!(path = ?scent.path(), "using scent");
    Ok(Some(scent))
}
