// src/exec/runner.rs

//! Test runners invoked after each dispatched event.

use std::fmt;
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::process::Command;
use tokio::runtime::{Builder, Handle};
use tracing::{debug, info};

/// Command used when no scent file provides runners.
pub const DEFAULT_TEST_COMMAND: &str = "cargo test";

/// Something that runs the tests.
///
/// `Ok(true)` means the run passed, `Ok(false)` that it failed. `Err` is a
/// fatal condition that ends the watch session.
pub trait Runner: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn run(&self, args: &[String]) -> Result<bool>;
}

/// Runs a shell command with the extra test arguments appended.
///
/// Output is inherited so the test run prints straight to the terminal.
pub struct CommandRunner {
    name: String,
    cmd: String,
    handle: Option<Handle>,
}

impl fmt::Debug for CommandRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRunner")
            .field("name", &self.name)
            .field("cmd", &self.cmd)
            .finish()
    }
}

impl CommandRunner {
    /// Create a runner. If called inside a tokio runtime, that runtime's
    /// handle is captured and used for every run.
    pub fn new(name: impl Into<String>, cmd: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cmd: cmd.into(),
            handle: Handle::try_current().ok(),
        }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }

    fn command(&self, args: &[String]) -> Command {
        if cfg!(windows) {
            let mut c = Command::new("cmd");
            c.arg("/C").arg(&self.cmd).args(args);
            c
        } else {
            // Positional parameters keep the extra arguments unsplit.
            let mut c = Command::new("sh");
            c.arg("-c")
                .arg(format!("{} \"$@\"", self.cmd))
                .arg("sniffer")
                .args(args);
            c
        }
    }

    async fn spawn_and_wait(&self, args: &[String]) -> Result<ExitStatus> {
        let mut cmd = self.command(args);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning runner '{}' ({})", self.name, self.cmd))?;

        child
            .wait()
            .await
            .with_context(|| format!("waiting for runner '{}'", self.name))
    }
}

impl Runner for CommandRunner {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, args: &[String]) -> Result<bool> {
        info!(runner = %self.name, cmd = %self.cmd, ?args, "starting test run");

        let status = match &self.handle {
            Some(handle) => handle.block_on(self.spawn_and_wait(args))?,
            None => {
                debug!(runner = %self.name, "no ambient runtime; using a local one");
                let rt = Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .context("building runtime for test run")?;
                rt.block_on(self.spawn_and_wait(args))?
            }
        };

        info!(
            runner = %self.name,
            exit_code = status.code().unwrap_or(-1),
            success = status.success(),
            "test run finished"
        );
        Ok(status.success())
    }
}

/// The runner used when the scent file defines none.
pub fn default_test_runner() -> CommandRunner {
    CommandRunner::new("default", DEFAULT_TEST_COMMAND)
}
