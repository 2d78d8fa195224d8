// src/errors.rs

//! Crate-wide error type and aliases.

use thiserror::Error;

use crate::events::{EventKind, ObserverId};

#[derive(Error, Debug)]
pub enum SnifferError {
    #[error(
        "invalid event kind: {0} (expected one of \"created\", \"modified\", \"deleted\", \"init\")"
    )]
    InvalidEventKind(String),

    #[error("observer {id} is not registered for {kind} events")]
    ObserverNotFound { kind: EventKind, id: ObserverId },

    #[error("validator not found: {0}")]
    ValidatorNotFound(String),

    #[error("observer failed while dispatching {kind} event")]
    ObserverFailed {
        kind: EventKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("file watch backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("file watch error: {0}")]
    Notify(#[from] notify::Error),

    /// The watch loop was stopped by a keyboard interrupt.
    #[error("interrupted")]
    Interrupted,

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SnifferError {
    /// True if this error only reports a keyboard interrupt.
    pub fn is_interrupt(&self) -> bool {
        matches!(self, SnifferError::Interrupted)
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, SnifferError>;

/// True if `err`, or anything it wraps, is a keyboard interrupt.
pub fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain()
        .any(|cause| cause.downcast_ref::<SnifferError>().is_some_and(SnifferError::is_interrupt))
}

/// How the process ends after a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Finished,
    /// Stopped by Ctrl-C; reported as a normal exit.
    Interrupted,
    /// A fatal error, with the diagnostic to print.
    Failed(String),
}

impl Outcome {
    pub fn of(result: &anyhow::Result<()>) -> Self {
        match result {
            Ok(()) => Outcome::Finished,
            Err(err) if is_interrupt(err) => Outcome::Interrupted,
            Err(err) => Outcome::Failed(format!("sniffer error: {err:?}")),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Finished | Outcome::Interrupted => 0,
            Outcome::Failed(_) => 1,
        }
    }

    /// Line to print on the way out, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Finished => None,
            Outcome::Interrupted => Some("Good bye."),
            Outcome::Failed(diagnostic) => Some(diagnostic),
        }
    }
}
