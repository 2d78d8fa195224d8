// src/config/mod.rs

//! Scent files: the declarative description of what to watch and what to
//! run.
//!
//! - [`model`] is the TOML-backed data model.
//! - [`loader`] reads a scent file from disk.
//! - [`validate`] checks names, runner references and glob patterns.
//! - [`scent`] turns a validated file into validators and runners.

pub mod loader;
pub mod model;
pub mod scent;
pub mod validate;

pub use loader::{default_scent_path, load_and_validate, load_from_path, DEFAULT_SCENT_FILE};
pub use model::{RawScentFile, RunnerConfig, ScentFile, ValidatorConfig, WatchSection};
pub use scent::Scent;
