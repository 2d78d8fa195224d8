// src/validate/mod.rs

//! Path acceptance.
//!
//! A scanner only reports paths its [`ValidatorChain`] accepts. The chain
//! either ANDs its validators together or, when any validator names a
//! runner, routes each accepted path to that runner.

pub mod chain;
pub mod validator;

pub use chain::{ChainEdit, ValidatorChain, ValidatorHandle};
pub use validator::{
    not_repo, DefaultValidator, Predicate, Validator, DEFAULT_EXTENSIONS, VCS_DIRS,
};
