// src/config/validate.rs

use std::collections::HashSet;

use globset::Glob;

use crate::config::model::{RawScentFile, ScentFile};
use crate::errors::{Result, SnifferError};

impl TryFrom<RawScentFile> for ScentFile {
    type Error = SnifferError;

    fn try_from(raw: RawScentFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_scent(&raw)?;
        Ok(ScentFile::new_unchecked(raw))
    }
}

fn validate_raw_scent(raw: &RawScentFile) -> Result<()> {
    validate_watch(raw)?;
    validate_runners(raw)?;
    validate_validators(raw)?;
    Ok(())
}

fn validate_watch(raw: &RawScentFile) -> Result<()> {
    if raw.watch.paths.iter().any(|p| p.trim().is_empty()) {
        return Err(SnifferError::ConfigError(
            "[watch].paths must not contain empty entries".to_string(),
        ));
    }
    Ok(())
}

fn validate_runners(raw: &RawScentFile) -> Result<()> {
    let mut names = HashSet::new();
    for runner in &raw.runners {
        ensure_name("runner", &runner.name)?;
        if !names.insert(runner.name.as_str()) {
            return Err(SnifferError::ConfigError(format!(
                "duplicate runner name '{}'",
                runner.name
            )));
        }
        if runner.cmd.trim().is_empty() {
            return Err(SnifferError::ConfigError(format!(
                "runner '{}' has an empty `cmd`",
                runner.name
            )));
        }
    }
    Ok(())
}

fn validate_validators(raw: &RawScentFile) -> Result<()> {
    let runners: HashSet<&str> = raw.runners.iter().map(|r| r.name.as_str()).collect();
    let mut names = HashSet::new();

    for validator in &raw.validators {
        ensure_name("validator", &validator.name)?;
        if !names.insert(validator.name.as_str()) {
            return Err(SnifferError::ConfigError(format!(
                "duplicate validator name '{}'",
                validator.name
            )));
        }

        if validator.extensions.is_empty() && validator.patterns.is_empty() {
            return Err(SnifferError::ConfigError(format!(
                "validator '{}' needs at least one of `extensions` or `patterns`",
                validator.name
            )));
        }

        for pattern in &validator.patterns {
            Glob::new(pattern).map_err(|e| {
                SnifferError::ConfigError(format!(
                    "validator '{}' has invalid pattern '{}': {}",
                    validator.name, pattern, e
                ))
            })?;
        }

        if let Some(runnable) = &validator.runnable {
            if !runners.contains(runnable.as_str()) {
                return Err(SnifferError::ConfigError(format!(
                    "validator '{}' selects unknown runner '{}'",
                    validator.name, runnable
                )));
            }
        }
    }
    Ok(())
}

fn ensure_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(SnifferError::ConfigError(format!(
            "every [[{what}]] needs a non-empty `name`"
        )));
    }
    Ok(())
}
