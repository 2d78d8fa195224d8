// src/config/scent.rs

//! The loaded scent: validators and runners built from a scent file.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, warn};

use crate::config::loader::load_and_validate;
use crate::config::model::{ScentFile, ValidatorConfig, WatchSection};
use crate::errors::Result;
use crate::exec::{CommandRunner, Runner};
use crate::scan::paths::absolutize;
use crate::validate::Validator;

/// Validators and runners loaded from one scent file.
///
/// Reloading builds a new `Scent`; the caller swaps it in only if the load
/// succeeded.
#[derive(Clone)]
pub struct Scent {
    path: PathBuf,
    watch: WatchSection,
    validators: Vec<Validator>,
    runners: Vec<Arc<dyn Runner>>,
}

impl fmt::Debug for Scent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scent")
            .field("path", &self.path)
            .field("watch", &self.watch)
            .field("validators", &self.validators)
            .field("runners", &self.runners)
            .finish()
    }
}

impl Scent {
    /// Load and validate the scent file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = absolutize(path.as_ref())?;
        let file = load_and_validate(&path)?;
        let scent = Self::from_file(path, file)?;
        debug!(
            path = ?scent.path,
            validators = scent.validators.len(),
            runners = scent.runners.len(),
            "scent loaded"
        );
        Ok(scent)
    }

    /// Assemble a scent from already-built parts, with the default
    /// `[watch]` section.
    pub fn from_parts(
        path: impl AsRef<Path>,
        validators: Vec<Validator>,
        runners: Vec<Arc<dyn Runner>>,
    ) -> Result<Self> {
        Ok(Self {
            path: absolutize(path.as_ref())?,
            watch: WatchSection::default(),
            validators,
            runners,
        })
    }

    fn from_file(path: PathBuf, file: ScentFile) -> Result<Self> {
        let base = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("/"));

        let validators = file
            .validators
            .iter()
            .map(|cfg| build_validator(cfg, &base))
            .collect::<Result<Vec<_>>>()?;

        let runners = file
            .runners
            .iter()
            .map(|cfg| Arc::new(CommandRunner::new(&cfg.name, &cfg.cmd)) as Arc<dyn Runner>)
            .collect();

        Ok(Self {
            path,
            watch: file.watch,
            validators,
            runners,
        })
    }

    /// Re-read the file this scent came from.
    pub fn reload(&self) -> Result<Self> {
        Self::load(&self.path)
    }

    /// Absolute path of the scent file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    pub fn runners(&self) -> &[Arc<dyn Runner>] {
        &self.runners
    }

    pub fn watch_paths(&self) -> &[String] {
        &self.watch.paths
    }

    pub fn extensions(&self) -> &[String] {
        &self.watch.extensions
    }

    /// Runners to invoke for `selected`: just that runner if it exists,
    /// otherwise all of them in order.
    pub fn runners_for(&self, selected: Option<&str>) -> Vec<Arc<dyn Runner>> {
        if let Some(name) = selected {
            if let Some(runner) = self.runners.iter().find(|r| r.name() == name) {
                return vec![Arc::clone(runner)];
            }
            warn!(runner = %name, "selected runner is not defined; running all runners");
        }
        self.runners.clone()
    }

    /// Run [`runners_for`](Self::runners_for), stopping at the first
    /// failing run. Returns whether every run passed.
    pub fn run(&self, args: &[String], selected: Option<&str>) -> anyhow::Result<bool> {
        for runner in self.runners_for(selected) {
            let passed = runner
                .run(args)
                .with_context(|| format!("running '{}'", runner.name()))?;
            if !passed {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn build_validator(cfg: &ValidatorConfig, base: &Path) -> Result<Validator> {
    let by_extension = Validator::for_extensions(cfg.name.as_str(), &cfg.extensions);
    let has_extensions = !cfg.extensions.is_empty();
    let globs = build_globset(&cfg.patterns)?;
    let base = base.to_path_buf();

    let validator = Validator::new(cfg.name.as_str(), move |path: &Path| {
        if has_extensions && by_extension.accepts(path) {
            return true;
        }
        if globs.is_empty() {
            return false;
        }
        match path.strip_prefix(&base) {
            Ok(rel) => {
                let rel = rel.to_string_lossy().replace('\\', "/");
                globs.is_match(rel.as_str()) || globs.is_match(path)
            }
            Err(_) => globs.is_match(path),
        }
    });

    Ok(match &cfg.runnable {
        Some(runner) => validator.select_runnable(runner.as_str()),
        None => validator,
    })
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat).with_context(|| format!("invalid glob pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build().context("building validator globset")?)
}
