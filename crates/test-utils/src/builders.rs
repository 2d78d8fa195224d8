#![allow(dead_code)]

use sniffer::config::{RawScentFile, RunnerConfig, ScentFile, ValidatorConfig, WatchSection};

/// Builder for scent files, either as a validated `ScentFile` or as TOML
/// text to write next to a test project.
pub struct ScentFileBuilder {
    raw: RawScentFile,
}

impl ScentFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawScentFile {
                watch: WatchSection::default(),
                validators: Vec::new(),
                runners: Vec::new(),
            },
        }
    }

    pub fn watch_paths(mut self, paths: &[&str]) -> Self {
        self.raw.watch.paths = paths.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn extensions(mut self, extensions: &[&str]) -> Self {
        self.raw.watch.extensions = extensions.iter().map(|e| e.to_string()).collect();
        self
    }

    pub fn validator(mut self, validator: ValidatorConfig) -> Self {
        self.raw.validators.push(validator);
        self
    }

    pub fn runner(mut self, name: &str, cmd: &str) -> Self {
        self.raw.runners.push(RunnerConfig {
            name: name.to_string(),
            cmd: cmd.to_string(),
        });
        self
    }

    pub fn raw(self) -> RawScentFile {
        self.raw
    }

    pub fn build(self) -> ScentFile {
        ScentFile::try_from(self.raw).expect("Failed to build valid scent from builder")
    }

    /// Render as TOML in the layout a user would write.
    pub fn to_toml(&self) -> String {
        let mut out = String::new();
        out.push_str("[watch]\n");
        out.push_str(&format!("paths = {}\n", toml_list(&self.raw.watch.paths)));
        out.push_str(&format!(
            "extensions = {}\n",
            toml_list(&self.raw.watch.extensions)
        ));

        for v in &self.raw.validators {
            out.push_str("\n[[validator]]\n");
            out.push_str(&format!("name = {:?}\n", v.name));
            if !v.extensions.is_empty() {
                out.push_str(&format!("extensions = {}\n", toml_list(&v.extensions)));
            }
            if !v.patterns.is_empty() {
                out.push_str(&format!("patterns = {}\n", toml_list(&v.patterns)));
            }
            if let Some(r) = &v.runnable {
                out.push_str(&format!("runnable = {:?}\n", r));
            }
        }

        for r in &self.raw.runners {
            out.push_str("\n[[runner]]\n");
            out.push_str(&format!("name = {:?}\n", r.name));
            out.push_str(&format!("cmd = {:?}\n", r.cmd));
        }
        out
    }
}

impl Default for ScentFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `[[validator]]` entries.
pub struct ValidatorConfigBuilder {
    validator: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            validator: ValidatorConfig {
                name: name.to_string(),
                extensions: Vec::new(),
                patterns: Vec::new(),
                runnable: None,
            },
        }
    }

    pub fn extension(mut self, ext: &str) -> Self {
        self.validator.extensions.push(ext.to_string());
        self
    }

    pub fn pattern(mut self, pattern: &str) -> Self {
        self.validator.patterns.push(pattern.to_string());
        self
    }

    pub fn runnable(mut self, runner: &str) -> Self {
        self.validator.runnable = Some(runner.to_string());
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.validator
    }
}

fn toml_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| format!("{:?}", s)).collect();
    format!("[{}]", quoted.join(", "))
}
