use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use sniffer::exec::Runner;

/// What a [`FakeRunner`] reports for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeOutcome {
    Pass,
    Fail,
    /// Fatal error with this message.
    Error(String),
}

/// A runner that:
/// - records the arguments of every call
/// - replays scripted outcomes, then passes once the script is exhausted.
#[derive(Debug)]
pub struct FakeRunner {
    name: String,
    script: Mutex<VecDeque<FakeOutcome>>,
    calls: Arc<Mutex<Vec<Vec<String>>>>,
}

impl FakeRunner {
    pub fn passing(name: &str) -> Self {
        Self::scripted(name, Vec::new())
    }

    pub fn scripted(name: &str, outcomes: Vec<FakeOutcome>) -> Self {
        Self {
            name: name.to_string(),
            script: Mutex::new(outcomes.into()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Arguments of every call so far.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Runner for FakeRunner {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, args: &[String]) -> anyhow::Result<bool> {
        self.calls.lock().unwrap().push(args.to_vec());
        match self.script.lock().unwrap().pop_front() {
            None | Some(FakeOutcome::Pass) => Ok(true),
            Some(FakeOutcome::Fail) => Ok(false),
            Some(FakeOutcome::Error(msg)) => Err(anyhow::anyhow!(msg)),
        }
    }
}
