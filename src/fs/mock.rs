// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File { modified: SystemTime },
    Dir(Vec<String>), // List of child names
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, MockEntry>,
    /// Seconds since the epoch handed out to the next write.
    clock: u64,
    /// Paths whose `modified()` fails, simulating a stat race.
    failing_stat: HashSet<PathBuf>,
}

/// In-memory filesystem with a deterministic clock.
///
/// Every write gets a modification time one second later than the previous
/// write, so `touch` is always observed as a strictly newer timestamp.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        // Ensure root exists
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            state: Arc::new(Mutex::new(MockState {
                files,
                clock: 1_000_000,
                failing_stat: HashSet::new(),
            })),
        }
    }

    /// Create or overwrite a file, creating parent directories implicitly.
    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let modified = UNIX_EPOCH + Duration::from_secs(state.clock);
        state.files.insert(
            path.clone(),
            MockEntry::File { modified },
        );
        Self::link_into_parent(&mut state.files, &path);
    }

    /// Create an empty directory (and its parents).
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        Self::ensure_dir_entry(&mut state.files, path.as_ref());
    }

    /// Bump the modification time of an existing file.
    pub fn touch(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.clock += 1;
        let now = UNIX_EPOCH + Duration::from_secs(state.clock);
        if let Some(MockEntry::File { modified, .. }) = state.files.get_mut(path.as_ref()) {
            *modified = now;
        }
    }

    /// Set an explicit modification time (may move backwards or stay equal).
    pub fn set_modified(&self, path: impl AsRef<Path>, time: SystemTime) {
        let mut state = self.state.lock().unwrap();
        if let Some(MockEntry::File { modified, .. }) = state.files.get_mut(path.as_ref()) {
            *modified = time;
        }
    }

    /// Current modification time of a file, if present.
    pub fn modified_of(&self, path: impl AsRef<Path>) -> Option<SystemTime> {
        let state = self.state.lock().unwrap();
        match state.files.get(path.as_ref()) {
            Some(MockEntry::File { modified, .. }) => Some(*modified),
            _ => None,
        }
    }

    /// Remove a file or directory (recursively) and unlink it from its parent.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.state.lock().unwrap();
        state
            .files
            .retain(|p, _| p != path && !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if let Some(MockEntry::Dir(children)) = state.files.get_mut(parent) {
                let name = name.to_string_lossy();
                children.retain(|c| c.as_str() != name);
            }
        }
    }

    /// Make `modified()` fail for `path` until [`clear_stat_failure`] is called.
    ///
    /// [`clear_stat_failure`]: MockFileSystem::clear_stat_failure
    pub fn fail_stat(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.failing_stat.insert(path.as_ref().to_path_buf());
    }

    pub fn clear_stat_failure(&self, path: impl AsRef<Path>) {
        let mut state = self.state.lock().unwrap();
        state.failing_stat.remove(path.as_ref());
    }

    fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if let Some(parent) = path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };

            Self::ensure_dir_entry(files, parent);
            if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
                if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                    if !children.iter().any(|c| c == name) {
                        children.push(name.to_string());
                    }
                }
            }
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        if path.parent().is_some() {
            Self::link_into_parent(files, path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        state.files.contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.files.get(path), Some(MockEntry::File { .. }))
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.state.lock().unwrap();
        matches!(state.files.get(path), Some(MockEntry::Dir(_)))
    }

    fn modified(&self, path: &Path) -> Result<SystemTime> {
        let state = self.state.lock().unwrap();
        if state.failing_stat.contains(path) {
            return Err(anyhow!("stat failed: {:?}", path));
        }
        match state.files.get(path) {
            Some(MockEntry::File { modified, .. }) => Ok(*modified),
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let state = self.state.lock().unwrap();
        match state.files.get(path) {
            Some(MockEntry::Dir(children)) => {
                Ok(children.iter().map(|name| path.join(name)).collect())
            }
            _ => Err(anyhow!("Not a directory or not found: {:?}", path)),
        }
    }
}
