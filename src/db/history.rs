use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Last-recommended timestamps keyed by garment identity
///
/// Entries are never evicted. When opened with a path, the whole map is
/// rewritten after every mutation while the lock is held, so concurrent
/// recommendations cannot lose each other's updates.
#[derive(Debug, Default)]
pub struct WearHistory {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
    path: Option<PathBuf>,
}

impl WearHistory {
    /// History that lives only as long as the process
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads history from a JSON file, starting empty if it is missing or unreadable
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_file(&path) {
            Ok(entries) => {
                tracing::info!(
                    path = %path.display(),
                    entries = entries.len(),
                    "Wear history loaded"
                );
                entries
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Starting with empty wear history"
                );
                HashMap::new()
            }
        };

        Self {
            entries: Mutex::new(entries),
            path: Some(path),
        }
    }

    fn read_file(path: &Path) -> anyhow::Result<HashMap<String, DateTime<Utc>>> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes a sibling temp file and renames it over `path`, so a crash
    /// mid-write never leaves a truncated history behind
    fn write_file(path: &Path, entries: &HashMap<String, DateTime<Utc>>) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        let mut staging = path.as_os_str().to_owned();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);
        std::fs::write(&staging, json)?;
        std::fs::rename(&staging, path)?;
        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        // A panic mid-update leaves at worst a stale timestamp
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn last_worn(&self, key: &str) -> Option<DateTime<Utc>> {
        self.lock().get(key).copied()
    }

    /// Stamps every key with `at`, overwriting earlier timestamps
    ///
    /// Persisting blocks on file I/O under the lock; async callers should run
    /// this off the runtime threads.
    pub fn record<'a>(&self, keys: impl IntoIterator<Item = &'a str>, at: DateTime<Utc>) {
        let mut entries = self.lock();
        for key in keys {
            entries.insert(key.to_string(), at);
        }

        if let Some(path) = &self.path {
            if let Err(e) = Self::write_file(path, &entries) {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not persist wear history"
                );
            }
        }
    }

    pub fn snapshot(&self) -> HashMap<String, DateTime<Utc>> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
