//! Recent-Search Store
//!
//! Bounded, deduplicated, most-recent-first search history persisted as a
//! JSON array under the app data directory. Loaded once at construction;
//! written through synchronously on every mutation. Persistence failures are
//! logged and swallowed: search keeps working, the history just does not
//! survive a reload.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::utils::error::AppResult;
use crate::utils::paths::{ensure_app_data_dir, ensure_dir, recent_searches_path};

/// Maximum number of persisted entries
pub const MAX_RECENT_SEARCHES: usize = 8;

/// Persisted most-recent-first search history
pub struct RecentSearchStore {
    path: PathBuf,
    entries: Mutex<Vec<String>>,
}

impl RecentSearchStore {
    /// Open the store at its default location, creating the application data
    /// directory and loading persisted history
    pub fn open() -> AppResult<Self> {
        ensure_app_data_dir()?;
        Ok(Self::with_path(recent_searches_path()?))
    }

    /// Open a store backed by an explicit file path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_silent(&path);
        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    /// Current entries, most recent first
    pub fn entries(&self) -> Vec<String> {
        self.lock_entries().clone()
    }

    /// Record a settled query at the front of the list.
    ///
    /// A case-insensitive duplicate elsewhere in the list moves to the front
    /// instead of duplicating; the list is then truncated and written
    /// through. Empty and whitespace-only text is ignored.
    pub fn record(&self, raw: &str) {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return;
        }

        let mut entries = self.lock_entries();
        let lowered = trimmed.to_lowercase();
        entries.retain(|existing| existing.to_lowercase() != lowered);
        entries.insert(0, trimmed.to_string());
        entries.truncate(MAX_RECENT_SEARCHES);
        self.persist(&entries);
    }

    /// Empty the history and write through
    pub fn clear(&self) {
        let mut entries = self.lock_entries();
        entries.clear();
        self.persist(&entries);
    }

    fn lock_entries(&self) -> std::sync::MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &[String]) {
        if let Err(e) = self.try_persist(entries) {
            tracing::warn!(
                path = %self.path.display(),
                "Failed to persist recent searches: {}",
                e
            );
        }
    }

    fn try_persist(&self, entries: &[String]) -> AppResult<()> {
        if let Some(parent) = self.path.parent() {
            ensure_dir(parent)?;
        }
        let json = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

/// Load persisted entries; a missing file is a normal first run, a corrupt
/// one is logged and treated as empty.
fn load_silent(path: &Path) -> Vec<String> {
    match fs::read_to_string(path) {
        Ok(data) => match serde_json::from_str::<Vec<String>>(&data) {
            Ok(mut entries) => {
                entries.truncate(MAX_RECENT_SEARCHES);
                entries
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Ignoring corrupt recent-searches file: {}",
                    e
                );
                Vec::new()
            }
        },
        Err(_) => Vec::new(),
    }
}
