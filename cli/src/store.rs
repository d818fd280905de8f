//! File-backed key-value store: one file per key under a data directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use neon_slide_core::{KeyValueStore, StoreError};
use tracing::{debug, warn};

pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data directory {}", dir.display()))?;
        debug!(dir = %dir.display(), "opened file store");
        Ok(FileStore { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read stored value");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key);
        fs::write(&path, value)
            .map_err(|err| StoreError::Backend(format!("{}: {}", path.display(), err)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_slide_core::scores::BEST_SCORES_KEY;
    use neon_slide_core::{Preferences, ScoreBook};

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("nothing-here"), None);
    }

    #[test]
    fn test_set_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        let mut store = FileStore::open(&nested).unwrap();
        store.set("puzzle-15-sound", "false").unwrap();
        assert_eq!(store.get("puzzle-15-sound").as_deref(), Some("false"));
        assert!(nested.join("puzzle-15-sound").exists());
    }

    #[test]
    fn test_keys_cannot_escape_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        store.set("../escape", "x").unwrap();
        assert!(!dir.path().parent().unwrap().join("escape").exists());
        assert_eq!(store.get("../escape").as_deref(), Some("x"));
    }

    #[test]
    fn test_scores_and_preferences_persist() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            let mut book = ScoreBook::default();
            book.record("3-numbers", 31);
            book.save(&mut store).unwrap();
            let mut prefs = Preferences::default();
            prefs.sound = false;
            prefs.unlock(4);
            prefs.save(&mut store).unwrap();
        }

        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(ScoreBook::load(&store).best("3-numbers"), Some(31));
        let prefs = Preferences::load(&store);
        assert!(!prefs.sound);
        assert_eq!(prefs.unlocked_tier, 4);
    }

    #[test]
    fn test_corrupt_scores_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(BEST_SCORES_KEY), "\u{0}garbage").unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(ScoreBook::load(&store).is_empty());
    }
}
