//! Best scores and player preferences, persisted through a key-value store.
//!
//! Stored data may be missing, stale or hand-edited. Loading never fails:
//! anything that does not parse falls back to defaults.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::error::StoreError;

pub const BEST_SCORES_KEY: &str = "puzzle-15-best-scores";
pub const SOUND_KEY: &str = "puzzle-15-sound";
pub const UNLOCKED_TIER_KEY: &str = "puzzle-15-unlocked-tier";

/// Storage boundary: string values under stable string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store, for tests and front ends without persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Fewest moves per puzzle configuration, keyed like `"4-numbers"`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook {
    best: BTreeMap<String, u32>,
}

impl ScoreBook {
    /// Read the book from `store`, starting empty if it is absent or unreadable.
    #[instrument(skip(store))]
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let Some(raw) = store.get(BEST_SCORES_KEY) else {
            debug!("no saved best scores");
            return Self::default();
        };

        match serde_json::from_str::<ScoreBook>(&raw) {
            Ok(book) => {
                debug!(entries = book.best.len(), "loaded best scores");
                book
            }
            Err(err) => {
                warn!(error = %err, "ignoring malformed best scores");
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(self).map_err(|source| StoreError::Encode {
            key: BEST_SCORES_KEY.to_string(),
            source,
        })?;
        store.set(BEST_SCORES_KEY, &encoded)
    }

    pub fn best(&self, key: &str) -> Option<u32> {
        self.best.get(key).copied()
    }

    /// Record a finished puzzle. Returns true when it beats the previous best.
    #[instrument(skip(self))]
    pub fn record(&mut self, key: &str, moves: u32) -> bool {
        match self.best.get(key) {
            Some(&best) if best <= moves => false,
            previous => {
                info!(previous = ?previous.copied(), "new best score");
                self.best.insert(key.to_string(), moves);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.best.iter().map(|(key, &moves)| (key.as_str(), moves))
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}

/// Player preferences that outlive a single puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub sound: bool,
    /// Highest progression tier the player has unlocked.
    pub unlocked_tier: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Preferences {
            sound: true,
            unlocked_tier: 0,
        }
    }
}

impl Preferences {
    #[instrument(skip(store))]
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Self {
        let defaults = Self::default();

        let sound = match store.get(SOUND_KEY).as_deref() {
            Some("true") => true,
            Some("false") => false,
            None => defaults.sound,
            Some(other) => {
                warn!(value = other, "ignoring malformed sound preference");
                defaults.sound
            }
        };

        let unlocked_tier = match store.get(UNLOCKED_TIER_KEY) {
            None => defaults.unlocked_tier,
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!(value = %raw, "ignoring malformed unlocked tier");
                defaults.unlocked_tier
            }),
        };

        Preferences {
            sound,
            unlocked_tier,
        }
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        store.set(SOUND_KEY, if self.sound { "true" } else { "false" })?;
        store.set(UNLOCKED_TIER_KEY, &self.unlocked_tier.to_string())
    }

    /// Raise the unlocked tier. Never lowers it; returns true if it changed.
    pub fn unlock(&mut self, tier: u32) -> bool {
        if tier > self.unlocked_tier {
            info!(tier, "unlocked tier");
            self.unlocked_tier = tier;
            true
        } else {
            false
        }
    }
}
