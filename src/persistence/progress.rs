//! Persisted progress counters
//!
//! Current level, unlocked levels, best score and career score. Loaded once
//! at startup and written back only at level unlock and run end.

use serde::{Deserialize, Serialize};

use super::{Storage, load_int, save_int};
use crate::levels::LevelCatalog;

const CURRENT_LEVEL_KEY: &str = "currentLevel";
const UNLOCKED_LEVELS_KEY: &str = "unlockedLevels";
const BEST_SCORE_KEY: &str = "lineJumpHighScore";
const CAREER_SCORE_KEY: &str = "lineJumpCareerScore";

/// Saved progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub current_level: u32,
    /// Sorted, deduplicated, always contains the first level
    pub unlocked_levels: Vec<u32>,
    pub best_score: u64,
    /// Sum of scores over every finished run and cleared level
    pub career_score: u64,
}

impl Progress {
    /// Fresh progress: only the first level unlocked
    pub fn new(catalog: &LevelCatalog) -> Self {
        let first = catalog.first().id;
        Self {
            current_level: first,
            unlocked_levels: vec![first],
            best_score: 0,
            career_score: 0,
        }
    }

    /// Load progress, repairing anything missing or corrupt
    pub fn load(storage: &dyn Storage, catalog: &LevelCatalog) -> Self {
        let mut progress = Self::new(catalog);

        if let Some(ids) = Self::load_unlocked(storage) {
            for id in ids {
                if catalog.get(id).is_some() {
                    progress.insert_unlocked(id);
                } else {
                    log::warn!("Dropping unknown unlocked level {}", id);
                }
            }
        }

        if let Some(level) = load_int(storage, CURRENT_LEVEL_KEY) {
            match u32::try_from(level) {
                Ok(id) if progress.is_unlocked(id) => progress.current_level = id,
                _ => log::warn!("Saved current level {} is not playable", level),
            }
        }

        progress.best_score = load_int(storage, BEST_SCORE_KEY).unwrap_or(0);
        progress.career_score = load_int(storage, CAREER_SCORE_KEY).unwrap_or(0);

        log::info!(
            "Loaded progress: level {}, unlocked {:?}, best {}, career {}",
            progress.current_level,
            progress.unlocked_levels,
            progress.best_score,
            progress.career_score
        );
        progress
    }

    fn load_unlocked(storage: &dyn Storage) -> Option<Vec<u32>> {
        match storage.get_item(UNLOCKED_LEVELS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<u32>>(&json) {
                Ok(ids) => Some(ids),
                Err(e) => {
                    log::warn!("Corrupt unlocked levels ({}), keeping defaults", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("Failed to read unlocked levels: {}", e);
                None
            }
        }
    }

    fn insert_unlocked(&mut self, id: u32) -> bool {
        match self.unlocked_levels.binary_search(&id) {
            Ok(_) => false,
            Err(pos) => {
                self.unlocked_levels.insert(pos, id);
                true
            }
        }
    }

    pub fn is_unlocked(&self, id: u32) -> bool {
        self.unlocked_levels.binary_search(&id).is_ok()
    }

    /// Unlock a level and persist the set. Returns true if newly unlocked.
    pub fn unlock(&mut self, id: u32, storage: &mut dyn Storage) -> bool {
        if !self.insert_unlocked(id) {
            return false;
        }
        log::info!("Unlocked level {}", id);
        match serde_json::to_string(&self.unlocked_levels) {
            Ok(json) => {
                if let Err(e) = storage.set_item(UNLOCKED_LEVELS_KEY, &json) {
                    log::warn!("Failed to save unlocked levels: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to encode unlocked levels: {}", e),
        }
        true
    }

    pub fn set_current_level(&mut self, id: u32, storage: &mut dyn Storage) {
        self.current_level = id;
        save_int(storage, CURRENT_LEVEL_KEY, u64::from(id));
    }

    /// Record totals after a level clear or run end
    pub fn record_scores(&mut self, career_score: u64, best_score: u64, storage: &mut dyn Storage) {
        if career_score != self.career_score {
            self.career_score = career_score;
            save_int(storage, CAREER_SCORE_KEY, career_score);
        }
        if best_score > self.best_score {
            self.best_score = best_score;
            save_int(storage, BEST_SCORE_KEY, best_score);
        }
    }
}
