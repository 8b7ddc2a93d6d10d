//! Level catalog
//!
//! Ordered, read-only list of level definitions. Progress bookkeeping
//! (unlocks, current level) lives in `persistence::Progress`.

use serde::{Deserialize, Serialize};

/// Difficulty tag; selects the obstacle pattern weight table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyTag {
    Easy,
    Medium,
    Hard,
}

/// A single level definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDefinition {
    pub id: u32,
    pub name: String,
    pub description: String,
    /// Obstacle speed in px per reference frame, before difficulty scaling
    pub base_speed: f32,
    /// Obstacle spawn interval before difficulty scaling
    pub base_spawn_interval_ms: f32,
    /// Live score that clears the level
    pub target_score: u64,
    pub difficulty: DifficultyTag,
}

/// Rejected host catalog
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("level catalog is empty")]
    Empty,
    #[error("duplicate level id {0}")]
    DuplicateId(u32),
}

/// Ordered level list; never empty, ids unique
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawCatalog")]
pub struct LevelCatalog {
    levels: Vec<LevelDefinition>,
}

/// Wire shape of a catalog before validation
#[derive(Deserialize)]
struct RawCatalog {
    levels: Vec<LevelDefinition>,
}

impl TryFrom<RawCatalog> for LevelCatalog {
    type Error = CatalogError;

    fn try_from(raw: RawCatalog) -> Result<Self, Self::Error> {
        Self::new(raw.levels)
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The three shipped levels
    pub fn builtin() -> Self {
        Self {
            levels: vec![
                LevelDefinition {
                    id: 1,
                    name: "Level 1".to_string(),
                    description: "Warm-up".to_string(),
                    base_speed: 4.0,
                    base_spawn_interval_ms: 3000.0,
                    target_score: 500,
                    difficulty: DifficultyTag::Easy,
                },
                LevelDefinition {
                    id: 2,
                    name: "Level 2".to_string(),
                    description: "Speed-up".to_string(),
                    base_speed: 5.5,
                    base_spawn_interval_ms: 2300.0,
                    target_score: 1300,
                    difficulty: DifficultyTag::Medium,
                },
                LevelDefinition {
                    id: 3,
                    name: "Level 3".to_string(),
                    description: "Extreme".to_string(),
                    base_speed: 7.0,
                    base_spawn_interval_ms: 1800.0,
                    target_score: 2300,
                    difficulty: DifficultyTag::Hard,
                },
            ],
        }
    }

    /// Build a catalog from host-supplied levels, ordered by id
    pub fn new(mut levels: Vec<LevelDefinition>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        levels.sort_by_key(|l| l.id);
        if let Some(w) = levels.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(CatalogError::DuplicateId(w[0].id));
        }
        Ok(Self { levels })
    }

    /// Parse a host catalog such as `{"levels": [...]}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn levels(&self) -> &[LevelDefinition] {
        &self.levels
    }

    pub fn get(&self, id: u32) -> Option<&LevelDefinition> {
        self.levels.iter().find(|l| l.id == id)
    }

    /// First level; always present
    pub fn first(&self) -> &LevelDefinition {
        &self.levels[0]
    }

    /// Id of the level after `id`, if any
    pub fn next_level_id(&self, id: u32) -> Option<u32> {
        let pos = self.levels.iter().position(|l| l.id == id)?;
        self.levels.get(pos + 1).map(|l| l.id)
    }

    /// Lookup that falls back to the first level for unknown ids
    pub fn get_or_first(&self, id: u32) -> &LevelDefinition {
        self.get(id).unwrap_or_else(|| {
            log::warn!("Unknown level {}, falling back to level {}", id, self.first().id);
            self.first()
        })
    }
}
