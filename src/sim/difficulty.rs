//! Difficulty scaler
//!
//! Pure function of score and level: every `difficulty_step` points the
//! obstacle speed grows and the spawn interval shrinks, both clamped.

use serde::Serialize;

use crate::levels::LevelDefinition;
use crate::tuning::Tuning;

/// Effective difficulty for the current tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Difficulty {
    pub steps: u64,
    pub speed_multiplier: f32,
    /// Obstacle speed in px per reference frame
    pub speed: f32,
    pub spawn_interval_ms: f32,
}

pub fn scale_difficulty(score: u64, level: &LevelDefinition, tuning: &Tuning) -> Difficulty {
    let steps = score / tuning.difficulty_step.max(1);
    let speed_multiplier =
        (1.0 + steps as f32 * tuning.speed_increment).min(tuning.max_speed_multiplier);
    let spawn_interval_ms = (level.base_spawn_interval_ms
        - steps as f32 * tuning.interval_decrement_ms)
        .max(tuning.min_spawn_interval_ms);

    Difficulty {
        steps,
        speed_multiplier,
        speed: level.base_speed * speed_multiplier,
        spawn_interval_ms,
    }
}
