//! Line Jump - An endless-runner arcade game
//!
//! Core modules:
//! - `sim`: Real-time simulation (physics, spawning, collisions, scoring)
//! - `levels`: Static level catalog
//! - `runner`: Host-facing driver (input latching, persistence at transitions)
//! - `persistence`: Key/value storage collaborator and saved progress
//! - `platform`: Browser bindings
//! - `tuning`: Data-driven game balance

pub mod levels;
pub mod persistence;
pub mod platform;
pub mod runner;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use levels::{CatalogError, DifficultyTag, LevelCatalog, LevelDefinition};
pub use runner::Runner;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Reference frame duration; all per-tick increments are tuned for 60 Hz
    pub const REFERENCE_FRAME_DT: f32 = 1.0 / 60.0;
    /// Smallest delta accepted per step (seconds)
    pub const MIN_FRAME_DT: f32 = 1.0 / 240.0;
    /// Largest delta accepted per step (seconds). Keeps per-step travel below
    /// the collidable width of an obstacle plus the player hitbox.
    pub const MAX_FRAME_DT: f32 = 1.0 / 30.0;

    /// World dimensions (y grows downward)
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;
    /// Height of the road strip at the bottom of the world
    pub const GROUND_HEIGHT: f32 = 65.0;
    /// Top edge of the road; obstacles stand on it
    pub const TRACK_Y: f32 = WORLD_HEIGHT - GROUND_HEIGHT;

    /// Player sprite is a square of this size
    pub const PLAYER_SIZE: f32 = 40.0;
    /// Fixed horizontal position of the player's left edge
    pub const PLAYER_X: f32 = 50.0;
    /// Player top edge when standing on the road
    pub const GROUND_LINE: f32 = TRACK_Y - PLAYER_SIZE;

    /// Obstacle geometry
    pub const OBSTACLE_WIDTH: f32 = 30.0;
    pub const OBSTACLE_LOW_HEIGHT: f32 = 35.0;
    pub const OBSTACLE_HIGH_HEIGHT: f32 = 70.0;

    /// Pickups are culled once their center passes this x
    pub const STAR_CULL_X: f32 = -20.0;
    /// Flying props are culled past these coordinates
    pub const PROP_CULL: f32 = -100.0;
}

/// Sanitize a host-supplied delta (seconds) into a frame scale factor.
///
/// Returns how many reference frames the step represents. Non-finite and
/// non-positive deltas count as the shortest accepted frame; long stalls
/// (backgrounded tabs) are capped.
#[inline]
pub fn frame_scale(dt: f32) -> f32 {
    use consts::*;
    let dt = if dt.is_finite() && dt > 0.0 {
        dt.clamp(MIN_FRAME_DT, MAX_FRAME_DT)
    } else {
        MIN_FRAME_DT
    };
    dt / REFERENCE_FRAME_DT
}

/// Convert a duration in seconds to reference frames
#[inline]
pub fn secs_to_frames(secs: f32) -> f64 {
    f64::from(secs) * 60.0
}

/// Convert a duration in milliseconds to reference frames
#[inline]
pub fn ms_to_frames(ms: f32) -> f64 {
    f64::from(ms) * 60.0 / 1000.0
}

/// Convert reference frames back to seconds
#[inline]
pub fn frames_to_secs(frames: f64) -> f32 {
    (frames / 60.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use consts::*;

    #[test]
    fn test_frame_scale_reference_is_exact() {
        assert_eq!(frame_scale(REFERENCE_FRAME_DT), 1.0);
    }

    #[test]
    fn test_frame_scale_clamps_bad_deltas() {
        let min = MIN_FRAME_DT / REFERENCE_FRAME_DT;
        let max = MAX_FRAME_DT / REFERENCE_FRAME_DT;
        assert_eq!(frame_scale(-1.0), min);
        assert_eq!(frame_scale(0.0), min);
        assert_eq!(frame_scale(f32::NAN), min);
        assert_eq!(frame_scale(f32::INFINITY), min);
        assert_eq!(frame_scale(12.0), max);
    }

    #[test]
    fn test_duration_conversions() {
        assert_eq!(secs_to_frames(15.0), 900.0);
        assert_eq!(ms_to_frames(3000.0), 180.0);
        assert_eq!(ms_to_frames(1000.0), 60.0);
        assert_eq!(frames_to_secs(900.0), 15.0);
    }
}
