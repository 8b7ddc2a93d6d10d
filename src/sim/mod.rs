//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (cosmetics draw from their own stream)
//! - Timers are clock deadlines, never callbacks
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod abilities;
pub mod collision;
pub mod difficulty;
pub mod physics;
pub mod scoring;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use difficulty::{Difficulty, scale_difficulty};
pub use physics::PressOutcome;
pub use snapshot::RenderSnapshot;
pub use spawner::{ObstaclePattern, choose_pattern};
pub use state::{
    Ability, GameEvent, GamePhase, GameState, JumpKind, Obstacle, ObstacleTier, PlayerState, Star,
};
pub use tick::{TickInput, tick};
