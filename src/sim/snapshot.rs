//! Per-frame render snapshot
//!
//! Read-only view handed to the presentation layer. Serializes to JSON for
//! web hosts.

use serde::Serialize;

use super::state::{Abilities, FlyingProp, GamePhase, GameState, ObstacleTier, Particle};
use crate::consts::*;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub vy: f32,
    pub grounded: bool,
    /// Blink while invincible
    pub invincible: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleView {
    pub id: u32,
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub tier: ObstacleTier,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StarView {
    pub id: u32,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityView {
    pub triple_jump: bool,
    pub triple_jump_secs: f32,
    pub magnet: bool,
    pub magnet_secs: f32,
    pub shield: bool,
    pub pickup_streak: u32,
}

impl AbilityView {
    fn new(abilities: &Abilities, clock: f64) -> Self {
        Self {
            triple_jump: abilities.triple_jump_active(),
            triple_jump_secs: Abilities::remaining_secs(abilities.triple_jump_until, clock),
            magnet: abilities.magnet_active(),
            magnet_secs: Abilities::remaining_secs(abilities.magnet_until, clock),
            shield: abilities.shield,
            pickup_streak: abilities.pickup_streak,
        }
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub level_id: u32,
    pub player: PlayerView,
    pub obstacles: Vec<ObstacleView>,
    pub stars: Vec<StarView>,
    pub particles: Vec<Particle>,
    pub props: Vec<FlyingProp>,
    pub live_score: u64,
    pub base_score: u64,
    pub target_score: u64,
    pub lives: u8,
    pub max_lives: u8,
    pub abilities: AbilityView,
    /// Second tap would jump higher right now
    pub double_tap_open: bool,
    pub best_score: u64,
    pub career_score: u64,
    pub speed: f32,
}

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let player = &state.player;
        Self {
            phase: state.phase,
            level_id: state.level.id,
            player: PlayerView {
                x: PLAYER_X,
                y: player.y,
                size: PLAYER_SIZE,
                vy: player.vy,
                grounded: player.is_grounded(),
                invincible: state.is_invincible(),
            },
            obstacles: state
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    x: o.x,
                    y: o.top(),
                    width: o.width,
                    height: o.height(),
                    tier: o.tier,
                })
                .collect(),
            stars: state
                .stars
                .iter()
                .map(|s| StarView {
                    id: s.id,
                    x: s.pos.x,
                    y: s.pos.y,
                })
                .collect(),
            particles: state.particles.clone(),
            props: state.props.clone(),
            live_score: state.run.live_score,
            base_score: state.run.base_score,
            target_score: state.level.target_score,
            lives: state.run.lives,
            max_lives: state.tuning.max_lives,
            abilities: AbilityView::new(&state.abilities, state.clock),
            double_tap_open: state
                .player
                .double_tap_until
                .is_some_and(|until| state.clock < until),
            best_score: state.run.best_score,
            career_score: state.run.career_score,
            speed: state.difficulty.speed,
        }
    }
}
