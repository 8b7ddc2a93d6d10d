//! Simulation tick
//!
//! Advances the game by one host frame. Every per-tick increment is scaled by
//! the sanitized frame scale so movement is frame-rate independent.

use super::difficulty::scale_difficulty;
use super::physics::PressOutcome;
use super::scoring::{check_level_complete, resolve_obstacles, resolve_pickups};
use super::spawner::{spawn_obstacles, spawn_props, spawn_stars};
use super::state::{Ability, GameEvent, GamePhase, GameState, JumpKind, ParticleColor, PropKind};
use crate::consts::*;
use crate::frame_scale;

/// Particle gravity per reference frame
const PARTICLE_GRAVITY: f32 = 0.3;
/// Particle life lost per reference frame
const PARTICLE_DECAY: f32 = 0.02;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// A press edge happened since the last tick
    pub jump_pressed: bool,
    /// The jump input is currently held
    pub jump_held: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the game plays itself
    pub autopilot: bool,
}

/// Advance the game state by `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => state.resume(),
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let scale = frame_scale(dt);
    state.clock += f64::from(scale);

    let mut input = input.clone();
    if input.autopilot {
        let (pressed, held) = autopilot(state);
        input.jump_pressed = pressed;
        input.jump_held = held;
    }

    // Player
    if input.jump_pressed {
        let outcome = state.player.press(
            state.clock,
            state.abilities.triple_jump_active(),
            state.settings.double_tap_enabled,
            &state.tuning,
        );
        if let PressOutcome::Jumped(kind) = outcome {
            on_jump(state, kind);
        }
    }
    let landed = state
        .player
        .apply_gravity(input.jump_held, scale, state.clock, &state.tuning);
    if landed
        && state
            .player
            .take_buffered_jump(state.clock, state.settings.double_tap_enabled, &state.tuning)
    {
        on_jump(state, JumpKind::Normal);
    }

    // Score and difficulty
    state.run.distance += f64::from(scale);
    state.recompute_live_score();
    let granted = state
        .abilities
        .grant_from_score(state.run.live_score, state.clock, &state.tuning);
    for ability in granted {
        let color = match ability {
            Ability::TripleJump => ParticleColor::Magenta,
            _ => ParticleColor::Gold,
        };
        let center = state.player.center();
        state.spawn_particles(center, color, 20);
        state.events.push(GameEvent::AbilityGranted { ability });
    }
    state.difficulty = scale_difficulty(state.run.live_score, &state.level, &state.tuning);

    // Spawning
    spawn_obstacles(state);
    spawn_stars(state);
    spawn_props(state);

    advance_entities(state, scale);

    // Resolution
    if !resolve_obstacles(state) {
        return;
    }
    resolve_pickups(state);
    if check_level_complete(state) {
        return;
    }

    state.abilities.expire(state.clock);
}

fn on_jump(state: &mut GameState, kind: JumpKind) {
    let center = state.player.center();
    match kind {
        JumpKind::Normal => state.spawn_particles(center, ParticleColor::Player, 5),
        JumpKind::High => state.spawn_particles(center, ParticleColor::Gold, 8),
        JumpKind::Triple => {
            state.spawn_particles(center, ParticleColor::Magenta, 12);
            state.spawn_particles(center, ParticleColor::Cyan, 12);
        }
    }
    state.events.push(GameEvent::Jump { kind });
}

/// Scroll the field and age cosmetic entities
fn advance_entities(state: &mut GameState, scale: f32) {
    let step = state.difficulty.speed * scale;
    state.spawner.track_scroll += f64::from(step);

    for obstacle in state.obstacles.iter_mut() {
        obstacle.x -= step;
    }
    state.obstacles.retain(|o| o.x >= -o.width);

    for star in state.stars.iter_mut() {
        star.pos.x -= step;
    }
    state.stars.retain(|s| s.pos.x >= STAR_CULL_X);

    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel * scale;
        particle.vel.y += PARTICLE_GRAVITY * scale;
        particle.life -= PARTICLE_DECAY * scale;
    }
    state.particles.retain(|p| p.life > 0.0);

    for prop in state.props.iter_mut() {
        let flap = match prop.kind {
            PropKind::Bird => 0.2,
            PropKind::Helicopter => 0.3,
            _ => 0.0,
        };
        prop.pos += prop.vel * scale;
        prop.phase += flap * scale;
    }
    state
        .props
        .retain(|p| p.pos.x >= PROP_CULL && p.pos.y >= PROP_CULL);
}

/// Synthesize (pressed, held) from the nearest obstacle ahead
fn autopilot(state: &GameState) -> (bool, bool) {
    let player = &state.player;
    let lead = state.difficulty.speed * 6.0;
    let gap = state
        .obstacles
        .iter()
        .filter(|o| o.x + o.width + state.tuning.hitbox_margin > PLAYER_X)
        .map(|o| o.x - (PLAYER_X + PLAYER_SIZE))
        .fold(None, |nearest: Option<f32>, gap| {
            Some(nearest.map_or(gap, |n| n.min(gap)))
        });

    let threatened = gap.is_some_and(|gap| gap < lead);
    let pressed = if player.is_grounded() {
        threatened
    } else {
        // Stretch the flight over wide clusters with the air jump
        threatened && player.vy > 0.0 && !player.fallback_air_jump_used
    };
    (pressed, player.vy < 0.0 || pressed)
}
