//! Collision and scoring resolver
//!
//! Applies the outcome of player contact with obstacles and stars, and checks
//! the level target. Runs once per tick after entities have moved.

use super::collision::{player_hits_obstacle, within_radius};
use super::state::{Ability, GameEvent, GamePhase, GameState, ParticleColor};
use crate::ms_to_frames;

/// Resolve obstacle contact. Returns false when the run ended.
pub fn resolve_obstacles(state: &mut GameState) -> bool {
    if state.is_invincible() {
        return true;
    }
    let center = state.player.center();
    let radius = state.tuning.player_hitbox_radius;
    let margin = state.tuning.hitbox_margin;
    let hit = state
        .obstacles
        .iter()
        .any(|o| player_hits_obstacle(center, radius, o, margin));
    if !hit {
        return true;
    }

    state.invincible_until = state.clock + ms_to_frames(state.tuning.invincibility_ms);
    state.spawn_particles(center, ParticleColor::Player, 10);
    state.abilities.clear_on_damage();

    if state.abilities.shield {
        state.abilities.shield = false;
        state.abilities.pickup_streak = 0;
        state.spawn_particles(center, ParticleColor::Shield, 30);
        state.events.push(GameEvent::Hit { absorbed: true });
        log::debug!("Shield absorbed a hit");
        return true;
    }

    state.run.lives = state.run.lives.saturating_sub(1);
    state.events.push(GameEvent::Hit { absorbed: false });
    log::debug!("Hit, {} lives left", state.run.lives);

    if state.run.lives == 0 {
        end_run(state);
        return false;
    }
    true
}

fn end_run(state: &mut GameState) {
    let score = state.run.live_score;
    state.run.career_score = state.run.career_score.saturating_add(score);
    let new_best = state.run.record_best();
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::GameOver { score, new_best });
    log::info!("Game over with score {} (best {})", score, state.run.best_score);
}

/// Collect stars within reach of the player. Returns how many were collected.
pub fn resolve_pickups(state: &mut GameState) -> usize {
    let center = state.player.center();
    let radius = if state.abilities.magnet_active() {
        state.tuning.magnet_pickup_radius
    } else {
        state.tuning.pickup_radius
    };

    let mut collected = Vec::new();
    state.stars.retain(|star| {
        if within_radius(center, star.pos, radius) {
            collected.push(star.pos);
            false
        } else {
            true
        }
    });

    for &pos in &collected {
        state.spawn_particles(pos, ParticleColor::Star, 12);
        state.events.push(GameEvent::PickupCollected);
        apply_pickup(state);
    }
    collected.len()
}

/// Life restore, or its conversion when lives are already full
fn apply_pickup(state: &mut GameState) {
    let max_lives = state.tuning.max_lives;
    if state.run.lives >= max_lives {
        if state.abilities.shield {
            state.run.base_score = state.run.base_score.saturating_add(state.tuning.overflow_bonus);
            state.recompute_live_score();
        } else {
            grant_shield(state);
        }
        return;
    }

    state.run.lives = (state.run.lives + 1).min(max_lives);
    state.abilities.pickup_streak += 1;
    if state.abilities.pickup_streak >= state.tuning.shield_streak && !state.abilities.shield {
        grant_shield(state);
    }
}

fn grant_shield(state: &mut GameState) {
    state.abilities.shield = true;
    let center = state.player.center();
    state.spawn_particles(center, ParticleColor::Shield, 20);
    state.events.push(GameEvent::ShieldGained);
    state.events.push(GameEvent::AbilityGranted {
        ability: Ability::Shield,
    });
}

/// Enter the level-complete phase once the target is reached.
///
/// Lives and abilities are left untouched.
pub fn check_level_complete(state: &mut GameState) -> bool {
    if state.run.live_score < state.level.target_score {
        return false;
    }
    let score = state.run.live_score;
    let next_level = state.catalog.next_level_id(state.level.id);
    state.run.career_score = state.run.career_score.saturating_add(score);
    // Clearing the last level ends the run
    if next_level.is_none() {
        state.run.record_best();
    }
    state.phase = GamePhase::LevelComplete;
    state.events.push(GameEvent::LevelComplete {
        level_id: state.level.id,
        score,
        next_level,
    });
    log::info!("Level {} complete with score {}", state.level.id, score);
    true
}
