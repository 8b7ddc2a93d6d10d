//! Data-driven game balance
//!
//! Every empirically tuned number the simulation uses lives here so hosts can
//! override individual values from JSON without touching code. Velocities and
//! accelerations are per reference frame (1/60 s); durations carry their unit
//! in the field name.

use serde::{Deserialize, Serialize};

/// Balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Gravity while rising with the jump input held (floaty ascent)
    pub gravity_hold: f32,
    /// Gravity while rising after release, and while falling
    pub gravity_fall: f32,
    /// Normal jump velocity (negative is up)
    pub jump_power: f32,
    /// Second-tap jump velocity
    pub high_jump_power: f32,
    /// Second-tap jump velocity while the triple-jump ability is active
    pub triple_jump_power: f32,
    /// Window after a ground jump during which a second tap jumps higher
    pub double_tap_window_ms: f32,
    /// Grace period after leaving the ground without jumping
    pub coyote_time_ms: f32,
    /// How long an early press is remembered before landing
    pub jump_buffer_ms: f32,

    // === Lives ===
    pub initial_lives: u8,
    pub max_lives: u8,
    /// No further damage for this long after a hit
    pub invincibility_ms: f32,

    // === Collision ===
    /// Obstacle rectangles shrink by this much on every side
    pub hitbox_margin: f32,
    /// Player circle radius
    pub player_hitbox_radius: f32,
    /// Pickup collection distance from the player center
    pub pickup_radius: f32,
    /// Pickup collection distance while the magnet is active
    pub magnet_pickup_radius: f32,

    // === Scoring ===
    /// Distance (reference frames) per score point
    pub distance_per_point: f64,
    /// Pickups in a row that earn a shield
    pub shield_streak: u32,
    /// Score awarded for a pickup when lives are full and a shield is held
    pub overflow_bonus: u64,

    // === Abilities ===
    pub triple_jump_every: u64,
    pub triple_jump_secs: f32,
    pub magnet_every: u64,
    pub magnet_secs: f32,

    // === Difficulty ===
    /// Score per difficulty step
    pub difficulty_step: u64,
    /// Speed multiplier added per step
    pub speed_increment: f32,
    pub max_speed_multiplier: f32,
    /// Spawn interval removed per step
    pub interval_decrement_ms: f32,
    pub min_spawn_interval_ms: f32,

    // === Spawner ===
    /// No obstacles until this much simulated time has passed
    pub initial_delay_ms: f32,
    /// Last obstacle must be this far from the spawn edge before the next
    pub min_obstacle_distance: f32,
    /// Minimum distance between consecutive high obstacles
    pub safe_high_gap: f32,
    pub star_cooldown_base_secs: f32,
    /// Cooldown lengthening per difficulty step
    pub star_cooldown_per_step_secs: f32,
    pub star_cooldown_min_secs: f32,
    pub star_cooldown_max_secs: f32,
    pub star_jitter_secs: f32,
    pub prop_cooldown_min_secs: f32,
    pub prop_cooldown_max_secs: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity_hold: 0.6,
            gravity_fall: 1.0,
            jump_power: -15.0,
            high_jump_power: -18.0,
            triple_jump_power: -22.0,
            double_tap_window_ms: 600.0,
            coyote_time_ms: 100.0,
            jump_buffer_ms: 150.0,

            initial_lives: 3,
            max_lives: 5,
            invincibility_ms: 1000.0,

            hitbox_margin: 8.0,
            player_hitbox_radius: crate::consts::PLAYER_SIZE / 2.0,
            pickup_radius: 57.5,
            magnet_pickup_radius: 95.0,

            distance_per_point: 10.0,
            shield_streak: 3,
            overflow_bonus: 50,

            triple_jump_every: 500,
            triple_jump_secs: 15.0,
            magnet_every: 400,
            magnet_secs: 10.0,

            difficulty_step: 250,
            speed_increment: 0.05,
            max_speed_multiplier: 1.6,
            interval_decrement_ms: 100.0,
            min_spawn_interval_ms: 900.0,

            initial_delay_ms: 2000.0,
            min_obstacle_distance: 400.0,
            safe_high_gap: 180.0,
            star_cooldown_base_secs: 10.0,
            star_cooldown_per_step_secs: 0.5,
            star_cooldown_min_secs: 8.0,
            star_cooldown_max_secs: 16.0,
            star_jitter_secs: 2.0,
            prop_cooldown_min_secs: 1.5,
            prop_cooldown_max_secs: 3.5,
        }
    }
}

impl Tuning {
    /// Parse overrides from JSON; missing fields keep their defaults.
    ///
    /// Falls back to the defaults on malformed input.
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Tuning>(json) {
            Ok(tuning) => tuning.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed tuning overrides: {}", e);
                Self::default()
            }
        }
    }

    /// Repair values that would break simulation invariants
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.max_lives == 0 {
            self.max_lives = defaults.max_lives;
        }
        self.initial_lives = self.initial_lives.clamp(1, self.max_lives);
        if self.difficulty_step == 0 {
            self.difficulty_step = defaults.difficulty_step;
        }
        if self.triple_jump_every == 0 {
            self.triple_jump_every = defaults.triple_jump_every;
        }
        if self.magnet_every == 0 {
            self.magnet_every = defaults.magnet_every;
        }
        if self.distance_per_point <= 0.0 {
            self.distance_per_point = defaults.distance_per_point;
        }
        self.max_speed_multiplier = self.max_speed_multiplier.max(1.0);
        if !(self.star_cooldown_min_secs.is_finite() && self.star_cooldown_max_secs.is_finite()) {
            self.star_cooldown_min_secs = defaults.star_cooldown_min_secs;
            self.star_cooldown_max_secs = defaults.star_cooldown_max_secs;
        }
        if self.star_cooldown_min_secs > self.star_cooldown_max_secs {
            std::mem::swap(
                &mut self.star_cooldown_min_secs,
                &mut self.star_cooldown_max_secs,
            );
        }
        if self.prop_cooldown_min_secs > self.prop_cooldown_max_secs {
            std::mem::swap(
                &mut self.prop_cooldown_min_secs,
                &mut self.prop_cooldown_max_secs,
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let tuning = Tuning::from_json(r#"{ "hitbox_margin": 4.0, "safe_high_gap": 250.0 }"#);
        assert_eq!(tuning.hitbox_margin, 4.0);
        assert_eq!(tuning.safe_high_gap, 250.0);
        assert_eq!(tuning.magnet_pickup_radius, Tuning::default().magnet_pickup_radius);
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert_eq!(Tuning::from_json("{ not json"), Tuning::default());
    }

    #[test]
    fn test_sanitize_repairs_invariants() {
        let tuning = Tuning::from_json(
            r#"{ "max_lives": 0, "initial_lives": 9, "difficulty_step": 0,
                 "star_cooldown_min_secs": 20.0, "star_cooldown_max_secs": 5.0 }"#,
        );
        assert_eq!(tuning.max_lives, 5);
        assert_eq!(tuning.initial_lives, 5);
        assert_eq!(tuning.difficulty_step, 250);
        assert!(tuning.star_cooldown_min_secs <= tuning.star_cooldown_max_secs);
    }
}
