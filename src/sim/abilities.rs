//! Ability timers
//!
//! Triple jump and magnet are granted each time the score crosses a new
//! multiple of their threshold and expire at a clock deadline. The shield has
//! no timer.

use super::state::{Abilities, Ability};
use crate::{frames_to_secs, secs_to_frames};
use crate::tuning::Tuning;

impl Abilities {
    pub fn triple_jump_active(&self) -> bool {
        self.triple_jump_until.is_some()
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_until.is_some()
    }

    /// Grant timed abilities for newly crossed score multiples.
    ///
    /// A regrant while active restarts the timer. Returns what was granted.
    pub fn grant_from_score(&mut self, score: u64, clock: f64, tuning: &Tuning) -> Vec<Ability> {
        let mut granted = Vec::new();

        if crossed(score, self.last_triple_jump_score, tuning.triple_jump_every) {
            self.triple_jump_until = Some(clock + secs_to_frames(tuning.triple_jump_secs));
            self.last_triple_jump_score = score;
            granted.push(Ability::TripleJump);
        }
        if crossed(score, self.last_magnet_score, tuning.magnet_every) {
            self.magnet_until = Some(clock + secs_to_frames(tuning.magnet_secs));
            self.last_magnet_score = score;
            granted.push(Ability::Magnet);
        }

        for ability in &granted {
            log::debug!("{:?} granted at score {}", ability, score);
        }
        granted
    }

    /// Drop timers whose deadline has been reached
    pub fn expire(&mut self, clock: f64) {
        if self.triple_jump_until.is_some_and(|until| clock >= until) {
            self.triple_jump_until = None;
        }
        if self.magnet_until.is_some_and(|until| clock >= until) {
            self.magnet_until = None;
        }
    }

    /// Damage ends timed abilities regardless of time left
    pub fn clear_on_damage(&mut self) {
        self.triple_jump_until = None;
        self.magnet_until = None;
    }

    /// Seconds left on a timed ability (0 when inactive)
    pub fn remaining_secs(until: Option<f64>, clock: f64) -> f32 {
        until.map_or(0.0, |until| frames_to_secs((until - clock).max(0.0)))
    }
}

fn crossed(score: u64, last: u64, every: u64) -> bool {
    let every = every.max(1);
    score / every > last / every
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triple_jump_granted_on_first_crossing() {
        let tuning = Tuning::default();
        let mut abilities = Abilities::default();

        abilities.grant_from_score(499, 10.0, &tuning);
        assert!(!abilities.triple_jump_active());

        let granted = abilities.grant_from_score(500, 10.0, &tuning);
        assert!(granted.contains(&Ability::TripleJump));
        assert_eq!(abilities.triple_jump_until, Some(10.0 + 900.0));
        assert_eq!(abilities.last_triple_jump_score, 500);
    }

    #[test]
    fn test_triple_jump_expires_exactly_at_deadline() {
        let tuning = Tuning::default();
        let mut abilities = Abilities::default();
        abilities.grant_from_score(500, 0.0, &tuning);

        abilities.expire(899.0);
        assert!(abilities.triple_jump_active());
        abilities.expire(900.0);
        assert!(!abilities.triple_jump_active());
    }

    #[test]
    fn test_no_regrant_within_same_multiple() {
        let tuning = Tuning::default();
        let mut abilities = Abilities::default();
        abilities.grant_from_score(510, 0.0, &tuning);
        abilities.expire(2000.0);

        assert!(!abilities.grant_from_score(990, 2000.0, &tuning).contains(&Ability::TripleJump));
        assert!(abilities.grant_from_score(1000, 2000.0, &tuning).contains(&Ability::TripleJump));
    }

    #[test]
    fn test_magnet_has_its_own_threshold() {
        let tuning = Tuning::default();
        let mut abilities = Abilities::default();
        let granted = abilities.grant_from_score(400, 0.0, &tuning);
        assert_eq!(granted, vec![Ability::Magnet]);
        assert_eq!(abilities.magnet_until, Some(600.0));
        assert!(!abilities.triple_jump_active());
    }

    #[test]
    fn test_damage_clears_timers_but_not_shield() {
        let tuning = Tuning::default();
        let mut abilities = Abilities {
            shield: true,
            ..Default::default()
        };
        abilities.grant_from_score(1000, 0.0, &tuning);
        abilities.clear_on_damage();
        assert!(!abilities.triple_jump_active());
        assert!(!abilities.magnet_active());
        assert!(abilities.shield);
    }

    #[test]
    fn test_remaining_secs() {
        assert_eq!(Abilities::remaining_secs(None, 5.0), 0.0);
        assert!((Abilities::remaining_secs(Some(660.0), 60.0) - 10.0).abs() < 1e-4);
        assert_eq!(Abilities::remaining_secs(Some(10.0), 60.0), 0.0);
    }
}
