//! Player physics state machine
//!
//! Vertical integration with phase-dependent gravity, jump issuance and the
//! forgiveness windows (coyote time, jump buffer, double-tap, fallback air
//! jump). All windows are deadlines compared against the simulation clock.

use super::state::{JumpKind, PlayerState};
use crate::consts::GROUND_LINE;
use crate::ms_to_frames;
use crate::tuning::Tuning;

/// What a press resolved to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    Jumped(JumpKind),
    /// Remembered until landing
    Buffered,
}

impl PlayerState {
    pub fn is_grounded(&self) -> bool {
        self.y >= GROUND_LINE
    }

    /// Integrate one step. Returns true when this step landed the player.
    pub fn apply_gravity(&mut self, held: bool, scale: f32, clock: f64, tuning: &Tuning) -> bool {
        let was_airborne = !self.is_grounded() || self.vy < 0.0;

        let rising = self.vy < 0.0;
        let gravity = if rising && held {
            tuning.gravity_hold
        } else {
            tuning.gravity_fall
        };
        self.vy += gravity * scale;
        self.y += self.vy * scale;

        if self.y >= GROUND_LINE {
            self.y = GROUND_LINE;
            self.vy = 0.0;
            self.is_jumping = false;
            self.last_grounded_time = clock;
            self.fallback_air_jump_used = false;
            self.double_tap_until = None;
            return was_airborne;
        }
        false
    }

    /// Issue a jump with the given velocity
    pub fn jump(&mut self, power: f32) {
        self.vy = power;
        self.is_jumping = true;
        self.pending_jump_time = None;
    }

    fn double_tap_open(&self, clock: f64) -> bool {
        self.double_tap_until.is_some_and(|until| clock < until)
    }

    /// Left the ground without jumping, recently enough to still jump.
    ///
    /// A jump never opens this window. On the flat track nothing else
    /// leaves the ground, so it only matters for tracks that drop away.
    fn in_coyote_window(&self, clock: f64, tuning: &Tuning) -> bool {
        !self.is_jumping && clock - self.last_grounded_time <= ms_to_frames(tuning.coyote_time_ms)
    }

    /// Resolve a press edge into a jump or a buffered request
    pub fn press(
        &mut self,
        clock: f64,
        triple_jump: bool,
        double_tap_enabled: bool,
        tuning: &Tuning,
    ) -> PressOutcome {
        let grounded = self.is_grounded();
        let air_kind = if triple_jump {
            JumpKind::Triple
        } else {
            JumpKind::High
        };

        if double_tap_enabled && !grounded && self.double_tap_open(clock) {
            self.double_tap_until = None;
            self.jump(jump_power(air_kind, tuning));
            return PressOutcome::Jumped(air_kind);
        }

        if grounded || self.in_coyote_window(clock, tuning) {
            self.ground_jump(clock, double_tap_enabled, tuning);
            return PressOutcome::Jumped(JumpKind::Normal);
        }

        // Falling with the double-tap window closed
        if self.vy > 0.0 && !self.fallback_air_jump_used {
            self.fallback_air_jump_used = true;
            self.jump(jump_power(air_kind, tuning));
            return PressOutcome::Jumped(air_kind);
        }

        self.pending_jump_time = Some(clock);
        PressOutcome::Buffered
    }

    /// Execute a buffered press on landing. Returns true if a jump fired.
    pub fn take_buffered_jump(&mut self, clock: f64, double_tap_enabled: bool, tuning: &Tuning) -> bool {
        let Some(pressed_at) = self.pending_jump_time.take() else {
            return false;
        };
        if clock - pressed_at > ms_to_frames(tuning.jump_buffer_ms) {
            return false;
        }
        self.ground_jump(clock, double_tap_enabled, tuning);
        true
    }

    fn ground_jump(&mut self, clock: f64, double_tap_enabled: bool, tuning: &Tuning) {
        self.jump(tuning.jump_power);
        self.double_tap_until = if double_tap_enabled {
            Some(clock + ms_to_frames(tuning.double_tap_window_ms))
        } else {
            None
        };
    }
}

/// Jump velocity for a tier
pub fn jump_power(kind: JumpKind, tuning: &Tuning) -> f32 {
    match kind {
        JumpKind::Normal => tuning.jump_power,
        JumpKind::High => tuning.high_jump_power,
        JumpKind::Triple => tuning.triple_jump_power,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn airborne(y: f32, vy: f32) -> PlayerState {
        PlayerState {
            y,
            vy,
            is_jumping: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_normal_jump_from_ground() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();
        assert!(player.is_grounded());

        let outcome = player.press(10.0, false, true, &tuning);
        assert_eq!(outcome, PressOutcome::Jumped(JumpKind::Normal));
        assert_eq!(player.vy, tuning.jump_power);
        assert!(player.is_jumping);

        player.apply_gravity(true, 1.0, 11.0, &tuning);
        assert!(!player.is_grounded());
    }

    #[test]
    fn test_gravity_depends_on_phase_and_hold() {
        let tuning = Tuning::default();

        let mut held = airborne(300.0, -10.0);
        held.apply_gravity(true, 1.0, 0.0, &tuning);
        assert_eq!(held.vy, -10.0 + tuning.gravity_hold);

        let mut released = airborne(300.0, -10.0);
        released.apply_gravity(false, 1.0, 0.0, &tuning);
        assert_eq!(released.vy, -10.0 + tuning.gravity_fall);

        let mut falling = airborne(300.0, 2.0);
        falling.apply_gravity(true, 1.0, 0.0, &tuning);
        assert_eq!(falling.vy, 2.0 + tuning.gravity_fall);
    }

    #[test]
    fn test_landing_resets_air_state() {
        let tuning = Tuning::default();
        let mut player = airborne(GROUND_LINE - 1.0, 6.0);
        player.fallback_air_jump_used = true;
        player.double_tap_until = Some(100.0);

        let landed = player.apply_gravity(false, 1.0, 42.0, &tuning);
        assert!(landed);
        assert_eq!(player.y, GROUND_LINE);
        assert_eq!(player.vy, 0.0);
        assert!(!player.is_jumping);
        assert!(!player.fallback_air_jump_used);
        assert_eq!(player.double_tap_until, None);
        assert_eq!(player.last_grounded_time, 42.0);
    }

    #[test]
    fn test_standing_still_is_not_a_landing() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();
        assert!(!player.apply_gravity(false, 1.0, 1.0, &tuning));
        assert_eq!(player.y, GROUND_LINE);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn test_second_tap_in_window_jumps_high() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();
        player.press(0.0, false, true, &tuning);
        player.apply_gravity(true, 1.0, 1.0, &tuning);

        let outcome = player.press(5.0, false, true, &tuning);
        assert_eq!(outcome, PressOutcome::Jumped(JumpKind::High));
        assert_eq!(player.vy, tuning.high_jump_power);
        assert_eq!(player.double_tap_until, None);
    }

    #[test]
    fn test_second_tap_with_triple_jump_active() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();
        player.press(0.0, true, true, &tuning);
        player.apply_gravity(true, 1.0, 1.0, &tuning);

        assert_eq!(
            player.press(2.0, true, true, &tuning),
            PressOutcome::Jumped(JumpKind::Triple)
        );
        assert_eq!(player.vy, tuning.triple_jump_power);
    }

    #[test]
    fn test_double_tap_disabled_buffers_rising_press() {
        let tuning = Tuning::default();
        let mut player = PlayerState::default();
        player.press(0.0, false, false, &tuning);
        player.apply_gravity(true, 1.0, 1.0, &tuning);

        assert_eq!(player.press(3.0, false, false, &tuning), PressOutcome::Buffered);
        assert_eq!(player.pending_jump_time, Some(3.0));
    }

    #[test]
    fn test_fallback_air_jump_once_per_airborne_phase() {
        let tuning = Tuning::default();
        let mut player = airborne(300.0, 3.0);

        assert_eq!(
            player.press(100.0, false, true, &tuning),
            PressOutcome::Jumped(JumpKind::High)
        );
        assert!(player.fallback_air_jump_used);

        // Falling again in the same airborne phase
        player.vy = 4.0;
        assert_eq!(player.press(130.0, false, true, &tuning), PressOutcome::Buffered);
    }

    #[test]
    fn test_rising_press_is_not_a_coyote_jump() {
        let tuning = Tuning::default();
        let mut player = PlayerState {
            last_grounded_time: 50.0,
            ..Default::default()
        };
        assert_eq!(
            player.press(50.0, false, false, &tuning),
            PressOutcome::Jumped(JumpKind::Normal)
        );
        player.y = GROUND_LINE - 20.0;

        // Still inside the coyote span, but the player jumped off the ground
        assert_eq!(player.press(53.0, false, false, &tuning), PressOutcome::Buffered);
        assert_eq!(player.vy, tuning.jump_power);
    }

    #[test]
    fn test_coyote_window_honours_late_press() {
        let tuning = Tuning::default();
        // Walked off an edge: airborne without having jumped
        let mut player = PlayerState {
            y: GROUND_LINE - 4.0,
            vy: 2.0,
            is_jumping: false,
            last_grounded_time: 50.0,
            ..Default::default()
        };
        assert_eq!(
            player.press(53.0, false, true, &tuning),
            PressOutcome::Jumped(JumpKind::Normal)
        );
        assert_eq!(player.vy, tuning.jump_power);

        let mut late = PlayerState {
            y: GROUND_LINE - 40.0,
            vy: 2.0,
            is_jumping: false,
            last_grounded_time: 50.0,
            ..Default::default()
        };
        // Past the coyote window this becomes the fallback jump instead
        assert_eq!(
            late.press(80.0, false, true, &tuning),
            PressOutcome::Jumped(JumpKind::High)
        );
    }

    #[test]
    fn test_buffered_press_fires_on_landing() {
        let tuning = Tuning::default();
        let mut player = airborne(GROUND_LINE - 3.0, 5.0);
        player.fallback_air_jump_used = true;

        assert_eq!(player.press(200.0, false, true, &tuning), PressOutcome::Buffered);
        assert!(player.apply_gravity(false, 1.0, 201.0, &tuning));
        assert!(player.take_buffered_jump(201.0, true, &tuning));
        assert_eq!(player.vy, tuning.jump_power);
        assert!(player.is_jumping);
        assert!(player.double_tap_until.is_some());
    }

    #[test]
    fn test_stale_buffer_is_dropped() {
        let tuning = Tuning::default();
        let mut player = PlayerState {
            pending_jump_time: Some(0.0),
            ..Default::default()
        };
        assert!(!player.take_buffered_jump(60.0, true, &tuning));
        assert_eq!(player.pending_jump_time, None);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn test_newest_buffered_press_wins() {
        let tuning = Tuning::default();
        let mut player = airborne(200.0, -3.0);
        player.fallback_air_jump_used = true;
        player.press(10.0, false, false, &tuning);
        player.press(12.0, false, false, &tuning);
        assert_eq!(player.pending_jump_time, Some(12.0));
    }

    proptest! {
        #[test]
        fn ground_clamp_is_exact(y in GROUND_LINE..GROUND_LINE + 500.0, scale in 0.25f32..2.0) {
            let tuning = Tuning::default();
            let mut player = PlayerState { y, vy: 0.0, ..Default::default() };
            player.apply_gravity(false, scale, 0.0, &tuning);
            prop_assert_eq!(player.y, GROUND_LINE);
            prop_assert_eq!(player.vy, 0.0);
        }
    }
}
