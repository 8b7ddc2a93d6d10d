//! Procedural spawning
//!
//! Obstacles come in weighted patterns per difficulty tag, gated by an
//! initial grace delay, the spawn interval and a minimum distance from the
//! previous obstacle. Stars and flying props run on independent cooldowns.

use glam::Vec2;
use rand::Rng;

use super::state::{FlyingProp, GameState, Obstacle, ObstacleTier, PropKind, Star};
use crate::consts::*;
use crate::levels::{DifficultyTag, LevelDefinition};
use crate::tuning::Tuning;
use crate::{ms_to_frames, secs_to_frames};

/// Obstacle group layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObstaclePattern {
    Single { tier: ObstacleTier },
    Pair { tier: ObstacleTier },
    /// Three low obstacles
    Triple,
    /// Low, high, low
    Pyramid,
    /// Two highs far enough apart to land between them
    TwoHighSpaced,
    /// High then low
    Combo,
}

impl ObstaclePattern {
    /// Slots as (x offset from the spawn edge, tier), left to right
    pub fn layout(self) -> Vec<(f32, ObstacleTier)> {
        use ObstacleTier::*;
        match self {
            ObstaclePattern::Single { tier } => vec![(0.0, tier)],
            ObstaclePattern::Pair { tier } => vec![(0.0, tier), (70.0, tier)],
            ObstaclePattern::Triple => vec![(0.0, Low), (70.0, Low), (140.0, Low)],
            ObstaclePattern::Pyramid => vec![(0.0, Low), (100.0, High), (200.0, Low)],
            ObstaclePattern::TwoHighSpaced => vec![(0.0, High), (200.0, High)],
            ObstaclePattern::Combo => vec![(0.0, High), (150.0, Low)],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PatternKind {
    Single,
    Pair,
    Triple,
    Pyramid,
    TwoHighSpaced,
    Combo,
}

/// One row of a weight table
#[derive(Debug, Clone, Copy)]
struct PatternWeight {
    kind: PatternKind,
    weight: u32,
    /// Chance that a tier-variable pattern comes out high
    high_chance: f64,
}

const fn row(kind: PatternKind, weight: u32, high_chance: f64) -> PatternWeight {
    PatternWeight {
        kind,
        weight,
        high_chance,
    }
}

const EASY_PATTERNS: &[PatternWeight] = &[
    row(PatternKind::Single, 60, 0.4),
    row(PatternKind::Pair, 40, 0.0),
];

const MEDIUM_PATTERNS: &[PatternWeight] = &[
    row(PatternKind::Single, 30, 0.5),
    row(PatternKind::Pair, 40, 0.5),
    row(PatternKind::Combo, 30, 0.0),
];

const HARD_PATTERNS: &[PatternWeight] = &[
    row(PatternKind::Single, 15, 0.5),
    row(PatternKind::Pair, 20, 0.0),
    row(PatternKind::TwoHighSpaced, 20, 0.0),
    row(PatternKind::Triple, 15, 0.0),
    row(PatternKind::Pyramid, 15, 0.0),
    row(PatternKind::Combo, 15, 0.0),
];

fn pattern_table(tag: DifficultyTag) -> &'static [PatternWeight] {
    match tag {
        DifficultyTag::Easy => EASY_PATTERNS,
        DifficultyTag::Medium => MEDIUM_PATTERNS,
        DifficultyTag::Hard => HARD_PATTERNS,
    }
}

/// Pick a pattern from the level's weight table
pub fn choose_pattern<R: Rng>(level: &LevelDefinition, rng: &mut R) -> ObstaclePattern {
    let table = pattern_table(level.difficulty);
    let total: u32 = table.iter().map(|r| r.weight).sum();
    let mut roll = rng.random_range(0..total);

    let chosen = table
        .iter()
        .find(|r| {
            if roll < r.weight {
                true
            } else {
                roll -= r.weight;
                false
            }
        })
        .unwrap_or(&table[table.len() - 1]);

    let tier = if chosen.high_chance > 0.0 && rng.random_bool(chosen.high_chance) {
        ObstacleTier::High
    } else {
        ObstacleTier::Low
    };

    match chosen.kind {
        PatternKind::Single => ObstaclePattern::Single { tier },
        PatternKind::Pair => ObstaclePattern::Pair { tier },
        PatternKind::Triple => ObstaclePattern::Triple,
        PatternKind::Pyramid => ObstaclePattern::Pyramid,
        PatternKind::TwoHighSpaced => ObstaclePattern::TwoHighSpaced,
        PatternKind::Combo => ObstaclePattern::Combo,
    }
}

/// Star cooldown in frames: lengthens with difficulty, jitter in [0, 1)
pub fn star_cooldown(steps: u64, jitter: f32, tuning: &Tuning) -> f64 {
    let secs = tuning.star_cooldown_base_secs
        + steps as f32 * tuning.star_cooldown_per_step_secs
        + jitter * tuning.star_jitter_secs;
    secs_to_frames(secs.clamp(tuning.star_cooldown_min_secs, tuning.star_cooldown_max_secs))
}

/// Flying prop cooldown in frames for a roll in [0, 1)
pub fn prop_cooldown(roll: f32, tuning: &Tuning) -> f64 {
    let span = tuning.prop_cooldown_max_secs - tuning.prop_cooldown_min_secs;
    secs_to_frames(tuning.prop_cooldown_min_secs + roll * span)
}

/// Spawn the next obstacle pattern if every gate is open.
///
/// Returns the number of obstacles added.
pub fn spawn_obstacles(state: &mut GameState) -> usize {
    if state.run.distance <= ms_to_frames(state.tuning.initial_delay_ms) {
        return 0;
    }
    let interval = ms_to_frames(state.difficulty.spawn_interval_ms);
    if let Some(last) = state.spawner.last_obstacle_time {
        if state.clock - last <= interval {
            return 0;
        }
    }
    if let Some(last) = state.obstacles.last() {
        if last.x >= WORLD_WIDTH - state.tuning.min_obstacle_distance {
            return 0;
        }
    }

    let pattern = choose_pattern(&state.level, &mut state.rng);
    let layout = pattern.layout();
    for &(offset, tier) in &layout {
        let tier = admit_tier(state, offset, tier);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle {
            id,
            x: WORLD_WIDTH + offset,
            tier,
            width: OBSTACLE_WIDTH,
        });
    }
    state.spawner.last_obstacle_time = Some(state.clock);
    log::debug!("Spawned {:?} at clock {:.1}", pattern, state.clock);
    layout.len()
}

/// Downgrade a high slot that would follow the previous high too closely
fn admit_tier(state: &mut GameState, offset: f32, tier: ObstacleTier) -> ObstacleTier {
    if tier != ObstacleTier::High {
        return tier;
    }
    let position = state.spawner.track_scroll + f64::from(offset);
    if let Some(last_high) = state.spawner.last_high_position {
        if position - last_high <= f64::from(state.tuning.safe_high_gap) {
            return ObstacleTier::Low;
        }
    }
    state.spawner.last_high_position = Some(position);
    ObstacleTier::High
}

/// Spawn a star when its cooldown has elapsed
pub fn spawn_stars(state: &mut GameState) -> bool {
    if state.clock - state.spawner.last_star_time < state.spawner.star_cooldown {
        return false;
    }
    let lift = 60.0 + state.rng.random::<f32>() * 40.0;
    let id = state.next_entity_id();
    state.stars.push(Star {
        id,
        pos: Vec2::new(WORLD_WIDTH, TRACK_Y - lift),
    });
    state.spawner.last_star_time = state.clock;
    let jitter = state.rng.random::<f32>();
    state.spawner.star_cooldown = star_cooldown(state.difficulty.steps, jitter, &state.tuning);
    true
}

/// Spawn 1-3 decorative props on their own cadence
pub fn spawn_props(state: &mut GameState) -> usize {
    if state.clock - state.spawner.last_prop_time < state.spawner.prop_cooldown {
        return 0;
    }
    state.spawner.last_prop_time = state.clock;
    let roll = state.fx_rng.random::<f32>();
    state.spawner.prop_cooldown = prop_cooldown(roll, &state.tuning);
    if !state.settings.flying_props {
        return 0;
    }

    let rng = &mut state.fx_rng;
    let count = if rng.random::<f32>() > 0.7 {
        3
    } else if rng.random::<f32>() > 0.5 {
        2
    } else {
        1
    };

    for i in 0..count {
        let kind_roll = rng.random::<f32>();
        let kind = if kind_roll < 0.4 {
            PropKind::Bird
        } else if kind_roll < 0.7 {
            PropKind::Balloon
        } else if kind_roll < 0.85 {
            PropKind::Plane
        } else {
            PropKind::Helicopter
        };
        let y = 30.0 + rng.random::<f32>() * 200.0;
        let vel = match kind {
            PropKind::Bird => Vec2::new(-3.0 - rng.random::<f32>() * 2.0, 0.0),
            PropKind::Balloon => Vec2::new(-1.0 - rng.random::<f32>(), -0.5),
            PropKind::Plane => Vec2::new(-4.0 - rng.random::<f32>() * 2.0, 0.0),
            PropKind::Helicopter => Vec2::new(-2.0 - rng.random::<f32>(), 0.0),
        };
        let (size, variant) = match kind {
            PropKind::Bird => (20.0, rng.random_range(0..3u8)),
            PropKind::Balloon => (25.0, rng.random_range(0..6u8)),
            PropKind::Plane => (30.0, 0),
            PropKind::Helicopter => (28.0, 0),
        };
        state.props.push(FlyingProp {
            kind,
            pos: Vec2::new(WORLD_WIDTH + 50.0 + i as f32 * 100.0, y),
            vel,
            size,
            phase: 0.0,
            variant,
        });
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::LevelCatalog;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state(level_id: u32) -> GameState {
        let mut state = GameState::new(4242);
        state.start_run(level_id);
        state
    }

    #[test]
    fn test_easy_levels_only_use_simple_patterns() {
        let level = LevelCatalog::builtin().first().clone();
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..2000 {
            match choose_pattern(&level, &mut rng) {
                ObstaclePattern::Single { .. } => {}
                ObstaclePattern::Pair { tier } => assert_eq!(tier, ObstacleTier::Low),
                other => panic!("unexpected pattern on easy level: {:?}", other),
            }
        }
    }

    #[test]
    fn test_hard_levels_use_every_pattern() {
        let level = LevelCatalog::builtin().get(3).cloned().expect("level 3");
        let mut rng = Pcg32::seed_from_u64(2);
        let mut seen = [false; 6];
        for _ in 0..5000 {
            let index = match choose_pattern(&level, &mut rng) {
                ObstaclePattern::Single { .. } => 0,
                ObstaclePattern::Pair { .. } => 1,
                ObstaclePattern::Triple => 2,
                ObstaclePattern::Pyramid => 3,
                ObstaclePattern::TwoHighSpaced => 4,
                ObstaclePattern::Combo => 5,
            };
            seen[index] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_pattern_weights_roughly_hold() {
        let level = LevelCatalog::builtin().first().clone();
        let mut rng = Pcg32::seed_from_u64(3);
        let singles = (0..10_000)
            .filter(|_| matches!(choose_pattern(&level, &mut rng), ObstaclePattern::Single { .. }))
            .count();
        assert!((5500..6500).contains(&singles), "singles = {}", singles);
    }

    #[test]
    fn test_grace_delay_blocks_early_spawns() {
        let mut state = playing_state(1);
        state.run.distance = 100.0;
        state.clock = 100.0;
        assert_eq!(spawn_obstacles(&mut state), 0);

        state.run.distance = 121.0;
        assert!(spawn_obstacles(&mut state) > 0);
    }

    #[test]
    fn test_interval_and_min_distance_gate_spawns() {
        let mut state = playing_state(1);
        state.run.distance = 500.0;
        state.clock = 500.0;
        assert!(spawn_obstacles(&mut state) > 0);

        // Interval not elapsed
        state.clock += 100.0;
        state.obstacles.iter_mut().for_each(|o| o.x = 10.0);
        assert_eq!(spawn_obstacles(&mut state), 0);

        // Interval elapsed but the last obstacle is still near the edge
        state.clock += 200.0;
        state.obstacles.iter_mut().for_each(|o| o.x = WORLD_WIDTH - 300.0);
        assert_eq!(spawn_obstacles(&mut state), 0);

        state.obstacles.iter_mut().for_each(|o| o.x = WORLD_WIDTH - 401.0);
        assert!(spawn_obstacles(&mut state) > 0);
    }

    #[test]
    fn test_close_high_obstacles_are_downgraded() {
        let mut state = playing_state(3);
        state.spawner.track_scroll = 1000.0;
        state.spawner.last_high_position = Some(900.0);

        assert_eq!(admit_tier(&mut state, 0.0, ObstacleTier::High), ObstacleTier::Low);
        assert_eq!(state.spawner.last_high_position, Some(900.0));

        assert_eq!(admit_tier(&mut state, 100.0, ObstacleTier::High), ObstacleTier::High);
        assert_eq!(state.spawner.last_high_position, Some(1100.0));
    }

    #[test]
    fn test_spawned_highs_keep_safe_gap() {
        let mut state = playing_state(3);
        let gap = f64::from(state.tuning.safe_high_gap);
        let mut highs: Vec<f64> = Vec::new();
        for round in 0..300 {
            state.run.distance = 1000.0;
            state.clock = 1000.0 + round as f64 * 1000.0;
            state.spawner.track_scroll = round as f64 * 260.0;
            state.obstacles.clear();
            spawn_obstacles(&mut state);
            for o in &state.obstacles {
                if o.tier == ObstacleTier::High {
                    highs.push(state.spawner.track_scroll + f64::from(o.x - WORLD_WIDTH));
                }
            }
        }
        assert!(highs.len() > 10);
        assert!(highs.windows(2).all(|w| w[1] - w[0] > gap));
    }

    #[test]
    fn test_star_cooldown_is_bounded_and_monotone() {
        let tuning = Tuning::default();
        let min = secs_to_frames(tuning.star_cooldown_min_secs);
        let max = secs_to_frames(tuning.star_cooldown_max_secs);
        let mut last = 0.0;
        for steps in 0..100 {
            let c = star_cooldown(steps, 0.0, &tuning);
            assert!(c >= last);
            assert!((min..=max).contains(&c));
            assert!((min..=max).contains(&star_cooldown(steps, 0.999, &tuning)));
            last = c;
        }
    }

    #[test]
    fn test_star_spawns_after_cooldown() {
        let mut state = playing_state(1);
        state.spawner.star_cooldown = 600.0;
        state.clock = 599.0;
        assert!(!spawn_stars(&mut state));
        state.clock = 600.0;
        assert!(spawn_stars(&mut state));
        let star = &state.stars[0];
        assert_eq!(star.pos.x, WORLD_WIDTH);
        assert!(star.pos.y <= TRACK_Y - 60.0 && star.pos.y >= TRACK_Y - 100.0);
        assert_eq!(state.spawner.last_star_time, 600.0);
    }

    #[test]
    fn test_props_do_not_touch_gameplay_rng() {
        let mut with_props = playing_state(2);
        let mut without_props = playing_state(2);
        without_props.settings.flying_props = false;

        for frame in 0..2000 {
            with_props.clock = frame as f64;
            without_props.clock = frame as f64;
            spawn_props(&mut with_props);
            spawn_props(&mut without_props);
        }
        assert!(!with_props.props.is_empty());
        assert!(without_props.props.is_empty());

        let level = with_props.level.clone();
        assert_eq!(
            choose_pattern(&level, &mut with_props.rng),
            choose_pattern(&level, &mut without_props.rng)
        );
    }
}
