//! Game state and core simulation types
//!
//! Everything the simulation mutates lives in one owned `GameState`; nothing
//! outside `tick` writes to it while a run is playing.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::difficulty::{Difficulty, scale_difficulty};
use crate::consts::*;
use crate::levels::{LevelCatalog, LevelDefinition};
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Run-level state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Outside a run
    Menu,
    /// The only phase in which the simulation advances
    Playing,
    Paused,
    /// Target score reached; waiting for next level / restart / menu
    LevelComplete,
    /// Lives ran out
    GameOver,
}

/// Vertical player state (y grows downward, ground line is the resting top edge)
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    /// Top edge of the player sprite
    pub y: f32,
    /// Velocity in px per reference frame (negative is up)
    pub vy: f32,
    pub is_jumping: bool,
    /// Clock value of the last tick spent on the ground
    pub last_grounded_time: f64,
    /// Clock value of an early press waiting for landing (latest wins)
    pub pending_jump_time: Option<f64>,
    /// One fallback air jump per airborne phase
    pub fallback_air_jump_used: bool,
    /// Second-tap window deadline after a ground jump
    pub double_tap_until: Option<f64>,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            y: GROUND_LINE,
            vy: 0.0,
            is_jumping: false,
            last_grounded_time: 0.0,
            pending_jump_time: None,
            fallback_air_jump_used: false,
            double_tap_until: None,
        }
    }
}

impl PlayerState {
    /// Center of the player hitbox
    pub fn center(&self) -> Vec2 {
        Vec2::new(PLAYER_X + PLAYER_SIZE / 2.0, self.y + PLAYER_SIZE / 2.0)
    }
}

/// Obstacle height tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleTier {
    Low,
    High,
}

impl ObstacleTier {
    pub fn height(self) -> f32 {
        match self {
            ObstacleTier::Low => OBSTACLE_LOW_HEIGHT,
            ObstacleTier::High => OBSTACLE_HIGH_HEIGHT,
        }
    }
}

/// An obstacle standing on the track
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge; the only field that changes after spawning
    pub x: f32,
    pub tier: ObstacleTier,
    pub width: f32,
}

impl Obstacle {
    pub fn height(&self) -> f32 {
        self.tier.height()
    }

    /// Top edge
    pub fn top(&self) -> f32 {
        TRACK_Y - self.height()
    }
}

/// A collectible star
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub id: u32,
    /// Center
    pub pos: Vec2,
}

/// Particle palette entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleColor {
    Player,
    Star,
    Gold,
    Shield,
    Magenta,
    Cyan,
}

/// A particle for visual effects
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 0-1, removed at or below zero
    pub life: f32,
    pub color: ParticleColor,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Decorative sky prop kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropKind {
    Bird,
    Balloon,
    Plane,
    Helicopter,
}

/// A decorative flying prop (no collision)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlyingProp {
    pub kind: PropKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    /// Wing/rotor animation phase
    pub phase: f32,
    /// Palette index within the kind
    pub variant: u8,
}

/// Kind of jump issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JumpKind {
    Normal,
    High,
    Triple,
}

/// Player abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    TripleJump,
    Magnet,
    Shield,
}

/// Discrete events for audio/haptics/persistence collaborators
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameEvent {
    Jump { kind: JumpKind },
    PickupCollected,
    ShieldGained,
    AbilityGranted { ability: Ability },
    /// `absorbed` is true when a shield took the hit
    Hit { absorbed: bool },
    LevelComplete {
        level_id: u32,
        score: u64,
        next_level: Option<u32>,
    },
    LevelUnlocked { level_id: u32 },
    GameOver { score: u64, new_best: bool },
}

/// Ability timers and flags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Abilities {
    /// Expiry clock value while triple jump is active
    pub triple_jump_until: Option<f64>,
    /// Expiry clock value while the magnet is active
    pub magnet_until: Option<f64>,
    pub shield: bool,
    /// Pickups collected since the last absorbed hit
    pub pickup_streak: u32,
    /// Score at the last triple-jump grant
    pub last_triple_jump_score: u64,
    /// Score at the last magnet grant
    pub last_magnet_score: u64,
}

/// Score and lives for the current attempt
#[derive(Debug, Clone, PartialEq)]
pub struct RunProgress {
    /// Score carried over from cleared levels plus pickup bonuses
    pub base_score: u64,
    /// `base_score` + distance-derived points
    pub live_score: u64,
    pub lives: u8,
    pub level_id: u32,
    /// Reference frames travelled in this level
    pub distance: f64,
    /// Persists across runs
    pub career_score: u64,
    pub best_score: u64,
}

impl RunProgress {
    /// Raise the best score to the live score when the run ends.
    ///
    /// Returns true on a new best.
    pub fn record_best(&mut self) -> bool {
        let new_best = self.live_score > self.best_score;
        if new_best {
            self.best_score = self.live_score;
        }
        new_best
    }
}

/// Spawner bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnerState {
    pub last_obstacle_time: Option<f64>,
    /// Total px scrolled by the track this level
    pub track_scroll: f64,
    /// Track coordinate of the most recent high obstacle
    pub last_high_position: Option<f64>,
    pub last_star_time: f64,
    /// Frames until the next star, rolled at each spawn
    pub star_cooldown: f64,
    pub last_prop_time: f64,
    pub prop_cooldown: f64,
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub settings: Settings,
    pub catalog: LevelCatalog,
    /// Active level (read-only during a run)
    pub level: LevelDefinition,
    pub phase: GamePhase,
    /// Simulation clock in reference frames
    pub clock: f64,
    pub player: PlayerState,
    pub obstacles: Vec<Obstacle>,
    pub stars: Vec<Star>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Decorative props (not gameplay-affecting)
    pub props: Vec<FlyingProp>,
    pub abilities: Abilities,
    pub run: RunProgress,
    pub spawner: SpawnerState,
    /// No damage while `clock` is below this
    pub invincible_until: f64,
    /// Recomputed every tick from the live score
    pub difficulty: Difficulty,
    /// Gameplay RNG (patterns, star placement)
    pub rng: Pcg32,
    /// Cosmetic RNG (particles, props); never consulted by gameplay
    pub fx_rng: Pcg32,
    /// Events emitted since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a state with default tuning and settings, waiting in the menu
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, LevelCatalog::builtin(), Tuning::default(), Settings::default())
    }

    /// Create a state from host configuration; tuning is repaired first
    pub fn with_config(seed: u64, catalog: LevelCatalog, tuning: Tuning, settings: Settings) -> Self {
        let tuning = tuning.sanitized();
        let level = catalog.first().clone();
        let difficulty = scale_difficulty(0, &level, &tuning);
        let mut state = Self {
            tuning,
            settings,
            catalog,
            run: RunProgress {
                base_score: 0,
                live_score: 0,
                lives: 0,
                level_id: level.id,
                distance: 0.0,
                career_score: 0,
                best_score: 0,
            },
            level,
            phase: GamePhase::Menu,
            clock: 0.0,
            player: PlayerState::default(),
            obstacles: Vec::new(),
            stars: Vec::new(),
            particles: Vec::new(),
            props: Vec::new(),
            abilities: Abilities::default(),
            spawner: SpawnerState::default(),
            invincible_until: 0.0,
            difficulty,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            events: Vec::new(),
            next_id: 1,
        };
        state.reset_field(false);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Start a fresh run on `level_id` (score, lives and abilities reset)
    pub fn start_run(&mut self, level_id: u32) {
        self.level = self.catalog.get_or_first(level_id).clone();
        self.reset_field(false);
        self.phase = GamePhase::Playing;
        log::info!("Run started on level {}", self.level.id);
    }

    /// Restart the current level from zero
    pub fn restart(&mut self) {
        self.start_run(self.level.id);
    }

    /// Continue to the next level, carrying the live score as base score.
    ///
    /// Returns false (and changes nothing) if there is no next level.
    pub fn advance_level(&mut self) -> bool {
        let Some(next) = self.catalog.next_level_id(self.level.id) else {
            log::warn!("Level {} is the last level", self.level.id);
            return false;
        };
        self.level = self.catalog.get_or_first(next).clone();
        self.reset_field(true);
        self.phase = GamePhase::Playing;
        log::info!(
            "Advanced to level {} with base score {}",
            self.level.id,
            self.run.base_score
        );
        true
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    pub fn to_menu(&mut self) {
        self.phase = GamePhase::Menu;
    }

    /// Reset player, entities, abilities and lives for a new attempt
    fn reset_field(&mut self, keep_score: bool) {
        let carried = if keep_score { self.run.live_score } else { 0 };
        let (last_triple, last_magnet) = if keep_score {
            (
                self.abilities.last_triple_jump_score,
                self.abilities.last_magnet_score,
            )
        } else {
            (0, 0)
        };

        self.clock = 0.0;
        self.player = PlayerState::default();
        self.obstacles.clear();
        self.stars.clear();
        self.particles.clear();
        self.props.clear();
        self.invincible_until = 0.0;
        self.abilities = Abilities {
            last_triple_jump_score: last_triple,
            last_magnet_score: last_magnet,
            ..Default::default()
        };
        self.run.base_score = carried;
        self.run.live_score = carried;
        self.run.distance = 0.0;
        self.run.lives = self.tuning.initial_lives.min(self.tuning.max_lives);
        self.run.level_id = self.level.id;
        self.difficulty = scale_difficulty(carried, &self.level, &self.tuning);

        let star_jitter = self.rng.random::<f32>();
        let prop_roll = self.fx_rng.random::<f32>();
        self.spawner = SpawnerState {
            star_cooldown: super::spawner::star_cooldown(
                self.difficulty.steps,
                star_jitter,
                &self.tuning,
            ),
            prop_cooldown: super::spawner::prop_cooldown(prop_roll, &self.tuning),
            ..Default::default()
        };
    }

    /// Radial particle burst; skipped when particles are disabled
    pub fn spawn_particles(&mut self, pos: Vec2, color: ParticleColor, count: u32) {
        if !self.settings.particles {
            return;
        }
        for i in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                break;
            }
            let angle = std::f32::consts::TAU * i as f32 / count as f32;
            let speed = 2.0 + self.fx_rng.random::<f32>() * 3.0;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                life: 1.0,
                color,
            });
        }
    }

    /// Live score from the base score and distance travelled
    pub fn recompute_live_score(&mut self) {
        let per_point = self.tuning.distance_per_point.max(f64::EPSILON);
        let points = (self.run.distance / per_point).floor() as u64;
        self.run.live_score = self.run.base_score.saturating_add(points);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// True while post-hit invincibility lasts
    pub fn is_invincible(&self) -> bool {
        self.clock < self.invincible_until
    }
}
