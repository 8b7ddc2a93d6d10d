//! Host-facing driver
//!
//! Owns the simulation, the storage collaborator and saved progress. Hosts
//! forward raw input at any time; it is latched and consumed by the next
//! `step`. Progress is written only when a level is cleared or a run ends.

use crate::consts::REFERENCE_FRAME_DT;
use crate::levels::LevelCatalog;
use crate::persistence::{Progress, Storage};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, RenderSnapshot, TickInput, tick};
use crate::tuning::Tuning;

/// Game instance driven by a host loop
pub struct Runner {
    state: GameState,
    storage: Box<dyn Storage>,
    progress: Progress,
    /// Input latched since the last step
    input: TickInput,
    /// Next step ignores the wall-clock delta
    fresh_start: bool,
    /// Phase after the previous step, to detect transitions
    last_phase: GamePhase,
}

impl Runner {
    pub fn new(storage: Box<dyn Storage>, seed: u64) -> Self {
        Self::with_config(storage, seed, LevelCatalog::builtin(), Tuning::default())
    }

    pub fn with_config(
        storage: Box<dyn Storage>,
        seed: u64,
        catalog: LevelCatalog,
        tuning: Tuning,
    ) -> Self {
        let settings = Settings::load(storage.as_ref());
        let progress = Progress::load(storage.as_ref(), &catalog);
        let mut state = GameState::with_config(seed, catalog, tuning, settings);
        state.run.best_score = progress.best_score;
        state.run.career_score = progress.career_score;
        let last_phase = state.phase;

        Self {
            state,
            storage,
            progress,
            input: TickInput::default(),
            fresh_start: true,
            last_phase,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Volume the host should play sounds at
    pub fn volume(&self) -> f32 {
        self.state.settings.effective_volume()
    }

    /// Apply and persist new settings
    pub fn set_settings(&mut self, settings: Settings) {
        settings.save(self.storage.as_mut());
        self.state.settings = settings;
    }

    /// Start a run on an unlocked level. Returns false if refused.
    pub fn start_level(&mut self, id: u32) -> bool {
        if self.state.catalog.get(id).is_none() {
            log::warn!("Unknown level {}", id);
            return false;
        }
        if !self.progress.is_unlocked(id) {
            log::warn!("Level {} is locked", id);
            return false;
        }
        self.progress.set_current_level(id, self.storage.as_mut());
        self.state.start_run(id);
        self.begin();
        true
    }

    /// Restart the current level from zero
    pub fn restart(&mut self) {
        self.state.restart();
        self.begin();
    }

    /// Continue to the next level after clearing one
    pub fn next_level(&mut self) -> bool {
        if self.state.phase != GamePhase::LevelComplete {
            log::warn!("Next level requested outside level complete");
            return false;
        }
        if !self.state.advance_level() {
            return false;
        }
        let id = self.state.level.id;
        self.progress.set_current_level(id, self.storage.as_mut());
        self.begin();
        true
    }

    /// Leave to the menu; leaving a cleared level ends the run
    pub fn to_menu(&mut self) {
        if self.state.phase == GamePhase::LevelComplete {
            self.state.run.record_best();
            self.save_scores();
        }
        self.state.to_menu();
        self.input = TickInput::default();
        self.last_phase = self.state.phase;
    }

    pub fn press_down(&mut self) {
        self.input.jump_pressed = true;
        self.input.jump_held = true;
    }

    pub fn press_up(&mut self) {
        self.input.jump_held = false;
    }

    /// Two toggles before the next step cancel out
    pub fn toggle_pause(&mut self) {
        self.input.pause = !self.input.pause;
    }

    /// Let the game play itself
    pub fn set_autopilot(&mut self, enabled: bool) {
        self.input.autopilot = enabled;
    }

    /// Advance by `dt` seconds of wall-clock time
    pub fn step(&mut self, dt: f32) {
        let resuming = self.state.phase == GamePhase::Paused && self.input.pause;
        let dt = if self.fresh_start || resuming {
            REFERENCE_FRAME_DT
        } else {
            dt
        };

        let input = self.input.clone();
        tick(&mut self.state, &input, dt);
        if self.state.phase == GamePhase::Playing {
            self.fresh_start = false;
        }

        // Clear one-shot inputs after processing
        self.input.jump_pressed = false;
        self.input.pause = false;

        let phase = self.state.phase;
        if phase != self.last_phase {
            match phase {
                GamePhase::LevelComplete => self.on_level_complete(),
                GamePhase::GameOver => self.on_game_over(),
                _ => {}
            }
            self.last_phase = phase;
        }
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn begin(&mut self) {
        self.input = TickInput {
            autopilot: self.input.autopilot,
            ..Default::default()
        };
        self.fresh_start = true;
        self.last_phase = self.state.phase;
    }

    fn on_level_complete(&mut self) {
        if let Some(next) = self.state.catalog.next_level_id(self.state.level.id) {
            if self.progress.unlock(next, self.storage.as_mut()) {
                self.state.events.push(GameEvent::LevelUnlocked { level_id: next });
            }
        }
        self.save_scores();
    }

    fn on_game_over(&mut self) {
        self.save_scores();
    }

    fn save_scores(&mut self) {
        self.progress.record_scores(
            self.state.run.career_score,
            self.state.run.best_score,
            self.storage.as_mut(),
        );
    }
}
