//! Browser host bindings

use wasm_bindgen::prelude::*;

use crate::Runner;
use crate::persistence::{MemoryStorage, Storage, StorageError};
use crate::settings::Settings;

/// `window.localStorage`
pub struct LocalStorage {
    inner: web_sys::Storage,
}

impl LocalStorage {
    pub fn open() -> Result<Self, StorageError> {
        let window = web_sys::window().ok_or(StorageError::Unavailable)?;
        let inner = window
            .local_storage()
            .map_err(js_error)?
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { inner })
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Backend(format!("{:?}", value))
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.inner.set_item(key, value).map_err(js_error)
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
    }
    log::info!("Line Jump starting...");
}

/// Game handle for the JS host loop
#[wasm_bindgen]
pub struct WasmGame {
    runner: Runner,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmGame {
        let storage: Box<dyn Storage> = match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), progress will not be kept", e);
                Box::new(MemoryStorage::new())
            }
        };
        let seed = js_sys::Date::now() as u64;
        WasmGame {
            runner: Runner::new(storage, seed),
        }
    }

    pub fn start_level(&mut self, id: u32) -> bool {
        self.runner.start_level(id)
    }

    pub fn restart(&mut self) {
        self.runner.restart();
    }

    pub fn next_level(&mut self) -> bool {
        self.runner.next_level()
    }

    pub fn to_menu(&mut self) {
        self.runner.to_menu();
    }

    pub fn press_down(&mut self) {
        self.runner.press_down();
    }

    pub fn press_up(&mut self) {
        self.runner.press_up();
    }

    pub fn toggle_pause(&mut self) {
        self.runner.toggle_pause();
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.runner.set_autopilot(enabled);
    }

    /// `dt` in seconds since the previous animation frame
    pub fn step(&mut self, dt: f32) {
        self.runner.step(dt);
    }

    pub fn current_level(&self) -> u32 {
        self.runner.progress().current_level
    }

    pub fn unlocked_levels(&self) -> Vec<u32> {
        self.runner.progress().unlocked_levels.clone()
    }

    /// Level select entries, in play order
    pub fn levels_json(&self) -> String {
        serde_json::to_string(self.runner.state().catalog.levels()).unwrap_or_else(|e| {
            log::warn!("Failed to encode levels: {}", e);
            String::from("[]")
        })
    }

    /// Master volume for the audio collaborator; 0 when muted
    pub fn volume(&self) -> f32 {
        self.runner.volume()
    }

    pub fn snapshot_json(&self) -> String {
        serde_json::to_string(&self.runner.snapshot()).unwrap_or_else(|e| {
            log::warn!("Failed to encode snapshot: {}", e);
            String::from("{}")
        })
    }

    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.runner.drain_events()).unwrap_or_else(|e| {
            log::warn!("Failed to encode events: {}", e);
            String::from("[]")
        })
    }

    pub fn settings_json(&self) -> String {
        serde_json::to_string(self.runner.settings()).unwrap_or_else(|_| String::from("{}"))
    }

    /// Replace settings from JSON. Returns false on malformed input.
    pub fn set_settings_json(&mut self, json: &str) -> bool {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => {
                self.runner.set_settings(settings);
                true
            }
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                false
            }
        }
    }
}

impl Default for WasmGame {
    fn default() -> Self {
        Self::new()
    }
}
