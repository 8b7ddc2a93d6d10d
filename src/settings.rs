//! Player preferences
//!
//! Only `double_tap_enabled`, `particles` and `flying_props` change what the
//! simulation does; the rest is carried for audio/haptics collaborators.

use serde::{Deserialize, Serialize};

use crate::persistence::Storage;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Gameplay ===
    /// Second tap during the double-tap window issues a high jump
    pub double_tap_enabled: bool,

    // === Visual Effects ===
    /// Particle bursts on jumps, hits and pickups
    pub particles: bool,
    /// Birds, balloons and aircraft in the sky
    pub flying_props: bool,
    /// Reduced motion (collaborators minimise flashes)
    pub reduced_motion: bool,

    // === Feedback ===
    pub vibration: bool,
    pub muted: bool,
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            double_tap_enabled: true,
            particles: true,
            flying_props: true,
            reduced_motion: false,
            vibration: true,
            muted: false,
            volume: 0.7,
        }
    }
}

impl Settings {
    /// Storage key
    const STORAGE_KEY: &'static str = "lineJumpSettings";

    /// Volume after mute and range clamping
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.volume.clamp(0.0, 1.0)
        }
    }

    /// Load settings, falling back to defaults on missing or corrupt data
    pub fn load(storage: &dyn Storage) -> Self {
        match storage.get_item(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Settings>(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    settings
                }
                Err(e) => {
                    log::warn!("Corrupt settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Ok(None) => Self::default(),
            Err(e) => {
                log::warn!("Settings unavailable ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Save settings; failures are logged and ignored
    pub fn save(&self, storage: &mut dyn Storage) {
        let result = serde_json::to_string(self)
            .map_err(Into::into)
            .and_then(|json| storage.set_item(Self::STORAGE_KEY, &json));
        match result {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Failed to save settings: {}", e),
        }
    }
}
