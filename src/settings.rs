//! Game settings and preferences
//!
//! Persisted as JSON separately from the leaderboard.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::SESSION_DURATION_MS;
use crate::difficulty::DifficultyLevel;
use crate::error::ConfigError;

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 390.0,
            height: 844.0,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    /// Difficulty used when the host does not pick one
    pub difficulty: DifficultyLevel,
    /// Match length
    pub session_duration_ms: u64,

    // === Feedback ===
    pub sound_enabled: bool,
    pub vibration_enabled: bool,

    /// Area targets cross
    pub playfield: Playfield,
    /// Fixed RNG seed (random when absent)
    pub seed: Option<u64>,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            difficulty: DifficultyLevel::Medium,
            session_duration_ms: SESSION_DURATION_MS,

            // Sound files never shipped, vibration did
            sound_enabled: false,
            vibration_enabled: true,

            playfield: Playfield::default(),
            seed: None,
        }
    }
}

impl GameSettings {
    /// Load settings from a JSON file, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No settings at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::InvalidSettings(e.to_string())),
        };

        let settings: GameSettings = serde_json::from_str(&json)
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        std::fs::write(path.as_ref(), json)
            .map_err(|e| ConfigError::InvalidSettings(e.to_string()))?;
        log::info!("Settings saved");
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session_duration_ms == 0 {
            return Err(ConfigError::InvalidSettings(
                "session_duration_ms must be positive".to_string(),
            ));
        }
        if !(self.playfield.width > 0.0 && self.playfield.height > 0.0) {
            return Err(ConfigError::InvalidSettings(format!(
                "playfield must have positive size, got {}x{}",
                self.playfield.width, self.playfield.height
            )));
        }
        Ok(())
    }
}
