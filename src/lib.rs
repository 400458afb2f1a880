//! Bat Hunter - session engine for a timed arcade hunting game
//!
//! Core modules:
//! - `sim`: Session simulation (targets, clock, scoring, controller)
//! - `difficulty`: Static tuning table per difficulty level
//! - `feedback`: Fire-and-forget haptics/audio notifications
//! - `leaderboard`: Top 10 score board and its storage
//! - `runner`: Event loop that serializes ticks and taps on one thread
//! - `settings`: Persisted game configuration

pub mod difficulty;
pub mod error;
pub mod feedback;
pub mod leaderboard;
pub mod runner;
pub mod settings;
pub mod sim;

pub use difficulty::{DifficultyLevel, DifficultyProfile, MissPenalty, resolve};
pub use error::{CollaboratorError, ConfigError, HitError, LeaderboardError};
pub use leaderboard::{Leaderboard, LeaderboardEntry, LeaderboardService};
pub use settings::{GameSettings, Playfield};
pub use sim::{SessionController, SessionPhase, SessionState, SessionSummary};

/// Game configuration constants
pub mod consts {
    /// Default match length (one minute)
    pub const SESSION_DURATION_MS: u64 = 60_000;
    /// Countdown cadence
    pub const COUNTDOWN_TICK_MS: u64 = 1_000;
    /// Stamina drain cadence
    pub const DRAIN_TICK_MS: u64 = 500;

    /// Hits closer together than this extend the combo streak
    pub const COMBO_WINDOW_MS: u64 = 2_000;
    /// Bonus points per streak step
    pub const COMBO_STEP_BONUS: u32 = 5;
    /// Combo bonus never exceeds this
    pub const COMBO_BONUS_CAP: u32 = 50;

    /// Stamina bounds
    pub const STAMINA_MAX: f32 = 100.0;
    pub const STAMINA_MIN: f32 = 0.0;
    /// Crossing this threshold downward triggers a low-stamina warning
    pub const STAMINA_LOW_THRESHOLD: f32 = 25.0;

    /// Points awarded for a plain hit before combo and multiplier
    pub const BASE_HIT_POINTS: u32 = 10;

    /// Period of a target's vertical bob (half up, half down)
    pub const OSCILLATION_PERIOD_MS: u64 = 1_000;
    /// Targets start inside this vertical band (fractions of playfield height)
    pub const SPAWN_BAND_TOP: f32 = 0.2;
    pub const SPAWN_BAND_BOTTOM: f32 = 0.8;
}
