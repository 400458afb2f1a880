//! Session state and summary types
//!
//! `SessionState` is owned by the controller and only ever handed out as a
//! snapshot. Score and stamina mutation goes through the clamping helpers here.

use serde::{Deserialize, Serialize};

use super::target::Target;
use crate::consts::{STAMINA_MAX, STAMINA_MIN};
use crate::difficulty::DifficultyLevel;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// No session started yet
    Idle,
    /// Timers running, accepting taps
    Active,
    /// Terminal; no further mutation until the next `start`
    Ended,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Countdown reached zero
    TimeUp,
    /// Stamina reached zero
    Exhausted,
    /// Host stopped the session (navigated away)
    Stopped,
}

/// Complete mutable state of one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub difficulty: DifficultyLevel,
    pub score: u64,
    /// Always within 0..=100
    pub stamina: f32,
    pub remaining_time_ms: u64,
    pub session_duration_ms: u64,
    pub consecutive_hits: u32,
    /// Time of the previous hit (None until the first hit)
    pub last_hit_timestamp_ms: Option<u64>,
    pub targets_killed: u32,
    pub phase: SessionPhase,
    /// Live targets, sorted by id
    pub live_targets: Vec<Target>,
}

impl SessionState {
    /// Fresh, idle state
    pub fn new(difficulty: DifficultyLevel, session_duration_ms: u64) -> Self {
        Self {
            difficulty,
            score: 0,
            stamina: STAMINA_MAX,
            remaining_time_ms: session_duration_ms,
            session_duration_ms,
            consecutive_hits: 0,
            last_hit_timestamp_ms: None,
            targets_killed: 0,
            phase: SessionPhase::Idle,
            live_targets: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    /// Fraction of the match still to play (1.0 at start, 0.0 at the buzzer)
    pub fn remaining_fraction(&self) -> f32 {
        if self.session_duration_ms == 0 {
            return 0.0;
        }
        self.remaining_time_ms as f32 / self.session_duration_ms as f32
    }

    /// Add a signed score delta, clamping at zero
    pub fn apply_score_delta(&mut self, delta: i64) {
        self.score = if delta >= 0 {
            self.score.saturating_add(delta as u64)
        } else {
            self.score.saturating_sub(delta.unsigned_abs())
        };
    }

    /// Add a signed stamina delta, clamping to 0..=100.
    /// Returns the change actually applied.
    pub fn apply_stamina_delta(&mut self, delta: f32) -> f32 {
        let before = self.stamina;
        self.stamina = (self.stamina + delta).clamp(STAMINA_MIN, STAMINA_MAX);
        self.stamina - before
    }

    pub fn summary(&self, reason: EndReason) -> SessionSummary {
        SessionSummary {
            score: self.score,
            targets_killed: self.targets_killed,
            time_left_ms: self.remaining_time_ms,
            difficulty: self.difficulty,
            reason,
        }
    }
}

/// Terminal report handed to the host screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub score: u64,
    pub targets_killed: u32,
    pub time_left_ms: u64,
    pub difficulty: DifficultyLevel,
    pub reason: EndReason,
}
