//! Target entities
//!
//! A target crosses the playfield left to right while bobbing vertically.
//! Movement is an explicit function of `progress` and elapsed time, so the
//! simulation never depends on a rendering clock.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::OSCILLATION_PERIOD_MS;
use crate::difficulty::DifficultyProfile;
use crate::settings::Playfield;

/// Session-scoped target identity (never reused within a session)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A live (or just removed) target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub spawn_time_ms: u64,
    /// Centre line of the vertical bob
    pub start_y: f32,
    /// 0..1 along the crossing path
    pub progress: f32,
    pub alive: bool,
    /// Bob phase offset (fraction of a period)
    pub bob_phase: f32,
    /// Bob amplitude in pixels
    pub bob_amplitude: f32,
}

impl Target {
    pub fn new(
        id: TargetId,
        spawn_time_ms: u64,
        start_y: f32,
        bob_phase: f32,
        bob_amplitude: f32,
    ) -> Self {
        Self {
            id,
            spawn_time_ms,
            start_y,
            progress: 0.0,
            alive: true,
            bob_phase,
            bob_amplitude,
        }
    }

    /// Advance along the path; returns true once the far edge is reached
    pub fn advance(&mut self, dt_ms: u64, cross_duration_ms: u64) -> bool {
        self.progress += dt_ms as f32 / cross_duration_ms.max(1) as f32;
        self.progress >= 1.0
    }

    /// Centre of the target in playfield coordinates
    pub fn position(
        &self,
        now_ms: u64,
        playfield: &Playfield,
        profile: &DifficultyProfile,
    ) -> Vec2 {
        let size = profile.target_size;
        let x = -size + self.progress.clamp(0.0, 1.0) * (playfield.width + 2.0 * size);

        let elapsed = now_ms.saturating_sub(self.spawn_time_ms);
        let t = elapsed as f32 / OSCILLATION_PERIOD_MS as f32 + self.bob_phase;
        let y = self.start_y + self.bob_amplitude * triangle_wave(t);

        Vec2::new(x, y)
    }
}

/// Triangle wave with period 1: starts at 0, dips to -1, rises to +1, returns to 0
fn triangle_wave(t: f32) -> f32 {
    let p = t.rem_euclid(1.0);
    if p < 0.25 {
        -4.0 * p
    } else if p < 0.75 {
        -1.0 + 4.0 * (p - 0.25)
    } else {
        1.0 - 4.0 * (p - 0.75)
    }
}
