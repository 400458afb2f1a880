//! Score and stamina arithmetic
//!
//! Pure functions: they read the current state and profile and return deltas.
//! The controller applies them (and clamps) under its single writer.

use crate::consts::{COMBO_BONUS_CAP, COMBO_STEP_BONUS, COMBO_WINDOW_MS};
use crate::difficulty::DifficultyProfile;

use super::state::SessionState;

/// Result of a successful hit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitDelta {
    /// Always non-negative
    pub score_delta: i64,
    /// Recovery, already limited so stamina stays at or below 100
    pub stamina_delta: f32,
    pub new_consecutive_hits: u32,
    pub combo_bonus: u32,
}

/// Result of a miss. Resetting the streak is the caller's job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MissDelta {
    /// Always non-positive
    pub score_delta: i64,
    /// Always non-positive
    pub stamina_delta: f32,
}

/// Whether a hit at `now_ms` continues the current streak
pub fn within_combo(state: &SessionState, now_ms: u64) -> bool {
    state
        .last_hit_timestamp_ms
        .is_some_and(|last| now_ms.saturating_sub(last) < COMBO_WINDOW_MS)
}

pub fn compute_hit_delta(
    state: &SessionState,
    profile: &DifficultyProfile,
    base_points: u32,
    now_ms: u64,
) -> HitDelta {
    let combo = within_combo(state, now_ms);
    let (new_consecutive_hits, combo_bonus) = if combo {
        let bonus = state
            .consecutive_hits
            .saturating_mul(COMBO_STEP_BONUS)
            .min(COMBO_BONUS_CAP);
        (state.consecutive_hits.saturating_add(1), bonus)
    } else {
        (1, 0)
    };

    let raw = (base_points as f64 + combo_bonus as f64) * profile.score_multiplier as f64;
    let score_delta = raw.round().max(0.0) as i64;

    let headroom = (crate::consts::STAMINA_MAX - state.stamina).max(0.0);
    let stamina_delta = profile.stamina_recovery_on_kill.min(headroom);

    HitDelta {
        score_delta,
        stamina_delta,
        new_consecutive_hits,
        combo_bonus,
    }
}

pub fn compute_miss_delta(state: &SessionState, profile: &DifficultyProfile) -> MissDelta {
    let penalty = if state.consecutive_hits == 0 {
        profile.miss_stamina_penalty.first
    } else {
        profile.miss_stamina_penalty.repeat
    };
    let score_penalty =
        (profile.miss_score_penalty_base as f64 * profile.score_multiplier as f64).floor() as i64;

    MissDelta {
        score_delta: -score_penalty.max(0),
        stamina_delta: -penalty.max(0.0),
    }
}

/// Stamina removed by one drain tick. Never negative.
///
/// Multipliers apply in a fixed order: stamina band, final stretch, hot streak.
pub fn compute_drain_delta(
    state: &SessionState,
    profile: &DifficultyProfile,
    remaining_fraction: f32,
) -> f32 {
    let mut drain = 1.5 * profile.stamina_drain_rate.max(0.0);

    if state.stamina > 75.0 {
        drain *= 1.5;
    } else if state.stamina < 25.0 {
        drain *= 0.7;
    }

    if remaining_fraction < 0.3 {
        drain *= 1.3;
    }

    if state.consecutive_hits > 3 {
        drain *= 1.0 + state.consecutive_hits as f32 * 0.1;
    }

    drain
}
