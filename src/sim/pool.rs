//! Live target population
//!
//! The pool is the only owner of targets. It spawns on a fixed cadence up to the
//! profile's cap, advances targets on each tick and removes them when they are
//! hit or leave the playfield. Targets are kept sorted by id for stable iteration.

use crate::consts::{SPAWN_BAND_BOTTOM, SPAWN_BAND_TOP};
use crate::difficulty::DifficultyProfile;
use crate::error::HitError;
use crate::settings::Playfield;

use super::rng::RandomSource;
use super::target::{Target, TargetId};

pub struct TargetPool {
    profile: DifficultyProfile,
    playfield: Playfield,
    rng: Box<dyn RandomSource>,
    targets: Vec<Target>,
    next_id: u32,
    last_spawn_ms: Option<u64>,
    last_tick_ms: Option<u64>,
}

impl TargetPool {
    pub fn new(
        profile: DifficultyProfile,
        playfield: Playfield,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            profile,
            playfield,
            rng,
            targets: Vec::new(),
            next_id: 1,
            last_spawn_ms: None,
            last_tick_ms: None,
        }
    }

    /// Switch tuning for the next session and clear everything
    pub fn configure(&mut self, profile: DifficultyProfile) {
        self.profile = profile;
        self.reset();
    }

    /// Clear all live targets and spawn/advance timers
    pub fn reset(&mut self) {
        self.targets.clear();
        self.next_id = 1;
        self.last_spawn_ms = None;
        self.last_tick_ms = None;
    }

    /// Advance every live target and remove those that finished crossing.
    /// Returns the ids of expired targets in id order.
    pub fn tick(&mut self, now_ms: u64) -> Vec<TargetId> {
        let dt = self
            .last_tick_ms
            .map(|last| now_ms.saturating_sub(last))
            .unwrap_or(0);
        self.last_tick_ms = Some(self.last_tick_ms.map_or(now_ms, |last| last.max(now_ms)));

        if dt == 0 {
            return Vec::new();
        }

        let cross = self.profile.cross_duration_ms;
        let mut expired = Vec::new();
        for target in &mut self.targets {
            if target.advance(dt, cross) {
                target.alive = false;
                expired.push(target.id);
            }
        }
        self.targets.retain(|t| t.alive);

        for id in &expired {
            log::debug!("Target {} expired", id);
        }
        expired
    }

    /// Spawn a target if below the cap and the spawn interval has elapsed
    pub fn maybe_spawn(&mut self, now_ms: u64) -> Option<TargetId> {
        if self.targets.len() >= self.profile.max_targets {
            return None;
        }
        if let Some(last) = self.last_spawn_ms {
            if now_ms.saturating_sub(last) < self.profile.spawn_interval_ms {
                return None;
            }
        }

        let id = TargetId(self.next_id);
        self.next_id += 1;

        let height = self.playfield.height;
        let start_y = self
            .rng
            .next_range(height * SPAWN_BAND_TOP, height * SPAWN_BAND_BOTTOM);
        let bob_phase = self.rng.next_unit();

        self.targets.push(Target::new(
            id,
            now_ms,
            start_y,
            bob_phase,
            self.profile.move_range_px,
        ));
        self.last_spawn_ms = Some(now_ms);
        if self.last_tick_ms.is_none() {
            self.last_tick_ms = Some(now_ms);
        }

        log::debug!(
            "Spawned target {} at y={:.1} ({} live, max {})",
            id,
            start_y,
            self.targets.len(),
            self.profile.max_targets
        );
        Some(id)
    }

    /// Remove a live target. Fails if it already expired or was hit.
    pub fn hit(&mut self, id: TargetId) -> Result<Target, HitError> {
        let idx = self
            .targets
            .iter()
            .position(|t| t.id == id)
            .ok_or(HitError::NotFound(id))?;
        let mut target = self.targets.remove(idx);
        target.alive = false;
        Ok(target)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn live_count(&self) -> usize {
        self.targets.len()
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }
}

impl std::fmt::Debug for TargetPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetPool")
            .field("level", &self.profile.level)
            .field("targets", &self.targets)
            .field("next_id", &self.next_id)
            .field("last_spawn_ms", &self.last_spawn_ms)
            .field("last_tick_ms", &self.last_tick_ms)
            .finish()
    }
}
