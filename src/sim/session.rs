//! Session controller
//!
//! Orchestrates the clock, target pool and scoring for one session at a time.
//! Every mutation checks the phase first, so ticks or taps that arrive after
//! the session ended (late timers, stale input) are guaranteed no-ops.

use glam::Vec2;

use super::clock::{ClockEvent, SessionClock};
use super::hit_test::{HitQuery, HitTest};
use super::pool::TargetPool;
use super::rng::RandomSource;
use super::scoring::{compute_drain_delta, compute_hit_delta, compute_miss_delta};
use super::state::{EndReason, SessionPhase, SessionState, SessionSummary};
use super::target::TargetId;
use crate::consts::{BASE_HIT_POINTS, COUNTDOWN_TICK_MS, STAMINA_LOW_THRESHOLD};
use crate::difficulty::{DifficultyLevel, DifficultyProfile};
use crate::error::{ConfigError, HitError};
use crate::feedback::{FeedbackEvent, FeedbackSink};
use crate::settings::GameSettings;

/// What a tap did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    Hit {
        target: TargetId,
        score_delta: i64,
        combo: u32,
    },
    Miss {
        score_delta: i64,
        stamina_delta: f32,
    },
    /// Session not active; nothing changed
    Ignored,
}

pub struct SessionController {
    settings: GameSettings,
    profile: DifficultyProfile,
    state: SessionState,
    pool: TargetPool,
    clock: SessionClock,
    hit_test: Box<dyn HitTest>,
    feedback: Box<dyn FeedbackSink>,
    summary: Option<SessionSummary>,
}

impl SessionController {
    pub fn new(
        settings: GameSettings,
        hit_test: Box<dyn HitTest>,
        feedback: Box<dyn FeedbackSink>,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let profile = settings.difficulty.profile();
        let state = SessionState::new(settings.difficulty, settings.session_duration_ms);
        let pool = TargetPool::new(profile, settings.playfield, rng);
        Self {
            settings,
            profile,
            state,
            pool,
            clock: SessionClock::default(),
            hit_test,
            feedback,
            summary: None,
        }
    }

    /// Start a fresh session. Unknown difficulty names are fatal.
    pub fn start(&mut self, difficulty: &str, now_ms: u64) -> Result<(), ConfigError> {
        let level = DifficultyLevel::parse(difficulty)?;
        self.start_level(level, now_ms);
        Ok(())
    }

    pub fn start_level(&mut self, level: DifficultyLevel, now_ms: u64) {
        self.profile = level.profile();
        self.state = SessionState::new(level, self.settings.session_duration_ms);
        self.state.phase = SessionPhase::Active;
        self.summary = None;

        self.pool.configure(self.profile);
        self.clock.reset();
        self.clock.start(now_ms);

        self.pool.maybe_spawn(now_ms);
        self.sync_targets();

        log::info!(
            "Session started: {} for {}ms",
            level,
            self.settings.session_duration_ms
        );
    }

    /// Advance timers and targets to `now_ms`.
    /// Returns the summary if this tick ended the session.
    pub fn on_tick(&mut self, now_ms: u64) -> Option<SessionSummary> {
        if !self.state.is_active() {
            log::trace!("Tick at {}ms ignored ({:?})", now_ms, self.state.phase);
            return None;
        }

        while let Some(event) = self.clock.next_due(now_ms) {
            match event {
                ClockEvent::Countdown => {
                    self.state.remaining_time_ms =
                        self.state.remaining_time_ms.saturating_sub(COUNTDOWN_TICK_MS);
                }
                ClockEvent::Drain => self.apply_drain(),
            }
            if let Some(summary) = self.check_end() {
                return Some(summary);
            }
        }

        self.advance_targets(now_ms);
        self.pool.maybe_spawn(now_ms);
        self.sync_targets();
        None
    }

    /// Resolve a tap at `position`
    pub fn on_hit_attempt(&mut self, position: Vec2, now_ms: u64) -> HitOutcome {
        if !self.state.is_active() {
            log::trace!("Tap at {}ms ignored ({:?})", now_ms, self.state.phase);
            return HitOutcome::Ignored;
        }

        self.notify(FeedbackEvent::Shot);
        // Bring positions up to the tap time so escaped targets can't be hit
        self.advance_targets(now_ms);

        let query = HitQuery {
            position,
            now_ms,
            targets: self.pool.targets(),
            profile: &self.profile,
            playfield: self.pool.playfield(),
        };
        let candidate = match self.hit_test.test_hit(&query) {
            Ok(candidate) => candidate,
            Err(e) => {
                log::warn!("Hit test failed, counting as miss: {}", e);
                None
            }
        };

        let killed = candidate.and_then(|id| match self.pool.hit(id) {
            Ok(target) => Some(target),
            Err(HitError::NotFound(id)) => {
                log::debug!("Stale hit on {}, counting as miss", id);
                None
            }
        });

        let outcome = match killed {
            Some(target) => self.apply_hit(target.id, now_ms),
            None => self.apply_miss(),
        };

        self.sync_targets();
        self.check_end();
        outcome
    }

    /// End the session now and release timers and targets. Safe to call repeatedly.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        if self.state.is_active() {
            return Some(self.finish(EndReason::Stopped));
        }
        self.pool.reset();
        self.state.live_targets.clear();
        None
    }

    /// Read-only snapshot for presentation
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Summary of the last finished session
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    fn apply_hit(&mut self, target: TargetId, now_ms: u64) -> HitOutcome {
        let delta = compute_hit_delta(&self.state, &self.profile, BASE_HIT_POINTS, now_ms);
        self.state.apply_score_delta(delta.score_delta);
        self.state.apply_stamina_delta(delta.stamina_delta);
        self.state.consecutive_hits = delta.new_consecutive_hits;
        self.state.last_hit_timestamp_ms = Some(now_ms);
        self.state.targets_killed += 1;

        log::debug!(
            "Hit {}: +{} (combo {}, bonus {})",
            target,
            delta.score_delta,
            delta.new_consecutive_hits,
            delta.combo_bonus
        );
        self.notify(FeedbackEvent::HitOccurred {
            target,
            score_delta: delta.score_delta,
            combo: delta.new_consecutive_hits,
        });

        HitOutcome::Hit {
            target,
            score_delta: delta.score_delta,
            combo: delta.new_consecutive_hits,
        }
    }

    fn apply_miss(&mut self) -> HitOutcome {
        let delta = compute_miss_delta(&self.state, &self.profile);
        let score_before = self.state.score;
        self.state.apply_score_delta(delta.score_delta);
        let stamina_delta = self.state.apply_stamina_delta(delta.stamina_delta);
        self.state.consecutive_hits = 0;

        self.notify(FeedbackEvent::MissOccurred {
            stamina_penalty: -delta.stamina_delta,
        });

        HitOutcome::Miss {
            score_delta: self.state.score as i64 - score_before as i64,
            stamina_delta,
        }
    }

    fn apply_drain(&mut self) {
        let before = self.state.stamina;
        let fraction = self.state.remaining_fraction();
        let drain = compute_drain_delta(&self.state, &self.profile, fraction);
        self.state.apply_stamina_delta(-drain);

        if before > STAMINA_LOW_THRESHOLD && self.state.stamina <= STAMINA_LOW_THRESHOLD {
            self.notify(FeedbackEvent::StaminaLow {
                stamina: self.state.stamina,
            });
        }
    }

    fn check_end(&mut self) -> Option<SessionSummary> {
        if !self.state.is_active() {
            return None;
        }
        if self.state.stamina <= 0.0 {
            Some(self.finish(EndReason::Exhausted))
        } else if self.state.remaining_time_ms == 0 {
            Some(self.finish(EndReason::TimeUp))
        } else {
            None
        }
    }

    /// Active -> Ended. Only reachable once per session.
    fn finish(&mut self, reason: EndReason) -> SessionSummary {
        self.state.phase = SessionPhase::Ended;
        self.clock.signal_end();
        self.pool.reset();
        self.state.live_targets.clear();

        let summary = self.state.summary(reason);
        log::info!(
            "Session ended ({:?}): score {}, {} kills, {}ms left",
            reason,
            summary.score,
            summary.targets_killed,
            summary.time_left_ms
        );
        self.notify(FeedbackEvent::SessionEnded(summary.clone()));
        self.summary = Some(summary.clone());
        summary
    }

    fn advance_targets(&mut self, now_ms: u64) {
        for id in self.pool.tick(now_ms) {
            self.notify(FeedbackEvent::TargetExpired(id));
        }
    }

    fn sync_targets(&mut self) {
        self.state.live_targets.clear();
        self.state.live_targets.extend_from_slice(self.pool.targets());
    }

    fn notify(&mut self, event: FeedbackEvent) {
        if let Err(e) = self.feedback.notify(&event) {
            log::warn!("Feedback sink unavailable: {}", e);
        }
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("profile", &self.profile)
            .field("state", &self.state)
            .field("pool", &self.pool)
            .field("clock", &self.clock)
            .finish()
    }
}
