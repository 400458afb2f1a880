//! Session clock
//!
//! Two fixed cadences: the 1000 ms countdown and the 500 ms stamina drain.
//! The caller drains due events one at a time with [`SessionClock::next_due`]
//! so it can stop as soon as the session ends, leaving later events unfired.

use crate::consts::{COUNTDOWN_TICK_MS, DRAIN_TICK_MS};

/// A cadence firing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockEvent {
    /// Decrement remaining time by one countdown step
    Countdown,
    /// Apply one stamina drain step
    Drain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClockState {
    Stopped,
    Running { next_countdown_ms: u64, next_drain_ms: u64 },
    Ended,
}

#[derive(Debug, Clone)]
pub struct SessionClock {
    countdown_ms: u64,
    drain_ms: u64,
    state: ClockState,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(COUNTDOWN_TICK_MS, DRAIN_TICK_MS)
    }
}

impl SessionClock {
    pub fn new(countdown_ms: u64, drain_ms: u64) -> Self {
        Self {
            countdown_ms: countdown_ms.max(1),
            drain_ms: drain_ms.max(1),
            state: ClockState::Stopped,
        }
    }

    /// Arm both cadences relative to `now_ms`
    pub fn start(&mut self, now_ms: u64) {
        self.state = ClockState::Running {
            next_countdown_ms: now_ms + self.countdown_ms,
            next_drain_ms: now_ms + self.drain_ms,
        };
    }

    /// Pop the earliest event due at or before `now_ms`.
    /// Countdown wins ties so the timer reads zero before the last drain.
    pub fn next_due(&mut self, now_ms: u64) -> Option<ClockEvent> {
        let ClockState::Running {
            next_countdown_ms,
            next_drain_ms,
        } = &mut self.state
        else {
            return None;
        };

        let earliest = (*next_countdown_ms).min(*next_drain_ms);
        if earliest > now_ms {
            return None;
        }

        if *next_countdown_ms <= *next_drain_ms {
            *next_countdown_ms += self.countdown_ms;
            Some(ClockEvent::Countdown)
        } else {
            *next_drain_ms += self.drain_ms;
            Some(ClockEvent::Drain)
        }
    }

    /// Mark the session over. Returns true only for the first call.
    pub fn signal_end(&mut self) -> bool {
        if self.state == ClockState::Ended {
            return false;
        }
        self.state = ClockState::Ended;
        true
    }

    /// Disarm without signalling an end (used before a fresh start)
    pub fn reset(&mut self) {
        self.state = ClockState::Stopped;
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ClockState::Running { .. })
    }

    pub fn has_ended(&self) -> bool {
        self.state == ClockState::Ended
    }

    /// A session ends when time or stamina runs out
    pub fn is_exhausted(remaining_time_ms: u64, stamina: f32) -> bool {
        remaining_time_ms == 0 || stamina <= 0.0
    }
}
