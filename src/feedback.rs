//! Haptic/audio feedback
//!
//! The session emits events and never waits on their rendering. Sinks report
//! failure through `Result`, but the controller only logs it.

use std::sync::mpsc::Sender;

use crate::error::CollaboratorError;
use crate::sim::{SessionSummary, TargetId};

/// Notification emitted by the session
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackEvent {
    /// Player fired (any tap while active)
    Shot,
    /// A target was killed
    HitOccurred {
        target: TargetId,
        score_delta: i64,
        combo: u32,
    },
    /// Tap hit nothing
    MissOccurred { stamina_penalty: f32 },
    /// A target crossed the playfield unhit
    TargetExpired(TargetId),
    /// Drain crossed the low-stamina threshold
    StaminaLow { stamina: f32 },
    SessionEnded(SessionSummary),
}

impl FeedbackEvent {
    /// Vibration pattern length for this event, if any
    pub fn vibration_ms(&self) -> Option<u64> {
        match self {
            FeedbackEvent::Shot => Some(50),
            FeedbackEvent::HitOccurred { .. } => Some(100),
            FeedbackEvent::StaminaLow { .. } => Some(200),
            FeedbackEvent::MissOccurred { .. }
            | FeedbackEvent::TargetExpired(_)
            | FeedbackEvent::SessionEnded(_) => None,
        }
    }

    /// Sound cue name for this event, if any
    pub fn sound(&self) -> Option<&'static str> {
        match self {
            FeedbackEvent::Shot => Some("shoot"),
            FeedbackEvent::HitOccurred { .. } => Some("hit"),
            FeedbackEvent::MissOccurred { .. } => Some("miss"),
            FeedbackEvent::TargetExpired(_)
            | FeedbackEvent::StaminaLow { .. }
            | FeedbackEvent::SessionEnded(_) => None,
        }
    }
}

/// Receiver of feedback notifications (fire-and-forget)
pub trait FeedbackSink: Send {
    fn notify(&mut self, event: &FeedbackEvent) -> Result<(), CollaboratorError>;
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl FeedbackSink for NullFeedback {
    fn notify(&mut self, _event: &FeedbackEvent) -> Result<(), CollaboratorError> {
        Ok(())
    }
}

/// Renders feedback as log lines, honouring the sound/vibration toggles
#[derive(Debug, Clone, Copy)]
pub struct LogFeedback {
    pub sound_enabled: bool,
    pub vibration_enabled: bool,
}

impl LogFeedback {
    pub fn new(sound_enabled: bool, vibration_enabled: bool) -> Self {
        Self {
            sound_enabled,
            vibration_enabled,
        }
    }
}

impl FeedbackSink for LogFeedback {
    fn notify(&mut self, event: &FeedbackEvent) -> Result<(), CollaboratorError> {
        if self.vibration_enabled {
            if let Some(ms) = event.vibration_ms() {
                log::debug!("vibrate {}ms", ms);
            }
        }
        if self.sound_enabled {
            if let Some(cue) = event.sound() {
                log::debug!("play sound '{}'", cue);
            }
        }
        if let FeedbackEvent::SessionEnded(summary) = event {
            log::info!(
                "Session over ({:?}): score {}, {} kills",
                summary.reason,
                summary.score,
                summary.targets_killed
            );
        }
        Ok(())
    }
}

/// Forwards events over a channel without blocking
#[derive(Debug, Clone)]
pub struct ChannelFeedback {
    tx: Sender<FeedbackEvent>,
}

impl ChannelFeedback {
    pub fn new(tx: Sender<FeedbackEvent>) -> Self {
        Self { tx }
    }
}

impl FeedbackSink for ChannelFeedback {
    fn notify(&mut self, event: &FeedbackEvent) -> Result<(), CollaboratorError> {
        self.tx
            .send(event.clone())
            .map_err(|_| CollaboratorError::new("feedback channel", "receiver disconnected"))
    }
}
