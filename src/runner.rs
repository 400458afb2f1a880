//! Threaded session runner
//!
//! The controller lives on one event-loop thread. A ticker thread and any
//! number of input handles post commands into the same channel, so ticks and
//! taps are applied one at a time in arrival order.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::difficulty::DifficultyLevel;
use crate::sim::{SessionController, SessionState, SessionSummary};

/// Default cadence of the ticker thread
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Work item for the event loop
#[derive(Debug)]
pub enum Command {
    Tick,
    HitAttempt(Vec2),
    Snapshot(Sender<SessionState>),
    Summary(Sender<Option<SessionSummary>>),
    Stop,
}

/// Cloneable handle for the input layer
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: Sender<Command>,
}

impl InputHandle {
    /// Queue a tap. Returns false once the runner has stopped.
    pub fn hit_attempt(&self, position: Vec2) -> bool {
        self.tx.send(Command::HitAttempt(position)).is_ok()
    }
}

/// Owns the event-loop and ticker threads for one session
pub struct SessionRunner {
    tx: Sender<Command>,
    ticker_stop: Arc<AtomicBool>,
    event_loop: Option<JoinHandle<SessionController>>,
    ticker: Option<JoinHandle<()>>,
    stopped: Option<SessionController>,
}

impl SessionRunner {
    /// Start a session on `controller` and run it on background threads.
    /// Session time is measured from this call.
    pub fn spawn(
        mut controller: SessionController,
        level: DifficultyLevel,
        tick_interval: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::channel();
        let ticker_stop = Arc::new(AtomicBool::new(false));

        let epoch = Instant::now();
        controller.start_level(level, 0);

        let loop_stop = Arc::clone(&ticker_stop);
        let event_loop = thread::spawn(move || run_loop(controller, rx, epoch, loop_stop));

        let tick_tx = tx.clone();
        let tick_stop = Arc::clone(&ticker_stop);
        let ticker = thread::spawn(move || {
            loop {
                thread::sleep(tick_interval);
                if tick_stop.load(Ordering::Acquire) {
                    break;
                }
                if tick_tx.send(Command::Tick).is_err() {
                    break;
                }
            }
        });

        Self {
            tx,
            ticker_stop,
            event_loop: Some(event_loop),
            ticker: Some(ticker),
            stopped: None,
        }
    }

    pub fn input(&self) -> InputHandle {
        InputHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn hit_attempt(&self, position: Vec2) -> bool {
        self.tx.send(Command::HitAttempt(position)).is_ok()
    }

    /// Current state, or the final state once stopped
    pub fn snapshot(&self) -> Option<SessionState> {
        if let Some(controller) = &self.stopped {
            return Some(controller.snapshot());
        }
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx.send(Command::Snapshot(reply_tx)).ok()?;
        reply_rx.recv().ok()
    }

    pub fn summary(&self) -> Option<SessionSummary> {
        if let Some(controller) = &self.stopped {
            return controller.summary().cloned();
        }
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx.send(Command::Summary(reply_tx)).ok()?;
        reply_rx.recv().ok().flatten()
    }

    /// Stop the session and join both threads. Idempotent.
    pub fn stop(&mut self) -> Option<SessionSummary> {
        self.ticker_stop.store(true, Ordering::Release);
        let _ = self.tx.send(Command::Stop);

        if let Some(handle) = self.event_loop.take() {
            match handle.join() {
                Ok(controller) => self.stopped = Some(controller),
                Err(_) => log::warn!("Session event loop panicked"),
            }
        }
        if let Some(handle) = self.ticker.take() {
            let _ = handle.join();
        }

        self.stopped.as_ref().and_then(|c| c.summary().cloned())
    }

    /// Stop and hand back the controller
    pub fn into_controller(mut self) -> Option<SessionController> {
        self.stop();
        self.stopped.take()
    }
}

impl Drop for SessionRunner {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_loop(
    mut controller: SessionController,
    rx: Receiver<Command>,
    epoch: Instant,
    ticker_stop: Arc<AtomicBool>,
) -> SessionController {
    let now_ms = || epoch.elapsed().as_millis() as u64;

    for command in rx {
        match command {
            Command::Tick => {
                if controller.on_tick(now_ms()).is_some() {
                    ticker_stop.store(true, Ordering::Release);
                }
            }
            Command::HitAttempt(position) => {
                controller.on_hit_attempt(position, now_ms());
                if !controller.state().is_active() {
                    ticker_stop.store(true, Ordering::Release);
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(controller.snapshot());
            }
            Command::Summary(reply) => {
                let _ = reply.send(controller.summary().cloned());
            }
            Command::Stop => {
                controller.stop();
                break;
            }
        }
    }

    ticker_stop.store(true, Ordering::Release);
    controller
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::NullFeedback;
    use crate::settings::GameSettings;
    use crate::sim::{EndReason, NoHitTest, SessionPhase, SequenceSource};

    fn controller(duration_ms: u64) -> SessionController {
        let settings = GameSettings {
            session_duration_ms: duration_ms,
            ..Default::default()
        };
        SessionController::new(
            settings,
            Box::new(NoHitTest),
            Box::new(NullFeedback),
            Box::new(SequenceSource::constant(0.5)),
        )
    }

    #[test]
    fn test_runner_starts_active() {
        let runner = SessionRunner::spawn(
            controller(60_000),
            DifficultyLevel::Easy,
            Duration::from_millis(10),
        );
        let state = runner.snapshot().unwrap();
        assert_eq!(state.phase, SessionPhase::Active);
        assert_eq!(state.difficulty, DifficultyLevel::Easy);
    }

    #[test]
    fn test_stop_is_idempotent_and_final() {
        let mut runner = SessionRunner::spawn(
            controller(60_000),
            DifficultyLevel::Medium,
            Duration::from_millis(10),
        );
        let summary = runner.stop().unwrap();
        assert_eq!(summary.reason, EndReason::Stopped);
        assert_eq!(runner.stop(), Some(summary.clone()));

        // Late input after stop goes nowhere
        assert!(!runner.hit_attempt(Vec2::ZERO));
        let state = runner.snapshot().unwrap();
        assert_eq!(state.phase, SessionPhase::Ended);
        assert!(state.live_targets.is_empty());
    }

    #[test]
    fn test_taps_are_serialized() {
        let runner = SessionRunner::spawn(
            controller(60_000),
            DifficultyLevel::Easy,
            Duration::from_millis(50),
        );
        let input = runner.input();
        assert!(input.hit_attempt(Vec2::ZERO));
        assert!(input.hit_attempt(Vec2::ZERO));
        let state = runner.snapshot().unwrap();
        // Cold miss (12) then repeated cold miss (12); drain may add a little
        assert!(state.stamina <= 76.0);
        assert_eq!(state.consecutive_hits, 0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_session_ends_on_its_own() {
        let runner = SessionRunner::spawn(
            controller(1_000),
            DifficultyLevel::Easy,
            Duration::from_millis(20),
        );
        let deadline = Instant::now() + Duration::from_secs(5);
        let mut ended = false;
        while Instant::now() < deadline {
            if runner.snapshot().map(|s| s.phase) == Some(SessionPhase::Ended) {
                ended = true;
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert!(ended);
        assert_eq!(runner.summary().map(|s| s.reason), Some(EndReason::TimeUp));

        let controller = runner.into_controller().unwrap();
        assert_eq!(controller.phase(), SessionPhase::Ended);
    }
}
