//! Session simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as explicit millisecond timestamps
//! - Randomness only through an injected `RandomSource`
//! - Stable iteration order (targets sorted by id)
//! - No rendering, capture or platform dependencies

pub mod clock;
pub mod pool;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod state;
pub mod target;

pub use clock::{ClockEvent, SessionClock};
pub use hit_test::{GeometryHitTest, HitQuery, HitTest, NoHitTest};
pub use pool::TargetPool;
pub use rng::{PcgSource, RandomSource, SequenceSource};
pub use scoring::{
    HitDelta, MissDelta, compute_drain_delta, compute_hit_delta, compute_miss_delta, within_combo,
};
pub use session::{HitOutcome, SessionController};
pub use state::{EndReason, SessionPhase, SessionState, SessionSummary};
pub use target::{Target, TargetId};
