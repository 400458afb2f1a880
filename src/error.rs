//! Error types
//!
//! Only configuration and leaderboard persistence errors ever reach a caller.
//! Hit and collaborator errors are absorbed by the session controller.

use thiserror::Error;

use crate::sim::TargetId;

/// Invalid or missing configuration. Fatal for `start`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown difficulty level: {0:?}")]
    UnknownDifficulty(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

/// Failed attempt to remove a target from the live set
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HitError {
    #[error("target {0} is not live")]
    NotFound(TargetId),
}

/// Failure reported by an external collaborator (hit tester, feedback sink)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{collaborator} failed: {message}")]
pub struct CollaboratorError {
    pub collaborator: &'static str,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(collaborator: &'static str, message: impl Into<String>) -> Self {
        Self {
            collaborator,
            message: message.into(),
        }
    }
}

/// Leaderboard validation and storage errors
#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("player name must be {min}..={max} characters after trimming, got {len}")]
    InvalidName { len: usize, min: usize, max: usize },

    #[error("leaderboard storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type LeaderboardResult<T> = Result<T, LeaderboardError>;
