//! Difficulty levels and their tuning table
//!
//! One immutable profile per level; a session picks exactly one at `start`.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "EASY",
            DifficultyLevel::Medium => "MEDIUM",
            DifficultyLevel::Hard => "HARD",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(DifficultyLevel::Easy),
            "medium" | "med" => Ok(DifficultyLevel::Medium),
            "hard" => Ok(DifficultyLevel::Hard),
            _ => Err(ConfigError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Tuning profile for this level
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            DifficultyLevel::Easy => DifficultyProfile {
                level: *self,
                max_targets: 3,
                spawn_interval_ms: 2000,
                target_size: 60.0,
                move_range_px: 8.0,
                cross_duration_ms: 5000,
                stamina_drain_rate: 0.5,
                score_multiplier: 1.0,
                stamina_recovery_on_kill: 25.0,
                miss_stamina_penalty: MissPenalty::STANDARD,
                miss_score_penalty_base: 10.0,
            },
            DifficultyLevel::Medium => DifficultyProfile {
                level: *self,
                max_targets: 5,
                spawn_interval_ms: 1500,
                target_size: 50.0,
                move_range_px: 6.0,
                cross_duration_ms: 4000,
                stamina_drain_rate: 1.0,
                score_multiplier: 1.5,
                stamina_recovery_on_kill: 15.0,
                miss_stamina_penalty: MissPenalty::STANDARD,
                miss_score_penalty_base: 10.0,
            },
            DifficultyLevel::Hard => DifficultyProfile {
                level: *self,
                max_targets: 7,
                spawn_interval_ms: 1000,
                target_size: 40.0,
                move_range_px: 4.0,
                cross_duration_ms: 3000,
                stamina_drain_rate: 1.5,
                score_multiplier: 2.0,
                stamina_recovery_on_kill: 10.0,
                miss_stamina_penalty: MissPenalty::STANDARD,
                miss_score_penalty_base: 10.0,
            },
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DifficultyLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Stamina lost on a miss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissPenalty {
    /// Applied when there is no active streak
    pub first: f32,
    /// Applied when the miss breaks a streak
    pub repeat: f32,
}

impl MissPenalty {
    pub const STANDARD: MissPenalty = MissPenalty {
        first: 12.0,
        repeat: 8.0,
    };
}

/// Tunable constants for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    /// Cap on concurrently live targets
    pub max_targets: usize,
    pub spawn_interval_ms: u64,
    /// Target diameter in playfield pixels
    pub target_size: f32,
    /// Vertical bob amplitude
    pub move_range_px: f32,
    /// Time for a target to cross the playfield
    pub cross_duration_ms: u64,
    pub stamina_drain_rate: f32,
    pub score_multiplier: f32,
    pub stamina_recovery_on_kill: f32,
    pub miss_stamina_penalty: MissPenalty,
    pub miss_score_penalty_base: f32,
}

/// Look up the profile for a level name
pub fn resolve(level: &str) -> Result<DifficultyProfile, ConfigError> {
    DifficultyLevel::parse(level).map(|l| l.profile())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_levels() {
        assert_eq!(resolve("EASY").unwrap().max_targets, 3);
        assert_eq!(resolve("medium").unwrap().spawn_interval_ms, 1500);
        assert_eq!(resolve(" Hard ").unwrap().cross_duration_ms, 3000);
        assert_eq!(resolve("med").unwrap().level, DifficultyLevel::Medium);
    }

    #[test]
    fn test_resolve_unknown_level() {
        assert_eq!(
            resolve("nightmare"),
            Err(ConfigError::UnknownDifficulty("nightmare".to_string()))
        );
        assert!(resolve("").is_err());
    }

    #[test]
    fn test_profiles_are_positive() {
        for level in DifficultyLevel::ALL {
            let p = level.profile();
            assert_eq!(p.level, level);
            assert!(p.max_targets > 0);
            assert!(p.spawn_interval_ms > 0);
            assert!(p.target_size > 0.0);
            assert!(p.move_range_px >= 0.0);
            assert!(p.cross_duration_ms > 0);
            assert!(p.stamina_drain_rate >= 0.0);
            assert!(p.score_multiplier > 0.0);
            assert!(p.stamina_recovery_on_kill >= 0.0);
            assert!(p.miss_score_penalty_base >= 0.0);
        }
    }

    #[test]
    fn test_harder_levels_are_harder() {
        let easy = DifficultyLevel::Easy.profile();
        let hard = DifficultyLevel::Hard.profile();
        assert!(hard.max_targets > easy.max_targets);
        assert!(hard.spawn_interval_ms < easy.spawn_interval_ms);
        assert!(hard.stamina_recovery_on_kill < easy.stamina_recovery_on_kill);
    }

    #[test]
    fn test_serde_uses_uppercase_names() {
        let json = serde_json::to_string(&DifficultyLevel::Hard).unwrap();
        assert_eq!(json, "\"HARD\"");
        let level: DifficultyLevel = serde_json::from_str("\"EASY\"").unwrap();
        assert_eq!(level, DifficultyLevel::Easy);
    }
}
