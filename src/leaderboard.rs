//! Leaderboard system
//!
//! Tracks the top 10 scores, descending, ties kept in insertion order.
//! Used by the host after a session ends; the session itself never touches it.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{LeaderboardError, LeaderboardResult};

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;
/// Player name length bounds (after trimming)
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 15;

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub player_name: String,
    pub score: u64,
    /// Serialized as an RFC 3339 / ISO-8601 string
    pub date: DateTime<Utc>,
}

/// Trim and length-check a player name
pub fn validate_name(name: &str) -> LeaderboardResult<String> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if !(NAME_MIN_LEN..=NAME_MAX_LEN).contains(&len) {
        return Err(LeaderboardError::InvalidName {
            len,
            min: NAME_MIN_LEN,
            max: NAME_MAX_LEN,
        });
    }
    Ok(trimmed.to_string())
}

/// Ranked score list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Rebuild from stored entries, restoring order and the cap
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<LeaderboardEntry> {
        self.entries
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        // Ties with the lowest entry lose to the earlier one
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Insert an entry. Returns the rank achieved (1-indexed) or None if it was evicted.
    pub fn add(&mut self, entry: LeaderboardEntry) -> Option<usize> {
        let rank = self.potential_rank(entry.score)?;
        self.entries.insert(rank - 1, entry);
        self.entries.truncate(MAX_ENTRIES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Where the leaderboard lives between runs
pub trait LeaderboardStore {
    fn load(&self) -> LeaderboardResult<Leaderboard>;
    fn save(&mut self, board: &Leaderboard) -> LeaderboardResult<()>;
    fn clear(&mut self) -> LeaderboardResult<()>;
}

/// Process-local store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    board: Leaderboard,
}

impl LeaderboardStore for MemoryStore {
    fn load(&self) -> LeaderboardResult<Leaderboard> {
        Ok(self.board.clone())
    }

    fn save(&mut self, board: &Leaderboard) -> LeaderboardResult<()> {
        self.board = board.clone();
        Ok(())
    }

    fn clear(&mut self) -> LeaderboardResult<()> {
        self.board.clear();
        Ok(())
    }
}

/// JSON file store (an array of entries)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl LeaderboardStore for JsonFileStore {
    fn load(&self) -> LeaderboardResult<Leaderboard> {
        let json = match std::fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Leaderboard::new()),
            Err(e) => return Err(e.into()),
        };
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(&json)?;
        log::info!("Loaded {} leaderboard entries", entries.len());
        Ok(Leaderboard::from_entries(entries))
    }

    fn save(&mut self, board: &Leaderboard) -> LeaderboardResult<()> {
        let json = serde_json::to_string_pretty(board)?;
        std::fs::write(&self.path, json)?;
        log::info!("Leaderboard saved ({} entries)", board.len());
        Ok(())
    }

    fn clear(&mut self) -> LeaderboardResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Persistence service used by the end-of-game screen
#[derive(Debug, Clone, Default)]
pub struct LeaderboardService<S: LeaderboardStore> {
    store: S,
}

impl<S: LeaderboardStore> LeaderboardService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record a score dated now and return the updated ranking
    pub fn save_score(
        &mut self,
        player_name: &str,
        score: u64,
    ) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        self.save_score_at(player_name, score, Utc::now())
    }

    pub fn save_score_at(
        &mut self,
        player_name: &str,
        score: u64,
        date: DateTime<Utc>,
    ) -> LeaderboardResult<Vec<LeaderboardEntry>> {
        let player_name = validate_name(player_name)?;
        // An unreadable board is left untouched rather than overwritten
        let mut board = self.store.load()?;

        match board.add(LeaderboardEntry {
            player_name,
            score,
            date,
        }) {
            Some(rank) => log::info!("New leaderboard entry at rank {}", rank),
            None => log::debug!("Score {} did not make the leaderboard", score),
        }

        self.store.save(&board)?;
        Ok(board.into_entries())
    }

    /// Current ranking; storage failures read as an empty board
    pub fn get_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.load_or_empty().into_entries()
    }

    /// Returns false if the store could not be cleared
    pub fn clear_leaderboard(&mut self) -> bool {
        match self.store.clear() {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Error clearing leaderboard: {}", e);
                false
            }
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn load_or_empty(&self) -> Leaderboard {
        self.store.load().unwrap_or_else(|e| {
            log::warn!("Error loading leaderboard, starting fresh: {}", e);
            Leaderboard::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn entry(name: &str, score: u64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_name: name.to_string(),
            score,
            date: date(0),
        }
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Ada ").unwrap(), "Ada");
        assert!(validate_name("A").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name("abcdefghijklmnop").is_err());
        assert!(validate_name("abcdefghijklmno").is_ok());
    }

    #[test]
    fn test_add_sorts_descending() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(entry("aa", 50)), Some(1));
        assert_eq!(board.add(entry("bb", 80)), Some(1));
        assert_eq!(board.add(entry("cc", 60)), Some(2));
        let scores: Vec<u64> = board.entries().iter().map(|e| e.score).collect();
        assert_eq!(scores, vec![80, 60, 50]);
        assert_eq!(board.top_score(), Some(80));
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut board = Leaderboard::new();
        board.add(entry("first", 40));
        board.add(entry("second", 40));
        assert_eq!(board.add(entry("third", 40)), Some(3));
        let names: Vec<&str> = board.entries().iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_zero_score_is_allowed() {
        let mut board = Leaderboard::new();
        assert_eq!(board.add(entry("zz", 0)), Some(1));
    }

    #[test]
    fn test_eleventh_score_evicts_lowest() {
        let mut service = LeaderboardService::new(MemoryStore::default());
        for i in 0..11u64 {
            let score = (i * 37) % 11 * 10;
            service.save_score_at(&format!("p{:02}", i), score, date(i as i64)).unwrap();
        }
        let board = service.get_leaderboard();
        assert_eq!(board.len(), MAX_ENTRIES);
        assert!(board.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(board.iter().all(|e| e.score != 0));
    }

    #[test]
    fn test_full_board_rejects_low_score() {
        let mut board = Leaderboard::new();
        for i in 1..=10 {
            board.add(entry("pp", i * 10));
        }
        assert!(!board.qualifies(10));
        assert_eq!(board.potential_rank(5), None);
        assert_eq!(board.add(entry("low", 10)), None);
        assert_eq!(board.potential_rank(55), Some(6));
    }

    #[test]
    fn test_invalid_name_rejected_before_storage() {
        let mut service = LeaderboardService::new(MemoryStore::default());
        assert!(matches!(
            service.save_score("x", 100),
            Err(LeaderboardError::InvalidName { len: 1, .. })
        ));
        assert!(service.get_leaderboard().is_empty());
    }

    #[test]
    fn test_json_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let mut service = LeaderboardService::new(JsonFileStore::new(&path));
        service.save_score_at("Ada", 120, date(1)).unwrap();
        service.save_score_at("Grace", 300, date(2)).unwrap();

        let reopened = LeaderboardService::new(JsonFileStore::new(&path));
        let board = reopened.get_leaderboard();
        assert_eq!(board.len(), 2);
        assert_eq!(board[0].player_name, "Grace");
        assert_eq!(board[1].date, date(1));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"playerName\""));
        assert!(raw.contains("2023-11-14T22:13:21Z"));
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        std::fs::write(&path, "not json").unwrap();
        let service = LeaderboardService::new(JsonFileStore::new(&path));
        assert!(service.get_leaderboard().is_empty());
    }

    #[test]
    fn test_save_keeps_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let mut service = LeaderboardService::new(JsonFileStore::new(&path));
        for i in 0..9u64 {
            service.save_score_at(&format!("p{}", i), i * 10 + 10, date(i as i64)).unwrap();
        }

        // Break one entry's date so the whole file fails to parse
        let raw = std::fs::read_to_string(&path).unwrap();
        let broken = raw.replacen("2023-11-14T22:13:20Z", "yesterday", 1);
        assert_ne!(raw, broken);
        std::fs::write(&path, &broken).unwrap();

        assert!(matches!(
            service.save_score("Newbie", 1),
            Err(LeaderboardError::Json(_))
        ));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), broken);
    }

    #[test]
    fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaderboard.json");
        let mut service = LeaderboardService::new(JsonFileStore::new(&path));
        service.save_score_at("Ada", 5, date(0)).unwrap();
        assert!(service.clear_leaderboard());
        assert!(service.get_leaderboard().is_empty());
        assert!(service.clear_leaderboard());
    }
}
