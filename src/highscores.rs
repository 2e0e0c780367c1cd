//! Score submission and leaderboard
//!
//! `ScoreSubmission` is the payload handed to a score service once a run is
//! over. `Leaderboard` is a local, file-backed board with the same ordering
//! and query rules.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::sim::GameState;
use crate::tuning::Difficulty;

/// Longest stored player name
pub const MAX_NAME_LEN: usize = 20;
/// Name used when nothing printable is left after sanitizing
pub const DEFAULT_NAME: &str = "Player";
/// Query limit bounds
pub const DEFAULT_QUERY_LIMIT: usize = 10;
pub const MAX_QUERY_LIMIT: usize = 100;

/// Trim, keep `[A-Za-z0-9 _.-]`, cap at 20 chars, fall back to "Player"
pub fn sanitize_name(raw: &str) -> String {
    let name: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.'))
        .take(MAX_NAME_LEN)
        .collect();
    if name.trim().is_empty() {
        DEFAULT_NAME.to_string()
    } else {
        name
    }
}

/// Final score of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: u64,
    pub difficulty: Difficulty,
}

impl ScoreSubmission {
    /// Sanitizes the name and floors the score
    pub fn new(name: &str, score: f64, difficulty: Difficulty) -> Self {
        Self {
            name: sanitize_name(name),
            score: score.max(0.0).floor() as u64,
            difficulty,
        }
    }

    /// Build the submission for a run that has reached GameOver
    pub fn from_finished_run(state: &GameState, name: &str) -> Result<Self> {
        if !state.is_game_over() {
            return Err(GameError::RunInProgress);
        }
        Ok(Self::new(name, state.score, state.difficulty))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Leaderboard request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardQuery {
    pub limit: usize,
    pub difficulty: Option<Difficulty>,
}

impl Default for LeaderboardQuery {
    fn default() -> Self {
        Self {
            limit: DEFAULT_QUERY_LIMIT,
            difficulty: None,
        }
    }
}

impl LeaderboardQuery {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty: Some(difficulty),
            ..Default::default()
        }
    }

    /// Limit clamped to `1..=MAX_QUERY_LIMIT`
    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_QUERY_LIMIT)
    }
}

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
    pub difficulty: Difficulty,
}

impl From<ScoreSubmission> for LeaderboardEntry {
    fn from(s: ScoreSubmission) -> Self {
        Self {
            name: s.name,
            score: s.score,
            difficulty: s.difficulty,
        }
    }
}

/// Entries are kept sorted by score descending; ties keep submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a score; returns its overall rank (1-indexed)
    pub fn insert(&mut self, submission: ScoreSubmission) -> usize {
        let entry = LeaderboardEntry::from(submission);
        // Insert after any equal scores so older entries rank first
        let pos = self
            .entries
            .iter()
            .position(|e| entry.score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        pos + 1
    }

    pub fn query(&self, query: &LeaderboardQuery) -> Vec<LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|e| query.difficulty.is_none_or(|d| e.difficulty == d))
            .take(query.effective_limit())
            .cloned()
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score, optionally for one difficulty
    pub fn top_score(&self, difficulty: Option<Difficulty>) -> Option<u64> {
        self.entries
            .iter()
            .find(|e| difficulty.is_none_or(|d| e.difficulty == d))
            .map(|e| e.score)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let mut board: Self = serde_json::from_str(json)?;
        // Files may have been edited by hand
        board.entries.sort_by(|a, b| b.score.cmp(&a.score));
        Ok(board)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let board = Self::from_json(&json)?;
        log::info!("Loaded {} leaderboard entries", board.entries.len());
        Ok(board)
    }

    /// Load, or start empty when the file is missing or unreadable
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No leaderboard at {}, starting fresh", path.display());
            return Self::new();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Failed to load leaderboard: {}", e);
            Self::new()
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Leaderboard saved ({} entries)", self.entries.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn submit(board: &mut Leaderboard, name: &str, score: f64, d: Difficulty) -> usize {
        board.insert(ScoreSubmission::new(name, score, d))
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ada  "), "Ada");
        assert_eq!(sanitize_name("<script>x</script>"), "scriptxscript");
        assert_eq!(sanitize_name("j.r-r_t 2"), "j.r-r_t 2");
        assert_eq!(sanitize_name("a".repeat(40).as_str()).len(), MAX_NAME_LEN);
        assert_eq!(sanitize_name(""), DEFAULT_NAME);
        assert_eq!(sanitize_name("!!!"), DEFAULT_NAME);
    }

    #[test]
    fn test_submission_floors_score() {
        let s = ScoreSubmission::new("Bo", 123.99, Difficulty::Hard);
        assert_eq!(s.score, 123);
        assert_eq!(
            s.to_json().unwrap(),
            r#"{"name":"Bo","score":123,"difficulty":"hard"}"#
        );
    }

    #[test]
    fn test_submission_requires_game_over() {
        let mut state = GameState::new(1, Difficulty::Easy);
        state.score = 40.5;
        assert!(matches!(
            ScoreSubmission::from_finished_run(&state, "x"),
            Err(GameError::RunInProgress)
        ));
        state.phase = GamePhase::GameOver;
        let s = ScoreSubmission::from_finished_run(&state, "").unwrap();
        assert_eq!(s.name, DEFAULT_NAME);
        assert_eq!(s.score, 40);
        assert_eq!(s.difficulty, Difficulty::Easy);
    }

    #[test]
    fn test_ordering_and_ties() {
        let mut board = Leaderboard::new();
        assert_eq!(submit(&mut board, "first", 50.0, Difficulty::Normal), 1);
        assert_eq!(submit(&mut board, "top", 90.0, Difficulty::Normal), 1);
        assert_eq!(submit(&mut board, "second", 50.0, Difficulty::Normal), 3);
        let names: Vec<_> = board.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_query_filter_and_limit() {
        let mut board = Leaderboard::new();
        for i in 0..150u32 {
            let d = if i.is_multiple_of(2) {
                Difficulty::Hard
            } else {
                Difficulty::Easy
            };
            submit(&mut board, "p", i as f64, d);
        }
        assert_eq!(board.query(&LeaderboardQuery::default()).len(), 10);
        let all = LeaderboardQuery {
            limit: 10_000,
            difficulty: None,
        };
        assert_eq!(board.query(&all).len(), MAX_QUERY_LIMIT);
        let none = LeaderboardQuery {
            limit: 0,
            difficulty: None,
        };
        assert_eq!(board.query(&none).len(), 1);

        let hard = board.query(&LeaderboardQuery::for_difficulty(Difficulty::Hard));
        assert!(hard.iter().all(|e| e.difficulty == Difficulty::Hard));
        assert_eq!(hard[0].score, 148);
        assert_eq!(board.top_score(Some(Difficulty::Easy)), Some(149));
    }

    #[test]
    fn test_save_and_load() {
        let path = std::env::temp_dir().join(format!("flappy-board-{}.json", std::process::id()));
        let mut board = Leaderboard::new();
        submit(&mut board, "Ada", 77.0, Difficulty::Normal);
        submit(&mut board, "Bo", 12.0, Difficulty::Easy);
        board.save(&path).unwrap();

        let loaded = Leaderboard::load(&path).unwrap();
        assert_eq!(loaded, board);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("flappy-board-does-not-exist.json");
        assert!(matches!(Leaderboard::load(&path), Err(GameError::Io { .. })));
        assert!(Leaderboard::load_or_default(&path).is_empty());
    }

    #[test]
    fn test_from_json_restores_order() {
        let json = r#"{"entries":[
            {"name":"a","score":1,"difficulty":"easy"},
            {"name":"b","score":9,"difficulty":"hard"}
        ]}"#;
        let board = Leaderboard::from_json(json).unwrap();
        assert_eq!(board.entries[0].name, "b");
    }
}
