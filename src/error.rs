//! Error types for configuration, persistence and score submission.
//!
//! Stepping the simulation never fails; only the edges around it do.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// Difficulty name not in {easy, normal, hard}.
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// Playfield too small to spawn obstacles into.
    #[error("Invalid playfield {width}x{height}")]
    InvalidPlayfield { width: f32, height: f32 },

    /// A score can only be submitted once the run is over.
    #[error("Run is still in progress")]
    RunInProgress,

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
