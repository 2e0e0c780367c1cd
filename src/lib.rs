//! Flappy Arcade - A side-scrolling obstacle-avoidance arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, pickups, collisions, levels)
//! - `tuning`: Data-driven game balance (difficulty table, per-level modifiers)
//! - `settings`: Run configuration
//! - `highscores`: Score submission payloads and the local leaderboard

pub mod error;
pub mod highscores;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{GameError, Result};
pub use highscores::{Leaderboard, LeaderboardQuery, ScoreSubmission};
pub use settings::Settings;
pub use tuning::Difficulty;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Longest tick delta the simulation will integrate (ms)
    pub const MAX_FRAME_MS: f64 = 50.0;
    /// Delta time scale while slow-motion is active
    pub const SLOW_MOTION_SCALE: f64 = 0.5;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 960.0;
    pub const PLAYFIELD_HEIGHT: f32 = 540.0;
    /// Smallest playfield every difficulty can spawn into
    pub const MIN_PLAYFIELD_WIDTH: f32 = 640.0;
    pub const MIN_PLAYFIELD_HEIGHT: f32 = 450.0;
    /// Ground line sits this far above the bottom edge
    pub const GROUND_MARGIN: f32 = 20.0;

    /// Bird x is a fraction of the playfield width, never closer than this
    pub const BIRD_MIN_X: f32 = 140.0;
    pub const BIRD_X_FRACTION: f32 = 0.22;
    /// Upward velocity applied on a hit (px/s)
    pub const HIT_KNOCKBACK: f32 = -180.0;

    /// Health model
    pub const MAX_HEALTH: u8 = 5;
    /// Post-hit grace period (ms)
    pub const INVULN_MS: f64 = 800.0;

    /// Combo cap for the pass multiplier
    pub const COMBO_MAX: u32 = 5;

    /// Pipe geometry
    pub const BASE_PIPE_WIDTH: f32 = 60.0;
    pub const MIN_PIPE_WIDTH: f32 = 40.0;
    /// Pipes enter this far past the right edge
    pub const PIPE_SPAWN_OFFSET: f32 = 20.0;
    /// Gap must stay below the ceiling margin and above the bottom margin
    pub const GAP_TOP_MARGIN: f32 = 60.0;
    pub const GAP_BOTTOM_MARGIN: f32 = 120.0;
    /// Uniform spawn interval jitter (±12%)
    pub const SPAWN_JITTER: f64 = 0.12;

    /// Maximum live particles
    pub const MAX_PARTICLES: usize = 256;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}

/// Two circles overlap when their centers are closer than the sum of radii
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}
