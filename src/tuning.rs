//! Game balance: difficulty table and per-level modifiers
//!
//! Everything here is a pure function of the difficulty and level index so a
//! run can be replayed exactly from its seed.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Difficulty tier, fixed for the whole run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Base physics and spawn parameters for this tier
    pub fn config(&self) -> DifficultyConfig {
        match self {
            Difficulty::Easy => DifficultyConfig {
                gravity: 1200.0,
                flap_impulse: -380.0,
                gap_height: 190.0,
                pipe_speed: 160.0,
                spawn_interval_ms: 1400.0,
                pipe_score: 5.0,
                oscillation: None,
            },
            Difficulty::Normal => DifficultyConfig {
                gravity: 1500.0,
                flap_impulse: -420.0,
                gap_height: 160.0,
                pipe_speed: 200.0,
                spawn_interval_ms: 1200.0,
                pipe_score: 8.0,
                oscillation: None,
            },
            Difficulty::Hard => DifficultyConfig {
                gravity: 1800.0,
                flap_impulse: -460.0,
                gap_height: 135.0,
                pipe_speed: 240.0,
                spawn_interval_ms: 1000.0,
                pipe_score: 12.0,
                oscillation: Some(Oscillation {
                    amplitude: 32.0,
                    speed: 1.2,
                }),
            },
        }
    }

    /// Health restored when a level is cleared
    pub fn restore_health(&self, health: u8, max: u8) -> u8 {
        match self {
            Difficulty::Hard => health.saturating_add(2).min(max),
            Difficulty::Easy | Difficulty::Normal => max,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" | "norm" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(GameError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Vertical gap oscillation (hard tier only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oscillation {
    /// Peak offset from the gap baseline (px)
    pub amplitude: f32,
    /// Angular speed (rad/s)
    pub speed: f32,
}

/// Immutable per-run difficulty parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Velocity set by a flap (px/s, negative = up)
    pub flap_impulse: f32,
    pub gap_height: f32,
    /// Leftward pipe speed (px/s)
    pub pipe_speed: f32,
    pub spawn_interval_ms: f64,
    /// Base award for a clean pass
    pub pipe_score: f64,
    pub oscillation: Option<Oscillation>,
}

/// Derived per-level physics and spawn parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelMods {
    pub pipe_speed: f32,
    pub gravity: f32,
    /// Multiplier applied to the base pipe width
    pub pipe_width_mul: f32,
    pub bird_radius: f32,
    pub spawn_interval_ms: f64,
}

/// Gravity never drops below this, whatever the level
pub const MIN_GRAVITY: f32 = 800.0;
/// Spawn interval floor (ms)
pub const MIN_SPAWN_INTERVAL_MS: f64 = 700.0;

/// Level speed multiplier, capped at +28%
pub fn speed_factor(level_index: u32) -> f32 {
    1.0 + (level_index as f32 * 0.03).min(0.28)
}

/// Even levels get lighter, odd levels heavier, ramping in over ten levels
pub fn gravity_factor(level_index: u32) -> f32 {
    let swing = if level_index.is_multiple_of(2) { -0.06 } else { 0.08 };
    1.0 + swing * (level_index as f32 / 10.0).min(1.0)
}

/// Pipe width multiplier, shrinking 2% per level down to 72%
pub fn width_factor(level_index: u32) -> f32 {
    (1.0 - level_index as f32 * 0.02).max(0.72)
}

/// Bird radius cycles 14 → 16 → 18, never below 12
pub fn bird_radius(level_index: u32) -> f32 {
    let step = (level_index % 3) as f32 - 1.0;
    (16.0 + step * 2.0).max(12.0)
}

/// Spawn spacing factor, shrinking toward 1/1.6 as levels climb
pub fn spacing_factor(level_index: u32) -> f64 {
    1.0 / (1.0 + (level_index as f64 * 0.08).min(0.6))
}

/// Compute the modifiers for a level of the given difficulty
pub fn level_mods(difficulty: Difficulty, level_index: u32) -> LevelMods {
    let base = difficulty.config();
    LevelMods {
        pipe_speed: base.pipe_speed * speed_factor(level_index),
        gravity: (base.gravity * gravity_factor(level_index)).max(MIN_GRAVITY),
        pipe_width_mul: width_factor(level_index),
        bird_radius: bird_radius(level_index),
        spawn_interval_ms: (base.spawn_interval_ms * spacing_factor(level_index))
            .max(MIN_SPAWN_INTERVAL_MS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_round_trip_names() {
        for d in Difficulty::ALL {
            assert_eq!(d.as_str().parse::<Difficulty>().unwrap(), d);
        }
        assert_eq!(" HARD ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "insane".parse::<Difficulty>(),
            Err(GameError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_only_hard_oscillates() {
        assert!(Difficulty::Easy.config().oscillation.is_none());
        assert!(Difficulty::Normal.config().oscillation.is_none());
        let osc = Difficulty::Hard.config().oscillation.unwrap();
        assert_eq!(osc.amplitude, 32.0);
    }

    #[test]
    fn test_level_zero_uses_base_values() {
        let mods = level_mods(Difficulty::Normal, 0);
        assert_eq!(mods.pipe_speed, 200.0);
        assert_eq!(mods.gravity, 1500.0);
        assert_eq!(mods.pipe_width_mul, 1.0);
        assert_eq!(mods.bird_radius, 14.0);
        assert_eq!(mods.spawn_interval_ms, 1200.0);
    }

    #[test]
    fn test_modifiers_approach_floors() {
        let mods = level_mods(Difficulty::Hard, 40);
        assert!((mods.pipe_speed - 240.0 * 1.28).abs() < 1e-3);
        assert_eq!(mods.pipe_width_mul, 0.72);
        assert_eq!(mods.spawn_interval_ms, MIN_SPAWN_INTERVAL_MS);
        let normal = level_mods(Difficulty::Normal, 40);
        assert!((normal.spawn_interval_ms - 1200.0 / 1.6).abs() < 1e-9);
    }

    #[test]
    fn test_spacing_factor_is_non_increasing() {
        let mut last = spacing_factor(0);
        for i in 1..30 {
            let next = spacing_factor(i);
            assert!(next <= last);
            last = next;
        }
    }

    #[test]
    fn test_bird_radius_cycle() {
        assert_eq!(bird_radius(0), 14.0);
        assert_eq!(bird_radius(1), 16.0);
        assert_eq!(bird_radius(2), 18.0);
        assert_eq!(bird_radius(3), 14.0);
    }

    #[test]
    fn test_health_policy() {
        assert_eq!(Difficulty::Hard.restore_health(2, 5), 4);
        assert_eq!(Difficulty::Hard.restore_health(4, 5), 5);
        assert_eq!(Difficulty::Normal.restore_health(1, 5), 5);
        assert_eq!(Difficulty::Easy.restore_health(3, 5), 5);
    }
}
