//! Run settings
//!
//! Persisted as JSON. Missing fields fall back to their defaults so older
//! files keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::highscores::{DEFAULT_NAME, sanitize_name};
use crate::sim::{GameState, Playfield};
use crate::tuning::Difficulty;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Fixed run seed; a fresh one is picked per run when absent
    pub seed: Option<u64>,
    pub player_name: String,
    pub playfield: Playfield,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            seed: None,
            player_name: DEFAULT_NAME.to_string(),
            playfield: Playfield::default(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.playfield.validate()
    }

    /// Player name as it will be submitted
    pub fn display_name(&self) -> String {
        sanitize_name(&self.player_name)
    }

    /// Start a run; `fallback_seed` is used when no seed is configured
    pub fn new_run(&self, fallback_seed: u64) -> Result<GameState> {
        self.validate()?;
        let seed = self.seed.unwrap_or(fallback_seed);
        log::info!(
            "New run: {} on {}x{}, seed {}",
            self.difficulty,
            self.playfield.width,
            self.playfield.height,
            seed
        );
        Ok(GameState::with_playfield(
            seed,
            self.difficulty,
            self.playfield,
        ))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, using defaults if the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("Using default settings: {}", e);
            Self::default()
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| GameError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"difficulty":"hard","seed":7}"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert_eq!(settings.seed, Some(7));
        assert_eq!(settings.player_name, DEFAULT_NAME);
        assert_eq!(settings.playfield, Playfield::default());
    }

    #[test]
    fn test_rejects_small_playfield() {
        let json = r#"{"playfield":{"width":320.0,"height":240.0}}"#;
        assert!(matches!(
            Settings::from_json(json),
            Err(GameError::InvalidPlayfield { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        assert!(matches!(
            Settings::from_json(r#"{"difficulty":"nightmare"}"#),
            Err(GameError::Json(_))
        ));
    }

    #[test]
    fn test_new_run_prefers_configured_seed() {
        let settings = Settings {
            seed: Some(11),
            difficulty: Difficulty::Easy,
            ..Default::default()
        };
        let state = settings.new_run(999).unwrap();
        assert_eq!(state.seed, 11);
        assert_eq!(state.difficulty, Difficulty::Easy);
        assert_eq!(Settings::default().new_run(999).unwrap().seed, 999);
    }

    #[test]
    fn test_display_name_sanitized() {
        let settings = Settings {
            player_name: "  <Zed>  ".to_string(),
            ..Default::default()
        };
        assert_eq!(settings.display_name(), "Zed");
    }

    #[test]
    fn test_save_and_load() {
        let file = format!("flappy-settings-{}.json", std::process::id());
        let path = std::env::temp_dir().join(file);
        let settings = Settings {
            difficulty: Difficulty::Hard,
            seed: Some(42),
            player_name: "Ada".to_string(),
            playfield: Playfield::new(800.0, 600.0).unwrap(),
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_or_default_on_missing_file() {
        let path = std::env::temp_dir().join("flappy-settings-missing.json");
        assert_eq!(Settings::load_or_default(&path), Settings::default());
    }
}
