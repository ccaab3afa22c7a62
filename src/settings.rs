//! Game settings and preferences
//!
//! Stored as a JSON file next to the binary; every field has a default so
//! partial files are fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, Result};
use crate::sim::EnemyKind;

/// Which categories a run draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Words and numbers, category picked at random each level
    #[default]
    Mixed,
    /// Word categories only, rotated level by level
    WordsOnly,
    /// Numeric categories only, rotated level by level
    MathOnly,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Mixed => "Mixed",
            GameMode::WordsOnly => "Words",
            GameMode::MathOnly => "Math",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "mixed" | "all" => Some(GameMode::Mixed),
            "words" | "words-only" => Some(GameMode::WordsOnly),
            "math" | "math-only" | "numbers" => Some(GameMode::MathOnly),
            _ => None,
        }
    }

    /// Rotation modes walk the category list in order instead of rolling
    pub fn rotates(&self) -> bool {
        !matches!(self, GameMode::Mixed)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Board ===
    pub grid_width: u32,
    pub grid_height: u32,
    pub mode: GameMode,
    /// Optional word->tags JSON file; the built-in list is used otherwise
    pub dataset_path: Option<PathBuf>,

    // === Rules ===
    pub starting_lives: u8,
    /// Wrong answers take a point of progress back (never below zero)
    pub penalize_wrong: bool,
    /// Enemy kinds allowed to spawn
    pub enemy_kinds: Vec<EnemyKind>,

    // === Timing (ms) ===
    pub player_move_ms: f64,
    pub enemy_move_ms: f64,
    pub enemy_step_interval_ms: f64,
    pub level_advance_delay_ms: f64,
    pub capture_recovery_ms: f64,
    /// Grace window after respawn and level start, 0 disables it
    pub invulnerable_ms: f64,
    pub category_banner_ms: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            grid_width: DEFAULT_GRID_WIDTH,
            grid_height: DEFAULT_GRID_HEIGHT,
            mode: GameMode::Mixed,
            dataset_path: None,

            starting_lives: STARTING_LIVES,
            penalize_wrong: false,
            enemy_kinds: vec![EnemyKind::Chaser, EnemyKind::Forager],

            player_move_ms: PLAYER_MOVE_MS,
            enemy_move_ms: ENEMY_MOVE_MS,
            enemy_step_interval_ms: ENEMY_STEP_INTERVAL_MS,
            level_advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            capture_recovery_ms: CAPTURE_RECOVERY_MS,
            invulnerable_ms: INVULNERABLE_MS,
            category_banner_ms: CATEGORY_BANNER_MS,
        }
    }
}

impl Settings {
    /// Create settings for a mode (everything else default)
    pub fn from_mode(mode: GameMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width as usize * self.grid_height as usize
    }

    /// Whether respawn/level-start grace windows are on
    pub fn invulnerability_enabled(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Reject settings the play loop can't run with
    pub fn validate(&self) -> Result<()> {
        if self.grid_width < MIN_GRID_EDGE || self.grid_height < MIN_GRID_EDGE {
            return Err(ConfigError::GridTooSmall {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.enemy_kinds.is_empty() {
            return Err(ConfigError::NoEnemyKinds);
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings: Settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Save settings to a JSON file
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_no_enemies_rejected() {
        let settings = Settings {
            enemy_kinds: Vec::new(),
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ConfigError::NoEnemyKinds)));
    }

    #[test]
    fn test_tiny_grid_rejected() {
        let settings = Settings {
            grid_width: 1,
            ..Settings::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::GridTooSmall { width: 1, .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{ "grid_width": 5, "mode": "MathOnly" }"#).unwrap();
        assert_eq!(settings.grid_width, 5);
        assert_eq!(settings.grid_height, DEFAULT_GRID_HEIGHT);
        assert_eq!(settings.mode, GameMode::MathOnly);
        assert_eq!(settings.enemy_kinds.len(), 2);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!(GameMode::from_str("WORDS"), Some(GameMode::WordsOnly));
        assert_eq!(GameMode::from_str("numbers"), Some(GameMode::MathOnly));
        assert_eq!(GameMode::from_str("chess"), None);
        assert!(GameMode::MathOnly.rotates());
        assert!(!GameMode::Mixed.rotates());
    }
}
