//! Word Muncher - a grid arcade game about eating the right answers
//!
//! Core modules:
//! - `sim`: Deterministic round engine (board, categories, enemies, timers)
//! - `game`: Session wrapper (menu, start, restart)
//! - `settings`: Data-driven configuration
//! - `highscores`: Persistent leaderboard

pub mod error;
pub mod game;
pub mod highscores;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, Result};
pub use game::Game;
pub use highscores::HighScores;
pub use settings::{GameMode, Settings};

use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Default board dimensions (cells)
    pub const DEFAULT_GRID_WIDTH: u32 = 6;
    pub const DEFAULT_GRID_HEIGHT: u32 = 5;
    /// Smallest playable board edge
    pub const MIN_GRID_EDGE: u32 = 2;

    /// Lives at the start of a run
    pub const STARTING_LIVES: u8 = 3;

    /// Player slide between cells (ms)
    pub const PLAYER_MOVE_MS: f64 = 120.0;
    /// Enemy slide between cells (ms)
    pub const ENEMY_MOVE_MS: f64 = 350.0;
    /// Enemy step cadence (ms)
    pub const ENEMY_STEP_INTERVAL_MS: f64 = 3000.0;
    /// Per-index offset so enemies don't all step on the same frame
    pub const ENEMY_STAGGER_MS: f64 = 250.0;

    /// Delay between the clearing eat and the board reset
    pub const LEVEL_ADVANCE_DELAY_MS: f64 = 500.0;
    /// Delay between being caught and respawning
    pub const CAPTURE_RECOVERY_MS: f64 = 900.0;
    /// Grace period after respawning / starting a level
    pub const INVULNERABLE_MS: f64 = 1500.0;
    /// How long the new category name stays on screen
    pub const CATEGORY_BANNER_MS: f64 = 1800.0;

    /// Chance a chaser ignores the player and wanders
    pub const CHASER_CHAOS_CHANCE: f64 = 0.35;
    /// Spawn placement attempts before accepting any cell
    pub const SPAWN_RETRY_LIMIT: u32 = 50;
    /// Enemy population bounds
    pub const MIN_ENEMIES: u32 = 2;
    pub const MAX_ENEMIES: u32 = 6;

    /// Re-seed curve: p = clamp(BASE - SLOPE * ratio, MIN, MAX)
    pub const RESEED_BASE: f64 = 0.7;
    pub const RESEED_SLOPE: f64 = 0.6;
    pub const RESEED_MIN: f64 = 0.12;
    pub const RESEED_MAX: f64 = 0.88;
    /// Floor applied when the category is nearly exhausted
    pub const RESEED_SCARCE_FLOOR: f64 = 0.80;
    pub const RESEED_SCARCE_THRESHOLD: u32 = 2;

    /// Share of a fresh board that should be correct answers
    pub const CORRECT_SHARE: f64 = 0.4;

    /// Recent answers kept for the HUD (newest first)
    pub const RECENT_ANSWERS_CAP: usize = 10;

    /// Scoring
    pub const POINTS_PER_CORRECT: u64 = 10;
    pub const LEVEL_CLEAR_BONUS: u64 = 50;

    /// Word tags with fewer entries than this are not offered as categories
    pub const MIN_TAG_ENTRIES: usize = 4;
}

/// One of the four grid directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Direction {
    Up,
    #[default]
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset, with y growing downward
    #[inline]
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// A grid coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Neighbor in `dir`, or None when it would leave a `width`×`height` board
    pub fn step(self, dir: Direction, width: u32, height: u32) -> Option<Cell> {
        let (dx, dy) = dir.delta();
        let x = self.x as i64 + dx as i64;
        let y = self.y as i64 + dy as i64;
        if x < 0 || y < 0 || x >= width as i64 || y >= height as i64 {
            return None;
        }
        Some(Cell::new(x as u32, y as u32))
    }

    /// Cell center in continuous board space
    #[inline]
    pub fn to_vec2(self) -> glam::Vec2 {
        glam::Vec2::new(self.x as f32, self.y as f32)
    }

    /// Nearest cell to a continuous position, clamped to the board
    pub fn from_vec2_rounded(pos: glam::Vec2, width: u32, height: u32) -> Cell {
        let x = pos.x.round().clamp(0.0, width.saturating_sub(1) as f32) as u32;
        let y = pos.y.round().clamp(0.0, height.saturating_sub(1) as f32) as u32;
        Cell::new(x, y)
    }
}

/// Manhattan distance between two cells
#[inline]
pub fn manhattan(a: Cell, b: Cell) -> u32 {
    a.x.abs_diff(b.x) + a.y.abs_diff(b.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_stays_in_bounds() {
        let corner = Cell::new(0, 0);
        assert_eq!(corner.step(Direction::Up, 5, 5), None);
        assert_eq!(corner.step(Direction::Left, 5, 5), None);
        assert_eq!(corner.step(Direction::Right, 5, 5), Some(Cell::new(1, 0)));
        assert_eq!(corner.step(Direction::Down, 5, 5), Some(Cell::new(0, 1)));

        let far = Cell::new(4, 4);
        assert_eq!(far.step(Direction::Right, 5, 5), None);
        assert_eq!(far.step(Direction::Down, 5, 5), None);
    }

    #[test]
    fn test_manhattan() {
        assert_eq!(manhattan(Cell::new(0, 0), Cell::new(4, 4)), 8);
        assert_eq!(manhattan(Cell::new(3, 1), Cell::new(1, 2)), 3);
        assert_eq!(manhattan(Cell::new(2, 2), Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_rounding_clamps() {
        let cell = Cell::from_vec2_rounded(glam::Vec2::new(4.6, -0.4), 5, 5);
        assert_eq!(cell, Cell::new(4, 0));
        let cell = Cell::from_vec2_rounded(glam::Vec2::new(1.49, 2.51), 5, 5);
        assert_eq!(cell, Cell::new(1, 3));
    }
}
