//! Board of labeled tiles and the generator that fills it
//!
//! One tile per cell, stored row-major. Tiles are only mutated by eating and
//! re-seeding.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::category::{Category, CategoryContent, TileValue};
use crate::Cell;
use crate::consts::CORRECT_SHARE;

/// One grid cell's content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub cell: Cell,
    /// Display text
    pub label: String,
    pub value: TileValue,
    /// Whether `value` satisfies the current category
    pub correct: bool,
    pub eaten: bool,
}

impl Tile {
    pub fn new(cell: Cell, value: TileValue, category: &Category) -> Self {
        Self {
            cell,
            label: category.label_for(&value),
            correct: category.is_correct(&value),
            value,
            eaten: false,
        }
    }

    /// Replace the content, recomputing label and correctness
    pub fn refill(&mut self, value: TileValue, category: &Category) {
        self.label = category.label_for(&value);
        self.correct = category.is_correct(&value);
        self.value = value;
        self.eaten = false;
    }
}

/// Grid of tiles covering every cell exactly once
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    pub width: u32,
    pub height: u32,
    /// Row-major
    tiles: Vec<Tile>,
}

impl Board {
    /// Build a board from tiles in row-major order
    pub fn from_tiles(width: u32, height: u32, tiles: Vec<Tile>) -> Self {
        debug_assert_eq!(tiles.len(), width as usize * height as usize);
        Self {
            width,
            height,
            tiles,
        }
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        if cell.x >= self.width || cell.y >= self.height {
            return None;
        }
        Some(cell.y as usize * self.width as usize + cell.x as usize)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        self.index(cell).is_some()
    }

    pub fn tile(&self, cell: Cell) -> Option<&Tile> {
        self.index(cell).map(|i| &self.tiles[i])
    }

    pub fn tile_mut(&mut self, cell: Cell) -> Option<&mut Tile> {
        self.index(cell).map(|i| &mut self.tiles[i])
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Unconsumed tiles flagged correct
    pub fn remaining_correct(&self) -> u32 {
        self.tiles.iter().filter(|t| t.correct && !t.eaten).count() as u32
    }

    /// Tiles not yet eaten
    pub fn remaining_unconsumed(&self) -> u32 {
        self.tiles.iter().filter(|t| !t.eaten).count() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

/// Correct tiles at generation time; fixes the level's clear threshold
pub fn required_count(tiles: &[Tile]) -> u32 {
    tiles.iter().filter(|t| t.correct).count() as u32
}

/// Fill a `width`×`height` board for `category`
pub fn generate<R: Rng>(category: &Category, width: u32, height: u32, rng: &mut R) -> Board {
    let need = width as usize * height as usize;
    let values = match &category.content {
        CategoryContent::Words { .. } => {
            let mut correct = category.correct_values();
            let mut wrong = category.distractor_values();
            correct.shuffle(rng);
            wrong.shuffle(rng);
            draw_values(correct, wrong, need, rng)
        }
        CategoryContent::Numeric { min, max, .. } => draw_numeric(category, *min, *max, need, rng),
    };

    let tiles = values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            let cell = Cell::new(i as u32 % width, i as u32 / width);
            Tile::new(cell, value, category)
        })
        .collect::<Vec<_>>();

    let board = Board::from_tiles(width, height, tiles);
    log::debug!(
        "Generated {}x{} board for {:?}: {} correct",
        width,
        height,
        category.name,
        board.remaining_correct()
    );
    board
}

/// How many correct tiles a board of `need` cells aims for
pub fn correct_target(need: usize) -> usize {
    ((need as f64 * CORRECT_SHARE).round() as usize).clamp(1, need.max(1))
}

/// Take up to the target from the correct pool and pad with distractors
/// (or with more correct items when distractors run short). Pools that are
/// both exhausted are recycled; the result always has `need` entries, shuffled.
fn draw_values<R: Rng>(
    correct: Vec<TileValue>,
    wrong: Vec<TileValue>,
    need: usize,
    rng: &mut R,
) -> Vec<TileValue> {
    let target = correct_target(need).min(correct.len());
    let mut out = Vec::with_capacity(need);
    out.extend(correct.iter().take(target).cloned());
    out.extend(wrong.iter().take(need - out.len()).cloned());
    if out.len() < need {
        out.extend(correct.iter().skip(target).take(need - out.len()).cloned());
    }
    if out.len() < need {
        log::warn!(
            "Category pools too small ({} + {}) for {} cells, repeating values",
            correct.len(),
            wrong.len(),
            need
        );
        let all: Vec<TileValue> = correct.iter().chain(wrong.iter()).cloned().collect();
        if !all.is_empty() {
            let mut i = 0;
            while out.len() < need {
                out.push(all[i % all.len()].clone());
                i += 1;
            }
        }
    }
    out.shuffle(rng);
    out
}

/// Draw integers from the range without replacement, sorting each into the
/// correct or distractor bucket until both targets are met. If the range
/// runs dry first, whatever is left is used regardless of correctness.
fn draw_numeric<R: Rng>(
    category: &Category,
    min: i64,
    max: i64,
    need: usize,
    rng: &mut R,
) -> Vec<TileValue> {
    let mut candidates: Vec<i64> = (min..=max).collect();
    candidates.shuffle(rng);

    let target_correct = correct_target(need);
    let target_wrong = need - target_correct;
    let mut correct = Vec::with_capacity(target_correct);
    let mut wrong = Vec::with_capacity(target_wrong);
    let mut leftover = Vec::new();

    for n in candidates {
        let value = TileValue::Number(n);
        if category.is_correct(&value) {
            if correct.len() < target_correct {
                correct.push(value);
            } else {
                leftover.push(value);
            }
        } else if wrong.len() < target_wrong {
            wrong.push(value);
        } else {
            leftover.push(value);
        }
        if correct.len() == target_correct && wrong.len() == target_wrong {
            break;
        }
    }

    let mut out = correct;
    out.append(&mut wrong);
    if out.len() < need {
        log::debug!(
            "{:?} short by {} values, padding from leftovers",
            category.name,
            need - out.len()
        );
        out.extend(leftover.into_iter().take(need - out.len()));
    }
    // Range smaller than the board: repeat what we have
    if out.len() < need && !out.is_empty() {
        let base = out.clone();
        let mut i = 0;
        while out.len() < need {
            out.push(base[i % base.len()].clone());
            i += 1;
        }
    }
    out.shuffle(rng);
    out
}
