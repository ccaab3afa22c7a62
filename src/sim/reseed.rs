//! Refilling tiles that enemies walk onto after they've been eaten
//!
//! The odds of a fresh correct answer go up as correct answers get scarce,
//! so a board can't run dry before the level is cleared.

use rand::Rng;

use super::board::Board;
use super::category::Category;
use crate::Cell;
use crate::consts::{
    RESEED_BASE, RESEED_MAX, RESEED_MIN, RESEED_SCARCE_FLOOR, RESEED_SCARCE_THRESHOLD,
    RESEED_SLOPE,
};

/// Outcome of a refill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reseeded {
    pub cell: Cell,
    pub correct: bool,
    /// Probability used for the draw
    pub p_correct: f64,
}

/// Chance the next refilled tile is correct
pub fn correct_probability(remaining_correct: u32, remaining_unconsumed: u32) -> f64 {
    let ratio = if remaining_unconsumed == 0 {
        0.0
    } else {
        remaining_correct as f64 / remaining_unconsumed as f64
    };
    let p = (RESEED_BASE - RESEED_SLOPE * ratio).clamp(RESEED_MIN, RESEED_MAX);
    if remaining_correct <= RESEED_SCARCE_THRESHOLD {
        p.max(RESEED_SCARCE_FLOOR)
    } else {
        p
    }
}

/// Refill the eaten tile at `cell` with a fresh value from `category`.
///
/// Does nothing (returns None) when the tile is missing or not eaten.
pub fn reseed_tile<R: Rng>(
    board: &mut Board,
    cell: Cell,
    category: &Category,
    rng: &mut R,
) -> Option<Reseeded> {
    if !board.tile(cell).is_some_and(|t| t.eaten) {
        return None;
    }
    let p_correct = correct_probability(board.remaining_correct(), board.remaining_unconsumed());
    let want_correct = rng.random_bool(p_correct);

    // Prefer a value that isn't already showing somewhere on the board
    let mut value = category.draw_value(want_correct, rng)?;
    for _ in 0..8 {
        let on_board = board
            .tiles()
            .iter()
            .any(|t| !t.eaten && t.value == value);
        if !on_board {
            break;
        }
        if let Some(next) = category.draw_value(want_correct, rng) {
            value = next;
        }
    }

    let tile = board.tile_mut(cell)?;
    tile.refill(value, category);
    Some(Reseeded {
        cell,
        correct: tile.correct,
        p_correct,
    })
}
