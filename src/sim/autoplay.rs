//! Demo autopilot
//!
//! Plays the game from the outside, producing the same intents a keyboard
//! would. Greedy: walk to the nearest correct tile, eat it, keep a cell
//! between itself and the enemies when it can.

use super::input::TickInput;
use super::state::{GamePhase, RoundState};
use crate::{Cell, Direction, manhattan};

/// Decide this frame's input
pub fn autopilot(state: &RoundState) -> TickInput {
    let mut input = TickInput::default();
    if state.phase != GamePhase::Playing || state.player.is_moving() {
        return input;
    }

    let here = state.player.cell;
    if state
        .board
        .tile(here)
        .is_some_and(|t| t.correct && !t.eaten)
    {
        input.eat = true;
        return input;
    }

    // Nearest edible tile
    let Some(target) = state
        .board
        .tiles()
        .iter()
        .filter(|t| t.correct && !t.eaten)
        .min_by_key(|t| manhattan(here, t.cell))
        .map(|t| t.cell)
    else {
        return input;
    };

    let (width, height) = (state.board.width, state.board.height);
    let danger = |cell: Cell| {
        state
            .enemies
            .iter()
            .any(|e| manhattan(e.cell, cell) <= 1)
    };
    input.direction = Direction::ALL
        .into_iter()
        .filter_map(|dir| here.step(dir, width, height).map(|to| (dir, to)))
        .filter(|(_, to)| manhattan(*to, target) < manhattan(here, target))
        .min_by_key(|(_, to)| danger(*to))
        .map(|(dir, _)| dir);
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::category::CategoryCatalog;
    use crate::sim::tick::tick;
    use std::rc::Rc;

    #[test]
    fn test_autopilot_eats_when_on_target() {
        let catalog = Rc::new(CategoryCatalog::builtin().unwrap());
        let mut state = RoundState::new(Settings::default(), catalog, 4).unwrap();
        let cell = state
            .board
            .tiles()
            .iter()
            .find(|t| t.correct)
            .map(|t| t.cell)
            .unwrap();
        state.player.teleport(cell);
        let input = autopilot(&state);
        assert!(input.eat);
        assert_eq!(input.direction, None);
    }

    #[test]
    fn test_autopilot_makes_progress() {
        let catalog = Rc::new(CategoryCatalog::builtin().unwrap());
        let mut state = RoundState::new(Settings::default(), catalog, 8).unwrap();
        state.enemies.clear();
        let mut wall = 0.0;
        for _ in 0..2000 {
            let input = autopilot(&state);
            tick(&mut state, &input, wall);
            wall += 16.0;
            if state.level > 1 {
                break;
            }
        }
        assert!(state.level > 1, "stuck at {}/{}", state.progress, state.required);
    }
}
