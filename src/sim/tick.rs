//! Per-frame update
//!
//! One call per animation frame. The wall-clock reading is turned into game
//! time first, then deferred transitions, input and enemies are processed in
//! a fixed order.

use super::input::TickInput;
use super::state::{GamePhase, RoundState};

/// What happened during a frame (for audio/UI hooks)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameEvents {
    pub moved: bool,
    pub ate: Option<bool>,
    pub level_advanced: bool,
    pub captured: bool,
    pub recovered: bool,
}

/// Advance the round by one frame at wall-clock time `wall_ms`
pub fn tick(state: &mut RoundState, input: &TickInput, wall_ms: f64) -> FrameEvents {
    let mut events = FrameEvents::default();
    let now = state.clock.advance(wall_ms);

    if input.toggle_pause {
        state.toggle_pause();
    }

    // Don't tick if paused or game over
    match state.phase {
        GamePhase::Paused | GamePhase::GameOver => return events,
        _ => {}
    }

    state.update_positions(now);
    state.update_banner(now);

    if state.phase == GamePhase::Captured {
        events.recovered = state.update_recovery(now);
        if !events.recovered {
            return events;
        }
    }

    events.level_advanced = state.update_pending_advance(now);

    if let Some(dir) = input.direction {
        events.moved = state.try_move(dir, now);
    }
    if input.eat {
        events.ate = state.eat(now).map(|answer| answer.correct);
    }

    state.tick_enemies(now);
    // Enemies that just started a slide are still on their old cell visually
    state.update_positions(now);
    events.captured = state.check_capture(now);

    events
}
