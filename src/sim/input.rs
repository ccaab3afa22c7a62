//! Player intents
//!
//! Event handlers only push intents; the frame update drains them. Nothing
//! is dropped: if several intents of the same kind arrive in one frame, the
//! extras wait for the following frames.

use std::collections::VecDeque;

use crate::Direction;

/// A single discrete player action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Move(Direction),
    Eat,
    TogglePause,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub direction: Option<Direction>,
    pub eat: bool,
    pub toggle_pause: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        self.direction.is_none() && !self.eat && !self.toggle_pause
    }
}

/// FIFO buffer between input events and frames
#[derive(Debug, Clone, Default)]
pub struct InputQueue {
    pending: VecDeque<Intent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, intent: Intent) {
        self.pending.push_back(intent);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Take at most one intent of each kind, in arrival order. Stops at the
    /// first repeat so later intents never jump ahead of earlier ones.
    pub fn next_frame(&mut self) -> TickInput {
        let mut input = TickInput::default();
        while let Some(intent) = self.pending.front().copied() {
            let taken = match intent {
                Intent::Move(dir) if input.direction.is_none() => {
                    input.direction = Some(dir);
                    true
                }
                Intent::Eat if !input.eat => {
                    input.eat = true;
                    true
                }
                Intent::TogglePause if !input.toggle_pause => {
                    input.toggle_pause = true;
                    true
                }
                _ => false,
            };
            if !taken {
                break;
            }
            self.pending.pop_front();
        }
        input
    }
}
