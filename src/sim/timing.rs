//! Timers for a frame-driven loop
//!
//! Nothing here sleeps. Every timer is a timestamp in game milliseconds that
//! gets compared against the current frame's clock reading. The game clock
//! stops while paused, so deadlines keep their remaining time across a pause.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pause-aware game clock driven by wall-clock readings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameClock {
    /// Game time elapsed (ms), excluding paused spans
    now_ms: f64,
    /// Last wall reading seen
    last_wall_ms: Option<f64>,
    paused: bool,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a wall-clock reading, returns current game time
    pub fn advance(&mut self, wall_ms: f64) -> f64 {
        if let Some(last) = self.last_wall_ms {
            // Backwards readings are ignored rather than rewinding the game
            let delta = (wall_ms - last).max(0.0);
            if !self.paused {
                self.now_ms += delta;
            }
        }
        self.last_wall_ms = Some(wall_ms);
        self.now_ms
    }

    pub fn now(&self) -> f64 {
        self.now_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }
}

/// A deferred action armed with a deadline. Fires at most once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Deadline {
    pub at: f64,
    fired: bool,
}

impl Deadline {
    pub fn after(now: f64, delay_ms: f64) -> Self {
        Self {
            at: now + delay_ms,
            fired: false,
        }
    }

    /// True exactly once, on the first poll at or past the deadline
    pub fn poll(&mut self, now: f64) -> bool {
        if self.fired || now < self.at {
            return false;
        }
        self.fired = true;
        true
    }

    pub fn is_pending(&self) -> bool {
        !self.fired
    }

    pub fn remaining(&self, now: f64) -> f64 {
        if self.fired {
            0.0
        } else {
            (self.at - now).max(0.0)
        }
    }
}

/// Open-until window (freeze, invulnerability)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Window {
    pub until: f64,
}

impl Window {
    /// Open (or extend) the window for `duration_ms` from `now`
    pub fn open(&mut self, now: f64, duration_ms: f64) {
        self.until = self.until.max(now + duration_ms);
    }

    pub fn close(&mut self) {
        self.until = 0.0;
    }

    #[inline]
    pub fn is_active(&self, now: f64) -> bool {
        now < self.until
    }
}

/// In-flight slide from one cell to the next
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoveTween {
    pub from: Vec2,
    pub to: Vec2,
    pub start: f64,
    pub duration: f64,
}

impl MoveTween {
    pub fn new(from: Vec2, to: Vec2, start: f64, duration: f64) -> Self {
        Self {
            from,
            to,
            start,
            duration,
        }
    }

    /// 0..=1 progress at `now`
    pub fn progress(&self, now: f64) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn position(&self, now: f64) -> Vec2 {
        self.from.lerp(self.to, self.progress(now))
    }

    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }
}

/// First step time for enemy `index`, offset so a pack doesn't move in lockstep
pub fn staggered_deadline(now: f64, interval_ms: f64, index: usize, stagger_ms: f64) -> f64 {
    now + interval_ms + index as f64 * stagger_ms
}
