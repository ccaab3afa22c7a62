//! Deterministic round engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in as a number, never read from a clock
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod board;
pub mod category;
pub mod enemy;
pub mod input;
pub mod reseed;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timing;

pub use autoplay::autopilot;
pub use board::{Board, Tile, generate, required_count};
pub use category::{
    Category, CategoryCatalog, CategoryKind, LabelCase, NumericRule, TagSource, TileValue,
    WordDataset,
};
pub use enemy::{Enemy, EnemyBehavior, EnemyDirectory, EnemyKind};
pub use input::{InputQueue, Intent, TickInput};
pub use reseed::{correct_probability, reseed_tile};
pub use snapshot::{Overlay, RenderSnapshot};
pub use state::{GamePhase, Player, RecentAnswer, RoundState};
pub use tick::{FrameEvents, tick};
pub use timing::{Deadline, GameClock, MoveTween, Window};
