//! Read-only view of a round for the renderer
//!
//! Built once per frame. Owns its data so the sink can hold on to it (or
//! serialize it across to JS) without borrowing the engine.

use serde::Serialize;

use super::enemy::EnemyKind;
use super::state::{GamePhase, RecentAnswer, RoundState};
use crate::Direction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub x: u32,
    pub y: u32,
    pub label: String,
    pub eaten: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorView {
    pub id: u32,
    /// Interpolated position in cell units
    pub x: f32,
    pub y: f32,
    pub facing: Direction,
    /// None for the player
    pub kind: Option<EnemyKind>,
    pub color: u32,
}

/// Transient things drawn on top of the board
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Overlay {
    /// Player caught; `progress` runs 0..=1 over the recovery delay
    Capture { x: u32, y: u32, progress: f32 },
    /// New category name after a level starts
    CategoryBanner { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub grid_width: u32,
    pub grid_height: u32,
    pub category: String,
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    pub progress: u32,
    pub required: u32,
    pub tiles: Vec<TileView>,
    pub player: ActorView,
    pub enemies: Vec<ActorView>,
    pub recent_answers: Vec<RecentAnswer>,
    pub overlays: Vec<Overlay>,
    pub invulnerable: bool,
    pub frozen: bool,
}

/// Player color for the renderer
const PLAYER_COLOR: u32 = 0xF2_C9_4C;

impl RenderSnapshot {
    pub fn capture(state: &RoundState) -> Self {
        let now = state.clock.now();

        let tiles = state
            .board
            .tiles()
            .iter()
            .map(|t| TileView {
                x: t.cell.x,
                y: t.cell.y,
                label: t.label.clone(),
                eaten: t.eaten,
            })
            .collect();

        let player = ActorView {
            id: 0,
            x: state.player.pos.x,
            y: state.player.pos.y,
            facing: state.player.facing,
            kind: None,
            color: PLAYER_COLOR,
        };

        let enemies = state
            .enemies
            .iter()
            .map(|e| ActorView {
                id: e.id,
                x: e.pos.x,
                y: e.pos.y,
                facing: e.facing,
                kind: Some(e.kind),
                color: e.color,
            })
            .collect();

        let mut overlays = Vec::new();
        if let Some(capture) = &state.capture {
            let span = (capture.recovery.at - capture.started_at).max(1.0);
            let progress = ((now - capture.started_at) / span).clamp(0.0, 1.0) as f32;
            overlays.push(Overlay::Capture {
                x: capture.cell.x,
                y: capture.cell.y,
                progress,
            });
        }
        if let Some(banner) = &state.banner {
            overlays.push(Overlay::CategoryBanner {
                text: banner.text.clone(),
            });
        }

        Self {
            phase: state.phase,
            grid_width: state.board.width,
            grid_height: state.board.height,
            category: state.category.name.clone(),
            level: state.level,
            score: state.score,
            lives: state.lives,
            progress: state.progress,
            required: state.required,
            tiles,
            player,
            enemies,
            recent_answers: state.recent_answers.clone(),
            overlays,
            invulnerable: state.player.invulnerable.is_active(now),
            frozen: state.freeze.is_active(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;
    use crate::settings::Settings;
    use crate::sim::category::CategoryCatalog;
    use std::rc::Rc;

    fn state() -> RoundState {
        let catalog = Rc::new(CategoryCatalog::builtin().unwrap());
        RoundState::new(Settings::default(), catalog, 31).unwrap()
    }

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = state();
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.tiles.len(), state.settings.cell_count());
        assert_eq!(snap.enemies.len(), state.enemies.len());
        assert_eq!(snap.level, 1);
        assert_eq!(snap.required, state.required);
        assert_eq!(snap.category, state.category.name);
        assert_eq!((snap.player.x, snap.player.y), (0.0, 0.0));
        assert!(matches!(
            snap.overlays.as_slice(),
            [Overlay::CategoryBanner { .. }]
        ));
    }

    #[test]
    fn test_capture_overlay() {
        let mut state = state();
        state.player.invulnerable.close();
        state.enemies[0].teleport(Cell::ORIGIN);
        assert!(state.check_capture(0.0));
        let snap = RenderSnapshot::capture(&state);
        assert!(snap.overlays.iter().any(|o| matches!(
            o,
            Overlay::Capture { x: 0, y: 0, progress } if *progress == 0.0
        )));
    }

    #[test]
    fn test_snapshot_serializes() {
        let snap = RenderSnapshot::capture(&state());
        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"category\""));
        assert!(json.contains("\"tiles\""));
    }
}
