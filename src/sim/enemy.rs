//! Enemies: who they are, where they spawn, and how they pick a step
//!
//! Enemy kinds are a closed enum. Each kind maps to a behavior object in the
//! directory, which is the only place the per-kind policy lives.

use glam::Vec2;
use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};

use super::board::Board;
use super::timing::MoveTween;
use crate::consts::{CHASER_CHAOS_CHANCE, SPAWN_RETRY_LIMIT};
use crate::error::{ConfigError, Result};
use crate::{Cell, Direction, manhattan};

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Heads for the player, with some wobble
    Chaser,
    /// Wanders, drawn to eaten tiles it can refill
    Forager,
}

impl EnemyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnemyKind::Chaser => "chaser",
            EnemyKind::Forager => "forager",
        }
    }

    pub fn behavior(&self) -> &'static dyn EnemyBehavior {
        match self {
            EnemyKind::Chaser => &Chaser,
            EnemyKind::Forager => &Forager,
        }
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    /// Authoritative cell
    pub cell: Cell,
    /// Continuous position for rendering and capture checks
    pub pos: Vec2,
    pub facing: Direction,
    /// Game time of the next step
    pub next_step_at: f64,
    /// RGB color for the renderer
    pub color: u32,
    #[serde(skip)]
    pub tween: Option<MoveTween>,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, cell: Cell, color: u32) -> Self {
        Self {
            id,
            kind,
            cell,
            pos: cell.to_vec2(),
            facing: Direction::Down,
            next_step_at: 0.0,
            color,
            tween: None,
        }
    }

    /// Snap to a cell, dropping any slide in progress
    pub fn teleport(&mut self, cell: Cell) {
        self.cell = cell;
        self.pos = cell.to_vec2();
        self.tween = None;
    }

    /// Begin sliding one cell in `dir`; the logical cell updates immediately
    pub fn start_step(&mut self, dir: Direction, to: Cell, now: f64, duration_ms: f64) {
        self.tween = Some(MoveTween::new(self.pos, to.to_vec2(), now, duration_ms));
        self.cell = to;
        self.facing = dir;
    }

    /// Advance the slide, clearing it on arrival
    pub fn update_pos(&mut self, now: f64) {
        if let Some(tween) = self.tween {
            self.pos = tween.position(now);
            if tween.is_done(now) {
                self.pos = self.cell.to_vec2();
                self.tween = None;
            }
        }
    }

    /// Cell the enemy visually occupies
    pub fn rounded_cell(&self, width: u32, height: u32) -> Cell {
        Cell::from_vec2_rounded(self.pos, width, height)
    }
}

/// What spawn placement needs to know
pub struct SpawnContext<'a> {
    pub width: u32,
    pub height: u32,
    pub player_start: Cell,
    /// Cells already taken by other enemies
    pub occupied: &'a [Cell],
}

/// What a behavior sees when choosing a step
pub struct StepContext<'a> {
    pub player: Cell,
    pub board: &'a Board,
}

/// Capability set of an enemy kind
pub trait EnemyBehavior: Sync {
    fn kind(&self) -> EnemyKind;

    /// Body color for this kind
    fn color(&self) -> u32;

    /// Create an enemy at a placement-checked cell
    fn spawn(&self, id: u32, ctx: &SpawnContext<'_>, rng: &mut dyn rand::RngCore) -> Enemy {
        let cell = find_spawn_cell(ctx, rng);
        Enemy::new(id, self.kind(), cell, self.color())
    }

    /// Pick a direction among `legal` (never empty)
    fn choose_direction(
        &self,
        enemy: &Enemy,
        legal: &[Direction],
        ctx: &StepContext<'_>,
        rng: &mut dyn rand::RngCore,
    ) -> Direction;

    /// Whether landing on `cell` should refill an eaten tile there
    fn reseeds_on_arrive(&self, board: &Board, cell: Cell) -> bool {
        board.tile(cell).is_some_and(|t| t.eaten)
    }
}

/// Goes for the player
pub struct Chaser;

impl EnemyBehavior for Chaser {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Chaser
    }

    fn color(&self) -> u32 {
        0xE0_45_3A
    }

    fn choose_direction(
        &self,
        enemy: &Enemy,
        legal: &[Direction],
        ctx: &StepContext<'_>,
        mut rng: &mut dyn rand::RngCore,
    ) -> Direction {
        if rng.random_bool(CHASER_CHAOS_CHANCE) {
            if let Some(dir) = legal.choose(&mut rng) {
                return *dir;
            }
        }
        // Shuffle first so ties don't always resolve the same way
        let mut order = legal.to_vec();
        order.shuffle(&mut rng);
        order
            .into_iter()
            .min_by_key(|dir| {
                enemy
                    .cell
                    .step(*dir, ctx.board.width, ctx.board.height)
                    .map(|to| manhattan(to, ctx.player))
                    .unwrap_or(u32::MAX)
            })
            .unwrap_or(legal[0])
    }
}

/// Wanders, steering onto eaten tiles when one is next door
pub struct Forager;

impl EnemyBehavior for Forager {
    fn kind(&self) -> EnemyKind {
        EnemyKind::Forager
    }

    fn color(&self) -> u32 {
        0x4C_B8_5A
    }

    fn choose_direction(
        &self,
        enemy: &Enemy,
        legal: &[Direction],
        ctx: &StepContext<'_>,
        mut rng: &mut dyn rand::RngCore,
    ) -> Direction {
        let hungry: Vec<Direction> = legal
            .iter()
            .copied()
            .filter(|dir| {
                enemy
                    .cell
                    .step(*dir, ctx.board.width, ctx.board.height)
                    .and_then(|to| ctx.board.tile(to))
                    .is_some_and(|t| t.eaten)
            })
            .collect();
        let pool = if hungry.is_empty() { legal } else { &hungry[..] };
        pool.choose(&mut rng).copied().unwrap_or(legal[0])
    }
}

/// Directions from `cell` that stay on a `width`×`height` board
pub fn legal_directions(cell: Cell, width: u32, height: u32) -> Vec<Direction> {
    Direction::ALL
        .into_iter()
        .filter(|dir| cell.step(*dir, width, height).is_some())
        .collect()
}

/// Minimum spawn distance from the player start
pub fn min_spawn_distance(width: u32, height: u32) -> u32 {
    (width + height) / 4
}

/// Random cell far enough from the player start and not taken. After
/// `SPAWN_RETRY_LIMIT` misses the last candidate is accepted as is.
pub fn find_spawn_cell(ctx: &SpawnContext<'_>, rng: &mut dyn rand::RngCore) -> Cell {
    let min_dist = min_spawn_distance(ctx.width, ctx.height);
    let mut candidate = ctx.player_start;
    for _ in 0..SPAWN_RETRY_LIMIT {
        candidate = Cell::new(
            rng.random_range(0..ctx.width),
            rng.random_range(0..ctx.height),
        );
        if manhattan(candidate, ctx.player_start) >= min_dist && !ctx.occupied.contains(&candidate)
        {
            return candidate;
        }
    }
    log::warn!(
        "No spawn cell {} away from {:?} after {} tries, using {:?}",
        min_dist,
        ctx.player_start,
        SPAWN_RETRY_LIMIT,
        candidate
    );
    candidate
}

/// Enemy population for a level: tiered base plus a late-game bonus
pub fn enemy_count_for_level(level: u32) -> u32 {
    use crate::consts::{MAX_ENEMIES, MIN_ENEMIES};

    let base = match level {
        0..=3 => 2,
        4..=6 => 3,
        _ => 4,
    };
    let bonus = if level > 6 { 1 } else { 0 };
    (base + bonus).clamp(MIN_ENEMIES, MAX_ENEMIES)
}

/// Enemy kinds enabled for a run, in spawn rotation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDirectory {
    kinds: Vec<EnemyKind>,
}

impl EnemyDirectory {
    pub fn new(kinds: &[EnemyKind]) -> Result<Self> {
        let mut unique: Vec<EnemyKind> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            if !unique.contains(kind) {
                unique.push(*kind);
            }
        }
        if unique.is_empty() {
            return Err(ConfigError::NoEnemyKinds);
        }
        Ok(Self { kinds: unique })
    }

    pub fn kinds(&self) -> &[EnemyKind] {
        &self.kinds
    }

    pub fn lookup(&self, kind: EnemyKind) -> Option<&'static dyn EnemyBehavior> {
        self.kinds.contains(&kind).then(|| kind.behavior())
    }

    /// Kind for the `index`-th enemy of a level
    pub fn kind_for_index(&self, index: usize) -> EnemyKind {
        self.kinds[index % self.kinds.len()]
    }

    /// Spawn `count` enemies, each placed away from the player start and
    /// from the enemies spawned before it
    pub fn spawn_population(
        &self,
        count: u32,
        first_id: u32,
        width: u32,
        height: u32,
        player_start: Cell,
        rng: &mut dyn rand::RngCore,
    ) -> Vec<Enemy> {
        let mut enemies: Vec<Enemy> = Vec::with_capacity(count as usize);
        for i in 0..count as usize {
            let occupied: Vec<Cell> = enemies.iter().map(|e| e.cell).collect();
            let ctx = SpawnContext {
                width,
                height,
                player_start,
                occupied: &occupied,
            };
            let behavior = self.kind_for_index(i).behavior();
            enemies.push(behavior.spawn(first_id + i as u32, &ctx, rng));
        }
        enemies
    }
}
