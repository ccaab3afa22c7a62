//! Round state and the transitions that mutate it
//!
//! `RoundState` is the only mutator of gameplay state. Every transition takes
//! the current game time (`now`, ms) instead of reading a clock, and delayed
//! transitions are armed deadlines polled from `tick`.

use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{self, Board};
use super::category::{Category, CategoryCatalog};
use super::enemy::{Enemy, EnemyDirectory, StepContext, enemy_count_for_level, legal_directions};
use super::reseed::reseed_tile;
use super::timing::{Deadline, GameClock, MoveTween, Window, staggered_deadline};
use crate::consts::*;
use crate::error::Result;
use crate::settings::Settings;
use crate::{Cell, Direction};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Frozen by the player
    Paused,
    /// Caught by an enemy, waiting to respawn
    Captured,
    /// Out of lives
    GameOver,
}

/// The player token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Authoritative cell; leads the animation
    pub cell: Cell,
    /// Interpolated position
    pub pos: Vec2,
    pub facing: Direction,
    pub tween: Option<MoveTween>,
    pub invulnerable: Window,
}

impl Player {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            pos: cell.to_vec2(),
            facing: Direction::Right,
            tween: None,
            invulnerable: Window::default(),
        }
    }

    pub fn is_moving(&self) -> bool {
        self.tween.is_some()
    }

    pub fn teleport(&mut self, cell: Cell) {
        self.cell = cell;
        self.pos = cell.to_vec2();
        self.tween = None;
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
}

/// One line in the recent-answers log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentAnswer {
    pub label: String,
    pub correct: bool,
    pub category_name: String,
    pub level: u32,
}

/// Being caught: where, by whom, and when the player comes back
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Capture {
    pub cell: Cell,
    pub enemy_id: u32,
    pub started_at: f64,
    pub recovery: Deadline,
}

/// Category name shown after a level starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    pub text: String,
    pub shown: Window,
}

/// Complete state of one game
#[derive(Debug, Clone)]
pub struct RoundState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub settings: Settings,
    catalog: Rc<CategoryCatalog>,
    directory: EnemyDirectory,
    /// Game time source (stops while paused)
    pub clock: GameClock,
    pub phase: GamePhase,
    /// Phase to return to when unpausing
    paused_from: Option<GamePhase>,
    /// 1-based level
    pub level: u32,
    pub score: u64,
    pub lives: u8,
    /// Correct tiles eaten this level
    pub progress: u32,
    /// Correct tiles needed to clear this level
    pub required: u32,
    /// Unconsumed tiles currently flagged correct
    pub correct_remaining: u32,
    /// Newest first, capped at `RECENT_ANSWERS_CAP`
    pub recent_answers: Vec<RecentAnswer>,
    /// Enemies hold still while active
    pub freeze: Window,
    pub capture: Option<Capture>,
    /// Armed when the clearing tile is eaten
    pub pending_advance: Option<Deadline>,
    pub category: Category,
    pub board: Board,
    pub player: Player,
    /// Sorted by id
    pub enemies: Vec<Enemy>,
    pub banner: Option<Banner>,
    next_id: u32,
}

impl RoundState {
    /// Start a new game at level 1
    pub fn new(settings: Settings, catalog: Rc<CategoryCatalog>, seed: u64) -> Result<Self> {
        settings.validate()?;
        catalog.ensure_mode(settings.mode)?;
        let directory = EnemyDirectory::new(&settings.enemy_kinds)?;

        let mut rng = Pcg32::seed_from_u64(seed);
        let kind = catalog.kind_for_mode(settings.mode, &mut rng);
        let category = catalog
            .pick_category(kind, 0, settings.mode.rotates(), &mut rng)
            .clone();

        let mut state = Self {
            seed,
            rng,
            lives: settings.starting_lives,
            settings,
            catalog,
            directory,
            clock: GameClock::new(),
            phase: GamePhase::Playing,
            paused_from: None,
            level: 0,
            score: 0,
            progress: 0,
            required: 0,
            correct_remaining: 0,
            recent_answers: Vec::with_capacity(RECENT_ANSWERS_CAP),
            freeze: Window::default(),
            capture: None,
            pending_advance: None,
            category,
            board: Board::default(),
            player: Player::new(Cell::ORIGIN),
            enemies: Vec::new(),
            banner: None,
            next_id: 1,
        };
        state.begin_level(1, 0.0, false);
        Ok(state)
    }

    /// Reserve `count` consecutive entity ids and return the first one.
    /// Ids are never reused within a game.
    fn reserve_ids(&mut self, count: u32) -> u32 {
        let first = self.next_id;
        self.next_id += count;
        first
    }

    /// Where the player starts and respawns
    pub fn origin(&self) -> Cell {
        Cell::ORIGIN
    }

    /// Board corner diagonally opposite the origin
    pub fn opposite_corner(&self) -> Cell {
        Cell::new(self.board.width - 1, self.board.height - 1)
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Set up level `level`: new category, board, player and enemies.
    /// `repick` is false only for the category chosen in `new`.
    fn begin_level(&mut self, level: u32, now: f64, repick: bool) {
        self.level = level;
        let rotate = self.settings.mode.rotates();
        if repick {
            let kind = self.catalog.kind_for_mode(self.settings.mode, &mut self.rng);
            self.category = self
                .catalog
                .pick_category(kind, level - 1, rotate, &mut self.rng)
                .clone();
        }

        let (width, height) = (self.settings.grid_width, self.settings.grid_height);
        self.board = board::generate(&self.category, width, height, &mut self.rng);
        self.required = board::required_count(self.board.tiles());
        self.correct_remaining = self.required;
        self.progress = 0;
        self.pending_advance = None;
        self.capture = None;
        self.freeze.close();

        let origin = self.origin();
        self.player.teleport(origin);
        self.player.invulnerable.close();
        if self.settings.invulnerability_enabled() {
            self.player.invulnerable.open(now, self.settings.invulnerable_ms);
        }

        let count = enemy_count_for_level(level);
        let first_id = self.reserve_ids(count);
        self.enemies =
            self.directory
                .spawn_population(count, first_id, width, height, origin, &mut self.rng);
        self.reset_enemy_clocks(now);

        self.banner = Some(Banner {
            text: self.category.name.clone(),
            shown: Window {
                until: now + self.settings.category_banner_ms,
            },
        });

        log::info!(
            "Level {}: {:?}, {} to eat, {} enemies",
            level,
            self.category.name,
            self.required,
            self.enemies.len()
        );
    }

    /// Stagger first steps so enemies don't move in lockstep
    fn reset_enemy_clocks(&mut self, now: f64) {
        let interval = self.settings.enemy_step_interval_ms;
        for (i, enemy) in self.enemies.iter_mut().enumerate() {
            enemy.next_step_at = staggered_deadline(now, interval, i, ENEMY_STAGGER_MS);
        }
    }

    /// Go to the next level right away
    pub fn advance_level(&mut self, now: f64) {
        self.begin_level(self.level + 1, now, true);
    }

    /// Start sliding the player one cell. Returns whether a move started.
    pub fn try_move(&mut self, dir: Direction, now: f64) -> bool {
        if self.phase != GamePhase::Playing || self.player.is_moving() || self.capture.is_some() {
            return false;
        }
        let Some(to) = self
            .player
            .cell
            .step(dir, self.board.width, self.board.height)
        else {
            return false;
        };
        self.player.tween = Some(MoveTween::new(
            self.player.pos,
            to.to_vec2(),
            now,
            self.settings.player_move_ms,
        ));
        self.player.cell = to;
        self.player.facing = dir;
        true
    }

    /// Eat the tile under the player. Returns the logged answer, or None
    /// when there was nothing to eat.
    pub fn eat(&mut self, now: f64) -> Option<RecentAnswer> {
        if self.phase != GamePhase::Playing {
            return None;
        }
        let tile = self.board.tile_mut(self.player.cell)?;
        if tile.eaten {
            return None;
        }
        tile.eaten = true;
        let answer = RecentAnswer {
            label: tile.label.clone(),
            correct: tile.correct,
            category_name: self.category.name.clone(),
            level: self.level,
        };

        if answer.correct {
            self.progress += 1;
            self.correct_remaining = self.correct_remaining.saturating_sub(1);
            self.score += POINTS_PER_CORRECT * self.level as u64;
        } else if self.settings.penalize_wrong {
            self.progress = self.progress.saturating_sub(1);
            if self.progress < self.required && self.pending_advance.take().is_some() {
                log::debug!("Level clear revoked by a wrong answer");
            }
        }
        log::debug!(
            "Ate {:?} ({}), progress {}/{}",
            answer.label,
            if answer.correct { "correct" } else { "wrong" },
            self.progress,
            self.required
        );

        self.recent_answers.insert(0, answer.clone());
        self.recent_answers.truncate(RECENT_ANSWERS_CAP);

        if self.progress >= self.required && self.pending_advance.is_none() {
            self.pending_advance = Some(Deadline::after(now, self.settings.level_advance_delay_ms));
        }
        Some(answer)
    }

    /// Fire the delayed level advance if it's due. Returns whether it fired.
    pub fn update_pending_advance(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        let fired = self
            .pending_advance
            .as_mut()
            .is_some_and(|deadline| deadline.poll(now));
        if fired {
            self.pending_advance = None;
            self.score += LEVEL_CLEAR_BONUS * self.level as u64;
            self.advance_level(now);
        }
        fired
    }

    /// Catch the player if an enemy shares their cell. Returns whether a
    /// capture happened this call.
    pub fn check_capture(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Playing || self.capture.is_some() {
            return false;
        }
        if self.player.invulnerable.is_active(now) {
            return false;
        }
        let (width, height) = (self.board.width, self.board.height);
        let player_cell = Cell::from_vec2_rounded(self.player.pos, width, height);
        let Some(enemy) = self
            .enemies
            .iter()
            .find(|e| e.rounded_cell(width, height) == player_cell)
        else {
            return false;
        };

        self.capture = Some(Capture {
            cell: player_cell,
            enemy_id: enemy.id,
            started_at: now,
            recovery: Deadline::after(now, self.settings.capture_recovery_ms),
        });
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.phase = GamePhase::GameOver;
            log::info!(
                "Game over on level {} with {} points",
                self.level,
                self.score
            );
        } else {
            self.phase = GamePhase::Captured;
            log::info!(
                "Caught by {} at {:?}, {} lives left",
                enemy.kind.as_str(),
                player_cell,
                self.lives
            );
        }
        true
    }

    /// Finish a capture once the recovery delay is up. Returns whether the
    /// player respawned.
    pub fn update_recovery(&mut self, now: f64) -> bool {
        if self.phase != GamePhase::Captured {
            return false;
        }
        let Some(capture) = self.capture.as_mut() else {
            self.phase = GamePhase::Playing;
            return false;
        };
        if !capture.recovery.poll(now) {
            return false;
        }
        let enemy_id = capture.enemy_id;
        self.capture = None;

        let origin = self.origin();
        let corner = self.opposite_corner();
        self.player.teleport(origin);
        if let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == enemy_id) {
            enemy.teleport(corner);
            enemy.next_step_at = now + self.settings.enemy_step_interval_ms;
        }
        if self.settings.invulnerability_enabled() {
            self.player.invulnerable.open(now, self.settings.invulnerable_ms);
        }
        self.phase = GamePhase::Playing;
        true
    }

    /// Step every enemy whose turn has come
    pub fn tick_enemies(&mut self, now: f64) {
        if self.phase != GamePhase::Playing || self.freeze.is_active(now) {
            return;
        }
        let (width, height) = (self.board.width, self.board.height);
        for i in 0..self.enemies.len() {
            if self.enemies[i].next_step_at > now {
                continue;
            }
            self.enemies[i].next_step_at = now + self.settings.enemy_step_interval_ms;

            let legal = legal_directions(self.enemies[i].cell, width, height);
            if legal.is_empty() {
                continue;
            }
            let behavior = self.enemies[i].kind.behavior();
            let ctx = StepContext {
                player: self.player.cell,
                board: &self.board,
            };
            let dir = behavior.choose_direction(&self.enemies[i], &legal, &ctx, &mut self.rng);
            let Some(to) = self.enemies[i].cell.step(dir, width, height) else {
                continue;
            };
            self.enemies[i].start_step(dir, to, now, self.settings.enemy_move_ms);

            if behavior.reseeds_on_arrive(&self.board, to) {
                if let Some(outcome) = reseed_tile(&mut self.board, to, &self.category, &mut self.rng)
                {
                    if outcome.correct {
                        self.correct_remaining += 1;
                    }
                    log::debug!(
                        "Enemy {} refilled {:?} (p={:.2}, correct={})",
                        self.enemies[i].id,
                        to,
                        outcome.p_correct,
                        outcome.correct
                    );
                }
            }
        }
    }

    /// Move interpolated positions along
    pub fn update_positions(&mut self, now: f64) {
        self.player.update_pos(now);
        for enemy in &mut self.enemies {
            enemy.update_pos(now);
        }
    }

    /// Hold every enemy still for `duration_ms`
    pub fn freeze_enemies(&mut self, now: f64, duration_ms: f64) {
        self.freeze.open(now, duration_ms);
    }

    /// Pause or resume. The clock stops while paused so timers keep their
    /// remaining time. Returns whether the phase changed.
    pub fn toggle_pause(&mut self) -> bool {
        match self.phase {
            GamePhase::Playing | GamePhase::Captured => {
                self.paused_from = Some(self.phase);
                self.phase = GamePhase::Paused;
                self.clock.set_paused(true);
                true
            }
            GamePhase::Paused => {
                self.phase = self.paused_from.take().unwrap_or(GamePhase::Playing);
                self.clock.set_paused(false);
                true
            }
            GamePhase::GameOver => false,
        }
    }

    /// Drop the banner once its time is up
    pub fn update_banner(&mut self, now: f64) {
        if self
            .banner
            .as_ref()
            .is_some_and(|banner| !banner.shown.is_active(now))
        {
            self.banner = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::GameMode;
    use crate::sim::category::{Category, NumericRule, builtin_numeric_categories};
    use crate::sim::enemy::EnemyKind;

    fn multiples_of_three_catalog() -> Rc<CategoryCatalog> {
        let category = Category::numeric("Multiples of 3", NumericRule::MultipleOf(3), 1, 99);
        Rc::new(CategoryCatalog::new(Vec::new(), vec![category]).unwrap())
    }

    fn test_settings() -> Settings {
        Settings {
            grid_width: 5,
            grid_height: 5,
            mode: GameMode::MathOnly,
            invulnerable_ms: 0.0,
            ..Settings::default()
        }
    }

    fn new_state(seed: u64) -> RoundState {
        RoundState::new(test_settings(), multiples_of_three_catalog(), seed).unwrap()
    }

    /// Put the player on `cell` with no slide in progress
    fn place_player(state: &mut RoundState, cell: Cell) {
        state.player.teleport(cell);
    }

    fn cells_where(state: &RoundState, correct: bool) -> Vec<Cell> {
        state
            .board
            .tiles()
            .iter()
            .filter(|t| t.correct == correct && !t.eaten)
            .map(|t| t.cell)
            .collect()
    }

    #[test]
    fn test_new_round() {
        let state = new_state(1);
        assert_eq!(state.level, 1);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.category.name, "Multiples of 3");
        assert_eq!(state.required, board::required_count(state.board.tiles()));
        assert_eq!(state.correct_remaining, state.required);
        assert_eq!(state.enemies.len(), 2);
        assert_eq!(state.player.cell, Cell::ORIGIN);
        assert!(state.banner.is_some());
        // Staggered first steps
        assert!(state.enemies[0].next_step_at < state.enemies[1].next_step_at);
    }

    #[test]
    fn test_setup_errors() {
        let settings = Settings {
            enemy_kinds: Vec::new(),
            ..test_settings()
        };
        assert!(RoundState::new(settings, multiples_of_three_catalog(), 1).is_err());

        let settings = Settings {
            mode: GameMode::WordsOnly,
            ..test_settings()
        };
        assert!(RoundState::new(settings, multiples_of_three_catalog(), 1).is_err());
    }

    #[test]
    fn test_move_updates_logical_cell_first() {
        let mut state = new_state(2);
        assert!(state.try_move(Direction::Right, 0.0));
        assert_eq!(state.player.cell, Cell::new(1, 0));
        assert_eq!(state.player.facing, Direction::Right);
        assert_eq!(state.player.pos, Vec2::ZERO);

        // Busy until the slide finishes
        assert!(!state.try_move(Direction::Down, 10.0));
        state.update_positions(60.0);
        assert!((state.player.pos.x - 0.5).abs() < 1e-5);
        state.update_positions(PLAYER_MOVE_MS);
        assert_eq!(state.player.pos, Vec2::new(1.0, 0.0));
        assert!(state.try_move(Direction::Down, PLAYER_MOVE_MS));
    }

    #[test]
    fn test_move_blocked_by_walls() {
        let mut state = new_state(2);
        assert!(!state.try_move(Direction::Up, 0.0));
        assert!(!state.try_move(Direction::Left, 0.0));
        assert_eq!(state.player.cell, Cell::ORIGIN);
        assert!(!state.player.is_moving());
    }

    #[test]
    fn test_eat_is_idempotent() {
        let mut state = new_state(3);
        let cell = cells_where(&state, true)[0];
        place_player(&mut state, cell);

        let first = state.eat(0.0);
        assert!(first.is_some());
        let progress = state.progress;
        let score = state.score;
        let logged = state.recent_answers.len();

        assert!(state.eat(0.0).is_none());
        assert_eq!(state.progress, progress);
        assert_eq!(state.score, score);
        assert_eq!(state.recent_answers.len(), logged);
    }

    #[test]
    fn test_eat_logs_newest_first_and_caps() {
        let mut state = new_state(4);
        let wrong = cells_where(&state, false);
        assert!(wrong.len() > RECENT_ANSWERS_CAP);
        for cell in wrong.iter().take(RECENT_ANSWERS_CAP + 2) {
            place_player(&mut state, *cell);
            state.eat(0.0);
        }
        assert_eq!(state.recent_answers.len(), RECENT_ANSWERS_CAP);
        let last = state.board.tile(wrong[RECENT_ANSWERS_CAP + 1]).unwrap();
        assert_eq!(state.recent_answers[0].label, last.label);
        assert!(!state.recent_answers[0].correct);
        assert_eq!(state.recent_answers[0].category_name, "Multiples of 3");
        assert_eq!(state.recent_answers[0].level, 1);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn test_wrong_answer_penalty_floors_at_zero() {
        let settings = Settings {
            penalize_wrong: true,
            ..test_settings()
        };
        let mut state = RoundState::new(settings, multiples_of_three_catalog(), 5).unwrap();
        let right = cells_where(&state, true);
        let wrong = cells_where(&state, false);

        place_player(&mut state, wrong[0]);
        state.eat(0.0);
        assert_eq!(state.progress, 0);

        place_player(&mut state, right[0]);
        state.eat(0.0);
        assert_eq!(state.progress, 1);

        place_player(&mut state, wrong[1]);
        state.eat(0.0);
        assert_eq!(state.progress, 0);
    }

    #[test]
    fn test_clearing_level_advances_once_after_delay() {
        let mut state = new_state(6);
        let required = state.required;
        let right = cells_where(&state, true);
        assert_eq!(right.len() as u32, required);

        for cell in &right {
            place_player(&mut state, *cell);
            state.eat(100.0);
        }
        assert_eq!(state.progress, required);
        assert_eq!(state.correct_remaining, 0);
        assert_eq!(state.level, 1);
        assert!(state.pending_advance.is_some());

        // One more bite during the delay doesn't re-arm anything
        let extra = cells_where(&state, false)[0];
        place_player(&mut state, extra);
        state.eat(200.0);
        let armed = state.pending_advance.unwrap();
        assert_eq!(armed.at, 100.0 + LEVEL_ADVANCE_DELAY_MS);

        assert!(!state.update_pending_advance(599.0));
        assert_eq!(state.level, 1);
        assert!(state.update_pending_advance(600.0));
        assert_eq!(state.level, 2);
        assert!(!state.update_pending_advance(5000.0));
        assert_eq!(state.level, 2);
        assert_eq!(state.progress, 0);
        assert_eq!(state.player.cell, Cell::ORIGIN);
        assert_eq!(
            state.score,
            POINTS_PER_CORRECT * required as u64 + LEVEL_CLEAR_BONUS
        );
    }

    #[test]
    fn test_wrong_answer_during_delay_cancels_advance() {
        let settings = Settings {
            penalize_wrong: true,
            ..test_settings()
        };
        let mut state = RoundState::new(settings, multiples_of_three_catalog(), 6).unwrap();
        let right = cells_where(&state, true);
        let wrong = cells_where(&state, false);
        for cell in &right {
            place_player(&mut state, *cell);
            state.eat(100.0);
        }
        assert!(state.pending_advance.is_some());

        place_player(&mut state, wrong[0]);
        state.eat(200.0);
        assert_eq!(state.progress, state.required - 1);
        assert!(state.pending_advance.is_none());
        assert!(!state.update_pending_advance(5000.0));
        assert_eq!(state.level, 1);
        assert_eq!(state.score, POINTS_PER_CORRECT * right.len() as u64);
    }

    #[test]
    fn test_enemy_ids_unique_across_levels() {
        let mut state = new_state(7);
        let mut seen: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        for _ in 0..5 {
            state.advance_level(0.0);
            seen.extend(state.enemies.iter().map(|e| e.id));
        }
        let total = seen.len();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
        assert_eq!(seen[0], 1);
    }

    #[test]
    fn test_enemy_scaling_by_level() {
        let mut state = new_state(7);
        for level in 2..=8 {
            state.advance_level(0.0);
            assert_eq!(state.level, level);
            assert_eq!(state.enemies.len() as u32, enemy_count_for_level(level));
        }
        let mut ids: Vec<u32> = state.enemies.iter().map(|e| e.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), state.enemies.len());
    }

    #[test]
    fn test_capture_and_recovery() {
        let mut state = new_state(8);
        let enemy_id = state.enemies[0].id;
        state.enemies[0].teleport(Cell::new(1, 1));
        place_player(&mut state, Cell::new(1, 1));

        assert!(state.check_capture(0.0));
        assert_eq!(state.phase, GamePhase::Captured);
        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert!(state.capture.is_some());
        // Already caught: no double hit
        assert!(!state.check_capture(10.0));
        assert_eq!(state.lives, STARTING_LIVES - 1);
        // Frozen while caught
        assert!(!state.try_move(Direction::Right, 10.0));

        assert!(!state.update_recovery(CAPTURE_RECOVERY_MS - 1.0));
        assert!(state.update_recovery(CAPTURE_RECOVERY_MS));
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.player.cell, Cell::ORIGIN);
        let enemy = state.enemies.iter().find(|e| e.id == enemy_id).unwrap();
        assert_eq!(enemy.cell, Cell::new(4, 4));
        assert!(state.capture.is_none());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = new_state(9);
        state.lives = 1;
        state.enemies[0].teleport(Cell::new(2, 0));
        place_player(&mut state, Cell::new(2, 0));
        assert!(state.check_capture(0.0));
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.lives, 0);
        assert!(state.is_over());
        assert!(!state.update_recovery(10_000.0));
        assert!(!state.try_move(Direction::Right, 10_000.0));
        assert!(!state.toggle_pause());
    }

    #[test]
    fn test_invulnerability_blocks_capture() {
        let settings = Settings {
            invulnerable_ms: 1000.0,
            ..test_settings()
        };
        let mut state = RoundState::new(settings, multiples_of_three_catalog(), 10).unwrap();
        state.enemies[0].teleport(Cell::ORIGIN);
        assert!(!state.check_capture(500.0));
        assert_eq!(state.lives, STARTING_LIVES);
        assert!(state.check_capture(1000.0));
        assert_eq!(state.lives, STARTING_LIVES - 1);
    }

    #[test]
    fn test_enemies_wait_for_their_turn() {
        let mut state = new_state(11);
        let before: Vec<Cell> = state.enemies.iter().map(|e| e.cell).collect();
        state.tick_enemies(ENEMY_STEP_INTERVAL_MS - 1.0);
        let after: Vec<Cell> = state.enemies.iter().map(|e| e.cell).collect();
        assert_eq!(before, after);

        state.tick_enemies(ENEMY_STEP_INTERVAL_MS);
        assert_ne!(state.enemies[0].cell, before[0]);
        assert_eq!(state.enemies[1].cell, before[1]);
        assert_eq!(
            state.enemies[0].next_step_at,
            2.0 * ENEMY_STEP_INTERVAL_MS
        );
    }

    #[test]
    fn test_freeze_holds_enemies() {
        let mut state = new_state(12);
        let before: Vec<Cell> = state.enemies.iter().map(|e| e.cell).collect();
        state.freeze_enemies(0.0, 10_000.0);
        state.tick_enemies(9_999.0);
        let after: Vec<Cell> = state.enemies.iter().map(|e| e.cell).collect();
        assert_eq!(before, after);
        state.tick_enemies(10_000.0);
        assert!(
            state
                .enemies
                .iter()
                .zip(&before)
                .all(|(e, b)| e.cell != *b)
        );
    }

    #[test]
    fn test_enemy_refills_eaten_tile() {
        let settings = Settings {
            enemy_kinds: vec![EnemyKind::Forager],
            ..test_settings()
        };
        let mut state = RoundState::new(settings, multiples_of_three_catalog(), 13).unwrap();
        // Eat every tile so wherever the forager goes it lands on an eaten one
        for tile in state.board.tiles().to_vec() {
            place_player(&mut state, tile.cell);
            state.eat(0.0);
        }
        assert_eq!(state.correct_remaining, 0);
        state.tick_enemies(ENEMY_STEP_INTERVAL_MS);
        let landed = state.enemies[0].cell;
        let tile = state.board.tile(landed).unwrap();
        assert!(!tile.eaten);
        assert_eq!(state.correct_remaining, state.board.remaining_correct());
    }

    #[test]
    fn test_pause_round_trip() {
        let mut state = new_state(14);
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(state.clock.is_paused());
        assert!(!state.try_move(Direction::Right, 0.0));
        assert!(state.eat(0.0).is_none());
        assert!(state.toggle_pause());
        assert_eq!(state.phase, GamePhase::Playing);

        // Pausing mid-capture comes back to the capture
        state.enemies[0].teleport(Cell::new(3, 3));
        place_player(&mut state, Cell::new(3, 3));
        state.check_capture(0.0);
        state.toggle_pause();
        assert!(!state.update_recovery(10_000.0));
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Captured);
    }

    #[test]
    fn test_rotation_mode_walks_categories() {
        let catalog = Rc::new(CategoryCatalog::new(Vec::new(), builtin_numeric_categories()).unwrap());
        let names: Vec<String> = builtin_numeric_categories()
            .into_iter()
            .map(|c| c.name)
            .collect();
        let mut state = RoundState::new(test_settings(), catalog, 15).unwrap();
        assert_eq!(state.category.name, names[0]);
        state.advance_level(0.0);
        assert_eq!(state.category.name, names[1]);
        state.advance_level(0.0);
        assert_eq!(state.category.name, names[2]);
    }

    #[test]
    fn test_banner_expires() {
        let mut state = new_state(16);
        state.update_banner(CATEGORY_BANNER_MS - 1.0);
        assert!(state.banner.is_some());
        state.update_banner(CATEGORY_BANNER_MS);
        assert!(state.banner.is_none());
    }
}
