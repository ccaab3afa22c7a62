//! Game session: the menu and the round being played
//!
//! A round is created on start, replaced on restart and dropped on return to
//! the menu. Content and settings are checked once, up front.

use std::rc::Rc;

use crate::error::Result;
use crate::settings::Settings;
use crate::sim::{
    CategoryCatalog, EnemyDirectory, FrameEvents, InputQueue, Intent, RenderSnapshot, RoundState,
    WordDataset, tick,
};

pub struct Game {
    settings: Settings,
    catalog: Rc<CategoryCatalog>,
    round: Option<RoundState>,
    input: InputQueue,
    last_seed: u64,
}

impl Game {
    /// Validate settings and load category content
    pub fn new(settings: Settings) -> Result<Self> {
        settings.validate()?;
        EnemyDirectory::new(&settings.enemy_kinds)?;
        let dataset = match &settings.dataset_path {
            Some(path) => WordDataset::load(path)?,
            None => WordDataset::builtin()?,
        };
        let catalog = CategoryCatalog::from_source(&dataset)?;
        catalog.ensure_mode(settings.mode)?;
        Ok(Self::with_catalog(settings, Rc::new(catalog)))
    }

    /// Use an already-built catalog
    pub fn with_catalog(settings: Settings, catalog: Rc<CategoryCatalog>) -> Self {
        Self {
            settings,
            catalog,
            round: None,
            input: InputQueue::new(),
            last_seed: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn in_menu(&self) -> bool {
        self.round.is_none()
    }

    pub fn round(&self) -> Option<&RoundState> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut RoundState> {
        self.round.as_mut()
    }

    /// Leave the menu with a fresh round
    pub fn start(&mut self, seed: u64) -> Result<&mut RoundState> {
        let round = RoundState::new(self.settings.clone(), Rc::clone(&self.catalog), seed)?;
        log::info!("Starting {} game (seed {seed})", self.settings.mode.as_str());
        self.last_seed = seed;
        self.input = InputQueue::new();
        Ok(self.round.insert(round))
    }

    /// Throw the current round away and start over
    pub fn restart(&mut self) -> Result<&mut RoundState> {
        self.start(self.last_seed.wrapping_add(1))
    }

    /// Back to the menu; the round is discarded
    pub fn return_to_menu(&mut self) {
        self.round = None;
        self.input = InputQueue::new();
    }

    /// Queue an intent for the next frame. Ignored in the menu.
    pub fn push_intent(&mut self, intent: Intent) {
        if self.round.is_some() {
            self.input.push(intent);
        }
    }

    /// Run one frame and return what to draw
    pub fn frame(&mut self, wall_ms: f64) -> Option<(FrameEvents, RenderSnapshot)> {
        let round = self.round.as_mut()?;
        let input = self.input.next_frame();
        let events = tick(round, &input, wall_ms);
        Some((events, RenderSnapshot::capture(round)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;
    use crate::settings::GameMode;
    use crate::sim::GamePhase;
    use crate::{Cell, Direction};

    #[test]
    fn test_menu_start_restart() {
        let mut game = Game::new(Settings::default()).unwrap();
        assert!(game.in_menu());
        assert!(game.frame(0.0).is_none());

        game.start(10).unwrap();
        assert!(!game.in_menu());
        assert_eq!(game.round().unwrap().seed, 10);

        game.round_mut().unwrap().score = 500;
        game.restart().unwrap();
        let round = game.round().unwrap();
        assert_eq!(round.score, 0);
        assert_eq!(round.seed, 11);

        game.return_to_menu();
        assert!(game.in_menu());
    }

    #[test]
    fn test_setup_fails_fast() {
        let settings = Settings {
            enemy_kinds: Vec::new(),
            ..Settings::default()
        };
        assert!(matches!(Game::new(settings), Err(ConfigError::NoEnemyKinds)));

        let settings = Settings {
            dataset_path: Some("/nonexistent/words.json".into()),
            ..Settings::default()
        };
        assert!(matches!(Game::new(settings), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_intents_reach_the_round() {
        let mut game = Game::new(Settings::from_mode(GameMode::MathOnly)).unwrap();
        game.start(3).unwrap();
        game.round_mut().unwrap().enemies.clear();

        game.push_intent(Intent::Move(Direction::Right));
        game.push_intent(Intent::Eat);
        let (events, snapshot) = game.frame(0.0).unwrap();
        assert!(events.moved);
        assert!(events.ate.is_some());
        assert_eq!(snapshot.recent_answers.len(), 1);
        assert_eq!(game.round().unwrap().player.cell, Cell::new(1, 0));

        game.push_intent(Intent::TogglePause);
        let (_, snapshot) = game.frame(16.0).unwrap();
        assert_eq!(snapshot.phase, GamePhase::Paused);
    }
}
