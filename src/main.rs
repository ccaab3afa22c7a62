//! Word Muncher entry point
//!
//! No renderer ships with the crate, so the native binary runs a headless
//! game driven by the autopilot and logs how it went.
//!
//! Usage: `word-muncher [--settings settings.json] [--seed N]`

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use word_muncher::sim::{GamePhase, autopilot, tick};
use word_muncher::{Game, HighScores, Settings};

/// 60 fps
const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after ten minutes of game time
const MAX_FRAMES: u32 = 60 * 60 * 10;
const HIGH_SCORES_FILE: &str = "word-muncher-scores.json";

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Settings file (JSON); defaults are used when absent
    #[arg(short = 'c', long)]
    settings: Option<PathBuf>,

    /// Force a seed instead of the current time
    #[arg(short, long)]
    seed: Option<u64>,
}

fn main() {
    let args = Args::parse();
    env_logger::init();
    log::info!("Word Muncher (headless) starting...");

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> word_muncher::Result<()> {
    let settings = match &args.settings {
        Some(path) => Settings::load_from(path)?,
        None => Settings::default(),
    };
    let mut game = Game::new(settings)?;

    let now_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let round = game.start(args.seed.unwrap_or(now_ms))?;

    let mut wall = 0.0;
    for frame in 0..MAX_FRAMES {
        let input = autopilot(round);
        let events = tick(round, &input, wall);
        wall += FRAME_MS;

        if events.level_advanced {
            log::info!("Reached level {} ({} points)", round.level, round.score);
        }
        if round.phase == GamePhase::GameOver {
            log::info!("Game over after {frame} frames");
            break;
        }
    }

    let (score, level) = (round.score, round.level);
    println!("Final score: {score} (level {level})");

    let mut scores = HighScores::load_from(HIGH_SCORES_FILE)?;
    if let Some(rank) = scores.add_score(score, level, now_ms) {
        println!("New high score, rank #{rank}");
        scores.save_to(HIGH_SCORES_FILE)?;
    }
    Ok(())
}
