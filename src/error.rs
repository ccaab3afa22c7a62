//! Setup errors
//!
//! Only configuration and content loading can fail. Once a round is running
//! nothing in the engine returns an error.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No enemy kinds are enabled")]
    NoEnemyKinds,
    #[error("Word dataset is empty")]
    EmptyDataset,
    #[error("No categories available for the selected mode")]
    NoCategories,
    #[error("Grid {width}x{height} is too small")]
    GridTooSmall { width: u32, height: u32 },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = core::result::Result<T, ConfigError>;
