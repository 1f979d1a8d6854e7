//! Error types
//!
//! Only level start, storage writes and GPU setup can fail outright. Everything else
//! (sensor denial, corrupt saves, sparse spawns) degrades and logs instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("level {index} has an invalid config: {reason}")]
    InvalidLevel { index: u32, reason: &'static str },

    #[error("could not place any chimneys for level {index} ({attempts} attempts)")]
    EmptySpawn { index: u32, attempts: u32 },

    #[error("viewport {width}x{height} is too small to play in")]
    ViewportTooSmall { width: f32, height: f32 },

    #[error("storage write failed for key `{key}`")]
    Storage { key: String },

    #[error("graphics setup failed: {0}")]
    Graphics(String),

    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GameError>;
