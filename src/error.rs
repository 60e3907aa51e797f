//! Error types for the Parade engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParadeError {
    #[error("Deck is empty")]
    EmptyDeck,

    #[error("Insufficient cards: requested {requested}, {remaining} remaining")]
    InsufficientCards { requested: usize, remaining: usize },

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Invalid input: {0}")]
    InvalidUserInput(String),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),

    #[error("Invalid game action: {0}")]
    InvalidAction(String),

    #[error("Unsupported player count: {0} (expected 2-6)")]
    InvalidPlayerCount(usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Task join error: {0}")]
    JoinError(#[from] tokio::task::JoinError),
}

impl From<serde_json::Error> for ParadeError {
    fn from(err: serde_json::Error) -> Self {
        ParadeError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ParadeError>;
