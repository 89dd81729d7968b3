//! Errors surfaced by the terminal front-end.  The simulation itself is
//! infallible.

use crate::config::ConfigError;

#[derive(thiserror::Error, Debug)]
pub enum GameError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, GameError>;
