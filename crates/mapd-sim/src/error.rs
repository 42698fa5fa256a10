use thiserror::Error;

use mapd_grid::GridError;
use mapd_token::TokenError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("map format error: {0}")]
    MapFormat(String),

    #[error("task format error: {0}")]
    TaskFormat(String),

    #[error(transparent)]
    Grid(#[from] GridError),

    /// A token-protocol violation escaping the decision layer — a
    /// correctness bug, not a planning failure.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
