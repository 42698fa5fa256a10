//! Grid-subsystem error type.

use thiserror::Error;

/// Errors produced by `mapd-grid`.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("map format error: {0}")]
    MapFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = Result<T, GridError>;
