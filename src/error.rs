//! Error types for dynamic_search

use thiserror::Error;

/// Errors raised by commands and configuration.
///
/// A search that finds no path is not an error; it is reported through
/// `SearchStep::Exhausted` or a `None` path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("unknown algorithm id {0}; expected 1..=6")]
    UnknownAlgorithm(u8),

    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: usize, col: usize, size: usize },

    #[error("cannot place {anchor} on ({row}, {col}): {reason}")]
    InvalidPlacement {
        anchor: &'static str,
        row: usize,
        col: usize,
        reason: &'static str,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;
