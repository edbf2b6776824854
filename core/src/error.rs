//! Error types for fallible construction and configuration.
//!
//! Only inputs that come from outside the engine (raw cell values, config files)
//! are validated with `Result`. Broken caller invariants, such as spawning on a
//! full grid, panic instead.

use thiserror::Error;

/// Errors from building a [`Grid`](crate::Grid) out of raw values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid size must be at least 1")]
    ZeroSize,
    #[error("expected {expected} cells for a square grid, got {actual}")]
    CellCount { expected: usize, actual: usize },
    #[error("invalid tile {value} at ({row}, {col}): must be empty or a power of two >= 2")]
    InvalidTile { row: usize, col: usize, value: u32 },
}

/// Errors from loading or validating a [`GameConfig`](crate::GameConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("board size {size} out of range (2..={max})")]
    Size { size: usize, max: usize },
    #[error("target {0} must be a power of two >= 4")]
    Target(u32),
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
