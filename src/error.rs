//! Error types for grid construction, pool setup and result persistence.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type LifeResult<T> = Result<T, LifeError>;

#[derive(Error, Debug)]
pub enum LifeError {
    /// A grid needs at least one row and one column.
    #[error("grid must be non-empty, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// A seed coordinate lies outside the grid.
    #[error("cell ({row}, {col}) is outside a {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
