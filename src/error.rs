use thiserror::Error;

use crate::particle::Flavor;

/// Precondition violations on direct grid access. Both indicate a caller bug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("position ({x}, {y}) is outside the {w}x{h} grid")]
    OutOfBounds { x: i64, y: i64, w: usize, h: usize },
    #[error("cannot place {flavor:?} at ({x}, {y}): occupied by {occupant:?}")]
    InvalidMove {
        x: usize,
        y: usize,
        flavor: Flavor,
        occupant: Flavor,
    },
}

/// Board text that does not describe a rectangular grid of known symbols.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("board text has no rows")]
    Empty,
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("unknown symbol {symbol:?} at row {row}, column {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    Probability { name: &'static str, value: f64 },
    #[error("fountain_interval must be at least 1")]
    ZeroInterval,
}

/// Anything that can go wrong setting up or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error(transparent)]
    Grid(#[from] GridError),
}
