//! Contract violations.
//!
//! An `EngineError` means the caller handed the engine something no game
//! action can produce: an index outside the board, an impossible die, a
//! snapshot that lost checkers. These are bugs upstream, not disallowed
//! moves, so they are returned as hard errors from the boundary
//! constructors and never coerced into a rule rejection.

use thiserror::Error;

use super::player::Color;

/// Errors raised when an input breaks the engine's contract.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("die value {0} is outside 1..=6")]
    InvalidDie(u8),

    #[error("location index {0} is outside 0..=25")]
    InvalidLocation(u8),

    #[error("the bar can only be a move source and borne-off only a destination (from {from}, to {to})")]
    MisplacedSentinel { from: u8, to: u8 },

    #[error("{color} has {count} checkers accounted for, expected 15")]
    CheckerCount { color: Color, count: u32 },

    #[error("point {index} holds {count} checkers, more than a side owns")]
    PointOverflow { index: u8, count: i8 },

    #[error("remaining dice {remaining:?} cannot come from roll {dice:?}")]
    InconsistentDice { dice: [u8; 2], remaining: Vec<u8> },

    #[error("cube level {0} is not a power of two")]
    InvalidCubeLevel(u32),

    #[error("a double is pending but no game is in progress")]
    StrayDoubleOffer,

    #[error("match length must be at least 1")]
    ZeroMatchLength,

    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}
