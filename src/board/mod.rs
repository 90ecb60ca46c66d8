//! Board, dice and move types.
//!
//! Everything here is a plain value snapshot. Transitions live in
//! `rules`; this module only knows how to describe a position.

pub mod location;
pub mod state;
pub mod dice;

pub use location::{Location, Move, Point, RawMove, BAR_INDEX, OFF_INDEX};
pub use state::{BoardBuilder, BoardState, PipCount, CHECKERS_PER_SIDE};
pub use dice::{roll_dice, roll_opening, DiceState, Remaining};
