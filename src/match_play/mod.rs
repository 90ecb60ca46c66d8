//! Match layer: games strung together under one score.
//!
//! ## Structure
//!
//! - `scoring`: win kinds, resignations, point values (Jacoby aware)
//! - `crawford`: the one cube-less game after a side reaches match point
//! - `state`: `MatchState`, the persisted aggregate, and every player action

pub mod scoring;
pub mod crawford;
pub mod state;

pub use scoring::{game_points, jacoby_applies, GameEnd, GameResult, ResignationType, WinKind};
pub use crawford::CrawfordState;
pub use state::{MatchState, MatchStatus, MoveRecord, TurnPhase};
