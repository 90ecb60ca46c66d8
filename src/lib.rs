//! # gammon-rules
//!
//! Backgammon rules engine and match-state machine.
//!
//! ## Design Principles
//!
//! 1. **Snapshots In, Snapshots Out**: Every operation takes immutable
//!    board, dice, cube and match snapshots and returns new ones. The
//!    engine keeps no state between calls.
//!
//! 2. **Rejections Are Data**: A disallowed game action comes back as a
//!    `RuleViolation` with a message fit for the player. Malformed input
//!    (bad indices, impossible dice, broken snapshots) is an `EngineError`.
//!
//! 3. **One Source of Truth**: `calculate_available_moves` and
//!    `validate_move` share the same move walk, so the move list a UI or
//!    an AI searches is exactly the set of moves that validate.
//!
//! ## Architecture
//!
//! - **Typed Locations**: `Location::{Point, Bar, BorneOff}` replaces the
//!   numeric 24/25 sentinels past the wire boundary.
//!
//! - **Persistent Data Structures**: Cube and move logs are `im::Vector`,
//!   so cloning a `MatchState` per transition is cheap.
//!
//! - **Deterministic Dice**: `GameRng` (ChaCha8) makes every match
//!   replayable from its seed.
//!
//! ## Modules
//!
//! - `core`: Colors, RNG, match configuration, contract errors
//! - `board`: Points, locations, moves, board and dice snapshots
//! - `rules`: Move legality, application, win detection, `RulesEngine`
//! - `cube`: Doubling cube, beaver and raccoon chains
//! - `match_play`: Scoring, Crawford rule, the `MatchState` machine
//!
//! ## Example
//!
//! ```
//! use gammon_rules::{GameRng, MatchConfig, MatchState};
//!
//! let mut rng = GameRng::new(7);
//! let state = MatchState::new(&MatchConfig::match_to(5), &mut rng).unwrap();
//!
//! let mv = state.legal_moves()[0];
//! let state = state.make_move(&mv).unwrap();
//! assert_eq!(state.move_history().len(), 1);
//! ```

pub mod core;
pub mod board;
pub mod rules;
pub mod cube;
pub mod match_play;

// Re-export commonly used types
pub use crate::core::{
    Color, ColorMap,
    GameRng, GameRngState,
    MatchConfig, MatchRules,
    EngineError,
};

pub use crate::board::{
    BoardBuilder, BoardState, DiceState, Location, Move, PipCount, Point, RawMove,
    roll_dice, roll_opening,
};

pub use crate::rules::{
    RuleViolation, ValidationResult, RulesEngine, StandardRules, Destinations,
    apply_move, calculate_available_moves, calculate_pip_count, check_win_condition,
    create_initial_board, use_die, validate_move,
};

pub use crate::cube::{CubeAction, CubeHistoryEntry, CubeSnapshot, DoubleResponse};

pub use crate::match_play::{
    CrawfordState, GameEnd, GameResult, MatchState, MatchStatus, MoveRecord,
    ResignationType, TurnPhase, WinKind,
};
