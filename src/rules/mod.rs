//! Board and move legality engine.
//!
//! Pure functions over `BoardState` and `DiceState` snapshots:
//! - Legal move enumeration
//! - Move validation with user-facing rejection reasons
//! - Move application (copy-on-write)
//! - Win detection and pip counts
//!
//! `RulesEngine` wraps the same functions behind a trait for callers that
//! want an engine value to pass around.

pub mod violation;
pub mod legality;
pub mod engine;

pub use violation::{RuleViolation, ValidationResult};
pub use legality::{
    apply_move, calculate_available_moves, calculate_pip_count, check_win_condition,
    create_initial_board, playable_dice, use_die, validate_move,
};
pub use engine::{Destinations, RulesEngine, StandardRules};
