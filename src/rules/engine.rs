//! Rules engine trait and the standard backgammon implementation.
//!
//! The match layer, AI opponents and analysis tools all talk to the board
//! through `RulesEngine`:
//! - What moves are legal
//! - Whether a proposed move is legal
//! - How a move changes the board
//! - Who has won
//!
//! `StandardRules` carries no state. Everything travels through the
//! board and dice snapshots passed in.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::legality;
use super::violation::{RuleViolation, ValidationResult};
use crate::board::{BoardState, DiceState, Location, Move};
use crate::core::Color;

/// Destinations reachable from each source location.
pub type Destinations = FxHashMap<Location, SmallVec<[Location; 4]>>;

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: Return empty if the player cannot move
/// - `validate`: Must accept exactly the moves `legal_moves` returns
/// - `apply`: Must be deterministic and must not validate
pub trait RulesEngine {
    /// Starting position for a new game.
    fn initial_board(&self) -> BoardState;

    /// Every move legal for `player` right now.
    fn legal_moves(&self, player: Color, board: &BoardState, dice: &DiceState) -> Vec<Move>;

    /// Check a proposed move.
    fn validate(&self, mv: &Move, board: &BoardState, dice: &DiceState) -> ValidationResult;

    /// Apply an already-validated move.
    fn apply(&self, mv: &Move, board: &BoardState) -> BoardState;

    /// The winner, if the game is over.
    fn winner(&self, board: &BoardState) -> Option<Color>;

    // === Convenience Methods ===

    /// Validate, then apply and spend the die.
    fn play(
        &self,
        mv: &Move,
        board: &BoardState,
        dice: &DiceState,
    ) -> Result<(BoardState, DiceState), RuleViolation> {
        self.validate(mv, board, dice)?;
        Ok((self.apply(mv, board), dice.use_die(mv.die())))
    }

    /// Whether `player` has nothing left to do with these dice.
    fn is_turn_over(&self, player: Color, board: &BoardState, dice: &DiceState) -> bool {
        dice.is_exhausted() || self.legal_moves(player, board, dice).is_empty()
    }

    /// Legal destinations grouped by source, for move highlighting.
    fn legal_destinations(&self, player: Color, board: &BoardState, dice: &DiceState) -> Destinations {
        let mut map = Destinations::default();
        for mv in self.legal_moves(player, board, dice) {
            let targets = map.entry(mv.from()).or_default();
            if !targets.contains(&mv.to()) {
                targets.push(mv.to());
            }
        }
        map
    }
}

/// Standard backgammon rules.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StandardRules;

impl RulesEngine for StandardRules {
    fn initial_board(&self) -> BoardState {
        legality::create_initial_board()
    }

    fn legal_moves(&self, player: Color, board: &BoardState, dice: &DiceState) -> Vec<Move> {
        legality::calculate_available_moves(player, board, dice)
    }

    fn validate(&self, mv: &Move, board: &BoardState, dice: &DiceState) -> ValidationResult {
        legality::validate_move(mv, board, dice)
    }

    fn apply(&self, mv: &Move, board: &BoardState) -> BoardState {
        legality::apply_move(mv, board)
    }

    fn winner(&self, board: &BoardState) -> Option<Color> {
        legality::check_win_condition(board)
    }
}
