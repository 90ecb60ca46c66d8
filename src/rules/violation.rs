//! Rule violations: disallowed game actions, returned as data.
//!
//! Every variant's `Display` text is safe to show an end user verbatim.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a proposed action is not allowed.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum RuleViolation {
    // === Move legality ===
    #[error("Die value {0} is not available")]
    DieNotAvailable(u8),

    #[error("You must enter all checkers from the bar before moving others")]
    MustEnterFromBar,

    #[error("No legal moves available for current dice")]
    NoLegalMoves,

    #[error("Must use the highest available die ({0})")]
    MustUseHighestDie(u8),

    #[error("Die value {0} cannot be used for any legal move")]
    DieNotPlayable(u8),

    #[error("No pieces on bar to move")]
    NothingOnBar,

    #[error("Must enter on the point indicated by the die value")]
    WrongEntryPoint,

    #[error("Cannot land on this position")]
    BlockedPoint,

    #[error("Cannot bear off until all pieces are in home board")]
    NotAllHome,

    #[error("No piece at starting position")]
    NoCheckerAtSource,

    #[error("Die value does not bear off this checker")]
    DieDoesNotBearOff,

    #[error("Cannot bear off with a higher die while pieces remain behind")]
    CheckersBehind,

    #[error("Move distance {distance} does not match die value {die}")]
    DistanceMismatch { distance: i16, die: u8 },

    // === Turn flow ===
    #[error("The game is not in progress")]
    GameNotInProgress,

    #[error("The match is already over")]
    MatchFinished,

    #[error("The current game has not finished")]
    GameStillInProgress,

    #[error("Not your turn")]
    NotYourTurn,

    #[error("Roll the dice before moving")]
    DiceNotRolled,

    #[error("Dice already rolled this turn")]
    AlreadyRolled,

    #[error("A double is pending and must be answered first")]
    AwaitingDoubleResponse,

    // === Cube ===
    #[error("A double is already pending")]
    DoubleAlreadyPending,

    #[error("Doubling is not allowed during the Crawford game")]
    CrawfordGame,

    #[error("Only the cube owner can double")]
    NotCubeOwner,

    #[error("Doubles must be offered before rolling")]
    MustDoubleBeforeRolling,

    #[error("No double pending")]
    NoDoublePending,

    #[error("Cannot respond to your own double")]
    OwnDouble,

    #[error("Beaver and raccoon require accepting, and only one of them may be chosen")]
    MalformedResponse,

    #[error("Beaver rule is not enabled")]
    BeaverNotEnabled,

    #[error("Raccoon rule is not enabled")]
    RaccoonNotEnabled,

    #[error("Cannot resign while a double is pending")]
    ResignDuringDouble,
}

/// Outcome of validating a move: `Ok(())` when legal.
pub type ValidationResult = Result<(), RuleViolation>;
