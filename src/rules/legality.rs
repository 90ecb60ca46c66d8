//! Move legality: pure functions over board and dice snapshots.
//!
//! ## Priority rules
//!
//! 1. A checker on the bar must enter before anything else moves.
//! 2. A die is *playable* if some single move uses it. When several die
//!    values are playable, the highest must be played first.
//! 3. A point holding two or more opposing checkers is blocked; a lone
//!    opposing checker (a blot) is hit.
//! 4. Bearing off needs every checker home. A die larger than the
//!    checker's distance only bears off the rearmost checker.
//!
//! Playability is judged one die at a time, not by searching full
//! sequences: a die that only becomes playable after another is moved
//! does not count. `calculate_available_moves` and `validate_move` share
//! this judgement, so they always agree.

use std::convert::Infallible;
use std::ops::ControlFlow;

use smallvec::SmallVec;

use super::violation::{RuleViolation, ValidationResult};
use crate::board::{BoardState, DiceState, Location, Move, PipCount, Point};
use crate::core::Color;

/// Standard starting position.
#[must_use]
pub fn create_initial_board() -> BoardState {
    BoardState::initial()
}

/// Check a proposed move against the board and dice.
///
/// Checks run in a fixed order and the first failure is reported.
pub fn validate_move(mv: &Move, board: &BoardState, dice: &DiceState) -> ValidationResult {
    let player = mv.player();
    let die = mv.die();

    if !dice.has(die) {
        return Err(RuleViolation::DieNotAvailable(die));
    }

    if board.bar(player) > 0 && !mv.is_bar_entry() {
        return Err(RuleViolation::MustEnterFromBar);
    }

    let playable = playable_dice(board, dice, player);
    let Some(&highest) = playable.first() else {
        return Err(RuleViolation::NoLegalMoves);
    };
    if highest > die {
        return Err(RuleViolation::MustUseHighestDie(highest));
    }
    if !playable.contains(&die) {
        return Err(RuleViolation::DieNotPlayable(die));
    }

    match (mv.from(), mv.to()) {
        (Location::Bar, to) => validate_bar_entry(board, player, die, to),
        (Location::Point(from), Location::BorneOff) => validate_bear_off(board, player, die, from),
        (Location::Point(from), Location::Point(to)) => validate_normal(board, player, die, from, to),
        (Location::BorneOff, _) | (_, Location::Bar) => {
            unreachable!("Move constructors reject off-tray sources and bar destinations")
        }
    }
}

fn validate_bar_entry(board: &BoardState, player: Color, die: u8, to: Location) -> ValidationResult {
    if board.bar(player) == 0 {
        return Err(RuleViolation::NothingOnBar);
    }
    let entry = Point::new(player.entry_index(die)).ok_or(RuleViolation::WrongEntryPoint)?;
    if to != Location::Point(entry) {
        return Err(RuleViolation::WrongEntryPoint);
    }
    if !board.is_landable(entry, player) {
        return Err(RuleViolation::BlockedPoint);
    }
    Ok(())
}

fn validate_bear_off(board: &BoardState, player: Color, die: u8, from: Point) -> ValidationResult {
    if !board.all_home(player) {
        return Err(RuleViolation::NotAllHome);
    }
    if !board.owns(from, player) {
        return Err(RuleViolation::NoCheckerAtSource);
    }
    let distance = player.pips_from(from.index());
    let die = die as u32;
    if die < distance {
        return Err(RuleViolation::DieDoesNotBearOff);
    }
    if die > distance && board.has_checkers_behind(player, from) {
        return Err(RuleViolation::CheckersBehind);
    }
    Ok(())
}

fn validate_normal(
    board: &BoardState,
    player: Color,
    die: u8,
    from: Point,
    to: Point,
) -> ValidationResult {
    if !board.owns(from, player) {
        return Err(RuleViolation::NoCheckerAtSource);
    }
    let distance = (to.index() as i16 - from.index() as i16) * player.direction() as i16;
    if distance != die as i16 {
        return Err(RuleViolation::DistanceMismatch { distance, die });
    }
    if !board.is_landable(to, player) {
        return Err(RuleViolation::BlockedPoint);
    }
    Ok(())
}

/// Apply a move that has already been validated.
///
/// Returns a new board; the input is untouched. A blot on the destination
/// goes to its owner's bar.
#[must_use]
pub fn apply_move(mv: &Move, board: &BoardState) -> BoardState {
    let player = mv.player();
    let mut next = *board;

    match mv.from() {
        Location::Bar => next.take_from_bar(player),
        Location::Point(from) => next.take_from_point(from, player),
        Location::BorneOff => unreachable!("moves never start from the off tray"),
    }

    match mv.to() {
        Location::BorneOff => next.bear_off(player),
        Location::Point(to) => {
            let opponent = player.opponent();
            if next.is_blot_of(to, opponent) {
                next.take_from_point(to, opponent);
                next.send_to_bar(opponent);
            }
            next.put_on_point(to, player);
        }
        Location::Bar => unreachable!("moves never end on the bar"),
    }

    next
}

/// Spend one die of `value`. No-op if it is not remaining.
#[must_use]
pub fn use_die(value: u8, dice: &DiceState) -> DiceState {
    dice.use_die(value)
}

/// Every move legal right now for `player`.
///
/// Only the highest playable die contributes moves, matching the
/// highest-die-first check in `validate_move`. Doubles yield each move
/// once. Empty once the game has a winner.
#[must_use]
pub fn calculate_available_moves(player: Color, board: &BoardState, dice: &DiceState) -> Vec<Move> {
    let mut moves = Vec::new();
    if let Some(&highest) = playable_dice(board, dice, player).first() {
        let walk = visit_moves_for_die(board, player, highest, |mv| {
            moves.push(mv);
            ControlFlow::<Infallible>::Continue(())
        });
        match walk {
            ControlFlow::Continue(()) => {}
            ControlFlow::Break(never) => match never {},
        }
    }
    moves
}

/// The color that has borne off all 15 checkers, if any.
#[must_use]
pub fn check_win_condition(board: &BoardState) -> Option<Color> {
    board.winner()
}

/// Pip counts for both colors.
#[must_use]
pub fn calculate_pip_count(board: &BoardState) -> PipCount {
    board.pip_count()
}

/// Distinct remaining die values with at least one legal move, highest first.
#[must_use]
pub fn playable_dice(board: &BoardState, dice: &DiceState, player: Color) -> SmallVec<[u8; 2]> {
    if board.winner().is_some() {
        return SmallVec::new();
    }
    dice.distinct_desc()
        .into_iter()
        .filter(|&die| has_legal_move_for_die(board, player, die))
        .collect()
}

fn has_legal_move_for_die(board: &BoardState, player: Color, die: u8) -> bool {
    visit_moves_for_die(board, player, die, |_| ControlFlow::Break(())).is_break()
}

/// Walk every single move `player` can make with `die`, stopping early
/// when `visit` breaks.
fn visit_moves_for_die<B>(
    board: &BoardState,
    player: Color,
    die: u8,
    mut visit: impl FnMut(Move) -> ControlFlow<B>,
) -> ControlFlow<B> {
    if board.bar(player) > 0 {
        if let Some(entry) = Point::new(player.entry_index(die)) {
            if board.is_landable(entry, player) {
                visit(Move::new_unchecked(player, Location::Bar, entry.into(), die))?;
            }
        }
        return ControlFlow::Continue(());
    }

    let bearing_off = board.all_home(player);
    for from in board.occupied(player) {
        match from.advance(player, die) {
            Some(to) => {
                if board.is_landable(to, player) {
                    visit(Move::new_unchecked(player, from.into(), to.into(), die))?;
                }
            }
            None => {
                if bearing_off && bear_off_allowed(board, player, from, die) {
                    visit(Move::new_unchecked(player, from.into(), Location::BorneOff, die))?;
                }
            }
        }
    }
    ControlFlow::Continue(())
}

/// Exact bear-off, or an oversized die from the rearmost home checker.
fn bear_off_allowed(board: &BoardState, player: Color, from: Point, die: u8) -> bool {
    let distance = player.pips_from(from.index());
    let die = die as u32;
    die == distance || (die > distance && !board.has_checkers_behind(player, from))
}
