//! Doubling cube integration tests.
//!
//! These tests exercise the cube through `MatchState`, so the turn and
//! dice preconditions are checked alongside the cube rules themselves.

use gammon_rules::board::{BoardBuilder, BoardState, DiceState};
use gammon_rules::core::{Color, MatchConfig, MatchRules};
use gammon_rules::cube::{CubeAction, DoubleResponse};
use gammon_rules::match_play::{GameEnd, MatchState, MatchStatus, TurnPhase};
use gammon_rules::rules::RuleViolation;

fn config_with(rules: MatchRules) -> MatchConfig {
    MatchConfig::match_to(15).with_rules(rules)
}

fn chained_rules() -> MatchRules {
    MatchRules::default().with_beaver(true).with_raccoon(true)
}

fn white_to_roll(rules: MatchRules) -> MatchState {
    MatchState::from_position(&config_with(rules), BoardState::initial(), Color::White).unwrap()
}

// =============================================================================
// Offer Tests
// =============================================================================

/// Only the player to move, before rolling, may double.
#[test]
fn test_offer_preconditions() {
    let state = white_to_roll(MatchRules::default());

    assert_eq!(state.offer_double(Color::Black), Err(RuleViolation::NotYourTurn));

    let rolled = state
        .roll_with(Color::White, DiceState::from_values(4, 2).unwrap())
        .unwrap();
    assert_eq!(rolled.phase(), TurnPhase::Moving);
    assert_eq!(
        rolled.offer_double(Color::White),
        Err(RuleViolation::MustDoubleBeforeRolling)
    );

    let pending = state.offer_double(Color::White).unwrap();
    assert_eq!(
        pending.offer_double(Color::White),
        Err(RuleViolation::DoubleAlreadyPending)
    );
}

/// After a take the cube belongs to the taker.
#[test]
fn test_owner_doubles_next() {
    let state = white_to_roll(MatchRules::default())
        .offer_double(Color::White)
        .unwrap()
        .respond_to_double(Color::Black, DoubleResponse::Take)
        .unwrap();
    assert!(!state.can_offer_double(Color::Black));

    // White plays a turn; now black is to roll and owns the cube.
    let mut state = state
        .roll_with(Color::White, DiceState::from_values(3, 1).unwrap())
        .unwrap();
    while state.current_player() == Color::White {
        let mv = state.legal_moves()[0];
        state = state.make_move(&mv).unwrap();
    }
    assert!(state.can_offer_double(Color::Black));

    let redoubled = state.offer_double(Color::Black).unwrap();
    let state = redoubled
        .respond_to_double(Color::White, DoubleResponse::Take)
        .unwrap();
    assert_eq!(state.cube().level(), 4);
    assert_eq!(state.cube().owner(), Some(Color::White));
    assert_eq!(state.cube().history().len(), 4);
}

/// Once the cube is owned, the other side cannot turn it.
#[test]
fn test_not_owner() {
    // Black doubles, white takes and owns the cube at 2.
    let state = MatchState::from_position(
        &config_with(MatchRules::default()),
        BoardState::initial(),
        Color::Black,
    )
    .unwrap()
    .offer_double(Color::Black)
    .unwrap()
    .respond_to_double(Color::White, DoubleResponse::Take)
    .unwrap()
    .roll_with(Color::Black, DiceState::from_values(6, 5).unwrap())
    .unwrap();

    let mut state = state;
    while state.current_player() == Color::Black {
        let mv = state.legal_moves()[0];
        state = state.make_move(&mv).unwrap();
    }
    assert_eq!(state.cube().owner(), Some(Color::White));
    assert!(state.can_offer_double(Color::White));

    let mut state = state
        .roll_with(Color::White, DiceState::from_values(2, 1).unwrap())
        .unwrap();
    while state.current_player() == Color::White {
        let mv = state.legal_moves()[0];
        state = state.make_move(&mv).unwrap();
    }
    assert_eq!(state.offer_double(Color::Black), Err(RuleViolation::NotCubeOwner));
}

// =============================================================================
// Response Tests
// =============================================================================

/// Raccoon from level 1: level 8, owned by the original taker, three log entries.
#[test]
fn test_raccoon_chain() {
    let state = white_to_roll(chained_rules())
        .offer_double(Color::White)
        .unwrap()
        .respond_with_flags(Color::Black, true, false, true)
        .unwrap();

    let cube = state.cube();
    assert_eq!(cube.level(), 8);
    assert_eq!(cube.owner(), Some(Color::Black));
    assert!(!cube.is_centered());
    assert!(!cube.double_pending());

    let log: Vec<_> = cube.history().iter().map(|e| (e.by, e.action, e.level, e.owner)).collect();
    assert_eq!(
        log,
        vec![
            (Color::White, CubeAction::Double, 2, None),
            (Color::Black, CubeAction::Beaver, 4, Some(Color::White)),
            (Color::White, CubeAction::Raccoon, 8, Some(Color::Black)),
        ]
    );

    // Play resumes with the offerer to roll.
    assert_eq!(state.current_player(), Color::White);
    assert_eq!(state.phase(), TurnPhase::AwaitingRoll);
}

/// Beaver leaves the cube with the original doubler at 4.
#[test]
fn test_beaver() {
    let state = white_to_roll(chained_rules())
        .offer_double(Color::White)
        .unwrap()
        .respond_with_flags(Color::Black, true, true, false)
        .unwrap();
    assert_eq!(state.cube().level(), 4);
    assert_eq!(state.cube().owner(), Some(Color::White));
}

/// Passing pays the level from before the offer.
#[test]
fn test_pass_pays_pre_double_level() {
    let state = white_to_roll(MatchRules::default())
        .offer_double(Color::White)
        .unwrap()
        .respond_to_double(Color::Black, DoubleResponse::Take)
        .unwrap();
    assert_eq!(state.cube().level(), 2);

    let mut state = state
        .roll_with(Color::White, DiceState::from_values(6, 1).unwrap())
        .unwrap();
    while state.current_player() == Color::White {
        let mv = state.legal_moves()[0];
        state = state.make_move(&mv).unwrap();
    }

    let state = state
        .offer_double(Color::Black)
        .unwrap()
        .respond_to_double(Color::White, DoubleResponse::Pass)
        .unwrap();

    assert_eq!(state.score()[Color::Black], 2);
    match state.status() {
        MatchStatus::GameOver(result) => {
            assert_eq!(result.winner, Color::Black);
            assert_eq!(result.end, GameEnd::DoublePassed);
            assert_eq!(result.points, 2);
        }
        other => panic!("unexpected status {other:?}"),
    }
    assert_eq!(state.cube().history().back().unwrap().action, CubeAction::Pass);
}

/// Flag combinations that name no response are rejected.
#[test]
fn test_malformed_flags() {
    let pending = white_to_roll(chained_rules()).offer_double(Color::White).unwrap();
    for (accept, beaver, raccoon) in [(true, true, true), (false, true, false), (false, false, true)] {
        assert_eq!(
            pending.respond_with_flags(Color::Black, accept, beaver, raccoon),
            Err(RuleViolation::MalformedResponse)
        );
    }
}

/// Beaver and raccoon need their rules switched on.
#[test]
fn test_variant_rules_required() {
    let pending = white_to_roll(MatchRules::default()).offer_double(Color::White).unwrap();
    assert_eq!(
        pending.respond_to_double(Color::Black, DoubleResponse::Beaver),
        Err(RuleViolation::BeaverNotEnabled)
    );

    let beaver_only = white_to_roll(MatchRules::default().with_beaver(true))
        .offer_double(Color::White)
        .unwrap();
    assert_eq!(
        beaver_only.respond_to_double(Color::Black, DoubleResponse::Raccoon),
        Err(RuleViolation::RaccoonNotEnabled)
    );
    assert!(beaver_only.respond_to_double(Color::Black, DoubleResponse::Beaver).is_ok());
}

/// The offerer cannot answer their own double, and nobody answers a
/// double that was never offered.
#[test]
fn test_response_out_of_turn() {
    let state = white_to_roll(MatchRules::default());
    assert_eq!(
        state.respond_to_double(Color::Black, DoubleResponse::Take),
        Err(RuleViolation::NoDoublePending)
    );

    let pending = state.offer_double(Color::White).unwrap();
    assert_eq!(
        pending.respond_to_double(Color::White, DoubleResponse::Take),
        Err(RuleViolation::OwnDouble)
    );
}

/// Moves are refused while a double waits for its answer.
#[test]
fn test_no_moves_while_pending() {
    let board = BoardBuilder::new()
        .place(Color::White, 0, 15)
        .place(Color::Black, 23, 15)
        .build()
        .unwrap();
    let pending = MatchState::from_position(&config_with(MatchRules::default()), board, Color::White)
        .unwrap()
        .offer_double(Color::White)
        .unwrap();
    assert!(pending.legal_moves().is_empty());
    assert_eq!(
        pending.roll_with(Color::White, DiceState::from_values(1, 2).unwrap()),
        Err(RuleViolation::AwaitingDoubleResponse)
    );
}
