//! Match state machine.
//!
//! `MatchState` is the unit a caller persists per match. Every action
//! takes the current snapshot by reference and returns either a new
//! snapshot or the `RuleViolation` that blocked it; the input snapshot is
//! never changed, so a rejected action leaves nothing to roll back.
//!
//! ## Game Loop
//!
//! ```text
//! start ─▶ opening roll ─▶ Moving ──moves──▶ turn over ─▶ AwaitingRoll ─┐
//!                            ▲                                          │
//!                            └────────────── roll ◀── (offer double) ◀──┘
//! ```
//!
//! A game ends on the last checker borne off, a passed double, a
//! resignation or a forfeit. `start_next_game` begins the next one until
//! a side reaches the match length. Money games never finish.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument};

use super::crawford::CrawfordState;
use super::scoring::{game_points, GameEnd, GameResult, ResignationType, WinKind};
use crate::board::dice::RawDice;
use crate::board::state::RawBoard;
use crate::board::{roll_dice, roll_opening, BoardState, DiceState, Move, PipCount};
use crate::core::{Color, ColorMap, EngineError, GameRng, MatchConfig, MatchRules};
use crate::cube::{self, CubeResolution, CubeSnapshot, DoubleResponse};
use crate::rules::{self, Destinations, RuleViolation, RulesEngine, StandardRules};

/// Where the player to act is within their turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Dice not yet rolled. The cube may be turned now.
    AwaitingRoll,
    /// Dice rolled, moves to play.
    Moving,
}

/// Progress of the match as a whole.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// A game is under way.
    Playing,
    /// A game just ended; `start_next_game` begins the next.
    GameOver(GameResult),
    /// The last game decided the match.
    Finished(GameResult),
}

/// One applied move in the match log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Game number within the match (starts at 1).
    pub game: u32,
    /// Turn number within the game (starts at 1).
    pub turn: u32,
    pub mv: Move,
}

/// Complete state of a match.
///
/// Histories use `im::Vector`, so cloning a snapshot for the next
/// transition shares them instead of copying.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "MatchRecord")]
pub struct MatchState {
    // === Configuration ===
    match_length: Option<u32>,
    rules: MatchRules,

    // === Current Game ===
    board: BoardState,
    dice: Option<DiceState>,
    cube: CubeSnapshot,
    current_player: Color,
    phase: TurnPhase,
    game_number: u32,
    turn: u32,

    // === Match Progress ===
    score: ColorMap<u32>,
    crawford: CrawfordState,
    status: MatchStatus,
    games: Vector<GameResult>,
    move_history: Vector<MoveRecord>,
}

/// Stored form of a [`MatchState`] before its snapshots are checked.
/// Field order matches `MatchState` so both share one encoding.
#[doc(hidden)]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MatchRecord {
    match_length: Option<u32>,
    rules: MatchRules,
    board: RawBoard,
    dice: Option<RawDice>,
    cube: CubeSnapshot,
    current_player: Color,
    phase: TurnPhase,
    game_number: u32,
    turn: u32,
    score: ColorMap<u32>,
    crawford: CrawfordState,
    status: MatchStatus,
    games: Vector<GameResult>,
    move_history: Vector<MoveRecord>,
}

impl TryFrom<MatchRecord> for MatchState {
    type Error = EngineError;

    fn try_from(record: MatchRecord) -> Result<Self, Self::Error> {
        let board = BoardState::try_from(record.board)?;
        let dice = record.dice.map(DiceState::try_from).transpose()?;
        record.cube.check_integrity()?;
        if record.cube.double_pending() && record.status != MatchStatus::Playing {
            error!(status = ?record.status, "double pending outside a game in progress");
            return Err(EngineError::StrayDoubleOffer);
        }
        Ok(Self {
            match_length: record.match_length,
            rules: record.rules,
            board,
            dice,
            cube: record.cube,
            current_player: record.current_player,
            phase: record.phase,
            game_number: record.game_number,
            turn: record.turn,
            score: record.score,
            crawford: record.crawford,
            status: record.status,
            games: record.games,
            move_history: record.move_history,
        })
    }
}

fn log_rejection(violation: &RuleViolation) {
    debug!(%violation, "action rejected");
}

impl MatchState {
    /// Start a match on the dice stream the config describes, returning
    /// the stream so the caller can keep rolling from it.
    pub fn start(config: &MatchConfig) -> Result<(Self, GameRng), EngineError> {
        let mut rng = config.rng();
        let state = Self::new(config, &mut rng)?;
        Ok((state, rng))
    }

    /// Start a match: standard position, opening roll decides who moves.
    #[instrument(skip_all, fields(length = ?config.match_length))]
    pub fn new(config: &MatchConfig, rng: &mut GameRng) -> Result<Self, EngineError> {
        config.validate()?;
        let mut state = Self::blank(config, BoardState::initial(), Color::White);
        state.open_game(rng);
        info!(first = %state.current_player, "match started");
        Ok(state)
    }

    /// Start a match from an arbitrary position with `to_move` about to
    /// roll. Used for analysis, puzzles and tests.
    pub fn from_position(
        config: &MatchConfig,
        board: BoardState,
        to_move: Color,
    ) -> Result<Self, EngineError> {
        config.validate()?;
        board.check_integrity()?;
        Ok(Self::blank(config, board, to_move))
    }

    fn blank(config: &MatchConfig, board: BoardState, to_move: Color) -> Self {
        Self {
            match_length: config.match_length,
            rules: config.rules,
            board,
            dice: None,
            cube: CubeSnapshot::centered(),
            current_player: to_move,
            phase: TurnPhase::AwaitingRoll,
            game_number: 1,
            turn: 1,
            score: ColorMap::default(),
            crawford: CrawfordState::new(config.crawford_enabled()),
            status: MatchStatus::Playing,
            games: Vector::new(),
            move_history: Vector::new(),
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Dice for the current turn, `None` before the roll.
    #[must_use]
    pub fn dice(&self) -> Option<&DiceState> {
        self.dice.as_ref()
    }

    #[must_use]
    pub fn cube(&self) -> &CubeSnapshot {
        &self.cube
    }

    #[must_use]
    pub fn crawford(&self) -> &CrawfordState {
        &self.crawford
    }

    #[must_use]
    pub fn score(&self) -> &ColorMap<u32> {
        &self.score
    }

    /// `None` for a money game.
    #[must_use]
    pub fn match_length(&self) -> Option<u32> {
        self.match_length
    }

    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        &self.rules
    }

    /// The player to act. While a double is pending this is the offerer;
    /// the response comes from their opponent.
    #[must_use]
    pub fn current_player(&self) -> Color {
        self.current_player
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    #[must_use]
    pub fn status(&self) -> &MatchStatus {
        &self.status
    }

    #[must_use]
    pub fn game_number(&self) -> u32 {
        self.game_number
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Finished games, oldest first.
    #[must_use]
    pub fn games(&self) -> &Vector<GameResult> {
        &self.games
    }

    /// Every applied move of the match, oldest first.
    #[must_use]
    pub fn move_history(&self) -> &Vector<MoveRecord> {
        &self.move_history
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.status, MatchStatus::Finished(_))
    }

    /// Winner of the match once it is finished.
    #[must_use]
    pub fn match_winner(&self) -> Option<Color> {
        match self.status {
            MatchStatus::Finished(result) => Some(result.winner),
            _ => None,
        }
    }

    #[must_use]
    pub fn pip_count(&self) -> PipCount {
        rules::calculate_pip_count(&self.board)
    }

    /// Moves the current player may make right now.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<Move> {
        match self.live_dice() {
            Some(dice) => rules::calculate_available_moves(self.current_player, &self.board, dice),
            None => Vec::new(),
        }
    }

    /// Legal destinations grouped by source, for move highlighting.
    #[must_use]
    pub fn legal_destinations(&self) -> Destinations {
        match self.live_dice() {
            Some(dice) => StandardRules.legal_destinations(self.current_player, &self.board, dice),
            None => Destinations::default(),
        }
    }

    /// Whether `player` may offer a double right now.
    #[must_use]
    pub fn can_offer_double(&self, player: Color) -> bool {
        self.check_can_double(player).is_ok()
    }

    fn live_dice(&self) -> Option<&DiceState> {
        if self.status != MatchStatus::Playing || self.cube.double_pending() {
            return None;
        }
        self.dice.as_ref()
    }

    // === Actions ===

    /// Roll the dice for `player`'s turn.
    ///
    /// A roll with no legal move passes the turn straight away.
    #[instrument(skip_all, fields(player = %player, game = self.game_number, turn = self.turn))]
    pub fn roll(&self, player: Color, rng: &mut GameRng) -> Result<Self, RuleViolation> {
        self.check_can_roll(player).inspect_err(log_rejection)?;
        Ok(self.after_roll(roll_dice(rng)))
    }

    /// Same as `roll`, with dice supplied by the caller (replays, physical dice).
    #[instrument(skip_all, fields(player = %player, game = self.game_number, turn = self.turn))]
    pub fn roll_with(&self, player: Color, dice: DiceState) -> Result<Self, RuleViolation> {
        self.check_can_roll(player).inspect_err(log_rejection)?;
        Ok(self.after_roll(dice))
    }

    /// Play one checker.
    #[instrument(skip_all, fields(mv = %mv, game = self.game_number, turn = self.turn))]
    pub fn make_move(&self, mv: &Move) -> Result<Self, RuleViolation> {
        let dice = self.check_can_move(mv).inspect_err(log_rejection)?;

        let player = mv.player();
        let mut next = self.clone();
        next.board = rules::apply_move(mv, &self.board);
        next.move_history.push_back(MoveRecord {
            game: self.game_number,
            turn: self.turn,
            mv: *mv,
        });
        let dice = rules::use_die(mv.die(), dice);

        if let Some(winner) = rules::check_win_condition(&next.board) {
            let kind = WinKind::assess(&next.board, winner.opponent());
            let points = next.points_for(kind);
            next.finish_game(winner, kind, GameEnd::BoreOff, points);
        } else if dice.is_exhausted()
            || rules::calculate_available_moves(player, &next.board, &dice).is_empty()
        {
            next.end_turn();
        } else {
            next.dice = Some(dice);
        }
        Ok(next)
    }

    /// Offer a double before rolling.
    #[instrument(skip_all, fields(player = %player, game = self.game_number))]
    pub fn offer_double(&self, player: Color) -> Result<Self, RuleViolation> {
        self.check_can_double(player).inspect_err(log_rejection)?;
        let cube = cube::offer_double(&self.cube, player).inspect_err(log_rejection)?;

        info!(level = cube.level().saturating_mul(2), "double offered");
        Ok(Self { cube, ..self.clone() })
    }

    /// Answer the pending double.
    #[instrument(skip_all, fields(player = %player, response = ?response, game = self.game_number))]
    pub fn respond_to_double(
        &self,
        player: Color,
        response: DoubleResponse,
    ) -> Result<Self, RuleViolation> {
        self.check_in_progress().inspect_err(log_rejection)?;
        let resolution = cube::respond_to_double(&self.cube, player, response, &self.rules)
            .inspect_err(log_rejection)?;

        let mut next = self.clone();
        match resolution {
            CubeResolution::Accepted(cube) => {
                info!(level = cube.level(), owner = ?cube.owner(), "double accepted");
                next.cube = cube;
            }
            CubeResolution::Declined { cube, winner, points } => {
                info!(%winner, points, "double passed");
                next.cube = cube;
                next.finish_game(winner, WinKind::Single, GameEnd::DoublePassed, points);
            }
        }
        Ok(next)
    }

    /// Answer the pending double from `(accept, beaver, raccoon)` flags.
    pub fn respond_with_flags(
        &self,
        player: Color,
        accept: bool,
        beaver: bool,
        raccoon: bool,
    ) -> Result<Self, RuleViolation> {
        let response =
            DoubleResponse::from_flags(accept, beaver, raccoon).inspect_err(log_rejection)?;
        self.respond_to_double(player, response)
    }

    /// Concede the game at the declared value. Either player may resign
    /// at any point except while a double is waiting for an answer.
    #[instrument(skip_all, fields(player = %player, resignation = ?resignation, game = self.game_number))]
    pub fn resign(&self, player: Color, resignation: ResignationType) -> Result<Self, RuleViolation> {
        self.check_in_progress().inspect_err(log_rejection)?;
        if self.cube.double_pending() {
            log_rejection(&RuleViolation::ResignDuringDouble);
            return Err(RuleViolation::ResignDuringDouble);
        }

        let kind = resignation.kind();
        let mut next = self.clone();
        let points = next.points_for(kind);
        next.finish_game(player.opponent(), kind, GameEnd::Resigned(resignation), points);
        Ok(next)
    }

    /// End the game against `player` (clock expiry, abandonment) at the
    /// value the current position supports. A pending double lapses.
    #[instrument(skip_all, fields(player = %player, game = self.game_number))]
    pub fn forfeit(&self, player: Color) -> Result<Self, RuleViolation> {
        self.check_in_progress().inspect_err(log_rejection)?;

        let kind = WinKind::assess(&self.board, player);
        let mut next = self.clone();
        next.cube.offered_by = None;
        let points = next.points_for(kind);
        next.finish_game(player.opponent(), kind, GameEnd::Forfeited, points);
        Ok(next)
    }

    /// Begin the next game of the match.
    ///
    /// Board and cube reset; a pending Crawford game starts here.
    #[instrument(skip_all, fields(game = self.game_number + 1))]
    pub fn start_next_game(&self, rng: &mut GameRng) -> Result<Self, RuleViolation> {
        match self.status {
            MatchStatus::Playing => {
                log_rejection(&RuleViolation::GameStillInProgress);
                return Err(RuleViolation::GameStillInProgress);
            }
            MatchStatus::Finished(_) => {
                log_rejection(&RuleViolation::MatchFinished);
                return Err(RuleViolation::MatchFinished);
            }
            MatchStatus::GameOver(_) => {}
        }

        let mut next = self.clone();
        next.board = BoardState::initial();
        next.cube = CubeSnapshot::centered();
        next.game_number += 1;
        next.turn = 1;
        next.status = MatchStatus::Playing;
        next.open_game(rng);
        info!(
            first = %next.current_player,
            crawford = next.crawford.is_active(),
            "game started"
        );
        Ok(next)
    }

    // === Persistence ===

    /// Serialize for storage.
    pub fn encode(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(self)?)
    }

    /// Restore a stored snapshot, re-checking board, dice and cube.
    pub fn decode(bytes: &[u8]) -> Result<Self, EngineError> {
        let record: MatchRecord = bincode::deserialize(bytes).map_err(|err| {
            error!(%err, "undecodable match snapshot");
            EngineError::from(err)
        })?;
        Self::try_from(record)
    }

    // === Checks ===

    fn check_in_progress(&self) -> Result<(), RuleViolation> {
        match self.status {
            MatchStatus::Playing => Ok(()),
            MatchStatus::GameOver(_) => Err(RuleViolation::GameNotInProgress),
            MatchStatus::Finished(_) => Err(RuleViolation::MatchFinished),
        }
    }

    fn check_turn(&self, player: Color) -> Result<(), RuleViolation> {
        if player != self.current_player {
            return Err(RuleViolation::NotYourTurn);
        }
        Ok(())
    }

    fn check_can_roll(&self, player: Color) -> Result<(), RuleViolation> {
        self.check_in_progress()?;
        if self.cube.double_pending() {
            return Err(RuleViolation::AwaitingDoubleResponse);
        }
        self.check_turn(player)?;
        if self.phase == TurnPhase::Moving {
            return Err(RuleViolation::AlreadyRolled);
        }
        Ok(())
    }

    fn check_can_move(&self, mv: &Move) -> Result<&DiceState, RuleViolation> {
        self.check_in_progress()?;
        if self.cube.double_pending() {
            return Err(RuleViolation::AwaitingDoubleResponse);
        }
        self.check_turn(mv.player())?;
        let dice = match (self.phase, &self.dice) {
            (TurnPhase::Moving, Some(dice)) => dice,
            _ => return Err(RuleViolation::DiceNotRolled),
        };
        rules::validate_move(mv, &self.board, dice)?;
        Ok(dice)
    }

    fn check_can_double(&self, player: Color) -> Result<(), RuleViolation> {
        self.check_in_progress()?;
        self.check_turn(player)?;
        if self.phase == TurnPhase::Moving {
            return Err(RuleViolation::MustDoubleBeforeRolling);
        }
        if self.cube.double_pending() {
            return Err(RuleViolation::DoubleAlreadyPending);
        }
        if self.crawford.is_active() {
            return Err(RuleViolation::CrawfordGame);
        }
        cube::check_can_offer(&self.cube, player)
    }

    // === Transitions (on a fresh clone only) ===

    fn open_game(&mut self, rng: &mut GameRng) {
        let (first, dice) = roll_opening(rng);
        debug!(%first, dice = ?dice.dice(), "opening roll");
        self.current_player = first;
        self.begin_moving(dice);
    }

    fn after_roll(&self, dice: DiceState) -> Self {
        debug!(dice = ?dice.dice(), "rolled");
        let mut next = self.clone();
        next.begin_moving(dice);
        next
    }

    fn begin_moving(&mut self, dice: DiceState) {
        if rules::calculate_available_moves(self.current_player, &self.board, &dice).is_empty() {
            debug!(player = %self.current_player, dice = ?dice.dice(), "no legal moves, turn passes");
            self.end_turn();
            return;
        }
        self.dice = Some(dice);
        self.phase = TurnPhase::Moving;
    }

    fn end_turn(&mut self) {
        self.dice = None;
        self.phase = TurnPhase::AwaitingRoll;
        self.current_player = self.current_player.opponent();
        self.turn += 1;
        debug!(next = %self.current_player, turn = self.turn, "turn over");
    }

    fn points_for(&self, kind: WinKind) -> u32 {
        game_points(kind, &self.cube, &self.rules, self.match_length)
    }

    fn finish_game(&mut self, winner: Color, kind: WinKind, end: GameEnd, points: u32) {
        let result = GameResult {
            winner,
            kind,
            end,
            cube_level: self.cube.level(),
            points,
        };
        self.score[winner] = self.score[winner].saturating_add(points);
        self.crawford = self.crawford.on_game_end(&self.score, self.match_length);
        self.dice = None;
        self.phase = TurnPhase::AwaitingRoll;
        self.games.push_back(result);

        let match_over = self
            .match_length
            .is_some_and(|length| self.score[winner] >= length);
        self.status = if match_over {
            MatchStatus::Finished(result)
        } else {
            MatchStatus::GameOver(result)
        };

        info!(
            %winner,
            ?kind,
            ?end,
            points,
            white = self.score[Color::White],
            black = self.score[Color::Black],
            match_over,
            "game over"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardBuilder;

    fn seeded_match(length: u32, seed: u64) -> (MatchState, GameRng) {
        let mut rng = GameRng::new(seed);
        let state = MatchState::new(&MatchConfig::match_to(length), &mut rng).unwrap();
        (state, rng)
    }

    /// Race position: white one checker from home, black far away.
    fn race_board() -> BoardState {
        BoardBuilder::new()
            .place(Color::White, 23, 1)
            .off(Color::White, 14)
            .place(Color::Black, 5, 15)
            .build()
            .unwrap()
    }

    fn dice(a: u8, b: u8) -> DiceState {
        DiceState::from_values(a, b).unwrap()
    }

    #[test]
    fn test_new_match_opens_with_dice() {
        let (state, _) = seeded_match(5, 1);
        assert_eq!(state.status(), &MatchStatus::Playing);
        assert_eq!(state.phase(), TurnPhase::Moving);
        let roll = state.dice().unwrap();
        assert!(!roll.is_doubles());
        assert!(!state.legal_moves().is_empty());
        assert_eq!(state.game_number(), 1);
        assert_eq!(state.turn(), 1);
    }

    #[test]
    fn test_zero_length_rejected() {
        let mut rng = GameRng::new(1);
        assert!(matches!(
            MatchState::new(&MatchConfig::match_to(0), &mut rng),
            Err(EngineError::ZeroMatchLength)
        ));
    }

    #[test]
    fn test_cannot_roll_twice() {
        let (state, mut rng) = seeded_match(5, 2);
        let player = state.current_player();
        assert_eq!(state.roll(player, &mut rng), Err(RuleViolation::AlreadyRolled));
        assert_eq!(
            state.roll(player.opponent(), &mut rng),
            Err(RuleViolation::NotYourTurn)
        );
    }

    #[test]
    fn test_move_out_of_turn() {
        let (state, _) = seeded_match(5, 3);
        let mv = state.legal_moves()[0];
        let other = Move::new(mv.player().opponent(), mv.from(), mv.to(), mv.die()).unwrap();
        assert_eq!(state.make_move(&other), Err(RuleViolation::NotYourTurn));
    }

    #[test]
    fn test_turn_passes_when_dice_spent() {
        let (mut state, _) = seeded_match(5, 4);
        let player = state.current_player();
        while state.current_player() == player {
            let mv = state.legal_moves()[0];
            state = state.make_move(&mv).unwrap();
        }
        assert_eq!(state.phase(), TurnPhase::AwaitingRoll);
        assert!(state.dice().is_none());
        assert_eq!(state.turn(), 2);
        assert_eq!(state.move_history().len(), 2);
    }

    #[test]
    fn test_rejected_action_leaves_state() {
        let (state, _) = seeded_match(5, 5);
        let before = state.clone();
        let bogus = Move::from_indices(state.current_player(), 24, 0, 1).unwrap();
        assert!(state.make_move(&bogus).is_err());
        assert_eq!(state, before);
    }

    #[test]
    fn test_bear_off_wins_gammon() {
        let config = MatchConfig::match_to(5);
        let state = MatchState::from_position(&config, race_board(), Color::White).unwrap();
        let state = state.roll_with(Color::White, dice(3, 2)).unwrap();

        let mv = state.legal_moves()[0];
        assert!(mv.is_bear_off());
        let state = state.make_move(&mv).unwrap();

        match state.status() {
            MatchStatus::GameOver(result) => {
                assert_eq!(result.winner, Color::White);
                assert_eq!(result.kind, WinKind::Gammon);
                assert_eq!(result.end, GameEnd::BoreOff);
                assert_eq!(result.points, 2);
            }
            other => panic!("unexpected status {other:?}"),
        }
        assert_eq!(state.score()[Color::White], 2);
        assert!(state.legal_moves().is_empty());
    }

    #[test]
    fn test_double_blocks_play_until_answered() {
        let config = MatchConfig::match_to(5);
        let state = MatchState::from_position(&config, BoardState::initial(), Color::White).unwrap();
        let state = state.offer_double(Color::White).unwrap();

        assert_eq!(state.cube().level(), 1);
        assert_eq!(
            state.roll_with(Color::White, dice(3, 1)),
            Err(RuleViolation::AwaitingDoubleResponse)
        );
        assert_eq!(
            state.resign(Color::Black, ResignationType::Single),
            Err(RuleViolation::ResignDuringDouble)
        );

        let state = state.respond_to_double(Color::Black, DoubleResponse::Take).unwrap();
        assert_eq!(state.cube().level(), 2);
        assert_eq!(state.cube().owner(), Some(Color::Black));
        assert_eq!(state.current_player(), Color::White);
        assert!(state.roll_with(Color::White, dice(3, 1)).is_ok());
    }

    #[test]
    fn test_double_after_roll_rejected() {
        let config = MatchConfig::match_to(5);
        let state = MatchState::from_position(&config, BoardState::initial(), Color::Black).unwrap();
        let state = state.roll_with(Color::Black, dice(6, 5)).unwrap();
        assert_eq!(
            state.offer_double(Color::Black),
            Err(RuleViolation::MustDoubleBeforeRolling)
        );
        assert!(!state.can_offer_double(Color::Black));
    }

    #[test]
    fn test_pass_ends_game() {
        let config = MatchConfig::match_to(5);
        let state = MatchState::from_position(&config, BoardState::initial(), Color::White).unwrap();
        let state = state
            .offer_double(Color::White)
            .and_then(|s| s.respond_with_flags(Color::Black, false, false, false))
            .unwrap();

        assert_eq!(state.score()[Color::White], 1);
        match state.status() {
            MatchStatus::GameOver(result) => assert_eq!(result.end, GameEnd::DoublePassed),
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_forfeit_scores_position() {
        let config = MatchConfig::match_to(7);
        let state = MatchState::from_position(&config, race_board(), Color::Black).unwrap();
        let state = state.forfeit(Color::Black).unwrap();
        match state.status() {
            MatchStatus::GameOver(result) => {
                assert_eq!(result.winner, Color::White);
                assert_eq!(result.kind, WinKind::Gammon);
                assert_eq!(result.end, GameEnd::Forfeited);
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_forfeit_lapses_pending_double() {
        let config = MatchConfig::match_to(7);
        let state = MatchState::from_position(&config, race_board(), Color::White).unwrap();
        let state = state.offer_double(Color::White).unwrap();
        let state = state.forfeit(Color::Black).unwrap();
        assert!(!state.cube().double_pending());
        assert_eq!(state.cube().level(), 1);
        assert_eq!(state.score()[Color::White], 2);
    }

    #[test]
    fn test_next_game_resets() {
        let (state, mut rng) = seeded_match(5, 6);
        assert_eq!(
            state.start_next_game(&mut rng),
            Err(RuleViolation::GameStillInProgress)
        );

        let state = state.resign(Color::White, ResignationType::Single).unwrap();
        assert_eq!(state.roll(Color::White, &mut rng), Err(RuleViolation::GameNotInProgress));

        let state = state.start_next_game(&mut rng).unwrap();
        assert_eq!(state.game_number(), 2);
        assert_eq!(state.board(), &BoardState::initial());
        assert!(state.cube().is_centered());
        assert!(state.cube().history().is_empty());
        assert_eq!(state.score()[Color::Black], 1);
        assert_eq!(state.games().len(), 1);
    }

    #[test]
    fn test_finished_match_rejects_everything() {
        let (state, mut rng) = seeded_match(1, 7);
        let state = state.resign(Color::Black, ResignationType::Single).unwrap();
        assert!(state.is_finished());
        assert_eq!(state.match_winner(), Some(Color::White));
        assert_eq!(state.start_next_game(&mut rng), Err(RuleViolation::MatchFinished));
        assert_eq!(
            state.resign(Color::White, ResignationType::Single),
            Err(RuleViolation::MatchFinished)
        );
    }

    #[test]
    fn test_encode_decode() {
        let (state, _) = seeded_match(7, 8);
        let mv = state.legal_moves()[0];
        let state = state.make_move(&mv).unwrap();

        let bytes = state.encode().unwrap();
        let restored = MatchState::decode(&bytes).unwrap();
        assert_eq!(restored, state);
    }

    /// Re-encode a stored snapshot after editing its unchecked form.
    fn tampered(state: &MatchState, edit: impl FnOnce(&mut MatchRecord)) -> Vec<u8> {
        let mut record: MatchRecord = bincode::deserialize(&state.encode().unwrap()).unwrap();
        edit(&mut record);
        bincode::serialize(&record).unwrap()
    }

    #[test]
    fn test_decode_rejects_broken_board() {
        let (state, _) = seeded_match(7, 8);
        let bytes = tampered(&state, |record| record.board.positions[0] += 8);
        assert!(matches!(
            MatchState::decode(&bytes),
            Err(EngineError::CheckerCount { color: Color::White, count: 23 })
        ));
    }

    #[test]
    fn test_decode_rejects_inconsistent_dice() {
        let (state, _) = seeded_match(7, 8);
        assert!(state.dice().is_some());
        let bytes = tampered(&state, |record| {
            if let Some(dice) = record.dice.as_mut() {
                dice.remaining.push(0);
            }
        });
        assert!(matches!(
            MatchState::decode(&bytes),
            Err(EngineError::InconsistentDice { .. })
        ));

        let bytes = tampered(&state, |record| {
            if let Some(dice) = record.dice.as_mut() {
                dice.used = [true, true];
            }
        });
        assert!(matches!(
            MatchState::decode(&bytes),
            Err(EngineError::InconsistentDice { .. })
        ));
    }

    #[test]
    fn test_decode_rejects_bad_cube() {
        let pending = MatchState::from_position(&MatchConfig::match_to(7), race_board(), Color::White)
            .unwrap()
            .offer_double(Color::White)
            .unwrap();

        let bytes = tampered(&pending, |record| record.cube.level = 3);
        assert!(matches!(
            MatchState::decode(&bytes),
            Err(EngineError::InvalidCubeLevel(3))
        ));

        let (finished, _) = seeded_match(7, 8);
        let finished = finished.resign(Color::Black, ResignationType::Single).unwrap();
        let status = *finished.status();
        let bytes = tampered(&pending, |record| record.status = status);
        assert!(matches!(
            MatchState::decode(&bytes),
            Err(EngineError::StrayDoubleOffer)
        ));

        assert_eq!(MatchState::decode(&pending.encode().unwrap()).unwrap(), pending);
    }

    #[test]
    fn test_start_uses_config_seed() {
        let config = MatchConfig::match_to(5).with_seed(21);
        let (a, mut rng_a) = MatchState::start(&config).unwrap();
        let (b, mut rng_b) = MatchState::start(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(rng_a.seed(), 21);
        assert_eq!(rng_a.roll_die(), rng_b.roll_die());

        let mut rng = GameRng::new(21);
        assert_eq!(MatchState::new(&config, &mut rng).unwrap(), a);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            MatchState::decode(&[1, 2, 3]),
            Err(EngineError::Encoding(_))
        ));
    }
}
