//! Game results and point values.
//!
//! ## Point value
//!
//! `cube level × kind multiplier`, where the kind is judged from the
//! loser's position when the game ends:
//!
//! | Kind | Multiplier | Loser's position |
//! |---|---|---|
//! | Single | 1 | has borne off at least one checker |
//! | Gammon | 2 | has borne off nothing |
//! | Backgammon | 3 | gammoned, and still on the bar or in the winner's home board |
//!
//! Under the Jacoby rule (money games only) gammons and backgammons count
//! single while the cube has never been turned.

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::core::{Color, MatchRules};
use crate::cube::CubeSnapshot;

/// How decisively a game was won.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WinKind {
    Single,
    Gammon,
    Backgammon,
}

impl WinKind {
    /// Judge the kind of loss from `loser`'s position.
    #[must_use]
    pub fn assess(board: &BoardState, loser: Color) -> Self {
        if board.off(loser) > 0 {
            return WinKind::Single;
        }
        let winner_home = loser.opponent().home_range();
        let in_winner_home = board
            .occupied(loser)
            .any(|point| winner_home.contains(&point.index()));
        if board.bar(loser) > 0 || in_winner_home {
            WinKind::Backgammon
        } else {
            WinKind::Gammon
        }
    }

    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            WinKind::Single => 1,
            WinKind::Gammon => 2,
            WinKind::Backgammon => 3,
        }
    }
}

/// What a resigning player concedes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResignationType {
    Single,
    Gammon,
    Backgammon,
}

impl ResignationType {
    /// The win kind conceded.
    #[must_use]
    pub const fn kind(self) -> WinKind {
        match self {
            ResignationType::Single => WinKind::Single,
            ResignationType::Gammon => WinKind::Gammon,
            ResignationType::Backgammon => WinKind::Backgammon,
        }
    }
}

impl From<WinKind> for ResignationType {
    fn from(kind: WinKind) -> Self {
        match kind {
            WinKind::Single => ResignationType::Single,
            WinKind::Gammon => ResignationType::Gammon,
            WinKind::Backgammon => ResignationType::Backgammon,
        }
    }
}

/// How a game came to an end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameEnd {
    /// The winner bore off their last checker.
    BoreOff,
    /// The loser resigned.
    Resigned(ResignationType),
    /// The loser passed a double.
    DoublePassed,
    /// The loser ran out of time or abandoned the game.
    Forfeited,
}

/// Outcome of one finished game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameResult {
    pub winner: Color,
    pub kind: WinKind,
    pub end: GameEnd,
    /// Cube level the game was played for.
    pub cube_level: u32,
    /// Points awarded to the winner.
    pub points: u32,
}

impl GameResult {
    #[must_use]
    pub fn loser(&self) -> Color {
        self.winner.opponent()
    }
}

/// Whether the Jacoby rule reduces this game to a single.
#[must_use]
pub fn jacoby_applies(rules: &MatchRules, cube: &CubeSnapshot, match_length: Option<u32>) -> bool {
    match_length.is_none() && rules.jacoby && cube.is_centered()
}

/// Points for winning a game of `kind` with the cube as it stands.
#[must_use]
pub fn game_points(
    kind: WinKind,
    cube: &CubeSnapshot,
    rules: &MatchRules,
    match_length: Option<u32>,
) -> u32 {
    let counted = if jacoby_applies(rules, cube, match_length) {
        WinKind::Single
    } else {
        kind
    };
    cube.level().saturating_mul(counted.multiplier())
}
