//! Board snapshot: 24 signed point counts plus bar and off counters.
//!
//! ## BoardState
//!
//! `positions[i] > 0` means white checkers on point `i`, `< 0` black ones.
//! Every color always accounts for exactly 15 checkers across points, bar
//! and off. A `BoardState` is a value: transitions build a new one and the
//! snapshot handed to a caller is never changed.
//!
//! ## BoardBuilder
//!
//! Assembles arbitrary positions (tests, replays, analysis imports) and
//! checks the conservation invariant before handing out a board.

use serde::{Deserialize, Serialize};
use tracing::error;

use super::location::Point;
use crate::core::{Color, ColorMap, EngineError};

/// Checkers per side.
pub const CHECKERS_PER_SIDE: u8 = 15;

/// Standard starting layout, white positive.
const INITIAL_POSITIONS: [i8; 24] = [
    2, 0, 0, 0, 0, -5, //
    0, -3, 0, 0, 0, 5, //
    -5, 0, 0, 0, 3, 0, //
    5, 0, 0, 0, 0, -2,
];

/// Pip counts for both sides.
pub type PipCount = ColorMap<u32>;

/// Immutable board snapshot.
///
/// Deserializing goes through [`BoardState::from_parts`], so a stored
/// board that lost or gained checkers never loads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawBoard")]
pub struct BoardState {
    positions: [i8; 24],
    bar: ColorMap<u8>,
    off: ColorMap<u8>,
}

/// Unchecked serialized form of a [`BoardState`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RawBoard {
    pub(crate) positions: [i8; 24],
    pub(crate) bar: ColorMap<u8>,
    pub(crate) off: ColorMap<u8>,
}

impl TryFrom<RawBoard> for BoardState {
    type Error = EngineError;

    fn try_from(raw: RawBoard) -> Result<Self, Self::Error> {
        Self::from_parts(raw.positions, raw.bar, raw.off)
    }
}

impl BoardState {
    /// The standard starting position.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            positions: INITIAL_POSITIONS,
            bar: ColorMap::default(),
            off: ColorMap::default(),
        }
    }

    /// Assemble a board from raw parts, checking conservation.
    pub fn from_parts(
        positions: [i8; 24],
        bar: ColorMap<u8>,
        off: ColorMap<u8>,
    ) -> Result<Self, EngineError> {
        let board = Self { positions, bar, off };
        board.check_integrity()?;
        Ok(board)
    }

    /// Verify every color accounts for exactly 15 checkers.
    pub fn check_integrity(&self) -> Result<(), EngineError> {
        for (i, &count) in self.positions.iter().enumerate() {
            if count.unsigned_abs() > CHECKERS_PER_SIDE {
                error!(index = i, count, "point overflow in board snapshot");
                return Err(EngineError::PointOverflow { index: i as u8, count });
            }
        }
        for color in Color::ALL {
            let count = self.checker_total(color);
            if count != CHECKERS_PER_SIDE as u32 {
                error!(%color, count, "checker conservation broken in board snapshot");
                return Err(EngineError::CheckerCount { color, count });
            }
        }
        Ok(())
    }

    /// Sum of a color's checkers on points, bar and off.
    #[must_use]
    pub fn checker_total(&self, color: Color) -> u32 {
        let on_points: u32 = Point::all().map(|p| self.count(p, color) as u32).sum();
        on_points + self.bar[color] as u32 + self.off[color] as u32
    }

    /// Raw signed counts, white positive.
    #[must_use]
    pub fn positions(&self) -> &[i8; 24] {
        &self.positions
    }

    /// Signed count on a point, white positive.
    #[must_use]
    pub fn signed(&self, point: Point) -> i8 {
        self.positions[point.index() as usize]
    }

    /// Number of `color`'s checkers on a point.
    #[must_use]
    pub fn count(&self, point: Point, color: Color) -> u8 {
        let signed = self.signed(point) * color.sign();
        if signed > 0 {
            signed as u8
        } else {
            0
        }
    }

    /// Whether `color` owns at least one checker on the point.
    #[must_use]
    pub fn owns(&self, point: Point, color: Color) -> bool {
        self.count(point, color) > 0
    }

    /// A point is landable if it holds at most one opposing checker.
    #[must_use]
    pub fn is_landable(&self, point: Point, color: Color) -> bool {
        self.count(point, color.opponent()) <= 1
    }

    /// Whether the point holds exactly one opposing checker (a blot to hit).
    #[must_use]
    pub fn is_blot_of(&self, point: Point, color: Color) -> bool {
        self.count(point, color) == 1
    }

    /// Checkers on `color`'s bar.
    #[must_use]
    pub fn bar(&self, color: Color) -> u8 {
        self.bar[color]
    }

    /// Checkers `color` has borne off.
    #[must_use]
    pub fn off(&self, color: Color) -> u8 {
        self.off[color]
    }

    /// Points holding `color`'s checkers, in index order.
    pub fn occupied(&self, color: Color) -> impl Iterator<Item = Point> + '_ {
        Point::all().filter(move |&p| self.owns(p, color))
    }

    /// All of `color`'s checkers are in its home board and none on the bar.
    #[must_use]
    pub fn all_home(&self, color: Color) -> bool {
        if self.bar[color] > 0 {
            return false;
        }
        let home = color.home_range();
        self.occupied(color).all(|p| home.contains(&p.index()))
    }

    /// Whether `color` has checkers in its home board further from the
    /// off tray than `point`.
    #[must_use]
    pub fn has_checkers_behind(&self, color: Color, point: Point) -> bool {
        let distance = color.pips_from(point.index());
        let home = color.home_range();
        self.occupied(color)
            .filter(|p| home.contains(&p.index()))
            .any(|p| color.pips_from(p.index()) > distance)
    }

    /// The color that has borne off all 15 checkers, if any.
    #[must_use]
    pub fn winner(&self) -> Option<Color> {
        Color::ALL
            .into_iter()
            .find(|&c| self.off[c] == CHECKERS_PER_SIDE)
    }

    /// Pip counts: distance to off per checker, 25 per checker on the bar.
    #[must_use]
    pub fn pip_count(&self) -> PipCount {
        ColorMap::from_fn(|color| {
            let on_points: u32 = self
                .occupied(color)
                .map(|p| self.count(p, color) as u32 * color.pips_from(p.index()))
                .sum();
            on_points + 25 * self.bar[color] as u32
        })
    }

    // === Transition helpers (copy-on-write callers only) ===

    pub(crate) fn take_from_point(&mut self, point: Point, color: Color) {
        debug_assert!(self.owns(point, color), "no {color} checker on {}", point.index());
        self.positions[point.index() as usize] -= color.sign();
    }

    pub(crate) fn put_on_point(&mut self, point: Point, color: Color) {
        self.positions[point.index() as usize] += color.sign();
    }

    pub(crate) fn take_from_bar(&mut self, color: Color) {
        debug_assert!(self.bar[color] > 0, "no {color} checker on the bar");
        self.bar[color] -= 1;
    }

    pub(crate) fn send_to_bar(&mut self, color: Color) {
        self.bar[color] += 1;
    }

    pub(crate) fn bear_off(&mut self, color: Color) {
        self.off[color] += 1;
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::initial()
    }
}

/// Builder for arbitrary positions.
///
/// ## Example
///
/// ```
/// use gammon_rules::board::BoardBuilder;
/// use gammon_rules::core::Color;
///
/// let board = BoardBuilder::new()
///     .place(Color::White, 20, 2)
///     .off(Color::White, 13)
///     .place(Color::Black, 3, 15)
///     .build()
///     .unwrap();
///
/// assert!(board.all_home(Color::White));
/// ```
#[derive(Clone, Debug, Default)]
pub struct BoardBuilder {
    positions: [i8; 24],
    bar: ColorMap<u8>,
    off: ColorMap<u8>,
    bad_index: Option<u8>,
}

impl BoardBuilder {
    /// Start from an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `count` of `color`'s checkers on point `index`.
    ///
    /// Replaces whatever was on the point.
    #[must_use]
    pub fn place(mut self, color: Color, index: u8, count: u8) -> Self {
        match Point::new(index) {
            Some(p) => self.positions[p.index() as usize] = count as i8 * color.sign(),
            None => self.bad_index = Some(index),
        }
        self
    }

    /// Set the number of `color`'s checkers on the bar.
    #[must_use]
    pub fn bar(mut self, color: Color, count: u8) -> Self {
        self.bar[color] = count;
        self
    }

    /// Set the number of `color`'s checkers borne off.
    #[must_use]
    pub fn off(mut self, color: Color, count: u8) -> Self {
        self.off[color] = count;
        self
    }

    /// Build the board, checking indices and conservation.
    pub fn build(self) -> Result<BoardState, EngineError> {
        if let Some(index) = self.bad_index {
            error!(index, "board builder received an off-board point");
            return Err(EngineError::InvalidLocation(index));
        }
        BoardState::from_parts(self.positions, self.bar, self.off)
    }
}
