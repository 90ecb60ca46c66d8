//! Board locations and move requests.
//!
//! A checker is always on one of the 24 points, on its side's bar, or
//! borne off. `Location` makes that explicit instead of reusing point
//! indices for the bar (24) and the off tray (25); the numeric sentinels
//! survive only in the wire shape `RawMove`, converted at the boundary.

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{Color, EngineError};

/// Numeric location of the bar in the wire format.
pub const BAR_INDEX: u8 = 24;

/// Numeric location of the off tray in the wire format.
pub const OFF_INDEX: u8 = 25;

/// One of the 24 points, by index `0..=23`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Point(u8);

impl Point {
    /// Create a point, or `None` if the index is off the board.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < 24 {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Raw index `0..=23`.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// All 24 points in index order.
    pub fn all() -> impl Iterator<Item = Point> {
        (0..24).map(Point)
    }

    /// The point `die` pips ahead of this one for `color`, or `None` if the
    /// move runs past the edge of the board.
    #[must_use]
    pub fn advance(self, color: Color, die: u8) -> Option<Point> {
        let target = self.0 as i16 + color.direction() as i16 * die as i16;
        if (0..24).contains(&target) {
            Some(Point(target as u8))
        } else {
            None
        }
    }
}

impl TryFrom<u8> for Point {
    type Error = EngineError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Point::new(index).ok_or(EngineError::InvalidLocation(index))
    }
}

impl From<Point> for u8 {
    fn from(point: Point) -> u8 {
        point.0
    }
}

/// Where a checker moves from or to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Location {
    Point(Point),
    Bar,
    BorneOff,
}

impl Location {
    /// Decode a wire index: `0..=23` points, `24` bar, `25` off.
    pub fn from_index(index: u8) -> Result<Self, EngineError> {
        match index {
            BAR_INDEX => Ok(Location::Bar),
            OFF_INDEX => Ok(Location::BorneOff),
            i => Point::try_from(i).map(Location::Point),
        }
    }

    /// Encode to the wire index.
    #[must_use]
    pub const fn to_index(self) -> u8 {
        match self {
            Location::Point(p) => p.index(),
            Location::Bar => BAR_INDEX,
            Location::BorneOff => OFF_INDEX,
        }
    }

    /// The point, if this location is one.
    #[must_use]
    pub const fn point(self) -> Option<Point> {
        match self {
            Location::Point(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Point> for Location {
    fn from(point: Point) -> Self {
        Location::Point(point)
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Point(p) => write!(f, "{}", p.index()),
            Location::Bar => write!(f, "bar"),
            Location::BorneOff => write!(f, "off"),
        }
    }
}

/// A request to move one checker with one die.
///
/// A `Move` is well-formed by construction (die in `1..=6`, the bar only
/// as a source, the off tray only as a destination). Whether it is
/// *legal* is a separate question answered by `validate_move`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawMove", into = "RawMove")]
pub struct Move {
    player: Color,
    from: Location,
    to: Location,
    die: u8,
}

impl Move {
    /// Create a move from typed locations.
    pub fn new(player: Color, from: Location, to: Location, die: u8) -> Result<Self, EngineError> {
        if !(1..=6).contains(&die) {
            return Err(EngineError::InvalidDie(die));
        }
        if from == Location::BorneOff || to == Location::Bar {
            return Err(EngineError::MisplacedSentinel {
                from: from.to_index(),
                to: to.to_index(),
            });
        }
        Ok(Self { player, from, to, die })
    }

    /// Create a move from wire indices (`24` bar, `25` off).
    pub fn from_indices(player: Color, from: u8, to: u8, die: u8) -> Result<Self, EngineError> {
        let from = Location::from_index(from)?;
        let to = Location::from_index(to)?;
        Self::new(player, from, to, die)
    }

    /// Internal constructor for moves the engine generated itself.
    pub(crate) const fn new_unchecked(player: Color, from: Location, to: Location, die: u8) -> Self {
        Self { player, from, to, die }
    }

    #[must_use]
    pub const fn player(&self) -> Color {
        self.player
    }

    #[must_use]
    pub const fn from(&self) -> Location {
        self.from
    }

    #[must_use]
    pub const fn to(&self) -> Location {
        self.to
    }

    /// The die value this move spends.
    #[must_use]
    pub const fn die(&self) -> u8 {
        self.die
    }

    /// Whether this move enters a checker from the bar.
    #[must_use]
    pub const fn is_bar_entry(&self) -> bool {
        matches!(self.from, Location::Bar)
    }

    /// Whether this move bears a checker off.
    #[must_use]
    pub const fn is_bear_off(&self) -> bool {
        matches!(self.to, Location::BorneOff)
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}/{} ({})", self.player, self.from, self.to, self.die)
    }
}

/// Wire shape of a move: numeric locations with sentinels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMove {
    pub from: u8,
    pub to: u8,
    pub player: Color,
    pub dice_used: u8,
}

impl TryFrom<RawMove> for Move {
    type Error = EngineError;

    fn try_from(raw: RawMove) -> Result<Self, Self::Error> {
        Move::from_indices(raw.player, raw.from, raw.to, raw.dice_used).map_err(|e| {
            error!(?raw, %e, "malformed move request");
            e
        })
    }
}

impl From<Move> for RawMove {
    fn from(mv: Move) -> Self {
        RawMove {
            from: mv.from.to_index(),
            to: mv.to.to_index(),
            player: mv.player,
            dice_used: mv.die,
        }
    }
}
