//! Player colors and per-color data storage.
//!
//! ## Color
//!
//! The two sides of a backgammon game. White moves from point index 0
//! towards 23 and bears off past 23; black moves the other way.
//!
//! ## ColorMap
//!
//! Fixed two-slot storage indexed by `Color`, used for bar/off counters,
//! match scores and anything else kept per side.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut, RangeInclusive};

/// One side of the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Both colors, white first.
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Slot index for `ColorMap` storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    /// Step applied to a point index when this color moves one pip.
    #[must_use]
    pub const fn direction(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Sign of this color's checkers in `BoardState::positions`.
    #[must_use]
    pub const fn sign(self) -> i8 {
        self.direction()
    }

    /// Point indices of this color's home board.
    #[must_use]
    pub const fn home_range(self) -> RangeInclusive<u8> {
        match self {
            Color::White => 18..=23,
            Color::Black => 0..=5,
        }
    }

    /// Distance in pips from a point index to this color's off tray.
    #[must_use]
    pub const fn pips_from(self, index: u8) -> u32 {
        match self {
            Color::White => 24 - index as u32,
            Color::Black => index as u32 + 1,
        }
    }

    /// Point index a checker entering from the bar lands on with `die`.
    ///
    /// Entry happens in the opponent's home board.
    #[must_use]
    pub const fn entry_index(self, die: u8) -> u8 {
        match self {
            Color::White => die - 1,
            Color::Black => 24 - die,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

/// Per-color data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use gammon_rules::core::{Color, ColorMap};
///
/// let mut score: ColorMap<u32> = ColorMap::default();
/// score[Color::Black] += 2;
///
/// assert_eq!(score[Color::White], 0);
/// assert_eq!(score[Color::Black], 2);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap<T> {
    data: [T; 2],
}

impl<T> ColorMap<T> {
    /// Create a map from explicit white and black values.
    pub const fn new(white: T, black: T) -> Self {
        Self { data: [white, black] }
    }

    /// Create a map with values from a factory function.
    pub fn from_fn(factory: impl Fn(Color) -> T) -> Self {
        Self {
            data: [factory(Color::White), factory(Color::Black)],
        }
    }

    /// Get a reference to a color's data.
    #[must_use]
    pub fn get(&self, color: Color) -> &T {
        &self.data[color.index()]
    }

    /// Get a mutable reference to a color's data.
    pub fn get_mut(&mut self, color: Color) -> &mut T {
        &mut self.data[color.index()]
    }

    /// Iterate over (Color, &T) pairs, white first.
    pub fn iter(&self) -> impl Iterator<Item = (Color, &T)> {
        Color::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Color> for ColorMap<T> {
    type Output = T;

    fn index(&self, color: Color) -> &Self::Output {
        self.get(color)
    }
}

impl<T> IndexMut<Color> for ColorMap<T> {
    fn index_mut(&mut self, color: Color) -> &mut Self::Output {
        self.get_mut(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opponent() {
        assert_eq!(Color::White.opponent(), Color::Black);
        assert_eq!(Color::Black.opponent(), Color::White);
    }

    #[test]
    fn test_geometry() {
        assert_eq!(Color::White.pips_from(0), 24);
        assert_eq!(Color::White.pips_from(23), 1);
        assert_eq!(Color::Black.pips_from(0), 1);
        assert_eq!(Color::Black.pips_from(23), 24);

        assert_eq!(Color::White.entry_index(1), 0);
        assert_eq!(Color::White.entry_index(6), 5);
        assert_eq!(Color::Black.entry_index(1), 23);
        assert_eq!(Color::Black.entry_index(6), 18);

        assert!(Color::White.home_range().contains(&18));
        assert!(!Color::White.home_range().contains(&17));
        assert!(Color::Black.home_range().contains(&5));
    }

    #[test]
    fn test_entry_point_matches_bar_pips() {
        // Entering with a die leaves the checker (25 - die) pips from home.
        for color in Color::ALL {
            for die in 1..=6 {
                assert_eq!(color.pips_from(color.entry_index(die)), 25 - die as u32);
            }
        }
    }

    #[test]
    fn test_color_map_access() {
        let mut map = ColorMap::new(1, 2);
        assert_eq!(map[Color::White], 1);
        assert_eq!(map[Color::Black], 2);

        map[Color::White] = 10;
        assert_eq!(map[Color::White], 10);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(Color::White, &10), (Color::Black, &2)]);
    }

    #[test]
    fn test_color_map_from_fn() {
        let map = ColorMap::from_fn(|c| c.index() * 5);
        assert_eq!(map[Color::White], 0);
        assert_eq!(map[Color::Black], 5);
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&Color::White).unwrap();
        assert_eq!(json, "\"white\"");

        let map = ColorMap::new(3u32, 4u32);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: ColorMap<u32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
