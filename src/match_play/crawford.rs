//! Crawford rule bookkeeping.
//!
//! The game right after either side first reaches one point short of the
//! match length is played without the cube. That happens at most once per
//! match: after the Crawford game the rule is spent, whatever the scores do.

use serde::{Deserialize, Serialize};

use crate::core::{Color, ColorMap};

/// Crawford status for a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CrawfordState {
    enabled: bool,
    active: bool,
    used: bool,
    triggered_by: Option<Color>,
}

impl CrawfordState {
    /// Fresh state. A disabled rule never activates.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the current (or next, between games) game is the Crawford game.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the Crawford game has already been played.
    #[must_use]
    pub fn is_used(&self) -> bool {
        self.used
    }

    /// The side whose score reached match point.
    #[must_use]
    pub fn triggered_by(&self) -> Option<Color> {
        self.triggered_by
    }

    /// Advance after a game has been scored.
    ///
    /// Finishing the Crawford game spends the rule. Otherwise the next game
    /// becomes the Crawford game when a side sits exactly one point short
    /// and nobody has won the match.
    #[must_use]
    pub fn on_game_end(&self, score: &ColorMap<u32>, match_length: Option<u32>) -> Self {
        let mut next = *self;
        if self.active {
            next.active = false;
            next.used = true;
            return next;
        }

        let Some(length) = match_length else {
            return next;
        };
        if !self.enabled || self.used || score.iter().any(|(_, &points)| points >= length) {
            return next;
        }

        let match_point = length - 1;
        if let Some((color, _)) = score.iter().find(|(_, points)| **points == match_point) {
            next.active = true;
            next.triggered_by = Some(color);
        }
        next
    }
}
