//! Match configuration types.
//!
//! Callers configure a match at creation by providing:
//! - `MatchRules`: which optional rules are in force (Crawford, Jacoby,
//!   beaver, raccoon)
//! - `MatchConfig`: match length (or money game), rules and dice seed
//!
//! The engine reads these values; it never changes them mid-match.

use serde::{Deserialize, Serialize};
use tracing::error;

use super::error::EngineError;
use super::rng::GameRng;

/// Optional rules for a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRules {
    /// No doubling in the game right after a side reaches match point.
    /// Only meaningful when a match length is set.
    pub crawford: bool,

    /// Money games: gammons and backgammons count single while the cube
    /// is still centered.
    pub jacoby: bool,

    /// The doubled side may redouble immediately while taking.
    pub beaver: bool,

    /// The original doubler may redouble again after a beaver.
    /// Requires `beaver`.
    pub raccoon: bool,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            crawford: true,
            jacoby: false,
            beaver: false,
            raccoon: false,
        }
    }
}

impl MatchRules {
    /// Enable or disable the Crawford rule.
    #[must_use]
    pub fn with_crawford(mut self, enabled: bool) -> Self {
        self.crawford = enabled;
        self
    }

    /// Enable or disable the Jacoby rule.
    #[must_use]
    pub fn with_jacoby(mut self, enabled: bool) -> Self {
        self.jacoby = enabled;
        self
    }

    /// Enable or disable beavers.
    #[must_use]
    pub fn with_beaver(mut self, enabled: bool) -> Self {
        self.beaver = enabled;
        self
    }

    /// Enable or disable raccoons.
    #[must_use]
    pub fn with_raccoon(mut self, enabled: bool) -> Self {
        self.raccoon = enabled;
        self
    }

    /// Whether a raccoon response may be played at all.
    #[must_use]
    pub fn raccoon_allowed(&self) -> bool {
        self.beaver && self.raccoon
    }
}

/// Complete match configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Points needed to win the match. `None` plays an unlimited money game.
    pub match_length: Option<u32>,

    /// Optional rules in force.
    pub rules: MatchRules,

    /// Dice seed for deterministic replay. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl MatchConfig {
    /// A match to `length` points with default rules.
    #[must_use]
    pub fn match_to(length: u32) -> Self {
        Self {
            match_length: Some(length),
            ..Self::default()
        }
    }

    /// An unlimited money game with default rules.
    #[must_use]
    pub fn money_game() -> Self {
        Self::default()
    }

    /// Replace the rule set.
    #[must_use]
    pub fn with_rules(mut self, rules: MatchRules) -> Self {
        self.rules = rules;
        self
    }

    /// Fix the dice seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.match_length == Some(0) {
            error!("rejected match configuration with zero length");
            return Err(EngineError::ZeroMatchLength);
        }
        Ok(())
    }

    /// Dice stream for this match: seeded when `seed` is set, otherwise
    /// from entropy.
    #[must_use]
    pub fn rng(&self) -> GameRng {
        self.seed.map_or_else(GameRng::from_entropy, GameRng::new)
    }

    /// Whether the Crawford rule can ever apply in this match.
    #[must_use]
    pub fn crawford_enabled(&self) -> bool {
        self.rules.crawford && self.match_length.is_some()
    }
}
