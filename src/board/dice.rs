//! Dice for one turn.
//!
//! `DiceState` keeps the rolled pair, the multiset of values still to
//! play (four entries on doubles) and per-die used flags. The remaining
//! values only ever shrink within a turn; the next roll replaces the
//! whole state.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::error;

use crate::core::{Color, EngineError, GameRng};

/// Die values still playable this turn.
pub type Remaining = SmallVec<[u8; 4]>;

/// Dice snapshot for the current turn.
///
/// Deserializing rebuilds the state with [`DiceState::with_remaining`] and
/// rejects stored flags that disagree with the rebuilt ones.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDice")]
pub struct DiceState {
    dice: [u8; 2],
    used: [bool; 2],
    doubles: bool,
    remaining: Remaining,
}

/// Unchecked serialized form of a [`DiceState`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RawDice {
    pub(crate) dice: [u8; 2],
    pub(crate) used: [bool; 2],
    pub(crate) doubles: bool,
    pub(crate) remaining: Remaining,
}

impl TryFrom<RawDice> for DiceState {
    type Error = EngineError;

    fn try_from(raw: RawDice) -> Result<Self, Self::Error> {
        let [die1, die2] = raw.dice;
        let rebuilt = Self::with_remaining(die1, die2, &raw.remaining)?;
        if rebuilt.used != raw.used || rebuilt.doubles != raw.doubles {
            error!(
                dice = ?raw.dice,
                used = ?raw.used,
                doubles = raw.doubles,
                "dice flags do not match the roll"
            );
            return Err(EngineError::InconsistentDice {
                dice: raw.dice,
                remaining: raw.remaining.to_vec(),
            });
        }
        Ok(rebuilt)
    }
}

impl DiceState {
    /// A fresh roll of the given pair.
    pub fn from_values(die1: u8, die2: u8) -> Result<Self, EngineError> {
        for die in [die1, die2] {
            if !(1..=6).contains(&die) {
                error!(die, "die value outside 1..=6");
                return Err(EngineError::InvalidDie(die));
            }
        }
        Ok(Self::fresh(die1, die2))
    }

    fn fresh(die1: u8, die2: u8) -> Self {
        let doubles = die1 == die2;
        let remaining = if doubles {
            SmallVec::from_slice(&[die1; 4])
        } else {
            SmallVec::from_slice(&[die1, die2])
        };
        Self {
            dice: [die1, die2],
            used: [false, false],
            doubles,
            remaining,
        }
    }

    /// Rebuild a partly played turn, checking that `remaining` is a
    /// sub-multiset of what the roll could produce.
    pub fn with_remaining(die1: u8, die2: u8, remaining: &[u8]) -> Result<Self, EngineError> {
        let fresh = Self::from_values(die1, die2)?;
        let mut pool = fresh.remaining.clone();
        for value in remaining {
            match pool.iter().position(|v| v == value) {
                Some(i) => {
                    pool.remove(i);
                }
                None => {
                    error!(?remaining, dice = ?[die1, die2], "remaining dice do not match roll");
                    return Err(EngineError::InconsistentDice {
                        dice: [die1, die2],
                        remaining: remaining.to_vec(),
                    });
                }
            }
        }
        let mut dice = Self {
            remaining: SmallVec::from_slice(remaining),
            ..fresh
        };
        dice.refresh_used();
        Ok(dice)
    }

    /// The rolled pair.
    #[must_use]
    pub fn dice(&self) -> [u8; 2] {
        self.dice
    }

    /// Per-die used flags.
    #[must_use]
    pub fn used(&self) -> [bool; 2] {
        self.used
    }

    /// Whether the roll was a double.
    #[must_use]
    pub fn is_doubles(&self) -> bool {
        self.doubles
    }

    /// Values still playable, in roll order.
    #[must_use]
    pub fn remaining(&self) -> &[u8] {
        &self.remaining
    }

    /// Whether `value` can still be spent.
    #[must_use]
    pub fn has(&self, value: u8) -> bool {
        self.remaining.contains(&value)
    }

    /// No dice left to play.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Distinct remaining values, highest first.
    #[must_use]
    pub fn distinct_desc(&self) -> SmallVec<[u8; 2]> {
        let mut values: SmallVec<[u8; 2]> = SmallVec::new();
        for &v in &self.remaining {
            if !values.contains(&v) {
                values.push(v);
            }
        }
        values.sort_unstable_by(|a, b| b.cmp(a));
        values
    }

    /// Spend one instance of `value`. No-op if it is not remaining.
    #[must_use]
    pub fn use_die(&self, value: u8) -> Self {
        let Some(index) = self.remaining.iter().position(|&v| v == value) else {
            return self.clone();
        };
        let mut next = self.clone();
        next.remaining.remove(index);
        next.refresh_used();
        next
    }

    fn refresh_used(&mut self) {
        if self.doubles {
            let left = self.remaining.len();
            self.used = [left <= 2, left == 0];
        } else {
            self.used = [!self.has(self.dice[0]), !self.has(self.dice[1])];
        }
    }
}

/// Roll a fresh pair of dice.
pub fn roll_dice(rng: &mut GameRng) -> DiceState {
    let die1 = rng.roll_die();
    let die2 = rng.roll_die();
    DiceState::fresh(die1, die2)
}

/// Opening roll: each side throws one die, re-throwing on ties.
///
/// The side with the higher die moves first and plays both values, so
/// the first turn starts with dice already rolled.
pub fn roll_opening(rng: &mut GameRng) -> (Color, DiceState) {
    loop {
        let white = rng.roll_die();
        let black = rng.roll_die();
        if white != black {
            let first = if white > black { Color::White } else { Color::Black };
            return (first, DiceState::fresh(white, black));
        }
    }
}
