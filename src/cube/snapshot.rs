//! Doubling cube snapshot and its audit log.

use im::Vector;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::core::{Color, EngineError};

/// Kinds of cube event recorded in the history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CubeAction {
    Double,
    Take,
    Pass,
    Beaver,
    Raccoon,
}

/// One immutable entry of the cube log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CubeHistoryEntry {
    /// Who acted.
    pub by: Color,
    /// What they did.
    pub action: CubeAction,
    /// Cube level after the event (the proposed level for an offer).
    pub level: u32,
    /// Cube owner after the event.
    pub owner: Option<Color>,
}

/// State of the doubling cube for the current game.
///
/// Centered exactly when nobody owns it. While an offer is pending the
/// level stays at its pre-double value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeSnapshot {
    pub(crate) level: u32,
    pub(crate) owner: Option<Color>,
    pub(crate) offered_by: Option<Color>,
    pub(crate) history: Vector<CubeHistoryEntry>,
}

impl CubeSnapshot {
    /// A centered cube at level 1 with an empty log.
    #[must_use]
    pub fn centered() -> Self {
        Self {
            level: 1,
            owner: None,
            offered_by: None,
            history: Vector::new(),
        }
    }

    /// Current stake multiplier.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    /// Who owns the cube, `None` when centered.
    #[must_use]
    pub fn owner(&self) -> Option<Color> {
        self.owner
    }

    #[must_use]
    pub fn is_centered(&self) -> bool {
        self.owner.is_none()
    }

    /// Whether an offer is waiting for a response.
    #[must_use]
    pub fn double_pending(&self) -> bool {
        self.offered_by.is_some()
    }

    /// Who made the pending offer.
    #[must_use]
    pub fn double_offered_by(&self) -> Option<Color> {
        self.offered_by
    }

    /// Cube events this game, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<CubeHistoryEntry> {
        &self.history
    }

    /// Whether `player` may turn the cube, ownership-wise.
    #[must_use]
    pub fn is_available_to(&self, player: Color) -> bool {
        self.owner.map_or(true, |owner| owner == player)
    }

    /// Check the level is a power of two.
    pub fn check_integrity(&self) -> Result<(), EngineError> {
        if !self.level.is_power_of_two() {
            error!(level = self.level, "cube level is not a power of two");
            return Err(EngineError::InvalidCubeLevel(self.level));
        }
        Ok(())
    }

    pub(crate) fn record(&mut self, by: Color, action: CubeAction) {
        self.history.push_back(CubeHistoryEntry {
            by,
            action,
            level: self.level,
            owner: self.owner,
        });
    }
}

impl Default for CubeSnapshot {
    fn default() -> Self {
        Self::centered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered() {
        let cube = CubeSnapshot::centered();
        assert_eq!(cube.level(), 1);
        assert!(cube.is_centered());
        assert!(!cube.double_pending());
        assert!(cube.history().is_empty());
        assert!(cube.is_available_to(Color::White));
        assert!(cube.is_available_to(Color::Black));
    }

    #[test]
    fn test_owned_availability() {
        let mut cube = CubeSnapshot::centered();
        cube.owner = Some(Color::Black);
        assert!(!cube.is_centered());
        assert!(cube.is_available_to(Color::Black));
        assert!(!cube.is_available_to(Color::White));
    }

    #[test]
    fn test_record_snapshots_level_and_owner() {
        let mut cube = CubeSnapshot::centered();
        cube.level = 4;
        cube.owner = Some(Color::White);
        cube.record(Color::White, CubeAction::Take);

        assert_eq!(
            cube.history()[0],
            CubeHistoryEntry {
                by: Color::White,
                action: CubeAction::Take,
                level: 4,
                owner: Some(Color::White),
            }
        );
    }

    #[test]
    fn test_serialization() {
        let mut cube = CubeSnapshot::centered();
        cube.record(Color::Black, CubeAction::Double);
        let json = serde_json::to_string(&cube).unwrap();
        let back: CubeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(cube, back);
    }
}
