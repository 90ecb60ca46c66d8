//! Cube transitions: offering a double and answering it.
//!
//! ```text
//! Centered(1) ──offer──▶ DoublePending(offerer) ──take────▶ Owned(responder, 2x)
//!      ▲                        │                ──beaver──▶ Owned(offerer, 4x)
//!      │                        │                ──raccoon─▶ Owned(responder, 8x)
//!  next game                    └──pass──▶ game over, offerer wins pre-double level
//! ```
//!
//! Turn, dice and Crawford checks belong to the match layer; this module
//! only knows about the cube itself.

use serde::{Deserialize, Serialize};

use super::snapshot::{CubeAction, CubeHistoryEntry, CubeSnapshot};
use crate::core::{Color, MatchRules};
use crate::rules::RuleViolation;

/// How the doubled player answers an offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoubleResponse {
    /// Decline: the game ends at the pre-double stake.
    Pass,
    /// Accept and own the cube at twice the level.
    Take,
    /// Accept and immediately redouble; the offerer owns it at 4x.
    Beaver,
    /// Beaver, then the offerer's immediate re-redouble; the responder
    /// owns it at 8x.
    Raccoon,
}

impl DoubleResponse {
    /// Decode the `(accept, beaver, raccoon)` flag triple.
    ///
    /// Beaver and raccoon both imply acceptance, and at most one may be set.
    pub fn from_flags(accept: bool, beaver: bool, raccoon: bool) -> Result<Self, RuleViolation> {
        match (accept, beaver, raccoon) {
            (false, false, false) => Ok(DoubleResponse::Pass),
            (true, false, false) => Ok(DoubleResponse::Take),
            (true, true, false) => Ok(DoubleResponse::Beaver),
            (true, false, true) => Ok(DoubleResponse::Raccoon),
            _ => Err(RuleViolation::MalformedResponse),
        }
    }
}

/// Result of answering a double.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CubeResolution {
    /// The double was accepted; play continues with this cube.
    Accepted(CubeSnapshot),
    /// The double was declined; the offerer wins `points`.
    Declined {
        cube: CubeSnapshot,
        winner: Color,
        points: u32,
    },
}

impl CubeResolution {
    /// The cube after the response.
    #[must_use]
    pub fn cube(&self) -> &CubeSnapshot {
        match self {
            CubeResolution::Accepted(cube) => cube,
            CubeResolution::Declined { cube, .. } => cube,
        }
    }
}

/// Check that `player` may turn the cube as far as the cube is concerned.
pub fn check_can_offer(cube: &CubeSnapshot, player: Color) -> Result<(), RuleViolation> {
    if cube.double_pending() {
        return Err(RuleViolation::DoubleAlreadyPending);
    }
    if !cube.is_available_to(player) {
        return Err(RuleViolation::NotCubeOwner);
    }
    Ok(())
}

/// Offer a double. The level is unchanged until the offer is answered.
pub fn offer_double(cube: &CubeSnapshot, player: Color) -> Result<CubeSnapshot, RuleViolation> {
    check_can_offer(cube, player)?;

    let mut next = cube.clone();
    next.offered_by = Some(player);
    next.history.push_back(CubeHistoryEntry {
        by: player,
        action: CubeAction::Double,
        level: cube.level.saturating_mul(2),
        owner: cube.owner,
    });
    Ok(next)
}

/// Answer the pending double.
pub fn respond_to_double(
    cube: &CubeSnapshot,
    responder: Color,
    response: DoubleResponse,
    rules: &MatchRules,
) -> Result<CubeResolution, RuleViolation> {
    let offerer = cube.offered_by.ok_or(RuleViolation::NoDoublePending)?;
    if offerer == responder {
        return Err(RuleViolation::OwnDouble);
    }
    match response {
        DoubleResponse::Beaver | DoubleResponse::Raccoon if !rules.beaver => {
            return Err(RuleViolation::BeaverNotEnabled)
        }
        DoubleResponse::Raccoon if !rules.raccoon_allowed() => {
            return Err(RuleViolation::RaccoonNotEnabled)
        }
        _ => {}
    }

    let mut next = cube.clone();
    next.offered_by = None;

    if response == DoubleResponse::Pass {
        next.record(responder, CubeAction::Pass);
        return Ok(CubeResolution::Declined {
            winner: offerer,
            points: cube.level,
            cube: next,
        });
    }

    next.level = next.level.saturating_mul(2);
    next.owner = Some(responder);
    match response {
        DoubleResponse::Take => {
            next.record(responder, CubeAction::Take);
        }
        DoubleResponse::Beaver => {
            next.level = next.level.saturating_mul(2);
            next.owner = Some(offerer);
            next.record(responder, CubeAction::Beaver);
        }
        DoubleResponse::Raccoon => {
            next.level = next.level.saturating_mul(2);
            next.owner = Some(offerer);
            next.record(responder, CubeAction::Beaver);
            next.level = next.level.saturating_mul(2);
            next.owner = Some(responder);
            next.record(offerer, CubeAction::Raccoon);
        }
        DoubleResponse::Pass => unreachable!("handled above"),
    }

    Ok(CubeResolution::Accepted(next))
}
