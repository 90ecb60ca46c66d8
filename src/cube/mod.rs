//! Doubling cube: level, ownership, pending offers and the cube log.

pub mod snapshot;
pub mod doubling;

pub use snapshot::{CubeAction, CubeHistoryEntry, CubeSnapshot};
pub use doubling::{check_can_offer, offer_double, respond_to_double, CubeResolution, DoubleResponse};
