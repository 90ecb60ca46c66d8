//! Core engine types: colors, RNG, configuration, contract errors.
//!
//! This module contains the building blocks every other module shares.
//! Nothing here knows about points, dice or the cube.

pub mod player;
pub mod rng;
pub mod config;
pub mod error;

pub use player::{Color, ColorMap};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, MatchRules};
pub use error::EngineError;
