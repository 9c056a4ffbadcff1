//! # auris-types
//!
//! Shared type definitions for the Auris ear-training engine.
//! This crate contains the event/config/state/effect types and the pure round
//! reducer used by auris-core and any embedding frontend.
//!
//! The crate is deliberately free of I/O: everything here is plain data plus
//! pure functions, so a frontend can replay a recorded event log against
//! `reduce` and get bit-identical results.

pub mod config;
pub mod effect;
pub mod event;
pub mod reduce;
pub mod state;

pub use config::{Discipline, GameConfig, Variant};
pub use effect::{
    DspParam, EffectBundle, PlayerCmd, RoundResults, UiModel, Visibility, WidgetState,
};
pub use event::GameEvent;
pub use state::{GameState, Mix, Step};

/// Index of a tunable parameter within a discipline (0-based).
///
/// For the Mixer discipline this is the channel index; for Frequency it is
/// always 0; for Compressor it is 0..=3 (threshold, ratio, attack, release).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ParamId(u32);

impl ParamId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
    pub fn get(self) -> u32 {
        self.0
    }
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ParamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
