//! Round state owned by the session harness.
//!
//! A `GameState` is constructed once per session, mutated only inside
//! `reduce`, and dropped when the harness is torn down. Every field the
//! reducer needs — including the RNG state and the reference file pool — lives
//! here, so replaying a recorded event sequence against a state built from the
//! same config/files/seed is fully deterministic.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{Discipline, GameConfig, Variant};

/// The round's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Begin,
    Question,
    Result,
    /// Terminal. Reached only from Result after the final round.
    EndResults,
}

/// Which signal is currently audible/displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mix {
    User,
    Target,
    Hidden,
}

/// Mutable state of one training session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub step: Step,
    pub mix: Mix,
    /// Cumulative points across rounds.
    pub score: u32,
    /// 1-based once the first Question is entered; 0 at Begin.
    pub current_round: u32,
    /// The hidden answer, one slot per parameter. Empty at Begin.
    pub targets: Vec<f32>,
    /// The user's current guess, same sizing as `targets`.
    pub inputs: Vec<f32>,
    /// Tries variant: switches back to the user mix still allowed this round.
    pub remaining_listens: u32,
    /// Tries variant: false once the budget is exhausted for this Question.
    pub can_still_listen: bool,
    /// Timer variant: deadline anchor, milliseconds since session start.
    pub timestamp_start: u64,
    /// Last timestamp seen from the tick source.
    pub current_timestamp: u64,
    /// Frequency discipline: current scoring tolerance in Hz. Shrinks ×0.95
    /// per correct answer, no floor.
    pub tolerance_hz: f32,
    /// LCG state for target/file/analytics draws.
    pub rng: u64,
    /// Whether a UI is currently attached (CreateUi/DestroyUi pairing).
    pub ui_created: bool,
    /// Reference audio file pool, uniform draw per round. Never empty.
    pub files: Vec<PathBuf>,
    pub config: GameConfig,
}

impl GameState {
    /// Build the initial (Begin) state for a session.
    ///
    /// `files` may be empty only for disciplines that play no reference file;
    /// the caller decides, this constructor only validates the config.
    pub fn new(config: GameConfig, files: Vec<PathBuf>, seed: u64) -> Result<Self, String> {
        config.validate()?;
        let tolerance_hz = match config.discipline {
            Discipline::Frequency { window_hz, .. } => window_hz,
            _ => 0.0,
        };
        Ok(Self {
            step: Step::Begin,
            mix: Mix::Hidden,
            score: 0,
            current_round: 0,
            targets: Vec::new(),
            inputs: Vec::new(),
            remaining_listens: 0,
            can_still_listen: true,
            timestamp_start: 0,
            current_timestamp: 0,
            tolerance_hz,
            rng: seed,
            ui_created: false,
            files,
            config,
        })
    }

    /// Sizing invariant: Begin has empty value collections, every other step
    /// has both sized to the discipline's parameter count. Asserted by the
    /// reducer at every step transition.
    pub fn assert_sizing(&self) {
        let n = self.config.discipline.param_count();
        match self.step {
            Step::Begin => {
                assert!(
                    self.targets.is_empty() && self.inputs.is_empty(),
                    "Begin step with non-empty value collections"
                );
            }
            _ => {
                assert!(
                    self.targets.len() == n && self.inputs.len() == n,
                    "value collections not sized to parameter count ({} targets, {} inputs, {} params)",
                    self.targets.len(),
                    self.inputs.len(),
                    n
                );
            }
        }
        self.config.assert_variant_fields();
    }

    /// Timer variant deadline, if armed.
    pub fn deadline(&self) -> Option<u64> {
        match self.config.variant {
            Variant::Timer => self
                .config
                .timeout_ms
                .map(|ms| self.timestamp_start.saturating_add(ms)),
            _ => None,
        }
    }
}
