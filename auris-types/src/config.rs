//! Per-session round configuration.
//!
//! A `GameConfig` is immutable once a session is constructed. Validation
//! happens up front (`GameConfig::validate`) — the reducer assumes a valid
//! config and only re-asserts the variant/field pairing at step boundaries.

use serde::{Deserialize, Serialize};

/// Timing/retry policy of a discipline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variant {
    /// Unlimited re-listening, no deadline.
    Normal,
    /// Listening is deadline-bound; the deadline also auto-advances Result.
    Timer,
    /// A fixed budget of switches back from the target to the user's mix.
    Tries,
}

/// Discipline-specific value tables the user selects from.
///
/// Mixer and Compressor are discrete (exact-match scoring on table entries);
/// Frequency is continuous with a shrinking tolerance window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Discipline {
    /// Multi-channel gain matching. One slider per channel, values drawn from
    /// a shared dB step table. `active` marks the channels under test;
    /// inactive channels are pinned to their target draw.
    Mixer {
        gain_steps_db: Vec<f32>,
        active: Vec<bool>,
    },
    /// Single peaking-EQ band center-frequency matching over a continuous
    /// range. `window_hz` is the initial scoring tolerance; it shrinks by
    /// ×0.95 on every correct answer with no floor.
    Frequency {
        min_hz: f32,
        max_hz: f32,
        window_hz: f32,
        band_gain_db: f32,
        band_q: f32,
    },
    /// Four-parameter compressor matching. Each parameter is drawn from its
    /// own table.
    Compressor {
        thresholds_db: Vec<f32>,
        ratios: Vec<f32>,
        attacks_ms: Vec<f32>,
        releases_ms: Vec<f32>,
    },
}

impl Discipline {
    /// Number of tunable parameter slots (one per channel for Mixer).
    pub fn param_count(&self) -> usize {
        match self {
            Discipline::Mixer { active, .. } => active.len(),
            Discipline::Frequency { .. } => 1,
            Discipline::Compressor { .. } => 4,
        }
    }

    /// Whether the parameter at `index` is under test this session.
    /// Inactive parameters never accept input and never score.
    pub fn is_active(&self, index: usize) -> bool {
        match self {
            Discipline::Mixer { active, .. } => active.get(index).copied().unwrap_or(false),
            Discipline::Frequency { .. } | Discipline::Compressor { .. } => {
                index < self.param_count()
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            Discipline::Mixer {
                gain_steps_db,
                active,
            } => {
                if gain_steps_db.len() < 2 {
                    return Err("mixer gain table needs at least two steps".into());
                }
                if active.is_empty() {
                    return Err("mixer needs at least one channel".into());
                }
                if !active.iter().any(|a| *a) {
                    return Err("mixer needs at least one active channel".into());
                }
                Ok(())
            }
            Discipline::Frequency {
                min_hz,
                max_hz,
                window_hz,
                band_q,
                ..
            } => {
                if min_hz >= max_hz {
                    return Err("frequency range is empty".into());
                }
                if *window_hz <= 0.0 {
                    return Err("frequency tolerance window must be positive".into());
                }
                if *band_q <= 0.0 {
                    return Err("band Q must be positive".into());
                }
                Ok(())
            }
            Discipline::Compressor {
                thresholds_db,
                ratios,
                attacks_ms,
                releases_ms,
            } => {
                for (name, table) in [
                    ("threshold", thresholds_db),
                    ("ratio", ratios),
                    ("attack", attacks_ms),
                    ("release", releases_ms),
                ] {
                    if table.len() < 2 {
                        return Err(format!("compressor {} table needs at least two steps", name));
                    }
                }
                Ok(())
            }
        }
    }
}

/// Immutable per-session round configuration.
///
/// Invariant (checked by `validate`, re-asserted by the reducer at step
/// boundaries): exactly the fields relevant to `variant` are set — `listens`
/// for Tries, `timeout_ms` for Timer, neither for Normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub title: String,
    pub discipline: Discipline,
    pub variant: Variant,
    /// Re-listen budget. Set iff `variant == Tries`.
    pub listens: Option<u32>,
    /// Listening deadline in milliseconds. Set iff `variant == Timer`.
    pub timeout_ms: Option<u64>,
    /// Number of Question/Result rounds before EndResults.
    pub total_rounds: u32,
}

impl GameConfig {
    /// Check the config before constructing a session. The reducer does not
    /// re-validate per event.
    pub fn validate(&self) -> Result<(), String> {
        self.discipline.validate()?;
        if self.total_rounds == 0 {
            return Err("total_rounds must be at least 1".into());
        }
        match self.variant {
            Variant::Normal => {
                if self.listens.is_some() || self.timeout_ms.is_some() {
                    return Err("Normal variant takes neither listens nor timeout_ms".into());
                }
            }
            Variant::Timer => {
                if self.listens.is_some() {
                    return Err("Timer variant takes no listens budget".into());
                }
                match self.timeout_ms {
                    Some(ms) if ms > 0 => {}
                    _ => return Err("Timer variant needs a positive timeout_ms".into()),
                }
            }
            Variant::Tries => {
                if self.timeout_ms.is_some() {
                    return Err("Tries variant takes no timeout_ms".into());
                }
                match self.listens {
                    Some(n) if n > 0 => {}
                    _ => return Err("Tries variant needs a positive listens budget".into()),
                }
            }
        }
        Ok(())
    }

    /// Assert the variant/field pairing. Called by the reducer at step
    /// transitions; a violation here means the config was never validated.
    pub fn assert_variant_fields(&self) {
        match self.variant {
            Variant::Normal => {
                assert!(
                    self.listens.is_none() && self.timeout_ms.is_none(),
                    "Normal config carries variant fields"
                );
            }
            Variant::Timer => {
                assert!(
                    self.listens.is_none() && self.timeout_ms.is_some(),
                    "Timer config missing timeout_ms or carries listens"
                );
            }
            Variant::Tries => {
                assert!(
                    self.listens.is_some() && self.timeout_ms.is_none(),
                    "Tries config missing listens or carries timeout_ms"
                );
            }
        }
    }
}
