//! Effect bundle: declarative side effects produced by the reducer.
//!
//! The reducer never touches the audio engine, the UI, or the disk. Each call
//! returns an `EffectBundle` describing what collaborators should do; the
//! session harness fans the bundle out to registered observers. Every field is
//! independent and optional, so an observer inspects only the parts it cares
//! about.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::state::Step;
use crate::ParamId;

/// A concrete DSP parameter state for one channel/band, pushed to the audio
/// engine as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DspParam {
    /// Channel gain (Mixer discipline).
    Gain { db: f32 },
    /// Peaking EQ band (Frequency discipline).
    PeakingEq { freq_hz: f32, q: f32, gain_db: f32 },
    /// Broadband compensation so the boosted band does not raise loudness.
    MakeupGain { db: f32 },
    /// Full compressor parameter set (Compressor discipline).
    Compressor {
        threshold_db: f32,
        ratio: f32,
        attack_ms: f32,
        release_ms: f32,
    },
}

/// Ordered playback command for the player collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerCmd {
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(f32),
}

/// Interactivity/visibility of one parameter widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    /// Input enabled.
    Editing,
    /// Visible but read-only (target reveal, results).
    Showing,
    /// Invisible and not interactable (signal currently inaudible).
    Hiding,
}

/// Per-parameter widget state in the view-model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    pub param: ParamId,
    pub visibility: Visibility,
    /// Normalized 0.0..=1.0 position matching the `Slider` event convention.
    pub position: f32,
}

/// The fully-resolved view-model. The UI renders this verbatim and raises the
/// carried `action_event` when the bottom button is pressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiModel {
    pub header: String,
    pub action_label: String,
    /// The event the action button posts back into the session.
    pub action_event: crate::GameEvent,
    pub widgets: Vec<WidgetState>,
    /// Whether the target (true) or the user's attempt (false) is shown.
    pub showing_target: bool,
}

/// Final score and analytics, emitted exactly once on entering EndResults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundResults {
    pub title: String,
    pub score: u32,
    pub total_rounds: u32,
    /// Opaque reproducible scalar for the persistence layer's analytics.
    pub analytics: f32,
}

/// Everything one reducer call asks collaborators to do.
///
/// Invariants: at most one `transition` per call; `results` is set iff the
/// transition just entered `Step::EndResults`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectBundle {
    /// (from, to) step pair when this call crossed a step boundary.
    pub transition: Option<(Step, Step)>,
    /// DSP parameter pushes, one per channel/band id.
    pub dsp: Option<Vec<(ParamId, DspParam)>>,
    /// Playback commands, applied in order.
    pub player: Option<Vec<PlayerCmd>>,
    /// View-model refresh.
    pub ui: Option<UiModel>,
    pub results: Option<RoundResults>,
    /// Tear the session down after observers have run.
    pub quit: bool,
}

impl EffectBundle {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_quit() -> Self {
        Self {
            quit: true,
            ..Self::default()
        }
    }

    /// Record a step transition. Panics if one was already recorded this call.
    pub fn set_transition(&mut self, from: Step, to: Step) {
        assert!(
            self.transition.is_none(),
            "second step transition in one reducer call"
        );
        self.transition = Some((from, to));
    }

    pub fn push_player(&mut self, cmd: PlayerCmd) {
        self.player.get_or_insert_with(Vec::new).push(cmd);
    }

    /// True when the bundle carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.transition.is_none()
            && self.dsp.is_none()
            && self.player.is_none()
            && self.ui.is_none()
            && self.results.is_none()
            && !self.quit
    }
}
