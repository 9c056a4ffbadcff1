//! Event types for the round reducer.
//!
//! Events are the only way round state changes. They come from three places:
//! the UI (clicks, slider moves), the session harness lifecycle
//! (`Init`/`CreateUi`/`DestroyUi`), and the tick source (`TimerTick`).
//!
//! Posting an event whose preconditions the current step does not allow is a
//! caller bug — the reducer panics rather than absorbing it, since it means
//! the UI and the round state have desynchronized.

use serde::{Deserialize, Serialize};

use crate::ParamId;

/// A discrete input to the round state machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// First event of a session. Must be posted exactly once, before anything
    /// else.
    Init,
    /// The user moved an input widget. `position` is normalized to 0.0..=1.0;
    /// the discipline maps it onto its value table or range.
    /// Legal only during Question while the user's mix is audible.
    Slider(ParamId, f32),
    /// Switch the audible signal between the user's attempt (`false`) and the
    /// target reference (`true`). Legal during Question and Result.
    ToggleInputOrTarget(bool),
    /// Periodic timestamp from the tick source, in milliseconds since session
    /// start. Legal in every step.
    TimerTick(u64),
    /// Start the first round. Legal only at Begin.
    ClickBegin,
    /// Submit the current inputs for scoring. Legal only during Question.
    ClickAnswer,
    /// Stop listening before the deadline (Timer variant only). Legal only
    /// during Question while the target is audible.
    ClickDoneListening,
    /// Advance from Result to the next Question, or to EndResults after the
    /// final round.
    ClickNext,
    /// Leave the session early (menu return). Legal in every step except
    /// EndResults; no results are emitted.
    ClickBack,
    /// Leave the session from the results screen. Legal only at EndResults.
    ClickQuit,
    /// A UI attached to the session and needs a full view-model.
    CreateUi,
    /// The UI detached. The round state survives for re-attachment.
    DestroyUi,
}

impl GameEvent {
    /// Short label used by event logs.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Init => "init",
            GameEvent::Slider(_, _) => "slider",
            GameEvent::ToggleInputOrTarget(_) => "toggle",
            GameEvent::TimerTick(_) => "tick",
            GameEvent::ClickBegin => "begin",
            GameEvent::ClickAnswer => "answer",
            GameEvent::ClickDoneListening => "done_listening",
            GameEvent::ClickNext => "next",
            GameEvent::ClickBack => "back",
            GameEvent::ClickQuit => "quit",
            GameEvent::CreateUi => "create_ui",
            GameEvent::DestroyUi => "destroy_ui",
        }
    }
}
