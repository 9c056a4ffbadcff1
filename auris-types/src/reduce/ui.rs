//! View-model synthesis.
//!
//! Builds the fully-resolved `UiModel` the frontend renders verbatim. The
//! header, button, and widget states are derived from the round state alone;
//! nothing here feeds back into the reducer.

use crate::config::Variant;
use crate::effect::{UiModel, Visibility, WidgetState};
use crate::event::GameEvent;
use crate::state::{GameState, Mix, Step};
use crate::ParamId;

pub(super) fn view_model(state: &GameState) -> UiModel {
    let (action_label, action_event) = action_button(state);
    UiModel {
        header: header(state),
        action_label: action_label.to_string(),
        action_event,
        widgets: widgets(state),
        showing_target: state.mix == Mix::Target || state.step == Step::EndResults,
    }
}

fn header(state: &GameState) -> String {
    let round = state.current_round;
    let total = state.config.total_rounds;
    match (state.step, state.mix) {
        (Step::Begin, _) => state.config.title.clone(),
        (Step::Question, Mix::Target) => match state.config.variant {
            Variant::Tries => format!(
                "Round {}/{}: {} listens left",
                round, total, state.remaining_listens
            ),
            _ => format!("Round {}/{}: have a listen", round, total),
        },
        (Step::Question, _) => format!("Round {}/{}: reproduce the target", round, total),
        (Step::Result, _) => format!("Round {}/{}: score {}", round, total, state.score),
        (Step::EndResults, _) => format!("Results: {} points", state.score),
    }
}

fn action_button(state: &GameState) -> (&'static str, GameEvent) {
    match state.step {
        Step::Begin => ("Begin", GameEvent::ClickBegin),
        Step::Question => {
            if state.config.variant == Variant::Timer && state.mix == Mix::Target {
                ("Done listening", GameEvent::ClickDoneListening)
            } else {
                ("Answer", GameEvent::ClickAnswer)
            }
        }
        Step::Result => ("Next", GameEvent::ClickNext),
        Step::EndResults => ("Quit", GameEvent::ClickQuit),
    }
}

fn widgets(state: &GameState) -> Vec<WidgetState> {
    let discipline = &state.config.discipline;
    (0..discipline.param_count())
        .map(|i| {
            let visibility = match (state.step, state.mix) {
                (Step::Begin, _) => Visibility::Hiding,
                // The answer stays hidden while the target plays.
                (Step::Question, Mix::Target) | (Step::Question, Mix::Hidden) => Visibility::Hiding,
                (Step::Question, Mix::User) => {
                    if discipline.is_active(i) {
                        Visibility::Editing
                    } else {
                        Visibility::Hiding
                    }
                }
                (Step::Result, _) | (Step::EndResults, _) => Visibility::Showing,
            };
            // Reveal target positions only after the answer is in.
            let value = match state.step {
                Step::Result | Step::EndResults if state.mix != Mix::User => state.targets[i],
                _ => state.inputs.get(i).copied().unwrap_or(0.0),
            };
            WidgetState {
                param: ParamId::new(i as u32),
                visibility,
                position: discipline.value_position(i, value),
            }
        })
        .collect()
}
