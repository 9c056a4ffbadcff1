//! The round reducer: pure state machine for all three disciplines.
//!
//! `reduce` is the single entry point for round-state mutation. It applies one
//! event to the state and returns an `EffectBundle` for collaborators; it
//! never performs I/O itself.
//!
//! Step lifecycle: `Begin → Question → Result → … → Result → EndResults`.
//! Per-variant timing/retry policy (Normal/Timer/Tries) and per-discipline
//! value logic (Mixer/Frequency/Compressor) are both configuration, not
//! separate reducers.
//!
//! Events with violated preconditions panic: they mean the UI or harness has
//! desynchronized from the round state, which a conforming caller never does.

mod discipline;
mod ui;

#[cfg(test)]
mod tests;

use crate::config::Variant;
use crate::effect::{EffectBundle, PlayerCmd, RoundResults};
use crate::event::GameEvent;
use crate::state::{GameState, Mix, Step};

/// Seedable LCG, uniform in [0, 1). Explicit state makes every draw
/// reproducible from the session seed.
fn next_random(state: &mut u64) -> f32 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 33) as f32) / ((1u64 << 31) as f32)
}

/// Uniform index draw over `0..len`.
fn draw_index(rng: &mut u64, len: usize) -> usize {
    debug_assert!(len > 0);
    ((next_random(rng) * len as f32) as usize).min(len - 1)
}

/// Apply one event. Mutates `state` in place and returns the effects the
/// collaborators should carry out.
pub fn reduce(state: &mut GameState, event: &GameEvent) -> EffectBundle {
    let mut effects = EffectBundle::none();

    match event {
        GameEvent::Init => {
            assert!(
                state.step == Step::Begin && state.current_round == 0,
                "Init posted into a running session"
            );
        }
        GameEvent::CreateUi => {
            assert!(!state.ui_created, "CreateUi without intervening DestroyUi");
            state.ui_created = true;
        }
        GameEvent::DestroyUi => {
            assert!(state.ui_created, "DestroyUi with no UI attached");
            state.ui_created = false;
        }
        GameEvent::ClickBegin => {
            assert_eq!(state.step, Step::Begin, "ClickBegin outside Begin");
            enter_question(state, &mut effects);
        }
        GameEvent::Slider(param, position) => {
            assert_eq!(state.step, Step::Question, "Slider outside Question");
            assert_eq!(state.mix, Mix::User, "Slider while the target is audible");
            assert!(
                state.config.discipline.is_active(param.index()),
                "Slider on inactive parameter {}",
                param
            );
            state.inputs[param.index()] =
                state.config.discipline.slider_value(param.index(), *position);
            push_dsp(state, &mut effects);
        }
        GameEvent::ToggleInputOrTarget(want_target) => {
            toggle_mix(state, *want_target, &mut effects);
        }
        GameEvent::ClickDoneListening => {
            assert_eq!(
                state.config.variant,
                Variant::Timer,
                "ClickDoneListening outside Timer variant"
            );
            assert!(
                state.step == Step::Question && state.mix == Mix::Target,
                "ClickDoneListening while not listening"
            );
            stop_listening(state, &mut effects);
        }
        GameEvent::ClickAnswer => {
            assert_eq!(state.step, Step::Question, "ClickAnswer outside Question");
            check_answer(state, &mut effects);
        }
        GameEvent::ClickNext => {
            assert_eq!(state.step, Step::Result, "ClickNext outside Result");
            advance_from_result(state, &mut effects);
        }
        GameEvent::TimerTick(timestamp) => {
            tick(state, *timestamp, &mut effects);
        }
        GameEvent::ClickBack => {
            assert_ne!(state.step, Step::EndResults, "ClickBack after EndResults");
            effects.push_player(PlayerCmd::Stop);
            effects.quit = true;
        }
        GameEvent::ClickQuit => {
            assert_eq!(state.step, Step::EndResults, "ClickQuit before EndResults");
            effects.quit = true;
        }
    }

    if state.ui_created && !matches!(event, GameEvent::DestroyUi) {
        effects.ui = Some(ui::view_model(state));
    }
    effects
}

/// Start the next round: fresh targets, neutral inputs, target mix, reference
/// playback, per-variant timer/budget setup.
fn enter_question(state: &mut GameState, effects: &mut EffectBundle) {
    let from = state.step;
    state.current_round += 1;
    state.step = Step::Question;
    state.mix = Mix::Target;

    state.targets = state.config.discipline.draw_targets(&mut state.rng);
    state.inputs = state.config.discipline.default_inputs(&state.targets);

    match state.config.variant {
        Variant::Normal => {}
        Variant::Timer => {
            state.timestamp_start = state.current_timestamp;
            state.can_still_listen = true;
        }
        Variant::Tries => {
            state.remaining_listens = state.config.listens.unwrap_or(0);
            state.can_still_listen = true;
        }
    }

    if !state.files.is_empty() {
        let file = state.files[draw_index(&mut state.rng, state.files.len())].clone();
        effects.push_player(PlayerCmd::Load(file));
        effects.push_player(PlayerCmd::Play);
    }

    effects.set_transition(from, Step::Question);
    state.assert_sizing();
    push_dsp(state, effects);
}

/// Score the current inputs and reveal the target.
fn check_answer(state: &mut GameState, effects: &mut EffectBundle) {
    let points = state
        .config
        .discipline
        .score(&state.targets, &state.inputs, state.tolerance_hz);
    state.score += points;
    // Frequency difficulty ramp: every correct answer tightens the window.
    // Intentionally unbounded.
    if points > 0 && matches!(state.config.discipline, crate::config::Discipline::Frequency { .. })
    {
        state.tolerance_hz *= 0.95;
    }

    state.step = Step::Result;
    state.mix = Mix::Target;
    if state.config.variant == Variant::Timer {
        // Re-arm: the Result screen auto-advances on the same deadline.
        state.timestamp_start = state.current_timestamp;
    }

    effects.set_transition(Step::Question, Step::Result);
    state.assert_sizing();
    push_dsp(state, effects);
}

/// Result → next Question, or EndResults after the final round.
fn advance_from_result(state: &mut GameState, effects: &mut EffectBundle) {
    if state.current_round >= state.config.total_rounds {
        enter_end(state, effects);
    } else {
        enter_question(state, effects);
    }
}

/// Freeze the score and emit the one-shot results effect.
fn enter_end(state: &mut GameState, effects: &mut EffectBundle) {
    state.step = Step::EndResults;
    state.mix = Mix::Hidden;
    let analytics = next_random(&mut state.rng);

    effects.push_player(PlayerCmd::Stop);
    effects.set_transition(Step::Result, Step::EndResults);
    effects.results = Some(RoundResults {
        title: state.config.title.clone(),
        score: state.score,
        total_rounds: state.config.total_rounds,
        analytics,
    });
    state.assert_sizing();
}

fn toggle_mix(state: &mut GameState, want_target: bool, effects: &mut EffectBundle) {
    assert!(
        state.step == Step::Question || state.step == Step::Result,
        "ToggleInputOrTarget outside Question/Result"
    );
    if state.step == Step::Question {
        assert_ne!(
            state.config.variant,
            Variant::Timer,
            "listening is deadline-bound in Timer Questions"
        );
    }

    if want_target {
        assert_eq!(state.mix, Mix::User, "toggle to target while not on user mix");
        assert!(
            state.step == Step::Result || state.can_still_listen,
            "listen budget exhausted"
        );
        state.mix = Mix::Target;
    } else {
        assert_eq!(state.mix, Mix::Target, "toggle to user while not on target mix");
        if state.step == Step::Question && state.config.variant == Variant::Tries {
            state.remaining_listens -= 1;
            if state.remaining_listens == 0 {
                state.can_still_listen = false;
            }
        }
        state.mix = Mix::User;
    }
    push_dsp(state, effects);
}

/// Forced or voluntary end of listening: same outcome as Tries exhausting its
/// budget.
fn stop_listening(state: &mut GameState, effects: &mut EffectBundle) {
    state.mix = Mix::User;
    state.can_still_listen = false;
    push_dsp(state, effects);
}

fn tick(state: &mut GameState, timestamp: u64, effects: &mut EffectBundle) {
    state.current_timestamp = timestamp;
    let Some(deadline) = state.deadline() else {
        return;
    };
    if timestamp < deadline {
        return;
    }
    match state.step {
        Step::Question if state.mix == Mix::Target => stop_listening(state, effects),
        Step::Result => advance_from_result(state, effects),
        _ => {}
    }
}

/// Push the currently-audible value set to the DSP chain: the user's inputs
/// while their mix is live, the target values otherwise.
fn push_dsp(state: &GameState, effects: &mut EffectBundle) {
    if state.targets.is_empty() {
        return;
    }
    let values = match state.mix {
        Mix::User => &state.inputs,
        Mix::Target | Mix::Hidden => &state.targets,
    };
    effects.dsp = Some(state.config.discipline.synthesize_dsp(values));
}
