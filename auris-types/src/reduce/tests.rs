use std::path::PathBuf;

use super::reduce;
use crate::config::{Discipline, GameConfig, Variant};
use crate::effect::{PlayerCmd, Visibility};
use crate::event::GameEvent;
use crate::state::{GameState, Mix, Step};
use crate::ParamId;

fn mixer_config(variant: Variant) -> GameConfig {
    let (listens, timeout_ms) = match variant {
        Variant::Normal => (None, None),
        Variant::Timer => (None, Some(1000)),
        Variant::Tries => (Some(2), None),
    };
    GameConfig {
        title: "Gain Match".to_string(),
        discipline: Discipline::Mixer {
            gain_steps_db: vec![-12.0, -6.0, 0.0, 6.0],
            active: vec![true, false, true],
        },
        variant,
        listens,
        timeout_ms,
        total_rounds: 2,
    }
}

fn frequency_config() -> GameConfig {
    GameConfig {
        title: "Find the Band".to_string(),
        discipline: Discipline::Frequency {
            min_hz: 200.0,
            max_hz: 2000.0,
            window_hz: 100.0,
            band_gain_db: 6.0,
            band_q: 2.0,
        },
        variant: Variant::Normal,
        listens: None,
        timeout_ms: None,
        total_rounds: 3,
    }
}

fn state(config: GameConfig, seed: u64) -> GameState {
    let files = vec![PathBuf::from("ref_a.wav"), PathBuf::from("ref_b.wav")];
    let mut state = GameState::new(config, files, seed).unwrap();
    reduce(&mut state, &GameEvent::Init);
    state
}

/// Slider position that reproduces `state.targets[param]` exactly.
fn position_of_target(state: &GameState, param: usize) -> f32 {
    state
        .config
        .discipline
        .value_position(param, state.targets[param])
}

#[test]
fn begin_enters_question_with_fresh_round() {
    let mut state = state(mixer_config(Variant::Normal), 42);
    let effects = reduce(&mut state, &GameEvent::ClickBegin);

    assert_eq!(state.step, Step::Question);
    assert_eq!(state.mix, Mix::Target);
    assert_eq!(state.current_round, 1);
    assert_eq!(effects.transition, Some((Step::Begin, Step::Question)));
    state.assert_sizing();

    let player = effects.player.expect("reference playback");
    assert!(matches!(player[0], PlayerCmd::Load(_)));
    assert_eq!(player[1], PlayerCmd::Play);
    assert!(effects.dsp.is_some());
}

#[test]
fn reference_file_draw_covers_the_pool() {
    let mut seen = std::collections::HashSet::new();
    for seed in 0..64 {
        let mut state = state(mixer_config(Variant::Normal), seed);
        let effects = reduce(&mut state, &GameEvent::ClickBegin);
        if let Some(PlayerCmd::Load(path)) = effects.player.unwrap().first() {
            seen.insert(path.clone());
        }
    }
    assert_eq!(seen.len(), 2, "one of the pool files is never drawn");
}

#[test]
fn inactive_channels_are_pinned_to_target() {
    let mut state = state(mixer_config(Variant::Normal), 42);
    reduce(&mut state, &GameEvent::ClickBegin);
    assert_eq!(state.inputs[1], state.targets[1]);
    // Active channels start at the lowest table step.
    assert_eq!(state.inputs[0], -12.0);
    assert_eq!(state.inputs[2], -12.0);
}

#[test]
fn answer_scores_matching_channels_and_enters_result() {
    let mut state = state(mixer_config(Variant::Normal), 42);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));

    // Match channel 0 exactly, leave channel 2 wrong unless it already is
    // the lowest step.
    let pos = position_of_target(&state, 0);
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), pos));
    let expected = 1 + u32::from(state.targets[2] == state.inputs[2]);

    let effects = reduce(&mut state, &GameEvent::ClickAnswer);
    assert_eq!(state.step, Step::Result);
    assert_eq!(state.mix, Mix::Target);
    assert_eq!(state.score, expected);
    assert_eq!(effects.transition, Some((Step::Question, Step::Result)));
    assert!(effects.results.is_none());
}

#[test]
fn full_session_reaches_end_results_once() {
    let mut state = state(mixer_config(Variant::Normal), 7);
    for round in 0..2 {
        let event = if round == 0 {
            GameEvent::ClickBegin
        } else {
            GameEvent::ClickNext
        };
        reduce(&mut state, &event);
        reduce(&mut state, &GameEvent::ClickAnswer);
    }
    let effects = reduce(&mut state, &GameEvent::ClickNext);

    assert_eq!(state.step, Step::EndResults);
    assert_eq!(effects.transition, Some((Step::Result, Step::EndResults)));
    let results = effects.results.expect("results on entering EndResults");
    assert_eq!(results.score, state.score);
    assert_eq!(results.total_rounds, 2);
    assert!(effects
        .player
        .unwrap()
        .contains(&PlayerCmd::Stop));

    let quit = reduce(&mut state, &GameEvent::ClickQuit);
    assert!(quit.quit);
    assert!(quit.results.is_none());
}

#[test]
fn replaying_the_event_sequence_reproduces_the_outcome() {
    let events = vec![
        GameEvent::Init,
        GameEvent::ClickBegin,
        GameEvent::ToggleInputOrTarget(false),
        GameEvent::Slider(ParamId::new(0), 0.67),
        GameEvent::Slider(ParamId::new(2), 1.0),
        GameEvent::ClickAnswer,
        GameEvent::ClickNext,
        GameEvent::ToggleInputOrTarget(false),
        GameEvent::Slider(ParamId::new(0), 0.0),
        GameEvent::ClickAnswer,
        GameEvent::ClickNext,
    ];
    let run = |seed: u64| {
        let mut state =
            GameState::new(mixer_config(Variant::Normal), vec![PathBuf::from("a.wav")], seed)
                .unwrap();
        for event in &events {
            reduce(&mut state, event);
        }
        (state.step, state.score, state.targets.clone())
    };
    assert_eq!(run(1234), run(1234));
    let (step, _, _) = run(1234);
    assert_eq!(step, Step::EndResults);
}

#[test]
#[should_panic(expected = "CreateUi without intervening DestroyUi")]
fn create_ui_twice_is_a_contract_violation() {
    let mut state = state(mixer_config(Variant::Normal), 1);
    reduce(&mut state, &GameEvent::CreateUi);
    reduce(&mut state, &GameEvent::CreateUi);
}

#[test]
#[should_panic(expected = "ClickAnswer outside Question")]
fn answering_outside_question_is_a_contract_violation() {
    let mut state = state(mixer_config(Variant::Normal), 1);
    reduce(&mut state, &GameEvent::ClickAnswer);
}

#[test]
#[should_panic(expected = "Slider while the target is audible")]
fn slider_during_target_mix_is_a_contract_violation() {
    let mut state = state(mixer_config(Variant::Normal), 1);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), 0.5));
}

// ── Tries variant ──

#[test]
fn tries_budget_counts_down_and_locks_out() {
    let mut state = state(mixer_config(Variant::Tries), 9);
    reduce(&mut state, &GameEvent::ClickBegin);
    assert_eq!(state.remaining_listens, 2);
    assert!(state.can_still_listen);

    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    assert_eq!(state.remaining_listens, 1);
    assert!(state.can_still_listen);

    reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    assert_eq!(state.remaining_listens, 0);
    assert!(!state.can_still_listen);
    assert_eq!(state.mix, Mix::User);
}

#[test]
#[should_panic(expected = "listen budget exhausted")]
fn tries_toggle_past_budget_is_a_contract_violation() {
    let mut state = state(mixer_config(Variant::Tries), 9);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
}

#[test]
fn tries_budget_resets_on_the_next_round() {
    let mut state = state(mixer_config(Variant::Tries), 9);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    reduce(&mut state, &GameEvent::ClickAnswer);
    reduce(&mut state, &GameEvent::ClickNext);
    assert_eq!(state.current_round, 2);
    assert_eq!(state.remaining_listens, 2);
    assert!(state.can_still_listen);
}

#[test]
fn result_step_toggling_is_unbudgeted() {
    let mut state = state(mixer_config(Variant::Tries), 9);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    assert!(!state.can_still_listen);
    reduce(&mut state, &GameEvent::ClickAnswer);
    // Result enters on the target mix; compare back and forth freely.
    for _ in 0..3 {
        reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
        reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
    }
    assert_eq!(state.mix, Mix::Target);
}

/// The end-to-end sequence from the round-engine contract: Tries, two
/// listens, one round, one channel, input set to the exact target.
#[test]
fn tries_end_to_end_single_round() {
    let config = GameConfig {
        title: "Single".to_string(),
        discipline: Discipline::Mixer {
            gain_steps_db: vec![-12.0, -6.0, 0.0, 6.0],
            active: vec![true],
        },
        variant: Variant::Tries,
        listens: Some(2),
        timeout_ms: None,
        total_rounds: 1,
    };
    let mut state = GameState::new(config, vec![PathBuf::from("a.wav")], 77).unwrap();
    reduce(&mut state, &GameEvent::Init);
    reduce(&mut state, &GameEvent::CreateUi);
    reduce(&mut state, &GameEvent::ClickBegin);

    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(true));
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    assert_eq!(state.remaining_listens, 0);

    let pos = position_of_target(&state, 0);
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), pos));
    reduce(&mut state, &GameEvent::ClickAnswer);
    let effects = reduce(&mut state, &GameEvent::ClickNext);

    assert_eq!(state.step, Step::EndResults);
    assert_eq!(state.score, 1);
    assert_eq!(effects.results.unwrap().score, 1);
}

// ── Timer variant ──

#[test]
fn timer_deadline_forces_user_mix_without_any_toggle() {
    let mut state = state(mixer_config(Variant::Timer), 5);
    reduce(&mut state, &GameEvent::TimerTick(500));
    reduce(&mut state, &GameEvent::ClickBegin);
    assert_eq!(state.timestamp_start, 500);
    assert_eq!(state.mix, Mix::Target);

    let effects = reduce(&mut state, &GameEvent::TimerTick(1400));
    assert!(effects.is_empty());
    assert_eq!(state.mix, Mix::Target);

    let effects = reduce(&mut state, &GameEvent::TimerTick(1500));
    assert_eq!(state.mix, Mix::User);
    assert!(!state.can_still_listen);
    assert!(effects.dsp.is_some());
}

#[test]
fn done_listening_stops_early() {
    let mut state = state(mixer_config(Variant::Timer), 5);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ClickDoneListening);
    assert_eq!(state.mix, Mix::User);
    assert!(!state.can_still_listen);
}

#[test]
#[should_panic(expected = "deadline-bound")]
fn timer_question_toggle_is_a_contract_violation() {
    let mut state = state(mixer_config(Variant::Timer), 5);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
}

#[test]
fn timer_result_auto_advances_on_deadline() {
    let mut state = state(mixer_config(Variant::Timer), 5);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::TimerTick(2000)); // forces user mix
    reduce(&mut state, &GameEvent::TimerTick(2100));
    reduce(&mut state, &GameEvent::ClickAnswer);
    assert_eq!(state.step, Step::Result);
    assert_eq!(state.timestamp_start, 2100);

    let effects = reduce(&mut state, &GameEvent::TimerTick(3100));
    assert_eq!(state.step, Step::Question);
    assert_eq!(state.current_round, 2);
    assert_eq!(effects.transition, Some((Step::Result, Step::Question)));
}

// ── Frequency discipline ──

#[test]
fn frequency_window_shrinks_by_factor_per_correct_answer() {
    let mut state = state(frequency_config(), 11);
    reduce(&mut state, &GameEvent::ClickBegin);
    assert_eq!(state.tolerance_hz, 100.0);

    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    let pos = position_of_target(&state, 0);
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), pos));
    reduce(&mut state, &GameEvent::ClickAnswer);
    assert_eq!(state.score, 1);
    assert!((state.tolerance_hz - 95.0).abs() < 1e-3);

    reduce(&mut state, &GameEvent::ClickNext);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    let pos = position_of_target(&state, 0);
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), pos));
    reduce(&mut state, &GameEvent::ClickAnswer);
    assert_eq!(state.score, 2);
    assert!((state.tolerance_hz - 90.25).abs() < 1e-3);
}

#[test]
fn frequency_wrong_answer_keeps_the_window() {
    let mut state = state(frequency_config(), 11);
    reduce(&mut state, &GameEvent::ClickBegin);
    reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    // Park the slider at whichever end is far from the target.
    let pos = if state.targets[0] > 1100.0 { 0.0 } else { 1.0 };
    reduce(&mut state, &GameEvent::Slider(ParamId::new(0), pos));
    reduce(&mut state, &GameEvent::ClickAnswer);
    assert_eq!(state.score, 0);
    assert_eq!(state.tolerance_hz, 100.0);
}

// ── View model ──

#[test]
fn ui_effect_is_emitted_only_while_attached() {
    let mut state = state(mixer_config(Variant::Normal), 3);
    let effects = reduce(&mut state, &GameEvent::ClickBegin);
    assert!(effects.ui.is_none());

    let effects = reduce(&mut state, &GameEvent::CreateUi);
    let ui = effects.ui.expect("view model on attach");
    assert_eq!(ui.action_label, "Answer");

    reduce(&mut state, &GameEvent::DestroyUi);
    let effects = reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    assert!(effects.ui.is_none());
}

#[test]
fn widgets_hide_while_the_target_plays_and_edit_on_user_mix() {
    let mut state = state(mixer_config(Variant::Normal), 3);
    reduce(&mut state, &GameEvent::CreateUi);
    let effects = reduce(&mut state, &GameEvent::ClickBegin);
    let ui = effects.ui.unwrap();
    assert!(ui.showing_target);
    assert!(ui.widgets.iter().all(|w| w.visibility == Visibility::Hiding));

    let effects = reduce(&mut state, &GameEvent::ToggleInputOrTarget(false));
    let ui = effects.ui.unwrap();
    assert_eq!(ui.widgets[0].visibility, Visibility::Editing);
    assert_eq!(ui.widgets[1].visibility, Visibility::Hiding); // inactive
    assert_eq!(ui.widgets[2].visibility, Visibility::Editing);
}

#[test]
fn result_reveals_targets_read_only() {
    let mut state = state(mixer_config(Variant::Normal), 3);
    reduce(&mut state, &GameEvent::CreateUi);
    reduce(&mut state, &GameEvent::ClickBegin);
    let effects = reduce(&mut state, &GameEvent::ClickAnswer);
    let ui = effects.ui.unwrap();
    assert!(ui.widgets.iter().all(|w| w.visibility == Visibility::Showing));
    assert_eq!(ui.action_label, "Next");
    assert_eq!(ui.action_event, GameEvent::ClickNext);
}

#[test]
fn timer_listening_substitutes_the_action_button() {
    let mut state = state(mixer_config(Variant::Timer), 3);
    reduce(&mut state, &GameEvent::CreateUi);
    let effects = reduce(&mut state, &GameEvent::ClickBegin);
    let ui = effects.ui.unwrap();
    assert_eq!(ui.action_label, "Done listening");
    assert_eq!(ui.action_event, GameEvent::ClickDoneListening);

    let effects = reduce(&mut state, &GameEvent::ClickDoneListening);
    assert_eq!(effects.ui.unwrap().action_event, GameEvent::ClickAnswer);
}

#[test]
fn tries_header_counts_remaining_listens() {
    let mut state = state(mixer_config(Variant::Tries), 3);
    reduce(&mut state, &GameEvent::CreateUi);
    let effects = reduce(&mut state, &GameEvent::ClickBegin);
    assert_eq!(effects.ui.unwrap().header, "Round 1/2: 2 listens left");
}

#[test]
fn back_quits_without_results() {
    let mut state = state(mixer_config(Variant::Normal), 3);
    reduce(&mut state, &GameEvent::ClickBegin);
    let effects = reduce(&mut state, &GameEvent::ClickBack);
    assert!(effects.quit);
    assert!(effects.results.is_none());
    assert!(effects.player.unwrap().contains(&PlayerCmd::Stop));
}
