//! Engine handle: fire-and-forget command channel to the audio collaborator.
//!
//! The reducer emits declarative DSP/playback effects; `EngineHandle::apply`
//! translates them into `EngineCmd`s and pushes them down an unbounded
//! channel. The real DSP chain drains the receiver on its own thread — the
//! session never waits on it and never learns about playback failures, which
//! is why the Timer variant measures its deadline against the tick source
//! rather than the playback position.

use std::path::PathBuf;

use crossbeam_channel::{Receiver, Sender};

use auris_types::{DspParam, EffectBundle, ParamId, PlayerCmd};

/// One command for the audio engine thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCmd {
    /// Set the DSP parameter state for one channel/band.
    PushDsp { param: ParamId, state: DspParam },
    Load(PathBuf),
    Play,
    Pause,
    Stop,
    Seek(f32),
}

/// Main-thread handle to the engine command channel.
pub struct EngineHandle {
    tx: Sender<EngineCmd>,
}

impl EngineHandle {
    /// Create the handle and the receiver the engine thread drains.
    pub fn new() -> (Self, Receiver<EngineCmd>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { tx }, rx)
    }

    /// Fire-and-forget send; a disconnected engine is logged, not fatal.
    pub fn send(&self, cmd: EngineCmd) {
        if self.tx.send(cmd).is_err() {
            log::warn!(target: "engine", "command dropped: engine disconnected");
        }
    }

    /// Translate one effect bundle into engine commands, DSP pushes first,
    /// then playback commands in their recorded order.
    pub fn apply(&self, effects: &EffectBundle) {
        if let Some(dsp) = &effects.dsp {
            for (param, state) in dsp {
                self.send(EngineCmd::PushDsp {
                    param: *param,
                    state: state.clone(),
                });
            }
        }
        if let Some(player) = &effects.player {
            for cmd in player {
                self.send(match cmd {
                    PlayerCmd::Load(path) => EngineCmd::Load(path.clone()),
                    PlayerCmd::Play => EngineCmd::Play,
                    PlayerCmd::Pause => EngineCmd::Pause,
                    PlayerCmd::Stop => EngineCmd::Stop,
                    PlayerCmd::Seek(pos) => EngineCmd::Seek(*pos),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_orders_dsp_before_playback() {
        let (engine, rx) = EngineHandle::new();
        let mut effects = EffectBundle::none();
        effects.dsp = Some(vec![(ParamId::new(0), DspParam::Gain { db: -6.0 })]);
        effects.push_player(PlayerCmd::Load(PathBuf::from("a.wav")));
        effects.push_player(PlayerCmd::Play);

        engine.apply(&effects);
        let cmds: Vec<EngineCmd> = rx.try_iter().collect();
        assert_eq!(
            cmds,
            vec![
                EngineCmd::PushDsp {
                    param: ParamId::new(0),
                    state: DspParam::Gain { db: -6.0 },
                },
                EngineCmd::Load(PathBuf::from("a.wav")),
                EngineCmd::Play,
            ]
        );
    }

    #[test]
    fn empty_bundle_sends_nothing() {
        let (engine, rx) = EngineHandle::new();
        engine.apply(&EffectBundle::none());
        assert!(rx.try_iter().next().is_none());
    }

    #[test]
    fn disconnected_engine_does_not_panic() {
        let (engine, rx) = EngineHandle::new();
        drop(rx);
        engine.send(EngineCmd::Stop);
    }
}
