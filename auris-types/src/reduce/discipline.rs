//! Discipline capability set: target drawing, slider mapping, scoring, and
//! DSP synthesis for the three training games.
//!
//! The reducer is generic over these operations; everything
//! discipline-specific lives here, selected by matching on the `Discipline`
//! variant rather than through trait objects.

use crate::config::Discipline;
use crate::effect::DspParam;
use crate::ParamId;

use super::{draw_index, next_random};

/// Nearest table entry for a normalized 0.0..=1.0 position.
fn table_value(table: &[f32], position: f32) -> f32 {
    let last = table.len() - 1;
    let idx = (position.clamp(0.0, 1.0) * last as f32).round() as usize;
    table[idx.min(last)]
}

/// Inverse of `table_value`: normalized position of a table entry.
fn table_position(table: &[f32], value: f32) -> f32 {
    let last = table.len().saturating_sub(1).max(1);
    let idx = table.iter().position(|v| *v == value).unwrap_or(0);
    idx as f32 / last as f32
}

impl Discipline {
    /// Draw one fresh target value per parameter slot, independent uniform
    /// draws.
    pub(super) fn draw_targets(&self, rng: &mut u64) -> Vec<f32> {
        match self {
            Discipline::Mixer {
                gain_steps_db,
                active,
            } => (0..active.len())
                .map(|_| gain_steps_db[draw_index(rng, gain_steps_db.len())])
                .collect(),
            Discipline::Frequency { min_hz, max_hz, .. } => {
                vec![min_hz + next_random(rng) * (max_hz - min_hz)]
            }
            Discipline::Compressor {
                thresholds_db,
                ratios,
                attacks_ms,
                releases_ms,
            } => vec![
                thresholds_db[draw_index(rng, thresholds_db.len())],
                ratios[draw_index(rng, ratios.len())],
                attacks_ms[draw_index(rng, attacks_ms.len())],
                releases_ms[draw_index(rng, releases_ms.len())],
            ],
        }
    }

    /// Deterministic round-start inputs: silent/neutral for parameters under
    /// test, pinned to the target for parameters that are not, so they can
    /// never affect scoring.
    pub(super) fn default_inputs(&self, targets: &[f32]) -> Vec<f32> {
        match self {
            Discipline::Mixer {
                gain_steps_db,
                active,
            } => active
                .iter()
                .zip(targets)
                .map(|(on, target)| if *on { gain_steps_db[0] } else { *target })
                .collect(),
            Discipline::Frequency { min_hz, .. } => vec![*min_hz],
            Discipline::Compressor {
                thresholds_db,
                ratios,
                attacks_ms,
                releases_ms,
            } => vec![
                thresholds_db[0],
                ratios[0],
                attacks_ms[0],
                releases_ms[0],
            ],
        }
    }

    /// Map a normalized slider position onto the parameter's value.
    pub(super) fn slider_value(&self, param: usize, position: f32) -> f32 {
        match self {
            Discipline::Mixer { gain_steps_db, .. } => table_value(gain_steps_db, position),
            Discipline::Frequency { min_hz, max_hz, .. } => {
                min_hz + position.clamp(0.0, 1.0) * (max_hz - min_hz)
            }
            Discipline::Compressor {
                thresholds_db,
                ratios,
                attacks_ms,
                releases_ms,
            } => match param {
                0 => table_value(thresholds_db, position),
                1 => table_value(ratios, position),
                2 => table_value(attacks_ms, position),
                3 => table_value(releases_ms, position),
                _ => unreachable!("compressor has four parameters"),
            },
        }
    }

    /// Inverse mapping for view-model widget positions.
    pub(super) fn value_position(&self, param: usize, value: f32) -> f32 {
        match self {
            Discipline::Mixer { gain_steps_db, .. } => table_position(gain_steps_db, value),
            Discipline::Frequency { min_hz, max_hz, .. } => {
                ((value - min_hz) / (max_hz - min_hz)).clamp(0.0, 1.0)
            }
            Discipline::Compressor {
                thresholds_db,
                ratios,
                attacks_ms,
                releases_ms,
            } => match param {
                0 => table_position(thresholds_db, value),
                1 => table_position(ratios, value),
                2 => table_position(attacks_ms, value),
                3 => table_position(releases_ms, value),
                _ => unreachable!("compressor has four parameters"),
            },
        }
    }

    /// Points for one answer: one per parameter whose input matches its
    /// target. Discrete disciplines compare exact table values; Frequency
    /// scores within `tolerance_hz`.
    pub(super) fn score(&self, targets: &[f32], inputs: &[f32], tolerance_hz: f32) -> u32 {
        match self {
            Discipline::Mixer { active, .. } => active
                .iter()
                .enumerate()
                .filter(|(i, on)| **on && targets[*i] == inputs[*i])
                .count() as u32,
            Discipline::Frequency { .. } => {
                if (targets[0] - inputs[0]).abs() <= tolerance_hz {
                    1
                } else {
                    0
                }
            }
            Discipline::Compressor { .. } => targets
                .iter()
                .zip(inputs)
                .filter(|(t, i)| t == i)
                .count() as u32,
        }
    }

    /// Translate one value set into concrete DSP parameter states.
    pub(super) fn synthesize_dsp(&self, values: &[f32]) -> Vec<(ParamId, DspParam)> {
        match self {
            Discipline::Mixer { .. } => values
                .iter()
                .enumerate()
                .map(|(i, db)| (ParamId::new(i as u32), DspParam::Gain { db: *db }))
                .collect(),
            Discipline::Frequency {
                band_gain_db,
                band_q,
                ..
            } => vec![
                (
                    ParamId::new(0),
                    DspParam::PeakingEq {
                        freq_hz: values[0],
                        q: *band_q,
                        gain_db: *band_gain_db,
                    },
                ),
                // Keeps the boosted round at the same loudness as the dry one.
                (
                    ParamId::new(1),
                    DspParam::MakeupGain {
                        db: -band_gain_db / 2.0,
                    },
                ),
            ],
            Discipline::Compressor { .. } => vec![(
                ParamId::new(0),
                DspParam::Compressor {
                    threshold_db: values[0],
                    ratio: values[1],
                    attack_ms: values[2],
                    release_ms: values[3],
                },
            )],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mixer() -> Discipline {
        Discipline::Mixer {
            gain_steps_db: vec![-12.0, -6.0, 0.0, 6.0],
            active: vec![true, false, true],
        }
    }

    #[test]
    fn mixer_targets_come_from_the_table() {
        let d = mixer();
        let mut rng = 99u64;
        for _ in 0..20 {
            let targets = d.draw_targets(&mut rng);
            assert_eq!(targets.len(), 3);
            for t in targets {
                assert!([-12.0, -6.0, 0.0, 6.0].contains(&t));
            }
        }
    }

    #[test]
    fn mixer_draws_reach_every_table_entry() {
        let d = mixer();
        let table = [-12.0, -6.0, 0.0, 6.0];
        let mut rng = 1u64;
        let mut seen = [false; 4];
        for _ in 0..2000 {
            for t in d.draw_targets(&mut rng) {
                seen[table.iter().position(|v| *v == t).unwrap()] = true;
            }
        }
        assert!(seen.iter().all(|s| *s), "unreached table entries: {:?}", seen);
    }

    #[test]
    fn mixer_defaults_pin_inactive_channels() {
        let d = mixer();
        let targets = vec![0.0, 6.0, -6.0];
        let inputs = d.default_inputs(&targets);
        assert_eq!(inputs[0], -12.0); // active: lowest step
        assert_eq!(inputs[1], 6.0); // inactive: pinned to target
        assert_eq!(inputs[2], -12.0);
    }

    #[test]
    fn mixer_scores_only_active_channels() {
        let d = mixer();
        let targets = vec![0.0, 6.0, -6.0];
        // channel 1 matches but is inactive; channel 2 matches and counts
        let inputs = vec![-12.0, 6.0, -6.0];
        assert_eq!(d.score(&targets, &inputs, 0.0), 1);
        assert_eq!(d.score(&targets, &targets, 0.0), 2);
    }

    #[test]
    fn slider_maps_to_nearest_step() {
        let d = mixer();
        assert_eq!(d.slider_value(0, 0.0), -12.0);
        assert_eq!(d.slider_value(0, 1.0), 6.0);
        assert_eq!(d.slider_value(0, 0.34), -6.0);
        assert_eq!(d.value_position(0, 6.0), 1.0);
    }

    #[test]
    fn frequency_draw_stays_in_range() {
        let d = Discipline::Frequency {
            min_hz: 200.0,
            max_hz: 2000.0,
            window_hz: 100.0,
            band_gain_db: 6.0,
            band_q: 2.0,
        };
        let mut rng = 7u64;
        let (mut low, mut high) = (false, false);
        for _ in 0..2000 {
            let t = d.draw_targets(&mut rng)[0];
            assert!((200.0..=2000.0).contains(&t));
            low |= t < 1100.0;
            high |= t > 1100.0;
        }
        assert!(low && high, "draws never crossed the range midpoint");
    }

    #[test]
    fn frequency_scores_within_window() {
        let d = Discipline::Frequency {
            min_hz: 200.0,
            max_hz: 2000.0,
            window_hz: 100.0,
            band_gain_db: 6.0,
            band_q: 2.0,
        };
        assert_eq!(d.score(&[1000.0], &[1080.0], 100.0), 1);
        assert_eq!(d.score(&[1000.0], &[1150.0], 100.0), 0);
    }

    #[test]
    fn frequency_dsp_carries_compensation() {
        let d = Discipline::Frequency {
            min_hz: 200.0,
            max_hz: 2000.0,
            window_hz: 100.0,
            band_gain_db: 6.0,
            band_q: 2.0,
        };
        let dsp = d.synthesize_dsp(&[440.0]);
        assert_eq!(dsp.len(), 2);
        assert_eq!(
            dsp[0].1,
            DspParam::PeakingEq {
                freq_hz: 440.0,
                q: 2.0,
                gain_db: 6.0
            }
        );
        assert_eq!(dsp[1].1, DspParam::MakeupGain { db: -3.0 });
    }

    #[test]
    fn compressor_draws_one_value_per_table() {
        let d = Discipline::Compressor {
            thresholds_db: vec![-30.0, -20.0, -10.0],
            ratios: vec![2.0, 4.0, 8.0],
            attacks_ms: vec![5.0, 30.0],
            releases_ms: vec![50.0, 200.0],
        };
        let mut rng = 3u64;
        let t = d.draw_targets(&mut rng);
        assert_eq!(t.len(), 4);
        assert!([-30.0, -20.0, -10.0].contains(&t[0]));
        assert!([2.0, 4.0, 8.0].contains(&t[1]));
        assert!([5.0, 30.0].contains(&t[2]));
        assert!([50.0, 200.0].contains(&t[3]));

        let dsp = d.synthesize_dsp(&t);
        assert_eq!(dsp.len(), 1);
        assert!(matches!(dsp[0].1, DspParam::Compressor { .. }));
    }
}
