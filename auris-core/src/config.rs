//! Discipline preset loading.
//!
//! Presets ship embedded (`config.toml` next to this file) and may be
//! extended by a user file at `~/.config/auris/config.toml`. Malformed user
//! files and invalid preset entries are logged and skipped, never fatal.

use std::path::PathBuf;

use serde::Deserialize;

use auris_types::{Discipline, GameConfig, Variant};

const DEFAULT_CONFIG: &str = include_str!("config.toml");

#[derive(Deserialize, Default)]
struct PresetsFile {
    #[serde(default)]
    preset: Vec<PresetEntry>,
}

/// One flat TOML preset entry; `to_config` maps it onto the domain types.
#[derive(Debug, Clone, Deserialize)]
struct PresetEntry {
    title: String,
    discipline: String,
    variant: String,
    rounds: u32,
    listens: Option<u32>,
    timeout_ms: Option<u64>,

    // mixer
    gain_steps_db: Option<Vec<f32>>,
    active: Option<Vec<bool>>,

    // frequency
    min_hz: Option<f32>,
    max_hz: Option<f32>,
    window_hz: Option<f32>,
    band_gain_db: Option<f32>,
    band_q: Option<f32>,

    // compressor
    thresholds_db: Option<Vec<f32>>,
    ratios: Option<Vec<f32>>,
    attacks_ms: Option<Vec<f32>>,
    releases_ms: Option<Vec<f32>>,
}

impl PresetEntry {
    fn to_config(&self) -> Result<GameConfig, String> {
        let variant = match self.variant.as_str() {
            "normal" => Variant::Normal,
            "timer" => Variant::Timer,
            "tries" => Variant::Tries,
            other => return Err(format!("unknown variant '{}'", other)),
        };
        let discipline = match self.discipline.as_str() {
            "mixer" => Discipline::Mixer {
                gain_steps_db: self
                    .gain_steps_db
                    .clone()
                    .ok_or("mixer preset needs gain_steps_db")?,
                active: self.active.clone().ok_or("mixer preset needs active")?,
            },
            "frequency" => Discipline::Frequency {
                min_hz: self.min_hz.ok_or("frequency preset needs min_hz")?,
                max_hz: self.max_hz.ok_or("frequency preset needs max_hz")?,
                window_hz: self.window_hz.ok_or("frequency preset needs window_hz")?,
                band_gain_db: self.band_gain_db.unwrap_or(6.0),
                band_q: self.band_q.unwrap_or(2.0),
            },
            "compressor" => Discipline::Compressor {
                thresholds_db: self
                    .thresholds_db
                    .clone()
                    .ok_or("compressor preset needs thresholds_db")?,
                ratios: self.ratios.clone().ok_or("compressor preset needs ratios")?,
                attacks_ms: self
                    .attacks_ms
                    .clone()
                    .ok_or("compressor preset needs attacks_ms")?,
                releases_ms: self
                    .releases_ms
                    .clone()
                    .ok_or("compressor preset needs releases_ms")?,
            },
            other => return Err(format!("unknown discipline '{}'", other)),
        };
        let config = GameConfig {
            title: self.title.clone(),
            discipline,
            variant,
            listens: self.listens,
            timeout_ms: self.timeout_ms,
            total_rounds: self.rounds,
        };
        config.validate()?;
        Ok(config)
    }
}

/// The loaded preset list: embedded defaults plus user additions.
pub struct Presets {
    entries: Vec<PresetEntry>,
}

impl Presets {
    /// Load embedded presets, then append presets from the user config file
    /// if one exists and parses.
    pub fn load() -> Self {
        let mut base: PresetsFile =
            toml::from_str(DEFAULT_CONFIG).expect("failed to parse embedded config.toml");

        if let Some(path) = user_config_path() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(contents) => match toml::from_str::<PresetsFile>(&contents) {
                        Ok(user) => base.preset.extend(user.preset),
                        Err(e) => {
                            log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                        }
                    },
                    Err(e) => {
                        log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                    }
                }
            }
        }

        Self {
            entries: base.preset,
        }
    }

    /// Parse a preset file directly (tests, alternate locations).
    pub fn parse(contents: &str) -> Result<Self, String> {
        let file: PresetsFile = toml::from_str(contents).map_err(|e| e.to_string())?;
        Ok(Self {
            entries: file.preset,
        })
    }

    /// Validated configs, one per well-formed entry. Invalid entries are
    /// logged and skipped.
    pub fn into_configs(self) -> Vec<GameConfig> {
        self.entries
            .iter()
            .filter_map(|entry| match entry.to_config() {
                Ok(config) => Some(config),
                Err(e) => {
                    log::warn!(target: "config", "skipping preset '{}': {}", entry.title, e);
                    None
                }
            })
            .collect()
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("auris").join("config.toml"))
}
