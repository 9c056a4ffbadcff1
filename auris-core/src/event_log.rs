//! Append-only JSONL event logs for debugging and replay.
//!
//! Every event posted to a session can be appended here
//! (`~/.local/share/auris/events.jsonl` by default); feeding the recorded
//! sequence back through a fresh reducer built from the same config, file
//! pool, and seed reproduces the session exactly. Logs are tailable via
//! `tail -f`.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use auris_types::GameEvent;

/// Log directory: `~/.local/share/auris/`
fn log_dir() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("auris")
    } else {
        PathBuf::from(".")
    }
}

#[derive(Serialize)]
struct SessionHeader {
    header: &'static str,
    epoch_ms: u128,
    seed: u64,
    title: String,
}

#[derive(Serialize)]
struct EventEntry<'a> {
    t_ms: u128,
    name: &'static str,
    event: &'a GameEvent,
}

/// Deserialized log line for replay; session headers have `header` instead of
/// `event`.
#[derive(Deserialize)]
struct ReplayEntry {
    event: Option<GameEvent>,
    #[allow(dead_code)]
    header: Option<String>,
}

/// Append-only JSONL writer for one session's events.
pub struct EventLog {
    writer: BufWriter<File>,
    session_start: Instant,
}

impl EventLog {
    /// Open (appending) the default event log.
    pub fn open_default(title: &str, seed: u64) -> Option<Self> {
        let dir = log_dir();
        if std::fs::create_dir_all(&dir).is_err() {
            return None;
        }
        Self::open(&dir.join("events.jsonl"), title, seed).ok()
    }

    /// Open (appending) an event log at `path` and write the session header.
    pub fn open(path: &Path, title: &str, seed: u64) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = BufWriter::new(file);

        let header = SessionHeader {
            header: "session_start",
            epoch_ms: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
            seed,
            title: title.to_string(),
        };
        if let Ok(json) = serde_json::to_string(&header) {
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        Ok(Self {
            writer,
            session_start: Instant::now(),
        })
    }

    /// Append one event. Write failures are logged, never fatal — losing a
    /// log line must not take the session down.
    pub fn log_event(&mut self, event: &GameEvent) {
        let entry = EventEntry {
            t_ms: self.session_start.elapsed().as_millis(),
            name: event.name(),
            event,
        };
        let written = serde_json::to_string(&entry)
            .map_err(std::io::Error::from)
            .and_then(|json| writeln!(self.writer, "{}", json))
            .and_then(|_| self.writer.flush());
        if written.is_err() {
            log::warn!(target: "event_log", "dropped log entry for {}", event.name());
        }
    }
}

/// Read the event sequence back from a log file.
///
/// Session headers and unparseable lines are skipped, so a log holding
/// several appended sessions replays as one concatenated sequence; slice on
/// `GameEvent::Init` to separate them.
pub fn replay(path: &Path) -> std::io::Result<Vec<GameEvent>> {
    let file = File::open(path)?;
    let mut events = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let entry: ReplayEntry = match serde_json::from_str(&line) {
            Ok(e) => e,
            Err(e) => {
                log::warn!(target: "event_log", "skipping unparseable log line: {}", e);
                continue;
            }
        };
        if let Some(event) = entry.event {
            events.push(event);
        }
    }
    Ok(events)
}
