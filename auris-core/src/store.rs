//! Round-result history.
//!
//! Finished sessions append their `RoundResults` to a JSONL file
//! (`~/.local/share/auris/results.jsonl` by default). Entries are plain value
//! trees; anything that wants a richer schema imports from here.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use auris_types::RoundResults;

/// One stored history entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredResult {
    pub epoch_ms: u128,
    #[serde(flatten)]
    pub results: RoundResults,
}

fn default_path() -> PathBuf {
    if let Some(home) = std::env::var_os("HOME") {
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("auris")
            .join("results.jsonl")
    } else {
        PathBuf::from("results.jsonl")
    }
}

/// Append one result to the default history file.
pub fn append_default(results: &RoundResults) -> std::io::Result<()> {
    let path = default_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    append(&path, results)
}

/// Append one result to `path`.
pub fn append(path: &Path, results: &RoundResults) -> std::io::Result<()> {
    let entry = StoredResult {
        epoch_ms: std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis(),
        results: results.clone(),
    };
    let json = serde_json::to_string(&entry)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{}", json)
}

/// Load the full history, skipping unparseable lines.
pub fn load(path: &Path) -> std::io::Result<Vec<StoredResult>> {
    let file = File::open(path)?;
    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<StoredResult>(&line) {
            Ok(entry) => out.push(entry),
            Err(e) => {
                log::warn!(target: "store", "skipping unparseable result line: {}", e)
            }
        }
    }
    Ok(out)
}
