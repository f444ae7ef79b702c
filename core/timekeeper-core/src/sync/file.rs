//! Shared sync file I/O.
//!
//! The file is the sole cross-process source of truth; every write
//! serializes the entire list (pretty-printed) and replaces the file.
//! There is deliberately no cross-writer coordination — two windows
//! writing in the same instant last-write-win and the loser's entry is
//! republished on its next broadcast cycle.
//!
//! # Defensive Design
//!
//! Other windows write this file at arbitrary times, so the read path
//! handles:
//! - Missing file (empty list)
//! - Empty file (empty list)
//! - Corrupt JSON (empty list, log warning)
//! - Missing fields (serde defaults, see `sync::types`)
//!
//! Writes go through a temp file + rename so a crash mid-write never
//! leaves a torn file for other windows to choke on.

use std::fs;
use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Result, TimekeeperError};

use super::types::WindowState;

/// Reads the full state list, treating every failure as an empty list.
pub fn read_states(path: &Path) -> Vec<WindowState> {
    if !path.exists() {
        return Vec::new();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read sync file");
            return Vec::new();
        }
    };

    if content.trim().is_empty() {
        return Vec::new();
    }

    match serde_json::from_str::<Vec<WindowState>>(&content) {
        Ok(states) => states,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Malformed sync file, treating as empty");
            Vec::new()
        }
    }
}

/// Replaces the file with the given list, pretty-printed.
pub fn write_states(path: &Path, states: &[WindowState]) -> Result<()> {
    let content = serde_json::to_string_pretty(states).map_err(|source| TimekeeperError::Json {
        context: "serializing sync state list".to_string(),
        source,
    })?;

    let parent_dir = path.parent().ok_or_else(|| TimekeeperError::Io {
        context: "sync file path has no parent directory".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "no parent"),
    })?;

    let mut temp_file =
        NamedTempFile::new_in(parent_dir).map_err(|source| TimekeeperError::Io {
            context: "creating sync temp file".to_string(),
            source,
        })?;
    temp_file
        .write_all(content.as_bytes())
        .map_err(|source| TimekeeperError::Io {
            context: "writing sync temp file".to_string(),
            source,
        })?;
    temp_file.flush().map_err(|source| TimekeeperError::Io {
        context: "flushing sync temp file".to_string(),
        source,
    })?;
    temp_file
        .persist(path)
        .map_err(|e| TimekeeperError::Io {
            context: "replacing sync file".to_string(),
            source: e.error,
        })?;

    Ok(())
}

/// Drops entries older than the retention window. Returns the survivors
/// and how many were removed.
pub fn prune_stale(states: Vec<WindowState>, now_ms: i64) -> (Vec<WindowState>, usize) {
    let before = states.len();
    let kept: Vec<WindowState> = states.into_iter().filter(|s| !s.is_stale(now_ms)).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// One broadcast cycle's list computation: drop any previous entry for
/// this window, append the fresh one, then apply retention.
pub fn merge_own_entry(states: Vec<WindowState>, entry: WindowState, now_ms: i64) -> Vec<WindowState> {
    let mut states: Vec<WindowState> = states
        .into_iter()
        .filter(|s| s.window_id != entry.window_id)
        .collect();
    states.push(entry);
    let (kept, _) = prune_stale(states, now_ms);
    kept
}
