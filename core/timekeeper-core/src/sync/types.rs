//! Wire types for the shared sync file.
//!
//! The file is a JSON array of [`WindowState`] records, one per live editor
//! window. Field names are part of the cross-window protocol; every field
//! carries a serde default so a record written by an older or newer build
//! still round-trips (missing numerics read as 0, missing or unrecognized
//! state reads as idle).

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::Phase;

/// Entries older than this are dropped on every read-modify-write pass.
pub const RETENTION_MS: i64 = 30_000;

/// A remote transition older than this is ignored by change detection —
/// it is startup noise or leftover state, not a live event.
pub const FRESHNESS_MS: i64 = 5_000;

/// One window's published timer state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowState {
    #[serde(default, deserialize_with = "phase_or_idle")]
    pub state: Phase,
    /// Milliseconds since the Unix epoch, stamped by the writing window.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, rename = "windowId")]
    pub window_id: String,
    /// Seconds left in the current phase; meaningful only when counting.
    #[serde(default, rename = "remainingTime")]
    pub remaining_time: u64,
}

impl WindowState {
    pub fn new(state: Phase, timestamp: i64, window_id: &str, remaining_time: u64) -> Self {
        WindowState {
            state,
            timestamp,
            window_id: window_id.to_string(),
            remaining_time,
        }
    }

    /// Whether this entry has aged past the retention window at `now_ms`.
    pub fn is_stale(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp > RETENTION_MS
    }

    /// Whether this entry is recent enough to treat as a live transition.
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < FRESHNESS_MS
    }
}

/// Unknown state strings parse as idle instead of failing the whole file.
/// serde's `other` attribute only covers tagged enums, so spelled out here.
fn phase_or_idle<'de, D>(deserializer: D) -> Result<Phase, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(match raw.as_str() {
        "work" => Phase::Work,
        "break" => Phase::Break,
        _ => Phase::Idle,
    })
}
