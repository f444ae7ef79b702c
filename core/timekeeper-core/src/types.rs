//! Shared timer types.

use serde::{Deserialize, Serialize};

/// What a window is currently doing with its interval timer.
///
/// Serialized as the lowercase strings `"work"`, `"break"`, `"idle"` — this
/// is the wire vocabulary of the shared sync file, so renaming a variant is
/// a cross-window protocol change.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
    #[default]
    Idle,
}

impl Phase {
    /// Whether a countdown is meaningful in this phase.
    pub fn is_counting(&self) -> bool {
        matches!(self, Self::Work | Self::Break)
    }

    /// Human label used in status text and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work",
            Self::Break => "Break",
            Self::Idle => "Idle",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Work => "work",
            Self::Break => "break",
            Self::Idle => "idle",
        };
        f.write_str(s)
    }
}
