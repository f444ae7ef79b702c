//! Status-line text for the countdown.

use crate::timer::TimerEngine;
use crate::types::Phase;

/// Formats seconds as zero-padded `MM:SS`.
pub fn format_countdown(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One-line status text for the current engine state.
pub fn status_line(engine: &TimerEngine) -> String {
    if !engine.is_active() {
        return "⏰ Start Timer".to_string();
    }

    let icon = match engine.phase() {
        Phase::Break => "☕",
        _ => "💻",
    };
    format!(
        "{} {}: {}",
        icon,
        engine.phase().label(),
        format_countdown(engine.remaining_secs())
    )
}
