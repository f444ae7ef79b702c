//! User-facing notification boundary.
//!
//! The core announces timer events through this trait; hosts decide how
//! messages surface (editor toast, terminal line). Delivery is
//! fire-and-forget — a sink that drops messages is acceptable.

use crate::types::Phase;

/// Transient user-visible messages.
pub trait NotificationSink: Send + Sync {
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
}

/// Sink that routes messages through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink;

impl NotificationSink for LogSink {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn warn(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Standard announcement for a remote window's phase change.
pub fn announce_remote_phase(sink: &dyn NotificationSink, phase: Phase) {
    match phase {
        Phase::Break => sink.warn("Another window started a break — editing is paused."),
        Phase::Work => sink.info("Another window resumed work."),
        Phase::Idle => sink.info("Another window stopped its timer."),
    }
}
