//! Cross-window timer state synchronization.
//!
//! Multiple editor windows coordinate through one shared JSON file in the
//! OS temp directory — a best-effort broadcast channel, not a consistent
//! log.
//!
//! ```text
//! Window A ──write──▶ <tmp>/timekeeper-sync.json ◀──write── Window B
//!     ▲                        │ (file watch)                   ▲
//!     └────────── change detection + listener dispatch ─────────┘
//! ```
//!
//! # Module Structure
//!
//! - [`broadcaster`]: per-window publish/observe lifecycle
//! - [`file`]: defensive whole-file read/write and retention pruning
//! - [`types`]: the wire record and its staleness rules
//!
//! # Guarantees (and non-guarantees)
//!
//! At most one entry per window id; entries expire after 30 seconds; the
//! newest fresh other-window entry wins. Writers are uncoordinated — two
//! windows writing in the same tens of milliseconds clobber each other,
//! which is accepted (the payload is a notification, not data).

pub mod broadcaster;
pub mod file;
pub mod types;

pub use broadcaster::{default_sync_path, SyncBroadcaster};
pub use types::{WindowState, FRESHNESS_MS, RETENTION_MS};
