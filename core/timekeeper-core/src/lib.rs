//! # timekeeper-core
//!
//! Core library for Timekeeper, a work/break interval timer whose state is
//! shared across editor windows through a file in the OS temp directory.
//!
//! ## Design Principles
//!
//! - **Synchronous**: no async runtime; file I/O is blocking and the files
//!   involved are tiny.
//! - **Graceful degradation**: a missing or corrupt sync/config file reads
//!   as empty/defaults, never as an error the caller must handle.
//! - **Host-agnostic**: the engine is tick-driven and notifications go
//!   through a trait, so any host that can call a function once per second
//!   can embed it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use timekeeper_core::{load_config, SyncBroadcaster, TimerEngine};
//!
//! let mut engine = TimerEngine::new();
//! let broadcaster = SyncBroadcaster::at_default_path();
//! broadcaster.on_state_change(|phase| println!("other window: {phase}"));
//! engine.start(&load_config());
//! ```

pub mod config;
pub mod error;
pub mod notifications;
pub mod status;
pub mod sync;
pub mod timer;
pub mod types;

pub use config::{load_config, save_config, TimerConfig};
pub use error::{Result, TimekeeperError};
pub use notifications::{LogSink, NotificationSink};
pub use status::{format_countdown, status_line};
pub use sync::{default_sync_path, SyncBroadcaster, WindowState};
pub use timer::{TickOutcome, TimerEngine};
pub use types::Phase;
