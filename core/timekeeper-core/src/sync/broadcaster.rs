//! Cross-window state broadcasting over the shared sync file.
//!
//! Each editor window owns one [`SyncBroadcaster`]. It publishes that
//! window's phase into the shared file and watches the file for writes
//! from other windows, raising a callback when another window has just
//! changed phase.
//!
//! # Change Detection
//!
//! On every file modification: parse the file, discard this window's own
//! entries, and take the newest of the rest. If it was written within the
//! last 5 seconds its phase is dispatched to every registered listener;
//! anything older is startup noise or leftover state and is ignored.
//!
//! Listeners must not write the sync file from inside the callback — the
//! dispatch runs on the watch thread and a write there would immediately
//! re-trigger it.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::types::Phase;

use super::file;
use super::types::WindowState;

/// Fixed name of the shared file, under the OS temp directory.
const SYNC_FILE_NAME: &str = "timekeeper-sync.json";

/// Returns the well-known shared sync file path for this machine.
pub fn default_sync_path() -> PathBuf {
    std::env::temp_dir().join(SYNC_FILE_NAME)
}

type Listener = Box<dyn Fn(Phase) + Send + Sync>;

/// State shared with the watch thread.
struct BroadcasterInner {
    window_id: String,
    path: PathBuf,
    listeners: Mutex<Vec<Listener>>,
}

impl BroadcasterInner {
    /// Runs one change-detection pass and dispatches to listeners.
    fn handle_file_change(&self, now_ms: i64) {
        let states = file::read_states(&self.path);
        if let Some(phase) = latest_remote_phase(&states, &self.window_id, now_ms) {
            tracing::debug!(%phase, window_id = %self.window_id, "Remote phase change detected");
            let listeners = match self.listeners.lock() {
                Ok(listeners) => listeners,
                Err(poisoned) => poisoned.into_inner(),
            };
            for listener in listeners.iter() {
                listener(phase);
            }
        }
    }
}

/// The newest other-window entry's phase, if it is fresh enough to be a
/// live transition. `None` when no other window has an entry or the
/// newest one is older than the freshness window.
fn latest_remote_phase(states: &[WindowState], own_id: &str, now_ms: i64) -> Option<Phase> {
    states
        .iter()
        .filter(|s| s.window_id != own_id)
        .max_by_key(|s| s.timestamp)
        .filter(|s| s.is_fresh(now_ms))
        .map(|s| s.state)
}

/// Publishes this window's timer phase and observes other windows'.
pub struct SyncBroadcaster {
    inner: Arc<BroadcasterInner>,
    watcher: Option<RecommendedWatcher>,
}

impl SyncBroadcaster {
    /// Creates a broadcaster at the well-known temp-dir path.
    pub fn at_default_path() -> Self {
        Self::new(default_sync_path())
    }

    /// Creates a broadcaster publishing to `path`.
    ///
    /// If the file does not exist it is initialized with this window's
    /// Idle entry; if it does, entries left behind by crashed windows are
    /// pruned (self-healing — a window that never disposed cleanly would
    /// otherwise linger until another window's broadcast cycle).
    pub fn new(path: PathBuf) -> Self {
        let inner = Arc::new(BroadcasterInner {
            window_id: generate_window_id(),
            path,
            listeners: Mutex::new(Vec::new()),
        });

        let now_ms = Utc::now().timestamp_millis();
        if inner.path.exists() {
            let (kept, removed) = file::prune_stale(file::read_states(&inner.path), now_ms);
            if removed > 0 {
                tracing::debug!(removed, "Startup cleanup pruned stale sync entries");
            }
            if let Err(e) = file::write_states(&inner.path, &kept) {
                tracing::warn!(error = %e, "Startup cleanup write failed");
            }
        } else {
            let initial = WindowState::new(Phase::Idle, now_ms, &inner.window_id, 0);
            if let Err(e) = file::write_states(&inner.path, &[initial]) {
                tracing::warn!(error = %e, "Failed to initialize sync file");
            }
        }

        let watcher = start_watcher(Arc::clone(&inner));

        SyncBroadcaster { inner, watcher }
    }

    /// The opaque identity of this window, unique per process lifetime.
    pub fn window_id(&self) -> &str {
        &self.inner.window_id
    }

    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Registers a listener for other windows' phase transitions.
    pub fn on_state_change<F>(&self, listener: F)
    where
        F: Fn(Phase) + Send + Sync + 'static,
    {
        let mut listeners = match self.inner.listeners.lock() {
            Ok(listeners) => listeners,
            Err(poisoned) => poisoned.into_inner(),
        };
        listeners.push(Box::new(listener));
    }

    /// Publishes this window's current phase.
    ///
    /// Read-modify-write with no cross-window lock: concurrent writers
    /// last-write-win, and the loser republishes on its next cycle. A
    /// failed write is logged and the cycle skipped — this window's state
    /// is simply unknown to others until the next successful broadcast.
    pub fn broadcast_state(&self, phase: Phase, remaining_secs: u64) {
        let now_ms = Utc::now().timestamp_millis();
        let states = file::read_states(&self.inner.path);
        let entry = WindowState::new(phase, now_ms, &self.inner.window_id, remaining_secs);
        let merged = file::merge_own_entry(states, entry, now_ms);
        if let Err(e) = file::write_states(&self.inner.path, &merged) {
            tracing::warn!(error = %e, %phase, "Broadcast failed, skipping cycle");
        }
    }

    #[cfg(test)]
    pub(crate) fn handle_file_change_at(&self, now_ms: i64) {
        self.inner.handle_file_change(now_ms);
    }
}

impl Drop for SyncBroadcaster {
    /// Best-effort cleanup: stop watching, then withdraw this window's
    /// entry. Other windows' entries are left untouched and any failure
    /// is swallowed.
    fn drop(&mut self) {
        drop(self.watcher.take());

        if !self.inner.path.exists() {
            return;
        }
        let remaining: Vec<WindowState> = file::read_states(&self.inner.path)
            .into_iter()
            .filter(|s| s.window_id != self.inner.window_id)
            .collect();
        if let Err(e) = file::write_states(&self.inner.path, &remaining) {
            tracing::debug!(error = %e, "Dispose-time sync cleanup failed");
        }
    }
}

/// Time-plus-random window identity, generated once per process. Never
/// persisted anywhere except the sync file, never reused.
fn generate_window_id() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(9)
        .map(char::from)
        .collect();
    format!("window-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// Watches the sync file's parent directory and forwards matching events
/// to the change-detection pass on a dedicated thread.
///
/// The parent directory (not the file) is watched because every write
/// replaces the file by rename; a watch on the old inode would go silent
/// after the first replacement.
fn start_watcher(inner: Arc<BroadcasterInner>) -> Option<RecommendedWatcher> {
    let watch_dir = inner.path.parent()?.to_path_buf();
    let file_name = inner.path.file_name()?.to_os_string();

    let (tx, rx) = mpsc::channel();
    let mut watcher: RecommendedWatcher =
        match notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                let _ = tx.send(event);
            }
        }) {
            Ok(w) => w,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to create sync file watcher");
                return None;
            }
        };

    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
        tracing::warn!(error = %e, dir = %watch_dir.display(), "Failed to watch sync dir");
        return None;
    }

    std::thread::spawn(move || {
        loop {
            match rx.recv_timeout(Duration::from_secs(60)) {
                Ok(event) => {
                    if !matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                        continue;
                    }
                    let is_sync_file = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n == file_name).unwrap_or(false));
                    if is_sync_file {
                        inner.handle_file_change(Utc::now().timestamp_millis());
                    }
                }
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                // Watcher dropped: broadcaster is shutting down
                Err(mpsc::RecvTimeoutError::Disconnected) => break,
            }
        }
    });

    Some(watcher)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::types::FRESHNESS_MS;

    fn entry(id: &str, phase: Phase, timestamp: i64) -> WindowState {
        WindowState::new(phase, timestamp, id, 0)
    }

    #[test]
    fn test_latest_remote_phase_ignores_own_entries() {
        let now = 100_000;
        let states = vec![entry("me", Phase::Break, now)];
        assert_eq!(latest_remote_phase(&states, "me", now), None);
    }

    #[test]
    fn test_latest_remote_phase_empty_list() {
        assert_eq!(latest_remote_phase(&[], "me", 0), None);
    }

    #[test]
    fn test_latest_remote_phase_fresh_entry_fires() {
        let now = 100_000;
        let states = vec![entry("other", Phase::Break, now - FRESHNESS_MS + 1)];
        assert_eq!(latest_remote_phase(&states, "me", now), Some(Phase::Break));
    }

    #[test]
    fn test_latest_remote_phase_stale_entry_ignored() {
        let now = 100_000;
        let states = vec![entry("other", Phase::Break, now - FRESHNESS_MS - 1)];
        assert_eq!(latest_remote_phase(&states, "me", now), None);
    }

    #[test]
    fn test_latest_remote_phase_newest_wins_regardless_of_order() {
        let now = 100_000;
        let older = entry("w2", Phase::Work, now - 2_000);
        let newer = entry("w3", Phase::Break, now - 1_000);

        let forward = vec![older.clone(), newer.clone()];
        let backward = vec![newer, older];
        assert_eq!(
            latest_remote_phase(&forward, "me", now),
            Some(Phase::Break)
        );
        assert_eq!(
            latest_remote_phase(&backward, "me", now),
            Some(Phase::Break)
        );
    }

    #[test]
    fn test_latest_remote_phase_newest_is_stale_even_if_older_is_not() {
        // Only the single newest other-window entry is considered; if an
        // out-of-sync clock makes it stale, nothing fires.
        let now = 100_000;
        let states = vec![
            entry("w2", Phase::Work, now - 1_000),
            entry("w3", Phase::Break, now - FRESHNESS_MS - 1),
        ];
        // w2 is newest and fresh
        assert_eq!(latest_remote_phase(&states, "me", now), Some(Phase::Work));

        let states = vec![
            entry("w2", Phase::Work, now - FRESHNESS_MS - 1),
            entry("w3", Phase::Break, now - FRESHNESS_MS - 2),
        ];
        assert_eq!(latest_remote_phase(&states, "me", now), None);
    }

    #[test]
    fn test_dispatch_fires_listeners_only_for_fresh_remote_entries() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("sync.json");
        let broadcaster = SyncBroadcaster::new(path.clone());

        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        broadcaster.on_state_change(move |phase| sink.lock().unwrap().push(phase));

        let written_at = 50_000;
        file::write_states(&path, &[entry("other", Phase::Break, written_at)]).unwrap();

        // One millisecond inside the freshness window: fires
        broadcaster.handle_file_change_at(written_at + 4_999);
        // One millisecond outside: ignored
        broadcaster.handle_file_change_at(written_at + 5_001);

        assert_eq!(*received.lock().unwrap(), vec![Phase::Break]);
    }

    #[test]
    fn test_window_ids_are_unique() {
        let a = generate_window_id();
        let b = generate_window_id();
        assert_ne!(a, b);
        assert!(a.starts_with("window-"));
    }
}
