//! Work/break countdown engine.
//!
//! A pure tick-driven state machine: the host supplies the once-per-second
//! callback (a host timer, a CLI sleep loop) and calls [`TimerEngine::tick`]
//! from it. The engine itself never touches the clock, which keeps the
//! work→break→idle transitions exhaustively testable.

use crate::config::TimerConfig;
use crate::types::Phase;

/// What a single tick produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer is not running; nothing happened.
    Idle,
    /// Countdown advanced without completing a phase.
    Running,
    /// Work interval finished; the engine has entered Break.
    WorkComplete,
    /// Break interval finished; the engine is back to Idle.
    BreakComplete,
}

/// Countdown state machine for one window.
#[derive(Debug, Default)]
pub struct TimerEngine {
    phase: Phase,
    remaining_secs: u64,
    break_secs: u64,
    running: bool,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a work interval. Durations are taken from `config` here and
    /// nowhere else, so edited settings apply from the next start.
    ///
    /// Returns false (and changes nothing) if the timer is already running.
    pub fn start(&mut self, config: &TimerConfig) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        self.phase = Phase::Work;
        self.remaining_secs = config.work_secs();
        self.break_secs = config.break_secs();
        true
    }

    /// Stops the timer and returns to Idle, whatever the current phase.
    pub fn stop(&mut self) {
        self.running = false;
        self.phase = Phase::Idle;
        self.remaining_secs = 0;
    }

    /// Start if stopped, stop if running. Returns the new running state.
    pub fn toggle(&mut self, config: &TimerConfig) -> bool {
        if self.running {
            self.stop();
            false
        } else {
            self.start(config);
            true
        }
    }

    /// Advances the countdown by one second of wall-clock time.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Idle;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return TickOutcome::Running;
        }

        match self.phase {
            Phase::Work => {
                // Work interval over: roll straight into the break
                self.phase = Phase::Break;
                self.remaining_secs = self.break_secs;
                TickOutcome::WorkComplete
            }
            Phase::Break => {
                self.stop();
                TickOutcome::BreakComplete
            }
            // Unreachable while running, but stop() is the safe answer
            Phase::Idle => {
                self.stop();
                TickOutcome::Idle
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_active(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_config() -> TimerConfig {
        TimerConfig {
            work_minutes: 1,
            break_minutes: 1,
        }
    }

    #[test]
    fn test_new_engine_is_idle() {
        let engine = TimerEngine::new();
        assert!(!engine.is_active());
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn test_start_enters_work_with_configured_duration() {
        let mut engine = TimerEngine::new();
        assert!(engine.start(&TimerConfig::default()));
        assert!(engine.is_active());
        assert_eq!(engine.phase(), Phase::Work);
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn test_start_while_running_is_rejected() {
        let mut engine = TimerEngine::new();
        engine.start(&short_config());
        engine.tick();
        let before = engine.remaining_secs();
        assert!(!engine.start(&short_config()));
        assert_eq!(engine.remaining_secs(), before);
    }

    #[test]
    fn test_tick_decrements() {
        let mut engine = TimerEngine::new();
        engine.start(&short_config());
        assert_eq!(engine.tick(), TickOutcome::Running);
        assert_eq!(engine.remaining_secs(), 59);
    }

    #[test]
    fn test_tick_while_idle_is_noop() {
        let mut engine = TimerEngine::new();
        assert_eq!(engine.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_work_completion_rolls_into_break() {
        let mut engine = TimerEngine::new();
        engine.start(&short_config());
        for _ in 0..59 {
            assert_eq!(engine.tick(), TickOutcome::Running);
        }
        assert_eq!(engine.tick(), TickOutcome::WorkComplete);
        assert!(engine.is_active());
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn test_break_completion_returns_to_idle() {
        let mut engine = TimerEngine::new();
        engine.start(&short_config());
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Break);
        for _ in 0..59 {
            assert_eq!(engine.tick(), TickOutcome::Running);
        }
        assert_eq!(engine.tick(), TickOutcome::BreakComplete);
        assert!(!engine.is_active());
        assert_eq!(engine.phase(), Phase::Idle);
    }

    #[test]
    fn test_stop_resets_to_idle_mid_work() {
        let mut engine = TimerEngine::new();
        engine.start(&short_config());
        engine.tick();
        engine.stop();
        assert!(!engine.is_active());
        assert_eq!(engine.phase(), Phase::Idle);
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn test_toggle_flips_running_state() {
        let mut engine = TimerEngine::new();
        let config = short_config();
        assert!(engine.toggle(&config));
        assert!(engine.is_active());
        assert!(!engine.toggle(&config));
        assert!(!engine.is_active());
    }

    #[test]
    fn test_break_length_snapshotted_at_start() {
        // Config edits mid-session do not change the already-started
        // session's break length; they apply from the next start.
        let mut engine = TimerEngine::new();
        engine.start(&TimerConfig {
            work_minutes: 1,
            break_minutes: 2,
        });
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.phase(), Phase::Break);
        assert_eq!(engine.remaining_secs(), 120);
    }
}
