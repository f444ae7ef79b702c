//! timekeeper: terminal front-end for the interval timer.
//!
//! Runs the work/break countdown in the foreground, publishing phase
//! changes to other windows through the shared sync file and announcing
//! theirs.
//!
//! ## Subcommands
//!
//! - `run`: one full work + break cycle with a live status line
//! - `status`: show every live entry in the shared sync file
//! - `clean`: prune entries past the retention window

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use timekeeper_core::notifications::announce_remote_phase;
use timekeeper_core::sync::file::{prune_stale, read_states, write_states};
use timekeeper_core::{
    default_sync_path, load_config, status_line, NotificationSink, Phase, SyncBroadcaster,
    TickOutcome, TimerConfig, TimerEngine,
};

#[derive(Parser)]
#[command(name = "timekeeper")]
#[command(about = "Work/break interval timer with cross-window sync")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one work + break cycle in the foreground
    Run {
        /// Override the configured work length (minutes)
        #[arg(long, value_name = "MINUTES")]
        work: Option<u32>,

        /// Override the configured break length (minutes)
        #[arg(long, value_name = "MINUTES")]
        r#break: Option<u32>,
    },

    /// Show live entries in the shared sync file
    Status,

    /// Remove sync entries past the retention window
    Clean,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { work, r#break } => run(work, r#break),
        Commands::Status => status(),
        Commands::Clean => clean(),
    }
}

fn init_logging() {
    let debug_enabled = std::env::var("TIMEKEEPER_DEBUG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    let filter = if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Sink that surfaces messages on the terminal, clearing the in-place
/// status line first.
struct TerminalSink;

impl NotificationSink for TerminalSink {
    fn info(&self, message: &str) {
        println!("\r{message}");
    }

    fn warn(&self, message: &str) {
        eprintln!("\r{message}");
    }
}

fn run(work_override: Option<u32>, break_override: Option<u32>) {
    let mut config = load_config();
    if let Some(minutes) = work_override {
        config.work_minutes = minutes.max(1);
    }
    if let Some(minutes) = break_override {
        config.break_minutes = minutes.max(1);
    }

    let sink: Arc<dyn NotificationSink> = Arc::new(TerminalSink);
    let broadcaster = SyncBroadcaster::at_default_path();
    let remote_sink = Arc::clone(&sink);
    broadcaster.on_state_change(move |phase| {
        announce_remote_phase(remote_sink.as_ref(), phase);
    });

    // Ctrl-C must land back in the loop: a raw signal exit would skip the
    // broadcaster's Drop and leave this window's entry behind for 30 s
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        tracing::warn!(error = %e, "Failed to install Ctrl-C handler");
    }

    run_session(
        &broadcaster,
        sink.as_ref(),
        &config,
        &interrupted,
        Duration::from_secs(1),
    );
    // Broadcaster drop withdraws this window's entry
}

/// Drives one work + break session at the given tick interval, stopping
/// early (with an Idle broadcast) when `interrupted` is raised.
fn run_session(
    broadcaster: &SyncBroadcaster,
    sink: &dyn NotificationSink,
    config: &TimerConfig,
    interrupted: &AtomicBool,
    tick_interval: Duration,
) {
    let mut engine = TimerEngine::new();
    engine.start(config);
    sink.info(&format!(
        "Timer started! Work for {} minutes.",
        config.work_minutes
    ));
    broadcaster.broadcast_state(Phase::Work, engine.remaining_secs());

    loop {
        print!("\r{}  ", status_line(&engine));
        let _ = std::io::stdout().flush();
        std::thread::sleep(tick_interval);

        if interrupted.load(Ordering::SeqCst) {
            engine.stop();
            sink.info("Timer stopped.");
            broadcaster.broadcast_state(Phase::Idle, 0);
            break;
        }

        match engine.tick() {
            TickOutcome::Running => {}
            TickOutcome::WorkComplete => {
                sink.info(&format!(
                    "Time for a {} minute break!",
                    config.break_minutes
                ));
                broadcaster.broadcast_state(Phase::Break, engine.remaining_secs());
            }
            TickOutcome::BreakComplete => {
                sink.info("Break time is over! Ready to work?");
                broadcaster.broadcast_state(Phase::Idle, 0);
                break;
            }
            TickOutcome::Idle => break,
        }
    }
}

fn status() {
    let path = default_sync_path();
    let states = read_states(&path);
    if states.is_empty() {
        println!("No windows are publishing timer state.");
        return;
    }

    let now_ms = Utc::now().timestamp_millis();
    println!("{}", path.display());
    for state in states {
        let age_secs = (now_ms - state.timestamp).max(0) / 1000;
        println!(
            "  {:<40} {:<6} remaining {:>4}s  updated {}s ago",
            state.window_id,
            state.state.to_string(),
            state.remaining_time,
            age_secs
        );
    }
}

fn clean() {
    let path = default_sync_path();
    if !path.exists() {
        println!("Nothing to clean.");
        return;
    }

    let now_ms = Utc::now().timestamp_millis();
    let (kept, removed) = prune_stale(read_states(&path), now_ms);
    match write_states(&path, &kept) {
        Ok(()) => println!("Removed {} stale entries, {} remain.", removed, kept.len()),
        Err(e) => {
            tracing::error!(error = %e, "Cleanup write failed");
            std::process::exit(1);
        }
    }
}
