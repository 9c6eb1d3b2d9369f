//! Handwave CLI
//!
//! Drives the gesture-sequence engine from a stream of recorded or piped
//! classifier frames and prints the actions that fire.

use clap::{Parser, Subcommand};
use handwave::{
    actions::{ActionSink, PrintSink},
    config::Config,
    core::{Engine, GestureBindings, GestureTracker},
    recognizer::{ReplayInput, ReplaySource},
    telemetry::create_shared_log_with_persistence,
    VERSION,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "handwave")]
#[command(version = VERSION)]
#[command(about = "Hand-gesture sequence engine for driving application actions", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process classifier frames and fire bound actions
    Run {
        /// JSON Lines file of frame observations (reads stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,

        /// Minimum significant gesture duration in milliseconds
        #[arg(long)]
        min_gesture_ms: Option<u64>,

        /// Maximum number of runs kept in the tracker window
        #[arg(long)]
        history_len: Option<usize>,

        /// Maximum cumulative run age in milliseconds
        #[arg(long)]
        max_age_ms: Option<u64>,
    },

    /// Show cumulative session statistics
    Status,

    /// Show configuration
    Config,
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            input,
            min_gesture_ms,
            history_len,
            max_age_ms,
        } => {
            cmd_run(input, min_gesture_ms, history_len, max_age_ms);
        }
        Commands::Status => {
            cmd_status();
        }
        Commands::Config => {
            cmd_config();
        }
    }
}

fn cmd_run(
    input: Option<PathBuf>,
    min_gesture_ms: Option<u64>,
    history_len: Option<usize>,
    max_age_ms: Option<u64>,
) {
    println!("Handwave v{VERSION}");
    println!();

    // Load or create configuration, with CLI overrides
    let mut config = Config::load().unwrap_or_default();
    if let Some(v) = min_gesture_ms {
        config.min_gesture_ms = v;
    }
    if let Some(v) = history_len {
        config.history_len = v;
    }
    if let Some(v) = max_age_ms {
        config.max_history_age_ms = v;
    }
    if let Err(e) = config.ensure_directories() {
        eprintln!("Warning: Could not create directories: {e}");
    }

    println!("Starting engine...");
    println!("  Minimum gesture duration: {}ms", config.min_gesture_ms);
    println!("  History length: {} runs", config.history_len);
    println!("  History age budget: {}ms", config.max_history_age_ms);
    println!("  Vocabulary: {} labels", config.vocabulary.len());

    // Register bindings; a malformed pattern is fatal at startup.
    let mut bindings = GestureBindings::new(config.vocabulary_set());
    for binding in &config.bindings {
        if let Err(e) = bindings.register(binding.action.clone(), binding.to_sequence()) {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
    let names: Vec<&str> = bindings.action_names().collect();
    println!("  Bindings: {}", names.join(", "));
    println!();

    let tracker = GestureTracker::new(config.tracker_config());
    let mut engine = Engine::new(tracker, bindings);
    let sink = PrintSink;

    // Set up session telemetry
    let session_log = create_shared_log_with_persistence(config.data_path.join("session.json"));
    println!("Session ID: {}", session_log.session_id());
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    // Create the frame source
    let replay_input = match input {
        Some(path) => ReplayInput::File(path),
        None => ReplayInput::Stdin,
    };
    let mut source = ReplaySource::new(replay_input);
    if let Err(e) = source.start() {
        eprintln!("Error starting frame source: {e}");
        std::process::exit(1);
    }

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc_handler(r);

    // Main frame loop
    let receiver = source.receiver().clone();
    while running.load(Ordering::SeqCst) {
        match receiver.recv_timeout(Duration::from_millis(100)) {
            Ok(frame) => {
                session_log.record_frame();
                session_log
                    .record_appends(handwave::recognizer::appends_for_frame(&frame).len() as u64);

                match engine.process_frame(&frame) {
                    Ok(Some(action)) => {
                        session_log.record_action_fired();
                        println!("[{}ms] pattern matched: {action}", frame.timestamp_ms);
                        if let Err(e) = sink.invoke(&action) {
                            eprintln!("Warning: action {action:?} failed: {e}");
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // Skip the frame, keep the loop alive.
                        session_log.record_invalid_label();
                        eprintln!("Skipping frame at {}ms: {e}", frame.timestamp_ms);
                    }
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                // Input exhausted and nothing queued: we are done.
                if !source.is_running() && receiver.is_empty() {
                    break;
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    println!();
    println!("Stopping engine...");
    source.stop();

    // Save session telemetry
    if let Err(e) = session_log.save() {
        eprintln!("Warning: Could not save session stats: {e}");
    }

    // Final stats
    println!();
    println!("{}", session_log.summary());
}

fn cmd_status() {
    let config = Config::load().unwrap_or_default();

    println!("Handwave Status");
    println!("===============");
    println!();

    // Show config
    println!("Configuration:");
    println!("  Minimum gesture duration: {}ms", config.min_gesture_ms);
    println!("  History length: {} runs", config.history_len);
    println!("  History age budget: {}ms", config.max_history_age_ms);
    println!("  Bindings: {}", config.bindings.len());
    println!();

    // Load and show cumulative stats if available
    let stats_path = config.data_path.join("session.json");
    if stats_path.exists() {
        if let Ok(content) = std::fs::read_to_string(&stats_path) {
            if let Ok(stats) = serde_json::from_str::<serde_json::Value>(&content) {
                println!("Cumulative Statistics:");
                if let Some(frames) = stats.get("frames_processed") {
                    println!("  Frames processed: {frames}");
                }
                if let Some(appends) = stats.get("events_appended") {
                    println!("  Events appended: {appends}");
                }
                if let Some(fired) = stats.get("actions_fired") {
                    println!("  Actions fired: {fired}");
                }
                if let Some(invalid) = stats.get("invalid_labels") {
                    println!("  Invalid labels skipped: {invalid}");
                }
            }
        }
    } else {
        println!("No previous session data found.");
    }
}

fn cmd_config() {
    let config = Config::load().unwrap_or_default();

    println!("Configuration");
    println!("=============");
    println!();
    println!("Config file: {:?}", Config::config_path());
    println!();
    println!(
        "{}",
        serde_json::to_string_pretty(&config).unwrap_or_else(|_| "Error".to_string())
    );
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
