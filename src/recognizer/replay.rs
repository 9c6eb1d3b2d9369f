//! Replay source: feeds recorded frame observations to the engine.
//!
//! Frames travel as JSON Lines, one [`FrameObservation`] per line. A
//! background thread parses the input and delivers frames over a bounded
//! channel, giving the engine the same asynchronous delivery shape as the
//! live classifier callback it stands in for.

use crate::recognizer::types::FrameObservation;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::io::{BufRead, BufReader, Read};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

/// Errors from the replay source.
#[derive(Debug)]
pub enum ReplayError {
    AlreadyRunning,
    Io(String),
}

impl std::fmt::Display for ReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplayError::AlreadyRunning => write!(f, "Replay source is already running"),
            ReplayError::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for ReplayError {}

/// Where the replay source reads frames from.
#[derive(Debug, Clone)]
pub enum ReplayInput {
    /// A JSON Lines file of frame observations.
    File(PathBuf),
    /// Standard input (live piping from an external recognizer process).
    Stdin,
}

/// Reads frame observations on a background thread and hands them over a
/// bounded channel.
pub struct ReplaySource {
    input: ReplayInput,
    sender: Sender<FrameObservation>,
    receiver: Receiver<FrameObservation>,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl ReplaySource {
    pub fn new(input: ReplayInput) -> Self {
        let (sender, receiver) = bounded(1_000);
        Self {
            input,
            sender,
            receiver,
            running: Arc::new(AtomicBool::new(false)),
            handle: None,
        }
    }

    /// Start the reader thread.
    pub fn start(&mut self) -> Result<(), ReplayError> {
        if self.running.load(Ordering::SeqCst) {
            return Err(ReplayError::AlreadyRunning);
        }
        self.running.store(true, Ordering::SeqCst);

        let sender = self.sender.clone();
        let running = self.running.clone();
        let input = self.input.clone();

        let handle = std::thread::spawn(move || {
            let result = match input {
                ReplayInput::File(path) => match std::fs::File::open(&path) {
                    Ok(file) => pump_lines(file, &sender, &running),
                    Err(e) => {
                        eprintln!("Error opening {path:?}: {e}");
                        Ok(())
                    }
                },
                ReplayInput::Stdin => pump_lines(std::io::stdin(), &sender, &running),
            };
            if let Err(e) = result {
                eprintln!("Replay reader stopped: {e}");
            }
            running.store(false, Ordering::SeqCst);
        });
        self.handle = Some(handle);
        Ok(())
    }

    /// Stop the reader thread. Frames already queued remain receivable.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Get the receiver for frame observations.
    pub fn receiver(&self) -> &Receiver<FrameObservation> {
        &self.receiver
    }
}

/// Parse JSON Lines into frames until the input ends or the source stops.
///
/// Malformed lines are reported and skipped; a bad frame must not take down
/// the loop.
fn pump_lines<R: Read>(
    reader: R,
    sender: &Sender<FrameObservation>,
    running: &AtomicBool,
) -> Result<(), ReplayError> {
    let reader = BufReader::new(reader);
    for line in reader.lines() {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let line = line.map_err(|e| ReplayError::Io(e.to_string()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<FrameObservation>(trimmed) {
            Ok(frame) => {
                if sender.send(frame).is_err() {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Skipping malformed frame line: {e}");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_replay_from_file() {
        let path = std::env::temp_dir().join("handwave-replay-test.jsonl");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"{{"timestamp_ms":0,"detections":[{{"label":"Open_Palm","score":0.95,"hand":"Right"}}]}}"#
        )
        .unwrap();
        writeln!(file, "not json at all").unwrap();
        writeln!(file, r#"{{"timestamp_ms":100,"detections":[]}}"#).unwrap();
        drop(file);

        let mut source = ReplaySource::new(ReplayInput::File(path.clone()));
        source.start().unwrap();

        let first = source
            .receiver()
            .recv_timeout(std::time::Duration::from_secs(2))
            .unwrap();
        assert_eq!(first.timestamp_ms, 0);
        assert_eq!(first.detections.len(), 1);

        // The malformed line is skipped, not fatal.
        let second = source
            .receiver()
            .recv_timeout(std::time::Duration::from_secs(2))
            .unwrap();
        assert_eq!(second.timestamp_ms, 100);
        assert!(second.detections.is_empty());

        source.stop();
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_double_start_rejected() {
        let path = std::env::temp_dir().join("handwave-replay-empty.jsonl");
        std::fs::write(&path, "").unwrap();
        let mut source = ReplaySource::new(ReplayInput::File(path.clone()));
        source.start().unwrap();
        // The reader may finish the empty file quickly; only assert the
        // double-start error while it is still marked running.
        if source.is_running() {
            assert!(matches!(source.start(), Err(ReplayError::AlreadyRunning)));
        }
        source.stop();
        let _ = std::fs::remove_file(&path);
    }
}
