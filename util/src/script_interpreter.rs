//! # Input script interpreter module
//!
//! This module provides an interpreter for input scripts, allowing operator
//! input events to be played back into the executable at fixed times.
//!
//! A script is a list of timestamped JSON events, each terminated with a
//! semicolon:
//!
//! ```text
//! 0.0: {"type": "mode", "mode": "teleop"};
//! 1.5: {"type": "axis", "device": "left_stick", "axis": 1, "value": 0.5};
//! ```

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::fs;
use regex::RegexBuilder;
use thiserror::Error;

// Internal
use drive_if::input::{InputEvent, InputParseError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An event which is scripted to occur at a specific time.
struct ScriptedEvent {
    /// The time the event is supposed to occur at
    exec_time_s: f64,

    /// The event itself
    event: InputEvent
}

/// A script interpreter.
///
/// After initialising with the path to the script to run use
/// `.get_pending_events` to acquire the list of events that are due.
pub struct ScriptInterpreter {
    script_path: PathBuf,
    events: VecDeque<ScriptedEvent>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Could not find the script at {0:?}")]
    ScriptNotFound(PathBuf),

    #[error("Could not load the script: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("The script is empty (or is so bad it can't be read)")]
    ScriptEmpty,

    #[error(
        "Script contains an invalid timestamp: {0}. \
        Should be a float (like 1.0)")]
    InvalidTimestamp(String),

    #[error("Script contains an invalid event at {0} s: {1}")]
    InvalidEvent(f64, InputParseError)
}

pub enum PendingEvents {
    None,
    Some(Vec<InputEvent>),
    EndOfScript
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {

    /// Create a new interpreter from the given script path.
    pub fn new<P: AsRef<Path>>(script_path: P) -> Result<Self, ScriptError> {

        let path = PathBuf::from(script_path.as_ref());
        
        if !path.exists() {
            return Err(ScriptError::ScriptNotFound(path));
        }

        let script = fs::read_to_string(&path)
            .map_err(ScriptError::ScriptLoadError)?;

        let events = Self::parse(&script)?;

        Ok(ScriptInterpreter {
            script_path: path,
            events
        })
    }

    /// Create a new interpreter directly from the contents of a script.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        Ok(ScriptInterpreter {
            script_path: PathBuf::new(),
            events: Self::parse(script)?
        })
    }

    /// Return the pending events, i.e. those scheduled before `current_time_s`.
    pub fn get_pending_events(&mut self, current_time_s: f64) -> PendingEvents {

        // If the queue is empty the script is over
        if self.events.is_empty() {
            return PendingEvents::EndOfScript
        }

        let mut due: Vec<InputEvent> = vec![];

        while let Some(front) = self.events.front() {
            if front.exec_time_s > current_time_s {
                break;
            }

            if let Some(e) = self.events.pop_front() {
                due.push(e.event);
            }
        }

        if due.is_empty() {
            PendingEvents::None
        }
        else {
            PendingEvents::Some(due)
        }
    }

    /// Get the number of events remaining in the script
    pub fn get_num_events(&self) -> usize {
        self.events.len()
    }

    /// Get the length of the script in seconds
    pub fn get_duration(&self) -> f64 {
        match self.events.back() {
            Some(e) => e.exec_time_s,
            None => 0f64
        }
    }

    /// Get the path the script was loaded from, empty if it was built from a
    /// string.
    pub fn get_path(&self) -> &Path {
        &self.script_path
    }

    fn parse(script: &str) -> Result<VecDeque<ScriptedEvent>, ScriptError> {
        let mut queue: VecDeque<ScriptedEvent> = VecDeque::new();

        // Timestamp, colon, then everything up to the terminating semicolon.
        let re = RegexBuilder::
            new(r"^\s*(\d+(\.\d+)?)\s*:\s*([^;]*);")
            .multi_line(true)
            .build()
            .expect("script regex is valid");

        for cap in re.captures_iter(script) {
            let (time_str, payload) = match (cap.get(1), cap.get(3)) {
                (Some(t), Some(p)) => (t.as_str(), p.as_str()),
                _ => continue
            };

            let exec_time_s: f64 = time_str
                .parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}", e)))?;

            let event = InputEvent::from_json(payload)
                .map_err(|e| ScriptError::InvalidEvent(exec_time_s, e))?;

            queue.push_back(ScriptedEvent {
                exec_time_s,
                event
            });
        }

        if queue.is_empty() {
            return Err(ScriptError::ScriptEmpty)
        }

        // Keep events in time order even if the script isn't
        queue.make_contiguous().sort_by(|a, b| {
            a.exec_time_s
                .partial_cmp(&b.exec_time_s)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        Ok(queue)
    }
}
