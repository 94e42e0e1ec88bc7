//! Bounded, newest-first log of user-facing sandbox events

use std::{collections::VecDeque, fmt};

use serde::{Deserialize, Serialize};

use crate::q_learning::Algorithm;

/// Number of entries kept before the oldest are dropped.
pub const DEFAULT_LOG_CAPACITY: usize = 200;

/// Something the sandbox wants to tell the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogEntry {
    Reset,
    TrainingStarted {
        algorithm: Algorithm,
    },
    TrainingComplete {
        algorithm: Algorithm,
        path_len: usize,
    },
    TrainingCancelled {
        algorithm: Algorithm,
    },
    /// Agent landed on a landmark, manually or during replay.
    Landmark {
        name: String,
        glyph: String,
        reward: f64,
    },
    Victory {
        name: String,
    },
    ReplayStarted {
        algorithm: Algorithm,
    },
    ReplayFinished,
    /// A refused request, rendered from the crate error.
    Warning {
        message: String,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogEntry::Reset => write!(f, "System reset. Memory cleared."),
            LogEntry::TrainingStarted { algorithm } => {
                write!(f, "Starting {algorithm} training...")
            }
            LogEntry::TrainingComplete {
                algorithm,
                path_len,
            } => write!(f, "{algorithm} training complete ({path_len}-cell path)"),
            LogEntry::TrainingCancelled { algorithm } => {
                write!(f, "{algorithm} training discarded")
            }
            LogEntry::Landmark {
                name,
                glyph,
                reward,
            } => {
                let sign = if *reward > 0.0 { "+" } else { "" };
                write!(f, "{glyph} {name} → {sign}{reward}")
            }
            LogEntry::Victory { name } => write!(f, "REACHED {name}! VICTORY!"),
            LogEntry::ReplayStarted { algorithm } => write!(f, "Playing {algorithm} path..."),
            LogEntry::ReplayFinished => write!(f, "Finished playing path!"),
            LogEntry::Warning { message } => write!(f, "WARNING: {message}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_LOG_CAPACITY)),
            capacity,
        }
    }

    /// Prepend `entry`, evicting the oldest once over capacity.
    pub fn push(&mut self, entry: LogEntry) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&LogEntry> {
        self.entries.front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_LOG_CAPACITY)
    }
}
