//! Bounded text log shown in the menu's log panel.

use thiserror::Error;

/// Default capacity of the log, in bytes.
pub const LOG_BUFFER_SIZE: usize = 64000;

/// Returned when an entry does not fit into the log.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("log is full: {needed} bytes needed, {available} available")]
pub struct LogFull {
    pub needed: usize,
    pub available: usize,
}

/// An append-only text buffer with a fixed byte capacity.
///
/// Entries are separated by newlines. An entry that does not fit is rejected
/// as a whole; the buffer never holds a partial entry.
#[derive(Clone, Debug)]
pub struct LogBuffer {
    text: String,
    capacity: usize,
    updated: bool,
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(LOG_BUFFER_SIZE)
    }
}

impl LogBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            text: String::new(),
            capacity,
            updated: false,
        }
    }

    /// Appends `entry`, preceded by a newline if the log is not empty.
    pub fn write(&mut self, entry: &str) -> Result<(), LogFull> {
        let separator = if self.text.is_empty() { 0 } else { 1 };
        let needed = separator + entry.len();
        let available = self.capacity - self.text.len();
        if needed > available {
            return Err(LogFull { needed, available });
        }

        if separator == 1 {
            self.text.push('\n');
        }
        self.text.push_str(entry);
        self.updated = true;
        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether something was appended since the last [`LogBuffer::reset_updated`].
    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn reset_updated(&mut self) {
        self.updated = false;
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.updated = false;
    }
}
