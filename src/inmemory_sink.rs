// SPDX-License-Identifier: MIT OR Apache-2.0

//! # In-Memory Sink
//!
//! This module provides an in-memory sink implementation for testing and
//! debugging purposes.  The `InMemorySink` captures log entries in memory
//! rather than writing them to stderr or other outputs, making it ideal
//! for:
//!
//! - Unit testing code that logs through a logtree hierarchy
//! - Programmatically examining what was dispatched (levels, module
//!   chains, merged context), not just rendered text
//! - Capturing logs in environments where stderr is redirected or
//!   unavailable
//!
//! Entries are stored behind a spinlock, so the sink can be attached to a
//! hierarchy that logs from several threads while tests read a consistent
//! view.

use crate::log_entry::LogEntry;
use crate::sink::Sink;
use crate::spinlock::Spinlock;

/// A sink that stores every received entry in memory.
///
/// Stored entries are clones of the dispatched entry; note that a clone
/// shares the original's context handle, so identity-sensitive assertions
/// (same context across two sinks, mutations made by an earlier sink)
/// remain observable through the stored copies.
///
/// # Example
///
/// ```rust
/// use logtree::{InMemorySink, Logger, LoggerOptions};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::new(
///     Some("worker"),
///     LoggerOptions {
///         sinks: vec![sink.clone()],
///         level: Some(Logger::INFO),
///     },
/// );
///
/// logger.log(["job finished".into()]);
///
/// let entries = sink.entries();
/// assert_eq!(entries.len(), 1);
/// assert_eq!(entries[0].message(), "job finished");
/// assert_eq!(sink.drain_logs(), "info [worker] job finished");
/// ```
#[derive(Debug)]
pub struct InMemorySink {
    entries: Spinlock<Vec<LogEntry>>,
}

// Boilerplate: Default is the obvious empty buffer.  Clone is NOT
// implemented; a captured log is a unique resource and tests that want
// shared access wrap the sink in Arc anyway, which is what the sink list
// stores.

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySink {
    /// Creates a new `InMemorySink` with an empty buffer.
    pub fn new() -> Self {
        Self {
            entries: Spinlock::new(Vec::new()),
        }
    }

    /// Clones the captured entries out, in dispatch order.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.with(|entries| entries.clone())
    }

    /// Number of entries captured so far.
    pub fn len(&self) -> usize {
        self.entries.with(|entries| entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.with(|entries| entries.is_empty())
    }

    /// Removes and returns all captured entries.
    pub fn drain(&self) -> Vec<LogEntry> {
        self.entries.with_mut(std::mem::take)
    }

    /// Drains all entries into a single newline-joined string of their
    /// plain (uncolored) renderings, clearing the buffer.
    pub fn drain_logs(&self) -> String {
        self.drain()
            .iter()
            .map(|entry| entry.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Flushes all captured entries to the console, clearing the buffer.
    ///
    /// On native platforms entries are written to stderr; on WASM they go
    /// to the browser console.
    pub fn drain_to_console(&self) {
        for entry in self.drain() {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::log_1(&entry.to_string().into());
            #[cfg(not(target_arch = "wasm32"))]
            eprintln!("{}", entry);
        }
    }
}

impl Sink for InMemorySink {
    fn write(&self, entry: &LogEntry) {
        let entry = entry.clone();
        self.entries.with_mut(|entries| entries.push(entry));
    }
}
