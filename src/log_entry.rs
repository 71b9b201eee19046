// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log entry type for the logtree logging system.
//!
//! This module defines [`LogEntry`], the normalized record that one
//! logging call produces.  Entries are built once by call-argument
//! resolution, stamped with the dispatching node's module chain and
//! merged context, and then handed to every sink by shared reference for
//! the duration of that one dispatch.
//!
//! The record itself is immutable after creation.  The context field is a
//! shared [`ContextMap`] handle, so a sink that inserts into it is
//! visible to sibling sinks of the same dispatch; sinks must not assume
//! exclusive mutation rights.

use crate::Level;
use crate::sys;
use crate::value::ContextMap;
use std::fmt::Display;

/**
A normalized structured record describing one log call.

1.  Call-argument resolution classifies the caller's arguments into a
    level, message, and context.
2.  The dispatching [`Logger`](crate::Logger) merges its bound context,
    stamps its module chain, and constructs the entry.
3.  Every sink in the node's list receives `&LogEntry`, in list order.
*/
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    level: Level,
    timestamp: i64,
    message: String,
    context: ContextMap,
    modules: Vec<String>,
}

impl LogEntry {
    /// Creates an entry stamped with the current host clock.
    pub fn new(
        level: Level,
        message: impl Into<String>,
        context: ContextMap,
        modules: Vec<String>,
    ) -> Self {
        Self::at(sys::epoch_millis(), level, message, context, modules)
    }

    /// Creates an entry with an explicit timestamp (milliseconds since
    /// the Unix epoch).  Useful for sinks under test, which want a fixed
    /// clock.
    pub fn at(
        timestamp: i64,
        level: Level,
        message: impl Into<String>,
        context: ContextMap,
        modules: Vec<String>,
    ) -> Self {
        Self {
            level,
            timestamp,
            message: message.into(),
            context,
            modules,
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Milliseconds since the Unix epoch, captured at resolution time.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The entry's context.  This is a shared handle: mutating it from a
    /// sink is observed by the other sinks of the same dispatch.
    pub fn context(&self) -> &ContextMap {
        &self.context
    }

    /// Module-name chain of the dispatching node, root first, leaf last.
    /// Empty for the unnamed root logger.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }
}

impl Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.level)?;
        for module in &self.modules {
            write!(f, " [{}]", module)?;
        }
        if !self.message.is_empty() {
            write!(f, " {}", self.message)?;
        }
        if !self.context.is_empty() {
            write!(f, " {}", self.context.to_compact_string())?;
        }
        Ok(())
    }
}

/*
Boilerplate notes for LogEntry:

IMPLEMENTED:
- Debug: Derived - essential for diagnostics
- Clone: Derived - sinks that buffer entries need to keep one; note the
  context handle is shared by the clone, not deep-copied
- PartialEq: Derived - scalar fields by value, context by identity
- Display: Implemented - plain uncolored one-line form, used by the
  in-memory sink

NOT IMPLEMENTED:
- Copy: String/Vec fields are heap-allocated
- Eq/Hash: context equality is identity-based and floats may appear in
  context values, so Eq would overpromise
- Ord/PartialOrd: no meaningful total order (timestamp order is a query,
  not an identity)
- Default: an entry without a resolution step has no sensible zero value
*/
