// SPDX-License-Identifier: MIT OR Apache-2.0

//! The sink contract and the shared sink-list handle.
//!
//! Sinks execute synchronously, inline, on the logging caller's thread.
//! The core does not insulate sinks from one another: a sink that panics
//! propagates to the caller, and a slow sink delays the sinks after it.

use crate::log_entry::LogEntry;
use crate::spinlock::Spinlock;
use std::fmt::Debug;
use std::sync::Arc;

pub trait Sink: Debug + Send + Sync {
    /**
        Consumes one log entry.

        The entry is shared with every other sink of the same dispatch;
        its context is a shared handle, so mutating it here is visible to
        sibling sinks.  No return value is observed.
    */
    fn write(&self, entry: &LogEntry);
}

/*
Boilerplate notes.

# Sink

Clone on Sink makes no sense; sinks hold unique resources.
PartialEq and Eq are possible but it's unclear whether we'd mean data
equality or provenance.  Avoided.
Ord makes no sense.  Hash likewise.
Default is not necessarily sensible since who knows how the sink is
constructed (does it need an output target, etc.)
Send/Sync are required: the same sink list is shared across every node of
a hierarchy, and hierarchies cross threads.
*/

/// Shared-ownership handle to an ordered sink sequence.
///
/// A parent node and every descendant created from it hold clones of the
/// same handle, so one dispatch from anywhere in the hierarchy reaches
/// the same sinks, in the same order.  Equality is by pointer identity.
///
/// The spinlock is held only to clone the `Arc` vector in or out; sink
/// `write` calls happen outside it.  Core dispatch never mutates the
/// list; [`push`](SinkList::push) exists so the root singleton's
/// initially-empty list can be populated at startup.
#[derive(Clone)]
pub struct SinkList {
    sinks: Arc<Spinlock<Vec<Arc<dyn Sink>>>>,
}

impl SinkList {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> SinkList {
        SinkList {
            sinks: Arc::new(Spinlock::new(sinks)),
        }
    }

    /// Appends a sink.  Every node sharing this handle sees it on their
    /// next dispatch.
    pub fn push(&self, sink: Arc<dyn Sink>) {
        self.sinks.with_mut(|sinks| sinks.push(sink));
    }

    /// Clones the current sink sequence out, in order.
    pub fn snapshot(&self) -> Vec<Arc<dyn Sink>> {
        self.sinks.with(|sinks| sinks.clone())
    }

    pub fn len(&self) -> usize {
        self.sinks.with(|sinks| sinks.len())
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.with(|sinks| sinks.is_empty())
    }
}

impl Default for SinkList {
    fn default() -> SinkList {
        SinkList::new(Vec::new())
    }
}

impl PartialEq for SinkList {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.sinks, &other.sinks)
    }
}

impl Eq for SinkList {}

impl Debug for SinkList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SinkList").field(&self.snapshot()).finish()
    }
}
