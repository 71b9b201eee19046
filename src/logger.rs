// SPDX-License-Identifier: MIT OR Apache-2.0

//! The logger node: the callable, hierarchical unit that resolves,
//! filters, and dispatches log calls.
//!
//! Nodes are immutable value holders and cheap to clone.  A node carries
//! its module-name chain, the context bound so far, a severity threshold
//! fixed at construction, and a shared handle to the sink list.  Children
//! created with [`Logger::child`] extend the chain and the bound context
//! but share the threshold value and the identical sink-list handle, so
//! the whole hierarchy fans out to the same sinks.
//!
//! Dispatch is a pass-through, not a queue: resolution, filtering,
//! context merging, and every sink `write` happen inline on the caller's
//! thread.

use crate::Level;
use crate::dispatch::{self, Arg};
use crate::log_entry::LogEntry;
use crate::sink::{Sink, SinkList};
use crate::value::ContextMap;
use std::sync::Arc;

/// Options for [`Logger::new`].
///
/// `level: None` resolves the threshold from the environment (see
/// [`LEVEL_ENV_VAR`](crate::LEVEL_ENV_VAR)); an explicit level always
/// overrides the environment.
#[derive(Debug, Default)]
pub struct LoggerOptions {
    pub sinks: Vec<Arc<dyn Sink>>,
    pub level: Option<Level>,
}

/// A hierarchical logging node.
///
/// # Examples
///
/// ```rust
/// use logtree::{InMemorySink, Logger, LoggerOptions};
/// use std::sync::Arc;
///
/// let sink = Arc::new(InMemorySink::new());
/// let logger = Logger::new(
///     Some("app"),
///     LoggerOptions {
///         sinks: vec![sink.clone()],
///         level: Some(Logger::DEBUG),
///     },
/// );
///
/// logger.log(["starting up".into()]);
/// logger.log(["warn".into(), "disk almost full".into()]);
///
/// let db = logger.child("db");
/// db.log(["connected".into()]);
///
/// assert_eq!(sink.entries().len(), 3);
/// assert_eq!(sink.entries()[2].modules(), ["app", "db"]);
/// ```
#[derive(Debug, Clone)]
pub struct Logger {
    modules: Vec<String>,
    bound: ContextMap,
    threshold: Level,
    sinks: SinkList,
}

impl Logger {
    pub const TRACE: Level = Level::Trace;
    pub const DEBUG: Level = Level::Debug;
    pub const INFO: Level = Level::Info;
    pub const WARN: Level = Level::Warn;
    pub const ERROR: Level = Level::Error;
    pub const FATAL: Level = Level::Fatal;

    /// Creates a root node.
    ///
    /// `module` of `None` makes an unnamed root (empty module chain).
    /// The environment is consulted here, once, when no explicit level is
    /// supplied; children never re-read it.
    pub fn new(module: Option<&str>, options: LoggerOptions) -> Logger {
        let threshold = options.level.unwrap_or_else(Level::from_env);
        Logger {
            modules: module.map(|m| vec![m.to_string()]).unwrap_or_default(),
            bound: ContextMap::new(),
            threshold,
            sinks: SinkList::new(options.sinks),
        }
    }

    /// Logs one call.
    ///
    /// Arguments are classified per the shapes documented on
    /// [`dispatch`](crate::Arg); entries below the node's threshold are
    /// dropped before any sink sees them.  The node's bound context is
    /// merged under the call-site context (call-site keys win) into a
    /// fresh map, so no bound mapping is ever mutated.  Never panics for
    /// normal inputs, including cyclic context maps.
    pub fn log<A>(&self, args: A)
    where
        A: IntoIterator<Item = Arg>,
    {
        let args: Vec<Arg> = args.into_iter().collect();
        let (level, message, context) = dispatch::classify(&args);
        if !level.passes(self.threshold) {
            return;
        }
        let entry = LogEntry::new(
            level,
            message,
            self.bound.merged_with(&context),
            self.modules.clone(),
        );
        for sink in self.sinks.snapshot() {
            sink.write(&entry);
        }
    }

    /// Creates a child node named `name`.
    ///
    /// The child's module chain is this node's chain plus `name`; it
    /// inherits this node's bound context, threshold value, and the
    /// identical sink-list handle.  Children are independent of each
    /// other and of the parent.
    pub fn child(&self, name: &str) -> Logger {
        self.child_with(name, ContextMap::new())
    }

    /// Like [`child`](Logger::child), additionally binding `bindings`
    /// into the child's context.  The child's keys win over inherited
    /// keys on conflict; the parent's bound context is not mutated.
    pub fn child_with(&self, name: &str, bindings: ContextMap) -> Logger {
        let mut modules = self.modules.clone();
        modules.push(name.to_string());
        Logger {
            modules,
            bound: self.bound.merged_with(&bindings),
            threshold: self.threshold,
            sinks: self.sinks.clone(),
        }
    }

    /// Module-name chain, root first, leaf last.
    pub fn modules(&self) -> &[String] {
        &self.modules
    }

    /// Context bound to this node (its ancestors' bindings merged with
    /// its own).
    pub fn bound_context(&self) -> &ContextMap {
        &self.bound
    }

    /// The severity threshold fixed at construction.
    pub fn threshold(&self) -> Level {
        self.threshold
    }

    /// The sink-list handle shared by this node's whole hierarchy.
    pub fn sinks(&self) -> &SinkList {
        &self.sinks
    }
}
