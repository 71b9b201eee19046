// SPDX-License-Identifier: MIT OR Apache-2.0

//! The process-wide root logger.
//!
//! One unnamed [`Logger`] is constructed on first access and lives for
//! the lifetime of the process; it is never reset.  Its threshold comes
//! from the environment (see [`LEVEL_ENV_VAR`](crate::LEVEL_ENV_VAR)) and
//! its sink list starts empty: the root logs nowhere until
//! [`add_root_sink`] gives it somewhere to log.  Because the sink list is
//! a shared handle, sinks added here are also seen by any children
//! already spawned from the root.
//!
//! # Example
//!
//! ```rust
//! use logtree::{PrettyOptions, PrettySink, root_logger};
//! use std::sync::Arc;
//!
//! root_logger::add_root_sink(Arc::new(PrettySink::stderr(PrettyOptions::default())));
//! root_logger::root().log(["ad-hoc message".into()]);
//! ```

use crate::logger::{Logger, LoggerOptions};
use crate::sink::Sink;
use std::sync::{Arc, OnceLock};

/// Static storage for the root node.  `OnceLock` gives one-time
/// construction; the node itself is an immutable value holder, so no
/// further synchronization is needed.
static ROOT: OnceLock<Logger> = OnceLock::new();

/// Returns the process-wide root logger, constructing it on first
/// access.
///
/// The root has no module name, an environment-resolved threshold, and an
/// initially empty sink list.
pub fn root() -> &'static Logger {
    ROOT.get_or_init(|| Logger::new(None, LoggerOptions::default()))
}

/// Appends a sink to the root logger's shared sink list.
///
/// This is the intended way to make the root (and everything spawned
/// from it) produce output.  Call it early in the process lifecycle;
/// sinks are never removed.
pub fn add_root_sink(sink: Arc<dyn Sink>) {
    root().sinks().push(sink);
}
