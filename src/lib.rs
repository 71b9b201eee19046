//SPDX-License-Identifier: MIT OR Apache-2.0
/*!
# logtree

logtree is a structured, hierarchical logging library for Rust.

# The problem

Flat loggers force a choice at every call site: either you interpolate
everything into the message string and lose structure, or you thread a
bag of key/value state through your whole call graph by hand.  Neither
survives contact with a real program, where subsystems want their own
identity (`[app][db][replica]`), their own ambient context
(`region=us`, `shard=2`), and one shared place to decide what gets
through and where it goes.

logtree's unit is the *logger node*.  A node knows its module chain, the
context bound to it so far, a severity threshold, and a shared list of
sinks.  Calling [`Logger::child`] gives you a new node one level down
that inherits all of it.  Logging through any node in the hierarchy
normalizes the call into one [`LogEntry`] and hands it, synchronously and
in order, to every sink the hierarchy shares.

# Severities

Six levels, totally ordered: `trace < debug < info < warn < error <
fatal`.  An entry is delivered iff its level is at or above the node's
threshold.  `fatal` is only the highest label; nothing here terminates
the process.  The default threshold comes from the [`LEVEL_ENV_VAR`]
environment variable (case-insensitive, falling back to `info`), and an
explicit level at construction always wins.

# Calls

A logging call is a short positional argument list, classified by shape
(see [`Arg`]): a bare message, a level name plus message, trailing
context as a map, a detail string, or a tagged error.  Malformed calls
never fail; they degrade to an info-level message.

```rust
use logtree::{InMemorySink, Logger, LoggerOptions, context};
use std::sync::Arc;

let sink = Arc::new(InMemorySink::new());
let logger = Logger::new(
    Some("app"),
    LoggerOptions {
        sinks: vec![sink.clone()],
        level: Some(Logger::DEBUG),
    },
);

logger.log(["listening".into()]);
logger.log(["warn".into(), "queue depth high".into(), context! { depth: 871 }.into()]);

let db = logger.child_with("db", context! { shard: 3 });
db.log(["connected".into()]);

assert_eq!(sink.entries().len(), 3);
```

# Errors

Context values carry arbitrary structure, including externally defined
error values recognized through the [`TaggedError`] capability trait.
The reference [`PrettySink`] renders a tagged error under the `err` key
as its own indented line beneath the entry:

```text
22:10:03.004 ERR [app] request failed {"attempt":3}
  err: connection refused (ECONNREFUSED)
```

Context maps are shared handles and may be cyclic; serialization breaks
cycles with a `"[Circular]"` placeholder instead of faulting.

# Sinks

Anything implementing [`Sink`] can receive entries.  Dispatch is inline
on the caller's thread — no queue, no buffering — and sink faults are
not swallowed by the core.  [`PrettySink`] is the reference
human-readable sink; [`InMemorySink`] captures entries for tests.  The
process-wide [`root_logger`] starts with no sinks and logs nowhere until
you give it one.
*/

mod dispatch;
mod inmemory_sink;
mod level;
mod log_entry;
mod logger;
mod macros;
mod pretty_sink;
pub mod root_logger;
mod sink;
mod spinlock;
mod sys;
mod value;

pub use dispatch::Arg;
pub use inmemory_sink::InMemorySink;
pub use level::{LEVEL_ENV_VAR, Level};
pub use log_entry::LogEntry;
pub use logger::{Logger, LoggerOptions};
pub use pretty_sink::{
    BufferOutput, ColorMode, PrettyOptions, PrettySink, StderrOutput, StdoutOutput, TextOutput,
    TimestampMode,
};
pub use root_logger::{add_root_sink, root};
pub use sink::{Sink, SinkList};
pub use value::{ContextMap, TaggedError, Value};

extern crate self as logtree;
