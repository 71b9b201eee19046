// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reference human-readable sink.
//!
//! Renders each entry as one colorized, timestamped text line, plus an
//! indented second line when the entry's context carries a tagged error
//! under the `err` key:
//!
//! ```text
//! 14:03:07.512 WRN [app][store] disk almost full {"free_mb":112}
//! 22:10:03.004 ERR [app] request failed {"attempt":3}
//!   err: connection refused (ECONNREFUSED)
//! ```
//!
//! Each entry produces exactly one write to the output target: one or
//! two newline-joined lines with a trailing newline.  Context
//! serialization goes through the cycle-safe compact serializer, so
//! arbitrary (including cyclic) context never faults the sink.

use crate::Level;
use crate::log_entry::LogEntry;
use crate::sink::Sink;
use crate::spinlock::Spinlock;
use crate::value::{TaggedError, Value};
use std::fmt::Debug;
use std::sync::Arc;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_DIM: &str = "\x1b[2m";

const fn level_color(level: Level) -> &'static str {
    match level {
        Level::Trace => "\x1b[90m",
        Level::Debug => "\x1b[36m",
        Level::Info => "\x1b[32m",
        Level::Warn => "\x1b[33m",
        Level::Error => "\x1b[31m",
        Level::Fatal => "\x1b[35m",
    }
}

/// A raw-text output target for [`PrettySink`].
pub trait TextOutput: Debug + Send + Sync {
    /// Writes one chunk of rendered text.
    fn write_text(&self, text: &str);

    /// Whether this target is an interactive terminal.  Drives
    /// [`ColorMode::Auto`]; targets with no such signal report `false`.
    fn is_terminal(&self) -> bool {
        false
    }
}

/**
A reference output target that writes to stderr.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StderrOutput {}

impl StderrOutput {
    pub const fn new() -> Self {
        Self {}
    }
}

impl TextOutput for StderrOutput {
    fn write_text(&self, text: &str) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = std::io::stderr().lock();
            lock.write_all(text.as_bytes()).expect("Can't log to stderr");
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = text.trim_end_matches('\n').to_string();
            web_sys::console::log_1(&msg.into());
        }
    }

    fn is_terminal(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::IsTerminal;
            std::io::stderr().is_terminal()
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }
}

/**
An output target that writes to stdout.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StdoutOutput {}

impl StdoutOutput {
    pub const fn new() -> Self {
        Self {}
    }
}

impl TextOutput for StdoutOutput {
    fn write_text(&self, text: &str) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = std::io::stdout().lock();
            lock.write_all(text.as_bytes()).expect("Can't log to stdout");
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = text.trim_end_matches('\n').to_string();
            web_sys::console::log_1(&msg.into());
        }
    }

    fn is_terminal(&self) -> bool {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::IsTerminal;
            std::io::stdout().is_terminal()
        }
        #[cfg(target_arch = "wasm32")]
        {
            false
        }
    }
}

/// An output target that accumulates chunks in memory.
///
/// Clones share the buffer, so a test can hand one clone to the sink and
/// read through the other.  Each `write_text` call is recorded as its
/// own chunk, which lets callers observe write granularity.
#[derive(Clone)]
pub struct BufferOutput {
    chunks: Arc<Spinlock<Vec<String>>>,
}

impl BufferOutput {
    pub fn new() -> Self {
        Self {
            chunks: Arc::new(Spinlock::new(Vec::new())),
        }
    }

    /// All chunks written so far, concatenated.
    pub fn contents(&self) -> String {
        self.chunks.with(|chunks| chunks.concat())
    }

    /// The individual chunks written so far, in order.
    pub fn chunks(&self) -> Vec<String> {
        self.chunks.with(|chunks| chunks.clone())
    }

    /// Returns the concatenated contents and clears the buffer.
    pub fn take(&self) -> String {
        self.chunks.with_mut(|chunks| {
            let contents = chunks.concat();
            chunks.clear();
            contents
        })
    }
}

impl TextOutput for BufferOutput {
    fn write_text(&self, text: &str) {
        let text = text.to_string();
        self.chunks.with_mut(|chunks| chunks.push(text));
    }
}

impl Default for BufferOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for BufferOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferOutput")
            .field("chunks", &self.chunks.with(|c| c.len()))
            .finish()
    }
}

/// Color behavior for [`PrettySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    On,
    Off,
    /// Colors iff the output target reports it is an interactive
    /// terminal.  Resolved once, at sink construction.
    #[default]
    Auto,
}

/// Timestamp rendering for [`PrettySink`].
pub enum TimestampMode {
    /// `HH:MM:SS.mmm`, UTC, from the entry timestamp.
    Short,
    /// Full ISO-8601 with milliseconds, UTC, from the entry timestamp.
    Iso,
    /// Invoked once per entry; the returned string is used verbatim.
    Custom(Box<dyn Fn() -> String + Send + Sync>),
}

impl Default for TimestampMode {
    fn default() -> Self {
        TimestampMode::Short
    }
}

impl Debug for TimestampMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampMode::Short => f.write_str("Short"),
            TimestampMode::Iso => f.write_str("Iso"),
            TimestampMode::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Options for [`PrettySink::new`].
#[derive(Debug, Default)]
pub struct PrettyOptions {
    pub colors: ColorMode,
    pub timestamp: TimestampMode,
}

/// The reference human-readable sink.  See the module docs for the line
/// format.
#[derive(Debug)]
pub struct PrettySink {
    output: Box<dyn TextOutput>,
    colors: bool,
    timestamp: TimestampMode,
}

impl PrettySink {
    pub fn new(output: impl TextOutput + 'static, options: PrettyOptions) -> PrettySink {
        let colors = match options.colors {
            ColorMode::On => true,
            ColorMode::Off => false,
            ColorMode::Auto => output.is_terminal(),
        };
        PrettySink {
            output: Box::new(output),
            colors,
            timestamp: options.timestamp,
        }
    }

    /// Convenience constructor for the common stderr target.
    pub fn stderr(options: PrettyOptions) -> PrettySink {
        PrettySink::new(StderrOutput::new(), options)
    }

    fn push_dim(&self, out: &mut String, text: &str) {
        if self.colors {
            out.push_str(ANSI_DIM);
            out.push_str(text);
            out.push_str(ANSI_RESET);
        } else {
            out.push_str(text);
        }
    }

    fn render(&self, entry: &LogEntry) -> String {
        let mut out = String::new();

        let timestamp = match &self.timestamp {
            TimestampMode::Short => short_timestamp(entry.timestamp()),
            TimestampMode::Iso => iso_timestamp(entry.timestamp()),
            TimestampMode::Custom(f) => f(),
        };
        self.push_dim(&mut out, &timestamp);

        out.push(' ');
        if self.colors {
            out.push_str(level_color(entry.level()));
            out.push_str(entry.level().tag());
            out.push_str(ANSI_RESET);
        } else {
            out.push_str(entry.level().tag());
        }

        if !entry.modules().is_empty() {
            let mut chain = String::new();
            for module in entry.modules() {
                chain.push('[');
                chain.push_str(module);
                chain.push(']');
            }
            out.push(' ');
            self.push_dim(&mut out, &chain);
        }

        if !entry.message().is_empty() {
            out.push(' ');
            out.push_str(entry.message());
        }

        // An error under the reserved key leaves the general tail and
        // becomes its own indented line.  Non-error values under the same
        // key stay in the tail untouched.
        let err: Option<Arc<dyn TaggedError>> = match entry.context().get("err") {
            Some(Value::Error(err)) => Some(err),
            _ => None,
        };
        let skip: &[&str] = if err.is_some() { &["err"] } else { &[] };
        if entry.context().len_excluding(skip) > 0 {
            out.push(' ');
            entry.context().write_compact_excluding(&mut out, skip);
        }

        if let Some(err) = err {
            out.push_str("\n  ");
            if self.colors {
                out.push_str(level_color(Level::Error));
                out.push_str("err:");
                out.push_str(ANSI_RESET);
            } else {
                out.push_str("err:");
            }
            out.push(' ');
            out.push_str(err.message());
            if let Some(code) = err.code() {
                out.push_str(" (");
                out.push_str(code);
                out.push(')');
            }
        }

        out.push('\n');
        out
    }
}

impl Sink for PrettySink {
    fn write(&self, entry: &LogEntry) {
        self.output.write_text(&self.render(entry));
    }
}

fn short_timestamp(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(datetime) => datetime.format("%H:%M:%S%.3f").to_string(),
        None => millis.to_string(),
    }
}

fn iso_timestamp(millis: i64) -> String {
    match chrono::DateTime::from_timestamp_millis(millis) {
        Some(datetime) => datetime.to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        None => millis.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ContextMap;

    fn entry(level: Level, message: &str, context: ContextMap, modules: &[&str]) -> LogEntry {
        LogEntry::at(
            1_700_000_000_123,
            level,
            message,
            context,
            modules.iter().map(|m| m.to_string()).collect(),
        )
    }

    fn plain_sink(output: BufferOutput) -> PrettySink {
        PrettySink::new(
            output,
            PrettyOptions {
                colors: ColorMode::Off,
                timestamp: TimestampMode::Custom(Box::new(|| "TS".to_string())),
            },
        )
    }

    #[test]
    fn line_layout() {
        let output = BufferOutput::new();
        let sink = plain_sink(output.clone());
        let context = ContextMap::new();
        context.insert("free_mb", 112);
        sink.write(&entry(Level::Warn, "disk almost full", context, &["app", "store"]));
        assert_eq!(
            output.contents(),
            "TS WRN [app][store] disk almost full {\"free_mb\":112}\n"
        );
    }

    #[test]
    fn empty_segments_are_omitted() {
        let output = BufferOutput::new();
        let sink = plain_sink(output.clone());
        sink.write(&entry(Level::Info, "bare", ContextMap::new(), &[]));
        assert_eq!(output.contents(), "TS INF bare\n");
    }

    #[test]
    fn short_timestamp_format() {
        // 1970-01-01T00:00:07.065Z
        assert_eq!(short_timestamp(7_065), "00:00:07.065");
    }

    #[test]
    fn iso_timestamp_format() {
        assert_eq!(iso_timestamp(7_065), "1970-01-01T00:00:07.065Z");
    }

    #[test]
    fn auto_colors_off_for_buffer() {
        let output = BufferOutput::new();
        let sink = PrettySink::new(
            output.clone(),
            PrettyOptions {
                colors: ColorMode::Auto,
                ..Default::default()
            },
        );
        sink.write(&entry(Level::Info, "m", ContextMap::new(), &[]));
        assert!(!output.contents().contains('\x1b'));
    }
}
