// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pretty sink rendering: timestamps, colors, the err line, and write
//! granularity, all against a fixed clock.

use logtree::{
    BufferOutput, ColorMode, ContextMap, Level, LogEntry, PrettyOptions, PrettySink, Sink,
    TaggedError, Value, context,
};

// 2023-11-14T22:13:20.123Z
const FIXED_MILLIS: i64 = 1_700_000_000_123;

#[derive(Debug)]
struct ConnectError {
    with_code: bool,
}

impl TaggedError for ConnectError {
    fn message(&self) -> &str {
        "connection refused"
    }
    fn code(&self) -> Option<&str> {
        self.with_code.then_some("ECONNREFUSED")
    }
}

fn entry(level: Level, message: &str, context: ContextMap, modules: &[&str]) -> LogEntry {
    LogEntry::at(
        FIXED_MILLIS,
        level,
        message,
        context,
        modules.iter().map(|m| m.to_string()).collect(),
    )
}

fn sink_with(colors: ColorMode, timestamp: logtree::TimestampMode) -> (PrettySink, BufferOutput) {
    let output = BufferOutput::new();
    let sink = PrettySink::new(
        output.clone(),
        PrettyOptions { colors, timestamp },
    );
    (sink, output)
}

fn plain() -> (PrettySink, BufferOutput) {
    sink_with(ColorMode::Off, logtree::TimestampMode::Short)
}

#[test]
fn short_timestamp_layout() {
    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "hello", ContextMap::new(), &[]));
    assert_eq!(output.contents(), "22:13:20.123 INF hello\n");
}

#[test]
fn iso_timestamp_layout() {
    let (sink, output) = sink_with(ColorMode::Off, logtree::TimestampMode::Iso);
    sink.write(&entry(Level::Info, "hello", ContextMap::new(), &[]));
    assert_eq!(output.contents(), "2023-11-14T22:13:20.123Z INF hello\n");
}

#[test]
fn custom_timestamp_is_used_verbatim() {
    let (sink, output) = sink_with(
        ColorMode::Off,
        logtree::TimestampMode::Custom(Box::new(|| "@now".to_string())),
    );
    sink.write(&entry(Level::Info, "hello", ContextMap::new(), &[]));
    assert_eq!(output.contents(), "@now INF hello\n");
}

#[test]
fn level_tags() {
    let cases = [
        (Level::Trace, "TRC"),
        (Level::Debug, "DBG"),
        (Level::Info, "INF"),
        (Level::Warn, "WRN"),
        (Level::Error, "ERR"),
        (Level::Fatal, "FTL"),
    ];
    for (level, tag) in cases {
        let (sink, output) = plain();
        sink.write(&entry(level, "m", ContextMap::new(), &[]));
        assert_eq!(output.contents(), format!("22:13:20.123 {tag} m\n"));
    }
}

#[test]
fn modules_render_concatenated_or_not_at_all() {
    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "m", ContextMap::new(), &["app", "db", "replica"]));
    assert_eq!(output.contents(), "22:13:20.123 INF [app][db][replica] m\n");

    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "m", ContextMap::new(), &[]));
    assert!(!output.contents().contains('['));
}

#[test]
fn context_tail_appears_only_when_nonempty() {
    let (sink, output) = plain();
    sink.write(&entry(
        Level::Info,
        "m",
        context! { b: 2, a: "one" },
        &[],
    ));
    assert_eq!(output.contents(), "22:13:20.123 INF m {\"a\":\"one\",\"b\":2}\n");

    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "m", ContextMap::new(), &[]));
    assert!(!output.contents().contains('{'));
}

#[test]
fn colors_off_is_escape_free() {
    let (sink, output) = sink_with(ColorMode::Off, logtree::TimestampMode::Short);
    sink.write(&entry(Level::Error, "boom", context! { n: 1 }, &["app"]));
    assert!(!output.contents().contains('\x1b'));
}

#[test]
fn colors_on_wraps_the_level_tag() {
    let (sink, output) = sink_with(ColorMode::On, logtree::TimestampMode::Short);
    sink.write(&entry(Level::Error, "boom", ContextMap::new(), &[]));
    let contents = output.contents();
    assert!(contents.contains('\x1b'));
    assert!(contents.contains("\x1b[31mERR\x1b[0m"));
}

#[test]
fn tagged_error_moves_to_an_indented_second_line() {
    let (sink, output) = plain();
    let context = context! { attempt: 3 };
    context.insert("err", Value::error(ConnectError { with_code: true }));
    sink.write(&entry(Level::Error, "request failed", context, &["app"]));

    assert_eq!(
        output.contents(),
        "22:13:20.123 ERR [app] request failed {\"attempt\":3}\n  err: connection refused (ECONNREFUSED)\n"
    );
}

#[test]
fn error_without_code_omits_the_parenthetical() {
    let (sink, output) = plain();
    let context = ContextMap::new();
    context.insert("err", Value::error(ConnectError { with_code: false }));
    sink.write(&entry(Level::Error, "request failed", context, &[]));

    assert_eq!(
        output.contents(),
        "22:13:20.123 ERR request failed\n  err: connection refused\n"
    );
}

#[test]
fn non_error_err_key_stays_in_the_tail() {
    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "m", context! { err: "just a string" }, &[]));
    assert_eq!(
        output.contents(),
        "22:13:20.123 INF m {\"err\":\"just a string\"}\n"
    );
}

#[test]
fn cyclic_context_renders_the_placeholder() {
    let (sink, output) = plain();
    let cyclic = ContextMap::new();
    cyclic.insert("myself", cyclic.clone());
    sink.write(&entry(Level::Info, "m", cyclic, &[]));
    assert_eq!(
        output.contents(),
        "22:13:20.123 INF m {\"myself\":\"[Circular]\"}\n"
    );
}

#[test]
fn every_entry_is_exactly_one_write() {
    let (sink, output) = plain();
    let context = ContextMap::new();
    context.insert("err", Value::error(ConnectError { with_code: true }));
    sink.write(&entry(Level::Error, "two lines", context, &[]));
    sink.write(&entry(Level::Info, "one line", ContextMap::new(), &[]));

    let chunks = output.chunks();
    assert_eq!(chunks.len(), 2, "one write per entry, even with an err line");
    for chunk in &chunks {
        assert!(chunk.ends_with('\n'));
        assert!(!chunk.trim_end_matches('\n').is_empty());
    }
    assert_eq!(chunks[0].matches('\n').count(), 2);
    assert_eq!(chunks[1].matches('\n').count(), 1);
}

#[test]
fn empty_message_omits_the_segment() {
    let (sink, output) = plain();
    sink.write(&entry(Level::Info, "", context! { k: 1 }, &[]));
    assert_eq!(output.contents(), "22:13:20.123 INF {\"k\":1}\n");
}
