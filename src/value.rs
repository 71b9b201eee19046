// SPDX-License-Identifier: MIT OR Apache-2.0

//! Context values attached to log entries.
//!
//! A [`ContextMap`] is a shared-ownership handle: cloning it shares the
//! underlying entries rather than copying them.  That is what lets a
//! parent logger, its children, and every sink observe one map identity
//! per dispatch, and it is also what makes cyclic context representable
//! (a map can, transitively, contain itself).  The compact serializer
//! here is the single place cycles are broken: revisiting a map already
//! on the current path substitutes the stable `"[Circular]"` placeholder
//! instead of recursing.
//!
//! Tagged errors are recognized through the explicit [`TaggedError`]
//! capability trait, never by structural guessing: a value is an error
//! iff it is the [`Value::Error`] variant.

use crate::spinlock::Spinlock;
use std::collections::BTreeMap;
use std::fmt::{Debug, Write};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Capability marker for externally defined error values that receive
/// special rendering treatment.
///
/// The logging core consumes implementors through exactly two accessors:
/// a human-readable message, and an optional short code.  Everything else
/// about the error type stays with its owner.
pub trait TaggedError: Debug + Send + Sync {
    /// The error's human-readable message.
    fn message(&self) -> &str;

    /// An optional machine-oriented code or detail tag.
    fn code(&self) -> Option<&str> {
        None
    }
}

/// A context value: the payload type for [`ContextMap`] entries.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(ContextMap),
    Error(Arc<dyn TaggedError>),
}

impl Value {
    /// Wraps an error value, coercing to the trait object.
    pub fn error(err: impl TaggedError + 'static) -> Value {
        Value::Error(Arc::new(err))
    }

    /// The single error predicate: true iff this is a tagged error value.
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    pub fn as_error(&self) -> Option<&Arc<dyn TaggedError>> {
        match self {
            Value::Error(err) => Some(err),
            _ => None,
        }
    }
}

// Scalar equality is by value; maps and errors compare by identity, the
// same provenance-based equality the shared handles themselves use.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Value {
        Value::Bool(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Value {
        Value::Int(v as i64)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Value {
        Value::Int(v)
    }
}
impl From<u32> for Value {
    fn from(v: u32) -> Value {
        Value::Int(v as i64)
    }
}
impl From<f32> for Value {
    fn from(v: f32) -> Value {
        Value::Float(v as f64)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Value {
        Value::Float(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Value {
        Value::Str(v.to_string())
    }
}
impl From<String> for Value {
    fn from(v: String) -> Value {
        Value::Str(v)
    }
}
impl From<ContextMap> for Value {
    fn from(v: ContextMap) -> Value {
        Value::Map(v)
    }
}
impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Value {
        Value::List(v)
    }
}
impl From<Arc<dyn TaggedError>> for Value {
    fn from(v: Arc<dyn TaggedError>) -> Value {
        Value::Error(v)
    }
}

/// A string-keyed map of context values with shared-ownership semantics.
///
/// Clones share the underlying entries; equality and hashing are by
/// pointer identity of the shared allocation.  All accessors copy data in
/// or out under a short-lived spinlock, so no lock is ever held while
/// user code runs.
#[derive(Clone)]
pub struct ContextMap {
    entries: Arc<Spinlock<BTreeMap<String, Value>>>,
}

impl ContextMap {
    pub fn new() -> ContextMap {
        ContextMap {
            entries: Arc::new(Spinlock::new(BTreeMap::new())),
        }
    }

    fn from_entries(entries: BTreeMap<String, Value>) -> ContextMap {
        ContextMap {
            entries: Arc::new(Spinlock::new(entries)),
        }
    }

    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) {
        let key = key.into();
        let value = value.into();
        self.entries.with_mut(|m| {
            m.insert(key, value);
        });
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.entries.with(|m| m.get(key).cloned())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.entries.with_mut(|m| m.remove(key))
    }

    pub fn len(&self) -> usize {
        self.entries.with(|m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.with(|m| m.is_empty())
    }

    /// Copies the current entries out for iteration without holding the
    /// lock.  Nested maps come out as shared handles, not deep copies.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.entries.with(|m| m.clone())
    }

    /// Returns a fresh map holding this map's entries overlaid with
    /// `other`'s; `other`'s keys win on conflict.  Neither input is
    /// mutated, and nested values are shared, never traversed, so merging
    /// is safe for cyclic maps.
    pub fn merged_with(&self, other: &ContextMap) -> ContextMap {
        let mut merged = self.snapshot();
        merged.extend(other.snapshot());
        ContextMap::from_entries(merged)
    }

    pub(crate) fn ptr_id(&self) -> usize {
        Arc::as_ptr(&self.entries) as *const () as usize
    }

    /// Serializes the entries to compact JSON-shaped text, breaking
    /// cycles with `"[Circular]"`.  Never fails, for any input.
    pub fn to_compact_string(&self) -> String {
        let mut out = String::new();
        self.write_compact_excluding(&mut out, &[]);
        out
    }

    /// Like [`to_compact_string`](Self::to_compact_string) but skipping
    /// the named top-level keys.  The pretty sink uses this to pull the
    /// `err` entry out of the general tail without mutating the map.
    pub(crate) fn write_compact_excluding(&self, out: &mut String, skip: &[&str]) {
        let mut seen = Vec::new();
        write_map(out, self, skip, &mut seen);
    }

    /// Number of entries after skipping the named keys.
    pub(crate) fn len_excluding(&self, skip: &[&str]) -> usize {
        self.entries
            .with(|m| m.keys().filter(|k| !skip.contains(&k.as_str())).count())
    }
}

impl Default for ContextMap {
    fn default() -> ContextMap {
        ContextMap::new()
    }
}

impl PartialEq for ContextMap {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.entries, &other.entries)
    }
}

impl Eq for ContextMap {}

impl Hash for ContextMap {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Arc::as_ptr(&self.entries).hash(state);
    }
}

// Debug goes through the cycle-safe serializer; a derived impl would
// recurse forever on self-referential maps.
impl Debug for ContextMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ContextMap({})", self.to_compact_string())
    }
}

fn write_map(out: &mut String, map: &ContextMap, skip: &[&str], seen: &mut Vec<usize>) {
    let id = map.ptr_id();
    if seen.contains(&id) {
        out.push_str("\"[Circular]\"");
        return;
    }
    seen.push(id);
    let entries = map.snapshot();
    out.push('{');
    let mut first = true;
    for (key, value) in entries.iter() {
        if skip.contains(&key.as_str()) {
            continue;
        }
        if !first {
            out.push(',');
        }
        first = false;
        write_escaped_str(out, key);
        out.push(':');
        write_value(out, value, seen);
    }
    out.push('}');
    seen.pop();
}

fn write_value(out: &mut String, value: &Value, seen: &mut Vec<usize>) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Int(i) => {
            let _ = write!(out, "{}", i);
        }
        Value::Float(f) if f.is_finite() => {
            let _ = write!(out, "{}", f);
        }
        //NaN and infinities have no JSON rendering
        Value::Float(_) => out.push_str("null"),
        Value::Str(s) => write_escaped_str(out, s),
        Value::List(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item, seen);
            }
            out.push(']');
        }
        Value::Map(map) => write_map(out, map, &[], seen),
        Value::Error(err) => write_escaped_str(out, err.message()),
    }
}

fn write_escaped_str(out: &mut String, s: &str) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestError {
        message: String,
    }
    impl TaggedError for TestError {
        fn message(&self) -> &str {
            &self.message
        }
    }

    #[test]
    fn compact_serialization() {
        let map = ContextMap::new();
        map.insert("b", 2);
        map.insert("a", "one");
        map.insert("flag", true);
        map.insert("nothing", Value::Null);
        assert_eq!(
            map.to_compact_string(),
            r#"{"a":"one","b":2,"flag":true,"nothing":null}"#
        );
    }

    #[test]
    fn string_escaping() {
        let map = ContextMap::new();
        map.insert("k", "a\"b\\c\nd");
        assert_eq!(map.to_compact_string(), r#"{"k":"a\"b\\c\nd"}"#);
    }

    #[test]
    fn nested_values() {
        let inner = ContextMap::new();
        inner.insert("x", 1);
        let map = ContextMap::new();
        map.insert("inner", inner);
        map.insert("list", vec![Value::Int(1), Value::Str("two".into())]);
        assert_eq!(
            map.to_compact_string(),
            r#"{"inner":{"x":1},"list":[1,"two"]}"#
        );
    }

    #[test]
    fn cycles_become_placeholder() {
        let map = ContextMap::new();
        map.insert("name", "looped");
        map.insert("myself", map.clone());
        assert_eq!(
            map.to_compact_string(),
            r#"{"myself":"[Circular]","name":"looped"}"#
        );
    }

    #[test]
    fn cycle_through_list() {
        let map = ContextMap::new();
        map.insert("items", vec![Value::Map(map.clone())]);
        assert_eq!(map.to_compact_string(), r#"{"items":["[Circular]"]}"#);
    }

    #[test]
    fn shared_map_is_not_a_cycle() {
        // The same map appearing twice as a sibling is not on its own
        // path; both occurrences serialize normally.
        let shared = ContextMap::new();
        shared.insert("x", 1);
        let map = ContextMap::new();
        map.insert("a", shared.clone());
        map.insert("b", shared);
        assert_eq!(map.to_compact_string(), r#"{"a":{"x":1},"b":{"x":1}}"#);
    }

    #[test]
    fn errors_render_as_message() {
        let map = ContextMap::new();
        map.insert(
            "err",
            Value::error(TestError {
                message: "boom".into(),
            }),
        );
        assert_eq!(map.to_compact_string(), r#"{"err":"boom"}"#);
    }

    #[test]
    fn non_finite_floats_render_null() {
        let map = ContextMap::new();
        map.insert("nan", f64::NAN);
        map.insert("ratio", 0.5);
        assert_eq!(map.to_compact_string(), r#"{"nan":null,"ratio":0.5}"#);
    }

    #[test]
    fn equality_is_identity() {
        let a = ContextMap::new();
        let b = ContextMap::new();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn merged_with_overrides_and_leaves_inputs_alone() {
        let base = ContextMap::new();
        base.insert("keep", 1);
        base.insert("shadow", "old");
        let over = ContextMap::new();
        over.insert("shadow", "new");
        let merged = base.merged_with(&over);
        assert_eq!(merged.get("keep"), Some(Value::Int(1)));
        assert_eq!(merged.get("shadow"), Some(Value::Str("new".into())));
        assert_eq!(base.get("shadow"), Some(Value::Str("old".into())));
        assert_ne!(merged, base);
    }

    #[test]
    fn error_predicate() {
        let err = Value::error(TestError {
            message: "x".into(),
        });
        assert!(err.is_error());
        assert!(!Value::Str("x".into()).is_error());
        assert!(!Value::Null.is_error());
        assert!(!Value::Map(ContextMap::new()).is_error());
    }
}
