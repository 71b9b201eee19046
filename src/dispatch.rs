// SPDX-License-Identifier: MIT OR Apache-2.0

//! Call-argument resolution for the logtree logging library.
//!
//! Logging calls accept several positional shapes.  Rather than leaning
//! on dynamic typing, the shapes are classified over an explicit tagged
//! union, [`Arg`], by argument count and variant, in a fixed precedence:
//!
//! 1. `(message)` — info, empty context.
//! 2. `(level-name, message)` — the first string is a recognized level
//!    name (exact lower-case match).
//! 3. `(message, map)` — info, the map as context.
//! 4. `(message, detail)` — two strings where the first is not a level
//!    name; the second lands under the `detail` key.
//! 5. `(message, error)` — a tagged error lands under the `err` key.
//! 6. `(level-name, message, map)`.
//! 7. `(level-name, message, error)` — the error lands under `err`.
//!
//! An [`Arg::Null`] in a context position resolves to empty context, as if
//! the argument were absent.  Resolution never fails: any shape outside
//! the list above degrades to the first string argument as the message,
//! at info, with empty context.  (That fallback also swallows a
//! three-string call whose first argument is a level name; classification
//! is by whole shape, not by prefix.)

use crate::Level;
use crate::value::{ContextMap, TaggedError, Value};
use std::sync::Arc;

/// One positional argument to a logging call.
///
/// `From` conversions cover the common call-site spellings, so a call
/// reads `logger.log(["listening".into(), context.into()])`.
#[derive(Debug, Clone)]
pub enum Arg {
    Str(String),
    Map(ContextMap),
    Error(Arc<dyn TaggedError>),
    Null,
}

impl Arg {
    /// Wraps an error argument, coercing to the trait object.
    pub fn error(err: impl TaggedError + 'static) -> Arg {
        Arg::Error(Arc::new(err))
    }
}

impl From<&str> for Arg {
    fn from(v: &str) -> Arg {
        Arg::Str(v.to_string())
    }
}
impl From<String> for Arg {
    fn from(v: String) -> Arg {
        Arg::Str(v)
    }
}
impl From<Level> for Arg {
    fn from(v: Level) -> Arg {
        Arg::Str(v.name().to_string())
    }
}
impl From<ContextMap> for Arg {
    fn from(v: ContextMap) -> Arg {
        Arg::Map(v)
    }
}
impl From<Arc<dyn TaggedError>> for Arg {
    fn from(v: Arc<dyn TaggedError>) -> Arg {
        Arg::Error(v)
    }
}

fn err_context(err: &Arc<dyn TaggedError>) -> ContextMap {
    let context = ContextMap::new();
    context.insert("err", Value::Error(err.clone()));
    context
}

fn detail_context(detail: &str) -> ContextMap {
    let context = ContextMap::new();
    context.insert("detail", detail);
    context
}

/// Classifies the positional arguments of one logging call.
///
/// Returns the resolved level, message, and call-site context.  Never
/// fails; see the module docs for the fallback rule.
pub(crate) fn classify(args: &[Arg]) -> (Level, String, ContextMap) {
    match args {
        [Arg::Str(message)] | [Arg::Str(message), Arg::Null] => {
            (Level::Info, message.clone(), ContextMap::new())
        }
        [Arg::Str(first), Arg::Str(second)] => match Level::from_name(first) {
            Some(level) => (level, second.clone(), ContextMap::new()),
            None => (Level::Info, first.clone(), detail_context(second)),
        },
        [Arg::Str(message), Arg::Map(context)] => {
            (Level::Info, message.clone(), context.clone())
        }
        [Arg::Str(message), Arg::Error(err)] => {
            (Level::Info, message.clone(), err_context(err))
        }
        [Arg::Str(first), Arg::Str(message), rest] => match (Level::from_name(first), rest) {
            (Some(level), Arg::Map(context)) => (level, message.clone(), context.clone()),
            (Some(level), Arg::Error(err)) => (level, message.clone(), err_context(err)),
            (Some(level), Arg::Null) => (level, message.clone(), ContextMap::new()),
            _ => fallback(args),
        },
        _ => fallback(args),
    }
}

/// Documented fallback for shapes outside the recognized list: first
/// string argument as the message, at info, with empty context.
fn fallback(args: &[Arg]) -> (Level, String, ContextMap) {
    let message = args
        .iter()
        .find_map(|arg| match arg {
            Arg::Str(s) => Some(s.clone()),
            _ => None,
        })
        .unwrap_or_default();
    (Level::Info, message, ContextMap::new())
}
