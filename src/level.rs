// SPDX-License-Identifier: MIT OR Apache-2.0

/// Name of the environment variable consulted for the default severity
/// threshold when no explicit level is supplied at logger construction.
///
/// Matching is case-insensitive over the six level names; an absent or
/// unrecognized value resolves to [`Level::Info`].
pub const LEVEL_ENV_VAR: &str = "LOGTREE_LEVEL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Most detailed debugging
    Trace,
    /// Print-style debugging
    Debug,
    /// Routine operational messages
    Info,
    /// Suspicious condition
    Warn,
    /// Runtime error
    Error,
    /// The highest severity label.  Logging at this level does not
    /// terminate the process; it is only a label.
    Fatal,
}

impl Level {
    /// All six levels in ascending rank order.
    pub const ALL: [Level; 6] = [
        Level::Trace,
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    /// The lower-case level name, e.g. `"warn"`.
    pub const fn name(self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    /// Fixed 3-letter upper-case tag used by the pretty sink.
    pub const fn tag(self) -> &'static str {
        match self {
            Level::Trace => "TRC",
            Level::Debug => "DBG",
            Level::Info => "INF",
            Level::Warn => "WRN",
            Level::Error => "ERR",
            Level::Fatal => "FTL",
        }
    }

    /// Looks up a level by its exact lower-case name.
    ///
    /// This is the recognizer used by call-argument resolution; it is
    /// deliberately strict so that an ordinary message like `"Error"` is
    /// not silently consumed as a level selector.
    pub fn from_name(name: &str) -> Option<Level> {
        match name {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    /// Looks up a level from an environment value, case-insensitively.
    pub fn from_env_value(value: &str) -> Option<Level> {
        Level::from_name(value.trim().to_ascii_lowercase().as_str())
    }

    /// Resolves the default threshold from [`LEVEL_ENV_VAR`].
    ///
    /// Absent or unrecognized values resolve to [`Level::Info`]; this
    /// never fails.
    pub fn from_env() -> Level {
        std::env::var(LEVEL_ENV_VAR)
            .ok()
            .and_then(|v| Level::from_env_value(&v))
            .unwrap_or(Level::Info)
    }

    /// Whether an entry at `self` passes a logger whose threshold is
    /// `threshold`, i.e. `rank(self) >= rank(threshold)`.
    pub fn passes(self, threshold: Level) -> bool {
        self >= threshold
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
