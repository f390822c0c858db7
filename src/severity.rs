use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Severity of a log [`Entry`](crate::entry::Entry).
///
/// Variants are declared from most to least severe, so the derived ordering
/// puts `Panic` first and `Trace` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Panic,
    Fatal,
    Error,
    #[serde(rename = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

/// Levels a freshly constructed hook subscribes to.
///
/// Each hook copies this into its own `Vec`, so reconfiguring one instance
/// never affects another.
pub const DEFAULT_LEVELS: [Severity; 5] = [
    Severity::Panic,
    Severity::Fatal,
    Severity::Error,
    Severity::Warn,
    Severity::Info,
];

/// Every severity, most severe first.
pub const ALL_LEVELS: [Severity; 7] = [
    Severity::Panic,
    Severity::Fatal,
    Severity::Error,
    Severity::Warn,
    Severity::Info,
    Severity::Debug,
    Severity::Trace,
];

impl Severity {
    /// Canonical lowercase name, as written into the `level` field and the
    /// default tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Panic => "panic",
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warn => "warning",
            Severity::Info => "info",
            Severity::Debug => "debug",
            Severity::Trace => "trace",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warn,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG => Severity::Debug,
            tracing::Level::TRACE => Severity::Trace,
        }
    }
}

/// Error returned when a string does not name a [`Severity`].
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown severity level: {0:?}")]
pub struct ParseSeverityError(pub String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "panic" => Ok(Severity::Panic),
            "fatal" => Ok(Severity::Fatal),
            "error" => Ok(Severity::Error),
            "warn" | "warning" => Ok(Severity::Warn),
            "info" => Ok(Severity::Info),
            "debug" => Ok(Severity::Debug),
            "trace" => Ok(Severity::Trace),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}
