//! Timestamp-to-path formatting
//!
//! The rotating writer only depends on the [`PathFormatter`] capability:
//! given a period-start timestamp, produce the target file path. It must be
//! deterministic and side-effect-free so that re-formatting the same
//! boundary always lands on the same file. [`StrftimePattern`] is the
//! built-in implementation, rendering strftime-style patterns in local time.

use std::path::PathBuf;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local};

use crate::error::Error;

/// Capability that maps a period-start timestamp to a file path
///
/// Implementations must be deterministic: the same timestamp always yields
/// the same path, with no filesystem side effects.
pub trait PathFormatter: Send + Sync {
    /// Format the path for the period starting at `period_start` nanoseconds
    /// since the Unix epoch.
    fn format_path(&self, period_start: i64) -> PathBuf;
}

impl<F> PathFormatter for F
where
    F: Fn(i64) -> PathBuf + Send + Sync,
{
    fn format_path(&self, period_start: i64) -> PathBuf {
        self(period_start)
    }
}

/// strftime-style path pattern rendered in local time
///
/// The pattern is validated at construction; an unrecognized specifier is a
/// configuration error and no writer is created from it.
#[derive(Debug, Clone)]
pub struct StrftimePattern {
    pattern: String,
}

impl StrftimePattern {
    /// Parse and validate a strftime pattern (e.g. `logs/%Y-%m-%d-%H.log`)
    pub fn new(pattern: impl Into<String>) -> Result<Self, Error> {
        let pattern = pattern.into();
        if StrftimeItems::new(&pattern).any(|item| item == Item::Error) {
            return Err(Error::InvalidPattern { pattern });
        }
        Ok(Self { pattern })
    }

    /// The raw pattern string
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl PathFormatter for StrftimePattern {
    fn format_path(&self, period_start: i64) -> PathBuf {
        let ts = DateTime::from_timestamp_nanos(period_start).with_timezone(&Local);
        PathBuf::from(ts.format(&self.pattern).to_string())
    }
}
