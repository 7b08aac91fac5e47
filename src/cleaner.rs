//! Age-based cleanup of rotated files
//!
//! Only the configuration surface exists: a pattern describing the rotated
//! files and a validated maximum age. The deletion pass itself is handled by
//! external tooling.

use chrono::TimeDelta;

use crate::error::Error;

/// Configuration for cleaning up rotated files older than a maximum age
#[derive(Debug, Clone)]
pub struct Cleaner {
    pattern: String,
    max_age: TimeDelta,
}

impl Cleaner {
    /// Create a cleaner; `max_age` must be non-negative
    pub fn new(pattern: impl Into<String>, max_age: TimeDelta) -> Result<Self, Error> {
        if max_age < TimeDelta::zero() {
            return Err(Error::InvalidMaxAge);
        }
        Ok(Self {
            pattern: pattern.into(),
            max_age,
        })
    }

    /// The pattern describing the rotated files
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Maximum age a rotated file may reach before it is eligible for removal
    pub fn max_age(&self) -> TimeDelta {
        self.max_age
    }
}
