//! logshear - time-bucketed rotating file sink
//!
//! A writer that transparently redirects bytes into successive files, where
//! the active file is chosen by mapping wall-clock time onto a fixed-size
//! period (e.g. "one file per hour") and formatting the period start through
//! a date/time pattern into a filesystem path. Consumers treat it as an
//! ordinary sequential-write sink; rotation is invisible except for new
//! files appearing.
//!
//! # Components
//!
//! | Component | Purpose |
//! |-----------|---------|
//! | [`RotatingWriter`] | owns the active handle, the period boundary, and the write lock |
//! | [`PeriodClock`] | pure period-boundary arithmetic with a cached UTC offset |
//! | [`PathFormatter`] / [`StrftimePattern`] | injectable timestamp-to-path formatting |
//! | [`Cleaner`] | validated configuration for age-based cleanup |
//!
//! # Example
//!
//! ```ignore
//! use std::io::Write;
//! use std::time::Duration;
//! use logshear::RotatingWriter;
//!
//! // One file per hour, named logs/2024-01-01-09.log and so on.
//! let writer = RotatingWriter::new("logs/%Y-%m-%d-%H.log", Duration::from_secs(3600))?;
//! (&writer).write_all(b"started\n")?;
//!
//! // Or keep a fixed filename and archive finished periods:
//! let writer = RotatingWriter::new("logs/%Y-%m-%d-%H.log", Duration::from_secs(3600))?
//!     .with_stable_path("logs/app.log");
//! ```

/// Error taxonomy shared across the crate
mod error;

/// Period boundary arithmetic
mod period;

/// Timestamp-to-path formatting
mod pattern;

/// The rotating writer core
mod rotation;

/// Cleanup configuration stub
mod cleaner;

pub use cleaner::Cleaner;
pub use error::Error;
pub use pattern::{PathFormatter, StrftimePattern};
pub use period::PeriodClock;
pub use rotation::RotatingWriter;
