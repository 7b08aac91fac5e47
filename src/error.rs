//! Error taxonomy for the rotating sink
//!
//! Configuration errors are raised at construction and the writer is never
//! created. I/O errors during rotation or write are surfaced to the caller
//! with the offending path attached; the writer stays usable and retries
//! rotation on the next call. Writing to a closed writer fails with a
//! distinct error so misuse is not mistaken for a transient failure.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the rotating sink
#[derive(Debug, Error)]
pub enum Error {
    /// The strftime pattern failed to parse
    #[error("invalid time format pattern: {pattern}")]
    InvalidPattern { pattern: String },

    /// The rotation period was zero or too large for nanosecond arithmetic
    #[error("rotation period must be a positive duration")]
    InvalidPeriod,

    /// The cleaner max-age was negative
    #[error("max age must be non-negative")]
    InvalidMaxAge,

    /// Write or flush attempted after `close()`
    #[error("writer is closed")]
    Closed,

    /// Failed to open a rotation target or archive file
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to copy the live file into its archive
    #[error("failed to archive into {path}: {source}")]
    Archive {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to truncate the stable file after archival
    #[error("failed to truncate {path}: {source}")]
    Truncate {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write payload bytes to the active file
    #[error("failed to write to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to flush the active file on close
    #[error("failed to close {path}: {source}")]
    Close {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl From<Error> for io::Error {
    fn from(err: Error) -> io::Error {
        let kind = match &err {
            Error::Closed => io::ErrorKind::BrokenPipe,
            Error::Open { source, .. }
            | Error::Archive { source, .. }
            | Error::Truncate { source, .. }
            | Error::Write { source, .. }
            | Error::Close { source, .. } => source.kind(),
            _ => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
