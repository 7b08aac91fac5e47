//! Time-bucketed rotating writer
//!
//! [`RotatingWriter`] looks like an ordinary sequential byte sink; under the
//! hood every write checks whether wall-clock time has crossed into a new
//! period and, if so, swaps the active file handle before delegating the
//! payload. Rotation is invisible to callers except for the new files
//! appearing on disk.
//!
//! # Operating Modes
//!
//! - **Per-period filenames** (default): each period gets its own file, named
//!   by formatting the period-start timestamp through the configured
//!   [`PathFormatter`].
//! - **Stable path** (via [`RotatingWriter::with_stable_path`]): the file
//!   being written to never changes its name; at each boundary its prior
//!   contents are copied into a time-stamped archive (named from the period
//!   that just *finished*) and the stable file is truncated and reopened.
//!   Useful when a tailing agent needs a fixed filename, at the cost of a
//!   synchronous copy inside the locked write at every boundary.
//!
//! # Example
//!
//! ```ignore
//! use std::io::Write;
//! use std::time::Duration;
//! use logshear::RotatingWriter;
//!
//! let writer = RotatingWriter::new("logs/%Y-%m-%d-%H.log", Duration::from_secs(3600))?;
//! (&writer).write_all(b"hello\n")?;
//! writer.close()?;
//! ```

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use parking_lot::Mutex;

use crate::error::Error;
use crate::pattern::{PathFormatter, StrftimePattern};
use crate::period::PeriodClock;

/// Current wall-clock time in nanoseconds since the Unix epoch
fn now_nanos() -> i64 {
    // None only past year 2262; saturate rather than panic.
    Utc::now().timestamp_nanos_opt().unwrap_or(i64::MAX)
}

/// Lock-protected mutable state of the writer
#[derive(Default)]
struct Inner {
    /// Active file handle; None before the first write and after close
    handle: Option<File>,

    /// Formatted path of the currently open file; in stable-path mode this
    /// records the most recent archive path, as bookkeeping only
    current_path: PathBuf,

    /// Cached directory of `current_path`, to skip redundant create_dir_all
    current_dir: PathBuf,

    /// Start of the period the open handle represents; 0 before first write
    period_start: i64,

    /// Set by `close()`; makes the writer permanently inert
    closed: bool,
}

/// Writer that rotates its output file on fixed wall-clock period boundaries
///
/// A single exclusive lock serializes `write`, `flush`, and `close`, so the
/// writer can be shared by reference across threads: callers observe either
/// the pre-rotation or post-rotation file, never a torn write split across
/// files. All I/O is synchronous and blocks the calling thread.
pub struct RotatingWriter {
    clock: PeriodClock,
    formatter: Box<dyn PathFormatter>,
    stable_path: Option<PathBuf>,
    inner: Mutex<Inner>,
}

impl RotatingWriter {
    /// Create a writer that names files through a strftime pattern
    ///
    /// Fails if the pattern does not parse or the period is not a positive
    /// duration representable in i64 nanoseconds.
    pub fn new(pattern: &str, period: Duration) -> Result<Self, Error> {
        let formatter = StrftimePattern::new(pattern)?;
        Self::with_formatter(formatter, period)
    }

    /// Create a writer with an injected path-formatting capability
    pub fn with_formatter<F>(formatter: F, period: Duration) -> Result<Self, Error>
    where
        F: PathFormatter + 'static,
    {
        Ok(Self::from_parts(Box::new(formatter), PeriodClock::new(period)?))
    }

    pub(crate) fn from_parts(formatter: Box<dyn PathFormatter>, clock: PeriodClock) -> Self {
        Self {
            clock,
            formatter,
            stable_path: None,
            inner: Mutex::new(Inner::default()),
        }
    }

    /// Switch to stable-path mode: the externally visible file keeps this
    /// name forever; at each boundary its prior contents are moved into the
    /// time-stamped archive produced by the formatter.
    ///
    /// Strictly slower than per-period filenames (the copy runs inside the
    /// locked write) and loses the just-finished period if the process dies
    /// between the copy and the truncate.
    #[must_use]
    pub fn with_stable_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stable_path = Some(path.into());
        self
    }

    /// Append `buf` to the currently active file, rotating first if the
    /// active period has elapsed
    ///
    /// Returns the number of bytes accepted. A rotation failure aborts the
    /// pending write and leaves the previous handle in place, so the next
    /// call retries the rotation.
    pub fn write(&self, buf: &[u8]) -> Result<usize, Error> {
        self.write_at(buf, now_nanos())
    }

    fn write_at(&self, buf: &[u8], now: i64) -> Result<usize, Error> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Closed);
        }

        match &self.stable_path {
            None => self.rotate_per_period(&mut inner, now)?,
            Some(stable) => self.rotate_archiving(&mut inner, now, stable)?,
        }

        let path = match &self.stable_path {
            Some(stable) => stable.clone(),
            None => inner.current_path.clone(),
        };
        let handle = inner.handle.as_mut().ok_or(Error::Closed)?;
        handle
            .write(buf)
            .map_err(|source| Error::Write { path, source })
    }

    /// Flush the active handle, if any
    pub fn flush(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Err(Error::Closed);
        }
        let path = match &self.stable_path {
            Some(stable) => stable.clone(),
            None => inner.current_path.clone(),
        };
        if let Some(handle) = inner.handle.as_mut() {
            handle
                .flush()
                .map_err(|source| Error::Write { path, source })?;
        }
        Ok(())
    }

    /// Flush and release the active handle
    ///
    /// Idempotent: closing an already-closed writer is a no-op returning
    /// `Ok`. Subsequent writes fail with [`Error::Closed`] and never reopen.
    pub fn close(&self) -> Result<(), Error> {
        let mut inner = self.inner.lock();
        if inner.closed {
            return Ok(());
        }
        inner.closed = true;
        if let Some(handle) = inner.handle.take() {
            handle.sync_all().map_err(|source| Error::Close {
                path: inner.current_path.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// Overtime test against the stored boundary, not strict inequality
    /// against "now": tolerates writes arriving after the exact boundary.
    fn is_overtime(&self, inner: &Inner, current: i64) -> bool {
        current - inner.period_start >= self.clock.period_nanos()
    }

    /// Per-period filename mode: open the file named from the new boundary
    /// and swap it in
    fn rotate_per_period(&self, inner: &mut Inner, now: i64) -> Result<(), Error> {
        let current = self.clock.period_start(now);
        if !self.is_overtime(inner, current) && inner.handle.is_some() {
            return Ok(());
        }

        let path = self.formatter.format_path(current);
        if inner.handle.is_some() && path == inner.current_path {
            // Pattern granularity is coarser than the period: same target
            // file, keep the handle. The overtime test re-fires on the next
            // write and re-formats.
            return Ok(());
        }

        self.ensure_parent_dir(inner, &path);
        let file = File::options()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| Error::Open {
                path: path.clone(),
                source,
            })?;

        // The new handle is already good; a failure flushing the old one
        // must not fail this write.
        if let Some(old) = inner.handle.take() {
            if let Err(e) = old.sync_all() {
                tracing::warn!(
                    path = %inner.current_path.display(),
                    error = %e,
                    "failed to flush previous file during rotation"
                );
            }
        }

        tracing::debug!(
            old = %inner.current_path.display(),
            new = %path.display(),
            period_start = current,
            "rotated output file"
        );

        inner.handle = Some(file);
        inner.current_path = path;
        inner.period_start = current;
        Ok(())
    }

    /// Stable-path mode: archive the just-finished period into the file
    /// named from the *previous* boundary, then reset the live file
    fn rotate_archiving(&self, inner: &mut Inner, now: i64, stable: &Path) -> Result<(), Error> {
        let current = self.clock.period_start(now);
        if !self.is_overtime(inner, current) && inner.handle.is_some() {
            return Ok(());
        }

        let archive_path = self
            .formatter
            .format_path(self.clock.previous_period_start(now));
        self.ensure_parent_dir(inner, &archive_path);
        let mut archive = File::options()
            .create(true)
            .append(true)
            .open(&archive_path)
            .map_err(|source| Error::Open {
                path: archive_path.clone(),
                source,
            })?;

        match inner.handle.as_mut() {
            Some(live) => {
                // Copy the full contents of the live file into the archive,
                // then truncate it in place. The live handle stays open until
                // the replacement open below succeeds, so a failed rotation
                // never leaves the writer without a usable handle.
                live.seek(SeekFrom::Start(0))
                    .and_then(|_| io::copy(live, &mut archive))
                    .map_err(|source| Error::Archive {
                        path: archive_path.clone(),
                        source,
                    })?;
                live.set_len(0).map_err(|source| Error::Truncate {
                    path: stable.to_path_buf(),
                    source,
                })?;
            }
            None => {
                // First write: nothing to archive, start from an empty file.
                File::options()
                    .create(true)
                    .write(true)
                    .truncate(true)
                    .open(stable)
                    .map_err(|source| Error::Truncate {
                        path: stable.to_path_buf(),
                        source,
                    })?;
            }
        }

        if let Err(e) = archive.sync_all() {
            tracing::warn!(
                path = %archive_path.display(),
                error = %e,
                "failed to flush archive file"
            );
        }
        drop(archive);

        let reopened = File::options()
            .create(true)
            .read(true)
            .append(true)
            .open(stable)
            .map_err(|source| Error::Open {
                path: stable.to_path_buf(),
                source,
            })?;

        if let Some(old) = inner.handle.take() {
            if let Err(e) = old.sync_all() {
                tracing::warn!(
                    path = %stable.display(),
                    error = %e,
                    "failed to flush stable file during rotation"
                );
            }
        }

        tracing::debug!(
            stable = %stable.display(),
            archive = %archive_path.display(),
            period_start = current,
            "archived and reset stable file"
        );

        inner.handle = Some(reopened);
        inner.current_path = archive_path;
        inner.period_start = current;
        Ok(())
    }

    /// Best-effort recursive directory creation, gated on the cached
    /// directory so unchanged targets skip the syscall
    ///
    /// Failures are logged, not returned: the subsequent open reports the
    /// real problem if the directory is genuinely missing.
    fn ensure_parent_dir(&self, inner: &mut Inner, path: &Path) {
        let dir = match path.parent() {
            Some(d) if !d.as_os_str().is_empty() => d.to_path_buf(),
            _ => return,
        };
        if dir == inner.current_dir {
            return;
        }
        if let Err(e) = fs::create_dir_all(&dir) {
            tracing::warn!(
                dir = %dir.display(),
                error = %e,
                "failed to create output directory"
            );
        }
        inner.current_dir = dir;
    }
}

impl fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RotatingWriter")
            .field("clock", &self.clock)
            .field("stable_path", &self.stable_path)
            .finish_non_exhaustive()
    }
}

impl io::Write for RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::flush(self).map_err(io::Error::from)
    }
}

impl io::Write for &RotatingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(*self, buf).map_err(io::Error::from)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::flush(*self).map_err(io::Error::from)
    }
}
