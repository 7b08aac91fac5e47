//! Period boundary arithmetic
//!
//! Boundaries are anchored to local time, not epoch-UTC: the clock is shifted
//! into the local zone, snapped down to the most recent multiple of the
//! period, then shifted back. With a 24h period this yields "midnight local
//! time" alignment rather than "midnight UTC". The zone offset is captured
//! once at construction so no write pays a timezone lookup.

use std::time::Duration;

use chrono::Local;

use crate::error::Error;

pub(crate) const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Computes start-of-period timestamps for a fixed period length
///
/// Pure arithmetic over nanosecond timestamps; holds no handles and no
/// mutable state.
#[derive(Debug, Clone, Copy)]
pub struct PeriodClock {
    period_nanos: i64,
    utc_offset_nanos: i64,
}

impl PeriodClock {
    /// Create a clock aligned to the local timezone
    ///
    /// Fails if the period is zero or exceeds i64 nanoseconds.
    pub fn new(period: Duration) -> Result<Self, Error> {
        let offset = i64::from(Local::now().offset().local_minus_utc());
        Self::with_utc_offset(period, offset * NANOS_PER_SEC)
    }

    /// Create a clock with an explicit UTC offset in nanoseconds
    pub fn with_utc_offset(period: Duration, utc_offset_nanos: i64) -> Result<Self, Error> {
        let nanos = period.as_nanos();
        if nanos == 0 || nanos > i64::MAX as u128 {
            return Err(Error::InvalidPeriod);
        }
        Ok(Self {
            period_nanos: nanos as i64,
            utc_offset_nanos,
        })
    }

    /// Period length in nanoseconds
    pub fn period_nanos(&self) -> i64 {
        self.period_nanos
    }

    /// Start of the period containing `now` (nanoseconds since epoch)
    pub fn period_start(&self, now_nanos: i64) -> i64 {
        now_nanos - ((now_nanos + self.utc_offset_nanos) % self.period_nanos)
    }

    /// Start of the period immediately preceding `now`
    pub fn previous_period_start(&self, now_nanos: i64) -> i64 {
        self.period_start(now_nanos - self.period_nanos)
    }
}
