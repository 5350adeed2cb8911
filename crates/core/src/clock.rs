//! Injectable time provider.
//!
//! Core logic never calls the system clock directly; every timestamp comes
//! through this trait so date-boundary behavior stays deterministic in tests.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Returns the current calendar date in UTC.
    fn today(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }
}

/// Production clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Test clock pinned to a fixed instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to midnight UTC on the given date.
    ///
    /// # Panics
    ///
    /// Panics if the date has no midnight (never happens for valid dates).
    #[must_use]
    pub fn at_midnight(date: NaiveDate) -> Self {
        Self(date.and_hms_opt(0, 0, 0).expect("midnight exists").and_utc())
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.0
    }
}
