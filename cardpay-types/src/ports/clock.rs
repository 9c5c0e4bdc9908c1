//! Clock port.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current date and time.
///
/// The engine reads time through this port for expiry comparison and
/// transaction timestamping, so tests can pin the date.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current calendar date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
