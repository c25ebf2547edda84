//! Clock abstraction for testable time-dependent logic

use chrono::{DateTime, Utc};
#[cfg(test)]
use std::sync::{Arc, Mutex};

/// Abstraction over wall-clock time so timestamp stamping is deterministic
/// under test
pub trait Clock: Send + Sync {
    /// Get the current wall-clock time (for `joined_at`/`called_at`/`served_at`)
    fn now(&self) -> DateTime<Utc>;
}

/// Production clock using actual system time
#[derive(Default, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually advanced clock for deterministic testing
#[cfg(test)]
#[derive(Clone)]
pub struct ManualClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

#[cfg(test)]
impl ManualClock {
    /// Create a manual clock starting at the given instant
    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(start)),
        }
    }

    /// Advance the clock by a number of seconds
    pub fn advance_secs(&self, secs: i64) {
        let mut current = self.current.lock().unwrap();
        *current += chrono::Duration::seconds(secs);
    }

    /// Set the clock to an absolute instant
    pub fn set(&self, instant: DateTime<Utc>) {
        let mut current = self.current.lock().unwrap();
        *current = instant;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock().unwrap()
    }
}
