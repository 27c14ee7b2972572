//! Source of "now" for timestamps and calendar-day checks.
//!
//! A calendar day ends at midnight in the UTC offset of the clock reading
//! used for the check. Entries logged under a different offset are converted
//! into that offset before their dates are compared.

use std::cell::Cell;

use chrono::{DateTime, FixedOffset, Local, TimeDelta};

pub type Timestamp = DateTime<FixedOffset>;

pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall clock in the machine's local time zone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().fixed_offset()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Cell<Timestamp>,
}

impl FixedClock {
    pub fn new(now: Timestamp) -> Self {
        FixedClock {
            now: Cell::new(now),
        }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, by: TimeDelta) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

#[cfg(test)]
pub(crate) fn at(rfc3339: &str) -> Timestamp {
    DateTime::parse_from_rfc3339(rfc3339).unwrap()
}
