//! Shared fixtures for unit tests.

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use std::sync::Mutex;

/// Clock frozen at a chosen instant that tests can move forward.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Midday on 2024-03-01 UTC.
    pub fn default_instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant")
    }

    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock().expect("clock lock");
        *now += delta;
    }
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::at(Self::default_instant())
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}
