use chrono::{DateTime, Duration, NaiveDate, Utc};
use parking_lot::Mutex;

use crate::traits::Clock;

/// Manually driven clock for tests and simulations
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Clock pinned to noon UTC of `date`
    pub fn new(date: NaiveDate) -> Self {
        Self {
            now: Mutex::new(noon(date)),
        }
    }

    pub fn set_today(&self, date: NaiveDate) {
        *self.now.lock() = noon(date);
    }

    pub fn advance_days(&self, days: i64) {
        *self.now.lock() += Duration::days(days);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }
}

fn noon(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0).unwrap_or_default().and_utc()
}
