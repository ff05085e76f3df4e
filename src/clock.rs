//! Time source
//!
//! Transactions are timestamped and the month rollover only runs for the
//! current month, so ledger code asks a `Clock` instead of reading the system
//! time directly.

use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::models::MonthKey;

/// Source of "now" for the ledger
pub trait Clock {
    /// Current local date and time
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }

    fn current_month(&self) -> MonthKey {
        MonthKey::from_date(self.today())
    }
}

/// Real-time clock backed by the local system time
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl FixedClock {
    /// Noon on the given day
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock_month() {
        let clock = FixedClock::on(2024, 5, 17).unwrap();
        assert_eq!(clock.current_month().to_string(), "2024-05");
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
    }

    #[test]
    fn test_fixed_clock_rejects_bad_date() {
        assert!(FixedClock::on(2024, 2, 30).is_none());
    }

    #[test]
    fn test_system_clock_matches_month_key() {
        let clock = SystemClock;
        assert_eq!(clock.current_month(), MonthKey::from_date(clock.today()));
    }
}
