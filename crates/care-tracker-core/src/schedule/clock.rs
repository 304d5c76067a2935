//! Injected time source.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, Utc};

/// Source of "now" and "today". Everything date-dependent goes through this.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The caller's local calendar date.
    fn today(&self) -> NaiveDate;

    /// The caller's local time of day.
    fn local_time(&self) -> NaiveTime;

    /// Weekday of [`Clock::today`], 0 = Sunday.
    fn today_weekday(&self) -> u8 {
        weekday_index(self.today())
    }
}

/// Weekday index of a date, 0 = Sunday through 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Wall clock using the host's local timezone for dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn local_time(&self) -> NaiveTime {
        Local::now().time()
    }
}

/// Manually driven clock. Local time is taken to be UTC.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn local_time(&self) -> NaiveTime {
        self.now().time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_weekday_index_sunday_is_zero() {
        // 2026-03-01 is a Sunday
        let sunday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(weekday_index(sunday), 0);
        assert_eq!(weekday_index(sunday + Duration::days(6)), 6);
    }

    #[test]
    fn test_fixed_clock_crosses_midnight() {
        let clock = FixedClock::new(Utc.with_ymd_and_hms(2026, 3, 3, 23, 59, 0).unwrap());
        assert_eq!(clock.today_weekday(), 2);

        clock.advance(Duration::minutes(2));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(clock.today_weekday(), 3);
        assert_eq!(clock.local_time(), NaiveTime::from_hms_opt(0, 1, 0).unwrap());
    }
}
