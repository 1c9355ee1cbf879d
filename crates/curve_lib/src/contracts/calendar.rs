//! Date-level trading calendars and business-day offsets.
//!
//! Daily granularity only: a calendar decides which dates exist in a range,
//! not session opens/closes. Offsets reproduce the usual business-day
//! convention: subtracting `n >= 1` business days steps backwards over
//! weekends; subtracting `0` normalizes a weekend date forward onto the next
//! weekday.

use ahash::AHashSet;
use chrono::{Datelike, Duration, NaiveDate, Weekday};

#[inline]
pub fn is_weekday(d: NaiveDate) -> bool {
    !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// `date - n` business days (weekday-only, holidays ignored).
pub fn sub_weekdays(date: NaiveDate, n: u32) -> NaiveDate {
    let mut d = date;
    if n == 0 {
        while !is_weekday(d) {
            d += Duration::days(1);
        }
        return d;
    }
    for _ in 0..n {
        d -= Duration::days(1);
        while !is_weekday(d) {
            d -= Duration::days(1);
        }
    }
    d
}

/// `date + n` business days (weekday-only, holidays ignored).
pub fn add_weekdays(date: NaiveDate, n: u32) -> NaiveDate {
    let mut d = date;
    if n == 0 {
        while !is_weekday(d) {
            d += Duration::days(1);
        }
        return d;
    }
    for _ in 0..n {
        d += Duration::days(1);
        while !is_weekday(d) {
            d += Duration::days(1);
        }
    }
    d
}

/// Which dates a universe is built over.
///
/// `business()` is the default everywhere: Monday through Friday, with an
/// optional holiday list on top. `daily()` keeps every calendar day (useful
/// for venues without a weekend close).
#[derive(Debug, Clone)]
pub struct TradingCalendar {
    weekdays_only: bool,
    holidays: AHashSet<NaiveDate>,
}

impl TradingCalendar {
    pub fn business() -> Self {
        Self { weekdays_only: true, holidays: AHashSet::new() }
    }

    pub fn daily() -> Self {
        Self { weekdays_only: false, holidays: AHashSet::new() }
    }

    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(mut self, iter: I) -> Self {
        self.holidays.extend(iter);
        self
    }

    #[inline]
    pub fn is_trading_day(&self, d: NaiveDate) -> bool {
        if self.weekdays_only && !is_weekday(d) {
            return false;
        }
        !self.holidays.contains(&d)
    }

    /// All trading days in `[start, end]`, ascending. Empty when `start > end`.
    pub fn date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut out = Vec::new();
        let mut d = start;
        while d <= end {
            if self.is_trading_day(d) {
                out.push(d);
            }
            d += Duration::days(1);
        }
        out
    }
}

impl Default for TradingCalendar {
    fn default() -> Self {
        Self::business()
    }
}
