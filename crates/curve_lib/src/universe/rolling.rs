//! Rolling constant-position universe
//!
//! Ranks, for every date in a range, the currently eligible contracts by
//! ascending expiry and assigns them positions `1..=N`. It is purely
//! metadata-driven: each date is computed independently, so a contract's
//! rank changing day to day falls out of expiry ordering and eligibility
//! alone; there is no roll bookkeeping here.
//!
//! Wiring:
//!   let universe = RollingUniverseBuilder::new(3)
//!       .with_cutoff_offset(2)
//!       .with_calendar(TradingCalendar::business())
//!       .build(&meta, start, end)?;

use chrono::NaiveDate;

use crate::contracts::calendar::{sub_weekdays, TradingCalendar};
use crate::contracts::meta::{ContractMeta, MetaTable};
use crate::contracts::symbols::ContractId;
use crate::universe::models::{Universe, UniverseError};

/// Eligibility predicate: may `row` occupy a slot on date `d`?
pub type EligibilityFn = dyn Fn(&ContractMeta, NaiveDate) -> bool + Send + Sync;

/// Latest date a contract may still be selected: its roll reference
/// (`last_trade_date` or `expiry`) minus `offset_bdays` business days.
#[inline]
pub fn default_cutoff_date(row: &ContractMeta, offset_bdays: u32) -> NaiveDate {
    sub_weekdays(row.roll_reference(), offset_bdays)
}

#[inline]
fn default_eligibility(row: &ContractMeta, d: NaiveDate, offset_bdays: u32) -> bool {
    row.expiry >= d && d <= default_cutoff_date(row, offset_bdays)
}

/// Builder for a rolling universe (metadata-driven).
pub struct RollingUniverseBuilder {
    n_positions: usize,
    calendar: TradingCalendar,
    cutoff_offset_bdays: u32,
    eligibility: Option<Box<EligibilityFn>>,
}

impl RollingUniverseBuilder {
    pub fn new(n_positions: usize) -> Self {
        Self {
            n_positions,
            calendar: TradingCalendar::business(),
            cutoff_offset_bdays: 2,
            eligibility: None,
        }
    }

    /// Override the date calendar (default: business days).
    pub fn with_calendar(mut self, calendar: TradingCalendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Override the cutoff offset used by the default eligibility (default: 2).
    pub fn with_cutoff_offset(mut self, offset_bdays: u32) -> Self {
        self.cutoff_offset_bdays = offset_bdays;
        self
    }

    /// Substitute a custom eligibility predicate of the same signature.
    pub fn with_eligibility<F>(mut self, f: F) -> Self
    where
        F: Fn(&ContractMeta, NaiveDate) -> bool + Send + Sync + 'static,
    {
        self.eligibility = Some(Box::new(f));
        self
    }

    /// Rank eligible contracts for every date in `[start, end]`.
    ///
    /// Each date scans the expiry-sorted contract list independently and
    /// takes the first `n_positions` contracts the predicate admits, in scan
    /// order. `O(|dates| * |contracts|)`; contract counts are small (tens)
    /// relative to years of business days.
    pub fn build(
        &self,
        meta: &MetaTable,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Universe, UniverseError> {
        if self.n_positions < 1 {
            return Err(UniverseError::NoPositions);
        }
        let sorted = meta.sorted_by_expiry();
        let offset = self.cutoff_offset_bdays;
        let eligible = |row: &ContractMeta, d: NaiveDate| match &self.eligibility {
            Some(f) => f(row, d),
            None => default_eligibility(row, d, offset),
        };

        let mut universe = Universe::new(self.n_positions);
        for d in self.calendar.date_range(start, end) {
            let ranked: Vec<Option<ContractId>> = sorted
                .iter()
                .filter(|row| eligible(row, d))
                .take(self.n_positions)
                .map(|row| Some(row.contract.clone()))
                .collect();
            universe.insert_day(d, ranked);
        }
        Ok(universe)
    }
}

/// Convenience wrapper with all defaults (business days, cutoff offset 2).
pub fn build_rolling_universe(
    meta: &MetaTable,
    start: NaiveDate,
    end: NaiveDate,
    n_positions: usize,
) -> Result<Universe, UniverseError> {
    RollingUniverseBuilder::new(n_positions).build(meta, start, end)
}
