//! Roll policy: when a curve point starts blending out of the front
//! contract and how fast the weight moves to the successor.
//!
//! Modeled as a capability trait so engines can take any implementation:
//! the shipped expiry-anchored policy, or a custom one (tests inject fixed
//! windows through the same seam). All operations are pure; identical
//! inputs always produce identical outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contracts::calendar::sub_weekdays;
use crate::contracts::meta::MetaTable;
use crate::contracts::symbols::ContractId;
use crate::roll::weight::WeightCurve;

#[derive(Debug, Error)]
pub enum RollError {
    #[error("contract {0} not found in meta")]
    UnknownContract(ContractId),
}

/// The roll capability: window endpoints plus the blend weight inside them.
pub trait RollPolicy: Send + Sync {
    /// Last day of the roll window for `front`. Independent of `date`.
    fn roll_end(
        &self,
        date: NaiveDate,
        front: &ContractId,
        meta: &MetaTable,
    ) -> Result<NaiveDate, RollError>;

    /// First day of the roll window. `next` is only consulted in auto-gap
    /// mode; without it the window collapses to `roll_end` (no blending).
    fn roll_start(
        &self,
        date: NaiveDate,
        front: &ContractId,
        meta: &MetaTable,
        next: Option<&ContractId>,
    ) -> Result<NaiveDate, RollError>;

    /// Blend weight of the *successor* leg on `date`: 0 strictly before
    /// `roll_start`, 1 strictly after `roll_end`, non-decreasing inside.
    fn weight_next(&self, date: NaiveDate, roll_start: NaiveDate, roll_end: NaiveDate) -> f64;

    /// Blend weight of the expiring leg.
    fn weight_current(&self, date: NaiveDate, roll_start: NaiveDate, roll_end: NaiveDate) -> f64 {
        1.0 - self.weight_next(date, roll_start, roll_end)
    }
}

/// Expiry-anchored roll policy.
///
/// `roll_end` sits `roll_end_offset_bdays` business days before the front
/// contract's roll reference. The window length comes from one of two modes:
/// a fixed business-day window (`roll_window_bdays` set), or the
/// calendar-day gap between the front and successor roll references
/// (auto-gap). The unit asymmetry is deliberate: the calendar gap
/// approximates true expiry spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiryRollPolicy {
    pub roll_end_offset_bdays: u32,
    pub roll_window_bdays: Option<u32>,
    pub weight_curve: WeightCurve,
    pub logistic_k: f64,
}

impl Default for ExpiryRollPolicy {
    fn default() -> Self {
        Self {
            roll_end_offset_bdays: 0,
            roll_window_bdays: None,
            weight_curve: WeightCurve::Linear,
            logistic_k: 10.0,
        }
    }
}

impl ExpiryRollPolicy {
    fn reference(
        &self,
        contract: &ContractId,
        meta: &MetaTable,
    ) -> Result<NaiveDate, RollError> {
        meta.get(contract)
            .map(|row| row.roll_reference())
            .ok_or_else(|| RollError::UnknownContract(contract.clone()))
    }
}

impl RollPolicy for ExpiryRollPolicy {
    fn roll_end(
        &self,
        _date: NaiveDate,
        front: &ContractId,
        meta: &MetaTable,
    ) -> Result<NaiveDate, RollError> {
        Ok(sub_weekdays(self.reference(front, meta)?, self.roll_end_offset_bdays))
    }

    fn roll_start(
        &self,
        date: NaiveDate,
        front: &ContractId,
        meta: &MetaTable,
        next: Option<&ContractId>,
    ) -> Result<NaiveDate, RollError> {
        let end = self.roll_end(date, front, meta)?;
        if let Some(window) = self.roll_window_bdays {
            return Ok(sub_weekdays(end, window));
        }
        // Auto-gap: window = calendar-day gap between the two roll references.
        let Some(next) = next else {
            return Ok(end);
        };
        let gap = self.reference(next, meta)? - self.reference(front, meta)?;
        Ok(end - gap)
    }

    fn weight_next(&self, date: NaiveDate, roll_start: NaiveDate, roll_end: NaiveDate) -> f64 {
        if date < roll_start {
            return 0.0;
        }
        if date > roll_end {
            return 1.0;
        }
        let total = (roll_end - roll_start).num_days();
        if total <= 0 {
            // Degenerate window: the weight jumps immediately.
            return 1.0;
        }
        let elapsed = (date - roll_start).num_days();
        let u = (elapsed as f64 / total as f64).clamp(0.0, 1.0);
        self.weight_curve.apply(u, self.logistic_k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::meta::{ContractMeta, MetaTable};

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn meta() -> MetaTable {
        MetaTable::from_rows(vec![
            // 2024-03-18 / 2024-06-18 are Mondays/Tuesdays; both weekdays.
            ContractMeta::new("C1", d("2024-03-20")).with_last_trade_date(d("2024-03-18")),
            ContractMeta::new("C2", d("2024-06-20")).with_last_trade_date(d("2024-06-18")),
            ContractMeta::new("C3", d("2024-09-20")),
        ])
    }

    #[test]
    fn roll_end_offsets_from_last_trade_date() {
        let policy = ExpiryRollPolicy { roll_end_offset_bdays: 2, ..Default::default() };
        let end = policy
            .roll_end(d("2024-01-02"), &ContractId::from("C1"), &meta())
            .unwrap();
        assert_eq!(end, d("2024-03-14"));
    }

    #[test]
    fn roll_end_falls_back_to_expiry() {
        let policy = ExpiryRollPolicy::default();
        let end = policy
            .roll_end(d("2024-01-02"), &ContractId::from("C3"), &meta())
            .unwrap();
        assert_eq!(end, d("2024-09-20"));
    }

    #[test]
    fn fixed_window_uses_business_days() {
        let policy = ExpiryRollPolicy { roll_window_bdays: Some(5), ..Default::default() };
        let end = policy
            .roll_end(d("2024-01-02"), &ContractId::from("C1"), &meta())
            .unwrap();
        let start = policy
            .roll_start(d("2024-01-02"), &ContractId::from("C1"), &meta(), None)
            .unwrap();
        assert_eq!(end, d("2024-03-18"));
        assert_eq!(start, d("2024-03-11")); // 5 bdays back, over one weekend
    }

    #[test]
    fn auto_gap_uses_calendar_days() {
        let policy = ExpiryRollPolicy::default();
        let front = ContractId::from("C1");
        let next = ContractId::from("C2");
        let start = policy
            .roll_start(d("2024-01-02"), &front, &meta(), Some(&next))
            .unwrap();
        // Gap C2-C1 references: 2024-06-18 - 2024-03-18 = 92 calendar days.
        assert_eq!(start, d("2024-03-18") - chrono::Duration::days(92));
    }

    #[test]
    fn auto_gap_without_successor_collapses() {
        let policy = ExpiryRollPolicy::default();
        let front = ContractId::from("C1");
        let start = policy
            .roll_start(d("2024-01-02"), &front, &meta(), None)
            .unwrap();
        assert_eq!(start, d("2024-03-18"));
    }

    #[test]
    fn unknown_contract_is_an_error() {
        let policy = ExpiryRollPolicy::default();
        assert!(matches!(
            policy.roll_end(d("2024-01-02"), &ContractId::from("XX"), &meta()),
            Err(RollError::UnknownContract(_))
        ));
    }

    #[test]
    fn weight_clamps_outside_the_window() {
        let policy = ExpiryRollPolicy::default();
        let (rs, re) = (d("2024-01-01"), d("2024-01-11"));
        assert_eq!(policy.weight_next(d("2023-12-31"), rs, re), 0.0);
        assert_eq!(policy.weight_next(d("2024-01-12"), rs, re), 1.0);
        assert_eq!(policy.weight_next(rs, rs, re), 0.0);
        assert_eq!(policy.weight_next(re, rs, re), 1.0);
    }

    #[test]
    fn degenerate_window_jumps_to_one() {
        let policy = ExpiryRollPolicy::default();
        let day = d("2024-01-05");
        assert_eq!(policy.weight_next(day, day, day), 1.0);
    }

    #[test]
    fn weight_current_complements_weight_next() {
        let policy =
            ExpiryRollPolicy { weight_curve: WeightCurve::Smoothstep, ..Default::default() };
        let (rs, re) = (d("2024-01-01"), d("2024-01-11"));
        let day = d("2024-01-04");
        let sum = policy.weight_next(day, rs, re) + policy.weight_current(day, rs, re);
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
