use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use chrono::NaiveDate;

use crate::contracts::symbols::ContractId;
use crate::schema::PricePanel;

/// Read-only per-contract daily price lookup, built once per curve request
/// and shared by every date in the pass.
///
/// Construction normalizes timestamps to calendar dates and collapses
/// same-day duplicates to the last observation per `(date, contract)`; rows
/// with a missing price never displace an observed one. With forward-fill
/// enabled, each contract carries its last known price forward, but only
/// across the union of dates carrying at least one observed price, so a
/// date with no usable observations at all stays unresolvable.
#[derive(Debug, Clone)]
pub struct PriceMap {
    by_contract: AHashMap<ContractId, BTreeMap<NaiveDate, f64>>,
}

impl PriceMap {
    pub fn build(panel: &PricePanel, forward_fill: bool) -> Self {
        let mut observed_dates: BTreeSet<NaiveDate> = BTreeSet::new();
        let mut by_contract: AHashMap<ContractId, BTreeMap<NaiveDate, f64>> = AHashMap::new();

        for row in panel.iter() {
            let date = row.ts.date();
            if let Some(px) = row.price {
                observed_dates.insert(date);
                // Later rows win within a day; panel order is observation order.
                by_contract
                    .entry(row.contract.clone())
                    .or_default()
                    .insert(date, px);
            }
        }

        if forward_fill {
            for series in by_contract.values_mut() {
                let mut last: Option<f64> = None;
                for &d in &observed_dates {
                    match series.get(&d) {
                        Some(&px) => last = Some(px),
                        None => {
                            if let Some(px) = last {
                                series.insert(d, px);
                            }
                        }
                    }
                }
            }
        }

        Self { by_contract }
    }

    /// Price of `contract` on `date`; NaN when unresolvable.
    #[inline]
    pub fn lookup(&self, date: NaiveDate, contract: &ContractId) -> f64 {
        self.by_contract
            .get(contract)
            .and_then(|series| series.get(&date))
            .copied()
            .unwrap_or(f64::NAN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{PanelRow, PricePanel};
    use chrono::NaiveDateTime;

    fn ts(s: &str) -> NaiveDateTime {
        format!("{s}T00:00:00").parse().unwrap()
    }

    fn row(t: &str, c: &str, px: Option<f64>) -> PanelRow {
        PanelRow { ts: ts(t), contract: c.into(), price: px, volume: None }
    }

    #[test]
    fn last_observation_wins_within_a_day() {
        let panel = PricePanel::from_rows(vec![
            row("2024-01-02", "C1", Some(100.0)),
            row("2024-01-02", "C1", Some(101.0)),
        ]);
        let map = PriceMap::build(&panel, false);
        assert_eq!(map.lookup("2024-01-02".parse().unwrap(), &"C1".into()), 101.0);
    }

    #[test]
    fn missing_price_does_not_displace_observed_one() {
        let panel = PricePanel::from_rows(vec![
            row("2024-01-02", "C1", Some(100.0)),
            row("2024-01-02", "C1", None),
        ]);
        let map = PriceMap::build(&panel, false);
        assert_eq!(map.lookup("2024-01-02".parse().unwrap(), &"C1".into()), 100.0);
    }

    #[test]
    fn forward_fill_covers_gaps_on_observed_dates_only() {
        let panel = PricePanel::from_rows(vec![
            row("2024-01-02", "C1", Some(100.0)),
            row("2024-01-03", "C2", Some(50.0)), // C1 absent, date observed via C2
            row("2024-01-05", "C1", Some(102.0)),
        ]);
        let map = PriceMap::build(&panel, true);
        // Gap on an observed date fills forward.
        assert_eq!(map.lookup("2024-01-03".parse().unwrap(), &"C1".into()), 100.0);
        // 2024-01-04 was never observed by any contract: stays NaN.
        assert!(map.lookup("2024-01-04".parse().unwrap(), &"C1".into()).is_nan());
        assert_eq!(map.lookup("2024-01-05".parse().unwrap(), &"C1".into()), 102.0);
    }

    #[test]
    fn without_forward_fill_gaps_stay_missing() {
        let panel = PricePanel::from_rows(vec![
            row("2024-01-02", "C1", Some(100.0)),
            row("2024-01-03", "C2", Some(50.0)),
        ]);
        let map = PriceMap::build(&panel, false);
        assert!(map.lookup("2024-01-03".parse().unwrap(), &"C1".into()).is_nan());
    }

    #[test]
    fn no_backfill_before_first_observation() {
        let panel = PricePanel::from_rows(vec![
            row("2024-01-02", "C2", Some(50.0)),
            row("2024-01-03", "C1", Some(100.0)),
        ]);
        let map = PriceMap::build(&panel, true);
        assert!(map.lookup("2024-01-02".parse().unwrap(), &"C1".into()).is_nan());
    }
}
