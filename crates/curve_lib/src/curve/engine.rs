//! Strip-curve construction: blends per-contract prices into per-position
//! synthetic prices and records the fractional contract ownership behind
//! every curve point.
//!
//! One pass over the universe dates. Each date is independent of every
//! other date's output (only the read-only [`PriceMap`] and static
//! metadata are consulted), so the loop could be partitioned across
//! workers without changing results.

use std::collections::BTreeMap;

use ahash::AHashMap;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::debug;

use crate::contracts::meta::MetaTable;
use crate::contracts::symbols::ContractId;
use crate::curve::price_map::PriceMap;
use crate::roll::{RollError, RollPolicy};
use crate::schema::PricePanel;
use crate::universe::Universe;

#[derive(Debug, Error)]
pub enum CurveError {
    #[error("n_positions must be >= 1")]
    NoPositions,
    #[error(transparent)]
    Roll(#[from] RollError),
}

/// Knobs for a curve build.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveOptions {
    /// Carry each contract's last known price forward across gaps.
    pub forward_fill: bool,
    /// Legs with |weight| at or below this are dropped from holdings.
    pub drop_weight_tol: f64,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self { forward_fill: true, drop_weight_tol: 1e-10 }
    }
}

/// Per-date, per-position synthetic prices. NaN marks an unresolvable point
/// (empty slot, or no price on either leg).
#[derive(Debug, Clone, Default)]
pub struct CurvePrices {
    inner: BTreeMap<NaiveDate, Vec<f64>>,
}

impl CurvePrices {
    /// Price at `position` (1-based) on `date`. `None` when the date or
    /// position was never computed; NaN when computed but unresolvable.
    pub fn price(&self, date: NaiveDate, position: usize) -> Option<f64> {
        if position == 0 {
            return None;
        }
        self.inner.get(&date)?.get(position - 1).copied()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.inner.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Fractional contract ownership behind every curve point:
/// `date -> position -> contract -> weight`.
///
/// Two active legs sum to 1 (minus drop-tolerance sparsification), a single
/// leg carries weight 1, an empty slot has an empty map.
#[derive(Debug, Clone, Default)]
pub struct Holdings {
    inner: BTreeMap<NaiveDate, Vec<AHashMap<ContractId, f64>>>,
}

impl Holdings {
    /// Weight map at `position` (1-based) on `date`; `None` when the date
    /// or position was never computed (caller misuse, not data absence).
    pub fn weights(&self, date: NaiveDate, position: usize) -> Option<&AHashMap<ContractId, f64>> {
        if position == 0 {
            return None;
        }
        self.inner.get(&date)?.get(position - 1)
    }

    #[inline]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.inner.contains_key(&date)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.inner.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

/// Rescale a weight map by the sum of absolute weights. A zero sum yields
/// an empty map.
pub fn normalize_weights(weights: &AHashMap<ContractId, f64>) -> AHashMap<ContractId, f64> {
    let s: f64 = weights.values().map(|w| w.abs()).sum();
    if s == 0.0 {
        return AHashMap::new();
    }
    weights.iter().map(|(c, w)| (c.clone(), w / s)).collect()
}

/// Build per-position blended prices and holdings over `universe`'s dates.
///
/// Roll timing for *every* position on a date is driven by that date's
/// front contract (position 1), so the whole strip rolls in lockstep. An
/// empty front slot makes the day flat: every position gets an empty weight
/// map and a NaN price.
pub fn build_strip_curve(
    panel: &PricePanel,
    universe: &Universe,
    meta: &MetaTable,
    n_positions: usize,
    roll_policy: &dyn RollPolicy,
    options: &CurveOptions,
) -> Result<(CurvePrices, Holdings), CurveError> {
    if n_positions < 1 {
        return Err(CurveError::NoPositions);
    }
    let px_map = PriceMap::build(panel, options.forward_fill);
    let tol = options.drop_weight_tol;

    let mut prices = CurvePrices::default();
    let mut holdings = Holdings::default();

    for d in universe.dates() {
        let mut day_px = vec![f64::NAN; n_positions];
        let mut day_weights: Vec<AHashMap<ContractId, f64>> =
            vec![AHashMap::new(); n_positions];

        if let Some(front) = universe.contract_at(d, 1) {
            let roll_start = roll_policy.roll_start(d, front, meta, None)?;
            let roll_end = roll_policy.roll_end(d, front, meta)?;
            let w_next = roll_policy.weight_next(d, roll_start, roll_end);
            let w_cur = 1.0 - w_next;

            for p in 1..=n_positions {
                let Some(c) = universe.contract_at(d, p) else {
                    continue; // slot empty that day
                };

                if w_next <= tol {
                    day_weights[p - 1].insert(c.clone(), 1.0);
                    day_px[p - 1] = px_map.lookup(d, c);
                    continue;
                }

                let Some(c_next) = universe.contract_at(d, p + 1) else {
                    // No successor tracked at this depth: cannot blend past
                    // the last position.
                    day_weights[p - 1].insert(c.clone(), 1.0);
                    day_px[p - 1] = px_map.lookup(d, c);
                    continue;
                };

                let px_cur = px_map.lookup(d, c);
                let px_next = px_map.lookup(d, c_next);
                day_px[p - 1] = match (px_cur.is_nan(), px_next.is_nan()) {
                    (true, true) => f64::NAN,
                    (true, false) => px_next,
                    (false, true) => px_cur,
                    (false, false) => w_cur * px_cur + w_next * px_next,
                };

                if w_cur.abs() > tol {
                    day_weights[p - 1].insert(c.clone(), w_cur);
                }
                if w_next.abs() > tol {
                    day_weights[p - 1].insert(c_next.clone(), w_next);
                }
            }
        } else {
            // Flat day: every position stays empty/NaN.
            debug!(date = %d, "no front contract; flat day");
        }

        prices.inner.insert(d, day_px);
        holdings.inner.insert(d, day_weights);
    }

    Ok((prices, holdings))
}
