use std::collections::BTreeMap;

use ahash::AHashSet;
use chrono::NaiveDate;
use thiserror::Error;

use crate::contracts::symbols::ContractId;

#[derive(Debug, Error)]
pub enum UniverseError {
    #[error("n_positions must be >= 1")]
    NoPositions,
}

/// Per-date constant-position membership: for every date in the build range,
/// a fixed-width array of slots holding the contracts at ranks `1..=N`.
///
/// Slots are filled left-to-right; a `None` at position `i` implies every
/// position past `i` is `None` too (fewer than N eligible contracts that
/// day). Built once per request, read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    n_positions: usize,
    slots: BTreeMap<NaiveDate, Vec<Option<ContractId>>>,
}

impl Universe {
    /// Empty universe of width `n_positions`. Usually produced by
    /// [`RollingUniverseBuilder`](crate::universe::RollingUniverseBuilder),
    /// but callers with externally-defined membership can fill one directly.
    pub fn new(n_positions: usize) -> Self {
        Self { n_positions, slots: BTreeMap::new() }
    }

    /// Set the ranked slots for one date. Short vectors are padded with
    /// `None`; extra entries are dropped.
    pub fn insert_day(&mut self, date: NaiveDate, mut ranked: Vec<Option<ContractId>>) {
        ranked.resize(self.n_positions, None);
        self.slots.insert(date, ranked);
    }

    #[inline]
    pub fn n_positions(&self) -> usize {
        self.n_positions
    }

    /// Contract at `position` (1-based) on `date`. `None` when the date is
    /// outside the universe, the position is out of range, or the slot is
    /// empty that day.
    pub fn contract_at(&self, date: NaiveDate, position: usize) -> Option<&ContractId> {
        if position == 0 || position > self.n_positions {
            return None;
        }
        self.slots.get(&date)?.get(position - 1)?.as_ref()
    }

    /// Dates in the universe, ascending.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.slots.keys().copied()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Every contract that occupies a slot on any date, sorted and deduped.
    pub fn contracts_used(&self) -> Vec<ContractId> {
        let mut seen: AHashSet<&ContractId> = AHashSet::new();
        for ranked in self.slots.values() {
            for c in ranked.iter().flatten() {
                seen.insert(c);
            }
        }
        let mut out: Vec<ContractId> = seen.into_iter().cloned().collect();
        out.sort();
        out
    }
}
