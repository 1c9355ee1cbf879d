use ahash::AHashMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contracts::symbols::ContractId;

/// Static contract facts (no runtime state).
///
/// `expiry` is always present; the optional dates refine roll timing when a
/// vendor supplies them. When `last_trade_date` is present it is the
/// authoritative expiry-adjacent reference instead of `expiry`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMeta {
    pub contract: ContractId,
    pub expiry: NaiveDate,
    pub last_trade_date: Option<NaiveDate>,
    pub first_notice_date: Option<NaiveDate>,
    pub first_trade_date: Option<NaiveDate>,
}

impl ContractMeta {
    pub fn new(contract: impl Into<ContractId>, expiry: NaiveDate) -> Self {
        Self {
            contract: contract.into(),
            expiry,
            last_trade_date: None,
            first_notice_date: None,
            first_trade_date: None,
        }
    }

    pub fn with_last_trade_date(mut self, d: NaiveDate) -> Self {
        self.last_trade_date = Some(d);
        self
    }

    /// The date roll timing is anchored to: `last_trade_date` when known,
    /// otherwise `expiry`.
    #[inline]
    pub fn roll_reference(&self) -> NaiveDate {
        self.last_trade_date.unwrap_or(self.expiry)
    }
}

/// In-memory catalog of contract metadata, keyed by [`ContractId`].
///
/// Rows keep their insertion order; the index resolves a contract to its
/// first occurrence when the same key appears twice. Built once by the
/// schema validator (or a source adapter) and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct MetaTable {
    rows: Vec<ContractMeta>,
    index: AHashMap<ContractId, usize>,
}

impl MetaTable {
    pub fn from_rows(rows: Vec<ContractMeta>) -> Self {
        let mut index = AHashMap::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            index.entry(row.contract.clone()).or_insert(i);
        }
        Self { rows, index }
    }

    /// Look up a contract's row. Returns `None` if the contract is unknown.
    #[inline]
    pub fn get(&self, contract: &ContractId) -> Option<&ContractMeta> {
        self.index.get(contract).map(|&i| &self.rows[i])
    }

    #[inline]
    pub fn contains(&self, contract: &ContractId) -> bool {
        self.index.contains_key(contract)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContractMeta> {
        self.rows.iter()
    }

    /// Rows ordered by ascending expiry. Stable for equal expiries.
    pub fn sorted_by_expiry(&self) -> Vec<&ContractMeta> {
        let mut out: Vec<&ContractMeta> = self.rows.iter().collect();
        out.sort_by_key(|m| m.expiry);
        out
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
