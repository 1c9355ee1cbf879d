//! Ownership → notional translation. Derived on demand from a holdings
//! snapshot; nothing here is stored.

use ahash::AHashMap;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::contracts::symbols::ContractId;
use crate::curve::Holdings;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("date {0} not in holdings")]
    DateNotFound(NaiveDate),
    #[error("position {position} not in holdings[{date}]")]
    PositionNotFound { date: NaiveDate, position: usize },
}

/// A per-contract notional amount derived from one curve point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub contract: ContractId,
    pub notional: f64,
}

/// `weight * target_notional` for every contract backing `position` on
/// `date`. An absent date or position is caller misuse and fails; an empty
/// weight map (flat day) yields an empty result.
pub fn position_to_contract_orders(
    holdings: &Holdings,
    date: NaiveDate,
    position: usize,
    target_notional: f64,
) -> Result<AHashMap<ContractId, f64>, PortfolioError> {
    if !holdings.contains_date(date) {
        return Err(PortfolioError::DateNotFound(date));
    }
    let weights = holdings
        .weights(date, position)
        .ok_or(PortfolioError::PositionNotFound { date, position })?;
    Ok(weights
        .iter()
        .map(|(c, w)| (c.clone(), w * target_notional))
        .collect())
}

/// Same translation as [`position_to_contract_orders`], as [`Order`] values
/// sorted by contract for deterministic output.
pub fn position_to_orders(
    holdings: &Holdings,
    date: NaiveDate,
    position: usize,
    target_notional: f64,
) -> Result<Vec<Order>, PortfolioError> {
    let map = position_to_contract_orders(holdings, date, position, target_notional)?;
    let mut orders: Vec<Order> = map
        .into_iter()
        .map(|(contract, notional)| Order { contract, notional })
        .collect();
    orders.sort_by(|a, b| a.contract.cmp(&b.contract));
    Ok(orders)
}
