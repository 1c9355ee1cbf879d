//! Table validation: the typed boundary between raw vendor tables and the
//! core. Fails fast on structural problems (missing columns, unparsable
//! required temporals); coerces everything else, mapping unusable numerics
//! to "missing" rather than rejecting the row.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use thiserror::Error;

use crate::contracts::meta::{ContractMeta, MetaTable};
use crate::contracts::symbols::ContractId;
use crate::schema::tables::{PanelRow, PricePanel, RawTable};

pub const META_REQUIRED_COLUMNS: [&str; 2] = ["contract", "expiry"];
pub const PANEL_REQUIRED_COLUMNS: [&str; 3] = ["ts", "contract", "price"];

const META_OPTIONAL_DATE_COLUMNS: [&str; 3] =
    ["last_trade_date", "first_notice_date", "first_trade_date"];

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("{table} missing required columns: {columns:?}")]
    MissingColumns { table: &'static str, columns: Vec<String> },
    #[error("{table}.{column} contains invalid temporal value {value:?} (row {row})")]
    InvalidTemporal {
        table: &'static str,
        column: String,
        value: String,
        row: usize,
    },
}

fn missing_columns(table: &RawTable, required: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|c| table.column_index(c).is_none())
        .map(|c| c.to_string())
        .collect();
    missing.sort();
    missing
}

/// Parse a datetime cell. Accepts dates, naive datetimes (`T` or space
/// separated, with optional fractional seconds) and RFC 3339 timestamps
/// (offset discarded).
fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in ["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[inline]
fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_datetime(s).map(|dt| dt.date())
}

/// Numeric coercion: empty, unparsable, or literal-NaN cells become `None`.
#[inline]
fn parse_numeric(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Validate a raw contract-metadata table.
///
/// Requires `contract` and `expiry`; coerces the optional date columns when
/// present (empty cell → absent, non-empty garbage → hard failure).
pub fn validate_meta(raw: &RawTable) -> Result<MetaTable, SchemaError> {
    let missing = missing_columns(raw, &META_REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { table: "meta", columns: missing });
    }
    // Column lookups cannot fail past the missing-column check.
    let contract_col = raw.column_index("contract").unwrap_or_default();
    let expiry_col = raw.column_index("expiry").unwrap_or_default();
    let optional_cols: Vec<(usize, &str)> = META_OPTIONAL_DATE_COLUMNS
        .iter()
        .filter_map(|name| raw.column_index(name).map(|i| (i, *name)))
        .collect();

    let mut rows = Vec::with_capacity(raw.n_rows());
    for r in 0..raw.n_rows() {
        let expiry_cell = raw.cell(r, expiry_col);
        let expiry = parse_date(expiry_cell).ok_or_else(|| SchemaError::InvalidTemporal {
            table: "meta",
            column: "expiry".to_string(),
            value: expiry_cell.to_string(),
            row: r,
        })?;
        let mut meta = ContractMeta::new(ContractId::new(raw.cell(r, contract_col)), expiry);
        for &(col, name) in &optional_cols {
            let cell = raw.cell(r, col);
            if cell.is_empty() {
                continue;
            }
            let d = parse_date(cell).ok_or_else(|| SchemaError::InvalidTemporal {
                table: "meta",
                column: name.to_string(),
                value: cell.to_string(),
                row: r,
            })?;
            match name {
                "last_trade_date" => meta.last_trade_date = Some(d),
                "first_notice_date" => meta.first_notice_date = Some(d),
                _ => meta.first_trade_date = Some(d),
            }
        }
        rows.push(meta);
    }
    Ok(MetaTable::from_rows(rows))
}

/// Validate a raw price-panel table.
///
/// Requires `ts`, `contract`, `price`. Unparsable `ts` fails the table;
/// unparsable `price`/`volume` become missing values.
pub fn validate_panel(raw: &RawTable) -> Result<PricePanel, SchemaError> {
    let missing = missing_columns(raw, &PANEL_REQUIRED_COLUMNS);
    if !missing.is_empty() {
        return Err(SchemaError::MissingColumns { table: "panel", columns: missing });
    }
    let ts_col = raw.column_index("ts").unwrap_or_default();
    let contract_col = raw.column_index("contract").unwrap_or_default();
    let price_col = raw.column_index("price").unwrap_or_default();
    let volume_col = raw.column_index("volume");

    let mut rows = Vec::with_capacity(raw.n_rows());
    for r in 0..raw.n_rows() {
        let ts_cell = raw.cell(r, ts_col);
        let ts = parse_datetime(ts_cell).ok_or_else(|| SchemaError::InvalidTemporal {
            table: "panel",
            column: "ts".to_string(),
            value: ts_cell.to_string(),
            row: r,
        })?;
        rows.push(PanelRow {
            ts,
            contract: ContractId::new(raw.cell(r, contract_col)),
            price: parse_numeric(raw.cell(r, price_col)),
            volume: volume_col.map(|c| parse_numeric(raw.cell(r, c))).unwrap_or(None),
        });
    }
    Ok(PricePanel::from_rows(rows))
}
