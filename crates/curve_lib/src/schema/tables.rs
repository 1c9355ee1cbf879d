use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::contracts::symbols::ContractId;

/// An untyped, column-labeled table as a source adapter hands it over:
/// header names plus string cells. The schema validator is the only
/// consumer; everything downstream works on typed tables.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Append a row of cells. Short rows are padded with empty cells so
    /// every row matches the header width; extra cells are dropped.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row: Vec<String> = cells.into_iter().map(Into::into).collect();
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    #[inline]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[inline]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Cell contents, trimmed. Empty string means "no value".
    #[inline]
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows[row][col].trim()
    }
}

/// One validated price observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelRow {
    pub ts: NaiveDateTime,
    pub contract: ContractId,
    /// `None` = the vendor row carried no usable price ("missing", not an error).
    pub price: Option<f64>,
    pub volume: Option<f64>,
}

/// Validated multiset of price observations. Multiple rows per
/// `(date, contract)` are allowed; the curve engine collapses them to the
/// most recent per day.
#[derive(Debug, Clone, Default)]
pub struct PricePanel {
    rows: Vec<PanelRow>,
}

impl PricePanel {
    pub fn from_rows(rows: Vec<PanelRow>) -> Self {
        Self { rows }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PanelRow> {
        self.rows.iter()
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
