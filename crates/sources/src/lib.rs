//! Data-source collaborators for the curve core.
//!
//! A source's whole job is to produce the two validated input tables
//! (contract metadata and the price panel), leaving every curve decision to
//! `curve_lib`. Vendor-specific symbol parsing and expiry inference live
//! here, not in the core.

pub mod csv_source;
pub mod symbology;

use curve_lib::{MetaTable, PricePanel};

pub use csv_source::CsvSource;

/// A collaborator that can load the two core input tables.
///
/// Implementations must return tables conforming to the schema-validator
/// contract (required columns present, temporals parsed). Use
/// `anyhow::Result` to surface vendor/IO failures.
pub trait CurveDataSource {
    fn load_meta(&self) -> anyhow::Result<MetaTable>;
    fn load_panel(&self) -> anyhow::Result<PricePanel>;
}
