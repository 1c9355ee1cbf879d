use std::path::{Path, PathBuf};

use anyhow::Context;
use curve_lib::schema::{validate_meta, validate_panel, RawTable};
use curve_lib::{MetaTable, PricePanel};
use tracing::debug;

use crate::CurveDataSource;

/// File-backed source: one CSV for contract metadata, one for the price
/// panel. Rows are handed to the schema validator untyped; short rows are
/// padded so ragged files do not shift columns.
pub struct CsvSource {
    meta_path: PathBuf,
    panel_path: PathBuf,
}

impl CsvSource {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(meta_path: P, panel_path: Q) -> Self {
        Self {
            meta_path: meta_path.as_ref().to_path_buf(),
            panel_path: panel_path.as_ref().to_path_buf(),
        }
    }
}

fn read_raw_table(path: &Path) -> anyhow::Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("read headers from {}", path.display()))?
        .clone();
    let mut table = RawTable::new(headers.iter());

    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("read row {} of {}", i + 1, path.display()))?;
        table.push_row(record.iter());
    }
    debug!(path = %path.display(), rows = table.n_rows(), "loaded csv table");
    Ok(table)
}

impl CurveDataSource for CsvSource {
    fn load_meta(&self) -> anyhow::Result<MetaTable> {
        let raw = read_raw_table(&self.meta_path)?;
        validate_meta(&raw).with_context(|| format!("validate {}", self.meta_path.display()))
    }

    fn load_panel(&self) -> anyhow::Result<PricePanel> {
        let raw = read_raw_table(&self.panel_path)?;
        validate_panel(&raw).with_context(|| format!("validate {}", self.panel_path.display()))
    }
}
