mod tables;
mod validate;

pub use tables::{PanelRow, PricePanel, RawTable};
pub use validate::{
    validate_meta, validate_panel, SchemaError, META_REQUIRED_COLUMNS, PANEL_REQUIRED_COLUMNS,
};
