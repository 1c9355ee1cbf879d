pub mod contracts;
pub mod schema;
pub mod universe;
pub mod roll;
pub mod curve;
pub mod portfolio;

// Re-export the handful of types almost every caller needs.
pub use contracts::calendar::TradingCalendar;
pub use contracts::meta::{ContractMeta, MetaTable};
pub use contracts::symbols::ContractId;
pub use curve::{build_strip_curve, CurveError, CurveOptions, CurvePrices, Holdings};
pub use portfolio::{position_to_contract_orders, position_to_orders, Order, PortfolioError};
pub use roll::{ExpiryRollPolicy, RollError, RollPolicy, WeightCurve};
pub use schema::{validate_meta, validate_panel, PricePanel, RawTable, SchemaError};
pub use universe::{RollingUniverseBuilder, Universe, UniverseError};
