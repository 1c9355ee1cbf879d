mod engine;
mod price_map;

pub use engine::{
    build_strip_curve, normalize_weights, CurveError, CurveOptions, CurvePrices, Holdings,
};
pub use price_map::PriceMap;
