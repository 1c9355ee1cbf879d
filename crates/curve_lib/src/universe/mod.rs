mod models;
mod rolling;

pub use models::{Universe, UniverseError};
pub use rolling::{
    build_rolling_universe, default_cutoff_date, EligibilityFn, RollingUniverseBuilder,
};
