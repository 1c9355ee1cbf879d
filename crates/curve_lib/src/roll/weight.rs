use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Shape of the blend-weight ramp across a roll window.
///
/// Parsed from configuration via `FromStr` ("linear" | "smoothstep" |
/// "logistic"); an unknown family is a `strum::ParseError` at config time,
/// so call sites never see an unsupported value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WeightCurve {
    #[default]
    Linear,
    /// `3u^2 - 2u^3`: zero slope at both endpoints.
    Smoothstep,
    /// Sigmoid `1/(1+e^(-k(u-1/2)))`, affinely rescaled by its own values at
    /// `u = 0` and `u = 1` so the curve hits exactly 0 and 1 at the window
    /// edges.
    Logistic,
}

impl WeightCurve {
    /// Map normalized window progress `u` in `[0, 1]` to a blend weight in
    /// `[0, 1]`. `logistic_k` only affects the logistic family.
    pub fn apply(&self, u: f64, logistic_k: f64) -> f64 {
        match self {
            WeightCurve::Linear => u,
            WeightCurve::Smoothstep => 3.0 * u * u - 2.0 * u * u * u,
            WeightCurve::Logistic => {
                let sigma = |x: f64| 1.0 / (1.0 + (-x).exp());
                let v = sigma(logistic_k * (u - 0.5));
                let v0 = sigma(logistic_k * -0.5);
                let v1 = sigma(logistic_k * 0.5);
                ((v - v0) / (v1 - v0)).clamp(0.0, 1.0)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;

    #[test]
    fn families_hit_exact_endpoints() {
        for curve in [WeightCurve::Linear, WeightCurve::Smoothstep, WeightCurve::Logistic] {
            assert_eq!(curve.apply(0.0, 10.0), 0.0, "{curve} at u=0");
            assert_eq!(curve.apply(1.0, 10.0), 1.0, "{curve} at u=1");
        }
    }

    #[test]
    fn smoothstep_midpoint_is_half() {
        assert_relative_eq!(WeightCurve::Smoothstep.apply(0.5, 10.0), 0.5);
    }

    #[test]
    fn logistic_midpoint_is_half() {
        // Rescaling is symmetric around u = 0.5 for any k.
        assert_relative_eq!(WeightCurve::Logistic.apply(0.5, 10.0), 0.5, epsilon = 1e-12);
        assert_relative_eq!(WeightCurve::Logistic.apply(0.5, 3.0), 0.5, epsilon = 1e-12);
    }

    #[test]
    fn families_are_monotone_non_decreasing() {
        for curve in [WeightCurve::Linear, WeightCurve::Smoothstep, WeightCurve::Logistic] {
            let mut prev = 0.0;
            for i in 0..=100 {
                let w = curve.apply(i as f64 / 100.0, 10.0);
                assert!(w >= prev, "{curve} decreased at u={}", i as f64 / 100.0);
                prev = w;
            }
        }
    }

    #[test]
    fn parses_from_config_strings() {
        assert_eq!(WeightCurve::from_str("linear").unwrap(), WeightCurve::Linear);
        assert_eq!(WeightCurve::from_str("smoothstep").unwrap(), WeightCurve::Smoothstep);
        assert_eq!(WeightCurve::from_str("logistic").unwrap(), WeightCurve::Logistic);
        assert!(WeightCurve::from_str("cubic").is_err());
    }
}
