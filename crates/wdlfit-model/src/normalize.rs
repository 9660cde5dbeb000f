//! Normalization constants derived from the fitted trends.

use serde::{Deserialize, Serialize};

use crate::trend::TrendCurves;

/// The final calibration artifact.
///
/// At the reference move the normalized abscissa is 1, so each trend
/// evaluates to the sum of its coefficients. The rounded sums are the
/// normalization constant and spread consumed by the evaluation
/// normalization downstream: a score of `constant` internal units
/// corresponds to a ~50% win probability at the reference move, and
/// `draw_rate_at_zero` is how confident a 0.00 evaluation is of being a
/// draw there.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct NormalizationResult {
    /// Rounded value of the `a` trend at the reference move.
    pub constant: i64,
    /// Rounded value of the `b` trend at the reference move.
    pub spread: i64,
    /// `spread / constant`.
    pub normalized_spread: f64,
    /// `1 - 2 / (1 + exp(constant / spread))`.
    pub draw_rate_at_zero: f64,
}

impl NormalizationResult {
    /// Derives the normalization values from the fitted trends.
    #[expect(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_trends(trends: &TrendCurves) -> Self {
        let constant = trends.a.coefficient_sum().round() as i64;
        let spread = trends.b.coefficient_sum().round() as i64;
        let ratio = constant as f64 / spread as f64;
        Self {
            constant,
            spread,
            normalized_spread: spread as f64 / constant as f64,
            draw_rate_at_zero: 1.0 - 2.0 / (1.0 + ratio.exp()),
        }
    }
}

#[cfg(test)]
mod tests {
    use wdlfit_stats::polynomial::Cubic;

    use super::*;

    fn trends(a_coeffs: [f64; 4], b_coeffs: [f64; 4]) -> TrendCurves {
        TrendCurves {
            a: Cubic { coeffs: a_coeffs },
            b: Cubic { coeffs: b_coeffs },
            target_move: 32,
        }
    }

    #[test]
    fn test_constant_and_spread_are_rounded_sums() {
        let trends = trends([-10.0, 40.0, -37.0, 335.4], [-4.0, 30.0, -40.0, 68.1]);
        let result = NormalizationResult::from_trends(&trends);
        assert_eq!(result.constant, 328); // round(328.4)
        assert_eq!(result.spread, 54); // round(54.1)
    }

    #[test]
    fn test_normalized_spread() {
        let trends = trends([0.0, 0.0, 0.0, 320.0], [0.0, 0.0, 0.0, 80.0]);
        let result = NormalizationResult::from_trends(&trends);
        assert!((result.normalized_spread - 0.25).abs() < 1e-12);
    }

    #[test]
    fn test_draw_rate_bounds() {
        // A realistic constant/spread ratio puts the draw rate well inside (0, 1)
        let trends = trends([0.0, 0.0, 0.0, 328.0], [0.0, 0.0, 0.0, 55.0]);
        let result = NormalizationResult::from_trends(&trends);
        assert!(result.draw_rate_at_zero > 0.0);
        assert!(result.draw_rate_at_zero < 1.0);

        // constant / spread = 328 / 55 ≈ 5.96: draws dominate at 0.00
        assert!(result.draw_rate_at_zero > 0.99);
    }

    #[test]
    fn test_even_ratio_gives_low_draw_rate() {
        let trends = trends([0.0, 0.0, 0.0, 50.0], [0.0, 0.0, 0.0, 50.0]);
        let result = NormalizationResult::from_trends(&trends);
        // 1 - 2 / (1 + e) ≈ 0.462
        assert!((result.draw_rate_at_zero - (1.0 - 2.0 / (1.0 + std::f64::consts::E))).abs() < 1e-12);
    }
}
