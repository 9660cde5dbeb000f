//! Cross-move trends of the logistic parameters.
//!
//! The per-bucket logistic parameters `a` and `b` each get a cubic trend
//! in normalized move `m = move / target_move`. The normalization puts the
//! reference move at `m = 1`, where the polynomial value is simply the sum
//! of its coefficients — which is what the normalization calculator uses.

use wdlfit_stats::polynomial::Cubic;

use crate::bucket::LogisticParams;

/// Minimum number of fitted buckets required per trend (degrees of freedom
/// of a cubic).
pub const MIN_TREND_POINTS: usize = 4;

/// The cross-move trend fit could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum TrendError {
    /// Too few fitted buckets survived for a cubic to be determined.
    #[display("cross-move trend needs at least {required} fitted buckets, got {fitted}")]
    Underdetermined {
        /// Buckets that produced logistic parameters.
        fitted: usize,
        /// Buckets required.
        required: usize,
    },
}

/// Cubic trends of both logistic parameters over normalized move.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendCurves {
    /// Trend of the 50%-crossing parameter `a`.
    pub a: Cubic,
    /// Trend of the spread parameter `b`.
    pub b: Cubic,
    /// Reference move; trends are evaluated at `move / target_move`.
    pub target_move: u32,
}

impl TrendCurves {
    /// Fits both trends to the per-bucket logistic parameters.
    ///
    /// # Arguments
    ///
    /// * `params` - Converged per-bucket fits, in bucket-start order
    /// * `target_move` - Reference move used to normalize the abscissa
    ///
    /// # Returns
    ///
    /// * `Ok(TrendCurves)` - both cubics fitted by least squares
    /// * `Err(TrendError::Underdetermined)` - fewer than
    ///   [`MIN_TREND_POINTS`] buckets, or the bucket positions do not
    ///   determine a unique cubic
    pub fn fit(params: &[LogisticParams], target_move: u32) -> Result<Self, TrendError> {
        let underdetermined = TrendError::Underdetermined {
            fitted: params.len(),
            required: MIN_TREND_POINTS,
        };
        if params.len() < MIN_TREND_POINTS {
            return Err(underdetermined);
        }

        let moves: Vec<f64> = params
            .iter()
            .map(|p| f64::from(p.bucket_start) / f64::from(target_move))
            .collect();
        let a_values: Vec<f64> = params.iter().map(|p| p.a).collect();
        let b_values: Vec<f64> = params.iter().map(|p| p.b).collect();

        let a = Cubic::least_squares(&moves, &a_values).ok_or(underdetermined)?;
        let b = Cubic::least_squares(&moves, &b_values).ok_or(underdetermined)?;
        Ok(Self { a, b, target_move })
    }

    /// The modeled `a` parameter at a move number.
    #[must_use]
    pub fn a_at(&self, move_number: u32) -> f64 {
        self.a.eval(self.normalized(move_number))
    }

    /// The modeled `b` parameter at a move number.
    #[must_use]
    pub fn b_at(&self, move_number: u32) -> f64 {
        self.b.eval(self.normalized(move_number))
    }

    fn normalized(&self, move_number: u32) -> f64 {
        f64::from(move_number) / f64::from(self.target_move)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_from_cubics(a: Cubic, b: Cubic, target_move: u32, moves: &[u32]) -> Vec<LogisticParams> {
        moves
            .iter()
            .map(|&bucket_start| {
                let m = f64::from(bucket_start) / f64::from(target_move);
                LogisticParams {
                    bucket_start,
                    a: a.eval(m),
                    b: b.eval(m),
                }
            })
            .collect()
    }

    #[test]
    fn test_recovers_exact_cubics() {
        let a = Cubic {
            coeffs: [-2.75, 11.5, -9.25, 330.0],
        };
        let b = Cubic {
            coeffs: [-1.0, 3.0, 5.5, 47.0],
        };
        let moves: Vec<u32> = (3..120).collect();
        let params = params_from_cubics(a, b, 32, &moves);

        let trends = TrendCurves::fit(&params, 32).unwrap();
        for (got, want) in trends.a.coeffs.iter().zip(a.coeffs) {
            assert!((got - want).abs() < 1e-6, "a: got {got}, want {want}");
        }
        for (got, want) in trends.b.coeffs.iter().zip(b.coeffs) {
            assert!((got - want).abs() < 1e-6, "b: got {got}, want {want}");
        }
    }

    #[test]
    fn test_evaluation_at_reference_move_is_coefficient_sum() {
        let a = Cubic {
            coeffs: [1.0, -2.0, 4.0, 320.0],
        };
        let b = Cubic {
            coeffs: [0.5, 0.25, -1.0, 55.0],
        };
        let moves: Vec<u32> = (3..80).collect();
        let trends = TrendCurves::fit(&params_from_cubics(a, b, 32, &moves), 32).unwrap();

        assert!((trends.a_at(32) - trends.a.coefficient_sum()).abs() < 1e-9);
        assert!((trends.b_at(32) - trends.b.coefficient_sum()).abs() < 1e-9);
    }

    #[test]
    fn test_underdetermined_with_three_buckets() {
        let a = Cubic {
            coeffs: [0.0, 0.0, 1.0, 300.0],
        };
        let params = params_from_cubics(a, a, 32, &[10, 20, 30]);
        let err = TrendCurves::fit(&params, 32).unwrap_err();
        assert_eq!(
            err,
            TrendError::Underdetermined {
                fitted: 3,
                required: 4,
            }
        );
    }

    #[test]
    fn test_four_buckets_suffice() {
        let a = Cubic {
            coeffs: [0.5, -1.0, 2.0, 310.0],
        };
        let params = params_from_cubics(a, a, 32, &[10, 30, 50, 70]);
        assert!(TrendCurves::fit(&params, 32).is_ok());
    }
}
