//! The calibration pipeline.
//!
//! One forward pass over the parsed observations: aggregate, compute
//! rates, fit per-move buckets, fit cross-move trends, derive the
//! normalization values. Per-bucket problems (thin data, divergent fits)
//! are absorbed into the skipped list; the run only fails if so few
//! buckets survive that the trends are underdetermined.

use serde::{Deserialize, Serialize};

use crate::{
    aggregate::{CountTriple, OutcomeCounts},
    bucket::{self, BucketFits},
    normalize::NormalizationResult,
    observation::ObservationKey,
    predict::WdlModel,
    rates::RateSample,
    report::Report,
    trend::{TrendCurves, TrendError},
};

/// Tunable constants of one calibration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct CalibrationConfig {
    /// Score rescaling constant (the prior normalization value).
    pub norm_factor: u32,
    /// Reference move at which the normalization is evaluated.
    pub target_move: u32,
    /// Width of the per-move fit buckets.
    pub bucket_width: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            norm_factor: 328,
            target_move: 32,
            bucket_width: 1,
        }
    }
}

/// A calibration run failed beyond per-bucket recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum CalibrationError {
    /// Too few buckets survived for the cross-move trends.
    #[display("only {fitted} of the required {required} move buckets could be fitted")]
    Underdetermined {
        /// Buckets that produced logistic parameters.
        fitted: usize,
        /// Buckets required.
        required: usize,
    },
}

impl From<TrendError> for CalibrationError {
    fn from(err: TrendError) -> Self {
        match err {
            TrendError::Underdetermined { fitted, required } => {
                Self::Underdetermined { fitted, required }
            }
        }
    }
}

/// Everything one calibration run produces.
///
/// All fields are immutable once the run completes; the struct is the
/// hand-off point to the report and to the external visualization
/// collaborator.
#[derive(Debug, Clone)]
pub struct Calibration {
    /// The configuration the run used.
    pub config: CalibrationConfig,
    /// Retained observation counts per outcome, after filtering.
    pub retained: CountTriple,
    /// One rate sample per retained coordinate, in coordinate order.
    pub samples: Vec<RateSample>,
    /// Per-bucket logistic fits and exclusions.
    pub buckets: BucketFits,
    /// Cross-move trends of the logistic parameters.
    pub trends: TrendCurves,
    /// The derived normalization values.
    pub normalization: NormalizationResult,
}

impl Calibration {
    /// Runs the full calibration over parsed observations.
    ///
    /// # Arguments
    ///
    /// * `entries` - Parsed `(key, count)` observations
    /// * `config` - Run constants
    ///
    /// # Returns
    ///
    /// * `Ok(Calibration)` - the completed run
    /// * `Err(CalibrationError)` - fewer than 4 move buckets could be
    ///   fitted, so the cross-move trends cannot be computed
    pub fn fit<I>(entries: I, config: &CalibrationConfig) -> Result<Self, CalibrationError>
    where
        I: IntoIterator<Item = (ObservationKey, u64)>,
    {
        let counts = OutcomeCounts::from_entries(entries, config.norm_factor);
        let retained = counts.retained();
        let samples = RateSample::from_counts(&counts);
        let buckets = bucket::fit_buckets(&samples, config);
        let trends = TrendCurves::fit(&buckets.params, config.target_move)?;
        let normalization = NormalizationResult::from_trends(&trends);

        Ok(Self {
            config: *config,
            retained,
            samples,
            buckets,
            trends,
            normalization,
        })
    }

    /// The WDL predictor backed by this run's trends.
    #[must_use]
    pub fn model(&self) -> WdlModel {
        WdlModel::new(self.trends.clone())
    }

    /// The textual calibration report.
    #[must_use]
    pub fn report(&self) -> Report<'_> {
        Report::new(self)
    }
}

#[cfg(test)]
mod tests {
    use wdlfit_stats::{logistic::ShiftedLogistic, polynomial::Cubic};

    use super::*;
    use crate::observation::Outcome;

    /// Builds a synthetic corpus whose outcome rates follow exact logistic
    /// curves with cubic parameter trends, mimicking default corpus
    /// conventions. Counts are per-mille rounded, which adds only rounding
    /// noise to the rates.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss
    )]
    fn synthetic_entries(
        a_trend: Cubic,
        b_trend: Cubic,
        target_move: u32,
        moves: &[u32],
    ) -> Vec<(ObservationKey, u64)> {
        let mut entries = vec![];
        for &move_number in moves {
            let m = f64::from(move_number) / f64::from(target_move);
            let curve = ShiftedLogistic {
                midpoint: a_trend.eval(m),
                scale: b_trend.eval(m),
            };
            for step in -20..=20 {
                let raw_score = step * 20;
                let internal = f64::from(raw_score) * 3.28;
                let win = (1000.0 * curve.eval(internal)).round() as u64;
                let loss = (1000.0 * curve.eval(-internal)).round() as u64;
                let draw = 1000_u64.saturating_sub(win + loss);
                for (outcome, count) in [
                    (Outcome::Win, win),
                    (Outcome::Draw, draw),
                    (Outcome::Loss, loss),
                ] {
                    if count > 0 {
                        entries.push((
                            ObservationKey {
                                outcome,
                                move_number: move_number as i32,
                                material: 50,
                                raw_score,
                            },
                            count,
                        ));
                    }
                }
            }
        }
        entries
    }

    fn synthetic_corpus(a_trend: Cubic, b_trend: Cubic, target_move: u32) -> Vec<(ObservationKey, u64)> {
        let moves: Vec<u32> = (3..120).collect();
        synthetic_entries(a_trend, b_trend, target_move, &moves)
    }

    #[test]
    fn test_end_to_end_recovers_normalization() {
        // Trend sums place a(target) at 328 and b(target) at 55
        let a_trend = Cubic {
            coeffs: [-12.0, 45.0, -38.0, 333.0],
        };
        let b_trend = Cubic {
            coeffs: [-5.0, 22.0, -18.0, 56.0],
        };
        let config = CalibrationConfig::default();
        let entries = synthetic_corpus(a_trend, b_trend, config.target_move);

        let calibration = Calibration::fit(entries, &config).unwrap();

        assert!(
            (calibration.normalization.constant - 328).abs() <= 5,
            "constant = {}",
            calibration.normalization.constant
        );
        assert!(calibration.normalization.draw_rate_at_zero > 0.0);
        assert!(calibration.normalization.draw_rate_at_zero < 1.0);

        // Every bucket from 3 to 119 has 41 samples, so none are skipped
        assert_eq!(calibration.buckets.params.len(), 117);
        assert!(calibration.buckets.skipped.is_empty());
    }

    #[test]
    fn test_underdetermined_with_empty_input() {
        let err = Calibration::fit(vec![], &CalibrationConfig::default()).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::Underdetermined {
                fitted: 0,
                required: 4,
            }
        );
    }

    #[test]
    fn test_sparse_input_reports_fitted_count() {
        // Three healthy buckets only: still underdetermined
        let a_trend = Cubic {
            coeffs: [0.0, 0.0, 0.0, 328.0],
        };
        let b_trend = Cubic {
            coeffs: [0.0, 0.0, 0.0, 55.0],
        };
        let entries = synthetic_entries(a_trend, b_trend, 32, &[10, 20, 30]);

        let err = Calibration::fit(entries, &CalibrationConfig::default()).unwrap_err();
        assert_eq!(
            err,
            CalibrationError::Underdetermined {
                fitted: 3,
                required: 4,
            }
        );
    }

    #[test]
    fn test_predictor_conserves_per_mille() {
        let a_trend = Cubic {
            coeffs: [-12.0, 45.0, -38.0, 333.0],
        };
        let b_trend = Cubic {
            coeffs: [-5.0, 22.0, -18.0, 56.0],
        };
        let config = CalibrationConfig::default();
        let calibration =
            Calibration::fit(synthetic_corpus(a_trend, b_trend, config.target_move), &config)
                .unwrap();
        let model = calibration.model();

        for sample in &calibration.samples {
            let wdl = model.expected(sample.score, sample.move_number);
            assert_eq!(wdl.win + wdl.draw + wdl.loss, 1000);
        }
    }
}
