//! Serialized model summary for the visualization collaborator.
//!
//! Rendering the summary figure is not this tool's job; instead every run
//! writes one JSON artifact carrying the measured rates, the per-bucket
//! fits, both trend coefficient sets, and the model's regenerated WDL
//! values at every measured coordinate. An external plotter can rebuild
//! the measured-vs-model comparison and the contour surfaces from it
//! without refitting anything.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wdlfit_model::{
    aggregate::CountTriple,
    bucket::{LogisticParams, SkippedBucket},
    normalize::NormalizationResult,
    pipeline::{Calibration, CalibrationConfig},
    predict::WdlProbabilities,
    rates::RateSample,
};

/// One measured coordinate paired with the model's prediction for it.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct MeasuredPoint {
    /// The empirical rates at this coordinate.
    #[serde(flatten)]
    pub measured: RateSample,
    /// The fitted model's WDL prediction, in per-mille.
    pub model: WdlProbabilities,
}

/// Everything a plotting collaborator needs from one calibration run.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelSummary {
    /// When the summary was generated.
    pub generated_at: DateTime<Utc>,
    /// Run configuration.
    pub config: CalibrationConfig,
    /// Retained observation counts per outcome.
    pub retained: CountTriple,
    /// Derived normalization values.
    pub normalization: NormalizationResult,
    /// Coefficients of the `a` trend, highest degree first.
    pub a_coefficients: [f64; 4],
    /// Coefficients of the `b` trend, highest degree first.
    pub b_coefficients: [f64; 4],
    /// Converged per-bucket logistic fits.
    pub buckets: Vec<LogisticParams>,
    /// Excluded buckets with reasons.
    pub skipped_buckets: Vec<SkippedBucket>,
    /// Measured rates with regenerated model values, in coordinate order.
    pub points: Vec<MeasuredPoint>,
}

impl ModelSummary {
    /// Assembles the summary from a finished calibration.
    #[must_use]
    pub fn from_calibration(calibration: &Calibration, generated_at: DateTime<Utc>) -> Self {
        let model = calibration.model();
        let points = calibration
            .samples
            .iter()
            .map(|&measured| MeasuredPoint {
                measured,
                model: model.expected(measured.score, measured.move_number),
            })
            .collect();

        Self {
            generated_at,
            config: calibration.config,
            retained: calibration.retained,
            normalization: calibration.normalization,
            a_coefficients: calibration.trends.a.coeffs,
            b_coefficients: calibration.trends.b.coeffs,
            buckets: calibration.buckets.params.clone(),
            skipped_buckets: calibration.buckets.skipped.clone(),
            points,
        }
    }
}
