//! Per-move-bucket logistic fits.
//!
//! Move numbers are partitioned into contiguous buckets of configurable
//! width covering `[3, 120)`. Each bucket with enough rate samples gets an
//! independent 2-parameter logistic fit of win rate against score. Buckets
//! with too few samples or a divergent fit are excluded and recorded; the
//! run only fails later if too few buckets remain for the cross-move
//! trend fit.
//!
//! The fits are independent of each other and of execution order; results
//! are collected in bucket-start order, which is what the trend fitter
//! consumes.

use serde::{Deserialize, Serialize};
use wdlfit_stats::{
    least_squares::{FitOptions, curve_fit},
    logistic::ShiftedLogistic,
};

use crate::{pipeline::CalibrationConfig, rates::RateSample};

/// Half-open range of move numbers covered by bucketing.
///
/// The opening moves below 3 carry no usable signal (scores are still near
/// book equality) and moves from 120 on were already dropped by
/// aggregation.
pub const BUCKET_MOVE_RANGE: std::ops::Range<u32> = 3..120;

/// Minimum number of rate samples a bucket needs for its fit to be
/// attempted.
pub const MIN_BUCKET_SAMPLES: usize = 10;

/// Fitted logistic parameters for one move bucket.
///
/// The win-probability curve of the bucket is
/// `1 / (1 + exp(-(score - a) / b))`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LogisticParams {
    /// First move number of the bucket.
    pub bucket_start: u32,
    /// Score at which the modeled win probability crosses 50%.
    pub a: f64,
    /// Spread of the transition region.
    pub b: f64,
}

impl LogisticParams {
    /// The logistic curve these parameters describe.
    #[must_use]
    pub fn curve(self) -> ShiftedLogistic {
        ShiftedLogistic {
            midpoint: self.a,
            scale: self.b,
        }
    }

    /// Modeled win probability at `score` for this bucket.
    #[must_use]
    pub fn win_probability(self, score: f64) -> f64 {
        self.curve().eval(score)
    }
}

/// Why a bucket was excluded from the per-move sequence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    /// Fewer than [`MIN_BUCKET_SAMPLES`] rate samples fell in the bucket.
    TooFewSamples {
        /// Samples found.
        count: usize,
    },
    /// The logistic fit did not converge.
    FitDiverged {
        /// Solver diagnostic.
        message: String,
    },
}

/// An excluded bucket and the reason for its exclusion.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkippedBucket {
    /// First move number of the bucket.
    pub bucket_start: u32,
    /// Why it was excluded.
    pub reason: SkipReason,
}

impl SkippedBucket {
    /// Whether this exclusion is a fit divergence, which the pipeline
    /// surfaces as a warning (thin buckets are expected and stay quiet).
    #[must_use]
    pub fn is_divergence(&self) -> bool {
        matches!(self.reason, SkipReason::FitDiverged { .. })
    }
}

/// Outcome of fitting every bucket.
#[derive(Debug, Clone)]
pub struct BucketFits {
    /// Converged fits in bucket-start order.
    pub params: Vec<LogisticParams>,
    /// Excluded buckets with reasons, in bucket-start order.
    pub skipped: Vec<SkippedBucket>,
}

/// Fits a logistic win-probability curve to every move bucket.
///
/// Samples are grouped by the half-open bucket `[start, start + width)`.
/// Each qualifying bucket is fitted by nonlinear least squares against its
/// empirical win rates, starting from `a = norm_factor`,
/// `b = norm_factor / 6` — close enough to the known shape of the curve to
/// avoid divergence on healthy data.
///
/// # Panics
///
/// Panics if `config.bucket_width` is zero.
#[must_use]
pub fn fit_buckets(samples: &[RateSample], config: &CalibrationConfig) -> BucketFits {
    assert!(config.bucket_width > 0, "bucket width must be positive");

    let initial = [
        f64::from(config.norm_factor),
        f64::from(config.norm_factor) / 6.0,
    ];
    let mut params = vec![];
    let mut skipped = vec![];

    let mut start = BUCKET_MOVE_RANGE.start;
    while start < BUCKET_MOVE_RANGE.end {
        let bucket = start..start + config.bucket_width;
        let (xs, ys): (Vec<f64>, Vec<f64>) = samples
            .iter()
            .filter(|sample| bucket.contains(&sample.move_number))
            .map(|sample| (sample.score, sample.win_rate))
            .unzip();

        if xs.len() < MIN_BUCKET_SAMPLES {
            skipped.push(SkippedBucket {
                bucket_start: start,
                reason: SkipReason::TooFewSamples { count: xs.len() },
            });
            start += config.bucket_width;
            continue;
        }

        let model = |x: f64, p: &[f64; 2]| {
            ShiftedLogistic {
                midpoint: p[0],
                scale: p[1],
            }
            .eval(x)
        };
        match curve_fit(model, &xs, &ys, initial, FitOptions::default()) {
            Ok(fit) => params.push(LogisticParams {
                bucket_start: start,
                a: fit.params[0],
                b: fit.params[1],
            }),
            Err(err) => skipped.push(SkippedBucket {
                bucket_start: start,
                reason: SkipReason::FitDiverged {
                    message: err.to_string(),
                },
            }),
        }
        start += config.bucket_width;
    }

    BucketFits { params, skipped }
}
