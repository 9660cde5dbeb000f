//! Win-draw-loss model calibration from game outcome statistics
//!
//! This crate fits a parametric win-draw-loss (WDL) probability model to
//! aggregate game outcome counts and derives the normalization constant
//! that maps internal evaluation scores to centipawns.
//!
//! # Overview
//!
//! The calibration is a one-pass batch pipeline:
//!
//! 1. **Parse observations** ([`observation::ObservationKey`]): Decode the
//!    tuple-like `(outcome, move, material, score)` key strings of the
//!    input statistics with strict validation
//! 2. **Aggregate counts** ([`aggregate::OutcomeCounts`]): Fold the raw
//!    entries into per-outcome count tables keyed by rescaled
//!    (score, move) coordinates, dropping out-of-range entries
//! 3. **Compute rates** ([`rates::RateSample`]): Turn counts into
//!    win/draw/loss frequencies at every coordinate
//! 4. **Fit per-move curves** ([`bucket`]): For every move bucket with
//!    enough samples, fit a 2-parameter logistic win-probability curve
//! 5. **Fit cross-move trends** ([`trend::TrendCurves`]): Fit one cubic
//!    polynomial to each logistic parameter as a function of move number
//! 6. **Derive normalization** ([`normalize::NormalizationResult`]):
//!    Evaluate both trends at the reference move and derive the
//!    normalization constant, spread, and draw rate at zero evaluation
//!
//! [`pipeline::Calibration`] drives steps 2-6; [`predict::WdlModel`] is the
//! read-only predictor built from the fitted trends, used for the textual
//! report ([`report::Report`]) and for regenerating model surfaces for
//! external visualization.
//!
//! The two-stage structure — logistic fits per move bucket, then a cubic
//! fit across the per-bucket parameters — smooths per-move noise by
//! imposing a low-degree functional form across moves. The stages are not
//! collapsed into a joint two-dimensional fit; that would change the
//! calibration semantics.
//!
//! # Example
//!
//! ```no_run
//! use wdlfit_model::{
//!     observation::parse_entries,
//!     pipeline::{Calibration, CalibrationConfig},
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Entries as loaded from the stats file (key string -> count)
//! let raw: Vec<(&str, u64)> = vec![("('W', 32, 58, 100)", 840)];
//!
//! let entries = parse_entries(raw)?;
//! let config = CalibrationConfig::default();
//! let calibration = Calibration::fit(entries, &config)?;
//!
//! println!("{}", calibration.report());
//!
//! let model = calibration.model();
//! let wdl = model.expected(100.0, 32);
//! println!("w/d/l at +100: {}/{}/{}", wdl.win, wdl.draw, wdl.loss);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod bucket;
pub mod normalize;
pub mod observation;
pub mod pipeline;
pub mod predict;
pub mod rates;
pub mod report;
pub mod trend;
