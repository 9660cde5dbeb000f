//! Numerical fitting utilities for the wdlfit project.
//!
//! This crate provides the small collection of numerical tools the
//! calibration pipeline is built on:
//!
//! - **Shifted logistic curve**: the 2-parameter sigmoid used to model win
//!   probability as a function of evaluation score
//! - **Cubic polynomials**: Horner evaluation and linear least-squares
//!   fitting of degree-3 polynomials
//! - **Nonlinear least squares**: a bounded Levenberg-Marquardt driver with
//!   explicit convergence/divergence signaling
//! - **Dense linear systems**: Gaussian elimination with partial pivoting
//!   for the small normal-equation systems the fitters produce
//!
//! # Modules
//!
//! - [`logistic`]: Shifted logistic (sigmoid) curve evaluation
//! - [`polynomial`]: Cubic polynomials and their least-squares fit
//! - [`least_squares`]: Levenberg-Marquardt nonlinear curve fitting
//! - [`linear`]: Dense linear-system solver
//!
//! # Examples
//!
//! ## Evaluating a logistic curve
//!
//! ```
//! use wdlfit_stats::logistic::ShiftedLogistic;
//!
//! let curve = ShiftedLogistic {
//!     midpoint: 100.0,
//!     scale: 50.0,
//! };
//! assert_eq!(curve.eval(100.0), 0.5);
//! assert!(curve.eval(400.0) > 0.99);
//! ```
//!
//! ## Fitting a curve to data
//!
//! ```
//! use wdlfit_stats::least_squares::{FitOptions, curve_fit};
//!
//! // Noise-free samples of y = 2x + 1
//! let xs = [0.0, 1.0, 2.0, 3.0];
//! let ys = [1.0, 3.0, 5.0, 7.0];
//! let fit = curve_fit(
//!     |x, p: &[f64; 2]| p[0] * x + p[1],
//!     &xs,
//!     &ys,
//!     [0.0, 0.0],
//!     FitOptions::default(),
//! )
//! .unwrap();
//! assert!((fit.params[0] - 2.0).abs() < 1e-6);
//! assert!((fit.params[1] - 1.0).abs() < 1e-6);
//! ```
//!
//! ## Fitting a cubic polynomial
//!
//! ```
//! use wdlfit_stats::polynomial::Cubic;
//!
//! let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
//! let ys = xs.map(|x| x * x * x - 2.0 * x + 5.0);
//! let cubic = Cubic::least_squares(&xs, &ys).unwrap();
//! assert!((cubic.eval(1.5) - (1.5_f64.powi(3) - 2.0 * 1.5 + 5.0)).abs() < 1e-9);
//! ```

pub mod least_squares;
pub mod linear;
pub mod logistic;
pub mod polynomial;
