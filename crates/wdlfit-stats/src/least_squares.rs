//! Nonlinear least-squares curve fitting.
//!
//! Implements a Levenberg-Marquardt solver for small parameter counts. The
//! Jacobian is estimated with central finite differences and the damped
//! normal equations are solved with [`linear::solve`].
//!
//! Every fit is bounded: the solver runs at most
//! [`FitOptions::max_iterations`] Jacobian evaluations and reports
//! [`FitError::DidNotConverge`] when it cannot reduce the residual to the
//! convergence tolerance within that budget. Callers decide whether a
//! failed fit is fatal; the solver never panics on bad data.

use crate::linear;

/// Initial damping factor for the Levenberg-Marquardt iteration.
const INITIAL_DAMPING: f64 = 1e-3;
/// Factor applied to the damping after a rejected step.
const DAMPING_GROWTH: f64 = 10.0;
/// Factor applied to the damping after an accepted step.
const DAMPING_SHRINK: f64 = 0.1;
/// Lower bound for the damping factor.
const MIN_DAMPING: f64 = 1e-12;
/// Damping ceiling; exceeding it means no usable descent step exists.
const MAX_DAMPING: f64 = 1e12;
/// Floor for the damped diagonal, so damping also regularizes zero entries.
const MIN_DIAGONAL: f64 = 1e-12;
/// Relative step used for finite-difference derivatives.
const DERIVATIVE_STEP: f64 = 1e-6;
/// Relative parameter change below which a rejected step counts as
/// convergence at machine precision.
const STEP_FLOOR: f64 = 1e-12;

/// Options controlling a nonlinear fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOptions {
    /// Maximum number of Levenberg-Marquardt iterations.
    pub max_iterations: usize,
    /// Relative residual-reduction threshold that counts as convergence.
    pub tolerance: f64,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            tolerance: 1e-12,
        }
    }
}

/// A converged nonlinear fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fit<const N: usize> {
    /// The fitted parameter vector.
    pub params: [f64; N],
    /// Residual sum of squares at the fitted parameters.
    pub residual_sum_squares: f64,
    /// Number of iterations performed.
    pub iterations: usize,
}

/// Failure of a nonlinear fit.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum FitError {
    /// The solver exhausted its iteration or damping budget without
    /// reaching the convergence tolerance.
    #[display("no convergence after {iterations} iterations (residual sum of squares {residual:.3e})")]
    DidNotConverge {
        /// Iterations performed before giving up.
        iterations: usize,
        /// Residual sum of squares at the best parameters found.
        residual: f64,
    },
    /// The model produced a non-finite value at the initial parameters or
    /// while estimating derivatives.
    #[display("curve evaluation produced a non-finite value")]
    NonFiniteModel,
}

/// Fits `model` to `(xs, ys)` samples by Levenberg-Marquardt least squares.
///
/// Minimizes the sum of squared residuals `sum((y - model(x, params))^2)`
/// starting from `initial`. Convergence is a local property: the result is
/// the nearest local minimum, which for well-posed problems with a sane
/// initial guess is the global one.
///
/// # Arguments
///
/// * `model` - Curve to fit; evaluates one abscissa under a parameter vector
/// * `xs` - Sample abscissas
/// * `ys` - Sample ordinates, one per abscissa
/// * `initial` - Starting parameter vector
/// * `options` - Iteration and tolerance budget
///
/// # Returns
///
/// * `Ok(Fit)` - parameters at a local minimum of the residual
/// * `Err(FitError)` - the solver could not reduce the residual to the
///   tolerance within its bounded budget
///
/// # Panics
///
/// Panics if `xs` and `ys` have different lengths or are empty.
///
/// # Examples
///
/// ```
/// use wdlfit_stats::least_squares::{FitOptions, curve_fit};
///
/// // Recover the midpoint of a sigmoid from noise-free samples
/// let xs: Vec<f64> = (-5..=5).map(f64::from).collect();
/// let ys: Vec<f64> = xs.iter().map(|x| 1.0 / (1.0 + (-(x - 1.5)).exp())).collect();
/// let fit = curve_fit(
///     |x, p: &[f64; 1]| 1.0 / (1.0 + (-(x - p[0])).exp()),
///     &xs,
///     &ys,
///     [0.0],
///     FitOptions::default(),
/// )
/// .unwrap();
/// assert!((fit.params[0] - 1.5).abs() < 1e-6);
/// ```
pub fn curve_fit<const N: usize, F>(
    model: F,
    xs: &[f64],
    ys: &[f64],
    initial: [f64; N],
    options: FitOptions,
) -> Result<Fit<N>, FitError>
where
    F: Fn(f64, &[f64; N]) -> f64,
{
    assert_eq!(xs.len(), ys.len(), "xs and ys must have the same length");
    assert!(!xs.is_empty(), "cannot fit a curve without samples");

    let mut params = initial;
    let mut residual = residual_sum_squares(&model, xs, ys, &params);
    if !residual.is_finite() {
        return Err(FitError::NonFiniteModel);
    }
    let mut damping = INITIAL_DAMPING;

    for iteration in 1..=options.max_iterations {
        let (normal, gradient) = normal_equations(&model, xs, ys, &params)?;

        // Retry the step with stronger damping until the residual shrinks
        loop {
            let mut damped = normal;
            for k in 0..N {
                damped[k][k] = normal[k][k] + damping * normal[k][k].max(MIN_DIAGONAL);
            }

            let Some(step) = linear::solve(damped, gradient) else {
                damping *= DAMPING_GROWTH;
                if damping > MAX_DAMPING {
                    return Err(FitError::DidNotConverge {
                        iterations: iteration,
                        residual,
                    });
                }
                continue;
            };

            let mut candidate = params;
            for (value, delta) in candidate.iter_mut().zip(step) {
                *value += delta;
            }
            let candidate_residual = residual_sum_squares(&model, xs, ys, &candidate);

            if candidate_residual.is_finite() && candidate_residual <= residual {
                let improvement = residual - candidate_residual;
                params = candidate;
                residual = candidate_residual;
                damping = (damping * DAMPING_SHRINK).max(MIN_DAMPING);
                if improvement <= options.tolerance * residual.max(f64::EPSILON) {
                    return Ok(Fit {
                        params,
                        residual_sum_squares: residual,
                        iterations: iteration,
                    });
                }
                break;
            }

            // A rejected step that no longer moves the parameters means the
            // fit is at a minimum to machine precision
            let negligible = candidate
                .iter()
                .zip(&params)
                .all(|(c, p)| (c - p).abs() <= STEP_FLOOR * p.abs().max(1.0));
            if negligible {
                return Ok(Fit {
                    params,
                    residual_sum_squares: residual,
                    iterations: iteration,
                });
            }

            damping *= DAMPING_GROWTH;
            if damping > MAX_DAMPING {
                return Err(FitError::DidNotConverge {
                    iterations: iteration,
                    residual,
                });
            }
        }
    }

    Err(FitError::DidNotConverge {
        iterations: options.max_iterations,
        residual,
    })
}

fn residual_sum_squares<const N: usize, F>(model: &F, xs: &[f64], ys: &[f64], params: &[f64; N]) -> f64
where
    F: Fn(f64, &[f64; N]) -> f64,
{
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| {
            let r = y - model(x, params);
            r * r
        })
        .sum()
}

/// Assembles `J^T J` and `J^T r` with a central-difference Jacobian.
fn normal_equations<const N: usize, F>(
    model: &F,
    xs: &[f64],
    ys: &[f64],
    params: &[f64; N],
) -> Result<([[f64; N]; N], [f64; N]), FitError>
where
    F: Fn(f64, &[f64; N]) -> f64,
{
    let mut normal = [[0.0; N]; N];
    let mut gradient = [0.0; N];

    for (&x, &y) in xs.iter().zip(ys) {
        let r = y - model(x, params);
        let mut row = [0.0; N];
        for k in 0..N {
            let h = DERIVATIVE_STEP * params[k].abs().max(1.0);
            let mut forward = *params;
            forward[k] += h;
            let mut backward = *params;
            backward[k] -= h;
            row[k] = (model(x, &forward) - model(x, &backward)) / (2.0 * h);
        }
        if !r.is_finite() || row.iter().any(|d| !d.is_finite()) {
            return Err(FitError::NonFiniteModel);
        }
        for j in 0..N {
            for k in 0..N {
                normal[j][k] += row[j] * row[k];
            }
            gradient[j] += row[j] * r;
        }
    }

    Ok((normal, gradient))
}
