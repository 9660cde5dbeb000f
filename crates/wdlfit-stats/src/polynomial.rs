//! Cubic polynomials and their least-squares fit.
//!
//! Fitting a polynomial is a linear least-squares problem: the normal
//! equations are assembled from power sums of the abscissas and solved
//! directly with [`linear::solve`]. No iteration is involved, so the fit
//! either succeeds or the system is underdetermined/singular.

use crate::linear;

/// A cubic polynomial in one variable.
///
/// Coefficients are stored highest degree first, so the polynomial is
/// `((c0 * x + c1) * x + c2) * x + c3`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    /// Coefficients, highest degree first.
    pub coeffs: [f64; 4],
}

impl Cubic {
    /// Evaluates the polynomial at `x` using Horner's scheme.
    ///
    /// # Examples
    ///
    /// ```
    /// use wdlfit_stats::polynomial::Cubic;
    ///
    /// let cubic = Cubic {
    ///     coeffs: [1.0, 0.0, -2.0, 5.0],
    /// };
    /// assert_eq!(cubic.eval(0.0), 5.0);
    /// assert_eq!(cubic.eval(2.0), 8.0 - 4.0 + 5.0);
    /// ```
    #[must_use]
    pub fn eval(&self, x: f64) -> f64 {
        let [c0, c1, c2, c3] = self.coeffs;
        ((c0 * x + c1) * x + c2) * x + c3
    }

    /// Returns the sum of the four coefficients, which equals the value of
    /// the polynomial at `x = 1`.
    #[must_use]
    pub fn coefficient_sum(&self) -> f64 {
        self.coeffs.iter().sum()
    }

    /// Fits a cubic to `(x, y)` samples by linear least squares.
    ///
    /// Assembles the 4x4 normal equations from power sums and solves them
    /// directly.
    ///
    /// # Arguments
    ///
    /// * `xs` - Sample abscissas
    /// * `ys` - Sample ordinates, one per abscissa
    ///
    /// # Returns
    ///
    /// * `Some(Cubic)` - the least-squares cubic through the samples
    /// * `None` - if fewer than 4 samples are given, or the samples do not
    ///   determine a unique cubic (e.g. too few distinct abscissas)
    ///
    /// # Panics
    ///
    /// Panics if `xs` and `ys` have different lengths.
    ///
    /// # Examples
    ///
    /// ```
    /// use wdlfit_stats::polynomial::Cubic;
    ///
    /// let xs = [1.0, 2.0, 3.0, 4.0];
    /// let ys = [1.0, 8.0, 27.0, 64.0]; // y = x^3
    /// let cubic = Cubic::least_squares(&xs, &ys).unwrap();
    /// assert!((cubic.coeffs[0] - 1.0).abs() < 1e-9);
    ///
    /// // Underdetermined
    /// assert!(Cubic::least_squares(&[1.0, 2.0], &[1.0, 2.0]).is_none());
    /// ```
    #[must_use]
    pub fn least_squares(xs: &[f64], ys: &[f64]) -> Option<Self> {
        assert_eq!(xs.len(), ys.len(), "xs and ys must have the same length");
        if xs.len() < 4 {
            return None;
        }

        // Power sums s_p = sum(x^p) and moment sums t_p = sum(y * x^p)
        let mut power_sums = [0.0_f64; 7];
        let mut moment_sums = [0.0_f64; 4];
        for (&x, &y) in xs.iter().zip(ys) {
            let mut power = 1.0;
            for p in 0..7 {
                power_sums[p] += power;
                if p < 4 {
                    moment_sums[p] += y * power;
                }
                power *= x;
            }
        }

        // Basis order matches the coefficient layout: x^3, x^2, x, 1
        let mut matrix = [[0.0; 4]; 4];
        let mut rhs = [0.0; 4];
        for row in 0..4 {
            for col in 0..4 {
                matrix[row][col] = power_sums[6 - row - col];
            }
            rhs[row] = moment_sums[3 - row];
        }

        let coeffs = linear::solve(matrix, rhs)?;
        Some(Self { coeffs })
    }
}
