//! Dense linear-system solving for small fixed-size systems.
//!
//! The fitting routines in this crate reduce to normal-equation systems of
//! dimension 2 (logistic fits) or 4 (cubic fits). Those are solved directly
//! with Gaussian elimination; there is no need for a factorization library
//! at this size.

/// Relative pivot threshold below which a matrix is treated as singular.
const SINGULARITY_THRESHOLD: f64 = 1e-12;

/// Solves the dense linear system `matrix * x = rhs`.
///
/// Uses Gaussian elimination with partial pivoting. The system dimension is
/// a compile-time constant, matching the fixed parameter counts of the
/// fitting routines.
///
/// # Arguments
///
/// * `matrix` - Row-major coefficient matrix
/// * `rhs` - Right-hand side vector
///
/// # Returns
///
/// * `Some(solution)` - if the matrix is numerically non-singular
/// * `None` - if a pivot falls below the singularity threshold (relative to
///   the largest entry of the input matrix)
///
/// # Examples
///
/// ```
/// use wdlfit_stats::linear::solve;
///
/// let matrix = [[2.0, 1.0], [1.0, 3.0]];
/// let rhs = [5.0, 10.0];
/// let solution = solve(matrix, rhs).unwrap();
/// assert!((solution[0] - 1.0).abs() < 1e-12);
/// assert!((solution[1] - 3.0).abs() < 1e-12);
///
/// // Singular system
/// assert!(solve([[1.0, 2.0], [2.0, 4.0]], [1.0, 2.0]).is_none());
/// ```
#[must_use]
pub fn solve<const N: usize>(mut matrix: [[f64; N]; N], mut rhs: [f64; N]) -> Option<[f64; N]> {
    let scale = matrix
        .iter()
        .flatten()
        .fold(0.0_f64, |acc, value| acc.max(value.abs()));
    if scale == 0.0 {
        return None;
    }

    for col in 0..N {
        // Partial pivoting: bring the largest remaining entry into place
        let pivot_row = (col..N).max_by(|&i, &j| matrix[i][col].abs().total_cmp(&matrix[j][col].abs()))?;
        if matrix[pivot_row][col].abs() <= scale * SINGULARITY_THRESHOLD {
            return None;
        }
        matrix.swap(col, pivot_row);
        rhs.swap(col, pivot_row);

        for row in col + 1..N {
            let factor = matrix[row][col] / matrix[col][col];
            for k in col..N {
                matrix[row][k] -= factor * matrix[col][k];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut solution = [0.0; N];
    for row in (0..N).rev() {
        let mut value = rhs[row];
        for k in row + 1..N {
            value -= matrix[row][k] * solution[k];
        }
        solution[row] = value / matrix[row][row];
    }
    Some(solution)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let solution = solve([[1.0, 0.0], [0.0, 1.0]], [3.0, -7.0]).unwrap();
        assert_eq!(solution, [3.0, -7.0]);
    }

    #[test]
    fn test_requires_pivoting() {
        // Zero in the top-left corner forces a row swap
        let matrix = [[0.0, 1.0], [1.0, 0.0]];
        let solution = solve(matrix, [2.0, 5.0]).unwrap();
        assert!((solution[0] - 5.0).abs() < 1e-12);
        assert!((solution[1] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_four_by_four() {
        let matrix = [
            [4.0, 1.0, 0.0, 0.0],
            [1.0, 4.0, 1.0, 0.0],
            [0.0, 1.0, 4.0, 1.0],
            [0.0, 0.0, 1.0, 4.0],
        ];
        let expected = [1.0, -2.0, 3.0, -4.0];
        let mut rhs = [0.0; 4];
        for (row, value) in rhs.iter_mut().enumerate() {
            *value = (0..4).map(|col| matrix[row][col] * expected[col]).sum();
        }
        let solution = solve(matrix, rhs).unwrap();
        for (got, want) in solution.iter().zip(expected) {
            assert!((got - want).abs() < 1e-10, "got {got}, want {want}");
        }
    }

    #[test]
    fn test_singular_matrix() {
        assert!(solve([[1.0, 1.0], [1.0, 1.0]], [1.0, 1.0]).is_none());
        assert!(solve([[0.0, 0.0], [0.0, 0.0]], [0.0, 0.0]).is_none());
    }
}
