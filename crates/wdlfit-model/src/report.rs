//! Textual calibration report.
//!
//! The report is the plain-numeric block embedded into the downstream
//! evaluation code: the normalization values followed by both coefficient
//! sets, once as expressions in the raw move counter and once as array
//! initializers.

use std::fmt;

use wdlfit_stats::polynomial::Cubic;

use crate::pipeline::Calibration;

/// Displayable calibration report.
///
/// Borrow of a finished [`Calibration`]; formatting allocates nothing
/// beyond the output itself.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    calibration: &'a Calibration,
}

impl<'a> Report<'a> {
    /// Wraps a finished calibration for display.
    #[must_use]
    pub fn new(calibration: &'a Calibration) -> Self {
        Self { calibration }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let normalization = &self.calibration.normalization;
        let trends = &self.calibration.trends;
        let target_move = trends.target_move;

        writeln!(f, "const int NormalizeToPawnValue = {};", normalization.constant)?;
        writeln!(f, "Corresponding spread = {};", normalization.spread)?;
        writeln!(
            f,
            "Corresponding normalized spread = {};",
            normalization.normalized_spread
        )?;
        writeln!(
            f,
            "Draw rate at 0.0 eval at move {} = {};",
            target_move, normalization.draw_rate_at_zero
        )?;
        writeln!(f, "Parameters in internal value units: ")?;
        writeln!(f, "as = {}", poly_expression(&trends.a, target_move))?;
        writeln!(f, "bs = {}", poly_expression(&trends.b, target_move))?;
        writeln!(
            f,
            "     constexpr double as[] = {{{:13.8}, {:13.8}, {:13.8}, {:13.8}}};",
            trends.a.coeffs[0], trends.a.coeffs[1], trends.a.coeffs[2], trends.a.coeffs[3]
        )?;
        writeln!(
            f,
            "     constexpr double bs[] = {{{:13.8}, {:13.8}, {:13.8}, {:13.8}}};",
            trends.b.coeffs[0], trends.b.coeffs[1], trends.b.coeffs[2], trends.b.coeffs[3]
        )?;
        Ok(())
    }
}

/// Renders a trend cubic as an expression in the raw move counter `x`.
fn poly_expression(cubic: &Cubic, target_move: u32) -> String {
    let [c0, c1, c2, c3] = cubic.coeffs;
    format!(
        "(({c0:5.3} * x / {target_move} + {c1:5.3}) * x / {target_move} + {c2:5.3}) * x / {target_move} + {c3:5.3}"
    )
}
