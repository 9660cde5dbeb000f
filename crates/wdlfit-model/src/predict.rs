//! Read-only WDL prediction from the fitted trends.

use serde::{Deserialize, Serialize};
use wdlfit_stats::logistic::ShiftedLogistic;

use crate::trend::TrendCurves;

/// Win/draw/loss probabilities in per-mille.
///
/// The three values always sum to exactly 1000: win and loss are rounded
/// independently and draw is the integer remainder, never rounded on its
/// own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct WdlProbabilities {
    pub win: i32,
    pub draw: i32,
    pub loss: i32,
}

/// Pure (score, move) → WDL predictor built from the fitted trends.
///
/// Once the trends exist the predictor is stateless; it serves the textual
/// report and regenerates dense model surfaces for the external
/// visualization collaborator.
#[derive(Debug, Clone)]
pub struct WdlModel {
    trends: TrendCurves,
}

impl WdlModel {
    /// Builds a predictor from fitted trends.
    #[must_use]
    pub fn new(trends: TrendCurves) -> Self {
        Self { trends }
    }

    /// The trends backing this predictor.
    #[must_use]
    pub fn trends(&self) -> &TrendCurves {
        &self.trends
    }

    /// Expected WDL probabilities in per-mille at a (score, move) pair.
    ///
    /// Win probability uses the logistic curve with the trend-modeled
    /// parameters for the move; loss is the win probability of the negated
    /// score (the opponent's view); draw is the remainder.
    #[expect(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn expected(&self, score: f64, move_number: u32) -> WdlProbabilities {
        let curve = ShiftedLogistic {
            midpoint: self.trends.a_at(move_number),
            scale: self.trends.b_at(move_number),
        };
        let win = (1000.0 * curve.eval(score)).round() as i32;
        let loss = (1000.0 * curve.eval(-score)).round() as i32;
        WdlProbabilities {
            win,
            draw: 1000 - win - loss,
            loss,
        }
    }
}
