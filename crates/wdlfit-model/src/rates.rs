//! Win/draw/loss rates per coordinate.

use serde::{Deserialize, Serialize};

use crate::aggregate::OutcomeCounts;

/// Empirical outcome frequencies at one (score, move) coordinate.
///
/// The three rates lie in `[0, 1]` and sum to 1 up to floating rounding.
/// Samples are derived once from the aggregated counts and are read-only
/// afterwards; they feed the per-move fits and the visualization output.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct RateSample {
    /// Rescaled evaluation score.
    pub score: f64,
    /// Move number.
    pub move_number: u32,
    /// Fraction of games won.
    pub win_rate: f64,
    /// Fraction of games drawn.
    pub draw_rate: f64,
    /// Fraction of games lost.
    pub loss_rate: f64,
}

impl RateSample {
    /// Computes one rate sample per coordinate in the union set.
    ///
    /// Samples come out in coordinate order (score-major).
    ///
    /// # Panics
    ///
    /// Panics if a coordinate carries a zero total count. That is
    /// unreachable through [`OutcomeCounts`] — a coordinate only exists in
    /// the union because at least one outcome observed it — so a panic
    /// here means an internal invariant was broken, not bad input data.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_counts(counts: &OutcomeCounts) -> Vec<Self> {
        counts
            .coordinates()
            .into_iter()
            .map(|coordinate| {
                let triple = counts.counts_at(coordinate);
                let total = triple.total();
                assert!(total > 0, "coordinate in union set with zero total count");
                let total = total as f64;
                Self {
                    score: coordinate.score.0,
                    move_number: coordinate.move_number,
                    win_rate: triple.win as f64 / total,
                    draw_rate: triple.draw as f64 / total,
                    loss_rate: triple.loss as f64 / total,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{ObservationKey, Outcome};

    fn entry(outcome: Outcome, move_number: i32, raw_score: i32, count: u64) -> (ObservationKey, u64) {
        (
            ObservationKey {
                outcome,
                move_number,
                material: 30,
                raw_score,
            },
            count,
        )
    }

    #[test]
    fn test_rates_sum_to_one() {
        let counts = OutcomeCounts::from_entries(
            vec![
                entry(Outcome::Win, 20, 50, 7),
                entry(Outcome::Draw, 20, 50, 11),
                entry(Outcome::Loss, 20, 50, 3),
                entry(Outcome::Win, 35, -120, 1),
                entry(Outcome::Loss, 35, -120, 6),
            ],
            328,
        );
        let samples = RateSample::from_counts(&counts);
        assert_eq!(samples.len(), 2);
        for sample in &samples {
            let sum = sample.win_rate + sample.draw_rate + sample.loss_rate;
            assert!((sum - 1.0).abs() < 1e-9, "rates sum to {sum}");
        }
    }

    #[test]
    fn test_rate_values() {
        let counts = OutcomeCounts::from_entries(
            vec![
                entry(Outcome::Win, 32, 0, 500),
                entry(Outcome::Loss, 32, 0, 500),
            ],
            328,
        );
        let samples = RateSample::from_counts(&counts);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].win_rate, 0.5);
        assert_eq!(samples[0].draw_rate, 0.0);
        assert_eq!(samples[0].loss_rate, 0.5);
        assert_eq!(samples[0].move_number, 32);
    }

    #[test]
    fn test_missing_outcomes_are_zero_rate() {
        let counts = OutcomeCounts::from_entries(vec![entry(Outcome::Draw, 60, 10, 42)], 328);
        let samples = RateSample::from_counts(&counts);
        assert_eq!(samples[0].draw_rate, 1.0);
        assert_eq!(samples[0].win_rate, 0.0);
        assert_eq!(samples[0].loss_rate, 0.0);
    }
}
