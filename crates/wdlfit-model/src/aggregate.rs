//! Aggregation of raw observations into per-outcome count tables.
//!
//! Aggregation is a pure fold over `(key, count)` entries: entries outside
//! the representative score/move window are dropped, surviving scores are
//! rescaled to internal units, and counts are accumulated into three
//! immutable per-outcome tables keyed by [`Coordinate`]. The fold is
//! order-independent, so the tables do not depend on input ordering.
//!
//! Material is not part of the key: observations that differ only in
//! material land on the same coordinate and are summed.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::observation::{ObservationKey, Outcome};

/// Largest absolute raw score retained by aggregation.
///
/// Larger scores are considered unrepresentative (near-decided games) and
/// are dropped silently.
pub const MAX_ABS_RAW_SCORE: i32 = 400;

/// Half-open range of move numbers retained by aggregation.
///
/// Move 119 is the last retained move; 120 and above, like negative moves,
/// belong to very long endgames considered unrepresentative.
pub const MOVE_RANGE: std::ops::Range<i32> = 0..120;

/// Evaluation score rescaled to internal units, usable as an ordered key.
///
/// Wraps the rescaled `f64` with a total order (`f64::total_cmp`) so
/// coordinates can key `BTreeMap`s and come out sorted and de-duplicated.
#[derive(Debug, Clone, Copy)]
pub struct InternalScore(pub f64);

impl PartialEq for InternalScore {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0).is_eq()
    }
}

impl Eq for InternalScore {}

impl PartialOrd for InternalScore {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for InternalScore {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// A rescaled (score, move) coordinate.
///
/// The derived ordering is score-major, which is the order the rate
/// samples and the visualization data are produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Coordinate {
    /// Rescaled evaluation score.
    pub score: InternalScore,
    /// Move number, within [`MOVE_RANGE`].
    pub move_number: u32,
}

/// Win/draw/loss counts at one coordinate.
///
/// For every coordinate present in the union of the three tables at least
/// one of the counts is non-zero; a coordinate with all-zero counts cannot
/// exist by construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CountTriple {
    pub win: u64,
    pub draw: u64,
    pub loss: u64,
}

impl CountTriple {
    /// Total number of games behind this coordinate.
    #[must_use]
    pub fn total(self) -> u64 {
        self.win + self.draw + self.loss
    }
}

/// Per-outcome count tables produced by aggregation.
#[derive(Debug, Clone, Default)]
pub struct OutcomeCounts {
    win: BTreeMap<Coordinate, u64>,
    draw: BTreeMap<Coordinate, u64>,
    loss: BTreeMap<Coordinate, u64>,
}

impl OutcomeCounts {
    /// Folds raw entries into per-outcome count tables.
    ///
    /// Entries with `|raw_score| > 400` or a move number outside
    /// [`MOVE_RANGE`] are dropped. Surviving scores are rescaled by
    /// `norm_factor / 100` into internal units.
    ///
    /// # Arguments
    ///
    /// * `entries` - Parsed `(key, count)` observations
    /// * `norm_factor` - Score rescaling constant (the prior normalization
    ///   value; 328 by default upstream)
    ///
    /// # Examples
    ///
    /// ```
    /// use wdlfit_model::{aggregate::OutcomeCounts, observation::parse_entries};
    ///
    /// let entries = parse_entries(vec![
    ///     ("('W', 32, 40, 100)", 3),
    ///     ("('W', 32, 58, 100)", 2), // same coordinate, different material
    ///     ("('L', 32, 58, 100)", 1),
    /// ])
    /// .unwrap();
    /// let counts = OutcomeCounts::from_entries(entries, 328);
    ///
    /// let coordinate = *counts.coordinates().first().unwrap();
    /// assert!((coordinate.score.0 - 328.0).abs() < 1e-9);
    /// assert_eq!(counts.counts_at(coordinate).win, 5);
    /// assert_eq!(counts.counts_at(coordinate).loss, 1);
    /// ```
    #[expect(clippy::cast_sign_loss)]
    #[must_use]
    pub fn from_entries<I>(entries: I, norm_factor: u32) -> Self
    where
        I: IntoIterator<Item = (ObservationKey, u64)>,
    {
        let rescale = f64::from(norm_factor) / 100.0;
        entries
            .into_iter()
            .fold(Self::default(), |mut counts, (key, count)| {
                if key.raw_score.abs() > MAX_ABS_RAW_SCORE || !MOVE_RANGE.contains(&key.move_number)
                {
                    return counts;
                }
                let coordinate = Coordinate {
                    score: InternalScore(f64::from(key.raw_score) * rescale),
                    move_number: key.move_number as u32,
                };
                let table = match key.outcome {
                    Outcome::Win => &mut counts.win,
                    Outcome::Draw => &mut counts.draw,
                    Outcome::Loss => &mut counts.loss,
                };
                *table.entry(coordinate).or_insert(0) += count;
                counts
            })
    }

    /// The sorted, de-duplicated union of coordinates across the three
    /// tables.
    #[must_use]
    pub fn coordinates(&self) -> BTreeSet<Coordinate> {
        self.win
            .keys()
            .chain(self.draw.keys())
            .chain(self.loss.keys())
            .copied()
            .collect()
    }

    /// Counts at one coordinate; zero for outcomes with no observations
    /// there.
    #[must_use]
    pub fn counts_at(&self, coordinate: Coordinate) -> CountTriple {
        CountTriple {
            win: self.win.get(&coordinate).copied().unwrap_or(0),
            draw: self.draw.get(&coordinate).copied().unwrap_or(0),
            loss: self.loss.get(&coordinate).copied().unwrap_or(0),
        }
    }

    /// Total retained counts per outcome, after filtering.
    #[must_use]
    pub fn retained(&self) -> CountTriple {
        CountTriple {
            win: self.win.values().sum(),
            draw: self.draw.values().sum(),
            loss: self.loss.values().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::parse_entries;

    fn key(outcome: Outcome, move_number: i32, raw_score: i32) -> ObservationKey {
        ObservationKey {
            outcome,
            move_number,
            material: 58,
            raw_score,
        }
    }

    #[test]
    fn test_score_boundaries() {
        let entries = vec![
            (key(Outcome::Win, 30, 400), 1),
            (key(Outcome::Win, 30, 401), 1),
            (key(Outcome::Win, 30, -400), 1),
            (key(Outcome::Win, 30, -401), 1),
        ];
        let counts = OutcomeCounts::from_entries(entries, 328);
        assert_eq!(counts.retained().win, 2);
        assert_eq!(counts.coordinates().len(), 2);
    }

    #[test]
    fn test_move_boundaries() {
        let entries = vec![
            (key(Outcome::Draw, -1, 0), 1),
            (key(Outcome::Draw, 0, 0), 1),
            (key(Outcome::Draw, 119, 0), 1),
            (key(Outcome::Draw, 120, 0), 1),
        ];
        let counts = OutcomeCounts::from_entries(entries, 328);
        assert_eq!(counts.retained().draw, 2);
        let moves: Vec<u32> = counts
            .coordinates()
            .iter()
            .map(|c| c.move_number)
            .collect();
        assert_eq!(moves, vec![0, 119]);
    }

    #[test]
    fn test_filtering_is_monotonic() {
        let entries = vec![
            (key(Outcome::Win, 30, 100), 5),
            (key(Outcome::Loss, 30, 100), 3),
            (key(Outcome::Win, 150, 100), 7), // dropped
        ];
        let total_raw: u64 = entries.iter().map(|(_, count)| *count).sum();
        let counts = OutcomeCounts::from_entries(entries, 328);
        assert!(counts.retained().total() <= total_raw);
        assert_eq!(counts.retained().total(), 8);
    }

    #[test]
    fn test_no_filtering_retains_everything() {
        let entries = vec![
            (key(Outcome::Win, 30, 100), 5),
            (key(Outcome::Draw, 40, -200), 3),
        ];
        let total_raw: u64 = entries.iter().map(|(_, count)| *count).sum();
        let counts = OutcomeCounts::from_entries(entries, 328);
        assert_eq!(counts.retained().total(), total_raw);
    }

    #[test]
    fn test_material_is_summed_out() {
        let entries = parse_entries(vec![
            ("('W', 32, 20, 50)", 2),
            ("('W', 32, 78, 50)", 3),
        ])
        .unwrap();
        let counts = OutcomeCounts::from_entries(entries, 328);
        let coordinates = counts.coordinates();
        assert_eq!(coordinates.len(), 1);
        assert_eq!(counts.counts_at(*coordinates.first().unwrap()).win, 5);
    }

    #[test]
    fn test_rescaling() {
        let entries = vec![(key(Outcome::Win, 10, -250), 1)];
        let counts = OutcomeCounts::from_entries(entries, 328);
        let coordinate = *counts.coordinates().first().unwrap();
        assert!((coordinate.score.0 - (-250.0 * 3.28)).abs() < 1e-12);
    }

    #[test]
    fn test_coordinates_sorted_score_major() {
        let entries = vec![
            (key(Outcome::Win, 50, 100), 1),
            (key(Outcome::Win, 10, 100), 1),
            (key(Outcome::Win, 10, -100), 1),
        ];
        let counts = OutcomeCounts::from_entries(entries, 328);
        let ordered: Vec<(i64, u32)> = counts
            .coordinates()
            .iter()
            .map(|c| (c.score.0.round() as i64, c.move_number))
            .collect();
        assert_eq!(ordered, vec![(-328, 10), (328, 10), (328, 50)]);
    }
}
