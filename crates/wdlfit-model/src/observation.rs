//! Observation keys of the raw game statistics.
//!
//! The input statistics file maps tuple-like key strings of the form
//! `"('W', 81, 59, 107)"` — outcome letter, move number, material count,
//! raw score — to occurrence counts. The keys are decoded by an explicit
//! typed parser with strict validation; arbitrary expressions are never
//! evaluated.
//!
//! Malformed keys are fatal: parsing happens before aggregation and a
//! single bad key aborts the run with a [`ParseKeyError`] naming the key.

use std::str::FromStr;

/// Game outcome from the point of view of the side the score refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Decodes the single-letter outcome used in observation keys.
    #[must_use]
    pub fn from_letter(letter: &str) -> Option<Self> {
        match letter {
            "W" => Some(Self::Win),
            "D" => Some(Self::Draw),
            "L" => Some(Self::Loss),
            _ => None,
        }
    }
}

/// Structured key of one raw observation.
///
/// Material is carried through parsing for validation but is not part of
/// the aggregation key: observations differing only in material are summed
/// together downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationKey {
    /// Game outcome.
    pub outcome: Outcome,
    /// Move number at which the observation was taken. May be negative in
    /// malformed datasets; range filtering happens during aggregation.
    pub move_number: i32,
    /// Material count on the board. Parsed and validated, then ignored.
    pub material: i32,
    /// Evaluation score in raw (external) units.
    pub raw_score: i32,
}

/// Failure to decode an observation key string.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseKeyError {
    /// The key is not a parenthesised tuple.
    #[display("observation key {key:?} is not a parenthesised tuple")]
    Malformed {
        /// The offending key string.
        key: String,
    },
    /// The key does not have exactly four fields.
    #[display("observation key {key:?} has {count} fields, expected 4")]
    FieldCount {
        /// The offending key string.
        key: String,
        /// Number of fields found.
        count: usize,
    },
    /// The outcome field is not a quoted `W`, `D` or `L`.
    #[display("unknown outcome {field:?} in observation key {key:?}")]
    UnknownOutcome {
        /// The offending key string.
        key: String,
        /// The outcome field as written.
        field: String,
    },
    /// A numeric field does not parse as an integer.
    #[display("invalid integer {field:?} in observation key {key:?}")]
    InvalidInteger {
        /// The offending key string.
        key: String,
        /// The field that failed to parse.
        field: String,
    },
}

impl FromStr for ObservationKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let inner = s
            .trim()
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ParseKeyError::Malformed { key: s.to_string() })?;

        let fields: Vec<&str> = inner.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            return Err(ParseKeyError::FieldCount {
                key: s.to_string(),
                count: fields.len(),
            });
        }

        let outcome = unquote(fields[0])
            .and_then(Outcome::from_letter)
            .ok_or_else(|| ParseKeyError::UnknownOutcome {
                key: s.to_string(),
                field: fields[0].to_string(),
            })?;

        Ok(Self {
            outcome,
            move_number: parse_integer(fields[1], s)?,
            material: parse_integer(fields[2], s)?,
            raw_score: parse_integer(fields[3], s)?,
        })
    }
}

fn unquote(field: &str) -> Option<&str> {
    field
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .or_else(|| field.strip_prefix('"').and_then(|rest| rest.strip_suffix('"')))
}

fn parse_integer(field: &str, key: &str) -> Result<i32, ParseKeyError> {
    field.parse().map_err(|_| ParseKeyError::InvalidInteger {
        key: key.to_string(),
        field: field.to_string(),
    })
}

/// Parses a collection of `(key string, count)` entries.
///
/// Fails on the first malformed key; the error carries the key text for
/// diagnostics.
///
/// # Examples
///
/// ```
/// use wdlfit_model::observation::{Outcome, parse_entries};
///
/// let entries = parse_entries(vec![("('W', 12, 34, -56)", 7)]).unwrap();
/// assert_eq!(entries[0].0.outcome, Outcome::Win);
/// assert_eq!(entries[0].0.raw_score, -56);
/// assert_eq!(entries[0].1, 7);
/// ```
pub fn parse_entries<'a, I>(entries: I) -> Result<Vec<(ObservationKey, u64)>, ParseKeyError>
where
    I: IntoIterator<Item = (&'a str, u64)>,
{
    entries
        .into_iter()
        .map(|(key, count)| key.parse().map(|parsed| (parsed, count)))
        .collect()
}
