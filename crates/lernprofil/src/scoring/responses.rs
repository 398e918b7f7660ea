use crate::instrument::{LIKERT_MAX, LIKERT_MIN};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rating exactly as supplied by the caller, before any type or range check.
///
/// JSON and CSV sources can carry anything in the rating slot, so the
/// variants keep non-integral input around long enough for the validator to
/// name it instead of silently coercing it. Integers are held as `i128` so
/// values past `i64` still read as integers and fail the range check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRating {
    #[serde(deserialize_with = "wide_integer")]
    Integer(i128),
    Decimal(f64),
    Flag(bool),
    Text(String),
    Null,
    /// Arrays, objects, and anything else JSON can hold.
    Other(serde_json::Value),
}

fn wide_integer<'de, D>(deserializer: D) -> Result<i128, D::Error>
where
    D: Deserializer<'de>,
{
    struct WideInteger;

    impl<'de> Visitor<'de> for WideInteger {
        type Value = i128;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i128, E> {
            Ok(i128::from(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i128, E> {
            Ok(i128::from(value))
        }

        fn visit_i128<E: de::Error>(self, value: i128) -> Result<i128, E> {
            Ok(value)
        }

        fn visit_u128<E: de::Error>(self, value: u128) -> Result<i128, E> {
            i128::try_from(value).map_err(|_| E::invalid_value(de::Unexpected::Other("u128"), &self))
        }
    }

    deserializer.deserialize_any(WideInteger)
}

impl fmt::Display for RawRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawRating::Integer(value) => write!(f, "{value}"),
            RawRating::Decimal(value) => write!(f, "{value}"),
            RawRating::Flag(value) => write!(f, "{value}"),
            RawRating::Text(value) => write!(f, "\"{value}\""),
            RawRating::Null => f.write_str("null"),
            RawRating::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for RawRating {
    fn from(value: i64) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<u8> for RawRating {
    fn from(value: u8) -> Self {
        Self::Integer(i128::from(value))
    }
}

impl From<f64> for RawRating {
    fn from(value: f64) -> Self {
        Self::Decimal(value)
    }
}

impl From<&str> for RawRating {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Item code to raw rating, one entry per answered item.
pub type ResponseMap = BTreeMap<String, RawRating>;

/// A rating known to lie on the 1-5 Likert scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Likert(u8);

impl Likert {
    pub fn new(value: i64) -> Result<Self, LikertRangeError> {
        if (i64::from(LIKERT_MIN)..=i64::from(LIKERT_MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(LikertRangeError { value })
        }
    }

    /// Like [`Likert::new`] for integers of any width.
    pub fn from_wide(value: i128) -> Option<Self> {
        i64::try_from(value).ok().and_then(|value| Self::new(value).ok())
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// Reverse-coded counterpart: `6 - value`, with 3 as the fixed point.
    pub const fn reversed(self) -> Self {
        Self(LIKERT_MIN + LIKERT_MAX - self.0)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Likert-Wert {value} liegt außerhalb des erlaubten Bereichs {min}-{max}", min = LIKERT_MIN, max = LIKERT_MAX)]
pub struct LikertRangeError {
    pub value: i64,
}

/// Complete, type- and range-checked answer set for one respondent.
///
/// Only the validator constructs this, so holding one proves every registry
/// code is present exactly once with a rating in [1,5].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedResponses {
    ratings: BTreeMap<&'static str, Likert>,
}

impl ValidatedResponses {
    pub(crate) fn new(ratings: BTreeMap<&'static str, Likert>) -> Self {
        Self { ratings }
    }

    pub fn rating(&self, code: &str) -> Option<Likert> {
        self.ratings.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Likert)> + '_ {
        self.ratings.iter().map(|(code, rating)| (*code, *rating))
    }

    /// Arithmetic mean of the raw ratings for `codes` that are present.
    pub(crate) fn mean_of<'a, I>(&self, codes: I) -> Option<f64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let values: Vec<f64> = codes
            .into_iter()
            .filter_map(|code| self.rating(code))
            .map(Likert::as_f64)
            .collect();
        mean(&values)
    }
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Linear projection of a 1-5 mean onto 0-100.
pub fn likert_to_percent(mean: f64) -> f64 {
    let min = f64::from(LIKERT_MIN);
    let span = f64::from(LIKERT_MAX - LIKERT_MIN);
    (mean - min) / span * 100.0
}
