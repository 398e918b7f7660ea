use super::responses::{likert_to_percent, mean, ValidatedResponses};
use super::reverse::coded_value;
use crate::instrument::{item_registry, Dimension, LIKERT_MAX, LIKERT_MIN};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lower bound of the "mittel" band on the 0-100 scale.
pub const MEDIUM_THRESHOLD: f64 = 40.0;
/// Lower bound of the "hoch" band on the 0-100 scale.
pub const HIGH_THRESHOLD: f64 = 75.0;

/// Qualitative band for a 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Niedrig,
    Mittel,
    Hoch,
}

impl Classification {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Niedrig => "niedrig",
            Self::Mittel => "mittel",
            Self::Hoch => "hoch",
        }
    }
}

/// Bands are half-open at the bottom: 40.0 is "mittel", 75.0 is "hoch".
pub fn classify_score(score: f64) -> Classification {
    if score >= HIGH_THRESHOLD {
        Classification::Hoch
    } else if score >= MEDIUM_THRESHOLD {
        Classification::Mittel
    } else {
        Classification::Niedrig
    }
}

/// Normalized result for one main dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionScore {
    pub label: String,
    pub score: f64,
    pub raw_mean: f64,
    pub classification: Classification,
    pub num_items: usize,
    pub num_reversed: usize,
}

/// Scores a single dimension from its own main-scale items only.
pub fn score_dimension(responses: &ValidatedResponses, dimension: Dimension) -> DimensionScore {
    let items = item_registry().dimension_items(dimension);
    let values: Vec<f64> = items
        .iter()
        .filter_map(|item| {
            responses
                .rating(item.code)
                .map(|rating| coded_value(rating, item.reverse_scored).as_f64())
        })
        .collect();

    // Validated input always covers every item; the midpoint only guards an empty subset.
    let midpoint = f64::from(LIKERT_MIN + LIKERT_MAX) / 2.0;
    let raw_mean = mean(&values).unwrap_or(midpoint);
    let score = likert_to_percent(raw_mean);

    DimensionScore {
        label: dimension.label().to_string(),
        score,
        raw_mean,
        classification: classify_score(score),
        num_items: items.len(),
        num_reversed: items.iter().filter(|item| item.reverse_scored).count(),
    }
}

/// Scores all six dimensions, keyed in instrument order.
pub fn score_dimensions(responses: &ValidatedResponses) -> BTreeMap<Dimension, DimensionScore> {
    Dimension::ordered()
        .into_iter()
        .map(|dimension| (dimension, score_dimension(responses, dimension)))
        .collect()
}
