use super::dimensions::{classify_score, Classification};
use super::responses::{likert_to_percent, ValidatedResponses};
use crate::instrument::{item_registry, DimensionCode, LIKERT_MAX, LIKERT_MIN};
use serde::{Deserialize, Serialize};

/// Avoidance-oriented motivation, scored outside the motivation dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvoidanceResult {
    pub score: f64,
    pub raw_mean: f64,
    pub classification: Classification,
    pub interpretation: String,
    pub num_items: usize,
}

fn interpretation(classification: Classification) -> &'static str {
    match classification {
        Classification::Niedrig => "Geringe Vermeidungsorientierung",
        Classification::Mittel => "Moderate Vermeidungsorientierung",
        Classification::Hoch => "Ausgeprägte Vermeidungsorientierung",
    }
}

pub fn compute_avoidance_index(responses: &ValidatedResponses) -> AvoidanceResult {
    let items = item_registry().tagged_items(DimensionCode::MotivationAvoidance);
    let midpoint = f64::from(LIKERT_MIN + LIKERT_MAX) / 2.0;
    let raw_mean = responses
        .mean_of(items.iter().map(|item| item.code))
        .unwrap_or(midpoint);
    let score = likert_to_percent(raw_mean);
    let classification = classify_score(score);

    AvoidanceResult {
        score,
        raw_mean,
        classification,
        interpretation: interpretation(classification).to_string(),
        num_items: items.len(),
    }
}
