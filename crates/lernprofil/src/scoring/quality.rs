use super::responses::ValidatedResponses;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Warning code attached when every item carries the same rating.
pub const QUALITY_WARN_STRAIGHT: &str = "straight_lining";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityFlag {
    Ok,
    Check,
}

impl QualityFlag {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Check => "check",
        }
    }
}

/// Heuristic response-pattern annotation. Never blocks scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityResult {
    pub num_unique_responses: usize,
    pub quality_flag: QualityFlag,
    pub warnings: Option<Vec<String>>,
}

pub fn check_response_quality(responses: &ValidatedResponses) -> QualityResult {
    let distinct: BTreeSet<_> = responses.iter().map(|(_, rating)| rating).collect();
    let num_unique_responses = distinct.len();

    if num_unique_responses == 1 {
        QualityResult {
            num_unique_responses,
            quality_flag: QualityFlag::Check,
            warnings: Some(vec![QUALITY_WARN_STRAIGHT.to_string()]),
        }
    } else {
        QualityResult {
            num_unique_responses,
            quality_flag: QualityFlag::Ok,
            warnings: None,
        }
    }
}
