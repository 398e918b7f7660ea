use super::responses::ValidatedResponses;
use crate::instrument::{LIKERT_MAX, LIKERT_MIN};
use serde::{Deserialize, Serialize};

/// Items where agreement indicates a morning preference.
pub const MORNING_ITEMS: [&str; 4] = ["A8", "A13", "A14", "A15"];
/// Items where agreement indicates an evening preference.
pub const EVENING_ITEMS: [&str; 2] = ["A9", "A16"];

const STRONG_BALANCE: f64 = 0.5;
const MILD_BALANCE: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChronotypeCategory {
    StrongMorning,
    MildMorning,
    Neutral,
    MildEvening,
    StrongEvening,
}

impl ChronotypeCategory {
    pub fn from_balance(balance: f64) -> Self {
        if balance <= -STRONG_BALANCE {
            Self::StrongMorning
        } else if balance < -MILD_BALANCE {
            Self::MildMorning
        } else if balance <= MILD_BALANCE {
            Self::Neutral
        } else if balance < STRONG_BALANCE {
            Self::MildEvening
        } else {
            Self::StrongEvening
        }
    }

    pub const fn interpretation(self) -> &'static str {
        match self {
            Self::StrongMorning => "Ausgeprägter Morgentyp",
            Self::MildMorning => "Leichter Morgentyp",
            Self::Neutral => "Neutral (kein ausgeprägter Chronotyp)",
            Self::MildEvening => "Leichter Abendtyp",
            Self::StrongEvening => "Ausgeprägter Abendtyp",
        }
    }
}

/// Morning/evening preference, independent of the six main dimensions.
///
/// `balance_score` runs from -1.0 (all morning items maximal, all evening
/// items minimal) to +1.0 (the opposite pattern); 0.0 is balanced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChronotypeResult {
    pub balance_score: f64,
    pub category: ChronotypeCategory,
    pub interpretation: String,
    pub morning_mean: f64,
    pub evening_mean: f64,
}

pub fn compute_chronotype_index(responses: &ValidatedResponses) -> ChronotypeResult {
    let midpoint = f64::from(LIKERT_MIN + LIKERT_MAX) / 2.0;
    let morning_mean = responses.mean_of(MORNING_ITEMS).unwrap_or(midpoint);
    let evening_mean = responses.mean_of(EVENING_ITEMS).unwrap_or(midpoint);

    let span = f64::from(LIKERT_MAX - LIKERT_MIN);
    let balance_score = ((evening_mean - morning_mean) / span).clamp(-1.0, 1.0);
    let category = ChronotypeCategory::from_balance(balance_score);

    ChronotypeResult {
        balance_score,
        category,
        interpretation: category.interpretation().to_string(),
        morning_mean,
        evening_mean,
    }
}
