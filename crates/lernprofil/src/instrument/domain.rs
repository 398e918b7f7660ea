use serde::{Deserialize, Serialize};
use std::fmt;

pub const LIKERT_MIN: u8 = 1;
pub const LIKERT_MAX: u8 = 5;

/// One of the six scored constructs of the main scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Attention,
    Sensory,
    Social,
    Executive,
    Motivation,
    Regulation,
}

impl Dimension {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Attention,
            Self::Sensory,
            Self::Social,
            Self::Executive,
            Self::Motivation,
            Self::Regulation,
        ]
    }

    pub const fn code(self) -> &'static str {
        match self {
            Self::Attention => "attention",
            Self::Sensory => "sensory",
            Self::Social => "social",
            Self::Executive => "executive",
            Self::Motivation => "motivation",
            Self::Regulation => "regulation",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Attention => "Aufmerksamkeit",
            Self::Sensory => "Sensorik",
            Self::Social => "Soziales",
            Self::Executive => "Exekutive Funktionen",
            Self::Motivation => "Motivation",
            Self::Regulation => "Regulation",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Scale tag carried by every item: a main dimension or an auxiliary index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionCode {
    Attention,
    Sensory,
    Social,
    Executive,
    Motivation,
    Regulation,
    Chronotype,
    MotivationAvoidance,
}

impl DimensionCode {
    pub const fn main(dimension: Dimension) -> Self {
        match dimension {
            Dimension::Attention => Self::Attention,
            Dimension::Sensory => Self::Sensory,
            Dimension::Social => Self::Social,
            Dimension::Executive => Self::Executive,
            Dimension::Motivation => Self::Motivation,
            Dimension::Regulation => Self::Regulation,
        }
    }

    /// The main dimension behind this tag, `None` for auxiliary indices.
    pub const fn dimension(self) -> Option<Dimension> {
        match self {
            Self::Attention => Some(Dimension::Attention),
            Self::Sensory => Some(Dimension::Sensory),
            Self::Social => Some(Dimension::Social),
            Self::Executive => Some(Dimension::Executive),
            Self::Motivation => Some(Dimension::Motivation),
            Self::Regulation => Some(Dimension::Regulation),
            Self::Chronotype | Self::MotivationAvoidance => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Chronotype => "chronotype",
            Self::MotivationAvoidance => "motivation_avoidance",
            Self::Attention => Dimension::Attention.code(),
            Self::Sensory => Dimension::Sensory.code(),
            Self::Social => Dimension::Social.code(),
            Self::Executive => Dimension::Executive.code(),
            Self::Motivation => Dimension::Motivation.code(),
            Self::Regulation => Dimension::Regulation.code(),
        }
    }
}

impl fmt::Display for DimensionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scoring metadata for a single questionnaire statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemDefinition {
    pub code: &'static str,
    pub dimension_code: DimensionCode,
    pub reverse_scored: bool,
    pub include_in_main_scale: bool,
}

impl ItemDefinition {
    pub(crate) const fn main(code: &'static str, dimension: Dimension) -> Self {
        Self {
            code,
            dimension_code: DimensionCode::main(dimension),
            reverse_scored: false,
            include_in_main_scale: true,
        }
    }

    pub(crate) const fn reversed(code: &'static str, dimension: Dimension) -> Self {
        Self {
            code,
            dimension_code: DimensionCode::main(dimension),
            reverse_scored: true,
            include_in_main_scale: true,
        }
    }

    pub(crate) const fn auxiliary(code: &'static str, tag: DimensionCode) -> Self {
        Self {
            code,
            dimension_code: tag,
            reverse_scored: false,
            include_in_main_scale: false,
        }
    }

    /// Main dimension this item feeds, if it belongs to the main scale.
    pub fn scored_dimension(&self) -> Option<Dimension> {
        if self.include_in_main_scale {
            self.dimension_code.dimension()
        } else {
            None
        }
    }
}
