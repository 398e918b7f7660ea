//! Profile scoring engine: validation, reverse-coding, aggregation, indices.
//!
//! Every function here is a pure computation over one respondent's answers.

mod avoidance;
mod chronotype;
mod dimensions;
mod profile;
mod quality;
mod responses;
mod reverse;
mod validation;

pub use avoidance::{compute_avoidance_index, AvoidanceResult};
pub use chronotype::{
    compute_chronotype_index, ChronotypeCategory, ChronotypeResult, EVENING_ITEMS, MORNING_ITEMS,
};
pub use dimensions::{
    classify_score, score_dimension, score_dimensions, Classification, DimensionScore,
    HIGH_THRESHOLD, MEDIUM_THRESHOLD,
};
pub use profile::{
    compute_profile, compute_profile_at, AdditionalIndices, Profile, ProfileMeta,
    DEFAULT_PROFILE_ID, ENGINE_VERSION,
};
pub use quality::{check_response_quality, QualityFlag, QualityResult, QUALITY_WARN_STRAIGHT};
pub use responses::{
    likert_to_percent, Likert, LikertRangeError, RawRating, ResponseMap, ValidatedResponses,
};
pub use reverse::reverse_likert;
pub use validation::{
    audit_ratings, validate_ratings, ValidationError, ValidationKind, ValidationReport,
};
