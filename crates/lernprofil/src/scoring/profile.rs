use super::avoidance::{compute_avoidance_index, AvoidanceResult};
use super::chronotype::{compute_chronotype_index, ChronotypeResult};
use super::dimensions::{score_dimensions, DimensionScore};
use super::quality::{check_response_quality, QualityResult};
use super::responses::ResponseMap;
use super::validation::{validate_ratings, ValidationError};
use crate::instrument::{item_registry, Dimension};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Version tag stamped into every profile's metadata.
pub const ENGINE_VERSION: &str = "0.2.1";
/// Identifier used when the caller does not supply one.
pub const DEFAULT_PROFILE_ID: &str = "anonymous";

/// Run metadata; the item counts come from the registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub version: String,
    pub profile_id: String,
    pub timestamp: DateTime<Utc>,
    pub num_items_instrument: usize,
    pub num_items_answered: usize,
    pub num_items_main_scales: usize,
    pub num_items_additional: usize,
    pub num_reversed_total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalIndices {
    pub chronotype: ChronotypeResult,
    pub motivation_avoidance: AvoidanceResult,
}

/// Complete scoring result for one respondent.
///
/// Field names form the document contract consumed by the report renderers
/// and persisted as `profil.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub profile_id: String,
    pub meta: ProfileMeta,
    pub dimensions: BTreeMap<Dimension, DimensionScore>,
    pub additional_indices: AdditionalIndices,
    pub response_quality: QualityResult,
}

impl Profile {
    pub fn dimension(&self, dimension: Dimension) -> Option<&DimensionScore> {
        self.dimensions.get(&dimension)
    }
}

/// Validates `responses` and assembles the full profile, stamped with the current time.
pub fn compute_profile(
    responses: &ResponseMap,
    profile_id: Option<&str>,
) -> Result<Profile, ValidationError> {
    compute_profile_at(responses, profile_id, Utc::now())
}

/// Same as [`compute_profile`] with an explicit timestamp.
pub fn compute_profile_at(
    responses: &ResponseMap,
    profile_id: Option<&str>,
    timestamp: DateTime<Utc>,
) -> Result<Profile, ValidationError> {
    let validated = validate_ratings(responses)?;

    let dimensions = score_dimensions(&validated);
    let chronotype = compute_chronotype_index(&validated);
    let motivation_avoidance = compute_avoidance_index(&validated);
    let response_quality = check_response_quality(&validated);

    let registry = item_registry();
    let profile_id = profile_id.unwrap_or(DEFAULT_PROFILE_ID).to_string();
    let meta = ProfileMeta {
        version: ENGINE_VERSION.to_string(),
        profile_id: profile_id.clone(),
        timestamp,
        num_items_instrument: registry.total_items(),
        num_items_answered: validated.len(),
        num_items_main_scales: registry.main_scale_count(),
        num_items_additional: registry.auxiliary_count(),
        num_reversed_total: registry.reversed_total(),
    };

    debug!(
        %profile_id,
        quality = response_quality.quality_flag.label(),
        chronotype = chronotype.balance_score,
        "profile assembled"
    );

    Ok(Profile {
        profile_id,
        meta,
        dimensions,
        additional_indices: AdditionalIndices {
            chronotype,
            motivation_avoidance,
        },
        response_quality,
    })
}
