use chrono::{TimeZone, Utc};
use lernprofil::instrument::{item_registry, Dimension, DimensionCode, LIKERT_MAX, LIKERT_MIN};
use lernprofil::scoring::{
    compute_chronotype_index, compute_profile, compute_profile_at, check_response_quality,
    validate_ratings, Classification, QualityFlag, RawRating, ResponseMap, ValidationError,
    DEFAULT_PROFILE_ID, QUALITY_WARN_STRAIGHT,
};

fn uniform_responses(value: u8) -> ResponseMap {
    item_registry()
        .codes()
        .map(|code| (code.to_string(), RawRating::from(value)))
        .collect()
}

/// Ratings chosen so every item reads `high` or `low` once reverse-coded.
fn extreme_responses(high: bool) -> ResponseMap {
    item_registry()
        .items()
        .iter()
        .map(|item| {
            let value = match (high, item.reverse_scored) {
                (true, false) | (false, true) => LIKERT_MAX,
                (true, true) | (false, false) => LIKERT_MIN,
            };
            (item.code.to_string(), RawRating::from(value))
        })
        .collect()
}

fn set(responses: &mut ResponseMap, codes: &[&str], value: u8) {
    for code in codes {
        responses.insert((*code).to_string(), RawRating::from(value));
    }
}

#[test]
fn all_minimum_answers_score_zero() {
    let profile = compute_profile(&extreme_responses(false), Some("low_profile"))
        .expect("profile computes");
    assert_eq!(profile.dimensions.len(), 6);
    for (dimension, score) in &profile.dimensions {
        assert!(
            score.score.abs() < 0.05,
            "{dimension} should be 0, got {}",
            score.score
        );
        assert_eq!(score.classification, Classification::Niedrig);
    }
}

#[test]
fn all_maximum_answers_score_hundred() {
    let profile = compute_profile(&extreme_responses(true), Some("high_profile"))
        .expect("profile computes");
    for (dimension, score) in &profile.dimensions {
        assert!(
            (score.score - 100.0).abs() < 0.05,
            "{dimension} should be 100, got {}",
            score.score
        );
        assert_eq!(score.classification, Classification::Hoch);
    }
}

#[test]
fn neutral_answers_land_mid_scale_and_get_flagged() {
    let profile = compute_profile(&uniform_responses(3), None).expect("profile computes");

    for score in profile.dimensions.values() {
        assert!((score.score - 50.0).abs() < 1e-9);
        assert_eq!(score.classification, Classification::Mittel);
    }

    let chronotype = &profile.additional_indices.chronotype;
    assert!(chronotype.balance_score.abs() < 1e-9);
    assert!(chronotype.interpretation.contains("Neutral"));

    let quality = &profile.response_quality;
    assert_eq!(quality.num_unique_responses, 1);
    assert_eq!(quality.quality_flag, QualityFlag::Check);
    assert_eq!(
        quality.warnings.as_deref(),
        Some(&[QUALITY_WARN_STRAIGHT.to_string()][..])
    );
}

#[test]
fn rotating_answers_pass_quality_check() {
    let responses: ResponseMap = item_registry()
        .codes()
        .enumerate()
        .map(|(index, code)| (code.to_string(), RawRating::from((index % 5) as u8 + 1)))
        .collect();
    let validated = validate_ratings(&responses).expect("valid responses");
    let quality = check_response_quality(&validated);
    assert_eq!(quality.num_unique_responses, 5);
    assert_eq!(quality.quality_flag, QualityFlag::Ok);
    assert!(quality.warnings.is_none());
}

#[test]
fn manipulating_attention_leaves_other_dimensions_neutral() {
    let mut responses = uniform_responses(3);
    for item in item_registry().dimension_items(Dimension::Attention) {
        let value = if item.reverse_scored { LIKERT_MIN } else { LIKERT_MAX };
        responses.insert(item.code.to_string(), RawRating::from(value));
    }

    let profile = compute_profile(&responses, None).expect("profile computes");
    let attention = profile
        .dimension(Dimension::Attention)
        .expect("attention scored");
    assert!(attention.score > 90.0, "attention at {}", attention.score);

    for dimension in [
        Dimension::Sensory,
        Dimension::Social,
        Dimension::Executive,
        Dimension::Motivation,
        Dimension::Regulation,
    ] {
        let score = profile.dimension(dimension).expect("dimension scored").score;
        assert!(
            (score - 50.0).abs() <= 10.0,
            "{dimension} should stay neutral, got {score}"
        );
    }
}

#[test]
fn auxiliary_items_do_not_move_main_dimensions() {
    let mut responses = uniform_responses(3);
    for item in item_registry().auxiliary_items() {
        responses.insert(item.code.to_string(), RawRating::from(LIKERT_MAX));
    }

    let profile = compute_profile(&responses, None).expect("profile computes");
    assert!(profile
        .dimensions
        .values()
        .all(|score| (score.score - 50.0).abs() < 1e-9));
    assert!((profile.additional_indices.motivation_avoidance.score - 100.0).abs() < 1e-9);
    assert_eq!(
        profile.additional_indices.motivation_avoidance.classification,
        Classification::Hoch
    );
}

#[test]
fn clear_morning_type_scores_strongly_negative() {
    let mut responses = uniform_responses(3);
    set(&mut responses, &["A8", "A13", "A14", "A15"], 5);
    set(&mut responses, &["A9", "A16"], 1);

    let validated = validate_ratings(&responses).expect("valid responses");
    let chronotype = compute_chronotype_index(&validated);
    assert!(chronotype.balance_score < -0.8);
    assert!(chronotype.interpretation.contains("Morgentyp"));
}

#[test]
fn clear_evening_type_scores_strongly_positive() {
    let mut responses = uniform_responses(3);
    set(&mut responses, &["A8", "A13", "A14", "A15"], 1);
    set(&mut responses, &["A9", "A16"], 5);

    let validated = validate_ratings(&responses).expect("valid responses");
    let chronotype = compute_chronotype_index(&validated);
    assert!(chronotype.balance_score > 0.8);
    assert!(chronotype.interpretation.contains("Abendtyp"));
}

#[test]
fn chronotype_ignores_main_scale_items() {
    let mut responses = uniform_responses(5);
    for item in item_registry().tagged_items(DimensionCode::Chronotype) {
        responses.insert(item.code.to_string(), RawRating::from(3u8));
    }
    let validated = validate_ratings(&responses).expect("valid responses");
    assert!(compute_chronotype_index(&validated).balance_score.abs() < 1e-9);
}

#[test]
fn profile_metadata_matches_registry() {
    let timestamp = Utc
        .with_ymd_and_hms(2025, 11, 3, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    let profile = compute_profile_at(&uniform_responses(3), Some("Profil_2025_01"), timestamp)
        .expect("profile computes");

    let meta = &profile.meta;
    assert_eq!(meta.version, "0.2.1");
    assert_eq!(meta.profile_id, "Profil_2025_01");
    assert_eq!(meta.timestamp, timestamp);
    assert_eq!(meta.num_items_instrument, 88);
    assert_eq!(meta.num_items_answered, 88);
    assert_eq!(meta.num_items_main_scales, 80);
    assert_eq!(meta.num_items_additional, 8);
    assert_eq!(meta.num_reversed_total, 27);
}

#[test]
fn profile_id_defaults_to_placeholder() {
    let profile = compute_profile(&uniform_responses(4), None).expect("profile computes");
    assert_eq!(profile.profile_id, DEFAULT_PROFILE_ID);
    assert_eq!(profile.meta.profile_id, DEFAULT_PROFILE_ID);
}

#[test]
fn validation_failure_propagates_unchanged() {
    let mut responses = uniform_responses(3);
    responses.remove("K7");
    let err = compute_profile(&responses, None).expect_err("incomplete map rejected");
    assert_eq!(
        err,
        ValidationError::MissingItems {
            codes: vec!["K7".to_string()]
        }
    );
}

#[test]
fn profile_document_keeps_stable_keys() {
    let profile = compute_profile(&uniform_responses(3), Some("keys")).expect("profile computes");
    let document = serde_json::to_value(&profile).expect("profile serializes");

    for key in [
        "profile_id",
        "meta",
        "dimensions",
        "additional_indices",
        "response_quality",
    ] {
        assert!(document.get(key).is_some(), "missing top-level key {key}");
    }
    assert_eq!(document["dimensions"]["attention"]["classification"], "mittel");
    assert_eq!(document["dimensions"]["attention"]["score"], 50.0);
    assert_eq!(document["additional_indices"]["chronotype"]["balance_score"], 0.0);
    assert!(document["additional_indices"]["motivation_avoidance"]["score"].is_number());
    assert_eq!(document["response_quality"]["quality_flag"], "check");
    assert_eq!(document["meta"]["num_reversed_total"], 27);

    let restored: lernprofil::scoring::Profile =
        serde_json::from_value(document).expect("profile deserializes");
    assert_eq!(restored, profile);
}
