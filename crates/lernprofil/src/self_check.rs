//! Consistency checks over the instrument table and the scoring engine.
//!
//! Run by the `self-check` command and the `validate` session workflow so a
//! deployment can prove the engine still honours its scoring rules.

use crate::instrument::{item_registry, Dimension, LIKERT_MAX, LIKERT_MIN};
use crate::scoring::{
    classify_score, compute_chronotype_index, compute_profile, reverse_likert, validate_ratings,
    Classification, QualityFlag, RawRating, ResponseMap, ValidationKind, ENGINE_VERSION,
};
use std::fmt::Write;
use tracing::{debug, warn};

const EXPECTED_ITEMS: usize = 88;
const EXPECTED_MAIN_SCALE: usize = 80;
const EXPECTED_AUXILIARY: usize = 8;
const EXPECTED_REVERSED: usize = 27;
const SCORE_TOLERANCE: f64 = 0.05;

/// Result of one named check.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelfCheckReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl SelfCheckReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> + '_ {
        self.outcomes.iter().filter(|outcome| !outcome.passed)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        for outcome in &self.outcomes {
            let status = if outcome.passed { "OK" } else { "FEHLER" };
            let _ = match &outcome.detail {
                Some(detail) => writeln!(out, "[{status}] {}: {detail}", outcome.name),
                None => writeln!(out, "[{status}] {}", outcome.name),
            };
        }
        let failed = self.failures().count();
        let _ = writeln!(
            out,
            "\n{} von {} Prüfungen bestanden",
            self.outcomes.len() - failed,
            self.outcomes.len()
        );
        out
    }
}

type Check = fn() -> Result<(), String>;

const CHECKS: [(&str, Check); 8] = [
    ("registry_counts", registry_counts),
    ("reverse_coding", reverse_coding),
    ("classification_boundaries", classification_boundaries),
    ("extreme_profiles", extreme_profiles),
    ("neutral_profile", neutral_profile),
    ("chronotype_extremes", chronotype_extremes),
    ("validator_defects", validator_defects),
    ("profile_meta", profile_meta),
];

pub fn run_self_check() -> SelfCheckReport {
    let outcomes = CHECKS
        .iter()
        .map(|&(name, check)| {
            let result = check();
            match &result {
                Ok(()) => debug!(check = name, "self-check passed"),
                Err(detail) => warn!(check = name, %detail, "self-check failed"),
            }
            CheckOutcome {
                name,
                passed: result.is_ok(),
                detail: result.err(),
            }
        })
        .collect();

    SelfCheckReport { outcomes }
}

fn ensure(condition: bool, detail: impl FnOnce() -> String) -> Result<(), String> {
    if condition {
        Ok(())
    } else {
        Err(detail())
    }
}

fn uniform(value: u8) -> ResponseMap {
    item_registry()
        .codes()
        .map(|code| (code.to_string(), RawRating::from(value)))
        .collect()
}

fn extreme(high: bool) -> ResponseMap {
    item_registry()
        .items()
        .iter()
        .map(|item| {
            let value = if high != item.reverse_scored {
                LIKERT_MAX
            } else {
                LIKERT_MIN
            };
            (item.code.to_string(), RawRating::from(value))
        })
        .collect()
}

fn registry_counts() -> Result<(), String> {
    let registry = item_registry();
    let counts = [
        ("items", registry.total_items(), EXPECTED_ITEMS),
        ("main scale", registry.main_scale_count(), EXPECTED_MAIN_SCALE),
        ("auxiliary", registry.auxiliary_count(), EXPECTED_AUXILIARY),
        ("reversed", registry.reversed_total(), EXPECTED_REVERSED),
    ];
    for (what, actual, expected) in counts {
        ensure(actual == expected, || {
            format!("{what}: {actual} statt {expected}")
        })?;
    }
    let motivation = registry.reversed_in(Dimension::Motivation);
    ensure(motivation >= 4, || {
        format!("motivation hat nur {motivation} invertierte Items")
    })
}

fn reverse_coding() -> Result<(), String> {
    for value in i64::from(LIKERT_MIN)..=i64::from(LIKERT_MAX) {
        let reversed = reverse_likert(value).map_err(|err| err.to_string())?;
        let back = reverse_likert(i64::from(reversed)).map_err(|err| err.to_string())?;
        ensure(i64::from(back) == value, || {
            format!("{value} -> {reversed} -> {back}")
        })?;
    }
    for invalid in [0, 6] {
        ensure(reverse_likert(invalid).is_err(), || {
            format!("{invalid} wurde nicht abgelehnt")
        })?;
    }
    Ok(())
}

fn classification_boundaries() -> Result<(), String> {
    let expectations = [
        (0.0, Classification::Niedrig),
        (39.9, Classification::Niedrig),
        (40.0, Classification::Mittel),
        (74.9, Classification::Mittel),
        (75.0, Classification::Hoch),
        (100.0, Classification::Hoch),
    ];
    for (score, expected) in expectations {
        let actual = classify_score(score);
        ensure(actual == expected, || {
            format!("{score} -> {} statt {}", actual.label(), expected.label())
        })?;
    }
    Ok(())
}

fn extreme_profiles() -> Result<(), String> {
    for (high, target) in [(false, 0.0), (true, 100.0)] {
        let profile = compute_profile(&extreme(high), None).map_err(|err| err.to_string())?;
        for (dimension, score) in &profile.dimensions {
            ensure((score.score - target).abs() < SCORE_TOLERANCE, || {
                format!("{dimension}: {:.1} statt {target:.1}", score.score)
            })?;
        }
    }
    Ok(())
}

fn neutral_profile() -> Result<(), String> {
    let profile = compute_profile(&uniform(3), None).map_err(|err| err.to_string())?;
    for (dimension, score) in &profile.dimensions {
        ensure((score.score - 50.0).abs() < SCORE_TOLERANCE, || {
            format!("{dimension}: {:.1} statt 50.0", score.score)
        })?;
    }
    let quality = &profile.response_quality;
    ensure(quality.quality_flag == QualityFlag::Check, || {
        "Straight-Lining nicht erkannt".to_string()
    })?;
    ensure(
        profile.additional_indices.chronotype.balance_score.abs() < f64::EPSILON,
        || "Chronotyp nicht neutral".to_string(),
    )
}

fn chronotype_extremes() -> Result<(), String> {
    let pattern = |morning: u8, evening: u8| -> Result<f64, String> {
        let mut responses = uniform(3);
        for code in crate::scoring::MORNING_ITEMS {
            responses.insert(code.to_string(), RawRating::from(morning));
        }
        for code in crate::scoring::EVENING_ITEMS {
            responses.insert(code.to_string(), RawRating::from(evening));
        }
        let validated = validate_ratings(&responses).map_err(|err| err.to_string())?;
        Ok(compute_chronotype_index(&validated).balance_score)
    };

    let morning = pattern(LIKERT_MAX, LIKERT_MIN)?;
    ensure(morning < -0.8, || format!("Morgentyp ergibt {morning:+.2}"))?;
    let evening = pattern(LIKERT_MIN, LIKERT_MAX)?;
    ensure(evening > 0.8, || format!("Abendtyp ergibt {evening:+.2}"))
}

fn validator_defects() -> Result<(), String> {
    let mut missing = uniform(3);
    missing.remove("A1");
    let mut unknown = uniform(3);
    unknown.insert("Z99".to_string(), RawRating::from(3u8));
    let mut wrong_type = uniform(3);
    wrong_type.insert("S1".to_string(), RawRating::from(3.5));
    let mut out_of_range = uniform(3);
    out_of_range.insert("R1".to_string(), RawRating::from(6u8));

    let cases = [
        ("fehlendes Item", missing, ValidationKind::Completeness),
        ("unbekanntes Item", unknown, ValidationKind::Completeness),
        ("Dezimalwert", wrong_type, ValidationKind::Type),
        ("Wert 6", out_of_range, ValidationKind::Range),
    ];
    for (label, responses, expected) in cases {
        match validate_ratings(&responses) {
            Ok(_) => return Err(format!("{label} wurde akzeptiert")),
            Err(err) => ensure(err.kind() == expected, || {
                format!("{label}: falsche Fehlerklasse ({err})")
            })?,
        }
    }
    Ok(())
}

fn profile_meta() -> Result<(), String> {
    let profile = compute_profile(&uniform(4), Some("self_check")).map_err(|err| err.to_string())?;
    let meta = &profile.meta;
    ensure(meta.version == ENGINE_VERSION, || {
        format!("Version {}", meta.version)
    })?;
    ensure(
        meta.num_items_instrument == EXPECTED_ITEMS
            && meta.num_items_answered == EXPECTED_ITEMS
            && meta.num_items_main_scales == EXPECTED_MAIN_SCALE
            && meta.num_items_additional == EXPECTED_AUXILIARY
            && meta.num_reversed_total == EXPECTED_REVERSED,
        || format!("inkonsistente Metadaten: {meta:?}"),
    )
}
