use super::responses::{Likert, RawRating, ResponseMap, ValidatedResponses};
use crate::instrument::{item_registry, LIKERT_MAX, LIKERT_MIN};
use serde::Serialize;
use std::collections::BTreeMap;

/// Coarse failure class, for callers that branch on the kind of defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationKind {
    Completeness,
    Type,
    Range,
}

/// Fatal defects in a response map. Scoring never starts when one is raised.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("Fehlende Items ({}): {}", .codes.len(), .codes.join(", "))]
    MissingItems { codes: Vec<String> },
    #[error("Unbekannte Items ({}): {}", .codes.len(), .codes.join(", "))]
    UnknownItems { codes: Vec<String> },
    #[error("Rating für Item {code} ist kein int (gefunden: {found})")]
    WrongType { code: String, found: String },
    #[error("Rating {value} für Item {code} liegt außerhalb des erlaubten Bereichs {min}-{max}", min = LIKERT_MIN, max = LIKERT_MAX)]
    OutOfRange { code: String, value: i128 },
}

impl ValidationError {
    pub fn kind(&self) -> ValidationKind {
        match self {
            ValidationError::MissingItems { .. } | ValidationError::UnknownItems { .. } => {
                ValidationKind::Completeness
            }
            ValidationError::WrongType { .. } => ValidationKind::Type,
            ValidationError::OutOfRange { .. } => ValidationKind::Range,
        }
    }
}

/// Every defect found in a response map, grouped by class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub missing: Vec<String>,
    pub unknown: Vec<String>,
    pub wrong_type: Vec<(String, String)>,
    pub out_of_range: Vec<(String, i128)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
            && self.unknown.is_empty()
            && self.wrong_type.is_empty()
            && self.out_of_range.is_empty()
    }

    /// One error per defect class, in check order.
    pub fn errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        if !self.missing.is_empty() {
            errors.push(ValidationError::MissingItems {
                codes: self.missing.clone(),
            });
        }
        if !self.unknown.is_empty() {
            errors.push(ValidationError::UnknownItems {
                codes: self.unknown.clone(),
            });
        }
        if let Some((code, found)) = self.wrong_type.first() {
            errors.push(ValidationError::WrongType {
                code: code.clone(),
                found: found.clone(),
            });
        }
        if let Some((code, value)) = self.out_of_range.first() {
            errors.push(ValidationError::OutOfRange {
                code: code.clone(),
                value: *value,
            });
        }
        errors
    }

    pub fn first_error(&self) -> Option<ValidationError> {
        self.errors().into_iter().next()
    }
}

/// Collects all completeness, type, and range defects without stopping.
pub fn audit_ratings(responses: &ResponseMap) -> ValidationReport {
    inspect(responses).0
}

/// Checks a response map and returns the typed answer set.
///
/// Fails with the first defect class found, in the order missing items,
/// unknown items, non-integral ratings, out-of-range ratings.
pub fn validate_ratings(responses: &ResponseMap) -> Result<ValidatedResponses, ValidationError> {
    let (report, ratings) = inspect(responses);
    match report.first_error() {
        Some(error) => Err(error),
        None => Ok(ValidatedResponses::new(ratings)),
    }
}

/// One pass over the registry: every defect goes into the report, every
/// well-formed rating into the typed map.
fn inspect(responses: &ResponseMap) -> (ValidationReport, BTreeMap<&'static str, Likert>) {
    let registry = item_registry();
    let mut report = ValidationReport {
        unknown: responses
            .keys()
            .filter(|code| !registry.contains(code))
            .cloned()
            .collect(),
        ..ValidationReport::default()
    };
    let mut ratings = BTreeMap::new();

    for code in registry.codes() {
        match responses.get(code) {
            Some(RawRating::Integer(value)) => match Likert::from_wide(*value) {
                Some(rating) => {
                    ratings.insert(code, rating);
                }
                None => report.out_of_range.push((code.to_string(), *value)),
            },
            Some(other) => report
                .wrong_type
                .push((code.to_string(), other.to_string())),
            None => report.missing.push(code.to_string()),
        }
    }

    (report, ratings)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_responses() -> ResponseMap {
        item_registry()
            .codes()
            .map(|code| (code.to_string(), RawRating::Integer(3)))
            .collect()
    }

    #[test]
    fn complete_map_passes() {
        let validated = validate_ratings(&neutral_responses()).expect("valid map");
        assert_eq!(validated.len(), item_registry().total_items());
    }

    #[test]
    fn missing_item_is_named() {
        let mut responses = neutral_responses();
        responses.remove("R13");
        let err = validate_ratings(&responses).expect_err("missing item");
        assert_eq!(
            err,
            ValidationError::MissingItems {
                codes: vec!["R13".to_string()]
            }
        );
        assert_eq!(err.kind(), ValidationKind::Completeness);
        assert!(err.to_string().contains("Fehlende Items"));
        assert!(err.to_string().contains("R13"));
    }

    #[test]
    fn unknown_item_is_named() {
        let mut responses = neutral_responses();
        responses.insert("XXX".to_string(), RawRating::Integer(3));
        let err = validate_ratings(&responses).expect_err("unknown item");
        assert!(matches!(err, ValidationError::UnknownItems { ref codes } if codes == &["XXX"]));
        assert!(err.to_string().contains("Unbekannte Items"));
    }

    #[test]
    fn numeric_string_is_a_type_error() {
        let mut responses = neutral_responses();
        responses.insert("A1".to_string(), RawRating::from("3"));
        let err = validate_ratings(&responses).expect_err("string rating");
        assert_eq!(err.kind(), ValidationKind::Type);
        assert!(err.to_string().contains("kein int"));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn decimal_and_boolean_are_type_errors() {
        let mut responses = neutral_responses();
        responses.insert("S4".to_string(), RawRating::Decimal(3.0));
        assert_eq!(
            validate_ratings(&responses).expect_err("decimal").kind(),
            ValidationKind::Type
        );

        let mut responses = neutral_responses();
        responses.insert("S4".to_string(), RawRating::Flag(true));
        assert_eq!(
            validate_ratings(&responses).expect_err("bool").kind(),
            ValidationKind::Type
        );
    }

    #[test]
    fn out_of_range_value_names_bounds() {
        let mut responses = neutral_responses();
        responses.insert("E5".to_string(), RawRating::Integer(6));
        let err = validate_ratings(&responses).expect_err("out of range");
        assert_eq!(
            err,
            ValidationError::OutOfRange {
                code: "E5".to_string(),
                value: 6
            }
        );
        let message = err.to_string();
        assert!(message.contains("außerhalb des erlaubten Bereichs"));
        assert!(message.contains("1-5"));
    }

    #[test]
    fn integers_wider_than_i64_are_range_errors() {
        let mut responses = neutral_responses();
        responses.insert("A1".to_string(), RawRating::Integer(i128::from(u64::MAX)));
        let err = validate_ratings(&responses).expect_err("out of range");
        assert_eq!(err.kind(), ValidationKind::Range);
        assert!(err.to_string().contains("18446744073709551615"));
        assert!(err.to_string().contains("A1"));
    }

    #[test]
    fn nested_json_rating_is_a_type_error() {
        let mut responses = neutral_responses();
        responses.insert("A1".to_string(), RawRating::Other(serde_json::json!([3])));
        let err = validate_ratings(&responses).expect_err("array rating");
        assert_eq!(
            err,
            ValidationError::WrongType {
                code: "A1".to_string(),
                found: "[3]".to_string()
            }
        );
    }

    #[test]
    fn audit_collects_every_defect_class() {
        let mut responses = neutral_responses();
        responses.remove("A1");
        responses.insert("ZZ9".to_string(), RawRating::Integer(2));
        responses.insert("K2".to_string(), RawRating::Null);
        responses.insert("M4".to_string(), RawRating::Integer(0));

        let report = audit_ratings(&responses);
        assert!(!report.is_valid());
        assert_eq!(report.missing, vec!["A1".to_string()]);
        assert_eq!(report.unknown, vec!["ZZ9".to_string()]);
        assert_eq!(report.wrong_type, vec![("K2".to_string(), "null".to_string())]);
        assert_eq!(report.out_of_range, vec![("M4".to_string(), 0)]);

        let kinds: Vec<_> = report.errors().iter().map(ValidationError::kind).collect();
        assert_eq!(
            kinds,
            vec![
                ValidationKind::Completeness,
                ValidationKind::Completeness,
                ValidationKind::Type,
                ValidationKind::Range
            ]
        );
    }

    #[test]
    fn missing_items_take_precedence_over_type_errors() {
        let mut responses = neutral_responses();
        responses.remove("A2");
        responses.insert("A3".to_string(), RawRating::from("drei"));
        let err = validate_ratings(&responses).expect_err("defective map");
        assert!(matches!(err, ValidationError::MissingItems { .. }));
    }
}
