//! Scoring engine and supporting services for the Lernenergie questionnaire.
//!
//! [`scoring::compute_profile`] is the entry point: it validates one
//! respondent's answers against the [`instrument`] registry and returns a
//! [`scoring::Profile`] with six dimension scores, the chronotype and
//! motivation-avoidance indices, and a response-quality annotation.

pub mod config;
pub mod error;
pub mod ingest;
pub mod instrument;
pub mod report;
pub mod scoring;
pub mod self_check;
pub mod telemetry;
