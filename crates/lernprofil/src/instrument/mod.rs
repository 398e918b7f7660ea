//! Static definition of the 88-item questionnaire.

mod domain;
mod registry;

pub use domain::{Dimension, DimensionCode, ItemDefinition, LIKERT_MAX, LIKERT_MIN};
pub use registry::{item_registry, ItemRegistry};
