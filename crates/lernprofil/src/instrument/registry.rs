use super::domain::{Dimension, DimensionCode, ItemDefinition};
use std::collections::HashMap;
use std::sync::OnceLock;

use super::domain::Dimension::{Attention, Executive, Motivation, Regulation, Sensory, Social};
use super::domain::DimensionCode::{Chronotype, MotivationAvoidance};

const fn item(code: &'static str, dimension: Dimension) -> ItemDefinition {
    ItemDefinition::main(code, dimension)
}

const fn rev(code: &'static str, dimension: Dimension) -> ItemDefinition {
    ItemDefinition::reversed(code, dimension)
}

const fn aux(code: &'static str, tag: DimensionCode) -> ItemDefinition {
    ItemDefinition::auxiliary(code, tag)
}

/// Instrument layout in questionnaire order.
static INSTRUMENT_ITEMS: [ItemDefinition; 88] = [
    // Section A: attention, with the chronotype block embedded
    item("A1", Attention),
    item("A2", Attention),
    rev("A3", Attention),
    item("A4", Attention),
    item("A5", Attention),
    rev("A6", Attention),
    item("A7", Attention),
    aux("A8", Chronotype),
    aux("A9", Chronotype),
    item("A10", Attention),
    rev("A11", Attention),
    item("A12", Attention),
    aux("A13", Chronotype),
    aux("A14", Chronotype),
    aux("A15", Chronotype),
    aux("A16", Chronotype),
    item("A17", Attention),
    rev("A18", Attention),
    item("A19", Attention),
    rev("A20", Attention),
    // Section S: sensory processing
    item("S1", Sensory),
    rev("S2", Sensory),
    item("S3", Sensory),
    item("S4", Sensory),
    rev("S5", Sensory),
    item("S6", Sensory),
    item("S7", Sensory),
    item("S8", Sensory),
    rev("S9", Sensory),
    item("S10", Sensory),
    item("S11", Sensory),
    rev("S12", Sensory),
    item("S13", Sensory),
    // Section K: social learning
    item("K1", Social),
    item("K2", Social),
    rev("K3", Social),
    rev("K4", Social),
    item("K5", Social),
    item("K6", Social),
    item("K7", Social),
    rev("K8", Social),
    item("K9", Social),
    item("K10", Social),
    rev("K11", Social),
    item("K12", Social),
    rev("K13", Social),
    // Section E: executive functions
    item("E1", Executive),
    rev("E2", Executive),
    item("E3", Executive),
    item("E4", Executive),
    item("E5", Executive),
    item("E6", Executive),
    rev("E7", Executive),
    item("E8", Executive),
    item("E9", Executive),
    rev("E10", Executive),
    item("E11", Executive),
    item("E12", Executive),
    rev("E13", Executive),
    item("E14", Executive),
    // Section M: motivation, closing with the avoidance pair
    item("M1", Motivation),
    item("M2", Motivation),
    rev("M3", Motivation),
    item("M4", Motivation),
    item("M5", Motivation),
    rev("M6", Motivation),
    item("M7", Motivation),
    item("M8", Motivation),
    rev("M9", Motivation),
    item("M10", Motivation),
    item("M11", Motivation),
    rev("M12", Motivation),
    item("M13", Motivation),
    aux("M14", MotivationAvoidance),
    aux("M15", MotivationAvoidance),
    // Section R: self-regulation
    item("R1", Regulation),
    rev("R2", Regulation),
    item("R3", Regulation),
    rev("R4", Regulation),
    item("R5", Regulation),
    item("R6", Regulation),
    rev("R7", Regulation),
    item("R8", Regulation),
    item("R9", Regulation),
    rev("R10", Regulation),
    item("R11", Regulation),
    item("R12", Regulation),
    rev("R13", Regulation),
];

/// Read-only view over the instrument definition.
///
/// Counts that other components report (total items, reverse items, ...)
/// are derived here so a revised instrument only changes the table above.
#[derive(Debug)]
pub struct ItemRegistry {
    items: &'static [ItemDefinition],
    index: HashMap<&'static str, usize>,
}

/// Shared registry, built on first access.
pub fn item_registry() -> &'static ItemRegistry {
    static REGISTRY: OnceLock<ItemRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| ItemRegistry::from_items(&INSTRUMENT_ITEMS))
}

impl ItemRegistry {
    fn from_items(items: &'static [ItemDefinition]) -> Self {
        let index = items
            .iter()
            .enumerate()
            .map(|(position, item)| (item.code, position))
            .collect();
        Self { items, index }
    }

    /// All items in questionnaire order.
    pub fn items(&self) -> &[ItemDefinition] {
        self.items
    }

    pub fn get(&self, code: &str) -> Option<&ItemDefinition> {
        self.index.get(code).map(|&position| &self.items[position])
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn codes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.items.iter().map(|item| item.code)
    }

    pub fn total_items(&self) -> usize {
        self.items.len()
    }

    pub fn main_scale_items(&self) -> impl Iterator<Item = &ItemDefinition> + '_ {
        self.items.iter().filter(|item| item.include_in_main_scale)
    }

    pub fn auxiliary_items(&self) -> impl Iterator<Item = &ItemDefinition> + '_ {
        self.items.iter().filter(|item| !item.include_in_main_scale)
    }

    pub fn main_scale_count(&self) -> usize {
        self.main_scale_items().count()
    }

    pub fn auxiliary_count(&self) -> usize {
        self.auxiliary_items().count()
    }

    /// Main-scale items feeding `dimension`, in questionnaire order.
    pub fn dimension_items(&self, dimension: Dimension) -> Vec<&ItemDefinition> {
        self.main_scale_items()
            .filter(|item| item.dimension_code.dimension() == Some(dimension))
            .collect()
    }

    /// Items carrying `tag`, regardless of main-scale membership.
    pub fn tagged_items(&self, tag: DimensionCode) -> Vec<&ItemDefinition> {
        self.items
            .iter()
            .filter(|item| item.dimension_code == tag)
            .collect()
    }

    pub fn reversed_in(&self, dimension: Dimension) -> usize {
        self.dimension_items(dimension)
            .into_iter()
            .filter(|item| item.reverse_scored)
            .count()
    }

    /// Reverse-scored items across the six main dimensions.
    pub fn reversed_total(&self) -> usize {
        self.main_scale_items()
            .filter(|item| item.reverse_scored)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique() {
        let registry = item_registry();
        let unique: HashSet<_> = registry.codes().collect();
        assert_eq!(unique.len(), registry.total_items());
    }

    #[test]
    fn lookup_by_code_returns_definition() {
        let registry = item_registry();
        let item = registry.get("M6").expect("M6 registered");
        assert_eq!(item.dimension_code, DimensionCode::Motivation);
        assert!(item.reverse_scored);
        assert!(item.include_in_main_scale);
        assert!(registry.get("Z1").is_none());
    }

    #[test]
    fn per_dimension_reverse_counts_add_up() {
        let registry = item_registry();
        let per_dimension: usize = Dimension::ordered()
            .into_iter()
            .map(|dimension| registry.reversed_in(dimension))
            .sum();
        assert_eq!(per_dimension, registry.reversed_total());
    }

    #[test]
    fn auxiliary_items_never_feed_a_dimension() {
        let registry = item_registry();
        assert!(registry
            .auxiliary_items()
            .all(|item| item.scored_dimension().is_none()));
        assert_eq!(registry.tagged_items(Chronotype).len(), 6);
        assert_eq!(registry.tagged_items(MotivationAvoidance).len(), 2);
    }
}
