use lernprofil::instrument::{item_registry, Dimension, DimensionCode};
use lernprofil::scoring::{EVENING_ITEMS, MORNING_ITEMS};

#[test]
fn instrument_has_expected_item_counts() {
    let registry = item_registry();
    assert_eq!(registry.items().len(), 88);
    assert_eq!(registry.total_items(), 88);
    assert_eq!(
        registry
            .items()
            .iter()
            .filter(|item| item.include_in_main_scale)
            .count(),
        80
    );
    assert_eq!(
        registry
            .items()
            .iter()
            .filter(|item| !item.include_in_main_scale)
            .count(),
        8
    );
    assert_eq!(registry.main_scale_count(), 80);
    assert_eq!(registry.auxiliary_count(), 8);
}

#[test]
fn main_scale_has_twenty_seven_reverse_items() {
    let registry = item_registry();
    let reverse_main = registry
        .items()
        .iter()
        .filter(|item| item.include_in_main_scale && item.reverse_scored)
        .count();
    assert_eq!(reverse_main, 27);
    assert_eq!(registry.reversed_total(), 27);
}

#[test]
fn motivation_has_at_least_four_reverse_items() {
    let registry = item_registry();
    let motivation_reverse = registry
        .items()
        .iter()
        .filter(|item| {
            item.dimension_code == DimensionCode::Motivation
                && item.include_in_main_scale
                && item.reverse_scored
        })
        .count();
    assert!(
        motivation_reverse >= 4,
        "motivation should carry at least four reverse items, found {motivation_reverse}"
    );
    assert_eq!(registry.reversed_in(Dimension::Motivation), motivation_reverse);
}

#[test]
fn every_dimension_has_items_and_reverse_items() {
    let registry = item_registry();
    for dimension in Dimension::ordered() {
        let items = registry.dimension_items(dimension);
        assert!(items.len() >= 10, "{dimension} has only {} items", items.len());
        assert!(registry.reversed_in(dimension) > 0, "{dimension} lacks reverse items");
    }
}

#[test]
fn chronotype_codes_are_registered_auxiliary_items() {
    let registry = item_registry();
    for code in MORNING_ITEMS.iter().chain(EVENING_ITEMS.iter()) {
        let item = registry.get(code).expect("chronotype item registered");
        assert_eq!(item.dimension_code, DimensionCode::Chronotype);
        assert!(!item.include_in_main_scale);
    }
}
