//! Tests for the position registry and nearest-contact resolution.

use cassino::contact::{
    ContactData, ContactKind, ContactPosition, DEFAULT_CONTACT_THRESHOLD, PositionRegistry,
    find_contact_at_point,
};
use cassino::game::entities::{Card, Suit};

/// A card-backed contact with the given top-left corner and a 40x60 box.
fn card_position(id: &str, x: f64, y: f64) -> ContactPosition {
    ContactPosition {
        id: id.to_string(),
        x,
        y,
        width: 40.0,
        height: 60.0,
        kind: ContactKind::Card,
        data: ContactData::Card {
            card: Card(5, Suit::Club),
        },
    }
}

#[test]
fn report_then_get_returns_last_bounds() {
    let registry = PositionRegistry::new();
    registry.report(card_position("card-1", 0.0, 0.0));

    let stored = registry.get("card-1").unwrap();
    assert_eq!(stored.x, 0.0);

    // Layout moved the card; last write wins.
    registry.report(card_position("card-1", 100.0, 20.0));
    let stored = registry.get("card-1").unwrap();
    assert_eq!(stored.x, 100.0);
    assert_eq!(registry.len(), 1);
}

#[test]
fn remove_and_clear_forget_entries() {
    let registry = PositionRegistry::new();
    registry.report(card_position("card-1", 0.0, 0.0));
    registry.report(card_position("card-2", 50.0, 0.0));

    registry.remove("card-1");
    assert!(registry.get("card-1").is_none());
    assert_eq!(registry.len(), 1);

    registry.clear();
    assert!(registry.is_empty());
}

#[test]
fn resolves_nearest_center_within_threshold() {
    let registry = PositionRegistry::new();
    // Centers at (20, 30) and (220, 30).
    registry.report(card_position("near", 0.0, 0.0));
    registry.report(card_position("far", 200.0, 0.0));

    let contact = find_contact_at_point(&registry, 30.0, 30.0, DEFAULT_CONTACT_THRESHOLD).unwrap();
    assert_eq!(contact.position.id, "near");
    assert_eq!(contact.distance, 10.0);
}

#[test]
fn no_contact_outside_threshold() {
    let registry = PositionRegistry::new();
    registry.report(card_position("card-1", 0.0, 0.0));

    // Center is (20, 30); a release 100px away misses.
    let contact = find_contact_at_point(&registry, 120.0, 30.0, DEFAULT_CONTACT_THRESHOLD);
    assert!(contact.is_none());
}

#[test]
fn empty_registry_resolves_nothing() {
    let registry = PositionRegistry::new();
    assert!(find_contact_at_point(&registry, 0.0, 0.0, DEFAULT_CONTACT_THRESHOLD).is_none());
}

#[test]
fn equidistant_tie_goes_to_most_recent_report() {
    let registry = PositionRegistry::new();
    // Identical bounds, so both centers are exactly the same distance.
    registry.report(card_position("older", 0.0, 0.0));
    registry.report(card_position("newer", 0.0, 0.0));

    let contact = find_contact_at_point(&registry, 20.0, 30.0, DEFAULT_CONTACT_THRESHOLD).unwrap();
    assert_eq!(contact.position.id, "newer");

    // Re-reporting flips recency.
    registry.report(card_position("older", 0.0, 0.0));
    let contact = find_contact_at_point(&registry, 20.0, 30.0, DEFAULT_CONTACT_THRESHOLD).unwrap();
    assert_eq!(contact.position.id, "older");
}

#[test]
fn exact_threshold_distance_still_hits() {
    let registry = PositionRegistry::new();
    registry.report(card_position("card-1", 0.0, 0.0));

    // Center (20, 30), release at (80, 30): distance exactly 60.
    let contact = find_contact_at_point(&registry, 80.0, 30.0, 60.0).unwrap();
    assert_eq!(contact.distance, 60.0);
}
