//! Read-only nearest-contact query over the position registry.

use super::registry::{ContactPosition, PositionRegistry};

/// Distance (in pixels) within which a release point still touches an
/// object.
pub const DEFAULT_CONTACT_THRESHOLD: f64 = 60.0;

/// A resolved contact and how far the release point was from its center.
#[derive(Clone, Debug, PartialEq)]
pub struct Contact {
    pub position: ContactPosition,
    pub distance: f64,
}

/// The contact with minimum Euclidean distance from `(x, y)` to its
/// center, restricted to contacts within `threshold`. Ties go to the
/// most recently reported entry, which makes the result deterministic
/// under overlapping bounds. Never mutates the registry.
pub fn find_contact_at_point(
    registry: &PositionRegistry,
    x: f64,
    y: f64,
    threshold: f64,
) -> Option<Contact> {
    let mut best: Option<(f64, u64, ContactPosition)> = None;
    for (seq, position) in registry.snapshot() {
        let (cx, cy) = position.center();
        let distance = ((x - cx).powi(2) + (y - cy).powi(2)).sqrt();
        if distance > threshold {
            continue;
        }
        let closer = match &best {
            None => true,
            Some((best_distance, best_seq, _)) => {
                distance < *best_distance || (distance == *best_distance && seq > *best_seq)
            }
        };
        if closer {
            best = Some((distance, seq, position));
        }
    }
    best.map(|(distance, _, position)| Contact { position, distance })
}
