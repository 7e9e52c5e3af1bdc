//! Last-reported screen bounds for every table object.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::game::entities::{BuildId, Card, StackId};

/// Type tag on a reported position.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContactKind {
    Card,
    Build,
    TempStack,
}

/// Semantic payload behind a contact, resolved ids only.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ContactData {
    Card { card: Card },
    Build { build_id: BuildId },
    Stack { stack_id: StackId },
}

/// The last known screen rectangle and payload for one table object.
/// Created, updated, and removed in lockstep with the object it
/// describes.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ContactKind,
    pub data: ContactData,
}

impl ContactPosition {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Owned, injectable position store with scoped lifetime per match or
/// screen (deliberately not process-wide). Last write wins per id; a
/// monotonic sequence records report recency for the resolver's
/// tie-break. Reads tolerate concurrent reports from in-flight drags.
#[derive(Debug, Default)]
pub struct PositionRegistry {
    entries: RwLock<HashMap<String, (u64, ContactPosition)>>,
    next_seq: AtomicU64,
}

impl PositionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert the bounds for `id`. Called on mount and on every layout
    /// change.
    pub fn report(&self, position: ContactPosition) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut entries = self.entries.write().expect("position registry poisoned");
        entries.insert(position.id.clone(), (seq, position));
    }

    /// Drop the entry for `id`, if any. Called on unmount.
    pub fn remove(&self, id: &str) {
        let mut entries = self.entries.write().expect("position registry poisoned");
        entries.remove(id);
    }

    /// Empty the table, for stack/build teardown and full game reset.
    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("position registry poisoned");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .expect("position registry poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<ContactPosition> {
        self.entries
            .read()
            .expect("position registry poisoned")
            .get(id)
            .map(|(_, position)| position.clone())
    }

    /// Snapshot of (recency sequence, position) pairs for the resolver.
    pub(crate) fn snapshot(&self) -> Vec<(u64, ContactPosition)> {
        self.entries
            .read()
            .expect("position registry poisoned")
            .values()
            .cloned()
            .collect()
    }
}
