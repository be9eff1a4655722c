//! Ordered containers keyed by an integer horizontal position.
//!
//! Barlines, tempo markers, alternate endings and tablature notes are all
//! stored in a [`PositionedCollection`], which keeps its elements sorted by
//! position at all times. Elements sharing a position keep their insertion
//! order.

use serde::{Deserialize, Serialize};

/// Anything anchored to a position index within a system.
pub trait Positioned {
    fn position(&self) -> i32;
}

/// A sequence of elements kept in ascending position order.
///
/// # Invariants
///
/// 1. `items` is non-decreasing by `position()` after every operation.
/// 2. Elements with equal positions appear in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<T>", into = "Vec<T>")]
#[serde(bound(serialize = "T: Clone + Serialize", deserialize = "T: Positioned + Deserialize<'de>"))]
pub struct PositionedCollection<T> {
    items: Vec<T>,
}

impl<T> Default for PositionedCollection<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> PositionedCollection<T> {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Read-only view over the live ordered sequence.
    pub fn range(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: Positioned> PositionedCollection<T> {
    /// Insert `item` after every element whose position is <= its own.
    pub fn insert(&mut self, item: T) {
        let position = item.position();
        let index = self.items.partition_point(|existing| existing.position() <= position);
        self.items.insert(index, item);
    }

    /// Last element at or before `position`.
    pub fn find_previous(&self, position: i32) -> Option<&T> {
        self.items.iter().rev().find(|item| item.position() <= position)
    }

    /// First element at or after `position`.
    pub fn find_next(&self, position: i32) -> Option<&T> {
        self.items.iter().find(|item| item.position() >= position)
    }

    /// First element exactly at `position`.
    pub fn find_at(&self, position: i32) -> Option<&T> {
        self.items.iter().find(|item| item.position() == position)
    }
}

impl<T: PartialEq> PositionedCollection<T> {
    /// Remove every element structurally equal to `item`.
    /// Returns the number of removed elements.
    pub fn remove(&mut self, item: &T) -> usize {
        let before = self.items.len();
        self.items.retain(|existing| existing != item);
        before - self.items.len()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T: Positioned> From<Vec<T>> for PositionedCollection<T> {
    /// Builds a collection from arbitrary input, restoring the sort order.
    fn from(mut items: Vec<T>) -> Self {
        // stable: equal positions keep their input order
        items.sort_by_key(|item| item.position());
        Self { items }
    }
}

impl<T> From<PositionedCollection<T>> for Vec<T> {
    fn from(collection: PositionedCollection<T>) -> Self {
        collection.items
    }
}

impl<T: Positioned> FromIterator<T> for PositionedCollection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<'a, T> IntoIterator for &'a PositionedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
