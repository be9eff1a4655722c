//! The document the score area displays: the score, the logical caret and
//! the selected view.

use serde::{Deserialize, Serialize};

use crate::model::{ScoreLocation, ViewType};
use crate::pubsub::NotificationChannel;
use crate::system::System;

/// An ordered sequence of systems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    systems: Vec<System>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn systems(&self) -> &[System] {
        &self.systems
    }

    pub fn system(&self, index: usize) -> Option<&System> {
        self.systems.get(index)
    }

    pub fn system_mut(&mut self, index: usize) -> Option<&mut System> {
        self.systems.get_mut(index)
    }

    pub fn push_system(&mut self, system: System) {
        self.systems.push(system);
    }

    /// Insert a system before `index`. Panics if `index > len`.
    pub fn insert_system(&mut self, index: usize, system: System) {
        self.systems.insert(index, system);
    }

    /// Remove and return the system at `index`. Panics if out of range.
    pub fn remove_system(&mut self, index: usize) -> System {
        self.systems.remove(index)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

impl From<Vec<System>> for Score {
    fn from(systems: Vec<System>) -> Self {
        Self { systems }
    }
}

/// The logical edit position.
///
/// Every move is announced on [`Caret::moved`]; selection changes made by
/// clicking a staff are announced on [`Caret::selection_changed`].
#[derive(Debug, Default)]
pub struct Caret {
    location: ScoreLocation,
    moved: NotificationChannel<ScoreLocation>,
    selection_changed: NotificationChannel<ScoreLocation>,
}

impl Caret {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn location(&self) -> ScoreLocation {
        self.location
    }

    pub fn system_index(&self) -> usize {
        self.location.system_index
    }

    /// Move to `location` and notify movement subscribers.
    pub fn move_to(&mut self, location: ScoreLocation) {
        self.location = location;
        self.moved.publish(&self.location);
    }

    /// Move to the start of another system.
    pub fn move_to_system(&mut self, system_index: usize) {
        self.move_to(ScoreLocation::new(system_index, 0, 0));
    }

    /// Shift the position by `delta`, stopping at 0.
    pub fn move_position(&mut self, delta: i32) {
        let mut location = self.location;
        location.position = location.position.saturating_add(delta).max(0);
        self.move_to(location);
    }

    pub fn moved(&self) -> &NotificationChannel<ScoreLocation> {
        &self.moved
    }

    pub fn selection_changed(&self) -> &NotificationChannel<ScoreLocation> {
        &self.selection_changed
    }
}

/// A score plus its editing state.
#[derive(Debug, Default)]
pub struct Document {
    pub score: Score,
    pub caret: Caret,
    pub view_type: ViewType,
}

impl Document {
    pub fn new(score: Score) -> Self {
        Self {
            score,
            caret: Caret::new(),
            view_type: ViewType::default(),
        }
    }
}
