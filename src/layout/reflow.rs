//! Incremental re-layout after a single system was edited.
//!
//! Only the edited system is re-rendered. Its offset is derived from the
//! previous system's bottom edge, and every later system is shifted to
//! follow. Systems before the edited index keep both their graphic (the
//! same `Arc`) and their offset.

use std::ops::Range;
use std::sync::Arc;

use super::{LayoutEngine, StackedLayout};
use crate::error::LayoutError;
use crate::model::ViewType;
use crate::renderer::{RenderSystem, SystemGraphic};
use crate::system::System;

impl StackedLayout {
    /// Replace the graphic at `index` and reflow `index..len`.
    ///
    /// Returns the range of systems whose placement was recomputed.
    /// Panics if `index` is out of range.
    pub fn replace_system(&mut self, index: usize, graphic: Arc<SystemGraphic>) -> Range<usize> {
        debug_assert!(index < self.systems.len(), "system index {index} out of range");

        self.systems[index].graphic = graphic;
        let mut top = match index {
            0 => 0.0,
            _ => self.systems[index - 1].bottom() + self.spacing,
        };

        for placed in &mut self.systems[index..] {
            placed.offset = top;
            top = placed.bottom() + self.spacing;
        }
        index..self.systems.len()
    }
}

/// Re-renders one system and reflows the layout suffix.
#[derive(Debug)]
pub struct IncrementalUpdater<'e, R> {
    engine: &'e LayoutEngine<R>,
}

impl<'e, R: RenderSystem> IncrementalUpdater<'e, R> {
    pub fn new(engine: &'e LayoutEngine<R>) -> Self {
        Self { engine }
    }

    /// Re-render `systems[index]` into `layout`.
    ///
    /// On a render failure the layout is left exactly as it was.
    pub fn update(
        &self,
        layout: &mut StackedLayout,
        systems: &[System],
        index: usize,
        view: ViewType,
    ) -> Result<Range<usize>, LayoutError> {
        debug_assert_eq!(layout.len(), systems.len(), "layout is stale");
        let graphic = self.engine.render_one(systems, index, view)?;
        let moved = layout.replace_system(index, graphic);
        tracing::debug!(index, reflowed = moved.len(), "system redrawn");
        Ok(moved)
    }
}
