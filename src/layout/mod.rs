//! Layout engine: renders every system into a [`SystemGraphic`] and stacks
//! the results vertically.
//!
//! Two phases:
//!
//! 1. **Render**: `0..N` is cut into contiguous ranges by [`partition`].
//!    Each worker runs on a scoped thread and writes only into its own
//!    `split_at_mut` slice of a pre-sized output vector. All workers are
//!    joined before the next phase starts.
//! 2. **Stack**: the fully populated output is walked in index order and
//!    each graphic is placed at the running height ([`StackedLayout::stack`]).
//!
//! The stacked result depends only on the systems and the view, never on
//! the worker count.

mod partition;
pub mod reflow;
mod stack;

use std::ops::Range;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::config::{LayoutConfig, WorkerCount};
use crate::error::LayoutError;
use crate::model::ViewType;
use crate::renderer::{RenderSystem, SystemGraphic, SystemRenderer};
use crate::system::System;

pub use partition::partition;
pub use reflow::IncrementalUpdater;
pub use stack::{PlacedSystem, StackedLayout};

type Slot = Option<Arc<SystemGraphic>>;

/// Parallel render + sequential stack.
#[derive(Debug, Clone)]
pub struct LayoutEngine<R = SystemRenderer> {
    renderer: R,
    workers: WorkerCount,
    spacing: f64,
}

impl LayoutEngine<SystemRenderer> {
    /// Engine using the built-in renderer with `config`'s metrics.
    pub fn new(config: &LayoutConfig) -> Self {
        Self::with_renderer(SystemRenderer::new(config.metrics), config)
    }
}

impl Default for LayoutEngine<SystemRenderer> {
    fn default() -> Self {
        Self::new(&LayoutConfig::default())
    }
}

impl<R: RenderSystem> LayoutEngine<R> {
    pub fn with_renderer(renderer: R, config: &LayoutConfig) -> Self {
        Self {
            renderer,
            workers: config.workers,
            spacing: config.system_spacing,
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn workers(&self) -> WorkerCount {
        self.workers
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Render and stack `systems`.
    ///
    /// Fails with the error of the lowest-indexed system that could not be
    /// rendered; no partial layout is ever returned.
    pub fn layout(&self, systems: &[System], view: ViewType) -> Result<StackedLayout, LayoutError> {
        if systems.is_empty() {
            return Ok(StackedLayout::stack(Vec::new(), self.spacing));
        }

        let started = Instant::now();
        let ranges = partition(systems.len(), self.workers.resolve());
        let graphics = self.render_all(systems, &ranges, view)?;
        let layout = StackedLayout::stack(graphics, self.spacing);

        tracing::debug!(
            systems = systems.len(),
            workers = ranges.len(),
            height = layout.total_height(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "layout complete"
        );
        Ok(layout)
    }

    /// Render a single system on one joined worker, so a renderer panic
    /// surfaces the same way it does from [`layout`](Self::layout).
    ///
    /// Panics if `index` is out of range.
    pub fn render_one(&self, systems: &[System], index: usize, view: ViewType) -> Result<Arc<SystemGraphic>, LayoutError> {
        assert!(index < systems.len(), "system index {index} out of range ({} systems)", systems.len());
        let mut graphics = self.render_all(systems, &[index..index + 1], view)?;
        graphics.pop().ok_or(LayoutError::WorkerPanicked { worker: 0 })
    }

    /// Incremental updater bound to this engine.
    pub fn incremental(&self) -> IncrementalUpdater<'_, R> {
        IncrementalUpdater::new(self)
    }

    /// Render every index in `ranges`, one scoped worker per range.
    ///
    /// Every worker is joined before returning, even a single one, so the
    /// outcome never depends on the worker count.
    fn render_all(
        &self,
        systems: &[System],
        ranges: &[Range<usize>],
        view: ViewType,
    ) -> Result<Vec<Arc<SystemGraphic>>, LayoutError> {
        let total: usize = ranges.iter().map(Range::len).sum();
        let mut slots: Vec<Slot> = vec![None; total];

        let renderer = &self.renderer;
        thread::scope(|scope| {
            let mut rest = slots.as_mut_slice();
            let mut handles = Vec::with_capacity(ranges.len());
            for range in ranges {
                let (chunk, tail) = std::mem::take(&mut rest).split_at_mut(range.len());
                rest = tail;
                let range = range.clone();
                handles.push(scope.spawn(move || render_range(renderer, systems, range, view, chunk)));
            }
            debug_assert!(rest.is_empty(), "partition left indices unassigned");

            // Join every worker before reporting, first failure in worker order wins.
            let mut first_error = None;
            for (worker, handle) in handles.into_iter().enumerate() {
                let outcome = handle
                    .join()
                    .unwrap_or(Err(LayoutError::WorkerPanicked { worker }));
                if let Err(err) = outcome {
                    first_error.get_or_insert(err);
                }
            }
            first_error.map_or(Ok(()), Err)
        })?;

        let graphics: Vec<Arc<SystemGraphic>> = slots.into_iter().flatten().collect();
        debug_assert_eq!(graphics.len(), total);
        Ok(graphics)
    }
}

fn render_range<R: RenderSystem>(
    renderer: &R,
    systems: &[System],
    range: Range<usize>,
    view: ViewType,
    out: &mut [Slot],
) -> Result<(), LayoutError> {
    debug_assert_eq!(range.len(), out.len());
    for (slot, index) in out.iter_mut().zip(range) {
        let graphic = renderer
            .render(&systems[index], index, view)
            .map_err(|source| LayoutError::Render { index, source })?;
        *slot = Some(Arc::new(graphic));
    }
    Ok(())
}
