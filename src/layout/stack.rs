//! Vertical stacking of rendered systems.

use std::sync::Arc;

use crate::geometry::{Point, Rect};
use crate::renderer::SystemGraphic;

/// A rendered system placed at `(0, offset)` in the stacked layout.
#[derive(Debug, Clone)]
pub struct PlacedSystem {
    pub(super) graphic: Arc<SystemGraphic>,
    pub(super) offset: f64,
}

impl PlacedSystem {
    pub fn graphic(&self) -> &Arc<SystemGraphic> {
        &self.graphic
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn position(&self) -> Point {
        Point::new(0.0, self.offset)
    }

    pub fn height(&self) -> f64 {
        self.graphic.height
    }

    /// Bounding rectangle in stacked coordinates.
    pub fn scene_rect(&self) -> Rect {
        self.graphic.bounding_rect().translated(0.0, self.offset)
    }

    pub fn bottom(&self) -> f64 {
        self.offset + self.graphic.height
    }
}

/// Systems stacked top to bottom with a fixed gap between them.
#[derive(Debug, Clone, Default)]
pub struct StackedLayout {
    pub(super) systems: Vec<PlacedSystem>,
    pub(super) spacing: f64,
}

impl StackedLayout {
    /// Stack `graphics` in index order, starting at 0.
    pub fn stack(graphics: Vec<Arc<SystemGraphic>>, spacing: f64) -> Self {
        let mut running_height = 0.0;
        let systems = graphics
            .into_iter()
            .map(|graphic| {
                let placed = PlacedSystem {
                    offset: running_height,
                    graphic,
                };
                running_height += placed.height() + spacing;
                placed
            })
            .collect();
        Self { systems, spacing }
    }

    pub fn systems(&self) -> &[PlacedSystem] {
        &self.systems
    }

    pub fn get(&self, index: usize) -> Option<&PlacedSystem> {
        self.systems.get(index)
    }

    pub fn len(&self) -> usize {
        self.systems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// One bounding rectangle per system, indexed like the systems.
    pub fn caret_regions(&self) -> Vec<Rect> {
        self.systems.iter().map(PlacedSystem::scene_rect).collect()
    }

    /// Bottom edge of the last system.
    pub fn total_height(&self) -> f64 {
        self.systems.last().map_or(0.0, PlacedSystem::bottom)
    }

    /// Widest system.
    pub fn total_width(&self) -> f64 {
        self.systems
            .iter()
            .map(|s| s.graphic.width)
            .fold(0.0, f64::max)
    }

    /// Index of the system whose rectangle contains `p`.
    pub fn system_at(&self, p: Point) -> Option<usize> {
        self.systems.iter().position(|s| s.scene_rect().contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graphics(heights: &[f64]) -> Vec<Arc<SystemGraphic>> {
        heights
            .iter()
            .map(|&h| Arc::new(SystemGraphic::blank(300.0, h)))
            .collect()
    }

    #[test]
    fn offsets_accumulate_height_plus_spacing() {
        let layout = StackedLayout::stack(graphics(&[100.0, 150.0, 80.0]), 50.0);
        let offsets: Vec<f64> = layout.systems().iter().map(PlacedSystem::offset).collect();
        assert_eq!(offsets, vec![0.0, 150.0, 350.0]);
        assert_eq!(layout.total_height(), 430.0);
        assert_eq!(
            layout.caret_regions(),
            vec![
                Rect::new(0.0, 0.0, 300.0, 100.0),
                Rect::new(0.0, 150.0, 300.0, 150.0),
                Rect::new(0.0, 350.0, 300.0, 80.0),
            ]
        );
    }

    #[test]
    fn system_at_skips_gaps() {
        let layout = StackedLayout::stack(graphics(&[100.0, 100.0]), 50.0);
        assert_eq!(layout.system_at(Point::new(10.0, 10.0)), Some(0));
        assert_eq!(layout.system_at(Point::new(10.0, 120.0)), None);
        assert_eq!(layout.system_at(Point::new(10.0, 160.0)), Some(1));
    }

    #[test]
    fn empty_layout() {
        let layout = StackedLayout::stack(Vec::new(), 50.0);
        assert!(layout.is_empty());
        assert_eq!(layout.total_height(), 0.0);
        assert_eq!(layout.total_width(), 0.0);
    }
}
