//! Scene and viewport collaborators.
//!
//! A [`Scene`] holds positioned system graphics; a [`Viewport`] shows part
//! of the scene and can be asked to bring a region into view. The crate
//! ships in-memory implementations of both, which also back SVG export.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::geometry::{Point, Rect};
use crate::renderer::svg_builder::{empty_svg, SvgBuilder};
use crate::renderer::SystemGraphic;

/// Handle of an item added to a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

pub trait Scene {
    /// Remove every item.
    fn clear(&mut self);

    fn add_item(&mut self, graphic: Arc<SystemGraphic>, pos: Point) -> ItemId;

    /// Returns `false` if `id` is not in the scene.
    fn remove_item(&mut self, id: ItemId) -> bool;

    /// Returns `false` if `id` is not in the scene.
    fn set_item_pos(&mut self, id: ItemId, pos: Point) -> bool;

    /// Bounding rectangle of an item in scene coordinates.
    fn item_scene_rect(&self, id: ItemId) -> Option<Rect>;

    fn item_count(&self) -> usize;
}

pub trait Viewport {
    /// Scroll so that `region` plus the margins is visible.
    fn ensure_visible(&mut self, region: Rect, x_margin: f64, y_margin: f64);
}

// ═══════════════════════════════════════════════════════════════════════
// In-memory scene
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct SceneItem {
    pub graphic: Arc<SystemGraphic>,
    pub pos: Point,
}

impl SceneItem {
    pub fn scene_rect(&self) -> Rect {
        self.graphic.bounding_rect().translated(self.pos.x, self.pos.y)
    }
}

#[derive(Debug, Default)]
pub struct MemoryScene {
    next_id: u64,
    items: BTreeMap<ItemId, SceneItem>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn item(&self, id: ItemId) -> Option<&SceneItem> {
        self.items.get(&id)
    }

    /// Items in insertion order.
    pub fn items(&self) -> impl Iterator<Item = (ItemId, &SceneItem)> {
        self.items.iter().map(|(id, item)| (*id, item))
    }

    /// Union of all item rectangles, anchored at the origin.
    pub fn scene_rect(&self) -> Rect {
        let (width, height) = self.items.values().fold((0.0_f64, 0.0_f64), |(w, h), item| {
            let r = item.scene_rect();
            (w.max(r.right()), h.max(r.bottom()))
        });
        Rect::new(0.0, 0.0, width, height)
    }

    /// Export the whole scene as a single SVG document.
    pub fn to_svg(&self) -> String {
        if self.items.is_empty() {
            return empty_svg("Empty score");
        }
        let bounds = self.scene_rect();
        let mut svg = SvgBuilder::new(bounds.width, bounds.height);
        for item in self.items.values() {
            svg.graphic(&item.graphic, item.pos);
        }
        svg.build()
    }
}

impl Scene for MemoryScene {
    fn clear(&mut self) {
        self.items.clear();
    }

    fn add_item(&mut self, graphic: Arc<SystemGraphic>, pos: Point) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        self.items.insert(id, SceneItem { graphic, pos });
        id
    }

    fn remove_item(&mut self, id: ItemId) -> bool {
        self.items.remove(&id).is_some()
    }

    fn set_item_pos(&mut self, id: ItemId, pos: Point) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.pos = pos;
                true
            }
            None => false,
        }
    }

    fn item_scene_rect(&self, id: ItemId) -> Option<Rect> {
        self.items.get(&id).map(SceneItem::scene_rect)
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// In-memory viewport
// ═══════════════════════════════════════════════════════════════════════

/// A scrollable window of fixed size over the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryViewport {
    visible: Rect,
}

impl MemoryViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            visible: Rect::new(0.0, 0.0, width, height),
        }
    }

    pub fn visible(&self) -> Rect {
        self.visible
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.visible.x = x.max(0.0);
        self.visible.y = y.max(0.0);
    }
}

/// Smallest scroll along one axis that shows `[lo, hi)` in a window of
/// `extent` currently starting at `start`. Oversized targets align to `lo`.
fn scroll_axis(start: f64, extent: f64, lo: f64, hi: f64) -> f64 {
    if hi - lo > extent || lo < start {
        lo
    } else if hi > start + extent {
        hi - extent
    } else {
        start
    }
}

impl Viewport for MemoryViewport {
    fn ensure_visible(&mut self, region: Rect, x_margin: f64, y_margin: f64) {
        let target = region.inflated(x_margin, y_margin);
        let v = self.visible;
        let x = scroll_axis(v.x, v.width, target.x, target.right());
        let y = scroll_axis(v.y, v.height, target.y, target.bottom());
        self.scroll_to(x, y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn items_keep_their_position() {
        let mut scene = MemoryScene::new();
        let a = scene.add_item(Arc::new(SystemGraphic::blank(100.0, 40.0)), Point::new(0.0, 0.0));
        let b = scene.add_item(Arc::new(SystemGraphic::blank(120.0, 30.0)), Point::new(0.0, 90.0));

        assert_eq!(scene.item_scene_rect(b), Some(Rect::new(0.0, 90.0, 120.0, 30.0)));
        assert!(scene.set_item_pos(b, Point::new(0.0, 60.0)));
        assert_eq!(scene.scene_rect(), Rect::new(0.0, 0.0, 120.0, 90.0));

        assert!(scene.remove_item(a));
        assert!(!scene.remove_item(a));
        assert!(!scene.set_item_pos(a, Point::new(1.0, 1.0)));
        assert_eq!(scene.item_count(), 1);

        scene.clear();
        assert_eq!(scene.item_count(), 0);
        assert_eq!(scene.item_scene_rect(b), None);
    }

    #[test]
    fn svg_export_places_each_item() {
        let mut scene = MemoryScene::new();
        assert!(scene.to_svg().contains("Empty score"));

        scene.add_item(Arc::new(SystemGraphic::blank(100.0, 40.0)), Point::new(0.0, 0.0));
        scene.add_item(Arc::new(SystemGraphic::blank(100.0, 40.0)), Point::new(0.0, 90.0));
        let svg = scene.to_svg();
        assert!(svg.contains(r#"viewBox="0 0 100 130""#));
        assert!(svg.contains("translate(0.0,90.0)"));
    }

    #[test]
    fn ensure_visible_scrolls_minimally() {
        let mut viewport = MemoryViewport::new(800.0, 300.0);

        // Already visible: no scroll.
        viewport.ensure_visible(Rect::new(0.0, 0.0, 800.0, 100.0), 0.0, 100.0);
        assert_eq!(viewport.visible().y, 0.0);

        // Below the window: bottom edge plus margin aligns with the window bottom.
        viewport.ensure_visible(Rect::new(0.0, 400.0, 800.0, 100.0), 0.0, 100.0);
        assert_eq!(viewport.visible().y, 300.0);

        // Above the window: top edge minus margin, clamped at 0.
        viewport.ensure_visible(Rect::new(0.0, 50.0, 800.0, 100.0), 0.0, 100.0);
        assert_eq!(viewport.visible().y, 0.0);
    }
}
