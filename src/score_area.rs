//! The score area: owns the displayed document, the stacked layout, the
//! scene items that mirror it, and the notification endpoints that turn
//! clicks on rendered systems back into score locations.

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use crate::caret_tracker::{CaretTracker, ScrollRequest};
use crate::config::LayoutConfig;
use crate::document::Document;
use crate::error::LayoutError;
use crate::geometry::Point;
use crate::layout::{LayoutEngine, StackedLayout};
use crate::model::{ScoreLocation, StaffLocation, SystemLocation, ViewType};
use crate::pubsub::{NotificationChannel, SubscriptionId};
use crate::renderer::{Hit, RenderSystem, SystemRenderer};
use crate::scene::{ItemId, MemoryScene, Scene, Viewport};

pub struct ScoreArea<S = MemoryScene, R = SystemRenderer> {
    scene: S,
    engine: LayoutEngine<R>,
    config: LayoutConfig,
    document: Option<Document>,
    view_type: ViewType,
    layout: StackedLayout,
    /// Scene item of each system, indexed like the layout.
    items: Vec<ItemId>,
    caret_tracker: CaretTracker,
    viewport_subscription: Option<SubscriptionId>,

    key_signature_clicked: NotificationChannel<SystemLocation>,
    time_signature_clicked: NotificationChannel<SystemLocation>,
    barline_clicked: NotificationChannel<SystemLocation>,
    clef_clicked: NotificationChannel<StaffLocation>,
}

impl<S: Scene> ScoreArea<S, SystemRenderer> {
    pub fn new(scene: S, config: LayoutConfig) -> Self {
        let engine = LayoutEngine::new(&config);
        Self::from_engine(scene, engine, config)
    }
}

impl<S: Scene, R: RenderSystem> ScoreArea<S, R> {
    /// Score area drawing systems with a custom renderer.
    pub fn with_renderer(scene: S, renderer: R, config: LayoutConfig) -> Self {
        let engine = LayoutEngine::with_renderer(renderer, &config);
        Self::from_engine(scene, engine, config)
    }

    fn from_engine(scene: S, engine: LayoutEngine<R>, config: LayoutConfig) -> Self {
        Self {
            scene,
            engine,
            caret_tracker: CaretTracker::new(config.caret_scroll_margin),
            config,
            document: None,
            view_type: ViewType::default(),
            layout: StackedLayout::default(),
            items: Vec::new(),
            viewport_subscription: None,
            key_signature_clicked: NotificationChannel::new(),
            time_signature_clicked: NotificationChannel::new(),
            barline_clicked: NotificationChannel::new(),
            clef_clicked: NotificationChannel::new(),
        }
    }

    /// Forward the caret tracker's scroll requests to `viewport`, replacing
    /// any previously attached viewport.
    pub fn attach_viewport<V: Viewport + 'static>(&mut self, viewport: Rc<RefCell<V>>) {
        let requests = self.caret_tracker.scroll_requests();
        if let Some(id) = self.viewport_subscription.take() {
            requests.unsubscribe(id);
        }
        let id = requests.subscribe(move |request: &ScrollRequest| {
            viewport
                .borrow_mut()
                .ensure_visible(request.region, request.x_margin, request.y_margin);
        });
        self.viewport_subscription = Some(id);
    }

    /// Rebuild everything for `document`.
    ///
    /// The layout is computed before any visible state is touched, so a
    /// render failure leaves the previous document on screen.
    pub fn render_document(&mut self, mut document: Document, view: ViewType) -> Result<(), LayoutError> {
        let started = Instant::now();
        let layout = self.engine.layout(document.score.systems(), view)?;

        self.scene.clear();
        self.items.clear();
        self.caret_tracker.clear();
        for placed in layout.systems() {
            let id = self.scene.add_item(Arc::clone(placed.graphic()), placed.position());
            self.items.push(id);
            self.caret_tracker
                .add_system_rect(self.scene.item_scene_rect(id).unwrap_or_else(|| placed.scene_rect()));
        }
        self.caret_tracker.attach(&document.caret);

        document.view_type = view;
        self.document = Some(document);
        self.view_type = view;
        self.layout = layout;

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            items = self.scene.item_count(),
            "score rendered"
        );
        Ok(())
    }

    /// Re-render the system at `index` after an edit and shift the systems
    /// below it. Returns the range of systems that were repositioned.
    ///
    /// `index` must refer to a rendered system.
    pub fn redraw_system(&mut self, index: usize) -> Result<Range<usize>, LayoutError> {
        let document = self.document.as_ref().ok_or(LayoutError::NoDocument)?;
        debug_assert!(index < self.layout.len(), "system index {index} out of range");

        let moved = self
            .engine
            .incremental()
            .update(&mut self.layout, document.score.systems(), index, self.view_type)?;

        for i in moved.clone() {
            let placed = &self.layout.systems()[i];
            if i == index {
                self.scene.remove_item(self.items[i]);
                self.items[i] = self.scene.add_item(Arc::clone(placed.graphic()), placed.position());
            } else {
                self.scene.set_item_pos(self.items[i], placed.position());
            }
            self.caret_tracker.set_system_rect(i, placed.scene_rect());
        }
        Ok(moved)
    }

    /// Route a click at scene coordinates `(x, y)`.
    ///
    /// Barline, signature and clef hits are published on their channels; a
    /// click on a staff body is published as a selection change through the
    /// document's caret.
    pub fn click(&self, x: f64, y: f64) -> Option<Hit> {
        let p = Point::new(x, y);
        let system_index = self.layout.system_at(p)?;
        let placed = &self.layout.systems()[system_index];
        let hit = placed.graphic().hit_test(Point::new(p.x, p.y - placed.offset()))?;
        tracing::trace!(system_index, ?hit, "click");

        match hit {
            Hit::Barline { position } => self
                .barline_clicked
                .publish(&SystemLocation { system_index, position }),
            Hit::KeySignature { position } => self
                .key_signature_clicked
                .publish(&SystemLocation { system_index, position }),
            Hit::TimeSignature { position } => self
                .time_signature_clicked
                .publish(&SystemLocation { system_index, position }),
            Hit::Clef { staff_index } => self
                .clef_clicked
                .publish(&StaffLocation { system_index, staff_index }),
            Hit::Staff { staff_index, position } => {
                if let Some(document) = &self.document {
                    document
                        .caret
                        .selection_changed()
                        .publish(&ScoreLocation::new(system_index, staff_index, position));
                }
            }
        }
        Some(hit)
    }

    pub fn key_signature_clicked(&self) -> &NotificationChannel<SystemLocation> {
        &self.key_signature_clicked
    }

    pub fn time_signature_clicked(&self) -> &NotificationChannel<SystemLocation> {
        &self.time_signature_clicked
    }

    pub fn barline_clicked(&self) -> &NotificationChannel<SystemLocation> {
        &self.barline_clicked
    }

    pub fn clef_clicked(&self) -> &NotificationChannel<StaffLocation> {
        &self.clef_clicked
    }

    /// The current document's selection channel.
    pub fn selection_changed(&self) -> Option<&NotificationChannel<ScoreLocation>> {
        self.document.as_ref().map(|d| d.caret.selection_changed())
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Mutable access for edits; call [`Self::redraw_system`] afterwards.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }

    pub fn layout(&self) -> &StackedLayout {
        &self.layout
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn caret_tracker(&self) -> &CaretTracker {
        &self.caret_tracker
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }
}
