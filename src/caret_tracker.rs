//! Per-system caret regions and auto-scroll requests.
//!
//! The tracker keeps one bounding rectangle per rendered system (in stacked
//! coordinates) and follows the caret's system index. Whenever the caret
//! moves it publishes a [`ScrollRequest`] for the region the caret is in;
//! the score area forwards those to its viewport.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::document::Caret;
use crate::geometry::Rect;
use crate::model::ScoreLocation;
use crate::pubsub::{NotificationChannel, SubscriptionId};
use crate::renderer::constants::CARET_SCROLL_MARGIN;

/// Ask the viewport to make `region` visible with the given margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub region: Rect,
    pub x_margin: f64,
    pub y_margin: f64,
}

#[derive(Debug, Default)]
struct Regions {
    rects: Vec<Rect>,
    current: usize,
}

impl Regions {
    fn current_rect(&self) -> Option<Rect> {
        self.rects.get(self.current).copied()
    }
}

pub struct CaretTracker {
    regions: Rc<RefCell<Regions>>,
    scroll_requests: NotificationChannel<ScrollRequest>,
    y_margin: f64,
    movement: Option<(NotificationChannel<ScoreLocation>, SubscriptionId)>,
}

impl CaretTracker {
    pub fn new(y_margin: f64) -> Self {
        Self {
            regions: Rc::default(),
            scroll_requests: NotificationChannel::new(),
            y_margin,
            movement: None,
        }
    }

    /// Follow `caret`, replacing any earlier caret subscription.
    pub fn attach(&mut self, caret: &Caret) {
        self.detach();
        self.regions.borrow_mut().current = caret.system_index();

        let regions = Rc::clone(&self.regions);
        let requests = self.scroll_requests.clone();
        let y_margin = self.y_margin;
        let id = caret.moved().subscribe(move |location: &ScoreLocation| {
            // Release the borrow before handlers run; they may query the tracker.
            let region = {
                let mut regions = regions.borrow_mut();
                regions.current = location.system_index;
                regions.current_rect()
            };
            match region {
                Some(region) => requests.publish(&ScrollRequest { region, x_margin: 0.0, y_margin }),
                None => tracing::warn!(system = location.system_index, "caret moved to a system without a region"),
            }
        });
        self.movement = Some((caret.moved().clone(), id));
    }

    /// Stop following the caret. Returns `false` if nothing was attached.
    pub fn detach(&mut self) -> bool {
        match self.movement.take() {
            Some((channel, id)) => channel.unsubscribe(id),
            None => false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.movement.is_some()
    }

    pub fn add_system_rect(&self, rect: Rect) {
        self.regions.borrow_mut().rects.push(rect);
    }

    /// Replace the region of an already tracked system.
    pub fn set_system_rect(&self, index: usize, rect: Rect) {
        let mut regions = self.regions.borrow_mut();
        debug_assert!(index < regions.rects.len(), "no caret region {index}");
        regions.rects[index] = rect;
    }

    pub fn clear(&self) {
        self.regions.borrow_mut().rects.clear();
    }

    pub fn system_rect(&self, index: usize) -> Option<Rect> {
        self.regions.borrow().rects.get(index).copied()
    }

    pub fn regions(&self) -> Vec<Rect> {
        self.regions.borrow().rects.clone()
    }

    pub fn len(&self) -> usize {
        self.regions.borrow().rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// System index the caret is currently in.
    pub fn current_system(&self) -> usize {
        self.regions.borrow().current
    }

    pub fn current_region(&self) -> Option<Rect> {
        self.regions.borrow().current_rect()
    }

    /// Publish a scroll request for the current region, if there is one.
    pub fn scroll_to_caret(&self) -> bool {
        let Some(region) = self.current_region() else {
            return false;
        };
        self.scroll_requests.publish(&ScrollRequest {
            region,
            x_margin: 0.0,
            y_margin: self.y_margin,
        });
        true
    }

    pub fn scroll_requests(&self) -> &NotificationChannel<ScrollRequest> {
        &self.scroll_requests
    }
}

impl Default for CaretTracker {
    fn default() -> Self {
        Self::new(CARET_SCROLL_MARGIN)
    }
}

impl Drop for CaretTracker {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for CaretTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let regions = self.regions.borrow();
        f.debug_struct("CaretTracker")
            .field("regions", &regions.rects.len())
            .field("current", &regions.current)
            .field("attached", &self.movement.is_some())
            .finish()
    }
}
