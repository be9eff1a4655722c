//! The visual element produced for one system.
//!
//! A [`SystemGraphic`] is plain positioned geometry in local coordinates
//! (origin at the system's top-left corner). It is never mutated after
//! rendering; re-rendering a system replaces the whole graphic.

use crate::geometry::{Point, Rect};

/// Text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    pub(super) fn as_svg(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// A drawing instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: &'static str,
    },
    Rect {
        rect: Rect,
        color: &'static str,
    },
    Text {
        at: Point,
        content: String,
        size: f64,
        anchor: Anchor,
        color: &'static str,
    },
}

/// What a clickable region of the graphic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotTarget {
    Barline { position: i32 },
    KeySignature { position: i32 },
    TimeSignature { position: i32 },
    Clef { staff_index: usize },
    /// The body of a staff; the position is derived from the click's x.
    StaffBody { staff_index: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotspot {
    pub rect: Rect,
    pub target: HotspotTarget,
}

/// Result of hit-testing a graphic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Barline { position: i32 },
    KeySignature { position: i32 },
    TimeSignature { position: i32 },
    Clef { staff_index: usize },
    Staff { staff_index: usize, position: i32 },
}

/// Rendered geometry for one system.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemGraphic {
    pub width: f64,
    pub height: f64,
    pub primitives: Vec<Primitive>,
    /// Checked in order; the first match wins.
    pub hotspots: Vec<Hotspot>,
    /// X coordinate of position 0
    pub origin_x: f64,
    pub position_spacing: f64,
}

impl SystemGraphic {
    /// An empty graphic of the given size, with no hotspots.
    pub fn blank(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            primitives: Vec::new(),
            hotspots: Vec::new(),
            origin_x: 0.0,
            position_spacing: 1.0,
        }
    }

    /// Bounding rectangle in local coordinates.
    pub fn bounding_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Position index under local x coordinate `x` (never negative).
    pub fn position_at(&self, x: f64) -> i32 {
        let raw = ((x - self.origin_x) / self.position_spacing).floor();
        if raw <= 0.0 {
            0
        } else if raw >= f64::from(i32::MAX - 1) {
            i32::MAX - 1
        } else {
            raw as i32
        }
    }

    /// Find what lies under a point given in local coordinates.
    pub fn hit_test(&self, p: Point) -> Option<Hit> {
        let hotspot = self.hotspots.iter().find(|h| h.rect.contains(p))?;
        Some(match hotspot.target {
            HotspotTarget::Barline { position } => Hit::Barline { position },
            HotspotTarget::KeySignature { position } => Hit::KeySignature { position },
            HotspotTarget::TimeSignature { position } => Hit::TimeSignature { position },
            HotspotTarget::Clef { staff_index } => Hit::Clef { staff_index },
            HotspotTarget::StaffBody { staff_index } => Hit::Staff {
                staff_index,
                position: self.position_at(p.x),
            },
        })
    }
}
