//! System renderer: converts a [`System`] into a [`SystemGraphic`].
//!
//! Rendering is a pure read of the system and the selected view: it takes
//! `&System`, and [`RenderSystem`] implementors must be `Sync`, so the
//! layout engine can render disjoint index ranges on several threads.
//!
//! Layout of one system, top to bottom:
//!
//! ```text
//!  tempo row        (only if the system has tempo markers)
//!  ending row       (only if the system has alternate endings)
//!  per visible staff:
//!    padding, standard notation staff, gap, tablature staff, padding
//! ```
//!
//! Horizontally, position `p` starts at `origin_x + p * position_spacing`;
//! the end sentinel barline sits at the right edge.

pub(crate) mod constants;
mod graphic;
mod staff;
pub(crate) mod svg_builder;

use crate::config::RenderMetrics;
use crate::error::RenderError;
use crate::geometry::{Point, Rect};
use crate::model::*;
use crate::system::System;
use constants::*;
use staff::*;

pub use graphic::{Anchor, Hit, Hotspot, HotspotTarget, Primitive, SystemGraphic};

// ═══════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════

/// Turns one system into a visual element.
pub trait RenderSystem: Sync {
    fn render(&self, system: &System, index: usize, view: ViewType) -> Result<SystemGraphic, RenderError>;
}

impl<F> RenderSystem for F
where
    F: Fn(&System, usize, ViewType) -> Result<SystemGraphic, RenderError> + Sync,
{
    fn render(&self, system: &System, index: usize, view: ViewType) -> Result<SystemGraphic, RenderError> {
        self(system, index, view)
    }
}

/// Draws staves, barlines, signatures, tempo markers, endings and fret numbers.
#[derive(Debug, Clone, Default)]
pub struct SystemRenderer {
    metrics: RenderMetrics,
}

impl SystemRenderer {
    pub fn new(metrics: RenderMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &RenderMetrics {
        &self.metrics
    }
}

impl RenderSystem for SystemRenderer {
    fn render(&self, system: &System, _index: usize, view: ViewType) -> Result<SystemGraphic, RenderError> {
        let m = &self.metrics;
        let visible: Vec<(usize, &Staff)> = system
            .staves()
            .iter()
            .enumerate()
            .filter(|(_, staff)| staff.view_type == view)
            .collect();
        for &(staff_index, staff) in &visible {
            validate_staff(staff_index, staff)?;
        }

        let origin_x = LEFT_MARGIN + CLEF_SPACE;
        let bar_x = |p: i32| origin_x + f64::from(p) * m.position_spacing;
        let end_x = (origin_x + (f64::from(system.last_used_position()) + 1.0) * m.position_spacing)
            .max(m.page_width - RIGHT_MARGIN);
        let x_of = |p: i32| if p == END_POSITION { end_x } else { bar_x(p) };
        let note_x = |p: i32| bar_x(p) + m.position_spacing / 2.0;

        let mut canvas = Canvas::default();
        let mut hotspots = Vec::new();
        let mut body_hotspots = Vec::new();
        let mut y = 0.0;

        // ── Header rows ─────────────────────────────────────────────
        if !system.tempo_markers().is_empty() {
            for marker in system.tempo_markers() {
                render_tempo_marker(&mut canvas, marker, x_of(marker.position), y);
            }
            y += TEMPO_ROW_HEIGHT;
        }
        if !system.alternate_endings().is_empty() {
            for ending in system.alternate_endings() {
                let x1 = x_of(ending.position);
                let x2 = system
                    .next_barline(ending.position.saturating_add(1))
                    .map_or(end_x, |b| x_of(b.position));
                render_alternate_ending(&mut canvas, ending, x1, x2, y);
            }
            y += ENDING_ROW_HEIGHT;
        }

        // ── Staves ──────────────────────────────────────────────────
        let mut extents = Vec::with_capacity(visible.len());
        for &(staff_index, staff) in &visible {
            y += STAFF_TOP_PADDING;
            let notation_top = y;
            let notation_height = 4.0 * m.staff_line_spacing;
            render_staff_lines(&mut canvas, LEFT_MARGIN, end_x, notation_top, 5, m.staff_line_spacing);
            render_clef(&mut canvas, LEFT_MARGIN, notation_top, staff.clef, m.staff_line_spacing);
            hotspots.push(Hotspot {
                rect: Rect::new(LEFT_MARGIN, notation_top, CLEF_SPACE, notation_height),
                target: HotspotTarget::Clef { staff_index },
            });

            let tab_top = notation_top + notation_height + NOTATION_TAB_GAP;
            let tab_height = f64::from(staff.string_count - 1) * m.tab_line_spacing;
            render_staff_lines(&mut canvas, LEFT_MARGIN, end_x, tab_top, staff.string_count, m.tab_line_spacing);
            render_tab_label(&mut canvas, LEFT_MARGIN, tab_top, tab_height);
            render_notes(&mut canvas, staff, tab_top, m.tab_line_spacing, note_x);

            let bottom = tab_top + tab_height;
            body_hotspots.push(Hotspot {
                rect: Rect::new(origin_x, notation_top, end_x - origin_x, bottom - notation_top),
                target: HotspotTarget::StaffBody { staff_index },
            });
            extents.push(StaffExtent { notation_top, bottom });
            y = bottom + STAFF_BOTTOM_PADDING;
        }
        if visible.is_empty() {
            y += EMPTY_SYSTEM_HEIGHT;
        }
        let height = y;

        // ── Barlines & signatures ───────────────────────────────────
        let (bar_top, bar_bottom) = match (extents.first(), extents.last()) {
            (Some(first), Some(last)) => (first.notation_top, last.bottom),
            _ => (height - EMPTY_SYSTEM_HEIGHT, height),
        };
        for barline in system.barlines() {
            let x = x_of(barline.position);
            render_barline(&mut canvas, barline, x, &extents);
            hotspots.push(Hotspot {
                rect: Rect::new(x - BARLINE_HIT_WIDTH / 2.0, bar_top, BARLINE_HIT_WIDTH, bar_bottom - bar_top),
                target: HotspotTarget::Barline { position: barline.position },
            });

            let mut sig_x = x + BARLINE_HIT_WIDTH / 2.0;
            if let Some(key) = barline.key_signature {
                render_key_signature(&mut canvas, sig_x, key, &extents, m.staff_line_spacing);
                hotspots.push(Hotspot {
                    rect: Rect::new(sig_x, bar_top, KEY_SIG_WIDTH, bar_bottom - bar_top),
                    target: HotspotTarget::KeySignature { position: barline.position },
                });
                sig_x += KEY_SIG_WIDTH;
            }
            if let Some(time) = barline.time_signature {
                render_time_signature(&mut canvas, sig_x, time, &extents, m.staff_line_spacing);
                hotspots.push(Hotspot {
                    rect: Rect::new(sig_x, bar_top, TIME_SIG_WIDTH, bar_bottom - bar_top),
                    target: HotspotTarget::TimeSignature { position: barline.position },
                });
            }
        }

        hotspots.append(&mut body_hotspots);

        Ok(SystemGraphic {
            width: end_x + RIGHT_MARGIN,
            height,
            primitives: canvas.primitives,
            hotspots,
            origin_x,
            position_spacing: m.position_spacing,
        })
    }
}

fn validate_staff(staff_index: usize, staff: &Staff) -> Result<(), RenderError> {
    if staff.string_count == 0 {
        return Err(RenderError::NoStrings { staff_index });
    }
    if let Some(note) = staff.notes.iter().find(|n| n.string >= staff.string_count) {
        return Err(RenderError::StringOutOfRange {
            staff_index,
            position: note.position,
            string: note.string,
            string_count: staff.string_count,
        });
    }
    Ok(())
}

// ═══════════════════════════════════════════════════════════════════════
// Canvas
// ═══════════════════════════════════════════════════════════════════════

/// Collects primitives while a system is drawn.
#[derive(Default)]
pub(super) struct Canvas {
    primitives: Vec<Primitive>,
}

impl Canvas {
    pub(super) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: &'static str, width: f64) {
        self.primitives.push(Primitive::Line {
            from: Point::new(x1, y1),
            to: Point::new(x2, y2),
            width,
            color,
        });
    }

    pub(super) fn rect(&mut self, rect: Rect, color: &'static str) {
        self.primitives.push(Primitive::Rect { rect, color });
    }

    pub(super) fn text(&mut self, x: f64, y: f64, content: &str, size: f64, anchor: Anchor, color: &'static str) {
        self.primitives.push(Primitive::Text {
            at: Point::new(x, y),
            content: content.to_string(),
            size,
            anchor,
            color,
        });
    }
}
