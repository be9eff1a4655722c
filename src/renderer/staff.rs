//! Staff, clef, key/time signature, barline and fret-number rendering.

use crate::geometry::Rect;
use crate::model::*;
use super::constants::*;
use super::graphic::Anchor;
use super::Canvas;

// ═══════════════════════════════════════════════════════════════════════
// Staff rendering
// ═══════════════════════════════════════════════════════════════════════

/// Vertical extent of one drawn staff (standard notation top to tab bottom).
#[derive(Debug, Clone, Copy)]
pub(super) struct StaffExtent {
    pub(super) notation_top: f64,
    pub(super) bottom: f64,
}

pub(super) fn render_staff_lines(
    canvas: &mut Canvas, x1: f64, x2: f64, top: f64, count: u8, spacing: f64,
) {
    for i in 0..count {
        let y = top + f64::from(i) * spacing;
        canvas.line(x1, y, x2, y, STAFF_COLOR, STAFF_LINE_WIDTH);
    }
}

pub(super) fn render_clef(canvas: &mut Canvas, x: f64, staff_top: f64, clef: Clef, spacing: f64) {
    let (glyph, baseline) = match clef {
        Clef::Treble => ("\u{1D11E}", staff_top + 3.5 * spacing),
        Clef::Bass => ("\u{1D122}", staff_top + 2.5 * spacing),
    };
    canvas.text(x + CLEF_SPACE / 2.0, baseline, glyph, CLEF_FONT_SIZE, Anchor::Middle, NOTE_COLOR);
}

pub(super) fn render_tab_label(canvas: &mut Canvas, x: f64, tab_top: f64, tab_height: f64) {
    let step = tab_height / 3.0;
    for (i, letter) in ["T", "A", "B"].into_iter().enumerate() {
        let y = tab_top + step * (i as f64 + 0.8);
        canvas.text(x + CLEF_SPACE / 2.0, y, letter, FRET_FONT_SIZE, Anchor::Middle, STAFF_COLOR);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Notes
// ═══════════════════════════════════════════════════════════════════════

/// Draw fret numbers on the tablature staff, masking the string line behind each.
pub(super) fn render_notes(
    canvas: &mut Canvas,
    staff: &Staff,
    tab_top: f64,
    tab_spacing: f64,
    note_x: impl Fn(i32) -> f64,
) {
    for note in staff.notes.iter() {
        let x = note_x(note.position);
        let y = tab_top + f64::from(note.string) * tab_spacing;
        let label = note.fret.to_string();
        let mask_width = FRET_FONT_SIZE * 0.6 * label.len() as f64 + 2.0;
        canvas.rect(
            Rect::new(x - mask_width / 2.0, y - FRET_FONT_SIZE / 2.0, mask_width, FRET_FONT_SIZE),
            "white",
        );
        canvas.text(x, y + FRET_FONT_SIZE * 0.35, &label, FRET_FONT_SIZE, Anchor::Middle, NOTE_COLOR);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Barlines
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_barline(canvas: &mut Canvas, barline: &Barline, x: f64, extents: &[StaffExtent]) {
    for extent in extents {
        let (top, bottom) = (extent.notation_top, extent.bottom);
        match barline.bar_type {
            BarType::Single => canvas.line(x, top, x, bottom, BARLINE_COLOR, BARLINE_WIDTH),
            BarType::FreeTime => {
                // dashed: short segments
                let mut y = top;
                while y < bottom {
                    let end = (y + 4.0).min(bottom);
                    canvas.line(x, y, x, end, BARLINE_COLOR, BARLINE_WIDTH);
                    y += 8.0;
                }
            }
            BarType::Double => {
                canvas.line(x - DOUBLE_BAR_GAP, top, x - DOUBLE_BAR_GAP, bottom, BARLINE_COLOR, BARLINE_WIDTH);
                canvas.line(x, top, x, bottom, BARLINE_COLOR, BARLINE_WIDTH);
            }
            BarType::DoubleBarFine => {
                canvas.line(x - DOUBLE_BAR_GAP - 1.0, top, x - DOUBLE_BAR_GAP - 1.0, bottom, BARLINE_COLOR, BARLINE_WIDTH);
                canvas.line(x, top, x, bottom, BARLINE_COLOR, HEAVY_BARLINE_WIDTH);
            }
            BarType::RepeatStart => {
                canvas.line(x, top, x, bottom, BARLINE_COLOR, HEAVY_BARLINE_WIDTH);
                canvas.line(x + DOUBLE_BAR_GAP + 1.0, top, x + DOUBLE_BAR_GAP + 1.0, bottom, BARLINE_COLOR, BARLINE_WIDTH);
                render_repeat_dots(canvas, x + DOUBLE_BAR_GAP + 4.0, top, bottom);
            }
            BarType::RepeatEnd => {
                canvas.line(x - DOUBLE_BAR_GAP - 1.0, top, x - DOUBLE_BAR_GAP - 1.0, bottom, BARLINE_COLOR, BARLINE_WIDTH);
                canvas.line(x, top, x, bottom, BARLINE_COLOR, HEAVY_BARLINE_WIDTH);
                render_repeat_dots(canvas, x - DOUBLE_BAR_GAP - 4.0 - REPEAT_DOT_SIZE, top, bottom);
                if barline.repeat_count > 2 {
                    canvas.text(
                        x,
                        top - 4.0,
                        &format!("{}x", barline.repeat_count),
                        SIGNATURE_FONT_SIZE,
                        Anchor::End,
                        BARLINE_COLOR,
                    );
                }
            }
        }
    }
}

fn render_repeat_dots(canvas: &mut Canvas, x: f64, top: f64, bottom: f64) {
    let mid = (top + bottom) / 2.0;
    for y in [mid - 6.0, mid + 6.0 - REPEAT_DOT_SIZE] {
        canvas.rect(Rect::new(x, y, REPEAT_DOT_SIZE, REPEAT_DOT_SIZE), BARLINE_COLOR);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Key & time signatures
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn key_signature_label(key: KeySignature) -> String {
    match key.accidentals {
        0 => "\u{266E}".to_string(),
        n if n > 0 => format!("{n}\u{266F}"),
        n => format!("{}\u{266D}", n.unsigned_abs()),
    }
}

pub(super) fn render_key_signature(
    canvas: &mut Canvas, x: f64, key: KeySignature, extents: &[StaffExtent], spacing: f64,
) {
    let label = key_signature_label(key);
    for extent in extents {
        let y = extent.notation_top + 2.0 * spacing + SIGNATURE_FONT_SIZE * 0.35;
        canvas.text(x + KEY_SIG_WIDTH / 2.0, y, &label, SIGNATURE_FONT_SIZE, Anchor::Middle, NOTE_COLOR);
    }
}

pub(super) fn render_time_signature(
    canvas: &mut Canvas, x: f64, time: TimeSignature, extents: &[StaffExtent], spacing: f64,
) {
    let cx = x + TIME_SIG_WIDTH / 2.0;
    for extent in extents {
        let top = extent.notation_top;
        canvas.text(cx, top + 2.0 * spacing - 1.0, &time.beats.to_string(),
                    SIGNATURE_FONT_SIZE, Anchor::Middle, NOTE_COLOR);
        canvas.text(cx, top + 4.0 * spacing - 1.0, &time.beat_value.to_string(),
                    SIGNATURE_FONT_SIZE, Anchor::Middle, NOTE_COLOR);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Header rows
// ═══════════════════════════════════════════════════════════════════════

pub(super) fn render_tempo_marker(canvas: &mut Canvas, marker: &TempoMarker, x: f64, row_top: f64) {
    canvas.text(x, row_top + TEMPO_ROW_HEIGHT - 5.0, &marker.label(), MARKER_FONT_SIZE, Anchor::Start, MARKER_COLOR);
}

/// Volta bracket from `x1` to `x2` with its label.
pub(super) fn render_alternate_ending(
    canvas: &mut Canvas, ending: &AlternateEnding, x1: f64, x2: f64, row_top: f64,
) {
    let y = row_top + 4.0;
    canvas.line(x1, y, x2, y, NOTE_COLOR, BARLINE_WIDTH);
    canvas.line(x1, y, x1, y + ENDING_HOOK, NOTE_COLOR, BARLINE_WIDTH);
    canvas.text(x1 + 3.0, y + ENDING_ROW_HEIGHT - 6.0, &ending.label(), MARKER_FONT_SIZE, Anchor::Start, NOTE_COLOR);
}
