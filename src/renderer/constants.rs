//! Shared constants for the system renderer (all in layout units).

// ── Page & spacing ──────────────────────────────────────────────────
pub(crate) const DEFAULT_PAGE_WIDTH: f64 = 820.0;
pub(crate) const SYSTEM_SPACING: f64 = 50.0; // vertical space between systems
pub(crate) const CARET_SCROLL_MARGIN: f64 = 100.0; // vertical margin kept around the caret's system
pub(super) const LEFT_MARGIN: f64 = 10.0;
pub(super) const RIGHT_MARGIN: f64 = 10.0;

// ── Header rows ─────────────────────────────────────────────────────
pub(super) const TEMPO_ROW_HEIGHT: f64 = 18.0;
pub(super) const ENDING_ROW_HEIGHT: f64 = 18.0;
pub(super) const ENDING_HOOK: f64 = 8.0; // vertical hook of a volta bracket

// ── Staff dimensions ────────────────────────────────────────────────
pub(crate) const STAFF_LINE_SPACING: f64 = 7.0; // standard notation
pub(crate) const TAB_LINE_SPACING: f64 = 9.0; // tablature
pub(crate) const POSITION_SPACING: f64 = 20.0; // horizontal width of one position
pub(super) const STAFF_TOP_PADDING: f64 = 20.0;
pub(super) const STAFF_BOTTOM_PADDING: f64 = 20.0;
pub(super) const NOTATION_TAB_GAP: f64 = 25.0; // between standard staff and tab staff
pub(super) const EMPTY_SYSTEM_HEIGHT: f64 = 40.0; // a system with no visible staff
pub(super) const CLEF_SPACE: f64 = 24.0; // horizontal space for clef at system start

// ── Signatures & barlines ───────────────────────────────────────────
pub(super) const KEY_SIG_WIDTH: f64 = 16.0;
pub(super) const TIME_SIG_WIDTH: f64 = 14.0;
pub(super) const DOUBLE_BAR_GAP: f64 = 3.0;
pub(super) const REPEAT_DOT_SIZE: f64 = 3.0;
pub(super) const BARLINE_HIT_WIDTH: f64 = 6.0;

// ── Text ────────────────────────────────────────────────────────────
pub(super) const CLEF_FONT_SIZE: f64 = 20.0;
pub(super) const SIGNATURE_FONT_SIZE: f64 = 11.0;
pub(super) const FRET_FONT_SIZE: f64 = 9.0;
pub(super) const MARKER_FONT_SIZE: f64 = 10.0;

// ── Line widths ─────────────────────────────────────────────────────
pub(super) const BARLINE_WIDTH: f64 = 1.0;
pub(super) const HEAVY_BARLINE_WIDTH: f64 = 3.0;
pub(super) const STAFF_LINE_WIDTH: f64 = 0.8;

// ── Colors ──────────────────────────────────────────────────────────
pub(super) const NOTE_COLOR: &str = "#1a1a1a";
pub(super) const STAFF_COLOR: &str = "#555555";
pub(super) const BARLINE_COLOR: &str = "#333333";
pub(super) const MARKER_COLOR: &str = "#4a4a9a";
