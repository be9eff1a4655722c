//! scoreview: document model and layout pipeline for a guitar/bass
//! notation editor.
//!
//! A [`Score`] is a sequence of [`System`]s. The [`LayoutEngine`] renders
//! every system (in parallel) and stacks the results; [`ScoreArea`] keeps
//! the scene, caret regions and click channels in sync with the document
//! and supports redrawing a single edited system.
//!
//! # Example
//! ```
//! use scoreview::{render_score_to_svg, LayoutConfig, Score, Staff, System, ViewType};
//!
//! let mut system = System::new();
//! system.insert_staff(Staff::guitar());
//! let score = Score::from(vec![system]);
//!
//! let svg = render_score_to_svg(&score, ViewType::Guitar, &LayoutConfig::default()).unwrap();
//! assert!(svg.starts_with("<svg"));
//! ```

pub mod caret_tracker;
pub mod config;
pub mod document;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod model;
pub mod positioned;
pub mod pubsub;
pub mod renderer;
pub mod scene;
pub mod score_area;
pub mod system;

pub use caret_tracker::{CaretTracker, ScrollRequest};
pub use config::{LayoutConfig, RenderMetrics, WorkerCount};
pub use document::{Caret, Document, Score};
pub use error::{ConfigError, LayoutError, ModelError, RenderError};
pub use geometry::{Point, Rect};
pub use layout::{partition, IncrementalUpdater, LayoutEngine, PlacedSystem, StackedLayout};
pub use model::*;
pub use positioned::{Positioned, PositionedCollection};
pub use pubsub::{NotificationChannel, SubscriptionId};
pub use renderer::{Hit, RenderSystem, SystemGraphic, SystemRenderer};
pub use scene::{ItemId, MemoryScene, MemoryViewport, Scene, Viewport};
pub use score_area::ScoreArea;
pub use system::{Barlines, System};

/// Lay out `score` and export it as one SVG document.
pub fn render_score_to_svg(score: &Score, view: ViewType, config: &LayoutConfig) -> Result<String, LayoutError> {
    let mut area = ScoreArea::new(MemoryScene::new(), config.clone());
    area.render_document(Document::new(score.clone()), view)?;
    Ok(area.scene().to_svg())
}

/// Convert a score to a JSON string.
/// Useful for passing data across FFI boundaries.
pub fn score_to_json(score: &Score) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(score)
}

/// Parse a score from JSON. Barline sentinels are validated on the way in.
pub fn score_from_json(json: &str) -> Result<Score, serde_json::Error> {
    serde_json::from_str(json)
}

// ═══════════════════════════════════════════════════════════════════════
// C FFI (static library and cdylib)
// ═══════════════════════════════════════════════════════════════════════

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

fn view_from_code(code: u8) -> Option<ViewType> {
    match code {
        0 => Some(ViewType::Guitar),
        1 => Some(ViewType::Bass),
        _ => None,
    }
}

/// Render a JSON-encoded score to SVG and return it as a C string.
/// The caller must free the returned string with `scoreview_free_string`.
///
/// `view` is 0 for the guitar view and 1 for the bass view. Returns null on
/// any error.
///
/// # Safety
/// `json` must be a valid null-terminated UTF-8 C string.
#[no_mangle]
pub unsafe extern "C" fn scoreview_render_json(json: *const c_char, view: u8) -> *mut c_char {
    if json.is_null() {
        return std::ptr::null_mut();
    }
    let c_str = unsafe { CStr::from_ptr(json) };
    let Ok(json) = c_str.to_str() else {
        return std::ptr::null_mut();
    };
    let Some(view) = view_from_code(view) else {
        tracing::warn!(view, "unknown view code");
        return std::ptr::null_mut();
    };

    let svg = score_from_json(json)
        .map_err(|e| e.to_string())
        .and_then(|score| render_score_to_svg(&score, view, &LayoutConfig::default()).map_err(|e| e.to_string()));
    match svg {
        Ok(svg) => CString::new(svg).unwrap_or_default().into_raw(),
        Err(err) => {
            tracing::warn!(%err, "render failed");
            std::ptr::null_mut()
        }
    }
}

/// Free a string previously returned by scoreview functions.
///
/// # Safety
/// `ptr` must be a string previously returned by a scoreview function, or null.
#[no_mangle]
pub unsafe extern "C" fn scoreview_free_string(ptr: *mut c_char) {
    if !ptr.is_null() {
        unsafe {
            let _ = CString::from_raw(ptr);
        }
    }
}
