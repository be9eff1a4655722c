//! Error types for the score model, renderer and layout pipeline.
//!
//! Lookups that can legitimately miss (previous/next barline, hit tests)
//! return `Option` instead of an error. Out-of-range indices are
//! programmer errors and panic.

use thiserror::Error;

/// Violations of the system model's structural invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The start and end barlines of a system cannot be removed.
    #[error("barline at position {position} is a system sentinel and cannot be removed")]
    SentinelBarline { position: i32 },

    /// A barline list (e.g. from deserialized data) lacks a sentinel.
    #[error("barline list is missing the {which} sentinel")]
    MissingSentinel { which: &'static str },
}

/// Failures while turning a system into a visual element.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// A staff with no strings cannot produce a tablature staff.
    #[error("staff {staff_index} has no strings")]
    NoStrings { staff_index: usize },

    /// A note refers to a string the staff does not have.
    #[error("note at position {position} on staff {staff_index} uses string {string} of {string_count}")]
    StringOutOfRange {
        staff_index: usize,
        position: i32,
        string: u8,
        string_count: u8,
    },

    /// Renderer-specific failure.
    #[error("{message}")]
    Other { message: String },
}

/// Failures of a full or incremental layout pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// Rendering the system at `index` failed.
    #[error("failed to render system {index}: {source}")]
    Render {
        index: usize,
        #[source]
        source: RenderError,
    },

    /// A render worker panicked before finishing its range.
    #[error("render worker {worker} panicked")]
    WorkerPanicked { worker: usize },

    /// `redraw_system` was called before any document was rendered.
    #[error("no document has been rendered")]
    NoDocument,
}

/// Failures while loading a layout configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}
