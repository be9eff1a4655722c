//! Layout configuration.
//!
//! Every field has a default taken from the renderer constants, so a
//! configuration file only needs to name what it overrides:
//!
//! ```
//! use scoreview::config::{LayoutConfig, WorkerCount};
//!
//! let config = LayoutConfig::from_json(r#"{ "workers": { "fixed": 1 } }"#).unwrap();
//! assert_eq!(config.workers, WorkerCount::Fixed(1));
//! assert_eq!(config.system_spacing, 50.0);
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::renderer::constants::*;

/// Number of threads used by the render phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerCount {
    /// One worker per available hardware thread.
    #[default]
    Auto,
    /// A fixed number of workers (at least one).
    Fixed(usize),
}

impl WorkerCount {
    /// Concrete worker count before clamping to the number of systems.
    pub fn resolve(self) -> usize {
        match self {
            WorkerCount::Auto => std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            WorkerCount::Fixed(n) => n.max(1),
        }
    }
}

/// Sizes used when drawing a system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderMetrics {
    /// Minimum width of every system
    pub page_width: f64,
    /// Horizontal width of one position index
    pub position_spacing: f64,
    /// Distance between standard notation staff lines
    pub staff_line_spacing: f64,
    /// Distance between tablature lines
    pub tab_line_spacing: f64,
}

impl Default for RenderMetrics {
    fn default() -> Self {
        Self {
            page_width: DEFAULT_PAGE_WIDTH,
            position_spacing: POSITION_SPACING,
            staff_line_spacing: STAFF_LINE_SPACING,
            tab_line_spacing: TAB_LINE_SPACING,
        }
    }
}

/// Settings for the layout pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub workers: WorkerCount,
    /// Vertical gap between stacked systems
    pub system_spacing: f64,
    /// Vertical margin requested around the caret's system when scrolling
    pub caret_scroll_margin: f64,
    pub metrics: RenderMetrics,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            workers: WorkerCount::Auto,
            system_spacing: SYSTEM_SPACING,
            caret_scroll_margin: CARET_SCROLL_MARGIN,
            metrics: RenderMetrics::default(),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Same configuration with a fixed worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = WorkerCount::Fixed(workers);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == WorkerCount::Fixed(0) {
            return Err(invalid("workers must be at least 1"));
        }
        let non_negative = [
            ("system_spacing", self.system_spacing),
            ("caret_scroll_margin", self.caret_scroll_margin),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(&format!("{name} must be a non-negative number")));
            }
        }
        let positive = [
            ("page_width", self.metrics.page_width),
            ("position_spacing", self.metrics.position_spacing),
            ("staff_line_spacing", self.metrics.staff_line_spacing),
            ("tab_line_spacing", self.metrics.tab_line_spacing),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(&format!("{name} must be a positive number")));
            }
        }
        Ok(())
    }
}

fn invalid(message: &str) -> ConfigError {
    ConfigError::Invalid {
        message: message.to_string(),
    }
}
