//! Construction-time configuration for [`crate::engine::EngineCore`].

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BORDER_WIDTH, DEFAULT_CONTROL_SIZE, DEFAULT_MAX_VIEWPORT_SCALE, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, MIN_VIEWPORT_SCALE,
};
use crate::error::TouchError;
use crate::geometry::Size;
use crate::gesture::HandleSlots;
use crate::state::validate_zoom_range;
use crate::transform::initial_target_size;

/// Engine configuration. Every field has a default, so a partial JSON
/// document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchConfig {
    /// Size a new item is fitted into on first layout; zero means half the
    /// parent.
    pub init_item_size: Size,
    /// Allowed item zoom. The lower bound must be strictly positive.
    pub zoom_range: RangeInclusive<f64>,
    /// Edge length of a corner handle; also the corner hit threshold.
    pub control_size: f64,
    /// Border width around editable items.
    pub border_width: f64,
    /// Upper bound of the whole-scene viewport scale.
    pub max_viewport_scale: f64,
    /// Optional top-end / bottom-start handles.
    pub handles: HandleSlots,
    /// Whether pointer events outside an item gesture drive the viewport.
    pub viewport_enabled: bool,
}

impl Default for TouchConfig {
    fn default() -> Self {
        Self {
            init_item_size: Size::ZERO,
            zoom_range: DEFAULT_MIN_ZOOM..=DEFAULT_MAX_ZOOM,
            control_size: DEFAULT_CONTROL_SIZE,
            border_width: DEFAULT_BORDER_WIDTH,
            max_viewport_scale: DEFAULT_MAX_VIEWPORT_SCALE,
            handles: HandleSlots::default(),
            viewport_enabled: true,
        }
    }
}

impl TouchConfig {
    /// Parse a JSON config document and validate it.
    ///
    /// # Errors
    ///
    /// `ConfigParse` for malformed JSON, otherwise whatever [`Self::validate`]
    /// rejects.
    pub fn from_json(json: &str) -> Result<Self, TouchError> {
        let config: Self = serde_json::from_str(json).map_err(|e| TouchError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// `InvalidZoomRange`, `InvalidInitialContentSize` for a non-zero initial
    /// size that does not exceed the control size, `InvalidMaxScale`, and
    /// `ConfigParse` for a negative or non-finite control size or border.
    pub fn validate(&self) -> Result<(), TouchError> {
        validate_zoom_range(&self.zoom_range)?;
        if !self.control_size.is_finite() || self.control_size < 0.0 {
            return Err(TouchError::ConfigParse(format!("control_size must be >= 0, got {}", self.control_size)));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(TouchError::ConfigParse(format!("border_width must be >= 0, got {}", self.border_width)));
        }
        initial_target_size(Size::ZERO, self.init_item_size, self.control_size)?;
        if !self.max_viewport_scale.is_finite() || self.max_viewport_scale < MIN_VIEWPORT_SCALE {
            return Err(TouchError::InvalidMaxScale(self.max_viewport_scale));
        }
        Ok(())
    }
}
