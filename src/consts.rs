//! Shared numeric constants for the touchbox crate.

// ── Gestures ────────────────────────────────────────────────────

/// Accumulated motion, in local units, an item gesture must exceed before it
/// starts emitting transforms.
pub const TOUCH_SLOP: f64 = 1.0;

/// Floor for the previous pointer distance from the item center when
/// computing a single-finger zoom ratio.
pub const MIN_ZOOM_DISTANCE: f64 = 1.0;

// ── Items ───────────────────────────────────────────────────────

/// Default edge length of a corner control handle, in parent units.
pub const DEFAULT_CONTROL_SIZE: f64 = 24.0;

/// Default border width drawn around an editable item, in parent units.
pub const DEFAULT_BORDER_WIDTH: f64 = 1.0;

/// Default lower bound of an item's zoom.
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;

/// Default upper bound of an item's zoom.
pub const DEFAULT_MAX_ZOOM: f64 = 5.0;

/// Width and height some render surfaces report during a pre-layout pass.
/// Such a measurement never latches an item's content size.
pub const PRE_LAYOUT_PLACEHOLDER_PX: f64 = 1.0;

// ── Viewport ────────────────────────────────────────────────────

/// Default maximum scale of the whole-scene viewport.
pub const DEFAULT_MAX_VIEWPORT_SCALE: f64 = 5.0;

/// Lower bound of the viewport scale (identity).
pub const MIN_VIEWPORT_SCALE: f64 = 1.0;

// ── Snapshots ───────────────────────────────────────────────────

/// Schema version written by [`crate::snapshot::TouchSnapshot`].
pub const SNAPSHOT_VERSION: u32 = 1;
