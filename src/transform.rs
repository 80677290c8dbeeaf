//! Transform box controller: turns committed gesture deltas into item
//! geometry while keeping the item inside its parent.
//!
//! Coordinate spaces:
//! - *parent* space: the bounding container, origin at its top-left corner.
//! - *local* space: the item box before zoom and rotation, origin at the box
//!   top-left. The box is the content plus half a control handle of padding
//!   on every side, so handles straddle the content corners.
//!
//! The renderer places the box with [`LayerTransform`]: translate by
//! `offset`, then scale by `zoom` and rotate by `rotation` around the box
//! center.

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;

use std::ops::RangeInclusive;

use crate::consts::PRE_LAYOUT_PLACEHOLDER_PX;
use crate::error::TouchError;
use crate::geometry::{Corner, Point, Size, angle_components, clamp_span, rotate_point, rotated_bounding_size};
use crate::gesture::HandleSlots;
use crate::state::TransformRecord;

/// Layer transform a renderer applies to an item box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerTransform {
    /// Top-left translation of the unscaled box, in parent space.
    pub translation: Point,
    /// Uniform scale around `origin`.
    pub scale: f64,
    /// Rotation in degrees around `origin`.
    pub rotation: f64,
    /// Transform origin, local to the box (its center).
    pub origin: Point,
    /// Unscaled box size (content plus control padding).
    pub box_size: Size,
}

/// What a renderer draws on top of an editable item.
#[derive(Debug, Clone, PartialEq)]
pub struct HandleLayout {
    /// Corners that carry a handle, in draw order.
    pub corners: Vec<Corner>,
    /// Edge length of each handle, local units before counter-scaling.
    pub handle_size: f64,
    /// Counter-scale that keeps handles a constant on-screen size.
    pub handle_scale: f64,
    /// Border width in local units, so it renders at the configured width.
    pub border_width: f64,
    /// Inset of the content (and its border) from the box edge.
    pub content_inset: f64,
}

/// Unscaled size of an item box: content plus one control of padding.
#[must_use]
pub fn item_box_size(item: &TransformRecord, control_size: f64) -> Size {
    item.content_size.inflate(control_size)
}

/// Axis-aligned bounds of the item's rotated, zoomed content, as
/// `(top_left, size)` in parent space.
#[must_use]
pub fn rotated_bounds(item: &TransformRecord) -> (Point, Size) {
    let (cos, sin) = angle_components(item.rotation);
    let scaled = item.content_size.scale(item.zoom);
    let size = rotated_bounding_size(scaled.width, scaled.height, cos, sin);
    let half = size.half();
    (Point::new(item.center_point.x - half.width, item.center_point.y - half.height), size)
}

/// Map a parent-space point into the item's local box space.
#[must_use]
pub fn scene_to_local(item: &TransformRecord, point: Point, control_size: f64) -> Point {
    let (cos, sin) = angle_components(-item.rotation);
    let zoom = if item.zoom > 0.0 { item.zoom } else { 1.0 };
    let unrotated = rotate_point(point - item.center_point, cos, sin) / zoom;
    unrotated + item_box_size(item, control_size).center()
}

/// Map a local box point back into parent space.
#[must_use]
pub fn local_to_scene(item: &TransformRecord, point: Point, control_size: f64) -> Point {
    let (cos, sin) = angle_components(item.rotation);
    let from_center = point - item_box_size(item, control_size).center();
    rotate_point(from_center * item.zoom, cos, sin) + item.center_point
}

/// Apply one committed gesture delta to `item`.
///
/// A non-zero `pan` (local units) moves the item, clamped so its rotated
/// bounds stay inside `parent`. Otherwise `zoom_factor` is capped so the
/// bounds cannot grow past any parent edge, the result is clamped to
/// `zoom_range`, and `rotation` (degrees) is added unclamped.
pub fn apply_gesture(
    item: &mut TransformRecord,
    parent: Size,
    zoom_range: &RangeInclusive<f64>,
    pan: Point,
    zoom_factor: f64,
    rotation: f64,
) {
    let (top_left, bounds) = rotated_bounds(item);
    let half = bounds.half();
    let center = item.center_point;

    if !pan.is_zero() {
        let (cos, sin) = angle_components(item.rotation);
        let requested = rotate_point(pan * item.zoom, cos, sin);
        let min_left = center.x - half.width;
        let max_right = parent.width - (center.x + half.width);
        let min_top = center.y - half.height;
        let max_bottom = parent.height - (center.y + half.height);
        let clamped = Point::new(
            clamp_span(requested.x, -min_left, max_right),
            clamp_span(requested.y, -min_top, max_bottom),
        );
        tracing::trace!(key = %item.key, ?requested, ?clamped, "pan");
        item.translate(clamped);
    } else {
        // The cap only limits growth; it never forces a shrink on an item a
        // rotation already pushed past an edge.
        let cap = max_zoom_factor(top_left, bounds, parent).max(1.0);
        let factor = zoom_factor.min(cap);
        let zoom = clamp_span(item.zoom * factor, *zoom_range.start(), *zoom_range.end());
        tracing::trace!(key = %item.key, zoom, rotation, "zoom/rotate");
        item.set_zoom(zoom);
        item.rotate_by(rotation);
    }
}

/// Largest uniform scale factor before any edge of `bounds` (at `top_left`)
/// crosses the parent boundary. Unbounded while either size is unmeasured.
fn max_zoom_factor(top_left: Point, bounds: Size, parent: Size) -> f64 {
    if parent.is_zero() || bounds.width <= 0.0 || bounds.height <= 0.0 {
        return f64::INFINITY;
    }
    let half = bounds.half();
    let left = top_left.x;
    let top = top_left.y;
    let right = parent.width - (top_left.x + bounds.width);
    let bottom = parent.height - (top_left.y + bounds.height);
    [
        (half.width + left) / half.width,
        (half.width + right) / half.width,
        (half.height + top) / half.height,
        (half.height + bottom) / half.height,
    ]
    .into_iter()
    .fold(f64::INFINITY, f64::min)
}

/// The size a newly measured item should initially occupy.
///
/// # Errors
///
/// `InvalidInitialContentSize` when a configured size does not exceed the
/// control size on both axes.
pub fn initial_target_size(parent: Size, init_content_size: Size, control_size: f64) -> Result<Size, TouchError> {
    if init_content_size.is_zero() {
        return Ok(parent.half());
    }
    if init_content_size.width <= control_size || init_content_size.height <= control_size {
        return Err(TouchError::InvalidInitialContentSize {
            width: init_content_size.width,
            height: init_content_size.height,
            control_size,
        });
    }
    Ok(init_content_size)
}

/// First-layout latch: record `measured` as the item's content size, zoom
/// it to fit the initial target size, and center its box on `center_point`.
///
/// Returns `Ok(true)` when the latch fired. Pre-layout 1×1 measurements,
/// empty measurements, an unmeasured parent, and already-measured items
/// are no-ops.
///
/// # Errors
///
/// `InvalidInitialContentSize` (see [`initial_target_size`]) and
/// `HandleOverlap` when the content is not larger than the control size,
/// which would make the corner regions overlap.
pub fn init_content_size(
    item: &mut TransformRecord,
    measured: Size,
    parent: Size,
    init_content_size: Size,
    control_size: f64,
) -> Result<bool, TouchError> {
    if measured.width == PRE_LAYOUT_PLACEHOLDER_PX && measured.height == PRE_LAYOUT_PLACEHOLDER_PX {
        return Ok(false);
    }
    if item.is_measured() || measured.width <= 0.0 || measured.height <= 0.0 {
        return Ok(false);
    }
    let target = initial_target_size(parent, init_content_size, control_size)?;
    if target.width <= 0.0 || target.height <= 0.0 {
        tracing::warn!(key = %item.key, "content measured before parent; waiting for parent layout");
        return Ok(false);
    }
    if measured.min_dimension() <= control_size {
        return Err(TouchError::HandleOverlap { width: measured.width, height: measured.height, control_size });
    }
    let zoom = (target.width / measured.width).min(target.height / measured.height);
    Ok(item.latch_content_size(measured, control_size, zoom))
}

/// Layer transform for rendering `item`.
#[must_use]
pub fn layer_transform(item: &TransformRecord, control_size: f64) -> LayerTransform {
    let box_size = item_box_size(item, control_size);
    LayerTransform {
        translation: item.offset,
        scale: item.zoom,
        rotation: item.rotation,
        origin: box_size.center(),
        box_size,
    }
}

/// Handle overlay for `item`, or `None` while it is not editable.
#[must_use]
pub fn handle_layout(item: &TransformRecord, control_size: f64, border_width: f64, slots: HandleSlots) -> Option<HandleLayout> {
    if !item.editable {
        return None;
    }
    let mut corners = vec![Corner::TopStart, Corner::BottomEnd];
    if slots.top_end {
        corners.push(Corner::TopEnd);
    }
    if slots.bottom_start {
        corners.push(Corner::BottomStart);
    }
    let zoom = if item.zoom > 0.0 { item.zoom } else { 1.0 };
    Some(HandleLayout {
        corners,
        handle_size: control_size,
        handle_scale: 1.0 / zoom,
        border_width: border_width / zoom,
        content_inset: control_size / 2.0,
    })
}
