//! Whole-scene pinch-zoom and pan, independent of the per-item classifier.
//!
//! The viewport scales the scene around its center and translates it by
//! `offset`. Scale stays in `[1, max_scale]`; the offset is clamped so the
//! scaled scene never reveals anything outside its unscaled extent, and it
//! is exactly zero whenever the scale is 1.
//!
//! Events arrive in viewport (screen) space, so the centroid pan is used as
//! is; it already includes the current scale.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::consts::{DEFAULT_MAX_VIEWPORT_SCALE, MIN_VIEWPORT_SCALE};
use crate::error::TouchError;
use crate::geometry::{Point, Size, clamp_span};
use crate::input::PointerEvent;

/// Scale and translation of the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportTransform {
    pub scale: f64,
    pub offset: Point,
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self { scale: MIN_VIEWPORT_SCALE, offset: Point::ZERO }
    }
}

impl ViewportTransform {
    /// Map a viewport point to scene coordinates.
    #[must_use]
    pub fn to_scene(&self, screen: Point, size: Size) -> Point {
        let center = size.center();
        (screen - self.offset - center) / self.scale + center
    }

    /// Map a scene point to viewport coordinates.
    #[must_use]
    pub fn to_screen(&self, scene: Point, size: Size) -> Point {
        let center = size.center();
        (scene - center) * self.scale + center + self.offset
    }
}

/// Outcome of one event fed to [`ViewportController::on_event`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportUpdate {
    pub transform: ViewportTransform,
    /// Scale or offset moved; the scene must be redrawn.
    pub changed: bool,
    /// The consumer should be told and the event was consumed.
    pub reported: bool,
}

/// Pinch/pan interpreter for the whole scene.
#[derive(Debug, Clone)]
pub struct ViewportController {
    max_scale: f64,
    transform: ViewportTransform,
    tracking: bool,
}

impl Default for ViewportController {
    fn default() -> Self {
        Self { max_scale: DEFAULT_MAX_VIEWPORT_SCALE, transform: ViewportTransform::default(), tracking: false }
    }
}

impl ViewportController {
    /// # Errors
    ///
    /// `InvalidMaxScale` when `max_scale` is below 1 or not finite.
    pub fn new(max_scale: f64) -> Result<Self, TouchError> {
        if !max_scale.is_finite() || max_scale < MIN_VIEWPORT_SCALE {
            return Err(TouchError::InvalidMaxScale(max_scale));
        }
        Ok(Self { max_scale, ..Self::default() })
    }

    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    #[must_use]
    pub fn max_scale(&self) -> f64 {
        self.max_scale
    }

    /// Whether a pointer sequence is being tracked.
    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    /// Return to identity and drop any tracked sequence.
    pub fn reset(&mut self) {
        self.transform = ViewportTransform::default();
        self.tracking = false;
    }

    /// Stop tracking the current sequence without touching the transform.
    pub fn abandon(&mut self) {
        self.tracking = false;
    }

    /// Feed one event for a viewport of `size`.
    ///
    /// Returns `None` when the event left the transform untouched and needs
    /// no report. `reported` is set on multi-pointer events, when a
    /// horizontal pan moved the content (content pinned at its horizontal
    /// edge lets the swipe fall through to an outer pager), and when the
    /// offset snaps back at scale 1. Reported events have their moved
    /// changes consumed. `changed` is set whenever scale or offset moved,
    /// reported or not.
    pub fn on_event(&mut self, event: &mut PointerEvent, size: Size) -> Option<ViewportUpdate> {
        if !self.tracking {
            if event.first_down().is_some() {
                self.tracking = true;
            }
            return None;
        }

        let before = self.transform;
        let scale = clamp_span(self.transform.scale * event.zoom(), MIN_VIEWPORT_SCALE, self.max_scale);
        self.transform.scale = scale;
        let multi = event.changes.len() > 1;

        let reported = if scale > MIN_VIEWPORT_SCALE {
            let pan = event.pan();
            let limit_x = (scale * size.width - size.width) / 2.0;
            let limit_y = (scale * size.height - size.height) / 2.0;
            let offset = self.transform.offset;
            let x = clamp_span(offset.x + pan.x, -limit_x, limit_x);
            let y = clamp_span(offset.y + pan.y, -limit_y, limit_y);
            self.transform.offset = Point::new(x, y);
            multi || x != offset.x
        } else if self.transform.offset.is_zero() {
            multi
        } else {
            // Scale 1 shows the whole scene; no offset survives it.
            self.transform.offset = Point::ZERO;
            true
        };
        let changed = self.transform != before;

        if reported {
            event.consume_moved();
        }
        if !event.any_pressed() {
            self.tracking = false;
        }
        if !reported && !changed {
            return None;
        }
        tracing::trace!(scale, offset = ?self.transform.offset, reported, "viewport changed");
        Some(ViewportUpdate { transform: self.transform, changed, reported })
    }
}
