//! Single-pointer gesture classifier for one item.
//!
//! The classifier is an explicit state machine pumped by the engine, one
//! [`PointerEvent`] at a time, in the item's local (unrotated, unscaled)
//! coordinates:
//!
//! ```text
//! Idle --down--> Down --slop exceeded--> Dragging
//!                 |                         |
//!                 +----up / cancel----------+--> End signal, back to Idle
//! ```
//!
//! Which corner the first contact lands in decides the mode for the whole
//! gesture: the bottom-end corner rotates and zooms around the item center,
//! the reserved handle corners suppress panning, everything else pans.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::consts::{MIN_ZOOM_DISTANCE, TOUCH_SLOP};
use crate::geometry::{Corner, Point, Size, classify_corner, normalize_degrees};
use crate::input::{PointerChange, PointerEvent};

/// Which optional corner handles the host renders.
///
/// The top-start (remove) and bottom-end (rotate/zoom) handles are always
/// present; the other two are optional and, when absent, their corner is
/// ordinary draggable surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HandleSlots {
    /// A host control occupies the top-end corner.
    pub top_end: bool,
    /// A host control occupies the bottom-start corner.
    pub bottom_start: bool,
}

impl HandleSlots {
    /// Whether `corner` is a handle that blocks panning.
    #[must_use]
    pub fn reserves(self, corner: Corner) -> bool {
        match corner {
            Corner::TopStart => true,
            Corner::TopEnd => self.top_end,
            Corner::BottomStart => self.bottom_start,
            Corner::BottomEnd | Corner::Other => false,
        }
    }
}

/// Output of the classifier for one event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSignal {
    /// First contact; the gesture owns the pointer stream from here on.
    Start { corner: Corner },
    /// A committed delta: local pan, multiplicative zoom, rotation in degrees.
    Transform { pan: Point, zoom: f64, rotation: f64 },
    /// The gesture is over.
    End {
        /// Corner classified at first contact.
        corner: Corner,
        /// Whether motion ever exceeded the slop.
        committed: bool,
        /// Whether another interpreter consumed the stream first.
        canceled: bool,
    },
}

/// Mode fixed at first contact.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchMode {
    corner: Corner,
    /// Pivot for single-finger rotate/zoom: the local box center.
    center: Point,
    rotate_zoom: bool,
    pan_allowed: bool,
}

/// Motion accumulated while the gesture is still under the slop.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SlopAccumulator {
    rotation: f64,
    zoom: f64,
    pan: Point,
}

impl Default for SlopAccumulator {
    fn default() -> Self {
        Self { rotation: 0.0, zoom: 1.0, pan: Point::ZERO }
    }
}

impl SlopAccumulator {
    /// Add one event's motion and report whether the slop is now exceeded.
    fn exceeds_after(&mut self, rotation: f64, zoom: f64, pan: Point, centroid_distance: f64) -> bool {
        self.rotation += rotation;
        self.zoom *= zoom;
        self.pan += pan;
        let zoom_motion = (1.0 - self.zoom).abs() * centroid_distance;
        let rotation_motion = (self.rotation * PI * centroid_distance / 180.0).abs();
        let pan_motion = self.pan.distance();
        zoom_motion > TOUCH_SLOP || rotation_motion > TOUCH_SLOP || pan_motion > TOUCH_SLOP
    }
}

/// Internal state of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum GestureState {
    /// Waiting for the next first contact.
    #[default]
    Idle,
    /// Pointer is down; motion is accumulated but not emitted.
    Down { mode: TouchMode, acc: SlopAccumulator },
    /// Past the slop; every non-trivial delta is emitted.
    Dragging { mode: TouchMode },
}

/// Classifies a single item's pointer stream into transform deltas.
#[derive(Debug, Clone)]
pub struct GestureDetector {
    corner_threshold: f64,
    handles: HandleSlots,
    state: GestureState,
}

impl GestureDetector {
    #[must_use]
    pub fn new(corner_threshold: f64, handles: HandleSlots) -> Self {
        Self { corner_threshold, handles, state: GestureState::Idle }
    }

    /// Whether a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self.state, GestureState::Idle)
    }

    /// Whether the gesture in progress has exceeded the slop.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self.state, GestureState::Dragging { .. })
    }

    /// Corner of the gesture in progress, if any.
    #[must_use]
    pub fn corner(&self) -> Option<Corner> {
        match self.state {
            GestureState::Idle => None,
            GestureState::Down { mode, .. } | GestureState::Dragging { mode } => Some(mode.corner),
        }
    }

    /// Abort the gesture in progress, returning its end signal.
    pub fn cancel(&mut self) -> Option<GestureSignal> {
        let corner = self.corner()?;
        let committed = self.is_committed();
        self.state = GestureState::Idle;
        Some(GestureSignal::End { corner, committed, canceled: true })
    }

    /// Feed one event, in local coordinates of a box of `size`.
    pub fn on_event(&mut self, event: &mut PointerEvent, size: Size) -> Vec<GestureSignal> {
        match self.state {
            GestureState::Idle => self.on_first_down(event, size),
            GestureState::Down { .. } | GestureState::Dragging { .. } => self.on_pointer_move(event),
        }
    }

    fn on_first_down(&mut self, event: &PointerEvent, size: Size) -> Vec<GestureSignal> {
        let Some(down) = event.first_down() else {
            return Vec::new();
        };
        let corner = classify_corner(down.position, size, self.corner_threshold);
        let mode = TouchMode {
            corner,
            center: size.center(),
            rotate_zoom: corner == Corner::BottomEnd,
            pan_allowed: !self.handles.reserves(corner),
        };
        tracing::trace!(?corner, "item gesture down");
        self.state = GestureState::Down { mode, acc: SlopAccumulator::default() };
        vec![GestureSignal::Start { corner }]
    }

    fn on_pointer_move(&mut self, event: &mut PointerEvent) -> Vec<GestureSignal> {
        if event.any_consumed() {
            return self.finish(true);
        }
        let Some(change) = event.first_dragging().copied() else {
            return self.finish(false);
        };

        let mut signals = Vec::new();
        match self.state {
            GestureState::Idle => {}
            GestureState::Down { mode, mut acc } => {
                let (pan, zoom, rotation) = Self::deltas(mode, &change, event);
                let distance = (change.position - mode.center).distance().max(MIN_ZOOM_DISTANCE);
                if acc.exceeds_after(rotation, zoom, pan, distance) {
                    self.state = GestureState::Dragging { mode };
                    Self::emit(&mut signals, event, pan, zoom, rotation);
                } else {
                    self.state = GestureState::Down { mode, acc };
                }
            }
            GestureState::Dragging { mode } => {
                let (pan, zoom, rotation) = Self::deltas(mode, &change, event);
                Self::emit(&mut signals, event, pan, zoom, rotation);
            }
        }

        if !event.any_pressed() {
            signals.extend(self.finish(false));
        }
        signals
    }

    /// Pan, zoom and rotation contributed by one event under `mode`.
    fn deltas(mode: TouchMode, change: &PointerChange, event: &PointerEvent) -> (Point, f64, f64) {
        let (rotation, zoom) =
            if mode.rotate_zoom { (single_rotation(change, mode.center), single_zoom(change, mode.center)) } else { (0.0, 1.0) };
        let is_transform = rotation != 0.0 || zoom != 1.0;
        let pan = if is_transform || !mode.pan_allowed { Point::ZERO } else { event.pan() };
        (pan, zoom, rotation)
    }

    fn emit(signals: &mut Vec<GestureSignal>, event: &mut PointerEvent, pan: Point, zoom: f64, rotation: f64) {
        if rotation != 0.0 || zoom != 1.0 || !pan.is_zero() {
            signals.push(GestureSignal::Transform { pan, zoom, rotation });
        }
        event.consume_moved();
    }

    fn finish(&mut self, canceled: bool) -> Vec<GestureSignal> {
        let Some(corner) = self.corner() else {
            return Vec::new();
        };
        let committed = self.is_committed();
        self.state = GestureState::Idle;
        tracing::trace!(?corner, committed, canceled, "item gesture end");
        vec![GestureSignal::End { corner, committed, canceled }]
    }
}

/// Signed angle in degrees swept by `change` around `center`.
fn single_rotation(change: &PointerChange, center: Point) -> f64 {
    let prev = change.previous_position - center;
    let curr = change.position - center;
    let prev_angle = prev.y.atan2(prev.x).to_degrees();
    let curr_angle = curr.y.atan2(curr.x).to_degrees();
    normalize_degrees(curr_angle - prev_angle)
}

/// Ratio of the current to previous distance of `change` from `center`.
fn single_zoom(change: &PointerChange, center: Point) -> f64 {
    let prev = (change.previous_position - center).distance().max(MIN_ZOOM_DISTANCE);
    let curr = (change.position - center).distance();
    curr / prev
}
