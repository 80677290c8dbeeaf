//! Input model: pointer changes, pointer events, and centroid math.
//!
//! The host delivers one [`PointerEvent`] per dispatch. Each event lists every
//! pointer the host is tracking, with its current and previous position and
//! pressed state. The `consumed` flag is shared state: whichever interpreter
//! turns an event into a transform marks the moved changes consumed so other
//! interpreters see the event as already handled.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::geometry::Point;

/// Stable identifier of a pointer (finger, pen, mouse) for one press sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PointerId(pub u64);

/// The state of one pointer at one dispatch.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerChange {
    /// Which pointer this change belongs to.
    pub id: PointerId,
    /// Current position.
    pub position: Point,
    /// Position at the previous dispatch.
    pub previous_position: Point,
    /// Whether the pointer is down now.
    pub pressed: bool,
    /// Whether the pointer was down at the previous dispatch.
    pub previous_pressed: bool,
    /// Set once an interpreter has acted on this change.
    pub consumed: bool,
}

impl PointerChange {
    /// A pointer going down at `position`.
    #[must_use]
    pub fn down(id: PointerId, position: Point) -> Self {
        Self { id, position, previous_position: position, pressed: true, previous_pressed: false, consumed: false }
    }

    /// A pressed pointer moving from `from` to `to`.
    #[must_use]
    pub fn moved(id: PointerId, from: Point, to: Point) -> Self {
        Self { id, position: to, previous_position: from, pressed: true, previous_pressed: true, consumed: false }
    }

    /// A pointer lifting at `position`.
    #[must_use]
    pub fn up(id: PointerId, position: Point) -> Self {
        Self { id, position, previous_position: position, pressed: false, previous_pressed: true, consumed: false }
    }

    /// Pressed now but not at the previous dispatch.
    #[must_use]
    pub fn changed_to_down(&self) -> bool {
        self.pressed && !self.previous_pressed
    }

    /// Released at this dispatch.
    #[must_use]
    pub fn changed_to_up(&self) -> bool {
        !self.pressed && self.previous_pressed
    }

    /// Pressed at both this and the previous dispatch.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.pressed && self.previous_pressed
    }

    /// Whether the position moved since the previous dispatch.
    #[must_use]
    pub fn position_changed(&self) -> bool {
        self.position != self.previous_position
    }

    /// Mark this change as handled.
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// The same change with both positions mapped through `map`.
    #[must_use]
    pub fn map_positions(&self, map: impl Fn(Point) -> Point) -> Self {
        Self { position: map(self.position), previous_position: map(self.previous_position), ..*self }
    }
}

/// One dispatch of pointer state from the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerEvent {
    pub changes: Vec<PointerChange>,
}

impl PointerEvent {
    #[must_use]
    pub fn new(changes: Vec<PointerChange>) -> Self {
        Self { changes }
    }

    /// Single-pointer convenience constructor.
    #[must_use]
    pub fn single(change: PointerChange) -> Self {
        Self { changes: vec![change] }
    }

    /// Whether any change was already handled by another interpreter.
    #[must_use]
    pub fn any_consumed(&self) -> bool {
        self.changes.iter().any(|c| c.consumed)
    }

    /// Whether any pointer is down.
    #[must_use]
    pub fn any_pressed(&self) -> bool {
        self.changes.iter().any(|c| c.pressed)
    }

    /// The first change that went down at this dispatch.
    #[must_use]
    pub fn first_down(&self) -> Option<&PointerChange> {
        self.changes.iter().find(|c| c.changed_to_down())
    }

    /// The first change that was pressed at both dispatches.
    #[must_use]
    pub fn first_dragging(&self) -> Option<&PointerChange> {
        self.changes.iter().find(|c| c.is_dragging())
    }

    /// Mark every change whose position moved as consumed.
    pub fn consume_moved(&mut self) {
        for change in &mut self.changes {
            if change.position_changed() {
                change.consume();
            }
        }
    }

    /// The same event with every position mapped through `map`.
    #[must_use]
    pub fn map_positions(&self, map: impl Fn(Point) -> Point) -> Self {
        Self { changes: self.changes.iter().map(|c| c.map_positions(&map)).collect() }
    }

    /// Copy the consumed flags of `other` (same length and order) onto `self`.
    pub fn merge_consumed(&mut self, other: &Self) {
        for (mine, theirs) in self.changes.iter_mut().zip(&other.changes) {
            mine.consumed |= theirs.consumed;
        }
    }

    /// Centroid of the dragging pointers, current or previous positions.
    #[must_use]
    pub fn centroid(&self, current: bool) -> Option<Point> {
        let mut sum = Point::ZERO;
        let mut count = 0_u32;
        for change in self.changes.iter().filter(|c| c.is_dragging()) {
            sum += if current { change.position } else { change.previous_position };
            count += 1;
        }
        (count > 0).then(|| sum / f64::from(count))
    }

    /// Mean distance of the dragging pointers from their centroid.
    #[must_use]
    pub fn centroid_size(&self, current: bool) -> f64 {
        let Some(centroid) = self.centroid(current) else {
            return 0.0;
        };
        let mut total = 0.0;
        let mut count = 0_u32;
        for change in self.changes.iter().filter(|c| c.is_dragging()) {
            let p = if current { change.position } else { change.previous_position };
            total += (p - centroid).distance();
            count += 1;
        }
        total / f64::from(count)
    }

    /// Translation of the dragging pointers' centroid since the previous dispatch.
    #[must_use]
    pub fn pan(&self) -> Point {
        match (self.centroid(true), self.centroid(false)) {
            (Some(current), Some(previous)) => current - previous,
            _ => Point::ZERO,
        }
    }

    /// Ratio of the current to the previous centroid size; 1 when either is zero.
    #[must_use]
    pub fn zoom(&self) -> f64 {
        let current = self.centroid_size(true);
        let previous = self.centroid_size(false);
        if current == 0.0 || previous == 0.0 { 1.0 } else { current / previous }
    }
}
