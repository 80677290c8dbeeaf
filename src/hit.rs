#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::geometry::{Corner, Point, classify_corner};
use crate::gesture::HandleSlots;
use crate::state::{TouchState, TransformRecord};
use crate::transform::{item_box_size, scene_to_local};

/// Which part of an item was hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitPart {
    Body,
    /// A visible corner handle of an editable item.
    Handle(Corner),
}

/// Result of a hit test.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit {
    pub key: String,
    pub part: HitPart,
    /// The hit point in the item's local box space.
    pub local: Point,
}

/// Test which item on `page` (if any) is under `scene_pt`, topmost first.
///
/// Items draw in insertion order, so the last one added wins overlaps.
/// Unmeasured items have no box yet and are never hit.
#[must_use]
pub fn hit_test(scene_pt: Point, state: &TouchState, page: i32, control_size: f64, slots: HandleSlots) -> Option<Hit> {
    state
        .items()
        .iter()
        .rev()
        .filter(|item| item.page == page && item.is_measured())
        .find_map(|item| hit_item(item, scene_pt, control_size, slots))
}

fn hit_item(item: &TransformRecord, scene_pt: Point, control_size: f64, slots: HandleSlots) -> Option<Hit> {
    let local = scene_to_local(item, scene_pt, control_size);
    let size = item_box_size(item, control_size);
    if local.x < 0.0 || local.y < 0.0 || local.x > size.width || local.y > size.height {
        return None;
    }
    let part = if item.editable {
        match classify_corner(local, size, control_size) {
            corner @ (Corner::TopStart | Corner::BottomEnd) => HitPart::Handle(corner),
            Corner::TopEnd if slots.top_end => HitPart::Handle(Corner::TopEnd),
            Corner::BottomStart if slots.bottom_start => HitPart::Handle(Corner::BottomStart),
            _ => HitPart::Body,
        }
    } else {
        HitPart::Body
    };
    Some(Hit { key: item.key.clone(), part, local })
}
