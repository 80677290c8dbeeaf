//! Transform state: per-item records and the collection that owns them.
//!
//! DESIGN
//! ======
//! `TouchState` keeps items in insertion order so page grouping and draw
//! order are deterministic. Keys are unique across the whole collection,
//! independent of page. Every mutation bumps `revision`, which hosts that
//! poll instead of consuming engine actions can use as a redraw trigger.
//! Grouping by page is recomputed on read; collections are small and the
//! backing `Vec` is the single source of truth.

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

use std::collections::{BTreeMap, HashSet};
use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TouchError;
use crate::geometry::{Point, Size};

// =============================================================================
// TRANSFORM RECORD
// =============================================================================

/// One transformable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformRecord {
    /// Unique, non-blank identity.
    pub key: String,
    /// Page bucket for multi-page layouts.
    #[serde(default)]
    pub page: i32,
    /// Rotation pivot and visual center, in parent coordinates.
    pub center_point: Point,
    /// Rotation in degrees; accumulates signed deltas.
    #[serde(default)]
    pub rotation: f64,
    /// Uniform scale of the item box.
    pub zoom: f64,
    /// Top-left translation of the item box, in parent coordinates.
    #[serde(default)]
    pub offset: Point,
    /// Measured content size; zero until the first layout pass.
    #[serde(default)]
    pub content_size: Size,
    /// Whether the item owns pointer input and shows its handles.
    #[serde(default)]
    pub editable: bool,
}

impl TransformRecord {
    /// A fresh, unmeasured, non-editable item centered at `center_point`.
    #[must_use]
    pub fn new(key: impl Into<String>, page: i32, center_point: Point) -> Self {
        Self {
            key: key.into(),
            page,
            center_point,
            rotation: 0.0,
            zoom: 1.0,
            offset: Point::ZERO,
            content_size: Size::ZERO,
            editable: false,
        }
    }

    /// Whether the first layout pass has latched the content size.
    #[must_use]
    pub fn is_measured(&self) -> bool {
        !self.content_size.is_zero()
    }

    /// Move the item; offset and center travel together.
    pub(crate) fn translate(&mut self, pan: Point) {
        self.offset += pan;
        self.center_point += pan;
    }

    pub(crate) fn rotate_by(&mut self, degrees: f64) {
        self.rotation += degrees;
    }

    pub(crate) fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    /// Latch the content size once; later calls are no-ops. Returns whether
    /// the latch fired.
    pub(crate) fn latch_content_size(&mut self, size: Size, control_size: f64, zoom: f64) -> bool {
        if self.is_measured() {
            return false;
        }
        self.content_size = size;
        self.zoom = zoom;
        let half_box = size.inflate(control_size).half();
        self.offset = Point::new(self.center_point.x - half_box.width, self.center_point.y - half_box.height);
        true
    }
}

// =============================================================================
// TOUCH STATE
// =============================================================================

/// The item collection plus parent-level configuration.
#[derive(Debug, Clone)]
pub struct TouchState {
    items: Vec<TransformRecord>,
    parent_size: Size,
    init_content_size: Size,
    zoom_range: RangeInclusive<f64>,
    gesture_changing: bool,
    revision: u64,
}

impl TouchState {
    /// Create an empty collection.
    ///
    /// # Errors
    ///
    /// `InvalidZoomRange` when the lower bound is not strictly positive or
    /// exceeds the upper bound.
    pub fn new(init_content_size: Size, zoom_range: RangeInclusive<f64>) -> Result<Self, TouchError> {
        validate_zoom_range(&zoom_range)?;
        Ok(Self {
            items: Vec::new(),
            parent_size: Size::ZERO,
            init_content_size,
            zoom_range,
            gesture_changing: false,
            revision: 0,
        })
    }

    // --- Configuration ---

    #[must_use]
    pub fn parent_size(&self) -> Size {
        self.parent_size
    }

    /// Record the latest measurement of the bounding container.
    pub fn update_parent_size(&mut self, size: Size) {
        if self.parent_size != size {
            self.parent_size = size;
            self.touch();
        }
    }

    #[must_use]
    pub fn init_content_size(&self) -> Size {
        self.init_content_size
    }

    #[must_use]
    pub fn zoom_range(&self) -> RangeInclusive<f64> {
        self.zoom_range.clone()
    }

    /// Whether an item gesture is in progress.
    #[must_use]
    pub fn gesture_changing(&self) -> bool {
        self.gesture_changing
    }

    pub(crate) fn set_gesture_changing(&mut self, value: bool) {
        self.gesture_changing = value;
    }

    /// Monotonic mutation counter.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    // --- Mutations ---

    /// Add a new editable item.
    ///
    /// `center_point` defaults to the parent center. With `exclusive_edit`
    /// every other item stops being editable first.
    ///
    /// # Errors
    ///
    /// `KeyBlank`, `KeyDuplicate`, or `MissingParentSize` when no center is
    /// given before the parent has been measured.
    pub fn add_item(
        &mut self,
        key: &str,
        page: i32,
        center_point: Option<Point>,
        exclusive_edit: bool,
    ) -> Result<(), TouchError> {
        if key.trim().is_empty() {
            return Err(TouchError::KeyBlank);
        }
        if self.contains(key) {
            return Err(TouchError::KeyDuplicate(key.to_owned()));
        }
        let center_point = match center_point {
            Some(center) => center,
            None if !self.parent_size.is_zero() => self.parent_size.center(),
            None => return Err(TouchError::MissingParentSize),
        };
        if exclusive_edit {
            self.disable_edit_all();
        }
        let mut item = TransformRecord::new(key, page, center_point);
        item.editable = true;
        self.items.push(item);
        self.touch();
        tracing::debug!(%key, page, "item added");
        Ok(())
    }

    /// Add an item keyed by a freshly generated UUID and return the key.
    ///
    /// # Errors
    ///
    /// `MissingParentSize` as for [`Self::add_item`].
    pub fn add_generated_item(
        &mut self,
        page: i32,
        center_point: Option<Point>,
        exclusive_edit: bool,
    ) -> Result<String, TouchError> {
        let key = Uuid::new_v4().to_string();
        self.add_item(&key, page, center_point, exclusive_edit)?;
        Ok(key)
    }

    /// Remove the item with `key`, returning it if present.
    pub fn remove_item(&mut self, key: &str) -> Option<TransformRecord> {
        let index = self.items.iter().position(|item| item.key == key)?;
        let removed = self.items.remove(index);
        self.touch();
        tracing::debug!(%key, "item removed");
        Some(removed)
    }

    /// Set the editable flag of `key`. Unknown keys are ignored: a pending
    /// edit request can race the item's removal.
    pub fn set_editable(&mut self, key: &str, value: bool) {
        let Some(item) = self.get_mut(key) else {
            tracing::debug!(%key, "set_editable on unknown key ignored");
            return;
        };
        if item.editable != value {
            item.editable = value;
            self.touch();
        }
    }

    /// Make every item non-editable.
    pub fn disable_edit_all(&mut self) {
        let mut changed = false;
        for item in self.items.iter_mut().filter(|item| item.editable) {
            item.editable = false;
            changed = true;
        }
        if changed {
            self.touch();
        }
    }

    /// Replace every item with `items`, keeping their order.
    ///
    /// # Errors
    ///
    /// `KeyBlank` or `KeyDuplicate` under the same rules as
    /// [`Self::add_item`]; the collection is left untouched on error.
    pub fn restore_list(&mut self, items: Vec<TransformRecord>) -> Result<(), TouchError> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.key.trim().is_empty() {
                return Err(TouchError::KeyBlank);
            }
            if !seen.insert(item.key.as_str()) {
                return Err(TouchError::KeyDuplicate(item.key.clone()));
            }
        }
        tracing::debug!(count = items.len(), "item list restored");
        self.items = items;
        self.touch();
        Ok(())
    }

    /// Mutate the item with `key` through `f`, bumping the revision.
    pub(crate) fn update<R>(&mut self, key: &str, f: impl FnOnce(&mut TransformRecord) -> R) -> Option<R> {
        let item = self.items.iter_mut().find(|item| item.key == key)?;
        let result = f(item);
        self.touch();
        Some(result)
    }

    /// Like [`Self::update`], but the revision only moves when `f` reports
    /// `Ok(true)`.
    pub(crate) fn try_update<E>(
        &mut self,
        key: &str,
        f: impl FnOnce(&mut TransformRecord) -> Result<bool, E>,
    ) -> Option<Result<bool, E>> {
        let item = self.items.iter_mut().find(|item| item.key == key)?;
        let result = f(item);
        if matches!(result, Ok(true)) {
            self.touch();
        }
        Some(result)
    }

    // --- Queries ---

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.items.iter().any(|item| item.key == key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TransformRecord> {
        self.items.iter().find(|item| item.key == key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut TransformRecord> {
        self.items.iter_mut().find(|item| item.key == key)
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[TransformRecord] {
        &self.items
    }

    /// Items on `page`, in insertion order.
    pub fn items_on_page(&self, page: i32) -> impl Iterator<Item = &TransformRecord> {
        self.items.iter().filter(move |item| item.page == page)
    }

    /// Items grouped by page, each group in insertion order.
    #[must_use]
    pub fn grouped_by_page(&self) -> BTreeMap<i32, Vec<&TransformRecord>> {
        let mut groups: BTreeMap<i32, Vec<&TransformRecord>> = BTreeMap::new();
        for item in &self.items {
            groups.entry(item.page).or_default().push(item);
        }
        groups
    }

    /// Keys of the items currently editable.
    #[must_use]
    pub fn editable_keys(&self) -> Vec<&str> {
        self.items.iter().filter(|item| item.editable).map(|item| item.key.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Reject zoom ranges whose lower bound is not strictly positive.
pub(crate) fn validate_zoom_range(range: &RangeInclusive<f64>) -> Result<(), TouchError> {
    let (start, end) = (*range.start(), *range.end());
    if start.is_nan() || start <= 0.0 || end < start {
        return Err(TouchError::InvalidZoomRange { start, end });
    }
    Ok(())
}
