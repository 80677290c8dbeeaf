//! Engine core: routes the host's pointer feed to the item classifier or the
//! viewport and turns the result into [`Action`]s.
//!
//! DESIGN
//! ======
//! Every pointer sequence is owned by exactly one route, chosen at the first
//! contact. A contact on an editable item starts that item's classifier and
//! raises `gesture_changing`; the viewport never sees the sequence. Any
//! other contact belongs to the background: the viewport interprets it, and
//! if it stays a single still pointer it resolves as a tap on release.
//! Events arrive in viewport space and are mapped to scene space through the
//! inverse viewport transform, then to item-local space for the classifier.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::config::TouchConfig;
use crate::consts::TOUCH_SLOP;
use crate::error::TouchError;
use crate::geometry::{Corner, Point, Size};
use crate::gesture::{GestureDetector, GestureSignal};
use crate::hit::{HitPart, hit_test};
use crate::input::{PointerEvent, PointerId};
use crate::snapshot::TouchSnapshot;
use crate::state::{TouchState, TransformRecord};
use crate::transform::{
    HandleLayout, LayerTransform, apply_gesture, handle_layout, init_content_size, item_box_size, layer_transform,
    scene_to_local,
};
use crate::viewport::{ViewportController, ViewportTransform};

/// Actions returned from engine calls for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// An item gesture took ownership of the pointer stream.
    GestureStarted { key: String, corner: Corner },
    /// An item's geometry changed; redraw it with `transform`.
    ItemTransformed { key: String, transform: LayerTransform },
    /// An item gesture finished.
    GestureEnded { key: String, committed: bool, canceled: bool },
    EditableChanged { key: String, editable: bool },
    /// A corner handle was tapped without dragging. The host decides what
    /// the handle does; the top-start handle conventionally removes the item.
    HandleTapped { key: String, corner: Corner },
    ViewportChanged { scale: f64, offset: Point },
    RenderNeeded,
}

/// A live single-item gesture.
#[derive(Debug, Clone)]
struct ItemGesture {
    key: String,
    part: HitPart,
    detector: GestureDetector,
}

/// Where a background tap would land if the sequence stays a tap.
#[derive(Debug, Clone)]
struct TapCandidate {
    /// Non-editable item under the pointer, or `None` for empty background.
    target: Option<String>,
    pointer: PointerId,
    origin: Point,
}

/// Owner of the current pointer sequence.
#[derive(Debug, Clone, Default)]
enum Route {
    #[default]
    Idle,
    Item(ItemGesture),
    Background { tap: Option<TapCandidate> },
}

/// Core engine state. Free of any rendering dependency.
pub struct EngineCore {
    config: TouchConfig,
    state: TouchState,
    viewport: ViewportController,
    route: Route,
    page: i32,
    viewport_size: Size,
}

impl EngineCore {
    /// # Errors
    ///
    /// Whatever [`TouchConfig::validate`] rejects.
    pub fn new(config: TouchConfig) -> Result<Self, TouchError> {
        config.validate()?;
        let state = TouchState::new(config.init_item_size, config.zoom_range.clone())?;
        let viewport = ViewportController::new(config.max_viewport_scale)?;
        Ok(Self { config, state, viewport, route: Route::Idle, page: 0, viewport_size: Size::ZERO })
    }

    // --- Layout inputs ---

    /// Record the bounding container's size.
    pub fn set_parent_size(&mut self, size: Size) {
        self.state.update_parent_size(size);
    }

    /// Record the viewport's size. Until set, the parent size is used.
    pub fn set_viewport_size(&mut self, size: Size) {
        self.viewport_size = size;
    }

    /// Switch the visible page. Any live sequence is abandoned and the
    /// viewport returns to identity.
    pub fn set_page(&mut self, page: i32) -> Vec<Action> {
        if page == self.page {
            return Vec::new();
        }
        let mut actions = self.cancel_route();
        self.page = page;
        self.viewport.reset();
        actions.push(Action::RenderNeeded);
        actions
    }

    /// First-layout measurement of an item's content.
    ///
    /// # Errors
    ///
    /// `HandleOverlap` or `InvalidInitialContentSize`; see
    /// [`crate::transform::init_content_size`].
    pub fn on_item_measured(&mut self, key: &str, size: Size) -> Result<Vec<Action>, TouchError> {
        let Some(item) = self.state.get(key) else {
            tracing::debug!(%key, "measurement for unknown item ignored");
            return Ok(Vec::new());
        };
        if item.is_measured() {
            return Ok(Vec::new());
        }
        let parent = self.state.parent_size();
        let init = self.state.init_content_size();
        let control = self.config.control_size;
        let latched = self.state.try_update(key, |item| init_content_size(item, size, parent, init, control));
        match latched {
            Some(Ok(true)) => {
                tracing::debug!(%key, width = size.width, height = size.height, "content size latched");
                Ok(self.transformed(key).into_iter().chain([Action::RenderNeeded]).collect())
            }
            Some(Ok(false)) | None => Ok(Vec::new()),
            Some(Err(e)) => Err(e),
        }
    }

    // --- Collection ---

    /// Add an editable item on `page`; see [`TouchState::add_item`].
    ///
    /// # Errors
    ///
    /// `KeyBlank`, `KeyDuplicate`, `MissingParentSize`.
    pub fn add_item(
        &mut self,
        key: &str,
        page: i32,
        center_point: Option<Point>,
        exclusive_edit: bool,
    ) -> Result<Vec<Action>, TouchError> {
        let before = self.editable_snapshot();
        self.state.add_item(key, page, center_point, exclusive_edit)?;
        Ok(self.after_edit_change(&before))
    }

    /// Add an item under a generated key and return the key.
    ///
    /// # Errors
    ///
    /// `MissingParentSize`.
    pub fn add_generated_item(
        &mut self,
        page: i32,
        center_point: Option<Point>,
        exclusive_edit: bool,
    ) -> Result<(String, Vec<Action>), TouchError> {
        let before = self.editable_snapshot();
        let key = self.state.add_generated_item(page, center_point, exclusive_edit)?;
        let actions = self.after_edit_change(&before);
        Ok((key, actions))
    }

    /// Remove an item, ending its gesture if it has one.
    pub fn remove_item(&mut self, key: &str) -> Vec<Action> {
        let mut actions = if self.active_key() == Some(key) { self.cancel_route() } else { Vec::new() };
        if self.state.remove_item(key).is_some() {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    pub fn set_editable(&mut self, key: &str, value: bool) -> Vec<Action> {
        let before = self.editable_snapshot();
        self.state.set_editable(key, value);
        self.after_edit_change(&before)
    }

    pub fn disable_edit_all(&mut self) -> Vec<Action> {
        let before = self.editable_snapshot();
        self.state.disable_edit_all();
        self.after_edit_change(&before)
    }

    /// Report editable flips since `before`, first ending a live gesture
    /// whose item is no longer editable.
    fn after_edit_change(&mut self, before: &[(String, bool)]) -> Vec<Action> {
        let stale = self.active_key().is_some_and(|key| self.state.get(key).is_none_or(|item| !item.editable));
        let mut actions = if stale { self.cancel_route() } else { Vec::new() };
        actions.extend(with_render(self.editable_changes(before)));
        actions
    }

    /// Replace every item and abandon the live sequence; see
    /// [`TouchState::restore_list`].
    ///
    /// # Errors
    ///
    /// `KeyBlank`, `KeyDuplicate`.
    pub fn restore_list(&mut self, items: Vec<TransformRecord>) -> Result<Vec<Action>, TouchError> {
        self.state.restore_list(items)?;
        let mut actions = self.cancel_route();
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    /// Capture the collection for persistence.
    #[must_use]
    pub fn snapshot(&self) -> TouchSnapshot {
        TouchSnapshot::from_state(&self.state)
    }

    /// Replace the collection with a snapshot. A measured parent size is
    /// kept over the snapshot's.
    ///
    /// # Errors
    ///
    /// Whatever [`TouchSnapshot::into_state`] rejects; the engine is left
    /// untouched on error.
    pub fn restore_snapshot(&mut self, snapshot: TouchSnapshot) -> Result<Vec<Action>, TouchError> {
        let mut state = snapshot.into_state()?;
        let parent = self.state.parent_size();
        if !parent.is_zero() {
            state.update_parent_size(parent);
        }
        let mut actions = self.cancel_route();
        self.state = state;
        tracing::debug!(count = self.state.len(), "snapshot restored");
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    // --- Input ---

    /// Process one pointer dispatch, in viewport coordinates. Changes the
    /// engine acts on are marked consumed in `event`.
    pub fn on_pointer_event(&mut self, event: &mut PointerEvent) -> Vec<Action> {
        let size = self.viewport_size();
        let view = self.viewport.transform();
        let mut scene = event.map_positions(|p| view.to_scene(p, size));
        let mut actions = Vec::new();

        let route = match std::mem::take(&mut self.route) {
            Route::Idle => match scene.first_down() {
                Some(down) => self.begin(down.position, down.id, event),
                None => return actions,
            },
            route => route,
        };

        self.route = match route {
            Route::Item(mut gesture) => {
                let live = self.drive_item(&mut gesture, &mut scene, &mut actions);
                event.merge_consumed(&scene);
                if live { Route::Item(gesture) } else { Route::Idle }
            }
            Route::Background { mut tap } => {
                if self.drive_background(&mut tap, event, size, &mut actions) {
                    Route::Background { tap }
                } else {
                    Route::Idle
                }
            }
            Route::Idle => Route::Idle,
        };
        actions
    }

    fn begin(&self, scene_pt: Point, pointer: PointerId, event: &PointerEvent) -> Route {
        let hit = hit_test(scene_pt, &self.state, self.page, self.config.control_size, self.config.handles);
        let origin = event.changes.iter().find(|c| c.id == pointer).map_or(scene_pt, |c| c.position);
        match hit {
            Some(hit) if self.state.get(&hit.key).is_some_and(|item| item.editable) => {
                tracing::debug!(key = %hit.key, part = ?hit.part, "item gesture routed");
                Route::Item(ItemGesture {
                    key: hit.key,
                    part: hit.part,
                    detector: GestureDetector::new(self.config.control_size, self.config.handles),
                })
            }
            Some(hit) => Route::Background { tap: Some(TapCandidate { target: Some(hit.key), pointer, origin }) },
            None => Route::Background { tap: Some(TapCandidate { target: None, pointer, origin }) },
        }
    }

    /// Feed `scene` to the item classifier. Returns whether the gesture is
    /// still live.
    fn drive_item(&mut self, gesture: &mut ItemGesture, scene: &mut PointerEvent, actions: &mut Vec<Action>) -> bool {
        let control = self.config.control_size;
        let Some((box_size, mut local)) = self
            .state
            .get(&gesture.key)
            .map(|item| (item_box_size(item, control), scene.map_positions(|p| scene_to_local(item, p, control))))
        else {
            if let Some(signal) = gesture.detector.cancel() {
                self.on_signal(gesture, signal, actions);
            }
            return false;
        };

        let signals = gesture.detector.on_event(&mut local, box_size);
        scene.merge_consumed(&local);

        let mut dirty = false;
        for signal in signals {
            dirty |= self.on_signal(gesture, signal, actions);
        }
        if dirty {
            actions.push(Action::RenderNeeded);
        }
        gesture.detector.is_active()
    }

    /// Apply one classifier signal. Returns whether item geometry changed.
    fn on_signal(&mut self, gesture: &ItemGesture, signal: GestureSignal, actions: &mut Vec<Action>) -> bool {
        let key = gesture.key.as_str();
        match signal {
            GestureSignal::Start { corner } => {
                self.state.set_gesture_changing(true);
                tracing::debug!(%key, ?corner, "gesture started");
                actions.push(Action::GestureStarted { key: key.to_owned(), corner });
                false
            }
            GestureSignal::Transform { pan, zoom, rotation } => {
                let parent = self.state.parent_size();
                let range = self.state.zoom_range();
                if self.state.get(key).is_some_and(|item| !item.is_measured()) {
                    tracing::warn!(%key, "transform before content was measured");
                }
                self.state.update(key, |item| apply_gesture(item, parent, &range, pan, zoom, rotation));
                actions.extend(self.transformed(key));
                true
            }
            GestureSignal::End { corner, committed, canceled } => {
                self.state.set_gesture_changing(false);
                tracing::debug!(%key, ?corner, committed, canceled, "gesture ended");
                actions.push(Action::GestureEnded { key: key.to_owned(), committed, canceled });
                if let (false, false, HitPart::Handle(handle)) = (committed, canceled, gesture.part) {
                    tracing::debug!(%key, corner = ?handle, "handle tapped");
                    actions.push(Action::HandleTapped { key: key.to_owned(), corner: handle });
                }
                false
            }
        }
    }

    /// Feed a background sequence to the viewport and track the tap. Returns
    /// whether the sequence is still live.
    fn drive_background(
        &mut self,
        tap: &mut Option<TapCandidate>,
        event: &mut PointerEvent,
        size: Size,
        actions: &mut Vec<Action>,
    ) -> bool {
        if let Some(candidate) = tap.as_ref() {
            let strayed = event
                .changes
                .iter()
                .any(|c| c.id == candidate.pointer && (c.position - candidate.origin).distance() > TOUCH_SLOP);
            if strayed || event.changes.len() > 1 {
                *tap = None;
            }
        }

        if self.config.viewport_enabled && !self.state.gesture_changing() {
            if let Some(update) = self.viewport.on_event(event, size) {
                let ViewportTransform { scale, offset } = update.transform;
                if update.reported {
                    actions.push(Action::ViewportChanged { scale, offset });
                }
                if update.changed {
                    actions.push(Action::RenderNeeded);
                }
            }
        }
        if event.any_consumed() {
            *tap = None;
        }

        if event.any_pressed() {
            return true;
        }
        if let Some(candidate) = tap.take() {
            actions.extend(self.resolve_tap(candidate));
        }
        false
    }

    fn resolve_tap(&mut self, tap: TapCandidate) -> Vec<Action> {
        let before = self.editable_snapshot();
        match tap.target {
            None => {
                tracing::debug!("background tap");
                self.state.disable_edit_all();
            }
            Some(key) => {
                if self.state.get(&key).is_some_and(|item| !item.editable) {
                    tracing::debug!(%key, "item tapped for editing");
                    self.state.disable_edit_all();
                    self.state.set_editable(&key, true);
                }
            }
        }
        with_render(self.editable_changes(&before))
    }

    /// End whatever owns the pointer stream, reporting a canceled item
    /// gesture.
    fn cancel_route(&mut self) -> Vec<Action> {
        let mut actions = Vec::new();
        if let Route::Item(mut gesture) = std::mem::take(&mut self.route) {
            if let Some(signal) = gesture.detector.cancel() {
                self.on_signal(&gesture, signal, &mut actions);
            }
        }
        self.viewport.abandon();
        actions
    }

    // --- Helpers ---

    fn viewport_size(&self) -> Size {
        if self.viewport_size.is_zero() { self.state.parent_size() } else { self.viewport_size }
    }

    fn active_key(&self) -> Option<&str> {
        match &self.route {
            Route::Item(gesture) => Some(gesture.key.as_str()),
            Route::Idle | Route::Background { .. } => None,
        }
    }

    fn transformed(&self, key: &str) -> Option<Action> {
        let item = self.state.get(key)?;
        Some(Action::ItemTransformed {
            key: key.to_owned(),
            transform: layer_transform(item, self.config.control_size),
        })
    }

    fn editable_snapshot(&self) -> Vec<(String, bool)> {
        self.state.items().iter().map(|item| (item.key.clone(), item.editable)).collect()
    }

    /// `EditableChanged` for every item whose flag differs from `before`;
    /// new items count as previously non-editable.
    fn editable_changes(&self, before: &[(String, bool)]) -> Vec<Action> {
        self.state
            .items()
            .iter()
            .filter(|item| {
                let was = before.iter().find(|(key, _)| *key == item.key).is_some_and(|(_, editable)| *editable);
                was != item.editable
            })
            .map(|item| Action::EditableChanged { key: item.key.clone(), editable: item.editable })
            .collect()
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &TouchState {
        &self.state
    }

    #[must_use]
    pub fn config(&self) -> &TouchConfig {
        &self.config
    }

    #[must_use]
    pub fn item(&self, key: &str) -> Option<&TransformRecord> {
        self.state.get(key)
    }

    #[must_use]
    pub fn page(&self) -> i32 {
        self.page
    }

    #[must_use]
    pub fn viewport(&self) -> ViewportTransform {
        self.viewport.transform()
    }

    /// Whether an item gesture owns the pointer stream.
    #[must_use]
    pub fn gesture_changing(&self) -> bool {
        self.state.gesture_changing()
    }

    /// Render transform of `key`.
    #[must_use]
    pub fn layer_transform(&self, key: &str) -> Option<LayerTransform> {
        self.state.get(key).map(|item| layer_transform(item, self.config.control_size))
    }

    /// Handle overlay of `key`, `None` when missing or not editable.
    #[must_use]
    pub fn handle_layout(&self, key: &str) -> Option<HandleLayout> {
        let item = self.state.get(key)?;
        handle_layout(item, self.config.control_size, self.config.border_width, self.config.handles)
    }
}

/// Append a redraw request to a non-empty action list.
fn with_render(mut actions: Vec<Action>) -> Vec<Action> {
    if !actions.is_empty() {
        actions.push(Action::RenderNeeded);
    }
    actions
}
