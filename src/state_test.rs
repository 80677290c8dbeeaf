#![allow(clippy::float_cmp)]

use super::*;

fn state() -> TouchState {
    let mut state = TouchState::new(Size::ZERO, 0.1..=5.0).unwrap();
    state.update_parent_size(Size::new(100.0, 100.0));
    state
}

fn record(key: &str, page: i32) -> TransformRecord {
    TransformRecord::new(key, page, Point::new(10.0, 10.0))
}

fn keys(state: &TouchState) -> Vec<&str> {
    state.items().iter().map(|i| i.key.as_str()).collect()
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_state_is_empty() {
    let s = TouchState::new(Size::ZERO, 1.0..=5.0).unwrap();
    assert!(s.is_empty());
    assert_eq!(s.parent_size(), Size::ZERO);
    assert!(!s.gesture_changing());
}

#[test]
fn new_rejects_non_positive_min_zoom() {
    assert!(matches!(TouchState::new(Size::ZERO, 0.0..=5.0), Err(TouchError::InvalidZoomRange { .. })));
    assert!(matches!(TouchState::new(Size::ZERO, -1.0..=5.0), Err(TouchError::InvalidZoomRange { .. })));
}

#[test]
fn new_rejects_inverted_zoom_range() {
    assert!(matches!(TouchState::new(Size::ZERO, 3.0..=2.0), Err(TouchError::InvalidZoomRange { .. })));
}

#[test]
fn update_parent_size_bumps_revision_only_on_change() {
    let mut s = TouchState::new(Size::ZERO, 1.0..=5.0).unwrap();
    let r0 = s.revision();
    s.update_parent_size(Size::new(10.0, 10.0));
    let r1 = s.revision();
    assert!(r1 > r0);
    s.update_parent_size(Size::new(10.0, 10.0));
    assert_eq!(s.revision(), r1);
}

// =============================================================
// add_item
// =============================================================

#[test]
fn add_item_defaults_center_to_parent_center() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    let a = s.get("a").unwrap();
    assert_eq!(a.center_point, Point::new(50.0, 50.0));
    assert!(a.editable);
    assert_eq!(a.zoom, 1.0);
    assert!(!a.is_measured());
}

#[test]
fn add_item_blank_key_fails() {
    let mut s = state();
    for key in ["", "   ", "\t\n"] {
        assert!(matches!(s.add_item(key, 0, None, true), Err(TouchError::KeyBlank)));
    }
    assert!(s.is_empty());
}

#[test]
fn add_item_duplicate_key_fails_regardless_of_page() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    assert!(matches!(s.add_item("a", 0, None, true), Err(TouchError::KeyDuplicate(k)) if k == "a"));
    assert!(matches!(s.add_item("a", 3, None, true), Err(TouchError::KeyDuplicate(_))));
    assert_eq!(s.len(), 1);
}

#[test]
fn add_item_without_center_before_layout_fails() {
    let mut s = TouchState::new(Size::ZERO, 1.0..=5.0).unwrap();
    assert!(matches!(s.add_item("a", 0, None, true), Err(TouchError::MissingParentSize)));
    s.add_item("a", 0, Some(Point::new(5.0, 5.0)), true).unwrap();
    assert_eq!(s.len(), 1);
}

#[test]
fn add_item_exclusive_disables_others() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    s.add_item("b", 0, None, true).unwrap();
    assert_eq!(s.editable_keys(), vec!["b"]);
}

#[test]
fn add_item_non_exclusive_keeps_others_editable() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    s.add_item("b", 0, None, false).unwrap();
    assert_eq!(s.editable_keys(), vec!["a", "b"]);
}

#[test]
fn add_generated_item_returns_unique_keys() {
    let mut s = state();
    let a = s.add_generated_item(0, None, true).unwrap();
    let b = s.add_generated_item(0, None, true).unwrap();
    assert_ne!(a, b);
    assert!(s.contains(&a));
    assert!(s.contains(&b));
}

// =============================================================
// remove / editable
// =============================================================

#[test]
fn remove_item_returns_record() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    assert_eq!(s.remove_item("a").map(|r| r.key), Some("a".to_owned()));
    assert!(s.is_empty());
    assert!(s.remove_item("a").is_none());
}

#[test]
fn set_editable_toggles_known_key() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    s.set_editable("a", false);
    assert!(!s.get("a").unwrap().editable);
    s.set_editable("a", true);
    assert!(s.get("a").unwrap().editable);
}

#[test]
fn set_editable_unknown_key_is_noop() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    let before = s.revision();
    s.set_editable("missing", false);
    assert_eq!(s.revision(), before);
    assert!(s.get("a").unwrap().editable);
}

#[test]
fn disable_edit_all_clears_every_flag() {
    let mut s = state();
    s.add_item("a", 0, None, false).unwrap();
    s.add_item("b", 1, None, false).unwrap();
    s.disable_edit_all();
    assert!(s.editable_keys().is_empty());
}

// =============================================================
// restore_list
// =============================================================

#[test]
fn restore_list_replaces_in_order() {
    let mut s = state();
    s.add_item("old", 0, None, true).unwrap();
    s.restore_list(vec![record("c", 0), record("a", 1), record("b", 0)]).unwrap();
    assert_eq!(keys(&s), vec!["c", "a", "b"]);
    assert!(matches!(s.add_item("a", 0, None, true), Err(TouchError::KeyDuplicate(_))));
}

#[test]
fn restore_list_rejects_blank_key() {
    let mut s = state();
    s.add_item("keep", 0, None, true).unwrap();
    let result = s.restore_list(vec![record("a", 0), record(" ", 0)]);
    assert!(matches!(result, Err(TouchError::KeyBlank)));
    assert_eq!(keys(&s), vec!["keep"]);
}

#[test]
fn restore_list_rejects_duplicates_across_pages() {
    let mut s = state();
    let result = s.restore_list(vec![record("a", 0), record("a", 2)]);
    assert!(matches!(result, Err(TouchError::KeyDuplicate(k)) if k == "a"));
    assert!(s.is_empty());
}

// =============================================================
// Page grouping
// =============================================================

#[test]
fn grouped_by_page_preserves_insertion_order() {
    let mut s = state();
    s.restore_list(vec![record("a", 1), record("b", 0), record("c", 1), record("d", 0)]).unwrap();
    let groups = s.grouped_by_page();
    let page0: Vec<&str> = groups[&0].iter().map(|i| i.key.as_str()).collect();
    let page1: Vec<&str> = groups[&1].iter().map(|i| i.key.as_str()).collect();
    assert_eq!(page0, vec!["b", "d"]);
    assert_eq!(page1, vec!["a", "c"]);
}

#[test]
fn items_on_page_filters() {
    let mut s = state();
    s.restore_list(vec![record("a", 1), record("b", 0)]).unwrap();
    let on_one: Vec<&str> = s.items_on_page(1).map(|i| i.key.as_str()).collect();
    assert_eq!(on_one, vec!["a"]);
    assert_eq!(s.items_on_page(9).count(), 0);
}

// =============================================================
// TransformRecord
// =============================================================

#[test]
fn translate_moves_offset_and_center_together() {
    let mut r = record("a", 0);
    r.translate(Point::new(3.0, -2.0));
    assert_eq!(r.offset, Point::new(3.0, -2.0));
    assert_eq!(r.center_point, Point::new(13.0, 8.0));
}

#[test]
fn latch_content_size_is_one_shot() {
    let mut r = TransformRecord::new("a", 0, Point::new(50.0, 50.0));
    assert!(r.latch_content_size(Size::new(40.0, 20.0), 10.0, 2.0));
    assert_eq!(r.content_size, Size::new(40.0, 20.0));
    assert_eq!(r.zoom, 2.0);
    // Box is content + control: 50x30, centered at (50, 50).
    assert_eq!(r.offset, Point::new(25.0, 35.0));

    assert!(!r.latch_content_size(Size::new(10.0, 10.0), 10.0, 9.0));
    assert_eq!(r.content_size, Size::new(40.0, 20.0));
    assert_eq!(r.zoom, 2.0);
}

#[test]
fn record_serde_fills_defaults() {
    let json = r#"{"key":"a","center_point":{"x":1.0,"y":2.0},"zoom":1.5}"#;
    let r: TransformRecord = serde_json::from_str(json).unwrap();
    assert_eq!(r.page, 0);
    assert_eq!(r.rotation, 0.0);
    assert_eq!(r.offset, Point::ZERO);
    assert!(!r.editable);
}

#[test]
fn try_update_bumps_revision_only_on_change() {
    let mut s = state();
    s.add_item("a", 0, None, true).unwrap();
    let before = s.revision();

    assert!(matches!(s.try_update("a", |_| Ok::<bool, TouchError>(false)), Some(Ok(false))));
    assert!(matches!(s.try_update("a", |_| Err::<bool, TouchError>(TouchError::KeyBlank)), Some(Err(_))));
    assert_eq!(s.revision(), before);

    assert!(matches!(s.try_update("a", |_| Ok::<bool, TouchError>(true)), Some(Ok(true))));
    assert!(s.revision() > before);
    assert!(s.try_update("missing", |_| Ok::<bool, TouchError>(true)).is_none());
}
