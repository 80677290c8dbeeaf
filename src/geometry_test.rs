#![allow(clippy::float_cmp)]

use super::*;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn point_approx_eq(a: Point, b: Point) -> bool {
    approx_eq(a.x, b.x) && approx_eq(a.y, b.y)
}

fn size_approx_eq(a: Size, b: Size) -> bool {
    approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

// =============================================================
// Point / Size
// =============================================================

#[test]
fn point_arithmetic() {
    let a = Point::new(1.0, 2.0);
    let b = Point::new(3.0, -4.0);
    assert_eq!(a + b, Point::new(4.0, -2.0));
    assert_eq!(a - b, Point::new(-2.0, 6.0));
    assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    assert_eq!(b / 2.0, Point::new(1.5, -2.0));
    assert_eq!(-a, Point::new(-1.0, -2.0));
}

#[test]
fn point_distance_is_hypot() {
    assert_eq!(Point::new(3.0, 4.0).distance(), 5.0);
    assert_eq!(Point::ZERO.distance(), 0.0);
}

#[test]
fn point_add_assign() {
    let mut p = Point::new(1.0, 1.0);
    p += Point::new(2.0, 3.0);
    assert_eq!(p, Point::new(3.0, 4.0));
}

#[test]
fn size_helpers() {
    let s = Size::new(100.0, 40.0);
    assert_eq!(s.half(), Size::new(50.0, 20.0));
    assert_eq!(s.inflate(10.0), Size::new(110.0, 50.0));
    assert_eq!(s.center(), Point::new(50.0, 20.0));
    assert_eq!(s.min_dimension(), 40.0);
    assert!(Size::ZERO.is_zero());
    assert!(!s.is_zero());
}

// =============================================================
// rotated_bounding_size
// =============================================================

#[test]
fn rotated_bounding_size_zero_angle_is_identity() {
    let (cos, sin) = angle_components(0.0);
    let s = rotated_bounding_size(100.0, 50.0, cos, sin);
    assert!(size_approx_eq(s, Size::new(100.0, 50.0)));
}

#[test]
fn rotated_bounding_size_quarter_turn_swaps_axes() {
    let (cos, sin) = angle_components(90.0);
    let s = rotated_bounding_size(100.0, 50.0, cos, sin);
    assert!(size_approx_eq(s, Size::new(50.0, 100.0)));
}

#[test]
fn rotated_bounding_size_square_at_45_degrees() {
    let (cos, sin) = angle_components(45.0);
    let s = rotated_bounding_size(10.0, 10.0, cos, sin);
    let expected = 10.0 * std::f64::consts::SQRT_2;
    assert!(size_approx_eq(s, Size::new(expected, expected)));
}

#[test]
fn rotated_bounding_size_invariant_under_half_turn() {
    let rects = [(100.0, 50.0), (1.0, 300.0), (42.0, 42.0), (0.0, 10.0)];
    let mut angle = -360.0;
    while angle <= 360.0 {
        for (w, h) in rects {
            let (c1, s1) = angle_components(angle);
            let (c2, s2) = angle_components(angle + 180.0);
            let a = rotated_bounding_size(w, h, c1, s1);
            let b = rotated_bounding_size(w, h, c2, s2);
            assert!(size_approx_eq(a, b), "angle {angle}, rect {w}x{h}: {a:?} vs {b:?}");
        }
        angle += 7.5;
    }
}

// =============================================================
// rotate_point
// =============================================================

#[test]
fn rotate_point_quarter_turn() {
    let (cos, sin) = angle_components(90.0);
    let p = rotate_point(Point::new(1.0, 0.0), cos, sin);
    assert!(point_approx_eq(p, Point::new(0.0, 1.0)));
}

#[test]
fn rotate_point_inverse_returns_original() {
    let points = [Point::new(3.0, 4.0), Point::new(-12.5, 0.25), Point::ZERO];
    for angle in [-270.0, -33.0, 0.0, 17.0, 90.0, 181.0] {
        let (cos, sin) = angle_components(angle);
        let (icos, isin) = angle_components(-angle);
        for p in points {
            let back = rotate_point(rotate_point(p, cos, sin), icos, isin);
            assert!(point_approx_eq(back, p), "angle {angle}: {p:?} -> {back:?}");
        }
    }
}

#[test]
fn angle_components_matches_trig() {
    let (cos, sin) = angle_components(60.0);
    assert!(approx_eq(cos, 0.5));
    assert!(approx_eq(sin, 3.0_f64.sqrt() / 2.0));
}

// =============================================================
// normalize_degrees
// =============================================================

#[test]
fn normalize_degrees_wraps_into_half_open_range() {
    assert_eq!(normalize_degrees(0.0), 0.0);
    assert_eq!(normalize_degrees(190.0), -170.0);
    assert_eq!(normalize_degrees(-190.0), 170.0);
    assert_eq!(normalize_degrees(180.0), 180.0);
    assert_eq!(normalize_degrees(-180.0), 180.0);
    assert_eq!(normalize_degrees(350.0), -10.0);
}

// =============================================================
// classify_corner
// =============================================================

#[test]
fn classify_corner_named_regions() {
    let size = Size::new(100.0, 80.0);
    assert_eq!(classify_corner(Point::new(5.0, 5.0), size, 10.0), Corner::TopStart);
    assert_eq!(classify_corner(Point::new(95.0, 5.0), size, 10.0), Corner::TopEnd);
    assert_eq!(classify_corner(Point::new(5.0, 75.0), size, 10.0), Corner::BottomStart);
    assert_eq!(classify_corner(Point::new(95.0, 75.0), size, 10.0), Corner::BottomEnd);
    assert_eq!(classify_corner(Point::new(50.0, 40.0), size, 10.0), Corner::Other);
}

#[test]
fn classify_corner_edges_without_corner_are_other() {
    let size = Size::new(100.0, 80.0);
    assert_eq!(classify_corner(Point::new(5.0, 40.0), size, 10.0), Corner::Other);
    assert_eq!(classify_corner(Point::new(50.0, 5.0), size, 10.0), Corner::Other);
    assert_eq!(classify_corner(Point::new(95.0, 40.0), size, 10.0), Corner::Other);
    assert_eq!(classify_corner(Point::new(50.0, 75.0), size, 10.0), Corner::Other);
}

#[test]
fn classify_corner_threshold_boundary_is_inclusive() {
    let size = Size::new(100.0, 100.0);
    assert_eq!(classify_corner(Point::new(10.0, 10.0), size, 10.0), Corner::TopStart);
    assert_eq!(classify_corner(Point::new(90.0, 90.0), size, 10.0), Corner::BottomEnd);
    assert_eq!(classify_corner(Point::new(10.5, 10.0), size, 10.0), Corner::Other);
}

#[test]
fn classify_corner_partitions_into_five_disjoint_regions() {
    // With threshold below half the shorter side each corner region is a
    // threshold-sized square; everything else is Other.
    let size = Size::new(60.0, 40.0);
    let threshold = 12.0;
    let mut counts = std::collections::HashMap::new();
    let mut y = 0.0;
    while y <= size.height {
        let mut x = 0.0;
        while x <= size.width {
            let corner = classify_corner(Point::new(x, y), size, threshold);
            let in_left = x <= threshold;
            let in_right = x >= size.width - threshold;
            let in_top = y <= threshold;
            let in_bottom = y >= size.height - threshold;
            // The four side bands never overlap for this threshold.
            assert!(!(in_left && in_right));
            assert!(!(in_top && in_bottom));
            let expected = match (in_left, in_right, in_top, in_bottom) {
                (true, false, true, false) => Corner::TopStart,
                (false, true, true, false) => Corner::TopEnd,
                (true, false, false, true) => Corner::BottomStart,
                (false, true, false, true) => Corner::BottomEnd,
                _ => Corner::Other,
            };
            assert_eq!(corner, expected, "point ({x}, {y})");
            *counts.entry(corner).or_insert(0_usize) += 1;
            x += 1.0;
        }
        y += 1.0;
    }
    assert_eq!(counts.len(), 5);
}

// =============================================================
// clamp_span
// =============================================================

#[test]
fn clamp_span_regular_range() {
    assert_eq!(clamp_span(5.0, 0.0, 10.0), 5.0);
    assert_eq!(clamp_span(-5.0, 0.0, 10.0), 0.0);
    assert_eq!(clamp_span(15.0, 0.0, 10.0), 10.0);
}

#[test]
fn clamp_span_inverted_range_prefers_lower_bound() {
    assert_eq!(clamp_span(3.0, 5.0, 1.0), 5.0);
}
