//=========================================================================
// Geometry
//=========================================================================
//
// Stateless helpers shared by pieces and the drag controller.
//
// Components:
// - `pose`: Pose (position + Z rotation) and shared Container nodes
// - `shape`: Polygon hit regions and Aabb bounds
// - `viewport`: orthographic screen → world mapping
//
//=========================================================================

//=== Module Declarations =================================================

mod pose;
mod shape;
mod viewport;

//=== Public API ==========================================================

pub use pose::{Container, Pose};
pub use shape::{Aabb, Polygon};
pub use viewport::Viewport;

//=== External Dependencies ===============================================

use glam::Vec2;
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::input::StateTracker;

//=== Constants ===========================================================

/// Below this absolute (doubled) signed area a polygon counts as degenerate.
pub const DEGENERATE_AREA_EPSILON: f32 = 1e-7;

//=== Functions ===========================================================

/// Cursor position mapped into world space.
pub fn pointer_world_position(input: &StateTracker, viewport: &Viewport) -> Vec2 {
    let (x, y) = input.mouse_position();
    viewport.screen_to_world(Vec2::new(x, y))
}

/// Area-weighted centroid of a simple polygon, or `None` if degenerate.
pub fn try_centroid(points: &[Vec2]) -> Option<Vec2> {
    let mut area = 0.0f32;
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;

    let n = points.len();
    if n == 0 {
        return None;
    }

    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (points[i], points[j]);
        let cross = a.x * b.y - b.x * a.y;
        area += cross;
        cx += (a.x + b.x) * cross;
        cy += (a.y + b.y) * cross;
        j = i;
    }

    if area.abs() < DEGENERATE_AREA_EPSILON {
        return None;
    }

    area *= 3.0;
    Some(Vec2::new(cx / area, cy / area))
}

/// Like [`try_centroid`], but reports a degenerate polygon and falls back
/// to the origin.
pub fn centroid(points: &[Vec2]) -> Vec2 {
    try_centroid(points).unwrap_or_else(|| {
        warn!("Degenerate polygon ({} points), centroid defaults to origin", points.len());
        Vec2::ZERO
    })
}

/// Vector that moves `from` onto `to`.
pub fn delta_between(from: Vec2, to: Vec2) -> Vec2 {
    to - from
}

pub fn distance_between(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True when any of six points around `point` (`leniency` to either side,
/// at three heights) falls outside `shape` placed at `pose`. A leniency of
/// zero or less never reports an edge.
pub fn is_close_to_edge(shape: &Polygon, pose: &Pose, point: Vec2, leniency: f32) -> bool {
    if leniency <= 0.0 {
        return false;
    }

    [-leniency, leniency].into_iter().any(|dx| {
        [-leniency, 0.0, leniency]
            .into_iter()
            .any(|dy| !shape.contains_world(pose, point + Vec2::new(dx, dy)))
    })
}

/// Keeps a box of the given half extents centred on `position` inside
/// `bounds`. A box larger than the view does not panic: each axis is
/// tested against the lower limit first, then the upper.
pub fn clamp_to_visible_bounds(position: Vec2, half_width: f32, half_height: f32, bounds: &Aabb) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, bounds.min.x + half_width, bounds.max.x - half_width),
        clamp_axis(position.y, bounds.min.y + half_height, bounds.max.y - half_height),
    )
}

fn clamp_axis(value: f32, lo: f32, hi: f32) -> f32 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    //--- Centroid ---------------------------------------------------------

    #[test]
    fn centroid_of_square() {
        let square = Polygon::rectangle(Vec2::splat(1.0));
        let moved = square.world_points(&Pose::from_angle(Vec2::new(3.0, 4.0), 0.3));
        let c = centroid(&moved);
        assert!((c - Vec2::new(3.0, 4.0)).length() < 1e-5);
    }

    #[test]
    fn centroid_ignores_winding() {
        let mut points = vec![Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(0.0, 3.0)];
        let ccw = centroid(&points);
        points.reverse();
        let cw = centroid(&points);

        assert!((ccw - Vec2::new(1.0, 1.0)).length() < 1e-5);
        assert!((cw - ccw).length() < 1e-5);
    }

    #[test]
    fn degenerate_polygon_falls_back_to_zero() {
        let collinear = [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(2.0, 2.0)];
        assert!(try_centroid(&collinear).is_none());
        assert_eq!(centroid(&collinear), Vec2::ZERO);
        assert_eq!(centroid(&[]), Vec2::ZERO);
    }

    //--- Deltas -----------------------------------------------------------

    #[test]
    fn delta_and_distance() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(delta_between(a, b), Vec2::new(3.0, 4.0));
        assert_eq!(a + delta_between(a, b), b);
        assert!((distance_between(a, b) - 5.0).abs() < 1e-6);
    }

    //--- Edge Leniency ----------------------------------------------------

    #[test]
    fn centre_of_square_is_not_near_edge() {
        let square = Polygon::rectangle(Vec2::splat(0.5));
        assert!(!is_close_to_edge(&square, &Pose::IDENTITY, Vec2::ZERO, 0.15));
        assert!(!is_close_to_edge(&square, &Pose::IDENTITY, Vec2::new(0.3, -0.3), 0.15));
    }

    #[test]
    fn point_near_side_is_near_edge() {
        let square = Polygon::rectangle(Vec2::splat(0.5));
        assert!(is_close_to_edge(&square, &Pose::IDENTITY, Vec2::new(0.4, 0.0), 0.15));
        assert!(is_close_to_edge(&square, &Pose::IDENTITY, Vec2::new(0.0, -0.4), 0.15));
    }

    #[test]
    fn edge_test_follows_pose() {
        let square = Polygon::rectangle(Vec2::splat(0.5));
        let pose = Pose::from_angle(Vec2::new(3.0, 0.0), std::f32::consts::FRAC_PI_4);
        assert!(!is_close_to_edge(&square, &pose, Vec2::new(3.0, 0.0), 0.15));
        assert!(is_close_to_edge(&square, &pose, Vec2::new(3.6, 0.0), 0.15));
    }

    #[test]
    fn zero_leniency_disables_edge_test() {
        let square = Polygon::rectangle(Vec2::splat(0.5));
        assert!(!is_close_to_edge(&square, &Pose::IDENTITY, Vec2::new(0.49, 0.49), 0.0));
        assert!(!is_close_to_edge(&Polygon::default(), &Pose::IDENTITY, Vec2::ZERO, -1.0));
    }

    #[test]
    fn degenerate_shape_is_all_edge() {
        let line = Polygon::new(vec![Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0)]);
        assert!(is_close_to_edge(&line, &Pose::IDENTITY, Vec2::ONE, 0.1));
    }

    //--- Clamping ---------------------------------------------------------

    #[test]
    fn clamp_keeps_box_inside() {
        let bounds = Aabb::new(Vec2::new(-10.0, -5.0), Vec2::new(10.0, 5.0));

        let clamped = clamp_to_visible_bounds(Vec2::new(20.0, -20.0), 1.0, 2.0, &bounds);
        assert_eq!(clamped, Vec2::new(9.0, -3.0));

        let inside = clamp_to_visible_bounds(Vec2::new(1.0, 1.0), 1.0, 2.0, &bounds);
        assert_eq!(inside, Vec2::new(1.0, 1.0));
    }

    #[test]
    fn clamp_with_oversized_box_does_not_panic() {
        let bounds = Aabb::new(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0));
        let clamped = clamp_to_visible_bounds(Vec2::new(5.0, -5.0), 3.0, 3.0, &bounds);
        assert_eq!(clamped, Vec2::new(-2.0, 2.0));
    }

    //--- Pointer ----------------------------------------------------------

    #[test]
    fn pointer_maps_through_viewport() {
        let input = StateTracker::new();
        let viewport = Viewport::new(Vec2::ZERO, 5.0, 100, 100);
        assert_eq!(pointer_world_position(&input, &viewport), Vec2::new(-5.0, 5.0));
    }
}
