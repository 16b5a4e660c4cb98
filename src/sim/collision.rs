//! Circle vs axis-aligned rectangle overlap on the x/z plane
//!
//! The ball is a circle on the motion plane and each paddle is a rectangle, so
//! this is the only narrow-phase test the simulation needs.

use glam::Vec2;

/// Check whether a circle overlaps an axis-aligned rectangle.
///
/// `(cx, cz)` is the circle center and `r` its radius. `(rx, rz)` is the
/// rectangle center, `width` its extent along x and `depth` along z.
///
/// The test is boundary-inclusive: a tangent circle counts as overlapping.
pub fn circle_rect_overlap(
    cx: f32,
    cz: f32,
    r: f32,
    rx: f32,
    rz: f32,
    width: f32,
    depth: f32,
) -> bool {
    let center = Vec2::new(cx, cz);
    let nearest = nearest_point_on_rect(center, Vec2::new(rx, rz), Vec2::new(width, depth));
    center.distance_squared(nearest) <= r * r
}

/// Closest point of the rectangle to `point` (the point itself when inside)
#[inline]
pub fn nearest_point_on_rect(point: Vec2, rect_center: Vec2, rect_size: Vec2) -> Vec2 {
    let half = rect_size * 0.5;
    point.clamp(rect_center - half, rect_center + half)
}
