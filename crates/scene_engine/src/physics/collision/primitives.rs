//! Primitive geometric tests used by the sweep collision algorithm
//!
//! Every function here is a pure computation over `f32` vectors. The sweep
//! functions return the sphere center at the moment of contact and leave
//! range filtering (`λ ∈ [0, 1)`) to the caller.

use crate::foundation::math::Vec3;

/// Tolerance used for comparisons against zero
pub const ZERO_TOLERANCE: f32 = 1e-5;

/// Tolerance on the barycentric area sum in [`is_point_inside_triangle`]
pub const AREA_SUM_TOLERANCE: f32 = 1e-5;

/// Check whether a value is zero within [`ZERO_TOLERANCE`]
#[inline]
pub fn is_zero(value: f32) -> bool {
    value.abs() < ZERO_TOLERANCE
}

/// Test whether `point`, already lying in the plane of triangle `abc`,
/// falls inside the triangle
///
/// Uses the area identity: the three sub-triangles formed with `point`
/// cover the triangle exactly when the point is inside, so their areas sum
/// to the full area. Degenerate triangles (zero area) contain no points.
pub fn is_point_inside_triangle(point: Vec3, a: Vec3, b: Vec3, c: Vec3) -> bool {
    let double_area = (b - a).cross(&(c - a)).norm();
    if double_area == 0.0 {
        return false;
    }

    let t1 = (a - point).cross(&(b - point)).norm() / double_area;
    let t2 = (b - point).cross(&(c - point)).norm() / double_area;
    let t3 = (c - point).cross(&(a - point)).norm() / double_area;

    (t1 + t2 + t3 - 1.0).abs() <= AREA_SUM_TOLERANCE
}

/// Intersect the ray `position + λ·direction` with a sphere
///
/// Returns the point at the smaller root of the quadratic, which may lie
/// behind the ray origin. Tangent rays (discriminant `<= 0`) and a zero
/// direction yield `None`.
pub fn sphere_sweep_intersect(position: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<Vec3> {
    let a = direction.dot(&direction);
    if is_zero(a) {
        return None;
    }
    let center_to_position = position - center;
    let b = 2.0 * center_to_position.dot(&direction);
    let c = center_to_position.dot(&center_to_position) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let lambda = (-b - discriminant.sqrt()) / (2.0 * a);
    Some(position + direction * lambda)
}

/// Intersect the ray `position + λ·direction` with the cylinder of `radius`
/// around the segment `start → end`
///
/// The quadratic is solved against the infinite cylinder; the hit is only
/// reported when its projection onto the axis falls strictly inside the
/// segment, i.e. in `(0, |axis|²)`. Rays parallel to the axis and
/// zero-length axes yield `None`.
pub fn cylinder_sweep_intersect(
    position: Vec3,
    direction: Vec3,
    start: Vec3,
    end: Vec3,
    radius: f32,
) -> Option<Vec3> {
    let axis = end - start;
    let axis_dot_axis = axis.dot(&axis);
    if is_zero(axis_dot_axis) {
        return None;
    }

    let p0 = position - start;
    let direction_dot_axis = direction.dot(&axis);
    let p0_dot_axis = p0.dot(&axis);

    let a = direction.dot(&direction) - direction_dot_axis * direction_dot_axis / axis_dot_axis;
    if is_zero(a) {
        return None;
    }
    let b = p0.dot(&direction) - p0_dot_axis * direction_dot_axis / axis_dot_axis;
    let c = p0.dot(&p0) - radius * radius - p0_dot_axis * p0_dot_axis / axis_dot_axis;

    let discriminant = b * b - a * c;
    if discriminant <= 0.0 {
        return None;
    }

    let lambda = (-b - discriminant.sqrt()) / a;
    let intersection = position + direction * lambda;
    let projection = (intersection - start).dot(&axis);
    if projection > 0.0 && projection < axis_dot_axis {
        Some(intersection)
    } else {
        None
    }
}

/// Distance from `position` to the surface of a sphere, 0 when inside
pub fn distance_to_sphere(position: Vec3, center: Vec3, radius: f32) -> f32 {
    ((center - position).norm() - radius).max(0.0)
}

/// Distance from `position` to the closest point of the segment `start → end`
pub fn distance_to_line_segment(position: Vec3, start: Vec3, end: Vec3) -> f32 {
    let direction = end - start;
    let length_squared = direction.dot(&direction);
    if length_squared == 0.0 {
        return (position - start).norm();
    }

    let lambda = (position - start).dot(&direction) / length_squared;
    if lambda < 0.0 {
        (position - start).norm()
    } else if lambda > 1.0 {
        (position - end).norm()
    } else {
        (position - (start + direction * lambda)).norm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn triangle() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        )
    }

    #[test]
    fn test_is_zero() {
        assert!(is_zero(0.0));
        assert!(is_zero(-9e-6));
        assert!(!is_zero(1e-4));
    }

    #[test]
    fn test_point_inside_triangle_centroid() {
        let (a, b, c) = triangle();
        let centroid = (a + b + c) / 3.0;
        assert!(is_point_inside_triangle(centroid, a, b, c));
    }

    #[test]
    fn test_point_off_plane_is_outside() {
        let (a, b, c) = triangle();
        let centroid = (a + b + c) / 3.0;
        let lifted = centroid + Vec3::new(0.0, 0.0, 10.0);
        assert!(!is_point_inside_triangle(lifted, a, b, c));
    }

    #[test]
    fn test_point_beyond_hypotenuse_is_outside() {
        let (a, b, c) = triangle();
        assert!(!is_point_inside_triangle(Vec3::new(6.0, 6.0, 0.0), a, b, c));
        assert!(is_point_inside_triangle(Vec3::new(4.0, 4.0, 0.0), a, b, c));
    }

    #[test]
    fn test_degenerate_triangle_contains_nothing() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(1.0, 1.0, 1.0);
        let c = Vec3::new(2.0, 2.0, 2.0);
        assert!(!is_point_inside_triangle(b, a, b, c));
    }

    #[test]
    fn test_sphere_sweep_head_on() {
        let hit = sphere_sweep_intersect(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zeros(),
            1.0,
        )
        .unwrap();
        assert_relative_eq!(hit, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_sphere_sweep_miss_and_tangent() {
        let direction = Vec3::new(0.0, 0.0, -10.0);
        assert!(sphere_sweep_intersect(Vec3::new(2.0, 0.0, 5.0), direction, Vec3::zeros(), 1.0).is_none());
        assert!(sphere_sweep_intersect(Vec3::new(1.0, 0.0, 5.0), direction, Vec3::zeros(), 1.0).is_none());
        assert!(sphere_sweep_intersect(Vec3::new(0.0, 0.0, 5.0), Vec3::zeros(), Vec3::zeros(), 1.0).is_none());
    }

    #[test]
    fn test_cylinder_sweep_hits_segment_side() {
        let hit = cylinder_sweep_intersect(
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zeros(),
            Vec3::new(10.0, 0.0, 0.0),
            1.0,
        )
        .unwrap();
        assert_relative_eq!(hit, Vec3::new(5.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_cylinder_sweep_outside_segment_range() {
        let hit = cylinder_sweep_intersect(
            Vec3::new(12.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::zeros(),
            Vec3::new(10.0, 0.0, 0.0),
            1.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_cylinder_sweep_parallel_to_axis() {
        let hit = cylinder_sweep_intersect(
            Vec3::new(-5.0, 0.5, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::zeros(),
            Vec3::new(10.0, 0.0, 0.0),
            1.0,
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_distance_to_sphere_clamps_inside() {
        assert_relative_eq!(distance_to_sphere(Vec3::new(3.0, 0.0, 0.0), Vec3::zeros(), 1.0), 2.0);
        assert_eq!(distance_to_sphere(Vec3::new(0.5, 0.0, 0.0), Vec3::zeros(), 1.0), 0.0);
    }

    #[test]
    fn test_distance_to_line_segment_regions() {
        let start = Vec3::zeros();
        let end = Vec3::new(10.0, 0.0, 0.0);
        assert_relative_eq!(distance_to_line_segment(Vec3::new(5.0, 3.0, 0.0), start, end), 3.0);
        assert_relative_eq!(distance_to_line_segment(Vec3::new(-3.0, 4.0, 0.0), start, end), 5.0);
        assert_relative_eq!(distance_to_line_segment(Vec3::new(13.0, 0.0, 4.0), start, end), 5.0);
    }
}
