//! Sphere sweep against a single triangle
//!
//! A sphere of radius `r` centered at `position` moves by `step`. The test
//! classifies the motion against one triangle in a fixed order: the sphere
//! may already overlap it, or first touch its face, one of its edges, or
//! one of its corners. Face contacts win over edge contacts, which win over
//! vertex contacts, regardless of their relative distances.
//!
//! A sphere resting within [`PENETRATION_TOLERANCE`] of a feature and moving
//! towards it touches at the very start of the step. This holds for faces,
//! edges and corners alike.

use crate::foundation::math::Vec3;
use super::primitives::{
    cylinder_sweep_intersect, distance_to_line_segment, is_point_inside_triangle, is_zero,
    sphere_sweep_intersect,
};
use super::triangle::Triangle;

/// Slack below the radius before a sphere counts as overlapping a plane
pub const PENETRATION_TOLERANCE: f32 = 1e-2;

/// Which feature of a triangle the sphere touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// The interior of the triangle
    Face,
    /// One of the three edges
    Edge,
    /// One of the three corners
    Vertex,
}

/// First contact of a sweep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Fraction of the step travelled before touching, in `[0, 1]`
    pub distance: f32,
    /// Sphere center at the moment of contact
    pub point: Vec3,
    /// Unit contact normal, pointing from the surface towards the sphere
    pub normal: Vec3,
    /// Touched feature
    pub kind: ContactKind,
}

/// Result of sweeping a sphere against one triangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SweepOutcome {
    /// The sweep does not touch the triangle
    NoContact,
    /// The sphere already overlaps the triangle; it is ignored for this sweep
    AlreadyInside,
    /// The sweep touches the triangle
    Contact(Contact),
}

impl SweepOutcome {
    /// The contact, if any
    pub fn contact(self) -> Option<Contact> {
        match self {
            Self::Contact(contact) => Some(contact),
            Self::NoContact | Self::AlreadyInside => None,
        }
    }
}

/// Sweep a sphere along `step` against `triangle`
pub fn sweep_sphere_triangle(triangle: &Triangle, position: Vec3, radius: f32, step: Vec3) -> SweepOutcome {
    let [a, b, c] = triangle.positions();

    // Work with the side of the plane the sphere is on
    let mut normal = triangle.normal;
    let mut d = triangle.d;
    if normal.dot(&position) + d < 0.0 {
        normal = -normal;
        d = -d;
    }
    let plane_distance = normal.dot(&position) + d;

    if plane_distance < radius - PENETRATION_TOLERANCE {
        let projection = position - normal * plane_distance;
        if is_point_inside_triangle(projection, a, b, c) {
            return SweepOutcome::AlreadyInside;
        }
        let touches_edge = triangle
            .edges()
            .iter()
            .any(|&(start, end)| distance_to_line_segment(position, start, end) < radius - PENETRATION_TOLERANCE);
        if touches_edge {
            return SweepOutcome::AlreadyInside;
        }
    }

    if let Some(contact) = face_contact(normal, d, plane_distance, [a, b, c], position, radius, step) {
        return SweepOutcome::Contact(contact);
    }
    if let Some(contact) = edge_contact(triangle, position, radius, step) {
        return SweepOutcome::Contact(contact);
    }
    if let Some(contact) = vertex_contact(triangle, position, radius, step) {
        return SweepOutcome::Contact(contact);
    }
    SweepOutcome::NoContact
}

fn face_contact(
    normal: Vec3,
    d: f32,
    plane_distance: f32,
    corners: [Vec3; 3],
    position: Vec3,
    radius: f32,
    step: Vec3,
) -> Option<Contact> {
    let approach = normal.dot(&step);
    if approach >= 0.0 {
        return None;
    }

    let mut lambda = (radius - d - normal.dot(&position)) / approach;
    // Resting inside the tolerance band counts as touching right away
    if lambda < 0.0 && plane_distance >= radius - PENETRATION_TOLERANCE {
        lambda = 0.0;
    }
    if !(0.0..=1.0).contains(&lambda) {
        return None;
    }

    let point = position + step * lambda;
    let surface = point - normal * (normal.dot(&point) + d);
    let [a, b, c] = corners;
    if !is_point_inside_triangle(surface, a, b, c) {
        return None;
    }

    Some(Contact {
        distance: lambda,
        point,
        normal,
        kind: ContactKind::Face,
    })
}

/// Fraction of `step` needed to get from `position` to `hit`, negative when
/// `hit` lies behind the start
#[inline]
fn relative_distance(position: Vec3, hit: Vec3, step: Vec3) -> f32 {
    (hit - position).dot(&step) / step.norm_squared()
}

/// Contact at the start of the step for a sphere resting against a feature
///
/// `separation` points from the closest point of the feature to the sphere
/// center. Only centers inside the tolerance band below the radius that
/// move towards the feature count.
fn resting_contact(position: Vec3, separation: Vec3, radius: f32, step: Vec3, kind: ContactKind) -> Option<Contact> {
    let clearance = separation.norm();
    if clearance < radius - PENETRATION_TOLERANCE || clearance >= radius || is_zero(clearance) {
        return None;
    }
    let normal = separation / clearance;
    if normal.dot(&step) >= 0.0 {
        return None;
    }
    Some(Contact {
        distance: 0.0,
        point: position,
        normal,
        kind,
    })
}

/// Keep `best` unless `candidate` is strictly closer
fn nearer(best: Option<Contact>, candidate: Option<Contact>) -> Option<Contact> {
    match (best, candidate) {
        (Some(current), Some(contact)) if contact.distance < current.distance => Some(contact),
        (None, candidate) => candidate,
        (best, _) => best,
    }
}

fn edge_contact(triangle: &Triangle, position: Vec3, radius: f32, step: Vec3) -> Option<Contact> {
    let mut best: Option<Contact> = None;

    for (start, end) in triangle.edges() {
        let axis = end - start;
        let axis_dot_axis = axis.dot(&axis);
        if is_zero(axis_dot_axis) {
            continue;
        }
        let radial = |point: Vec3| {
            let offset = point - start;
            offset - axis * (offset.dot(&axis) / axis_dot_axis)
        };

        let along = (position - start).dot(&axis);
        let resting = if along > 0.0 && along < axis_dot_axis {
            resting_contact(position, radial(position), radius, step, ContactKind::Edge)
        } else {
            None
        };

        let candidate = resting.or_else(|| {
            let hit = cylinder_sweep_intersect(position, step, start, end, radius)?;
            let lambda = relative_distance(position, hit, step);
            if !(0.0..1.0).contains(&lambda) {
                return None;
            }
            let normal = radial(hit).normalize();
            if normal.dot(&step) >= 0.0 {
                return None;
            }
            Some(Contact {
                distance: lambda,
                point: hit,
                normal,
                kind: ContactKind::Edge,
            })
        });
        best = nearer(best, candidate);
    }

    best
}

fn vertex_contact(triangle: &Triangle, position: Vec3, radius: f32, step: Vec3) -> Option<Contact> {
    let mut best: Option<Contact> = None;

    for corner in triangle.positions() {
        let resting = resting_contact(position, position - corner, radius, step, ContactKind::Vertex);
        let candidate = resting.or_else(|| {
            let hit = sphere_sweep_intersect(position, step, corner, radius)?;
            let lambda = relative_distance(position, hit, step);
            if !(0.0..1.0).contains(&lambda) {
                return None;
            }
            let normal = (hit - corner).normalize();
            if normal.dot(&step) >= 0.0 {
                return None;
            }
            Some(Contact {
                distance: lambda,
                point: hit,
                normal,
                kind: ContactKind::Vertex,
            })
        });
        best = nearer(best, candidate);
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor() -> Triangle {
        Triangle::from_positions(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 10.0, 0.0),
        )
    }

    #[test]
    fn test_face_contact_head_on() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, 5.0), 1.0, Vec3::new(0.0, 0.0, -10.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Face);
        assert_relative_eq!(contact.distance, 0.4, epsilon = 1e-5);
        assert_relative_eq!(contact.point, Vec3::new(3.0, 3.0, 1.0), epsilon = 1e-5);
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_face_contact_from_below_flips_normal() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, -5.0), 1.0, Vec3::new(0.0, 0.0, 10.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Face);
        assert_relative_eq!(contact.point, Vec3::new(3.0, 3.0, -1.0), epsilon = 1e-5);
        assert_relative_eq!(contact.normal, Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_moving_away_has_no_contact() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, 5.0), 1.0, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(outcome, SweepOutcome::NoContact);
    }

    #[test]
    fn test_short_step_has_no_contact() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, 5.0), 1.0, Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(outcome, SweepOutcome::NoContact);
    }

    #[test]
    fn test_overlapping_sphere_is_already_inside() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, 0.5), 1.0, Vec3::new(0.0, 0.0, -1.0));
        assert_eq!(outcome, SweepOutcome::AlreadyInside);
    }

    #[test]
    fn test_overlapping_edge_is_already_inside() {
        // Center outside the triangle but within the radius of edge ab
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(5.0, -0.5, 0.2), 1.0, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(outcome, SweepOutcome::AlreadyInside);
    }

    #[test]
    fn test_resting_on_face_touches_immediately() {
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(3.0, 3.0, 0.995), 1.0, Vec3::new(1.0, 0.0, -1.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Face);
        assert_eq!(contact.distance, 0.0);
        assert_relative_eq!(contact.point, Vec3::new(3.0, 3.0, 0.995));
    }

    #[test]
    fn test_edge_contact_beside_triangle() {
        // Falls past edge ab (the x axis) on the outside, grazing it
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(5.0, -0.5, 5.0), 1.0, Vec3::new(0.0, 0.0, -10.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Edge);
        let expected_z = (1.0f32 - 0.25).sqrt();
        assert_relative_eq!(contact.point, Vec3::new(5.0, -0.5, expected_z), epsilon = 1e-4);
        assert_relative_eq!(contact.distance, (5.0 - expected_z) / 10.0, epsilon = 1e-5);
        assert_relative_eq!(contact.normal, Vec3::new(0.0, -0.5, expected_z), epsilon = 1e-4);
        assert!(contact.normal.dot(&Vec3::new(0.0, 0.0, -10.0)) < 0.0);
    }

    #[test]
    fn test_vertex_contact_outside_corner() {
        // Falls past corner a on the diagonal outside both adjacent edges
        let offset = -0.4;
        let position = Vec3::new(offset, offset, 5.0);
        let outcome = sweep_sphere_triangle(&floor(), position, 1.0, Vec3::new(0.0, 0.0, -10.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Vertex);
        let expected_z = (1.0f32 - 2.0 * offset * offset).sqrt();
        assert_relative_eq!(contact.point, Vec3::new(offset, offset, expected_z), epsilon = 1e-4);
        assert_relative_eq!(contact.normal.norm(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_edge_hit_behind_start_is_ignored() {
        // The edge lies behind the sphere along the direction of travel
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(5.0, -0.5, 5.0), 1.0, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(outcome, SweepOutcome::NoContact);
    }

    #[test]
    fn test_resting_against_edge_touches_immediately() {
        // Just inside the cylinder around edge ab, beside the triangle
        let position = Vec3::new(5.0, -0.6, 0.7995);
        let outcome = sweep_sphere_triangle(&floor(), position, 1.0, Vec3::new(0.0, 1.0, 0.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Edge);
        assert_eq!(contact.distance, 0.0);
        assert_eq!(contact.point, position);
        let clearance = Vec3::new(0.0, -0.6, 0.7995).norm();
        assert_relative_eq!(contact.normal, Vec3::new(0.0, -0.6, 0.7995) / clearance, epsilon = 1e-6);
    }

    #[test]
    fn test_resting_against_edge_moving_away_is_free() {
        let position = Vec3::new(5.0, -0.6, 0.7995);
        let outcome = sweep_sphere_triangle(&floor(), position, 1.0, Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(outcome, SweepOutcome::NoContact);
    }

    #[test]
    fn test_resting_against_corner_touches_immediately() {
        // Within the band around corner a, inside neither edge cylinder band
        let position = Vec3::new(-0.5, -0.5, 0.7);
        let outcome = sweep_sphere_triangle(&floor(), position, 1.0, Vec3::new(1.0, 1.0, 0.0));
        let contact = outcome.contact().unwrap();
        assert_eq!(contact.kind, ContactKind::Vertex);
        assert_eq!(contact.distance, 0.0);
        assert_relative_eq!(contact.normal, position.normalize(), epsilon = 1e-6);
    }

    #[test]
    fn test_face_wins_over_edge() {
        // Lands inside near edge ab: the face is reported even though the
        // edge cylinder is crossed too
        let outcome = sweep_sphere_triangle(&floor(), Vec3::new(5.0, 0.5, 5.0), 1.0, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(outcome.contact().unwrap().kind, ContactKind::Face);
    }
}
