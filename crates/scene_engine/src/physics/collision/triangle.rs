//! Triangle with a precomputed supporting plane

use crate::foundation::math::Vec3;
use crate::scene::Vertex;
use super::primitives::is_zero;

/// A triangle of static geometry together with its plane
///
/// The plane satisfies `normal · p + d == 0` for every point `p` on it.
/// Triangles are built once when a mesh is created and never mutated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// The three corners, counter-clockwise around `normal`
    pub vertices: [Vertex; 3],
    /// Unit face normal (a fixed placeholder for degenerate triangles)
    pub normal: Vec3,
    /// Plane offset
    pub d: f32,
}

impl Triangle {
    /// Placeholder normal assigned to triangles without a usable normal
    pub const DEGENERATE_NORMAL: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    /// Build a triangle from three vertices, computing its plane
    ///
    /// Collinear or duplicate positions produce a zero-length cross product;
    /// such a triangle is kept with [`Self::DEGENERATE_NORMAL`] and a warning
    /// is logged.
    pub fn new(a: Vertex, b: Vertex, c: Vertex) -> Self {
        let pa = a.position;
        let cross = (b.position - pa).cross(&(c.position - pa));
        let length = cross.norm();

        let normal = if is_zero(length) {
            log::warn!(
                "Triangle ({:?}, {:?}, {:?}) has a normal with length equal to 0",
                pa, b.position, c.position
            );
            Self::DEGENERATE_NORMAL
        } else {
            cross / length
        };

        Self {
            vertices: [a, b, c],
            normal,
            d: -normal.dot(&pa),
        }
    }

    /// Build a triangle from bare positions
    pub fn from_positions(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self::new(Vertex::from_position(a), Vertex::from_position(b), Vertex::from_position(c))
    }

    /// Corner positions
    #[inline]
    pub fn positions(&self) -> [Vec3; 3] {
        [
            self.vertices[0].position,
            self.vertices[1].position,
            self.vertices[2].position,
        ]
    }

    /// The three edges as `(start, end)` pairs: ab, bc, ca
    #[inline]
    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        let [a, b, c] = self.positions();
        [(a, b), (b, c), (c, a)]
    }

    /// Signed distance of `point` from the plane, positive on the normal side
    #[inline]
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(&point) + self.d
    }

    /// Whether the triangle has no usable normal
    pub fn is_degenerate(&self) -> bool {
        self.normal == Self::DEGENERATE_NORMAL
    }

    /// Centroid of the three corners
    pub fn centroid(&self) -> Vec3 {
        let [a, b, c] = self.positions();
        (a + b + c) / 3.0
    }

    /// Copy of this triangle with every corner mapped through `map`
    ///
    /// The plane is recomputed from the mapped positions.
    pub fn map_positions(&self, map: impl Fn(Vec3) -> Vec3) -> Self {
        let [a, b, c] = self.vertices;
        Self::new(
            Vertex { position: map(a.position), ..a },
            Vertex { position: map(b.position), ..b },
            Vertex { position: map(c.position), ..c },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_plane_of_xy_triangle() {
        let triangle = Triangle::from_positions(
            Vec3::new(0.0, 0.0, 2.0),
            Vec3::new(10.0, 0.0, 2.0),
            Vec3::new(0.0, 10.0, 2.0),
        );
        assert_relative_eq!(triangle.normal, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
        assert_relative_eq!(triangle.d, -2.0, epsilon = 1e-6);
        assert_relative_eq!(triangle.signed_distance(Vec3::new(3.0, 3.0, 5.0)), 3.0, epsilon = 1e-6);
        assert_relative_eq!(triangle.signed_distance(Vec3::new(3.0, 3.0, 0.0)), -2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_every_vertex_lies_on_plane() {
        let triangle = Triangle::from_positions(
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(4.0, 3.0, -1.0),
            Vec3::new(-2.0, 5.0, 2.0),
        );
        assert_relative_eq!(triangle.normal.norm(), 1.0, epsilon = 1e-6);
        for position in triangle.positions() {
            assert_relative_eq!(triangle.signed_distance(position), 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_degenerate_triangle_gets_placeholder_normal() {
        let triangle = Triangle::from_positions(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
        );
        assert!(triangle.is_degenerate());
        assert_eq!(triangle.normal, Triangle::DEGENERATE_NORMAL);
    }

    #[test]
    fn test_map_positions_recomputes_plane() {
        let triangle = Triangle::from_positions(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let lifted = triangle.map_positions(|p| p + Vec3::new(0.0, 0.0, 3.0));
        assert_relative_eq!(lifted.d, -3.0, epsilon = 1e-6);
        assert_relative_eq!(lifted.centroid().z, 3.0, epsilon = 1e-6);
    }
}
