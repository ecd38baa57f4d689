//! Built-in demo scene used when no model files are configured
//!
//! A walled square floor with a ramp and a box-shaped pillar. The y axis
//! points up, matching the camera's up direction.

use std::sync::Arc;

use crate::foundation::math::Vec3;
use crate::physics::collision::Triangle;
use super::light::Light;
use super::mesh::{Material, Mesh};
use super::model::{Model, Terrain};

/// Half the side length of the floor
pub const ARENA_HALF_EXTENT: f32 = 20.0;
/// Height of the surrounding walls
pub const WALL_HEIGHT: f32 = 8.0;

/// Two triangles covering the quad `a b c d`
fn quad(a: Vec3, b: Vec3, c: Vec3, d: Vec3) -> [Triangle; 2] {
    [Triangle::from_positions(a, b, c), Triangle::from_positions(a, c, d)]
}

fn floor() -> Mesh {
    let h = ARENA_HALF_EXTENT;
    let triangles = quad(
        Vec3::new(-h, 0.0, -h),
        Vec3::new(-h, 0.0, h),
        Vec3::new(h, 0.0, h),
        Vec3::new(h, 0.0, -h),
    );
    Mesh::from_triangles("floor", triangles.to_vec(), Material::colored(Vec3::new(0.4, 0.6, 0.3)))
}

fn walls() -> Mesh {
    let h = ARENA_HALF_EXTENT;
    let corners = [
        Vec3::new(-h, 0.0, -h),
        Vec3::new(h, 0.0, -h),
        Vec3::new(h, 0.0, h),
        Vec3::new(-h, 0.0, h),
    ];
    let up = Vec3::new(0.0, WALL_HEIGHT, 0.0);
    let triangles = (0..corners.len())
        .flat_map(|i| {
            let start = corners[i];
            let end = corners[(i + 1) % corners.len()];
            quad(start, end, end + up, start + up)
        })
        .collect();
    Mesh::from_triangles("walls", triangles, Material::colored(Vec3::new(0.7, 0.7, 0.7)))
}

fn ramp() -> Mesh {
    let triangles = quad(
        Vec3::new(6.0, 0.0, -4.0),
        Vec3::new(6.0, 0.0, 4.0),
        Vec3::new(14.0, 3.0, 4.0),
        Vec3::new(14.0, 3.0, -4.0),
    );
    Mesh::from_triangles("ramp", triangles.to_vec(), Material::colored(Vec3::new(0.8, 0.5, 0.2)))
}

fn pillar() -> Mesh {
    let (min, max) = (Vec3::new(-8.0, 0.0, -8.0), Vec3::new(-4.0, 3.0, -4.0));
    let base = [
        Vec3::new(min.x, 0.0, min.z),
        Vec3::new(max.x, 0.0, min.z),
        Vec3::new(max.x, 0.0, max.z),
        Vec3::new(min.x, 0.0, max.z),
    ];
    let up = Vec3::new(0.0, max.y, 0.0);
    let mut triangles: Vec<Triangle> = (0..base.len())
        .flat_map(|i| {
            let start = base[i];
            let end = base[(i + 1) % base.len()];
            quad(start, end, end + up, start + up)
        })
        .collect();
    triangles.extend(quad(base[0] + up, base[1] + up, base[2] + up, base[3] + up));
    Mesh::from_triangles("pillar", triangles, Material::colored(Vec3::new(0.5, 0.3, 0.6)))
}

/// Build the demo arena
pub fn arena() -> Terrain {
    let meshes = [floor(), walls(), ramp(), pillar()].into_iter().map(Arc::new).collect();
    let model = Model::new(meshes, Vec::new());
    Terrain::new(vec![Arc::new(model)], vec![Light::white(Vec3::new(0.0, 15.0, 0.0))])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::CollisionResolver;
    use crate::scene::StaticGeometry;
    use approx::assert_relative_eq;

    #[test]
    fn test_arena_layout() {
        let terrain = arena();
        assert_eq!(terrain.mesh_count(), 4);
        assert_eq!(terrain.triangle_count(), 2 + 8 + 2 + 10);
        assert!(terrain.triangles().all(|triangle| !triangle.is_degenerate()));
    }

    #[test]
    fn test_default_start_is_clear() {
        let terrain = arena();
        let start = Vec3::new(2.0, 2.0, 2.0);
        let resolver = CollisionResolver::default();
        assert!(resolver.first_contact(&terrain, start, Vec3::zeros()).is_none());
        // Small moves in every axis direction are free
        for step in [Vec3::x(), Vec3::y(), Vec3::z(), -Vec3::x(), -Vec3::z()] {
            assert!(!resolver.resolve(&terrain, start, step * 0.5).collided);
        }
    }

    #[test]
    fn test_falling_lands_on_floor() {
        let terrain = arena();
        let resolver = CollisionResolver::default();
        let start = Vec3::new(3.0, 1.5, 2.0);
        let resolution = resolver.resolve(&terrain, start, Vec3::new(0.0, -5.0, 0.0));
        assert!(resolution.collided);
        assert_relative_eq!((start + resolution.step).y, 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_wall_stops_walking() {
        let terrain = arena();
        let resolver = CollisionResolver::default();
        let start = Vec3::new(17.0, 1.5, 10.0);
        let resolution = resolver.resolve(&terrain, start, Vec3::new(10.0, 0.0, 0.0));
        assert!(resolution.collided);
        assert_relative_eq!((start + resolution.step).x, ARENA_HALF_EXTENT - 1.0, epsilon = 1e-3);
    }
}
