//! Read-only triangle access for collision queries

use crate::physics::collision::Triangle;
use super::mesh::Mesh;
use super::model::{Model, Terrain};

/// Static geometry that can be scanned triangle by triangle
///
/// Iteration order is stable: meshes in load order, triangles in load
/// order. The collision resolver relies on it to break ties between
/// equally distant contacts.
pub trait StaticGeometry {
    /// Iterate over every triangle without allocating
    fn triangles(&self) -> impl Iterator<Item = &Triangle>;

    /// Total number of triangles
    fn triangle_count(&self) -> usize {
        self.triangles().count()
    }
}

impl StaticGeometry for [Triangle] {
    fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.iter()
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }
}

impl StaticGeometry for Mesh {
    fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.triangle_slice().iter()
    }

    fn triangle_count(&self) -> usize {
        self.triangle_slice().len()
    }
}

impl StaticGeometry for Model {
    fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.meshes.iter().flat_map(|mesh| mesh.triangle_slice())
    }

    fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|mesh| mesh.triangle_slice().len()).sum()
    }
}

impl StaticGeometry for Terrain {
    fn triangles(&self) -> impl Iterator<Item = &Triangle> {
        self.models.iter().flat_map(|model| model.triangles())
    }

    fn triangle_count(&self) -> usize {
        self.models.iter().map(|model| model.triangle_count()).sum()
    }
}
