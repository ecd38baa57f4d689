//! Mesh representation for static scene geometry
//!
//! Meshes are built from a flat triangle-list vertex buffer: every three
//! consecutive vertices form one triangle. The placement transform is applied
//! once at construction, so the stored triangles are in world space and
//! never change afterwards. The transform itself is kept for renderers that
//! want the model-space view.

use std::path::PathBuf;

use crate::foundation::math::{Transform, Vec2, Vec3};
use crate::physics::collision::Triangle;
use super::SceneError;

/// Vertex with position, normal and texture coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Position
    pub position: Vec3,
    /// Normal vector (zero when unknown)
    pub normal: Vec3,
    /// Texture coordinates
    pub tex_coords: Vec2,
}

impl Vertex {
    /// Create a vertex
    pub fn new(position: Vec3, normal: Vec3, tex_coords: Vec2) -> Self {
        Self {
            position,
            normal,
            tex_coords,
        }
    }

    /// Create a vertex with only a position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Phong material parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: Vec3::new(0.2, 0.2, 0.2),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            shininess: 32.0,
        }
    }
}

impl Material {
    /// Flat material of a single diffuse color
    pub fn colored(diffuse: Vec3) -> Self {
        Self {
            ambient: diffuse * 0.25,
            diffuse,
            ..Default::default()
        }
    }
}

/// Role of a texture in the material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureKind {
    /// Diffuse color map (map_Kd)
    Diffuse,
    /// Specular map (map_Ks)
    Specular,
}

/// Texture reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    /// Texture role
    pub kind: TextureKind,
    /// Image path, resolved against the material library directory
    pub path: PathBuf,
}

/// Static mesh with world-space triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Mesh name (object or group name from the source file)
    pub name: String,
    /// Textures used by the material
    pub textures: Vec<Texture>,
    /// Surface material
    pub material: Material,
    /// Placement transform already baked into the triangles
    pub transform: Transform,
    triangles: Vec<Triangle>,
}

impl Mesh {
    /// Build a mesh from a triangle-list vertex buffer placed by `transform`
    ///
    /// Positions are transformed to world space and normals are rotated with
    /// the mesh. Fails when the buffer length is not a multiple of three.
    pub fn new(
        name: impl Into<String>,
        vertices: &[Vertex],
        textures: Vec<Texture>,
        material: Material,
        transform: Transform,
    ) -> Result<Self, SceneError> {
        let name = name.into();
        if vertices.len() % 3 != 0 {
            return Err(SceneError::IncompleteTriangle {
                name,
                vertex_count: vertices.len(),
            });
        }

        let to_world = |vertex: &Vertex| Vertex {
            position: transform.transform_point(vertex.position),
            normal: transform.rotation * vertex.normal,
            tex_coords: vertex.tex_coords,
        };
        let triangles = vertices
            .chunks_exact(3)
            .map(|corners| Triangle::new(to_world(&corners[0]), to_world(&corners[1]), to_world(&corners[2])))
            .collect();

        Ok(Self {
            name,
            textures,
            material,
            transform,
            triangles,
        })
    }

    /// Build an untextured mesh directly from world-space triangles
    pub fn from_triangles(name: impl Into<String>, triangles: Vec<Triangle>, material: Material) -> Self {
        Self {
            name: name.into(),
            textures: Vec::new(),
            material,
            transform: Transform::identity(),
            triangles,
        }
    }

    /// World-space triangles in load order
    pub fn triangle_slice(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Axis-aligned bounds of the world-space triangles as `(min, max)`
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut positions = self.triangles.iter().flat_map(Triangle::positions);
        let first = positions.next()?;
        Some(positions.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p))))
    }
}
