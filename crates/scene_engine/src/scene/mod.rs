//! Scene model: static geometry the camera walks through
//!
//! A [`Terrain`] is a list of shared [`Model`]s, each a list of shared
//! [`Mesh`]es. Meshes carry their triangles already in world space so the
//! collision resolver can scan them directly through [`StaticGeometry`].

pub mod mesh;
pub mod light;
pub mod model;
pub mod geometry;
pub mod demo;

pub use mesh::{Vertex, Material, Texture, TextureKind, Mesh};
pub use light::Light;
pub use model::{Model, Terrain};
pub use geometry::StaticGeometry;

use thiserror::Error;

/// Scene construction errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A triangle-list vertex buffer whose length is not a multiple of three
    #[error("Mesh '{name}' has {vertex_count} vertices, which is not a whole number of triangles")]
    IncompleteTriangle {
        /// Mesh name
        name: String,
        /// Number of vertices supplied
        vertex_count: usize,
    },
}
