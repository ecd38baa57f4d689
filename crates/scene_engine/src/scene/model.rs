//! Models and terrains: shared collections of meshes

use std::sync::Arc;

use super::light::Light;
use super::mesh::Mesh;

/// A loaded model: meshes plus the lights that came with it
#[derive(Debug, Clone, Default)]
pub struct Model {
    /// Meshes in load order
    pub meshes: Vec<Arc<Mesh>>,
    /// Lights declared by the model
    pub lights: Vec<Light>,
}

impl Model {
    /// Create a model
    pub fn new(meshes: Vec<Arc<Mesh>>, lights: Vec<Light>) -> Self {
        Self { meshes, lights }
    }
}

/// The static world: every model the camera can collide with
#[derive(Debug, Clone, Default)]
pub struct Terrain {
    /// Models in load order
    pub models: Vec<Arc<Model>>,
    /// Scene lights
    pub lights: Vec<Light>,
}

impl Terrain {
    /// Create a terrain
    pub fn new(models: Vec<Arc<Model>>, lights: Vec<Light>) -> Self {
        Self { models, lights }
    }

    /// The light used for shading, falling back to the default sun light
    pub fn primary_light(&self) -> Light {
        self.lights.first().copied().unwrap_or_default()
    }

    /// Number of meshes across all models
    pub fn mesh_count(&self) -> usize {
        self.models.iter().map(|model| model.meshes.len()).sum()
    }
}
