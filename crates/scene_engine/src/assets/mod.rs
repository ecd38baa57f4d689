//! Asset loading: Wavefront OBJ models, MTL materials and whole terrains

pub mod obj_loader;
pub mod mtl_parser;
pub mod terrain_loader;

pub use obj_loader::{ObjLoader, ObjError, ObjModel, ObjMesh};
pub use mtl_parser::{MtlParser, MtlData, MtlError};
pub use terrain_loader::TerrainLoader;

use std::path::PathBuf;

use thiserror::Error;

use crate::scene::SceneError;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// A model file could not be read or parsed
    #[error("Failed to load model {path}: {source}")]
    Model {
        /// Model path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: ObjError,
    },

    /// A material library could not be parsed
    #[error("Failed to parse material library {path}: {source}")]
    Material {
        /// Material library path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: MtlError,
    },

    /// Loaded data did not form valid scene geometry
    #[error("Invalid scene geometry: {0}")]
    Scene(#[from] SceneError),
}
