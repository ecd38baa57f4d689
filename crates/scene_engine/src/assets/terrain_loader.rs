//! Builds a [`Terrain`] from the configured model files

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::{ModelEntry, SceneConfig};
use crate::foundation::math::Transform;
use crate::scene::{demo, Light, Mesh, Model, StaticGeometry, Terrain};
use super::mtl_parser::{MtlData, MtlParser};
use super::obj_loader::{ObjLoader, ObjModel};
use super::AssetError;

/// Loads every model of a scene and merges their lights
pub struct TerrainLoader;

impl TerrainLoader {
    /// Load the terrain described by `config`
    ///
    /// Without configured models the built-in demo arena is used. Configured
    /// lights are added to the ones the scene brings; a scene left without
    /// any light gets the default sun light.
    pub fn load(config: &SceneConfig) -> Result<Terrain, AssetError> {
        let mut terrain = if config.models.is_empty() {
            log::info!("No models configured, using the demo arena");
            demo::arena()
        } else {
            let models = config
                .models
                .iter()
                .map(|entry| Self::load_model(entry).map(Arc::new))
                .collect::<Result<Vec<_>, _>>()?;
            let lights = models.iter().flat_map(|model| model.lights.iter().copied()).collect();
            Terrain::new(models, lights)
        };

        terrain.lights.extend(config.lights.iter().copied());
        if terrain.lights.is_empty() {
            terrain.lights.push(Light::default());
        }

        log::info!(
            "Terrain loaded: {} models, {} meshes, {} triangles, {} lights",
            terrain.models.len(),
            terrain.mesh_count(),
            terrain.triangle_count(),
            terrain.lights.len()
        );
        Ok(terrain)
    }

    /// Load one model file and bake its placement into the triangles
    pub fn load_model(entry: &ModelEntry) -> Result<Model, AssetError> {
        let obj = ObjLoader::load_obj(&entry.path).map_err(|source| AssetError::Model {
            path: entry.path.clone(),
            source,
        })?;
        let base_dir = entry.path.parent().unwrap_or_else(|| Path::new(""));
        let materials = Self::load_material_libraries(base_dir, &obj.material_libraries)?;
        let transform = Transform::from_position_scale(entry.position, entry.scale);

        let model = Self::build_model(obj, &materials, base_dir, &transform)?;
        log::info!(
            "Loaded {}: {} meshes, {} triangles",
            entry.path.display(),
            model.meshes.len(),
            model.triangle_count()
        );
        Ok(model)
    }

    /// Read and merge material libraries; missing files are only a warning
    pub fn load_material_libraries(
        base_dir: &Path,
        libraries: &[String],
    ) -> Result<HashMap<String, MtlData>, AssetError> {
        let mut materials = HashMap::new();
        for library in libraries {
            let path = base_dir.join(library);
            let contents = match std::fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(err) => {
                    log::warn!("Material library {} not loaded: {}", path.display(), err);
                    continue;
                }
            };
            let parsed = MtlParser::parse(&contents).map_err(|source| AssetError::Material { path, source })?;
            materials.extend(parsed);
        }
        Ok(materials)
    }

    /// Turn parsed OBJ data into a model placed by `transform`
    pub fn build_model(
        obj: ObjModel,
        materials: &HashMap<String, MtlData>,
        base_dir: &Path,
        transform: &Transform,
    ) -> Result<Model, AssetError> {
        let mut meshes = Vec::with_capacity(obj.meshes.len());
        for obj_mesh in obj.meshes {
            let data = obj_mesh.material.as_ref().and_then(|name| {
                let data = materials.get(name);
                if data.is_none() {
                    log::warn!("Mesh '{}' uses unknown material '{}'", obj_mesh.name, name);
                }
                data
            });
            let (material, textures) = data.map_or_else(Default::default, |data| (data.material(), data.textures(base_dir)));
            let mesh = Mesh::new(obj_mesh.name, &obj_mesh.vertices, textures, material, transform.clone())?;
            meshes.push(Arc::new(mesh));
        }
        Ok(Model::new(meshes, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::scene::{Material, TextureKind};
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    const PLANE_OBJ: &str = "\
mtllib plane.mtl
v -1 0 -1
v -1 0 1
v 1 0 1
v 1 0 -1
usemtl grass
f 1 2 3 4
";

    const PLANE_MTL: &str = "\
newmtl grass
Kd 0.1 0.7 0.1
map_Kd grass.png
";

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("scene_engine_{}_{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_build_model_applies_materials_and_transform() {
        let obj = ObjLoader::parse(PLANE_OBJ.as_bytes()).unwrap();
        let materials = MtlParser::parse(PLANE_MTL).unwrap();
        let transform = Transform::from_position_scale(Vec3::new(0.0, 2.0, 0.0), 10.0);
        let model = TerrainLoader::build_model(obj, &materials, Path::new("assets"), &transform).unwrap();

        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.material.diffuse, Vec3::new(0.1, 0.7, 0.1));
        assert_eq!(mesh.textures[0].kind, TextureKind::Diffuse);
        assert_eq!(mesh.textures[0].path, PathBuf::from("assets/grass.png"));

        let (min, max) = mesh.bounds().unwrap();
        assert_relative_eq!(min, Vec3::new(-10.0, 2.0, -10.0), epsilon = 1e-5);
        assert_relative_eq!(max, Vec3::new(10.0, 2.0, 10.0), epsilon = 1e-5);
    }

    #[test]
    fn test_unknown_material_falls_back_to_default() {
        let obj = ObjLoader::parse(PLANE_OBJ.as_bytes()).unwrap();
        let model = TerrainLoader::build_model(obj, &HashMap::new(), Path::new(""), &Transform::identity()).unwrap();
        assert_eq!(model.meshes[0].material, Material::default());
        assert!(model.meshes[0].textures.is_empty());
    }

    #[test]
    fn test_empty_scene_uses_arena_plus_configured_lights() {
        let config = SceneConfig {
            models: Vec::new(),
            lights: vec![Light::white(Vec3::new(1.0, 2.0, 3.0))],
        };
        let terrain = TerrainLoader::load(&config).unwrap();
        assert_eq!(terrain.triangle_count(), demo::arena().triangle_count());
        assert_eq!(terrain.lights.len(), 2);
    }

    #[test]
    fn test_load_from_files() {
        let dir = scratch_dir("load_from_files");
        std::fs::write(dir.join("plane.obj"), PLANE_OBJ).unwrap();
        std::fs::write(dir.join("plane.mtl"), PLANE_MTL).unwrap();

        let config = SceneConfig {
            models: vec![ModelEntry {
                path: dir.join("plane.obj"),
                position: Vec3::new(0.0, -1.0, 0.0),
                scale: 5.0,
            }],
            lights: Vec::new(),
        };
        let terrain = TerrainLoader::load(&config).unwrap();
        assert_eq!(terrain.triangle_count(), 2);
        assert_eq!(terrain.lights, vec![Light::default()]);
        assert_eq!(terrain.models[0].meshes[0].textures[0].path, dir.join("grass.png"));

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_missing_model_file_is_an_error() {
        let config = SceneConfig {
            models: vec![ModelEntry {
                path: PathBuf::from("does/not/exist.obj"),
                ..Default::default()
            }],
            lights: Vec::new(),
        };
        assert!(matches!(TerrainLoader::load(&config), Err(AssetError::Model { .. })));
    }
}
