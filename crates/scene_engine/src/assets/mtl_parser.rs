//! MTL (Material Template Library) file parser
//!
//! Parses Wavefront .mtl files into Phong materials and texture references.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::Vec3;
use crate::scene::{Material, Texture, TextureKind};

/// Error in an MTL file
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Line {line}: {message}")]
pub struct MtlError {
    /// One-based line number
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl MtlError {
    fn new(line_num: usize, message: String) -> Self {
        Self {
            line: line_num + 1,
            message,
        }
    }
}

/// Parsed MTL material data (Wavefront Phong model)
#[derive(Debug, Clone, PartialEq)]
pub struct MtlData {
    /// Material name
    pub name: String,
    /// Ambient color (Ka)
    pub ambient: Vec3,
    /// Diffuse color (Kd)
    pub diffuse: Vec3,
    /// Specular color (Ks)
    pub specular: Vec3,
    /// Specular exponent (Ns)
    pub specular_exponent: f32,
    /// Diffuse texture map (map_Kd)
    pub diffuse_map: Option<String>,
    /// Specular texture map (map_Ks)
    pub specular_map: Option<String>,
}

impl Default for MtlData {
    fn default() -> Self {
        let material = Material::default();
        Self {
            name: String::new(),
            ambient: material.ambient,
            diffuse: material.diffuse,
            specular: material.specular,
            specular_exponent: material.shininess,
            diffuse_map: None,
            specular_map: None,
        }
    }
}

impl MtlData {
    /// Phong material of this entry
    pub fn material(&self) -> Material {
        Material {
            ambient: self.ambient,
            diffuse: self.diffuse,
            specular: self.specular,
            shininess: self.specular_exponent,
        }
    }

    /// Texture references, resolved against the material library directory
    pub fn textures(&self, base_dir: &Path) -> Vec<Texture> {
        [
            (TextureKind::Diffuse, &self.diffuse_map),
            (TextureKind::Specular, &self.specular_map),
        ]
        .into_iter()
        .filter_map(|(kind, map)| {
            map.as_ref().map(|path| Texture {
                kind,
                path: base_dir.join(path),
            })
        })
        .collect()
    }
}

/// MTL file parser
pub struct MtlParser;

impl MtlParser {
    /// Parse MTL file contents into a map of material name -> MtlData
    ///
    /// Statements before the first `newmtl` and unknown statements are
    /// ignored.
    pub fn parse(contents: &str) -> Result<HashMap<String, MtlData>, MtlError> {
        let mut materials = HashMap::new();
        let mut current_material: Option<MtlData> = None;

        for (line_num, line) in contents.lines().enumerate() {
            let line = line.trim();

            // Skip empty lines and comments
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut tokens = line.split_whitespace();
            let Some(command) = tokens.next() else {
                continue;
            };

            if command == "newmtl" {
                if let Some(mat) = current_material.take() {
                    materials.insert(mat.name.clone(), mat);
                }
                let name = tokens
                    .next()
                    .ok_or_else(|| MtlError::new(line_num, "newmtl missing material name".to_string()))?
                    .to_string();
                current_material = Some(MtlData {
                    name,
                    ..Default::default()
                });
                continue;
            }

            let Some(mat) = current_material.as_mut() else {
                continue;
            };
            match command {
                "Ka" => mat.ambient = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Kd" => mat.diffuse = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Ks" => mat.specular = Self::parse_vec3(&mut tokens, line_num, command)?,
                "Ns" => mat.specular_exponent = Self::parse_f32(&mut tokens, line_num, command)?,
                "map_Kd" => mat.diffuse_map = Some(Self::parse_texture_path(&mut tokens, line_num, command)?),
                "map_Ks" => mat.specular_map = Some(Self::parse_texture_path(&mut tokens, line_num, command)?),
                _ => {}
            }
        }

        // Save final material
        if let Some(mat) = current_material {
            materials.insert(mat.name.clone(), mat);
        }

        Ok(materials)
    }

    /// Parse a Vec3 color from RGB tokens
    fn parse_vec3<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<Vec3, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let r = Self::parse_f32(tokens, line_num, command)?;
        let g = Self::parse_f32(tokens, line_num, command)?;
        let b = Self::parse_f32(tokens, line_num, command)?;
        Ok(Vec3::new(r, g, b))
    }

    /// Parse a single f32 value
    fn parse_f32<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<f32, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let token = tokens
            .next()
            .ok_or_else(|| MtlError::new(line_num, format!("{command} missing value")))?;
        token
            .parse::<f32>()
            .map_err(|_| MtlError::new(line_num, format!("{command} invalid float value '{token}'")))
    }

    /// Parse texture file path (may contain spaces, take rest of line)
    fn parse_texture_path<'a, I>(tokens: &mut I, line_num: usize, command: &str) -> Result<String, MtlError>
    where
        I: Iterator<Item = &'a str>,
    {
        let path: Vec<&str> = tokens.collect();
        if path.is_empty() {
            return Err(MtlError::new(line_num, format!("{command} missing texture path")));
        }
        Ok(path.join(" "))
    }
}
