//! OBJ file loader for 3D models
//!
//! Reads positions, texture coordinates, normals and polygonal faces.
//! Polygons are fan-triangulated and emitted as flat triangle lists, one
//! list per object, group or material change.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;

use crate::foundation::math::{Vec2, Vec3};
use crate::scene::Vertex;

/// OBJ loading errors
#[derive(Error, Debug)]
pub enum ObjError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed statement
    #[error("Parse error on line {line}: {message}")]
    Parse {
        /// One-based line number
        line: usize,
        /// What went wrong
        message: String,
    },
    /// Well-formed file without usable geometry
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// One mesh of an OBJ file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjMesh {
    /// Object or group name
    pub name: String,
    /// Material selected with `usemtl`
    pub material: Option<String>,
    /// Triangle list: every three vertices form one triangle
    pub vertices: Vec<Vertex>,
}

impl ObjMesh {
    fn named(name: String, material: Option<String>) -> Self {
        Self {
            name,
            material,
            vertices: Vec::new(),
        }
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

/// Parsed OBJ file
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjModel {
    /// Meshes in file order, empty ones dropped
    pub meshes: Vec<ObjMesh>,
    /// Material libraries named by `mtllib`, relative to the OBJ file
    pub material_libraries: Vec<String>,
}

/// Index triple of one face corner, already resolved to zero-based indices
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    tex_coord: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct ObjParser {
    positions: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
    normals: Vec<Vec3>,
    meshes: Vec<ObjMesh>,
    current: ObjMesh,
    material_libraries: Vec<String>,
}

/// Wavefront OBJ loader
pub struct ObjLoader;

impl ObjLoader {
    /// Load an OBJ file
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<ObjModel, ObjError> {
        let file = File::open(path)?;
        Self::parse(BufReader::new(file))
    }

    /// Parse OBJ data from any buffered reader
    pub fn parse<R: BufRead>(reader: R) -> Result<ObjModel, ObjError> {
        let mut parser = ObjParser::default();
        for (line_num, line) in reader.lines().enumerate() {
            parser.parse_line(line_num + 1, &line?)?;
        }
        parser.finish()
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> ObjError {
    ObjError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_floats<'a, const N: usize>(
    tokens: impl Iterator<Item = &'a str>,
    line: usize,
    command: &str,
    required: usize,
) -> Result<[f32; N], ObjError> {
    let mut values = [0.0; N];
    let mut count = 0;
    for (value, token) in values.iter_mut().zip(tokens) {
        *value = token
            .parse()
            .map_err(|_| parse_error(line, format!("{command} has invalid number '{token}'")))?;
        count += 1;
    }
    if count < required {
        return Err(parse_error(line, format!("{command} needs at least {required} values, found {count}")));
    }
    Ok(values)
}

/// Resolve a one-based (or negative, relative) OBJ index against `len`
fn resolve_index(token: &str, len: usize, line: usize, kind: &str) -> Result<usize, ObjError> {
    let index: i64 = token
        .parse()
        .map_err(|_| parse_error(line, format!("invalid {kind} index '{token}'")))?;
    let resolved = match index {
        0 => return Err(parse_error(line, format!("{kind} index 0 is not allowed"))),
        i if i > 0 => usize::try_from(i - 1).ok(),
        i => usize::try_from(i.unsigned_abs()).ok().and_then(|back| len.checked_sub(back)),
    };
    resolved
        .filter(|&resolved| resolved < len)
        .ok_or_else(|| ObjError::InvalidFormat(format!("line {line}: {kind} index {index} out of bounds ({len} defined)")))
}

impl ObjParser {
    fn parse_line(&mut self, line_num: usize, line: &str) -> Result<(), ObjError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let mut tokens = line.split_whitespace();
        let Some(command) = tokens.next() else {
            return Ok(());
        };

        match command {
            "v" => {
                let [x, y, z] = parse_floats(tokens, line_num, command, 3)?;
                self.positions.push(Vec3::new(x, y, z));
            }
            "vt" => {
                let [u, v] = parse_floats(tokens, line_num, command, 1)?;
                self.tex_coords.push(Vec2::new(u, v));
            }
            "vn" => {
                let [x, y, z] = parse_floats(tokens, line_num, command, 3)?;
                self.normals.push(Vec3::new(x, y, z));
            }
            "f" => self.parse_face(tokens, line_num)?,
            "o" | "g" => {
                let name = tokens.collect::<Vec<_>>().join(" ");
                self.start_mesh(name, self.current.material.clone());
            }
            "usemtl" => {
                let material = tokens.next().map(str::to_string);
                if self.current.material != material {
                    self.start_mesh(self.current.name.clone(), material);
                }
            }
            "mtllib" => {
                let library = tokens.collect::<Vec<_>>().join(" ");
                if !library.is_empty() {
                    self.material_libraries.push(library);
                }
            }
            // Smoothing groups, free-form geometry and the rest carry nothing we use
            _ => {}
        }
        Ok(())
    }

    /// Close the current mesh and start a new one; an empty current mesh is
    /// simply renamed
    fn start_mesh(&mut self, name: String, material: Option<String>) {
        let next = ObjMesh::named(name, material);
        let finished = std::mem::replace(&mut self.current, next);
        if !finished.vertices.is_empty() {
            self.meshes.push(finished);
        }
    }

    fn parse_corner(&self, token: &str, line: usize) -> Result<Corner, ObjError> {
        let mut parts = token.split('/');
        let position = parts
            .next()
            .filter(|part| !part.is_empty())
            .ok_or_else(|| parse_error(line, format!("face corner '{token}' has no position index")))?;
        let tex_coord = parts.next().filter(|part| !part.is_empty());
        let normal = parts.next().filter(|part| !part.is_empty());

        Ok(Corner {
            position: resolve_index(position, self.positions.len(), line, "position")?,
            tex_coord: tex_coord
                .map(|part| resolve_index(part, self.tex_coords.len(), line, "texture coordinate"))
                .transpose()?,
            normal: normal
                .map(|part| resolve_index(part, self.normals.len(), line, "normal"))
                .transpose()?,
        })
    }

    fn parse_face<'a>(&mut self, tokens: impl Iterator<Item = &'a str>, line: usize) -> Result<(), ObjError> {
        let corners = tokens
            .map(|token| self.parse_corner(token, line))
            .collect::<Result<Vec<_>, _>>()?;
        if corners.len() < 3 {
            log::warn!("Skipping face with {} vertices on line {}", corners.len(), line);
            return Ok(());
        }

        // Fan triangulation around the first corner
        for i in 1..corners.len() - 1 {
            let triangle = [corners[0], corners[i], corners[i + 1]];
            let positions = triangle.map(|corner| self.positions[corner.position]);
            let face_normal = (positions[1] - positions[0])
                .cross(&(positions[2] - positions[0]))
                .try_normalize(0.0)
                .unwrap_or_else(Vec3::zeros);

            for (corner, position) in triangle.iter().zip(positions) {
                self.current.vertices.push(Vertex {
                    position,
                    normal: corner.normal.map_or(face_normal, |index| self.normals[index]),
                    tex_coords: corner.tex_coord.map_or_else(Vec2::zeros, |index| self.tex_coords[index]),
                });
            }
        }
        Ok(())
    }

    fn finish(mut self) -> Result<ObjModel, ObjError> {
        self.start_mesh(String::new(), None);
        if self.meshes.is_empty() {
            return Err(ObjError::InvalidFormat("No faces found in OBJ file".to_string()));
        }
        Ok(ObjModel {
            meshes: self.meshes,
            material_libraries: self.material_libraries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn parse(contents: &str) -> Result<ObjModel, ObjError> {
        ObjLoader::parse(contents.as_bytes())
    }

    #[test]
    fn test_single_triangle() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert_eq!(model.meshes.len(), 1);
        let mesh = &model.meshes[0];
        assert_eq!(mesh.triangle_count(), 1);
        assert_relative_eq!(mesh.vertices[1].position, Vec3::new(1.0, 0.0, 0.0));
        // No normals in the file: the face normal is used
        assert_relative_eq!(mesh.vertices[0].normal, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_quad_is_fan_triangulated() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
        let mesh = &model.meshes[0];
        assert_eq!(mesh.triangle_count(), 2);
        let positions: Vec<Vec3> = mesh.vertices.iter().map(|v| v.position).collect();
        assert_eq!(positions[3], Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(positions[4], Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(positions[5], Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_corner_formats_and_negative_indices() {
        let contents = "\
v 0 0 0
v 1 0 0
v 0 1 0
vt 0.5 0.25
vn 0 0 -1
f 1/1/1 2//1 -1/-1
";
        let model = parse(contents).unwrap();
        let vertices = &model.meshes[0].vertices;
        assert_relative_eq!(vertices[0].tex_coords, Vec2::new(0.5, 0.25));
        assert_relative_eq!(vertices[0].normal, Vec3::new(0.0, 0.0, -1.0));
        assert_relative_eq!(vertices[1].tex_coords, Vec2::zeros());
        assert_relative_eq!(vertices[2].position, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(vertices[2].tex_coords, Vec2::new(0.5, 0.25));
    }

    #[test]
    fn test_objects_groups_and_materials_split_meshes() {
        let contents = "\
mtllib scene.mtl
v 0 0 0
v 1 0 0
v 0 1 0
o floor
usemtl grass
f 1 2 3
usemtl stone
f 1 3 2
g wall
f 1 2 3
";
        let model = parse(contents).unwrap();
        assert_eq!(model.material_libraries, vec!["scene.mtl".to_string()]);
        let summary: Vec<(&str, Option<&str>)> = model
            .meshes
            .iter()
            .map(|mesh| (mesh.name.as_str(), mesh.material.as_deref()))
            .collect();
        assert_eq!(
            summary,
            vec![("floor", Some("grass")), ("floor", Some("stone")), ("wall", Some("stone"))]
        );
    }

    #[test]
    fn test_short_face_is_skipped() {
        let model = parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2\nf 1 2 3\n").unwrap();
        assert_eq!(model.meshes[0].triangle_count(), 1);
    }

    #[test]
    fn test_errors() {
        assert!(matches!(parse("v 0 0\n"), Err(ObjError::Parse { line: 1, .. })));
        assert!(matches!(parse("v 0 0 0\nv 1 x 0\n"), Err(ObjError::Parse { line: 2, .. })));
        assert!(matches!(parse("v 0 0 0\nf 1 2 3\n"), Err(ObjError::InvalidFormat(_))));
        assert!(matches!(parse("v 0 0 0\nf 0 1 1\n"), Err(ObjError::Parse { .. })));
        assert!(matches!(parse("v 0 0 0\nv 1 0 0\n"), Err(ObjError::InvalidFormat(_))));
    }
}
