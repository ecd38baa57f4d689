//! Point lights attached to models and terrains

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

/// Point light with Phong color terms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Light position in world space
    pub position: Vec3,
    /// Ambient color
    pub ambient: Vec3,
    /// Diffuse color
    pub diffuse: Vec3,
    /// Specular color
    pub specular: Vec3,
}

impl Default for Light {
    /// White sun light used when a scene brings none of its own
    fn default() -> Self {
        Self::white(Vec3::new(0.0, 0.0, 10.0))
    }
}

impl Light {
    /// Create a light with white ambient, diffuse and specular terms
    pub fn white(position: Vec3) -> Self {
        let white = Vec3::new(1.0, 1.0, 1.0);
        Self {
            position,
            ambient: white,
            diffuse: white,
            specular: white,
        }
    }
}
