//! Walkthrough viewer configuration
//!
//! Every section and field has a default, so a file only needs to name
//! what it changes.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Vec3};
use crate::input::{KeyBinding, KeyCode};
use crate::scene::Light;
use super::{Config, ConfigError};

/// Complete viewer configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Camera placement and optics
    pub camera: CameraConfig,
    /// Collision sphere and resolver tuning
    pub collision: CollisionConfig,
    /// Models making up the scene
    pub scene: SceneConfig,
    /// Key bindings
    pub input: InputConfig,
    /// Fixed-step simulation settings
    pub simulation: SimulationConfig,
}

impl Config for ViewerConfig {}

impl ViewerConfig {
    /// Reject settings the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.clip_near > 0.0 && camera.clip_near < camera.clip_far) {
            return Err(ConfigError::Invalid {
                field: "camera.clip_near",
                reason: format!(
                    "clip planes must satisfy 0 < near < far, got near {} and far {}",
                    camera.clip_near, camera.clip_far
                ),
            });
        }
        if !(camera.fov > 0.0 && camera.fov < constants::PI) {
            return Err(ConfigError::Invalid {
                field: "camera.fov",
                reason: format!("field of view must lie in (0, π), got {}", camera.fov),
            });
        }
        if !(self.collision.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid {
                field: "collision.sphere_radius",
                reason: format!("must be positive, got {}", self.collision.sphere_radius),
            });
        }
        if self.collision.standoff < 0.0 {
            return Err(ConfigError::Invalid {
                field: "collision.standoff",
                reason: format!("must not be negative, got {}", self.collision.standoff),
            });
        }
        if !(self.simulation.tick_length > 0.0) {
            return Err(ConfigError::Invalid {
                field: "simulation.tick_length",
                reason: format!("must be positive, got {}", self.simulation.tick_length),
            });
        }
        if let Some(entry) = self.scene.models.iter().find(|entry| !(entry.scale > 0.0)) {
            return Err(ConfigError::Invalid {
                field: "scene.models.scale",
                reason: format!("{} has non-positive scale {}", entry.path.display(), entry.scale),
            });
        }
        if self.input.bindings.iter().any(|binding| binding.key == KeyCode::Escape) {
            return Err(ConfigError::Invalid {
                field: "input.bindings",
                reason: "Escape is reserved for closing the viewer".to_string(),
            });
        }
        Ok(())
    }
}

/// Camera placement and optics; angles are in radians
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view
    pub fov: f32,
    /// Near clipping plane distance
    pub clip_near: f32,
    /// Far clipping plane distance
    pub clip_far: f32,
    /// Initial yaw around the y axis
    pub yaw: f32,
    /// Initial pitch, measured from the +y axis
    pub pitch: f32,
    /// Initial position
    pub position: Vec3,
    /// Movement speed in units per second
    pub speed: f32,
    /// Radians of rotation per unit of cursor motion
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: constants::HALF_PI,
            clip_near: 0.1,
            clip_far: 100.0,
            yaw: 0.0,
            pitch: constants::HALF_PI,
            position: Vec3::new(2.0, 2.0, 2.0),
            speed: 2.5,
            sensitivity: 0.001,
        }
    }
}

/// Collision sphere and resolver tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Whether camera motion is checked against the scene at all
    pub enabled: bool,
    /// Radius of the sphere around the camera
    pub sphere_radius: f32,
    /// Nested slide resolutions allowed per step
    ///
    /// 0 stops the sphere at its first contact without sliding.
    pub max_recursion_depth: u32,
    /// Separation kept between the sphere and touched surfaces
    pub standoff: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sphere_radius: 1.0,
            max_recursion_depth: 5,
            standoff: 1e-5,
        }
    }
}

/// A model file placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelEntry {
    /// Path to a Wavefront OBJ file
    pub path: PathBuf,
    /// Translation applied to every vertex
    pub position: Vec3,
    /// Uniform scale applied before the translation
    pub scale: f32,
}

impl Default for ModelEntry {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            position: Vec3::zeros(),
            scale: 1.0,
        }
    }
}

/// Scene contents; an empty model list selects the built-in arena
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Models in load order
    pub models: Vec<ModelEntry>,
    /// Lights added on top of the ones the models bring
    pub lights: Vec<Light>,
}

/// Key bindings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Movement bindings; Escape always closes the viewer
    pub bindings: Vec<KeyBinding>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            bindings: KeyBinding::defaults(),
        }
    }
}

/// Input event replayed by the headless walkthrough
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScriptEvent {
    /// Key pressed
    Press(KeyCode),
    /// Key released
    Release(KeyCode),
    /// Cursor moved to an absolute window position
    Cursor {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
}

/// Scripted event and the simulation time it fires at
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedInput {
    /// Seconds since the start of the simulation
    pub at: f32,
    /// Event to deliver
    pub event: ScriptEvent,
}

impl ScriptedInput {
    /// Create a scripted event
    pub const fn new(at: f32, event: ScriptEvent) -> Self {
        Self { at, event }
    }
}

/// Fixed-step simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Length of one tick in seconds
    pub tick_length: f32,
    /// Number of ticks to run
    pub tick_count: u32,
    /// Seconds between position and FPS reports
    pub report_interval: f32,
    /// Input timeline, sorted by time when loaded
    pub script: Vec<ScriptedInput>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_length: 1.0 / 60.0,
            tick_count: 600,
            report_interval: 0.5,
            script: vec![
                ScriptedInput::new(0.0, ScriptEvent::Cursor { x: 0.0, y: 0.0 }),
                ScriptedInput::new(0.0, ScriptEvent::Press(KeyCode::W)),
                ScriptedInput::new(1.0, ScriptEvent::Cursor { x: 300.0, y: 0.0 }),
                ScriptedInput::new(2.0, ScriptEvent::Press(KeyCode::LeftControl)),
                ScriptedInput::new(4.0, ScriptEvent::Release(KeyCode::LeftControl)),
                ScriptedInput::new(6.0, ScriptEvent::Press(KeyCode::D)),
                ScriptedInput::new(9.0, ScriptEvent::Release(KeyCode::D)),
                ScriptedInput::new(9.0, ScriptEvent::Release(KeyCode::W)),
            ],
        }
    }
}

impl SimulationConfig {
    /// Script sorted by firing time, keeping file order for equal times
    pub fn sorted_script(&self) -> Vec<ScriptedInput> {
        let mut script = self.script.clone();
        script.sort_by(|a, b| a.at.total_cmp(&b.at));
        script
    }
}
