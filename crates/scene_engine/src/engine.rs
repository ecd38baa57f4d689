//! Core engine implementation
//!
//! The engine owns the static terrain, the camera and the collision
//! resolver. Window events are fed in through [`Engine::handle_event`];
//! [`Engine::tick`] advances the camera by one frame, letting the resolver
//! cut the proposed step short wherever it would enter the terrain.

use std::sync::Arc;

use thiserror::Error;

use crate::{
    assets::{AssetError, TerrainLoader},
    camera::Camera,
    config::{ConfigError, ViewerConfig},
    foundation::{math::Vec3, time::FrameStats},
    input::{KeyAction, KeyCode, KeyCommand, KeyboardHandler, MouseHandler},
    physics::collision::{CollisionResolver, Contact},
    scene::{StaticGeometry, Terrain},
};

/// Number of frames averaged for FPS reporting
pub const FRAME_HISTORY: usize = 64;

/// Window and input events the engine reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AppEvent {
    /// Keyboard key changed state
    Key {
        /// Key
        key: KeyCode,
        /// What happened to it
        action: KeyAction,
    },
    /// Cursor moved to an absolute window position
    CursorMoved {
        /// Horizontal position
        x: f64,
        /// Vertical position
        y: f64,
    },
    /// Window minimized; simulation pauses
    Minimized,
    /// Window restored; simulation resumes
    Restored,
    /// Window close requested
    CloseRequested,
}

/// Outcome of one engine tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Camera position after the tick
    pub position: Vec3,
    /// Displacement actually applied
    pub step: Vec3,
    /// Whether the proposed step touched the terrain
    pub collided: bool,
    /// First contact along the proposed step
    pub contact: Option<Contact>,
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Terrain could not be loaded
    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),
}

/// Main engine struct
pub struct Engine {
    terrain: Arc<Terrain>,
    camera: Camera,
    resolver: CollisionResolver,
    collision_enabled: bool,
    keyboard: KeyboardHandler,
    mouse: MouseHandler,
    frame_stats: FrameStats<FRAME_HISTORY>,
    elapsed: f64,
    paused: bool,
    running: bool,
}

impl Engine {
    /// Create an engine over an already loaded terrain
    pub fn new(config: &ViewerConfig, terrain: Arc<Terrain>) -> Result<Self, EngineError> {
        config.validate()?;
        log::info!(
            "Initializing engine: {} triangles, sphere radius {}, collision {}",
            terrain.triangle_count(),
            config.collision.sphere_radius,
            if config.collision.enabled { "enabled" } else { "disabled" }
        );

        Ok(Self {
            terrain,
            camera: Camera::from_config(&config.camera),
            resolver: CollisionResolver::from_config(&config.collision),
            collision_enabled: config.collision.enabled,
            keyboard: KeyboardHandler::new(&config.input.bindings),
            mouse: MouseHandler::new(),
            frame_stats: FrameStats::new(),
            elapsed: 0.0,
            paused: false,
            running: true,
        })
    }

    /// Create an engine, loading the terrain the configuration names
    pub fn from_config(config: &ViewerConfig) -> Result<Self, EngineError> {
        let terrain = TerrainLoader::load(&config.scene)?;
        Self::new(config, Arc::new(terrain))
    }

    /// Handle an application event
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key { key, action } => match self.keyboard.process_key(key, action) {
                Some(KeyCommand::SetDirection(direction, active)) => {
                    self.camera.set_direction(direction, active);
                }
                Some(KeyCommand::Close) => self.quit(),
                None => {}
            },
            AppEvent::CursorMoved { x, y } => {
                if let Some((dx, dy)) = self.mouse.process_cursor(x, y) {
                    self.camera.swipe(dx, dy);
                }
            }
            AppEvent::Minimized => {
                log::debug!("Window minimized, pausing simulation");
                self.paused = true;
            }
            AppEvent::Restored => {
                log::debug!("Window restored, resuming simulation");
                self.paused = false;
                self.mouse.reset();
            }
            AppEvent::CloseRequested => self.quit(),
        }
    }

    /// Advance the simulation by `dt` seconds
    ///
    /// While paused the camera stays put and no time is recorded.
    pub fn tick(&mut self, dt: f32) -> TickReport {
        if self.paused {
            return TickReport {
                position: self.camera.position,
                step: Vec3::zeros(),
                collided: false,
                contact: None,
            };
        }

        let proposed = self.camera.proposed_step(dt);
        let (step, collided, contact) = if self.collision_enabled {
            let resolution = self.resolver.resolve(self.terrain.as_ref(), self.camera.position, proposed);
            (resolution.step, resolution.collided, resolution.contact)
        } else {
            (proposed, false, None)
        };
        self.camera.translate(step);

        self.frame_stats.add_frame_time(f64::from(dt));
        self.elapsed += f64::from(dt);

        TickReport {
            position: self.camera.position,
            step,
            collided,
            contact,
        }
    }

    /// Request engine shutdown
    pub fn quit(&mut self) {
        if self.running {
            log::info!("Engine shutdown requested");
        }
        self.running = false;
    }

    /// Whether the engine should keep running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether the simulation is paused
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Simulated seconds so far
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Get the camera
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Get mutable access to the camera
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Get the terrain
    pub fn terrain(&self) -> &Arc<Terrain> {
        &self.terrain
    }

    /// Get the collision resolver
    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Recent frame times
    pub fn frame_stats(&self) -> &FrameStats<FRAME_HISTORY> {
        &self.frame_stats
    }

    /// Turn collision handling on or off
    pub fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }
}
