//! # Scene Engine
//!
//! A first-person scene walkthrough engine: a free-fly camera moves through
//! static triangle geometry and never passes through it.
//!
//! ## Features
//!
//! - **Swept-sphere collision**: The camera is a sphere swept along each
//!   frame's motion against every triangle face, edge and corner
//! - **Surface sliding**: Motion blocked by a surface continues along it
//! - **Asset Loading**: Wavefront OBJ models with MTL materials
//! - **Configuration**: TOML or RON files with defaults for every setting
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ViewerConfig::default();
//!     let mut engine = Engine::from_config(&config)?;
//!
//!     engine.handle_event(AppEvent::Key { key: KeyCode::W, action: KeyAction::Press });
//!     let report = engine.tick(1.0 / 60.0);
//!     println!("camera at {:?}, collided: {}", report.position, report.collided);
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod config;
pub mod scene;
pub mod assets;
pub mod physics;
pub mod camera;
pub mod input;

mod engine;

pub use engine::{AppEvent, Engine, EngineError, TickReport, FRAME_HISTORY};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        AppEvent, Engine, EngineError, TickReport,
        foundation::{
            math::{Vec3, Mat4, Transform},
            time::{Timer, FrameStats},
        },
        config::{Config, ConfigError, ViewerConfig},
        scene::{Terrain, Model, Mesh, StaticGeometry},
        assets::{AssetError, TerrainLoader},
        physics::collision::{CollisionResolver, Contact, StepResolution, Triangle},
        camera::{Camera, Direction},
        input::{KeyAction, KeyCode},
    };
}
