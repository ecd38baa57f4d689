//! Physics module for collision detection and response
//!
//! Provides swept-sphere collision against static triangle geometry and the
//! sliding response used to move the camera through a scene.

pub mod collision;

pub use collision::{
    CollisionResolver,
    Contact,
    ContactKind,
    StepResolution,
    SweepOutcome,
    Triangle,
};
