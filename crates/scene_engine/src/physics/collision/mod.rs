//! Swept-sphere collision against static triangle geometry
//!
//! A moving sphere is swept along its requested step and tested against
//! every triangle of the scene. The earliest contact stops the sphere just
//! short of the surface and the rest of the motion is redirected along it.
//!
//! # Module Organization
//!
//! - [`primitives`] - Point-in-triangle, sphere and cylinder ray sweeps, distances
//! - [`triangle`] - Triangles with their precomputed supporting plane
//! - [`sweep`] - Sphere sweep against a single triangle (face, edge, vertex)
//! - [`resolver`] - Scene-wide earliest contact and recursive sliding
//!
//! # Key Types
//!
//! - [`Triangle`] - Static geometry element, built once at load time
//! - [`Contact`] - Where and how a sweep first touches a triangle
//! - [`CollisionResolver`] - Turns a requested step into a safe one

pub mod primitives;
pub mod triangle;
pub mod sweep;
pub mod resolver;

// Re-export commonly used types
pub use triangle::Triangle;
pub use sweep::{sweep_sphere_triangle, Contact, ContactKind, SweepOutcome};
pub use resolver::{CollisionResolver, StepResolution};
