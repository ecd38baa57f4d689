//! Scene-wide swept-sphere resolution with surface sliding
//!
//! The resolver moves a sphere through static geometry: it finds the
//! earliest contact along the requested step, advances the sphere up to it,
//! and redirects the remaining motion along the contact plane. The
//! redirected motion is resolved again, so the sphere keeps sliding along
//! whatever it touches next until the motion is used up or the recursion
//! limit is reached.

use crate::config::CollisionConfig;
use crate::foundation::math::Vec3;
use crate::scene::StaticGeometry;
use super::primitives::is_zero;
use super::sweep::{sweep_sphere_triangle, Contact};

/// Corrected motion for one requested step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResolution {
    /// Whether any contact was found along the requested step
    pub collided: bool,
    /// Displacement that is safe to apply to the sphere center
    pub step: Vec3,
    /// First contact along the requested step
    pub contact: Option<Contact>,
    /// Whether sliding was cut short by the recursion limit
    pub exhausted: bool,
}

impl StepResolution {
    fn free(step: Vec3) -> Self {
        Self {
            collided: false,
            step,
            contact: None,
            exhausted: false,
        }
    }

    fn exhausted() -> Self {
        Self {
            collided: false,
            step: Vec3::zeros(),
            contact: None,
            exhausted: true,
        }
    }
}

/// Swept-sphere collision resolver
///
/// Holds only the sphere and tuning parameters; geometry is passed to every
/// query, so one resolver can serve any number of scenes and callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResolver {
    radius: f32,
    max_recursion_depth: u32,
    standoff: f32,
}

impl Default for CollisionResolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}

impl CollisionResolver {
    /// Default sphere radius
    pub const DEFAULT_RADIUS: f32 = 1.0;
    /// Default number of nested slide resolutions
    pub const DEFAULT_MAX_RECURSION_DEPTH: u32 = 5;
    /// Default separation kept between the sphere and a touched surface
    pub const DEFAULT_STANDOFF: f32 = 1e-5;

    /// Create a resolver for a sphere of `radius` with default tuning
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            max_recursion_depth: Self::DEFAULT_MAX_RECURSION_DEPTH,
            standoff: Self::DEFAULT_STANDOFF,
        }
    }

    /// Create a resolver from configuration
    pub fn from_config(config: &CollisionConfig) -> Self {
        Self {
            radius: config.sphere_radius,
            max_recursion_depth: config.max_recursion_depth,
            standoff: config.standoff,
        }
    }

    /// Set the recursion limit
    pub fn with_max_recursion_depth(mut self, depth: u32) -> Self {
        self.max_recursion_depth = depth;
        self
    }

    /// Set the standoff distance
    pub fn with_standoff(mut self, standoff: f32) -> Self {
        self.standoff = standoff;
        self
    }

    /// Sphere radius
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Recursion limit
    pub fn max_recursion_depth(&self) -> u32 {
        self.max_recursion_depth
    }

    /// Earliest contact of the sphere at `position` moving by `step`
    ///
    /// Every triangle is tested in scan order; a later contact only replaces
    /// the current one when it is strictly closer.
    pub fn first_contact<G>(&self, geometry: &G, position: Vec3, step: Vec3) -> Option<Contact>
    where
        G: StaticGeometry + ?Sized,
    {
        let mut nearest: Option<Contact> = None;
        for triangle in geometry.triangles() {
            let Some(contact) = sweep_sphere_triangle(triangle, position, self.radius, step).contact() else {
                continue;
            };
            if nearest.map_or(true, |current| contact.distance < current.distance) {
                nearest = Some(contact);
            }
        }
        nearest
    }

    /// Resolve the motion of the sphere at `position` by `step`
    ///
    /// The returned step can be added to the position as is. Without a
    /// contact it equals the requested step.
    pub fn resolve<G>(&self, geometry: &G, position: Vec3, step: Vec3) -> StepResolution
    where
        G: StaticGeometry + ?Sized,
    {
        self.resolve_at_depth(geometry, position, step, 0)
    }

    fn resolve_at_depth<G>(&self, geometry: &G, position: Vec3, step: Vec3, depth: u32) -> StepResolution
    where
        G: StaticGeometry + ?Sized,
    {
        if is_zero(step.norm()) {
            return StepResolution::free(Vec3::zeros());
        }
        if depth > self.max_recursion_depth {
            log::debug!(
                "Collision resolution exceeded {} slides at {:?}, dropping remaining motion",
                self.max_recursion_depth, position
            );
            return StepResolution::exhausted();
        }

        let Some(contact) = self.first_contact(geometry, position, step) else {
            return StepResolution::free(step);
        };
        log::trace!(
            "Depth {} {:?} contact at {:.4} of step, normal {:?}",
            depth, contact.kind, contact.distance, contact.normal
        );

        let step_before = contact.point - position;
        let step_after = step - step_before;
        let step_tangent = step_after - contact.normal * step_after.dot(&contact.normal);
        let step_up = contact.normal * self.standoff;
        let step_resolution = step_tangent + step_up;

        let slide = self.resolve_at_depth(geometry, position + step_before, step_resolution, depth + 1);

        StepResolution {
            collided: true,
            step: step_before + slide.step,
            contact: Some(contact),
            exhausted: slide.exhausted,
        }
    }
}
