//! # Free-fly camera
//!
//! First-person camera driven by yaw and pitch angles. The camera is the
//! moving sphere of the collision system: every frame it proposes a step
//! from its active movement directions, and the engine decides how much of
//! that step is actually taken.
//!
//! ## Orientation
//! Yaw rotates around the y axis and pitch is the angle from the +y axis,
//! so a pitch of π/2 looks along the horizon:
//!
//! - `look_at = (cos yaw · sin pitch, cos pitch, sin yaw · sin pitch)`
//! - `view_up = (-cos yaw · cos pitch, sin pitch, -sin yaw · cos pitch)`

use serde::{Deserialize, Serialize};

use crate::config::CameraConfig;
use crate::foundation::math::{constants, utils, Mat4, Point3, Vec3};

/// Movement direction relative to the camera orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// World up (+y)
    Up,
    /// World down (-y)
    Down,
    /// Strafe left
    Left,
    /// Strafe right
    Right,
    /// Along the view direction
    Forward,
    /// Against the view direction
    Backward,
}

impl Direction {
    /// Every direction
    pub const ALL: [Self; 6] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::Forward,
        Self::Backward,
    ];

    /// Flag of this direction in a [`MoveDirections`] set
    pub fn flag(self) -> MoveDirections {
        match self {
            Self::Up => MoveDirections::UP,
            Self::Down => MoveDirections::DOWN,
            Self::Left => MoveDirections::LEFT,
            Self::Right => MoveDirections::RIGHT,
            Self::Forward => MoveDirections::FORWARD,
            Self::Backward => MoveDirections::BACKWARD,
        }
    }
}

bitflags::bitflags! {
    /// Set of currently active movement directions
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveDirections: u8 {
        /// World up
        const UP = 1 << 0;
        /// World down
        const DOWN = 1 << 1;
        /// Strafe left
        const LEFT = 1 << 2;
        /// Strafe right
        const RIGHT = 1 << 3;
        /// Along the view direction
        const FORWARD = 1 << 4;
        /// Against the view direction
        const BACKWARD = 1 << 5;
    }
}

/// Free-fly perspective camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov: f32,
    /// Distance to the near clipping plane
    pub clip_near: f32,
    /// Distance to the far clipping plane
    pub clip_far: f32,
    /// Position in world space; also the center of the collision sphere
    pub position: Vec3,
    /// Movement speed in units per second
    pub speed: f32,
    /// Radians of rotation per unit of cursor motion
    pub sensitivity: f32,
    yaw: f32,
    pitch: f32,
    look_at: Vec3,
    view_up: Vec3,
    active: MoveDirections,
    heading: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera {
    /// Create a camera
    pub fn new(
        fov: f32,
        clip_near: f32,
        clip_far: f32,
        yaw: f32,
        pitch: f32,
        position: Vec3,
        speed: f32,
        sensitivity: f32,
    ) -> Self {
        let mut camera = Self {
            fov,
            clip_near,
            clip_far,
            position,
            speed,
            sensitivity,
            yaw,
            pitch,
            look_at: Vec3::zeros(),
            view_up: Vec3::zeros(),
            active: MoveDirections::empty(),
            heading: Vec3::zeros(),
        };
        camera.update_orientation();
        camera
    }

    /// Create a camera from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        Self::new(
            config.fov,
            config.clip_near,
            config.clip_far,
            config.yaw,
            config.pitch,
            config.position,
            config.speed,
            config.sensitivity,
        )
    }

    /// Yaw angle in `[0, 2π)`
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch angle in `[0, π]`
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Unit up vector of the view
    pub fn view_up(&self) -> Vec3 {
        self.view_up
    }

    /// Currently active movement directions
    pub fn active_directions(&self) -> MoveDirections {
        self.active
    }

    /// Normalized sum of the active direction vectors, zero when idle or
    /// when the active directions cancel out
    pub fn heading(&self) -> Vec3 {
        self.heading
    }

    /// World-space vector of a single movement direction
    pub fn direction_vector(&self, direction: Direction) -> Vec3 {
        match direction {
            Direction::Up => Vec3::y(),
            Direction::Down => -Vec3::y(),
            Direction::Left => self.view_up.cross(&self.look_at),
            Direction::Right => self.look_at.cross(&self.view_up),
            Direction::Forward => self.look_at,
            Direction::Backward => -self.look_at,
        }
    }

    /// Activate or deactivate a movement direction
    pub fn set_direction(&mut self, direction: Direction, active: bool) {
        self.active.set(direction.flag(), active);
        self.update_heading();
    }

    /// Stop all movement
    pub fn clear_directions(&mut self) {
        self.active = MoveDirections::empty();
        self.heading = Vec3::zeros();
    }

    /// Rotate the view by a cursor displacement
    ///
    /// Yaw wraps around into `[0, 2π)`; pitch is clamped to `[0, π]` so the
    /// view never flips over the poles.
    pub fn swipe(&mut self, dx: f32, dy: f32) {
        let yaw = utils::wrap_angle(self.yaw + self.sensitivity * dx);
        self.yaw = if yaw >= constants::TAU { 0.0 } else { yaw };
        self.pitch = (self.pitch + self.sensitivity * dy).clamp(0.0, constants::PI);
        self.update_orientation();
    }

    /// Displacement the camera wants to make over `dt` seconds
    pub fn proposed_step(&self, dt: f32) -> Vec3 {
        self.heading * (dt * self.speed)
    }

    /// Move the camera by `step`
    pub fn translate(&mut self, step: Vec3) {
        self.position += step;
    }

    /// Right-handed view matrix
    pub fn view_matrix(&self) -> Mat4 {
        let eye = Point3::from(self.position);
        let target = Point3::from(self.position + self.look_at);
        Mat4::look_at_rh(&eye, &target, &self.view_up)
    }

    /// Perspective projection matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::new_perspective(aspect, self.fov, self.clip_near, self.clip_far)
    }

    fn update_orientation(&mut self) {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.look_at = Vec3::new(cos_yaw * sin_pitch, cos_pitch, sin_yaw * sin_pitch);
        self.view_up = Vec3::new(-cos_yaw * cos_pitch, sin_pitch, -sin_yaw * cos_pitch);
        self.update_heading();
    }

    fn update_heading(&mut self) {
        let sum: Vec3 = Direction::ALL
            .iter()
            .filter(|direction| self.active.contains(direction.flag()))
            .map(|&direction| self.direction_vector(direction))
            .sum();
        self.heading = sum.try_normalize(0.0).unwrap_or_else(Vec3::zeros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(
            constants::HALF_PI,
            0.1,
            100.0,
            0.0,
            constants::HALF_PI,
            Vec3::new(2.0, 2.0, 2.0),
            2.5,
            0.001,
        )
    }

    #[test]
    fn test_horizon_orientation() {
        let camera = camera();
        assert_relative_eq!(camera.look_at(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.view_up(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
        assert_relative_eq!(camera.direction_vector(Direction::Left), Vec3::new(0.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(camera.direction_vector(Direction::Right), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-6);
    }

    #[test]
    fn test_idle_camera_proposes_nothing() {
        assert_eq!(camera().proposed_step(0.5), Vec3::zeros());
    }

    #[test]
    fn test_forward_step() {
        let mut camera = camera();
        camera.set_direction(Direction::Forward, true);
        assert_relative_eq!(camera.proposed_step(0.5), Vec3::new(1.25, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_combined_directions_are_normalized() {
        let mut camera = camera();
        camera.set_direction(Direction::Forward, true);
        camera.set_direction(Direction::Left, true);
        let expected = Vec3::new(1.0, 0.0, -1.0) / 2.0_f32.sqrt();
        assert_relative_eq!(camera.heading(), expected, epsilon = 1e-6);
        assert!(camera.active_directions().contains(MoveDirections::FORWARD | MoveDirections::LEFT));

        camera.set_direction(Direction::Left, false);
        assert_relative_eq!(camera.heading(), Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut camera = camera();
        camera.set_direction(Direction::Up, true);
        camera.set_direction(Direction::Down, true);
        assert_eq!(camera.heading(), Vec3::zeros());
    }

    #[test]
    fn test_swipe_wraps_yaw() {
        let mut camera = camera();
        camera.swipe(-1000.0, 0.0);
        assert_relative_eq!(camera.yaw(), constants::TAU - 1.0, epsilon = 1e-5);
        camera.swipe(2000.0, 0.0);
        assert_relative_eq!(camera.yaw(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_swipe_clamps_pitch() {
        let mut camera = camera();
        camera.swipe(0.0, 1e6);
        assert_eq!(camera.pitch(), constants::PI);
        camera.swipe(0.0, -1e6);
        assert_eq!(camera.pitch(), 0.0);
        assert_relative_eq!(camera.look_at(), Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_swipe_turns_heading() {
        let mut camera = camera();
        camera.set_direction(Direction::Forward, true);
        camera.swipe(constants::HALF_PI / camera.sensitivity, 0.0);
        assert_relative_eq!(camera.heading(), Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-4);
    }

    #[test]
    fn test_view_matrix_maps_eye_to_origin() {
        let camera = camera();
        let eye = camera.view_matrix().transform_point(&Point3::from(camera.position));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-5);
    }
}
