//! Free-fly camera.
//!
//! Orientation is kept as two spherical angles with the Y axis pointing up:
//! `yaw` is measured in the XZ plane from +Z towards +X, `pitch` is the angle
//! from +Y. The forward and right vectors are derived from them on every
//! [`FlyCamera::rotate`] and cached.

use std::f32::consts::PI;

use crate::math::{Mat4, Vec3};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::new(0.0, 1.0, 0.0);

/// Movement directions for [`FlyCamera::move_in`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// A first-person camera that moves in the horizontal plane and along world up.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyCamera {
    position: Vec3,
    forward: Vec3,
    right: Vec3,
    yaw: f32,
    pitch: f32,
    fov_y: f32,
    move_speed: f32,
    active: bool,
}

impl FlyCamera {
    /// Default movement speed in units per second.
    pub const DEFAULT_MOVE_SPEED: f32 = 5.0;
    /// Speed change per [`Self::speed_up`] / [`Self::speed_down`].
    pub const MOVE_SPEED_STEP: f32 = 2.0;
    pub const MIN_MOVE_SPEED: f32 = 1.0;
    pub const MAX_MOVE_SPEED: f32 = 9.0;
    /// Radians per pixel of mouse motion.
    pub const MOUSE_SENSITIVITY: f32 = 0.002;
    /// Radians of field of view per zoom unit.
    pub const ZOOM_SENSITIVITY: f32 = 0.02;
    /// 20 degrees.
    pub const MIN_PITCH: f32 = 0.349_065_8;
    /// 160 degrees.
    pub const MAX_PITCH: f32 = 2.792_526_8;
    pub const MIN_FOV_Y: f32 = PI / 12.0;
    pub const MAX_FOV_Y: f32 = PI / 4.0;

    /// A camera at the origin looking down -Z with a 45 degree vertical field
    /// of view. Starts inactive.
    pub fn new() -> Self {
        Self {
            position: Vec3::zeros(),
            forward: Vec3::new(0.0, 0.0, -1.0),
            right: Vec3::new(1.0, 0.0, 0.0),
            yaw: PI,
            pitch: PI / 2.0,
            fov_y: Self::MAX_FOV_Y,
            move_speed: Self::DEFAULT_MOVE_SPEED,
            active: false,
        }
    }

    /// Place the camera.
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.right.cross(&self.forward)
    }

    /// Vertical field of view in radians.
    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Set the vertical field of view. Not clamped.
    pub fn set_fov_y(&mut self, fov_y: f32) {
        self.fov_y = fov_y;
    }

    pub fn move_speed(&self) -> f32 {
        self.move_speed
    }

    /// Whether the camera currently follows input.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Flip the active flag and return the new value.
    pub fn toggle_active(&mut self) -> bool {
        self.active = !self.active;
        self.active
    }

    /// World-to-view transform.
    ///
    /// The rows of the rotation part are the right, up and backward axes, so
    /// the camera looks down -Z in view space.
    pub fn view_matrix(&self) -> Mat4 {
        let right = self.right;
        let up = self.up();
        let backward = -self.forward;
        let p = self.position;
        #[rustfmt::skip]
        let view = Mat4::new(
            right.x,    right.y,    right.z,    -right.dot(&p),
            up.x,       up.y,       up.z,       -up.dot(&p),
            backward.x, backward.y, backward.z, -backward.dot(&p),
            0.0,        0.0,        0.0,        1.0,
        );
        view
    }

    /// Move for `dt` seconds at the current speed.
    ///
    /// Forward, backward, left and right stay in the horizontal plane; up and
    /// down follow [`WORLD_UP`].
    pub fn move_in(&mut self, direction: MoveDirection, dt: f32) {
        let distance = dt * self.move_speed;
        let flat = |v: Vec3| (v - WORLD_UP * v.dot(&WORLD_UP)).normalize();
        match direction {
            MoveDirection::Forward => self.position += flat(self.forward) * distance,
            MoveDirection::Backward => self.position -= flat(self.forward) * distance,
            MoveDirection::Left => self.position -= flat(self.right) * distance,
            MoveDirection::Right => self.position += flat(self.right) * distance,
            MoveDirection::Up => self.position += WORLD_UP * distance,
            MoveDirection::Down => self.position -= WORLD_UP * distance,
        }
    }

    /// Turn by a mouse delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * Self::MOUSE_SENSITIVITY;
        self.pitch = (self.pitch + dy * Self::MOUSE_SENSITIVITY)
            .clamp(Self::MIN_PITCH, Self::MAX_PITCH);

        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.forward = Vec3::new(sin_pitch * sin_yaw, cos_pitch, sin_pitch * cos_yaw);
        self.right = self.forward.cross(&WORLD_UP).normalize();
    }

    /// Widen (positive) or narrow (negative) the field of view.
    pub fn zoom(&mut self, delta: f32) {
        self.fov_y =
            (self.fov_y + delta * Self::ZOOM_SENSITIVITY).clamp(Self::MIN_FOV_Y, Self::MAX_FOV_Y);
    }

    /// Jump to the narrowest field of view.
    pub fn zoom_in(&mut self) {
        self.fov_y = Self::MIN_FOV_Y;
    }

    /// Jump to the widest field of view.
    pub fn zoom_out(&mut self) {
        self.fov_y = Self::MAX_FOV_Y;
    }

    pub fn speed_up(&mut self) {
        self.move_speed = (self.move_speed + Self::MOVE_SPEED_STEP)
            .clamp(Self::MIN_MOVE_SPEED, Self::MAX_MOVE_SPEED);
    }

    pub fn speed_down(&mut self) {
        self.move_speed = (self.move_speed - Self::MOVE_SPEED_STEP)
            .clamp(Self::MIN_MOVE_SPEED, Self::MAX_MOVE_SPEED);
    }
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new()
    }
}
