//! Camera for 3D rendering
//!
//! Owns the pitch/yaw orientation state that the orbit controller mutates
//! through [`Camera::rotate`]. The renderer reads `position` and
//! [`Camera::rotation_matrix`] each frame.

use crate::core::types::{Mat4, Quat, Vec3};

/// Pitch is clamped to keep the orbit from flipping over the pole
const PITCH_LIMIT: f32 = 1.5;

/// Camera with position, pitch/yaw orientation, and projection parameters
pub struct Camera {
    /// World position
    pub position: Vec3,
    /// Rotation around the X axis in radians
    pitch: f32,
    /// Rotation around the Y axis in radians
    yaw: f32,
    /// Vertical field of view in radians
    pub fov_y: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Near clip plane
    pub near: f32,
    /// Far clip plane
    pub far: f32,
}

impl Camera {
    /// Create a new camera
    pub fn new(position: Vec3, fov_y_degrees: f32, aspect: f32) -> Self {
        Self {
            position,
            pitch: 0.0,
            yaw: 0.0,
            fov_y: fov_y_degrees.to_radians(),
            aspect,
            near: 0.01,
            far: 1000.0,
        }
    }

    /// Apply pitch and yaw deltas in radians.
    ///
    /// Pitch accumulates within `[-PITCH_LIMIT, PITCH_LIMIT]`; yaw is unbounded.
    pub fn rotate(&mut self, pitch_delta: f32, yaw_delta: f32) {
        self.pitch = (self.pitch + pitch_delta).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw += yaw_delta;
    }

    /// Get current pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get current yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Get orientation as a quaternion
    pub fn rotation(&self) -> Quat {
        Quat::from_euler(glam::EulerRot::YXZ, self.yaw, self.pitch, 0.0)
    }

    /// Get orientation as a rotation matrix
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation())
    }

    /// Get view matrix (world to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        let rotation_matrix = Mat4::from_quat(self.rotation().conjugate());
        let translation_matrix = Mat4::from_translation(-self.position);
        rotation_matrix * translation_matrix
    }

    /// Get projection matrix (camera to clip space)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Get forward direction (negative Z in camera space)
    pub fn forward(&self) -> Vec3 {
        self.rotation() * -Vec3::Z
    }

    /// Get right direction (positive X in camera space)
    pub fn right(&self) -> Vec3 {
        self.rotation() * Vec3::X
    }

    /// Get up direction (positive Y in camera space)
    pub fn up(&self) -> Vec3 {
        self.rotation() * Vec3::Y
    }

    /// Update aspect ratio (call on window resize)
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        self.aspect = width / height;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, 5.0), 60.0, 16.0 / 9.0)
    }
}
