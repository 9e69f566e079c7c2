/// Camera parameters and the view-projection composition
use nalgebra::{Point3, Vector3};

use crate::matrix::Mat4;

/// Distance from the origin used by [`Camera::default`]
pub const DEFAULT_CAMERA_DISTANCE: f32 = 4.0;

/// Scene parameters for a right-handed perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view in radians
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            eye: Self::orbit_eye(DEFAULT_CAMERA_DISTANCE),
            target: Point3::origin(),
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            aspect: width as f32 / height as f32,
            near: 0.1,
            far: 100.0,
        }
    }

    /// Place the eye at `(d, 0.6 d, d)`, looking down at the origin from above
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.eye = Self::orbit_eye(distance);
        self
    }

    pub fn with_fov(mut self, fov: f32) -> Self {
        self.fov = fov;
        self
    }

    pub fn with_aspect(mut self, width: u32, height: u32) -> Self {
        self.aspect = width as f32 / height as f32;
        self
    }

    fn orbit_eye(distance: f32) -> Point3<f32> {
        Point3::new(distance, distance * 0.6, distance)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(&self.eye, &self.target, &self.up)
    }

    /// `projection * view`; a per-object model matrix goes on the right
    pub fn view_projection(&self) -> Mat4 {
        Mat4::multiply(&self.projection_matrix(), &self.view_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// `view_projection * model`
pub fn model_view_projection(view_projection: &Mat4, model: &Mat4) -> Mat4 {
    Mat4::multiply(view_projection, model)
}
