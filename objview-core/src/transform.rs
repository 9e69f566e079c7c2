/// Per-object placement owned by the render loop
use nalgebra::Vector3;

use crate::matrix::Mat4;

/// Offset and spin of the displayed object.
///
/// The render loop owns one of these and rebuilds the model matrix from it
/// every frame; the core never mutates it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectTransform {
    pub offset: Vector3<f32>,
    /// Rotation about +Y in radians
    pub angle: f32,
}

impl ObjectTransform {
    pub fn new(offset: Vector3<f32>, angle: f32) -> Self {
        Self { offset, angle }
    }

    pub fn identity() -> Self {
        Self {
            offset: Vector3::zeros(),
            angle: 0.0,
        }
    }

    pub fn translate_by(&mut self, dx: f32, dy: f32, dz: f32) {
        self.offset += Vector3::new(dx, dy, dz);
    }

    pub fn spin(&mut self, delta: f32) {
        self.angle += delta;
    }

    /// `translate(offset) * rotate_y(angle)`: spin in place, then move
    pub fn model_matrix(&self) -> Mat4 {
        let translation = Mat4::translate(self.offset.x, self.offset.y, self.offset.z);
        Mat4::multiply(&translation, &Mat4::rotate_y(self.angle))
    }
}

impl Default for ObjectTransform {
    fn default() -> Self {
        Self::identity()
    }
}
