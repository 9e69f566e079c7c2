/// 4x4 transform algebra in column-major layout
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use std::ops::Mul;

/// A 4x4 matrix stored as 16 column-major floats.
///
/// Element `(row, col)` lives at `m[col * 4 + row]`, which is the layout
/// graphics APIs expect for uniform upload. Values are immutable: every
/// constructor and operation returns a fresh matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    pub m: [f32; 16],
}

impl Mat4 {
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// The multiplicative identity
    pub fn identity() -> Self {
        let mut m = [0.0; 16];
        m[0] = 1.0;
        m[5] = 1.0;
        m[10] = 1.0;
        m[15] = 1.0;
        Self { m }
    }

    /// Matrix product `a * b`: applying the result equals applying `b`, then `a`.
    pub fn multiply(a: &Mat4, b: &Mat4) -> Self {
        let mut m = [0.0; 16];
        for col in 0..4 {
            for row in 0..4 {
                m[col * 4 + row] = a.m[row] * b.m[col * 4]
                    + a.m[4 + row] * b.m[col * 4 + 1]
                    + a.m[8 + row] * b.m[col * 4 + 2]
                    + a.m[12 + row] * b.m[col * 4 + 3];
            }
        }
        Self { m }
    }

    /// Right-handed perspective projection into OpenGL clip space.
    ///
    /// `fov` is the vertical field of view in radians. Requires
    /// `0 < near < far`; this is not checked.
    pub fn perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov / 2.0).tan();
        let mut m = [0.0; 16];
        m[0] = f / aspect;
        m[5] = f;
        m[10] = (far + near) / (near - far);
        m[11] = -1.0;
        m[14] = (2.0 * far * near) / (near - far);
        Self { m }
    }

    /// Right-handed view matrix placing `eye` at the origin looking down -Z.
    ///
    /// `up` only needs to be roughly upward; the basis is re-orthogonalized.
    /// Undefined when `eye == target` or `up` is parallel to the view direction.
    pub fn look_at(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Self {
        let forward = (target - eye).normalize();
        let side = forward.cross(up).normalize();
        let up = side.cross(&forward);
        let eye = eye.coords;

        let mut r = Self::identity();
        r.m[0] = side.x;
        r.m[4] = side.y;
        r.m[8] = side.z;
        r.m[1] = up.x;
        r.m[5] = up.y;
        r.m[9] = up.z;
        r.m[2] = -forward.x;
        r.m[6] = -forward.y;
        r.m[10] = -forward.z;

        r.m[12] = -side.dot(&eye);
        r.m[13] = -up.dot(&eye);
        r.m[14] = forward.dot(&eye);
        r
    }

    /// Rotation about +X by `angle` radians
    pub fn rotate_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::identity();
        r.m[5] = c;
        r.m[6] = s;
        r.m[9] = -s;
        r.m[10] = c;
        r
    }

    /// Rotation about +Y by `angle` radians
    pub fn rotate_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::identity();
        r.m[0] = c;
        r.m[2] = -s;
        r.m[8] = s;
        r.m[10] = c;
        r
    }

    /// Rotation about +Z by `angle` radians
    pub fn rotate_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        let mut r = Self::identity();
        r.m[0] = c;
        r.m[1] = s;
        r.m[4] = -s;
        r.m[5] = c;
        r
    }

    /// Rodrigues rotation about an arbitrary axis.
    ///
    /// The axis is normalized first; a zero-length axis yields the identity.
    pub fn rotate_axis(axis: &Vector3<f32>, angle: f32) -> Self {
        let len = axis.norm();
        if len == 0.0 {
            return Self::identity();
        }
        let (x, y, z) = (axis.x / len, axis.y / len, axis.z / len);
        let (s, c) = angle.sin_cos();
        let t = 1.0 - c;

        let mut r = Self::identity();
        // column 0
        r.m[0] = t * x * x + c;
        r.m[1] = t * x * y + s * z;
        r.m[2] = t * x * z - s * y;
        // column 1
        r.m[4] = t * x * y - s * z;
        r.m[5] = t * y * y + c;
        r.m[6] = t * y * z + s * x;
        // column 2
        r.m[8] = t * x * z + s * y;
        r.m[9] = t * y * z - s * x;
        r.m[10] = t * z * z + c;
        r
    }

    /// Translation by `(x, y, z)`
    pub fn translate(x: f32, y: f32, z: f32) -> Self {
        let mut r = Self::identity();
        r.m[12] = x;
        r.m[13] = y;
        r.m[14] = z;
        r
    }

    /// Element at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[col * 4 + row]
    }

    /// Apply to a homogeneous vector
    pub fn apply(&self, v: &Vector4<f32>) -> Vector4<f32> {
        let m = &self.m;
        Vector4::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        )
    }

    /// Apply to a point (w = 1) and divide by the resulting w
    pub fn transform_point(&self, p: &Point3<f32>) -> Point3<f32> {
        let h = self.apply(&p.to_homogeneous());
        Point3::new(h.x / h.w, h.y / h.w, h.z / h.w)
    }

    /// Apply to a direction (w = 0), ignoring translation
    pub fn transform_vector(&self, v: &Vector3<f32>) -> Vector3<f32> {
        self.apply(&v.to_homogeneous()).xyz()
    }

    /// The 16 column-major floats, ready for uniform upload
    pub fn as_slice(&self) -> &[f32] {
        &self.m
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Mat4 {
        Mat4::multiply(&self, &rhs)
    }
}

impl From<Mat4> for Matrix4<f32> {
    fn from(mat: Mat4) -> Self {
        Matrix4::from_column_slice(&mat.m)
    }
}

impl From<Matrix4<f32>> for Mat4 {
    fn from(mat: Matrix4<f32>) -> Self {
        let mut m = [0.0; 16];
        m.copy_from_slice(mat.as_slice());
        Self { m }
    }
}
