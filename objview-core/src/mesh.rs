/// In-memory geometry record produced by the parser
use log::warn;
use nalgebra::{Point3, Vector2, Vector3};

/// Color given to every vertex whose source carries no color data
pub const DEFAULT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];

/// One resolved face corner, ready to be appended to a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub position: Point3<f32>,
    pub color: Vector3<f32>,
    pub normal: Option<Vector3<f32>>,
    pub uv: Option<Vector2<f32>>,
}

impl Corner {
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            color: Vector3::from(DEFAULT_COLOR),
            normal: None,
            uv: None,
        }
    }
}

/// Triangulated, non-indexed mesh: one entry per vertex instance.
///
/// Every three consecutive vertices form a triangle. `colors` always has one
/// entry per position; `normals` and `uvs` are either empty or complete.
/// Downstream stages only read the document; [`crate::normalize::generate_normals`]
/// consumes it and returns a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDocument {
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    uvs: Vec<Vector2<f32>>,
    colors: Vec<Vector3<f32>>,
}

impl MeshDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from bare triangle corners with default colors
    pub fn from_positions(positions: Vec<Point3<f32>>) -> Self {
        let colors = vec![Vector3::from(DEFAULT_COLOR); positions.len()];
        Self {
            positions,
            normals: Vec::new(),
            uvs: Vec::new(),
            colors,
        }
    }

    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vector2<f32>] {
        &self.uvs
    }

    pub fn colors(&self) -> &[Vector3<f32>] {
        &self.colors
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn has_normals(&self) -> bool {
        !self.normals.is_empty()
    }

    pub fn has_uvs(&self) -> bool {
        !self.uvs.is_empty()
    }

    /// Iterate over triangles as corner triplets
    pub fn triangles(&self) -> impl Iterator<Item = [Point3<f32>; 3]> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|tri| [tri[0], tri[1], tri[2]])
    }

    pub(crate) fn push_corner(&mut self, corner: Corner) {
        self.positions.push(corner.position);
        self.colors.push(corner.color);
        if let Some(normal) = corner.normal {
            self.normals.push(normal);
        }
        if let Some(uv) = corner.uv {
            self.uvs.push(uv);
        }
    }

    /// Drop partially resolved attribute streams so that the per-vertex
    /// invariant holds once parsing is done.
    pub(crate) fn finish(mut self) -> Self {
        if !self.normals.is_empty() && self.normals.len() != self.positions.len() {
            warn!(
                "only {} of {} corners reference a normal, discarding source normals",
                self.normals.len(),
                self.positions.len()
            );
            self.normals.clear();
        }
        if !self.uvs.is_empty() && self.uvs.len() != self.positions.len() {
            warn!(
                "only {} of {} corners reference a texture coordinate, discarding source UVs",
                self.uvs.len(),
                self.positions.len()
            );
            self.uvs.clear();
        }
        self
    }

    pub(crate) fn with_normals(mut self, normals: Vec<Vector3<f32>>) -> Self {
        debug_assert_eq!(normals.len(), self.positions.len());
        self.normals = normals;
        self
    }
}
