/// Normal synthesis, bounding-box normalization and vertex interleaving.
///
/// The output of this module is what a renderer uploads: a flat, non-indexed
/// buffer of [`GpuVertex`] records laid out as
///
/// | Attribute | Floats | Offset (bytes) |
/// |-----------|--------|----------------|
/// | position  | 3      | 0              |
/// | normal    | 3      | 12             |
/// | uv        | 2      | 24             |
use log::debug;
use nalgebra::{Point3, Vector2, Vector3};

use crate::error::MeshError;
use crate::mesh::MeshDocument;

/// Bounding radius a normalized mesh is scaled to
pub const TARGET_RADIUS: f32 = 1.5;

/// Where interleaved texture coordinates come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UvMode {
    /// Project the normalized X/Y coordinates onto `[0, 1]`, ignoring any
    /// UVs the file supplied. This is what the reference viewer does.
    #[default]
    PlanarXY,
    /// Use the file's UVs when every vertex has one, otherwise fall back to
    /// the planar projection.
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizeOptions {
    pub target_radius: f32,
    pub uv_mode: UvMode,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            target_radius: TARGET_RADIUS,
            uv_mode: UvMode::default(),
        }
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    /// Smallest box containing all points, `None` for an empty set
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point3<f32>>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self { min: first, max: first }, |b, p| Self {
            min: b.min.inf(p),
            max: b.max.sup(p),
        }))
    }

    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Half the length of the box diagonal
    pub fn radius(&self) -> f32 {
        self.extent().norm() * 0.5
    }
}

/// Offset and uniform scale that bring a mesh to the origin at the target radius
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CenterScale {
    pub center: Point3<f32>,
    pub scale: f32,
}

impl CenterScale {
    pub fn apply(&self, p: &Point3<f32>) -> Point3<f32> {
        Point3::from((p - self.center) * self.scale)
    }
}

/// One interleaved vertex as uploaded to the GPU
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl GpuVertex {
    pub const FLOATS: usize = 8;
    pub const STRIDE: usize = std::mem::size_of::<GpuVertex>();
}

/// Non-indexed triangle list ready for upload; vertex `3k..3k+3` is triangle `k`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterleavedMesh {
    vertices: Vec<GpuVertex>,
}

impl InterleavedMesh {
    pub fn vertices(&self) -> &[GpuVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// `[x, y, z, nx, ny, nz, u, v]` per vertex
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// Unit normal of a triangle, or zero if the triangle is degenerate
pub fn face_normal(tri: &[Point3<f32>; 3]) -> Vector3<f32> {
    let edge1 = tri[1] - tri[0];
    let edge2 = tri[2] - tri[0];
    edge1
        .cross(&edge2)
        .try_normalize(0.0)
        .unwrap_or_else(Vector3::zeros)
}

/// Fill in flat per-face normals when the document has none.
///
/// Each corner of a triangle receives the same face normal. A document that
/// already carries normals is returned untouched.
pub fn generate_normals(doc: MeshDocument) -> MeshDocument {
    if doc.has_normals() {
        return doc;
    }
    debug!("generating flat normals for {} triangles", doc.triangle_count());

    let mut normals = Vec::with_capacity(doc.vertex_count());
    for tri in doc.triangles() {
        let n = face_normal(&tri);
        normals.extend_from_slice(&[n, n, n]);
    }
    // trailing corners that do not form a triangle
    normals.resize(doc.vertex_count(), Vector3::zeros());
    doc.with_normals(normals)
}

/// Center and scale for [`TARGET_RADIUS`]
pub fn compute_center_scale(doc: &MeshDocument) -> Result<CenterScale, MeshError> {
    compute_center_scale_to(doc, TARGET_RADIUS)
}

/// Center of the bounding box and the scale mapping its half-diagonal to `target_radius`
pub fn compute_center_scale_to(
    doc: &MeshDocument,
    target_radius: f32,
) -> Result<CenterScale, MeshError> {
    let bounds = BoundingBox::from_points(doc.positions())
        .ok_or_else(|| MeshError::DegenerateMesh("mesh has no vertices".to_string()))?;

    let radius = bounds.radius();
    if radius == 0.0 || !radius.is_finite() {
        return Err(MeshError::DegenerateMesh(format!(
            "bounding radius is {}, all vertices coincide",
            radius
        )));
    }

    Ok(CenterScale {
        center: bounds.center(),
        scale: target_radius / radius,
    })
}

/// Emit `(position, normal, uv)` per vertex with positions normalized.
///
/// Missing normals are written as zero vectors; run [`generate_normals`] first.
pub fn interleave(doc: &MeshDocument, transform: &CenterScale, uv_mode: UvMode) -> InterleavedMesh {
    let positions: Vec<Point3<f32>> = doc.positions().iter().map(|p| transform.apply(p)).collect();
    let use_source_uvs = uv_mode == UvMode::Source && doc.has_uvs();
    let planar = if use_source_uvs {
        None
    } else {
        BoundingBox::from_points(&positions)
    };

    let vertices = positions
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let normal = doc.normals().get(i).copied().unwrap_or_else(Vector3::zeros);
            let uv = match &planar {
                Some(bounds) => planar_uv(p, bounds),
                None => doc.uvs()[i],
            };
            GpuVertex {
                position: [p.x, p.y, p.z],
                normal: [normal.x, normal.y, normal.z],
                uv: [uv.x, uv.y],
            }
        })
        .collect();

    InterleavedMesh { vertices }
}

/// Full pipeline: synthesize normals, normalize, interleave
pub fn prepare_mesh(
    doc: MeshDocument,
    options: &NormalizeOptions,
) -> Result<InterleavedMesh, MeshError> {
    let doc = generate_normals(doc);
    let transform = compute_center_scale_to(&doc, options.target_radius)?;
    debug!(
        "normalizing around ({:.3}, {:.3}, {:.3}) with scale {:.4}",
        transform.center.x, transform.center.y, transform.center.z, transform.scale
    );
    Ok(interleave(&doc, &transform, options.uv_mode))
}

// A flat extent on either axis maps that coordinate to 0.
fn planar_uv(p: &Point3<f32>, bounds: &BoundingBox) -> Vector2<f32> {
    let extent = bounds.extent();
    let u = if extent.x > 0.0 {
        (p.x - bounds.min.x) / extent.x
    } else {
        0.0
    };
    let v = if extent.y > 0.0 {
        (p.y - bounds.min.y) / extent.y
    } else {
        0.0
    };
    Vector2::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_obj;

    fn triangle() -> MeshDocument {
        MeshDocument::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
    }

    #[test]
    fn test_generate_normals_flat() {
        let doc = generate_normals(triangle());
        assert_eq!(doc.normals().len(), 3);
        for n in doc.normals() {
            assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        }
    }

    #[test]
    fn test_generate_normals_keeps_existing() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0.6 0 0.8\nf 1//1 2//1 3//1\n";
        let doc = parse_obj(src).unwrap();
        let before = doc.normals().to_vec();
        let after = generate_normals(doc);
        assert_eq!(after.normals(), &before[..]);
    }

    #[test]
    fn test_degenerate_triangle_gets_zero_normal() {
        let doc = generate_normals(MeshDocument::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(2.0, 2.0, 2.0),
        ]));
        for n in doc.normals() {
            assert_eq!(*n, Vector3::zeros());
            assert!(!n.x.is_nan());
        }
    }

    #[test]
    fn test_center_scale_of_unit_cube_corners() {
        let doc = MeshDocument::from_positions(vec![
            Point3::new(1.0, 1.0, 1.0),
            Point3::new(3.0, 1.0, 1.0),
            Point3::new(3.0, 3.0, 3.0),
        ]);
        let cs = compute_center_scale(&doc).unwrap();
        assert_eq!(cs.center, Point3::new(2.0, 2.0, 2.0));
        let radius = (12.0f32).sqrt() * 0.5;
        assert!((cs.scale - TARGET_RADIUS / radius).abs() < 1e-6);
    }

    #[test]
    fn test_center_scale_is_idempotent_on_normalized_mesh() {
        let h = TARGET_RADIUS / 3.0f32.sqrt();
        let doc = MeshDocument::from_positions(vec![
            Point3::new(-h, -h, -h),
            Point3::new(h, h, h),
            Point3::new(h, -h, h),
        ]);
        let cs = compute_center_scale(&doc).unwrap();
        assert!(cs.center.coords.norm() < 1e-6);
        assert!((cs.scale - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_coincident_points_are_degenerate() {
        let p = Point3::new(2.0, 2.0, 2.0);
        let doc = MeshDocument::from_positions(vec![p, p, p]);
        assert!(matches!(
            compute_center_scale(&doc),
            Err(MeshError::DegenerateMesh(_))
        ));
        assert!(matches!(
            compute_center_scale(&MeshDocument::new()),
            Err(MeshError::DegenerateMesh(_))
        ));
    }

    #[test]
    fn test_interleave_layout() {
        let doc = generate_normals(triangle());
        let cs = compute_center_scale(&doc).unwrap();
        let mesh = interleave(&doc, &cs, UvMode::PlanarXY);
        let floats = mesh.as_floats();
        assert_eq!(floats.len(), 3 * GpuVertex::FLOATS);
        assert_eq!(mesh.as_bytes().len(), 3 * GpuVertex::STRIDE);
        assert_eq!(GpuVertex::STRIDE, 32);

        // vertex 1 sits at max x, min y of the box
        let v1 = &floats[8..16];
        let expected_x = (1.0 - 0.5) * cs.scale;
        assert!((v1[0] - expected_x).abs() < 1e-6);
        assert_eq!(&v1[3..6], &[0.0, 0.0, 1.0]);
        assert!((v1[6] - 1.0).abs() < 1e-6);
        assert!(v1[7].abs() < 1e-6);
    }

    #[test]
    fn test_planar_uvs_ignore_source_uvs() {
        let src = "\
v 0 0 0
v 2 0 0
v 0 2 0
vt 0.25 0.25
vt 0.5 0.5
vt 0.75 0.75
f 1/1 2/2 3/3
";
        let doc = generate_normals(parse_obj(src).unwrap());
        let cs = compute_center_scale(&doc).unwrap();

        let planar = interleave(&doc, &cs, UvMode::PlanarXY);
        assert_eq!(planar.vertices()[2].uv, [0.0, 1.0]);

        let source = interleave(&doc, &cs, UvMode::Source);
        assert_eq!(source.vertices()[2].uv, [0.75, 0.75]);
    }

    #[test]
    fn test_source_mode_without_uvs_falls_back_to_planar() {
        let doc = generate_normals(triangle());
        let cs = compute_center_scale(&doc).unwrap();
        let mesh = interleave(&doc, &cs, UvMode::Source);
        assert_eq!(mesh.vertices()[1].uv, [1.0, 0.0]);
    }

    #[test]
    fn test_flat_axis_maps_uv_to_zero() {
        let doc = generate_normals(MeshDocument::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
        ]));
        let cs = compute_center_scale(&doc).unwrap();
        let mesh = interleave(&doc, &cs, UvMode::PlanarXY);
        assert!(mesh.as_floats().iter().all(|f| f.is_finite()));
        assert_eq!(mesh.vertices()[1].uv, [0.0, 1.0]);
    }

    #[test]
    fn test_prepare_mesh_scales_to_target_radius() {
        let doc = parse_obj("v 0 0 0\nv 4 0 0\nv 4 3 0\nv 0 3 0\nf 1 2 3 4\n").unwrap();
        let mesh = prepare_mesh(doc, &NormalizeOptions::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 6);
        let positions: Vec<Point3<f32>> = mesh
            .vertices()
            .iter()
            .map(|v| Point3::from(v.position))
            .collect();
        let bounds = BoundingBox::from_points(&positions).unwrap();
        assert!((bounds.radius() - TARGET_RADIUS).abs() < 1e-5);
        assert!(bounds.center().coords.norm() < 1e-6);
    }
}
