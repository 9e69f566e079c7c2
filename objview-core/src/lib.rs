/// objview core library - OBJ ingestion and transform algebra
///
/// This library turns a Wavefront OBJ description into a normalized,
/// interleaved vertex buffer, and provides the 4x4 matrices used to place,
/// orient and view it.

pub mod error;
pub mod matrix;
pub mod mesh;
pub mod normalize;
pub mod parser;
pub mod transform;
pub mod view;

// Re-export commonly used types
pub use error::{AttributePool, MeshError};
pub use matrix::Mat4;
pub use mesh::{Corner, MeshDocument, DEFAULT_COLOR};
pub use normalize::{
    compute_center_scale, generate_normals, interleave, prepare_mesh, CenterScale, GpuVertex,
    InterleavedMesh, NormalizeOptions, UvMode, TARGET_RADIUS,
};
pub use parser::{load_obj, parse_obj, parse_obj_reader};
pub use transform::ObjectTransform;
pub use view::Camera;
