/// Errors raised while loading and normalizing a mesh
use std::fmt;
use std::io;
use std::path::PathBuf;

/// The raw attribute pool a face corner indexes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributePool {
    Position,
    TexCoord,
    Normal,
}

impl fmt::Display for AttributePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributePool::Position => "position",
            AttributePool::TexCoord => "texture coordinate",
            AttributePool::Normal => "normal",
        };
        f.write_str(name)
    }
}

/// Everything that can go wrong between the mesh file and the vertex buffer.
///
/// None of these are recovered internally: a failed load yields no partial
/// document, and a failed normalization happens before any upload.
#[derive(Debug)]
pub enum MeshError {
    /// The source file does not exist.
    FileNotFound(PathBuf),
    /// The source exists but could not be opened or read.
    Unreadable { path: PathBuf, source: io::Error },
    /// A recognized record has missing or unparseable fields.
    MalformedRecord { line: usize, message: String },
    /// A face corner points outside one of the raw attribute pools.
    MalformedFaceReference {
        line: usize,
        pool: AttributePool,
        index: i64,
        len: usize,
    },
    /// The bounding box has zero (or non-finite) radius, so no scale exists.
    DegenerateMesh(String),
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshError::FileNotFound(path) => {
                write!(f, "mesh file not found: {}", path.display())
            }
            MeshError::Unreadable { path, source } => {
                write!(f, "cannot read mesh file {}: {}", path.display(), source)
            }
            MeshError::MalformedRecord { line, message } => {
                write!(f, "line {}: malformed record: {}", line, message)
            }
            MeshError::MalformedFaceReference {
                line,
                pool,
                index,
                len,
            } => write!(
                f,
                "line {}: {} index {} is out of range (1..={})",
                line, pool, index, len
            ),
            MeshError::DegenerateMesh(msg) => write!(f, "degenerate mesh: {}", msg),
        }
    }
}

impl std::error::Error for MeshError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeshError::Unreadable { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl MeshError {
    pub(crate) fn from_io(path: PathBuf, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            MeshError::FileNotFound(path)
        } else {
            MeshError::Unreadable { path, source: err }
        }
    }
}
