/// Wavefront OBJ reader: `v`, `vt`, `vn` and `f` records
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use nom::{
    bytes::complete::take_till1,
    character::complete::{char, i64 as index, space0, space1},
    combinator::{all_consuming, opt},
    multi::many0,
    number::complete::float,
    sequence::{pair, preceded, terminated},
    IResult,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{AttributePool, MeshError};
use crate::mesh::{Corner, MeshDocument};

/// Corner order used to split a quad `(0,1,2,3)` into two triangles.
/// Assumes the quad is convex.
const QUAD_FAN: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// A face corner as written in the file: `v`, `v/vt`, `v//vn` or `v/vt/vn`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CornerRef {
    position: i64,
    tex_coord: Option<i64>,
    normal: Option<i64>,
}

#[derive(Debug, PartialEq)]
enum Record {
    Position {
        position: Point3<f32>,
        color: Option<Vector3<f32>>,
    },
    TexCoord(Vector2<f32>),
    Normal(Vector3<f32>),
    Face(Vec<CornerRef>),
    Skip,
}

/// Load and triangulate an OBJ file
pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<MeshDocument, MeshError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| MeshError::from_io(path.to_path_buf(), e))?;
    let doc = read_lines(BufReader::new(file), |e| {
        MeshError::from_io(path.to_path_buf(), e)
    })?;

    info!(
        "loaded {} vertices ({} triangles) from {}",
        doc.vertex_count(),
        doc.triangle_count(),
        path.display()
    );
    Ok(doc)
}

/// Parse OBJ text already held in memory
pub fn parse_obj(input: &str) -> Result<MeshDocument, MeshError> {
    let mut builder = DocumentBuilder::default();
    for (i, line) in input.lines().enumerate() {
        builder.feed(i + 1, line)?;
    }
    Ok(builder.finish())
}

/// Parse OBJ text from any buffered reader
pub fn parse_obj_reader<R: BufRead>(reader: R) -> Result<MeshDocument, MeshError> {
    // Not a file: every I/O failure is a read failure, never "not found".
    read_lines(reader, |e| MeshError::Unreadable {
        path: PathBuf::from("<reader>"),
        source: e,
    })
}

/// Feed the reader line by line. Bytes that are not UTF-8 are replaced
/// rather than rejected, so stray encodings in comments or unsupported
/// directives do not abort the load.
fn read_lines<R, F>(mut reader: R, on_error: F) -> Result<MeshDocument, MeshError>
where
    R: BufRead,
    F: Fn(io::Error) -> MeshError,
{
    let mut builder = DocumentBuilder::default();
    let mut buf = Vec::new();
    let mut line_no = 0;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).map_err(&on_error)? == 0 {
            break;
        }
        line_no += 1;
        let line = String::from_utf8_lossy(&buf);
        builder.feed(line_no, line.trim_end_matches(['\n', '\r']))?;
    }
    Ok(builder.finish())
}

/// Append-only attribute pools plus the document being assembled
#[derive(Default)]
struct DocumentBuilder {
    positions: Vec<Point3<f32>>,
    colors: Vec<Option<Vector3<f32>>>,
    tex_coords: Vec<Vector2<f32>>,
    normals: Vec<Vector3<f32>>,
    doc: MeshDocument,
    skipped: usize,
}

impl DocumentBuilder {
    fn feed(&mut self, line_no: usize, line: &str) -> Result<(), MeshError> {
        match parse_record(line_no, line)? {
            Record::Position { position, color } => {
                self.positions.push(position);
                self.colors.push(color);
            }
            Record::TexCoord(uv) => self.tex_coords.push(uv),
            Record::Normal(normal) => self.normals.push(normal),
            Record::Face(refs) => self.add_face(line_no, &refs)?,
            Record::Skip => self.skipped += 1,
        }
        Ok(())
    }

    fn add_face(&mut self, line_no: usize, refs: &[CornerRef]) -> Result<(), MeshError> {
        let order: &[usize] = match refs.len() {
            3 => &QUAD_FAN[..3],
            4 => &QUAD_FAN,
            n => {
                warn!(
                    "line {}: face has {} corners, only the first triangle is kept",
                    line_no, n
                );
                &QUAD_FAN[..3]
            }
        };

        // Resolve every corner before touching the document so a bad
        // reference leaves no half-written face behind.
        let corners = order
            .iter()
            .map(|&i| self.resolve(line_no, &refs[i]))
            .collect::<Result<Vec<_>, _>>()?;
        for corner in corners {
            self.doc.push_corner(corner);
        }
        Ok(())
    }

    fn resolve(&self, line_no: usize, r: &CornerRef) -> Result<Corner, MeshError> {
        let pi = checked_index(line_no, AttributePool::Position, r.position, self.positions.len())?;
        let mut corner = Corner::new(self.positions[pi]);
        if let Some(color) = self.colors[pi] {
            corner.color = color;
        }

        // An empty pool means the file has no such attribute; the reference
        // is ignored rather than rejected.
        if let Some(ti) = r.tex_coord.filter(|_| !self.tex_coords.is_empty()) {
            let ti = checked_index(line_no, AttributePool::TexCoord, ti, self.tex_coords.len())?;
            corner.uv = Some(self.tex_coords[ti]);
        }
        if let Some(ni) = r.normal.filter(|_| !self.normals.is_empty()) {
            let ni = checked_index(line_no, AttributePool::Normal, ni, self.normals.len())?;
            corner.normal = Some(self.normals[ni]);
        }
        Ok(corner)
    }

    fn finish(self) -> MeshDocument {
        if self.skipped > 0 {
            debug!("skipped {} blank, comment or unsupported lines", self.skipped);
        }
        self.doc.finish()
    }
}

/// Convert a 1-based OBJ index into a bounds-checked 0-based one
fn checked_index(
    line: usize,
    pool: AttributePool,
    index: i64,
    len: usize,
) -> Result<usize, MeshError> {
    match usize::try_from(index) {
        Ok(i) if i >= 1 && i <= len => Ok(i - 1),
        _ => Err(MeshError::MalformedFaceReference {
            line,
            pool,
            index,
            len,
        }),
    }
}

fn parse_record(line_no: usize, line: &str) -> Result<Record, MeshError> {
    let content = line.split('#').next().unwrap_or_default();
    let (rest, kw) = match keyword(content) {
        Ok(parsed) => parsed,
        Err(_) => return Ok(Record::Skip),
    };

    match kw {
        "v" => {
            let values = numbers(line_no, kw, rest, 3)?;
            let position = Point3::new(values[0], values[1], values[2]);
            let color = if values.len() >= 6 {
                Some(Vector3::new(values[3], values[4], values[5]))
            } else {
                None
            };
            Ok(Record::Position { position, color })
        }
        "vt" => {
            let values = numbers(line_no, kw, rest, 2)?;
            Ok(Record::TexCoord(Vector2::new(values[0], values[1])))
        }
        "vn" => {
            let values = numbers(line_no, kw, rest, 3)?;
            Ok(Record::Normal(Vector3::new(values[0], values[1], values[2])))
        }
        "f" => {
            let refs = match corner_refs(rest) {
                Ok((_, refs)) => refs,
                Err(e) => {
                    return Err(MeshError::MalformedRecord {
                        line: line_no,
                        message: format!("invalid face reference list: {:?}", e),
                    })
                }
            };
            if refs.len() < 3 {
                return Err(MeshError::MalformedRecord {
                    line: line_no,
                    message: format!("face needs at least 3 corners, found {}", refs.len()),
                });
            }
            Ok(Record::Face(refs))
        }
        _ => Ok(Record::Skip),
    }
}

fn numbers(line_no: usize, kw: &str, rest: &str, required: usize) -> Result<Vec<f32>, MeshError> {
    let values = match float_list(rest) {
        Ok((_, values)) => values,
        Err(e) => {
            return Err(MeshError::MalformedRecord {
                line: line_no,
                message: format!("'{}' has unparseable values: {:?}", kw, e),
            })
        }
    };
    if values.len() < required {
        return Err(MeshError::MalformedRecord {
            line: line_no,
            message: format!(
                "'{}' expects {} values, found {}",
                kw,
                required,
                values.len()
            ),
        });
    }
    Ok(values)
}

fn keyword(input: &str) -> IResult<&str, &str> {
    preceded(space0, take_till1(|c: char| c.is_whitespace()))(input)
}

fn float_list(input: &str) -> IResult<&str, Vec<f32>> {
    all_consuming(terminated(many0(preceded(space1, float)), space0))(input)
}

fn corner_refs(input: &str) -> IResult<&str, Vec<CornerRef>> {
    all_consuming(terminated(many0(preceded(space1, corner_ref)), space0))(input)
}

fn corner_ref(input: &str) -> IResult<&str, CornerRef> {
    let (input, position) = index(input)?;
    let (input, rest) = opt(preceded(
        char('/'),
        pair(opt(index), opt(preceded(char('/'), index))),
    ))(input)?;
    let (tex_coord, normal) = rest.unwrap_or((None, None));
    Ok((
        input,
        CornerRef {
            position,
            tex_coord,
            normal,
        },
    ))
}
