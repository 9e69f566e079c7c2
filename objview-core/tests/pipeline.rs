use nalgebra::{Point3, Vector3};
use objview_core::{
    generate_normals, load_obj, parse_obj, prepare_mesh, Camera, Mat4, MeshError,
    NormalizeOptions, ObjectTransform, DEFAULT_COLOR,
};
use std::fs;

#[test]
fn test_single_triangle_end_to_end() {
    let doc = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
    assert_eq!(doc.positions().len(), 3);
    assert_eq!(doc.colors().len(), 3);
    assert!(doc.colors().iter().all(|c| *c == Vector3::from(DEFAULT_COLOR)));
    assert!(doc.normals().is_empty());
    assert!(doc.uvs().is_empty());

    let doc = generate_normals(doc);
    for n in doc.normals() {
        assert!((n - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
    }
}

#[test]
fn test_quad_shares_diagonal() {
    let doc = parse_obj("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();
    let p = doc.positions();
    assert_eq!(p.len(), 6);
    // both triangles contain v1 and v3
    let v1 = Point3::new(0.0, 0.0, 0.0);
    let v3 = Point3::new(1.0, 1.0, 0.0);
    assert_eq!((p[0], p[2]), (v1, v3));
    assert_eq!((p[3], p[4]), (v1, v3));
}

#[test]
fn test_cube_file_to_vertex_buffer() {
    let src = "\
# unit cube, quads with shared normals
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
vn 0 0 1
vn 0 0 -1
vn 0 1 0
vn 0 -1 0
vn 1 0 0
vn -1 0 0
f 5//1 6//1 7//1 8//1
f 1//2 4//2 3//2 2//2
f 4//3 8//3 7//3 3//3
f 1//4 2//4 6//4 5//4
f 2//5 3//5 7//5 6//5
f 1//6 5//6 8//6 4//6
";
    let path = std::env::temp_dir().join(format!("objview-cube-{}.obj", std::process::id()));
    fs::write(&path, src).unwrap();
    let doc = load_obj(&path);
    fs::remove_file(&path).unwrap();
    let doc = doc.unwrap();

    assert_eq!(doc.vertex_count(), 36);
    assert_eq!(doc.normals().len(), 36);

    let mesh = prepare_mesh(doc, &NormalizeOptions::default()).unwrap();
    let floats = mesh.as_floats();
    assert_eq!(floats.len(), 36 * 8);

    // a cube of half-size 1 has radius sqrt(3); corners end up at 1.5 / sqrt(3)
    let corner = 1.5 / 3.0f32.sqrt();
    for v in floats.chunks_exact(8) {
        for c in &v[0..3] {
            assert!((c.abs() - corner).abs() < 1e-5);
        }
        let uv = &v[6..8];
        assert!(uv.iter().all(|t| *t == 0.0 || *t == 1.0));
    }
}

#[test]
fn test_bad_reference_aborts_load() {
    let err = parse_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 1 2 9\n").unwrap_err();
    assert!(matches!(err, MeshError::MalformedFaceReference { line: 5, .. }));
}

#[test]
fn test_missing_file_is_reported() {
    let err = load_obj("no/such/mesh.obj").unwrap_err();
    assert!(matches!(err, MeshError::FileNotFound(_)));
    assert!(err.to_string().contains("no/such/mesh.obj"));
}

#[test]
fn test_frame_matrices() {
    let vp = Camera::default().view_projection();
    let mut object = ObjectTransform::default();
    object.translate_by(0.0, 0.1, 0.0);
    object.spin(0.3);

    let model = object.model_matrix();
    let mvp = Mat4::multiply(&vp, &model);
    let expected = Mat4::multiply(
        &vp,
        &Mat4::multiply(&Mat4::translate(0.0, 0.1, 0.0), &Mat4::rotate_y(0.3)),
    );
    assert_eq!(mvp, expected);
    assert_eq!(mvp.as_slice().len(), 16);
}
