//! Loading the cube fixtures end to end.

use std::collections::HashSet;

use crate::material::TextureSlot;
use crate::math::Vec3;
use crate::material::MaterialDescriptor;
use crate::obj::{LoadError, ObjData, ObjError, ObjIndex, ObjShape, build_mesh, load_obj};

use super::{CUBE_FACETED_OBJ, CUBE_SMOOTH_OBJ, load_fixture};

#[test]
fn test_smooth_cube_shares_corners() {
    let model = load_fixture(CUBE_SMOOTH_OBJ).expect("failed to load smooth cube");

    assert_eq!(model.mesh.vertex_count(), 8);
    assert_eq!(model.mesh.triangle_count(), 12);
    assert_eq!(model.stats.positions, 8);
    assert_eq!(model.stats.normals, 8);
    assert_eq!(model.stats.tex_coords, 0);
    assert_eq!(model.stats.vertices, 8);
    assert!(!model.mesh.has_uvs());

    for vertex in model.mesh.vertices() {
        assert_eq!(vertex.tex_coord, [0.0, 0.0]);
    }
}

#[test]
fn test_smooth_cube_groups_by_material() {
    let model = load_fixture(CUBE_SMOOTH_OBJ).unwrap();
    let groups = model.mesh.groups();
    assert_eq!(groups.len(), 2);

    let side = &groups[0];
    assert_eq!(model.group_material(side).name, "side");
    assert_eq!(side.triangle_count(), 8);
    assert!(side.bump_mapped);

    let lid = &groups[1];
    assert_eq!(model.group_material(lid).name, "lid");
    assert_eq!(lid.triangle_count(), 4);
    assert!(!lid.bump_mapped);

    // Lid and side faces meet at the top and bottom rings, sharing vertices.
    let side_vertices: HashSet<u32> = side.indices.iter().copied().collect();
    let lid_vertices: HashSet<u32> = lid.indices.iter().copied().collect();
    assert_eq!(side_vertices.len(), 8);
    assert_eq!(lid_vertices.len(), 8);
}

#[test]
fn test_faceted_cube_splits_corners() {
    let model = load_fixture(CUBE_FACETED_OBJ).expect("failed to load faceted cube");

    assert_eq!(model.mesh.vertex_count(), 24);
    assert_eq!(model.mesh.triangle_count(), 12);
    assert!(model.mesh.has_uvs());
    assert_eq!(model.mesh.groups().len(), 1);

    let material = model.group_material(&model.mesh.groups()[0]);
    assert_eq!(material.texture(TextureSlot::Diffuse), Some("side_diffuse.png"));
    assert_eq!(material.texture(TextureSlot::Bump), Some("side_normal.png"));
    assert_eq!(material.shininess, 96.0);
}

#[test]
fn test_faceted_cube_tangent_frames() {
    let model = load_fixture(CUBE_FACETED_OBJ).unwrap();
    assert!(model.mesh.groups()[0].bump_mapped);

    for (i, vertex) in model.mesh.vertices().iter().enumerate() {
        let n = Vec3::from(vertex.normal);
        let t = Vec3::from(vertex.tangent);
        assert!((t.norm() - 1.0).abs() < 1e-4, "vertex {i}: tangent not unit length");
        assert!(n.dot(&t).abs() < 1e-4, "vertex {i}: tangent not orthogonal to normal");
        assert!(
            vertex.handedness == 1.0 || vertex.handedness == -1.0,
            "vertex {i}: handedness {}",
            vertex.handedness
        );
    }
}

#[test]
fn test_vertices_without_bump_have_no_frame() {
    // Same geometry as the smooth cube, but only the lid material is used.
    let obj = CUBE_SMOOTH_OBJ.replace("usemtl side", "usemtl lid");
    let model = load_fixture(&obj).unwrap();
    assert_eq!(model.mesh.groups().len(), 1);
    for vertex in model.mesh.vertices() {
        assert_eq!(vertex.handedness, 0.0);
        assert_eq!(vertex.tangent, [0.0, 0.0, 0.0]);
    }
}

#[test]
fn test_face_before_usemtl() {
    let obj = "\
mtllib cube.mtl
o tri
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
f 1//1 2//1 3//1
";
    let err = load_fixture(obj).unwrap_err();
    assert_eq!(
        err,
        ObjError::Load(LoadError::FaceWithoutMaterial {
            shape: "tri".into(),
            face: 0
        })
    );
}

#[test]
fn test_structural_requirements() {
    // Attributes only survive import when a face references them, so a file
    // without faces reports no vertices.
    let cases = [
        ("", LoadError::NoVertices),
        ("mtllib cube.mtl\nv 0 0 0\nvn 0 0 1\n", LoadError::NoVertices),
        (
            "mtllib cube.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl side\nf 1 2 3\n",
            LoadError::NoNormals,
        ),
        (
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
            LoadError::NoMaterials,
        ),
    ];
    for (obj, expected) in cases {
        assert_eq!(load_fixture(obj).unwrap_err(), ObjError::Load(expected));
    }
}

/// One triangle over three positions, one normal and one material.
fn triangle_data() -> ObjData {
    let corner = |position| ObjIndex {
        position,
        tex_coord: None,
        normal: Some(0),
    };
    ObjData {
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]],
        tex_coords: Vec::new(),
        shapes: vec![ObjShape {
            name: "tri".into(),
            indices: vec![corner(0), corner(1), corner(2)],
            material_ids: vec![Some(0)],
        }],
        materials: vec![MaterialDescriptor::new("only")],
    }
}

#[test]
fn test_faces_required_when_positions_exist() {
    let mut data = triangle_data();
    data.shapes.clear();
    assert_eq!(build_mesh(&data).unwrap_err(), LoadError::NoFaces);
}

#[test]
fn test_material_past_the_table_is_rejected() {
    let mut data = triangle_data();
    data.shapes[0].material_ids[0] = Some(5);
    assert_eq!(
        build_mesh(&data).unwrap_err(),
        LoadError::MaterialOutOfRange {
            shape: "tri".into(),
            face: 0,
            material: 5,
            count: 1,
        }
    );
}

#[test]
fn test_attribute_past_the_table_is_rejected() {
    let mut data = triangle_data();
    data.shapes[0].indices[2].position = 9;
    assert_eq!(
        build_mesh(&data).unwrap_err(),
        LoadError::IndexOutOfRange {
            shape: "tri".into(),
            face: 0,
            attribute: "position",
            index: 9,
            count: 3,
        }
    );

    let mut data = triangle_data();
    data.shapes[0].indices[1].normal = Some(4);
    assert!(matches!(
        build_mesh(&data).unwrap_err(),
        LoadError::IndexOutOfRange { attribute: "normal", index: 4, count: 1, .. }
    ));

    let mut data = triangle_data();
    data.tex_coords = vec![[0.0, 0.0]];
    data.shapes[0].indices[0].tex_coord = Some(2);
    assert!(matches!(
        build_mesh(&data).unwrap_err(),
        LoadError::IndexOutOfRange { attribute: "texture coordinate", index: 2, .. }
    ));
}

#[test]
fn test_short_corner_list_is_rejected() {
    let mut data = triangle_data();
    data.shapes[0].indices.pop();
    assert!(matches!(
        build_mesh(&data).unwrap_err(),
        LoadError::MalformedShape { corners: 2, faces: 1, .. }
    ));
}

#[test]
fn test_corner_without_normal_index() {
    let obj = "\
mtllib cube.mtl
v 0 0 0
v 1 0 0
v 0 1 0
vn 0 0 1
usemtl lid
f 1//1 2 3//1
";
    let err = load_fixture(obj).unwrap_err();
    assert!(matches!(
        err,
        ObjError::Load(LoadError::MissingNormalIndex { face: 0, .. })
    ));
}

#[test]
fn test_missing_library_is_a_parse_error() {
    let err = load_fixture("mtllib nowhere.mtl\n").unwrap_err();
    assert!(matches!(err, ObjError::Parse(_)));
}

#[test]
fn test_load_from_disk() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/src/obj/tests/cube_faceted.obj");
    let model = load_obj(path).expect("failed to load cube_faceted.obj");
    assert_eq!(model.mesh.vertex_count(), 24);
    assert_eq!(model.mesh.label(), Some(path));
    assert_eq!(model.materials.len(), 2);
}

#[test]
fn test_load_missing_file() {
    let err = load_obj("/definitely/not/here.obj").unwrap_err();
    match err {
        ObjError::Parse(e) => assert!(e.message().contains("here.obj")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}
