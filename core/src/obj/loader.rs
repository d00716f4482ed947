//! OBJ to [`CpuMesh`] conversion.
//!
//! The conversion:
//! 1. validates the parsed file (vertices, faces, normals, materials present);
//! 2. deduplicates face corners by their attribute index triple;
//! 3. buckets triangles into one index array per material;
//! 4. builds tangent frames for the buckets whose material has a bump map.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::material::MaterialDescriptor;
use crate::mesh::{CpuFaceGroup, CpuMesh, Vertex, build_tangents};
use crate::{profile_function, profile_scope};

use super::error::{LoadError, ObjError, ParseError};
use super::parser::{ObjData, ObjIndex, ObjShape, parse_obj};

/// Source-file identity of an emitted vertex.
type CornerKey = (u32, u32, Option<u32>);

/// Counts gathered while loading, for logging and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjStats {
    /// Triangles after triangulation.
    pub triangles: usize,
    /// `v` statements in the file.
    pub positions: usize,
    /// `vn` statements in the file.
    pub normals: usize,
    /// `vt` statements in the file.
    pub tex_coords: usize,
    /// Materials available to the file.
    pub materials: usize,
    /// Unique vertices emitted.
    pub vertices: usize,
}

/// A loaded OBJ file.
#[derive(Debug, Clone)]
pub struct ObjModel {
    /// Deduplicated geometry grouped by material.
    pub mesh: CpuMesh,
    /// Material table; [`CpuFaceGroup::material`] indexes into it.
    pub materials: Vec<MaterialDescriptor>,
    /// Load statistics.
    pub stats: ObjStats,
}

impl ObjModel {
    /// Material of a face group.
    pub fn group_material(&self, group: &CpuFaceGroup) -> &MaterialDescriptor {
        &self.materials[group.material]
    }

    fn with_label(mut self, label: String) -> Self {
        self.mesh = self.mesh.with_label(label);
        self
    }
}

/// Load an OBJ file from disk.
///
/// `mtllib` statements are resolved relative to the OBJ file's directory.
///
/// # Errors
///
/// [`ObjError::Parse`] if the file or one of its material libraries cannot be
/// read or parsed, [`ObjError::Load`] if the content cannot form a mesh.
pub fn load_obj(path: impl AsRef<Path>) -> Result<ObjModel, ObjError> {
    profile_function!();
    let path = path.as_ref();
    log::info!("Started import of {}", path.display());

    let file = File::open(path).map_err(|e| ParseError::io(path, &e))?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));

    let model = load_obj_buf(BufReader::new(file), |library| {
        let library_path = base_dir.join(library);
        let file = File::open(&library_path).map_err(|e| {
            log::warn!("Failed to open material library {}: {e}", library_path.display());
            tobj::LoadError::OpenFileFailed
        })?;
        tobj::load_mtl_buf(&mut BufReader::new(file)).inspect_err(|e| {
            log::warn!("Failed to parse material library {}: {e}", library_path.display());
        })
    })
    .map_err(|e| match e {
        ObjError::Parse(p) => ObjError::Parse(p.in_file(path)),
        other => other,
    })?;

    log::info!("Mesh {} successfully imported", path.display());
    Ok(model.with_label(path.display().to_string()))
}

/// Load OBJ text from a reader, resolving material libraries through
/// `mtl_loader`.
///
/// # Example
///
/// ```ignore
/// let model = load_obj_buf(obj_text.as_bytes(), |path| {
///     tobj::load_mtl_buf(&mut libraries[path].as_bytes())
/// })?;
/// ```
pub fn load_obj_buf<R, F>(reader: R, mtl_loader: F) -> Result<ObjModel, ObjError>
where
    R: BufRead,
    F: Fn(&Path) -> tobj::MTLLoadResult,
{
    let data = {
        profile_scope!("parse_obj");
        parse_obj(reader, mtl_loader)?
    };
    let mesh = build_mesh(&data)?;

    let stats = ObjStats {
        triangles: data.face_count(),
        positions: data.positions.len(),
        normals: data.normals.len(),
        tex_coords: data.tex_coords.len(),
        materials: data.materials.len(),
        vertices: mesh.vertex_count(),
    };
    log::info!(
        "Triangles: {}, verts: {} ({} unique), normals: {}, UVs: {}, materials: {}",
        stats.triangles,
        stats.positions,
        stats.vertices,
        stats.normals,
        stats.tex_coords,
        stats.materials
    );

    Ok(ObjModel {
        mesh,
        materials: data.materials,
        stats,
    })
}

/// Turn parsed OBJ data into a deduplicated, tangent-framed mesh.
///
/// # Errors
///
/// Returns a [`LoadError`] when the data is structurally unusable, including
/// material or attribute indices past the end of their tables. No partial
/// mesh is produced.
pub fn build_mesh(data: &ObjData) -> Result<CpuMesh, LoadError> {
    profile_function!();

    let triangles = data.face_count();
    if data.positions.is_empty() {
        return Err(LoadError::NoVertices);
    }
    if triangles == 0 {
        return Err(LoadError::NoFaces);
    }
    if data.normals.is_empty() {
        return Err(LoadError::NoNormals);
    }
    if data.materials.is_empty() {
        return Err(LoadError::NoMaterials);
    }

    let has_uvs = !data.tex_coords.is_empty();
    let mut vertices: Vec<Vertex> = Vec::with_capacity(data.positions.len());
    let mut vertex_map: HashMap<CornerKey, u32> = HashMap::with_capacity(data.positions.len());

    let hint = triangles * 3 / data.materials.len();
    let mut index_arrays: Vec<Vec<u32>> = (0..data.materials.len())
        .map(|_| Vec::with_capacity(hint))
        .collect();

    for shape in &data.shapes {
        if shape.indices.len() != shape.face_count() * 3 {
            return Err(LoadError::MalformedShape {
                shape: shape.name.clone(),
                corners: shape.indices.len(),
                faces: shape.face_count(),
            });
        }
        for face in 0..shape.face_count() {
            let material = shape.material_ids[face].ok_or_else(|| LoadError::FaceWithoutMaterial {
                shape: shape.name.clone(),
                face,
            })?;
            if material >= data.materials.len() {
                return Err(LoadError::MaterialOutOfRange {
                    shape: shape.name.clone(),
                    face,
                    material,
                    count: data.materials.len(),
                });
            }

            for (corner, index) in shape.face(face).iter().enumerate() {
                let normal = index.normal.ok_or_else(|| LoadError::MissingNormalIndex {
                    shape: shape.name.clone(),
                    face,
                })?;
                check_corner(data, shape, face, index, normal, has_uvs)?;
                let key = (index.position, normal, index.tex_coord);

                let emitted = match vertex_map.get(&key) {
                    Some(&emitted) => emitted,
                    None => {
                        let emitted =
                            u32::try_from(vertices.len()).map_err(|_| LoadError::IndexOverflow)?;
                        if vertex_map.insert(key, emitted).is_some() {
                            return Err(LoadError::DedupConflict { face, corner });
                        }
                        vertices.push(resolve_vertex(data, index, normal, has_uvs));
                        emitted
                    }
                };

                index_arrays[material].push(emitted);
            }
        }
    }

    let bump_flags: Vec<bool> = data.materials.iter().map(MaterialDescriptor::has_bump_map).collect();
    build_tangents(
        &mut vertices,
        index_arrays
            .iter()
            .zip(&bump_flags)
            .filter(|(_, bump)| **bump)
            .map(|(indices, _)| indices.as_slice()),
    );

    let groups = index_arrays
        .into_iter()
        .zip(bump_flags)
        .enumerate()
        .map(|(material, (indices, bump_mapped))| CpuFaceGroup {
            material,
            indices,
            bump_mapped,
        })
        .collect();

    Ok(CpuMesh::new(vertices, groups, has_uvs))
}

fn check_corner(
    data: &ObjData,
    shape: &ObjShape,
    face: usize,
    index: &ObjIndex,
    normal: u32,
    has_uvs: bool,
) -> Result<(), LoadError> {
    let in_range = |attribute: &'static str, index: u32, count: usize| {
        if (index as usize) < count {
            Ok(())
        } else {
            Err(LoadError::IndexOutOfRange {
                shape: shape.name.clone(),
                face,
                attribute,
                index,
                count,
            })
        }
    };
    in_range("position", index.position, data.positions.len())?;
    in_range("normal", normal, data.normals.len())?;
    match index.tex_coord {
        Some(t) if has_uvs => in_range("texture coordinate", t, data.tex_coords.len()),
        _ => Ok(()),
    }
}

/// Corner indices must already be checked with [`check_corner`].
fn resolve_vertex(data: &ObjData, index: &ObjIndex, normal: u32, has_uvs: bool) -> Vertex {
    let tex_coord = match index.tex_coord {
        Some(t) if has_uvs => data.tex_coords[t as usize],
        _ => [0.0, 0.0],
    };
    Vertex::new(
        data.positions[index.position as usize],
        data.normals[normal as usize],
        tex_coord,
    )
}
