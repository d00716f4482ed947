//! Wavefront OBJ import through `tobj`.
//!
//! Produces [`ObjData`]: flat attribute arrays shared by the whole file, and
//! per-shape triangle lists whose corners reference those arrays by index.
//! `tobj` fan-triangulates polygons and renumbers attributes per object; the
//! per-object arrays are pooled here so a corner shared between objects keeps
//! one attribute index.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::Path;

use crate::material::MaterialDescriptor;

use super::error::ParseError;
use super::mtl::convert_material;

/// Zero-based attribute indices of one face corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjIndex {
    /// Index into [`ObjData::positions`].
    pub position: u32,
    /// Index into [`ObjData::tex_coords`], if the corner has one.
    pub tex_coord: Option<u32>,
    /// Index into [`ObjData::normals`], if the corner has one.
    pub normal: Option<u32>,
}

/// A named run of triangles (`o` / `g` statements).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjShape {
    /// Object or group name.
    pub name: String,
    /// Three corners per triangle.
    pub indices: Vec<ObjIndex>,
    /// Material of each triangle, `None` before any `usemtl`.
    pub material_ids: Vec<Option<usize>>,
}

impl ObjShape {
    /// Number of triangles.
    pub fn face_count(&self) -> usize {
        self.material_ids.len()
    }

    /// The three corners of a triangle.
    pub fn face(&self, face: usize) -> &[ObjIndex] {
        &self.indices[face * 3..face * 3 + 3]
    }
}

/// A parsed OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    /// `v` statements.
    pub positions: Vec<[f32; 3]>,
    /// `vn` statements.
    pub normals: Vec<[f32; 3]>,
    /// `vt` statements.
    pub tex_coords: Vec<[f32; 2]>,
    /// Shapes containing at least one face.
    pub shapes: Vec<ObjShape>,
    /// Materials from every referenced library, in load order.
    pub materials: Vec<MaterialDescriptor>,
}

impl ObjData {
    /// Total number of triangles.
    pub fn face_count(&self) -> usize {
        self.shapes.iter().map(ObjShape::face_count).sum()
    }
}

/// Pools attribute values so equal values share one index across objects.
struct AttributePool<const N: usize> {
    values: Vec<[f32; N]>,
    lookup: HashMap<[u32; N], u32>,
}

impl<const N: usize> AttributePool<N> {
    fn new() -> Self {
        Self {
            values: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Add an object's flat array, returning the pooled index of each element.
    fn extend(&mut self, flat: &[f32]) -> Result<Vec<u32>, ParseError> {
        flat.chunks_exact(N)
            .map(|chunk| {
                let mut value = [0.0; N];
                value.copy_from_slice(chunk);
                let key = value.map(f32::to_bits);
                if let Some(&index) = self.lookup.get(&key) {
                    return Ok(index);
                }
                let index = u32::try_from(self.values.len())
                    .map_err(|_| ParseError::new("attribute count exceeds 32-bit indices"))?;
                self.values.push(value);
                self.lookup.insert(key, index);
                Ok(index)
            })
            .collect()
    }
}

/// Remap object-local indices through the pooled table.
fn remap(indices: &[u32], table: &[u32], what: &str) -> Result<Vec<u32>, ParseError> {
    indices
        .iter()
        .map(|&i| {
            table
                .get(i as usize)
                .copied()
                .ok_or_else(|| ParseError::new(format!("{what} index {i} out of range")))
        })
        .collect()
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text.
///
/// `mtl_loader` is called once per `mtllib` path and returns the `tobj`
/// materials of that library, see [`tobj::load_mtl_buf`].
pub fn parse_obj<R, F>(mut reader: R, mtl_loader: F) -> Result<ObjData, ParseError>
where
    R: BufRead,
    F: Fn(&Path) -> tobj::MTLLoadResult,
{
    let (models, materials) = tobj::load_obj_buf(&mut reader, &load_options(), mtl_loader)?;
    let materials = materials?;

    let mut data = ObjData::default();
    let mut seen_materials: HashMap<String, usize> = HashMap::new();
    // tobj material index -> descriptor index
    let mut material_map: Vec<usize> = Vec::with_capacity(materials.len());
    for mat in materials {
        if let Some(&existing) = seen_materials.get(&mat.name) {
            log::warn!("Duplicate material '{}', keeping the first definition", mat.name);
            material_map.push(existing);
            continue;
        }
        seen_materials.insert(mat.name.clone(), data.materials.len());
        material_map.push(data.materials.len());
        data.materials.push(convert_material(mat)?);
    }

    let mut positions = AttributePool::<3>::new();
    let mut normals = AttributePool::<3>::new();
    let mut tex_coords = AttributePool::<2>::new();

    for model in models {
        let mesh = model.mesh;
        if mesh.indices.is_empty() {
            continue;
        }
        let face_count = mesh.indices.len() / 3;

        let position_table = positions.extend(&mesh.positions)?;
        let normal_table = normals.extend(&mesh.normals)?;
        let tex_coord_table = tex_coords.extend(&mesh.texcoords)?;

        let position_ids = remap(&mesh.indices, &position_table, "position")?;
        // Per-corner attributes only line up when every corner carries one.
        let normal_ids = if mesh.normal_indices.len() == mesh.indices.len() {
            Some(remap(&mesh.normal_indices, &normal_table, "normal")?)
        } else {
            None
        };
        let tex_coord_ids = if mesh.texcoord_indices.len() == mesh.indices.len() {
            Some(remap(&mesh.texcoord_indices, &tex_coord_table, "texture coordinate")?)
        } else {
            None
        };

        let indices = position_ids
            .iter()
            .take(face_count * 3)
            .enumerate()
            .map(|(i, &position)| ObjIndex {
                position,
                tex_coord: tex_coord_ids.as_ref().map(|ids| ids[i]),
                normal: normal_ids.as_ref().map(|ids| ids[i]),
            })
            .collect();
        let material = mesh
            .material_id
            .and_then(|id| material_map.get(id).copied());

        data.shapes.push(ObjShape {
            name: model.name,
            indices,
            material_ids: vec![material; face_count],
        });
    }

    data.positions = positions.values;
    data.normals = normals.values;
    data.tex_coords = tex_coords.values;
    Ok(data)
}
