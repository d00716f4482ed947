//! GPU meshes and draw dispatch.
//!
//! A [`Mesh`] owns a vertex buffer and one [`FaceGroup`] per material. Drawing
//! walks the groups, picks a program variant for each, uploads the transform
//! uniforms, binds the material and issues an indexed draw.
//!
//! [`MeshLoader`] turns OBJ files into meshes and owns them.

mod loader;

use std::sync::Arc;

use lumen_core::math::{Mat4, Vec3, mat4_to_cols};
use lumen_core::mesh::{CpuMesh, IndexFormat, PrimitiveTopology, Vertex};

use crate::backend::UniformValue;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::materials::Material;
use crate::profiling::profile_function;
use crate::resources::{Buffer, VertexArray};
use crate::shader::{
    LightModel, RenderSettings, UNIFORM_CAMERA_POSITION, UNIFORM_MODEL, UNIFORM_NORMAL,
    UNIFORM_VIEW_PROJ,
};
use crate::types::{BufferDescriptor, BufferUsage};

pub use loader::{MeshId, MeshLoader, MeshLoaderConfig};

/// Number of vertex attribute bindings fed by the vertex buffer.
const VERTEX_BINDINGS: u32 = 4;

/// Per-draw transforms. Absent matrices leave the program's uniform as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshUniforms<'a> {
    pub model: Option<&'a Mat4>,
    pub normal: Option<&'a Mat4>,
    pub view_proj: Option<&'a Mat4>,
}

/// Triangles sharing one material.
pub struct FaceGroup {
    material: Material,
    index_buffer: Arc<Buffer>,
    index_count: u32,
}

impl FaceGroup {
    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn index_buffer(&self) -> &Arc<Buffer> {
        &self.index_buffer
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn triangle_count(&self) -> u32 {
        self.index_count / 3
    }
}

impl std::fmt::Debug for FaceGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceGroup")
            .field("index_count", &self.index_count)
            .field("material", &self.material)
            .finish()
    }
}

/// A mesh uploaded to the GPU.
///
/// Built once from finished vertex and index data; nothing about it changes
/// afterwards.
pub struct Mesh {
    device: Arc<GraphicsDevice>,
    label: Option<String>,
    vertex_buffer: Arc<Buffer>,
    vertex_count: usize,
    has_uvs: bool,
    groups: Vec<FaceGroup>,
}

impl Mesh {
    /// Upload vertices and one index buffer per group.
    ///
    /// Groups with no indices are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `vertices` is empty or a buffer cannot be created.
    pub fn new(
        device: &Arc<GraphicsDevice>,
        vertices: &[Vertex],
        has_uvs: bool,
        groups: Vec<(&[u32], Material)>,
    ) -> Result<Self, GraphicsError> {
        let vertex_bytes: &[u8] = bytemuck::cast_slice(vertices);
        let vertex_buffer = device.create_buffer(
            &BufferDescriptor::new(vertex_bytes.len() as u64, BufferUsage::VERTEX)
                .with_label("mesh_vertices"),
            Some(vertex_bytes),
        )?;

        let mut face_groups = Vec::with_capacity(groups.len());
        for (indices, material) in groups {
            if indices.is_empty() {
                log::debug!("Skipping empty face group");
                continue;
            }
            let index_bytes: &[u8] = bytemuck::cast_slice(indices);
            let index_buffer = device.create_buffer(
                &BufferDescriptor::new(index_bytes.len() as u64, BufferUsage::INDEX)
                    .with_label("mesh_indices"),
                Some(index_bytes),
            )?;
            face_groups.push(FaceGroup {
                material,
                index_buffer,
                index_count: indices.len() as u32,
            });
        }

        Ok(Self {
            device: Arc::clone(device),
            label: None,
            vertex_buffer,
            vertex_count: vertices.len(),
            has_uvs,
            groups: face_groups,
        })
    }

    /// Upload a [`CpuMesh`]. Group `i` gets `materials[group.material]`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::InvalidParameter`] if a group references a material
    /// outside `materials`, or any error of [`Mesh::new`].
    pub fn from_cpu(
        device: &Arc<GraphicsDevice>,
        cpu: &CpuMesh,
        materials: &[Material],
    ) -> Result<Self, GraphicsError> {
        let groups = cpu
            .groups()
            .iter()
            .map(|group| {
                let material = materials.get(group.material).ok_or_else(|| {
                    GraphicsError::InvalidParameter(format!(
                        "face group references material {} of {}",
                        group.material,
                        materials.len()
                    ))
                })?;
                Ok((group.indices.as_slice(), material.clone()))
            })
            .collect::<Result<Vec<_>, GraphicsError>>()?;

        let mut mesh = Self::new(device, cpu.vertices(), cpu.has_uvs(), groups)?;
        mesh.label = cpu.label().map(str::to_owned);
        Ok(mesh)
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn vertex_buffer(&self) -> &Arc<Buffer> {
        &self.vertex_buffer
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn has_uvs(&self) -> bool {
        self.has_uvs
    }

    pub fn groups(&self) -> &[FaceGroup] {
        &self.groups
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangle_count() as usize).sum()
    }

    /// Draw every face group and return how many were drawn.
    ///
    /// Groups whose material has a normal map use the `BumpMap` program when
    /// `settings` has one and `Standard` otherwise. A group with no program is
    /// skipped without touching uniforms or textures, logged at `debug` only
    /// since it repeats every frame.
    pub fn draw(
        &self,
        vertex_array: &VertexArray,
        settings: &RenderSettings,
        camera_position: &Vec3,
        uniforms: &MeshUniforms<'_>,
    ) -> usize {
        profile_function!();

        for binding in 0..VERTEX_BINDINGS {
            self.vertex_buffer
                .bind_to_attrib(vertex_array, binding, 0, Vertex::SIZE);
        }

        let mut drawn = 0;
        for (index, group) in self.groups.iter().enumerate() {
            group.index_buffer.bind_as_element_buffer(vertex_array);

            let bump_mapped = group.material.has_normal_map();
            let Some(program) = settings.select_program(bump_mapped) else {
                log::debug!(
                    "No program for group {index} of {} (bump mapped: {bump_mapped}), skipping",
                    self.label.as_deref().unwrap_or("mesh")
                );
                continue;
            };
            log::debug!(
                "Drawing group {index} with {:?} ({} indices)",
                program.label(),
                group.index_count
            );

            program.use_program();
            if let Some(model) = uniforms.model {
                program.set_uniform(UNIFORM_MODEL, UniformValue::Mat4(mat4_to_cols(model)));
            }
            if let Some(normal) = uniforms.normal {
                program.set_uniform(UNIFORM_NORMAL, UniformValue::Mat4(mat4_to_cols(normal)));
            }
            if let Some(view_proj) = uniforms.view_proj {
                program.set_uniform(
                    UNIFORM_VIEW_PROJ,
                    UniformValue::Mat4(mat4_to_cols(view_proj)),
                );
            }
            program.set_uniform(
                UNIFORM_CAMERA_POSITION,
                UniformValue::Vec3([camera_position.x, camera_position.y, camera_position.z]),
            );

            match (self.has_uvs, settings.light_model()) {
                (false, light_model) => group.material.bind_no_tex(program, light_model),
                (true, LightModel::BlinnPhong) => group.material.bind_classical(program),
                (true, LightModel::Pbr) => group.material.bind_pbr(program),
            }

            self.device.backend().draw_indexed(
                PrimitiveTopology::TriangleList,
                group.index_count,
                IndexFormat::Uint32,
            );
            drawn += 1;
        }
        drawn
    }
}

impl std::fmt::Debug for Mesh {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("label", &self.label)
            .field("vertex_count", &self.vertex_count)
            .field("has_uvs", &self.has_uvs)
            .field("groups", &self.groups.len())
            .finish()
    }
}

static_assertions::assert_impl_all!(Mesh: Send, Sync);
