//! CPU-side mesh data structures.
//!
//! This module provides:
//! - [`PrimitiveTopology`] - How vertices are assembled into primitives
//! - [`IndexFormat`] - Index data format
//! - [`CpuFaceGroup`] - Triangles sharing one material slot
//! - [`CpuMesh`] - A finished vertex array plus its face groups

use super::Vertex;

/// Primitive topology describing how vertices are assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PrimitiveTopology {
    /// Every three vertices form a triangle.
    #[default]
    TriangleList,
    /// Every two vertices form a line.
    LineList,
}

/// Index format for indexed drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IndexFormat {
    /// 16-bit unsigned integers.
    Uint16,
    /// 32-bit unsigned integers. Loaded meshes always use this.
    #[default]
    Uint32,
}

impl IndexFormat {
    /// Get the size in bytes of each index.
    pub fn size(&self) -> usize {
        match self {
            Self::Uint16 => 2,
            Self::Uint32 => 4,
        }
    }
}

/// The triangles of a mesh that share one source material.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuFaceGroup {
    /// Index into the source material table.
    pub material: usize,
    /// Triangle list indices into [`CpuMesh::vertices`].
    pub indices: Vec<u32>,
    /// Whether the source material carries a bump map, so tangents were built
    /// for these triangles.
    pub bump_mapped: bool,
}

impl CpuFaceGroup {
    /// Number of triangles in the group.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A loaded mesh, ready for upload.
///
/// `CpuMesh` is the frozen result of the loading phase: the vertex array has
/// been deduplicated and its tangent frames computed. Nothing mutates it
/// afterwards; the GPU mesh is built from it in one step.
#[derive(Debug, Clone, PartialEq)]
pub struct CpuMesh {
    vertices: Vec<Vertex>,
    groups: Vec<CpuFaceGroup>,
    has_uvs: bool,
    label: Option<String>,
}

impl CpuMesh {
    /// Freeze a vertex array and its face groups.
    ///
    /// Groups without triangles are dropped.
    pub fn new(vertices: Vec<Vertex>, groups: Vec<CpuFaceGroup>, has_uvs: bool) -> Self {
        let groups = groups
            .into_iter()
            .filter(|g| !g.indices.is_empty())
            .collect();
        Self {
            vertices,
            groups,
            has_uvs,
            label: None,
        }
    }

    /// Set a debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The deduplicated vertices.
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Face groups in material order.
    pub fn groups(&self) -> &[CpuFaceGroup] {
        &self.groups
    }

    /// Whether the source provided texture coordinates.
    pub fn has_uvs(&self) -> bool {
        self.has_uvs
    }

    /// Debug label, if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Total number of triangles over all groups.
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(CpuFaceGroup::triangle_count).sum()
    }

    /// Vertex data as bytes.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
