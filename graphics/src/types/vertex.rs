//! Vertex input description.

use lumen_core::mesh::{
    ATTRIB_LOCATION_NORMAL, ATTRIB_LOCATION_POSITION, ATTRIB_LOCATION_TANGENT,
    ATTRIB_LOCATION_TEX_COORD, Vertex,
};

/// One float vector attribute of an interleaved vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexAttribute {
    /// Shader input location. Also used as the buffer binding point.
    pub location: u32,
    /// Number of `f32` components.
    pub components: u32,
    /// Byte offset of the attribute within a vertex.
    pub relative_offset: u32,
}

impl VertexAttribute {
    pub const fn new(location: u32, components: u32, relative_offset: u32) -> Self {
        Self {
            location,
            components,
            relative_offset,
        }
    }
}

/// Attribute layout of [`Vertex`]: position, normal, uv, and the tangent read
/// together with its handedness as a `vec4`.
pub fn vertex_attributes() -> [VertexAttribute; 4] {
    let [position, normal, tex_coord, tangent] = Vertex::attribute_offsets();
    [
        VertexAttribute::new(ATTRIB_LOCATION_POSITION, 3, position),
        VertexAttribute::new(ATTRIB_LOCATION_NORMAL, 3, normal),
        VertexAttribute::new(ATTRIB_LOCATION_TEX_COORD, 2, tex_coord),
        VertexAttribute::new(ATTRIB_LOCATION_TANGENT, 4, tangent),
    ]
}
