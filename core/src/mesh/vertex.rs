//! Interleaved vertex format shared by every loaded mesh.

use bytemuck::{Pod, Zeroable};

/// Attribute location of [`Vertex::position`].
pub const ATTRIB_LOCATION_POSITION: u32 = 0;
/// Attribute location of [`Vertex::normal`].
pub const ATTRIB_LOCATION_NORMAL: u32 = 1;
/// Attribute location of [`Vertex::tex_coord`].
pub const ATTRIB_LOCATION_TEX_COORD: u32 = 2;
/// Attribute location of [`Vertex::tangent`] (handedness rides in the same binding).
pub const ATTRIB_LOCATION_TANGENT: u32 = 3;

/// A single mesh vertex.
///
/// Every vertex carries all attributes, even when the source file lacks some
/// of them: missing texture coordinates are written as `(0, 0)`.
///
/// `handedness` is `+1` or `-1` when a tangent frame exists, and `0` when the
/// vertex must be lit with its geometric normal only.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate.
    pub tex_coord: [f32; 2],
    /// Unit tangent after the tangent pass, zero before it.
    pub tangent: [f32; 3],
    /// Bitangent sign.
    pub handedness: f32,
}

impl Vertex {
    /// Size of one vertex in bytes. Also the vertex buffer stride.
    pub const SIZE: u32 = std::mem::size_of::<Self>() as u32;

    /// Create a vertex with a zero tangent frame.
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
            tangent: [0.0; 3],
            handedness: 0.0,
        }
    }

    /// Byte offset of each attribute, indexed by attribute location.
    pub const fn attribute_offsets() -> [u32; 4] {
        [0, 12, 24, 32]
    }
}

static_assertions::const_assert_eq!(std::mem::size_of::<Vertex>(), 48);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_layout() {
        assert_eq!(Vertex::SIZE, 48);
        let v = Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.25]);
        let floats: &[f32] = bytemuck::cast_slice(std::slice::from_ref(&v));
        let offsets = Vertex::attribute_offsets();
        assert_eq!(floats[offsets[ATTRIB_LOCATION_NORMAL as usize] as usize / 4 + 1], 1.0);
        assert_eq!(floats[offsets[ATTRIB_LOCATION_TEX_COORD as usize] as usize / 4], 0.5);
        assert_eq!(floats[11], 0.0);
    }
}
