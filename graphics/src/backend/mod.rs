//! GPU backend abstraction layer.
//!
//! This module provides a trait-based abstraction for GPU backends,
//! allowing the graphics crate to work with different GPU APIs.
//!
//! # Architecture
//!
//! The model is immediate mode, close to OpenGL 4.5 direct state access:
//! resources are identified by opaque handles, uniforms are written to
//! explicit locations of a program, textures are bound to numbered units and
//! draws consume whatever state was bound last.
//!
//! Each backend implements the [`GpuBackend`] trait, which provides:
//! - Resource creation and destruction (buffers, textures, vertex arrays, programs)
//! - State binding (attribute/element/uniform buffers, texture units, programs)
//! - Indexed draw submission
//!
//! # Available Backends
//!
//! - [`DummyBackend`]: no GPU work; logs every call and can record a command
//!   log for inspection in tests.

pub mod dummy;

use lumen_core::mesh::{IndexFormat, PrimitiveTopology};

use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, ProgramDescriptor, TextureDescriptor, VertexAttribute};

pub use dummy::{DummyBackend, GpuCommand};

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw backend identifier.
            pub fn raw(self) -> u64 {
                self.0
            }
        }
    };
}

gpu_handle!(
    /// Backend handle of a buffer.
    BufferId
);
gpu_handle!(
    /// Backend handle of a texture.
    TextureId
);
gpu_handle!(
    /// Backend handle of a vertex array object.
    VertexArrayId
);
gpu_handle!(
    /// Backend handle of a linked shader program.
    ProgramId
);

/// A value written to a uniform location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// Column-major 4x4 matrix.
    Mat4([f32; 16]),
    Vec3([f32; 3]),
    Float(f32),
    Int(i32),
}

/// GPU backend trait for abstracting different GPU APIs.
///
/// Handles returned by `create_*` stay valid until the matching `destroy_*`
/// call. Binding calls on destroyed handles are undefined at the API level;
/// the resource wrappers in [`crate::resources`] rule them out.
pub trait GpuBackend: Send + Sync + 'static {
    /// Get the backend name.
    fn name(&self) -> &'static str;

    /// Create a buffer of `descriptor.size` bytes, optionally initialized.
    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<BufferId, GraphicsError>;

    /// Write `data` at `offset`. The range has been validated by the caller.
    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]);

    fn destroy_buffer(&self, buffer: BufferId);

    /// Create a texture from tightly packed RGBA8 level 0 data and generate
    /// the remaining mip levels.
    fn create_texture(
        &self,
        descriptor: &TextureDescriptor,
        rgba8: &[u8],
    ) -> Result<TextureId, GraphicsError>;

    fn destroy_texture(&self, texture: TextureId);

    /// Create a vertex array with the given float attributes enabled, each
    /// bound to the binding point equal to its location.
    fn create_vertex_array(
        &self,
        attributes: &[VertexAttribute],
    ) -> Result<VertexArrayId, GraphicsError>;

    fn destroy_vertex_array(&self, vertex_array: VertexArrayId);

    /// Make a vertex array current for subsequent draws.
    fn bind_vertex_array(&self, vertex_array: VertexArrayId);

    /// Compile and link a program.
    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramId, GraphicsError>;

    fn destroy_program(&self, program: ProgramId);

    /// Attach a vertex buffer to a binding point of a vertex array.
    fn bind_vertex_buffer(
        &self,
        vertex_array: VertexArrayId,
        binding: u32,
        buffer: BufferId,
        offset: u64,
        stride: u32,
    );

    /// Attach an element buffer to a vertex array.
    fn bind_element_buffer(&self, vertex_array: VertexArrayId, buffer: BufferId);

    /// Bind a buffer range to a uniform block binding point.
    fn bind_uniform_buffer(&self, index: u32, buffer: BufferId, offset: u64, size: u64);

    /// Make a program current for subsequent draws.
    fn use_program(&self, program: ProgramId);

    /// Write a uniform of a program, current or not.
    fn set_uniform(&self, program: ProgramId, location: u32, value: UniformValue);

    /// Bind a texture to a texture unit.
    fn bind_texture_unit(&self, unit: u32, texture: TextureId);

    /// Draw `index_count` indices from the current element buffer.
    fn draw_indexed(&self, topology: PrimitiveTopology, index_count: u32, format: IndexFormat);
}
