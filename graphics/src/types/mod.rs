//! Common types and descriptors for graphics resources.
//!
//! This module contains format enums, usage flags, and descriptor structs
//! used throughout the graphics system.

mod buffer;
mod program;
mod texture;
mod vertex;

pub use buffer::{BufferDescriptor, BufferUsage};
pub use program::{ProgramDescriptor, ShaderSource, ShaderStage};
pub use texture::{TextureDescriptor, TextureFormat, full_mip_chain_len};
pub use vertex::{VertexAttribute, vertex_attributes};
