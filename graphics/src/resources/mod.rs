//! GPU resources.
//!
//! This module contains the GPU resource types that are created by [`GraphicsDevice`]:
//! - [`Buffer`] - GPU memory buffer
//! - [`Texture`] - GPU texture/image
//! - [`VertexArray`] - attribute layout with bound vertex and element buffers
//! - [`TextureCache`] - loads image files into textures once per path
//!
//! Resources hold a strong reference to their parent device and release their
//! backend object on drop.
//!
//! [`GraphicsDevice`]: crate::GraphicsDevice

mod buffer;
mod texture;
mod texture_cache;
mod vertex_array;

pub use buffer::Buffer;
pub use texture::Texture;
pub use texture_cache::{TextureCache, TextureLoadOptions, TextureRef};
pub use vertex_array::VertexArray;
