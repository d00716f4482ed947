//! # Lumen Graphics
//!
//! GPU half of the Lumen renderer: uploads the meshes produced by
//! [`lumen_core`] and drives per-frame draw submission.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GpuBackend`] - Trait for graphics backend implementations, with a
//!   [`DummyBackend`] that records its calls for testing
//! - [`GraphicsDevice`] - Creates buffers, textures, vertex arrays and programs
//! - [`Material`] - Shading coefficients and maps, bound in classical, PBR or
//!   untextured mode
//! - [`Mesh`] - Vertex buffer plus per-material face groups, with
//!   [`Mesh::draw`] selecting a program variant per group
//! - [`MeshLoader`] and [`TextureCache`] - OBJ and image file loading
//! - [`LightManager`] - Directional, point and spot light uniform blocks
//!
//! ## Example
//!
//! ```ignore
//! use lumen_graphics::*;
//!
//! let device = GraphicsDevice::dummy();
//! let mut textures = TextureCache::new(device.clone());
//! let mut loader = MeshLoader::new(device.clone(), MeshLoaderConfig::default());
//! let id = loader.load("assets/sponza.obj", &mut textures)?;
//!
//! let vao = device.create_vertex_array(&vertex_attributes())?;
//! vao.bind();
//! let drawn = loader.mesh(id).unwrap().draw(&vao, &settings, &camera_pos, &uniforms);
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod lights;
pub mod materials;
pub mod mesh;
pub mod profiling;
pub mod resources;
pub mod shader;
pub mod types;

// Re-export main types for convenience
pub use backend::{DummyBackend, GpuBackend, GpuCommand, UniformValue};
pub use device::{DeviceCapabilities, GraphicsDevice};
pub use error::{AssetError, GraphicsError};
pub use lights::{DirectionalLight, LightManager, PointLight, SpotLight};
pub use materials::{DefaultTextures, GpuMaterial, Material};
pub use mesh::{FaceGroup, Mesh, MeshId, MeshLoader, MeshLoaderConfig, MeshUniforms};
pub use resources::{Buffer, Texture, TextureCache, TextureLoadOptions, TextureRef, VertexArray};
pub use shader::{LightModel, ProgramVariant, RenderSettings, ShaderProgram};
pub use types::{
    BufferDescriptor, BufferUsage, ProgramDescriptor, TextureDescriptor, TextureFormat,
    VertexAttribute, vertex_attributes,
};

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// Logs the library versions. Call once at startup, after the logger.
pub fn init() {
    lumen_core::init();
    log::info!("Lumen Graphics v{} initialized", VERSION);
}
