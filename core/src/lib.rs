//! # Lumen Core
//!
//! CPU-side half of the Lumen renderer: OBJ/MTL parsing, vertex
//! deduplication, tangent frames, material descriptors and the fly camera.
//! Nothing in this crate touches the GPU; the graphics crate uploads the
//! [`mesh::CpuMesh`] values produced here.

pub mod camera;
pub mod material;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the library version once at startup.
pub fn init() {
    log::info!("Lumen Core v{} initialized", VERSION);
}
