//! CPU-side mesh types.
//!
//! - [`Vertex`] - The interleaved vertex format
//! - [`CpuMesh`] / [`CpuFaceGroup`] - Loaded geometry, grouped by material
//! - [`tangent`] - Tangent frame construction for bump mapping

mod data;
pub mod tangent;
mod vertex;

pub use data::{CpuFaceGroup, CpuMesh, IndexFormat, PrimitiveTopology};
pub use tangent::{TangentReport, build_tangents};
pub use vertex::{
    ATTRIB_LOCATION_NORMAL, ATTRIB_LOCATION_POSITION, ATTRIB_LOCATION_TANGENT,
    ATTRIB_LOCATION_TEX_COORD, Vertex,
};
