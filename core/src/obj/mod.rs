//! Wavefront OBJ import.
//!
//! Loading happens in two phases:
//! - [`parse_obj`] / [`parse_mtl`] read the text with `tobj` and convert it
//!   into [`ObjData`] and
//!   [`MaterialDescriptor`](crate::material::MaterialDescriptor)s;
//! - [`build_mesh`] validates the parsed data, deduplicates face corners by
//!   their `(position, normal, texcoord)` index triple and builds tangent
//!   frames, producing a frozen [`CpuMesh`](crate::mesh::CpuMesh).
//!
//! [`load_obj`] runs both phases for a file on disk.
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::obj::load_obj;
//!
//! let model = load_obj("assets/sponza.obj")?;
//! for group in model.mesh.groups() {
//!     let material = model.group_material(group);
//!     println!("{}: {} triangles", material.name, group.triangle_count());
//! }
//! ```

mod error;
mod loader;
pub mod mtl;
pub mod parser;

#[cfg(test)]
mod tests;

pub use error::{LoadError, ObjError, ParseError};
pub use loader::{ObjModel, ObjStats, build_mesh, load_obj, load_obj_buf};
pub use mtl::parse_mtl;
pub use parser::{ObjData, ObjIndex, ObjShape, parse_obj};
