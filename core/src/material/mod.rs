//! CPU-side material types.
//!
//! Provides [`MaterialDescriptor`] (what a material library declares),
//! [`TextureSlot`] and [`ColorSpace`].

mod types;

pub use types::{ColorSpace, MaterialDescriptor, TextureSlot};
