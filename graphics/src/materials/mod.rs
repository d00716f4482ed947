//! GPU-side materials.
//!
//! A [`Material`] holds shading coefficients and optional texture maps, and
//! knows how to bind itself to a program in each shading mode. Missing maps
//! are replaced by the shared [`DefaultTextures`].

mod defaults;
mod material;

pub use defaults::{BLACK_PIXEL, DefaultTextures, FLAT_NORMAL_PIXEL, WHITE_PIXEL};
pub use material::{
    GpuMaterial, Material, TEXTURE_UNIT_ALBEDO, TEXTURE_UNIT_AMBIENT, TEXTURE_UNIT_BUMP,
    TEXTURE_UNIT_DIFFUSE, TEXTURE_UNIT_EMISSIVE, TEXTURE_UNIT_MASK, TEXTURE_UNIT_METALLIC,
    TEXTURE_UNIT_ROUGHNESS, TEXTURE_UNIT_SPECULAR,
};
