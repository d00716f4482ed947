//! Fallback textures bound in place of missing material maps.

use std::sync::Arc;

use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::Texture;
use crate::types::{TextureDescriptor, TextureFormat};

/// Opaque white.
pub const WHITE_PIXEL: [u8; 4] = [255, 255, 255, 255];
/// Opaque black.
pub const BLACK_PIXEL: [u8; 4] = [0, 0, 0, 255];
/// Tangent-space normal map texel for an unperturbed normal.
pub const FLAT_NORMAL_PIXEL: [u8; 4] = [0, 0, 255, 255];

/// The three 1x1 fallback textures.
///
/// One set exists per device while any [`Material`](super::Material) is alive;
/// materials share it through an `Arc` and the device keeps only a `Weak`.
pub struct DefaultTextures {
    white: Arc<Texture>,
    black: Arc<Texture>,
    flat: Arc<Texture>,
}

impl DefaultTextures {
    pub(crate) fn new(device: &Arc<GraphicsDevice>) -> Result<Self, GraphicsError> {
        let pixel = |label: &str, rgba: [u8; 4]| {
            device.create_texture(
                &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8Unorm).with_label(label),
                &rgba,
            )
        };
        Ok(Self {
            white: pixel("default_white", WHITE_PIXEL)?,
            black: pixel("default_black", BLACK_PIXEL)?,
            flat: pixel("default_flat_normal", FLAT_NORMAL_PIXEL)?,
        })
    }

    pub fn white(&self) -> &Arc<Texture> {
        &self.white
    }

    pub fn black(&self) -> &Arc<Texture> {
        &self.black
    }

    pub fn flat(&self) -> &Arc<Texture> {
        &self.flat
    }
}

impl Drop for DefaultTextures {
    fn drop(&mut self) {
        log::debug!("Releasing default material textures");
    }
}

impl std::fmt::Debug for DefaultTextures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTextures")
            .field("white", &self.white.id())
            .field("black", &self.black.id())
            .field("flat", &self.flat.id())
            .finish()
    }
}

static_assertions::assert_impl_all!(DefaultTextures: Send, Sync);
