//! GPU texture resource.

use std::sync::Arc;

use crate::backend::TextureId;
use crate::device::GraphicsDevice;
use crate::types::{TextureDescriptor, TextureFormat};

/// A GPU texture resource.
///
/// Textures are created by [`GraphicsDevice::create_texture`] and are reference-counted.
/// They hold a strong reference to their parent device, keeping it alive.
///
/// # Example
///
/// ```ignore
/// let texture = device.create_texture(
///     &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8Unorm),
///     &[255, 255, 255, 255],
/// )?;
/// texture.bind(0);
/// ```
pub struct Texture {
    device: Arc<GraphicsDevice>,
    id: TextureId,
    descriptor: TextureDescriptor,
}

impl Texture {
    /// Create a new texture (called by GraphicsDevice).
    pub(crate) fn new(
        device: Arc<GraphicsDevice>,
        id: TextureId,
        descriptor: TextureDescriptor,
    ) -> Self {
        Self {
            device,
            id,
            descriptor,
        }
    }

    /// Get the parent device.
    pub fn device(&self) -> &Arc<GraphicsDevice> {
        &self.device
    }

    /// Get the backend handle.
    pub fn id(&self) -> TextureId {
        self.id
    }

    /// Get the texture descriptor.
    pub fn descriptor(&self) -> &TextureDescriptor {
        &self.descriptor
    }

    /// Get the texture width.
    pub fn width(&self) -> u32 {
        self.descriptor.width
    }

    /// Get the texture height.
    pub fn height(&self) -> u32 {
        self.descriptor.height
    }

    /// Get the texture format.
    pub fn format(&self) -> TextureFormat {
        self.descriptor.format
    }

    /// Get the number of mip levels.
    pub fn mip_level_count(&self) -> u32 {
        self.descriptor.mip_level_count
    }

    /// Get the texture label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Bind to a texture unit.
    pub fn bind(&self, unit: u32) {
        self.device.backend().bind_texture_unit(unit, self.id);
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        self.device.backend().destroy_texture(self.id);
    }
}

impl std::fmt::Debug for Texture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("width", &self.descriptor.width)
            .field("height", &self.descriptor.height)
            .field("format", &self.descriptor.format)
            .field("mip_level_count", &self.descriptor.mip_level_count)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Texture is Send + Sync
static_assertions::assert_impl_all!(Texture: Send, Sync);
