//! Graphics device.
//!
//! The [`GraphicsDevice`] is the main interface for creating GPU resources.
//! It wraps a [`GpuBackend`] and is shared through `Arc` by every resource it
//! creates.

use std::sync::{Arc, RwLock, Weak};

use parking_lot::Mutex;

use crate::backend::{DummyBackend, GpuBackend};
use crate::error::GraphicsError;
use crate::materials::DefaultTextures;
use crate::resources::{Buffer, Texture, VertexArray};
use crate::shader::ShaderProgram;
use crate::types::{BufferDescriptor, ProgramDescriptor, TextureDescriptor, VertexAttribute};

/// Capabilities of a graphics device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCapabilities {
    /// Maximum texture dimension.
    pub max_texture_dimension: u32,
    /// Maximum buffer size.
    pub max_buffer_size: u64,
    /// Required alignment of uniform buffer binding offsets.
    pub uniform_buffer_offset_alignment: u64,
    /// Number of texture units.
    pub max_texture_units: u32,
}

impl Default for DeviceCapabilities {
    fn default() -> Self {
        Self {
            max_texture_dimension: 16384,
            max_buffer_size: 1 << 30, // 1 GB
            uniform_buffer_offset_alignment: 256,
            max_texture_units: 16,
        }
    }
}

/// A graphics device for creating GPU resources.
///
/// # Thread Safety
///
/// `GraphicsDevice` is `Send + Sync` and can be safely shared across threads.
/// All resource creation methods use interior mutability where needed.
///
/// # Example
///
/// ```ignore
/// let device = GraphicsDevice::new(Arc::new(DummyBackend::new()));
///
/// let buffer = device.create_buffer(
///     &BufferDescriptor::new(1024, BufferUsage::VERTEX),
///     Some(&bytes),
/// )?;
/// ```
pub struct GraphicsDevice {
    backend: Arc<dyn GpuBackend>,
    capabilities: DeviceCapabilities,
    // Track allocated resources (weak references for cleanup/debugging)
    buffers: RwLock<Vec<Weak<Buffer>>>,
    textures: RwLock<Vec<Weak<Texture>>>,
    // Shared by every live material; recreated on demand once all are gone.
    default_textures: Mutex<Weak<DefaultTextures>>,
}

impl GraphicsDevice {
    /// Create a device on top of a backend.
    pub fn new(backend: Arc<dyn GpuBackend>) -> Arc<Self> {
        log::debug!("GraphicsDevice: created on {}", backend.name());
        Arc::new(Self {
            backend,
            capabilities: DeviceCapabilities::default(),
            buffers: RwLock::new(Vec::new()),
            textures: RwLock::new(Vec::new()),
            default_textures: Mutex::new(Weak::new()),
        })
    }

    /// Create a device on a fresh [`DummyBackend`].
    pub fn dummy() -> Arc<Self> {
        Self::new(Arc::new(DummyBackend::new()))
    }

    /// Get the backend.
    pub fn backend(&self) -> &Arc<dyn GpuBackend> {
        &self.backend
    }

    /// Get the device name.
    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    /// Get the device capabilities.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Create a GPU buffer, optionally filled with `data`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::ZeroSizedBuffer`] for a size of 0,
    /// [`GraphicsError::InvalidParameter`] if the size exceeds device limits
    /// or `data` does not match the size.
    pub fn create_buffer(
        self: &Arc<Self>,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<Arc<Buffer>, GraphicsError> {
        if descriptor.size == 0 {
            return Err(GraphicsError::ZeroSizedBuffer {
                label: descriptor.label.clone(),
            });
        }

        if descriptor.size > self.capabilities.max_buffer_size {
            return Err(GraphicsError::InvalidParameter(format!(
                "buffer size {} exceeds maximum {}",
                descriptor.size, self.capabilities.max_buffer_size
            )));
        }

        if let Some(data) = data
            && data.len() as u64 != descriptor.size
        {
            return Err(GraphicsError::InvalidParameter(format!(
                "initial data of {} bytes for buffer of {} bytes",
                data.len(),
                descriptor.size
            )));
        }

        let id = self.backend.create_buffer(descriptor, data)?;
        let buffer = Arc::new(Buffer::new(Arc::clone(self), id, descriptor.clone()));

        // Track it
        if let Ok(mut buffers) = self.buffers.write() {
            buffers.retain(|b| b.strong_count() > 0);
            buffers.push(Arc::downgrade(&buffer));
        }

        log::trace!(
            "GraphicsDevice: created buffer {:?}, size={}",
            descriptor.label,
            descriptor.size
        );

        Ok(buffer)
    }

    /// Create a 2D RGBA8 texture from level 0 data.
    ///
    /// # Errors
    ///
    /// Returns an error if a dimension is zero or exceeds device limits, or
    /// if `rgba8` does not hold exactly `width * height` pixels.
    pub fn create_texture(
        self: &Arc<Self>,
        descriptor: &TextureDescriptor,
        rgba8: &[u8],
    ) -> Result<Arc<Texture>, GraphicsError> {
        if descriptor.width == 0 || descriptor.height == 0 {
            return Err(GraphicsError::InvalidParameter(
                "texture dimensions cannot be zero".to_string(),
            ));
        }

        let max_dim = self.capabilities.max_texture_dimension;
        if descriptor.width > max_dim || descriptor.height > max_dim {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture dimension exceeds maximum {max_dim}"
            )));
        }

        if rgba8.len() != descriptor.base_level_size() {
            return Err(GraphicsError::InvalidParameter(format!(
                "texture data of {} bytes for a {}x{} RGBA8 image",
                rgba8.len(),
                descriptor.width,
                descriptor.height
            )));
        }

        let id = self.backend.create_texture(descriptor, rgba8)?;
        let texture = Arc::new(Texture::new(Arc::clone(self), id, descriptor.clone()));

        if let Ok(mut textures) = self.textures.write() {
            textures.retain(|t| t.strong_count() > 0);
            textures.push(Arc::downgrade(&texture));
        }

        log::trace!(
            "GraphicsDevice: created texture {:?}, size={}x{}",
            descriptor.label,
            descriptor.width,
            descriptor.height
        );

        Ok(texture)
    }

    /// Create a vertex array object describing `attributes`.
    pub fn create_vertex_array(
        self: &Arc<Self>,
        attributes: &[VertexAttribute],
    ) -> Result<VertexArray, GraphicsError> {
        let id = self.backend.create_vertex_array(attributes)?;
        Ok(VertexArray::new(Arc::clone(self), id))
    }

    /// Compile and link a shader program.
    pub fn create_program(
        self: &Arc<Self>,
        descriptor: &ProgramDescriptor,
    ) -> Result<Arc<ShaderProgram>, GraphicsError> {
        let id = self.backend.create_program(descriptor)?;
        log::debug!("GraphicsDevice: created program {:?}", descriptor.label);
        Ok(Arc::new(ShaderProgram::new(
            Arc::clone(self),
            id,
            descriptor.clone(),
        )))
    }

    /// The shared default textures, created if no material holds them.
    pub(crate) fn default_textures(
        self: &Arc<Self>,
    ) -> Result<Arc<DefaultTextures>, GraphicsError> {
        let mut slot = self.default_textures.lock();
        if let Some(defaults) = slot.upgrade() {
            return Ok(defaults);
        }
        let defaults = Arc::new(DefaultTextures::new(self)?);
        *slot = Arc::downgrade(&defaults);
        log::debug!("GraphicsDevice: created default textures");
        Ok(defaults)
    }

    /// Whether the default textures currently exist.
    pub fn has_default_textures(&self) -> bool {
        self.default_textures.lock().strong_count() > 0
    }

    /// Number of live buffers created through this device.
    pub fn live_buffer_count(&self) -> usize {
        self.buffers
            .read()
            .map(|b| b.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }

    /// Number of live textures created through this device.
    pub fn live_texture_count(&self) -> usize {
        self.textures
            .read()
            .map(|t| t.iter().filter(|w| w.strong_count() > 0).count())
            .unwrap_or(0)
    }
}

impl std::fmt::Debug for GraphicsDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsDevice")
            .field("backend", &self.backend.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

// Ensure GraphicsDevice is Send + Sync
static_assertions::assert_impl_all!(GraphicsDevice: Send, Sync);
