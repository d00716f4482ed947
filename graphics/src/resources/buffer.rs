//! GPU buffer resource.

use std::sync::Arc;

use crate::backend::BufferId;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::VertexArray;
use crate::types::BufferDescriptor;

/// A GPU buffer resource.
///
/// Buffers are created by [`GraphicsDevice::create_buffer`] and are reference-counted.
/// They hold a strong reference to their parent device, keeping it alive, and
/// release the backend buffer when the last reference is dropped.
///
/// # Example
///
/// ```ignore
/// let buffer = device.create_buffer(&BufferDescriptor::new(1024, BufferUsage::VERTEX), None)?;
/// buffer.set_data(0, &bytes)?;
/// ```
pub struct Buffer {
    device: Arc<GraphicsDevice>,
    id: BufferId,
    descriptor: BufferDescriptor,
}

impl Buffer {
    /// Create a new buffer (called by GraphicsDevice).
    pub(crate) fn new(device: Arc<GraphicsDevice>, id: BufferId, descriptor: BufferDescriptor) -> Self {
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
    pub fn id(&self) -> BufferId {
        self.id
    }

    /// Get the buffer descriptor.
    pub fn descriptor(&self) -> &BufferDescriptor {
        &self.descriptor
    }

    /// Get the buffer size in bytes.
    pub fn size(&self) -> u64 {
        self.descriptor.size
    }

    /// Get the buffer label, if set.
    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Overwrite `data.len()` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::BufferOverflow`] if the range does not fit the buffer.
    pub fn set_data(&self, offset: u64, data: &[u8]) -> Result<(), GraphicsError> {
        let len = data.len() as u64;
        if offset.checked_add(len).is_none_or(|end| end > self.size()) {
            return Err(GraphicsError::BufferOverflow {
                offset,
                len,
                size: self.size(),
            });
        }
        self.device.backend().write_buffer(self.id, offset, data);
        Ok(())
    }

    /// Attach this buffer to a vertex binding point of `vertex_array`.
    pub fn bind_to_attrib(&self, vertex_array: &VertexArray, binding: u32, offset: u64, stride: u32) {
        self.device
            .backend()
            .bind_vertex_buffer(vertex_array.id(), binding, self.id, offset, stride);
    }

    /// Attach this buffer as the element buffer of `vertex_array`.
    pub fn bind_as_element_buffer(&self, vertex_array: &VertexArray) {
        self.device
            .backend()
            .bind_element_buffer(vertex_array.id(), self.id);
    }

    /// Bind `size` bytes at `offset` to uniform block binding `index`.
    ///
    /// # Errors
    ///
    /// [`GraphicsError::InvalidParameter`] if `offset` is not aligned to the
    /// device's uniform offset alignment or the range leaves the buffer.
    pub fn bind_to_uniform(&self, index: u32, offset: u64, size: u64) -> Result<(), GraphicsError> {
        let alignment = self.device.capabilities().uniform_buffer_offset_alignment;
        if offset % alignment != 0 {
            return Err(GraphicsError::InvalidParameter(format!(
                "uniform offset {offset} is not a multiple of {alignment}"
            )));
        }
        if offset.checked_add(size).is_none_or(|end| end > self.size()) {
            return Err(GraphicsError::InvalidParameter(format!(
                "uniform range {offset}+{size} exceeds buffer of {} bytes",
                self.size()
            )));
        }
        self.device
            .backend()
            .bind_uniform_buffer(index, self.id, offset, size);
        Ok(())
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        self.device.backend().destroy_buffer(self.id);
    }
}

impl std::fmt::Debug for Buffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Buffer")
            .field("id", &self.id)
            .field("size", &self.descriptor.size)
            .field("usage", &self.descriptor.usage)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

// Ensure Buffer is Send + Sync
static_assertions::assert_impl_all!(Buffer: Send, Sync);
