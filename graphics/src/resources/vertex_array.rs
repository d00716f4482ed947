//! Vertex array object.

use std::sync::Arc;

use crate::backend::VertexArrayId;
use crate::device::GraphicsDevice;

/// A vertex array: the attribute layout plus the buffers bound to it.
///
/// Created by [`GraphicsDevice::create_vertex_array`]. A mesh binds its
/// buffers into whichever vertex array it is drawn with.
pub struct VertexArray {
    device: Arc<GraphicsDevice>,
    id: VertexArrayId,
}

impl VertexArray {
    pub(crate) fn new(device: Arc<GraphicsDevice>, id: VertexArrayId) -> Self {
        Self { device, id }
    }

    pub fn id(&self) -> VertexArrayId {
        self.id
    }

    /// Make current for subsequent draws.
    pub fn bind(&self) {
        self.device.backend().bind_vertex_array(self.id);
    }
}

impl Drop for VertexArray {
    fn drop(&mut self) {
        self.device.backend().destroy_vertex_array(self.id);
    }
}

impl std::fmt::Debug for VertexArray {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexArray").field("id", &self.id).finish()
    }
}

static_assertions::assert_impl_all!(VertexArray: Send, Sync);
