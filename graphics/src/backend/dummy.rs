//! Dummy GPU backend for testing and development.
//!
//! This backend doesn't perform actual GPU operations but provides
//! a valid implementation for testing the graphics API without
//! requiring GPU hardware. Every call is logged at `trace` level.
//!
//! A backend built with [`DummyBackend::recording`] additionally appends every
//! state-changing call to a command log, which tests inspect with
//! [`DummyBackend::take_commands`].

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use lumen_core::mesh::{IndexFormat, PrimitiveTopology};
use parking_lot::Mutex;

use crate::error::GraphicsError;
use crate::types::{BufferDescriptor, ProgramDescriptor, TextureDescriptor, VertexAttribute};

use super::{BufferId, GpuBackend, ProgramId, TextureId, UniformValue, VertexArrayId};

/// A recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum GpuCommand {
    WriteBuffer {
        buffer: BufferId,
        offset: u64,
        data: Vec<u8>,
    },
    BindVertexArray {
        vertex_array: VertexArrayId,
    },
    BindVertexBuffer {
        vertex_array: VertexArrayId,
        binding: u32,
        buffer: BufferId,
        offset: u64,
        stride: u32,
    },
    BindElementBuffer {
        vertex_array: VertexArrayId,
        buffer: BufferId,
    },
    BindUniformBuffer {
        index: u32,
        buffer: BufferId,
        offset: u64,
        size: u64,
    },
    UseProgram {
        program: ProgramId,
    },
    SetUniform {
        program: ProgramId,
        location: u32,
        value: UniformValue,
    },
    BindTexture {
        unit: u32,
        texture: TextureId,
    },
    DrawIndexed {
        topology: PrimitiveTopology,
        index_count: u32,
        format: IndexFormat,
    },
}

/// Dummy GPU backend.
#[derive(Debug)]
pub struct DummyBackend {
    next_id: AtomicU64,
    live_buffers: AtomicUsize,
    live_textures: AtomicUsize,
    live_vertex_arrays: AtomicUsize,
    live_programs: AtomicUsize,
    commands: Option<Mutex<Vec<GpuCommand>>>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            live_buffers: AtomicUsize::new(0),
            live_textures: AtomicUsize::new(0),
            live_vertex_arrays: AtomicUsize::new(0),
            live_programs: AtomicUsize::new(0),
            commands: None,
        }
    }

    /// Create a dummy backend that records a command log.
    pub fn recording() -> Self {
        Self {
            commands: Some(Mutex::new(Vec::new())),
            ..Self::new()
        }
    }

    /// Drain the command log. Empty if the backend is not recording.
    pub fn take_commands(&self) -> Vec<GpuCommand> {
        self.commands
            .as_ref()
            .map(|log| std::mem::take(&mut *log.lock()))
            .unwrap_or_default()
    }

    /// Number of buffers created and not yet destroyed.
    pub fn live_buffers(&self) -> usize {
        self.live_buffers.load(Ordering::Relaxed)
    }

    /// Number of textures created and not yet destroyed.
    pub fn live_textures(&self) -> usize {
        self.live_textures.load(Ordering::Relaxed)
    }

    /// Number of vertex arrays created and not yet destroyed.
    pub fn live_vertex_arrays(&self) -> usize {
        self.live_vertex_arrays.load(Ordering::Relaxed)
    }

    /// Number of programs created and not yet destroyed.
    pub fn live_programs(&self) -> usize {
        self.live_programs.load(Ordering::Relaxed)
    }

    fn allocate(&self, live: &AtomicUsize) -> u64 {
        live.fetch_add(1, Ordering::Relaxed);
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn release(live: &AtomicUsize) {
        live.fetch_sub(1, Ordering::Relaxed);
    }

    fn record(&self, command: GpuCommand) {
        if let Some(log) = &self.commands {
            log.lock().push(command);
        }
    }
}

impl Default for DummyBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GpuBackend for DummyBackend {
    fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    fn create_buffer(
        &self,
        descriptor: &BufferDescriptor,
        data: Option<&[u8]>,
    ) -> Result<BufferId, GraphicsError> {
        let id = BufferId(self.allocate(&self.live_buffers));
        log::trace!(
            "DummyBackend: creating buffer {:?} (size: {}, initialized: {}) -> {}",
            descriptor.label,
            descriptor.size,
            data.is_some(),
            id.0
        );
        Ok(id)
    }

    fn write_buffer(&self, buffer: BufferId, offset: u64, data: &[u8]) {
        log::trace!(
            "DummyBackend: write_buffer {} offset={} len={}",
            buffer.0,
            offset,
            data.len()
        );
        self.record(GpuCommand::WriteBuffer {
            buffer,
            offset,
            data: data.to_vec(),
        });
    }

    fn destroy_buffer(&self, buffer: BufferId) {
        log::trace!("DummyBackend: destroying buffer {}", buffer.0);
        Self::release(&self.live_buffers);
    }

    fn create_texture(
        &self,
        descriptor: &TextureDescriptor,
        rgba8: &[u8],
    ) -> Result<TextureId, GraphicsError> {
        let id = TextureId(self.allocate(&self.live_textures));
        log::trace!(
            "DummyBackend: creating texture {:?} ({}x{}, {} levels, {:?}, {} bytes) -> {}",
            descriptor.label,
            descriptor.width,
            descriptor.height,
            descriptor.mip_level_count,
            descriptor.format,
            rgba8.len(),
            id.0
        );
        Ok(id)
    }

    fn destroy_texture(&self, texture: TextureId) {
        log::trace!("DummyBackend: destroying texture {}", texture.0);
        Self::release(&self.live_textures);
    }

    fn create_vertex_array(
        &self,
        attributes: &[VertexAttribute],
    ) -> Result<VertexArrayId, GraphicsError> {
        let id = VertexArrayId(self.allocate(&self.live_vertex_arrays));
        log::trace!(
            "DummyBackend: creating vertex array with {} attributes -> {}",
            attributes.len(),
            id.0
        );
        Ok(id)
    }

    fn destroy_vertex_array(&self, vertex_array: VertexArrayId) {
        log::trace!("DummyBackend: destroying vertex array {}", vertex_array.0);
        Self::release(&self.live_vertex_arrays);
    }

    fn bind_vertex_array(&self, vertex_array: VertexArrayId) {
        log::trace!("DummyBackend: bind_vertex_array {}", vertex_array.0);
        self.record(GpuCommand::BindVertexArray { vertex_array });
    }

    fn create_program(&self, descriptor: &ProgramDescriptor) -> Result<ProgramId, GraphicsError> {
        let id = ProgramId(self.allocate(&self.live_programs));
        log::trace!(
            "DummyBackend: creating program {:?} ({} stages) -> {}",
            descriptor.label,
            descriptor.sources.len(),
            id.0
        );
        Ok(id)
    }

    fn destroy_program(&self, program: ProgramId) {
        log::trace!("DummyBackend: destroying program {}", program.0);
        Self::release(&self.live_programs);
    }

    fn bind_vertex_buffer(
        &self,
        vertex_array: VertexArrayId,
        binding: u32,
        buffer: BufferId,
        offset: u64,
        stride: u32,
    ) {
        log::trace!(
            "DummyBackend: bind_vertex_buffer vao={} binding={} buffer={} offset={} stride={}",
            vertex_array.0,
            binding,
            buffer.0,
            offset,
            stride
        );
        self.record(GpuCommand::BindVertexBuffer {
            vertex_array,
            binding,
            buffer,
            offset,
            stride,
        });
    }

    fn bind_element_buffer(&self, vertex_array: VertexArrayId, buffer: BufferId) {
        log::trace!(
            "DummyBackend: bind_element_buffer vao={} buffer={}",
            vertex_array.0,
            buffer.0
        );
        self.record(GpuCommand::BindElementBuffer {
            vertex_array,
            buffer,
        });
    }

    fn bind_uniform_buffer(&self, index: u32, buffer: BufferId, offset: u64, size: u64) {
        log::trace!(
            "DummyBackend: bind_uniform_buffer index={} buffer={} offset={} size={}",
            index,
            buffer.0,
            offset,
            size
        );
        self.record(GpuCommand::BindUniformBuffer {
            index,
            buffer,
            offset,
            size,
        });
    }

    fn use_program(&self, program: ProgramId) {
        log::trace!("DummyBackend: use_program {}", program.0);
        self.record(GpuCommand::UseProgram { program });
    }

    fn set_uniform(&self, program: ProgramId, location: u32, value: UniformValue) {
        log::trace!(
            "DummyBackend: set_uniform program={} location={} {:?}",
            program.0,
            location,
            value
        );
        self.record(GpuCommand::SetUniform {
            program,
            location,
            value,
        });
    }

    fn bind_texture_unit(&self, unit: u32, texture: TextureId) {
        log::trace!("DummyBackend: bind_texture_unit unit={} texture={}", unit, texture.0);
        self.record(GpuCommand::BindTexture { unit, texture });
    }

    fn draw_indexed(&self, topology: PrimitiveTopology, index_count: u32, format: IndexFormat) {
        log::trace!(
            "DummyBackend: draw_indexed {:?} count={} format={:?}",
            topology,
            index_count,
            format
        );
        self.record(GpuCommand::DrawIndexed {
            topology,
            index_count,
            format,
        });
    }
}
