//! Common utilities for draw dispatch integration tests.
//!
//! Every test runs on a recording [`DummyBackend`] and asserts on the command
//! log it leaves behind.

use std::sync::Arc;

use lumen_core::mesh::Vertex;
use lumen_graphics::backend::TextureId;
use lumen_graphics::{
    DummyBackend, GpuCommand, GraphicsDevice, LightModel, Material, Mesh, ProgramDescriptor,
    ProgramVariant, RenderSettings, ShaderProgram, Texture, TextureDescriptor, TextureFormat,
    TextureRef, VertexArray, vertex_attributes,
};

/// Shared setup: a recording backend, its device, a vertex array and both
/// program variants.
pub struct TestContext {
    pub backend: Arc<DummyBackend>,
    pub device: Arc<GraphicsDevice>,
    pub vertex_array: VertexArray,
    pub standard: Arc<ShaderProgram>,
    pub bump: Arc<ShaderProgram>,
}

impl TestContext {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let backend = Arc::new(DummyBackend::recording());
        let device = GraphicsDevice::new(backend.clone());
        let vertex_array = device
            .create_vertex_array(&vertex_attributes())
            .expect("vertex array");
        let standard = device
            .create_program(
                &ProgramDescriptor::new("shaders/default.vert", "shaders/default.frag")
                    .with_label("standard"),
            )
            .expect("standard program");
        let bump = device
            .create_program(
                &ProgramDescriptor::new("shaders/bump.vert", "shaders/bump.frag")
                    .with_label("bump"),
            )
            .expect("bump program");
        Self {
            backend,
            device,
            vertex_array,
            standard,
            bump,
        }
    }

    /// Settings with both variants registered.
    pub fn settings(&self, light_model: LightModel) -> RenderSettings {
        RenderSettings::new(light_model)
            .with_program(ProgramVariant::Standard, self.standard.clone())
            .with_program(ProgramVariant::BumpMap, self.bump.clone())
    }

    pub fn material(&self) -> Material {
        Material::new(&self.device).expect("material")
    }

    /// A 1x1 texture standing in for a loaded map.
    pub fn texture(&self, rgba: [u8; 4]) -> Arc<Texture> {
        self.device
            .create_texture(
                &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8Unorm),
                &rgba,
            )
            .expect("texture")
    }

    /// A material with a normal map.
    pub fn bump_material(&self, normal_map: &Arc<Texture>) -> Material {
        let mut material = self.material();
        material.normal_map = Some(TextureRef::from(normal_map));
        material
    }

    /// Drain the command log.
    pub fn commands(&self) -> Vec<GpuCommand> {
        self.backend.take_commands()
    }
}

/// Two triangles forming a unit quad in the XY plane.
pub fn quad_vertices() -> Vec<Vertex> {
    vec![
        Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
        Vertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
        Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
    ]
}

pub const FIRST_TRIANGLE: [u32; 3] = [0, 1, 2];
pub const SECOND_TRIANGLE: [u32; 3] = [0, 2, 3];

/// A quad with one triangle per material.
pub fn two_group_quad(ctx: &TestContext, has_uvs: bool, first: Material, second: Material) -> Mesh {
    Mesh::new(
        &ctx.device,
        &quad_vertices(),
        has_uvs,
        vec![(&FIRST_TRIANGLE[..], first), (&SECOND_TRIANGLE[..], second)],
    )
    .expect("mesh")
}

/// `(unit, texture)` of every texture binding, in order.
pub fn texture_bindings(commands: &[GpuCommand]) -> Vec<(u32, TextureId)> {
    commands
        .iter()
        .filter_map(|c| match c {
            GpuCommand::BindTexture { unit, texture } => Some((*unit, *texture)),
            _ => None,
        })
        .collect()
}

/// Locations of every uniform write, in order.
pub fn uniform_locations(commands: &[GpuCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter_map(|c| match c {
            GpuCommand::SetUniform { location, .. } => Some(*location),
            _ => None,
        })
        .collect()
}

/// Index counts of every draw, in order.
pub fn draw_counts(commands: &[GpuCommand]) -> Vec<u32> {
    commands
        .iter()
        .filter_map(|c| match c {
            GpuCommand::DrawIndexed { index_count, .. } => Some(*index_count),
            _ => None,
        })
        .collect()
}

/// Split the log at each `UseProgram`, dropping what comes before the first.
pub fn per_program(commands: &[GpuCommand]) -> Vec<&[GpuCommand]> {
    let starts: Vec<usize> = commands
        .iter()
        .enumerate()
        .filter(|(_, c)| matches!(c, GpuCommand::UseProgram { .. }))
        .map(|(i, _)| i)
        .collect();
    starts
        .iter()
        .enumerate()
        .map(|(n, &start)| {
            let end = starts.get(n + 1).copied().unwrap_or(commands.len());
            &commands[start..end]
        })
        .collect()
}
