//! Shader programs and the per-light-model program registry.
//!
//! A [`ShaderProgram`] is a linked program handle. [`RenderSettings`] holds
//! the program variants for the active [`LightModel`]; meshes pick a variant
//! per face group when they draw.

use std::sync::Arc;

use crate::backend::{ProgramId, UniformValue};
use crate::device::GraphicsDevice;
use crate::types::ProgramDescriptor;

/// Uniform location of the model matrix.
pub const UNIFORM_MODEL: u32 = 0;
/// Uniform location of the normal matrix.
pub const UNIFORM_NORMAL: u32 = 1;
/// Uniform location of the view-projection matrix.
pub const UNIFORM_VIEW_PROJ: u32 = 2;
/// Uniform location of the camera world position.
pub const UNIFORM_CAMERA_POSITION: u32 = 3;
/// Uniform location of the ambient light color.
pub const UNIFORM_AMBIENT_LIGHT: u32 = 4;
/// Uniform location of the material ambient coefficient.
pub const UNIFORM_MATERIAL_AMBIENT: u32 = 5;
/// Uniform location of the material diffuse coefficient.
pub const UNIFORM_MATERIAL_DIFFUSE: u32 = 6;
/// Uniform location of the material specular coefficient.
pub const UNIFORM_MATERIAL_SPECULAR: u32 = 7;
/// Uniform location of the material emissive coefficient.
pub const UNIFORM_MATERIAL_EMISSIVE: u32 = 8;
/// Uniform location of the material specular exponent.
pub const UNIFORM_MATERIAL_SPECULAR_EXPONENT: u32 = 9;

/// A linked shader program.
pub struct ShaderProgram {
    device: Arc<GraphicsDevice>,
    id: ProgramId,
    descriptor: ProgramDescriptor,
}

impl ShaderProgram {
    pub(crate) fn new(
        device: Arc<GraphicsDevice>,
        id: ProgramId,
        descriptor: ProgramDescriptor,
    ) -> Self {
        Self {
            device,
            id,
            descriptor,
        }
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn descriptor(&self) -> &ProgramDescriptor {
        &self.descriptor
    }

    pub fn label(&self) -> Option<&str> {
        self.descriptor.label.as_deref()
    }

    /// Make current for subsequent draws.
    pub fn use_program(&self) {
        self.device.backend().use_program(self.id);
    }

    /// Write a uniform at `location`.
    pub fn set_uniform(&self, location: u32, value: UniformValue) {
        self.device.backend().set_uniform(self.id, location, value);
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        self.device.backend().destroy_program(self.id);
    }
}

impl std::fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShaderProgram")
            .field("id", &self.id)
            .field("label", &self.descriptor.label)
            .finish()
    }
}

static_assertions::assert_impl_all!(ShaderProgram: Send, Sync);

/// Shading model used by every program of a [`RenderSettings`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LightModel {
    /// Classical ambient/diffuse/specular shading.
    #[default]
    BlinnPhong,
    /// Metallic/roughness shading.
    Pbr,
}

impl LightModel {
    pub fn is_pbr(self) -> bool {
        matches!(self, Self::Pbr)
    }
}

/// Program variant chosen per face group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgramVariant {
    /// Interpolated vertex normals.
    Standard,
    /// Normals perturbed by a tangent-space normal map.
    BumpMap,
}

impl ProgramVariant {
    pub const ALL: [ProgramVariant; 2] = [Self::Standard, Self::BumpMap];

    fn index(self) -> usize {
        match self {
            Self::Standard => 0,
            Self::BumpMap => 1,
        }
    }
}

/// The active light model and its programs.
///
/// Either variant may be missing. A missing `BumpMap` program falls back to
/// `Standard` at draw time; groups with no program at all are not drawn.
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    light_model: LightModel,
    programs: [Option<Arc<ShaderProgram>>; 2],
}

impl RenderSettings {
    /// Settings with no programs registered.
    pub fn new(light_model: LightModel) -> Self {
        Self {
            light_model,
            programs: [None, None],
        }
    }

    /// Register a program for a variant.
    #[must_use]
    pub fn with_program(mut self, variant: ProgramVariant, program: Arc<ShaderProgram>) -> Self {
        self.set_program(variant, Some(program));
        self
    }

    /// Replace or remove the program of a variant.
    pub fn set_program(&mut self, variant: ProgramVariant, program: Option<Arc<ShaderProgram>>) {
        self.programs[variant.index()] = program;
    }

    pub fn program(&self, variant: ProgramVariant) -> Option<&Arc<ShaderProgram>> {
        self.programs[variant.index()].as_ref()
    }

    pub fn light_model(&self) -> LightModel {
        self.light_model
    }

    /// Switch light model. Programs are kept; the caller swaps them too.
    pub fn set_light_model(&mut self, light_model: LightModel) {
        self.light_model = light_model;
    }

    /// Program for a group: `BumpMap` when wanted and registered, else `Standard`.
    pub fn select_program(&self, bump_mapped: bool) -> Option<&Arc<ShaderProgram>> {
        if bump_mapped && let Some(program) = self.program(ProgramVariant::BumpMap) {
            return Some(program);
        }
        self.program(ProgramVariant::Standard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    fn program(device: &Arc<GraphicsDevice>, name: &str) -> Arc<ShaderProgram> {
        device
            .create_program(&ProgramDescriptor::new("a.vert", "a.frag").with_label(name))
            .unwrap()
    }

    #[test]
    fn test_select_program_fallback() {
        let device = GraphicsDevice::dummy();
        let standard = program(&device, "standard");
        let bump = program(&device, "bump");

        let settings = RenderSettings::new(LightModel::BlinnPhong);
        assert!(settings.select_program(false).is_none());
        assert!(settings.select_program(true).is_none());

        let settings = settings.with_program(ProgramVariant::Standard, standard.clone());
        assert!(Arc::ptr_eq(settings.select_program(true).unwrap(), &standard));

        let settings = settings.with_program(ProgramVariant::BumpMap, bump.clone());
        assert!(Arc::ptr_eq(settings.select_program(true).unwrap(), &bump));
        assert!(Arc::ptr_eq(settings.select_program(false).unwrap(), &standard));
    }

    #[test]
    fn test_bump_only_settings_skip_plain_groups() {
        let device = GraphicsDevice::dummy();
        let settings = RenderSettings::new(LightModel::Pbr)
            .with_program(ProgramVariant::BumpMap, program(&device, "bump"));
        assert!(settings.select_program(false).is_none());
        assert!(settings.light_model().is_pbr());
    }

    #[test]
    fn test_program_released_with_last_reference() {
        let backend = Arc::new(DummyBackend::new());
        let device = GraphicsDevice::new(backend.clone());
        let mut settings = RenderSettings::new(LightModel::BlinnPhong)
            .with_program(ProgramVariant::Standard, program(&device, "standard"));
        assert_eq!(backend.live_programs(), 1);
        settings.set_program(ProgramVariant::Standard, None);
        assert_eq!(backend.live_programs(), 0);
    }
}
