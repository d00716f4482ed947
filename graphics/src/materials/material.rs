//! Material parameters and binding.

use std::sync::Arc;

use lumen_core::math::Vec3;

use crate::backend::UniformValue;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::{Texture, TextureRef};
use crate::shader::{
    LightModel, ShaderProgram, UNIFORM_MATERIAL_AMBIENT, UNIFORM_MATERIAL_DIFFUSE,
    UNIFORM_MATERIAL_EMISSIVE, UNIFORM_MATERIAL_SPECULAR, UNIFORM_MATERIAL_SPECULAR_EXPONENT,
};

use super::DefaultTextures;

pub const TEXTURE_UNIT_DIFFUSE: u32 = 0;
pub const TEXTURE_UNIT_SPECULAR: u32 = 1;
pub const TEXTURE_UNIT_ALBEDO: u32 = 2;
pub const TEXTURE_UNIT_METALLIC: u32 = 3;
pub const TEXTURE_UNIT_ROUGHNESS: u32 = 4;
pub const TEXTURE_UNIT_AMBIENT: u32 = 5;
pub const TEXTURE_UNIT_BUMP: u32 = 6;
pub const TEXTURE_UNIT_EMISSIVE: u32 = 7;
pub const TEXTURE_UNIT_MASK: u32 = 8;

/// Shading coefficients uploaded as uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpuMaterial {
    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub emissive: Vec3,
    pub specular_exponent: f32,
}

impl Default for GpuMaterial {
    fn default() -> Self {
        Self {
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(0.8, 0.8, 0.8),
            specular: Vec3::new(0.5, 0.5, 0.5),
            emissive: Vec3::zeros(),
            specular_exponent: 0.0,
        }
    }
}

/// A rendering material.
///
/// Texture maps are optional [`TextureRef`]s into a texture cache. A missing
/// or dead map is replaced at bind time by one of the device's
/// [`DefaultTextures`]: white for color and mask maps, black for metallic and
/// roughness, and a flat normal for the bump map.
///
/// Every material, clones included, holds the default textures alive. They
/// are released when the last material on the device is dropped.
///
/// The diffuse map doubles as the PBR albedo map.
#[derive(Clone)]
pub struct Material {
    pub params: GpuMaterial,

    pub diffuse_texture: Option<TextureRef>,
    pub specular_texture: Option<TextureRef>,

    pub metallic_texture: Option<TextureRef>,
    pub roughness_texture: Option<TextureRef>,
    pub ambient_texture: Option<TextureRef>,

    pub emissive_texture: Option<TextureRef>,
    pub normal_map: Option<TextureRef>,
    pub mask_texture: Option<TextureRef>,

    defaults: Arc<DefaultTextures>,
}

impl Material {
    /// A material with default coefficients and no maps.
    ///
    /// Creates the device's default textures if no other material holds them.
    pub fn new(device: &Arc<GraphicsDevice>) -> Result<Self, GraphicsError> {
        Ok(Self {
            params: GpuMaterial::default(),
            diffuse_texture: None,
            specular_texture: None,
            metallic_texture: None,
            roughness_texture: None,
            ambient_texture: None,
            emissive_texture: None,
            normal_map: None,
            mask_texture: None,
            defaults: device.default_textures()?,
        })
    }

    /// Set the Blinn-Phong coefficients and maps.
    pub fn set_classical_params(
        &mut self,
        params: GpuMaterial,
        diffuse_texture: Option<TextureRef>,
        specular_texture: Option<TextureRef>,
    ) {
        self.params = params;
        self.diffuse_texture = diffuse_texture;
        self.specular_texture = specular_texture;
    }

    /// Set the PBR maps. `albedo` replaces the diffuse map.
    pub fn set_pbr_params(
        &mut self,
        albedo: Option<TextureRef>,
        metallic: Option<TextureRef>,
        roughness: Option<TextureRef>,
        ambient: Option<TextureRef>,
    ) {
        self.diffuse_texture = albedo;
        self.metallic_texture = metallic;
        self.roughness_texture = roughness;
        self.ambient_texture = ambient;
    }

    /// Set the maps shared by both light models.
    pub fn set_additional_params(
        &mut self,
        emissive: Option<TextureRef>,
        normal_map: Option<TextureRef>,
        mask: Option<TextureRef>,
    ) {
        self.emissive_texture = emissive;
        self.normal_map = normal_map;
        self.mask_texture = mask;
    }

    /// Whether the material has a live normal map.
    pub fn has_normal_map(&self) -> bool {
        self.normal_map.as_ref().is_some_and(TextureRef::is_alive)
    }

    /// The shared fallback textures.
    pub fn defaults(&self) -> &Arc<DefaultTextures> {
        &self.defaults
    }

    /// Bind for Blinn-Phong shading: coefficients at uniforms 5..=9, then the
    /// diffuse, specular, bump, emissive and mask maps.
    pub fn bind_classical(&self, program: &ShaderProgram) {
        self.bind_uniforms(program);

        let white = self.defaults.white();
        bind_or_default(&self.diffuse_texture, white, TEXTURE_UNIT_DIFFUSE);
        bind_or_default(&self.specular_texture, white, TEXTURE_UNIT_SPECULAR);
        bind_or_default(&self.normal_map, self.defaults.flat(), TEXTURE_UNIT_BUMP);
        bind_or_default(&self.emissive_texture, white, TEXTURE_UNIT_EMISSIVE);
        bind_or_default(&self.mask_texture, white, TEXTURE_UNIT_MASK);
    }

    /// Bind for PBR shading: all seven maps, then the emissive coefficient.
    pub fn bind_pbr(&self, program: &ShaderProgram) {
        let white = self.defaults.white();
        let black = self.defaults.black();
        bind_or_default(&self.diffuse_texture, white, TEXTURE_UNIT_ALBEDO);
        bind_or_default(&self.metallic_texture, black, TEXTURE_UNIT_METALLIC);
        bind_or_default(&self.roughness_texture, black, TEXTURE_UNIT_ROUGHNESS);
        bind_or_default(&self.ambient_texture, white, TEXTURE_UNIT_AMBIENT);
        bind_or_default(&self.normal_map, self.defaults.flat(), TEXTURE_UNIT_BUMP);
        bind_or_default(&self.emissive_texture, white, TEXTURE_UNIT_EMISSIVE);
        bind_or_default(&self.mask_texture, white, TEXTURE_UNIT_MASK);

        program.set_uniform(UNIFORM_MATERIAL_EMISSIVE, vec3(&self.params.emissive));
    }

    /// Bind for geometry without texture coordinates. Only default textures
    /// are bound, whatever maps the material has.
    pub fn bind_no_tex(&self, program: &ShaderProgram, light_model: LightModel) {
        let white = self.defaults.white();
        match light_model {
            LightModel::BlinnPhong => {
                self.bind_uniforms(program);
                white.bind(TEXTURE_UNIT_DIFFUSE);
                white.bind(TEXTURE_UNIT_SPECULAR);
                self.defaults.flat().bind(TEXTURE_UNIT_BUMP);
            }
            LightModel::Pbr => {
                white.bind(TEXTURE_UNIT_ALBEDO);
                self.defaults.black().bind(TEXTURE_UNIT_METALLIC);
                self.defaults.black().bind(TEXTURE_UNIT_ROUGHNESS);
                white.bind(TEXTURE_UNIT_AMBIENT);
            }
        }
    }

    fn bind_uniforms(&self, program: &ShaderProgram) {
        let params = &self.params;
        program.set_uniform(UNIFORM_MATERIAL_AMBIENT, vec3(&params.ambient));
        program.set_uniform(UNIFORM_MATERIAL_DIFFUSE, vec3(&params.diffuse));
        program.set_uniform(UNIFORM_MATERIAL_SPECULAR, vec3(&params.specular));
        program.set_uniform(UNIFORM_MATERIAL_EMISSIVE, vec3(&params.emissive));
        program.set_uniform(
            UNIFORM_MATERIAL_SPECULAR_EXPONENT,
            UniformValue::Float(params.specular_exponent),
        );
    }
}

fn vec3(v: &Vec3) -> UniformValue {
    UniformValue::Vec3([v.x, v.y, v.z])
}

fn bind_or_default(texture: &Option<TextureRef>, fallback: &Arc<Texture>, unit: u32) {
    match texture {
        Some(handle) => match handle.upgrade() {
            Some(texture) => texture.bind(unit),
            None => {
                log::warn!("Texture for unit {unit} was released, binding default");
                fallback.bind(unit);
            }
        },
        None => fallback.bind(unit),
    }
}

impl std::fmt::Debug for Material {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let maps = [
            &self.diffuse_texture,
            &self.specular_texture,
            &self.metallic_texture,
            &self.roughness_texture,
            &self.ambient_texture,
            &self.emissive_texture,
            &self.normal_map,
            &self.mask_texture,
        ];
        f.debug_struct("Material")
            .field("params", &self.params)
            .field("maps", &maps.iter().filter(|m| m.is_some()).count())
            .field("normal_map", &self.normal_map.is_some())
            .finish()
    }
}

static_assertions::assert_impl_all!(Material: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, GpuCommand, TextureId};
    use crate::types::{ProgramDescriptor, TextureDescriptor, TextureFormat};

    struct Fixture {
        backend: Arc<DummyBackend>,
        device: Arc<GraphicsDevice>,
        program: Arc<ShaderProgram>,
    }

    fn fixture() -> Fixture {
        let backend = Arc::new(DummyBackend::recording());
        let device = GraphicsDevice::new(backend.clone());
        let program = device
            .create_program(&ProgramDescriptor::new("m.vert", "m.frag"))
            .unwrap();
        Fixture {
            backend,
            device,
            program,
        }
    }

    fn texture_bindings(commands: &[GpuCommand]) -> Vec<(u32, TextureId)> {
        commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::BindTexture { unit, texture } => Some((*unit, *texture)),
                _ => None,
            })
            .collect()
    }

    fn uniform_locations(commands: &[GpuCommand]) -> Vec<u32> {
        commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::SetUniform { location, .. } => Some(*location),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_default_params() {
        let f = fixture();
        let material = Material::new(&f.device).unwrap();
        assert_eq!(material.params.ambient, Vec3::new(1.0, 1.0, 1.0));
        assert_eq!(material.params.diffuse, Vec3::new(0.8, 0.8, 0.8));
        assert_eq!(material.params.specular, Vec3::new(0.5, 0.5, 0.5));
        assert_eq!(material.params.specular_exponent, 0.0);
        assert!(!material.has_normal_map());
    }

    #[test]
    fn test_bind_classical_uses_defaults() {
        let f = fixture();
        let material = Material::new(&f.device).unwrap();
        let white = material.defaults().white().id();
        let flat = material.defaults().flat().id();
        f.backend.take_commands();

        material.bind_classical(&f.program);
        let commands = f.backend.take_commands();
        assert_eq!(uniform_locations(&commands), vec![5, 6, 7, 8, 9]);
        assert_eq!(
            texture_bindings(&commands),
            vec![(0, white), (1, white), (6, flat), (7, white), (8, white)]
        );
    }

    #[test]
    fn test_bind_pbr_prefers_material_maps() {
        let f = fixture();
        let mut material = Material::new(&f.device).unwrap();
        let metal = f
            .device
            .create_texture(
                &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8Unorm),
                &[9, 9, 9, 255],
            )
            .unwrap();
        material.set_pbr_params(None, Some(TextureRef::new(&metal)), None, None);
        material.params.emissive = Vec3::new(0.25, 0.5, 1.0);
        let defaults = material.defaults().clone();
        f.backend.take_commands();

        material.bind_pbr(&f.program);
        let commands = f.backend.take_commands();
        assert_eq!(
            texture_bindings(&commands),
            vec![
                (2, defaults.white().id()),
                (3, metal.id()),
                (4, defaults.black().id()),
                (5, defaults.white().id()),
                (6, defaults.flat().id()),
                (7, defaults.white().id()),
                (8, defaults.white().id()),
            ]
        );
        assert_eq!(
            commands.last(),
            Some(&GpuCommand::SetUniform {
                program: f.program.id(),
                location: 8,
                value: UniformValue::Vec3([0.25, 0.5, 1.0]),
            })
        );
    }

    #[test]
    fn test_bind_no_tex_ignores_maps() {
        let f = fixture();
        let mut material = Material::new(&f.device).unwrap();
        let diffuse = f
            .device
            .create_texture(
                &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8UnormSrgb),
                &[1, 2, 3, 255],
            )
            .unwrap();
        material.diffuse_texture = Some(TextureRef::new(&diffuse));
        let defaults = material.defaults().clone();
        f.backend.take_commands();

        material.bind_no_tex(&f.program, LightModel::BlinnPhong);
        let commands = f.backend.take_commands();
        assert_eq!(uniform_locations(&commands), vec![5, 6, 7, 8, 9]);
        assert_eq!(
            texture_bindings(&commands),
            vec![
                (0, defaults.white().id()),
                (1, defaults.white().id()),
                (6, defaults.flat().id()),
            ]
        );

        material.bind_no_tex(&f.program, LightModel::Pbr);
        let commands = f.backend.take_commands();
        assert!(uniform_locations(&commands).is_empty());
        assert_eq!(
            texture_bindings(&commands),
            vec![
                (2, defaults.white().id()),
                (3, defaults.black().id()),
                (4, defaults.black().id()),
                (5, defaults.white().id()),
            ]
        );
    }

    #[test]
    fn test_dead_map_falls_back() {
        let f = fixture();
        let mut material = Material::new(&f.device).unwrap();
        let bump = f
            .device
            .create_texture(
                &TextureDescriptor::new_2d(1, 1, TextureFormat::Rgba8Unorm),
                &[128, 128, 255, 255],
            )
            .unwrap();
        material.set_additional_params(None, Some(TextureRef::new(&bump)), None);
        assert!(material.has_normal_map());
        drop(bump);
        assert!(!material.has_normal_map());

        let flat = material.defaults().flat().id();
        f.backend.take_commands();
        material.bind_classical(&f.program);
        assert!(texture_bindings(&f.backend.take_commands()).contains(&(6, flat)));
    }

    #[test]
    fn test_clones_share_defaults() {
        let f = fixture();
        let material = Material::new(&f.device).unwrap();
        let copy = material.clone();
        assert!(Arc::ptr_eq(material.defaults(), copy.defaults()));
        drop(material);
        assert!(f.device.has_default_textures());
        drop(copy);
        assert!(!f.device.has_default_textures());
    }
}
