//! Light uniform blocks.
//!
//! [`LightManager`] keeps one uniform buffer per light kind. Each buffer holds
//! a fixed number of std140 records followed by the live count as an `i32`,
//! and stays bound to its uniform binding point for the manager's lifetime.

use std::marker::PhantomData;
use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use lumen_core::math::Vec3;

use crate::backend::UniformValue;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::Buffer;
use crate::shader::{ShaderProgram, UNIFORM_AMBIENT_LIGHT};
use crate::types::{BufferDescriptor, BufferUsage};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 3;
pub const MAX_POINT_LIGHTS: usize = 10;
pub const MAX_SPOT_LIGHTS: usize = 10;

pub const UNIFORM_BINDING_DIRECTIONAL_LIGHTS: u32 = 0;
pub const UNIFORM_BINDING_POINT_LIGHTS: u32 = 1;
pub const UNIFORM_BINDING_SPOT_LIGHTS: u32 = 2;

/// Exponent of the attenuation curve used by [`PointLight::new`] and
/// [`SpotLight::new`].
pub const DEFAULT_ATTENUATION_POWER: f32 = 2.0;

/// A light infinitely far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub direction: Vec3,
    pub color: Vec3,
}

/// A light radiating from a point, fading to zero at `max_range`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub max_range: f32,
    pub attenuation_power: f32,
}

impl PointLight {
    pub fn new(position: Vec3, color: Vec3, max_range: f32) -> Self {
        Self {
            position,
            color,
            max_range,
            attenuation_power: DEFAULT_ATTENUATION_POWER,
        }
    }
}

/// A cone light. Cone angles are half-angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub direction: Vec3,
    pub color: Vec3,
    pub inner_cone: f32,
    pub outer_cone: f32,
    pub max_range: f32,
    pub attenuation_power: f32,
}

impl SpotLight {
    pub fn new(
        position: Vec3,
        direction: Vec3,
        color: Vec3,
        inner_cone: f32,
        outer_cone: f32,
        max_range: f32,
    ) -> Self {
        Self {
            position,
            direction,
            color,
            inner_cone,
            outer_cone,
            max_range,
            attenuation_power: DEFAULT_ATTENUATION_POWER,
        }
    }
}

/// Constants `(x, y, z)` of the attenuation `y * e^(x * d^2) - z`, which is 1
/// at distance 0 and 0 at `max_range`.
pub fn attenuation_constants(max_range: f32, power: f32) -> [f32; 3] {
    let k2 = power * power;
    let e = (-k2).exp();
    let denom = 1.0 / (1.0 - e);
    [-k2 / (max_range * max_range), denom, e * denom]
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct DirectionalLightRecord {
    direction: [f32; 3],
    _pad0: f32,
    color: [f32; 3],
    _pad1: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct PointLightRecord {
    position: [f32; 3],
    _pad0: f32,
    color: [f32; 3],
    _pad1: f32,
    attenuation: [f32; 3],
    _pad2: f32,
}

#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
struct SpotLightRecord {
    position: [f32; 3],
    cos_inner_cone: f32,
    direction: [f32; 3],
    cos_outer_cone: f32,
    color: [f32; 3],
    _pad0: f32,
    attenuation: [f32; 3],
    _pad1: f32,
}

static_assertions::const_assert_eq!(std::mem::size_of::<DirectionalLightRecord>(), 32);
static_assertions::const_assert_eq!(std::mem::size_of::<PointLightRecord>(), 48);
static_assertions::const_assert_eq!(std::mem::size_of::<SpotLightRecord>(), 64);

impl From<&DirectionalLight> for DirectionalLightRecord {
    fn from(light: &DirectionalLight) -> Self {
        Self {
            direction: light.direction.into(),
            color: light.color.into(),
            ..Zeroable::zeroed()
        }
    }
}

impl From<&PointLight> for PointLightRecord {
    fn from(light: &PointLight) -> Self {
        Self {
            position: light.position.into(),
            color: light.color.into(),
            attenuation: attenuation_constants(light.max_range, light.attenuation_power),
            ..Zeroable::zeroed()
        }
    }
}

impl From<&SpotLight> for SpotLightRecord {
    fn from(light: &SpotLight) -> Self {
        Self {
            position: light.position.into(),
            cos_inner_cone: light.inner_cone.cos(),
            direction: light.direction.into(),
            cos_outer_cone: light.outer_cone.cos(),
            color: light.color.into(),
            attenuation: attenuation_constants(light.max_range, light.attenuation_power),
            ..Zeroable::zeroed()
        }
    }
}

/// Fixed-capacity array of `R` records plus a count, in one uniform buffer.
struct LightBlock<R> {
    kind: &'static str,
    max: usize,
    count: usize,
    buffer: Arc<Buffer>,
    _record: PhantomData<R>,
}

impl<R: Pod> LightBlock<R> {
    const RECORD_SIZE: usize = std::mem::size_of::<R>();

    fn new(
        device: &Arc<GraphicsDevice>,
        kind: &'static str,
        max: usize,
        binding: u32,
    ) -> Result<Self, GraphicsError> {
        let size = (max * Self::RECORD_SIZE + std::mem::size_of::<i32>()) as u64;
        let buffer = device.create_buffer(
            &BufferDescriptor::new(size, BufferUsage::UNIFORM | BufferUsage::DYNAMIC)
                .with_label(format!("{kind}_lights")),
            None,
        )?;
        let block = Self {
            kind,
            max,
            count: 0,
            buffer,
            _record: PhantomData,
        };
        block.write_count()?;
        block.buffer.bind_to_uniform(binding, 0, size)?;
        Ok(block)
    }

    fn count_offset(&self) -> u64 {
        (self.max * Self::RECORD_SIZE) as u64
    }

    fn write_count(&self) -> Result<(), GraphicsError> {
        let count = self.count as i32;
        self.buffer
            .set_data(self.count_offset(), bytemuck::bytes_of(&count))
    }

    fn write_record(&self, index: usize, record: &R) -> Result<(), GraphicsError> {
        self.buffer
            .set_data((index * Self::RECORD_SIZE) as u64, bytemuck::bytes_of(record))
    }

    fn add(&mut self, record: R) -> Result<usize, GraphicsError> {
        if self.count >= self.max {
            return Err(GraphicsError::LightLimitReached {
                kind: self.kind,
                max: self.max,
            });
        }
        self.write_record(self.count, &record)?;
        self.count += 1;
        self.write_count()?;
        log::debug!("Added {} light {}", self.kind, self.count - 1);
        Ok(self.count - 1)
    }

    fn edit(&self, index: usize, record: R) -> Result<(), GraphicsError> {
        if index >= self.max {
            return Err(GraphicsError::InvalidLightIndex {
                kind: self.kind,
                index,
                max: self.max,
            });
        }
        self.write_record(index, &record)
    }

    fn clear(&mut self) -> Result<(), GraphicsError> {
        self.count = 0;
        self.write_count()
    }
}

/// Directional, point and spot lights shared by every program.
///
/// # Example
///
/// ```ignore
/// let mut lights = LightManager::new(&device)?;
/// lights.add_directional_light(&DirectionalLight {
///     direction: Vec3::new(0.0, -1.0, 0.0),
///     color: Vec3::new(1.0, 1.0, 1.0),
/// })?;
/// lights.set_ambient_light(&program, &Vec3::new(0.1, 0.1, 0.1));
/// ```
pub struct LightManager {
    directional: LightBlock<DirectionalLightRecord>,
    point: LightBlock<PointLightRecord>,
    spot: LightBlock<SpotLightRecord>,
}

impl LightManager {
    /// Create the three buffers with no lights and bind them.
    pub fn new(device: &Arc<GraphicsDevice>) -> Result<Self, GraphicsError> {
        Ok(Self {
            directional: LightBlock::new(
                device,
                "directional",
                MAX_DIRECTIONAL_LIGHTS,
                UNIFORM_BINDING_DIRECTIONAL_LIGHTS,
            )?,
            point: LightBlock::new(device, "point", MAX_POINT_LIGHTS, UNIFORM_BINDING_POINT_LIGHTS)?,
            spot: LightBlock::new(device, "spot", MAX_SPOT_LIGHTS, UNIFORM_BINDING_SPOT_LIGHTS)?,
        })
    }

    /// Append a light and return its index.
    pub fn add_directional_light(&mut self, light: &DirectionalLight) -> Result<usize, GraphicsError> {
        self.directional.add(light.into())
    }

    pub fn add_point_light(&mut self, light: &PointLight) -> Result<usize, GraphicsError> {
        self.point.add(light.into())
    }

    pub fn add_spot_light(&mut self, light: &SpotLight) -> Result<usize, GraphicsError> {
        self.spot.add(light.into())
    }

    /// Overwrite the light at `index`. Any slot below the maximum is
    /// accepted, live or not.
    pub fn edit_directional_light(
        &mut self,
        index: usize,
        light: &DirectionalLight,
    ) -> Result<(), GraphicsError> {
        self.directional.edit(index, light.into())
    }

    pub fn edit_point_light(&mut self, index: usize, light: &PointLight) -> Result<(), GraphicsError> {
        self.point.edit(index, light.into())
    }

    pub fn edit_spot_light(&mut self, index: usize, light: &SpotLight) -> Result<(), GraphicsError> {
        self.spot.edit(index, light.into())
    }

    pub fn clear_directional_lights(&mut self) -> Result<(), GraphicsError> {
        self.directional.clear()
    }

    pub fn clear_point_lights(&mut self) -> Result<(), GraphicsError> {
        self.point.clear()
    }

    pub fn clear_spot_lights(&mut self) -> Result<(), GraphicsError> {
        self.spot.clear()
    }

    pub fn directional_light_count(&self) -> usize {
        self.directional.count
    }

    pub fn point_light_count(&self) -> usize {
        self.point.count
    }

    pub fn spot_light_count(&self) -> usize {
        self.spot.count
    }

    /// Write the ambient light color of `program`.
    pub fn set_ambient_light(&self, program: &ShaderProgram, color: &Vec3) {
        program.set_uniform(
            UNIFORM_AMBIENT_LIGHT,
            UniformValue::Vec3([color.x, color.y, color.z]),
        );
    }
}

impl std::fmt::Debug for LightManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LightManager")
            .field("directional", &self.directional.count)
            .field("point", &self.point.count)
            .field("spot", &self.spot.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DummyBackend, GpuCommand};

    fn recording() -> (Arc<DummyBackend>, Arc<GraphicsDevice>) {
        let backend = Arc::new(DummyBackend::recording());
        let device = GraphicsDevice::new(backend.clone());
        (backend, device)
    }

    fn sun() -> DirectionalLight {
        DirectionalLight {
            direction: Vec3::new(0.0, -1.0, 0.0),
            color: Vec3::new(1.0, 0.9, 0.8),
        }
    }

    #[test]
    fn test_attenuation_constants() {
        let [x, y, z] = attenuation_constants(2.0, 2.0);
        assert!((x + 1.0).abs() < 1e-6);
        // 1 at the light, 0 at max range
        assert!((y - z - 1.0).abs() < 1e-5);
        assert!((y * (x * 4.0).exp() - z).abs() < 1e-5);
    }

    #[test]
    fn test_new_clears_and_binds() {
        let (backend, device) = recording();
        let _lights = LightManager::new(&device).unwrap();
        let commands = backend.take_commands();

        let counts: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::WriteBuffer { offset, data, .. } => Some((*offset, data.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(
            counts,
            vec![
                (96, 0i32.to_ne_bytes().to_vec()),
                (480, 0i32.to_ne_bytes().to_vec()),
                (640, 0i32.to_ne_bytes().to_vec()),
            ]
        );

        let bindings: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::BindUniformBuffer { index, size, .. } => Some((*index, *size)),
                _ => None,
            })
            .collect();
        assert_eq!(bindings, vec![(0, 100), (1, 484), (2, 644)]);
    }

    #[test]
    fn test_add_writes_record_then_count() {
        let (backend, device) = recording();
        let mut lights = LightManager::new(&device).unwrap();
        lights.add_directional_light(&sun()).unwrap();
        backend.take_commands();

        assert_eq!(lights.add_directional_light(&sun()).unwrap(), 1);
        let commands = backend.take_commands();
        let writes: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                GpuCommand::WriteBuffer { offset, data, .. } => Some((*offset, data.as_slice())),
                _ => None,
            })
            .collect();
        assert_eq!(writes.len(), 2);

        assert_eq!(writes[0].0, 32);
        let record: DirectionalLightRecord = bytemuck::pod_read_unaligned(writes[0].1);
        assert_eq!(record.direction, [0.0, -1.0, 0.0]);
        assert_eq!(record.color, [1.0, 0.9, 0.8]);

        assert_eq!(writes[1], (96, &2i32.to_ne_bytes()[..]));
    }

    #[test]
    fn test_limits() {
        let device = GraphicsDevice::dummy();
        let mut lights = LightManager::new(&device).unwrap();
        for i in 0..MAX_DIRECTIONAL_LIGHTS {
            assert_eq!(lights.add_directional_light(&sun()).unwrap(), i);
        }
        assert_eq!(
            lights.add_directional_light(&sun()),
            Err(GraphicsError::LightLimitReached {
                kind: "directional",
                max: 3
            })
        );
        assert!(lights.edit_directional_light(2, &sun()).is_ok());
        assert_eq!(
            lights.edit_directional_light(3, &sun()),
            Err(GraphicsError::InvalidLightIndex {
                kind: "directional",
                index: 3,
                max: 3
            })
        );

        lights.clear_directional_lights().unwrap();
        assert_eq!(lights.directional_light_count(), 0);
        assert_eq!(lights.add_directional_light(&sun()).unwrap(), 0);
    }

    #[test]
    fn test_spot_light_stores_cosines() {
        let light = SpotLight::new(
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(1.0, 1.0, 1.0),
            0.0,
            std::f32::consts::FRAC_PI_2,
            10.0,
        );
        let record = SpotLightRecord::from(&light);
        assert_eq!(record.cos_inner_cone, 1.0);
        assert!(record.cos_outer_cone.abs() < 1e-6);
        assert_eq!(record.attenuation, attenuation_constants(10.0, 2.0));
    }

    #[test]
    fn test_ambient_light_location() {
        let (backend, device) = recording();
        let program = device
            .create_program(&crate::types::ProgramDescriptor::new("l.vert", "l.frag"))
            .unwrap();
        let lights = LightManager::new(&device).unwrap();
        backend.take_commands();
        lights.set_ambient_light(&program, &Vec3::new(0.1, 0.2, 0.3));
        assert_eq!(
            backend.take_commands(),
            vec![GpuCommand::SetUniform {
                program: program.id(),
                location: 4,
                value: UniformValue::Vec3([0.1, 0.2, 0.3]),
            }]
        );
    }
}
