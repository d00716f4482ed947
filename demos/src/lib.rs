//! # Lumen Demos
//!
//! Command line drivers for the Lumen renderer.
//!
//! ## Available Demos
//!
//! - `mesh_viewer` - Loads OBJ files and renders a fixed number of frames on
//!   the dummy backend, logging what each frame draws

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_core::camera::FlyCamera;
use lumen_core::math::{Mat4, Vec3, normal_matrix, perspective_gl, rotation_y, translation};
use lumen_graphics::{
    AssetError, DirectionalLight, GraphicsDevice, GraphicsError, LightManager, LightModel,
    MeshId, MeshLoader, MeshLoaderConfig, MeshUniforms, PointLight, ProgramDescriptor,
    ProgramVariant, RenderSettings, SpotLight, TextureCache, VertexArray, vertex_attributes,
};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Viewport aspect ratio of the virtual 1280x720 window.
pub const ASPECT_RATIO: f32 = 1280.0 / 720.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;

/// Simulated time step per frame, in seconds.
pub const FRAME_TIME: f32 = 1.0 / 60.0;

/// Viewer setup.
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub asset_dir: PathBuf,
    /// Directory holding the `.vert`/`.frag` files. Defaults to `asset_dir`.
    pub shader_dir: Option<PathBuf>,
    pub light_model: LightModel,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("./assets/"),
            shader_dir: None,
            light_model: LightModel::Pbr,
        }
    }
}

impl ViewerConfig {
    fn shader_dir(&self) -> &Path {
        self.shader_dir.as_deref().unwrap_or(&self.asset_dir)
    }
}

/// What a single frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub meshes: usize,
    pub groups_drawn: usize,
    pub groups_total: usize,
}

/// Everything needed to draw loaded meshes frame after frame.
pub struct Viewer {
    device: Arc<GraphicsDevice>,
    textures: TextureCache,
    loader: MeshLoader,
    lights: LightManager,
    camera: FlyCamera,
    settings: RenderSettings,
    vertex_array: VertexArray,
    time: f32,
}

impl Viewer {
    /// Create programs, lights and the vertex layout on `device`.
    ///
    /// # Errors
    ///
    /// Returns an error if a GPU resource cannot be created.
    pub fn new(device: Arc<GraphicsDevice>, config: &ViewerConfig) -> Result<Self, GraphicsError> {
        let settings = create_render_settings(&device, config.light_model, config.shader_dir())?;

        let mut lights = LightManager::new(&device)?;
        default_light_rig(&mut lights)?;
        let ambient = ambient_light(config.light_model);
        for variant in ProgramVariant::ALL {
            if let Some(program) = settings.program(variant) {
                lights.set_ambient_light(program, &ambient);
            }
        }

        let vertex_array = device.create_vertex_array(&vertex_attributes())?;
        vertex_array.bind();

        let textures = TextureCache::new(Arc::clone(&device));
        let loader = MeshLoader::new(
            Arc::clone(&device),
            MeshLoaderConfig::default().with_asset_dir(&config.asset_dir),
        );
        let camera = FlyCamera::new().with_position(Vec3::new(0.0, 5.0, -3.0));

        log::info!(
            "Viewer ready on {} ({:?}, {} directional / {} point / {} spot lights)",
            device.name(),
            config.light_model,
            lights.directional_light_count(),
            lights.point_light_count(),
            lights.spot_light_count()
        );

        Ok(Self {
            device,
            textures,
            loader,
            lights,
            camera,
            settings,
            vertex_array,
            time: 0.0,
        })
    }

    pub fn device(&self) -> &Arc<GraphicsDevice> {
        &self.device
    }

    pub fn lights(&self) -> &LightManager {
        &self.lights
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn loader(&self) -> &MeshLoader {
        &self.loader
    }

    /// Load an OBJ file into the scene.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<MeshId, AssetError> {
        self.loader.load(path, &mut self.textures)
    }

    /// Draw every loaded mesh once and advance the clock by [`FRAME_TIME`].
    ///
    /// Meshes are laid out along +X and slowly turn around Y.
    pub fn render_frame(&mut self) -> FrameStats {
        lumen_core::profile_function!();

        let projection = perspective_gl(self.camera.fov_y(), ASPECT_RATIO, Z_NEAR, Z_FAR);
        let view_proj = projection * self.camera.view_matrix();
        let camera_position = self.camera.position();

        let mut stats = FrameStats::default();
        for (id, mesh) in self.loader.meshes() {
            let offset = translation(&Vec3::new(id.index() as f32 * 3.0, 0.0, -8.0));
            let model: Mat4 = offset * rotation_y(self.time * 0.5);
            let normal = normal_matrix(&model);
            let uniforms = MeshUniforms {
                model: Some(&model),
                normal: Some(&normal),
                view_proj: Some(&view_proj),
            };
            stats.meshes += 1;
            stats.groups_total += mesh.groups().len();
            stats.groups_drawn +=
                mesh.draw(&self.vertex_array, &self.settings, &camera_position, &uniforms);
        }

        self.time += FRAME_TIME;
        lumen_core::frame_mark!();
        stats
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("light_model", &self.settings.light_model())
            .field("meshes", &self.loader.len())
            .field("textures", &self.textures.len())
            .field("time", &self.time)
            .finish()
    }
}

/// Programs for a light model. Blinn-Phong has no bump-mapped variant.
pub fn create_render_settings(
    device: &Arc<GraphicsDevice>,
    light_model: LightModel,
    shader_dir: &Path,
) -> Result<RenderSettings, GraphicsError> {
    let program = |name: &str| {
        device.create_program(
            &ProgramDescriptor::new(
                shader_dir.join(format!("{name}.vert")),
                shader_dir.join(format!("{name}.frag")),
            )
            .with_label(name),
        )
    };

    let settings = match light_model {
        LightModel::BlinnPhong => RenderSettings::new(light_model)
            .with_program(ProgramVariant::Standard, program("blinn_phong")?),
        LightModel::Pbr => RenderSettings::new(light_model)
            .with_program(ProgramVariant::Standard, program("cook_torrance")?)
            .with_program(ProgramVariant::BumpMap, program("cook_torrance_bump")?),
    };
    Ok(settings)
}

/// Ambient light color for a light model.
pub fn ambient_light(light_model: LightModel) -> Vec3 {
    match light_model {
        LightModel::BlinnPhong => Vec3::new(0.2, 0.2, 0.2),
        LightModel::Pbr => Vec3::new(0.09, 0.09, 0.09),
    }
}

/// A sun, four ceiling lamps over the corners of the scene and one in the
/// middle. Each lamp is a point light paired with a downward spot light.
pub fn default_light_rig(lights: &mut LightManager) -> Result<(), GraphicsError> {
    lights.add_directional_light(&DirectionalLight {
        direction: Vec3::new(0.0, 0.0, -1.0),
        color: Vec3::new(1.0, 1.0, 0.8),
    })?;

    let down = Vec3::new(0.0, -1.0, 0.0);
    let white = Vec3::new(1.0, 1.0, 1.0);
    let lamps = [
        (Vec3::new(-20.0, 12.8, -8.0), 50.0),
        (Vec3::new(20.0, 12.8, -8.0), 50.0),
        (Vec3::new(-20.0, 12.8, -68.4), 50.0),
        (Vec3::new(20.0, 12.8, -68.4), 50.0),
        (Vec3::new(0.0, 15.8, -38.2), 55.0),
    ];
    for (position, range) in lamps {
        lights.add_point_light(&PointLight::new(position, white * 0.8, range))?;
        lights.add_spot_light(&SpotLight::new(
            position,
            down,
            white,
            60f32.to_radians(),
            90f32.to_radians(),
            50.0,
        ))?;
    }
    Ok(())
}
