//! OBJ file to GPU mesh loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lumen_core::material::{MaterialDescriptor, TextureSlot};
use lumen_core::math::Vec3;
use lumen_core::obj::{ObjModel, load_obj};

use crate::device::GraphicsDevice;
use crate::error::{AssetError, GraphicsError};
use crate::materials::{GpuMaterial, Material};
use crate::resources::{TextureCache, TextureLoadOptions, TextureRef};

use super::Mesh;

/// Handle of a mesh owned by a [`MeshLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Mesh loader configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshLoaderConfig {
    /// Directory material texture names are resolved against.
    pub asset_dir: PathBuf,
    /// Flip texture rows on load.
    pub flip_textures_vertically: bool,
    /// Allocate full mip chains for loaded textures.
    pub generate_mipmaps: bool,
}

impl Default for MeshLoaderConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("./assets/"),
            flip_textures_vertically: true,
            generate_mipmaps: true,
        }
    }
}

impl MeshLoaderConfig {
    #[must_use]
    pub fn with_asset_dir(mut self, asset_dir: impl Into<PathBuf>) -> Self {
        self.asset_dir = asset_dir.into();
        self
    }

    #[must_use]
    pub fn with_flip_textures_vertically(mut self, flip: bool) -> Self {
        self.flip_textures_vertically = flip;
        self
    }

    #[must_use]
    pub fn with_generate_mipmaps(mut self, generate: bool) -> Self {
        self.generate_mipmaps = generate;
        self
    }

    fn texture_options(&self) -> TextureLoadOptions {
        TextureLoadOptions {
            flip_vertically: self.flip_textures_vertically,
            generate_mipmaps: self.generate_mipmaps,
        }
    }
}

/// Loads OBJ files into [`Mesh`]es and owns them.
///
/// Meshes live as long as the loader; callers get [`MeshId`] handles.
/// Material textures go through the caller's [`TextureCache`], so meshes that
/// share texture files share GPU textures.
pub struct MeshLoader {
    device: Arc<GraphicsDevice>,
    config: MeshLoaderConfig,
    meshes: Vec<Mesh>,
}

impl MeshLoader {
    pub fn new(device: Arc<GraphicsDevice>, config: MeshLoaderConfig) -> Self {
        Self {
            device,
            config,
            meshes: Vec::new(),
        }
    }

    pub fn config(&self) -> &MeshLoaderConfig {
        &self.config
    }

    /// Load an OBJ file and upload it.
    ///
    /// # Errors
    ///
    /// [`AssetError::Obj`] if the file cannot be parsed or forms no valid
    /// mesh, [`AssetError::Graphics`] if the upload fails. Missing textures
    /// are not errors.
    pub fn load(
        &mut self,
        path: impl AsRef<Path>,
        textures: &mut TextureCache,
    ) -> Result<MeshId, AssetError> {
        let model = load_obj(path)?;
        Ok(self.upload(&model, textures)?)
    }

    /// Upload an already loaded model.
    pub fn upload(
        &mut self,
        model: &ObjModel,
        textures: &mut TextureCache,
    ) -> Result<MeshId, GraphicsError> {
        let materials = model
            .materials
            .iter()
            .map(|descriptor| self.build_material(descriptor, textures))
            .collect::<Result<Vec<_>, _>>()?;

        let mesh = Mesh::from_cpu(&self.device, &model.mesh, &materials)?;
        log::info!(
            "Uploaded {}: {} vertices, {} triangles in {} groups",
            mesh.label().unwrap_or("mesh"),
            mesh.vertex_count(),
            mesh.triangle_count(),
            mesh.groups().len()
        );

        let id = MeshId(self.meshes.len());
        self.meshes.push(mesh);
        Ok(id)
    }

    fn build_material(
        &self,
        descriptor: &MaterialDescriptor,
        textures: &mut TextureCache,
    ) -> Result<Material, GraphicsError> {
        let options = self.config.texture_options();
        let mut load = |slot: TextureSlot| -> Option<TextureRef> {
            let name = descriptor.texture(slot)?;
            let path = self.config.asset_dir.join(name);
            textures.load_with(&path, slot.color_space(), &options)
        };

        let diffuse = load(TextureSlot::Diffuse);
        let specular = load(TextureSlot::Specular);
        let metallic = load(TextureSlot::Metallic);
        let roughness = load(TextureSlot::Roughness);
        let ambient = load(TextureSlot::Ambient);
        let bump = load(TextureSlot::Bump);
        let emissive = load(TextureSlot::Emissive);
        let mask = load(TextureSlot::Mask);

        let mut material = Material::new(&self.device)?;
        let params = GpuMaterial {
            ambient: Vec3::from(descriptor.ambient),
            diffuse: Vec3::from(descriptor.diffuse),
            specular: Vec3::from(descriptor.specular),
            emissive: Vec3::from(descriptor.emissive),
            specular_exponent: descriptor.shininess,
        };
        material.set_classical_params(params, diffuse.clone(), specular);
        material.set_pbr_params(diffuse, metallic, roughness, ambient);
        material.set_additional_params(emissive, bump, mask);
        Ok(material)
    }

    /// A mesh loaded by this loader.
    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.meshes.iter().enumerate().map(|(i, m)| (MeshId(i), m))
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

impl std::fmt::Debug for MeshLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshLoader")
            .field("config", &self.config)
            .field("meshes", &self.meshes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::DummyBackend;

    const FACETED_CUBE: &str = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../core/src/obj/tests/cube_faceted.obj"
    );

    #[test]
    fn test_config_builders() {
        let config = MeshLoaderConfig::default()
            .with_asset_dir("/data")
            .with_generate_mipmaps(false)
            .with_flip_textures_vertically(false);
        assert_eq!(config.asset_dir, PathBuf::from("/data"));
        assert_eq!(
            config.texture_options(),
            TextureLoadOptions {
                flip_vertically: false,
                generate_mipmaps: false
            }
        );
        assert_eq!(
            MeshLoaderConfig::default().asset_dir,
            PathBuf::from("./assets/")
        );
    }

    #[test]
    fn test_load_without_texture_files() {
        let backend = Arc::new(DummyBackend::new());
        let device = GraphicsDevice::new(backend.clone());
        let mut textures = TextureCache::new(device.clone());
        let mut loader = MeshLoader::new(
            device,
            MeshLoaderConfig::default().with_asset_dir("/nonexistent"),
        );

        let id = loader.load(FACETED_CUBE, &mut textures).unwrap();
        let mesh = loader.mesh(id).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert!(mesh.has_uvs());
        assert!(mesh.groups().iter().all(|g| !g.material().has_normal_map()));
        assert!(textures.is_empty());
        // the three defaults only
        assert_eq!(backend.live_textures(), 3);
    }

    #[test]
    fn test_load_error_is_reported() {
        let device = GraphicsDevice::dummy();
        let mut textures = TextureCache::new(device.clone());
        let mut loader = MeshLoader::new(device, MeshLoaderConfig::default());
        let result = loader.load("/nonexistent/mesh.obj", &mut textures);
        assert!(matches!(result, Err(AssetError::Obj(_))));
        assert!(loader.is_empty());
    }
}
