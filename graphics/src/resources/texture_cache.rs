//! Image file loading with per-path caching.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use lumen_core::material::ColorSpace;

use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::resources::Texture;
use crate::types::{TextureDescriptor, TextureFormat};

/// How an image file is turned into a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureLoadOptions {
    /// Flip rows so the first row in memory is the bottom of the image.
    pub flip_vertically: bool,
    /// Allocate the full mip chain instead of a single level.
    pub generate_mipmaps: bool,
}

impl Default for TextureLoadOptions {
    fn default() -> Self {
        Self {
            flip_vertically: true,
            generate_mipmaps: true,
        }
    }
}

/// Non-owning handle to a cached texture.
///
/// The [`TextureCache`] owns every texture it loads. Materials keep these
/// handles and fall back to a default texture once the cache is cleared or
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct TextureRef(Weak<Texture>);

impl TextureRef {
    /// A handle to a texture owned elsewhere.
    pub fn new(texture: &Arc<Texture>) -> Self {
        Self(Arc::downgrade(texture))
    }

    /// The texture, if its cache still holds it.
    pub fn upgrade(&self) -> Option<Arc<Texture>> {
        self.0.upgrade()
    }

    /// Whether the texture is still alive.
    pub fn is_alive(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl From<&Arc<Texture>> for TextureRef {
    fn from(texture: &Arc<Texture>) -> Self {
        Self::new(texture)
    }
}

/// Loads image files into GPU textures, once per path and color space.
///
/// Decode failures are not errors: the file is reported with `log::warn!`
/// and [`TextureCache::load`] returns `None`, leaving the material slot to its
/// default texture.
pub struct TextureCache {
    device: Arc<GraphicsDevice>,
    textures: HashMap<(PathBuf, ColorSpace), Arc<Texture>>,
}

impl TextureCache {
    /// Create an empty cache.
    pub fn new(device: Arc<GraphicsDevice>) -> Self {
        Self {
            device,
            textures: HashMap::new(),
        }
    }

    /// Load `path` with the default options.
    pub fn load(&mut self, path: impl AsRef<Path>, color_space: ColorSpace) -> Option<TextureRef> {
        self.load_with(path, color_space, &TextureLoadOptions::default())
    }

    /// Load `path`, or return the texture already loaded for it.
    ///
    /// Options only apply to the first load of a path.
    pub fn load_with(
        &mut self,
        path: impl AsRef<Path>,
        color_space: ColorSpace,
        options: &TextureLoadOptions,
    ) -> Option<TextureRef> {
        let path = path.as_ref();
        let key = (path.to_path_buf(), color_space);
        if let Some(texture) = self.textures.get(&key) {
            return Some(TextureRef::new(texture));
        }

        match self.decode_and_upload(path, color_space, options) {
            Ok(texture) => {
                log::debug!(
                    "TextureCache: loaded {} ({}x{}, {} levels, {:?})",
                    path.display(),
                    texture.width(),
                    texture.height(),
                    texture.mip_level_count(),
                    color_space
                );
                let handle = TextureRef::new(&texture);
                self.textures.insert(key, texture);
                Some(handle)
            }
            Err(err) => {
                log::warn!("Failed to load texture {}: {err}", path.display());
                None
            }
        }
    }

    fn decode_and_upload(
        &self,
        path: &Path,
        color_space: ColorSpace,
        options: &TextureLoadOptions,
    ) -> Result<Arc<Texture>, GraphicsError> {
        let image = image::open(path)
            .map_err(|e| GraphicsError::ResourceCreationFailed(e.to_string()))?;
        let image = if options.flip_vertically {
            image.flipv()
        } else {
            image
        };
        let rgba = image.into_rgba8();
        let (width, height) = rgba.dimensions();

        let mut descriptor =
            TextureDescriptor::new_2d(width, height, TextureFormat::for_color_space(color_space))
                .with_label(path.to_string_lossy());
        if options.generate_mipmaps {
            descriptor = descriptor.with_full_mip_chain();
        }

        self.device.create_texture(&descriptor, rgba.as_raw())
    }

    /// Drop every cached texture. Outstanding [`TextureRef`]s go dead.
    pub fn clear(&mut self) {
        self.textures.clear();
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

impl std::fmt::Debug for TextureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextureCache")
            .field("textures", &self.textures.len())
            .finish()
    }
}
