//! Material data types for CPU-side material definitions.
//!
//! A [`MaterialDescriptor`] is what a mesh file says about a surface: color
//! coefficients, a specular exponent, and texture file names per
//! [`TextureSlot`]. The graphics crate turns it into a bindable material.

/// How the texels of an image are encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Values are stored linearly (data textures, normal maps).
    #[default]
    Linear,
    /// Values are display-encoded and must be linearized by the sampler.
    Srgb,
}

/// A texture channel of a material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    /// Diffuse color, also used as PBR albedo.
    Diffuse,
    /// Specular intensity.
    Specular,
    /// PBR metalness.
    Metallic,
    /// PBR roughness.
    Roughness,
    /// Ambient occlusion.
    Ambient,
    /// Tangent-space normal map.
    Bump,
    /// Emitted light.
    Emissive,
    /// Alpha mask.
    Mask,
}

impl TextureSlot {
    /// Number of slots.
    pub const COUNT: usize = 8;

    /// Every slot, in declaration order.
    pub const ALL: [TextureSlot; Self::COUNT] = [
        Self::Diffuse,
        Self::Specular,
        Self::Metallic,
        Self::Roughness,
        Self::Ambient,
        Self::Bump,
        Self::Emissive,
        Self::Mask,
    ];

    /// Position of the slot within [`Self::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Color space the slot's image is stored in.
    ///
    /// Only the diffuse channel holds display-encoded color.
    pub fn color_space(self) -> ColorSpace {
        match self {
            Self::Diffuse => ColorSpace::Srgb,
            _ => ColorSpace::Linear,
        }
    }

    /// Short lowercase name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Diffuse => "diffuse",
            Self::Specular => "specular",
            Self::Metallic => "metallic",
            Self::Roughness => "roughness",
            Self::Ambient => "ambient",
            Self::Bump => "bump",
            Self::Emissive => "emissive",
            Self::Mask => "mask",
        }
    }
}

/// CPU-side material definition as read from a material library.
///
/// Texture names are stored as written in the file; an empty name means the
/// slot has no texture.
///
/// # Example
///
/// ```ignore
/// use lumen_core::material::*;
///
/// let mat = MaterialDescriptor::new("brick")
///     .with_diffuse([0.8, 0.3, 0.2])
///     .with_texture(TextureSlot::Bump, "brick_normal.png");
/// assert!(mat.has_bump_map());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialDescriptor {
    /// Material name.
    pub name: String,
    /// Ambient coefficient (`Ka`).
    pub ambient: [f32; 3],
    /// Diffuse coefficient (`Kd`).
    pub diffuse: [f32; 3],
    /// Specular coefficient (`Ks`).
    pub specular: [f32; 3],
    /// Emissive coefficient (`Ke`).
    pub emissive: [f32; 3],
    /// Specular exponent (`Ns`).
    pub shininess: f32,
    /// Opacity (`d`, or `1 - Tr`).
    pub dissolve: f32,
    /// Illumination model (`illum`), if given.
    pub illumination: Option<u8>,
    textures: [String; TextureSlot::COUNT],
}

impl MaterialDescriptor {
    /// Create a material with library defaults: black coefficients,
    /// shininess 1, fully opaque, no textures.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ambient: [0.0; 3],
            diffuse: [0.0; 3],
            specular: [0.0; 3],
            emissive: [0.0; 3],
            shininess: 1.0,
            dissolve: 1.0,
            illumination: None,
            textures: Default::default(),
        }
    }

    /// Set the diffuse coefficient.
    #[must_use]
    pub fn with_diffuse(mut self, diffuse: [f32; 3]) -> Self {
        self.diffuse = diffuse;
        self
    }

    /// Set a texture file name.
    #[must_use]
    pub fn with_texture(mut self, slot: TextureSlot, name: impl Into<String>) -> Self {
        self.set_texture(slot, name);
        self
    }

    /// Set a texture file name in place.
    pub fn set_texture(&mut self, slot: TextureSlot, name: impl Into<String>) {
        self.textures[slot.index()] = name.into();
    }

    /// Texture file name for a slot, or `None` if the slot is empty.
    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        let name = self.textures[slot.index()].as_str();
        (!name.is_empty()).then_some(name)
    }

    /// Iterate over the non-empty texture slots.
    pub fn textures(&self) -> impl Iterator<Item = (TextureSlot, &str)> {
        TextureSlot::ALL
            .into_iter()
            .filter_map(|slot| self.texture(slot).map(|name| (slot, name)))
    }

    /// Whether the material has a bump/normal map, which requires tangents.
    pub fn has_bump_map(&self) -> bool {
        self.texture(TextureSlot::Bump).is_some()
    }
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self::new("")
    }
}
