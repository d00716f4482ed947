//! Texture types and descriptors.

use lumen_core::material::ColorSpace;

/// Texture storage formats. All textures are 8-bit RGBA.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    /// 8-bit RGBA channels, unsigned normalized.
    #[default]
    Rgba8Unorm,
    /// 8-bit RGBA channels, sRGB.
    Rgba8UnormSrgb,
}

impl TextureFormat {
    /// Format matching a color space.
    pub fn for_color_space(color_space: ColorSpace) -> Self {
        match color_space {
            ColorSpace::Linear => Self::Rgba8Unorm,
            ColorSpace::Srgb => Self::Rgba8UnormSrgb,
        }
    }

    /// Returns true if the sampler decodes sRGB values.
    pub fn is_srgb(&self) -> bool {
        matches!(self, Self::Rgba8UnormSrgb)
    }

    /// Returns the size in bytes per pixel.
    pub fn block_size(&self) -> u32 {
        4
    }
}

/// Descriptor for creating a 2D texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TextureDescriptor {
    /// Debug label for the texture.
    pub label: Option<String>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Mip level count, including the base level.
    pub mip_level_count: u32,
    /// Storage format.
    pub format: TextureFormat,
}

impl TextureDescriptor {
    /// A single-level 2D texture.
    pub fn new_2d(width: u32, height: u32, format: TextureFormat) -> Self {
        Self {
            label: None,
            width,
            height,
            mip_level_count: 1,
            format,
        }
    }

    /// Set the debug label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the mip level count.
    #[must_use]
    pub fn with_mip_level_count(mut self, count: u32) -> Self {
        self.mip_level_count = count;
        self
    }

    /// Request the full mip chain down to 1x1.
    #[must_use]
    pub fn with_full_mip_chain(self) -> Self {
        let count = full_mip_chain_len(self.width, self.height);
        self.with_mip_level_count(count)
    }

    /// Bytes of level 0 data expected at creation.
    pub fn base_level_size(&self) -> usize {
        self.width as usize * self.height as usize * self.format.block_size() as usize
    }
}

/// `floor(log2(max(width, height))) + 1`, or 0 for an empty image.
pub fn full_mip_chain_len(width: u32, height: u32) -> u32 {
    u32::BITS - width.max(height).leading_zeros()
}
