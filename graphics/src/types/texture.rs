//! Texture types and descriptors.

use super::Extent3d;

// EXT_texture_norm16 and WEBGL_compressed_texture_s3tc(_srgb) enumerants.
const R16_SNORM_EXT: u32 = 0x8F98;
const R16_EXT: u32 = 0x822A;
const RG16_SNORM_EXT: u32 = 0x8F99;
const RG16_EXT: u32 = 0x822C;
const RGB16_SNORM_EXT: u32 = 0x8F9A;
const RGB16_EXT: u32 = 0x8054;
const RGBA16_SNORM_EXT: u32 = 0x8F9B;
const RGBA16_EXT: u32 = 0x805B;
const COMPRESSED_SRGB_S3TC_DXT1_EXT: u32 = 0x8C4C;
const COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT: u32 = 0x8C4D;
const COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;

/// Texture format enumeration.
///
/// The closed set of sized internal formats accepted for immutable storage:
/// the WebGL 2 core formats, the 16-bit normalized formats of
/// `EXT_texture_norm16` and the BC1 formats of `WEBGL_compressed_texture_s3tc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureFormat {
    // 8-bit per channel
    R8Unorm,
    R8Snorm,
    R8Uint,
    R8Sint,
    Rg8Unorm,
    Rg8Snorm,
    Rg8Uint,
    Rg8Sint,
    Rgb8Unorm,
    Rgb8Snorm,
    Rgb8Uint,
    Rgb8Sint,
    #[default]
    Rgba8Unorm,
    Rgba8Snorm,
    Rgba8Uint,
    Rgba8Sint,
    /// 8-bit RGB channels, sRGB encoded.
    Rgb8UnormSrgb,
    /// 8-bit RGBA channels, sRGB encoded color with linear alpha.
    Rgba8UnormSrgb,

    // 16-bit per channel
    R16Float,
    R16Uint,
    R16Sint,
    Rg16Float,
    Rg16Uint,
    Rg16Sint,
    Rgb16Float,
    Rgb16Uint,
    Rgb16Sint,
    Rgba16Float,
    Rgba16Uint,
    Rgba16Sint,

    // 16-bit normalized (EXT_texture_norm16)
    R16Unorm,
    R16Snorm,
    Rg16Unorm,
    Rg16Snorm,
    Rgb16Unorm,
    Rgb16Snorm,
    Rgba16Unorm,
    Rgba16Snorm,

    // 32-bit per channel
    R32Float,
    R32Uint,
    R32Sint,
    Rg32Float,
    Rg32Uint,
    Rg32Sint,
    Rgb32Float,
    Rgb32Uint,
    Rgb32Sint,
    Rgba32Float,
    Rgba32Uint,
    Rgba32Sint,

    // Packed
    /// 4-bit RGBA channels.
    Rgba4Unorm,
    /// 5-bit RGB channels with 1-bit alpha.
    Rgb5A1Unorm,
    /// 5-bit red, 6-bit green, 5-bit blue.
    Rgb565Unorm,
    /// 10-bit RGB channels with 2-bit alpha.
    Rgb10A2Unorm,
    /// 11-bit red and green, 10-bit blue, unsigned float.
    Rg11B10Float,
    /// 9-bit RGB mantissas sharing a 5-bit exponent.
    Rgb9E5Float,

    // Depth
    /// 32-bit depth, float.
    Depth32Float,

    // Block compressed (WEBGL_compressed_texture_s3tc / _srgb)
    /// BC1 (DXT1) with 1-bit alpha.
    Bc1RgbaUnorm,
    /// BC1 (DXT1) without alpha, sRGB encoded.
    Bc1RgbUnormSrgb,
    /// BC1 (DXT1) with 1-bit alpha, sRGB encoded.
    Bc1RgbaUnormSrgb,
}

gl_enum!(TextureFormat, "texture format", {
    R8Unorm => glow::R8,
    R8Snorm => glow::R8_SNORM,
    R8Uint => glow::R8UI,
    R8Sint => glow::R8I,
    Rg8Unorm => glow::RG8,
    Rg8Snorm => glow::RG8_SNORM,
    Rg8Uint => glow::RG8UI,
    Rg8Sint => glow::RG8I,
    Rgb8Unorm => glow::RGB8,
    Rgb8Snorm => glow::RGB8_SNORM,
    Rgb8Uint => glow::RGB8UI,
    Rgb8Sint => glow::RGB8I,
    Rgba8Unorm => glow::RGBA8,
    Rgba8Snorm => glow::RGBA8_SNORM,
    Rgba8Uint => glow::RGBA8UI,
    Rgba8Sint => glow::RGBA8I,
    Rgb8UnormSrgb => glow::SRGB8,
    Rgba8UnormSrgb => glow::SRGB8_ALPHA8,
    R16Float => glow::R16F,
    R16Uint => glow::R16UI,
    R16Sint => glow::R16I,
    Rg16Float => glow::RG16F,
    Rg16Uint => glow::RG16UI,
    Rg16Sint => glow::RG16I,
    Rgb16Float => glow::RGB16F,
    Rgb16Uint => glow::RGB16UI,
    Rgb16Sint => glow::RGB16I,
    Rgba16Float => glow::RGBA16F,
    Rgba16Uint => glow::RGBA16UI,
    Rgba16Sint => glow::RGBA16I,
    R16Unorm => R16_EXT,
    R16Snorm => R16_SNORM_EXT,
    Rg16Unorm => RG16_EXT,
    Rg16Snorm => RG16_SNORM_EXT,
    Rgb16Unorm => RGB16_EXT,
    Rgb16Snorm => RGB16_SNORM_EXT,
    Rgba16Unorm => RGBA16_EXT,
    Rgba16Snorm => RGBA16_SNORM_EXT,
    R32Float => glow::R32F,
    R32Uint => glow::R32UI,
    R32Sint => glow::R32I,
    Rg32Float => glow::RG32F,
    Rg32Uint => glow::RG32UI,
    Rg32Sint => glow::RG32I,
    Rgb32Float => glow::RGB32F,
    Rgb32Uint => glow::RGB32UI,
    Rgb32Sint => glow::RGB32I,
    Rgba32Float => glow::RGBA32F,
    Rgba32Uint => glow::RGBA32UI,
    Rgba32Sint => glow::RGBA32I,
    Rgba4Unorm => glow::RGBA4,
    Rgb5A1Unorm => glow::RGB5_A1,
    Rgb565Unorm => glow::RGB565,
    Rgb10A2Unorm => glow::RGB10_A2,
    Rg11B10Float => glow::R11F_G11F_B10F,
    Rgb9E5Float => glow::RGB9_E5,
    Depth32Float => glow::DEPTH_COMPONENT32F,
    Bc1RgbaUnorm => COMPRESSED_RGBA_S3TC_DXT1_EXT,
    Bc1RgbUnormSrgb => COMPRESSED_SRGB_S3TC_DXT1_EXT,
    Bc1RgbaUnormSrgb => COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT,
});

/// Client-side pixel layout used when uploading texel data for a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransferLayout {
    /// Pixel format (`RGBA`, `RED_INTEGER`, ...).
    pub format: u32,
    /// Component type (`UNSIGNED_BYTE`, `HALF_FLOAT`, ...).
    pub ty: u32,
}

impl TransferLayout {
    const fn new(format: u32, ty: u32) -> Self {
        Self { format, ty }
    }
}

impl TextureFormat {
    /// The sized internal format passed to `glTexStorage*`.
    pub const fn gl_internal_format(self) -> u32 {
        self.gl_enum()
    }

    /// Returns true for block-compressed formats.
    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            Self::Bc1RgbaUnorm | Self::Bc1RgbUnormSrgb | Self::Bc1RgbaUnormSrgb
        )
    }

    /// Returns true if this is a depth format.
    pub fn is_depth(&self) -> bool {
        matches!(self, Self::Depth32Float)
    }

    /// Returns true if color values are sRGB encoded.
    pub fn is_srgb(&self) -> bool {
        matches!(
            self,
            Self::Rgb8UnormSrgb
                | Self::Rgba8UnormSrgb
                | Self::Bc1RgbUnormSrgb
                | Self::Bc1RgbaUnormSrgb
        )
    }

    /// Returns true for formats sampled as integers.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Self::R8Uint
                | Self::R8Sint
                | Self::Rg8Uint
                | Self::Rg8Sint
                | Self::Rgb8Uint
                | Self::Rgb8Sint
                | Self::Rgba8Uint
                | Self::Rgba8Sint
                | Self::R16Uint
                | Self::R16Sint
                | Self::Rg16Uint
                | Self::Rg16Sint
                | Self::Rgb16Uint
                | Self::Rgb16Sint
                | Self::Rgba16Uint
                | Self::Rgba16Sint
                | Self::R32Uint
                | Self::R32Sint
                | Self::Rg32Uint
                | Self::Rg32Sint
                | Self::Rgb32Uint
                | Self::Rgb32Sint
                | Self::Rgba32Uint
                | Self::Rgba32Sint
        )
    }

    /// Returns the size in bytes per texel, or per 4x4 block for compressed
    /// formats.
    pub fn block_size(&self) -> u32 {
        match self {
            Self::R8Unorm | Self::R8Snorm | Self::R8Uint | Self::R8Sint => 1,
            Self::Rg8Unorm
            | Self::Rg8Snorm
            | Self::Rg8Uint
            | Self::Rg8Sint
            | Self::R16Float
            | Self::R16Uint
            | Self::R16Sint
            | Self::R16Unorm
            | Self::R16Snorm
            | Self::Rgba4Unorm
            | Self::Rgb5A1Unorm
            | Self::Rgb565Unorm => 2,
            Self::Rgb8Unorm
            | Self::Rgb8Snorm
            | Self::Rgb8Uint
            | Self::Rgb8Sint
            | Self::Rgb8UnormSrgb => 3,
            Self::Rgba8Unorm
            | Self::Rgba8Snorm
            | Self::Rgba8Uint
            | Self::Rgba8Sint
            | Self::Rgba8UnormSrgb
            | Self::Rg16Float
            | Self::Rg16Uint
            | Self::Rg16Sint
            | Self::Rg16Unorm
            | Self::Rg16Snorm
            | Self::R32Float
            | Self::R32Uint
            | Self::R32Sint
            | Self::Rgb10A2Unorm
            | Self::Rg11B10Float
            | Self::Rgb9E5Float
            | Self::Depth32Float => 4,
            Self::Rgb16Float
            | Self::Rgb16Uint
            | Self::Rgb16Sint
            | Self::Rgb16Unorm
            | Self::Rgb16Snorm => 6,
            Self::Rgba16Float
            | Self::Rgba16Uint
            | Self::Rgba16Sint
            | Self::Rgba16Unorm
            | Self::Rgba16Snorm
            | Self::Rg32Float
            | Self::Rg32Uint
            | Self::Rg32Sint => 8,
            Self::Rgb32Float | Self::Rgb32Uint | Self::Rgb32Sint => 12,
            Self::Rgba32Float | Self::Rgba32Uint | Self::Rgba32Sint => 16,
            Self::Bc1RgbaUnorm | Self::Bc1RgbUnormSrgb | Self::Bc1RgbaUnormSrgb => 8,
        }
    }

    /// Width and height of one block in texels.
    pub fn block_dimensions(&self) -> (u32, u32) {
        if self.is_compressed() {
            (4, 4)
        } else {
            (1, 1)
        }
    }

    /// Number of bytes one full mip level of the given extent occupies.
    pub fn level_byte_size(&self, extent: Extent3d) -> u64 {
        let (block_w, block_h) = self.block_dimensions();
        let blocks_x = extent.width.div_ceil(block_w) as u64;
        let blocks_y = extent.height.div_ceil(block_h) as u64;
        blocks_x * blocks_y * extent.depth as u64 * self.block_size() as u64
    }

    /// The client format/type pair for `glTexSubImage*` uploads, `None` for
    /// compressed formats.
    pub fn transfer_layout(&self) -> Option<TransferLayout> {
        use glow::{
            BYTE, DEPTH_COMPONENT, FLOAT, HALF_FLOAT, INT, RED, RED_INTEGER, RG, RGB, RGBA,
            RGBA_INTEGER, RGB_INTEGER, RG_INTEGER, SHORT, UNSIGNED_BYTE, UNSIGNED_INT,
            UNSIGNED_INT_10F_11F_11F_REV, UNSIGNED_INT_2_10_10_10_REV,
            UNSIGNED_INT_5_9_9_9_REV, UNSIGNED_SHORT, UNSIGNED_SHORT_4_4_4_4,
            UNSIGNED_SHORT_5_5_5_1, UNSIGNED_SHORT_5_6_5,
        };

        let (format, ty) = match self {
            Self::R8Unorm => (RED, UNSIGNED_BYTE),
            Self::R8Snorm => (RED, BYTE),
            Self::R8Uint => (RED_INTEGER, UNSIGNED_BYTE),
            Self::R8Sint => (RED_INTEGER, BYTE),
            Self::Rg8Unorm => (RG, UNSIGNED_BYTE),
            Self::Rg8Snorm => (RG, BYTE),
            Self::Rg8Uint => (RG_INTEGER, UNSIGNED_BYTE),
            Self::Rg8Sint => (RG_INTEGER, BYTE),
            Self::Rgb8Unorm | Self::Rgb8UnormSrgb => (RGB, UNSIGNED_BYTE),
            Self::Rgb8Snorm => (RGB, BYTE),
            Self::Rgb8Uint => (RGB_INTEGER, UNSIGNED_BYTE),
            Self::Rgb8Sint => (RGB_INTEGER, BYTE),
            Self::Rgba8Unorm | Self::Rgba8UnormSrgb => (RGBA, UNSIGNED_BYTE),
            Self::Rgba8Snorm => (RGBA, BYTE),
            Self::Rgba8Uint => (RGBA_INTEGER, UNSIGNED_BYTE),
            Self::Rgba8Sint => (RGBA_INTEGER, BYTE),
            Self::R16Float => (RED, HALF_FLOAT),
            Self::R16Uint => (RED_INTEGER, UNSIGNED_SHORT),
            Self::R16Sint => (RED_INTEGER, SHORT),
            Self::Rg16Float => (RG, HALF_FLOAT),
            Self::Rg16Uint => (RG_INTEGER, UNSIGNED_SHORT),
            Self::Rg16Sint => (RG_INTEGER, SHORT),
            Self::Rgb16Float => (RGB, HALF_FLOAT),
            Self::Rgb16Uint => (RGB_INTEGER, UNSIGNED_SHORT),
            Self::Rgb16Sint => (RGB_INTEGER, SHORT),
            Self::Rgba16Float => (RGBA, HALF_FLOAT),
            Self::Rgba16Uint => (RGBA_INTEGER, UNSIGNED_SHORT),
            Self::Rgba16Sint => (RGBA_INTEGER, SHORT),
            Self::R16Unorm => (RED, UNSIGNED_SHORT),
            Self::R16Snorm => (RED, SHORT),
            Self::Rg16Unorm => (RG, UNSIGNED_SHORT),
            Self::Rg16Snorm => (RG, SHORT),
            Self::Rgb16Unorm => (RGB, UNSIGNED_SHORT),
            Self::Rgb16Snorm => (RGB, SHORT),
            Self::Rgba16Unorm => (RGBA, UNSIGNED_SHORT),
            Self::Rgba16Snorm => (RGBA, SHORT),
            Self::R32Float => (RED, FLOAT),
            Self::R32Uint => (RED_INTEGER, UNSIGNED_INT),
            Self::R32Sint => (RED_INTEGER, INT),
            Self::Rg32Float => (RG, FLOAT),
            Self::Rg32Uint => (RG_INTEGER, UNSIGNED_INT),
            Self::Rg32Sint => (RG_INTEGER, INT),
            Self::Rgb32Float => (RGB, FLOAT),
            Self::Rgb32Uint => (RGB_INTEGER, UNSIGNED_INT),
            Self::Rgb32Sint => (RGB_INTEGER, INT),
            Self::Rgba32Float => (RGBA, FLOAT),
            Self::Rgba32Uint => (RGBA_INTEGER, UNSIGNED_INT),
            Self::Rgba32Sint => (RGBA_INTEGER, INT),
            Self::Rgba4Unorm => (RGBA, UNSIGNED_SHORT_4_4_4_4),
            Self::Rgb5A1Unorm => (RGBA, UNSIGNED_SHORT_5_5_5_1),
            Self::Rgb565Unorm => (RGB, UNSIGNED_SHORT_5_6_5),
            Self::Rgb10A2Unorm => (RGBA, UNSIGNED_INT_2_10_10_10_REV),
            Self::Rg11B10Float => (RGB, UNSIGNED_INT_10F_11F_11F_REV),
            Self::Rgb9E5Float => (RGB, UNSIGNED_INT_5_9_9_9_REV),
            Self::Depth32Float => (DEPTH_COMPONENT, FLOAT),
            Self::Bc1RgbaUnorm | Self::Bc1RgbUnormSrgb | Self::Bc1RgbaUnormSrgb => {
                return None;
            }
        };

        Some(TransferLayout::new(format, ty))
    }

    /// Returns true for formats that need `EXT_texture_norm16`.
    pub fn requires_norm16(&self) -> bool {
        matches!(
            self,
            Self::R16Unorm
                | Self::R16Snorm
                | Self::Rg16Unorm
                | Self::Rg16Snorm
                | Self::Rgb16Unorm
                | Self::Rgb16Snorm
                | Self::Rgba16Unorm
                | Self::Rgba16Snorm
        )
    }
}

impl std::fmt::Display for TextureFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Texture kind as requested by the caller.
///
/// 2D arrays are not a separate kind: a [`TextureType::Texture2d`] with more
/// than one layer binds to [`TextureTarget::Texture2dArray`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    /// 2D texture, possibly layered.
    Texture2d,
    /// 3D (volume) texture.
    Texture3d,
    /// Cube map with six square faces.
    Cube,
}

impl TextureType {
    /// The bind target for a texture of this kind with the given extents.
    pub fn target(&self, extent: Extent3d) -> TextureTarget {
        match self {
            Self::Texture2d if extent.depth > 1 => TextureTarget::Texture2dArray,
            Self::Texture2d => TextureTarget::Texture2d,
            Self::Texture3d => TextureTarget::Texture3d,
            Self::Cube => TextureTarget::CubeMap,
        }
    }
}

impl std::fmt::Display for TextureType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Texture2d => "2D",
            Self::Texture3d => "3D",
            Self::Cube => "Cube",
        })
    }
}

/// GL bind target of a texture object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureTarget {
    Texture2d,
    Texture2dArray,
    Texture3d,
    CubeMap,
}

gl_enum!(TextureTarget, "texture target", {
    Texture2d => glow::TEXTURE_2D,
    Texture2dArray => glow::TEXTURE_2D_ARRAY,
    Texture3d => glow::TEXTURE_3D,
    CubeMap => glow::TEXTURE_CUBE_MAP,
});

impl TextureTarget {
    /// Whether storage is allocated with `glTexStorage3D`; the others use
    /// `glTexStorage2D`.
    pub fn is_volumetric(&self) -> bool {
        matches!(self, Self::Texture2dArray | Self::Texture3d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphicsError;

    #[test]
    fn test_internal_format_lookup() {
        assert_eq!(TextureFormat::Rgba8Unorm.gl_internal_format(), 0x8058);
        assert_eq!(TextureFormat::R16Snorm.gl_internal_format(), 0x8F98);
        assert_eq!(
            TextureFormat::try_from(0x83F1),
            Ok(TextureFormat::Bc1RgbaUnorm)
        );
        assert_eq!(
            TextureFormat::try_from(glow::SRGB8_ALPHA8),
            Ok(TextureFormat::Rgba8UnormSrgb)
        );
    }

    #[test]
    fn test_unsized_format_is_rejected() {
        assert_eq!(
            TextureFormat::try_from(glow::RGBA),
            Err(GraphicsError::InvalidEnumerant {
                kind: "texture format",
                value: glow::RGBA,
            })
        );
    }

    #[test]
    fn test_internal_formats_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for format in TextureFormat::ALL {
            assert!(seen.insert(format.gl_internal_format()), "{format}");
        }
    }

    #[test]
    fn test_only_compressed_formats_lack_transfer_layout() {
        for format in TextureFormat::ALL {
            assert_eq!(format.transfer_layout().is_none(), format.is_compressed());
        }
    }

    #[test]
    fn test_level_byte_size() {
        let extent = Extent3d::new_3d(4, 4, 1);
        assert_eq!(TextureFormat::Rgba8Unorm.level_byte_size(extent), 64);
        assert_eq!(TextureFormat::Rgb16Float.level_byte_size(extent), 96);
        assert_eq!(TextureFormat::Bc1RgbaUnorm.level_byte_size(extent), 8);
        // Partial blocks round up.
        assert_eq!(
            TextureFormat::Bc1RgbaUnorm.level_byte_size(Extent3d::new_2d(5, 1)),
            16
        );
    }

    #[test]
    fn test_texture_type_target() {
        assert_eq!(
            TextureType::Texture2d.target(Extent3d::new_2d(8, 8)),
            TextureTarget::Texture2d
        );
        assert_eq!(
            TextureType::Texture2d.target(Extent3d::new_3d(8, 8, 4)),
            TextureTarget::Texture2dArray
        );
        assert_eq!(
            TextureType::Cube.target(Extent3d::new_3d(8, 8, 6)),
            TextureTarget::CubeMap
        );
        assert!(TextureTarget::Texture3d.is_volumetric());
        assert!(!TextureTarget::CubeMap.is_volumetric());
    }
}
