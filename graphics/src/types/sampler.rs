//! Sampler types and descriptors.

use crate::error::GraphicsError;

/// Texture coordinate wrapping behavior for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WrapMode {
    /// Clamp coordinates to the edge texels.
    ClampToEdge,
    /// Repeat the texture, mirroring every other repetition.
    MirroredRepeat,
    /// Repeat the texture.
    Repeat,
}

gl_enum!(WrapMode, "wrap mode", {
    ClampToEdge => glow::CLAMP_TO_EDGE,
    MirroredRepeat => glow::MIRRORED_REPEAT,
    Repeat => glow::REPEAT,
});

/// Minification filter, optionally combined with a mip interpolation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    /// Nearest texel, base level only.
    Nearest,
    /// Bilinear, base level only.
    Linear,
    /// Nearest texel from the nearest mip level.
    NearestMipmapNearest,
    /// Bilinear from the nearest mip level.
    LinearMipmapNearest,
    /// Nearest texel, blended between two mip levels.
    NearestMipmapLinear,
    /// Trilinear.
    LinearMipmapLinear,
}

gl_enum!(MinFilter, "minification filter", {
    Nearest => glow::NEAREST,
    Linear => glow::LINEAR,
    NearestMipmapNearest => glow::NEAREST_MIPMAP_NEAREST,
    LinearMipmapNearest => glow::LINEAR_MIPMAP_NEAREST,
    NearestMipmapLinear => glow::NEAREST_MIPMAP_LINEAR,
    LinearMipmapLinear => glow::LINEAR_MIPMAP_LINEAR,
});

impl MinFilter {
    /// Whether sampling reads from levels other than the base level.
    pub fn uses_mipmaps(&self) -> bool {
        !matches!(self, Self::Nearest | Self::Linear)
    }
}

/// Magnification filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear.
    Linear,
}

gl_enum!(MagFilter, "magnification filter", {
    Nearest => glow::NEAREST,
    Linear => glow::LINEAR,
});

/// Depth comparison function used by shadow samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

gl_enum!(CompareFunction, "compare function", {
    Never => glow::NEVER,
    Less => glow::LESS,
    Equal => glow::EQUAL,
    LessEqual => glow::LEQUAL,
    Greater => glow::GREATER,
    NotEqual => glow::NOTEQUAL,
    GreaterEqual => glow::GEQUAL,
    Always => glow::ALWAYS,
});

/// Descriptor for creating a sampler.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerDescriptor {
    /// Debug label for the sampler.
    pub label: Option<String>,
    /// Wrap mode for the S coordinate.
    pub wrap_s: WrapMode,
    /// Wrap mode for the T coordinate.
    pub wrap_t: WrapMode,
    /// Wrap mode for the R coordinate.
    pub wrap_r: WrapMode,
    /// Minification filter.
    pub min_filter: MinFilter,
    /// Magnification filter.
    pub mag_filter: MagFilter,
    /// Minimum LOD clamp.
    pub min_lod: f32,
    /// Maximum LOD clamp.
    pub max_lod: f32,
    /// Comparison function for depth sampling, `None` disables comparison.
    pub compare: Option<CompareFunction>,
}

impl SamplerDescriptor {
    /// Create a descriptor with every sampling parameter spelled out and
    /// depth comparison disabled.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        wrap_s: WrapMode,
        wrap_t: WrapMode,
        wrap_r: WrapMode,
        min_filter: MinFilter,
        mag_filter: MagFilter,
        min_lod: f32,
        max_lod: f32,
    ) -> Self {
        Self {
            label: None,
            wrap_s,
            wrap_t,
            wrap_r,
            min_filter,
            mag_filter,
            min_lod,
            max_lod,
            compare: None,
        }
    }

    /// Create a trilinear filtering sampler.
    pub fn linear() -> Self {
        Self {
            min_filter: MinFilter::LinearMipmapLinear,
            mag_filter: MagFilter::Linear,
            ..Default::default()
        }
    }

    /// Create a nearest neighbor filtering sampler.
    pub fn nearest() -> Self {
        Self {
            min_filter: MinFilter::NearestMipmapNearest,
            mag_filter: MagFilter::Nearest,
            ..Default::default()
        }
    }

    /// Set the debug label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the wrap mode for all coordinates.
    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_s = mode;
        self.wrap_t = mode;
        self.wrap_r = mode;
        self
    }

    /// Set the LOD clamp range.
    pub fn with_lod_range(mut self, min_lod: f32, max_lod: f32) -> Self {
        self.min_lod = min_lod;
        self.max_lod = max_lod;
        self
    }

    /// Set comparison function for depth sampling.
    pub fn with_compare(mut self, compare: CompareFunction) -> Self {
        self.compare = Some(compare);
        self
    }

    /// Check the LOD range.
    pub fn validate(&self) -> Result<(), GraphicsError> {
        if !self.min_lod.is_finite() || !self.max_lod.is_finite() {
            return Err(GraphicsError::InvalidParameter(format!(
                "sampler LOD range must be finite, got [{}, {}]",
                self.min_lod, self.max_lod
            )));
        }
        if self.min_lod > self.max_lod {
            return Err(GraphicsError::InvalidParameter(format!(
                "sampler min_lod {} exceeds max_lod {}",
                self.min_lod, self.max_lod
            )));
        }
        Ok(())
    }
}

impl Default for SamplerDescriptor {
    /// GL's initial sampler state.
    fn default() -> Self {
        Self {
            label: None,
            wrap_s: WrapMode::Repeat,
            wrap_t: WrapMode::Repeat,
            wrap_r: WrapMode::Repeat,
            min_filter: MinFilter::NearestMipmapLinear,
            mag_filter: MagFilter::Linear,
            min_lod: -1000.0,
            max_lod: 1000.0,
            compare: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_gl_initial_state() {
        let desc = SamplerDescriptor::default();
        assert_eq!(desc.wrap_s, WrapMode::Repeat);
        assert_eq!(desc.min_filter, MinFilter::NearestMipmapLinear);
        assert_eq!(desc.mag_filter, MagFilter::Linear);
        assert_eq!(desc.min_lod, -1000.0);
        assert_eq!(desc.max_lod, 1000.0);
        assert!(desc.compare.is_none());
    }

    #[test]
    fn test_builders() {
        let desc = SamplerDescriptor::linear()
            .with_label("shadow")
            .with_wrap_mode(WrapMode::ClampToEdge)
            .with_compare(CompareFunction::LessEqual);

        assert_eq!(desc.label.as_deref(), Some("shadow"));
        assert_eq!(desc.wrap_r, WrapMode::ClampToEdge);
        assert_eq!(desc.compare, Some(CompareFunction::LessEqual));
        assert!(desc.min_filter.uses_mipmaps());
    }

    #[test]
    fn test_validate_lod_range() {
        assert!(SamplerDescriptor::default().validate().is_ok());
        assert!(SamplerDescriptor::default()
            .with_lod_range(0.0, 0.0)
            .validate()
            .is_ok());
        assert!(matches!(
            SamplerDescriptor::default()
                .with_lod_range(4.0, 1.0)
                .validate(),
            Err(GraphicsError::InvalidParameter(_))
        ));
        assert!(matches!(
            SamplerDescriptor::default()
                .with_lod_range(f32::NAN, 1.0)
                .validate(),
            Err(GraphicsError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_raw_enumerants() {
        assert_eq!(WrapMode::try_from(glow::REPEAT), Ok(WrapMode::Repeat));
        assert_eq!(
            CompareFunction::try_from(glow::GEQUAL),
            Ok(CompareFunction::GreaterEqual)
        );
        // CLAMP_TO_BORDER is not part of GL ES 3.0.
        assert!(matches!(
            WrapMode::try_from(glow::CLAMP_TO_BORDER),
            Err(GraphicsError::InvalidEnumerant { kind: "wrap mode", .. })
        ));
        assert!(MagFilter::try_from(glow::LINEAR_MIPMAP_LINEAR).is_err());
    }
}
