//! Graphics device.
//!
//! The [`GraphicsDevice`] is the main interface for creating GPU resources.
//! It wraps a shared [`GlBackend`] together with the limits queried from it
//! once at construction.

use std::sync::Arc;

use crate::backend::GlBackend;
use crate::error::GraphicsError;
use crate::resources::{Program, Sampler, Shader, Texture};
use crate::types::{SamplerDescriptor, ShaderStage, TextureFormat};

/// Limits and optional features of a GL context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceCapabilities {
    /// Maximum width and height of a 2D texture.
    pub max_texture_dimension: u32,
    /// Maximum width, height and depth of a 3D texture.
    pub max_3d_texture_dimension: u32,
    /// Maximum edge length of a cube map face.
    pub max_cube_map_dimension: u32,
    /// Maximum number of layers of a 2D array texture.
    pub max_array_layers: u32,
    /// Number of texture units usable by a program.
    pub max_texture_units: u32,
    /// `EXT_texture_norm16` is available.
    pub texture_norm16: bool,
    /// BC1 (S3TC DXT1) compressed formats are available.
    pub texture_compression_bc1: bool,
    /// sRGB variants of BC1 are available.
    pub texture_compression_bc1_srgb: bool,
}

impl Default for DeviceCapabilities {
    /// The minimums every OpenGL ES 3.0 implementation guarantees.
    fn default() -> Self {
        Self {
            max_texture_dimension: 2048,
            max_3d_texture_dimension: 256,
            max_cube_map_dimension: 2048,
            max_array_layers: 256,
            max_texture_units: 32,
            texture_norm16: false,
            texture_compression_bc1: false,
            texture_compression_bc1_srgb: false,
        }
    }
}

impl DeviceCapabilities {
    /// Check that textures of `format` can be created.
    pub fn check_format(&self, format: TextureFormat) -> Result<(), GraphicsError> {
        if format.requires_norm16() && !self.texture_norm16 {
            return Err(GraphicsError::FeatureNotSupported(format!(
                "{format} requires EXT_texture_norm16"
            )));
        }
        if format.is_compressed() {
            let supported = if format.is_srgb() {
                self.texture_compression_bc1_srgb
            } else {
                self.texture_compression_bc1
            };
            if !supported {
                return Err(GraphicsError::FeatureNotSupported(format!(
                    "{format} requires S3TC texture compression"
                )));
            }
        }
        Ok(())
    }
}

/// A graphics device for creating GPU resources.
///
/// Cloning is cheap: clones share the backend. Every resource keeps a clone
/// of the device it was created from and uses it to release its GL object
/// when dropped.
///
/// # Example
///
/// ```ignore
/// let device = GraphicsDevice::new(gl);
///
/// let vertex = device.create_shader(ShaderStage::Vertex, VERTEX_SOURCE)?;
/// let fragment = device.create_shader(ShaderStage::Fragment, FRAGMENT_SOURCE)?;
/// let program = device.create_program(&vertex, &fragment)?;
/// let texture = device.create_texture_2d(false, TextureFormat::Rgba8Unorm, [256, 256], 1)?;
/// ```
pub struct GraphicsDevice<B: GlBackend> {
    backend: Arc<B>,
    capabilities: DeviceCapabilities,
}

impl<B: GlBackend> GraphicsDevice<B> {
    /// Create a device on top of a backend, querying its capabilities.
    pub fn new(backend: Arc<B>) -> Self {
        let capabilities = backend.query_capabilities();
        log::info!(
            "Graphics device: {} (max texture {}, norm16: {}, bc1: {})",
            backend.name(),
            capabilities.max_texture_dimension,
            capabilities.texture_norm16,
            capabilities.texture_compression_bc1
        );
        Self {
            backend,
            capabilities,
        }
    }

    /// Get the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Get the shared backend handle.
    pub fn backend_arc(&self) -> &Arc<B> {
        &self.backend
    }

    /// Get the device name.
    pub fn name(&self) -> &'static str {
        self.backend.name()
    }

    /// Get the device capabilities.
    pub fn capabilities(&self) -> &DeviceCapabilities {
        &self.capabilities
    }

    /// Return the oldest pending GL error, if any, clearing it.
    pub fn take_error(&self) -> Option<u32> {
        let error = self.backend.get_error();
        (error != glow::NO_ERROR).then_some(error)
    }

    /// Discard errors raised by earlier, unrelated calls so the next check is
    /// attributed to the right operation.
    pub(crate) fn discard_stale_errors(&self) {
        // GL keeps at most one flag per error kind.
        for _ in 0..8 {
            match self.take_error() {
                Some(error) => log::warn!("Discarding stale GL error {error:#06x}"),
                None => break,
            }
        }
    }

    /// Compile a shader.
    pub fn create_shader(
        &self,
        stage: ShaderStage,
        source: impl Into<String>,
    ) -> Result<Arc<Shader<B>>, GraphicsError> {
        Shader::create(self, stage, source).map(Arc::new)
    }

    /// Link a vertex and a fragment shader into a program.
    pub fn create_program(
        &self,
        vertex: &Arc<Shader<B>>,
        fragment: &Arc<Shader<B>>,
    ) -> Result<Program<B>, GraphicsError> {
        Program::create(self, vertex, fragment)
    }

    /// Create a sampler.
    pub fn create_sampler(
        &self,
        descriptor: &SamplerDescriptor,
    ) -> Result<Sampler<B>, GraphicsError> {
        Sampler::create(self, descriptor)
    }

    /// Create an immutable 2D (or 2D array) texture with a full or single
    /// level mip chain.
    pub fn create_texture_2d(
        &self,
        single_mip: bool,
        format: TextureFormat,
        extents: [u32; 2],
        n_layers: u32,
    ) -> Result<Texture<B>, GraphicsError> {
        Texture::create_immutable_2d(self, single_mip, format, extents, n_layers, None)
    }

    /// Create an immutable 3D texture.
    pub fn create_texture_3d(
        &self,
        single_mip: bool,
        format: TextureFormat,
        extents: [u32; 3],
    ) -> Result<Texture<B>, GraphicsError> {
        Texture::create_immutable_3d(self, single_mip, format, extents, None)
    }

    /// Create an immutable cube map.
    pub fn create_texture_cube(
        &self,
        single_mip: bool,
        format: TextureFormat,
        edge: u32,
    ) -> Result<Texture<B>, GraphicsError> {
        Texture::create_immutable_cube(self, single_mip, format, edge, None)
    }
}

#[cfg(feature = "dummy")]
impl GraphicsDevice<crate::backend::dummy::DummyBackend> {
    /// Create a device backed by a fresh software driver.
    pub fn dummy() -> Self {
        Self::new(Arc::new(crate::backend::dummy::DummyBackend::new()))
    }
}

impl<B: GlBackend> Clone for GraphicsDevice<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            capabilities: self.capabilities,
        }
    }
}

impl<B: GlBackend> std::fmt::Debug for GraphicsDevice<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphicsDevice")
            .field("name", &self.name())
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_device() {
        let device = GraphicsDevice::dummy();
        assert_eq!(device.name(), "Dummy Backend");
        assert!(device.capabilities().texture_norm16);
        assert_eq!(device.take_error(), None);
    }

    #[test]
    fn test_clone_shares_backend() {
        let device = GraphicsDevice::dummy();
        let clone = device.clone();
        assert!(Arc::ptr_eq(device.backend_arc(), clone.backend_arc()));
    }

    #[test]
    fn test_check_format() {
        let caps = DeviceCapabilities::default();
        assert!(caps.check_format(TextureFormat::Rgba8Unorm).is_ok());
        assert!(matches!(
            caps.check_format(TextureFormat::R16Unorm),
            Err(GraphicsError::FeatureNotSupported(_))
        ));

        let caps = DeviceCapabilities {
            texture_compression_bc1: true,
            ..Default::default()
        };
        assert!(caps.check_format(TextureFormat::Bc1RgbaUnorm).is_ok());
        assert!(caps.check_format(TextureFormat::Bc1RgbaUnormSrgb).is_err());
    }
}
