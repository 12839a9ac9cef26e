//! # esframe Graphics
//!
//! Safe owning wrappers around OpenGL ES 3.0 / WebGL 2 objects.
//!
//! ## Overview
//!
//! This crate provides:
//! - [`GraphicsDevice`] - Entry point that creates every resource
//! - [`Shader`], [`Program`], [`Sampler`], [`Texture`] - GL objects that are
//!   released exactly once, when dropped
//! - [`ErrorSlot`] - First-error-wins sink for creation failures
//! - [`GlBackend`] - Trait implemented by `glow::Context` and, behind the
//!   `dummy` feature, by a software driver for tests
//!
//! ## Example
//!
//! ```ignore
//! use esframe_graphics::{GraphicsDevice, ShaderStage, TextureFormat};
//!
//! let device = GraphicsDevice::new(gl);
//! let vertex = device.create_shader(ShaderStage::Vertex, VERTEX)?;
//! let fragment = device.create_shader(ShaderStage::Fragment, FRAGMENT)?;
//! let program = device.create_program(&vertex, &fragment)?;
//! let mvp = program.get_uniform_location("u_mvp");
//!
//! let texture = device.create_texture_2d(false, TextureFormat::Rgba8Unorm, [8, 8], 1)?;
//! assert_eq!(texture.mip_level_count(), 4);
//! ```

pub mod backend;
pub mod device;
pub mod error;
pub mod error_slot;
pub mod resources;
pub mod types;

// Re-export main types for convenience
#[cfg(feature = "dummy")]
pub use backend::dummy::DummyBackend;
pub use backend::{ActiveUniform, GlBackend};
pub use device::{DeviceCapabilities, GraphicsDevice};
pub use error::GraphicsError;
pub use error_slot::ErrorSlot;
pub use resources::{Program, Sampler, Shader, Texture, UniformInfo};
pub use types::{
    CompareFunction, Extent3d, MagFilter, MinFilter, SamplerDescriptor, ShaderStage,
    TextureFormat, TextureTarget, TextureType, TransferLayout, WrapMode,
};

/// The GL bindings the production backend is implemented for.
pub use glow;

/// Graphics library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the graphics subsystem.
///
/// This should be called before using any graphics functionality.
pub fn init() {
    log::info!("esframe Graphics v{} initialized", VERSION);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_dummy_device() {
        let device = GraphicsDevice::dummy();
        assert_eq!(device.name(), "Dummy Backend");
        assert_eq!(device.backend().live_objects().total(), 0);
    }
}
