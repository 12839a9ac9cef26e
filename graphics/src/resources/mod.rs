//! GPU resources.
//!
//! This module contains the GL object wrappers created through
//! [`GraphicsDevice`]:
//! - [`Shader`] - compiled vertex or fragment stage
//! - [`Program`] - linked pipeline with a reflected uniform table
//! - [`Sampler`] - sampler state object
//! - [`Texture`] - immutable texture storage with its mip chain
//!
//! Every wrapper owns exactly one GL object and deletes it when dropped.
//! Factories are all-or-nothing: if any step fails, the partially built
//! wrapper is dropped and its object released before the error is returned.
//!
//! [`GraphicsDevice`]: crate::GraphicsDevice

mod program;
mod sampler;
mod shader;
mod texture;

pub use program::{Program, UniformInfo};
pub use sampler::Sampler;
pub use shader::Shader;
pub use texture::Texture;
