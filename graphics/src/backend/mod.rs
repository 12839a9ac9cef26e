//! GL backend abstraction layer.
//!
//! This module provides a trait-based abstraction over the small subset of
//! OpenGL ES 3.0 / WebGL 2 the resource wrappers need, allowing the graphics
//! crate to run against a real context or a software stand-in.
//!
//! # Available Backends
//!
//! - `glow::Context`: the production backend, native (through eframe's glutin
//!   context) and web (WebGL 2)
//! - `dummy` (default feature): software driver for tests and headless runs
//!
//! # Architecture
//!
//! Each backend implements the [`GlBackend`] trait, which provides:
//! - Shader compilation and program linking
//! - Active uniform reflection and uniform upload
//! - Sampler objects and immutable texture storage
//! - The sticky driver error flag
//!
//! Every object kind has its own associated handle type, so a texture handle
//! can never be passed where a sampler is expected. All methods must be called
//! on the thread that owns the GL context.

#[cfg(feature = "dummy")]
pub mod dummy;

mod glow_backend;

use std::fmt::Debug;
use std::hash::Hash;

use crate::device::DeviceCapabilities;

/// An active uniform as reported by the driver after a successful link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveUniform {
    /// Uniform name; arrays are reported with a `[0]` suffix.
    pub name: String,
    /// Array length, 1 for non-array uniforms.
    pub size: i32,
    /// GL type enumerant (`FLOAT_VEC4`, `SAMPLER_2D`, ...).
    pub utype: u32,
}

/// The GL entry points used by shaders, programs, samplers and textures.
///
/// Creation methods return `Err` with the driver's message when no object
/// could be allocated. Everything else follows GL semantics: failures are
/// recorded in the error flag returned by [`GlBackend::get_error`].
pub trait GlBackend: 'static {
    /// Shader object handle.
    type Shader: Copy + Eq + Hash + Debug;
    /// Program object handle.
    type Program: Copy + Eq + Hash + Debug;
    /// Sampler object handle.
    type Sampler: Copy + Eq + Hash + Debug;
    /// Texture object handle.
    type Texture: Copy + Eq + Hash + Debug;
    /// Uniform location within a linked program.
    type UniformLocation: Clone + Debug;

    /// Human readable backend name.
    fn name(&self) -> &'static str;

    /// Query implementation limits and extension support.
    fn query_capabilities(&self) -> DeviceCapabilities;

    /// Return and clear the oldest recorded error, `NO_ERROR` if none.
    fn get_error(&self) -> u32;

    // Shaders

    fn create_shader(&self, stage: u32) -> Result<Self::Shader, String>;
    fn shader_source(&self, shader: Self::Shader, source: &str);
    fn compile_shader(&self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&self, shader: Self::Shader);

    // Programs

    fn create_program(&self) -> Result<Self::Program, String>;
    fn attach_shader(&self, program: Self::Program, shader: Self::Shader);
    fn link_program(&self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn active_uniform_count(&self, program: Self::Program) -> u32;
    fn active_uniform(&self, program: Self::Program, index: u32) -> Option<ActiveUniform>;
    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;
    fn use_program(&self, program: Option<Self::Program>);
    /// Upload to the currently used program.
    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32);
    /// Upload to the currently used program.
    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32);
    fn delete_program(&self, program: Self::Program);

    // Samplers

    fn create_sampler(&self) -> Result<Self::Sampler, String>;
    fn sampler_parameter_i32(&self, sampler: Self::Sampler, name: u32, value: i32);
    fn sampler_parameter_f32(&self, sampler: Self::Sampler, name: u32, value: f32);
    fn bind_sampler(&self, unit: u32, sampler: Option<Self::Sampler>);
    fn delete_sampler(&self, sampler: Self::Sampler);

    // Textures

    fn create_texture(&self) -> Result<Self::Texture, String>;
    /// Select texture unit `unit` (an index, not a `TEXTURE0`-based enum).
    fn active_texture(&self, unit: u32);
    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>);
    fn tex_storage_2d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
    );
    #[allow(clippy::too_many_arguments)]
    fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    );
    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32);
    /// Replace a whole 2D level (or cube face) of the bound texture.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    );
    /// Replace a whole level of the bound 3D or 2D array texture.
    #[allow(clippy::too_many_arguments)]
    fn tex_sub_image_3d(
        &self,
        target: u32,
        level: u32,
        width: u32,
        height: u32,
        depth: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    );
    fn generate_mipmap(&self, target: u32);
    fn delete_texture(&self, texture: Self::Texture);
}
