//! [`GlBackend`] for a live `glow` context.
//!
//! Used by the native build (eframe's glutin context) and the web build
//! (WebGL 2) alike. Handles are only ever produced by this context and the
//! resource wrappers delete each of them exactly once, which is what the
//! `unsafe` blocks below rely on.

use glow::HasContext;

use crate::device::DeviceCapabilities;

use super::{ActiveUniform, GlBackend};

impl GlBackend for glow::Context {
    type Shader = <glow::Context as HasContext>::Shader;
    type Program = <glow::Context as HasContext>::Program;
    type Sampler = <glow::Context as HasContext>::Sampler;
    type Texture = <glow::Context as HasContext>::Texture;
    type UniformLocation = <glow::Context as HasContext>::UniformLocation;

    fn name(&self) -> &'static str {
        if self.version().is_embedded {
            "OpenGL ES (glow)"
        } else {
            "OpenGL (glow)"
        }
    }

    fn query_capabilities(&self) -> DeviceCapabilities {
        let limit = |name: u32| unsafe { self.get_parameter_i32(name) }.max(0) as u32;
        let extensions = self.supported_extensions();
        let has = |names: &[&str]| names.iter().any(|name| extensions.contains(*name));
        let desktop = !self.version().is_embedded;

        DeviceCapabilities {
            max_texture_dimension: limit(glow::MAX_TEXTURE_SIZE),
            max_3d_texture_dimension: limit(glow::MAX_3D_TEXTURE_SIZE),
            max_cube_map_dimension: limit(glow::MAX_CUBE_MAP_TEXTURE_SIZE),
            max_array_layers: limit(glow::MAX_ARRAY_TEXTURE_LAYERS),
            max_texture_units: limit(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS),
            texture_norm16: desktop || has(&["GL_EXT_texture_norm16", "EXT_texture_norm16"]),
            texture_compression_bc1: has(&[
                "GL_EXT_texture_compression_s3tc",
                "GL_EXT_texture_compression_dxt1",
                "WEBGL_compressed_texture_s3tc",
            ]),
            texture_compression_bc1_srgb: has(&[
                "GL_EXT_texture_compression_s3tc_srgb",
                "GL_EXT_texture_sRGB",
                "WEBGL_compressed_texture_s3tc_srgb",
            ]),
        }
    }

    fn get_error(&self) -> u32 {
        unsafe { HasContext::get_error(self) }
    }

    fn create_shader(&self, stage: u32) -> Result<Self::Shader, String> {
        log::trace!("glow: create_shader({stage:#06x})");
        unsafe { HasContext::create_shader(self, stage) }
    }

    fn shader_source(&self, shader: Self::Shader, source: &str) {
        unsafe { HasContext::shader_source(self, shader, source) }
    }

    fn compile_shader(&self, shader: Self::Shader) {
        unsafe { HasContext::compile_shader(self, shader) }
    }

    fn shader_compile_status(&self, shader: Self::Shader) -> bool {
        unsafe { self.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: Self::Shader) -> String {
        unsafe { self.get_shader_info_log(shader) }
    }

    fn delete_shader(&self, shader: Self::Shader) {
        log::trace!("glow: delete_shader({shader:?})");
        unsafe { HasContext::delete_shader(self, shader) }
    }

    fn create_program(&self) -> Result<Self::Program, String> {
        log::trace!("glow: create_program()");
        unsafe { HasContext::create_program(self) }
    }

    fn attach_shader(&self, program: Self::Program, shader: Self::Shader) {
        unsafe { HasContext::attach_shader(self, program, shader) }
    }

    fn link_program(&self, program: Self::Program) {
        unsafe { HasContext::link_program(self, program) }
    }

    fn program_link_status(&self, program: Self::Program) -> bool {
        unsafe { self.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: Self::Program) -> String {
        unsafe { self.get_program_info_log(program) }
    }

    fn active_uniform_count(&self, program: Self::Program) -> u32 {
        unsafe { self.get_active_uniforms(program) }
    }

    fn active_uniform(&self, program: Self::Program, index: u32) -> Option<ActiveUniform> {
        unsafe { self.get_active_uniform(program, index) }.map(|uniform| ActiveUniform {
            name: uniform.name,
            size: uniform.size,
            utype: uniform.utype,
        })
    }

    fn uniform_location(
        &self,
        program: Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation> {
        unsafe { self.get_uniform_location(program, name) }
    }

    fn use_program(&self, program: Option<Self::Program>) {
        unsafe { HasContext::use_program(self, program) }
    }

    fn uniform_1_i32(&self, location: &Self::UniformLocation, value: i32) {
        unsafe { HasContext::uniform_1_i32(self, Some(location), value) }
    }

    fn uniform_1_f32(&self, location: &Self::UniformLocation, value: f32) {
        unsafe { HasContext::uniform_1_f32(self, Some(location), value) }
    }

    fn delete_program(&self, program: Self::Program) {
        log::trace!("glow: delete_program({program:?})");
        unsafe { HasContext::delete_program(self, program) }
    }

    fn create_sampler(&self) -> Result<Self::Sampler, String> {
        log::trace!("glow: create_sampler()");
        unsafe { HasContext::create_sampler(self) }
    }

    fn sampler_parameter_i32(&self, sampler: Self::Sampler, name: u32, value: i32) {
        unsafe { HasContext::sampler_parameter_i32(self, sampler, name, value) }
    }

    fn sampler_parameter_f32(&self, sampler: Self::Sampler, name: u32, value: f32) {
        unsafe { HasContext::sampler_parameter_f32(self, sampler, name, value) }
    }

    fn bind_sampler(&self, unit: u32, sampler: Option<Self::Sampler>) {
        unsafe { HasContext::bind_sampler(self, unit, sampler) }
    }

    fn delete_sampler(&self, sampler: Self::Sampler) {
        log::trace!("glow: delete_sampler({sampler:?})");
        unsafe { HasContext::delete_sampler(self, sampler) }
    }

    fn create_texture(&self) -> Result<Self::Texture, String> {
        log::trace!("glow: create_texture()");
        unsafe { HasContext::create_texture(self) }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { HasContext::active_texture(self, glow::TEXTURE0 + unit) }
    }

    fn bind_texture(&self, target: u32, texture: Option<Self::Texture>) {
        unsafe { HasContext::bind_texture(self, target, texture) }
    }

    fn tex_storage_2d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
    ) {
        log::trace!(
            "glow: tex_storage_2d({target:#06x}, {levels}, {internal_format:#06x}, {width}x{height})"
        );
        unsafe {
            HasContext::tex_storage_2d(
                self,
                target,
                levels as i32,
                internal_format,
                width as i32,
                height as i32,
            )
        }
    }

    fn tex_storage_3d(
        &self,
        target: u32,
        levels: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) {
        log::trace!(
            "glow: tex_storage_3d({target:#06x}, {levels}, {internal_format:#06x}, {width}x{height}x{depth})"
        );
        unsafe {
            HasContext::tex_storage_3d(
                self,
                target,
                levels as i32,
                internal_format,
                width as i32,
                height as i32,
                depth as i32,
            )
        }
    }

    fn tex_parameter_i32(&self, target: u32, name: u32, value: i32) {
        unsafe { HasContext::tex_parameter_i32(self, target, name, value) }
    }

    fn tex_sub_image_2d(
        &self,
        target: u32,
        level: u32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        data: &[u8],
    ) {
        unsafe {
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            HasContext::tex_sub_image_2d(
                self,
                target,
                level as i32,
                0,
                0,
                width as i32,
                height as i32,
                format,
                ty,
                glow::PixelUnpackData::Slice(Some(data)),
            )
        }
    }

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
    ) {
        unsafe {
            self.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            HasContext::tex_sub_image_3d(
                self,
                target,
                level as i32,
                0,
                0,
                0,
                width as i32,
                height as i32,
                depth as i32,
                format,
                ty,
                glow::PixelUnpackData::Slice(Some(data)),
            )
        }
    }

    fn generate_mipmap(&self, target: u32) {
        unsafe { HasContext::generate_mipmap(self, target) }
    }

    fn delete_texture(&self, texture: Self::Texture) {
        log::trace!("glow: delete_texture({texture:?})");
        unsafe { HasContext::delete_texture(self, texture) }
    }
}
