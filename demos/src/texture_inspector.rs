//! # Texture Inspector
//!
//! Demonstrates:
//! - Shader compilation and program linking with uniform reflection
//! - Immutable texture storage with a full mip chain
//! - Per-level uploads and driver-side mipmap generation
//! - Sampler objects bound next to textures
//! - Drag & drop of PNG/JPEG images
//!
//! The inspector starts with a checkerboard whose mip levels are tinted, so
//! the level picked by the sampler is visible. Dropping an image replaces it.

use eframe::egui_glow::ShaderVersion;
use esframe_app::graphics::glow::{self, HasContext};
use esframe_app::graphics::{
    Extent3d, Program, Sampler, SamplerDescriptor, ShaderStage, Texture, TextureFormat, WrapMode,
};
use esframe_app::{egui, AppContext, AppError, AppHandler, MouseButton};

/// Quad covering `u_scale` of the viewport, generated from `gl_VertexID`.
const VERTEX_BODY: &str = r#"
uniform float u_scale_x;
uniform float u_scale_y;

out vec2 v_uv;

void main() {
    vec2 corner = vec2(float(gl_VertexID & 1), float((gl_VertexID >> 1) & 1));
    v_uv = vec2(corner.x, 1.0 - corner.y);
    gl_Position = vec4((corner * 2.0 - 1.0) * vec2(u_scale_x, u_scale_y), 0.0, 1.0);
}
"#;

/// Samples the texture at the automatic level, or at `u_lod` when it is not
/// negative.
const FRAGMENT_BODY: &str = r#"
precision mediump float;

uniform sampler2D u_texture;
uniform float u_lod;

in vec2 v_uv;
out vec4 frag_color;

void main() {
    if (u_lod < 0.0) {
        frag_color = texture(u_texture, v_uv);
    } else {
        frag_color = textureLod(u_texture, v_uv, u_lod);
    }
}
"#;

const CHECKERBOARD_SIZE: u32 = 256;
const CHECKERBOARD_CELL: u32 = 16;

/// Tint per mip level of the checkerboard.
const LEVEL_TINTS: [[u8; 3]; 6] = [
    [255, 255, 255],
    [255, 96, 96],
    [96, 255, 96],
    [96, 96, 255],
    [255, 255, 96],
    [96, 255, 255],
];

const TEXTURE_UNIT: u32 = 0;
const MIN_ZOOM: f32 = 0.05;
const MAX_ZOOM: f32 = 20.0;

/// GL objects owned by the inspector.
struct GpuResources {
    program: Program<glow::Context>,
    sampler: Sampler<glow::Context>,
    texture: Texture<glow::Context>,
    vertex_array: glow::VertexArray,
}

/// Handler showing one texture and its mip chain.
pub struct TextureInspector {
    resources: Option<GpuResources>,
    texture_name: String,
    /// Sampled level, `None` lets the sampler choose.
    lod: Option<f32>,
    zoom: f32,
}

impl Default for TextureInspector {
    fn default() -> Self {
        Self::new()
    }
}

impl TextureInspector {
    pub fn new() -> Self {
        Self {
            resources: None,
            texture_name: "checkerboard".to_string(),
            lod: None,
            zoom: 1.0,
        }
    }

    fn create_gpu_resources(&mut self, ctx: &AppContext) -> Result<(), AppError> {
        let device = ctx.device();
        let gl = device.backend();

        let version = ShaderVersion::get(gl);
        if !version.is_new_shader_interface() {
            return Err(AppError::message(format!(
                "the texture inspector needs GLSL ES 3.00 or GLSL 1.40, the context offers {version:?}"
            )));
        }
        let header = version.version_declaration();

        let vertex = device.create_shader(ShaderStage::Vertex, format!("{header}\n{VERTEX_BODY}"))?;
        let fragment =
            device.create_shader(ShaderStage::Fragment, format!("{header}\n{FRAGMENT_BODY}"))?;
        let program = device.create_program(&vertex, &fragment)?;
        program.set_uniform_i32("u_texture", TEXTURE_UNIT as i32)?;
        for (name, info) in program.uniforms() {
            log::debug!("Uniform {name}: type {:#06x}, size {}", info.utype, info.size);
        }

        let sampler = device.create_sampler(
            &SamplerDescriptor::linear()
                .with_wrap_mode(WrapMode::ClampToEdge)
                .with_label("inspector_sampler"),
        )?;

        let texture = create_checkerboard(ctx)?;

        let vertex_array = unsafe { gl.create_vertex_array() }
            .map_err(|err| AppError::message(format!("Failed to create vertex array: {err}")))?;

        self.resources = Some(GpuResources {
            program,
            sampler,
            texture,
            vertex_array,
        });
        Ok(())
    }

    fn replace_texture(&mut self, ctx: &AppContext, name: &str, bytes: &[u8]) -> Result<(), AppError> {
        let image = image::load_from_memory(bytes)
            .map_err(|err| AppError::message(format!("Failed to decode image [{name}]: {err}")))?
            .to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("Decoded [{name}]: {width}x{height}");

        let texture = ctx.device().create_texture_2d(
            false,
            TextureFormat::Rgba8UnormSrgb,
            [width, height],
            1,
        )?;
        texture.write_level(0, image.as_raw())?;
        texture.generate_mipmaps()?;

        if let Some(resources) = &mut self.resources {
            resources.texture = texture;
        }
        self.texture_name = name.to_string();
        self.lod = None;
        self.zoom = 1.0;
        Ok(())
    }

    /// Fraction of the viewport covered by the quad on each axis.
    fn quad_scale(&self, texture: &Texture<glow::Context>, viewport_aspect: f32) -> (f32, f32) {
        let extents = texture.extents();
        let texture_aspect = extents.width as f32 / extents.height.max(1) as f32;
        let (x, y) = if texture_aspect > viewport_aspect {
            (1.0, viewport_aspect / texture_aspect)
        } else {
            (texture_aspect / viewport_aspect, 1.0)
        };
        (x * self.zoom * 0.9, y * self.zoom * 0.9)
    }
}

impl AppHandler for TextureInspector {
    fn on_init(&mut self, ctx: &mut AppContext) -> Result<(), AppError> {
        log::info!("Initializing Texture Inspector");
        log::info!("Drop a PNG or JPEG file onto the window to inspect it.");
        self.create_gpu_resources(ctx)
    }

    fn configure_ui(&mut self, ui: &egui::Context, _ctx: &mut AppContext) {
        let Some(resources) = &self.resources else {
            return;
        };
        let texture = &resources.texture;

        egui::Window::new("Texture")
            .default_pos([16.0, 16.0])
            .resizable(false)
            .show(ui, |ui| {
                ui.label(format!("Source: {}", self.texture_name));
                ui.label(format!("Type: {}", texture.texture_type()));
                ui.label(format!("Format: {}", texture.format()));
                ui.label(format!("Levels: {}", texture.mip_level_count()));
                ui.separator();

                egui::Grid::new("mip_levels").striped(true).show(ui, |ui| {
                    for (level, size) in texture.mip_chain().iter().enumerate() {
                        let stored = (level as u32) < texture.mip_level_count();
                        ui.label(format!("{level}"));
                        ui.label(format!("{}x{}", size.width, size.height));
                        ui.label(if stored { "" } else { "not stored" });
                        ui.end_row();
                    }
                });
                ui.separator();

                let mut automatic = self.lod.is_none();
                if ui.checkbox(&mut automatic, "Automatic level").changed() {
                    self.lod = if automatic { None } else { Some(0.0) };
                }
                if let Some(lod) = &mut self.lod {
                    let max_level = texture.mip_level_count().saturating_sub(1) as f32;
                    ui.add(egui::Slider::new(lod, 0.0..=max_level).text("Level"));
                }
                ui.add(
                    egui::Slider::new(&mut self.zoom, MIN_ZOOM..=MAX_ZOOM)
                        .logarithmic(true)
                        .text("Zoom"),
                );
            });
    }

    fn render_frame(&mut self, ctx: &mut AppContext) -> Result<(), AppError> {
        let Some(resources) = &self.resources else {
            return Ok(());
        };
        let (scale_x, scale_y) = self.quad_scale(&resources.texture, ctx.aspect_ratio());

        let program = &resources.program;
        program.set_uniform_f32("u_scale_x", scale_x)?;
        program.set_uniform_f32("u_scale_y", scale_y)?;
        program.set_uniform_f32("u_lod", self.lod.unwrap_or(-1.0))?;

        resources.texture.bind(TEXTURE_UNIT);
        resources.sampler.bind(TEXTURE_UNIT);

        let gl = ctx.device().backend();
        unsafe {
            gl.bind_vertex_array(Some(resources.vertex_array));
            gl.draw_arrays(glow::TRIANGLE_STRIP, 0, 4);
            gl.bind_vertex_array(None);
            // The UI painter samples from the same unit with texture parameters.
            gl.bind_sampler(TEXTURE_UNIT, None);
        }
        Ok(())
    }

    fn on_file_dropped(&mut self, ctx: &mut AppContext, name: &str, bytes: &[u8]) {
        if let Err(err) = self.replace_texture(ctx, name, bytes) {
            ctx.report_error(err);
        }
    }

    fn on_mouse_button(
        &mut self,
        _ctx: &mut AppContext,
        _x: f32,
        _y: f32,
        button: MouseButton,
        pressed: bool,
    ) {
        if button == MouseButton::Right && pressed {
            self.zoom = 1.0;
            self.lod = None;
        }
    }

    fn on_scroll(&mut self, _ctx: &mut AppContext, _delta_x: f32, delta_y: f32) {
        self.zoom = (self.zoom * 1.1f32.powf(delta_y)).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    fn on_shutdown(&mut self, ctx: &mut AppContext) {
        log::info!("Shutting down Texture Inspector");
        if let Some(resources) = self.resources.take() {
            unsafe { ctx.device().backend().delete_vertex_array(resources.vertex_array) };
        }
    }
}

/// A checkerboard with every stored level written explicitly and tinted.
fn create_checkerboard(ctx: &AppContext) -> Result<Texture<glow::Context>, AppError> {
    let texture = ctx.device().create_texture_2d(
        false,
        TextureFormat::Rgba8Unorm,
        [CHECKERBOARD_SIZE, CHECKERBOARD_SIZE],
        1,
    )?;

    for level in 0..texture.mip_level_count() {
        let size = texture.get_mip_size(level)?;
        let tint = LEVEL_TINTS[level as usize % LEVEL_TINTS.len()];
        let cell = (CHECKERBOARD_CELL >> level).max(1);
        texture.write_level(level, &checkerboard_texels(size, cell, tint))?;
    }
    Ok(texture)
}

/// RGBA8 texels of a `size` checkerboard with square cells of `cell` texels.
fn checkerboard_texels(size: Extent3d, cell: u32, tint: [u8; 3]) -> Vec<u8> {
    let mut texels = Vec::with_capacity(size.texel_count() as usize * 4);
    for y in 0..size.height {
        for x in 0..size.width {
            let light = ((x / cell) + (y / cell)) % 2 == 0;
            let value: u16 = if light { 255 } else { 48 };
            for channel in tint {
                texels.push((u16::from(channel) * value / 255) as u8);
            }
            texels.push(255);
        }
    }
    texels
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_alternates_cells() {
        let texels = checkerboard_texels(Extent3d::new_2d(4, 2), 2, [255, 255, 255]);
        assert_eq!(texels.len(), 4 * 2 * 4);
        // Texel (0, 0) is light, texel (2, 0) dark.
        assert_eq!(&texels[0..4], &[255, 255, 255, 255]);
        assert_eq!(&texels[8..12], &[48, 48, 48, 255]);
    }

    #[test]
    fn test_checkerboard_tint() {
        let texels = checkerboard_texels(Extent3d::new_2d(1, 1), 1, [255, 0, 128]);
        assert_eq!(texels, vec![255, 0, 128, 255]);
    }
}
