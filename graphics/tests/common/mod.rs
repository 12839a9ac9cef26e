//! Common utilities for resource integration tests.
//!
//! Every test runs against the software driver, which records GL state so
//! the tests can observe what the wrappers did to it.

#![allow(dead_code)]

use std::sync::{Arc, Once};

use esframe_graphics::backend::dummy::DummyObjectCounts;
use esframe_graphics::{
    DeviceCapabilities, DummyBackend, GraphicsDevice, Program, Shader, ShaderStage,
};

// ============================================================================
// Shader sources
// ============================================================================

/// Vertex shader with a single `u_mvp` uniform.
pub const MVP_VERTEX: &str = "#version 300 es
uniform mat4 u_mvp;
in vec4 a_position;
in vec2 a_uv;
out vec2 v_uv;
void main() {
    v_uv = a_uv;
    gl_Position = u_mvp * a_position;
}
";

/// Fragment shader sampling `u_texture`, tinted by `u_tint`.
pub const TEXTURED_FRAGMENT: &str = "#version 300 es
precision mediump float;
uniform sampler2D u_texture;
uniform float u_tint;
uniform vec4 u_unused;
in vec2 v_uv;
out vec4 o_color;
void main() {
    o_color = texture(u_texture, v_uv) * u_tint;
}
";

/// Fragment shader that fails to compile.
pub const BROKEN_FRAGMENT: &str = "#version 300 es
precision mediump float;
out vec4 o_color;
void main() {
    o_color = vec4(1.0);
";

// ============================================================================
// Test Context
// ============================================================================

/// Test context wrapping a device on a fresh software driver.
pub struct TestContext {
    pub device: GraphicsDevice<DummyBackend>,
}

impl TestContext {
    /// Create a context with the driver's default (generous) capabilities.
    pub fn new() -> Self {
        init_logging();
        Self {
            device: GraphicsDevice::dummy(),
        }
    }

    /// Create a context reporting the given capabilities.
    pub fn with_capabilities(capabilities: DeviceCapabilities) -> Self {
        init_logging();
        Self {
            device: GraphicsDevice::new(Arc::new(DummyBackend::with_capabilities(capabilities))),
        }
    }

    pub fn backend(&self) -> &DummyBackend {
        self.device.backend()
    }

    pub fn live_objects(&self) -> DummyObjectCounts {
        self.backend().live_objects()
    }

    /// Compile a shader that is expected to compile.
    pub fn shader(&self, stage: ShaderStage, source: &str) -> Arc<Shader<DummyBackend>> {
        self.device
            .create_shader(stage, source)
            .expect("shader should compile")
    }

    /// Link [`MVP_VERTEX`] with [`TEXTURED_FRAGMENT`].
    pub fn textured_program(&self) -> Program<DummyBackend> {
        let vertex = self.shader(ShaderStage::Vertex, MVP_VERTEX);
        let fragment = self.shader(ShaderStage::Fragment, TEXTURED_FRAGMENT);
        self.device
            .create_program(&vertex, &fragment)
            .expect("program should link")
    }
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

/// Texel bytes for a level, filled with a repeating pattern.
pub fn texel_pattern(len: u64) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
