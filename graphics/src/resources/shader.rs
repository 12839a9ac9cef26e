//! Compiled shader stage.

use crate::backend::GlBackend;
use crate::device::GraphicsDevice;
use crate::error::GraphicsError;
use crate::types::ShaderStage;

/// A successfully compiled vertex or fragment shader.
///
/// A `Shader` value only exists for an object that compiled; creation either
/// returns a usable shader or the compiler's diagnostics. Programs keep their
/// shaders alive through an [`Arc`](std::sync::Arc), see
/// [`GraphicsDevice::create_shader`].
///
/// # Example
///
/// ```ignore
/// let shader = Shader::create(&device, ShaderStage::Fragment, FRAGMENT_SOURCE)?;
/// assert_eq!(shader.stage(), ShaderStage::Fragment);
/// ```
pub struct Shader<B: GlBackend> {
    device: GraphicsDevice<B>,
    handle: B::Shader,
    stage: ShaderStage,
    source: String,
}

impl<B: GlBackend> Shader<B> {
    /// Compile `source` for `stage`.
    ///
    /// # Errors
    ///
    /// - [`GraphicsError::AllocationFailed`] if no shader object was handed out
    /// - [`GraphicsError::CompilationFailed`] with the compiler's info log
    pub fn create(
        device: &GraphicsDevice<B>,
        stage: ShaderStage,
        source: impl Into<String>,
    ) -> Result<Self, GraphicsError> {
        let backend = device.backend();
        let handle = backend.create_shader(stage.gl_enum()).map_err(|err| {
            GraphicsError::AllocationFailed(format!("{stage} shader object: {err}"))
        })?;

        // From here on, dropping `shader` releases the handle.
        let shader = Self {
            device: device.clone(),
            handle,
            stage,
            source: source.into(),
        };

        backend.shader_source(handle, &shader.source);
        backend.compile_shader(handle);

        if !backend.shader_compile_status(handle) {
            let log = backend.shader_info_log(handle);
            return Err(GraphicsError::CompilationFailed {
                stage,
                log: log.trim_end().to_string(),
            });
        }

        log::debug!("Compiled {stage} shader {handle:?}");
        Ok(shader)
    }

    /// The compiled shader object.
    pub fn id(&self) -> B::Shader {
        self.handle
    }

    /// The stage this shader was compiled for.
    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    /// The GLSL source the shader was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get the parent device.
    pub fn device(&self) -> &GraphicsDevice<B> {
        &self.device
    }
}

impl<B: GlBackend> Drop for Shader<B> {
    fn drop(&mut self) {
        log::trace!("Releasing {} shader {:?}", self.stage, self.handle);
        self.device.backend().delete_shader(self.handle);
    }
}

impl<B: GlBackend> std::fmt::Debug for Shader<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shader")
            .field("handle", &self.handle)
            .field("stage", &self.stage)
            .field("source_len", &self.source.len())
            .finish()
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::backend::dummy::{DummyBackend, DummyFault};

    const VALID: &str = "#version 300 es\nvoid main() {\n    gl_Position = vec4(0.0);\n}\n";

    static_assertions::assert_impl_all!(Shader<DummyBackend>: Send, Sync);

    #[test]
    fn test_shader_compiles() {
        let device = GraphicsDevice::dummy();
        let shader = Shader::create(&device, ShaderStage::Vertex, VALID).unwrap();

        assert_eq!(shader.stage(), ShaderStage::Vertex);
        assert_eq!(shader.source(), VALID);
        assert_eq!(device.backend().live_objects().shaders, 1);

        drop(shader);
        assert_eq!(device.backend().live_objects().shaders, 0);
    }

    #[test]
    fn test_compile_failure_releases_handle() {
        let device = GraphicsDevice::dummy();
        let err = Shader::create(&device, ShaderStage::Fragment, "#version 300 es\nvoid main() {")
            .unwrap_err();

        match err {
            GraphicsError::CompilationFailed { stage, log } => {
                assert_eq!(stage, ShaderStage::Fragment);
                assert!(log.starts_with("ERROR: 0:2:"), "{log}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(device.backend().live_objects().total(), 0);
    }

    #[test]
    fn test_allocation_failure() {
        let device = GraphicsDevice::dummy();
        device.backend().inject_fault(DummyFault::AllocationFailure);

        let err = Shader::create(&device, ShaderStage::Vertex, VALID).unwrap_err();
        assert!(matches!(err, GraphicsError::AllocationFailed(_)));
    }

    #[test]
    fn test_shader_debug() {
        let device = GraphicsDevice::dummy();
        let shader = Shader::create(&device, ShaderStage::Vertex, VALID).unwrap();
        let debug = format!("{shader:?}");
        assert!(debug.contains("Shader"));
        assert!(debug.contains("Vertex"));
    }
}
