//! Shader stage types.

/// Programmable pipeline stage a shader is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader stage.
    Vertex,
    /// Fragment shader stage.
    Fragment,
}

gl_enum!(ShaderStage, "shader stage", {
    Vertex => glow::VERTEX_SHADER,
    Fragment => glow::FRAGMENT_SHADER,
});

impl ShaderStage {
    /// Lowercase stage name used in diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GraphicsError;

    #[test]
    fn test_stage_gl_enum() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), 0x8B31);
        assert_eq!(ShaderStage::Fragment.gl_enum(), 0x8B30);
        assert_eq!(ShaderStage::try_from(0x8B30), Ok(ShaderStage::Fragment));
    }

    #[test]
    fn test_compute_stage_is_rejected() {
        assert_eq!(
            ShaderStage::try_from(glow::COMPUTE_SHADER),
            Err(GraphicsError::InvalidEnumerant {
                kind: "shader stage",
                value: glow::COMPUTE_SHADER,
            })
        );
    }
}
