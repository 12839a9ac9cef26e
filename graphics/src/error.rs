//! Graphics error types.

use thiserror::Error;

use crate::types::ShaderStage;

/// Errors that can occur while creating or using GPU resources.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphicsError {
    /// The driver did not hand out an object for an allocation request.
    #[error("allocation failed: {0}")]
    AllocationFailed(String),
    /// A shader stage did not compile. `log` holds the compiler diagnostics.
    #[error("{stage} shader failed to compile due to the following error:\n\n{log}")]
    CompilationFailed { stage: ShaderStage, log: String },
    /// A program did not link. `log` holds the linker diagnostics.
    #[error("program failed to link: {log}")]
    LinkFailed { log: String },
    /// Active uniform metadata reported by the driver is inconsistent, or a
    /// uniform was looked up that the program does not have.
    #[error("invalid uniform: {0}")]
    InvalidUniform(String),
    /// A raw GL value does not map to any variant of the named enumeration.
    #[error("unsupported {kind} value {value:#06x}")]
    InvalidEnumerant { kind: &'static str, value: u32 },
    /// A mip level outside of the texture's allocated storage was requested.
    #[error("invalid mip level {level}, texture has {level_count} level(s)")]
    InvalidMipLevel { level: u32, level_count: u32 },
    /// An invalid parameter was provided.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// The driver raised an error while allocating immutable texture storage.
    #[error("texture storage allocation failed with GL error {0:#06x}")]
    StorageFailed(u32),
    /// A requested feature is not supported.
    #[error("feature not supported: {0}")]
    FeatureNotSupported(String),
    /// The backend could not be used at all.
    #[error("backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GraphicsError::StorageFailed(0x0502);
        assert_eq!(
            err.to_string(),
            "texture storage allocation failed with GL error 0x0502"
        );

        let err = GraphicsError::InvalidMipLevel {
            level: 4,
            level_count: 3,
        };
        assert_eq!(err.to_string(), "invalid mip level 4, texture has 3 level(s)");
    }

    #[test]
    fn test_compilation_error_keeps_log() {
        let err = GraphicsError::CompilationFailed {
            stage: ShaderStage::Fragment,
            log: "ERROR: 0:3: 'foo' : undeclared identifier".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("fragment shader failed to compile"));
        assert!(message.contains("undeclared identifier"));
    }

    #[test]
    fn test_invalid_enumerant_display() {
        let err = GraphicsError::InvalidEnumerant {
            kind: "wrap mode",
            value: 0x1234,
        };
        assert_eq!(err.to_string(), "unsupported wrap mode value 0x1234");
    }
}
