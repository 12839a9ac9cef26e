//! Application error types.

use esframe_graphics::GraphicsError;
use thiserror::Error;

/// Errors surfaced by the application shell and its handlers.
#[derive(Debug, Error)]
pub enum AppError {
    /// A GPU resource could not be created or used.
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    /// A file dropped onto the window could not be read.
    #[error("Failed to read drag & dropped file [{name}].")]
    DroppedFile {
        name: String,
        #[source]
        source: std::io::Error,
    },
    /// The windowing layer could not be started.
    #[error("failed to start the application: {0}")]
    Platform(String),
    /// A handler-defined failure.
    #[error("{0}")]
    Message(String),
}

impl AppError {
    /// Create a handler-defined error from any message.
    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphics_error_is_transparent() {
        let err = AppError::from(GraphicsError::StorageFailed(0x0505));
        assert_eq!(
            err.to_string(),
            "texture storage allocation failed with GL error 0x0505"
        );
    }

    #[test]
    fn test_dropped_file_message() {
        let err = AppError::DroppedFile {
            name: "photo.png".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert_eq!(err.to_string(), "Failed to read drag & dropped file [photo.png].");
    }
}
