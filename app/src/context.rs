//! Application context.

use std::fmt::Display;

use esframe_graphics::{ErrorSlot, GlBackend, GraphicsDevice};

/// Application context available during all application callbacks.
///
/// Provides the graphics device, the framebuffer size of the frame being
/// rendered and the session's error slot.
pub struct AppContext<B: GlBackend = glow::Context> {
    /// The graphics device.
    pub(crate) device: GraphicsDevice<B>,
    /// Framebuffer width in physical pixels.
    pub(crate) width: u32,
    /// Framebuffer height in physical pixels.
    pub(crate) height: u32,
    /// Physical pixels per logical point.
    pub(crate) pixels_per_point: f32,
    /// Current frame number.
    pub(crate) frame_number: u64,
    /// First error of the session, if any.
    pub(crate) errors: ErrorSlot,
}

impl<B: GlBackend> AppContext<B> {
    pub(crate) fn new(device: GraphicsDevice<B>) -> Self {
        Self {
            device,
            width: 0,
            height: 0,
            pixels_per_point: 1.0,
            frame_number: 0,
            errors: ErrorSlot::new(),
        }
    }

    /// Get the graphics device.
    pub fn device(&self) -> &GraphicsDevice<B> {
        &self.device
    }

    /// Get the framebuffer width.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the framebuffer height.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the framebuffer aspect ratio.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Get the number of physical pixels per UI point.
    pub fn pixels_per_point(&self) -> f32 {
        self.pixels_per_point
    }

    /// Get the current frame number.
    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }

    /// Report a fatal error.
    ///
    /// Only the first error of the session is kept and displayed; returns
    /// `false` if an earlier error already holds the slot.
    pub fn report_error(&mut self, error: impl Display) -> bool {
        self.errors.report(error)
    }

    /// Unwrap a result, reporting the error on failure.
    pub fn capture<T, E: Display>(&mut self, result: Result<T, E>) -> Option<T> {
        self.errors.capture(result)
    }

    /// Check whether a fatal error has been reported.
    pub fn has_error(&self) -> bool {
        self.errors.has_error()
    }

    /// Get the reported error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.errors.message()
    }

    pub(crate) fn set_framebuffer_size(&mut self, width: u32, height: u32) {
        if (width, height) != (self.width, self.height) {
            log::debug!("Framebuffer resized to {width}x{height}");
        }
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use esframe_graphics::{DummyBackend, GraphicsError};

    fn context() -> AppContext<DummyBackend> {
        AppContext::new(GraphicsDevice::dummy())
    }

    #[test]
    fn test_first_error_is_kept() {
        let mut ctx = context();
        assert!(!ctx.has_error());

        assert!(ctx.report_error("first"));
        assert!(!ctx.report_error("second"));
        assert_eq!(ctx.error_message(), Some("first"));
    }

    #[test]
    fn test_capture_reports_failure() {
        let mut ctx = context();
        let value: Option<u32> = ctx.capture(Ok::<_, GraphicsError>(7));
        assert_eq!(value, Some(7));
        assert!(!ctx.has_error());

        let value: Option<u32> =
            ctx.capture(Err(GraphicsError::InvalidParameter("bad".to_string())));
        assert_eq!(value, None);
        assert_eq!(ctx.error_message(), Some("invalid parameter: bad"));
    }

    #[test]
    fn test_aspect_ratio_with_empty_framebuffer() {
        let mut ctx = context();
        assert_eq!(ctx.aspect_ratio(), 0.0);

        ctx.set_framebuffer_size(1280, 720);
        assert!((ctx.aspect_ratio() - 16.0 / 9.0).abs() < 1e-6);
    }
}
