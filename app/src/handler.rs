//! Application handler trait.

use crate::context::AppContext;
use crate::error::AppError;
use crate::input::MouseButton;

/// Trait for handling application events and draw requests.
///
/// Implement this trait to create custom application logic. Every callback
/// runs on the thread that owns the GL context.
///
/// # Lifecycle
///
/// 1. `on_init` - Called once, after the GL context exists
/// 2. Per frame, while no error has been reported:
///    - input callbacks (`on_file_dropped`, `on_mouse_button`, `on_scroll`)
///    - `configure_ui` - record this frame's egui widgets
///    - `render_frame` - draw with GL, underneath the UI
/// 3. `on_shutdown` - Called once when the application is closing, while
///    the GL context is still current
///
/// An error returned from `on_init` or `render_frame`, or reported through
/// [`AppContext::report_error`], stops the per-frame callbacks and replaces
/// the frame with a fatal-error window for the rest of the session.
///
/// # Example
///
/// ```ignore
/// use esframe_app::{AppContext, AppError, AppHandler};
///
/// struct MyApp {
///     clicks: u32,
/// }
///
/// impl AppHandler for MyApp {
///     fn configure_ui(&mut self, ui: &egui::Context, _ctx: &mut AppContext) {
///         egui::Window::new("Stats").show(ui, |ui| {
///             ui.label(format!("Clicks: {}", self.clicks));
///         });
///     }
///
///     fn render_frame(&mut self, _ctx: &mut AppContext) -> Result<(), AppError> {
///         Ok(())
///     }
///
///     fn on_mouse_button(&mut self, _ctx: &mut AppContext, _x: f32, _y: f32, _button: MouseButton, pressed: bool) {
///         self.clicks += pressed as u32;
///     }
/// }
/// ```
pub trait AppHandler: 'static {
    /// Called once when the application initializes.
    ///
    /// Use this to create GPU resources, load assets, etc.
    fn on_init(&mut self, _ctx: &mut AppContext) -> Result<(), AppError> {
        Ok(())
    }

    /// Called every frame to record the UI.
    fn configure_ui(&mut self, _ui: &egui::Context, _ctx: &mut AppContext) {}

    /// Called every frame to render, after the UI has been recorded and
    /// before it is painted on top.
    ///
    /// The framebuffer size is available in `ctx.width()` and `ctx.height()`.
    fn render_frame(&mut self, ctx: &mut AppContext) -> Result<(), AppError>;

    /// Called when a file is dropped onto the window.
    fn on_file_dropped(&mut self, _ctx: &mut AppContext, _name: &str, _bytes: &[u8]) {}

    /// Called when a mouse button is pressed or released outside of the UI.
    ///
    /// The position is in physical pixels from the top-left corner.
    fn on_mouse_button(
        &mut self,
        _ctx: &mut AppContext,
        _x: f32,
        _y: f32,
        _button: MouseButton,
        _pressed: bool,
    ) {
    }

    /// Called when the mouse wheel is scrolled outside of the UI.
    fn on_scroll(&mut self, _ctx: &mut AppContext, _delta_x: f32, _delta_y: f32) {}

    /// Called when the application is closing.
    ///
    /// Use this to clean up resources.
    fn on_shutdown(&mut self, _ctx: &mut AppContext) {}
}
