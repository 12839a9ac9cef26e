//! # esframe App
//!
//! Application shell hosting an [`AppHandler`] on top of an OpenGL ES 3.0 /
//! WebGL 2 context, with an egui layer painted over the handler's frame.
//!
//! The same handler runs natively ([`App::run`]) and in a browser canvas
//! ([`App::start_web`]); both go through eframe's glow renderer, so the
//! resources of `esframe-graphics` behave identically on either target.
//!
//! ## Overview
//!
//! - [`AppHandler`] - Trait for application callbacks
//! - [`AppArgs`] - Trait for window and run configuration
//! - [`AppContext`] - Device, framebuffer size and the session error slot
//! - [`App`] - Entry points
//!
//! ## Example
//!
//! ```ignore
//! use esframe_app::{App, AppArgs, AppContext, AppError, AppHandler, DefaultAppArgs};
//!
//! struct MyApp;
//!
//! impl AppHandler for MyApp {
//!     fn render_frame(&mut self, ctx: &mut AppContext) -> Result<(), AppError> {
//!         // Draw with ctx.device()
//!         Ok(())
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     let args = DefaultAppArgs::parse();
//!     App::run(MyApp, args)
//! }
//! ```

mod app;
mod args;
mod context;
mod error;
mod handler;
mod input;

pub use app::App;
pub use args::{AppArgs, DefaultAppArgs, WindowMode};
pub use context::AppContext;
pub use error::AppError;
pub use handler::AppHandler;
pub use input::{DroppedFile, MouseButton, PointerInput};

pub use egui;
pub use esframe_graphics as graphics;

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the app subsystem.
///
/// This should be called before using any app functionality.
pub fn init() {
    log::info!("esframe App v{} initialized", VERSION);
}
