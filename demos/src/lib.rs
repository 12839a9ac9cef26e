//! # esframe Demos
//!
//! Demo handlers showcasing the esframe resource wrappers.
//!
//! ## Available Demos
//!
//! - `texture_inspector` - Mip chain viewer with drag & drop image loading

pub mod texture_inspector;

pub use texture_inspector::TextureInspector;

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Canvas element the web build renders into.
pub const CANVAS_ID: &str = "esframe_canvas";

/// Web entry point.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() {
    use esframe_app::{App, DefaultAppArgs};

    App::start_web(
        TextureInspector::new(),
        DefaultAppArgs::with_title("Texture Inspector"),
        CANVAS_ID,
    );
}
