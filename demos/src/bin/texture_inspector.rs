//! # Texture Inspector
//!
//! Shows a texture's mip chain. Drop a PNG or JPEG file onto the window to
//! replace the built-in checkerboard.

use esframe_app::{App, AppError, DefaultAppArgs};
use esframe_demos::TextureInspector;

fn main() -> Result<(), AppError> {
    let args = match DefaultAppArgs::try_parse_from("Texture Inspector", std::env::args_os()) {
        Ok(args) => args,
        Err(err) => err.exit(),
    };
    App::run(TextureInspector::new(), args)
}
