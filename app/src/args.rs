//! Command line arguments trait and default implementation.
//!
//! Uses clap for proper CLI parsing on native targets with:
//! - Help text (`--help`)
//! - Validation and clear error messages

/// Window mode enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowMode {
    /// Windowed mode with decorations.
    #[default]
    Windowed,
    /// Windowed, maximized on start.
    Maximized,
    /// Fullscreen.
    Fullscreen,
}

/// Trait for parsing command line arguments.
///
/// Implement this trait to customize how your application handles
/// command line arguments. The trait provides defaults for all methods,
/// making it easy to override only the options you need.
///
/// # Example
///
/// ```ignore
/// use esframe_app::{AppArgs, WindowMode};
///
/// struct MyArgs {
///     fullscreen: bool,
/// }
///
/// impl AppArgs for MyArgs {
///     fn parse() -> Self {
///         Self {
///             fullscreen: std::env::args().any(|arg| arg == "--fullscreen"),
///         }
///     }
///
///     fn window_mode(&self) -> WindowMode {
///         if self.fullscreen {
///             WindowMode::Fullscreen
///         } else {
///             WindowMode::Windowed
///         }
///     }
/// }
/// ```
pub trait AppArgs: Sized {
    /// Parse command line arguments.
    fn parse() -> Self;

    /// Get the window mode.
    ///
    /// Default: `WindowMode::Windowed`
    fn window_mode(&self) -> WindowMode {
        WindowMode::Windowed
    }

    /// Get the initial window width.
    ///
    /// Default: 1280
    fn window_width(&self) -> u32 {
        1280
    }

    /// Get the initial window height.
    ///
    /// Default: 720
    fn window_height(&self) -> u32 {
        720
    }

    /// Get the window title.
    ///
    /// Default: "esframe"
    fn window_title(&self) -> &str {
        "esframe"
    }

    /// Get whether VSync is enabled.
    ///
    /// Default: true
    fn vsync(&self) -> bool {
        true
    }

    /// Get the maximum number of frames to process before auto-exit.
    ///
    /// This is useful for automated testing to verify that the application
    /// can start and render without errors.
    ///
    /// Default: `None` (run indefinitely)
    fn max_frames(&self) -> Option<u64> {
        None
    }
}

// ============================================================================
// Default App Args (with clap on native)
// ============================================================================

/// Default command line arguments implementation.
///
/// On native platforms, uses clap for proper CLI parsing with help text.
/// On WASM, uses defaults.
///
/// # Examples
///
/// ```bash
/// # Show help
/// ./my_app --help
///
/// # Run in fullscreen without vsync
/// ./my_app --fullscreen --no-vsync
///
/// # Run for 100 frames then exit (useful for testing)
/// ./my_app --max-frames 100
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAppArgs {
    window_mode: WindowMode,
    width: u32,
    height: u32,
    title: String,
    vsync: bool,
    max_frames: Option<u64>,
}

impl Default for DefaultAppArgs {
    fn default() -> Self {
        Self {
            window_mode: WindowMode::Windowed,
            width: 1280,
            height: 720,
            title: "esframe".to_string(),
            vsync: true,
            max_frames: None,
        }
    }
}

impl DefaultAppArgs {
    /// Create new default args with a custom title.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the window size.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Set the maximum number of frames.
    pub fn with_max_frames(mut self, max_frames: u64) -> Self {
        self.max_frames = Some(max_frames);
        self
    }

    /// Set the window title.
    pub fn with_title_str(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Parse arguments from an explicit list (the first item is the binary
    /// name), keeping `title` as the window title.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn try_parse_from<I, T>(title: impl Into<String>, args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;
        let parsed = native::ClapArgs::try_parse_from(args)?;
        Ok(Self::from(parsed).with_title_str(title))
    }
}

// ============================================================================
// Native implementation using clap
// ============================================================================

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::*;
    use clap::Parser;

    /// esframe application arguments.
    #[derive(Parser, Debug)]
    #[command(
        name = "esframe",
        about = "esframe application",
        long_about = "A GL ES 3.0 application hosted by esframe.\n\n\
            EXAMPLES:\n\
              # Start maximized\n\
              ./app --maximized\n\
            \n\
              # Run a short smoke test\n\
              ./app --max-frames 10",
        version
    )]
    pub(super) struct ClapArgs {
        /// Run in fullscreen mode.
        #[arg(long, conflicts_with = "maximized")]
        pub fullscreen: bool,

        /// Start with a maximized window.
        #[arg(long)]
        pub maximized: bool,

        /// Initial window width in pixels.
        #[arg(long, default_value = "1280", value_parser = clap::value_parser!(u32).range(1..))]
        pub width: u32,

        /// Initial window height in pixels.
        #[arg(long, default_value = "720", value_parser = clap::value_parser!(u32).range(1..))]
        pub height: u32,

        /// Disable vertical sync (may cause tearing).
        #[arg(long)]
        pub no_vsync: bool,

        /// Exit after rendering N frames (useful for testing).
        #[arg(long)]
        pub max_frames: Option<u64>,
    }

    impl From<ClapArgs> for DefaultAppArgs {
        fn from(args: ClapArgs) -> Self {
            let window_mode = if args.fullscreen {
                WindowMode::Fullscreen
            } else if args.maximized {
                WindowMode::Maximized
            } else {
                WindowMode::Windowed
            };

            Self {
                window_mode,
                width: args.width,
                height: args.height,
                title: "esframe".to_string(),
                vsync: !args.no_vsync,
                max_frames: args.max_frames,
            }
        }
    }
}

impl AppArgs for DefaultAppArgs {
    fn parse() -> Self {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use clap::Parser;
            let clap_args = native::ClapArgs::parse();
            clap_args.into()
        }

        #[cfg(target_arch = "wasm32")]
        {
            // No command line in the browser
            Self::default()
        }
    }

    fn window_mode(&self) -> WindowMode {
        self.window_mode
    }

    fn window_width(&self) -> u32 {
        self.width
    }

    fn window_height(&self) -> u32 {
        self.height
    }

    fn window_title(&self) -> &str {
        &self.title
    }

    fn vsync(&self) -> bool {
        self.vsync
    }

    fn max_frames(&self) -> Option<u64> {
        self.max_frames
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let args = DefaultAppArgs::try_parse_from("demo", ["demo"]).unwrap();
        assert_eq!(args.window_mode(), WindowMode::Windowed);
        assert_eq!((args.window_width(), args.window_height()), (1280, 720));
        assert_eq!(args.window_title(), "demo");
        assert!(args.vsync());
        assert_eq!(args.max_frames(), None);
    }

    #[rstest]
    #[case::fullscreen(&["demo", "--fullscreen"], WindowMode::Fullscreen)]
    #[case::maximized(&["demo", "--maximized"], WindowMode::Maximized)]
    fn test_window_mode_flags(#[case] argv: &[&str], #[case] expected: WindowMode) {
        let args = DefaultAppArgs::try_parse_from("demo", argv.iter().copied()).unwrap();
        assert_eq!(args.window_mode(), expected);
    }

    #[test]
    fn test_run_options() {
        let args = DefaultAppArgs::try_parse_from(
            "demo",
            ["demo", "--width", "640", "--height", "480", "--no-vsync", "--max-frames", "3"],
        )
        .unwrap();
        assert_eq!((args.window_width(), args.window_height()), (640, 480));
        assert!(!args.vsync());
        assert_eq!(args.max_frames(), Some(3));
    }

    #[rstest]
    #[case::zero_width(&["demo", "--width", "0"])]
    #[case::conflicting_modes(&["demo", "--fullscreen", "--maximized"])]
    #[case::unknown_flag(&["demo", "--renderer", "metal"])]
    fn test_invalid_arguments(#[case] argv: &[&str]) {
        assert!(DefaultAppArgs::try_parse_from("demo", argv.iter().copied()).is_err());
    }

    #[test]
    fn test_builders() {
        let args = DefaultAppArgs::with_title("viewer")
            .with_size(320, 200)
            .with_max_frames(1);
        assert_eq!(args.window_title(), "viewer");
        assert_eq!((args.window_width(), args.window_height()), (320, 200));
        assert_eq!(args.max_frames(), Some(1));
    }
}
