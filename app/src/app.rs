//! Main application struct and frame loop.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use esframe_graphics::GraphicsDevice;

use crate::args::AppArgs;
#[cfg(not(target_arch = "wasm32"))]
use crate::args::WindowMode;
use crate::context::AppContext;
use crate::error::AppError;
use crate::handler::AppHandler;
use crate::input::{pointer_inputs, DroppedFile, PointerInput};

/// Title of the window that replaces the frame after a fatal error.
const FATAL_ERROR_TITLE: &str = "I give up.";

/// Main application struct that hosts a handler in eframe.
///
/// The `App` struct is generic over:
/// - `H`: The handler type that implements [`AppHandler`]
/// - `A`: The arguments type that implements [`AppArgs`]
///
/// # Example
///
/// ```ignore
/// use esframe_app::{App, AppArgs, AppContext, AppError, AppHandler, DefaultAppArgs};
///
/// struct MyApp;
///
/// impl AppHandler for MyApp {
///     fn render_frame(&mut self, _ctx: &mut AppContext) -> Result<(), AppError> {
///         Ok(())
///     }
/// }
///
/// fn main() -> Result<(), AppError> {
///     App::run(MyApp, DefaultAppArgs::parse())
/// }
/// ```
pub struct App<H, A>
where
    H: AppHandler,
    A: AppArgs,
{
    handler: H,
    args: A,
}

impl<H, A> App<H, A>
where
    H: AppHandler,
    A: AppArgs + 'static,
{
    /// Create a new application.
    pub fn new(handler: H, args: A) -> Self {
        Self { handler, args }
    }

    /// Run the application with the given handler and arguments.
    ///
    /// This is the main entry point for native builds. It opens the window,
    /// creates the GL context and runs the event loop until the window is
    /// closed.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn run(handler: H, args: A) -> Result<(), AppError> {
        // Initialize logging
        if env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()
            .is_err()
        {
            log::debug!("Logger already initialized");
        }

        esframe_graphics::init();
        crate::init();

        Self::new(handler, args).run_native()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn run_native(self) -> Result<(), AppError> {
        let Self { handler, args } = self;

        let mut viewport = egui::ViewportBuilder::default()
            .with_title(args.window_title())
            .with_inner_size([args.window_width() as f32, args.window_height() as f32])
            .with_drag_and_drop(true);
        match args.window_mode() {
            WindowMode::Windowed => {}
            WindowMode::Maximized => viewport = viewport.with_maximized(true),
            WindowMode::Fullscreen => viewport = viewport.with_fullscreen(true),
        }

        let options = eframe::NativeOptions {
            viewport,
            vsync: args.vsync(),
            renderer: eframe::Renderer::Glow,
            ..Default::default()
        };

        let max_frames = args.max_frames();
        let title = args.window_title().to_owned();
        eframe::run_native(
            &title,
            options,
            host_creator(handler, max_frames),
        )
        .map_err(|err| AppError::Platform(err.to_string()))
    }

    /// Start the application in the canvas element with id `canvas_id`.
    ///
    /// This is the entry point for WASM builds. The application keeps running
    /// after this function returns; startup failures are logged to the
    /// browser console.
    #[cfg(target_arch = "wasm32")]
    pub fn start_web(handler: H, args: A, canvas_id: &str) {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("Logger already initialized");
        }

        esframe_graphics::init();
        crate::init();

        let app = Self::new(handler, args);
        let canvas_id = canvas_id.to_owned();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(err) = app.run_web(&canvas_id).await {
                log::error!("{err}");
            }
        });
    }

    #[cfg(target_arch = "wasm32")]
    async fn run_web(self, canvas_id: &str) -> Result<(), AppError> {
        use wasm_bindgen::JsCast;

        let Self { handler, args } = self;
        let canvas = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(canvas_id))
            .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok())
            .ok_or_else(|| AppError::Platform(format!("no canvas element with id '{canvas_id}'")))?;

        let max_frames = args.max_frames();
        eframe::WebRunner::new()
            .start(
                canvas,
                eframe::WebOptions::default(),
                host_creator(handler, max_frames),
            )
            .await
            .map_err(|err| AppError::Platform(format!("{err:?}")))
    }
}

// ============================================================================
// eframe host
// ============================================================================

/// Handler and context, shared between the UI pass and the paint callback.
struct Session<H> {
    /// `None` once the handler has been shut down.
    handler: Option<H>,
    context: AppContext,
}

type FrameRenderer = Box<dyn FnMut(&egui::PaintCallbackInfo)>;

thread_local! {
    // Paint callbacks must be `Send + Sync`; the handler lives on the GL
    // thread, so the callback looks it up here instead of capturing it.
    static FRAME_RENDERER: RefCell<Option<FrameRenderer>> = const { RefCell::new(None) };
}

fn host_creator<H: AppHandler>(handler: H, max_frames: Option<u64>) -> eframe::AppCreator<'static> {
    Box::new(move |cc| {
        let host = Host::new(cc, handler, max_frames)?;
        Ok(Box::new(host))
    })
}

struct Host<H: AppHandler> {
    session: Rc<RefCell<Session<H>>>,
    max_frames: Option<u64>,
}

impl<H: AppHandler> Host<H> {
    fn new(
        cc: &eframe::CreationContext<'_>,
        mut handler: H,
        max_frames: Option<u64>,
    ) -> Result<Self, AppError> {
        let gl = cc
            .gl
            .clone()
            .ok_or_else(|| AppError::Platform("the glow renderer is not active".to_string()))?;

        let mut context = AppContext::new(GraphicsDevice::new(gl));
        context.pixels_per_point = cc.egui_ctx.pixels_per_point();

        if let Err(err) = handler.on_init(&mut context) {
            context.report_error(err);
        }

        let session = Rc::new(RefCell::new(Session {
            handler: Some(handler),
            context,
        }));
        install_frame_renderer(Rc::clone(&session));

        Ok(Self {
            session,
            max_frames,
        })
    }
}

impl<H: AppHandler> eframe::App for Host<H> {
    fn update(&mut self, ui: &egui::Context, _frame: &mut eframe::Frame) {
        let Ok(mut session) = self.session.try_borrow_mut() else {
            log::warn!("Skipping frame: session is busy");
            return;
        };
        let Session { handler, context } = &mut *session;
        let Some(handler) = handler.as_mut() else {
            return;
        };

        context.pixels_per_point = ui.pixels_per_point();

        if !context.has_error() {
            forward_input(ui, handler, context);
        }

        match context.error_message().map(str::to_owned) {
            Some(message) => show_fatal_error(ui, &message),
            None => {
                handler.configure_ui(ui, context);
                schedule_frame(ui);
            }
        }

        context.frame_number += 1;
        if let Some(max_frames) = self.max_frames {
            if context.frame_number >= max_frames {
                log::info!("Reached max frames limit ({}), exiting", max_frames);
                ui.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }

        ui.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("Shutting down");
        FRAME_RENDERER.with(|slot| slot.borrow_mut().take());

        let mut session = self.session.borrow_mut();
        let Session { handler, context } = &mut *session;
        // Dropped here so GL objects are released while the context is current.
        if let Some(mut handler) = handler.take() {
            handler.on_shutdown(context);
        }
    }
}

fn install_frame_renderer<H: AppHandler>(session: Rc<RefCell<Session<H>>>) {
    let renderer: FrameRenderer = Box::new(move |info| {
        let Ok(mut session) = session.try_borrow_mut() else {
            log::warn!("Skipping render: session is busy");
            return;
        };
        let Session { handler, context } = &mut *session;
        let Some(handler) = handler.as_mut() else {
            return;
        };
        if context.has_error() {
            return;
        }

        let viewport = info.viewport_in_pixels();
        context.set_framebuffer_size(viewport.width_px.max(0) as u32, viewport.height_px.max(0) as u32);

        if let Err(err) = handler.render_frame(context) {
            context.report_error(err);
        }
    });
    FRAME_RENDERER.with(|slot| *slot.borrow_mut() = Some(renderer));
}

/// Queue the handler's frame underneath every UI layer.
fn schedule_frame(ui: &egui::Context) {
    let callback = egui::PaintCallback {
        rect: ui.content_rect(),
        callback: Arc::new(eframe::egui_glow::CallbackFn::new(|info, _painter| {
            FRAME_RENDERER.with(|slot| {
                if let Some(render) = slot.borrow_mut().as_mut() {
                    render(&info);
                }
            });
        })),
    };
    ui.layer_painter(egui::LayerId::background()).add(callback);
}

fn forward_input<H: AppHandler>(ui: &egui::Context, handler: &mut H, context: &mut AppContext) {
    let (dropped, events) = ui.input(|input| {
        (
            input.raw.dropped_files.clone(),
            input.raw.events.clone(),
        )
    });

    for file in &dropped {
        match DroppedFile::load(file) {
            Ok(file) => {
                log::info!("Dropped file [{}] ({} bytes)", file.name, file.bytes.len());
                handler.on_file_dropped(context, &file.name, &file.bytes);
            }
            Err(err) => {
                context.report_error(err);
                return;
            }
        }
    }

    if ui.wants_pointer_input() || ui.is_pointer_over_area() {
        return;
    }

    for input in pointer_inputs(&events, context.pixels_per_point) {
        match input {
            PointerInput::Button {
                x,
                y,
                button,
                pressed,
            } => handler.on_mouse_button(context, x, y, button, pressed),
            PointerInput::Scroll { delta_x, delta_y } => {
                handler.on_scroll(context, delta_x, delta_y)
            }
        }
    }
}

fn show_fatal_error(ui: &egui::Context, message: &str) {
    egui::Window::new(FATAL_ERROR_TITLE)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .movable(false)
        .collapsible(false)
        .resizable(false)
        .show(ui, |ui| {
            ui.label(message);
        });
}
