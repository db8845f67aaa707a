//! Native window host.
//!
//! Opens a window, renders the backdrop on the CPU each redraw and presents
//! the frame through [`Presenter`]. Event handlers only write the backdrop's
//! input inbox; all simulation work happens in `RedrawRequested`.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::backdrop::Backdrop;
use crate::config::FieldConfig;
use crate::error::{ContextError, RunError};
use crate::gpu::Presenter;
use crate::raster::PixelCanvas;
use crate::spawn::{entropy_rng, seeded_rng};
use crate::surface::SurfaceSize;
use crate::time::FrameClock;

pub const WINDOW_TITLE: &str = "driftfield";

/// Frames between FPS reports at `debug` level.
const FPS_LOG_INTERVAL: u64 = 600;

/// Open a window and run the backdrop until it is closed.
///
/// `seed` fixes the random source; `None` seeds from OS entropy. The config
/// is validated before any window is created.
pub fn run(config: FieldConfig, seed: Option<u64>) -> Result<(), RunError> {
    config.validate()?;

    let event_loop = EventLoop::new()?;
    // Redraws are requested explicitly after each frame
    event_loop.set_control_flow(ControlFlow::Wait);

    let mut app = App::new(config, seed);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct App {
    config: FieldConfig,
    seed: Option<u64>,
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    backdrop: Option<Backdrop<PixelCanvas>>,
    clock: FrameClock,
    error: Option<RunError>,
}

impl App {
    fn new(config: FieldConfig, seed: Option<u64>) -> Self {
        Self {
            config,
            seed,
            window: None,
            presenter: None,
            backdrop: None,
            clock: FrameClock::new(),
            error: None,
        }
    }

    fn mount(&mut self, window: Arc<Window>) {
        let inner = window.inner_size();
        let size = SurfaceSize::new(inner.width, inner.height, window.scale_factor());

        let canvas = match Presenter::new(window.clone()) {
            Ok(presenter) => {
                self.presenter = Some(presenter);
                Ok(PixelCanvas::for_surface(size, self.config.background))
            }
            Err(err) => Err(ContextError::from(err)),
        };

        let rng = match self.seed {
            Some(seed) => seeded_rng(seed),
            None => entropy_rng(),
        };

        self.backdrop = Some(Backdrop::mount(self.config.clone(), size, canvas, rng));
        self.clock = FrameClock::new();
        window.request_redraw();
        self.window = Some(window);
    }

    /// Unmount and release the GPU. Later redraws find nothing to draw.
    fn teardown(&mut self) {
        if let Some(mut backdrop) = self.backdrop.take() {
            backdrop.unmount();
        }
        self.presenter = None;
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(backdrop) = self.backdrop.as_mut() else {
            log::trace!("redraw after teardown ignored");
            return;
        };

        // A minimised window draws nothing and stops asking for redraws
        // until the next `Resized`.
        let elapsed_ms = self.clock.tick();
        if !backdrop.frame(elapsed_ms) {
            return;
        }
        if self.clock.frame() % FPS_LOG_INTERVAL == 0 {
            log::debug!("{:.1} fps", self.clock.fps());
        }

        let presented = match (self.presenter.as_mut(), backdrop.canvas()) {
            (Some(presenter), Some(canvas)) => {
                presenter.present(canvas.as_bytes(), canvas.width(), canvas.height())
            }
            _ => Ok(()),
        };

        match presented {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.reconfigure();
                }
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, closing");
                self.teardown();
                event_loop.exit();
                return;
            }
            Err(wgpu::SurfaceError::Timeout) => log::debug!("surface timeout, frame dropped"),
            Err(err) => log::warn!("present failed: {err}"),
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        match event_loop.create_window(attrs) {
            Ok(window) => self.mount(Arc::new(window)),
            Err(err) => {
                log::error!("window creation failed: {err}");
                self.error = Some(RunError::from(err));
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(backdrop) = self.backdrop.as_mut() {
            backdrop.input_mut().handle_event(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(physical_size.width, physical_size.height);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            // Hidden windows stop the field instead of banking a catch-up step
            WindowEvent::Occluded(true) => self.clock.pause(),
            WindowEvent::Occluded(false) => {
                self.clock.resume();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}
