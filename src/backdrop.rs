//! Mount / frame / unmount lifecycle around a [`ParticleField`].
//!
//! A host mounts one backdrop per drawing surface, forwards events into its
//! [`Input`] inbox and calls [`Backdrop::frame`] once per display refresh.
//! After [`Backdrop::unmount`] the backdrop holds nothing and every later
//! frame is a no-op, so a redraw that races teardown draws nothing.
//!
//! If the host could not acquire a canvas, the backdrop mounts disabled: the
//! failure is logged once and frames silently do nothing.

use glam::Vec2;
use rand::rngs::SmallRng;

use crate::canvas::Canvas;
use crate::config::FieldConfig;
use crate::error::ContextError;
use crate::input::Input;
use crate::simulation::ParticleField;
use crate::spawn::RandomSource;
use crate::spring::ScrollSpring;
use crate::surface::SurfaceSize;

struct Running<C, R: RandomSource> {
    field: ParticleField<R>,
    canvas: C,
    spring: ScrollSpring,
}

enum State<C, R: RandomSource> {
    Running(Box<Running<C, R>>),
    /// No canvas was available at mount.
    Disabled,
    Unmounted,
}

/// A particle field bound to a canvas and an input inbox.
pub struct Backdrop<C, R: RandomSource = SmallRng> {
    state: State<C, R>,
    input: Input,
}

impl<C: Canvas, R: RandomSource> Backdrop<C, R> {
    /// Mount on a surface of `size`.
    ///
    /// `canvas` is the host's attempt to acquire a drawing context. An error
    /// disables the backdrop instead of failing the host.
    pub fn mount(
        config: FieldConfig,
        size: SurfaceSize,
        canvas: Result<C, ContextError>,
        rng: R,
    ) -> Self {
        let input = Input::new(size, config.max_scroll);

        let state = match canvas {
            Ok(canvas) => {
                let spring = ScrollSpring::new(config.scroll_stiffness, 0.0);
                let mut field = ParticleField::new(config, rng);
                field.resize(size.logical_width(), size.logical_height());
                log::debug!(
                    "backdrop mounted at {}x{} (scale {})",
                    size.width,
                    size.height,
                    size.scale_factor
                );
                State::Running(Box::new(Running {
                    field,
                    canvas,
                    spring,
                }))
            }
            Err(err) => {
                log::warn!("particle backdrop disabled: {err}");
                State::Disabled
            }
        };

        Self { state, input }
    }

    /// Advance and draw one frame.
    ///
    /// Returns `true` if a frame was drawn. Pending resizes are applied
    /// first; an empty (minimised) surface stops there. Then the scroll spring steps toward the inbox offset, the field
    /// updates and the canvas is redrawn.
    pub fn frame(&mut self, elapsed_ms: f32) -> bool {
        let running = match &mut self.state {
            State::Running(running) => running,
            State::Disabled => return false,
            State::Unmounted => {
                log::trace!("frame after unmount ignored");
                return false;
            }
        };

        if let Some(size) = self.input.take_resize() {
            running.canvas.resize(size);
            running
                .field
                .resize(size.logical_width(), size.logical_height());
        }
        if self.input.size().is_empty() {
            log::trace!("surface is empty, frame skipped");
            return false;
        }

        let dt_secs = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0) / 1000.0
        } else {
            0.0
        };
        let scroll = running.spring.step(self.input.scroll_offset(), dt_secs);
        let pointer = self.input.pointer();

        running.field.update(elapsed_ms, pointer, scroll);
        running.field.render(&mut running.canvas, pointer);
        true
    }

    /// Tear down: drop the field and the canvas. Idempotent.
    pub fn unmount(&mut self) {
        if matches!(self.state, State::Running(_)) {
            log::debug!("backdrop unmounted");
        }
        self.state = State::Unmounted;
        self.input.clear_pointer();
    }

    /// `true` while mounted with a canvas.
    pub fn is_running(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    /// The inbox hosts write events into.
    pub fn input_mut(&mut self) -> &mut Input {
        &mut self.input
    }

    pub fn canvas(&self) -> Option<&C> {
        match &self.state {
            State::Running(running) => Some(&running.canvas),
            _ => None,
        }
    }

    pub fn field(&self) -> Option<&ParticleField<R>> {
        match &self.state {
            State::Running(running) => Some(&running.field),
            _ => None,
        }
    }

    /// Smoothed scroll offset fed to the last update.
    pub fn scroll_influence(&self) -> f32 {
        match &self.state {
            State::Running(running) => running.spring.value(),
            _ => 0.0,
        }
    }

    /// Convenience for hosts that track the pointer themselves.
    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        match pointer {
            Some(p) => self.input.set_pointer(p),
            None => self.input.clear_pointer(),
        }
    }
}
