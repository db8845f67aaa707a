//! # driftfield
//!
//! A decorative particle background: small shapes drift across a surface,
//! wrap around its edges, shy away from the pointer and link up with faint
//! lines when they pass close to each other.
//!
//! The simulator is pure CPU code with injectable randomness and renders
//! through the [`Canvas`] trait, so it runs the same in a window, in a
//! headless export or under test.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() -> Result<(), driftfield::RunError> {
//!     let config = FieldConfig::default()
//!         .with_pointer_radius(120.0)
//!         .with_trail_fade(Some(0.3));
//!     driftfield::window::run(config, None)
//! }
//! ```
//!
//! ## Embedding
//!
//! Hosts that own their own surface mount a [`Backdrop`] on any canvas and
//! drive it themselves:
//!
//! ```ignore
//! let size = SurfaceSize::new(1600, 1200, 2.0);
//! let canvas = PixelCanvas::for_surface(size, config.background);
//! let mut backdrop = Backdrop::mount(config, size, Ok(canvas), entropy_rng());
//!
//! // Event handlers
//! backdrop.input_mut().set_pointer(Vec2::new(300.0, 200.0));
//! backdrop.input_mut().scroll_by(120.0);
//!
//! // Every display refresh
//! backdrop.frame(clock.tick());
//! ```
//!
//! ## Per-frame model
//!
//! | Step | Effect |
//! |------|--------|
//! | Drift | `position += velocity * scale` with `scale = elapsed / (1000/60 ms)` |
//! | Scroll | vertical drift proportional to the smoothed page scroll |
//! | Rotate | `rotation += rotation_speed * scale` |
//! | Pointer | particles within `pointer_radius` are pushed away |
//! | Wrap | positions wrap toroidally into `[-margin, size + margin)` |
//! | Link | pairs closer than the connection threshold get a fading line |

pub mod backdrop;
pub mod canvas;
pub mod color;
pub mod config;
pub mod connections;
pub mod error;
pub mod export;
mod gpu;
pub mod input;
pub mod particle;
pub mod raster;
pub mod simulation;
pub mod spawn;
pub mod spring;
pub mod surface;
pub mod time;
pub mod window;

pub use backdrop::Backdrop;
pub use canvas::{Canvas, DrawCommand, DrawList};
pub use color::Color;
pub use config::{Band, FieldConfig};
pub use connections::Connection;
pub use error::{ConfigError, ContextError, ExportError, GpuError, RunError};
pub use export::{render_frames, ExportOptions};
pub use glam::Vec2;
pub use gpu::{Presenter, BLIT_SHADER};
pub use input::Input;
pub use particle::{Particle, ShapeKind};
pub use raster::PixelCanvas;
pub use simulation::ParticleField;
pub use spawn::RandomSource;
pub use spring::ScrollSpring;
pub use surface::SurfaceSize;
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::backdrop::Backdrop;
    pub use crate::canvas::{Canvas, DrawCommand, DrawList};
    pub use crate::color::Color;
    pub use crate::config::{Band, FieldConfig};
    pub use crate::input::Input;
    pub use crate::particle::{Particle, ShapeKind};
    pub use crate::raster::PixelCanvas;
    pub use crate::simulation::ParticleField;
    pub use crate::spawn::{entropy_rng, seeded_rng, RandomSource};
    pub use crate::surface::SurfaceSize;
    pub use crate::time::FrameClock;
    pub use crate::Vec2;
}
