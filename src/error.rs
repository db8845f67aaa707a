//! Error types for driftfield.
//!
//! The simulator itself never fails: degenerate inputs are skipped and a
//! missing drawing context turns the backdrop into a no-op. Errors only come
//! from the edges of the crate: loading configuration, acquiring a GPU
//! surface, opening a window and writing exported frames.

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The configuration was not valid JSON, had the wrong shape, or could
    /// not be serialized.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// A `min..max` band was empty, reversed or not finite.
    #[error("invalid range for {name}: {min}..{max}")]
    InvalidRange {
        name: &'static str,
        min: f32,
        max: f32,
    },
    /// A scalar parameter was out of its allowed domain.
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: f32 },
    /// The palette had no colors to pick from.
    #[error("palette must contain at least one color")]
    EmptyPalette,
    /// A color string was not `#rrggbb` or `#rrggbbaa`.
    #[error("invalid hex color {0:?}")]
    InvalidColor(String),
}

/// The drawing context for a backdrop could not be acquired.
///
/// Hosts pass this to [`Backdrop::mount`](crate::Backdrop::mount) instead of a
/// canvas; the backdrop then performs no work.
#[derive(Debug, Error)]
#[error("drawing context unavailable: {reason}")]
pub struct ContextError {
    pub reason: String,
}

impl ContextError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur while setting up the GPU presenter.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for the window.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found")]
    NoAdapter,
    /// Failed to create the GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no usable texture format.
    #[error("surface has no supported texture format")]
    NoSurfaceFormat,
}

impl From<GpuError> for ContextError {
    fn from(e: GpuError) -> Self {
        ContextError::new(e.to_string())
    }
}

/// Errors that can occur when running the window host.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to create or run the event loop.
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// The OS refused to create the window.
    #[error("failed to create window: {0}")]
    WindowCreation(#[from] winit::error::OsError),
    /// The field configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors produced by the headless frame exporter.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the output directory failed.
    #[error("failed to create output directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Encoding or writing a PNG frame failed.
    #[error("failed to write frame {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    /// The requested surface has no pixels.
    #[error("export surface must be non-empty, got {width}x{height}")]
    EmptySurface { width: u32, height: u32 },
    /// The simulated frame step was negative or not finite.
    #[error("frame step must be a finite, non-negative number of milliseconds, got {0}")]
    InvalidFrameStep(f32),
    /// The field configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
