//! Headless rendering of the field to numbered PNG files.
//!
//! Useful for previews and for checking output without a window. The seed
//! and the scripted pointer path make every export reproducible.

use std::f32::consts::TAU;
use std::fs;
use std::path::PathBuf;

use glam::Vec2;

use crate::backdrop::Backdrop;
use crate::config::{FieldConfig, REFERENCE_FRAME_MS};
use crate::error::ExportError;
use crate::raster::PixelCanvas;
use crate::spawn::seeded_rng;
use crate::surface::SurfaceSize;
use crate::time::FrameClock;

/// Settings for a headless export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    /// Physical width in pixels.
    pub width: u32,
    /// Physical height in pixels.
    pub height: u32,
    pub scale_factor: f64,
    /// Number of frames to write.
    pub frames: u32,
    /// Simulated time between frames.
    pub frame_ms: f32,
    pub seed: u64,
    pub out_dir: PathBuf,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            scale_factor: 1.0,
            frames: 60,
            frame_ms: REFERENCE_FRAME_MS,
            seed: 0,
            out_dir: PathBuf::from("frames"),
        }
    }
}

/// Pointer position for frame `index` of `frames`: one lap of a circle
/// centred on the surface.
pub fn pointer_path(index: u32, frames: u32, width: f32, height: f32) -> Vec2 {
    let angle = TAU * index as f32 / frames.max(1) as f32;
    let center = Vec2::new(width, height) * 0.5;
    center + Vec2::from_angle(angle) * (0.3 * width.min(height))
}

/// Render `options.frames` frames and write them as `frame_00000.png`, ...
///
/// Returns the written paths in frame order. The config is validated first.
pub fn render_frames(
    config: &FieldConfig,
    options: &ExportOptions,
) -> Result<Vec<PathBuf>, ExportError> {
    config.validate()?;
    if !(options.frame_ms.is_finite() && options.frame_ms >= 0.0) {
        return Err(ExportError::InvalidFrameStep(options.frame_ms));
    }
    if options.width == 0 || options.height == 0 {
        return Err(ExportError::EmptySurface {
            width: options.width,
            height: options.height,
        });
    }

    fs::create_dir_all(&options.out_dir).map_err(|source| ExportError::Io {
        path: options.out_dir.clone(),
        source,
    })?;

    let size = SurfaceSize::new(options.width, options.height, options.scale_factor);
    let canvas = PixelCanvas::for_surface(size, config.background);
    let mut backdrop = Backdrop::mount(config.clone(), size, Ok(canvas), seeded_rng(options.seed));

    // Simulated time only: every tick reports exactly `frame_ms`, unclamped
    let mut clock = FrameClock::new().with_max_delta_ms(f32::INFINITY);
    clock.set_fixed_delta_ms(Some(options.frame_ms));

    let (w, h) = (size.logical_width(), size.logical_height());
    let mut written = Vec::new();

    for index in 0..options.frames {
        backdrop.set_pointer(Some(pointer_path(index, options.frames, w, h)));
        backdrop.frame(clock.tick());

        let Some(canvas) = backdrop.canvas() else {
            break;
        };
        let path = options.out_dir.join(format!("frame_{index:05}.png"));
        canvas.save_png(&path)?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }

    backdrop.unmount();
    log::info!(
        "exported {} frames to {}",
        written.len(),
        options.out_dir.display()
    );
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn test_pointer_path_is_a_circle() {
        let start = pointer_path(0, 8, 200.0, 100.0);
        assert!((start - Vec2::new(130.0, 50.0)).length() < 1e-4);

        let center = Vec2::new(100.0, 50.0);
        for i in 0..8 {
            let p = pointer_path(i, 8, 200.0, 100.0);
            assert!((p.distance(center) - 30.0).abs() < 1e-3);
        }

        // Zero frames must not divide by zero
        assert!(pointer_path(0, 0, 200.0, 100.0).is_finite());
    }

    #[test]
    fn test_empty_surface_rejected() {
        let options = ExportOptions {
            width: 0,
            ..Default::default()
        };
        assert!(matches!(
            render_frames(&FieldConfig::default(), &options),
            Err(ExportError::EmptySurface { width: 0, .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = FieldConfig::default().with_palette(Vec::new());
        assert!(matches!(
            render_frames(&config, &ExportOptions::default()),
            Err(ExportError::Config(ConfigError::EmptyPalette))
        ));

        let config = FieldConfig::default().with_speed(-1.0, 0.5);
        assert!(matches!(
            render_frames(&config, &ExportOptions::default()),
            Err(ExportError::Config(ConfigError::InvalidRange { name: "speed", .. }))
        ));
    }

    #[test]
    fn test_invalid_frame_step_rejected() {
        for frame_ms in [f32::NAN, f32::INFINITY, -1.0] {
            let options = ExportOptions {
                frame_ms,
                ..Default::default()
            };
            assert!(matches!(
                render_frames(&FieldConfig::default(), &options),
                Err(ExportError::InvalidFrameStep(_))
            ));
        }
    }
}
