//! Tunable parameters for the particle field.
//!
//! Every field has a default tuned for a subtle full-page background,
//! so a config file only needs to name what it changes:
//!
//! ```ignore
//! let config = FieldConfig::from_json_str(r#"{ "max_particles": 60, "trail_fade": 0.25 }"#)?;
//! ```
//!
//! Builder-style setters are available for code:
//!
//! ```ignore
//! let config = FieldConfig::default()
//!     .with_max_particles(60)
//!     .with_pointer_radius(140.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::color::{default_palette, Color};
use crate::error::ConfigError;

/// Duration of one frame at 60 Hz, in milliseconds.
pub const REFERENCE_FRAME_MS: f32 = 1000.0 / 60.0;

/// A half-open `[min, max)` band that per-particle attributes are drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Map a unit sample `t` in `[0, 1)` into the band.
    #[inline]
    pub fn lerp(&self, t: f32) -> f32 {
        self.min + (self.max - self.min) * t
    }

    /// Whether `value` lies in `[min, max)`, or equals `min` for a zero-width band.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        if self.min == self.max {
            value == self.min
        } else {
            value >= self.min && value < self.max
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min > self.max || self.min < 0.0 {
            return Err(ConfigError::InvalidRange {
                name,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Configuration for a [`ParticleField`](crate::ParticleField).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Surface area (logical px²) per particle.
    pub density_divisor: f32,
    /// Population cap.
    pub max_particles: usize,
    /// Distance particles may travel past an edge before wrapping.
    pub margin: f32,
    /// Radius / half-extent band.
    pub size: Band,
    /// Per-component speed band in px per reference frame; sign is random.
    pub speed: Band,
    /// Opacity band, within `[0, 1]`.
    pub opacity: Band,
    /// Rotation speed is drawn from `[-max, max)` radians per reference frame.
    pub rotation_speed_max: f32,
    /// Colors particles pick from uniformly.
    pub palette: Vec<Color>,
    /// Frame length that velocities are expressed against.
    pub reference_frame_ms: f32,
    /// Scale of the vertical drift caused by the smoothed scroll offset.
    pub scroll_damping: f32,
    /// Stiffness of the critically damped scroll spring (s⁻²).
    pub scroll_stiffness: f32,
    /// Upper bound of the raw scroll offset the host accumulates.
    pub max_scroll: f32,
    /// Particles closer than this to the pointer are pushed away.
    pub pointer_radius: f32,
    /// Displacement per reference frame applied by the pointer push.
    pub pointer_force: f32,
    /// Base distance under which two particles are linked.
    pub connection_distance: f32,
    /// Alpha of a link between coincident particles.
    pub connection_opacity: f32,
    /// Link stroke width in logical px.
    pub connection_width: f32,
    /// Pointer distance over which links are boosted.
    pub highlight_radius: f32,
    /// Fractional growth of the link distance right under the pointer.
    pub highlight_boost: f32,
    /// When set, the previous frame is faded by this alpha instead of cleared.
    pub trail_fade: Option<f32>,
    /// Color the surface is cleared to.
    pub background: Color,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            density_divisor: 15_000.0,
            max_particles: 100,
            margin: 20.0,
            size: Band::new(1.0, 3.0),
            speed: Band::new(0.05, 0.25),
            opacity: Band::new(0.1, 0.6),
            rotation_speed_max: 0.02,
            palette: default_palette(),
            reference_frame_ms: REFERENCE_FRAME_MS,
            scroll_damping: 0.0015,
            scroll_stiffness: 120.0,
            max_scroll: 4_000.0,
            pointer_radius: 100.0,
            pointer_force: 0.5,
            connection_distance: 100.0,
            connection_opacity: 0.2,
            connection_width: 1.0,
            highlight_radius: 150.0,
            highlight_boost: 0.5,
            trail_fade: None,
            background: Color::rgb(0x02, 0x06, 0x17),
        }
    }
}

impl FieldConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FieldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("density_divisor", self.density_divisor)?;
        non_negative("margin", self.margin)?;
        self.size.validate("size")?;
        self.speed.validate("speed")?;
        self.opacity.validate("opacity")?;
        if self.opacity.max > 1.0 {
            return Err(ConfigError::InvalidRange {
                name: "opacity",
                min: self.opacity.min,
                max: self.opacity.max,
            });
        }
        non_negative("rotation_speed_max", self.rotation_speed_max)?;
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        positive("reference_frame_ms", self.reference_frame_ms)?;
        non_negative("scroll_damping", self.scroll_damping)?;
        positive("scroll_stiffness", self.scroll_stiffness)?;
        non_negative("max_scroll", self.max_scroll)?;
        non_negative("pointer_radius", self.pointer_radius)?;
        non_negative("pointer_force", self.pointer_force)?;
        non_negative("connection_distance", self.connection_distance)?;
        unit("connection_opacity", self.connection_opacity)?;
        non_negative("connection_width", self.connection_width)?;
        non_negative("highlight_radius", self.highlight_radius)?;
        non_negative("highlight_boost", self.highlight_boost)?;
        if let Some(fade) = self.trail_fade {
            if !(fade > 0.0 && fade <= 1.0) {
                return Err(ConfigError::InvalidValue {
                    name: "trail_fade",
                    value: fade,
                });
            }
        }
        Ok(())
    }

    /// Number of particles for a surface of the given logical size.
    ///
    /// `clamp(floor(width * height / density_divisor), 0, max_particles)`;
    /// non-finite or non-positive dimensions give zero.
    pub fn particle_count(&self, width: f32, height: f32) -> usize {
        let area = width * height;
        if !(width > 0.0 && height > 0.0 && area.is_finite()) || self.density_divisor <= 0.0 {
            return 0;
        }
        let raw = (area / self.density_divisor).floor();
        if raw >= self.max_particles as f32 {
            self.max_particles
        } else {
            raw as usize
        }
    }

    // ========== Builder ==========

    pub fn with_density_divisor(mut self, divisor: f32) -> Self {
        self.density_divisor = divisor;
        self
    }

    pub fn with_max_particles(mut self, count: usize) -> Self {
        self.max_particles = count;
        self
    }

    pub fn with_margin(mut self, margin: f32) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_size(mut self, min: f32, max: f32) -> Self {
        self.size = Band::new(min, max);
        self
    }

    pub fn with_speed(mut self, min: f32, max: f32) -> Self {
        self.speed = Band::new(min, max);
        self
    }

    pub fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = Band::new(min, max);
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_pointer_radius(mut self, radius: f32) -> Self {
        self.pointer_radius = radius;
        self
    }

    pub fn with_pointer_force(mut self, force: f32) -> Self {
        self.pointer_force = force;
        self
    }

    pub fn with_connection_distance(mut self, distance: f32) -> Self {
        self.connection_distance = distance;
        self
    }

    pub fn with_highlight(mut self, radius: f32, boost: f32) -> Self {
        self.highlight_radius = radius;
        self.highlight_boost = boost;
        self
    }

    pub fn with_scroll_damping(mut self, damping: f32) -> Self {
        self.scroll_damping = damping;
        self
    }

    /// Fade the previous frame instead of clearing it, leaving trails.
    pub fn with_trail_fade(mut self, fade: Option<f32>) -> Self {
        self.trail_fade = fade;
        self
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = color;
        self
    }
}

fn positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}

fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        FieldConfig::default().validate().unwrap();
    }

    #[test]
    fn test_particle_count_density_and_cap() {
        let config = FieldConfig::default();

        // 300 x 200 = 60_000 px² -> 4 particles
        assert_eq!(config.particle_count(300.0, 200.0), 4);
        // A 1080p viewport would want 138; the cap keeps it at 100
        assert_eq!(config.particle_count(1920.0, 1080.0), 100);
        // Below one particle's worth of area
        assert_eq!(config.particle_count(100.0, 100.0), 0);
    }

    #[test]
    fn test_particle_count_degenerate_sizes() {
        let config = FieldConfig::default();
        assert_eq!(config.particle_count(0.0, 1000.0), 0);
        assert_eq!(config.particle_count(-500.0, 1000.0), 0);
        assert_eq!(config.particle_count(f32::NAN, 1000.0), 0);
        assert_eq!(config.particle_count(f32::INFINITY, 1000.0), 0);
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let config = FieldConfig::from_json_str(
            r##"{ "max_particles": 40, "palette": ["#ffffff"], "trail_fade": 0.3 }"##,
        )
        .unwrap();

        assert_eq!(config.max_particles, 40);
        assert_eq!(config.palette, vec![Color::WHITE]);
        assert_eq!(config.trail_fade, Some(0.3));
        assert_eq!(config.connection_distance, 100.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = FieldConfig::default().with_max_particles(12).with_trail_fade(Some(0.5));
        let back = FieldConfig::from_json_str(&config.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validation_failures() {
        let err = FieldConfig::from_json_str(r#"{ "palette": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyPalette));

        let err = FieldConfig::from_json_str(r#"{ "size": { "min": 3.0, "max": 1.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { name: "size", .. }));

        let err = FieldConfig::from_json_str(r#"{ "opacity": { "min": 0.5, "max": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRange { name: "opacity", .. }));

        let err = FieldConfig::from_json_str(r#"{ "density_divisor": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "density_divisor", .. }));

        let err = FieldConfig::from_json_str(r#"{ "trail_fade": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { name: "trail_fade", .. }));

        let err = FieldConfig::from_json_str(r##"{ "palette": ["#12"] }"##).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = FieldConfig::from_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_band() {
        let band = Band::new(1.0, 3.0);
        assert_eq!(band.lerp(0.0), 1.0);
        assert_eq!(band.lerp(0.5), 2.0);
        assert!(band.contains(1.0));
        assert!(!band.contains(3.0));
        assert!(Band::new(2.0, 2.0).contains(2.0));
    }
}
