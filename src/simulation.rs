//! The particle field simulator.
//!
//! [`ParticleField`] owns the particles, the surface bounds, the
//! configuration and the random source. It knows nothing about windows or
//! pixels: hosts call [`resize`](ParticleField::resize) when the surface
//! changes, [`update`](ParticleField::update) once per frame and
//! [`render`](ParticleField::render) into any [`Canvas`].
//!
//! # Example
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! let mut field = ParticleField::seeded(FieldConfig::default(), 7);
//! field.resize(1280.0, 720.0);
//!
//! let mut canvas = DrawList::new();
//! field.update(16.7, Some(Vec2::new(640.0, 360.0)), 0.0);
//! field.render(&mut canvas, Some(Vec2::new(640.0, 360.0)));
//! ```

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;

use crate::canvas::{draw_shape, Canvas};
use crate::config::FieldConfig;
use crate::connections::{find_connections, for_each_connection, Connection};
use crate::particle::Particle;
use crate::spawn::{seeded_rng, spawn_particles, RandomSource};

/// A canvas-sized field of drifting particles.
#[derive(Debug, Clone)]
pub struct ParticleField<R: RandomSource = SmallRng> {
    config: FieldConfig,
    particles: Vec<Particle>,
    bounds: Vec2,
    rng: R,
}

impl ParticleField<SmallRng> {
    /// Field with a reproducible random source.
    pub fn seeded(config: FieldConfig, seed: u64) -> Self {
        Self::new(config, seeded_rng(seed))
    }
}

impl<R: RandomSource> ParticleField<R> {
    /// Create an empty field. Particles appear on the first [`resize`](Self::resize).
    pub fn new(config: FieldConfig, rng: R) -> Self {
        Self {
            config,
            particles: Vec::new(),
            bounds: Vec2::ZERO,
            rng,
        }
    }

    #[inline]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Logical surface size the particles were seeded for.
    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    /// Reseed the collection for a `width x height` logical surface.
    ///
    /// Returns `true` if the collection was rebuilt. Resizing to the current
    /// bounds keeps the existing particles. Non-finite or non-positive
    /// dimensions are treated as 0 and yield an empty field.
    pub fn resize(&mut self, width: f32, height: f32) -> bool {
        let bounds = Vec2::new(sanitize_dimension(width), sanitize_dimension(height));
        if bounds == self.bounds {
            return false;
        }

        self.bounds = bounds;
        self.particles = spawn_particles(&self.config, bounds.x, bounds.y, &mut self.rng);
        log::debug!(
            "seeded {} particles for {}x{}",
            self.particles.len(),
            bounds.x,
            bounds.y
        );
        true
    }

    /// Advance every particle by `elapsed_ms` of wall time.
    ///
    /// `pointer` is in logical surface pixels. `scroll_influence` is the
    /// smoothed page scroll offset in pixels.
    pub fn update(&mut self, elapsed_ms: f32, pointer: Option<Vec2>, scroll_influence: f32) {
        let scale = elapsed_scale(elapsed_ms, self.config.reference_frame_ms);
        if scale == 0.0 {
            return;
        }

        let pointer = pointer.filter(|p| p.is_finite());
        let scroll = if scroll_influence.is_finite() {
            scroll_influence
        } else {
            0.0
        };
        let scroll_factor = scroll * self.config.scroll_damping * scale;
        let radius = self.config.pointer_radius;
        let push = self.config.pointer_force * scale;
        let margin = self.config.margin;
        let bounds = self.bounds;

        for p in &mut self.particles {
            p.position += p.velocity * scale;
            p.position.y += p.velocity.y * scroll_factor;
            p.rotation = (p.rotation + p.rotation_speed * scale).rem_euclid(TAU);

            if let Some(pointer) = pointer {
                let away = p.position - pointer;
                let distance = away.length();
                // Coincident pointer has no direction; skip this frame
                if distance > 0.0 && distance < radius {
                    p.position += away / distance * push;
                }
            }

            p.position.x = wrap(p.position.x, bounds.x, margin);
            p.position.y = wrap(p.position.y, bounds.y, margin);
        }
    }

    /// Draw the current frame: clear (or fade), shapes, then connections.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C, pointer: Option<Vec2>) {
        match self.config.trail_fade {
            Some(alpha) => canvas.fade(alpha),
            None => canvas.clear(),
        }

        for p in &self.particles {
            draw_shape(
                canvas,
                p.shape(),
                p.position,
                p.size,
                p.rotation,
                p.color,
                p.opacity,
            );
        }

        let width = self.config.connection_width;
        for_each_connection(&self.particles, &self.config, pointer, |link| {
            let a = &self.particles[link.a];
            let b = &self.particles[link.b];
            canvas.stroke_line(a.position, b.position, width, a.color, link.alpha);
        });
    }

    /// Connections for the current positions.
    pub fn connections(&self, pointer: Option<Vec2>) -> Vec<Connection> {
        find_connections(&self.particles, &self.config, pointer)
    }
}

/// Frame-rate independence factor: `elapsed / reference`.
///
/// Negative or non-finite elapsed times count as no time at all.
pub fn elapsed_scale(elapsed_ms: f32, reference_frame_ms: f32) -> f32 {
    if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 || !(reference_frame_ms > 0.0) {
        return 0.0;
    }
    elapsed_ms / reference_frame_ms
}

/// Wrap `value` toroidally into `[-margin, dimension + margin)`.
///
/// Values already in range are returned unchanged. Any finite value lands in
/// range in one step, however far outside it started.
pub fn wrap(value: f32, dimension: f32, margin: f32) -> f32 {
    let upper = dimension + margin;
    if value >= -margin && value < upper {
        return value;
    }

    let span = dimension + 2.0 * margin;
    if !value.is_finite() || !(span > 0.0) {
        return -margin;
    }

    let wrapped = -margin + (value + margin).rem_euclid(span);
    // Rounding can land exactly on the exclusive upper edge
    if wrapped >= upper || wrapped < -margin {
        -margin
    } else {
        wrapped
    }
}

fn sanitize_dimension(value: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, DrawList};
    use crate::color::Color;

    fn field() -> ParticleField {
        let mut field = ParticleField::seeded(FieldConfig::default(), 3);
        field.resize(800.0, 600.0);
        field
    }

    fn still_particle(x: f32, y: f32) -> Particle {
        Particle {
            position: Vec2::new(x, y),
            velocity: Vec2::ZERO,
            size: 2.0,
            opacity: 0.5,
            color: Color::WHITE,
            rotation: 0.0,
            rotation_speed: 0.0,
        }
    }

    #[test]
    fn test_resize_seeds_by_area() {
        let field = field();
        assert_eq!(field.particles().len(), 32);
        assert_eq!(field.bounds(), Vec2::new(800.0, 600.0));
    }

    #[test]
    fn test_resize_same_size_keeps_particles() {
        let mut field = field();
        let before = field.particles().to_vec();

        assert!(!field.resize(800.0, 600.0));
        assert_eq!(field.particles(), &before[..]);

        assert!(field.resize(1024.0, 768.0));
        assert_eq!(field.particles().len(), 52);
    }

    #[test]
    fn test_resize_degenerate() {
        let mut field = field();
        field.resize(f32::NAN, 600.0);
        assert!(field.particles().is_empty());
        field.resize(-5.0, -5.0);
        assert!(field.particles().is_empty());
    }

    #[test]
    fn test_update_moves_by_velocity() {
        let mut field = field();
        let before = field.particles().to_vec();

        field.update(REFERENCE_MS, None, 0.0);

        for (old, new) in before.iter().zip(field.particles()) {
            let expected = old.position + old.velocity;
            assert!((new.position - expected).length() < 1e-3);
        }
    }

    const REFERENCE_MS: f32 = 1000.0 / 60.0;

    #[test]
    fn test_elapsed_scaling() {
        let mut once = field();
        once.update(2.0 * REFERENCE_MS, None, 0.0);

        let mut twice = field();
        twice.update(REFERENCE_MS, None, 0.0);
        twice.update(REFERENCE_MS, None, 0.0);

        for (a, b) in once.particles().iter().zip(twice.particles()) {
            assert!((a.position - b.position).length() < 1e-3);
        }
    }

    #[test]
    fn test_zero_and_bad_elapsed_are_noops() {
        let mut field = field();
        let before = field.particles().to_vec();

        field.update(0.0, Some(Vec2::new(400.0, 300.0)), 500.0);
        field.update(-16.0, None, 0.0);
        field.update(f32::NAN, None, 0.0);

        assert_eq!(field.particles(), &before[..]);
    }

    #[test]
    fn test_scroll_term_follows_vertical_velocity() {
        let mut config = FieldConfig::default();
        config.margin = 1000.0;
        let mut field = ParticleField::seeded(config, 1);
        field.resize(800.0, 600.0);
        let before = field.particles().to_vec();

        field.update(REFERENCE_MS, None, 1000.0);

        for (old, new) in before.iter().zip(field.particles()) {
            let expected_y = old.position.y + old.velocity.y + old.velocity.y * 1000.0 * 0.0015;
            assert!((new.position.y - expected_y).abs() < 1e-3);
        }
    }

    #[test]
    fn test_pointer_repels() {
        let mut field = ParticleField::seeded(FieldConfig::default(), 0);
        field.bounds = Vec2::new(400.0, 400.0);
        field.particles = vec![still_particle(210.0, 200.0)];

        field.update(REFERENCE_MS, Some(Vec2::new(200.0, 200.0)), 0.0);

        let p = field.particles()[0].position;
        assert!((p - Vec2::new(210.5, 200.0)).length() < 1e-4);
    }

    #[test]
    fn test_pointer_outside_radius_and_coincident() {
        let mut field = ParticleField::seeded(FieldConfig::default(), 0);
        field.bounds = Vec2::new(400.0, 400.0);
        field.particles = vec![still_particle(100.0, 100.0), still_particle(350.0, 100.0)];

        field.update(REFERENCE_MS, Some(Vec2::new(100.0, 100.0)), 0.0);

        assert_eq!(field.particles()[0].position, Vec2::new(100.0, 100.0));
        assert_eq!(field.particles()[1].position, Vec2::new(350.0, 100.0));
    }

    #[test]
    fn test_attributes_immutable() {
        let mut field = field();
        let before = field.particles().to_vec();

        for _ in 0..50 {
            field.update(REFERENCE_MS, Some(Vec2::new(10.0, 10.0)), 200.0);
        }

        for (old, new) in before.iter().zip(field.particles()) {
            assert_eq!(old.size, new.size);
            assert_eq!(old.opacity, new.opacity);
            assert_eq!(old.color, new.color);
            assert_eq!(old.velocity, new.velocity);
            assert_eq!(old.rotation_speed, new.rotation_speed);
        }
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap(50.0, 100.0, 20.0), 50.0);
        assert_eq!(wrap(-20.0, 100.0, 20.0), -20.0);
        assert_eq!(wrap(120.0, 100.0, 20.0), -20.0);
        assert_eq!(wrap(121.0, 100.0, 20.0), -19.0);
        assert_eq!(wrap(-21.0, 100.0, 20.0), 119.0);

        let far = wrap(1.0e7, 100.0, 20.0);
        assert!((-20.0..120.0).contains(&far));
        assert_eq!(wrap(f32::INFINITY, 100.0, 20.0), -20.0);
    }

    #[test]
    fn test_render_order() {
        let mut field = ParticleField::seeded(FieldConfig::default(), 0);
        field.bounds = Vec2::new(400.0, 400.0);
        field.particles = vec![still_particle(0.0, 0.0), still_particle(30.0, 0.0)];

        let mut canvas = DrawList::new();
        field.render(&mut canvas, None);

        let cmds = canvas.commands();
        assert_eq!(cmds[0], DrawCommand::Clear);
        assert_eq!(canvas.shapes().count(), 2);
        assert!(matches!(cmds.last(), Some(DrawCommand::Line { .. })));
    }

    #[test]
    fn test_render_with_trails() {
        let config = FieldConfig::default().with_trail_fade(Some(0.25));
        let mut field = ParticleField::seeded(config, 0);
        field.resize(300.0, 300.0);

        let mut canvas = DrawList::new();
        field.render(&mut canvas, None);
        assert_eq!(canvas.commands()[0], DrawCommand::Fade { alpha: 0.25 });
    }
}
