//! Random sources and particle seeding.
//!
//! The field draws every random attribute through [`RandomSource`], so tests
//! can hand it a seeded generator while the window host uses entropy:
//!
//! ```ignore
//! use rand::{rngs::SmallRng, SeedableRng};
//!
//! let field = ParticleField::new(config, SmallRng::seed_from_u64(7));
//! ```

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::color::Color;
use crate::config::FieldConfig;
use crate::particle::Particle;

/// Source of uniform random numbers for particle seeding.
///
/// Implemented for every [`rand::RngCore`], so any `rand` generator works.
pub trait RandomSource {
    /// Uniform `f32` in `[0, 1)`.
    fn next_unit(&mut self) -> f32;

    /// Uniform index in `0..len`. `len` must be non-zero.
    fn next_index(&mut self, len: usize) -> usize {
        let i = (self.next_unit() * len as f32) as usize;
        i.min(len - 1)
    }

    /// Uniform `f32` in `[min, max)`.
    #[inline]
    fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + (max - min) * self.next_unit()
    }

    /// `1.0` or `-1.0` with equal probability.
    #[inline]
    fn next_sign(&mut self) -> f32 {
        if self.next_unit() < 0.5 {
            -1.0
        } else {
            1.0
        }
    }
}

impl<R: RngCore + ?Sized> RandomSource for R {
    #[inline]
    fn next_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }

    #[inline]
    fn next_index(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// Generator seeded from OS entropy, for production use.
pub fn entropy_rng() -> SmallRng {
    SmallRng::from_entropy()
}

/// Generator with a fixed seed, for reproducible fields.
pub fn seeded_rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
}

/// Draw one particle inside a `width x height` surface.
///
/// Draw order is fixed (position, size, velocity, opacity, color, rotation,
/// rotation speed) so equal seeds give equal particles.
pub fn spawn_particle<R: RandomSource + ?Sized>(
    config: &FieldConfig,
    width: f32,
    height: f32,
    rng: &mut R,
) -> Particle {
    let position = Vec2::new(rng.next_unit() * width, rng.next_unit() * height);
    let size = config.size.lerp(rng.next_unit());

    let vx = config.speed.lerp(rng.next_unit()) * rng.next_sign();
    let vy = config.speed.lerp(rng.next_unit()) * rng.next_sign();

    let opacity = config.opacity.lerp(rng.next_unit());
    let color = pick_color(&config.palette, rng);
    let rotation = rng.next_unit() * TAU;
    let rotation_speed = rng.next_range(-config.rotation_speed_max, config.rotation_speed_max);

    Particle {
        position,
        velocity: Vec2::new(vx, vy),
        size,
        opacity,
        color,
        rotation,
        rotation_speed,
    }
}

/// Seed a full collection for a surface of the given logical size.
pub fn spawn_particles<R: RandomSource + ?Sized>(
    config: &FieldConfig,
    width: f32,
    height: f32,
    rng: &mut R,
) -> Vec<Particle> {
    let count = config.particle_count(width, height);
    (0..count)
        .map(|_| spawn_particle(config, width, height, rng))
        .collect()
}

fn pick_color<R: RandomSource + ?Sized>(palette: &[Color], rng: &mut R) -> Color {
    match palette.len() {
        0 => Color::WHITE,
        len => palette[rng.next_index(len)],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cycles through a fixed list of unit samples.
    struct Sequence {
        values: Vec<f32>,
        next: usize,
    }

    impl RandomSource for Sequence {
        fn next_unit(&mut self) -> f32 {
            let v = self.values[self.next % self.values.len()];
            self.next += 1;
            v
        }
    }

    #[test]
    fn test_spawn_respects_bands() {
        let config = FieldConfig::default();
        let mut rng = seeded_rng(11);

        for p in spawn_particles(&config, 1280.0, 720.0, &mut rng) {
            assert!(p.position.x >= 0.0 && p.position.x < 1280.0);
            assert!(p.position.y >= 0.0 && p.position.y < 720.0);
            assert!(config.size.contains(p.size));
            assert!(config.speed.contains(p.velocity.x.abs()));
            assert!(config.speed.contains(p.velocity.y.abs()));
            assert!(config.opacity.contains(p.opacity));
            assert!(config.palette.contains(&p.color));
            assert!(p.rotation >= 0.0 && p.rotation < TAU);
            assert!(p.rotation_speed.abs() <= config.rotation_speed_max);
        }
    }

    #[test]
    fn test_spawn_count_follows_config() {
        let config = FieldConfig::default();
        let mut rng = seeded_rng(1);
        assert_eq!(spawn_particles(&config, 1280.0, 720.0, &mut rng).len(), 61);
        assert_eq!(spawn_particles(&config, 0.0, 720.0, &mut rng).len(), 0);
    }

    #[test]
    fn test_same_seed_same_particles() {
        let config = FieldConfig::default();
        let a = spawn_particles(&config, 800.0, 600.0, &mut seeded_rng(42));
        let b = spawn_particles(&config, 800.0, 600.0, &mut seeded_rng(42));
        assert_eq!(a, b);

        let c = spawn_particles(&config, 800.0, 600.0, &mut seeded_rng(43));
        assert_ne!(a, c);
    }

    #[test]
    fn test_custom_source_drives_attributes() {
        let config = FieldConfig::default();
        let mut rng = Sequence {
            values: vec![0.5, 0.25, 0.0, 0.75, 0.99, 0.2, 0.0, 0.5, 0.0, 0.0, 0.5],
            next: 0,
        };
        let p = spawn_particle(&config, 100.0, 40.0, &mut rng);

        assert_eq!(p.position, Vec2::new(50.0, 10.0));
        assert_eq!(p.size, config.size.min);
        // 0.75 -> speed, 0.99 -> positive sign
        assert!(p.velocity.x > 0.0);
        // 0.2 -> speed, 0.0 -> negative sign
        assert!(p.velocity.y < 0.0);
        assert_eq!(p.opacity, config.opacity.min + 0.5 * (config.opacity.max - config.opacity.min));
        assert_eq!(p.color, config.palette[0]);
        assert_eq!(p.rotation, 0.0);
        assert_eq!(p.rotation_speed, 0.0);
    }

    #[test]
    fn test_next_index_bounds() {
        let mut rng = Sequence {
            values: vec![0.0, 0.999_999, 0.5],
            next: 0,
        };
        assert_eq!(rng.next_index(4), 0);
        assert_eq!(rng.next_index(4), 3);
        assert_eq!(rng.next_index(4), 2);
    }
}
