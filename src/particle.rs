//! The particle record and its derived shape.

use glam::Vec2;

use crate::color::Color;

/// Which outline a particle is drawn with.
///
/// Not stored on the particle: it is derived from the current position every
/// frame, so shapes shimmer between kinds as particles drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// Filled disc of radius `size`.
    Circle,
    /// Rotated square of half-extent `size`.
    Square,
    /// Rotated equilateral triangle.
    Triangle,
    /// Rotated rhombus, taller than it is wide.
    Diamond,
}

impl ShapeKind {
    /// Every kind, in selection order.
    pub const ALL: [ShapeKind; 4] = [
        ShapeKind::Circle,
        ShapeKind::Square,
        ShapeKind::Triangle,
        ShapeKind::Diamond,
    ];

    /// `floor((x * y) mod 4)` with a Euclidean remainder, so negative
    /// products still select a shape.
    pub fn from_position(position: Vec2) -> Self {
        let product = position.x * position.y;
        if !product.is_finite() {
            return ShapeKind::Circle;
        }
        // rem_euclid can round up to exactly 4.0 for tiny negative inputs
        let index = product.rem_euclid(4.0).floor() as usize % 4;
        Self::ALL[index]
    }
}

/// One decorative particle.
///
/// Only `position` and `rotation` change after creation. Everything else is
/// drawn once by the spawner and kept for the particle's lifetime, which
/// ends at the next resize.
///
/// # Example
///
/// ```ignore
/// use driftfield::prelude::*;
///
/// let p = Particle {
///     position: Vec2::new(120.0, 80.0),
///     velocity: Vec2::new(0.2, -0.1),
///     size: 2.5,
///     opacity: 0.4,
///     color: Color::WHITE,
///     rotation: 0.0,
///     rotation_speed: 0.01,
/// };
/// assert_eq!(p.shape(), ShapeKind::Circle);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position in logical pixels. Kept inside `[-margin, dim + margin)` on
    /// both axes by the field's wrap step.
    pub position: Vec2,
    /// Drift per reference frame (1000/60 ms), in logical pixels.
    ///
    /// `velocity.y` also scales how strongly the particle follows scrolling.
    pub velocity: Vec2,
    /// Radius for circles, half-extent for the other shapes.
    pub size: f32,
    /// Fill alpha in `[0, 1]`.
    pub opacity: f32,
    /// Fill color, one entry of the config palette.
    pub color: Color,
    /// Current angle in radians, kept in `[0, 2π)`.
    pub rotation: f32,
    /// Radians added to `rotation` per reference frame.
    pub rotation_speed: f32,
}

impl Particle {
    /// Outline for the current position. See [`ShapeKind::from_position`].
    #[inline]
    pub fn shape(&self) -> ShapeKind {
        ShapeKind::from_position(self.position)
    }
}
