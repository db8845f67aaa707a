//! Drawing surface abstraction.
//!
//! The field renders through [`Canvas`] and never touches pixels itself.
//! [`crate::raster::PixelCanvas`] rasterises into an image; [`DrawList`]
//! records commands so tests can inspect exactly what a frame drew.
//!
//! All coordinates are logical pixels.

use glam::Vec2;

use crate::color::Color;
use crate::particle::ShapeKind;
use crate::surface::SurfaceSize;

/// Drawing operations needed to render one frame of the field.
pub trait Canvas {
    /// Reset every pixel to the background.
    fn clear(&mut self);

    /// Blend the background over the previous frame with `alpha`, leaving trails.
    fn fade(&mut self, alpha: f32);

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32);

    /// Fill a convex polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: f32);

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color, alpha: f32);

    /// Follow a change of the underlying surface. Recording canvases ignore it.
    fn resize(&mut self, _size: SurfaceSize) {}
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn clear(&mut self) {
        (**self).clear()
    }

    fn fade(&mut self, alpha: f32) {
        (**self).fade(alpha)
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        (**self).fill_circle(center, radius, color, alpha)
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: f32) {
        (**self).fill_polygon(points, color, alpha)
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color, alpha: f32) {
        (**self).stroke_line(a, b, width, color, alpha)
    }

    fn resize(&mut self, size: SurfaceSize) {
        (**self).resize(size)
    }
}

/// Circumradius of a triangle relative to particle size.
pub const TRIANGLE_SCALE: f32 = 1.2;
/// Long (vertical) half-diagonal of a diamond relative to particle size.
pub const DIAMOND_LONG: f32 = 1.3;
/// Short (horizontal) half-diagonal of a diamond relative to particle size.
pub const DIAMOND_SHORT: f32 = 0.8;

/// Vertices of a polygonal shape, rotated by `rotation` around `center`.
///
/// Circles have no outline and return an empty vector.
pub fn shape_outline(kind: ShapeKind, center: Vec2, size: f32, rotation: f32) -> Vec<Vec2> {
    let local: Vec<Vec2> = match kind {
        ShapeKind::Circle => return Vec::new(),
        ShapeKind::Square => vec![
            Vec2::new(-size, -size),
            Vec2::new(size, -size),
            Vec2::new(size, size),
            Vec2::new(-size, size),
        ],
        ShapeKind::Triangle => {
            let r = size * TRIANGLE_SCALE;
            // Apex up (negative y is up on screen)
            (0..3)
                .map(|i| {
                    let angle = -std::f32::consts::FRAC_PI_2
                        + i as f32 * std::f32::consts::TAU / 3.0;
                    Vec2::from_angle(angle) * r
                })
                .collect()
        }
        ShapeKind::Diamond => vec![
            Vec2::new(0.0, -size * DIAMOND_LONG),
            Vec2::new(size * DIAMOND_SHORT, 0.0),
            Vec2::new(0.0, size * DIAMOND_LONG),
            Vec2::new(-size * DIAMOND_SHORT, 0.0),
        ],
    };

    let turn = Vec2::from_angle(rotation);
    local.into_iter().map(|v| center + turn.rotate(v)).collect()
}

/// Draw one particle shape.
pub fn draw_shape<C: Canvas + ?Sized>(
    canvas: &mut C,
    kind: ShapeKind,
    center: Vec2,
    size: f32,
    rotation: f32,
    color: Color,
    alpha: f32,
) {
    match kind {
        ShapeKind::Circle => canvas.fill_circle(center, size, color, alpha),
        _ => canvas.fill_polygon(&shape_outline(kind, center, size, rotation), color, alpha),
    }
}

/// One recorded drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fade {
        alpha: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
        alpha: f32,
    },
    Polygon {
        points: Vec<Vec2>,
        color: Color,
        alpha: f32,
    },
    Line {
        a: Vec2,
        b: Vec2,
        width: f32,
        color: Color,
        alpha: f32,
    },
}

/// A canvas that records commands instead of drawing.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget everything recorded so far.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// Recorded line strokes, in draw order.
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    /// Recorded circle and polygon fills, in draw order.
    pub fn shapes(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Circle { .. } | DrawCommand::Polygon { .. }))
    }
}

impl Canvas for DrawList {
    fn clear(&mut self) {
        self.commands.push(DrawCommand::Clear);
    }

    fn fade(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Fade { alpha });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: f32) {
        self.commands.push(DrawCommand::Polygon {
            points: points.to_vec(),
            color,
            alpha,
        });
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color, alpha: f32) {
        self.commands.push(DrawCommand::Line {
            a,
            b,
            width,
            color,
            alpha,
        });
    }
}
