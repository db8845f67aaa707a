//! Software rasteriser backing the window host and PNG export.
//!
//! Shapes are filled by testing pixel centres against the shape, so edges are
//! hard (no anti-aliasing). At the particle sizes involved this reads as soft
//! glitter rather than jaggies.

use std::path::Path;

use glam::Vec2;
use image::{Rgba, RgbaImage};

use crate::canvas::Canvas;
use crate::color::Color;
use crate::error::ExportError;
use crate::surface::SurfaceSize;

/// A [`Canvas`] that draws into an RGBA image at physical resolution.
///
/// Drawing coordinates are logical pixels and are multiplied by the scale
/// factor on the way in.
#[derive(Debug, Clone)]
pub struct PixelCanvas {
    image: RgbaImage,
    scale_factor: f32,
    background: Color,
}

impl PixelCanvas {
    /// Create a canvas filled with `background`.
    pub fn new(width: u32, height: u32, scale_factor: f64, background: Color) -> Self {
        let mut canvas = Self {
            image: RgbaImage::new(width, height),
            scale_factor: sanitize_scale(scale_factor),
            background,
        };
        canvas.clear();
        canvas
    }

    /// Create a canvas matching a surface.
    pub fn for_surface(size: SurfaceSize, background: Color) -> Self {
        Self::new(size.width, size.height, size.scale_factor, background)
    }

    /// Reallocate for a new physical size. The canvas is cleared.
    pub fn resize_to(&mut self, width: u32, height: u32, scale_factor: f64) {
        self.scale_factor = sanitize_scale(scale_factor);
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
        self.clear();
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    #[inline]
    pub fn scale_factor(&self) -> f32 {
        self.scale_factor
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Raw pixel bytes, row-major RGBA8.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encode the current frame as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), ExportError> {
        let path = path.as_ref();
        if self.image.width() == 0 || self.image.height() == 0 {
            return Err(ExportError::EmptySurface {
                width: self.image.width(),
                height: self.image.height(),
            });
        }
        self.image
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|source| ExportError::Image {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Blend `color` at `alpha` over the pixel at `(x, y)`.
    fn blend(&mut self, x: u32, y: u32, color: Color, alpha: f32) {
        let dst = self.image.get_pixel_mut(x, y);
        *dst = over(*dst, color, alpha);
    }

    /// Visit every pixel whose centre lies inside the physical-space box.
    fn for_pixels_in<F>(&mut self, min: Vec2, max: Vec2, mut visit: F)
    where
        F: FnMut(&mut Self, u32, u32, Vec2),
    {
        let Some((x0, x1, y0, y1)) = pixel_range(min, max, self.width(), self.height()) else {
            return;
        };
        for y in y0..y1 {
            for x in x0..x1 {
                let centre = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                visit(self, x, y, centre);
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn clear(&mut self) {
        let bg = Rgba(self.background.to_array());
        for px in self.image.pixels_mut() {
            *px = bg;
        }
    }

    fn fade(&mut self, alpha: f32) {
        let bg = self.background;
        let a = effective_alpha(bg, alpha);
        if a <= 0.0 {
            return;
        }
        let target = bg.to_array();
        for px in self.image.pixels_mut() {
            for (c, t) in px.0.iter_mut().zip(target) {
                *c = fade_channel(*c, t, a);
            }
        }
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color, alpha: f32) {
        let a = effective_alpha(color, alpha);
        if a <= 0.0 || !(radius > 0.0) {
            return;
        }

        let c = center * self.scale_factor;
        let r = radius * self.scale_factor;
        let r2 = r * r;
        self.for_pixels_in(c - Vec2::splat(r), c + Vec2::splat(r), |canvas, x, y, p| {
            if p.distance_squared(c) <= r2 {
                canvas.blend(x, y, color, a);
            }
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color, alpha: f32) {
        let a = effective_alpha(color, alpha);
        if a <= 0.0 || points.len() < 3 {
            return;
        }

        let scaled: Vec<Vec2> = points.iter().map(|p| *p * self.scale_factor).collect();
        let (min, max) = scaled.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );

        self.for_pixels_in(min, max, |canvas, x, y, p| {
            if inside_convex(&scaled, p) {
                canvas.blend(x, y, color, a);
            }
        });
    }

    fn stroke_line(&mut self, a: Vec2, b: Vec2, width: f32, color: Color, alpha: f32) {
        let alpha = effective_alpha(color, alpha);
        if alpha <= 0.0 {
            return;
        }

        let pa = a * self.scale_factor;
        let pb = b * self.scale_factor;
        // Hairlines still cover the pixels they pass through
        let half = (width * self.scale_factor * 0.5).max(0.5);
        let pad = Vec2::splat(half);

        self.for_pixels_in(pa.min(pb) - pad, pa.max(pb) + pad, |canvas, x, y, p| {
            if segment_distance(p, pa, pb) <= half {
                canvas.blend(x, y, color, alpha);
            }
        });
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.resize_to(size.width, size.height, size.scale_factor);
    }
}

/// Straight-alpha "over" compositing of `color` at `alpha` onto `dst`.
fn over(dst: Rgba<u8>, color: Color, alpha: f32) -> Rgba<u8> {
    let [dr, dg, db, da] = dst.0.map(|c| c as f32 / 255.0);
    let [sr, sg, sb] = [color.r, color.g, color.b].map(|c| c as f32 / 255.0);

    let out_a = alpha + da * (1.0 - alpha);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let mix = |s: f32, d: f32| (s * alpha + d * da * (1.0 - alpha)) / out_a;
    Rgba([
        to_byte(mix(sr, dr)),
        to_byte(mix(sg, dg)),
        to_byte(mix(sb, db)),
        to_byte(out_a),
    ])
}

/// Move `value` toward `target` by `alpha`, at least one step, so repeated
/// fades reach the target exactly.
fn fade_channel(value: u8, target: u8, alpha: f32) -> u8 {
    let v = value as f32 + (target as f32 - value as f32) * alpha;
    let stepped = if value < target { v.ceil() } else { v.floor() };
    stepped.clamp(0.0, 255.0) as u8
}

#[inline]
fn to_byte(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Requested alpha combined with the color's own alpha, or 0 if unusable.
fn effective_alpha(color: Color, alpha: f32) -> f32 {
    if !alpha.is_finite() {
        return 0.0;
    }
    alpha.clamp(0.0, 1.0) * color.a as f32 / 255.0
}

fn sanitize_scale(scale_factor: f64) -> f32 {
    if scale_factor.is_finite() && scale_factor > 0.0 {
        scale_factor as f32
    } else {
        1.0
    }
}

/// Pixel index range `(x0, x1, y0, y1)` (exclusive ends) covering a box,
/// clipped to the image.
fn pixel_range(min: Vec2, max: Vec2, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
    if !min.is_finite() || !max.is_finite() || width == 0 || height == 0 {
        return None;
    }
    let clip = |v: f32, limit: u32| v.clamp(0.0, limit as f32) as u32;
    let x0 = clip(min.x.floor(), width);
    let x1 = clip(max.x.ceil(), width);
    let y0 = clip(min.y.floor(), height);
    let y1 = clip(max.y.ceil(), height);
    (x0 < x1 && y0 < y1).then_some((x0, x1, y0, y1))
}

/// Point-in-convex-polygon test accepting either winding.
fn inside_convex(points: &[Vec2], p: Vec2) -> bool {
    let mut sign = 0.0_f32;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let cross = (b - *a).perp_dot(p - *a);
        if cross == 0.0 {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
