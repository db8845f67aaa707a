//! Proximity links between particles.
//!
//! Every unordered pair closer than the connection threshold is linked by a
//! line whose alpha falls off linearly with distance. Near the pointer the
//! threshold grows, so links bloom around the cursor.
//!
//! The pair scan is O(n²). The particle cap keeps n small enough that a
//! spatial index would cost more than it saves.

use glam::Vec2;

use crate::config::FieldConfig;
use crate::particle::Particle;

/// A link between particles `a < b`.
///
/// Produced fresh every frame from the current positions; nothing about a
/// link survives to the next frame.
///
/// # Example
///
/// ```ignore
/// for link in field.connections(pointer) {
///     println!("{} -> {}: alpha {:.2}", link.a, link.b, link.alpha);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Connection {
    /// Index of the first particle in the field's collection.
    pub a: usize,
    /// Index of the second particle. Always greater than `a`.
    pub b: usize,
    /// Distance between the two particles in logical pixels.
    pub distance: f32,
    /// Line alpha: `connection_opacity * (1 - distance / threshold)`.
    ///
    /// Strictly positive, since pairs at or beyond the threshold are not
    /// linked.
    pub alpha: f32,
}

/// Pointer proximity in `[0, 1]`: 1 at the pointer, 0 at `radius` and beyond.
///
/// No pointer, a non-finite pointer or a non-positive radius gives 0.
pub fn highlight(position: Vec2, pointer: Option<Vec2>, radius: f32) -> f32 {
    match pointer {
        Some(p) if p.is_finite() && radius > 0.0 => {
            (1.0 - position.distance(p) / radius).clamp(0.0, 1.0)
        }
        _ => 0.0,
    }
}

/// Connection threshold for a pair, widened by the closer endpoint's highlight.
///
/// `connection_distance * (1 + highlight_boost * p)` where `p` is the larger
/// [`highlight`] of the two endpoints. Without a pointer this is just
/// `connection_distance`.
pub fn effective_threshold(config: &FieldConfig, a: Vec2, b: Vec2, pointer: Option<Vec2>) -> f32 {
    let p = highlight(a, pointer, config.highlight_radius)
        .max(highlight(b, pointer, config.highlight_radius));
    config.connection_distance * (1.0 + config.highlight_boost * p)
}

/// Visit every connection in `(a, b)` lexicographic order.
///
/// A pair is linked when its distance is strictly below the effective
/// threshold. Rendering uses this directly so no `Vec` is built per frame.
pub fn for_each_connection<F>(
    particles: &[Particle],
    config: &FieldConfig,
    pointer: Option<Vec2>,
    mut visit: F,
) where
    F: FnMut(Connection),
{
    for (a, pa) in particles.iter().enumerate() {
        for (offset, pb) in particles[a + 1..].iter().enumerate() {
            let threshold = effective_threshold(config, pa.position, pb.position, pointer);
            if !(threshold > 0.0) {
                continue;
            }

            let distance = pa.position.distance(pb.position);
            if distance < threshold {
                visit(Connection {
                    a,
                    b: a + 1 + offset,
                    distance,
                    alpha: config.connection_opacity * (1.0 - distance / threshold),
                });
            }
        }
    }
}

/// Collect every connection for the current positions.
pub fn find_connections(
    particles: &[Particle],
    config: &FieldConfig,
    pointer: Option<Vec2>,
) -> Vec<Connection> {
    let mut out = Vec::new();
    for_each_connection(particles, config, pointer, |c| out.push(c));
    out
}
