//! Scroll smoothing.
//!
//! Raw scroll offsets jump in wheel-sized steps. The field drifts with a
//! smoothed offset instead: a unit mass tethered to the raw offset by a
//! spring of stiffness `k` with damping `2√k`, i.e. critically damped.
//! The closed-form solution is used, so any step length is exact and stable.
//!
//! A critically damped spring released from rest never crosses its target,
//! but one that is already moving can when the target changes under it (a
//! wheel event mid-glide). A step that would carry the value across the
//! target lands on the target and stops instead, so the value never
//! overshoots whatever it is currently following.

/// Critically damped follower of a scalar target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSpring {
    value: f32,
    velocity: f32,
    omega: f32,
}

impl ScrollSpring {
    /// Create a spring at rest at `value`. `stiffness` is in s⁻².
    pub fn new(stiffness: f32, value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
            omega: stiffness.max(0.0).sqrt(),
        }
    }

    /// Current smoothed value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Current rate of change, per second.
    #[inline]
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Jump straight to `value` and stop.
    pub fn snap_to(&mut self, value: f32) {
        self.value = value;
        self.velocity = 0.0;
    }

    /// Advance by `dt_secs` toward `target` and return the new value.
    ///
    /// Non-finite or negative steps leave the spring untouched. The value
    /// never ends up on the far side of `target`.
    pub fn step(&mut self, target: f32, dt_secs: f32) -> f32 {
        if !(dt_secs > 0.0) || !dt_secs.is_finite() || !target.is_finite() {
            return self.value;
        }

        let previous = self.value;
        let offset = previous - target;
        let w = self.omega;
        let decay = (-w * dt_secs).exp();
        let slope = self.velocity + w * offset;

        self.value = target + (offset + slope * dt_secs) * decay;
        self.velocity = (self.velocity - w * slope * dt_secs) * decay;

        let residual = self.value - target;
        if residual != 0.0 && (offset == 0.0 || residual.signum() != offset.signum()) {
            // Crossed (or left from exactly on) the target
            self.snap_to(target);
            return self.value;
        }

        // f32 spacing grows with magnitude, so the settle band does too
        let tolerance = SETTLE_TOLERANCE.max(target.abs() * 4.0 * f32::EPSILON);
        if residual.abs() <= tolerance && (self.velocity.abs() < 1e-3 || self.value == previous) {
            self.snap_to(target);
        }

        self.value
    }
}

/// Distance from the target below which a slow spring is considered settled.
const SETTLE_TOLERANCE: f32 = 1e-4;
