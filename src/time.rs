//! Frame timing for the render loop.
//!
//! The field advances by wall-clock milliseconds between frames rather than
//! by a frame count, so motion speed is independent of the display's
//! refresh rate.
//!
//! # Example
//!
//! ```ignore
//! use driftfield::time::FrameClock;
//!
//! let mut clock = FrameClock::new();
//!
//! // Once per redraw:
//! let elapsed_ms = clock.tick();
//! backdrop.frame(elapsed_ms);
//! ```

use std::time::{Duration, Instant};

/// Longest step a single tick reports, in milliseconds.
///
/// A window that was hidden or stalled in a debugger would otherwise hand
/// the field a multi-second step.
pub const DEFAULT_MAX_DELTA_MS: f32 = 250.0;

/// Wall-clock frame timer.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last tick occurred.
    last_tick: Instant,
    /// Milliseconds reported by the last tick.
    delta_ms: f32,
    /// Upper bound on a single tick.
    max_delta_ms: f32,
    /// Total ticks since start (paused ticks excluded).
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
    paused: bool,
    /// Fixed step for deterministic playback.
    fixed_delta_ms: Option<f32>,
}

impl FrameClock {
    /// Create a clock starting from now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_tick: now,
            delta_ms: 0.0,
            max_delta_ms: DEFAULT_MAX_DELTA_MS,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            paused: false,
            fixed_delta_ms: None,
        }
    }

    /// Set the per-tick clamp. Non-positive values disable clamping.
    pub fn with_max_delta_ms(mut self, max_delta_ms: f32) -> Self {
        self.max_delta_ms = if max_delta_ms > 0.0 {
            max_delta_ms
        } else {
            f32::INFINITY
        };
        self
    }

    /// Advance the clock. Call once per frame.
    ///
    /// Returns the milliseconds elapsed since the previous tick, clamped to
    /// the configured maximum. Paused clocks return 0.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();

        if self.paused {
            self.delta_ms = 0.0;
            return 0.0;
        }

        let raw_ms = now.duration_since(self.last_tick).as_secs_f32() * 1000.0;
        self.delta_ms = self.fixed_delta_ms.unwrap_or(raw_ms).min(self.max_delta_ms);
        self.last_tick = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_ms
    }

    /// Milliseconds reported by the last tick.
    #[inline]
    pub fn delta_ms(&self) -> f32 {
        self.delta_ms
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Stop reporting elapsed time. Ticks return 0 until [`resume`](Self::resume).
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume after pausing. The paused interval is not reported.
    pub fn resume(&mut self) {
        if self.paused {
            self.last_tick = Instant::now();
            self.paused = false;
        }
    }

    /// Report a fixed step on every tick regardless of wall time.
    /// Pass `None` to use real frame timing.
    pub fn set_fixed_delta_ms(&mut self, delta_ms: Option<f32>) {
        self.fixed_delta_ms = delta_ms.filter(|d| d.is_finite() && *d >= 0.0);
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = FrameClock::new();
        assert_eq!(clock.frame(), 0);
        assert_eq!(clock.delta_ms(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_tick_reports_milliseconds() {
        let mut clock = FrameClock::new();
        thread::sleep(Duration::from_millis(10));
        let ms = clock.tick();

        assert!(ms >= 10.0, "expected at least 10ms, got {ms}");
        assert_eq!(clock.frame(), 1);
    }

    #[test]
    fn test_tick_is_clamped() {
        let mut clock = FrameClock::new().with_max_delta_ms(5.0);
        thread::sleep(Duration::from_millis(20));
        assert_eq!(clock.tick(), 5.0);
    }

    #[test]
    fn test_fps_updates_after_interval() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.fps(), 0.0);

        for _ in 0..3 {
            thread::sleep(Duration::from_millis(200));
            clock.tick();
        }

        // Three ticks over at least 600ms: refreshed once, at most 5 fps
        let fps = clock.fps();
        assert!(fps > 0.0 && fps <= 5.0, "fps = {fps}");
    }

    #[test]
    fn test_pause_reports_zero() {
        let mut clock = FrameClock::new();
        clock.tick();

        clock.pause();
        thread::sleep(Duration::from_millis(10));
        assert_eq!(clock.tick(), 0.0);
        assert_eq!(clock.frame(), 1);

        // The paused interval is skipped on resume
        clock.resume();
        assert!(clock.tick() < 10.0);
    }

    #[test]
    fn test_fixed_delta() {
        let mut clock = FrameClock::new();
        clock.set_fixed_delta_ms(Some(1000.0 / 60.0));

        thread::sleep(Duration::from_millis(50));
        let ms = clock.tick();

        assert!((ms - 1000.0 / 60.0).abs() < 0.0001);

        clock.set_fixed_delta_ms(Some(f32::NAN));
        thread::sleep(Duration::from_millis(1));
        assert!(clock.tick() > 0.0);
    }
}
