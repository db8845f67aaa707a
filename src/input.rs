//! Latest-value inbox of host inputs.
//!
//! Pointer moves, wheel scrolls and resizes arrive from independent event
//! handlers at any rate. The field only cares about the most recent value of
//! each, so `Input` just overwrites fields and the next frame reads them:
//!
//! ```ignore
//! // In the event handler
//! backdrop.input_mut().handle_event(&event);
//!
//! // Once per frame
//! backdrop.frame(elapsed_ms);
//! ```

use glam::Vec2;
use winit::event::{MouseScrollDelta, WindowEvent};

use crate::surface::SurfaceSize;

/// Pixels scrolled per wheel line, matching typical browser behaviour.
pub const LINE_HEIGHT_PX: f32 = 40.0;

/// Snapshot of the inputs the next frame consumes.
#[derive(Debug, Clone)]
pub struct Input {
    pointer: Option<Vec2>,
    scroll_offset: f32,
    max_scroll: f32,
    size: SurfaceSize,
    resized: bool,
}

impl Input {
    pub fn new(size: SurfaceSize, max_scroll: f32) -> Self {
        Self {
            pointer: None,
            scroll_offset: 0.0,
            max_scroll: max_scroll.max(0.0),
            size,
            resized: false,
        }
    }

    // ========== Queries ==========

    /// Pointer position in logical surface pixels, if the pointer is over the surface.
    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }

    /// Raw (unsmoothed) scroll offset in pixels.
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Return the new size if the surface changed since the last call.
    pub fn take_resize(&mut self) -> Option<SurfaceSize> {
        if std::mem::take(&mut self.resized) {
            Some(self.size)
        } else {
            None
        }
    }

    // ========== Writers ==========

    /// Record a pointer position in logical pixels. Non-finite positions are dropped.
    pub fn set_pointer(&mut self, position: Vec2) {
        if position.is_finite() {
            self.pointer = Some(position);
        }
    }

    pub fn clear_pointer(&mut self) {
        self.pointer = None;
    }

    /// Set the raw scroll offset, clamped to `[0, max_scroll]`.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.scroll_offset = offset.clamp(0.0, self.max_scroll);
        }
    }

    /// Scroll by `delta` pixels (positive scrolls the page down).
    pub fn scroll_by(&mut self, delta: f32) {
        self.set_scroll_offset(self.scroll_offset + delta);
    }

    pub fn set_size(&mut self, size: SurfaceSize) {
        if size != self.size {
            self.size = size;
            self.resized = true;
        }
    }

    /// Process a winit window event. Events that don't feed the field are ignored.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => {
                let scale = self.size.scale_factor;
                self.set_pointer(Vec2::new(
                    (position.x / scale) as f32,
                    (position.y / scale) as f32,
                ));
            }

            WindowEvent::CursorLeft { .. } => self.clear_pointer(),

            WindowEvent::MouseWheel { delta, .. } => self.scroll_by(wheel_pixels(*delta)),

            WindowEvent::Resized(physical) => {
                self.set_size(SurfaceSize::new(
                    physical.width,
                    physical.height,
                    self.size.scale_factor,
                ));
            }

            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                self.set_size(SurfaceSize::new(
                    self.size.width,
                    self.size.height,
                    *scale_factor,
                ));
            }

            _ => {}
        }
    }
}

/// Page scroll distance for a wheel event; positive scrolls the page down.
pub fn wheel_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(pos) => -pos.y as f32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    fn input() -> Input {
        Input::new(SurfaceSize::new(1600, 1200, 2.0), 1000.0)
    }

    #[test]
    fn test_pointer_latest_wins() {
        let mut input = input();
        assert_eq!(input.pointer(), None);

        input.set_pointer(Vec2::new(10.0, 20.0));
        input.set_pointer(Vec2::new(30.0, 40.0));
        assert_eq!(input.pointer(), Some(Vec2::new(30.0, 40.0)));

        input.set_pointer(Vec2::new(f32::NAN, 1.0));
        assert_eq!(input.pointer(), Some(Vec2::new(30.0, 40.0)));

        input.clear_pointer();
        assert_eq!(input.pointer(), None);
    }

    #[test]
    fn test_scroll_clamped() {
        let mut input = input();
        input.scroll_by(-50.0);
        assert_eq!(input.scroll_offset(), 0.0);

        input.scroll_by(400.0);
        input.scroll_by(300.0);
        assert_eq!(input.scroll_offset(), 700.0);

        input.scroll_by(5000.0);
        assert_eq!(input.scroll_offset(), 1000.0);
    }

    #[test]
    fn test_wheel_direction() {
        // Wheel down (negative y) scrolls the page down
        assert_eq!(wheel_pixels(MouseScrollDelta::LineDelta(0.0, -2.0)), 80.0);
        assert_eq!(
            wheel_pixels(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 12.0))),
            -12.0
        );
    }

    #[test]
    fn test_resize_is_taken_once() {
        let mut input = input();
        assert_eq!(input.take_resize(), None);

        // Same size is not a resize
        input.set_size(SurfaceSize::new(1600, 1200, 2.0));
        assert_eq!(input.take_resize(), None);

        input.set_size(SurfaceSize::new(800, 600, 2.0));
        input.set_size(SurfaceSize::new(1024, 768, 1.0));
        assert_eq!(input.take_resize(), Some(SurfaceSize::new(1024, 768, 1.0)));
        assert_eq!(input.take_resize(), None);
    }
}
