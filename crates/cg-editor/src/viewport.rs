//! Screen ↔ canvas transform.
//!
//! The canvas is scaled around the viewport centre (`initial_offset`) and
//! translated by `offset`. Everything that places geometry from pointer
//! events goes through [`ViewTransform::screen_to_canvas`].

use cg_core::config::ZoomConfig;
use cg_core::geometry::{Position, Rect, Vector};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub offset: Vector,
    zoom: f32,
    /// Viewport centre in screen coordinates, fixed at construction.
    pub initial_offset: Position,
    pub limits: ZoomConfig,
}

impl ViewTransform {
    pub fn new(limits: ZoomConfig, viewport: Rect) -> Self {
        Self {
            offset: Vector::ZERO,
            zoom: limits.clamp(limits.default),
            initial_offset: Position::new(viewport.x + viewport.w / 2.0, viewport.y + viewport.h / 2.0),
            limits,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom level, clamped to the configured range. Returns the
    /// value actually applied.
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = self.limits.clamp(zoom);
        self.zoom
    }

    /// One wheel tick: `direction` > 0 zooms in, < 0 zooms out.
    pub fn zoom_step(&mut self, direction: i32) -> f32 {
        let target = self.zoom + direction.signum() as f32 * self.limits.step;
        self.set_zoom(target)
    }

    pub fn pan(&mut self, delta: Vector) {
        self.offset = self.offset - delta;
    }

    /// Drag displacement in canvas units, `(last - current) / zoom`.
    pub fn drag_delta(&self, last: Position, current: Position) -> Vector {
        (last - current) / self.zoom
    }

    pub fn screen_to_canvas(&self, p: Position) -> Position {
        self.initial_offset + (p - self.initial_offset) / self.zoom - self.offset
    }

    pub fn canvas_to_screen(&self, p: Position) -> Position {
        self.initial_offset + ((p + self.offset) - self.initial_offset) * self.zoom
    }
}
