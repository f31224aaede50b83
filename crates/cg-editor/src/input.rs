//! Input abstraction layer.
//!
//! `InputEvent` is what the host receives from the platform: raw pointer,
//! wheel, and keyboard events in screen coordinates. After hit testing and
//! routing the host hands the canvas typed [`PointerEvent`]s and
//! [`KeyEvent`]s.

use cg_core::geometry::Position;
use cg_render::HitTarget;

/// Modifier keys held during an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A raw platform event in screen coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { x: f32, y: f32, modifiers: Modifiers },
    PointerMove { x: f32, y: f32, modifiers: Modifiers },
    PointerUp { x: f32, y: f32, modifiers: Modifiers },
    /// Mouse wheel over `(x, y)`. Negative `delta_y` scrolls up.
    Wheel { x: f32, y: f32, delta_y: f32 },
    KeyDown { key: String, modifiers: Modifiers },
    KeyUp { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown {
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove {
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn pointer_up(x: f32, y: f32) -> Self {
        Self::PointerUp {
            x,
            y,
            modifiers: Modifiers::default(),
        }
    }

    pub fn key(key: &str) -> Self {
        Self::KeyDown {
            key: key.to_string(),
            modifiers: Modifiers::default(),
        }
    }

    /// Extract the screen position, if the event has one.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Position::new(*x, *y)),
            Self::KeyDown { .. } | Self::KeyUp { .. } => None,
        }
    }
}

/// A routed pointer event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Screen position of this event.
    pub position: Position,
    /// Screen position of the previous event in the gesture (equal to
    /// `position` on press).
    pub last_position: Position,
    /// What lies under the pointer, ignoring elements that follow it.
    pub hit: HitTarget,
    /// Where the event is routed: the pointer-captured element if any,
    /// otherwise `hit`.
    pub target: HitTarget,
    pub modifiers: Modifiers,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: String,
    pub modifiers: Modifiers,
    /// False for key releases.
    pub pressed: bool,
}
