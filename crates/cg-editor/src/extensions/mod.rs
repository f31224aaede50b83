//! Canvas extensions.
//!
//! An extension sees every pointer and key event before the canvas applies
//! its own defaults, in registration order. Claiming a press means capturing
//! the pointer; the canvas then leaves the gesture alone.

pub mod collision;
pub mod connections;

use crate::canvas::CanvasState;
use crate::input::{KeyEvent, PointerEvent};
use cg_core::Result;

pub trait CanvasExtension {
    /// Key under which the extension's data is persisted.
    fn name(&self) -> &str;

    fn on_pointer_down(&mut self, _canvas: &mut CanvasState, _event: &PointerEvent) -> Result<()> {
        Ok(())
    }

    fn on_pointer_move(&mut self, _canvas: &mut CanvasState, _event: &PointerEvent) -> Result<()> {
        Ok(())
    }

    fn on_pointer_up(&mut self, _canvas: &mut CanvasState, _event: &PointerEvent) -> Result<()> {
        Ok(())
    }

    fn on_click(&mut self, _canvas: &mut CanvasState, _event: &PointerEvent) -> Result<()> {
        Ok(())
    }

    fn on_key(&mut self, _canvas: &mut CanvasState, _event: &KeyEvent) -> Result<()> {
        Ok(())
    }

    /// Opaque data to persist, if any.
    fn export(&self) -> Option<serde_json::Value> {
        None
    }

    fn import(&mut self, _data: &serde_json::Value) -> Result<()> {
        Ok(())
    }
}
