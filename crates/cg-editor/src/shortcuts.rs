//! Keyboard shortcut mapping.
//!
//! Maps bare keys to semantic `ShortcutAction`s. Combos with ⌘/ctrl are
//! left to the host.

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Tool switching ──
    ToolGrab,
    ToolResize,
    ToolConnect,

    // ── View ──
    ZoomIn,
    ZoomOut,

    // ── Edit ──
    /// Remove the focused component.
    Delete,
    ClearFocus,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"g"`, `"Delete"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        if ctrl || meta {
            return None;
        }
        match key {
            "g" | "G" | "h" | "H" => Some(ShortcutAction::ToolGrab),
            "r" | "R" => Some(ShortcutAction::ToolResize),
            "c" | "C" => Some(ShortcutAction::ToolConnect),
            "+" | "=" => Some(ShortcutAction::ZoomIn),
            "-" => Some(ShortcutAction::ZoomOut),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::ClearFocus),
            _ => None,
        }
    }
}
