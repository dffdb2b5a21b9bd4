//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. The map lives
//! in Rust so the wasm bridge and native tests resolve keys the same way.
//!
//! - ⌘= / ⌘- / ⌘0 zoom in, out, and back to 100%
//! - arrow keys pan the workspace
//! - Space held turns pointer drags into pans
//! - Delete removes the selected component, `c` starts a connection

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── View ──
    ZoomIn,
    ZoomOut,
    ZoomReset,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    /// Space pressed: pointer drags pan until released.
    PanStart,
    PanEnd,

    // ── Edit ──
    Delete,
    Connect,

    // ── UI ──
    /// Leave connection mode, drop a palette drag, or clear the selection.
    Cancel,
}

impl ShortcutAction {
    /// camelCase name reported to the host page.
    pub fn name(self) -> &'static str {
        match self {
            Self::ZoomIn => "zoomIn",
            Self::ZoomOut => "zoomOut",
            Self::ZoomReset => "zoomReset",
            Self::PanLeft => "panLeft",
            Self::PanRight => "panRight",
            Self::PanUp => "panUp",
            Self::PanDown => "panDown",
            Self::PanStart => "panStart",
            Self::PanEnd => "panEnd",
            Self::Delete => "delete",
            Self::Connect => "connect",
            Self::Cancel => "cancel",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// Platform-aware: on macOS `meta` is ⌘, elsewhere `ctrl` plays the same
/// role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key press to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"="`, `"Delete"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        _shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd {
            return match key {
                // Shift+= produces "+" on most layouts
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" | "_" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomReset),
                _ => None,
            };
        }

        if alt {
            return None;
        }

        match key {
            "ArrowLeft" => Some(ShortcutAction::PanLeft),
            "ArrowRight" => Some(ShortcutAction::PanRight),
            "ArrowUp" => Some(ShortcutAction::PanUp),
            "ArrowDown" => Some(ShortcutAction::PanDown),
            " " => Some(ShortcutAction::PanStart),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "c" | "C" => Some(ShortcutAction::Connect),
            "Escape" => Some(ShortcutAction::Cancel),
            _ => None,
        }
    }

    /// Resolve a key release. Only Space has a release binding.
    pub fn resolve_release(key: &str) -> Option<ShortcutAction> {
        match key {
            " " => Some(ShortcutAction::PanEnd),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_zoom() {
        // Cmd+= → ZoomIn
        assert_eq!(
            ShortcutMap::resolve("=", false, false, false, true),
            Some(ShortcutAction::ZoomIn)
        );
        // Ctrl+Shift+= arrives as "+"
        assert_eq!(
            ShortcutMap::resolve("+", true, true, false, false),
            Some(ShortcutAction::ZoomIn)
        );
        assert_eq!(
            ShortcutMap::resolve("-", true, false, false, false),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", false, false, false, true),
            Some(ShortcutAction::ZoomReset)
        );
    }

    #[test]
    fn zoom_keys_need_command() {
        assert_eq!(ShortcutMap::resolve("=", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("0", false, false, false, false), None);
    }

    #[test]
    fn resolve_arrows() {
        assert_eq!(
            ShortcutMap::resolve("ArrowLeft", false, false, false, false),
            Some(ShortcutAction::PanLeft)
        );
        assert_eq!(
            ShortcutMap::resolve("ArrowDown", false, true, false, false),
            Some(ShortcutAction::PanDown)
        );
    }

    #[test]
    fn resolve_edit_keys() {
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("c", false, false, false, false),
            Some(ShortcutAction::Connect)
        );
        // Cmd+C is the browser's copy, not connect
        assert_eq!(ShortcutMap::resolve("c", false, false, false, true), None);
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::Cancel)
        );
    }

    #[test]
    fn space_press_and_release() {
        assert_eq!(
            ShortcutMap::resolve(" ", false, false, false, false),
            Some(ShortcutAction::PanStart)
        );
        assert_eq!(
            ShortcutMap::resolve_release(" "),
            Some(ShortcutAction::PanEnd)
        );
        assert_eq!(ShortcutMap::resolve_release("c"), None);
    }

    #[test]
    fn unknown_key_returns_none() {
        assert_eq!(ShortcutMap::resolve("F13", false, false, false, false), None);
        assert_eq!(ShortcutMap::resolve("c", false, false, true, false), None);
    }
}
