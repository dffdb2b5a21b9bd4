//! Input abstraction layer.
//!
//! Normalizes DOM pointer, wheel, and keyboard events into a unified
//! `InputEvent` enum consumed by the workspace controller. Coordinates are
//! in screen space, relative to the workspace element.

use fc_core::{Point, Vec2};

/// Keyboard modifier state at the time of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// ⌘ on macOS, Ctrl elsewhere.
    pub fn command(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Which pointer button went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Middle,
    Secondary,
}

impl PointerButton {
    /// Map `MouseEvent.button`. Unknown buttons act as primary.
    pub fn from_dom(button: i16) -> Self {
        match button {
            1 => Self::Middle,
            2 => Self::Secondary,
            _ => Self::Primary,
        }
    }
}

/// A normalized input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown {
        x: f64,
        y: f64,
        button: PointerButton,
        modifiers: Modifiers,
    },

    PointerMove {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    PointerUp {
        x: f64,
        y: f64,
        modifiers: Modifiers,
    },

    /// Wheel or trackpad scroll. `dx`/`dy` follow `WheelEvent.deltaX/Y`
    /// (positive `dy` scrolls down).
    Wheel {
        x: f64,
        y: f64,
        dx: f64,
        dy: f64,
        modifiers: Modifiers,
    },

    /// `key` is the `KeyboardEvent.key` value.
    KeyDown { key: String, modifiers: Modifiers },

    KeyUp { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn pointer_down(x: f64, y: f64, button: PointerButton, modifiers: Modifiers) -> Self {
        Self::PointerDown {
            x,
            y,
            button,
            modifiers,
        }
    }

    pub fn pointer_move(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerMove { x, y, modifiers }
    }

    pub fn pointer_up(x: f64, y: f64, modifiers: Modifiers) -> Self {
        Self::PointerUp { x, y, modifiers }
    }

    pub fn wheel(x: f64, y: f64, dx: f64, dy: f64, modifiers: Modifiers) -> Self {
        Self::Wheel {
            x,
            y,
            dx,
            dy,
            modifiers,
        }
    }

    pub fn key_down(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::KeyDown {
            key: key.into(),
            modifiers,
        }
    }

    pub fn key_up(key: impl Into<String>, modifiers: Modifiers) -> Self {
        Self::KeyUp {
            key: key.into(),
            modifiers,
        }
    }

    /// Screen position if this is a pointer or wheel event.
    pub fn position(&self) -> Option<Point> {
        match self {
            Self::PointerDown { x, y, .. }
            | Self::PointerMove { x, y, .. }
            | Self::PointerUp { x, y, .. }
            | Self::Wheel { x, y, .. } => Some(Point::new(*x, *y)),
            Self::KeyDown { .. } | Self::KeyUp { .. } => None,
        }
    }

    /// Scroll delta if this is a wheel event.
    pub fn scroll_delta(&self) -> Option<Vec2> {
        match self {
            Self::Wheel { dx, dy, .. } => Some(Vec2::new(*dx, *dy)),
            _ => None,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            Self::PointerDown { modifiers, .. }
            | Self::PointerMove { modifiers, .. }
            | Self::PointerUp { modifiers, .. }
            | Self::Wheel { modifiers, .. }
            | Self::KeyDown { modifiers, .. }
            | Self::KeyUp { modifiers, .. } => *modifiers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_buttons() {
        assert_eq!(PointerButton::from_dom(0), PointerButton::Primary);
        assert_eq!(PointerButton::from_dom(1), PointerButton::Middle);
        assert_eq!(PointerButton::from_dom(2), PointerButton::Secondary);
        assert_eq!(PointerButton::from_dom(4), PointerButton::Primary);
    }

    #[test]
    fn command_is_ctrl_or_meta() {
        assert!(!Modifiers::NONE.command());
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::NONE
        };
        let meta = Modifiers {
            meta: true,
            ..Modifiers::NONE
        };
        assert!(ctrl.command());
        assert!(meta.command());
    }

    #[test]
    fn keys_have_no_position() {
        let key = InputEvent::key_down("Escape", Modifiers::NONE);
        assert_eq!(key.position(), None);
        let wheel = InputEvent::wheel(10.0, 20.0, 0.0, -3.0, Modifiers::NONE);
        assert_eq!(wheel.position(), Some(Point::new(10.0, 20.0)));
        assert_eq!(wheel.scroll_delta(), Some(Vec2::new(0.0, -3.0)));
    }
}
