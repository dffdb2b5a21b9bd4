//! Fullscreen toggling over a platform backend.
//!
//! The browser may refuse fullscreen (no user gesture, iframe policy), so
//! every backend call can fail. Callers treat failure as a warning.

/// A platform that can put the workspace into fullscreen.
pub trait Fullscreen {
    fn is_fullscreen(&self) -> bool;
    fn enter(&mut self) -> Result<(), String>;
    fn exit(&mut self) -> Result<(), String>;
}

/// Flip the fullscreen state. Returns the state after the toggle.
pub fn toggle(backend: &mut dyn Fullscreen) -> Result<bool, String> {
    if backend.is_fullscreen() {
        backend.exit()?;
        Ok(false)
    } else {
        backend.enter()?;
        Ok(true)
    }
}

/// Backend for hosts without fullscreen support: always refuses to enter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl Fullscreen for Unsupported {
    fn is_fullscreen(&self) -> bool {
        false
    }

    fn enter(&mut self) -> Result<(), String> {
        Err("fullscreen is not supported here".to_string())
    }

    fn exit(&mut self) -> Result<(), String> {
        Ok(())
    }
}
