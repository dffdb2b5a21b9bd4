pub mod controller;
pub mod fullscreen;
pub mod input;
pub mod notify;
pub mod shortcuts;

pub use controller::{Gesture, WorkspaceController};
pub use fullscreen::Fullscreen;
pub use input::{InputEvent, Modifiers, PointerButton};
pub use notify::{Notification, NotificationKind, NotificationLog, Notifier};
pub use shortcuts::{ShortcutAction, ShortcutMap};
