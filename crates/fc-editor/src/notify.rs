//! User-facing notifications.
//!
//! The controller reports outcomes (connection created, placement, a
//! fullscreen refusal) through a `Notifier`. Notifications are advisory:
//! nothing in the editor depends on whether they were shown or read.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationKind::Error, message)
    }
}

/// Sink for notifications.
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// A notification as kept by [`NotificationLog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: u64,
    #[serde(flatten)]
    pub notification: Notification,
    pub read: bool,
}

/// In-memory notification history with read tracking, oldest first.
#[derive(Debug, Clone, Default)]
pub struct NotificationLog {
    entries: Vec<Entry>,
    next_id: u64,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id.
    pub fn push(&mut self, notification: Notification) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.entries.push(Entry {
            id,
            notification,
            read: false,
        });
        id
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&Entry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.read).count()
    }

    /// Returns `false` if `id` is unknown.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    /// Mark everything read. Entries stay in the log.
    pub fn dismiss_all(&mut self) {
        for entry in &mut self.entries {
            entry.read = true;
        }
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Notifier for NotificationLog {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unread_tracking() {
        let mut log = NotificationLog::new();
        let a = log.push(Notification::success("Connected"));
        let b = log.push(Notification::error("Connection rejected"));
        assert_ne!(a, b);
        assert_eq!(log.unread_count(), 2);

        assert!(log.mark_read(a));
        assert!(!log.mark_read(999));
        assert_eq!(log.unread_count(), 1);

        log.dismiss_all();
        assert_eq!(log.unread_count(), 0);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn remove_and_clear() {
        let mut log = NotificationLog::new();
        let a = log.push(Notification::info("Placed"));
        log.push(Notification::warning("Fullscreen unavailable"));

        assert!(log.remove(a));
        assert!(!log.remove(a));
        assert_eq!(log.latest().map(|e| e.notification.kind), Some(NotificationKind::Warning));

        log.clear();
        assert!(log.is_empty());
        // ids are never reused
        assert!(log.push(Notification::info("again")) > a);
    }

    #[test]
    fn entry_serializes_flat() {
        let mut log = NotificationLog::new();
        log.push(Notification::warning("Fullscreen unavailable"));
        let json = serde_json::to_value(log.entries()).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                { "id": 1, "kind": "warning", "message": "Fullscreen unavailable", "read": false }
            ])
        );
    }
}
