//! Sequential notification queue
//!
//! Notifications are shown one at a time in arrival order. Only the head is
//! presented; the rest wait. Keys deduplicate: showing a key that is already
//! queued keeps the first entry and drops the new one.
//!
//! The queue owns no timers. Auto-hide belongs to the host, which calls
//! [`NotificationQueue::close`] when the head's duration runs out.

use super::id::NotificationKey;
use super::Severity;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Label used when an action is given without one
const DEFAULT_ACTION_LABEL: &str = "Action";

/// Optional button on a notification
#[derive(Clone)]
pub struct NotificationAction {
    pub label: String,
    callback: Arc<dyn Fn() + Send + Sync>,
}

impl fmt::Debug for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationAction")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl NotificationAction {
    pub fn new(label: Option<String>, callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            label: label.unwrap_or_else(|| DEFAULT_ACTION_LABEL.to_string()),
            callback: Arc::new(callback),
        }
    }

    pub fn invoke(&self) {
        (self.callback)();
    }
}

/// Options for [`NotificationQueue::show`]
#[derive(Debug, Clone, Default)]
pub struct NotificationOptions {
    /// Dedup key; generated when absent
    pub key: Option<NotificationKey>,
    pub severity: Severity,
    /// How long the host keeps this on screen once it is the head
    pub auto_hide: Option<Duration>,
    pub action: Option<NotificationAction>,
}

impl NotificationOptions {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            ..Self::default()
        }
    }

    pub fn key(mut self, key: impl Into<NotificationKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn auto_hide(mut self, after: Duration) -> Self {
        self.auto_hide = Some(after);
        self
    }

    pub fn action(mut self, action: NotificationAction) -> Self {
        self.action = Some(action);
        self
    }
}

/// A queued notification
#[derive(Debug, Clone)]
pub struct NotificationEntry {
    pub key: NotificationKey,
    pub message: String,
    pub severity: Severity,
    pub auto_hide: Option<Duration>,
    pub action: Option<NotificationAction>,
    seq: u64,
}

impl NotificationEntry {
    /// Position in arrival order; differs for every `show` that enqueues
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

/// What the host renders: the head plus a count when more are waiting
#[derive(Debug, Clone, Copy)]
pub struct NotificationView<'a> {
    pub entry: &'a NotificationEntry,
    /// Queue length, only set when more than one notification is queued
    pub badge: Option<usize>,
}

/// FIFO of notifications keyed for deduplication
#[derive(Debug, Default)]
pub struct NotificationQueue {
    entries: VecDeque<NotificationEntry>,
    next_seq: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a notification and return its key
    ///
    /// If the key is already queued nothing changes and the existing key is
    /// returned; the new message and options are discarded.
    pub fn show(&mut self, message: impl Into<String>, options: NotificationOptions) -> NotificationKey {
        let NotificationOptions {
            key,
            severity,
            auto_hide,
            action,
        } = options;
        let key = key.unwrap_or_else(NotificationKey::generate);

        if self.contains(&key) {
            tracing::debug!(key = %key, "Duplicate notification dropped");
            return key;
        }

        self.entries.push_back(NotificationEntry {
            key: key.clone(),
            message: message.into(),
            severity,
            auto_hide,
            action,
            seq: self.next_seq,
        });
        self.next_seq += 1;
        tracing::debug!(key = %key, ?severity, queued = self.entries.len(), "Notification queued");
        key
    }

    /// Remove a notification outright; unknown keys are ignored
    ///
    /// Returns whether anything was removed.
    pub fn close(&mut self, key: &NotificationKey) -> bool {
        let Some(index) = self.entries.iter().position(|e| &e.key == key) else {
            tracing::trace!(key = %key, "Close for notification not in queue");
            return false;
        };
        self.entries.remove(index);
        tracing::debug!(key = %key, remaining = self.entries.len(), "Notification closed");
        true
    }

    /// The presented notification
    pub fn head(&self) -> Option<NotificationView<'_>> {
        let entry = self.entries.front()?;
        let badge = (self.entries.len() > 1).then_some(self.entries.len());
        Some(NotificationView { entry, badge })
    }

    pub fn contains(&self, key: &NotificationKey) -> bool {
        self.entries.iter().any(|e| &e.key == key)
    }

    pub fn clear(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    #[cfg(test)]
    pub fn entries(&self) -> impl Iterator<Item = &NotificationEntry> {
        self.entries.iter()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_show_generates_unique_keys() {
        let mut queue = NotificationQueue::new();
        let a = queue.show("one", NotificationOptions::default());
        let b = queue.show("one", NotificationOptions::default());

        assert_ne!(a, b);
        assert!(a.to_string().starts_with("::notification::"));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_duplicate_key_is_first_wins() {
        let mut queue = NotificationQueue::new();
        let first = queue.show("first", NotificationOptions::new(Severity::Info).key("k"));
        let second = queue.show(
            "second",
            NotificationOptions::new(Severity::Error).key("k"),
        );

        assert_eq!(first, second);
        assert_eq!(queue.len(), 1);
        let head = queue.head().unwrap();
        assert_eq!(head.entry.message, "first");
        assert_eq!(head.entry.severity, Severity::Info);
    }

    #[test]
    fn test_head_advances_on_close() {
        let mut queue = NotificationQueue::new();
        let k1 = queue.show("m1", NotificationOptions::default());
        queue.show("m2", NotificationOptions::default());
        queue.show("m3", NotificationOptions::default());

        assert_eq!(queue.head().unwrap().badge, Some(3));

        assert!(queue.close(&k1));
        let head = queue.head().unwrap();
        assert_eq!(head.entry.message, "m2");
        assert_eq!(head.badge, Some(2));
    }

    #[test]
    fn test_single_entry_has_no_badge() {
        let mut queue = NotificationQueue::new();
        queue.show("only", NotificationOptions::default());

        assert_eq!(queue.head().unwrap().badge, None);
    }

    #[test]
    fn test_close_unknown_key_is_noop() {
        let mut queue = NotificationQueue::new();
        let key = queue.show("Book deleted successfully.", NotificationOptions::default());

        assert!(queue.close(&key));
        assert!(!queue.close(&key));
        assert!(!queue.close(&NotificationKey::from("never-shown")));
        assert!(queue.head().is_none());
    }

    #[test]
    fn test_closed_key_can_be_shown_again() {
        let mut queue = NotificationQueue::new();
        queue.show("saved", NotificationOptions::default().key("save"));
        queue.close(&NotificationKey::from("save"));

        queue.show("saved again", NotificationOptions::default().key("save"));
        assert_eq!(queue.head().unwrap().entry.message, "saved again");
    }

    #[test]
    fn test_closing_non_head_keeps_order() {
        let mut queue = NotificationQueue::new();
        queue.show("a", NotificationOptions::default().key("a"));
        queue.show("b", NotificationOptions::default().key("b"));
        queue.show("c", NotificationOptions::default().key("c"));

        queue.close(&NotificationKey::from("b"));

        let order: Vec<_> = queue.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(order, vec!["a", "c"]);
    }

    #[test]
    fn test_action_defaults_label_and_invokes() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let action = NotificationAction::new(None, move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(action.label, "Action");
        action.invoke();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
