//! Identity utilities shared by the dialog stack and the notification queue.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix for keys minted when the caller does not supply one
const GENERATED_KEY_PREFIX: &str = "::notification::";

/// Opaque identity of a dialog request
///
/// Minted from a process-wide monotonic counter, so an id is never handed out
/// twice during the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayId(u64);

impl OverlayId {
    /// Mint a fresh id
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for OverlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dialog-{}", self.0)
    }
}

/// Deduplication key of a notification
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NotificationKey(String);

impl NotificationKey {
    /// Wrap a caller-supplied key
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Mint a process-unique key for a notification shown without one
    pub fn generate() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let n = COUNTER.fetch_add(1, Ordering::Relaxed);
        Self(format!("{GENERATED_KEY_PREFIX}{n}"))
    }
}

impl fmt::Display for NotificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NotificationKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NotificationKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_overlay_ids_are_unique_and_increasing() {
        let a = OverlayId::next();
        let b = OverlayId::next();
        let c = OverlayId::next();

        assert!(a < b && b < c);
        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_generated_keys_are_unique() {
        let keys: HashSet<_> = (0..100).map(|_| NotificationKey::generate()).collect();
        assert_eq!(keys.len(), 100);
        assert!(keys
            .iter()
            .all(|k| k.to_string().starts_with(GENERATED_KEY_PREFIX)));
    }

    #[test]
    fn test_explicit_key_is_kept_verbatim() {
        let key = NotificationKey::from("book-saved");
        assert_eq!(key.to_string(), "book-saved");
        assert_eq!(key, NotificationKey::new(String::from("book-saved")));
    }
}
