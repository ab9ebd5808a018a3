//! Host side of the notification queue
//!
//! The queue never times anything out itself. The presenter watches which
//! entry is at the head, arms an auto-hide timer when that entry asks for one,
//! disarms it when the head changes first, and closes the entry when the timer
//! runs out.

use super::clock::{Clock, TimerId, Timers};
use super::id::NotificationKey;
use super::notification::NotificationQueue;
use std::sync::Arc;
use std::time::Instant;

/// The head currently on screen
#[derive(Debug, Clone)]
struct Presented {
    key: NotificationKey,
    seq: u64,
    timer: Option<TimerId>,
}

/// Drives auto-hide for the head of a [`NotificationQueue`]
#[derive(Debug)]
pub struct NotificationPresenter {
    clock: Arc<dyn Clock>,
    timers: Timers<(NotificationKey, u64)>,
    presented: Option<Presented>,
}

impl NotificationPresenter {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            timers: Timers::new(),
            presented: None,
        }
    }

    /// Align the auto-hide timer with the queue's current head
    pub fn sync(&mut self, queue: &NotificationQueue) {
        let head = queue.head().map(|view| view.entry);

        let unchanged = match (&self.presented, head) {
            (Some(p), Some(entry)) => p.seq == entry.seq(),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }

        if let Some(previous) = self.presented.take() {
            if let Some(timer) = previous.timer {
                self.timers.cancel(timer);
            }
            tracing::trace!(key = %previous.key, "Notification no longer presented");
        }

        if let Some(entry) = head {
            let timer = entry.auto_hide.map(|after| {
                let deadline = self.clock.now() + after;
                self.timers
                    .schedule(deadline, (entry.key.clone(), entry.seq()))
            });
            tracing::trace!(key = %entry.key, auto_hide = ?entry.auto_hide, "Presenting notification");
            self.presented = Some(Presented {
                key: entry.key.clone(),
                seq: entry.seq(),
                timer,
            });
        }
    }

    /// Close heads whose auto-hide ran out; returns whether the queue changed
    pub fn fire_expired(&mut self, now: Instant, queue: &mut NotificationQueue) -> bool {
        let mut changed = false;
        loop {
            let expired = self.timers.drain_expired(now);
            if expired.is_empty() {
                break;
            }
            for (key, seq) in expired {
                let still_head = queue
                    .head()
                    .is_some_and(|view| view.entry.seq() == seq);
                if still_head {
                    tracing::debug!(key = %key, "Auto-hiding notification");
                    changed |= queue.close(&key);
                }
            }
            // A newly promoted head may itself be due already
            self.sync(queue);
        }
        self.sync(queue);
        changed
    }

    /// Key of the notification on screen
    #[cfg(test)]
    pub fn presented(&self) -> Option<&NotificationKey> {
        self.presented.as_ref().map(|p| &p.key)
    }

    #[cfg(test)]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Forget the head and cancel every timer
    pub fn reset(&mut self) -> usize {
        self.presented = None;
        self.timers.cancel_all()
    }
}
