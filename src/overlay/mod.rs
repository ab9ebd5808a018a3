//! Overlay coordination core
//!
//! Two managers share one pattern: a registry of pending overlay requests,
//! each with an identity, a payload and a retirement path.
//!
//! - [`DialogStack`] keeps every open dialog stacked and resolves each one
//!   independently through an awaitable [`PendingDialog`](dialog::PendingDialog).
//! - [`NotificationQueue`] shows one notification at a time in arrival order,
//!   deduplicated by key.
//!
//! [`OverlayContext`] owns both plus the clock and the host-side auto-hide
//! presenter. It is built once at startup and torn down at shutdown; callers
//! receive it by reference rather than reaching for global state.

pub mod clock;
pub mod dialog;
pub mod host;
pub mod id;
pub mod notification;

#[cfg(test)]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use dialog::{
    AlertPayload, CloseStep, ConfirmPayload, DialogEntry, DialogKind, DialogOptions,
    DialogPhase, DialogRequest, DialogResult, DialogStack, PromptPayload,
};
pub use host::NotificationPresenter;
pub use id::{NotificationKey, OverlayId};
pub use notification::{
    NotificationAction, NotificationOptions, NotificationQueue, NotificationView,
};

use crate::config::OverlayConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Visual weight of a notification or confirm dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Success,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

/// Process-wide overlay state with explicit construction and teardown
#[derive(Debug)]
pub struct OverlayContext {
    clock: Arc<dyn Clock>,
    dialogs: DialogStack,
    notifications: NotificationQueue,
    presenter: NotificationPresenter,
    default_auto_hide: Duration,
    shut_down: bool,
}

impl OverlayContext {
    pub fn new(config: &OverlayConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            dialogs: DialogStack::new(clock.clone(), config.retirement_delay()),
            notifications: NotificationQueue::new(),
            presenter: NotificationPresenter::new(clock.clone()),
            default_auto_hide: config.notification_auto_hide(),
            clock,
            shut_down: false,
        }
    }

    pub fn dialogs(&self) -> &DialogStack {
        &self.dialogs
    }

    pub fn dialogs_mut(&mut self) -> &mut DialogStack {
        &mut self.dialogs
    }

    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Enqueue a notification and start presenting it if it is the head
    pub fn show_notification(
        &mut self,
        message: impl Into<String>,
        options: NotificationOptions,
    ) -> NotificationKey {
        let key = self.notifications.show(message, options);
        self.presenter.sync(&self.notifications);
        key
    }

    /// Remove a notification; unknown keys are ignored
    pub fn close_notification(&mut self, key: &NotificationKey) -> bool {
        let removed = self.notifications.close(key);
        self.presenter.sync(&self.notifications);
        removed
    }

    /// Options for a transient notification using the configured duration
    pub fn toast(&self, severity: Severity) -> NotificationOptions {
        NotificationOptions::new(severity).auto_hide(self.default_auto_hide)
    }

    /// Run due timers; returns whether anything visible changed
    pub fn tick(&mut self) -> bool {
        if self.shut_down {
            return false;
        }
        let now = self.clock.now();
        let retired = self.dialogs.retire_expired(now);
        let hidden = self.presenter.fire_expired(now, &mut self.notifications);
        retired > 0 || hidden
    }

    /// Cancel every pending timer and drop all overlay state
    ///
    /// Openers still awaiting a dialog observe
    /// [`OverlayError::Dismissed`](crate::errors::OverlayError::Dismissed).
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        let timers = self.presenter.reset() + self.dialogs.pending_retirements();
        let dialogs = self.dialogs.clear();
        let notifications = self.notifications.clear();
        self.shut_down = true;
        tracing::info!(dialogs, notifications, timers, "Overlay context shut down");
    }
}

impl Drop for OverlayContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{HookError, OverlayError};

    fn make_context() -> (Arc<ManualClock>, OverlayContext) {
        let clock = Arc::new(ManualClock::new());
        let ctx = OverlayContext::new(&OverlayConfig::default(), clock.clone());
        (clock, ctx)
    }

    #[tokio::test]
    async fn test_delete_confirmation_end_to_end() {
        let (clock, mut ctx) = make_context();
        let deleted = Arc::new(std::sync::Mutex::new(Vec::new()));
        let log = deleted.clone();

        let options = DialogOptions::default().on_close(move |result| {
            let log = log.clone();
            async move {
                if result == DialogResult::Confirmed(true) {
                    log.lock().unwrap().push(7_u64);
                }
                Ok::<(), HookError>(())
            }
        });
        let pending = ctx.dialogs_mut().confirm(
            ConfirmPayload::new("Do you wish to delete Dune?").title("Delete book?"),
            options,
        );
        let id = pending.id();
        assert_eq!(
            ctx.dialogs().get(id).unwrap().request().title(),
            Some("Delete book?")
        );

        ctx.dialogs_mut()
            .close(id, DialogResult::Confirmed(true))
            .await
            .unwrap();

        assert!(pending.await.unwrap());
        assert_eq!(*deleted.lock().unwrap(), vec![7]);
        assert_eq!(ctx.dialogs().len(), 1);

        clock.advance(Duration::from_millis(1000));
        assert!(ctx.tick());
        assert!(ctx.dialogs().is_empty());
    }

    #[test]
    fn test_toast_end_to_end() {
        let (clock, mut ctx) = make_context();
        let key = ctx.show_notification(
            "Book deleted successfully.",
            NotificationOptions::new(Severity::Success).auto_hide(Duration::from_millis(3000)),
        );
        assert_eq!(ctx.notifications().head().unwrap().entry.key, key);

        clock.advance(Duration::from_millis(3000));
        assert!(ctx.tick());
        assert!(ctx.notifications().is_empty());

        assert!(!ctx.close_notification(&key));
    }

    #[test]
    fn test_toast_uses_configured_duration() {
        let (_clock, ctx) = make_context();
        let options = ctx.toast(Severity::Error);

        assert_eq!(options.severity, Severity::Error);
        assert_eq!(options.auto_hide, Some(Duration::from_millis(3000)));
    }

    #[tokio::test]
    async fn test_shutdown_cancels_timers_and_dismisses() {
        let (clock, mut ctx) = make_context();
        let closed = ctx
            .dialogs_mut()
            .alert(AlertPayload::new("done"), DialogOptions::default());
        ctx.dialogs_mut()
            .close(closed.id(), DialogResult::Acknowledged)
            .await
            .unwrap();
        let open = ctx
            .dialogs_mut()
            .confirm(ConfirmPayload::new("sure?"), DialogOptions::default());
        ctx.show_notification("bye", ctx.toast(Severity::Info));

        ctx.shutdown();
        assert!(ctx.shut_down);
        assert!(ctx.dialogs().is_empty());
        assert!(ctx.notifications().is_empty());
        assert_eq!(ctx.dialogs().pending_retirements(), 0);

        clock.advance(Duration::from_secs(10));
        assert!(!ctx.tick());
        assert!(matches!(open.await, Err(OverlayError::Dismissed(_))));
    }
}
