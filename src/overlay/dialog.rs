//! Stacked dialog manager
//!
//! Every `open` pushes an independent entry onto the stack and hands back a
//! [`PendingDialog`] that resolves once the host closes that entry. Closing
//! runs the optional close hook first; if the hook fails the dialog stays up
//! and the error goes back to whoever called close. A closed dialog stays in
//! the stack (hidden) for the retirement delay so the host can play its exit
//! transition, then it is removed.

use super::clock::{Clock, Timers};
use super::id::OverlayId;
use super::Severity;
use crate::errors::{HookError, OverlayError, Result};
use futures_util::future::BoxFuture;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;

/// The closed set of dialogs the host knows how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Alert,
    Confirm,
    Prompt,
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Alert => "alert",
            Self::Confirm => "confirm",
            Self::Prompt => "prompt",
        };
        f.write_str(name)
    }
}

/// Message with a single acknowledge button
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPayload {
    pub message: String,
    pub title: Option<String>,
    pub ok_text: String,
}

impl AlertPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            ok_text: "Ok".to_string(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Yes/no question
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmPayload {
    pub message: String,
    pub title: Option<String>,
    pub ok_text: String,
    pub cancel_text: String,
    pub severity: Option<Severity>,
}

impl ConfirmPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            ok_text: "Ok".to_string(),
            cancel_text: "Cancel".to_string(),
            severity: None,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn ok_text(mut self, text: impl Into<String>) -> Self {
        self.ok_text = text.into();
        self
    }

    pub fn cancel_text(mut self, text: impl Into<String>) -> Self {
        self.cancel_text = text.into();
        self
    }

    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// Single-line text question
#[derive(Debug, Clone, PartialEq)]
pub struct PromptPayload {
    pub message: String,
    pub title: Option<String>,
    pub ok_text: String,
    pub cancel_text: String,
    pub initial: String,
}

impl PromptPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            title: None,
            ok_text: "Ok".to_string(),
            cancel_text: "Cancel".to_string(),
            initial: String::new(),
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// Payload of a dialog request, one variant per dialog kind
#[derive(Debug, Clone, PartialEq)]
pub enum DialogRequest {
    Alert(AlertPayload),
    Confirm(ConfirmPayload),
    Prompt(PromptPayload),
}

impl DialogRequest {
    pub fn kind(&self) -> DialogKind {
        match self {
            Self::Alert(_) => DialogKind::Alert,
            Self::Confirm(_) => DialogKind::Confirm,
            Self::Prompt(_) => DialogKind::Prompt,
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Alert(p) => p.title.as_deref(),
            Self::Confirm(p) => p.title.as_deref(),
            Self::Prompt(p) => p.title.as_deref(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Alert(p) => &p.message,
            Self::Confirm(p) => &p.message,
            Self::Prompt(p) => &p.message,
        }
    }
}

/// Value a dialog resolves with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogResult {
    Acknowledged,
    Confirmed(bool),
    Prompted(Option<String>),
}

impl DialogResult {
    pub fn kind(&self) -> DialogKind {
        match self {
            Self::Acknowledged => DialogKind::Alert,
            Self::Confirmed(_) => DialogKind::Confirm,
            Self::Prompted(_) => DialogKind::Prompt,
        }
    }

    /// The "user backed out" value for a dialog kind
    pub fn cancelled(kind: DialogKind) -> Self {
        match kind {
            DialogKind::Alert => Self::Acknowledged,
            DialogKind::Confirm => Self::Confirmed(false),
            DialogKind::Prompt => Self::Prompted(None),
        }
    }
}

/// Conversion from the untyped result into what the opener awaits
pub trait FromDialogResult: Sized {
    fn from_result(id: OverlayId, result: DialogResult) -> Result<Self>;
}

impl FromDialogResult for DialogResult {
    fn from_result(_id: OverlayId, result: DialogResult) -> Result<Self> {
        Ok(result)
    }
}

impl FromDialogResult for () {
    fn from_result(id: OverlayId, result: DialogResult) -> Result<Self> {
        match result {
            DialogResult::Acknowledged => Ok(()),
            _ => Err(OverlayError::ResultMismatch {
                id,
                expected: DialogKind::Alert,
            }),
        }
    }
}

impl FromDialogResult for bool {
    fn from_result(id: OverlayId, result: DialogResult) -> Result<Self> {
        match result {
            DialogResult::Confirmed(yes) => Ok(yes),
            _ => Err(OverlayError::ResultMismatch {
                id,
                expected: DialogKind::Confirm,
            }),
        }
    }
}

impl FromDialogResult for Option<String> {
    fn from_result(id: OverlayId, result: DialogResult) -> Result<Self> {
        match result {
            DialogResult::Prompted(text) => Ok(text),
            _ => Err(OverlayError::ResultMismatch {
                id,
                expected: DialogKind::Prompt,
            }),
        }
    }
}

/// Async hook run before a dialog resolves
pub type CloseHook =
    Arc<dyn Fn(DialogResult) -> BoxFuture<'static, std::result::Result<(), HookError>> + Send + Sync>;

/// Per-request options for [`DialogStack::open`]
#[derive(Clone, Default)]
pub struct DialogOptions {
    on_close: Option<CloseHook>,
}

impl fmt::Debug for DialogOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogOptions")
            .field("on_close", &self.on_close.is_some())
            .finish()
    }
}

impl DialogOptions {
    /// Run `hook` with the close result before the dialog resolves
    ///
    /// An `Err` keeps the dialog open and is returned to the closer.
    pub fn on_close<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(DialogResult) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<(), HookError>> + Send + 'static,
    {
        self.on_close = Some(Arc::new(move |result| Box::pin(hook(result))));
        self
    }
}

/// Where a tracked dialog is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogPhase {
    /// Visible and interactive
    Open,
    /// Visible, close hook in flight
    Closing,
    /// Resolved and playing its exit transition until retirement
    Hidden,
}

/// A tracked dialog request
pub struct DialogEntry {
    id: OverlayId,
    request: DialogRequest,
    phase: DialogPhase,
    completion: Option<oneshot::Sender<DialogResult>>,
    on_close: Option<CloseHook>,
}

impl fmt::Debug for DialogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogEntry")
            .field("id", &self.id)
            .field("kind", &self.request.kind())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl DialogEntry {
    pub fn id(&self) -> OverlayId {
        self.id
    }

    pub fn request(&self) -> &DialogRequest {
        &self.request
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    /// True until the dialog has been closed successfully
    pub fn is_visible(&self) -> bool {
        self.phase != DialogPhase::Hidden
    }
}

/// Awaitable completion of one dialog
///
/// Resolves with the typed result once the dialog is closed, or with
/// [`OverlayError::Dismissed`] if the stack is torn down first. Dropping it
/// does not affect the dialog.
#[derive(Debug)]
#[must_use = "the dialog stays open regardless; await this to read its result"]
pub struct PendingDialog<R> {
    id: OverlayId,
    rx: oneshot::Receiver<DialogResult>,
    _result: PhantomData<fn() -> R>,
}

impl<R> PendingDialog<R> {
    pub fn id(&self) -> OverlayId {
        self.id
    }
}

impl<R: FromDialogResult> Future for PendingDialog<R> {
    type Output = Result<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let id = self.id;
        match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(R::from_result(id, result)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(OverlayError::Dismissed(id))),
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Outcome of [`DialogStack::begin_close`]
pub enum CloseStep {
    /// No hook; the dialog is resolved and hidden
    Resolved,
    /// Already closing or closed; nothing happened
    Ignored,
    /// Drive this hook, then report through [`DialogStack::finish_close`]
    RunHook(BoxFuture<'static, std::result::Result<(), HookError>>),
}

impl fmt::Debug for CloseStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => f.write_str("Resolved"),
            Self::Ignored => f.write_str("Ignored"),
            Self::RunHook(_) => f.write_str("RunHook(..)"),
        }
    }
}

/// Ordered stack of dialog requests; insertion order is display order
#[derive(Debug)]
pub struct DialogStack {
    entries: Vec<DialogEntry>,
    retirements: Timers<OverlayId>,
    retirement_delay: Duration,
    clock: Arc<dyn Clock>,
}

impl DialogStack {
    pub fn new(clock: Arc<dyn Clock>, retirement_delay: Duration) -> Self {
        Self {
            entries: Vec::new(),
            retirements: Timers::new(),
            retirement_delay,
            clock,
        }
    }

    pub fn alert(&mut self, payload: AlertPayload, options: DialogOptions) -> PendingDialog<()> {
        self.open(DialogRequest::Alert(payload), options)
    }

    pub fn confirm(
        &mut self,
        payload: ConfirmPayload,
        options: DialogOptions,
    ) -> PendingDialog<bool> {
        self.open(DialogRequest::Confirm(payload), options)
    }

    pub fn prompt(
        &mut self,
        payload: PromptPayload,
        options: DialogOptions,
    ) -> PendingDialog<Option<String>> {
        self.open(DialogRequest::Prompt(payload), options)
    }

    /// Push a dialog on top of the stack
    ///
    /// `R` is what the opener awaits; [`DialogResult`] takes any kind, the
    /// typed wrappers above pin it to the request's kind.
    pub fn open<R>(&mut self, request: DialogRequest, options: DialogOptions) -> PendingDialog<R> {
        let id = OverlayId::next();
        let (tx, rx) = oneshot::channel();

        tracing::debug!(id = %id, kind = %request.kind(), depth = self.entries.len() + 1, "Dialog opened");

        self.entries.push(DialogEntry {
            id,
            request,
            phase: DialogPhase::Open,
            completion: Some(tx),
            on_close: options.on_close,
        });

        PendingDialog {
            id,
            rx,
            _result: PhantomData,
        }
    }

    /// Close a dialog, running its hook to completion first
    ///
    /// Holds the stack across the hook; the event loop uses
    /// [`begin_close`](Self::begin_close) and [`finish_close`](Self::finish_close)
    /// instead so it can keep handling input.
    #[cfg(test)]
    pub async fn close(&mut self, id: OverlayId, result: DialogResult) -> Result<()> {
        match self.begin_close(id, result.clone())? {
            CloseStep::RunHook(hook) => {
                let outcome = hook.await;
                self.finish_close(id, result, outcome)
            }
            CloseStep::Resolved | CloseStep::Ignored => Ok(()),
        }
    }

    /// First half of a close
    ///
    /// Without a hook the dialog resolves right away. With one, the entry is
    /// marked closing and the hook future is handed back; further closes are
    /// ignored until [`finish_close`](Self::finish_close) reports the outcome.
    pub fn begin_close(&mut self, id: OverlayId, result: DialogResult) -> Result<CloseStep> {
        let index = self.index_of(id)?;
        let entry = &mut self.entries[index];

        if entry.phase != DialogPhase::Open {
            tracing::debug!(id = %id, phase = ?entry.phase, "Ignoring repeated close");
            return Ok(CloseStep::Ignored);
        }

        let expected = entry.request.kind();
        if result.kind() != expected {
            return Err(OverlayError::ResultMismatch { id, expected });
        }

        if let Some(hook) = entry.on_close.clone() {
            entry.phase = DialogPhase::Closing;
            tracing::debug!(id = %id, "Running close hook");
            return Ok(CloseStep::RunHook(hook(result)));
        }

        self.resolve(index, result);
        Ok(CloseStep::Resolved)
    }

    /// Second half of a close: apply the hook outcome
    ///
    /// A failed hook puts the dialog back to open and returns
    /// [`OverlayError::CloseHookFailure`]; the completion stays pending.
    pub fn finish_close(
        &mut self,
        id: OverlayId,
        result: DialogResult,
        outcome: std::result::Result<(), HookError>,
    ) -> Result<()> {
        let index = self.index_of(id)?;
        let entry = &mut self.entries[index];

        if entry.phase != DialogPhase::Closing {
            tracing::warn!(id = %id, phase = ?entry.phase, "Hook outcome for a dialog that is not closing");
            return Ok(());
        }

        match outcome {
            Ok(()) => {
                self.resolve(index, result);
                Ok(())
            }
            Err(source) => {
                entry.phase = DialogPhase::Open;
                tracing::warn!(id = %id, error = %source, "Close hook failed, dialog stays open");
                Err(OverlayError::CloseHookFailure { id, source })
            }
        }
    }

    fn resolve(&mut self, index: usize, result: DialogResult) {
        let deadline = self.clock.now() + self.retirement_delay;
        let entry = &mut self.entries[index];

        if let Some(tx) = entry.completion.take() {
            // Nobody awaiting is fine; the entry still retires
            let _ = tx.send(result);
        }
        entry.phase = DialogPhase::Hidden;
        self.retirements.schedule(deadline, entry.id);

        tracing::debug!(id = %entry.id, "Dialog resolved, retiring after {:?}", self.retirement_delay);
    }

    fn index_of(&self, id: OverlayId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(OverlayError::UnknownRequest(id))
    }

    /// Drop hidden dialogs whose retirement delay has elapsed
    pub fn retire_expired(&mut self, now: Instant) -> usize {
        let expired = self.retirements.drain_expired(now);
        let before = self.entries.len();
        for id in &expired {
            self.entries.retain(|e| e.id != *id);
        }
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(removed, remaining = self.entries.len(), "Retired dialogs");
        }
        removed
    }

    /// Drop every entry and pending retirement
    ///
    /// Pending completions resolve to [`OverlayError::Dismissed`].
    pub fn clear(&mut self) -> usize {
        let cancelled = self.retirements.cancel_all();
        let dropped = self.entries.len();
        self.entries.clear();
        if dropped > 0 || cancelled > 0 {
            tracing::debug!(dropped, cancelled, "Dialog stack cleared");
        }
        dropped
    }

    /// All tracked dialogs, bottom to top
    pub fn entries(&self) -> impl Iterator<Item = &DialogEntry> {
        self.entries.iter()
    }

    pub fn get(&self, id: OverlayId) -> Option<&DialogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Topmost dialog that is still on screen
    pub fn top_visible(&self) -> Option<&DialogEntry> {
        self.entries.iter().rev().find(|e| e.is_visible())
    }

    #[cfg(test)]
    pub fn visible_count(&self) -> usize {
        self.entries.iter().filter(|e| e.is_visible()).count()
    }

    pub fn pending_retirements(&self) -> usize {
        self.retirements.len()
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
