//! Book operations that go through the API and the overlays
//!
//! Anything that awaits runs on a spawned task and reports back with an
//! [`Event`]; app state is only touched from the event loop.

use super::{App, BookForm, DetailView, FormMode, View};
use crate::books::Book;
use crate::errors::{ApiError, HookError};
use crate::event::Event;
use crate::overlay::{
    AlertPayload, CloseStep, ConfirmPayload, DialogOptions, DialogResult, NotificationAction,
    NotificationKey, OverlayId, PromptPayload, Severity,
};
use std::future::Future;
use tokio::sync::mpsc;

/// Dedup key for list load failures; repeats collapse into one notification
pub(super) fn load_error_key() -> NotificationKey {
    NotificationKey::new("books-load-error")
}

async fn notify(tx: &mpsc::Sender<Event>, message: String, severity: Severity) {
    if tx.send(Event::Notify { message, severity }).await.is_err() {
        tracing::debug!("Event channel closed, notification dropped");
    }
}

impl App {
    /// Run `task` on the runtime and feed its event back into the loop
    fn spawn_report<F>(&self, task: F)
    where
        F: Future<Output = Event> + Send + 'static,
    {
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = task.await;
            if tx.send(event).await.is_err() {
                tracing::debug!("Event channel closed, dropping result");
            }
        });
    }

    /// Fetch the current list page
    pub(crate) fn load_books(&mut self) {
        self.list.loading = true;
        self.list.request += 1;
        let request = self.list.request;
        let query = self.list.query.clone();
        let api = self.api.clone();

        tracing::debug!(request, page = query.page, search = %query.search, "Loading books");
        self.spawn_report(async move {
            Event::BooksLoaded {
                request,
                result: api.list(&query).await,
            }
        });
    }

    pub(crate) fn report_load_error(&mut self, error: &ApiError) {
        tracing::warn!(error = %error, "Failed to load books");
        let tx = self.event_tx.clone();
        let retry = NotificationAction::new(Some("Retry".to_string()), move || {
            if tx.try_send(Event::Reload).is_err() {
                tracing::warn!("Event channel full, retry dropped");
            }
        });
        let options = self
            .overlays
            .toast(Severity::Error)
            .key(load_error_key())
            .action(retry);
        self.overlays.show_notification(error.to_string(), options);
    }

    /// Switch to the detail view and fetch the book
    pub(crate) fn open_book(&mut self, id: u64) {
        self.view = View::Detail;
        let cached = self
            .detail
            .as_ref()
            .filter(|d| d.id == id)
            .and_then(|d| d.book.clone());
        self.detail = Some(DetailView {
            id,
            book: cached,
            loading: true,
        });

        let api = self.api.clone();
        self.spawn_report(async move {
            Event::BookLoaded {
                id,
                result: api.get(id).await,
            }
        });
    }

    pub(crate) fn book_loaded(&mut self, id: u64, result: Result<Book, ApiError>) {
        let Some(detail) = self.detail.as_mut().filter(|d| d.id == id) else {
            tracing::debug!(id, "Ignoring book for a closed detail view");
            return;
        };
        detail.loading = false;

        match result {
            Ok(book) => detail.book = Some(book),
            Err(e) => {
                tracing::warn!(id, error = %e, "Failed to load book");
                let pending = self
                    .overlays
                    .dialogs_mut()
                    .alert(AlertPayload::new(e.to_string()).title("Error"), DialogOptions::default());
                let tx = self.event_tx.clone();
                tokio::spawn(async move {
                    match pending.await {
                        Ok(()) => {
                            let _ = tx.send(Event::ShowList).await;
                        }
                        Err(e) => tracing::debug!(error = %e, "Error alert dismissed"),
                    }
                });
            }
        }
    }

    pub(crate) fn open_form(&mut self, form: BookForm) {
        tracing::debug!(mode = ?form.mode, "Opening form");
        self.form = Some(form);
        self.view = View::Form;
    }

    /// Validate and send the form; errors stay on the form
    pub(crate) fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }
        let Some(draft) = form.submit() else {
            return;
        };
        form.submitting = true;
        let mode = form.mode;
        let api = self.api.clone();

        self.spawn_report(async move {
            match mode {
                FormMode::Create => Event::BookSaved {
                    edited: None,
                    result: api.create(&draft).await.map(|book| book.id),
                },
                FormMode::Edit(id) => Event::BookSaved {
                    edited: Some(id),
                    result: api.update(id, &draft).await.map(|()| id),
                },
            }
        });
    }

    pub(crate) fn book_saved(&mut self, edited: Option<u64>, result: Result<u64, ApiError>) {
        if let Some(form) = self.form.as_mut() {
            form.submitting = false;
        }

        let (message, severity) = match (&result, edited) {
            (Ok(_), None) => ("Book created successfully.".to_string(), Severity::Success),
            (Ok(_), Some(_)) => ("Book edited successfully.".to_string(), Severity::Success),
            (Err(e), None) => (format!("Failed to create book. Reason: {e}"), Severity::Error),
            (Err(e), Some(_)) => (format!("Failed to edit book. Reason: {e}"), Severity::Error),
        };
        let options = self.overlays.toast(severity);
        self.overlays.show_notification(message, options);

        match (result, edited) {
            (Ok(id), None) => {
                tracing::info!(id, "Book created");
                self.show_list();
                self.load_books();
            }
            (Ok(id), Some(_)) => {
                tracing::info!(id, "Book updated");
                self.form = None;
                self.open_book(id);
            }
            (Err(e), _) => tracing::warn!(error = %e, "Failed to save book"),
        }
    }

    /// Ask before deleting; the delete itself runs as the dialog's close hook
    pub(crate) fn confirm_delete(&mut self, book: &Book) {
        let id = book.id;
        let api = self.api.clone();
        let hook_tx = self.event_tx.clone();

        let options = DialogOptions::default().on_close(move |result| {
            let api = api.clone();
            let tx = hook_tx.clone();
            async move {
                if result != DialogResult::Confirmed(true) {
                    return Ok(());
                }
                match api.delete(id).await {
                    Ok(()) => {
                        notify(&tx, "Book deleted successfully.".to_string(), Severity::Success)
                            .await;
                        Ok(())
                    }
                    Err(e) => {
                        notify(&tx, format!("Failed to delete book. Reason: {e}"), Severity::Error)
                            .await;
                        Err(HookError::from(e))
                    }
                }
            }
        });

        let payload = ConfirmPayload::new(format!("Do you wish to delete {}?", book.title))
            .title("Delete book?")
            .severity(Severity::Error)
            .ok_text("Delete")
            .cancel_text("Cancel");
        let pending = self.overlays.dialogs_mut().confirm(payload, options);

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            match pending.await {
                Ok(true) => {
                    let _ = tx.send(Event::BookDeleted(id)).await;
                }
                Ok(false) => tracing::debug!(id, "Delete cancelled"),
                Err(e) => tracing::debug!(id, error = %e, "Delete dialog dismissed"),
            }
        });
    }

    /// Ask for a book id and open it
    pub(crate) fn prompt_go_to_book(&mut self) {
        let payload = PromptPayload::new("Book id").title("Go to book");
        let initial = payload.initial.clone();
        let pending = self
            .overlays
            .dialogs_mut()
            .prompt(payload, DialogOptions::default());
        self.prompt_inputs.insert(pending.id(), initial);

        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let event = match pending.await {
                Ok(Some(text)) => match text.trim().parse::<u64>() {
                    Ok(id) => Event::OpenBook(id),
                    Err(_) => Event::Notify {
                        message: format!("'{}' is not a book id", text.trim()),
                        severity: Severity::Warning,
                    },
                },
                Ok(None) => return,
                Err(e) => {
                    tracing::debug!(error = %e, "Go-to prompt dismissed");
                    return;
                }
            };
            let _ = tx.send(event).await;
        });
    }

    /// Host side of a dialog close: resolve now or run the hook off-loop
    pub(crate) fn close_dialog(&mut self, id: OverlayId, result: DialogResult) {
        match self.overlays.dialogs_mut().begin_close(id, result.clone()) {
            Ok(CloseStep::Resolved | CloseStep::Ignored) => {}
            Ok(CloseStep::RunHook(hook)) => {
                self.spawn_report(async move {
                    let outcome = hook.await;
                    Event::DialogHookFinished {
                        id,
                        result,
                        outcome,
                    }
                });
            }
            Err(e) => tracing::warn!(id = %id, error = %e, "Dialog close rejected"),
        }
    }
}
