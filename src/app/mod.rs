//! Application state and logic
//!
//! This module contains the main `App` struct and the view state it drives.
//! Keyboard routing and the async operations live in sub-modules.
//!
//! The public entry points are:
//!
//! - [`App::new()`] - Constructor
//! - [`App::handle_event()`] - Event processing
//! - [`App::tick()`] - Timer updates
//! - [`App::rendered()`] - Mark frame as rendered

pub mod form;
mod keyboard;
mod operations;

pub use form::{BookForm, FormMode};

use crate::books::{Book, BookApi, BookPage, ListQuery};
use crate::config::ShelfdashConfig;
use crate::errors::OverlayError;
use crate::event::Event;
use crate::overlay::{Clock, OverlayContext, OverlayId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Which main view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Detail,
    Form,
}

/// Book table state
#[derive(Debug, Clone)]
pub struct ListView {
    pub query: ListQuery,
    pub page: BookPage,
    pub selected: usize,
    pub loading: bool,
    /// Keys go to the search box
    pub searching: bool,
    /// Sequence number of the latest list request
    pub request: u64,
}

impl ListView {
    fn new(page_size: usize) -> Self {
        Self {
            query: ListQuery::new(page_size),
            page: BookPage::default(),
            selected: 0,
            loading: false,
            searching: false,
            request: 0,
        }
    }

    pub fn selected_book(&self) -> Option<&Book> {
        self.page.items.get(self.selected)
    }

    pub fn page_count(&self) -> usize {
        self.query.page_count(self.page.item_count)
    }

    fn select_next(&mut self) {
        if !self.page.items.is_empty() {
            self.selected = (self.selected + 1).min(self.page.items.len() - 1);
        }
    }

    fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn set_page(&mut self, page: BookPage) {
        self.page = page;
        self.selected = self.selected.min(self.page.items.len().saturating_sub(1));
        self.loading = false;
    }

    /// The current page index points past the end, e.g. after a delete
    fn past_last_page(&self) -> bool {
        self.query.page > 0 && self.query.page >= self.page_count()
    }
}

/// Single book view
#[derive(Debug, Clone)]
pub struct DetailView {
    pub id: u64,
    pub book: Option<Book>,
    pub loading: bool,
}

/// Application state and logic
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    /// Dirty flag: true if UI needs re-render (render-on-change optimization)
    pub needs_render: bool,
    pub view: View,
    pub list: ListView,
    pub detail: Option<DetailView>,
    pub form: Option<BookForm>,
    /// Dialogs and notifications
    pub overlays: OverlayContext,
    /// Text typed into open prompt dialogs
    pub prompt_inputs: HashMap<OverlayId, String>,
    pub api: Arc<dyn BookApi>,
    /// Event sender for async operations
    pub event_tx: mpsc::Sender<Event>,
}

impl App {
    pub fn new(
        config: &ShelfdashConfig,
        api: Arc<dyn BookApi>,
        event_tx: mpsc::Sender<Event>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            needs_render: true, // Always render first frame
            view: View::List,
            list: ListView::new(config.list.page_size),
            detail: None,
            form: None,
            overlays: OverlayContext::new(&config.overlay, clock),
            prompt_inputs: HashMap::new(),
            api,
            event_tx,
        }
    }

    /// Handle incoming events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize => {}
            Event::Reload => self.load_books(),
            Event::BooksLoaded { request, .. } if request != self.list.request => {
                tracing::debug!(request, current = self.list.request, "Dropping stale book list");
            }
            Event::BooksLoaded {
                result: Ok(page), ..
            } => {
                tracing::debug!(items = page.items.len(), total = page.item_count, "Books loaded");
                self.list.set_page(page);
                self.overlays.close_notification(&operations::load_error_key());
                if self.list.past_last_page() {
                    self.list.query.page = self.list.page_count() - 1;
                    tracing::debug!(page = self.list.query.page, "Page gone, moving to last page");
                    self.load_books();
                }
            }
            Event::BooksLoaded { result: Err(e), .. } => {
                self.list.loading = false;
                self.report_load_error(&e);
            }
            Event::OpenBook(id) => self.open_book(id),
            Event::BookLoaded { id, result } => self.book_loaded(id, result),
            Event::BookSaved { edited, result } => self.book_saved(edited, result),
            Event::BookDeleted(id) => {
                tracing::info!(id, "Book deleted");
                if self.view == View::Detail && self.detail.as_ref().is_some_and(|d| d.id == id) {
                    self.show_list();
                }
                self.load_books();
            }
            Event::ShowList => self.show_list(),
            Event::Notify { message, severity } => {
                let options = self.overlays.toast(severity);
                self.overlays.show_notification(message, options);
            }
            Event::DialogHookFinished {
                id,
                result,
                outcome,
            } => match self.overlays.dialogs_mut().finish_close(id, result, outcome) {
                Ok(()) => {}
                Err(OverlayError::UnknownRequest(id)) => {
                    tracing::warn!(id = %id, "Hook finished for a dialog that is gone");
                }
                Err(e) => tracing::debug!(error = %e, "Dialog kept open"),
            },
        }
        self.needs_render = true;
    }

    /// Advance overlay timers
    pub fn tick(&mut self) {
        if self.overlays.tick() {
            let dialogs = self.overlays.dialogs();
            self.prompt_inputs.retain(|id, _| dialogs.get(*id).is_some());
            self.needs_render = true;
        }
    }

    /// Called after render to reset dirty flag
    pub fn rendered(&mut self) {
        self.needs_render = false;
    }

    fn show_list(&mut self) {
        self.view = View::List;
        self.detail = None;
        self.form = None;
    }
}
