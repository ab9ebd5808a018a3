//! Keyboard input handling
//!
//! Keys go to the topmost open dialog first, then to the notification head,
//! then to the active view.

use super::{App, BookForm, FormMode, View};
use crate::books::{GENRES, PAGE_SIZES, STATUSES};
use crate::overlay::{DialogKind, DialogPhase, DialogResult, OverlayId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    /// Handle keyboard input
    pub fn handle_key(&mut self, key: KeyEvent) {
        // Handle Ctrl+C always
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if let Some(top) = self.overlays.dialogs().top_visible() {
            let (id, kind, phase) = (top.id(), top.request().kind(), top.phase());
            // Keys are swallowed while a close hook is running
            if phase == DialogPhase::Open {
                self.handle_key_dialog(id, kind, key);
            }
            return;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?' | 'q') | KeyCode::Esc) {
                self.show_help = false;
            }
            return;
        }

        if !self.capturing_text() && self.handle_key_notification(key) {
            return;
        }

        match self.view {
            View::List if self.list.searching => self.handle_key_search(key),
            View::List => self.handle_key_list(key),
            View::Detail => self.handle_key_detail(key),
            View::Form => self.handle_key_form(key),
        }
    }

    /// Whether printable keys belong to a text field
    fn capturing_text(&self) -> bool {
        match self.view {
            View::List => self.list.searching,
            View::Form => true,
            View::Detail => false,
        }
    }

    fn handle_key_dialog(&mut self, id: OverlayId, kind: DialogKind, key: KeyEvent) {
        let result = match (kind, key.code) {
            (_, KeyCode::Esc) | (DialogKind::Confirm, KeyCode::Char('n')) => {
                DialogResult::cancelled(kind)
            }
            (DialogKind::Alert, KeyCode::Enter | KeyCode::Char(' ')) => DialogResult::Acknowledged,
            (DialogKind::Confirm, KeyCode::Enter | KeyCode::Char('y')) => {
                DialogResult::Confirmed(true)
            }
            (DialogKind::Prompt, KeyCode::Enter) => {
                let text = self.prompt_inputs.get(&id).cloned().unwrap_or_default();
                DialogResult::Prompted(Some(text))
            }
            (DialogKind::Prompt, KeyCode::Backspace) => {
                if let Some(input) = self.prompt_inputs.get_mut(&id) {
                    input.pop();
                }
                return;
            }
            (DialogKind::Prompt, KeyCode::Char(c)) => {
                self.prompt_inputs.entry(id).or_default().push(c);
                return;
            }
            _ => return,
        };

        self.close_dialog(id, result);
    }

    /// `x` closes the head notification, `a` runs its action
    fn handle_key_notification(&mut self, key: KeyEvent) -> bool {
        let Some(head) = self.overlays.notifications().head() else {
            return false;
        };
        let key_name = head.entry.key.clone();

        match key.code {
            KeyCode::Char('x') => {}
            KeyCode::Char('a') => match &head.entry.action {
                Some(action) => {
                    tracing::debug!(key = %key_name, label = %action.label, "Notification action");
                    action.invoke();
                }
                None => return false,
            },
            _ => return false,
        }

        self.overlays.close_notification(&key_name);
        true
    }

    fn handle_key_list(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => self.list.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.list.select_previous(),
            KeyCode::Char('l') | KeyCode::Right => {
                if self.list.query.page + 1 < self.list.page_count() {
                    self.list.query.page += 1;
                    self.list.selected = 0;
                    self.load_books();
                }
            }
            KeyCode::Char('h') | KeyCode::Left => {
                if self.list.query.page > 0 {
                    self.list.query.page -= 1;
                    self.list.selected = 0;
                    self.load_books();
                }
            }
            KeyCode::Enter => {
                if let Some(id) = self.list.selected_book().map(|b| b.id) {
                    self.open_book(id);
                }
            }
            KeyCode::Char('n') => self.open_form(BookForm::create()),
            KeyCode::Char('e') => {
                if let Some(book) = self.list.selected_book() {
                    let form = BookForm::edit(book);
                    self.open_form(form);
                }
            }
            KeyCode::Char('d') => {
                if let Some(book) = self.list.selected_book().cloned() {
                    self.confirm_delete(&book);
                }
            }
            KeyCode::Char('g') => self.prompt_go_to_book(),
            KeyCode::Char('/') => {
                self.list.searching = true;
                tracing::debug!("Entering search mode");
            }
            KeyCode::Char('f') => {
                self.list.query.genre = cycle_filter(self.list.query.genre.as_deref(), &GENRES);
                self.filters_changed();
            }
            KeyCode::Char('s') => {
                self.list.query.status =
                    cycle_filter(self.list.query.status.as_deref(), &STATUSES);
                self.filters_changed();
            }
            KeyCode::Char('c') => {
                self.list.query.search.clear();
                self.list.query.genre = None;
                self.list.query.status = None;
                self.filters_changed();
            }
            KeyCode::Char('p') => {
                self.list.query.page_size = next_page_size(self.list.query.page_size);
                tracing::debug!(page_size = self.list.query.page_size, "Page size changed");
                self.filters_changed();
            }
            KeyCode::Char('r') => self.load_books(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_key_search(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.list.searching = false;
            }
            KeyCode::Esc => {
                self.list.searching = false;
                if !self.list.query.search.is_empty() {
                    self.list.query.search.clear();
                    self.filters_changed();
                }
            }
            KeyCode::Backspace => {
                if self.list.query.search.pop().is_some() {
                    self.filters_changed();
                }
            }
            KeyCode::Char(c) => {
                self.list.query.search.push(c);
                self.filters_changed();
            }
            _ => {}
        }
    }

    fn handle_key_detail(&mut self, key: KeyEvent) {
        let book = self.detail.as_ref().and_then(|d| d.book.clone());
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('q' | 'b') => {
                self.show_list();
                self.load_books();
            }
            KeyCode::Char('e') => {
                if let Some(book) = book {
                    self.open_form(BookForm::edit(&book));
                }
            }
            KeyCode::Char('d') => {
                if let Some(book) = book {
                    self.confirm_delete(&book);
                }
            }
            KeyCode::Char('r') => {
                if let Some(id) = self.detail.as_ref().map(|d| d.id) {
                    self.open_book(id);
                }
            }
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_key_form(&mut self, key: KeyEvent) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if form.submitting {
            return;
        }

        match key.code {
            KeyCode::Esc => {
                let mode = form.mode;
                self.form = None;
                match mode {
                    FormMode::Create => self.show_list(),
                    FormMode::Edit(id) => self.open_book(id),
                }
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.prev_field(),
            KeyCode::Right => form.cycle(true),
            KeyCode::Left => form.cycle(false),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => form.input_char(c),
            _ => {}
        }
    }

    fn filters_changed(&mut self) {
        self.list.query.page = 0;
        self.list.selected = 0;
        self.load_books();
    }
}

/// None -> first option -> ... -> last option -> None
fn cycle_filter(current: Option<&str>, options: &[&str]) -> Option<String> {
    let next = match current {
        None => options.first(),
        Some(value) => options
            .iter()
            .position(|o| *o == value)
            .and_then(|i| options.get(i + 1)),
    };
    next.map(|s| (*s).to_string())
}

/// Next entry in [`PAGE_SIZES`]; a configured size off the list jumps to the
/// first larger choice
fn next_page_size(current: usize) -> usize {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|&size| size > current)
        .unwrap_or(PAGE_SIZES[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_page_size_cycles() {
        assert_eq!(next_page_size(5), 10);
        assert_eq!(next_page_size(10), 25);
        assert_eq!(next_page_size(25), 5);
        assert_eq!(next_page_size(7), 10);
        assert_eq!(next_page_size(100), 5);
    }

    #[test]
    fn test_cycle_filter_wraps_through_none() {
        let mut filter = None;
        let mut seen = Vec::new();
        for _ in 0..3 {
            filter = cycle_filter(filter.as_deref(), &STATUSES);
            seen.push(filter.clone());
        }
        assert_eq!(
            seen,
            vec![
                Some("Available".to_string()),
                Some("Issued".to_string()),
                None
            ]
        );
    }
}
