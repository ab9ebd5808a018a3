//! Create/edit form state

use crate::books::validate::{self, Field, FieldError, FormValues};
use crate::books::{Book, BookDraft, GENRES, STATUSES};

/// What the form submits as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(u64),
}

#[derive(Debug, Clone)]
pub struct BookForm {
    pub mode: FormMode,
    pub values: FormValues,
    pub focus: Field,
    pub errors: Vec<FieldError>,
    /// Request in flight; input is locked
    pub submitting: bool,
}

impl BookForm {
    pub fn create() -> Self {
        Self::with_values(FormMode::Create, FormValues::default())
    }

    pub fn edit(book: &Book) -> Self {
        Self::with_values(FormMode::Edit(book.id), FormValues::from(&BookDraft::from(book)))
    }

    fn with_values(mode: FormMode, values: FormValues) -> Self {
        Self {
            mode,
            values,
            focus: Field::Title,
            errors: Vec::new(),
            submitting: false,
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "New Book",
            FormMode::Edit(_) => "Edit Book",
        }
    }

    pub fn next_field(&mut self) {
        self.focus = step(self.focus, 1);
    }

    pub fn prev_field(&mut self) {
        self.focus = step(self.focus, Field::ALL.len() - 1);
    }

    /// Type into the focused text field; select fields ignore it
    pub fn input_char(&mut self, c: char) {
        match self.focus {
            Field::Title => self.values.title.push(c),
            Field::Author => self.values.author.push(c),
            Field::PublishedYear if c.is_ascii_digit() => self.values.published_year.push(c),
            _ => return,
        }
        self.clear_error(self.focus);
    }

    pub fn backspace(&mut self) {
        match self.focus {
            Field::Title => self.values.title.pop(),
            Field::Author => self.values.author.pop(),
            Field::PublishedYear => self.values.published_year.pop(),
            _ => return,
        };
        self.clear_error(self.focus);
    }

    /// Step the focused select field through its options
    pub fn cycle(&mut self, forward: bool) {
        match self.focus {
            Field::Genre => cycle_option(&mut self.values.genre, &GENRES, forward),
            Field::Status => cycle_option(&mut self.values.status, &STATUSES, forward),
            _ => return,
        }
        self.clear_error(self.focus);
    }

    pub fn error_for(&self, field: Field) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    /// Validate; keep the errors for display and return the draft if clean
    pub fn submit(&mut self) -> Option<BookDraft> {
        match validate::validate(&self.values) {
            Ok(draft) => {
                self.errors.clear();
                Some(draft)
            }
            Err(errors) => {
                tracing::debug!(count = errors.len(), "Form rejected");
                if let Some(first) = errors.first() {
                    self.focus = first.field;
                }
                self.errors = errors;
                None
            }
        }
    }

    fn clear_error(&mut self, field: Field) {
        self.errors.retain(|e| e.field != field);
    }
}

fn step(field: Field, by: usize) -> Field {
    let index = Field::ALL.iter().position(|f| *f == field).unwrap_or(0);
    Field::ALL[(index + by) % Field::ALL.len()]
}

fn cycle_option(value: &mut String, options: &[&str], forward: bool) {
    let next = match options.iter().position(|o| *o == value.as_str()) {
        None if forward => 0,
        None => options.len() - 1,
        Some(i) if forward => (i + 1) % options.len(),
        Some(i) => (i + options.len() - 1) % options.len(),
    };
    *value = options[next].to_string();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_wraps_both_ways() {
        let mut form = BookForm::create();
        form.prev_field();
        assert_eq!(form.focus, Field::Status);
        form.next_field();
        form.next_field();
        assert_eq!(form.focus, Field::Author);
    }

    #[test]
    fn test_year_field_accepts_digits_only() {
        let mut form = BookForm::create();
        form.focus = Field::PublishedYear;
        form.values.published_year.clear();
        for c in "19a6x5".chars() {
            form.input_char(c);
        }
        assert_eq!(form.values.published_year, "1965");
    }

    #[test]
    fn test_genre_cycles_from_empty() {
        let mut form = BookForm::create();
        form.focus = Field::Genre;
        form.cycle(true);
        assert_eq!(form.values.genre, "Thriller");
        form.cycle(false);
        form.cycle(false);
        assert_eq!(form.values.genre, "Post-Apocalyptic");
    }

    #[test]
    fn test_submit_focuses_first_error_and_typing_clears_it() {
        let mut form = BookForm::create();
        form.values.author = "Frank Herbert".to_string();
        form.focus = Field::Status;

        assert!(form.submit().is_none());
        assert_eq!(form.focus, Field::Title);
        assert_eq!(form.error_for(Field::Title), Some("Title is required"));
        assert!(form.error_for(Field::Genre).is_some());

        form.input_char('D');
        assert!(form.error_for(Field::Title).is_none());
    }

    #[test]
    fn test_edit_prefills_and_submits() {
        let book = Book {
            id: 9,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            published_year: 1965,
            status: "Issued".to_string(),
        };
        let mut form = BookForm::edit(&book);
        assert_eq!(form.mode, FormMode::Edit(9));
        assert_eq!(form.values.published_year, "1965");

        let draft = form.submit().unwrap();
        assert_eq!(draft, BookDraft::from(&book));
    }
}
