//! Book form validation rules

use super::{BookDraft, GENRES, STATUSES};
use chrono::Datelike;

/// Minimum length for title and author
const MIN_TEXT_LEN: usize = 2;

/// Earliest accepted publication year
const MIN_YEAR: i32 = 1500;

/// Form fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Author,
    Genre,
    PublishedYear,
    Status,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Title,
        Field::Author,
        Field::Genre,
        Field::PublishedYear,
        Field::Status,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Author => "Author",
            Field::Genre => "Genre",
            Field::PublishedYear => "Published Year",
            Field::Status => "Status",
        }
    }
}

/// A rejected field and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Raw form input as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_year: String,
    pub status: String,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            published_year: current_year().to_string(),
            status: "Available".to_string(),
        }
    }
}

impl From<&BookDraft> for FormValues {
    fn from(draft: &BookDraft) -> Self {
        Self {
            title: draft.title.clone(),
            author: draft.author.clone(),
            genre: draft.genre.clone(),
            published_year: draft.published_year.to_string(),
            status: draft.status.clone(),
        }
    }
}

fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Check every field; on success return the draft to submit
pub fn validate(values: &FormValues) -> Result<BookDraft, Vec<FieldError>> {
    validate_with_year(values, current_year())
}

/// [`validate`] against an explicit current year
pub fn validate_with_year(values: &FormValues, this_year: i32) -> Result<BookDraft, Vec<FieldError>> {
    let mut errors = Vec::new();
    let mut reject = |field, message: String| errors.push(FieldError { field, message });

    let title = values.title.trim();
    if title.is_empty() {
        reject(Field::Title, "Title is required".to_string());
    } else if title.chars().count() < MIN_TEXT_LEN {
        reject(Field::Title, "Title must be at least 2 characters long".to_string());
    }

    let author = values.author.trim();
    if author.is_empty() {
        reject(Field::Author, "Author is required".to_string());
    } else if author.chars().count() < MIN_TEXT_LEN {
        reject(Field::Author, "Author must be at least 2 characters long".to_string());
    }

    if values.genre.is_empty() {
        reject(Field::Genre, "Genre is required".to_string());
    } else if !GENRES.contains(&values.genre.as_str()) {
        reject(
            Field::Genre,
            "Please select a valid genre from the dropdown".to_string(),
        );
    }

    let year_text = values.published_year.trim();
    let mut year = None;
    if year_text.is_empty() {
        reject(Field::PublishedYear, "Published year is required".to_string());
    } else {
        match year_text.parse::<i32>() {
            Err(_) => reject(
                Field::PublishedYear,
                "Published year must be a valid number".to_string(),
            ),
            Ok(y) if y < MIN_YEAR => reject(
                Field::PublishedYear,
                format!("Published year must be at least {MIN_YEAR}"),
            ),
            Ok(y) if y > this_year => reject(
                Field::PublishedYear,
                format!("Published year must be at most {this_year}"),
            ),
            Ok(y) => year = Some(y),
        }
    }

    if values.status.is_empty() {
        reject(Field::Status, "Status is required".to_string());
    } else if !STATUSES.contains(&values.status.as_str()) {
        reject(
            Field::Status,
            "Please select either \"Available\" or \"Issued\"".to_string(),
        );
    }

    match year {
        Some(published_year) if errors.is_empty() => Ok(BookDraft {
            title: title.to_string(),
            author: author.to_string(),
            genre: values.genre.clone(),
            published_year,
            status: values.status.clone(),
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> FormValues {
        FormValues {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science Fiction".to_string(),
            published_year: "1965".to_string(),
            status: "Available".to_string(),
        }
    }

    fn fields(errors: &[FieldError]) -> Vec<Field> {
        errors.iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_valid_form_produces_trimmed_draft() {
        let mut values = valid();
        values.title = "  Dune ".to_string();

        let draft = validate_with_year(&values, 2026).unwrap();
        assert_eq!(draft.title, "Dune");
        assert_eq!(draft.published_year, 1965);
    }

    #[test]
    fn test_empty_form_reports_required_fields() {
        let values = FormValues {
            title: String::new(),
            author: String::new(),
            genre: String::new(),
            published_year: String::new(),
            status: String::new(),
        };

        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(fields(&errors), Field::ALL.to_vec());
        assert_eq!(errors[0].message, "Title is required");
    }

    #[test]
    fn test_short_title_and_unknown_genre() {
        let mut values = valid();
        values.title = "D".to_string();
        values.genre = "Cookbook".to_string();

        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(fields(&errors), vec![Field::Title, Field::Genre]);
        assert_eq!(errors[1].message, "Please select a valid genre from the dropdown");
    }

    #[test]
    fn test_year_bounds() {
        let mut values = valid();

        values.published_year = "1499".to_string();
        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(errors[0].message, "Published year must be at least 1500");

        values.published_year = "2027".to_string();
        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(errors[0].message, "Published year must be at most 2026");

        values.published_year = "nineteen".to_string();
        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(errors[0].message, "Published year must be a valid number");

        values.published_year = "2026".to_string();
        assert!(validate_with_year(&values, 2026).is_ok());
    }

    #[test]
    fn test_status_must_be_known() {
        let mut values = valid();
        values.status = "Lost".to_string();

        let errors = validate_with_year(&values, 2026).unwrap_err();
        assert_eq!(fields(&errors), vec![Field::Status]);
    }

    #[test]
    fn test_default_values_start_available_this_year() {
        let values = FormValues::default();
        assert_eq!(values.status, "Available");
        assert_eq!(values.published_year, current_year().to_string());
    }
}
