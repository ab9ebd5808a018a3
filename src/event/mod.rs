pub mod input;

use crate::books::{Book, BookPage};
use crate::errors::{ApiError, HookError};
use crate::overlay::{DialogResult, OverlayId, Severity};

/// Application events
///
/// Spawned tasks never touch app state; they report back through one of
/// these on the app's channel.
#[derive(Debug)]
pub enum Event {
    /// Keyboard input
    Key(crossterm::event::KeyEvent),
    /// Terminal resized; redraw
    Resize,
    /// Refetch the current list page
    Reload,
    /// List page fetched (or failed)
    BooksLoaded {
        /// Matches [`ListView::request`](crate::app::ListView); older replies are dropped
        request: u64,
        result: Result<BookPage, ApiError>,
    },
    /// Show the detail view for a book id
    OpenBook(u64),
    /// Single book fetched for the detail view
    BookLoaded {
        id: u64,
        result: Result<Book, ApiError>,
    },
    /// Create or update finished
    BookSaved {
        /// `None` for a create
        edited: Option<u64>,
        result: Result<u64, ApiError>,
    },
    /// A confirmed delete went through
    BookDeleted(u64),
    /// Back to the list view
    ShowList,
    /// Raise a notification from a background task
    Notify {
        message: String,
        severity: Severity,
    },
    /// A dialog close hook finished on a spawned task
    DialogHookFinished {
        id: OverlayId,
        result: DialogResult,
        outcome: Result<(), HookError>,
    },
}
