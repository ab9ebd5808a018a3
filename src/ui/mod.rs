//! UI rendering module for shelfdash
//!
//! One main view at a time (book list, book detail, or the create/edit form)
//! with the overlay layer drawn on top:
//! - Help modal
//! - Dialog stack (alert, confirm, prompt)
//! - Notification snackbar

mod help;
pub mod helpers;
mod overlays;

use crate::app::{App, BookForm, View};
use crate::books::validate::Field;
use crate::config::colors;
use helpers::truncate;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

/// Main render function
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Active view
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    match app.view {
        View::List => render_book_list(f, chunks[1], app),
        View::Detail => render_book_detail(f, chunks[1], app),
        View::Form => {
            if let Some(form) = &app.form {
                render_book_form(f, chunks[1], form);
            }
        }
    }

    render_footer(f, chunks[2], app);

    if app.show_help {
        help::render_help(f);
    }

    overlays::render_overlays(f, app);
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::BORDER))
        .border_type(BorderType::Rounded)
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let query = &app.list.query;
    let filters: Vec<String> = [
        (!query.search.is_empty()).then(|| format!("search \"{}\"", query.search)),
        query.genre.as_ref().map(|g| format!("genre {g}")),
        query.status.as_ref().map(|s| format!("status {s}")),
    ]
    .into_iter()
    .flatten()
    .collect();

    let loading = if app.list.loading { " [loading]" } else { "" };
    let title = if filters.is_empty() {
        format!("Shelfdash ({} books){loading}", app.list.page.item_count)
    } else {
        format!(
            "Shelfdash ({} books: {}){loading}",
            app.list.page.item_count,
            filters.join(", ")
        )
    };

    let header = Paragraph::new(title)
        .style(Style::default().fg(colors::FG).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(panel(String::new()));
    f.render_widget(header, area);
}

fn render_book_list(f: &mut Frame, area: Rect, app: &App) {
    let list = &app.list;

    let header = Row::new(["ID", "Title", "Author", "Genre", "Year", "Status"])
        .style(Style::default().fg(colors::HIGHLIGHT).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = list
        .page
        .items
        .iter()
        .map(|book| {
            let status_color = if book.status == "Available" {
                colors::SUCCESS
            } else {
                colors::WARNING
            };
            Row::new([
                Cell::from(book.id.to_string()),
                Cell::from(truncate(&book.title, 32)),
                Cell::from(truncate(&book.author, 24)),
                Cell::from(book.genre.clone()),
                Cell::from(book.published_year.to_string()),
                Cell::from(book.status.clone()).style(Style::default().fg(status_color)),
            ])
            .style(Style::default().fg(colors::FG))
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Fill(3),
        Constraint::Fill(2),
        Constraint::Length(17),
        Constraint::Length(5),
        Constraint::Length(10),
    ];

    let search = if list.searching {
        format!(" Search: {}▏ ", list.query.search)
    } else {
        String::new()
    };
    let title = format!(
        " Books (page {}/{}, {} per page) {search}",
        list.query.page + 1,
        list.page_count(),
        list.query.page_size
    );

    let table = Table::new(rows, widths)
        .header(header)
        .row_highlight_style(Style::default().bg(colors::BG_LIGHT).add_modifier(Modifier::BOLD))
        .highlight_symbol("▶ ")
        .block(panel(title));

    let mut state = TableState::default();
    if !list.page.items.is_empty() {
        state.select(Some(list.selected));
    }
    f.render_stateful_widget(table, area, &mut state);

    if list.page.items.is_empty() && !list.loading {
        let inner = area.inner(Margin::new(2, 2));
        let empty = Paragraph::new("No books found")
            .style(Style::default().fg(colors::MUTED))
            .alignment(Alignment::Center);
        f.render_widget(empty, inner);
    }
}

fn render_book_detail(f: &mut Frame, area: Rect, app: &App) {
    let Some(detail) = &app.detail else {
        return;
    };

    let label = |name: &str| Span::styled(format!("{name:<16}"), Style::default().fg(colors::MUTED));
    let lines: Vec<Line> = match &detail.book {
        Some(book) => vec![
            Line::from(vec![label("Title"), Span::raw(book.title.clone())]),
            Line::from(vec![label("Author"), Span::raw(book.author.clone())]),
            Line::from(vec![label("Genre"), Span::raw(book.genre.clone())]),
            Line::from(vec![label("Published Year"), Span::raw(book.published_year.to_string())]),
            Line::from(vec![label("Status"), Span::raw(book.status.clone())]),
        ],
        None if detail.loading => vec![Line::from("Loading…")],
        None => vec![Line::from("Book not found")],
    };

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(colors::FG))
        .block(panel(format!(" Book {} ", detail.id)));
    f.render_widget(paragraph, area);
}

fn render_book_form(f: &mut Frame, area: Rect, form: &BookForm) {
    let mut lines = Vec::new();

    for field in Field::ALL {
        let focused = form.focus == field;
        let value = match field {
            Field::Title => form.values.title.as_str(),
            Field::Author => form.values.author.as_str(),
            Field::Genre => form.values.genre.as_str(),
            Field::PublishedYear => form.values.published_year.as_str(),
            Field::Status => form.values.status.as_str(),
        };
        let shown = match field {
            Field::Genre | Field::Status => format!("◀ {value} ▶"),
            _ if focused => format!("{value}▏"),
            _ => value.to_string(),
        };

        let label_style = if focused {
            Style::default().fg(colors::HIGHLIGHT).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors::MUTED)
        };
        let value_style = if focused {
            Style::default().fg(colors::FG).bg(colors::BG_LIGHT)
        } else {
            Style::default().fg(colors::FG)
        };

        lines.push(Line::from(vec![
            Span::styled(format!("{:<16}", field.label()), label_style),
            Span::styled(shown, value_style),
        ]));
        if let Some(error) = form.error_for(field) {
            lines.push(Line::from(Span::styled(
                format!("{:16}{error}", ""),
                Style::default().fg(colors::ERROR),
            )));
        }
        lines.push(Line::default());
    }

    if form.submitting {
        lines.push(Line::from(Span::styled(
            "Saving…",
            Style::default().fg(colors::INFO),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        panel(format!(" {} ", form.title()))
            .title_bottom(" [Tab] next  [←/→] choose  [Enter] save  [Esc] cancel "),
    );
    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let help = match app.view {
        View::List if app.list.searching => "type to search  Enter:done  Esc:clear",
        View::List => "j/k:move  Enter:open  n:new  e:edit  d:delete  /:search  f/s:filter  g:go to  ?:help",
        View::Detail => "e:edit  d:delete  r:refresh  Esc:back  ?:help",
        View::Form => "Tab:next field  Enter:save  Esc:cancel",
    };

    let footer = Paragraph::new(help)
        .style(Style::default().fg(colors::MUTED))
        .alignment(Alignment::Center);

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::MemoryBookApi;
    use crate::config::ShelfdashConfig;
    use crate::overlay::{ConfirmPayload, DialogOptions, ManualClock, Severity};
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn make_app() -> App {
        let (tx, _rx) = tokio::sync::mpsc::channel(8);
        App::new(
            &ShelfdashConfig::default(),
            Arc::new(MemoryBookApi::default()),
            tx,
            Arc::new(ManualClock::new()),
        )
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_render_empty_list() {
        let app = make_app();
        let text = screen(&app);
        assert!(text.contains("Shelfdash (0 books)"));
        assert!(text.contains("No books found"));
    }

    #[test]
    fn test_render_dialog_and_badge() {
        let mut app = make_app();
        let _pending = app.overlays.dialogs_mut().confirm(
            ConfirmPayload::new("Do you wish to delete Dune?").title("Delete book?"),
            DialogOptions::default(),
        );
        let options = app.overlays.toast(Severity::Success);
        app.overlays.show_notification("Book created successfully.", options.clone());
        app.overlays.show_notification("Book edited successfully.", options);

        let text = screen(&app);
        assert!(text.contains("Delete book?"));
        assert!(text.contains("Do you wish to delete Dune?"));
        assert!(text.contains("success (2)"));
        assert!(text.contains("Book created successfully."));
        assert!(!text.contains("Book edited successfully."));
    }

    #[test]
    fn test_long_confirm_message_is_not_clipped() {
        let mut app = make_app();
        let title = format!("{} Finale", ["The Librarian Who Catalogued"; 8].join(" "));
        let _pending = app.overlays.dialogs_mut().confirm(
            ConfirmPayload::new(format!("Do you wish to delete {title}?")).title("Delete book?"),
            DialogOptions::default(),
        );

        let text = screen(&app);
        assert!(text.contains("Finale?"));
    }

    #[test]
    fn test_render_form_errors() {
        let mut app = make_app();
        let mut form = BookForm::create();
        form.submit();
        app.form = Some(form);
        app.view = View::Form;

        let text = screen(&app);
        assert!(text.contains("New Book"));
        assert!(text.contains("Title is required"));
    }
}
