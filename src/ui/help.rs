//! Help modal

use super::helpers::centered_rect;
use crate::config::colors;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_help(f: &mut Frame) {
    let area = centered_rect(55, 75, f.area());

    let help_text = r"
  Book list
  j/k         Move selection
  h/l         Previous/next page
  p           Page size (5, 10, 25)
  Enter       Open book
  /           Search title or author
  f / s       Cycle genre / status filter
  c           Clear filters
  g           Go to book by id
  r           Reload

  Books
  n           New book
  e           Edit book
  d           Delete book

  Dialogs
  Enter, y    Confirm
  Esc, n      Cancel

  Notifications
  x           Dismiss
  a           Run action

  q, Esc      Quit (Esc goes back first)
  Ctrl+C      Force quit
";

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(colors::FG))
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors::HIGHLIGHT))
                .border_type(ratatui::widgets::BorderType::Double)
                .title_bottom(Line::from(" ?:close ").centered())
                .style(Style::default().bg(colors::BG)),
        );

    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}
