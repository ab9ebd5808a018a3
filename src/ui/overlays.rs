//! Dialog stack and notification snackbar
//!
//! Dialogs are drawn bottom to top, each offset a little from the one below
//! so the stack stays readable. Hidden dialogs are drawn dimmed until they
//! retire. Only the head notification is drawn, with a count badge when more
//! are queued.

use super::helpers::{centered_fixed, severity_color, truncate, wrapped_rows};
use crate::app::App;
use crate::config::colors;
use crate::overlay::{DialogEntry, DialogPhase, DialogRequest, NotificationView};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const DIALOG_WIDTH: u16 = 52;
const SNACKBAR_WIDTH: u16 = 48;

pub fn render_overlays(f: &mut Frame, app: &App) {
    let area = f.area();

    for (depth, entry) in app.overlays.dialogs().entries().enumerate() {
        let offset = u16::try_from(depth).unwrap_or(u16::MAX).saturating_mul(2);
        let input = app.prompt_inputs.get(&entry.id()).map(String::as_str);
        render_dialog(f, area, entry, offset, input);
    }

    if let Some(view) = app.overlays.notifications().head() {
        render_snackbar(f, area, &view);
    }
}

fn render_dialog(f: &mut Frame, area: Rect, entry: &DialogEntry, offset: u16, input: Option<&str>) {
    let request = entry.request();
    let hidden = entry.phase() == DialogPhase::Hidden;

    let (accent, buttons) = match request {
        DialogRequest::Alert(p) => (colors::INFO, format!(" [Enter] {} ", p.ok_text)),
        DialogRequest::Confirm(p) => (
            p.severity.map_or(colors::HIGHLIGHT, severity_color),
            format!(" [Enter] {}  [Esc] {} ", p.ok_text, p.cancel_text),
        ),
        DialogRequest::Prompt(p) => (
            colors::HIGHLIGHT,
            format!(" [Enter] {}  [Esc] {} ", p.ok_text, p.cancel_text),
        ),
    };
    let footer = match entry.phase() {
        DialogPhase::Open => buttons,
        DialogPhase::Closing => " Working… ".to_string(),
        DialogPhase::Hidden => String::new(),
    };

    let mut lines = vec![Line::from(request.message().to_string()), Line::default()];
    if let DialogRequest::Prompt(_) = request {
        lines.push(Line::from(vec![
            Span::styled("> ", Style::default().fg(colors::MUTED)),
            Span::styled(
                format!("{}▏", input.unwrap_or_default()),
                Style::default().fg(colors::FG).bg(colors::BG_LIGHT),
            ),
        ]));
    }

    let (border, text) = if hidden {
        (colors::MUTED, colors::MUTED)
    } else {
        (accent, colors::FG)
    };
    let title = request
        .title()
        .map(|t| format!(" {} ", truncate(t, usize::from(DIALOG_WIDTH) - 4)))
        .unwrap_or_default();

    // Wrapped message, then the blank and prompt lines, borders and one spare row
    let inner_width = usize::from(DIALOG_WIDTH.min(area.width).saturating_sub(2));
    let rows = wrapped_rows(request.message(), inner_width) + lines.len() - 1;
    let height = u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3);
    let base = centered_fixed(DIALOG_WIDTH, height, area);
    let rect = Rect {
        x: (base.x + offset).min(area.right().saturating_sub(base.width)),
        y: (base.y + offset / 2).min(area.bottom().saturating_sub(base.height)),
        ..base
    };

    let dialog = Paragraph::new(lines)
        .style(Style::default().fg(text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(title)
                .title_bottom(Line::from(footer).centered())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border))
                .border_type(BorderType::Double)
                .style(Style::default().bg(colors::BG)),
        );

    f.render_widget(Clear, rect);
    f.render_widget(dialog, rect);
}

fn render_snackbar(f: &mut Frame, area: Rect, view: &NotificationView<'_>) {
    let entry = view.entry;
    let color = severity_color(entry.severity);

    let title = match view.badge {
        Some(count) => format!(" {} ({count}) ", entry.severity.label()),
        None => format!(" {} ", entry.severity.label()),
    };
    let hint = match &entry.action {
        Some(action) => format!(" [a] {}  [x] Close ", action.label),
        None => " [x] Close ".to_string(),
    };

    let width = SNACKBAR_WIDTH.min(area.width);
    let height = 4.min(area.height);
    let rect = Rect {
        x: area.right().saturating_sub(width + 1),
        y: area.bottom().saturating_sub(height + 1),
        width,
        height,
    };

    let snackbar = Paragraph::new(entry.message.as_str())
        .style(Style::default().fg(colors::FG))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(title, Style::default().fg(color).add_modifier(Modifier::BOLD)))
                .title_bottom(Line::from(hint).right_aligned())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .border_type(BorderType::Rounded)
                .style(Style::default().bg(colors::BG_LIGHT)),
        );

    f.render_widget(Clear, rect);
    f.render_widget(snackbar, rect);
}
