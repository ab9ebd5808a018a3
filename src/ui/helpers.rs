//! UI helper functions

use crate::config::colors;
use crate::overlay::Severity;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Color;

/// Truncate a string to max_len characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}

/// Create a centered rect with percentage-based dimensions
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Rows `text` takes when word-wrapped at `width` columns
///
/// Greedy like the paragraph wrapper: words move to the next row when they do
/// not fit, and words longer than a row are broken.
pub fn wrapped_rows(text: &str, width: usize) -> usize {
    if width == 0 {
        return 0;
    }
    let rows: usize = text
        .lines()
        .map(|line| {
            let mut rows = 1;
            let mut used = 0;
            for word in line.split(' ') {
                let len = word.chars().count();
                let needed = if used == 0 { len } else { used + 1 + len };
                if needed <= width {
                    used = needed;
                } else if len <= width {
                    rows += 1;
                    used = len;
                } else {
                    if used > 0 {
                        rows += 1;
                    }
                    rows += (len - 1) / width;
                    used = (len - 1) % width + 1;
                }
            }
            rows
        })
        .sum();
    rows.max(1)
}

/// Centered rect of a fixed size, clamped to the area
pub fn centered_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Success => colors::SUCCESS,
        Severity::Info => colors::INFO,
        Severity::Warning => colors::WARNING,
        Severity::Error => colors::ERROR,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(truncate("Dune", 10), "Dune");
        assert_eq!(truncate("Pride and Prejudice", 6), "Pride…");
        assert_eq!(truncate("Les Misérables", 7), "Les Mi…");
        assert_eq!(truncate("anything", 0), "");
    }

    #[test]
    fn test_wrapped_rows() {
        assert_eq!(wrapped_rows("Do you wish to delete Dune?", 50), 1);
        assert_eq!(wrapped_rows("", 50), 1);
        // Two nine-letter words fit a 20-column row
        assert_eq!(wrapped_rows(&["catalogue"; 10].join(" "), 20), 5);
        assert_eq!(wrapped_rows(&"x".repeat(45), 20), 3);
        assert_eq!(wrapped_rows("short\nlines", 50), 2);
    }

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 40, 10);
        assert_eq!(centered_fixed(20, 4, area), Rect::new(10, 3, 20, 4));
        assert_eq!(centered_fixed(80, 40, area), area);
    }
}
