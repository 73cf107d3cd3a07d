use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

use super::helpers::spans_width;

/// Book name and counts, with a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let bg = app.theme.background;
    let total = app.book.len();
    let mut spans = vec![
        Span::styled(" \u{25B6} ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            app.book_name.clone(),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} record{}", total, if total == 1 { "" } else { "s" }),
            Style::default().fg(app.theme.dim).bg(bg),
        ),
    ];

    if !app.filter.trim().is_empty() {
        spans.push(Span::styled(
            format!("  {} match", app.visible_rows().len()),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    if !app.book.is_persistent() {
        let tag = "memory only ";
        let width = chunks[0].width as usize;
        let used = spans_width(&spans);
        if used + tag.len() < width {
            spans.push(Span::styled(
                " ".repeat(width - used - tag.len()),
                Style::default().bg(bg),
            ));
            spans.push(Span::styled(tag, Style::default().fg(app.theme.yellow).bg(bg)));
        }
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[0],
    );

    let separator = "\u{2500}".repeat(chunks[1].width as usize);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(app.theme.dim).bg(bg),
        ))),
        chunks[1],
    );
}
