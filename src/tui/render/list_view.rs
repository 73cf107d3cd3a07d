use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regex::Regex;

use crate::cli::output::format_serial;
use crate::model::record::Record;
use crate::model::schema::{FieldKind, Schema};
use crate::tui::app::App;

use super::helpers::flag_symbol;
use super::push_highlighted_spans;

/// Render the visible rows of the list, scrolling to keep the cursor on screen
pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let bg = app.theme.background;
    let rows = app.visible_rows();

    if rows.is_empty() {
        let message = if app.filter.trim().is_empty() {
            " No records. Press a to add one.".to_string()
        } else {
            format!(" No matches for \"{}\"", app.filter.trim())
        };
        let line = Line::from(Span::styled(
            message,
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
        return;
    }

    let height = area.height as usize;
    app.cursor = app.cursor.min(rows.len() - 1);
    adjust_scroll(&mut app.scroll_offset, app.cursor, height);
    let app: &App = app;

    let search_re = app.search_re();
    let schema = app.book.schema();
    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(height)
        .filter_map(|(row, &position)| {
            let record = app.book.get(position)?;
            Some(record_line(
                app,
                schema,
                position,
                record,
                row == app.cursor,
                search_re.as_ref(),
            ))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn adjust_scroll(scroll: &mut usize, cursor: usize, height: usize) {
    if height == 0 {
        return;
    }
    if cursor < *scroll {
        *scroll = cursor;
    } else if cursor >= *scroll + height {
        *scroll = cursor + 1 - height;
    }
}

fn record_line<'a>(
    app: &App,
    schema: &Schema,
    position: usize,
    record: &Record,
    selected: bool,
    search_re: Option<&Regex>,
) -> Line<'a> {
    let theme = &app.theme;
    let row_bg = if selected {
        theme.selection_bg
    } else {
        theme.background
    };
    let bg = Style::default().bg(row_bg);

    let mut spans: Vec<Span> = Vec::new();
    if selected {
        spans.push(Span::styled("\u{258E}", bg.fg(theme.selection_border)));
    } else {
        spans.push(Span::styled(" ", bg));
    }
    spans.push(Span::styled(
        format_serial(position),
        bg.fg(if selected { theme.text_bright } else { theme.dim }),
    ));

    let mut done = false;
    for def in schema.fields().iter().filter(|f| f.kind == FieldKind::Flag) {
        let checked = record.flag(&def.name).unwrap_or(false);
        done |= checked && schema.first_flag().is_some_and(|f| f.name == def.name);
        spans.push(Span::styled(" ", bg));
        spans.push(Span::styled(
            flag_symbol(checked),
            bg.fg(if checked { theme.green } else { theme.dim }),
        ));
    }

    let text_style = if done {
        bg.fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
    } else if selected {
        bg.fg(theme.text_bright)
    } else {
        bg.fg(theme.text)
    };
    let match_style = Style::default()
        .fg(theme.search_match_fg)
        .bg(theme.search_match_bg);

    let primary = schema.primary_field().map(|f| f.name.as_str());
    let mut first = true;
    let ordered = primary
        .into_iter()
        .chain(schema.text_fields().map(|f| f.name.as_str()).filter(|n| Some(*n) != primary));
    for name in ordered {
        let Some(text) = record.text(name) else {
            continue;
        };
        if text.is_empty() && !first {
            continue;
        }
        spans.push(Span::styled(if first { " " } else { " | " }, bg.fg(theme.dim)));
        first = false;
        let re = schema
            .field(name)
            .filter(|f| f.searchable)
            .and(search_re);
        push_highlighted_spans(&mut spans, text, text_style, match_style, re);
    }

    Line::from(spans).style(bg)
}
