use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::cli::output::format_serial;
use crate::model::schema::FieldKind;
use crate::tui::app::{App, FormField, FormState, FormTarget};

use super::helpers::flag_symbol;

/// Rows needed for the form: one per field, the error line, and the border
pub fn form_height(form: &FormState) -> u16 {
    let error = u16::from(form.error.is_some());
    form.fields.len() as u16 + error + 2
}

pub fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.form else { return };
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);

    let title = match form.target {
        FormTarget::Add => " Add record ".to_string(),
        FormTarget::Edit => match app.selected_position() {
            Some(position) => format!(" Edit {} ", format_serial(position)),
            None => " Edit ".to_string(),
        },
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(bg.fg(theme.selection_border))
        .title(Span::styled(
            title,
            bg.fg(theme.text_bright).add_modifier(Modifier::BOLD),
        ))
        .style(bg);

    let label_width = form
        .fields
        .iter()
        .map(|f| f.name.len() + usize::from(f.required))
        .max()
        .unwrap_or(0);

    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| field_line(app, form, field, i == form.focus, label_width))
        .collect();

    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            bg.fg(theme.red),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field_line<'a>(
    app: &App,
    form: &FormState,
    field: &FormField,
    focused: bool,
    label_width: usize,
) -> Line<'a> {
    let theme = &app.theme;
    let bg = Style::default().bg(theme.background);
    let label = if field.required {
        format!("{}*", field.name)
    } else {
        field.name.clone()
    };

    let mut spans = vec![
        Span::styled(if focused { "\u{25B8}" } else { " " }, bg.fg(theme.highlight)),
        Span::styled(
            format!("{:width$}  ", label, width = label_width),
            bg.fg(if focused { theme.text_bright } else { theme.dim }),
        ),
    ];

    match field.kind {
        FieldKind::Flag => {
            spans.push(Span::styled(
                flag_symbol(field.checked),
                bg.fg(if field.checked { theme.green } else { theme.text }),
            ));
            if focused {
                spans.push(Span::styled("  space to toggle", bg.fg(theme.dim)));
            }
        }
        FieldKind::Text if focused => {
            let cursor = form.cursor.min(field.buffer.len());
            let (before, after) = field.buffer.split_at(cursor);
            spans.push(Span::styled(before.to_string(), bg.fg(theme.text_bright)));
            spans.push(Span::styled("\u{258C}", bg.fg(theme.highlight)));
            spans.push(Span::styled(after.to_string(), bg.fg(theme.text_bright)));
        }
        FieldKind::Text => {
            spans.push(Span::styled(field.buffer.clone(), bg.fg(theme.text)));
        }
    }

    Line::from(spans)
}
