use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::format_serial;
use crate::ops::search;
use crate::tui::app::{App, ConfirmAction, Mode};

use super::helpers::push_right_hint;

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let hint_style = Style::default().fg(app.theme.dim).bg(bg);

    let line = match app.mode {
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(message) = &app.status_message {
                let color = if app.status_is_error {
                    app.theme.red
                } else {
                    app.theme.text
                };
                spans.push(Span::styled(
                    format!(" {}", message),
                    Style::default().fg(color).bg(bg),
                ));
                Line::from(spans)
            } else if !app.filter.trim().is_empty() {
                spans.push(Span::styled(format!("/{}", app.filter), hint_style));
                push_right_hint(&mut spans, "Esc clear search", width, hint_style);
                Line::from(spans)
            } else {
                push_right_hint(
                    &mut spans,
                    "a add  e edit  space toggle  d delete  / search  q quit",
                    width,
                    hint_style,
                );
                Line::from(spans)
            }
        }
        Mode::Search => {
            // Search prompt: /pattern▌
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.filter),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)), // ▌ cursor
            ];
            push_right_hint(&mut spans, "Enter keep  Esc clear", width, hint_style);
            Line::from(spans)
        }
        Mode::Form => {
            let mut spans = Vec::new();
            push_right_hint(
                &mut spans,
                "Tab next  Enter save  Esc cancel",
                width,
                hint_style,
            );
            Line::from(spans)
        }
        Mode::Confirm => Line::from(vec![
            Span::styled(
                confirm_prompt(app),
                Style::default().fg(app.theme.yellow).bg(bg),
            ),
            Span::styled("  y/n", hint_style),
        ]),
    };

    let paragraph = Paragraph::new(line).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn confirm_prompt(app: &App) -> String {
    match &app.confirm {
        Some(ConfirmAction::Delete) => match app.selected_position() {
            Some(position) => format!(" Delete {}?", format_serial(position)),
            None => " Delete?".to_string(),
        },
        Some(ConfirmAction::ClearFlag { flag }) => {
            let count = app.book.list().find(search::flag_predicate(flag)).count();
            format!(" Remove {} record(s) with {} set?", count, flag)
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    fn status(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn navigate_hints_when_idle() {
        let mut app = todo_app(&[]);
        app.clear_status();
        assert!(status(&app).ends_with("/ search  q quit"));
    }

    #[test]
    fn status_message_replaces_hints() {
        let mut app = todo_app(&[]);
        app.set_error("change kept in memory but not saved: disk full");
        assert_eq!(
            status(&app),
            " change kept in memory but not saved: disk full"
        );
    }

    #[test]
    fn search_prompt() {
        let mut app = contacts_app(&["Alice"]);
        app.mode = Mode::Search;
        app.filter = "ali".into();
        let row = status(&app);
        assert!(row.starts_with("/ali\u{258C}"));
        assert!(row.ends_with("Esc clear"));
    }

    #[test]
    fn confirm_prompts() {
        let mut app = todo_app(&[("a", true), ("b", true), ("c", false)]);
        app.mode = Mode::Confirm;
        app.cursor = 2;
        app.confirm = Some(ConfirmAction::Delete);
        assert_eq!(status(&app), " Delete 03?  y/n");

        app.confirm = Some(ConfirmAction::ClearFlag {
            flag: "completed".into(),
        });
        assert_eq!(status(&app), " Remove 2 record(s) with completed set?  y/n");
    }
}
