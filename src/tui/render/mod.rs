pub mod form_view;
pub mod header;
pub mod helpers;
pub mod list_view;
pub mod status_row;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::App;

/// Main render function: header, record list, optional form, status row
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let form_height = app.form.as_ref().map_or(0, form_view::form_height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),           // header + separator
            Constraint::Min(1),              // record list
            Constraint::Length(form_height), // add/edit form
            Constraint::Length(1),           // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    list_view::render_list_view(frame, app, chunks[1]);
    if form_height > 0 {
        form_view::render_form(frame, app, chunks[2]);
    }
    status_row::render_status_row(frame, app, chunks[3]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let ranges = match search_re {
        Some(re) => crate::ops::search::match_spans(re, text),
        None => Vec::new(),
    };
    if ranges.is_empty() {
        spans.push(Span::styled(text.to_string(), base_style));
        return;
    }

    let mut last_end = 0;
    for range in ranges {
        if range.start > last_end {
            spans.push(Span::styled(
                text[last_end..range.start].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), highlight_style));
        last_end = range.end;
    }
    if last_end < text.len() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::search::highlight_regex;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn highlighted_spans_split_on_matches() {
        let re = highlight_regex("li").unwrap();
        let base = Style::default();
        let hl = Style::default().bg(ratatui::style::Color::Red);
        let mut spans = Vec::new();
        push_highlighted_spans(&mut spans, "Alicia Li", base, hl, Some(&re));
        let parts: Vec<(&str, bool)> = spans
            .iter()
            .map(|s| (s.content.as_ref(), s.style == hl))
            .collect();
        assert_eq!(
            parts,
            vec![("A", false), ("li", true), ("cia ", false), ("Li", true)]
        );
    }

    #[test]
    fn full_screen_layout() {
        let mut app = todo_app(&[("buy milk", false), ("pay bills", true)]);
        let output = render_to_string(TERM_W, 8, |frame, _area| render(frame, &mut app));
        let lines: Vec<&str> = output.lines().collect();
        assert!(lines[0].contains("Test"));
        assert!(lines[2].contains("01 [ ] buy milk"));
        assert!(lines[3].contains("02 [x] pay bills"));
        assert!(lines[7].contains("memory only"));
    }

    #[test]
    fn form_is_drawn_above_status_row() {
        let mut app = todo_app(&[("buy milk", false)]);
        app.form = Some(crate::tui::app::FormState::new(
            crate::tui::app::FormTarget::Add,
            app.book.schema(),
            &app.book.schema().blank_record(),
        ));
        app.mode = crate::tui::app::Mode::Form;
        let output = render_to_string(TERM_W, 12, |frame, _area| render(frame, &mut app));
        assert!(output.contains("Add record"));
        assert!(output.contains("task*"));
        assert!(output.contains("Enter save"));
    }
}
