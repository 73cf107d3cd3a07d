use ratatui::text::Span;

use crate::util::unicode;

/// Checkbox for a flag field (markdown checkbox style)
pub(super) fn flag_symbol(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Compute total display width of a slice of spans
pub(super) fn spans_width(spans: &[Span]) -> usize {
    spans
        .iter()
        .map(|s| unicode::display_width(&s.content))
        .sum()
}

/// Pad `spans` with a right-aligned hint if it fits in `width`
pub(super) fn push_right_hint<'a>(
    spans: &mut Vec<Span<'a>>,
    hint: &'a str,
    width: usize,
    style: ratatui::style::Style,
) {
    let content_width = spans_width(spans);
    let hint_width = unicode::display_width(hint);
    if content_width + hint_width < width {
        let padding = width - content_width - hint_width;
        spans.push(Span::styled(" ".repeat(padding), style));
        spans.push(Span::styled(hint, style));
    }
}
