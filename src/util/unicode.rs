use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Byte offset of the grapheme boundary after `byte_offset` (clamped to the end)
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> usize {
    if byte_offset >= s.len() {
        return s.len();
    }
    s[byte_offset..]
        .grapheme_indices(true)
        .nth(1)
        .map_or(s.len(), |(i, _)| byte_offset + i)
}

/// Byte offset of the grapheme boundary before `byte_offset` (clamped to 0)
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> usize {
    let byte_offset = byte_offset.min(s.len());
    s[..byte_offset]
        .grapheme_indices(true)
        .next_back()
        .map_or(0, |(i, _)| i)
}
