//! Grapheme-safe truncation with an ellipsis at the end, start or middle.

use unicode_segmentation::UnicodeSegmentation;

use super::width::{grapheme_width, string_width};

pub const ELLIPSIS: &str = "…";

/// Longest prefix of `text` that fits in `max` cells.
fn take_front(text: &str, max: u16) -> &str {
    let mut width = 0u16;
    let mut end = 0;
    for (idx, grapheme) in text.grapheme_indices(true) {
        let gw = grapheme_width(grapheme);
        if width + gw > max {
            break;
        }
        width += gw;
        end = idx + grapheme.len();
    }
    &text[..end]
}

/// Longest suffix of `text` that fits in `max` cells.
fn take_back(text: &str, max: u16) -> &str {
    let mut width = 0u16;
    let mut start = text.len();
    for (idx, grapheme) in text.grapheme_indices(true).rev() {
        let gw = grapheme_width(grapheme);
        if width + gw > max {
            break;
        }
        width += gw;
        start = idx;
    }
    &text[start..]
}

/// Keep the start of `text`, ending with `…` when it had to be cut.
pub fn truncate_end(text: &str, max_width: u16) -> String {
    if string_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = take_front(text, max_width - 1).to_string();
    out.push_str(ELLIPSIS);
    out
}

/// Keep the end of `text`, starting with `…` when it had to be cut.
pub fn truncate_start(text: &str, max_width: u16) -> String {
    if string_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::from(ELLIPSIS);
    out.push_str(take_back(text, max_width - 1));
    out
}

/// Keep both ends of `text` around a `…`. The front gets the extra cell
/// when the budget is odd.
pub fn truncate_middle(text: &str, max_width: u16) -> String {
    if string_width(text) <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let front = take_front(text, budget - budget / 2);
    let back = take_back(text, budget - string_width(front));
    format!("{front}{ELLIPSIS}{back}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fitting_text_is_untouched() {
        assert_eq!(truncate_end("hello", 5), "hello");
        assert_eq!(truncate_start("hello", 9), "hello");
        assert_eq!(truncate_middle("hello", 5), "hello");
    }

    #[test]
    fn test_each_mode_places_ellipsis() {
        assert_eq!(truncate_end("hello world", 6), "hello…");
        assert_eq!(truncate_start("hello world", 6), "…world");
        assert_eq!(truncate_middle("hello world", 6), "hel…ld");
    }

    #[test]
    fn test_wide_glyph_boundary() {
        assert_eq!(truncate_end("你好世界", 4), "你…");
        assert_eq!(string_width(&truncate_middle("你好世界", 5)), 5);
    }

    #[test]
    fn test_zero_and_one_cell() {
        assert_eq!(truncate_end("hello", 0), "");
        assert_eq!(truncate_end("hello", 1), "…");
    }
}
