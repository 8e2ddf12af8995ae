//! Word wrapping.
//!
//! Lines break at UAX #29 word boundaries. A word wider than the line is
//! hard-broken at grapheme boundaries. Explicit `\n` always breaks.

use unicode_segmentation::UnicodeSegmentation;

use super::width::grapheme_width;

/// Wrap `text` so no line is wider than `max_width` cells.
///
/// Whitespace at a soft break is dropped. Empty input yields no lines.
pub fn wrap_words(text: &str, max_width: u16) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_width = max_width.max(1);

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        wrap_line(raw_line, max_width, &mut lines);
    }
    lines
}

fn segment_width(segment: &str) -> u16 {
    segment
        .graphemes(true)
        .fold(0u16, |acc, g| acc.saturating_add(grapheme_width(g)))
}

fn wrap_line(line: &str, max_width: u16, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut width = 0u16;

    for segment in line.split_word_bounds() {
        let seg_width = segment_width(segment);

        if width.saturating_add(seg_width) > max_width {
            if width > 0 {
                lines.push(current.trim_end().to_string());
                current.clear();
                width = 0;
            }
            if segment.chars().all(char::is_whitespace) {
                continue;
            }
            if seg_width > max_width {
                hard_break(segment, max_width, lines, &mut current, &mut width);
                continue;
            }
        }

        current.push_str(segment);
        width = width.saturating_add(seg_width);
    }

    lines.push(current);
}

fn hard_break(
    segment: &str,
    max_width: u16,
    lines: &mut Vec<String>,
    current: &mut String,
    width: &mut u16,
) {
    for grapheme in segment.graphemes(true) {
        let gw = grapheme_width(grapheme);
        if *width + gw > max_width && !current.is_empty() {
            lines.push(std::mem::take(current));
            *width = 0;
        }
        current.push_str(grapheme);
        *width += gw;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breaks_between_words() {
        assert_eq!(wrap_words("hello big world", 9), vec!["hello big", "world"]);
    }

    #[test]
    fn test_long_word_is_hard_broken() {
        assert_eq!(wrap_words("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_newlines_and_empty_lines() {
        assert_eq!(wrap_words("a\n\nb", 10), vec!["a", "", "b"]);
        assert!(wrap_words("", 10).is_empty());
    }

    #[test]
    fn test_wide_glyphs_do_not_split() {
        assert_eq!(wrap_words("你好世界", 5), vec!["你好", "世界"]);
    }
}
