//! Display width of text in terminal cells.
//!
//! Widths come from the East Asian Width tables in `unicode-width`; emoji
//! sequences are measured per grapheme cluster so a ZWJ family or a flag
//! counts as one wide glyph.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

/// Width of one codepoint: 0 for controls and combining marks, 2 for wide.
#[inline]
pub fn char_width(c: char) -> u16 {
    match c as u32 {
        // Pictographs terminals draw as wide even where the tables say 1.
        0x2600..=0x27BF
        | 0x1F300..=0x1F5FF
        | 0x1F600..=0x1F64F
        | 0x1F680..=0x1F6FF
        | 0x1F900..=0x1F9FF
        | 0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0) as u16,
    }
}

/// Width of a grapheme cluster.
pub fn grapheme_width(grapheme: &str) -> u16 {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if chars.as_str().is_empty() {
        return char_width(first);
    }

    // Regional indicator pair.
    if (0x1F1E6..=0x1F1FF).contains(&(first as u32)) {
        return 2;
    }

    let emoji_sequence = chars.any(|c| {
        matches!(c as u32, 0x200D | 0xFE0F | 0x20E3 | 0x1F3FB..=0x1F3FF)
    });
    if emoji_sequence {
        return 2;
    }

    // Base plus combining marks.
    first.width().unwrap_or(0) as u16
}

/// Width of a string; newlines and other controls count as zero.
pub fn string_width(s: &str) -> u16 {
    if s.is_ascii() {
        let printable = s.bytes().filter(|b| (0x20..0x7F).contains(b)).count();
        return printable.min(u16::MAX as usize) as u16;
    }
    s.graphemes(true)
        .fold(0u16, |acc, g| acc.saturating_add(grapheme_width(g)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_and_controls() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width("a\tb"), 2);
        assert_eq!(string_width(""), 0);
        assert_eq!(char_width('\x7f'), 0);
    }

    #[test]
    fn test_wide_glyphs() {
        assert_eq!(char_width('你'), 2);
        assert_eq!(string_width("Count: 你好"), 11);
        assert_eq!(char_width('🚀'), 2);
    }

    #[test]
    fn test_clusters_measure_as_one_glyph() {
        assert_eq!(grapheme_width("e\u{0301}"), 1);
        assert_eq!(grapheme_width("👨\u{200D}👩\u{200D}👧"), 2);
        assert_eq!(grapheme_width("🇺🇸"), 2);
        assert_eq!(string_width("cafe\u{0301}!"), 5);
    }
}
