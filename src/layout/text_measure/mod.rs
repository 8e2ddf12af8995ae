//! Unicode-aware text measurement.
//!
//! Layout and paint both go through [`shape_text`], so the lines the
//! painter draws are exactly the lines layout measured.

mod truncate;
mod width;
mod wrap;

pub use truncate::{ELLIPSIS, truncate_end, truncate_middle, truncate_start};
pub use width::{char_width, grapheme_width, string_width};
pub use wrap::wrap_words;

use crate::types::TextWrap;

/// Break `text` into display lines for a box `max_width` cells wide.
pub fn shape_text(text: &str, max_width: u16, mode: TextWrap) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let truncate: fn(&str, u16) -> String = match mode {
        TextWrap::Wrap => return wrap_words(text, max_width),
        TextWrap::Truncate | TextWrap::TruncateEnd => truncate_end,
        TextWrap::TruncateStart => truncate_start,
        TextWrap::TruncateMiddle => truncate_middle,
    };
    text.split('\n').map(|line| truncate(line, max_width)).collect()
}

/// Size of `text` shaped at `max_width`: (widest line, line count).
pub fn measure_text(text: &str, max_width: u16, mode: TextWrap) -> (u16, u16) {
    let lines = shape_text(text, max_width, mode);
    let width = lines.iter().map(|l| string_width(l)).max().unwrap_or(0);
    let height = lines.len().min(u16::MAX as usize) as u16;
    (width, height)
}
