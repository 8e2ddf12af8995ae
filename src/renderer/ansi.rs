//! ANSI escape sequences.
//!
//! Every helper writes into any [`Write`] sink; the cell encoder hands them
//! an [`OutputBuffer`](super::OutputBuffer) so a frame goes out in one write.

use std::io::{self, Write};

use crate::types::{Attr, Rgba};

// =============================================================================
// Cursor
// =============================================================================

/// Move to a 0-indexed cell.
#[inline]
pub fn cursor_to<W: Write>(w: &mut W, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", y as u32 + 1, x as u32 + 1)
}

pub fn cursor_hide<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

pub fn cursor_show<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// =============================================================================
// Screen
// =============================================================================

/// Erase the whole screen and home the cursor.
pub fn clear_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[2J\x1b[H")
}

pub fn enter_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

pub fn exit_alt_screen<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

/// Synchronized output (mode 2026). Terminals without it ignore the marker.
pub fn begin_sync<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2026h")
}

pub fn end_sync<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[?2026l")
}

// =============================================================================
// Style
// =============================================================================

/// Reset every SGR attribute and both colors.
pub fn reset<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Foreground color.
pub fn fg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() || color.is_transparent() {
        return w.write_all(b"\x1b[39m");
    }
    if color.is_ansi() {
        return match color.ansi_index() {
            i @ 0..=7 => write!(w, "\x1b[{}m", 30 + i),
            i @ 8..=15 => write!(w, "\x1b[{}m", 90 + i - 8),
            i => write!(w, "\x1b[38;5;{i}m"),
        };
    }
    write!(w, "\x1b[38;2;{};{};{}m", color.r, color.g, color.b)
}

/// Background color.
pub fn bg<W: Write>(w: &mut W, color: Rgba) -> io::Result<()> {
    if color.is_terminal_default() || color.is_transparent() {
        return w.write_all(b"\x1b[49m");
    }
    if color.is_ansi() {
        return match color.ansi_index() {
            i @ 0..=7 => write!(w, "\x1b[{}m", 40 + i),
            i @ 8..=15 => write!(w, "\x1b[{}m", 100 + i - 8),
            i => write!(w, "\x1b[48;5;{i}m"),
        };
    }
    write!(w, "\x1b[48;2;{};{};{}m", color.r, color.g, color.b)
}

/// SGR codes for `attrs` in one sequence. Writes nothing for no attributes.
pub fn attrs<W: Write>(w: &mut W, attrs: Attr) -> io::Result<()> {
    const CODES: [(Attr, u8); 8] = [
        (Attr::BOLD, 1),
        (Attr::DIM, 2),
        (Attr::ITALIC, 3),
        (Attr::UNDERLINE, 4),
        (Attr::BLINK, 5),
        (Attr::INVERSE, 7),
        (Attr::HIDDEN, 8),
        (Attr::STRIKETHROUGH, 9),
    ];
    if attrs.is_empty() {
        return Ok(());
    }
    w.write_all(b"\x1b[")?;
    let mut first = true;
    for (flag, code) in CODES {
        if attrs.contains(flag) {
            if !first {
                w.write_all(b";")?;
            }
            write!(w, "{code}")?;
            first = false;
        }
    }
    w.write_all(b"m")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_string(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_cursor_is_one_indexed() {
        assert_eq!(to_string(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
        assert_eq!(to_string(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn test_color_encodings() {
        assert_eq!(to_string(|w| fg(w, Rgba::TERMINAL_DEFAULT)), "\x1b[39m");
        assert_eq!(to_string(|w| fg(w, Rgba::ansi(1))), "\x1b[31m");
        assert_eq!(to_string(|w| fg(w, Rgba::ansi(9))), "\x1b[91m");
        assert_eq!(to_string(|w| fg(w, Rgba::ansi(200))), "\x1b[38;5;200m");
        assert_eq!(to_string(|w| fg(w, Rgba::rgb(1, 2, 3))), "\x1b[38;2;1;2;3m");
        assert_eq!(to_string(|w| bg(w, Rgba::ansi(4))), "\x1b[44m");
        assert_eq!(to_string(|w| bg(w, Rgba::ansi(12))), "\x1b[104m");
        assert_eq!(to_string(|w| bg(w, Rgba::TRANSPARENT)), "\x1b[49m");
    }

    #[test]
    fn test_attrs_joined() {
        assert_eq!(to_string(|w| attrs(w, Attr::NONE)), "");
        assert_eq!(
            to_string(|w| attrs(w, Attr::BOLD | Attr::ITALIC | Attr::STRIKETHROUGH)),
            "\x1b[1;3;9m"
        );
    }
}
