//! Output buffering and stateful cell encoding.
//!
//! A frame's bytes accumulate in an [`OutputBuffer`] and reach the terminal
//! in one write. [`StatefulCellRenderer`] remembers the cursor, colors and
//! attributes it last emitted so each cell costs only what changed.

use std::borrow::Cow;
use std::io::{self, Write};

use super::ansi;
use crate::types::{Attr, Cell, Rgba};

// =============================================================================
// OutputBuffer
// =============================================================================

/// Bytes waiting to be written to the terminal.
#[derive(Debug, Default, Clone)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16 * 1024)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Empty the buffer, keeping its allocation.
    #[inline]
    pub fn clear(&mut self) {
        self.data.clear();
    }

    #[inline]
    pub fn write_str(&mut self, s: &str) {
        self.data.extend_from_slice(s.as_bytes());
    }

    #[inline]
    pub fn write_char(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.data.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }

    /// Invalid codepoints are dropped.
    #[inline]
    pub fn write_codepoint(&mut self, cp: u32) {
        if let Some(c) = char::from_u32(cp) {
            self.write_char(c);
        }
    }

    /// Write everything to `writer` and flush it. The buffer is emptied
    /// only when the write succeeded.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if self.data.is_empty() {
            return Ok(());
        }
        writer.write_all(&self.data)?;
        writer.flush()?;
        self.data.clear();
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Lossy UTF-8 view, for tests and logging.
    pub fn as_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Hand the bytes over, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.data)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// StatefulCellRenderer
// =============================================================================

/// Encodes cells while tracking the terminal state it has produced.
///
/// Cursor moves are skipped for the next cell on the same row; colors and
/// attributes are emitted only when they differ from the previous cell.
#[derive(Debug)]
pub struct StatefulCellRenderer {
    last_x: i32,
    last_y: i32,
    last_fg: Option<Rgba>,
    last_bg: Option<Rgba>,
    last_attrs: Attr,
}

impl StatefulCellRenderer {
    pub fn new() -> Self {
        Self {
            last_x: -1,
            last_y: -1,
            last_fg: None,
            last_bg: None,
            last_attrs: Attr::NONE,
        }
    }

    /// Forget all tracked state. Call at the start of each frame.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Encode one cell at `(x, y)`.
    pub fn render_cell(&mut self, out: &mut OutputBuffer, x: u16, y: u16, cell: &Cell) -> io::Result<()> {
        // The wide glyph to the left already covers this cell.
        if cell.is_continuation() {
            self.last_x = x as i32;
            self.last_y = y as i32;
            return Ok(());
        }

        if y as i32 != self.last_y || x as i32 != self.last_x + 1 {
            ansi::cursor_to(out, x, y)?;
        }

        if cell.attrs != self.last_attrs {
            ansi::reset(out)?;
            ansi::attrs(out, cell.attrs)?;
            // SGR 0 also reset both colors.
            self.last_fg = None;
            self.last_bg = None;
            self.last_attrs = cell.attrs;
        }

        if self.last_fg != Some(cell.fg) {
            ansi::fg(out, cell.fg)?;
            self.last_fg = Some(cell.fg);
        }
        if self.last_bg != Some(cell.bg) {
            ansi::bg(out, cell.bg)?;
            self.last_bg = Some(cell.bg);
        }

        out.write_codepoint(cell.char);
        self.last_x = x as i32;
        self.last_y = y as i32;
        Ok(())
    }
}

impl Default for StatefulCellRenderer {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(c: char, fg: Rgba) -> Cell {
        Cell {
            char: c as u32,
            fg,
            ..Cell::default()
        }
    }

    #[test]
    fn test_flush_to_empties_buffer() {
        let mut buf = OutputBuffer::new();
        buf.write_str("hello");
        buf.write_char(' ');
        buf.write_codepoint('w' as u32);
        let mut sink = Vec::new();
        buf.flush_to(&mut sink).unwrap();
        assert_eq!(sink, b"hello w");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_failed_flush_keeps_bytes() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut buf = OutputBuffer::new();
        buf.write_str("x");
        assert!(buf.flush_to(&mut Broken).is_err());
        assert_eq!(buf.as_str(), "x");
    }

    #[test]
    fn test_sequential_cells_skip_cursor_and_colors() {
        let mut renderer = StatefulCellRenderer::new();
        let mut out = OutputBuffer::new();
        let red = Rgba::ansi(1);

        renderer.render_cell(&mut out, 0, 0, &cell('A', red)).unwrap();
        out.clear();
        renderer.render_cell(&mut out, 1, 0, &cell('B', red)).unwrap();
        assert_eq!(out.as_str(), "B");

        out.clear();
        renderer.render_cell(&mut out, 5, 0, &cell('C', red)).unwrap();
        assert_eq!(out.as_str(), "\x1b[1;6HC");
    }

    #[test]
    fn test_attr_change_resets_colors() {
        let mut renderer = StatefulCellRenderer::new();
        let mut out = OutputBuffer::new();
        renderer.render_cell(&mut out, 0, 0, &cell('A', Rgba::ansi(2))).unwrap();
        out.clear();

        let bold = Cell {
            attrs: Attr::BOLD,
            ..cell('B', Rgba::ansi(2))
        };
        renderer.render_cell(&mut out, 1, 0, &bold).unwrap();
        assert_eq!(out.as_str(), "\x1b[0m\x1b[1m\x1b[32m\x1b[49mB");
    }

    #[test]
    fn test_continuation_cell_writes_nothing() {
        let mut renderer = StatefulCellRenderer::new();
        let mut out = OutputBuffer::new();
        let continuation = Cell {
            char: Cell::CONTINUATION,
            ..Cell::default()
        };
        renderer.render_cell(&mut out, 0, 0, &continuation).unwrap();
        assert!(out.is_empty());
    }
}
