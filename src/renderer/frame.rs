//! Frame - a 2D grid of cells.
//!
//! The painter draws into a [`Frame`]; the differ compares two of them.
//! All drawing goes through a clip rectangle, so nothing a node paints can
//! land outside the area it was given.
//!
//! Wide glyphs take two cells: the left one holds the character, the right
//! one is a continuation cell (`char == 0`). Overwriting either half blanks
//! the other, so a frame never holds half a glyph.

use unicode_segmentation::UnicodeSegmentation;

use crate::layout::text_measure::grapheme_width;
use crate::types::{Attr, BorderStyle, Cell, ClipRect, Rgba};

/// A width x height grid of cells, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl Frame {
    /// Blank frame in terminal-default colors.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::default(); width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn bounds(&self) -> ClipRect {
        ClipRect::new(0, 0, self.width, self.height)
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.in_bounds(x, y).then(|| &self.cells[self.index(x, y)])
    }

    /// One row of cells.
    pub fn row(&self, y: u16) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = self.index(0, y);
        Some(&self.cells[start..start + self.width as usize])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    // =========================================================================
    // Cell writes
    // =========================================================================

    /// Store `cell`, blanking the other half of any wide glyph it splits.
    fn put(&mut self, x: u16, y: u16, cell: Cell) {
        let i = self.index(x, y);
        let old = self.cells[i];
        if old.is_continuation() && !cell.is_continuation() && x > 0 {
            self.cells[i - 1].char = ' ' as u32;
        }
        if !old.is_continuation() && x + 1 < self.width && self.cells[i + 1].is_continuation() {
            self.cells[i + 1].char = ' ' as u32;
        }
        self.cells[i] = cell;
    }

    /// Write one cell if it is inside the frame and `clip`.
    ///
    /// `bg: None` (or a transparent color) keeps the background already
    /// there. Returns whether the cell was written.
    #[allow(clippy::too_many_arguments)]
    pub fn set_cell(
        &mut self,
        x: u16,
        y: u16,
        char: u32,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: &ClipRect,
    ) -> bool {
        if !self.in_bounds(x, y) || !clip.contains(x, y) {
            return false;
        }
        let under = self.cells[self.index(x, y)].bg;
        let bg = bg.filter(|c| !c.is_transparent()).unwrap_or(under);
        self.put(x, y, Cell { char, fg, bg, attrs });
        true
    }

    /// Paint `rect` with blank cells of color `bg`.
    pub fn fill_rect(&mut self, rect: ClipRect, bg: Rgba, clip: &ClipRect) {
        if bg.is_transparent() {
            return;
        }
        let Some(area) = rect
            .intersect(clip)
            .and_then(|r| r.intersect(&self.bounds()))
        else {
            return;
        };
        for y in area.y..area.bottom() {
            for x in area.x..area.right() {
                self.put(
                    x,
                    y,
                    Cell {
                        bg,
                        ..Cell::default()
                    },
                );
            }
        }
    }

    // =========================================================================
    // Text
    // =========================================================================

    /// Draw one line of text starting at `(x, y)`. Returns the columns
    /// advanced.
    ///
    /// A cluster keeps its base character. Zero-width clusters are skipped.
    /// A wide glyph whose right half would be clipped is drawn as a space.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_text(
        &mut self,
        x: u16,
        y: u16,
        text: &str,
        fg: Rgba,
        bg: Option<Rgba>,
        attrs: Attr,
        clip: &ClipRect,
    ) -> u16 {
        let limit = clip.right().min(self.width);
        let mut col = x;

        for grapheme in text.graphemes(true) {
            if col >= limit {
                break;
            }
            let width = grapheme_width(grapheme);
            let Some(ch) = grapheme.chars().next() else {
                continue;
            };
            if width == 0 {
                continue;
            }

            if width == 2 {
                if col + 1 < limit && clip.contains(col + 1, y) {
                    if self.set_cell(col, y, ch as u32, fg, bg, attrs, clip) {
                        self.set_cell(col + 1, y, Cell::CONTINUATION, fg, bg, attrs, clip);
                    }
                } else {
                    self.set_cell(col, y, ' ' as u32, fg, bg, attrs, clip);
                }
            } else {
                self.set_cell(col, y, ch as u32, fg, bg, attrs, clip);
            }
            col = col.saturating_add(width);
        }

        col.saturating_sub(x)
    }

    // =========================================================================
    // Borders
    // =========================================================================

    /// Draw a one-cell border along the edges of `rect`. Boxes smaller than
    /// 2x2 get no border.
    pub fn draw_border(
        &mut self,
        rect: ClipRect,
        style: BorderStyle,
        color: Rgba,
        bg: Option<Rgba>,
        clip: &ClipRect,
    ) {
        if rect.width < 2 || rect.height < 2 || style == BorderStyle::None {
            return;
        }
        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let (x, y) = (rect.x, rect.y);
        let x2 = rect.right() - 1;
        let y2 = rect.bottom() - 1;
        let mut edge = |cx: u16, cy: u16, ch: char| {
            self.set_cell(cx, cy, ch as u32, color, bg, Attr::NONE, clip);
        };

        edge(x, y, tl);
        edge(x2, y, tr);
        edge(x2, y2, br);
        edge(x, y2, bl);
        for col in (x + 1)..x2 {
            edge(col, y, horiz);
            edge(col, y2, horiz);
        }
        for row in (y + 1)..y2 {
            edge(x, row, vert);
            edge(x2, row, vert);
        }
    }

    // =========================================================================
    // Text export
    // =========================================================================

    /// Characters of each row, continuation cells skipped.
    pub fn to_lines(&self) -> Vec<String> {
        (0..self.height)
            .filter_map(|y| self.row(y))
            .map(|row| {
                row.iter()
                    .filter(|c| !c.is_continuation())
                    .filter_map(|c| char::from_u32(c.char))
                    .collect()
            })
            .collect()
    }
}
