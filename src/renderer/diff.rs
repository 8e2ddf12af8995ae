//! Frame differ and terminal op encoder.
//!
//! # Algorithm
//!
//! 1. No previous frame, or a size change: `Clear`, then every row.
//! 2. Otherwise, per row: skip equal cells, coalesce each run of changed
//!    cells into one `Write`. A run never starts on the right half of a
//!    wide glyph (it backs up to the glyph) and never ends between the two
//!    halves.
//! 3. [`encode`] turns the ops into bytes with [`StatefulCellRenderer`],
//!    wrapped in synchronized-output markers.
//!
//! The [`Differ`] owns the previous frame. It only moves forward on
//! [`Differ::commit`], which the caller invokes once the bytes were written.

use std::io;

use super::ansi;
use super::frame::Frame;
use super::output::{OutputBuffer, StatefulCellRenderer};
use crate::types::Cell;

/// One terminal operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TermOp {
    /// Erase the screen.
    Clear,
    /// Move to `(x, y)` and write `cells` left to right.
    Write { x: u16, y: u16, cells: Vec<Cell> },
}

/// Ops that turn the screen showing `previous` into `next`.
pub fn diff(previous: Option<&Frame>, next: &Frame) -> Vec<TermOp> {
    let Some(previous) = previous.filter(|p| p.width() == next.width() && p.height() == next.height())
    else {
        return full(next);
    };

    let mut ops = Vec::new();
    for y in 0..next.height() {
        let (Some(old), Some(new)) = (previous.row(y), next.row(y)) else {
            continue;
        };
        diff_row(y, old, new, &mut ops);
    }
    ops
}

fn full(next: &Frame) -> Vec<TermOp> {
    let mut ops = Vec::with_capacity(next.height() as usize + 1);
    ops.push(TermOp::Clear);
    for y in 0..next.height() {
        if let Some(row) = next.row(y) {
            ops.push(TermOp::Write {
                x: 0,
                y,
                cells: row.to_vec(),
            });
        }
    }
    ops
}

fn diff_row(y: u16, old: &[Cell], new: &[Cell], ops: &mut Vec<TermOp>) {
    let width = new.len();
    let mut x = 0;
    while x < width {
        if old[x] == new[x] {
            x += 1;
            continue;
        }
        let start = if new[x].is_continuation() && x > 0 { x - 1 } else { x };
        let mut end = x + 1;
        while end < width && (old[end] != new[end] || new[end].is_continuation()) {
            end += 1;
        }
        ops.push(TermOp::Write {
            x: start as u16,
            y,
            cells: new[start..end].to_vec(),
        });
        x = end;
    }
}

/// Serialize `ops` into `out`. Nothing is written for an empty op list.
pub fn encode(ops: &[TermOp], out: &mut OutputBuffer) -> io::Result<()> {
    if ops.is_empty() {
        return Ok(());
    }
    let mut cells = StatefulCellRenderer::new();
    ansi::begin_sync(out)?;
    for op in ops {
        match op {
            TermOp::Clear => {
                ansi::reset(out)?;
                ansi::clear_screen(out)?;
                cells.reset();
            }
            TermOp::Write { x, y, cells: run } => {
                for (i, cell) in run.iter().enumerate() {
                    cells.render_cell(out, x.saturating_add(i as u16), *y, cell)?;
                }
            }
        }
    }
    ansi::reset(out)?;
    ansi::end_sync(out)
}

// =============================================================================
// Differ
// =============================================================================

/// Holds the frame currently on screen.
#[derive(Debug, Default)]
pub struct Differ {
    previous: Option<Frame>,
}

impl Differ {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ops from the committed frame to `next`.
    pub fn diff(&self, next: &Frame) -> Vec<TermOp> {
        diff(self.previous.as_ref(), next)
    }

    /// Record `frame` as on screen. Call only after its ops were written.
    pub fn commit(&mut self, frame: Frame) {
        self.previous = Some(frame);
    }

    /// Forget the screen contents; the next diff redraws everything.
    pub fn invalidate(&mut self) {
        self.previous = None;
    }

    pub fn previous(&self) -> Option<&Frame> {
        self.previous.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attr, Rgba};

    fn frame_with(width: u16, height: u16, text: &[(u16, u16, &str)]) -> Frame {
        let mut frame = Frame::new(width, height);
        let bounds = frame.bounds();
        for &(x, y, s) in text {
            frame.draw_text(x, y, s, Rgba::TERMINAL_DEFAULT, None, Attr::NONE, &bounds);
        }
        frame
    }

    fn chars(cells: &[Cell]) -> String {
        cells.iter().filter_map(|c| char::from_u32(c.char)).collect()
    }

    #[test]
    fn test_first_frame_clears_and_writes_all_rows() {
        let next = frame_with(3, 2, &[(0, 0, "ab")]);
        let ops = diff(None, &next);
        assert_eq!(ops.len(), 3);
        assert_eq!(ops[0], TermOp::Clear);
        assert!(matches!(&ops[1], TermOp::Write { x: 0, y: 0, cells } if chars(cells) == "ab "));
    }

    #[test]
    fn test_identical_frames_produce_no_ops() {
        let a = frame_with(5, 2, &[(0, 0, "hello")]);
        assert!(diff(Some(&a), &a.clone()).is_empty());
    }

    #[test]
    fn test_changed_cells_coalesce_per_run() {
        let a = frame_with(8, 2, &[(0, 0, "abcdefgh"), (0, 1, "xy")]);
        let b = frame_with(8, 2, &[(0, 0, "aXYdefgZ"), (0, 1, "xy")]);
        let ops = diff(Some(&a), &b);
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], TermOp::Write { x: 1, y: 0, cells } if chars(cells) == "XY"));
        assert!(matches!(&ops[1], TermOp::Write { x: 7, y: 0, cells } if chars(cells) == "Z"));
    }

    #[test]
    fn test_size_change_bootstraps() {
        let a = frame_with(4, 1, &[]);
        let b = frame_with(5, 1, &[]);
        assert_eq!(diff(Some(&a), &b)[0], TermOp::Clear);
    }

    #[test]
    fn test_run_backs_up_to_wide_glyph() {
        let mut a = frame_with(4, 1, &[(0, 0, "日")]);
        let b = a.clone();
        // Same glyph, only the continuation half differs.
        let bounds = a.bounds();
        a.set_cell(1, 0, Cell::CONTINUATION, Rgba::ansi(1), None, Attr::NONE, &bounds);
        let ops = diff(Some(&a), &b);
        assert_eq!(ops.len(), 1);
        match &ops[0] {
            TermOp::Write { x, cells, .. } => {
                assert_eq!(*x, 0);
                assert_eq!(cells.len(), 2);
                assert!(cells[1].is_continuation());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_encode_empty_writes_nothing() {
        let mut out = OutputBuffer::new();
        encode(&[], &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_encode_wraps_in_sync_markers() {
        let a = frame_with(3, 1, &[(0, 0, "ab")]);
        let b = frame_with(3, 1, &[(0, 0, "aZ")]);
        let mut out = OutputBuffer::new();
        encode(&diff(Some(&a), &b), &mut out).unwrap();
        let s = out.as_str();
        assert!(s.starts_with("\x1b[?2026h"));
        assert!(s.ends_with("\x1b[?2026l"));
        assert!(s.contains("\x1b[1;2H"));
        assert!(s.contains('Z'));
        assert!(!s.contains('a'));
    }

    #[test]
    fn test_differ_commit_and_invalidate() {
        let mut differ = Differ::new();
        let frame = frame_with(2, 1, &[(0, 0, "hi")]);
        assert_eq!(differ.diff(&frame)[0], TermOp::Clear);
        differ.commit(frame.clone());
        assert!(differ.diff(&frame).is_empty());
        differ.invalidate();
        assert!(differ.previous().is_none());
        assert_eq!(differ.diff(&frame).len(), 2);
    }
}
