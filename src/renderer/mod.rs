//! Renderer - layout to terminal bytes
//!
//! ```text
//! LayoutBox ──paint──> Frame + HitRegistry ──diff──> Vec<TermOp> ──encode──> bytes
//! ```
//!
//! - [`paint`] fills a [`Frame`] and collects mouse hit regions
//! - [`diff`] compares against the previous frame held by a [`Differ`]
//! - [`encode`] writes the ops with minimal escape sequences

pub mod ansi;
mod diff;
mod frame;
mod output;
mod paint;

pub use diff::{Differ, TermOp, diff, encode};
pub use frame::Frame;
pub use output::{OutputBuffer, StatefulCellRenderer};
pub use paint::{PaintResult, paint};
