//! Layout Module
//!
//! Flexbox-style geometry for terminal UI. [`layout`] is a pure function of
//! a node tree and a viewport; it returns a [`LayoutBox`] tree in absolute
//! cell coordinates that the renderer paints directly.
//!
//! # Example
//!
//! ```ignore
//! use ember_tui::layout::{layout, Constraints};
//!
//! let tree = layout(&root, Constraints::new(80, Some(24)));
//! let greeting = tree.find_text("hello").unwrap();
//! assert_eq!(greeting.y, 0);
//! ```

mod distribute;
mod flex;
pub mod text_measure;
mod types;

pub use distribute::{distribute, shrink_amounts};
pub use flex::layout;
pub use text_measure::{measure_text, shape_text, string_width};
pub use types::{Constraints, LayoutBox};
