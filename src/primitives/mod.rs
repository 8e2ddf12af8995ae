//! Node constructors.
//!
//! - [`box_primitive`] - flex container with border, background and mouse callbacks
//! - [`text`] - styled text leaf
//! - [`spacer`], [`newline`], [`fragment`] - structural nodes
//!
//! Constructors return a [`Node`] value; nothing is mounted until a
//! component returns the tree from its render function.

mod box_primitive;
mod control_flow;
mod node;
mod text;
mod types;

pub use box_primitive::box_primitive;
pub use control_flow::{each, fragment, newline, show, spacer};
pub use node::{BoxNode, ComponentRef, Node, TextNode};
pub use text::{plain, text};
pub use types::{BoxProps, MouseCallback, TextProps};
