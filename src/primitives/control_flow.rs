//! Structural nodes and list/conditional helpers.
//!
//! Render functions re-run on every change, so conditionals and lists are
//! ordinary Rust: [`show`] and [`each`] just save a little ceremony and
//! always yield a [`Node`].

use std::rc::Rc;

use super::node::Node;

/// Flexible empty space. Grows along the parent's main axis.
pub fn spacer() -> Node {
    Node::Spacer
}

/// `count` empty lines (at least one).
pub fn newline(count: u16) -> Node {
    Node::Newline(count.max(1))
}

/// Group nodes without adding a box; they join the parent's item list.
pub fn fragment(children: Vec<Node>) -> Node {
    Node::Fragment(Rc::from(children))
}

/// `then()` when `condition` holds, else `otherwise()` or nothing.
pub fn show(
    condition: bool,
    then: impl FnOnce() -> Node,
    otherwise: Option<Box<dyn FnOnce() -> Node>>,
) -> Node {
    if condition {
        then()
    } else {
        otherwise.map_or_else(Node::empty, |f| f())
    }
}

/// Map each item to a node and splice the results in order.
pub fn each<T>(items: impl IntoIterator<Item = T>, mut render: impl FnMut(usize, T) -> Node) -> Node {
    fragment(
        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| render(i, item))
            .collect(),
    )
}
