//! Text - a styled leaf.

use std::rc::Rc;

use super::node::{Node, TextNode};
use super::types::TextProps;

/// Build a text node.
///
/// ```ignore
/// text(TextProps { bold: true, color: Some("green".into()), ..Default::default() },
///      format!("Count: {count}"))
/// ```
pub fn text(props: TextProps, content: impl Into<String>) -> Node {
    Node::Text(Rc::new(TextNode {
        content: content.into(),
        props,
    }))
}

/// Unstyled text.
pub fn plain(content: impl Into<String>) -> Node {
    text(TextProps::default(), content)
}
