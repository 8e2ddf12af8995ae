//! Box - the flex container.

use std::rc::Rc;

use super::node::{BoxNode, Node};
use super::types::BoxProps;

/// Build a container node.
///
/// Padding and margin shorthands are resolved here, once, so layout reads
/// plain [`Edges`](crate::types::Edges).
///
/// # Example
///
/// ```ignore
/// let row = box_primitive(
///     BoxProps { flex_direction: FlexDirection::Row, gap: 1, ..Default::default() },
///     vec![text(TextProps::default(), "a"), spacer(), text(TextProps::default(), "b")],
/// );
/// ```
pub fn box_primitive(props: BoxProps, children: Vec<Node>) -> Node {
    let padding = props.resolved_padding();
    let margin = props.resolved_margin();
    Node::Box(Rc::new(BoxNode {
        props,
        padding,
        margin,
        children,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Edges;

    #[test]
    fn test_box_resolves_spacing() {
        let node = box_primitive(
            BoxProps {
                padding_y: Some(2),
                margin_left: Some(4),
                ..Default::default()
            },
            vec![Node::Spacer],
        );
        let Node::Box(b) = node else {
            panic!("expected a box");
        };
        assert_eq!(b.padding, Edges { top: 2, right: 0, bottom: 2, left: 0 });
        assert_eq!(b.margin.left, 4);
        assert_eq!(b.children.len(), 1);
    }
}
