//! The node tree.
//!
//! A [`Node`] is an immutable description of UI. It is a closed enum, so
//! layout and paint match on it exhaustively. Payloads sit behind `Rc`, so
//! cloning a whole subtree is a handful of refcount bumps.

use std::fmt;
use std::rc::Rc;

use crate::reactive::Signal;
use crate::types::Edges;

use super::types::{BoxProps, TextProps};

#[derive(Clone)]
pub enum Node {
    /// Flex container.
    Box(Rc<BoxNode>),
    /// Styled text leaf.
    Text(Rc<TextNode>),
    /// Flexible empty space (grow 1 along the parent's main axis).
    Spacer,
    /// `n` empty lines.
    Newline(u16),
    /// Children spliced into the parent's item list.
    Fragment(Rc<[Node]>),
    /// A mounted child component; its current output takes its place.
    Component(ComponentRef),
}

pub struct BoxNode {
    pub props: BoxProps,
    pub padding: Edges,
    pub margin: Edges,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub content: String,
    pub props: TextProps,
}

/// Handle to a child component's latest output.
///
/// Reading it through layout subscribes the frame to that component only,
/// so a child re-render repaints without re-running its parent.
#[derive(Clone)]
pub struct ComponentRef {
    name: &'static str,
    output: Signal<Node>,
}

impl ComponentRef {
    pub(crate) fn new(name: &'static str, output: Signal<Node>) -> Self {
        Self { name, output }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current output, tracked.
    pub fn output(&self) -> Node {
        self.output.get()
    }
}

impl Node {
    /// A node that renders nothing.
    pub fn empty() -> Self {
        Node::Fragment(Rc::from(Vec::new()))
    }

    /// Append this node's layout items to `out`, splicing fragments and
    /// substituting component output.
    pub(crate) fn flatten_into(&self, out: &mut Vec<Node>) {
        match self {
            Node::Fragment(children) => {
                for child in children.iter() {
                    child.flatten_into(out);
                }
            }
            Node::Component(component) => component.output().flatten_into(out),
            Node::Box(_) | Node::Text(_) | Node::Spacer | Node::Newline(_) => {
                out.push(self.clone())
            }
        }
    }

    /// Flattened items of a child list.
    pub(crate) fn flatten(children: &[Node]) -> Vec<Node> {
        let mut out = Vec::with_capacity(children.len());
        for child in children {
            child.flatten_into(&mut out);
        }
        out
    }
}

impl From<Vec<Node>> for Node {
    fn from(children: Vec<Node>) -> Self {
        Node::Fragment(Rc::from(children))
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Box(b) => f
                .debug_struct("Box")
                .field("props", &b.props)
                .field("children", &b.children)
                .finish(),
            Node::Text(t) => f.debug_tuple("Text").field(&t.content).finish(),
            Node::Spacer => f.write_str("Spacer"),
            Node::Newline(n) => f.debug_tuple("Newline").field(n).finish(),
            Node::Fragment(children) => f.debug_list().entries(children.iter()).finish(),
            Node::Component(c) => f.debug_tuple("Component").field(&c.name).finish(),
        }
    }
}
