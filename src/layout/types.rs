//! Layout input and output types.

use crate::primitives::Node;
use crate::types::{BorderStyle, ClipRect};

/// Viewport the root is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    pub width: u16,
    /// `None` lets the root take its content height.
    pub height: Option<u16>,
}

impl Constraints {
    pub const fn new(width: u16, height: Option<u16>) -> Self {
        Self { width, height }
    }

    /// From a possibly bogus viewport: negatives clamp to zero.
    pub fn from_viewport(width: i32, height: Option<i32>) -> Self {
        let clamp = |v: i32| v.clamp(0, u16::MAX as i32) as u16;
        Self {
            width: clamp(width),
            height: height.map(clamp),
        }
    }
}

/// Computed geometry for one laid-out node, in absolute cells.
///
/// `children` are the node's flattened items (fragments spliced,
/// components substituted), in layout order. Each box keeps the node it
/// was computed for, so the painter walks exactly what layout saw.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub node: Node,
    pub children: Vec<LayoutBox>,
}

impl LayoutBox {
    pub fn rect(&self) -> ClipRect {
        ClipRect::new(self.x, self.y, self.width, self.height)
    }

    /// Area inside border and padding. Equal to [`rect`](Self::rect) for leaves.
    pub fn content_rect(&self) -> ClipRect {
        let Node::Box(b) = &self.node else {
            return self.rect();
        };
        let border = b.props.border_style.width();
        let left = border.saturating_add(b.padding.left);
        let top = border.saturating_add(b.padding.top);
        let right = border.saturating_add(b.padding.right);
        let bottom = border.saturating_add(b.padding.bottom);
        ClipRect::new(
            self.x.saturating_add(left),
            self.y.saturating_add(top),
            self.width.saturating_sub(left.saturating_add(right)),
            self.height.saturating_sub(top.saturating_add(bottom)),
        )
    }

    pub fn has_border(&self) -> bool {
        matches!(&self.node, Node::Box(b) if b.props.border_style != BorderStyle::None)
    }

    /// Depth-first, parents before children.
    pub fn walk(&self, visit: &mut impl FnMut(&LayoutBox)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// First box (depth-first) whose node is text with exactly `content`.
    pub fn find_text(&self, content: &str) -> Option<&LayoutBox> {
        if matches!(&self.node, Node::Text(t) if t.content == content) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_text(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_viewport_clamps() {
        assert_eq!(Constraints::from_viewport(-5, Some(-1)), Constraints::new(0, Some(0)));
        assert_eq!(Constraints::from_viewport(100_000, None), Constraints::new(u16::MAX, None));
    }
}
