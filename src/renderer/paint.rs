//! Painter - LayoutBox tree to Frame.
//!
//! # Algorithm
//!
//! Depth-first in layout order, parents before children, so descendants
//! composite over their ancestors:
//!
//! 1. Box: background fill, then border, then hit region (if it has mouse
//!    callbacks), then children. `Overflow::Hidden` narrows the clip for the
//!    children to the box's content area.
//! 2. Text: shaped with the same [`shape_text`] layout used, one line per
//!    row, clipped to the text's own box.
//! 3. Spacer and Newline paint nothing.
//!
//! Hit regions are registered in paint order, so the registry's last match
//! is the deepest box.

use crate::layout::{LayoutBox, shape_text};
use crate::primitives::{BoxNode, Node, TextNode};
use crate::state::mouse::{HitRegion, HitRegistry};
use crate::types::{ClipRect, ColorValue, Overflow, Rgba};

use super::frame::Frame;

/// A painted frame plus the hit regions collected while painting it.
#[derive(Debug, Clone)]
pub struct PaintResult {
    pub frame: Frame,
    pub hits: HitRegistry,
}

/// Paint `layout` into a fresh `width` x `height` frame.
pub fn paint(layout: &LayoutBox, width: u16, height: u16) -> PaintResult {
    let mut frame = Frame::new(width, height);
    let mut hits = HitRegistry::new();
    let clip = frame.bounds();
    paint_node(layout, &mut frame, &mut hits, clip);
    tracing::trace!(width, height, regions = hits.len(), "painted");
    PaintResult { frame, hits }
}

fn paint_node(lb: &LayoutBox, frame: &mut Frame, hits: &mut HitRegistry, clip: ClipRect) {
    let Some(visible) = lb.rect().intersect(&clip) else {
        return;
    };
    match &lb.node {
        Node::Box(b) => paint_box(lb, b, visible, frame, hits, clip),
        Node::Text(t) => paint_text(lb, t, visible, frame),
        // Fragments and components are flattened away by layout.
        Node::Spacer | Node::Newline(_) | Node::Fragment(_) | Node::Component(_) => {}
    }
}

fn paint_box(
    lb: &LayoutBox,
    b: &BoxNode,
    visible: ClipRect,
    frame: &mut Frame,
    hits: &mut HitRegistry,
    clip: ClipRect,
) {
    let props = &b.props;
    let background = props.background_color.as_ref().map(ColorValue::resolve);
    if let Some(bg) = background {
        frame.fill_rect(visible, bg, &clip);
    }
    if lb.has_border() {
        let color = resolve_or_default(props.border_color.as_ref());
        frame.draw_border(lb.rect(), props.border_style, color, background, &clip);
    }
    if props.on_click.is_some() || props.on_scroll.is_some() {
        hits.register(HitRegion {
            rect: visible,
            on_click: props.on_click.clone(),
            on_scroll: props.on_scroll.clone(),
        });
    }

    let child_clip = match props.overflow {
        Overflow::Hidden => match lb.content_rect().intersect(&clip) {
            Some(inner) => inner,
            None => return,
        },
        Overflow::Visible => clip,
    };
    for child in &lb.children {
        paint_node(child, frame, hits, child_clip);
    }
}

fn paint_text(lb: &LayoutBox, t: &TextNode, visible: ClipRect, frame: &mut Frame) {
    let props = &t.props;
    let fg = resolve_or_default(props.color.as_ref());
    let bg = props.background_color.as_ref().map(ColorValue::resolve);
    let attrs = props.attrs();

    let lines = shape_text(&t.content, lb.width, props.wrap);
    for (row, line) in lines.iter().enumerate().take(lb.height as usize) {
        let y = lb.y.saturating_add(row as u16);
        frame.draw_text(lb.x, y, line, fg, bg, attrs, &visible);
    }
}

fn resolve_or_default(color: Option<&ColorValue>) -> Rgba {
    color.map_or(Rgba::TERMINAL_DEFAULT, ColorValue::resolve)
}
