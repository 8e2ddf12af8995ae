//! Single-line flexbox solver.
//!
//! # Algorithm
//!
//! For each box, top-down:
//!
//! 1. Flatten children into items (fragments spliced, components
//!    substituted by their current output).
//! 2. Base main size per item: explicit `width`/`height`, else
//!    `flex_basis`, else intrinsic size. Column items resolve their cross
//!    size first so text wraps at the width it will actually get.
//! 3. Free space goes to `flex_grow` items; overflow is taken from items
//!    weighted by `flex_shrink × base`. Both use largest-remainder
//!    rounding, then `min_*`/`max_*` clamps.
//! 4. A final pass clamps items so none extends past the content box.
//! 5. `justify_content` spreads what is left; `align_items`/`align_self`
//!    place each item on the cross axis. Reverse directions mirror the
//!    main position.
//!
//! All arithmetic saturates; a zero or negative viewport yields zero
//! sizes, never wrapped-around geometry.

use crate::primitives::{BoxNode, BoxProps, Node, box_primitive};
use crate::types::{AlignItems, ClipRect, Dimension, Edges, FlexDirection, JustifyContent};

use super::distribute::{distribute, shrink_amounts};
use super::text_measure::measure_text;
use super::types::{Constraints, LayoutBox};

// =============================================================================
// ENTRY POINT
// =============================================================================

/// Lay out `node` against the viewport.
///
/// The root takes the viewport width (or its explicit width, clamped). Its
/// height is the explicit height, else its content height, clamped to the
/// viewport height when one is given.
pub fn layout(node: &Node, constraints: Constraints) -> LayoutBox {
    let root = root_node(node);
    let style = ItemStyle::of(&root, AlignItems::Stretch);
    let avail_w = constraints.width.saturating_sub(style.margin.horizontal());
    let avail_h = constraints
        .height
        .map(|h| h.saturating_sub(style.margin.vertical()));

    let width = match style.width.resolve(avail_w) {
        Some(w) => clamp_dim(w, style.min_width, style.max_width, Some(avail_w)),
        None => avail_w,
    }
    .min(avail_w);

    let height = match resolve_opt(style.height, avail_h) {
        Some(h) => clamp_dim(h, style.min_height, style.max_height, avail_h),
        None => height_at(&root, width, avail_h),
    };
    let height = avail_h.map_or(height, |h| height.min(h));

    tracing::trace!(width, height, "layout root");
    place(&root, style.margin.left, style.margin.top, width, height)
}

/// A single root item, or an implicit column box around several.
fn root_node(node: &Node) -> Node {
    let mut items = Node::flatten(std::slice::from_ref(node));
    if items.len() == 1 {
        items.swap_remove(0)
    } else {
        box_primitive(BoxProps::default(), items)
    }
}

// =============================================================================
// ITEM STYLE
// =============================================================================

/// The flex-item view of any node.
#[derive(Debug, Clone, Copy)]
struct ItemStyle {
    margin: Edges,
    grow: f32,
    shrink: f32,
    basis: Dimension,
    width: Dimension,
    height: Dimension,
    min_width: Dimension,
    min_height: Dimension,
    max_width: Dimension,
    max_height: Dimension,
    align: AlignItems,
}

impl ItemStyle {
    fn leaf(align: AlignItems) -> Self {
        Self {
            margin: Edges::ZERO,
            grow: 0.0,
            shrink: 1.0,
            basis: Dimension::Auto,
            width: Dimension::Auto,
            height: Dimension::Auto,
            min_width: Dimension::Auto,
            min_height: Dimension::Auto,
            max_width: Dimension::Auto,
            max_height: Dimension::Auto,
            align,
        }
    }

    fn of(node: &Node, parent_align: AlignItems) -> Self {
        match node {
            Node::Box(b) => {
                let p = &b.props;
                Self {
                    margin: b.margin,
                    grow: p.flex_grow,
                    shrink: p.flex_shrink.unwrap_or(1.0),
                    basis: p.flex_basis,
                    width: p.width,
                    height: p.height,
                    min_width: p.min_width,
                    min_height: p.min_height,
                    max_width: p.max_width,
                    max_height: p.max_height,
                    align: p.align_self.resolve(parent_align),
                }
            }
            Node::Spacer => Self {
                grow: 1.0,
                ..Self::leaf(parent_align)
            },
            Node::Text(_) | Node::Newline(_) | Node::Fragment(_) | Node::Component(_) => {
                Self::leaf(parent_align)
            }
        }
    }

    /// (size, min, max) along the main axis.
    fn main_dims(&self, is_row: bool) -> (Dimension, Dimension, Dimension) {
        if is_row {
            (self.width, self.min_width, self.max_width)
        } else {
            (self.height, self.min_height, self.max_height)
        }
    }

    /// (start, end) margins along the main axis, in flow order.
    fn main_margins(&self, dir: FlexDirection) -> (u16, u16) {
        let m = self.margin;
        match dir {
            FlexDirection::Row => (m.left, m.right),
            FlexDirection::RowReverse => (m.right, m.left),
            FlexDirection::Column => (m.top, m.bottom),
            FlexDirection::ColumnReverse => (m.bottom, m.top),
        }
    }

    fn main_margin_total(&self, is_row: bool) -> u16 {
        if is_row {
            self.margin.horizontal()
        } else {
            self.margin.vertical()
        }
    }
}

// =============================================================================
// DIMENSION HELPERS
// =============================================================================

/// Resolve against a container that may be indefinite; percentages of an
/// indefinite container behave like `Auto`.
fn resolve_opt(dim: Dimension, container: Option<u16>) -> Option<u16> {
    match dim {
        Dimension::Auto => None,
        Dimension::Cells(n) => Some(n),
        Dimension::Percent(_) => container.and_then(|c| dim.resolve(c)),
    }
}

/// Apply `max` then `min` (min wins when they conflict).
fn clamp_dim(value: u16, min: Dimension, max: Dimension, container: Option<u16>) -> u16 {
    let mut v = value;
    if let Some(max) = resolve_opt(max, container) {
        v = v.min(max);
    }
    if let Some(min) = resolve_opt(min, container) {
        v = v.max(min);
    }
    v
}

/// Border plus padding: (horizontal, vertical).
fn frame(b: &BoxNode) -> (u16, u16) {
    let border = b.props.border_style.width().saturating_mul(2);
    (
        border.saturating_add(b.padding.horizontal()),
        border.saturating_add(b.padding.vertical()),
    )
}

fn gap_total(gap: u16, count: usize) -> u16 {
    let gaps = count.saturating_sub(1).min(u16::MAX as usize) as u16;
    gap.saturating_mul(gaps)
}

// =============================================================================
// INTRINSIC SIZES
// =============================================================================

/// Content-based width when at most `avail` cells are offered.
fn natural_width(node: &Node, avail: u16) -> u16 {
    match node {
        Node::Text(t) => measure_text(&t.content, avail, t.props.wrap).0,
        Node::Spacer | Node::Newline(_) => 0,
        Node::Fragment(_) | Node::Component(_) => Node::flatten(std::slice::from_ref(node))
            .iter()
            .map(|n| natural_width(n, avail))
            .max()
            .unwrap_or(0),
        Node::Box(b) => {
            let style = ItemStyle::of(node, AlignItems::Stretch);
            if let Some(w) = style.width.resolve(avail) {
                return clamp_dim(w, style.min_width, style.max_width, Some(avail));
            }
            let (frame_w, _) = frame(b);
            let inner = avail.saturating_sub(frame_w);
            let items = Node::flatten(&b.children);

            let outer = |item: &Node| {
                let m = ItemStyle::of(item, b.props.align_items).margin.horizontal();
                natural_width(item, inner.saturating_sub(m)).saturating_add(m)
            };
            let content = if b.props.flex_direction.is_row() {
                items
                    .iter()
                    .fold(gap_total(b.props.gap, items.len()), |acc, item| {
                        acc.saturating_add(outer(item))
                    })
            } else {
                items.iter().map(outer).max().unwrap_or(0)
            };
            clamp_dim(
                content.saturating_add(frame_w),
                style.min_width,
                style.max_width,
                Some(avail),
            )
        }
    }
}

/// Border-box height of `node` once it is `width` cells wide.
fn height_at(node: &Node, width: u16, container_h: Option<u16>) -> u16 {
    match node {
        Node::Text(t) => measure_text(&t.content, width, t.props.wrap).1,
        Node::Newline(n) => *n,
        Node::Spacer => 0,
        Node::Fragment(_) | Node::Component(_) => Node::flatten(std::slice::from_ref(node))
            .iter()
            .fold(0u16, |acc, n| acc.saturating_add(height_at(n, width, container_h))),
        Node::Box(b) => {
            let style = ItemStyle::of(node, AlignItems::Stretch);
            if let Some(h) = resolve_opt(style.height, container_h) {
                return clamp_dim(h, style.min_height, style.max_height, container_h);
            }
            let (frame_w, frame_h) = frame(b);
            let inner_w = width.saturating_sub(frame_w);
            let items = Node::flatten(&b.children);
            let styles: Vec<ItemStyle> = items
                .iter()
                .map(|n| ItemStyle::of(n, b.props.align_items))
                .collect();

            let content = if b.props.flex_direction.is_row() {
                let bases: Vec<u16> = items
                    .iter()
                    .zip(&styles)
                    .map(|(item, s)| base_main(item, s, true, Some(inner_w), 0))
                    .collect();
                let mains = resolve_main(&bases, &styles, true, inner_w, b.props.gap, Some(inner_w));
                items
                    .iter()
                    .zip(&styles)
                    .zip(&mains)
                    .map(|((item, s), &main)| {
                        let h = resolve_opt(s.height, None)
                            .unwrap_or_else(|| height_at(item, main, None));
                        clamp_dim(h, s.min_height, s.max_height, None)
                            .saturating_add(s.margin.vertical())
                    })
                    .max()
                    .unwrap_or(0)
            } else {
                items.iter().zip(&styles).fold(
                    gap_total(b.props.gap, items.len()),
                    |acc, (item, s)| {
                        let cross = column_cross(item, s, inner_w);
                        acc.saturating_add(base_main(item, s, false, None, cross))
                            .saturating_add(s.margin.vertical())
                    },
                )
            };
            clamp_dim(
                content.saturating_add(frame_h),
                style.min_height,
                style.max_height,
                container_h,
            )
        }
    }
}

// =============================================================================
// FLEX RESOLUTION
// =============================================================================

/// Width of an item in a column container whose content box is
/// `container_w` wide.
fn column_cross(item: &Node, s: &ItemStyle, container_w: u16) -> u16 {
    let avail = container_w.saturating_sub(s.margin.horizontal());
    let width = match s.width.resolve(container_w) {
        Some(w) => w,
        None if s.align == AlignItems::Stretch => avail,
        None => natural_width(item, avail),
    };
    clamp_dim(width, s.min_width, s.max_width, Some(container_w)).min(avail)
}

/// Height of an item in a row container once its width is `main`.
fn row_cross(item: &Node, s: &ItemStyle, main: u16, container_h: u16) -> u16 {
    let avail = container_h.saturating_sub(s.margin.vertical());
    let height = match resolve_opt(s.height, Some(container_h)) {
        Some(h) => h,
        None if s.align == AlignItems::Stretch => avail,
        None => height_at(item, main, Some(container_h)),
    };
    clamp_dim(height, s.min_height, s.max_height, Some(container_h)).min(avail)
}

/// Hypothetical main size before grow/shrink.
fn base_main(item: &Node, s: &ItemStyle, is_row: bool, container: Option<u16>, cross: u16) -> u16 {
    let (size, min, max) = s.main_dims(is_row);
    let base = resolve_opt(size, container)
        .or_else(|| resolve_opt(s.basis, container))
        .unwrap_or_else(|| {
            if is_row {
                let avail = container.unwrap_or(u16::MAX);
                natural_width(item, avail.saturating_sub(s.margin.horizontal()))
            } else {
                height_at(item, cross, container)
            }
        });
    clamp_dim(base, min, max, container)
}

/// Grow or shrink bases to fit `main_size`.
fn resolve_main(
    bases: &[u16],
    styles: &[ItemStyle],
    is_row: bool,
    main_size: u16,
    gap: u16,
    container: Option<u16>,
) -> Vec<u16> {
    let used: u32 = bases
        .iter()
        .zip(styles)
        .map(|(&b, s)| u32::from(b) + u32::from(s.main_margin_total(is_row)))
        .sum::<u32>()
        + u32::from(gap_total(gap, bases.len()));
    let main = u32::from(main_size);
    let mut sizes = bases.to_vec();

    if used < main {
        let grows: Vec<f32> = styles.iter().map(|s| s.grow).collect();
        let extra = distribute((main - used) as u16, &grows);
        for (size, add) in sizes.iter_mut().zip(extra) {
            *size = size.saturating_add(add);
        }
    } else if used > main {
        let overflow = (used - main).min(u32::from(u16::MAX)) as u16;
        let shrinks: Vec<f32> = styles.iter().map(|s| s.shrink).collect();
        let taken = shrink_amounts(bases, &shrinks, overflow);
        for (size, cut) in sizes.iter_mut().zip(taken) {
            *size = size.saturating_sub(cut);
        }
    }

    for (size, s) in sizes.iter_mut().zip(styles) {
        let (_, min, max) = s.main_dims(is_row);
        *size = clamp_dim(*size, min, max, container);
    }
    sizes
}

/// Free space before the first item, between items, and after the last
/// (`count + 1` slots).
fn justify_slots(mode: JustifyContent, remaining: u16, count: usize) -> Vec<u16> {
    let mut slots = vec![0u16; count + 1];
    if count == 0 {
        return slots;
    }
    match mode {
        JustifyContent::FlexStart => slots[count] = remaining,
        JustifyContent::FlexEnd => slots[0] = remaining,
        JustifyContent::Center => {
            slots[0] = remaining / 2;
            slots[count] = remaining - remaining / 2;
        }
        JustifyContent::SpaceBetween if count > 1 => {
            let between = distribute(remaining, &vec![1.0; count - 1]);
            slots[1..count].copy_from_slice(&between);
        }
        JustifyContent::SpaceBetween => slots[count] = remaining,
        JustifyContent::SpaceAround => {
            let mut weights = vec![1.0; count + 1];
            weights[0] = 0.5;
            weights[count] = 0.5;
            slots = distribute(remaining, &weights);
        }
        JustifyContent::SpaceEvenly => slots = distribute(remaining, &vec![1.0; count + 1]),
    }
    slots
}

// =============================================================================
// PLACEMENT
// =============================================================================

fn place(node: &Node, x: u16, y: u16, width: u16, height: u16) -> LayoutBox {
    let mut out = LayoutBox {
        x,
        y,
        width,
        height,
        node: node.clone(),
        children: Vec::new(),
    };
    if let Node::Box(b) = node {
        let content = out.content_rect();
        out.children = layout_children(b, content);
    }
    out
}

fn layout_children(b: &BoxNode, content: ClipRect) -> Vec<LayoutBox> {
    let items = Node::flatten(&b.children);
    let count = items.len();
    if count == 0 {
        return Vec::new();
    }

    let dir = b.props.flex_direction;
    let is_row = dir.is_row();
    let gap = b.props.gap;
    let (main_size, cross_size) = if is_row {
        (content.width, content.height)
    } else {
        (content.height, content.width)
    };
    let styles: Vec<ItemStyle> = items
        .iter()
        .map(|n| ItemStyle::of(n, b.props.align_items))
        .collect();

    // Column items know their width up front.
    let column_widths: Vec<u16> = if is_row {
        vec![0; count]
    } else {
        items
            .iter()
            .zip(&styles)
            .map(|(item, s)| column_cross(item, s, cross_size))
            .collect()
    };

    let bases: Vec<u16> = (0..count)
        .map(|i| base_main(&items[i], &styles[i], is_row, Some(main_size), column_widths[i]))
        .collect();
    let mut mains = resolve_main(&bases, &styles, is_row, main_size, gap, Some(main_size));

    // Never extend past the content box.
    let mut cursor = 0u16;
    for (i, (main, s)) in mains.iter_mut().zip(&styles).enumerate() {
        let (m_start, m_end) = s.main_margins(dir);
        let start = cursor.saturating_add(m_start);
        *main = (*main).min(main_size.saturating_sub(start));
        cursor = start.saturating_add(*main).saturating_add(m_end);
        if i + 1 < count {
            cursor = cursor.saturating_add(gap);
        }
    }
    let remaining = main_size.saturating_sub(cursor);

    let crosses: Vec<u16> = if is_row {
        (0..count)
            .map(|i| row_cross(&items[i], &styles[i], mains[i], cross_size))
            .collect()
    } else {
        column_widths
    };

    let slots = justify_slots(b.props.justify_content, remaining, count);
    let mut out = Vec::with_capacity(count);
    let mut pos = slots[0];

    for i in 0..count {
        let s = &styles[i];
        let (m_start, m_end) = s.main_margins(dir);
        let (mc_start, mc_end) = if is_row {
            (s.margin.top, s.margin.bottom)
        } else {
            (s.margin.left, s.margin.right)
        };

        let size = mains[i];
        let main_pos = pos.saturating_add(m_start);
        let physical_main = if dir.is_reverse() {
            main_size.saturating_sub(main_pos.saturating_add(size))
        } else {
            main_pos
        };

        let cross_avail = cross_size.saturating_sub(mc_start.saturating_add(mc_end));
        let cross = crosses[i].min(cross_avail);
        let cross_pos = mc_start.saturating_add(match s.align {
            AlignItems::Center => (cross_avail - cross) / 2,
            AlignItems::FlexEnd => cross_avail - cross,
            AlignItems::FlexStart | AlignItems::Stretch => 0,
        });

        let (x, y, w, h) = if is_row {
            (content.x.saturating_add(physical_main), content.y.saturating_add(cross_pos), size, cross)
        } else {
            (content.x.saturating_add(cross_pos), content.y.saturating_add(physical_main), cross, size)
        };
        out.push(place(&items[i], x, y, w, h));

        pos = main_pos
            .saturating_add(size)
            .saturating_add(m_end)
            .saturating_add(gap)
            .saturating_add(slots[i + 1]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{TextProps, fragment, plain, spacer, text};
    use crate::types::{AlignSelf, BorderStyle, TextWrap};

    fn row(props: BoxProps, children: Vec<Node>) -> Node {
        box_primitive(
            BoxProps {
                flex_direction: FlexDirection::Row,
                ..props
            },
            children,
        )
    }

    fn fixed(width: u16) -> Node {
        box_primitive(
            BoxProps {
                width: Dimension::Cells(width),
                ..Default::default()
            },
            vec![],
        )
    }

    fn grower() -> Node {
        box_primitive(
            BoxProps {
                flex_grow: 1.0,
                ..Default::default()
            },
            vec![],
        )
    }

    fn xs(lb: &LayoutBox) -> Vec<(u16, u16)> {
        lb.children.iter().map(|c| (c.x, c.width)).collect()
    }

    #[test]
    fn test_grow_child_takes_exact_remainder() {
        let tree = row(BoxProps::default(), vec![fixed(5), fixed(7), grower()]);
        let lb = layout(&tree, Constraints::new(30, Some(10)));
        assert_eq!(xs(&lb), vec![(0, 5), (5, 7), (12, 18)]);
    }

    #[test]
    fn test_grow_split_sums_to_free_space() {
        let tree = row(BoxProps::default(), vec![grower(), grower(), grower()]);
        let lb = layout(&tree, Constraints::new(10, None));
        assert_eq!(xs(&lb), vec![(0, 4), (4, 3), (7, 3)]);
    }

    #[test]
    fn test_column_stacks_and_stretches() {
        let tree = box_primitive(BoxProps::default(), vec![plain("hello"), plain("world!")]);
        let lb = layout(&tree, Constraints::new(20, None));
        assert_eq!(lb.height, 2);
        let kids: Vec<_> = lb.children.iter().map(|c| (c.y, c.width, c.height)).collect();
        assert_eq!(kids, vec![(0, 20, 1), (1, 20, 1)]);
    }

    #[test]
    fn test_root_height_clamps_to_viewport() {
        let lines: Vec<Node> = (0..10).map(|i| plain(format!("line {i}"))).collect();
        let lb = layout(&fragment(lines), Constraints::new(20, Some(4)));
        assert_eq!(lb.height, 4);
        assert!(lb.children.iter().all(|c| c.y + c.height <= 4));
    }

    #[test]
    fn test_border_and_padding_offset_content() {
        let tree = box_primitive(
            BoxProps {
                border_style: BorderStyle::Single,
                padding: Some(1),
                ..Default::default()
            },
            vec![plain("x")],
        );
        let lb = layout(&tree, Constraints::new(20, None));
        assert_eq!((lb.width, lb.height), (20, 5));
        let child = &lb.children[0];
        assert_eq!((child.x, child.y, child.width, child.height), (2, 2, 16, 1));
    }

    #[test]
    fn test_justify_modes() {
        let make = |justify| {
            row(
                BoxProps {
                    justify_content: justify,
                    ..Default::default()
                },
                vec![plain("ab"), plain("cd")],
            )
        };
        let at = |justify| {
            layout(&make(justify), Constraints::new(10, None))
                .children
                .iter()
                .map(|c| c.x)
                .collect::<Vec<_>>()
        };
        assert_eq!(at(JustifyContent::FlexStart), vec![0, 2]);
        assert_eq!(at(JustifyContent::FlexEnd), vec![6, 8]);
        assert_eq!(at(JustifyContent::Center), vec![3, 5]);
        assert_eq!(at(JustifyContent::SpaceBetween), vec![0, 8]);
        assert_eq!(at(JustifyContent::SpaceEvenly), vec![2, 6]);
    }

    #[test]
    fn test_row_reverse_mirrors() {
        let tree = box_primitive(
            BoxProps {
                flex_direction: FlexDirection::RowReverse,
                ..Default::default()
            },
            vec![plain("ab"), plain("cd")],
        );
        let lb = layout(&tree, Constraints::new(10, None));
        assert_eq!(xs(&lb), vec![(8, 2), (6, 2)]);
    }

    #[test]
    fn test_overflow_shrinks_and_stays_inside() {
        let tree = row(BoxProps::default(), vec![plain("abcd"), plain("efgh")]);
        let lb = layout(&tree, Constraints::new(6, None));
        assert_eq!(xs(&lb), vec![(0, 3), (3, 3)]);
        assert_eq!(lb.height, 2);

        let rigid = |w| {
            box_primitive(
                BoxProps {
                    width: Dimension::Cells(w),
                    flex_shrink: Some(0.0),
                    ..Default::default()
                },
                vec![],
            )
        };
        let lb = layout(&row(BoxProps::default(), vec![rigid(4), rigid(4)]), Constraints::new(6, None));
        assert_eq!(xs(&lb), vec![(0, 4), (4, 2)]);
    }

    #[test]
    fn test_negative_viewport_is_zero_sized() {
        let tree = row(BoxProps::default(), vec![plain("abc"), spacer()]);
        let lb = layout(&tree, Constraints::from_viewport(-10, Some(-3)));
        assert_eq!((lb.width, lb.height), (0, 0));
        lb.walk(&mut |b| assert_eq!(b.width, 0));
    }

    #[test]
    fn test_percent_and_max_width() {
        let tree = row(
            BoxProps::default(),
            vec![
                box_primitive(
                    BoxProps {
                        width: Dimension::Percent(25.0),
                        ..Default::default()
                    },
                    vec![],
                ),
                box_primitive(
                    BoxProps {
                        flex_grow: 1.0,
                        max_width: Dimension::Cells(5),
                        ..Default::default()
                    },
                    vec![],
                ),
            ],
        );
        let lb = layout(&tree, Constraints::new(40, None));
        assert_eq!(xs(&lb), vec![(0, 10), (10, 5)]);
    }

    #[test]
    fn test_spacer_pushes_items_apart() {
        let tree = row(BoxProps::default(), vec![plain("a"), spacer(), plain("b")]);
        let lb = layout(&tree, Constraints::new(10, None));
        assert_eq!(lb.children[2].x, 9);
    }

    #[test]
    fn test_cross_alignment() {
        let tree = row(
            BoxProps {
                height: Dimension::Cells(5),
                align_items: AlignItems::Center,
                ..Default::default()
            },
            vec![
                plain("mid"),
                box_primitive(
                    BoxProps {
                        align_self: AlignSelf::FlexEnd,
                        height: Dimension::Cells(2),
                        ..Default::default()
                    },
                    vec![],
                ),
            ],
        );
        let lb = layout(&tree, Constraints::new(10, Some(10)));
        assert_eq!(lb.height, 5);
        assert_eq!((lb.children[0].y, lb.children[0].height), (2, 1));
        assert_eq!((lb.children[1].y, lb.children[1].height), (3, 2));
    }

    #[test]
    fn test_text_wraps_in_narrow_column() {
        let tree = box_primitive(
            BoxProps {
                width: Dimension::Cells(5),
                ..Default::default()
            },
            vec![plain("aaa bbb ccc")],
        );
        let lb = layout(&tree, Constraints::new(20, None));
        assert_eq!(lb.width, 5);
        assert_eq!(lb.children[0].height, 3);

        let truncated = text(
            TextProps {
                wrap: TextWrap::TruncateEnd,
                ..Default::default()
            },
            "aaa bbb ccc",
        );
        let lb = layout(&truncated, Constraints::new(5, None));
        assert_eq!(lb.height, 1);
    }

    #[test]
    fn test_margins_and_gap() {
        let tree = row(
            BoxProps {
                gap: 2,
                ..Default::default()
            },
            vec![
                box_primitive(
                    BoxProps {
                        width: Dimension::Cells(3),
                        margin_left: Some(1),
                        ..Default::default()
                    },
                    vec![],
                ),
                fixed(3),
            ],
        );
        let lb = layout(&tree, Constraints::new(20, None));
        assert_eq!(xs(&lb), vec![(1, 3), (6, 3)]);
    }
}
