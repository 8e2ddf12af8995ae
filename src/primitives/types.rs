//! Props for the node constructors.
//!
//! Props are plain structs filled with struct-literal syntax and
//! `..Default::default()`. Every field has a neutral default, so an empty
//! `BoxProps::default()` is a column box that sizes to its content.

use std::fmt;
use std::rc::Rc;

use crate::state::mouse::MouseEvent;
use crate::types::{
    AlignItems, AlignSelf, Attr, BorderStyle, ColorValue, Dimension, Edges, FlexDirection,
    JustifyContent, Overflow, TextWrap,
};

// =============================================================================
// Callback Types
// =============================================================================

/// Mouse callback. `Rc` so one handler can be shared by several nodes and
/// cloned into closures.
pub type MouseCallback = Rc<dyn Fn(&MouseEvent)>;

// =============================================================================
// Box Props
// =============================================================================

/// Properties for [`box_primitive`](super::box_primitive).
///
/// # Example
///
/// ```ignore
/// box_primitive(
///     BoxProps {
///         flex_direction: FlexDirection::Row,
///         padding_x: Some(1),
///         border_style: BorderStyle::Rounded,
///         border_color: Some("cyan".into()),
///         ..Default::default()
///     },
///     vec![text(TextProps::default(), "hi")],
/// )
/// ```
#[derive(Clone, Default)]
pub struct BoxProps {
    // =========================================================================
    // Layout - Container
    // =========================================================================
    pub flex_direction: FlexDirection,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    /// Cells between adjacent children on the main axis.
    pub gap: u16,

    // =========================================================================
    // Layout - Item
    // =========================================================================
    pub flex_grow: f32,
    /// Defaults to 1 when unset.
    pub flex_shrink: Option<f32>,
    pub flex_basis: Dimension,
    pub align_self: AlignSelf,

    // =========================================================================
    // Dimensions
    // =========================================================================
    pub width: Dimension,
    pub height: Dimension,
    pub min_width: Dimension,
    pub min_height: Dimension,
    pub max_width: Dimension,
    pub max_height: Dimension,

    // =========================================================================
    // Spacing
    // =========================================================================
    pub padding: Option<u16>,
    pub padding_x: Option<u16>,
    pub padding_y: Option<u16>,
    pub padding_top: Option<u16>,
    pub padding_right: Option<u16>,
    pub padding_bottom: Option<u16>,
    pub padding_left: Option<u16>,

    pub margin: Option<u16>,
    pub margin_x: Option<u16>,
    pub margin_y: Option<u16>,
    pub margin_top: Option<u16>,
    pub margin_right: Option<u16>,
    pub margin_bottom: Option<u16>,
    pub margin_left: Option<u16>,

    // =========================================================================
    // Visual
    // =========================================================================
    pub border_style: BorderStyle,
    pub border_color: Option<ColorValue>,
    pub background_color: Option<ColorValue>,
    pub overflow: Overflow,

    // =========================================================================
    // Event Callbacks
    // =========================================================================
    /// Left, right or middle click (single or double) inside the box.
    pub on_click: Option<MouseCallback>,
    /// Wheel scroll inside the box.
    pub on_scroll: Option<MouseCallback>,
}

impl BoxProps {
    /// Padding with shorthand resolved (`padding` < `padding_x/y` < sides).
    pub fn resolved_padding(&self) -> Edges {
        Edges::from_shorthand(
            self.padding,
            self.padding_x,
            self.padding_y,
            [
                self.padding_top,
                self.padding_right,
                self.padding_bottom,
                self.padding_left,
            ],
        )
    }

    pub fn resolved_margin(&self) -> Edges {
        Edges::from_shorthand(
            self.margin,
            self.margin_x,
            self.margin_y,
            [
                self.margin_top,
                self.margin_right,
                self.margin_bottom,
                self.margin_left,
            ],
        )
    }
}

impl fmt::Debug for BoxProps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxProps")
            .field("flex_direction", &self.flex_direction)
            .field("flex_grow", &self.flex_grow)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("border_style", &self.border_style)
            .field("on_click", &self.on_click.is_some())
            .field("on_scroll", &self.on_scroll.is_some())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Text Props
// =============================================================================

/// Properties for [`text`](super::text).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextProps {
    pub color: Option<ColorValue>,
    pub background_color: Option<ColorValue>,
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    pub inverse: bool,
    pub wrap: TextWrap,
}

impl TextProps {
    pub fn attrs(&self) -> Attr {
        let mut attrs = Attr::NONE;
        for (on, flag) in [
            (self.bold, Attr::BOLD),
            (self.dim, Attr::DIM),
            (self.italic, Attr::ITALIC),
            (self.underline, Attr::UNDERLINE),
            (self.strikethrough, Attr::STRIKETHROUGH),
            (self.inverse, Attr::INVERSE),
        ] {
            if on {
                attrs |= flag;
            }
        }
        attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padding_shorthand() {
        let props = BoxProps {
            padding: Some(1),
            padding_x: Some(3),
            padding_bottom: Some(0),
            ..Default::default()
        };
        assert_eq!(
            props.resolved_padding(),
            Edges {
                top: 1,
                right: 3,
                bottom: 0,
                left: 3
            }
        );
        assert_eq!(props.resolved_margin(), Edges::ZERO);
    }

    #[test]
    fn test_text_attrs() {
        let props = TextProps {
            bold: true,
            inverse: true,
            ..Default::default()
        };
        assert_eq!(props.attrs(), Attr::BOLD | Attr::INVERSE);
    }
}
