//! Core value types shared by layout, paint and diff.
//!
//! Colors, cell attributes, sizing units and the flex enums. Everything here
//! is `Copy` (except [`ColorValue`]) so nodes and frames can pass them around
//! freely.

// =============================================================================
// Color
// =============================================================================

/// Terminal color.
///
/// Channels are `i16` so two sentinel encodings fit beside plain RGB:
/// `r == -1` is the terminal's own default color, `r == -2` is an indexed
/// palette color with the index in `g`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: i16,
    pub g: i16,
    pub b: i16,
    pub a: i16,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as i16,
            g: g as i16,
            b: b as i16,
            a: a as i16,
        }
    }

    /// Opaque RGB color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Let the terminal pick.
    pub const TERMINAL_DEFAULT: Self = Self {
        r: -1,
        g: -1,
        b: -1,
        a: -1,
    };

    /// Paints nothing; the cell keeps whatever is underneath.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Palette color 0-255 (0-7 standard, 8-15 bright, then cube and grays).
    pub const fn ansi(index: u8) -> Self {
        Self {
            r: -2,
            g: index as i16,
            b: 0,
            a: 255,
        }
    }

    #[inline]
    pub const fn is_terminal_default(&self) -> bool {
        self.r == -1
    }

    #[inline]
    pub const fn is_ansi(&self) -> bool {
        self.r == -2
    }

    #[inline]
    pub const fn ansi_index(&self) -> u8 {
        self.g as u8
    }

    #[inline]
    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa` (the `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');

        fn digit(c: u8) -> Option<u8> {
            match c {
                b'0'..=b'9' => Some(c - b'0'),
                b'a'..=b'f' => Some(c - b'a' + 10),
                b'A'..=b'F' => Some(c - b'A' + 10),
                _ => None,
            }
        }

        fn byte(s: &[u8], i: usize) -> Option<u8> {
            Some((digit(s[i])? << 4) | digit(s[i + 1])?)
        }

        let bytes = hex.as_bytes();
        match bytes.len() {
            3 => {
                let r = digit(bytes[0])?;
                let g = digit(bytes[1])?;
                let b = digit(bytes[2])?;
                Some(Self::rgb(r * 17, g * 17, b * 17))
            }
            6 => Some(Self::rgb(byte(bytes, 0)?, byte(bytes, 2)?, byte(bytes, 4)?)),
            8 => Some(Self::new(
                byte(bytes, 0)?,
                byte(bytes, 2)?,
                byte(bytes, 4)?,
                byte(bytes, 6)?,
            )),
            _ => None,
        }
    }

    /// Parse a color token: a hex literal, one of the 16 palette names
    /// (`red`, `brightBlue`, `bright-cyan`, `gray`...), `ansi(N)`, or one of
    /// the keywords `default` / `transparent`.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.starts_with('#') {
            return Self::from_hex(input);
        }

        let lower: String = input
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match lower.as_str() {
            "default" | "inherit" | "none" => return Some(Self::TERMINAL_DEFAULT),
            "transparent" => return Some(Self::TRANSPARENT),
            _ => {}
        }

        if let Some(index) = lower
            .strip_prefix("ansi(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return index.trim().parse::<u8>().ok().map(Self::ansi);
        }

        let (bright, base) = match lower.strip_prefix("bright") {
            Some(base) => (true, base),
            None => (false, lower.as_str()),
        };
        let index = match base {
            "black" => 0,
            "red" => 1,
            "green" => 2,
            "yellow" => 3,
            "blue" => 4,
            "magenta" => 5,
            "cyan" => 6,
            "white" => 7,
            "gray" | "grey" if !bright => return Some(Self::ansi(8)),
            _ => return None,
        };
        Some(Self::ansi(if bright { index + 8 } else { index }))
    }
}

// =============================================================================
// ColorValue - what props carry
// =============================================================================

/// A color as written in props: either resolved already or a token that is
/// resolved at paint time.
///
/// Unknown tokens never fail a frame; they resolve to the terminal default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorValue {
    Rgba(Rgba),
    Token(String),
}

impl ColorValue {
    /// Resolve to a concrete color, logging and defaulting unknown tokens.
    pub fn resolve(&self) -> Rgba {
        match self {
            Self::Rgba(rgba) => *rgba,
            Self::Token(token) => Rgba::parse(token).unwrap_or_else(|| {
                tracing::warn!(token = %token, "unknown color token, using terminal default");
                Rgba::TERMINAL_DEFAULT
            }),
        }
    }
}

impl From<Rgba> for ColorValue {
    fn from(value: Rgba) -> Self {
        Self::Rgba(value)
    }
}

impl From<&str> for ColorValue {
    fn from(value: &str) -> Self {
        Self::Token(value.to_string())
    }
}

impl From<String> for ColorValue {
    fn from(value: String) -> Self {
        Self::Token(value)
    }
}

// =============================================================================
// Dimension
// =============================================================================

/// A size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Dimension {
    /// Size from content (or from flex distribution).
    #[default]
    Auto,
    /// Absolute size in terminal cells.
    Cells(u16),
    /// Percentage (0-100) of the containing content box.
    Percent(f32),
}

impl Dimension {
    /// Resolve against the container's content extent. `Auto` → `None`.
    pub fn resolve(&self, container: u16) -> Option<u16> {
        match *self {
            Self::Auto => None,
            Self::Cells(n) => Some(n),
            Self::Percent(p) => {
                let p = if p.is_finite() { p.clamp(0.0, 100.0) } else { 0.0 };
                Some(((container as f32) * p / 100.0).floor() as u16)
            }
        }
    }

    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }
}

impl From<u16> for Dimension {
    fn from(value: u16) -> Self {
        Self::Cells(value)
    }
}

impl From<i32> for Dimension {
    fn from(value: i32) -> Self {
        Self::Cells(value.clamp(0, u16::MAX as i32) as u16)
    }
}

// =============================================================================
// Edges
// =============================================================================

/// Per-side extents for padding and margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub top: u16,
    pub right: u16,
    pub bottom: u16,
    pub left: u16,
}

impl Edges {
    pub const ZERO: Self = Self::all(0);

    pub const fn all(n: u16) -> Self {
        Self {
            top: n,
            right: n,
            bottom: n,
            left: n,
        }
    }

    /// Resolve the usual prop shorthand: `all`, then the axis values, then
    /// individual sides, each overriding the less specific one.
    pub fn from_shorthand(
        all: Option<u16>,
        x: Option<u16>,
        y: Option<u16>,
        sides: [Option<u16>; 4],
    ) -> Self {
        let base = all.unwrap_or(0);
        let horizontal = x.unwrap_or(base);
        let vertical = y.unwrap_or(base);
        let [top, right, bottom, left] = sides;
        Self {
            top: top.unwrap_or(vertical),
            right: right.unwrap_or(horizontal),
            bottom: bottom.unwrap_or(vertical),
            left: left.unwrap_or(horizontal),
        }
    }

    #[inline]
    pub const fn horizontal(&self) -> u16 {
        self.left.saturating_add(self.right)
    }

    #[inline]
    pub const fn vertical(&self) -> u16 {
        self.top.saturating_add(self.bottom)
    }
}

// =============================================================================
// Cell
// =============================================================================

bitflags::bitflags! {
    /// Text attributes. Combine with `|`: `Attr::BOLD | Attr::ITALIC`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        const BLINK = 1 << 4;
        const INVERSE = 1 << 5;
        const HIDDEN = 1 << 6;
        const STRIKETHROUGH = 1 << 7;
    }
}

/// One terminal cell.
///
/// `char == 0` marks the right half of a wide glyph; the cell to its left
/// owns the glyph and nothing is written for the continuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub char: u32,
    pub fg: Rgba,
    pub bg: Rgba,
    pub attrs: Attr,
}

impl Cell {
    pub const CONTINUATION: u32 = 0;

    #[inline]
    pub const fn is_continuation(&self) -> bool {
        self.char == Self::CONTINUATION
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            char: b' ' as u32,
            fg: Rgba::TERMINAL_DEFAULT,
            bg: Rgba::TERMINAL_DEFAULT,
            attrs: Attr::NONE,
        }
    }
}

// =============================================================================
// ClipRect
// =============================================================================

/// Axis-aligned rectangle in absolute cells, used for clipping and hit-tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl ClipRect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    #[inline]
    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    #[inline]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    pub fn intersect(&self, other: &ClipRect) -> Option<ClipRect> {
        let x1 = self.x.max(other.x);
        let y1 = self.y.max(other.y);
        let x2 = self.right().min(other.right());
        let y2 = self.bottom().min(other.bottom());

        (x2 > x1 && y2 > y1).then(|| ClipRect::new(x1, y1, x2 - x1, y2 - y1))
    }
}

// =============================================================================
// Border Styles
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum BorderStyle {
    #[default]
    None = 0,
    /// ─ │ ┌ ┐ └ ┘
    Single = 1,
    /// ═ ║ ╔ ╗ ╚ ╝
    Double = 2,
    /// ─ │ ╭ ╮ ╰ ╯
    Rounded = 3,
    /// ━ ┃ ┏ ┓ ┗ ┛
    Bold = 4,
    /// ┄ ┆ ┌ ┐ └ ┘
    Dashed = 5,
    /// - | + + + +
    Ascii = 6,
}

impl BorderStyle {
    /// (horizontal, vertical, top_left, top_right, bottom_right, bottom_left)
    pub const fn chars(&self) -> (char, char, char, char, char, char) {
        match self {
            Self::None => (' ', ' ', ' ', ' ', ' ', ' '),
            Self::Single => ('─', '│', '┌', '┐', '┘', '└'),
            Self::Double => ('═', '║', '╔', '╗', '╝', '╚'),
            Self::Rounded => ('─', '│', '╭', '╮', '╯', '╰'),
            Self::Bold => ('━', '┃', '┏', '┓', '┛', '┗'),
            Self::Dashed => ('┄', '┆', '┌', '┐', '┘', '└'),
            Self::Ascii => ('-', '|', '+', '+', '+', '+'),
        }
    }

    /// Cells taken on each side.
    pub const fn width(&self) -> u16 {
        match self {
            Self::None => 0,
            _ => 1,
        }
    }
}

// =============================================================================
// Flex Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum FlexDirection {
    #[default]
    Column = 0,
    Row = 1,
    ColumnReverse = 2,
    RowReverse = 3,
}

impl FlexDirection {
    pub const fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::ColumnReverse | Self::RowReverse)
    }
}

/// Main axis distribution of free space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum JustifyContent {
    #[default]
    FlexStart = 0,
    Center = 1,
    FlexEnd = 2,
    SpaceBetween = 3,
    SpaceAround = 4,
    SpaceEvenly = 5,
}

/// Cross axis placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignItems {
    #[default]
    Stretch = 0,
    FlexStart = 1,
    Center = 2,
    FlexEnd = 3,
}

/// Per-item override of the container's [`AlignItems`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignSelf {
    #[default]
    Auto = 0,
    Stretch = 1,
    FlexStart = 2,
    Center = 3,
    FlexEnd = 4,
}

impl AlignSelf {
    pub const fn resolve(&self, parent: AlignItems) -> AlignItems {
        match self {
            Self::Auto => parent,
            Self::Stretch => AlignItems::Stretch,
            Self::FlexStart => AlignItems::FlexStart,
            Self::Center => AlignItems::Center,
            Self::FlexEnd => AlignItems::FlexEnd,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Overflow {
    #[default]
    Visible = 0,
    /// Descendants are clipped to this box's content area.
    Hidden = 1,
}

/// How text that does not fit its box is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum TextWrap {
    /// Break at word boundaries, hard-breaking words wider than the box.
    #[default]
    Wrap = 0,
    /// One line per source line, ellipsis at the end. Alias of `TruncateEnd`.
    Truncate = 1,
    TruncateEnd = 2,
    TruncateStart = 3,
    TruncateMiddle = 4,
}
