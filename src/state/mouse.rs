//! Mouse Module - Decoded mouse events and the hit-test registry
//!
//! Every paint pass rebuilds a [`HitRegistry`] from the boxes that carry
//! `on_click` or `on_scroll`. Regions are registered parents first, so the
//! last region containing a point is the most deeply nested one.
//!
//! # Example
//!
//! ```ignore
//! use ember_tui::state::mouse::{MouseEvent, MouseButton};
//!
//! let click = MouseEvent::click(4, 2);
//! if let Some(callback) = hits.resolve(&click) {
//!     runtime.batch(|| callback(&click))?;
//! }
//! ```

use crate::primitives::MouseCallback;
use crate::types::ClipRect;

// =============================================================================
// TYPES
// =============================================================================

/// Mouse button. Wheel motion is reported as its own "button".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MouseButton {
    Left = 0,
    Right = 1,
    Middle = 2,
    ScrollUp = 3,
    ScrollDown = 4,
    #[default]
    None = 5,
}

impl MouseButton {
    pub fn is_scroll(self) -> bool {
        matches!(self, Self::ScrollUp | Self::ScrollDown)
    }
}

/// What the pointer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum MouseAction {
    /// Button press, or one wheel step.
    #[default]
    Click = 0,
    DoubleClick = 1,
    Drag = 2,
    Release = 3,
    Move = 4,
}

/// Modifier keys held during a mouse event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

/// One decoded mouse event, in 0-indexed cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouseEvent {
    pub x: u16,
    pub y: u16,
    pub button: MouseButton,
    pub action: MouseAction,
    pub modifiers: Modifiers,
}

impl MouseEvent {
    pub fn new(x: u16, y: u16, button: MouseButton, action: MouseAction) -> Self {
        Self {
            x,
            y,
            button,
            action,
            modifiers: Modifiers::default(),
        }
    }

    /// Left-button click.
    pub fn click(x: u16, y: u16) -> Self {
        Self::new(x, y, MouseButton::Left, MouseAction::Click)
    }

    /// One wheel step; `up` scrolls toward the top.
    pub fn scroll(x: u16, y: u16, up: bool) -> Self {
        let button = if up {
            MouseButton::ScrollUp
        } else {
            MouseButton::ScrollDown
        };
        Self::new(x, y, button, MouseAction::Click)
    }

    /// Events routed to `on_click`.
    pub fn is_click(&self) -> bool {
        !self.button.is_scroll() && matches!(self.action, MouseAction::Click | MouseAction::DoubleClick)
    }
}

// =============================================================================
// HIT REGISTRY
// =============================================================================

/// A box's visible area and its mouse callbacks.
#[derive(Clone)]
pub struct HitRegion {
    pub rect: ClipRect,
    pub on_click: Option<MouseCallback>,
    pub on_scroll: Option<MouseCallback>,
}

impl std::fmt::Debug for HitRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitRegion")
            .field("rect", &self.rect)
            .field("on_click", &self.on_click.is_some())
            .field("on_scroll", &self.on_scroll.is_some())
            .finish()
    }
}

/// Screen regions to callbacks, rebuilt on every paint.
#[derive(Debug, Clone, Default)]
pub struct HitRegistry {
    regions: Vec<HitRegion>,
}

impl HitRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero-area regions are ignored.
    pub fn register(&mut self, region: HitRegion) {
        if region.rect.width == 0 || region.rect.height == 0 {
            return;
        }
        self.regions.push(region);
    }

    pub fn clear(&mut self) {
        self.regions.clear();
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn regions(&self) -> &[HitRegion] {
        &self.regions
    }

    /// Topmost region at (x, y), whatever its callbacks.
    pub fn hit_test(&self, x: u16, y: u16) -> Option<&HitRegion> {
        self.regions.iter().rev().find(|r| r.rect.contains(x, y))
    }

    /// The callback for `event`: the topmost region at the event position
    /// that handles this kind of event. Wheel events go to `on_scroll`,
    /// clicks to `on_click`; other actions resolve to nothing.
    pub fn resolve(&self, event: &MouseEvent) -> Option<MouseCallback> {
        let pick: fn(&HitRegion) -> Option<&MouseCallback> = if event.button.is_scroll() {
            |r| r.on_scroll.as_ref()
        } else if event.is_click() {
            |r| r.on_click.as_ref()
        } else {
            return None;
        };
        self.regions
            .iter()
            .rev()
            .filter(|r| r.rect.contains(event.x, event.y))
            .find_map(pick)
            .cloned()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<&'static str>>>, name: &'static str) -> MouseCallback {
        let log = log.clone();
        Rc::new(move |_: &MouseEvent| log.borrow_mut().push(name))
    }

    #[test]
    fn test_innermost_region_wins() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hits = HitRegistry::new();
        hits.register(HitRegion {
            rect: ClipRect::new(0, 0, 20, 10),
            on_click: Some(recorder(&log, "outer")),
            on_scroll: None,
        });
        hits.register(HitRegion {
            rect: ClipRect::new(5, 2, 4, 3),
            on_click: Some(recorder(&log, "inner")),
            on_scroll: None,
        });

        let event = MouseEvent::click(6, 3);
        if let Some(cb) = hits.resolve(&event) {
            cb(&event);
        }
        let event = MouseEvent::click(1, 1);
        if let Some(cb) = hits.resolve(&event) {
            cb(&event);
        }
        assert_eq!(*log.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_scroll_skips_click_only_regions() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hits = HitRegistry::new();
        hits.register(HitRegion {
            rect: ClipRect::new(0, 0, 10, 10),
            on_click: None,
            on_scroll: Some(recorder(&log, "list")),
        });
        hits.register(HitRegion {
            rect: ClipRect::new(0, 0, 10, 1),
            on_click: Some(recorder(&log, "row")),
            on_scroll: None,
        });

        let wheel = MouseEvent::scroll(2, 0, false);
        hits.resolve(&wheel).expect("scroll handler")(&wheel);
        assert_eq!(*log.borrow(), vec!["list"]);
        assert!(hits.resolve(&MouseEvent::new(2, 0, MouseButton::None, MouseAction::Move)).is_none());
        assert!(hits.resolve(&MouseEvent::click(30, 30)).is_none());
    }

    #[test]
    fn test_empty_regions_are_dropped() {
        let mut hits = HitRegistry::new();
        hits.register(HitRegion {
            rect: ClipRect::new(3, 3, 0, 5),
            on_click: None,
            on_scroll: None,
        });
        assert!(hits.is_empty());
        assert!(hits.hit_test(3, 3).is_none());
    }
}
