//! Keyboard Module - Decoded key events and the input handler registry
//!
//! Events arrive already decoded (see [`super::input`] for the crossterm
//! bridge). Handlers registered through `use_input` are kept here, per app,
//! and called in registration order.
//!
//! # Example
//!
//! ```ignore
//! use ember_tui::state::keyboard::{Key, KeyboardEvent};
//!
//! let typed = KeyboardEvent::char('q');
//! let arrow = KeyboardEvent::key(Key { up_arrow: true, ..Default::default() });
//! assert_eq!(typed.input, "q");
//! assert!(arrow.key.up_arrow);
//! ```

use std::cell::RefCell;
use std::rc::Rc;

// =============================================================================
// TYPES
// =============================================================================

/// Named keys and modifiers for one key press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Key {
    pub up_arrow: bool,
    pub down_arrow: bool,
    pub left_arrow: bool,
    pub right_arrow: bool,
    pub page_up: bool,
    pub page_down: bool,
    pub home: bool,
    pub end: bool,
    /// Enter / Return.
    pub return_key: bool,
    pub escape: bool,
    pub tab: bool,
    pub backspace: bool,
    pub delete: bool,
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
}

/// One decoded key press.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyboardEvent {
    /// Printable text for the press; empty for named keys.
    pub input: String,
    pub key: Key,
}

impl KeyboardEvent {
    /// A plain character press.
    pub fn char(c: char) -> Self {
        Self {
            input: c.to_string(),
            key: Key::default(),
        }
    }

    /// A named key press with no text.
    pub fn key(key: Key) -> Self {
        Self {
            input: String::new(),
            key,
        }
    }

    /// Ctrl + `c`.
    pub fn ctrl(c: char) -> Self {
        Self {
            input: c.to_string(),
            key: Key {
                ctrl: true,
                ..Key::default()
            },
        }
    }

    pub fn is_ctrl_c(&self) -> bool {
        self.key.ctrl && self.input.eq_ignore_ascii_case("c")
    }
}

/// Handler for keyboard events.
pub type InputHandler = Rc<dyn Fn(&KeyboardEvent)>;

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

#[derive(Default)]
struct Handlers {
    entries: Vec<(usize, InputHandler)>,
    next_id: usize,
}

/// Per-app list of input handlers.
///
/// Cheap to clone; clones share the list. Dispatch snapshots the list
/// first, so handlers may register or unregister while running.
#[derive(Clone, Default)]
pub struct InputRegistry {
    inner: Rc<RefCell<Handlers>>,
}

impl InputRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a handler. Returns an id for [`unregister`](Self::unregister).
    pub fn register(&self, handler: InputHandler) -> usize {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.entries.push((id, handler));
        id
    }

    pub fn unregister(&self, id: usize) {
        self.inner
            .borrow_mut()
            .entries
            .retain(|(handler_id, _)| *handler_id != id);
    }

    /// Call every handler, oldest first. Returns how many ran.
    pub fn dispatch(&self, event: &KeyboardEvent) -> usize {
        let handlers: Vec<InputHandler> = self
            .inner
            .borrow()
            .entries
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_in_registration_order() {
        let registry = InputRegistry::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        registry.register(Rc::new(move |e: &KeyboardEvent| l.borrow_mut().push(format!("a{}", e.input))));
        let l = log.clone();
        let second = registry.register(Rc::new(move |e: &KeyboardEvent| l.borrow_mut().push(format!("b{}", e.input))));

        assert_eq!(registry.dispatch(&KeyboardEvent::char('x')), 2);
        assert_eq!(*log.borrow(), vec!["ax", "bx"]);

        registry.unregister(second);
        registry.dispatch(&KeyboardEvent::char('y'));
        assert_eq!(*log.borrow(), vec!["ax", "bx", "ay"]);
    }

    #[test]
    fn test_handler_may_unregister_itself() {
        let registry = InputRegistry::new();
        let calls = Rc::new(Cell::new(0));
        let id = Rc::new(Cell::new(usize::MAX));

        let (r, c, i) = (registry.clone(), calls.clone(), id.clone());
        id.set(registry.register(Rc::new(move |_: &KeyboardEvent| {
            c.set(c.get() + 1);
            r.unregister(i.get());
        })));

        registry.dispatch(&KeyboardEvent::char('a'));
        registry.dispatch(&KeyboardEvent::char('a'));
        assert_eq!(calls.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_ctrl_c_detection() {
        assert!(KeyboardEvent::ctrl('c').is_ctrl_c());
        assert!(!KeyboardEvent::char('c').is_ctrl_c());
    }
}
